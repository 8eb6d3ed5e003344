//! Deterministic doubles for tests: static adapters, a canned synthesizer,
//! and a recording job sink. Compiled for unit tests and for dependents via
//! the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use apify_client::InstagramProfile;
use async_trait::async_trait;
use shadowbox_common::Persona;
use socialdata_client::TwitterProfile;

use crate::adapters::SourceAdapter;
use crate::synthesizer::Synthesizer;
use crate::tasks::{DeferredJob, DeferredTasks};
use crate::types::{Fetched, FailureKind, Source, SourcePayload, TwitterPayload};

/// Serves payloads from a fixed map and counts calls. Batches go through
/// the trait's default fan-out unless `batched()` is set, which switches to
/// a single-call override like the production batch adapters.
pub struct StaticAdapter {
    source: Source,
    payloads: HashMap<String, SourcePayload>,
    ready: bool,
    batched: bool,
    fetch_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl StaticAdapter {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            payloads: HashMap::new(),
            ready: true,
            batched: true,
            fetch_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_payload(mut self, handle: &str, payload: SourcePayload) -> Self {
        self.payloads.insert(handle.to_string(), payload);
        self
    }

    pub fn unready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Route batches through the default per-handle fan-out instead of the
    /// single-call override.
    pub fn without_native_batch(mut self) -> Self {
        self.batched = false;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn batch_count(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn source(&self) -> Source {
        self.source
    }

    fn ready(&self) -> bool {
        self.ready
    }

    async fn fetch_one(&self, handle: &str) -> Fetched {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.ready {
            return Fetched::Miss(FailureKind::ConfigurationMissing);
        }
        match self.payloads.get(handle) {
            Some(payload) => Fetched::Hit(payload.clone()),
            None => Fetched::Miss(FailureKind::NotFound),
        }
    }

    async fn fetch_batch(&self, handles: &[String]) -> HashMap<String, SourcePayload> {
        if !self.batched {
            // Count the individual fetch_one calls instead.
            let mut out = HashMap::new();
            for handle in handles {
                if let Fetched::Hit(payload) = self.fetch_one(handle).await {
                    out.insert(handle.clone(), payload);
                }
            }
            return out;
        }

        // Counters track upstream dispatches; an unready adapter answers
        // empty without dispatching, like the production batch adapters.
        if !self.ready {
            return HashMap::new();
        }
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        handles
            .iter()
            .filter_map(|h| self.payloads.get(h).map(|p| (h.clone(), p.clone())))
            .collect()
    }
}

/// Always misses with a fixed failure kind.
pub struct FailingAdapter {
    source: Source,
    kind: FailureKind,
}

impl FailingAdapter {
    pub fn new(source: Source, kind: FailureKind) -> Self {
        Self { source, kind }
    }
}

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_one(&self, _handle: &str) -> Fetched {
        Fetched::Miss(self.kind)
    }
}

/// Sleeps past any deadline, then misses. For timeout tests with a paused
/// clock.
pub struct SleepyAdapter {
    source: Source,
    delay: Duration,
}

impl SleepyAdapter {
    pub fn new(source: Source, delay: Duration) -> Self {
        Self { source, delay }
    }
}

#[async_trait]
impl SourceAdapter for SleepyAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_one(&self, _handle: &str) -> Fetched {
        tokio::time::sleep(self.delay).await;
        Fetched::Miss(FailureKind::NotFound)
    }
}

/// Returns a fallback-shaped persona named after the display name, and
/// records every (display_name, corpus) pair it was asked about.
#[derive(Default)]
pub struct StaticSynthesizer {
    requests: Mutex<Vec<(String, String)>>,
}

impl StaticSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for StaticSynthesizer {
    async fn synthesize(&self, corpus: &str, display_name: &str) -> Persona {
        self.requests
            .lock()
            .unwrap()
            .push((display_name.to_string(), corpus.to_string()));
        Persona::fallback(display_name)
    }
}

/// Collects enqueued jobs for assertions.
#[derive(Default)]
pub struct RecordingTasks {
    jobs: Mutex<Vec<DeferredJob>>,
}

impl RecordingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<DeferredJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl DeferredTasks for RecordingTasks {
    fn enqueue(&self, job: DeferredJob) {
        self.jobs.lock().unwrap().push(job);
    }
}

/// A Twitter payload with a full profile, for display-name and normalizer
/// tests.
pub fn twitter_profile_payload(name: &str, handle: &str) -> SourcePayload {
    SourcePayload::Twitter(TwitterPayload {
        profile: Some(TwitterProfile {
            name: Some(name.to_string()),
            screen_name: Some(handle.to_string()),
            description: Some(format!("Bio of {name}")),
            followers_count: Some(1_000),
            ..Default::default()
        }),
        tweets: vec![],
    })
}

/// An Instagram payload with a name and bio.
pub fn instagram_payload(name: &str, handle: &str) -> SourcePayload {
    SourcePayload::Instagram(InstagramProfile {
        username: Some(handle.to_string()),
        full_name: Some(name.to_string()),
        biography: Some(format!("Bio of {name}")),
        followers_count: Some(500),
        edge_followed_by: None,
        posts: None,
    })
}
