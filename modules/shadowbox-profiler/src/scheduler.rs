//! Bounded fan-out / fan-in over source adapters.
//!
//! Every task resolves to a `SourceResult`; a panicking clock, a slow
//! upstream, or a bad handle never removes a key from the output. Results
//! are merged only after the whole fan-in completes, so partial state is
//! never observable.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::{stream, StreamExt};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::adapters::AdapterSet;
use crate::types::{Fetched, FailureKind, ProfileRef, Source, SourceResult, TaskKey};

/// Upper bound on simultaneously in-flight fetches.
pub const MAX_CONCURRENT_FETCHES: usize = 4;

/// Time bound for a single-identifier fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Time bound for a grouped per-source batch. Actor runs poll for minutes,
/// not seconds.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Scheduler output, keyed by task identity. `BTreeMap` so iteration order
/// is deterministic regardless of completion order.
pub type ResultMap = BTreeMap<TaskKey, SourceResult>;

/// Fetch each identifier individually with bounded concurrency. Repeated
/// (source, handle) pairs are fetched once.
pub async fn schedule(adapters: &AdapterSet, identifiers: &[ProfileRef]) -> ResultMap {
    let unique = dedup(identifiers);
    if unique.is_empty() {
        return ResultMap::new();
    }
    info!(tasks = unique.len(), "Scheduling individual fetches");

    let outcomes: Vec<(ProfileRef, Fetched)> = stream::iter(unique.into_iter())
        .map(|identifier| async move {
            let adapter = adapters.get(identifier.source);
            let fetched = match timeout(FETCH_TIMEOUT, adapter.fetch_one(&identifier.handle)).await
            {
                Ok(fetched) => fetched,
                Err(_) => {
                    warn!(
                        source = %identifier.source,
                        handle = %identifier.handle,
                        "Fetch timed out"
                    );
                    Fetched::Miss(FailureKind::Timeout)
                }
            };
            (identifier, fetched)
        })
        .buffer_unordered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    merge(outcomes)
}

/// Fetch per-source groups, one `fetch_batch` call per source, all sources
/// concurrent. Handles the batch returned nothing for become `NotFound`
/// misses; unready sources miss with `ConfigurationMissing` without any
/// upstream dispatch.
pub async fn schedule_grouped(
    adapters: &AdapterSet,
    by_source: &BTreeMap<Source, Vec<ProfileRef>>,
) -> ResultMap {
    let groups: Vec<(Source, Vec<ProfileRef>)> = by_source
        .iter()
        .map(|(source, refs)| (*source, dedup(refs)))
        .filter(|(_, refs)| !refs.is_empty())
        .collect();
    if groups.is_empty() {
        return ResultMap::new();
    }
    info!(sources = groups.len(), "Scheduling grouped fetches");

    let outcomes: Vec<Vec<(ProfileRef, Fetched)>> = stream::iter(groups.into_iter())
        .map(|(source, refs)| async move {
            let adapter = adapters.get(source);
            // Unready adapters still answer: they serve canned payloads
            // without dispatching upstream. Whatever they cannot serve
            // misses as ConfigurationMissing instead of NotFound.
            let absent_kind = if adapter.ready() {
                FailureKind::NotFound
            } else {
                warn!(%source, "No credential configured for source");
                FailureKind::ConfigurationMissing
            };

            let handles: Vec<String> = refs.iter().map(|r| r.handle.clone()).collect();
            match timeout(BATCH_TIMEOUT, adapter.fetch_batch(&handles)).await {
                Ok(mut payloads) => refs
                    .into_iter()
                    .map(|r| {
                        let fetched = match payloads.remove(&r.handle) {
                            Some(payload) => Fetched::Hit(payload),
                            None => Fetched::Miss(absent_kind),
                        };
                        (r, fetched)
                    })
                    .collect(),
                Err(_) => {
                    warn!(%source, "Batch fetch timed out");
                    refs.into_iter()
                        .map(|r| (r, Fetched::Miss(FailureKind::Timeout)))
                        .collect()
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    merge(outcomes.into_iter().flatten().collect())
}

fn dedup(identifiers: &[ProfileRef]) -> Vec<ProfileRef> {
    let mut unique: Vec<ProfileRef> = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        if !unique.iter().any(|r| r.key() == identifier.key()) {
            unique.push(identifier.clone());
        }
    }
    unique
}

fn merge(outcomes: Vec<(ProfileRef, Fetched)>) -> ResultMap {
    let mut map = ResultMap::new();
    for (identifier, fetched) in outcomes {
        let key = identifier.key();
        let result = match fetched {
            Fetched::Hit(payload) => SourceResult::hit(identifier, payload),
            Fetched::Miss(kind) => {
                warn!(
                    source = %key.0,
                    handle = %key.1,
                    %kind,
                    "Source yielded no data"
                );
                SourceResult::miss(identifier, kind)
            }
        };
        map.insert(key, result);
    }
    map
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::testing::{
        instagram_payload, twitter_profile_payload, FailingAdapter, SleepyAdapter, StaticAdapter,
    };

    fn profile_ref(source: Source, handle: &str) -> ProfileRef {
        ProfileRef {
            source,
            handle: handle.to_string(),
            raw_input: format!("https://example.com/{handle}"),
        }
    }

    fn set_of(
        twitter: Arc<StaticAdapter>,
        instagram: Arc<StaticAdapter>,
    ) -> AdapterSet {
        AdapterSet::new(
            twitter,
            instagram,
            Arc::new(StaticAdapter::new(Source::Linkedin)),
            Arc::new(StaticAdapter::new(Source::Facebook)),
        )
    }

    #[tokio::test]
    async fn empty_input_dispatches_nothing() {
        let twitter = Arc::new(StaticAdapter::new(Source::Twitter));
        let instagram = Arc::new(StaticAdapter::new(Source::Instagram));
        let adapters = set_of(twitter.clone(), instagram.clone());

        let results = schedule(&adapters, &[]).await;
        assert!(results.is_empty());

        let grouped = schedule_grouped(&adapters, &BTreeMap::new()).await;
        assert!(grouped.is_empty());

        assert_eq!(twitter.fetch_count(), 0);
        assert_eq!(instagram.fetch_count(), 0);
    }

    #[tokio::test]
    async fn every_task_gets_exactly_one_result() {
        let twitter = Arc::new(
            StaticAdapter::new(Source::Twitter)
                .with_payload("alice", twitter_profile_payload("Alice", "alice")),
        );
        let instagram = Arc::new(StaticAdapter::new(Source::Instagram));
        let adapters = set_of(twitter, instagram);

        let refs = vec![
            profile_ref(Source::Twitter, "alice"),
            profile_ref(Source::Twitter, "missing"),
            profile_ref(Source::Instagram, "bob"),
        ];
        let results = schedule(&adapters, &refs).await;

        assert_eq!(results.len(), 3);
        assert!(results[&(Source::Twitter, "alice".to_string())].is_hit());
        let miss = &results[&(Source::Twitter, "missing".to_string())];
        assert_eq!(miss.failure, Some(FailureKind::NotFound));
    }

    #[tokio::test]
    async fn duplicate_identifiers_are_fetched_once() {
        let twitter = Arc::new(
            StaticAdapter::new(Source::Twitter)
                .with_payload("alice", twitter_profile_payload("Alice", "alice")),
        );
        let instagram = Arc::new(StaticAdapter::new(Source::Instagram));
        let adapters = set_of(twitter.clone(), instagram);

        let refs = vec![
            profile_ref(Source::Twitter, "alice"),
            profile_ref(Source::Twitter, "alice"),
        ];
        let results = schedule(&adapters, &refs).await;

        assert_eq!(results.len(), 1);
        assert_eq!(twitter.fetch_count(), 1);
    }

    #[tokio::test]
    async fn grouped_schedule_marks_absent_handles_not_found() {
        let instagram = Arc::new(
            StaticAdapter::new(Source::Instagram)
                .with_payload("zuck", instagram_payload("Mark Zuckerberg", "zuck"))
                .with_payload("alice", instagram_payload("Alice", "alice")),
        );
        let twitter = Arc::new(StaticAdapter::new(Source::Twitter));
        let adapters = set_of(twitter, instagram.clone());

        let mut by_source = BTreeMap::new();
        by_source.insert(
            Source::Instagram,
            vec![
                profile_ref(Source::Instagram, "zuck"),
                profile_ref(Source::Instagram, "alice"),
                profile_ref(Source::Instagram, "ghost"),
            ],
        );
        let results = schedule_grouped(&adapters, &by_source).await;

        assert_eq!(results.len(), 3);
        assert!(results[&(Source::Instagram, "zuck".to_string())].is_hit());
        assert!(results[&(Source::Instagram, "alice".to_string())].is_hit());
        assert_eq!(
            results[&(Source::Instagram, "ghost".to_string())].failure,
            Some(FailureKind::NotFound)
        );
        // One batch call for the whole group, not one per handle.
        assert_eq!(instagram.batch_count(), 1);
    }

    #[tokio::test]
    async fn unready_source_misses_without_dispatch() {
        let twitter = Arc::new(StaticAdapter::new(Source::Twitter).unready());
        let instagram = Arc::new(StaticAdapter::new(Source::Instagram));
        let adapters = set_of(twitter.clone(), instagram);

        let mut by_source = BTreeMap::new();
        by_source.insert(Source::Twitter, vec![profile_ref(Source::Twitter, "alice")]);
        let results = schedule_grouped(&adapters, &by_source).await;

        assert_eq!(
            results[&(Source::Twitter, "alice".to_string())].failure,
            Some(FailureKind::ConfigurationMissing)
        );
        assert_eq!(twitter.fetch_count(), 0);
        assert_eq!(twitter.batch_count(), 0);
    }

    #[tokio::test]
    async fn failure_kinds_flow_through_unchanged() {
        let adapters = AdapterSet::new(
            Arc::new(StaticAdapter::new(Source::Twitter)),
            Arc::new(FailingAdapter::new(
                Source::Instagram,
                FailureKind::QuotaExhausted,
            )),
            Arc::new(StaticAdapter::new(Source::Linkedin)),
            Arc::new(StaticAdapter::new(Source::Facebook)),
        );

        let refs = vec![profile_ref(Source::Instagram, "zuck")];
        let results = schedule(&adapters, &refs).await;
        assert_eq!(
            results[&(Source::Instagram, "zuck".to_string())].failure,
            Some(FailureKind::QuotaExhausted)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_become_timeout_misses() {
        let slow = Arc::new(SleepyAdapter::new(
            Source::Twitter,
            FETCH_TIMEOUT + Duration::from_secs(5),
        ));
        let adapters = AdapterSet::new(
            slow,
            Arc::new(StaticAdapter::new(Source::Instagram)),
            Arc::new(StaticAdapter::new(Source::Linkedin)),
            Arc::new(StaticAdapter::new(Source::Facebook)),
        );

        let refs = vec![profile_ref(Source::Twitter, "sloth")];
        let results = schedule(&adapters, &refs).await;

        assert_eq!(
            results[&(Source::Twitter, "sloth".to_string())].failure,
            Some(FailureKind::Timeout)
        );
    }
}
