//! Per-source fetch adapters behind a common trait.
//!
//! Each adapter owns its upstream client and translates client errors into
//! the soft failure taxonomy. A missing credential makes an adapter unready;
//! it still answers, with `ConfigurationMissing` misses.

mod facebook;
mod instagram;
mod linkedin;
mod twitter;

pub use facebook::FacebookAdapter;
pub use instagram::InstagramAdapter;
pub use linkedin::LinkedinAdapter;
pub use twitter::TwitterAdapter;

use std::collections::HashMap;
use std::sync::Arc;

use apify_client::{ApifyClient, ApifyError};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use shadowbox_common::Config;
use socialdata_client::SocialDataClient;

use crate::scheduler::MAX_CONCURRENT_FETCHES;
use crate::types::{Fetched, Source, SourcePayload};

/// A fetcher for one source. Implementations never return errors; every
/// outcome is a `Fetched` so one bad handle cannot poison a batch.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    /// Whether this adapter has the credentials it needs. Unready adapters
    /// are skipped by the grouped scheduler without dispatching upstream.
    fn ready(&self) -> bool {
        true
    }

    async fn fetch_one(&self, handle: &str) -> Fetched;

    /// Fetch a whole group of handles. Sources with a native multi-subject
    /// upstream override this with a single batched call; the default fans
    /// out `fetch_one` with bounded concurrency. Absent keys in the returned
    /// map mean the upstream had nothing for that handle.
    async fn fetch_batch(&self, handles: &[String]) -> HashMap<String, SourcePayload> {
        let results: Vec<(String, Fetched)> = stream::iter(handles.iter().cloned())
            .map(|handle| async move {
                let fetched = self.fetch_one(&handle).await;
                (handle, fetched)
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        results
            .into_iter()
            .filter_map(|(handle, fetched)| match fetched {
                Fetched::Hit(payload) => Some((handle, payload)),
                Fetched::Miss(_) => None,
            })
            .collect()
    }
}

/// One adapter per source, built once and shared across schedules.
#[derive(Clone)]
pub struct AdapterSet {
    twitter: Arc<dyn SourceAdapter>,
    instagram: Arc<dyn SourceAdapter>,
    linkedin: Arc<dyn SourceAdapter>,
    facebook: Arc<dyn SourceAdapter>,
}

impl AdapterSet {
    pub fn new(
        twitter: Arc<dyn SourceAdapter>,
        instagram: Arc<dyn SourceAdapter>,
        linkedin: Arc<dyn SourceAdapter>,
        facebook: Arc<dyn SourceAdapter>,
    ) -> Self {
        Self {
            twitter,
            instagram,
            linkedin,
            facebook,
        }
    }

    /// Build the production adapters from configured credentials. Sources
    /// without a credential stay unready rather than failing construction.
    pub fn from_config(config: &Config) -> Self {
        let socialdata = config
            .socialdata_api_key
            .as_deref()
            .map(SocialDataClient::new);
        let apify = config
            .apify_token
            .as_deref()
            .map(|token| Arc::new(ApifyClient::new(token.to_string())));

        Self::new(
            Arc::new(TwitterAdapter::new(socialdata)),
            Arc::new(InstagramAdapter::new(apify.clone())),
            Arc::new(LinkedinAdapter::new(apify.clone())),
            Arc::new(FacebookAdapter::new(apify)),
        )
    }

    pub fn get(&self, source: Source) -> &dyn SourceAdapter {
        match source {
            Source::Twitter => self.twitter.as_ref(),
            Source::Instagram => self.instagram.as_ref(),
            Source::Linkedin => self.linkedin.as_ref(),
            Source::Facebook => self.facebook.as_ref(),
        }
    }
}

/// Map an Apify client error onto the failure taxonomy. Transport failures
/// count as timeouts: both mean "the call did not complete in time".
pub(crate) fn apify_failure(err: &ApifyError) -> crate::types::FailureKind {
    use crate::types::FailureKind;

    if err.is_quota() {
        return FailureKind::QuotaExhausted;
    }
    match err {
        ApifyError::Network(_) => FailureKind::Timeout,
        ApifyError::Parse(_) => FailureKind::MalformedResponse,
        ApifyError::Api { .. } | ApifyError::RunFailed(_) => FailureKind::MalformedResponse,
    }
}
