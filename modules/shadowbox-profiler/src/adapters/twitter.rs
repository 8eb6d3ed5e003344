use async_trait::async_trait;
use socialdata_client::{SocialDataClient, SocialDataError};
use tracing::warn;

use crate::fixtures;
use crate::types::{Fetched, FailureKind, Source, SourcePayload, TwitterPayload};

/// Twitter profiles via SocialData.tools. No native batch endpoint, so
/// batches fan out through the default `fetch_one` path.
pub struct TwitterAdapter {
    client: Option<SocialDataClient>,
}

impl TwitterAdapter {
    pub fn new(client: Option<SocialDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl super::SourceAdapter for TwitterAdapter {
    fn source(&self) -> Source {
        Source::Twitter
    }

    fn ready(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_one(&self, handle: &str) -> Fetched {
        if let Some(canned) = fixtures::canned_payload(Source::Twitter, handle) {
            return Fetched::Hit(canned);
        }

        let Some(client) = &self.client else {
            return Fetched::Miss(FailureKind::ConfigurationMissing);
        };

        match client.user_profile(handle).await {
            Ok(profile) => Fetched::Hit(SourcePayload::Twitter(TwitterPayload {
                profile: Some(profile),
                tweets: vec![],
            })),
            Err(err) => {
                let kind = failure_kind(&err);
                warn!(handle, %kind, error = %err, "Twitter fetch failed");
                Fetched::Miss(kind)
            }
        }
    }
}

fn failure_kind(err: &SocialDataError) -> FailureKind {
    match err {
        SocialDataError::NotFound => FailureKind::NotFound,
        SocialDataError::InsufficientCredits => FailureKind::QuotaExhausted,
        // Transport failures count as timeouts: the call did not complete.
        SocialDataError::Network(_) => FailureKind::Timeout,
        SocialDataError::Parse(_) | SocialDataError::Api { .. } => FailureKind::MalformedResponse,
    }
}
