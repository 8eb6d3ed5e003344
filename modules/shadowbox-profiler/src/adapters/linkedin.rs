use std::sync::Arc;

use apify_client::ApifyClient;
use async_trait::async_trait;
use tracing::warn;

use crate::fixtures;
use crate::types::{Fetched, FailureKind, LinkedinBundle, Source, SourcePayload};

/// Recent posts to request per profile.
const MAX_POSTS: u32 = 3;

/// LinkedIn via two apimaestro actors: profile detail and recent posts,
/// fetched concurrently and merged into one bundle. Neither actor has a
/// multi-subject mode, so batches go through the default fan-out.
pub struct LinkedinAdapter {
    client: Option<Arc<ApifyClient>>,
}

impl LinkedinAdapter {
    pub fn new(client: Option<Arc<ApifyClient>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl super::SourceAdapter for LinkedinAdapter {
    fn source(&self) -> Source {
        Source::Linkedin
    }

    fn ready(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_one(&self, handle: &str) -> Fetched {
        if let Some(canned) = fixtures::canned_payload(Source::Linkedin, handle) {
            return Fetched::Hit(canned);
        }

        let Some(client) = &self.client else {
            return Fetched::Miss(FailureKind::ConfigurationMissing);
        };

        let (profile, posts) = tokio::join!(
            client.scrape_linkedin_profile(handle),
            client.scrape_linkedin_posts(handle, MAX_POSTS),
        );

        let profile = match profile {
            Ok(Some(profile)) => profile,
            Ok(None) => return Fetched::Miss(FailureKind::NotFound),
            Err(err) => {
                let kind = super::apify_failure(&err);
                warn!(handle, %kind, error = %err, "LinkedIn profile fetch failed");
                return Fetched::Miss(kind);
            }
        };

        // Posts are enrichment; a posts failure degrades to profile-only.
        let posts = match posts {
            Ok(posts) => posts,
            Err(err) => {
                warn!(handle, error = %err, "LinkedIn posts fetch failed");
                vec![]
            }
        };

        Fetched::Hit(SourcePayload::Linkedin(LinkedinBundle { profile, posts }))
    }
}
