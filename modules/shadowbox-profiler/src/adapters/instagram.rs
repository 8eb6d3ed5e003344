use std::collections::HashMap;
use std::sync::Arc;

use apify_client::ApifyClient;
use async_trait::async_trait;
use tracing::warn;

use crate::fixtures;
use crate::types::{Fetched, FailureKind, Source, SourcePayload};

/// Latest posts to request per profile. The actor bills per result, so this
/// is a cost cap as much as a relevance one.
const MAX_POSTS: u32 = 10;

/// Instagram profiles via the Apify instagram-profile-scraper actor, which
/// accepts multiple usernames per run. A whole batch is one upstream call.
pub struct InstagramAdapter {
    client: Option<Arc<ApifyClient>>,
}

impl InstagramAdapter {
    pub fn new(client: Option<Arc<ApifyClient>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl super::SourceAdapter for InstagramAdapter {
    fn source(&self) -> Source {
        Source::Instagram
    }

    fn ready(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_one(&self, handle: &str) -> Fetched {
        if let Some(canned) = fixtures::canned_payload(Source::Instagram, handle) {
            return Fetched::Hit(canned);
        }

        let Some(client) = &self.client else {
            return Fetched::Miss(FailureKind::ConfigurationMissing);
        };

        match client
            .scrape_instagram_profiles(&[handle.to_string()], MAX_POSTS)
            .await
        {
            Ok(mut profiles) => {
                if profiles.is_empty() {
                    Fetched::Miss(FailureKind::NotFound)
                } else {
                    Fetched::Hit(SourcePayload::Instagram(profiles.remove(0)))
                }
            }
            Err(err) => {
                let kind = super::apify_failure(&err);
                warn!(handle, %kind, error = %err, "Instagram fetch failed");
                Fetched::Miss(kind)
            }
        }
    }

    async fn fetch_batch(&self, handles: &[String]) -> HashMap<String, SourcePayload> {
        let mut out = HashMap::new();
        let mut remaining: Vec<String> = Vec::new();

        for handle in handles {
            match fixtures::canned_payload(Source::Instagram, handle) {
                Some(canned) => {
                    out.insert(handle.clone(), canned);
                }
                None => remaining.push(handle.clone()),
            }
        }

        if remaining.is_empty() {
            return out;
        }
        let Some(client) = &self.client else {
            return out;
        };

        match client.scrape_instagram_profiles(&remaining, MAX_POSTS).await {
            Ok(profiles) => {
                // Demultiplex by the username echoed in each dataset item.
                for profile in profiles {
                    let Some(username) = profile.username.clone() else {
                        continue;
                    };
                    let requested = remaining
                        .iter()
                        .find(|h| h.eq_ignore_ascii_case(&username));
                    if let Some(handle) = requested {
                        out.insert(handle.clone(), SourcePayload::Instagram(profile));
                    }
                }
            }
            Err(err) => {
                warn!(
                    count = remaining.len(),
                    error = %err,
                    "Instagram batch fetch failed"
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SourceAdapter;

    #[tokio::test]
    async fn batch_serves_canned_handles_without_a_client() {
        let adapter = InstagramAdapter::new(None);
        let out = adapter
            .fetch_batch(&["zuck".to_string(), "nobody".to_string()])
            .await;
        assert!(out.contains_key("zuck"));
        assert!(!out.contains_key("nobody"));
    }
}
