use std::collections::HashMap;
use std::sync::Arc;

use apify_client::{ApifyClient, FacebookPost};
use async_trait::async_trait;
use tracing::warn;

use crate::fixtures;
use crate::types::{FacebookBundle, Fetched, FailureKind, Source, SourcePayload};

/// Recent posts to request per page.
const MAX_POSTS: u32 = 10;

/// Facebook via two Apify actors: pages (profile info) and posts, each of
/// which accepts many start URLs per run. A whole batch is two upstream
/// calls, issued concurrently and demultiplexed by page name or URL.
pub struct FacebookAdapter {
    client: Option<Arc<ApifyClient>>,
}

impl FacebookAdapter {
    pub fn new(client: Option<Arc<ApifyClient>>) -> Self {
        Self { client }
    }

    fn page_url(handle: &str) -> String {
        format!("https://www.facebook.com/{handle}")
    }
}

/// Does this dataset item belong to the requested handle? Items echo the
/// page's vanity name and canonical URL, in varying combinations.
fn item_matches(handle: &str, page_name: Option<&str>, facebook_url: Option<&str>) -> bool {
    let handle = handle.to_lowercase();
    if let Some(name) = page_name {
        if name.to_lowercase() == handle {
            return true;
        }
    }
    if let Some(url) = facebook_url {
        if url.to_lowercase().contains(&handle) {
            return true;
        }
    }
    false
}

#[async_trait]
impl super::SourceAdapter for FacebookAdapter {
    fn source(&self) -> Source {
        Source::Facebook
    }

    fn ready(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_one(&self, handle: &str) -> Fetched {
        if !self.ready() && fixtures::canned_payload(Source::Facebook, handle).is_none() {
            return Fetched::Miss(FailureKind::ConfigurationMissing);
        }

        let handles = [handle.to_string()];
        let mut out = self.fetch_batch(&handles).await;
        match out.remove(handle) {
            Some(payload) => Fetched::Hit(payload),
            None => Fetched::Miss(FailureKind::NotFound),
        }
    }

    async fn fetch_batch(&self, handles: &[String]) -> HashMap<String, SourcePayload> {
        let mut out = HashMap::new();
        let mut remaining: Vec<String> = Vec::new();

        for handle in handles {
            match fixtures::canned_payload(Source::Facebook, handle) {
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

        let urls: Vec<String> = remaining.iter().map(|h| Self::page_url(h)).collect();
        let posts_budget = MAX_POSTS * remaining.len() as u32;
        let (pages, posts) = tokio::join!(
            client.scrape_facebook_pages(&urls),
            client.scrape_facebook_posts(&urls, posts_budget),
        );

        let pages = match pages {
            Ok(pages) => pages,
            Err(err) => {
                warn!(count = remaining.len(), error = %err, "Facebook pages fetch failed");
                vec![]
            }
        };
        let posts = match posts {
            Ok(posts) => posts,
            Err(err) => {
                warn!(count = remaining.len(), error = %err, "Facebook posts fetch failed");
                vec![]
            }
        };

        for handle in &remaining {
            let page = pages
                .iter()
                .find(|p| item_matches(handle, p.page_name.as_deref(), p.facebook_url.as_deref()))
                .cloned();
            let page_posts: Vec<FacebookPost> = posts
                .iter()
                .filter(|p| item_matches(handle, p.page_name.as_deref(), p.facebook_url.as_deref()))
                .cloned()
                .collect();

            if page.is_some() || !page_posts.is_empty() {
                out.insert(
                    handle.clone(),
                    SourcePayload::Facebook(FacebookBundle {
                        page,
                        posts: page_posts,
                    }),
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

    #[test]
    fn item_matching_is_case_insensitive_and_url_aware() {
        assert!(item_matches("somepage", Some("SomePage"), None));
        assert!(item_matches(
            "somepage",
            None,
            Some("https://www.facebook.com/SomePage")
        ));
        assert!(!item_matches("somepage", Some("otherpage"), None));
        assert!(!item_matches("somepage", None, None));
    }

    #[tokio::test]
    async fn missing_credential_yields_configuration_missing() {
        let adapter = FacebookAdapter::new(None);
        match adapter.fetch_one("somepage").await {
            Fetched::Miss(FailureKind::ConfigurationMissing) => {}
            other => panic!("expected configuration miss, got {other:?}"),
        }
    }
}
