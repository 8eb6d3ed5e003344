pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    FacebookPage, FacebookPagesInput, FacebookPost, FacebookPostsInput, InstagramPost,
    InstagramProfile, InstagramScraperInput, LinkedinCertification, LinkedinDetailInput,
    LinkedinEducation, LinkedinPost, LinkedinPostsInput, LinkedinPosition, LinkedinProfile,
    RunData, StartUrl,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/instagram-profile-scraper. Supports multiple usernames
/// per run, no browser, fast.
const INSTAGRAM_PROFILE_SCRAPER: &str = "apify~instagram-profile-scraper";

/// Actor ID for apimaestro/linkedin-profile-detail. One profile per run, no
/// cookies required.
const LINKEDIN_PROFILE_DETAIL: &str = "apimaestro~linkedin-profile-detail";

/// Actor ID for apimaestro/linkedin-profile-posts.
const LINKEDIN_PROFILE_POSTS: &str = "apimaestro~linkedin-profile-posts";

/// Actor ID for apify/facebook-pages-scraper.
const FACEBOOK_PAGES_SCRAPER: &str = "apify~facebook-pages-scraper";

/// Actor ID for apify/facebook-posts-scraper.
const FACEBOOK_POSTS_SCRAPER: &str = "apify~facebook-posts-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Start an actor run. Returns immediately with run metadata.
    async fn start_run<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", BASE_URL, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", BASE_URL, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", BASE_URL, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Run an actor end-to-end: start, poll to completion, fetch dataset items.
    async fn run_and_collect<I: Serialize, T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<Vec<T>> {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(actor_id, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Scrape Instagram profiles. One actor call regardless of how many
    /// usernames are requested; each dataset item echoes its username.
    pub async fn scrape_instagram_profiles(
        &self,
        usernames: &[String],
        limit: u32,
    ) -> Result<Vec<InstagramProfile>> {
        tracing::info!(count = usernames.len(), limit, "Starting Instagram profile scrape");

        let input = InstagramScraperInput {
            usernames: usernames.to_vec(),
            results_limit: limit,
        };

        let profiles: Vec<InstagramProfile> = self
            .run_and_collect(INSTAGRAM_PROFILE_SCRAPER, &input)
            .await?;
        tracing::info!(count = profiles.len(), "Fetched Instagram profiles");

        Ok(profiles)
    }

    /// Scrape one LinkedIn profile's detail record (experience, education,
    /// certifications). Returns None when the actor finds no profile.
    pub async fn scrape_linkedin_profile(&self, username: &str) -> Result<Option<LinkedinProfile>> {
        tracing::info!(username, "Starting LinkedIn profile detail scrape");

        let input = LinkedinDetailInput {
            username: username.to_string(),
            include_email: false,
        };

        let mut items: Vec<LinkedinProfile> =
            self.run_and_collect(LINKEDIN_PROFILE_DETAIL, &input).await?;
        Ok(if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        })
    }

    /// Scrape recent posts for one LinkedIn profile.
    pub async fn scrape_linkedin_posts(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<LinkedinPost>> {
        tracing::info!(username, limit, "Starting LinkedIn posts scrape");

        let input = LinkedinPostsInput {
            username: username.to_string(),
            limit,
        };

        let posts: Vec<LinkedinPost> =
            self.run_and_collect(LINKEDIN_PROFILE_POSTS, &input).await?;
        tracing::info!(username, count = posts.len(), "Fetched LinkedIn posts");

        Ok(posts)
    }

    /// Scrape page info for Facebook pages. One actor call for all URLs;
    /// each dataset item carries its page name and URL for demultiplexing.
    pub async fn scrape_facebook_pages(&self, page_urls: &[String]) -> Result<Vec<FacebookPage>> {
        tracing::info!(count = page_urls.len(), "Starting Facebook pages scrape");

        let input = FacebookPagesInput {
            start_urls: page_urls
                .iter()
                .map(|url| StartUrl { url: url.clone() })
                .collect(),
        };

        let pages: Vec<FacebookPage> =
            self.run_and_collect(FACEBOOK_PAGES_SCRAPER, &input).await?;
        tracing::info!(count = pages.len(), "Fetched Facebook pages");

        Ok(pages)
    }

    /// Scrape recent posts for Facebook pages. One actor call for all URLs.
    pub async fn scrape_facebook_posts(
        &self,
        page_urls: &[String],
        limit: u32,
    ) -> Result<Vec<FacebookPost>> {
        tracing::info!(count = page_urls.len(), limit, "Starting Facebook posts scrape");

        let input = FacebookPostsInput {
            start_urls: page_urls
                .iter()
                .map(|url| StartUrl { url: url.clone() })
                .collect(),
            results_limit: limit,
        };

        let posts: Vec<FacebookPost> =
            self.run_and_collect(FACEBOOK_POSTS_SCRAPER, &input).await?;
        tracing::info!(count = posts.len(), "Fetched Facebook posts");

        Ok(posts)
    }
}
