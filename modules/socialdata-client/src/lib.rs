pub mod error;

pub use error::{Result, SocialDataError};

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

const BASE_URL: &str = "https://api.socialdata.tools";

/// Simple profile lookups should answer fast; anything slower is treated as
/// a failed call rather than holding up the rest of the fan-out.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A Twitter user profile as returned by GET /twitter/user/{username}.
///
/// Field names follow the classic Twitter v1 schema that SocialData mirrors.
/// Everything is optional; the API has dropped and renamed fields before.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TwitterProfile {
    pub name: Option<String>,
    pub screen_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<String>,
    pub followers_count: Option<i64>,
    #[serde(alias = "friends_count")]
    pub following_count: Option<i64>,
    #[serde(alias = "statuses_count")]
    pub tweets_count: Option<i64>,
    #[serde(alias = "favourites_count")]
    pub likes_count: Option<i64>,
    #[serde(default)]
    pub verified: bool,
}

pub struct SocialDataClient {
    client: reqwest::Client,
    api_key: String,
}

impl SocialDataClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    /// Fetch a Twitter user profile by username (without the @).
    pub async fn user_profile(&self, username: &str) -> Result<TwitterProfile> {
        info!(username, "Fetching Twitter profile");

        let url = format!("{}/twitter/user/{}", BASE_URL, username);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        match status.as_u16() {
            200 => {}
            404 => return Err(SocialDataError::NotFound),
            402 => return Err(SocialDataError::InsufficientCredits),
            code => {
                let message = resp.text().await.unwrap_or_default();
                return Err(SocialDataError::Api { status: code, message });
            }
        }

        let profile: TwitterProfile = resp.json().await?;
        info!(
            username,
            followers = profile.followers_count.unwrap_or(0),
            "Fetched Twitter profile"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_accepts_v1_field_names() {
        let profile: TwitterProfile = serde_json::from_str(
            r#"{
                "name": "Elon Musk",
                "screen_name": "elonmusk",
                "description": "Mars & Cars",
                "followers_count": 166213974,
                "friends_count": 500,
                "statuses_count": 30000,
                "favourites_count": 21000,
                "verified": true
            }"#,
        )
        .unwrap();
        assert_eq!(profile.screen_name.as_deref(), Some("elonmusk"));
        assert_eq!(profile.following_count, Some(500));
        assert_eq!(profile.tweets_count, Some(30_000));
        assert_eq!(profile.likes_count, Some(21_000));
        assert!(profile.verified);
    }

    #[test]
    fn profile_tolerates_missing_fields() {
        let profile: TwitterProfile = serde_json::from_str(r#"{"screen_name":"foo"}"#).unwrap();
        assert_eq!(profile.name, None);
        assert!(!profile.verified);
    }
}
