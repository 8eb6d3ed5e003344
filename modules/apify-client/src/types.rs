use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Output types use `alias` ladders instead of strict renames: the actors have
// shipped several schema revisions and old field names still appear in the
// wild. Absent fields deserialize to None.

// --- Instagram profile scraper ---

/// Input for the apify/instagram-profile-scraper actor. Accepts multiple
/// usernames in one run, which is what makes batched fetches a single call.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramScraperInput {
    pub usernames: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// One Instagram profile from the actor dataset, with recent posts inlined.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstagramProfile {
    pub username: Option<String>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    pub biography: Option<String>,
    #[serde(alias = "followersCount")]
    pub followers_count: Option<i64>,
    /// Legacy GraphQL shape for the follower count.
    #[serde(alias = "edge_followed_by")]
    pub edge_followed_by: Option<EdgeCount>,
    #[serde(alias = "latestPosts")]
    pub posts: Option<Vec<InstagramPost>>,
}

impl InstagramProfile {
    /// Follower count from whichever schema revision the actor returned.
    pub fn followers(&self) -> Option<i64> {
        self.followers_count
            .or_else(|| self.edge_followed_by.as_ref().map(|e| e.count))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeCount {
    pub count: i64,
}

/// A post attached to an Instagram profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstagramPost {
    pub caption: Option<String>,
    /// Legacy GraphQL caption shape.
    #[serde(alias = "edge_media_to_caption")]
    pub edge_media_to_caption: Option<EdgeCaptions>,
}

impl InstagramPost {
    /// Caption text, preferring the flat field over the legacy edge shape.
    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_deref().or_else(|| {
            self.edge_media_to_caption
                .as_ref()?
                .edges
                .first()?
                .node
                .text
                .as_deref()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeCaptions {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionNode {
    pub text: Option<String>,
}

// --- LinkedIn profile detail + posts ---

/// Input for the apimaestro/linkedin-profile-detail actor. One username per
/// run; the actor has no multi-subject mode.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedinDetailInput {
    pub username: String,
    #[serde(rename = "includeEmail")]
    pub include_email: bool,
}

/// Input for the apimaestro/linkedin-profile-posts actor.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedinPostsInput {
    pub username: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedinProfile {
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub headline: Option<String>,
    #[serde(alias = "about")]
    pub summary: Option<String>,
    #[serde(alias = "locationName", alias = "geoLocationName")]
    pub location: Option<String>,
    #[serde(alias = "experience", alias = "workExperience")]
    pub positions: Option<Vec<LinkedinPosition>>,
    #[serde(alias = "education")]
    pub educations: Option<Vec<LinkedinEducation>>,
    pub certifications: Option<Vec<LinkedinCertification>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedinPosition {
    pub title: Option<String>,
    #[serde(alias = "companyName", alias = "organizationName")]
    pub company: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedinEducation {
    #[serde(alias = "schoolName")]
    pub school: Option<String>,
    #[serde(alias = "degreeName")]
    pub degree: Option<String>,
    #[serde(alias = "fieldOfStudy")]
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinCertification {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedinPost {
    #[serde(alias = "commentary", alias = "textContent")]
    pub text: Option<String>,
    #[serde(alias = "numLikes", alias = "likesCount")]
    pub likes: Option<i64>,
    #[serde(alias = "numComments", alias = "commentsCount")]
    pub comments: Option<i64>,
}

// --- Facebook pages + posts scrapers ---

/// Input for the apify/facebook-pages-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookPagesInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
}

/// Input for the apify/facebook-posts-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookPostsInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A start URL entry for Facebook scraper inputs.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Page-level info (name, about, engagement) from the pages scraper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacebookPage {
    #[serde(alias = "title")]
    pub name: Option<String>,
    #[serde(alias = "description")]
    pub about: Option<String>,
    #[serde(alias = "likesCount")]
    pub likes: Option<i64>,
    #[serde(alias = "followersCount")]
    pub followers: Option<i64>,
    pub website: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "pageName")]
    pub page_name: Option<String>,
    #[serde(alias = "facebookUrl")]
    pub facebook_url: Option<String>,
}

/// A single post from the posts scraper, with engagement counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacebookPost {
    #[serde(alias = "message", alias = "postText")]
    pub text: Option<String>,
    #[serde(alias = "likesCount")]
    pub likes: Option<i64>,
    #[serde(alias = "sharesCount")]
    pub shares: Option<i64>,
    #[serde(alias = "commentsCount")]
    pub comments: Option<i64>,
    #[serde(alias = "pageName")]
    pub page_name: Option<String>,
    #[serde(alias = "facebookUrl")]
    pub facebook_url: Option<String>,
}

// --- Run plumbing ---

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instagram_profile_accepts_both_follower_shapes() {
        let flat: InstagramProfile =
            serde_json::from_str(r#"{"username":"zuck","followersCount":14000000}"#).unwrap();
        assert_eq!(flat.followers(), Some(14_000_000));

        let legacy: InstagramProfile =
            serde_json::from_str(r#"{"username":"zuck","edge_followed_by":{"count":99}}"#).unwrap();
        assert_eq!(legacy.followers(), Some(99));
    }

    #[test]
    fn instagram_caption_prefers_flat_field() {
        let legacy: InstagramPost = serde_json::from_str(
            r#"{"edge_media_to_caption":{"edges":[{"node":{"text":"legacy caption"}}]}}"#,
        )
        .unwrap();
        assert_eq!(legacy.caption_text(), Some("legacy caption"));

        let flat: InstagramPost = serde_json::from_str(r#"{"caption":"new caption"}"#).unwrap();
        assert_eq!(flat.caption_text(), Some("new caption"));
    }

    #[test]
    fn linkedin_profile_accepts_renamed_fields() {
        let profile: LinkedinProfile = serde_json::from_str(
            r#"{
                "firstName": "Jane",
                "lastName": "Doe",
                "about": "Engineer and speaker.",
                "geoLocationName": "Berlin",
                "workExperience": [{"title": "CTO", "organizationName": "Acme"}]
            }"#,
        )
        .unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Jane"));
        assert_eq!(profile.summary.as_deref(), Some("Engineer and speaker."));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
        let positions = profile.positions.unwrap();
        assert_eq!(positions[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn facebook_post_accepts_message_variant() {
        let post: FacebookPost =
            serde_json::from_str(r#"{"message":"hello","likesCount":10}"#).unwrap();
        assert_eq!(post.text.as_deref(), Some("hello"));
        assert_eq!(post.likes, Some(10));
    }
}
