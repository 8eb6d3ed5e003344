use std::fmt;

use apify_client::{FacebookPage, FacebookPost, InstagramProfile, LinkedinPost, LinkedinProfile};
use serde::Serialize;
use socialdata_client::TwitterProfile;

/// One supported platform. Variant order is the fixed section order for
/// corpus aggregation; `BTreeMap<Source, _>` iteration relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Twitter,
    Instagram,
    Linkedin,
    Facebook,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Twitter,
        Source::Instagram,
        Source::Linkedin,
        Source::Facebook,
    ];

    /// Display-name resolution order: profile-identity sources (real names)
    /// before feed-oriented ones.
    pub const NAME_PRIORITY: [Source; 4] = [
        Source::Linkedin,
        Source::Twitter,
        Source::Instagram,
        Source::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Twitter => "twitter",
            Source::Instagram => "instagram",
            Source::Linkedin => "linkedin",
            Source::Facebook => "facebook",
        }
    }

    /// Conventional marker for mentioning a handle on this platform, used
    /// for placeholder display names.
    pub fn mention_marker(&self) -> &'static str {
        match self {
            Source::Twitter | Source::Instagram => "@",
            Source::Linkedin | Source::Facebook => "",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical per-source identifier extracted from a raw input string.
/// Immutable once produced by the router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileRef {
    pub source: Source,
    /// Canonical handle (lowercased; numeric id for Facebook profile.php URLs).
    pub handle: String,
    /// The raw input as received, kept for diagnostics.
    pub raw_input: String,
}

impl ProfileRef {
    pub fn key(&self) -> TaskKey {
        (self.source, self.handle.clone())
    }

    /// Placeholder display name when no source yielded a human name.
    pub fn placeholder_name(&self) -> String {
        format!("{}{}", self.source.mention_marker(), self.handle)
    }
}

/// Scheduler task identity. The final result mapping is keyed by this, so
/// callers can reconstruct per-identifier outcomes regardless of completion
/// order.
pub type TaskKey = (Source, String);

/// Why a fetch produced no payload. All of these are soft: they degrade the
/// corpus, they never abort the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Identifier has no upstream record.
    NotFound,
    /// Upstream declined for billing/credit reasons.
    QuotaExhausted,
    /// Call exceeded its time bound.
    Timeout,
    /// Upstream returned an unexpected shape.
    MalformedResponse,
    /// No credential configured for this source.
    ConfigurationMissing,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::NotFound => "not_found",
            FailureKind::QuotaExhausted => "quota_exhausted",
            FailureKind::Timeout => "timeout",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::ConfigurationMissing => "configuration_missing",
        };
        f.write_str(s)
    }
}

/// Raw per-identifier data from one source. Tagged per source because the
/// shapes genuinely differ: Twitter is a profile (or a plain tweet list for
/// canned data), the others are record bundles.
#[derive(Debug, Clone)]
pub enum SourcePayload {
    Twitter(TwitterPayload),
    Instagram(InstagramProfile),
    Linkedin(LinkedinBundle),
    Facebook(FacebookBundle),
}

impl SourcePayload {
    pub fn source(&self) -> Source {
        match self {
            SourcePayload::Twitter(_) => Source::Twitter,
            SourcePayload::Instagram(_) => Source::Instagram,
            SourcePayload::Linkedin(_) => Source::Linkedin,
            SourcePayload::Facebook(_) => Source::Facebook,
        }
    }

    /// Extract a human display name, if this payload carries one.
    pub fn display_name(&self) -> Option<String> {
        match self {
            SourcePayload::Twitter(t) => t
                .profile
                .as_ref()
                .and_then(|p| p.name.clone())
                .filter(|n| !n.trim().is_empty()),
            SourcePayload::Instagram(p) => {
                p.full_name.clone().filter(|n| !n.trim().is_empty())
            }
            SourcePayload::Linkedin(b) => {
                let first = b.profile.first_name.as_deref().unwrap_or("").trim();
                let last = b.profile.last_name.as_deref().unwrap_or("").trim();
                let full = format!("{first} {last}");
                let full = full.trim();
                if full.is_empty() {
                    None
                } else {
                    Some(full.to_string())
                }
            }
            SourcePayload::Facebook(b) => b
                .page
                .as_ref()
                .and_then(|p| p.name.clone())
                .filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Twitter data: a profile lookup, or a bare tweet list for canned entries.
#[derive(Debug, Clone, Default)]
pub struct TwitterPayload {
    pub profile: Option<TwitterProfile>,
    pub tweets: Vec<TweetStub>,
}

/// A minimal tweet used by canned payloads.
#[derive(Debug, Clone)]
pub struct TweetStub {
    pub text: String,
    pub like_count: i64,
}

/// LinkedIn profile detail merged with recent posts.
#[derive(Debug, Clone, Default)]
pub struct LinkedinBundle {
    pub profile: LinkedinProfile,
    pub posts: Vec<LinkedinPost>,
}

/// Facebook page info merged with recent posts.
#[derive(Debug, Clone, Default)]
pub struct FacebookBundle {
    pub page: Option<FacebookPage>,
    pub posts: Vec<FacebookPost>,
}

/// Outcome of a single adapter call. Soft by construction: there is no error
/// variant that can cross a task boundary.
#[derive(Debug, Clone)]
pub enum Fetched {
    Hit(SourcePayload),
    Miss(FailureKind),
}

/// Terminal outcome for one (source, identifier) task. Either a payload or
/// an explicit absence with its reason; absence is never silently dropped.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub identifier: ProfileRef,
    pub payload: Option<SourcePayload>,
    pub failure: Option<FailureKind>,
}

impl SourceResult {
    pub fn hit(identifier: ProfileRef, payload: SourcePayload) -> Self {
        Self {
            identifier,
            payload: Some(payload),
            failure: None,
        }
    }

    pub fn miss(identifier: ProfileRef, kind: FailureKind) -> Self {
        Self {
            identifier,
            payload: None,
            failure: Some(kind),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.payload.is_some()
    }
}
