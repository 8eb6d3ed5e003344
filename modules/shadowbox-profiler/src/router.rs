//! Classifies raw profile URLs into per-source canonical identifiers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{ProfileRef, Source};

static TWITTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?(?:twitter\.com|x\.com)/([A-Za-z0-9_]+)(?:[/?].*)?$")
        .unwrap()
});

static INSTAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?instagram\.com/([A-Za-z0-9_.]+)(?:[/?].*)?$")
        .unwrap()
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?linkedin\.com/in/([A-Za-z0-9\-%]+)(?:[/?].*)?$")
        .unwrap()
});

// Two capture alternatives: numeric profile.php ids and vanity page names.
static FACEBOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:www\.)?facebook\.com/(?:profile\.php\?id=(\d+)|([A-Za-z0-9.]+))(?:[/?].*)?$",
    )
    .unwrap()
});

/// Patterns are tried in this order; the first match wins, so classification
/// is deterministic for any input.
static PATTERNS: LazyLock<[(Source, &'static Regex); 4]> = LazyLock::new(|| {
    [
        (Source::Twitter, &*TWITTER_RE),
        (Source::Instagram, &*INSTAGRAM_RE),
        (Source::Linkedin, &*LINKEDIN_RE),
        (Source::Facebook, &*FACEBOOK_RE),
    ]
});

/// Router output: identifiers grouped per source, plus the inputs no pattern
/// recognized. Unmatched inputs are reported, never fetched.
#[derive(Debug, Clone, Default)]
pub struct RoutedInputs {
    pub by_source: BTreeMap<Source, Vec<ProfileRef>>,
    pub unmatched: Vec<String>,
}

impl RoutedInputs {
    pub fn identifiers(&self) -> Vec<ProfileRef> {
        self.by_source.values().flatten().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.values().all(|refs| refs.is_empty())
    }
}

/// Classify one raw input. Returns `None` when no pattern matches.
///
/// Handles are lowercased so that the same profile written with different
/// casing maps to the same task identity downstream.
pub fn classify(raw: &str) -> Option<ProfileRef> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }
    for (source, regex) in PATTERNS.iter() {
        if let Some(caps) = regex.captures(input) {
            // First non-empty capture group; Facebook has two alternatives.
            let handle = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .find(|s| !s.is_empty())?;
            return Some(ProfileRef {
                source: *source,
                handle: handle.to_lowercase(),
                raw_input: input.to_string(),
            });
        }
    }
    None
}

/// Route a set of raw inputs into per-source identifier groups, deduplicating
/// repeats of the same (source, handle) within the set.
pub fn route(raw_inputs: &[String]) -> RoutedInputs {
    let mut routed = RoutedInputs::default();
    for raw in raw_inputs {
        match classify(raw) {
            Some(profile_ref) => {
                let group = routed.by_source.entry(profile_ref.source).or_default();
                if !group.iter().any(|r| r.handle == profile_ref.handle) {
                    debug!(
                        source = %profile_ref.source,
                        handle = %profile_ref.handle,
                        "Routed input"
                    );
                    group.push(profile_ref);
                }
            }
            None => routed.unmatched.push(raw.trim().to_string()),
        }
    }
    routed
}
