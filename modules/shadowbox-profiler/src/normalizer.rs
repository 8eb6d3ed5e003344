//! Renders raw source payloads into plain-text sections and joins them into
//! the corpus handed to persona synthesis.
//!
//! A payload that renders to nothing is treated exactly like one that never
//! arrived: the section is omitted. A corpus with zero sections collapses to
//! a single sentinel line so the synthesizer sees an explicit "no data"
//! signal instead of an empty string.

use std::collections::BTreeMap;

use apify_client::{FacebookPost, InstagramProfile, LinkedinPost};

use crate::types::{FacebookBundle, LinkedinBundle, Source, SourcePayload, TwitterPayload};

pub const SECTION_DELIMITER: &str = "\n\n========================================\n\n";
pub const NO_DATA_SENTINEL: &str = "No social media data available for this person.";

/// Per-source render caps. Counts bound list items, chars bound free text
/// after whitespace normalization.
const MAX_TWEETS: usize = 15;
const MAX_IG_CAPTIONS: usize = 10;
const IG_CAPTION_CHARS: usize = 500;
const LI_ABOUT_CHARS: usize = 1000;
const MAX_LI_POSITIONS: usize = 5;
const LI_POSITION_CHARS: usize = 200;
const MAX_LI_EDUCATIONS: usize = 3;
const MAX_LI_CERTIFICATIONS: usize = 5;
const MAX_LI_POSTS: usize = 3;
const LI_POST_CHARS: usize = 300;
const FB_ABOUT_CHARS: usize = 500;
const MAX_FB_POSTS: usize = 10;
const FB_POST_CHARS: usize = 500;

/// Render one payload into its section, or `None` when there is nothing
/// worth rendering.
pub fn normalize(payload: &SourcePayload) -> Option<String> {
    match payload {
        SourcePayload::Twitter(t) => normalize_twitter(t),
        SourcePayload::Instagram(p) => normalize_instagram(p),
        SourcePayload::Linkedin(b) => normalize_linkedin(b),
        SourcePayload::Facebook(b) => normalize_facebook(b),
    }
}

/// Build the full corpus from the first payload per source, in fixed section
/// order. Zero sections yields the sentinel.
pub fn corpus(payloads: &BTreeMap<Source, &SourcePayload>) -> String {
    let sections: Vec<String> = payloads.values().filter_map(|p| normalize(p)).collect();
    if sections.is_empty() {
        return NO_DATA_SENTINEL.to_string();
    }
    sections.join(SECTION_DELIMITER)
}

fn normalize_twitter(payload: &TwitterPayload) -> Option<String> {
    if let Some(profile) = &payload.profile {
        let mut parts = Vec::new();

        let name = profile.name.as_deref().unwrap_or("Unknown");
        let handle = profile.screen_name.as_deref().unwrap_or("unknown");
        let bio = profile.description.as_deref().unwrap_or("No bio.");
        parts.push(format!("Name: {name} (@{handle})"));
        parts.push(format!("Bio: {bio}"));
        if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
            parts.push(format!("Location: {location}"));
        }
        if let Some(created_at) = profile.created_at.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("Account Created: {created_at}"));
        }

        parts.push(format!(
            "Stats: {} Followers, {} Following, {} Tweets, {} Likes",
            group_digits(profile.followers_count.unwrap_or(0)),
            group_digits(profile.following_count.unwrap_or(0)),
            group_digits(profile.tweets_count.unwrap_or(0)),
            group_digits(profile.likes_count.unwrap_or(0)),
        ));
        if profile.verified {
            parts.push("Status: Verified Account".to_string());
        }

        return Some(format!("TWITTER PROFILE:\n{}", parts.join("\n")));
    }

    let tweets: Vec<String> = payload
        .tweets
        .iter()
        .take(MAX_TWEETS)
        .filter(|t| !t.text.is_empty())
        .map(|t| format!("Tweet: {}", t.text))
        .collect();
    if tweets.is_empty() {
        return None;
    }
    Some(format!("TWITTER POSTS:\n{}", tweets.join("\n---\n")))
}

fn normalize_instagram(profile: &InstagramProfile) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(name) = profile.full_name.as_deref().filter(|n| !n.is_empty()) {
        parts.push(format!("Name: {name}"));
    }
    if let Some(bio) = profile.biography.as_deref().filter(|b| !b.is_empty()) {
        parts.push(format!("Bio: {bio}"));
    }
    if let Some(followers) = profile.followers().filter(|f| *f > 0) {
        parts.push(format!("Followers: {}", group_digits(followers)));
    }

    if let Some(posts) = &profile.posts {
        let captions: Vec<String> = posts
            .iter()
            .take(MAX_IG_CAPTIONS)
            .filter_map(|p| p.caption_text())
            .filter(|c| !c.is_empty())
            .map(|c| clamp(c, IG_CAPTION_CHARS))
            .collect();
        if !captions.is_empty() {
            parts.push(format!("RECENT CAPTIONS:\n{}", captions.join("\n---\n")));
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("INSTAGRAM PROFILE:\n{}", parts.join("\n")))
}

fn normalize_linkedin(bundle: &LinkedinBundle) -> Option<String> {
    let profile = &bundle.profile;
    let mut parts = Vec::new();

    let first = profile.first_name.as_deref().unwrap_or("");
    let last = profile.last_name.as_deref().unwrap_or("");
    let name = format!("{first} {last}");
    let name = name.trim();
    if !name.is_empty() {
        parts.push(format!("Name: {name}"));
    }
    if let Some(headline) = profile.headline.as_deref().filter(|h| !h.is_empty()) {
        parts.push(format!("Headline: {headline}"));
    }
    if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
        parts.push(format!("Location: {location}"));
    }
    if let Some(summary) = profile.summary.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("About: {}", clamp(summary, LI_ABOUT_CHARS)));
    }

    if let Some(positions) = &profile.positions {
        let entries: Vec<String> = positions
            .iter()
            .take(MAX_LI_POSITIONS)
            .filter_map(|pos| {
                let title = pos.title.as_deref().unwrap_or("");
                let company = pos.company.as_deref().unwrap_or("");
                if title.is_empty() && company.is_empty() {
                    return None;
                }
                let mut entry = format!("- {title} at {company}");
                if let Some(desc) = pos.description.as_deref().filter(|d| !d.is_empty()) {
                    entry.push_str(&format!(": {}", clamp(desc, LI_POSITION_CHARS)));
                }
                Some(entry)
            })
            .collect();
        if !entries.is_empty() {
            parts.push(format!("EXPERIENCE:\n{}", entries.join("\n")));
        }
    }

    if let Some(educations) = &profile.educations {
        let entries: Vec<String> = educations
            .iter()
            .take(MAX_LI_EDUCATIONS)
            .filter_map(|edu| {
                let school = edu.school.as_deref().filter(|s| !s.is_empty())?;
                match edu.degree.as_deref().filter(|d| !d.is_empty()) {
                    Some(degree) => {
                        let field = edu.field_of_study.as_deref().unwrap_or("");
                        Some(format!("- {degree} in {field} from {school}"))
                    }
                    None => Some(format!("- Studied at {school}")),
                }
            })
            .collect();
        if !entries.is_empty() {
            parts.push(format!("EDUCATION:\n{}", entries.join("\n")));
        }
    }

    if let Some(certs) = &profile.certifications {
        let names: Vec<&str> = certs
            .iter()
            .take(MAX_LI_CERTIFICATIONS)
            .filter_map(|c| c.name.as_deref())
            .filter(|n| !n.is_empty())
            .collect();
        if !names.is_empty() {
            parts.push(format!("CERTIFICATIONS: {}", names.join(", ")));
        }
    }

    let posts: Vec<String> = bundle
        .posts
        .iter()
        .take(MAX_LI_POSTS)
        .filter_map(render_linkedin_post)
        .collect();
    if !posts.is_empty() {
        parts.push(format!("RECENT POSTS:\n{}", posts.join("\n")));
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("LINKEDIN PROFILE:\n{}", parts.join("\n")))
}

fn render_linkedin_post(post: &LinkedinPost) -> Option<String> {
    let text = post.text.as_deref().filter(|t| !t.is_empty())?;
    let cleaned = squash_whitespace(text);
    let truncated = cleaned.chars().count() > LI_POST_CHARS;
    let mut body: String = cleaned.chars().take(LI_POST_CHARS).collect();
    if truncated {
        body.push_str("...");
    }
    Some(format!(
        "- \"{body}\" ({} likes, {} comments)",
        post.likes.unwrap_or(0),
        post.comments.unwrap_or(0),
    ))
}

fn normalize_facebook(bundle: &FacebookBundle) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(page) = &bundle.page {
        if let Some(name) = page.name.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!("Name: {name}"));
        }
        if let Some(category) = page.category.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("Category: {category}"));
        }
        if let Some(about) = page.about.as_deref().filter(|a| !a.is_empty()) {
            parts.push(format!("About: {}", clamp(about, FB_ABOUT_CHARS)));
        }
        let likes = page.likes.unwrap_or(0);
        let followers = page.followers.unwrap_or(0);
        if likes > 0 || followers > 0 {
            parts.push(format!(
                "Engagement: {} Likes, {} Followers",
                group_digits(likes),
                group_digits(followers),
            ));
        }
        if let Some(website) = page.website.as_deref().filter(|w| !w.is_empty()) {
            parts.push(format!("Website: {website}"));
        }
    }

    let posts: Vec<String> = bundle
        .posts
        .iter()
        .take(MAX_FB_POSTS)
        .filter_map(render_facebook_post)
        .collect();
    if !posts.is_empty() {
        parts.push(format!("RECENT POSTS:\n{}", posts.join("\n---\n")));
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("FACEBOOK PROFILE:\n{}", parts.join("\n")))
}

fn render_facebook_post(post: &FacebookPost) -> Option<String> {
    let text = post.text.as_deref().filter(|t| !t.is_empty())?;
    Some(format!(
        "Post: {} ({} likes, {} shares, {} comments)",
        clamp(text, FB_POST_CHARS),
        post.likes.unwrap_or(0),
        post.shares.unwrap_or(0),
        post.comments.unwrap_or(0),
    ))
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalize then cut at a character budget. Char-based so a cut
/// never lands inside a multi-byte sequence.
fn clamp(text: &str, max_chars: usize) -> String {
    squash_whitespace(text).chars().take(max_chars).collect()
}

fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use socialdata_client::TwitterProfile;

    use super::*;
    use crate::types::TweetStub;

    #[test]
    fn twitter_profile_section_layout() {
        let payload = TwitterPayload {
            profile: Some(TwitterProfile {
                name: Some("Elon Musk".into()),
                screen_name: Some("elonmusk".into()),
                description: Some("Mars & Cars".into()),
                location: Some("Austin".into()),
                followers_count: Some(166_213_974),
                following_count: Some(500),
                tweets_count: Some(30_000),
                likes_count: Some(21_000),
                verified: true,
                ..Default::default()
            }),
            tweets: vec![],
        };

        let section = normalize_twitter(&payload).unwrap();
        assert!(section.starts_with("TWITTER PROFILE:\n"));
        assert!(section.contains("Name: Elon Musk (@elonmusk)"));
        assert!(section.contains("Bio: Mars & Cars"));
        assert!(section.contains(
            "Stats: 166,213,974 Followers, 500 Following, 30,000 Tweets, 21,000 Likes"
        ));
        assert!(section.contains("Status: Verified Account"));
    }

    #[test]
    fn twitter_tweet_list_renders_posts_section() {
        let payload = TwitterPayload {
            profile: None,
            tweets: vec![
                TweetStub {
                    text: "first".into(),
                    like_count: 1,
                },
                TweetStub {
                    text: "second".into(),
                    like_count: 2,
                },
            ],
        };
        let section = normalize_twitter(&payload).unwrap();
        assert_eq!(section, "TWITTER POSTS:\nTweet: first\n---\nTweet: second");
    }

    #[test]
    fn empty_payloads_render_no_section() {
        assert_eq!(normalize_twitter(&TwitterPayload::default()), None);
        assert_eq!(normalize_instagram(&InstagramProfile::default()), None);
        assert_eq!(normalize_linkedin(&LinkedinBundle::default()), None);
        assert_eq!(normalize_facebook(&FacebookBundle::default()), None);
    }

    #[test]
    fn corpus_with_no_sections_is_the_sentinel() {
        let payloads = BTreeMap::new();
        assert_eq!(corpus(&payloads), NO_DATA_SENTINEL);
    }

    #[test]
    fn corpus_joins_sections_in_fixed_order() {
        let twitter = SourcePayload::Twitter(TwitterPayload {
            profile: None,
            tweets: vec![TweetStub {
                text: "hi".into(),
                like_count: 0,
            }],
        });
        let instagram = SourcePayload::Instagram(InstagramProfile {
            full_name: Some("Mark Zuckerberg".into()),
            ..Default::default()
        });

        // Insert out of order; section order comes from the map key.
        let mut payloads = BTreeMap::new();
        payloads.insert(Source::Instagram, &instagram);
        payloads.insert(Source::Twitter, &twitter);

        let text = corpus(&payloads);
        let twitter_at = text.find("TWITTER POSTS:").unwrap();
        let instagram_at = text.find("INSTAGRAM PROFILE:").unwrap();
        assert!(twitter_at < instagram_at);
        assert!(text.contains(SECTION_DELIMITER));

        // Same inputs, same corpus.
        assert_eq!(text, corpus(&payloads));
    }

    #[test]
    fn clamp_normalizes_whitespace_before_cutting() {
        let messy = "a  b\n\nc\td   ";
        assert_eq!(clamp(messy, 100), "a b c d");
        assert_eq!(clamp(messy, 3), "a b");
    }

    #[test]
    fn clamp_counts_chars_not_bytes() {
        let emoji = "🥋🥋🥋🥋";
        assert_eq!(clamp(emoji, 2), "🥋🥋");
    }

    #[test]
    fn linkedin_post_gets_ellipsis_only_when_cut() {
        let short = LinkedinPost {
            text: Some("short post".into()),
            likes: Some(5),
            comments: Some(1),
        };
        assert_eq!(
            render_linkedin_post(&short).unwrap(),
            "- \"short post\" (5 likes, 1 comments)"
        );

        let long = LinkedinPost {
            text: Some("x".repeat(400)),
            likes: None,
            comments: None,
        };
        let rendered = render_linkedin_post(&long).unwrap();
        assert!(rendered.contains("..."));
        assert!(rendered.ends_with("(0 likes, 0 comments)"));
    }

    #[test]
    fn grouping_inserts_thousands_separators() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(14_000_000), "14,000,000");
    }
}
