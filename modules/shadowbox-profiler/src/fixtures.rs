//! Canned payloads for a few well-known handles.
//!
//! Adapters consult these before touching the network, so demos and local
//! runs work without credentials and without burning scraper credits.

use apify_client::{InstagramPost, InstagramProfile};

use crate::types::{Source, SourcePayload, TweetStub, TwitterPayload};

/// Return a canned payload for `(source, handle)`, if one exists.
/// Handles are matched case-insensitively.
pub fn canned_payload(source: Source, handle: &str) -> Option<SourcePayload> {
    match (source, handle.to_lowercase().as_str()) {
        (Source::Twitter, "elonmusk") => Some(SourcePayload::Twitter(TwitterPayload {
            profile: None,
            tweets: tweets(&[
                ("The algorithm is the problem. We're fixing it.", 50_000),
                (
                    "Mars is looking good. Starship test soon. Humanity must become multiplanetary.",
                    180_000,
                ),
                (
                    "Population collapse is the real crisis. Nobody talks about it.",
                    130_000,
                ),
                (
                    "The woke mind virus must be stopped or nothing else matters",
                    245_000,
                ),
                ("Dogecoin to the moon! 🚀 The people's crypto", 500_000),
                (
                    "Tesla FSD is improving exponentially. Soon will be 10x safer than human drivers",
                    95_000,
                ),
                (
                    "I didn't buy Twitter to make money. I did it to help humanity.",
                    320_000,
                ),
                (
                    "Sleep is overrated. I work 120 hours a week. That's what it takes.",
                    88_000,
                ),
                (
                    "My ex won't let me see the kids as much as I want. Very sad.",
                    150_000,
                ),
                (
                    "AI will be smarter than any human by 2025. We need to be careful.",
                    200_000,
                ),
                (
                    "Just had an amazing conversation with my son X Æ A-12. He's so smart.",
                    175_000,
                ),
                (
                    "Mainstream media is dying. Citizen journalism is the future.",
                    110_000,
                ),
                ("I'm not saying aliens exist, but... 👽", 400_000),
                ("Gonna put a Cybertruck on Mars. Why not?", 250_000),
                (
                    "My companies have created more jobs than any politician. Facts.",
                    95_000,
                ),
            ]),
        })),
        (Source::Twitter, "finkd") => Some(SourcePayload::Twitter(TwitterPayload {
            profile: None,
            tweets: tweets(&[
                (
                    "Just finished a great sparring session. Got submitted twice but learned a lot. 🥋",
                    250_000,
                ),
                (
                    "Meta AI is going to change everything. We're building the future of human connection.",
                    180_000,
                ),
                (
                    "Smoking some Sweet Baby Ray's brisket this weekend. The secret is low and slow. 🍖",
                    320_000,
                ),
                (
                    "The Metaverse isn't a fad. It's the next chapter of the internet. Believe.",
                    95_000,
                ),
                (
                    "Training for my next MMA fight. Cardio is brutal but worth it. No excuses.",
                    145_000,
                ),
                (
                    "Privacy is important. That's why we're investing billions in encryption.",
                    88_000,
                ),
                (
                    "Threads just hit 200M users. Grateful for the support. LFG 🚀",
                    400_000,
                ),
                (
                    "Congress doesn't understand technology. But we're trying to educate them.",
                    220_000,
                ),
                (
                    "Just sparred with a professional UFC fighter. Survived 3 rounds. Small wins.",
                    350_000,
                ),
                (
                    "Priscilla and I celebrating 10 years. She makes me a better person every day. ❤️",
                    500_000,
                ),
                (
                    "VR is the future of work. Imagine meetings in the Metaverse instead of Zoom.",
                    120_000,
                ),
                (
                    "Kids asked why I wear the same gray t-shirt every day. Less decisions = more focus.",
                    280_000,
                ),
                (
                    "Surfing in Hawaii with the hydrofoil. Fell about 50 times before getting it right. 🏄",
                    195_000,
                ),
                (
                    "Just finished reading 25 books this year. Knowledge is power. 📚",
                    110_000,
                ),
                (
                    "Building AI that works for everyone. Not just the privileged few.",
                    175_000,
                ),
            ]),
        })),
        (Source::Instagram, "zuck") => Some(SourcePayload::Instagram(InstagramProfile {
            username: Some("zuck".to_string()),
            full_name: Some("Mark Zuckerberg".to_string()),
            biography: Some("Building the future. Smoking meats. Jiu Jitsu.".to_string()),
            followers_count: Some(14_000_000),
            edge_followed_by: None,
            posts: Some(vec![
                caption("Great session training with the team today. The journey continues. 🥋"),
                caption(
                    "New Meta AI features dropping soon. Excited to share what we've been building.",
                ),
                caption(
                    "Family time is the best time. Grateful for every moment with Priscilla and the kids.",
                ),
            ]),
        })),
        _ => None,
    }
}

fn tweets(entries: &[(&str, i64)]) -> Vec<TweetStub> {
    entries
        .iter()
        .map(|(text, like_count)| TweetStub {
            text: (*text).to_string(),
            like_count: *like_count,
        })
        .collect()
}

fn caption(text: &str) -> InstagramPost {
    InstagramPost {
        caption: Some(text.to_string()),
        edge_media_to_caption: None,
    }
}
