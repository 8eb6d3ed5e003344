//! End-to-end pipeline tests with deterministic doubles.

use std::sync::Arc;

use shadowbox_profiler::adapters::{
    AdapterSet, FacebookAdapter, InstagramAdapter, LinkedinAdapter, TwitterAdapter,
};
use shadowbox_profiler::normalizer::NO_DATA_SENTINEL;
use shadowbox_profiler::tasks::DeferredJob;
use shadowbox_profiler::testing::{
    instagram_payload, twitter_profile_payload, RecordingTasks, StaticAdapter, StaticSynthesizer,
};
use shadowbox_profiler::types::Source;
use shadowbox_profiler::{EntitySpec, PairRequest, ProfilePipeline};
use uuid::Uuid;

fn pipeline_with(
    adapters: AdapterSet,
) -> (ProfilePipeline, Arc<StaticSynthesizer>, Arc<RecordingTasks>) {
    let synthesizer = Arc::new(StaticSynthesizer::new());
    let tasks = Arc::new(RecordingTasks::new());
    let pipeline = ProfilePipeline::new(adapters, synthesizer.clone(), tasks.clone());
    (pipeline, synthesizer, tasks)
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn single_entity_aggregates_across_sources() {
    let twitter = Arc::new(
        StaticAdapter::new(Source::Twitter)
            .with_payload("alice", twitter_profile_payload("Alice Smith", "alice")),
    );
    let instagram = Arc::new(
        StaticAdapter::new(Source::Instagram)
            .with_payload("alice.gram", instagram_payload("Alice Smith", "alice.gram")),
    );
    let adapters = AdapterSet::new(
        twitter,
        instagram,
        Arc::new(StaticAdapter::new(Source::Linkedin)),
        Arc::new(StaticAdapter::new(Source::Facebook)),
    );
    let (pipeline, synthesizer, _) = pipeline_with(adapters);

    let profile = pipeline
        .build_profile(
            "subject",
            &urls(&[
                "https://twitter.com/alice",
                "https://instagram.com/alice.gram",
            ]),
        )
        .await;

    assert_eq!(profile.display_name, "Alice Smith");
    assert_eq!(
        profile.sources_fetched,
        vec![Source::Twitter, Source::Instagram]
    );
    let twitter_at = profile.corpus.find("TWITTER PROFILE:").unwrap();
    let instagram_at = profile.corpus.find("INSTAGRAM PROFILE:").unwrap();
    assert!(twitter_at < instagram_at);

    // The synthesizer saw exactly the assembled corpus.
    let requests = synthesizer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "Alice Smith");
    assert_eq!(requests[0].1, profile.corpus);
}

#[tokio::test]
async fn pair_shares_one_fetch_for_a_shared_identifier() {
    let instagram = Arc::new(
        StaticAdapter::new(Source::Instagram)
            .with_payload("zuck", instagram_payload("Mark Zuckerberg", "zuck")),
    );
    let adapters = AdapterSet::new(
        Arc::new(StaticAdapter::new(Source::Twitter)),
        instagram.clone(),
        Arc::new(StaticAdapter::new(Source::Linkedin)),
        Arc::new(StaticAdapter::new(Source::Facebook)),
    );
    let (pipeline, _, tasks) = pipeline_with(adapters);

    let session_id = Uuid::new_v4();
    let pair = pipeline
        .build_pair(PairRequest {
            session_id,
            first: EntitySpec {
                key: "fighter_a".into(),
                urls: urls(&["https://instagram.com/zuck"]),
            },
            second: EntitySpec {
                key: "fighter_b".into(),
                urls: urls(&["https://www.instagram.com/ZUCK"]),
            },
        })
        .await;

    // One batch call upstream, but both parties got the payload.
    assert_eq!(instagram.batch_count(), 1);
    assert!(pair.first.corpus.contains("INSTAGRAM PROFILE:"));
    assert!(pair.second.corpus.contains("INSTAGRAM PROFILE:"));
    assert_eq!(pair.first.display_name, "Mark Zuckerberg");
    assert_eq!(pair.second.display_name, "Mark Zuckerberg");

    // Exactly one backdrop job, keyed by the session.
    let jobs = tasks.jobs();
    assert_eq!(jobs.len(), 1);
    let DeferredJob::BackdropRender { session_id: job_session, .. } = &jobs[0];
    assert_eq!(*job_session, session_id);
}

#[tokio::test]
async fn one_failing_party_does_not_poison_the_other() {
    let twitter = Arc::new(
        StaticAdapter::new(Source::Twitter)
            .with_payload("alice", twitter_profile_payload("Alice Smith", "alice")),
    );
    let adapters = AdapterSet::new(
        twitter,
        Arc::new(StaticAdapter::new(Source::Instagram)),
        Arc::new(StaticAdapter::new(Source::Linkedin)),
        Arc::new(StaticAdapter::new(Source::Facebook)),
    );
    let (pipeline, _, _) = pipeline_with(adapters);

    let pair = pipeline
        .build_pair(PairRequest {
            session_id: Uuid::new_v4(),
            first: EntitySpec {
                key: "winner".into(),
                urls: urls(&["https://twitter.com/alice"]),
            },
            second: EntitySpec {
                key: "ghost".into(),
                urls: urls(&["https://twitter.com/nobody_here"]),
            },
        })
        .await;

    assert!(pair.first.corpus.contains("TWITTER PROFILE:"));
    assert_eq!(pair.first.display_name, "Alice Smith");

    // The failing party degrades to the sentinel corpus, the placeholder
    // name, and a complete fallback persona.
    assert_eq!(pair.second.corpus, NO_DATA_SENTINEL);
    assert!(pair.second.sources_fetched.is_empty());
    assert_eq!(pair.second.display_name, "@nobody_here");
    assert_eq!(pair.second.persona.name, "@nobody_here");
    assert!(!pair.second.persona.attack_facts.is_empty());
}

#[tokio::test]
async fn partial_source_failure_keeps_the_surviving_sections() {
    let twitter = Arc::new(
        StaticAdapter::new(Source::Twitter)
            .with_payload("alice", twitter_profile_payload("Alice Smith", "alice")),
    );
    // Instagram configured but yields nothing for this handle.
    let adapters = AdapterSet::new(
        twitter,
        Arc::new(StaticAdapter::new(Source::Instagram)),
        Arc::new(StaticAdapter::new(Source::Linkedin).unready()),
        Arc::new(StaticAdapter::new(Source::Facebook)),
    );
    let (pipeline, _, _) = pipeline_with(adapters);

    let profile = pipeline
        .build_profile(
            "subject",
            &urls(&[
                "https://twitter.com/alice",
                "https://instagram.com/missing",
                "https://linkedin.com/in/no-credential",
            ]),
        )
        .await;

    assert_eq!(profile.sources_fetched, vec![Source::Twitter]);
    assert!(profile.corpus.contains("TWITTER PROFILE:"));
    assert!(!profile.corpus.contains("INSTAGRAM"));
    assert!(!profile.corpus.contains("LINKEDIN"));
    assert_ne!(profile.corpus, NO_DATA_SENTINEL);
}

#[tokio::test]
async fn unroutable_inputs_produce_a_sentinel_profile() {
    let adapters = AdapterSet::new(
        Arc::new(StaticAdapter::new(Source::Twitter)),
        Arc::new(StaticAdapter::new(Source::Instagram)),
        Arc::new(StaticAdapter::new(Source::Linkedin)),
        Arc::new(StaticAdapter::new(Source::Facebook)),
    );
    let (pipeline, _, _) = pipeline_with(adapters);

    let profile = pipeline
        .build_profile("subject", &urls(&["https://myspace.com/tom", "nonsense"]))
        .await;

    assert_eq!(profile.corpus, NO_DATA_SENTINEL);
    assert_eq!(profile.display_name, "Digital Twin");
}

#[tokio::test]
async fn canned_handles_work_without_any_credentials() {
    // Production adapters, no clients configured anywhere.
    let adapters = AdapterSet::new(
        Arc::new(TwitterAdapter::new(None)),
        Arc::new(InstagramAdapter::new(None)),
        Arc::new(LinkedinAdapter::new(None)),
        Arc::new(FacebookAdapter::new(None)),
    );
    let (pipeline, _, _) = pipeline_with(adapters);

    let profile = pipeline
        .build_profile("subject", &urls(&["https://x.com/elonmusk"]))
        .await;

    assert!(profile.corpus.contains("TWITTER POSTS:"));
    assert!(profile.corpus.contains("Dogecoin to the moon!"));
    assert_eq!(profile.display_name, "@elonmusk");
}
