//! End-to-end orchestration: route, schedule, split, normalize, synthesize.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapters::AdapterSet;
use crate::normalizer;
use crate::router::{self, RoutedInputs};
use crate::scheduler;
use crate::splitter::{self, EntitySlice, Ownership};
use crate::synthesizer::Synthesizer;
use crate::tasks::{DeferredJob, DeferredTasks};
use crate::types::{ProfileRef, Source};
use shadowbox_common::Persona;

/// One party to profile: an opaque key plus their raw profile URLs.
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub key: String,
    pub urls: Vec<String>,
}

/// A pair of parties profiled together for one session.
#[derive(Debug, Clone)]
pub struct PairRequest {
    pub session_id: Uuid,
    pub first: EntitySpec,
    pub second: EntitySpec,
}

/// Everything the pipeline produced for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityProfile {
    pub entity_key: String,
    pub display_name: String,
    /// Aggregated plain-text corpus the persona was synthesized from.
    pub corpus: String,
    /// Sources that actually yielded data, in section order.
    pub sources_fetched: Vec<Source>,
    pub persona: Persona,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairProfiles {
    pub session_id: Uuid,
    pub first: EntityProfile,
    pub second: EntityProfile,
}

/// The aggregation pipeline. Holds one adapter per source, a synthesizer,
/// and a sink for deferred jobs; all shared, all built once.
pub struct ProfilePipeline {
    adapters: AdapterSet,
    synthesizer: Arc<dyn Synthesizer>,
    tasks: Arc<dyn DeferredTasks>,
}

impl ProfilePipeline {
    pub fn new(
        adapters: AdapterSet,
        synthesizer: Arc<dyn Synthesizer>,
        tasks: Arc<dyn DeferredTasks>,
    ) -> Self {
        Self {
            adapters,
            synthesizer,
            tasks,
        }
    }

    /// Profile a single entity from its raw URLs. Always returns a profile;
    /// with no usable data the corpus is the sentinel and the persona is the
    /// generic fallback.
    pub async fn build_profile(&self, entity_key: &str, urls: &[String]) -> EntityProfile {
        let routed = route_entity(entity_key, urls);

        let mut ownership = Ownership::new();
        ownership.assign_all(&routed.identifiers(), entity_key);

        let results = scheduler::schedule_grouped(&self.adapters, &routed.by_source).await;
        let mut slices = splitter::split(&results, &ownership);
        let slice = slices.remove(entity_key).unwrap_or_default();

        self.finish_entity(entity_key, &routed.identifiers(), slice)
            .await
    }

    /// Profile two entities for one session. Their fetch tasks are merged
    /// into a single grouped schedule, so an identifier both parties share
    /// is fetched once and delivered to each; persona synthesis then runs
    /// for both parties concurrently.
    pub async fn build_pair(&self, request: PairRequest) -> PairProfiles {
        let first_routed = route_entity(&request.first.key, &request.first.urls);
        let second_routed = route_entity(&request.second.key, &request.second.urls);

        let first_ids = first_routed.identifiers();
        let second_ids = second_routed.identifiers();

        let mut ownership = Ownership::new();
        ownership.assign_all(&first_ids, &request.first.key);
        ownership.assign_all(&second_ids, &request.second.key);

        let mut combined = first_routed.by_source;
        for (source, refs) in second_routed.by_source {
            combined.entry(source).or_default().extend(refs);
        }

        let results = scheduler::schedule_grouped(&self.adapters, &combined).await;
        let mut slices = splitter::split(&results, &ownership);
        let first_slice = slices.remove(&request.first.key).unwrap_or_default();
        let second_slice = slices.remove(&request.second.key).unwrap_or_default();

        // Backdrop rendering does not depend on the personas; start it as
        // soon as the fetches are in.
        self.tasks.enqueue(DeferredJob::BackdropRender {
            session_id: request.session_id,
            prompt: "Neon-lit underground fight club stage, pixel art".to_string(),
        });

        let (first, second) = tokio::join!(
            self.finish_entity(&request.first.key, &first_ids, first_slice),
            self.finish_entity(&request.second.key, &second_ids, second_slice),
        );

        info!(session_id = %request.session_id, "Pair profiling complete");
        PairProfiles {
            session_id: request.session_id,
            first,
            second,
        }
    }

    async fn finish_entity(
        &self,
        entity_key: &str,
        identifiers: &[ProfileRef],
        slice: EntitySlice,
    ) -> EntityProfile {
        let payloads = slice.payloads();
        let display_name = splitter::resolve_display_name(&payloads, identifiers);
        let corpus = normalizer::corpus(&payloads);
        let sources_fetched = slice.hit_sources();
        info!(
            entity = entity_key,
            name = %display_name,
            sources = sources_fetched.len(),
            corpus_chars = corpus.len(),
            "Corpus assembled"
        );

        let persona = self.synthesizer.synthesize(&corpus, &display_name).await;

        EntityProfile {
            entity_key: entity_key.to_string(),
            display_name,
            corpus,
            sources_fetched,
            persona,
        }
    }
}

fn route_entity(entity_key: &str, urls: &[String]) -> RoutedInputs {
    let routed = router::route(urls);
    if !routed.unmatched.is_empty() {
        warn!(
            entity = entity_key,
            unmatched = ?routed.unmatched,
            "Some inputs matched no known platform"
        );
    }
    routed
}
