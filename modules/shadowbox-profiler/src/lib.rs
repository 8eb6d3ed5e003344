//! Concurrent multi-source profile aggregation.
//!
//! Raw profile URLs are routed to their platforms, fetched through
//! per-source adapters with bounded fan-out, partitioned back to their
//! owning entities, rendered into a plain-text corpus, and handed to
//! persona synthesis. Upstream failures degrade the corpus; they never
//! abort a run.

pub mod adapters;
pub mod fixtures;
pub mod normalizer;
pub mod pipeline;
pub mod router;
pub mod scheduler;
pub mod splitter;
pub mod synthesizer;
pub mod tasks;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use pipeline::{EntityProfile, EntitySpec, PairProfiles, PairRequest, ProfilePipeline};
pub use types::{FailureKind, ProfileRef, Source, SourcePayload};
