//! Ecosystem cross-reference synchronizer.
//!
//! The [`SyncCoordinator`] reads sectors, brands, and system status from a
//! [`CatalogStore`](ecoportal_core::CatalogStore), substitutes [`FallbackData`]
//! for any read that fails, builds a [`CrossReferenceIndex`] and integrity
//! score, and publishes them with one atomic swap. Lookups never observe a
//! partially built index.

pub mod coordinator;
pub mod error;
pub mod fallback;
pub mod index;
pub mod integrity;

pub use coordinator::{ProbeReport, SyncCoordinator, SyncMetrics, SyncSource, SyncStatus};
pub use error::SyncError;
pub use fallback::FallbackData;
pub use index::CrossReferenceIndex;
pub use integrity::integrity_score;
