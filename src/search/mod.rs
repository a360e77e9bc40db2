//! Fuzzy search ranking over the catalog.
//!
//! A query is normalized into terms, candidates are retrieved for every result
//! kind concurrently, scored against each term's variations, then fused into a
//! single ranking and paginated.

// Module declarations
pub mod engine;
pub mod normalize;
pub mod phonetic;
pub mod rank;
pub mod retrieve;
pub mod scoring;
pub mod variations;

// Public re-exports (used via lib.rs)
pub use engine::{SearchEngine, SearchQuery};
pub use phonetic::PhoneticCodes;
pub use rank::{Candidate, CandidateKind, ResultKind, SearchHit, SearchPage, fuse, paginate};
pub use scoring::{WEIGHTS, Weights};
pub use variations::AliasTable;
