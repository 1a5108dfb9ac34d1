//! Pure building blocks of the search pipeline: query normalization and intent, candidate
//! records, project match scoring, and result merging. Nothing here performs I/O.

pub mod candidate;
pub mod keywords;
pub mod merge;
pub mod normalize;
pub mod query;
pub mod scoring;

pub use candidate::{CandidateRecord, MatchReason, MatchedProject, RetrievalSource};
pub use merge::{ResultMerger, SearchResult};
pub use normalize::TermNormalizer;
pub use query::{Query, QueryIntent, SynonymTable};
pub use scoring::MatchScorer;
