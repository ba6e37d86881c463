//! Hash-chain match finder used by the block encoder.

pub mod search;
pub mod types;

pub use search::MatchFinder;
pub use types::{hash4, hash5, LazyDecision, MatchCandidate, SearchParams, PRIME32};
