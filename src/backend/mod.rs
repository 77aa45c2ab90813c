//! Search backend side of the resolver: node selection and the matching
//! heuristic that binds a catalog track to a playable backend track.

pub mod matcher;
pub mod nodes;

pub use matcher::{DURATION_TOLERANCE_MS, TrackMatcher, select_candidate};
pub use nodes::{Node, NodeLookup, StaticNodes};
