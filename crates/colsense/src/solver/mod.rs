//! Signal resolution.
//!
//! A solver looks at every signal emitted for one column and settles on a
//! single [`InferenceSignalType`](crate::signal::InferenceSignalType), or
//! explains why it could not.

mod decision;
mod resolver;

pub use decision::{ColumnDecision, Resolution, UnresolvedReason};
pub use resolver::{ConflictResolver, InferenceSolver};
