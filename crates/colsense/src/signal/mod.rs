//! Signals emitted by inference rules and the type hierarchy they point into.

mod signal;
mod types;

pub use signal::InferenceSignal;
pub use types::{InferenceSignalConfidence, InferenceSignalType, SignalCategory};
