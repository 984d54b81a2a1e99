//! Loading warehouse statistics into an inference context.

mod provider;
mod snapshot;

pub use provider::{InferenceContextProvider, SnapshotProvider, StaticContextProvider};
pub use snapshot::{SnapshotFormat, SnapshotLoader, SnapshotMetadata};
