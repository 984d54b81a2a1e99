//! Sources of inference contexts.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use super::snapshot::{SnapshotLoader, SnapshotMetadata};
use crate::context::DataWarehouseInferenceContext;
use crate::error::Result;

/// Produces the context an inference run reads from.
///
/// Implementations may read a file, query a warehouse profiler or hand back
/// a prebuilt value. Every call should return a fresh, complete snapshot.
pub trait InferenceContextProvider: Send + Sync + Debug {
    fn get_context(&self) -> Result<DataWarehouseInferenceContext>;
}

/// Reads a context from a snapshot file on every call.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    path: PathBuf,
    loader: SnapshotLoader,
}

impl SnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loader: SnapshotLoader::new(),
        }
    }

    /// Use a specific loader, e.g. one with a fixed format.
    pub fn with_loader(mut self, loader: SnapshotLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the context along with file metadata.
    pub fn load(&self) -> Result<(DataWarehouseInferenceContext, SnapshotMetadata)> {
        self.loader.load(&self.path)
    }
}

impl InferenceContextProvider for SnapshotProvider {
    fn get_context(&self) -> Result<DataWarehouseInferenceContext> {
        self.load().map(|(context, _)| context)
    }
}

/// Hands out clones of a context built in memory.
#[derive(Debug, Clone)]
pub struct StaticContextProvider {
    context: DataWarehouseInferenceContext,
}

impl StaticContextProvider {
    pub fn new(context: DataWarehouseInferenceContext) -> Self {
        Self { context }
    }
}

impl InferenceContextProvider for StaticContextProvider {
    fn get_context(&self) -> Result<DataWarehouseInferenceContext> {
        Ok(self.context.clone())
    }
}
