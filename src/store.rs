//! The resident dataset.
//!
//! A [`DatasetStore`] holds at most one uploaded [`Dataset`] behind a single
//! lock. Replacement swaps a fully built `Arc`, so readers holding a snapshot
//! keep the version they started with and never observe a partial dataset.
//! When nothing was uploaded, an optional sample source is loaded on demand.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use log::{debug, info};

use crate::{
    error::{InsightError, InsightResult},
    ingest::{LoadOptions, load_path},
    record::Dataset,
};

#[derive(Debug, Default)]
pub struct DatasetStore {
    uploaded: RwLock<Option<Arc<Dataset>>>,
    fallback: Option<FallbackSource>,
}

#[derive(Debug)]
struct FallbackSource {
    path: PathBuf,
    options: LoadOptions,
    cached: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            uploaded: RwLock::new(None),
            fallback: Some(FallbackSource {
                path: path.into(),
                options,
                cached: RwLock::new(None),
            }),
        }
    }

    /// Snapshot of the uploaded dataset, if any.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.uploaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `dataset` as the upload, returning the one it supersedes.
    pub fn replace(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let incoming = Arc::new(dataset);
        let rows = incoming.len();
        let previous = self
            .uploaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(incoming);
        info!("Resident dataset replaced ({rows} record(s))");
        previous
    }

    pub fn has_upload(&self) -> bool {
        self.get().is_some()
    }

    pub fn fallback_path(&self) -> Option<&Path> {
        self.fallback.as_ref().map(|f| f.path.as_path())
    }

    /// The dataset queries should read: the upload, else the sample when
    /// `use_fallback` allows it.
    pub fn resolve(&self, use_fallback: bool) -> InsightResult<Arc<Dataset>> {
        if let Some(uploaded) = self.get() {
            return Ok(uploaded);
        }
        match &self.fallback {
            Some(fallback) if use_fallback => fallback.load(),
            _ => Err(InsightError::NoDatasetAvailable),
        }
    }
}

impl FallbackSource {
    fn load(&self) -> InsightResult<Arc<Dataset>> {
        if let Some(cached) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Ok(cached);
        }
        debug!("Loading sample dataset from {:?}", self.path);
        let dataset = Arc::new(load_path(&self.path, &self.options)?);
        let mut slot = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.get_or_insert(dataset).clone())
    }
}
