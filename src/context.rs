use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::{
    cli::SourceArgs,
    error::InsightError,
    heuristics::Heuristics,
    ingest::{LoadOptions, load_path},
    io_utils,
    record::Dataset,
    store::DatasetStore,
};

/// Everything a command needs: the dataset store, the inference tables and
/// the options used to parse further uploads.
#[derive(Debug)]
pub struct AnalysisContext {
    pub store: DatasetStore,
    pub heuristics: Heuristics,
    pub load_options: LoadOptions,
    pub use_sample: bool,
}

impl AnalysisContext {
    pub fn from_args(args: &SourceArgs) -> Result<Self> {
        let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())
            .map_err(|err| InsightError::Usage(err.to_string()))?;
        let load_options = LoadOptions {
            delimiter: args.delimiter,
            encoding,
        };
        let heuristics = match &args.heuristics {
            Some(path) => Heuristics::load(path)
                .with_context(|| format!("Loading heuristics from {path:?}"))?,
            None => Heuristics::default(),
        };
        let store = match &args.sample {
            Some(path) => DatasetStore::with_fallback(path, load_options),
            None => DatasetStore::new(),
        };
        let context = Self {
            store,
            heuristics,
            load_options,
            use_sample: !args.no_sample,
        };
        if let Some(input) = &args.input {
            context.upload(input)?;
        }
        Ok(context)
    }

    pub fn upload(&self, path: &std::path::Path) -> Result<usize> {
        let dataset = load_path(path, &self.load_options)?;
        let rows = dataset.len();
        self.store.replace(dataset);
        debug!("Uploaded {path:?} as the resident dataset");
        Ok(rows)
    }

    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        Ok(self.store.resolve(self.use_sample)?)
    }
}
