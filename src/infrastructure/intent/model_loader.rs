//! Process-wide loader for the trained intent classifier

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell as SyncOnceCell;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::OnnxSequenceClassifier;
use crate::config::ClassifierConfig;
use crate::domain::intent::{LabelMap, LoadedModel, ModelState};

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "model.onnx";
const LABEL_MAP_FILE: &str = "label_map.json";

static SHARED_LOADER: SyncOnceCell<Arc<ModelLoader>> = SyncOnceCell::new();

/// Reasons the model artifact could not be loaded
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model directory not found: {0}")]
    MissingArtifact(PathBuf),

    #[error("Invalid label map: {0}")]
    LabelMap(String),

    #[error("Failed to load tokenizer: {0}")]
    Tokenizer(String),

    #[error("Failed to load ONNX graph: {0}")]
    Graph(String),

    #[error("Unsupported model input: {0}")]
    UnsupportedInput(String),

    #[error("Model loading task failed: {0}")]
    Join(String),
}

/// Loads the classifier artifact at most once per process.
///
/// Concurrent first callers wait on the same attempt and share its outcome.
/// A failed attempt is cached as `ModelState::Unavailable` for the life of
/// the loader.
#[derive(Debug)]
pub struct ModelLoader {
    model_dir: PathBuf,
    max_length: usize,
    state: OnceCell<ModelState>,
    attempts: AtomicUsize,
}

impl ModelLoader {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            model_dir: config.model_dir.clone(),
            max_length: config.max_length,
            state: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Loader whose model is already in memory
    pub fn preloaded(model: LoadedModel) -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_length: 0,
            state: OnceCell::new_with(Some(ModelState::Loaded(Arc::new(model)))),
            attempts: AtomicUsize::new(0),
        }
    }

    /// The process-wide loader; `config` only matters on the first call
    pub fn shared(config: &ClassifierConfig) -> Arc<Self> {
        SHARED_LOADER
            .get_or_init(|| Arc::new(Self::new(config)))
            .clone()
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Number of load attempts started
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Load the model on the first call and return the cached state after
    /// that. Never fails: a missing or broken artifact yields
    /// `ModelState::Unavailable`.
    pub async fn load(&self) -> ModelState {
        self.state
            .get_or_init(|| async {
                match self.load_from_disk().await {
                    Ok(model) => ModelState::Loaded(model),
                    Err(e) => {
                        warn!(
                            model_dir = %self.model_dir.display(),
                            error = %e,
                            "Intent model unavailable, using keyword heuristic"
                        );
                        ModelState::Unavailable
                    }
                }
            })
            .await
            .clone()
    }

    /// Current state without attempting a load
    pub fn state(&self) -> ModelState {
        self.state.get().cloned().unwrap_or(ModelState::Unavailable)
    }

    async fn load_from_disk(&self) -> Result<Arc<LoadedModel>, ModelLoadError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        let model_dir = self.model_dir.clone();
        let max_length = self.max_length;

        let model = tokio::task::spawn_blocking(move || load_artifact(&model_dir, max_length))
            .await
            .map_err(|e| ModelLoadError::Join(e.to_string()))??;

        info!(
            model_dir = %self.model_dir.display(),
            labels = model.labels().len(),
            max_length = self.max_length,
            "Intent model loaded"
        );

        Ok(Arc::new(model))
    }
}

/// Read a complete artifact directory. Blocking.
pub fn load_artifact(model_dir: &Path, max_length: usize) -> Result<LoadedModel, ModelLoadError> {
    if !model_dir.is_dir() {
        return Err(ModelLoadError::MissingArtifact(model_dir.to_path_buf()));
    }

    let labels = read_label_map(&model_dir.join(LABEL_MAP_FILE))?;
    let network = OnnxSequenceClassifier::load(
        &model_dir.join(MODEL_FILE),
        &model_dir.join(TOKENIZER_FILE),
        max_length,
    )?;

    Ok(LoadedModel::new(Box::new(network), labels))
}

/// Parse a `label → index` map and invert it
fn read_label_map(path: &Path) -> Result<LabelMap, ModelLoadError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ModelLoadError::LabelMap(format!("{}: {}", path.display(), e)))?;

    let labels: HashMap<String, usize> = serde_json::from_str(&raw)
        .map_err(|e| ModelLoadError::LabelMap(format!("{}: {}", path.display(), e)))?;

    if labels.is_empty() {
        return Err(ModelLoadError::LabelMap("label map is empty".to_string()));
    }

    let label_count = labels.len();
    let map = LabelMap::from_label_indices(labels);

    if map.len() != label_count {
        return Err(ModelLoadError::LabelMap(
            "label map assigns one index to several labels".to_string(),
        ));
    }

    Ok(map)
}
