//! Trained intent classifier artifact: ONNX network and process-wide loader

mod model_loader;
mod onnx;

pub use model_loader::{load_artifact, ModelLoadError, ModelLoader};
pub use onnx::OnnxSequenceClassifier;
