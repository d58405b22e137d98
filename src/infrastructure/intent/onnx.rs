//! ONNX sequence classifier via tract

use std::fmt;
use std::path::Path;

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tract_onnx::prelude::*;

use super::ModelLoadError;
use crate::domain::intent::{InferenceError, SequenceClassifier};

type TractPlan = TypedRunnableModel<TypedModel>;

/// Graph inputs a sequence classification export may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelInput {
    InputIds,
    AttentionMask,
    TokenTypeIds,
}

impl ModelInput {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "input_ids" => Some(Self::InputIds),
            "attention_mask" => Some(Self::AttentionMask),
            "token_type_ids" => Some(Self::TokenTypeIds),
            _ => None,
        }
    }
}

/// Tokenizer plus optimized ONNX graph producing `[1, num_labels]` logits
pub struct OnnxSequenceClassifier {
    plan: TractPlan,
    tokenizer: Tokenizer,
    inputs: Vec<ModelInput>,
    max_length: usize,
}

impl fmt::Debug for OnnxSequenceClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxSequenceClassifier")
            .field("inputs", &self.inputs)
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl OnnxSequenceClassifier {
    /// Load `tokenizer.json` and `model.onnx`, fixing the sequence length to
    /// `max_length`. Blocking: reads files and optimizes the graph.
    pub fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        max_length: usize,
    ) -> Result<Self, ModelLoadError> {
        let tokenizer = load_tokenizer(tokenizer_path, max_length)?;

        let mut model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| ModelLoadError::Graph(e.to_string()))?;

        let input_names: Vec<String> = model
            .input_outlets()
            .map_err(|e| ModelLoadError::Graph(e.to_string()))?
            .iter()
            .map(|outlet| model.node(outlet.node).name.clone())
            .collect();

        let inputs = input_names
            .iter()
            .map(|name| {
                ModelInput::from_name(name)
                    .ok_or_else(|| ModelLoadError::UnsupportedInput(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !inputs.contains(&ModelInput::InputIds) {
            return Err(ModelLoadError::UnsupportedInput(
                "graph has no input_ids input".to_string(),
            ));
        }

        for index in 0..inputs.len() {
            model
                .set_input_fact(index, i64::fact([1, max_length]).into())
                .map_err(|e| ModelLoadError::Graph(e.to_string()))?;
        }

        let plan = model
            .into_optimized()
            .map_err(|e| ModelLoadError::Graph(e.to_string()))?
            .into_runnable()
            .map_err(|e| ModelLoadError::Graph(e.to_string()))?;

        Ok(Self {
            plan,
            tokenizer,
            inputs,
            max_length,
        })
    }

    fn input_tensor(&self, values: &[u32]) -> Result<Tensor, InferenceError> {
        let mut data: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
        data.resize(self.max_length, 0);

        Tensor::from_shape(&[1, self.max_length], &data)
            .map_err(|e| InferenceError::Forward(e.to_string()))
    }
}

impl SequenceClassifier for OnnxSequenceClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| InferenceError::Tokenization(e.to_string()))?;

        let mut values: TVec<TValue> = TVec::new();
        for input in &self.inputs {
            let tensor = match input {
                ModelInput::InputIds => self.input_tensor(encoding.get_ids())?,
                ModelInput::AttentionMask => self.input_tensor(encoding.get_attention_mask())?,
                ModelInput::TokenTypeIds => self.input_tensor(encoding.get_type_ids())?,
            };
            values.push(tensor.into());
        }

        let outputs = self
            .plan
            .run(values)
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        let logits = outputs.first().ok_or(InferenceError::EmptyLogits)?;
        let view = logits
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        Ok(view.iter().copied().collect())
    }
}

/// Tokenizer padding and truncating every sequence to exactly `max_length`
fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer, ModelLoadError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| ModelLoadError::Tokenizer(e.to_string()))?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..TruncationParams::default()
        }))
        .map_err(|e| ModelLoadError::Tokenizer(e.to_string()))?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(max_length),
        ..PaddingParams::default()
    }));

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_names() {
        assert_eq!(ModelInput::from_name("input_ids"), Some(ModelInput::InputIds));
        assert_eq!(
            ModelInput::from_name("attention_mask"),
            Some(ModelInput::AttentionMask)
        );
        assert_eq!(
            ModelInput::from_name("token_type_ids"),
            Some(ModelInput::TokenTypeIds)
        );
        assert_eq!(ModelInput::from_name("pixel_values"), None);
    }

    #[test]
    fn test_missing_tokenizer_file() {
        let result = load_tokenizer(Path::new("/nonexistent/tokenizer.json"), 64);

        assert!(matches!(result, Err(ModelLoadError::Tokenizer(_))));
    }

    #[test]
    fn test_missing_graph_file() {
        let dir = std::env::temp_dir().join(format!("onnx-missing-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tokenizer.json"), "not a tokenizer").unwrap();

        let result =
            OnnxSequenceClassifier::load(&dir.join("model.onnx"), &dir.join("tokenizer.json"), 64);

        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
