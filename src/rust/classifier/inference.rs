use std::collections::HashMap;
use ort::session::Session;
use ort::value::Tensor;
use log::debug;

use super::error::ClassifierError;
use super::model::AttritionLabel;
use crate::features::FeatureVector;

/// Raw outputs of one model run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModelOutput {
    pub label: AttritionLabel,
    pub probability: f32,
}

/// Runs tabular features through an ONNX classifier.
///
/// The ONNX model is expected to:
/// - Accept one float input of shape [batch_size, num_features]
/// - Output the predicted class as an int64 tensor of shape [batch_size]
/// - Output class probabilities as a float tensor of shape [batch_size, 2]
///   (tree ensembles exported with `zipmap=False`)
pub(crate) trait TabularInference {
    /// Returns the initialized ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Number of features the model accepts
    fn num_features(&self) -> usize;

    /// Runs the model on a single feature vector.
    ///
    /// # Errors
    /// - `ModelError` if the session is not initialized
    /// - `PredictionError` if the vector width does not match the model
    /// - `ModelError` if tensor creation, model execution or output extraction fails
    fn run_model(&self, features: &FeatureVector) -> Result<ModelOutput, ClassifierError> {
        let session = self.session()
            .ok_or_else(|| ClassifierError::ModelError("Session not initialized".into()))?;

        if features.len() != self.num_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Feature vector has {} values, model expects {}",
                features.len(),
                self.num_features()
            )));
        }

        let input_name = session.inputs.first()
            .map(|input| input.name.as_str())
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".into()))?;

        let input_dyn = features.to_input_array().into_dyn();
        let input_array = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(input_name, Tensor::from_array(&input_array)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?);

        let outputs = session.run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        if outputs.len() < 2 {
            return Err(ClassifierError::ModelError(
                format!("Model produced {} outputs, expected label and probabilities", outputs.len())
            ));
        }

        let label_tensor = outputs[0].try_extract_tensor::<i64>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract label tensor: {}", e)))?;
        let class = label_tensor.iter().next().copied()
            .ok_or_else(|| ClassifierError::PredictionError("Model returned no label".into()))?;

        let proba_tensor = outputs[1].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!(
                "Failed to extract probability tensor (export the model with zipmap disabled): {}", e
            )))?;
        if proba_tensor.shape().last() != Some(&2) {
            return Err(ClassifierError::PredictionError(
                format!("Expected probabilities for 2 classes, got shape {:?}", proba_tensor.shape())
            ));
        }
        let probability = proba_tensor.iter().nth(1).copied()
            .ok_or_else(|| ClassifierError::PredictionError("Model returned no probabilities".into()))?;

        debug!("Model output: class={} probability={}", class, probability);

        Ok(ModelOutput {
            label: AttritionLabel::from_class(class)?,
            probability,
        })
    }
}
