use std::path::Path;
use std::sync::Arc;
use ort::session::Session;
use ort::value::ValueType;
use log::{info, error};

use super::error::ClassifierError;
use super::classifier::Classifier;
use crate::features::ExpectedSchema;
use crate::model_manager::{ModelInfo, ModelManager};
use crate::runtime::{RuntimeConfig, create_session_builder};

/// A builder for constructing a Classifier with a fluent interface.
#[derive(Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    session: Option<Session>,
    schema: ExpectedSchema,
    runtime_config: RuntimeConfig,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates a new ClassifierBuilder using the attrition schema and default runtime configuration
    ///
    /// # Example
    /// ```
    /// use attrition::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            model_path: None,
            session: None,
            schema: ExpectedSchema::attrition(),
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution.
    /// Must be called before the model is loaded to take effect.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Replaces the column layout the model was fit with.
    pub fn with_schema(mut self, schema: ExpectedSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Loads an ONNX model from disk
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or the file doesn't exist
    ///   - A model is already set
    ///   - The model failed to load
    ///   - The model structure is invalid
    pub fn with_model_file(mut self, model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        if model_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Model path cannot be empty".to_string()));
        }
        if self.model_path.is_some() {
            return Err(ClassifierError::BuildError("Model path already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", model_path.display())));
        }

        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load model from {}: {}", model_path.display(), e);
                ClassifierError::ModelError(format!("Failed to load model: {}", e))
            })?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.session = Some(session);
        Ok(self)
    }

    /// Loads a model kept by a [`ModelManager`], verifying its hash first
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - An error if the model is not downloaded or
    ///   fails verification, or any error from [`with_model_file`](Self::with_model_file)
    pub fn with_managed_model(self, manager: &ModelManager, model: &ModelInfo) -> Result<Self, ClassifierError> {
        if !manager.is_model_downloaded(&model.name) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{}' is not downloaded. Please download it first using ModelManager::download_model()",
                model.name
            )));
        }

        let verified = manager.verify_model(model)
            .map_err(|e| ClassifierError::BuildError(format!("Failed to verify model: {}", e)))?;
        if !verified {
            return Err(ClassifierError::BuildError(format!("Model '{}' failed hash verification", model.name)));
        }

        self.with_model_file(manager.get_model_path(&model.name))
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No model is loaded
    ///   - The model's input width differs from the schema
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        let session = self.session.take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;
        let model_path = self.model_path.take()
            .ok_or_else(|| ClassifierError::BuildError("Model path must be set".into()))?;

        if let Some(width) = Self::input_width(&session) {
            if width != self.schema.len() {
                return Err(ClassifierError::BuildError(format!(
                    "Model expects {} features but the schema has {} columns",
                    width,
                    self.schema.len()
                )));
            }
        }

        info!("Classifier ready with {} features", self.schema.len());
        Ok(Classifier {
            model_path,
            session: Arc::new(session),
            schema: self.schema,
        })
    }

    /// Validates that the model has the expected input/output structure
    ///
    /// # Returns
    /// * `Result<(), ClassifierError>` - Ok if validation passes, or an error if:
    ///   - The model doesn't have exactly one input tensor
    ///   - The model doesn't have both label and probability outputs
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if inputs.len() != 1 {
            return Err(ClassifierError::ModelError(
                format!("Model must have exactly 1 input (the feature row), found {}", inputs.len())
            ));
        }

        let outputs = &session.outputs;
        if outputs.len() < 2 {
            return Err(ClassifierError::ModelError(
                format!("Model must have 2 outputs (label and probabilities), found {}", outputs.len())
            ));
        }

        Ok(())
    }

    // None when the feature dimension is dynamic.
    fn input_width(session: &Session) -> Option<usize> {
        match &session.inputs.first()?.input_type {
            ValueType::Tensor { dimensions, .. } => dimensions.last()
                .and_then(|&d| usize::try_from(d).ok())
                .filter(|&d| d > 0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let result = ClassifierBuilder::new().with_model_file("/nonexistent/attrition/model.onnx");
        let err = result.unwrap_err();
        assert!(matches!(err, ClassifierError::BuildError(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_model_path() {
        let result = ClassifierBuilder::new().with_model_file("");
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_managed_model_not_downloaded() {
        let dir = std::env::temp_dir().join("attrition-builder-test").join("models");
        let manager = ModelManager::new(&dir).unwrap();
        let info = ModelInfo::new("missing", "https://example.invalid/model.onnx", "00");

        let result = ClassifierBuilder::new().with_managed_model(&manager, &info);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("not downloaded"));
    }
}
