mod error;
mod inference;
mod model;
mod classifier;
pub mod builder;

pub use error::ClassifierError;
pub use model::{AttritionLabel, AttritionModel, Prediction, predict_profile};
pub use classifier::Classifier;
pub use builder::ClassifierBuilder;

/// Information about the loaded model and the features it consumes
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Name of the model's input tensor
    pub input_name: String,
    /// Width of the feature vector
    pub num_features: usize,
    /// Feature columns in model order
    pub columns: Vec<String>,
}
