use std::sync::Arc;
use ort::session::Session;

use super::error::ClassifierError;
use super::inference::TabularInference;
use super::model::{AttritionLabel, AttritionModel, Prediction};
use crate::features::{ExpectedSchema, FeatureVector};

/// A thread-safe attrition classifier backed by an ONNX model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync`: the session is wrapped in `Arc`
/// and the schema shares its column list.
///
/// ```rust,no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use attrition::{AttritionModel, Classifier, EmployeeProfile, assemble, align};
///
/// let classifier = Classifier::builder()
///     .with_model_file("model.onnx")?
///     .build()?;
///
/// let row = assemble(&EmployeeProfile::default());
/// let features = align(&row, classifier.schema());
/// let prediction = classifier.classify(&features)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub session: Arc<Session>,
    pub schema: ExpectedSchema,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TabularInference for Classifier {
    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn num_features(&self) -> usize {
        self.schema.len()
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            input_name: self.session.inputs.first()
                .map(|input| input.name.clone())
                .unwrap_or_default(),
            num_features: self.schema.len(),
            columns: self.schema.columns().to_vec(),
        }
    }
}

impl AttritionModel for Classifier {
    fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<AttritionLabel, ClassifierError> {
        Ok(self.run_model(features)?.label)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f32, ClassifierError> {
        Ok(self.run_model(features)?.probability)
    }

    // One session run yields both outputs.
    fn classify(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let output = self.run_model(features)?;
        Ok(Prediction {
            label: output.label,
            probability: output.probability,
        })
    }
}
