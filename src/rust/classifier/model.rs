use std::fmt;
use log::info;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use crate::features::{align, assemble, EmployeeProfile, ExpectedSchema, FeatureVector};

/// The two classes the attrition model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttritionLabel {
    /// Class 0
    Stay,
    /// Class 1, the positive class
    Leave,
}

impl AttritionLabel {
    /// Maps a raw class index from the model.
    pub fn from_class(class: i64) -> Result<Self, ClassifierError> {
        match class {
            0 => Ok(AttritionLabel::Stay),
            1 => Ok(AttritionLabel::Leave),
            other => Err(ClassifierError::PredictionError(
                format!("Model returned unknown class {}", other)
            )),
        }
    }

    pub fn class_index(&self) -> i64 {
        match self {
            AttritionLabel::Stay => 0,
            AttritionLabel::Leave => 1,
        }
    }
}

impl fmt::Display for AttritionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttritionLabel::Leave => f.write_str("Employee will Leave"),
            AttritionLabel::Stay => f.write_str("Stay"),
        }
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: AttritionLabel,
    /// Probability of the `Leave` class, 0.0 to 1.0
    pub probability: f32,
}

impl Prediction {
    /// The probability as shown to users, two decimal places.
    pub fn probability_display(&self) -> String {
        format!("{:.2}", self.probability)
    }
}

/// A loaded binary classifier that scores aligned feature vectors.
///
/// Implementations are immutable once built and are passed explicitly to
/// whatever needs a prediction.
pub trait AttritionModel {
    /// The column layout the model was fit with.
    fn schema(&self) -> &ExpectedSchema;

    /// Predicts the class of a feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<AttritionLabel, ClassifierError>;

    /// Returns the probability of the `Leave` class.
    fn predict_probability(&self, features: &FeatureVector) -> Result<f32, ClassifierError>;

    /// Returns both the class and the `Leave` probability.
    fn classify(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        Ok(Prediction {
            label: self.predict(features)?,
            probability: self.predict_probability(features)?,
        })
    }
}

/// Runs the whole pipeline for one employee: validate, assemble, align, classify.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use attrition::{predict_profile, Classifier, EmployeeProfile};
///
/// let classifier = Classifier::builder()
///     .with_model_file("models/attrition/model.onnx")?
///     .build()?;
///
/// let prediction = predict_profile(&classifier, &EmployeeProfile::default())?;
/// println!("{} ({})", prediction.label, prediction.probability_display());
/// # Ok(())
/// # }
/// ```
pub fn predict_profile<M: AttritionModel + ?Sized>(
    model: &M,
    profile: &EmployeeProfile,
) -> Result<Prediction, ClassifierError> {
    profile.validate()?;

    let row = assemble(profile);
    let features = align(&row, model.schema());
    let prediction = model.classify(&features)?;

    info!("Predicted {:?} with probability {:.4}", prediction.label, prediction.probability);
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(AttritionLabel::from_class(0).unwrap(), AttritionLabel::Stay);
        assert_eq!(AttritionLabel::from_class(1).unwrap(), AttritionLabel::Leave);
        assert!(AttritionLabel::from_class(2).is_err());
        assert_eq!(AttritionLabel::Leave.class_index(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(AttritionLabel::Leave.to_string(), "Employee will Leave");
        assert_eq!(AttritionLabel::Stay.to_string(), "Stay");

        let prediction = Prediction { label: AttritionLabel::Stay, probability: 0.12345 };
        assert_eq!(prediction.probability_display(), "0.12");
    }
}
