//! Employee attrition prediction on top of a pre-trained ONNX classifier.
//!
//! An [`EmployeeProfile`] is assembled into a [`FeatureRow`], aligned to the
//! model's [`ExpectedSchema`] and scored by an [`AttritionModel`].
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use attrition::{predict_profile, Classifier, EmployeeProfile, JobRole, OverTime};
//!
//! let classifier = Classifier::builder()
//!     .with_model_file("models/attrition/model.onnx")?
//!     .build()?;
//!
//! let profile = EmployeeProfile {
//!     job_role: JobRole::SalesRepresentative,
//!     over_time: OverTime::Yes,
//!     ..Default::default()
//! };
//!
//! let prediction = predict_profile(&classifier, &profile)?;
//! println!("{}", prediction.label);
//! println!("Probability of leaving: {}", prediction.probability_display());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`Classifier`] is `Send + Sync` and can be shared across threads using `Arc`.

pub mod classifier;
pub mod features;
mod runtime;
pub mod model_manager;

pub use classifier::{
    predict_profile, AttritionLabel, AttritionModel, Classifier, ClassifierBuilder, ClassifierError,
    ClassifierInfo, Prediction,
};
pub use features::{
    align, assemble, BusinessTravel, Department, EducationField, EmployeeProfile, ExpectedSchema,
    FeatureRow, FeatureVector, Gender, JobRole, MaritalStatus, OverTime,
};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use model_manager::{ModelManager, ModelError, ModelInfo};

/// Initializes `env_logger`; the level comes from `RUST_LOG`.
pub fn init_logger() {
    env_logger::init();
}
