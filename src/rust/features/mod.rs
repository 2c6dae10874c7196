//! Turning raw employee selections into a model-ready feature vector.
//!
//! [`assemble`] builds a [`FeatureRow`] from an [`EmployeeProfile`], and
//! [`align`] lays that row out in the order of an [`ExpectedSchema`].

mod assembler;
pub mod categories;
mod profile;
mod schema;

pub use assembler::{assemble, FeatureRow, CONSTANT_COLUMNS};
pub use categories::{
    BinaryChoice, BusinessTravel, Department, EducationField, Gender, JobRole, MaritalStatus,
    OneHotGroup, OverTime,
};
pub use profile::{EmployeeProfile, NumericInput};
pub use schema::{align, ExpectedSchema, FeatureVector, ATTRITION_COLUMNS, LABEL_COLUMN};
