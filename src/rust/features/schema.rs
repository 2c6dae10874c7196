use std::collections::HashMap;
use std::sync::Arc;
use lazy_static::lazy_static;
use log::debug;
use ndarray::{Array1, Array2};

use super::assembler::FeatureRow;
use crate::classifier::ClassifierError;

/// Name of the training label column. It is part of the fitted column set, so
/// it is synthesized as 0 at inference time.
pub const LABEL_COLUMN: &str = "Attrition";

/// Column order used when the attrition model was fit.
pub const ATTRITION_COLUMNS: [&str; 49] = [
    "Age",
    "Attrition",
    "DailyRate",
    "DistanceFromHome",
    "Education",
    "EmployeeCount",
    "EmployeeNumber",
    "EnvironmentSatisfaction",
    "Gender",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobSatisfaction",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "Over18",
    "OverTime",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StandardHours",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
    "BusinessTravel_Travel_Frequently",
    "BusinessTravel_Travel_Rarely",
    "Department_Research & Development",
    "Department_Sales",
    "EducationField_Life Sciences",
    "EducationField_Marketing",
    "EducationField_Medical",
    "EducationField_Other",
    "EducationField_Technical Degree",
    "JobRole_Human Resources",
    "JobRole_Laboratory Technician",
    "JobRole_Manager",
    "JobRole_Manufacturing Director",
    "JobRole_Research Director",
    "JobRole_Research Scientist",
    "JobRole_Sales Executive",
    "JobRole_Sales Representative",
    "MaritalStatus_Married",
    "MaritalStatus_Single",
];

lazy_static! {
    static ref ATTRITION_SCHEMA: ExpectedSchema = ExpectedSchema::from_parts(
        ATTRITION_COLUMNS.iter().map(|c| c.to_string()).collect()
    );
}

/// An immutable, ordered list of the column names a model expects.
///
/// Cloning is cheap: the column list and its index are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedSchema {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
}

impl ExpectedSchema {
    /// Creates a schema from a custom column list.
    ///
    /// # Errors
    /// Returns `ValidationError` if the list is empty, or contains an empty or
    /// duplicated column name.
    pub fn new(columns: Vec<impl Into<String>>) -> Result<Self, ClassifierError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ClassifierError::ValidationError("Schema must have at least one column".into()));
        }
        if let Some(pos) = columns.iter().position(|c| c.is_empty()) {
            return Err(ClassifierError::ValidationError(
                format!("Column {} has an empty name", pos + 1)
            ));
        }

        let schema = Self::from_parts(columns);
        if schema.index.len() != schema.columns.len() {
            let duplicate = schema.columns.iter()
                .enumerate()
                .find(|(i, c)| schema.index.get(*c) != Some(i))
                .map(|(_, c)| c.clone())
                .unwrap_or_default();
            return Err(ClassifierError::ValidationError(
                format!("Duplicate column '{}' in schema", duplicate)
            ));
        }
        Ok(schema)
    }

    /// The 49-column schema of the attrition model.
    pub fn attrition() -> Self {
        ATTRITION_SCHEMA.clone()
    }

    // First occurrence wins, so duplicates show up as a shorter index.
    fn from_parts(columns: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            index.entry(column.clone()).or_insert(i);
        }
        Self {
            columns: Arc::new(columns),
            index: Arc::new(index),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }
}

impl Default for ExpectedSchema {
    fn default() -> Self {
        Self::attrition()
    }
}

/// A single row of model input, laid out in schema order.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    schema: ExpectedSchema,
    values: Array1<f32>,
}

impl FeatureVector {
    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<f32> {
        self.schema.position(column).map(|i| self.values[i])
    }

    /// Returns the row as a `[1, n]` batch for the model.
    pub fn to_input_array(&self) -> Array2<f32> {
        self.values.clone().insert_axis(ndarray::Axis(0))
    }
}

/// Lays out `row` in `schema` order.
///
/// Columns absent from the row are filled with 0; keys the schema does not
/// know are dropped. The result always has `schema.len()` values.
pub fn align(row: &FeatureRow, schema: &ExpectedSchema) -> FeatureVector {
    let values: Array1<f32> = schema.columns()
        .iter()
        .map(|column| row.get(column).unwrap_or(0.0))
        .collect();

    for name in row.names().filter(|name| !schema.contains(name)) {
        debug!("Dropping column '{}' not present in schema", name);
    }

    FeatureVector {
        schema: schema.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrition_schema_shape() {
        let schema = ExpectedSchema::attrition();
        assert_eq!(schema.len(), 49);
        assert_eq!(schema.columns()[0], "Age");
        assert_eq!(schema.position(LABEL_COLUMN), Some(1));
        assert_eq!(schema.columns()[48], "MaritalStatus_Single");
    }

    #[test]
    fn test_custom_schema_validation() {
        assert!(ExpectedSchema::new(Vec::<String>::new()).is_err());
        assert!(ExpectedSchema::new(vec!["a", ""]).is_err());

        let err = ExpectedSchema::new(vec!["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("'a'"));

        let schema = ExpectedSchema::new(vec!["b", "a"]).unwrap();
        assert_eq!(schema.position("a"), Some(1));
        assert!(!schema.contains("c"));
    }

    #[test]
    fn test_align_fills_and_drops() {
        let schema = ExpectedSchema::new(vec!["x", "y", "z"]).unwrap();
        let mut row = FeatureRow::new();
        row.insert("z", 3.0);
        row.insert("x", 1.0);
        row.insert("extra", 9.0);

        let vector = align(&row, &schema);
        assert_eq!(vector.values().to_vec(), vec![1.0, 0.0, 3.0]);
        assert_eq!(vector.get("extra"), None);
        assert_eq!(vector.to_input_array().shape(), &[1, 3]);
    }
}
