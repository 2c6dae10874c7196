use std::collections::HashMap;
use log::debug;

use super::categories::{BinaryChoice, OneHotGroup};
use super::profile::EmployeeProfile;

/// Constant columns fixed by the source data, not by user input.
pub const CONSTANT_COLUMNS: [(&str, f32); 3] = [
    ("EmployeeCount", 1.0),
    ("Over18", 1.0),
    ("StandardHours", 80.0),
];

/// Named feature values for one employee, in no particular order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: HashMap<String, f32>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: f32) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set_binary<B: BinaryChoice>(&mut self, choice: B) {
        self.insert(B::COLUMN, choice.encode());
    }

    // Every column of the group is written so siblings read 0.
    fn set_one_hot<G: OneHotGroup>(&mut self, choice: G) {
        for column in G::group_columns() {
            self.insert(column, 0.0);
        }
        if let Some(column) = choice.indicator_column() {
            self.insert(column, 1.0);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for FeatureRow {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Turns raw selections into a feature row.
///
/// The row holds every model column except the training label.
pub fn assemble(profile: &EmployeeProfile) -> FeatureRow {
    let mut row = FeatureRow::new();

    for (input, value) in profile.numeric_inputs() {
        row.insert(input.column, value as f32);
    }
    for (column, value) in CONSTANT_COLUMNS {
        row.insert(column, value);
    }

    row.set_binary(profile.gender);
    row.set_binary(profile.over_time);

    row.set_one_hot(profile.business_travel);
    row.set_one_hot(profile.department);
    row.set_one_hot(profile.education_field);
    row.set_one_hot(profile.job_role);
    row.set_one_hot(profile.marital_status);

    debug!("Assembled {} features", row.len());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::{BusinessTravel, Department, EducationField, MaritalStatus};
    use crate::features::schema::{ExpectedSchema, LABEL_COLUMN};

    fn group_sum<G: OneHotGroup>(row: &FeatureRow) -> f32 {
        G::group_columns().iter().filter_map(|c| row.get(c)).sum()
    }

    #[test]
    fn test_assembled_columns_match_schema() {
        let row = assemble(&EmployeeProfile::default());
        let schema = ExpectedSchema::attrition();

        assert_eq!(row.len(), schema.len() - 1);
        assert!(!row.contains(LABEL_COLUMN));
        for name in row.names() {
            assert!(schema.contains(name), "unexpected column {}", name);
        }
    }

    #[test]
    fn test_constants_are_fixed() {
        let profile = EmployeeProfile { age: 55, ..Default::default() };
        let row = assemble(&profile);
        assert_eq!(row.get("EmployeeCount"), Some(1.0));
        assert_eq!(row.get("Over18"), Some(1.0));
        assert_eq!(row.get("StandardHours"), Some(80.0));
        assert_eq!(row.get("Age"), Some(55.0));
    }

    #[test]
    fn test_reference_categories_are_all_zero() {
        let profile = EmployeeProfile {
            business_travel: BusinessTravel::NonTravel,
            department: Department::HumanResources,
            education_field: EducationField::HumanResources,
            marital_status: MaritalStatus::Divorced,
            ..Default::default()
        };
        let row = assemble(&profile);
        assert_eq!(group_sum::<BusinessTravel>(&row), 0.0);
        assert_eq!(group_sum::<Department>(&row), 0.0);
        assert_eq!(group_sum::<EducationField>(&row), 0.0);
        assert_eq!(row.get("EducationField_Life Sciences"), Some(0.0));
        assert_eq!(group_sum::<MaritalStatus>(&row), 0.0);
        assert_eq!(row.get("BusinessTravel_Travel_Rarely"), Some(0.0));
    }

    #[test]
    fn test_one_hot_sets_single_member() {
        for travel in BusinessTravel::ALL {
            let profile = EmployeeProfile { business_travel: *travel, ..Default::default() };
            let row = assemble(&profile);
            let expected = if travel.indicator_column().is_some() { 1.0 } else { 0.0 };
            assert_eq!(group_sum::<BusinessTravel>(&row), expected);
        }
    }

    #[test]
    fn test_row_from_iter() {
        let row: FeatureRow = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(row.get("b"), Some(2.0));
        assert_eq!(row.len(), 2);
    }
}
