//! Categorical inputs and their fixed encodings.
//!
//! Binary choices map to `{0, 1}` through [`BinaryChoice`]. Multi-valued
//! choices expand into a group of indicator columns through [`OneHotGroup`];
//! a variant without an indicator column is the reference category the model
//! was fit against and encodes as all zeros.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// A categorical input encoded as a single 0/1 column.
pub trait BinaryChoice: Copy {
    /// The feature column the choice is written to.
    const COLUMN: &'static str;

    fn encode(&self) -> f32;
}

/// A categorical input expanded into mutually exclusive indicator columns.
pub trait OneHotGroup: Copy + 'static {
    /// Prefix shared by every indicator column of the group.
    const PREFIX: &'static str;

    fn variants() -> &'static [Self];

    /// The indicator column set to 1 for this variant, or `None` for the
    /// reference category.
    fn indicator_column(&self) -> Option<&'static str>;

    /// Every indicator column of the group, in variant order.
    fn group_columns() -> Vec<&'static str> {
        Self::variants()
            .iter()
            .filter_map(|v| v.indicator_column())
            .collect()
    }
}

// Case, spaces, underscores, hyphens and '&' are ignored so that
// "research-development" matches "Research & Development".
fn normalize_choice(value: &str) -> String {
    value.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The display string used by the training data.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ClassifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_choice(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize_choice(v.label()) == wanted)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.label()).collect();
                        ClassifierError::ValidationError(format!(
                            "Unknown {} '{}' (expected one of: {})",
                            stringify!($name),
                            s,
                            expected.join(", ")
                        ))
                    })
            }
        }
    };
}

choice_enum! {
    Gender {
        Male => "Male",
        Female => "Female",
    }
}

choice_enum! {
    OverTime {
        Yes => "Yes",
        No => "No",
    }
}

choice_enum! {
    BusinessTravel {
        NonTravel => "Non-Travel",
        TravelRarely => "Travel_Rarely",
        TravelFrequently => "Travel_Frequently",
    }
}

choice_enum! {
    Department {
        Sales => "Sales",
        ResearchAndDevelopment => "Research & Development",
        HumanResources => "Human Resources",
    }
}

choice_enum! {
    EducationField {
        LifeSciences => "Life Sciences",
        Medical => "Medical",
        Marketing => "Marketing",
        Other => "Other",
        TechnicalDegree => "Technical Degree",
        HumanResources => "Human Resources",
    }
}

choice_enum! {
    JobRole {
        HumanResources => "Human Resources",
        LaboratoryTechnician => "Laboratory Technician",
        Manager => "Manager",
        ManufacturingDirector => "Manufacturing Director",
        ResearchDirector => "Research Director",
        ResearchScientist => "Research Scientist",
        SalesExecutive => "Sales Executive",
        SalesRepresentative => "Sales Representative",
    }
}

choice_enum! {
    MaritalStatus {
        Married => "Married",
        Single => "Single",
        Divorced => "Divorced",
    }
}

impl BinaryChoice for Gender {
    const COLUMN: &'static str = "Gender";

    fn encode(&self) -> f32 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }
}

impl BinaryChoice for OverTime {
    const COLUMN: &'static str = "OverTime";

    fn encode(&self) -> f32 {
        match self {
            OverTime::Yes => 1.0,
            OverTime::No => 0.0,
        }
    }
}

impl OneHotGroup for BusinessTravel {
    const PREFIX: &'static str = "BusinessTravel";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn indicator_column(&self) -> Option<&'static str> {
        match self {
            BusinessTravel::NonTravel => None,
            BusinessTravel::TravelRarely => Some("BusinessTravel_Travel_Rarely"),
            BusinessTravel::TravelFrequently => Some("BusinessTravel_Travel_Frequently"),
        }
    }
}

impl OneHotGroup for Department {
    const PREFIX: &'static str = "Department";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn indicator_column(&self) -> Option<&'static str> {
        match self {
            Department::Sales => Some("Department_Sales"),
            Department::ResearchAndDevelopment => Some("Department_Research & Development"),
            Department::HumanResources => None,
        }
    }
}

impl OneHotGroup for EducationField {
    const PREFIX: &'static str = "EducationField";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn indicator_column(&self) -> Option<&'static str> {
        match self {
            EducationField::LifeSciences => Some("EducationField_Life Sciences"),
            EducationField::Medical => Some("EducationField_Medical"),
            EducationField::Marketing => Some("EducationField_Marketing"),
            EducationField::Other => Some("EducationField_Other"),
            EducationField::TechnicalDegree => Some("EducationField_Technical Degree"),
            EducationField::HumanResources => None,
        }
    }
}

impl OneHotGroup for JobRole {
    const PREFIX: &'static str = "JobRole";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn indicator_column(&self) -> Option<&'static str> {
        let column = match self {
            JobRole::HumanResources => "JobRole_Human Resources",
            JobRole::LaboratoryTechnician => "JobRole_Laboratory Technician",
            JobRole::Manager => "JobRole_Manager",
            JobRole::ManufacturingDirector => "JobRole_Manufacturing Director",
            JobRole::ResearchDirector => "JobRole_Research Director",
            JobRole::ResearchScientist => "JobRole_Research Scientist",
            JobRole::SalesExecutive => "JobRole_Sales Executive",
            JobRole::SalesRepresentative => "JobRole_Sales Representative",
        };
        Some(column)
    }
}

impl OneHotGroup for MaritalStatus {
    const PREFIX: &'static str = "MaritalStatus";

    fn variants() -> &'static [Self] {
        Self::ALL
    }

    fn indicator_column(&self) -> Option<&'static str> {
        match self {
            MaritalStatus::Married => Some("MaritalStatus_Married"),
            MaritalStatus::Single => Some("MaritalStatus_Single"),
            MaritalStatus::Divorced => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::ATTRITION_COLUMNS;

    fn assert_group_in_schema<G: OneHotGroup>() {
        for column in G::group_columns() {
            assert!(column.starts_with(G::PREFIX));
            assert!(ATTRITION_COLUMNS.contains(&column), "{} missing from schema", column);
        }
    }

    #[test]
    fn test_indicator_columns_exist_in_schema() {
        assert_group_in_schema::<BusinessTravel>();
        assert_group_in_schema::<Department>();
        assert_group_in_schema::<EducationField>();
        assert_group_in_schema::<JobRole>();
        assert_group_in_schema::<MaritalStatus>();
    }

    #[test]
    fn test_binary_mapping() {
        assert_eq!(Gender::Male.encode(), 1.0);
        assert_eq!(Gender::Female.encode(), 0.0);
        assert_eq!(OverTime::Yes.encode(), 1.0);
        assert_eq!(OverTime::No.encode(), 0.0);
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("Research & Development".parse::<Department>().unwrap(), Department::ResearchAndDevelopment);
        assert_eq!("research-development".parse::<Department>().unwrap(), Department::ResearchAndDevelopment);
        assert_eq!("travel_frequently".parse::<BusinessTravel>().unwrap(), BusinessTravel::TravelFrequently);
        assert_eq!("non-travel".parse::<BusinessTravel>().unwrap(), BusinessTravel::NonTravel);

        let err = "Astronaut".parse::<JobRole>().unwrap_err();
        assert!(matches!(err, ClassifierError::ValidationError(_)));
        assert!(err.to_string().contains("Sales Executive"));
    }

    #[test]
    fn test_defaults_are_first_options() {
        assert_eq!(Gender::default(), Gender::Male);
        assert_eq!(OverTime::default(), OverTime::Yes);
        assert_eq!(BusinessTravel::default(), BusinessTravel::NonTravel);
        assert_eq!(JobRole::default(), JobRole::HumanResources);
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&EducationField::TechnicalDegree).unwrap();
        assert_eq!(json, "\"Technical Degree\"");
        let parsed: Department = serde_json::from_str("\"Research & Development\"").unwrap();
        assert_eq!(parsed, Department::ResearchAndDevelopment);
    }
}
