use serde::{Deserialize, Serialize};

use super::categories::{
    BusinessTravel, Department, EducationField, Gender, JobRole, MaritalStatus, OverTime,
};
use crate::classifier::ClassifierError;

/// Accepted range and default of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericInput {
    /// The feature column the value is written to
    pub column: &'static str,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl NumericInput {
    const fn new(column: &'static str, min: u32, max: u32, default: u32) -> Self {
        Self { column, min, max, default }
    }

    pub fn check(&self, value: u32) -> Result<(), ClassifierError> {
        if value < self.min || value > self.max {
            return Err(ClassifierError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                self.column, self.min, self.max, value
            )));
        }
        Ok(())
    }
}

pub const AGE: NumericInput = NumericInput::new("Age", 18, 60, 30);
pub const DAILY_RATE: NumericInput = NumericInput::new("DailyRate", 100, 2000, 1000);
pub const DISTANCE_FROM_HOME: NumericInput = NumericInput::new("DistanceFromHome", 1, 30, 5);
pub const EDUCATION: NumericInput = NumericInput::new("Education", 1, 5, 1);
pub const EMPLOYEE_NUMBER: NumericInput = NumericInput::new("EmployeeNumber", 1, 1000, 1);
pub const ENVIRONMENT_SATISFACTION: NumericInput = NumericInput::new("EnvironmentSatisfaction", 1, 4, 3);
pub const HOURLY_RATE: NumericInput = NumericInput::new("HourlyRate", 50, 200, 100);
pub const JOB_INVOLVEMENT: NumericInput = NumericInput::new("JobInvolvement", 1, 4, 3);
pub const JOB_LEVEL: NumericInput = NumericInput::new("JobLevel", 1, 5, 1);
pub const JOB_SATISFACTION: NumericInput = NumericInput::new("JobSatisfaction", 1, 4, 3);
pub const MONTHLY_INCOME: NumericInput = NumericInput::new("MonthlyIncome", 1000, 20000, 5000);
pub const MONTHLY_RATE: NumericInput = NumericInput::new("MonthlyRate", 1000, 20000, 5000);
pub const NUM_COMPANIES_WORKED: NumericInput = NumericInput::new("NumCompaniesWorked", 0, 10, 1);
pub const PERCENT_SALARY_HIKE: NumericInput = NumericInput::new("PercentSalaryHike", 0, 50, 10);
pub const PERFORMANCE_RATING: NumericInput = NumericInput::new("PerformanceRating", 1, 4, 3);
pub const RELATIONSHIP_SATISFACTION: NumericInput = NumericInput::new("RelationshipSatisfaction", 1, 4, 3);
pub const STOCK_OPTION_LEVEL: NumericInput = NumericInput::new("StockOptionLevel", 0, 3, 0);
pub const TOTAL_WORKING_YEARS: NumericInput = NumericInput::new("TotalWorkingYears", 0, 40, 5);
pub const TRAINING_TIMES_LAST_YEAR: NumericInput = NumericInput::new("TrainingTimesLastYear", 0, 10, 2);
pub const WORK_LIFE_BALANCE: NumericInput = NumericInput::new("WorkLifeBalance", 1, 4, 3);
pub const YEARS_AT_COMPANY: NumericInput = NumericInput::new("YearsAtCompany", 0, 40, 3);
pub const YEARS_IN_CURRENT_ROLE: NumericInput = NumericInput::new("YearsInCurrentRole", 0, 20, 2);
pub const YEARS_SINCE_LAST_PROMOTION: NumericInput = NumericInput::new("YearsSinceLastPromotion", 0, 15, 1);
pub const YEARS_WITH_CURR_MANAGER: NumericInput = NumericInput::new("YearsWithCurrManager", 0, 20, 2);

/// Raw selections describing one employee.
///
/// Serialized field names match the training columns, and categorical values
/// use the training data's display strings. Fields missing from JSON take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct EmployeeProfile {
    pub age: u32,
    pub daily_rate: u32,
    pub distance_from_home: u32,
    pub education: u32,
    pub employee_number: u32,
    pub environment_satisfaction: u32,
    pub hourly_rate: u32,
    pub job_involvement: u32,
    pub job_level: u32,
    pub job_satisfaction: u32,
    pub monthly_income: u32,
    pub monthly_rate: u32,
    pub num_companies_worked: u32,
    pub percent_salary_hike: u32,
    pub performance_rating: u32,
    pub relationship_satisfaction: u32,
    pub stock_option_level: u32,
    pub total_working_years: u32,
    pub training_times_last_year: u32,
    pub work_life_balance: u32,
    pub years_at_company: u32,
    pub years_in_current_role: u32,
    pub years_since_last_promotion: u32,
    pub years_with_curr_manager: u32,
    pub gender: Gender,
    pub over_time: OverTime,
    pub business_travel: BusinessTravel,
    pub department: Department,
    pub education_field: EducationField,
    pub job_role: JobRole,
    pub marital_status: MaritalStatus,
}

impl Default for EmployeeProfile {
    fn default() -> Self {
        Self {
            age: AGE.default,
            daily_rate: DAILY_RATE.default,
            distance_from_home: DISTANCE_FROM_HOME.default,
            education: EDUCATION.default,
            employee_number: EMPLOYEE_NUMBER.default,
            environment_satisfaction: ENVIRONMENT_SATISFACTION.default,
            hourly_rate: HOURLY_RATE.default,
            job_involvement: JOB_INVOLVEMENT.default,
            job_level: JOB_LEVEL.default,
            job_satisfaction: JOB_SATISFACTION.default,
            monthly_income: MONTHLY_INCOME.default,
            monthly_rate: MONTHLY_RATE.default,
            num_companies_worked: NUM_COMPANIES_WORKED.default,
            percent_salary_hike: PERCENT_SALARY_HIKE.default,
            performance_rating: PERFORMANCE_RATING.default,
            relationship_satisfaction: RELATIONSHIP_SATISFACTION.default,
            stock_option_level: STOCK_OPTION_LEVEL.default,
            total_working_years: TOTAL_WORKING_YEARS.default,
            training_times_last_year: TRAINING_TIMES_LAST_YEAR.default,
            work_life_balance: WORK_LIFE_BALANCE.default,
            years_at_company: YEARS_AT_COMPANY.default,
            years_in_current_role: YEARS_IN_CURRENT_ROLE.default,
            years_since_last_promotion: YEARS_SINCE_LAST_PROMOTION.default,
            years_with_curr_manager: YEARS_WITH_CURR_MANAGER.default,
            gender: Gender::default(),
            over_time: OverTime::default(),
            business_travel: BusinessTravel::default(),
            department: Department::default(),
            education_field: EducationField::default(),
            job_role: JobRole::default(),
            marital_status: MaritalStatus::default(),
        }
    }
}

impl EmployeeProfile {
    /// Pairs every numeric input with its current value.
    pub fn numeric_inputs(&self) -> [(NumericInput, u32); 24] {
        [
            (AGE, self.age),
            (DAILY_RATE, self.daily_rate),
            (DISTANCE_FROM_HOME, self.distance_from_home),
            (EDUCATION, self.education),
            (EMPLOYEE_NUMBER, self.employee_number),
            (ENVIRONMENT_SATISFACTION, self.environment_satisfaction),
            (HOURLY_RATE, self.hourly_rate),
            (JOB_INVOLVEMENT, self.job_involvement),
            (JOB_LEVEL, self.job_level),
            (JOB_SATISFACTION, self.job_satisfaction),
            (MONTHLY_INCOME, self.monthly_income),
            (MONTHLY_RATE, self.monthly_rate),
            (NUM_COMPANIES_WORKED, self.num_companies_worked),
            (PERCENT_SALARY_HIKE, self.percent_salary_hike),
            (PERFORMANCE_RATING, self.performance_rating),
            (RELATIONSHIP_SATISFACTION, self.relationship_satisfaction),
            (STOCK_OPTION_LEVEL, self.stock_option_level),
            (TOTAL_WORKING_YEARS, self.total_working_years),
            (TRAINING_TIMES_LAST_YEAR, self.training_times_last_year),
            (WORK_LIFE_BALANCE, self.work_life_balance),
            (YEARS_AT_COMPANY, self.years_at_company),
            (YEARS_IN_CURRENT_ROLE, self.years_in_current_role),
            (YEARS_SINCE_LAST_PROMOTION, self.years_since_last_promotion),
            (YEARS_WITH_CURR_MANAGER, self.years_with_curr_manager),
        ]
    }

    /// Checks every numeric input against its accepted range.
    ///
    /// # Errors
    /// Returns `ValidationError` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        self.numeric_inputs()
            .iter()
            .try_for_each(|(input, value)| input.check(*value))
    }

    /// Parses a profile from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|e| ClassifierError::ValidationError(format!("Invalid profile JSON: {}", e)))?;
        profile.validate()?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let profile = EmployeeProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.age, 30);
        assert_eq!(profile.monthly_income, 5000);
        assert_eq!(profile.employee_number, 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let profile = EmployeeProfile { age: 17, ..Default::default() };
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, ClassifierError::ValidationError(_)));
        assert!(err.to_string().contains("Age must be between 18 and 60"));

        let profile = EmployeeProfile { stock_option_level: 4, ..Default::default() };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let profile = EmployeeProfile::from_json(
            r#"{"Age": 45, "JobRole": "Research Director", "OverTime": "No"}"#
        ).unwrap();
        assert_eq!(profile.age, 45);
        assert_eq!(profile.job_role, JobRole::ResearchDirector);
        assert_eq!(profile.over_time, OverTime::No);
        assert_eq!(profile.daily_rate, DAILY_RATE.default);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(EmployeeProfile::from_json(r#"{"Age": 70}"#).is_err());
        assert!(EmployeeProfile::from_json(r#"{"JobRole": "Astronaut"}"#).is_err());
        assert!(EmployeeProfile::from_json(r#"{"StandardHours": 40}"#).is_err());
    }
}
