use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};
use attrition::{
    predict_profile, AttritionModel, BusinessTravel, Classifier, Department, EducationField,
    EmployeeProfile, Gender, JobRole, MaritalStatus, ModelInfo, ModelManager, OverTime, Prediction,
    RuntimeConfig,
};
use clap::Parser;
use log::info;

/// Predict whether an employee is likely to leave the company.
///
/// Choices accept the training data's labels, ignoring case and punctuation
/// (e.g. "Research & Development" or "research-development").
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ONNX model file; overrides the managed model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Name of the managed model under the cache directory
    #[arg(long, default_value = "attrition")]
    model_name: String,

    /// URL to download the managed model from when missing
    #[arg(long, requires = "model_sha256", conflicts_with = "model")]
    model_url: Option<String>,

    /// Expected SHA-256 of the managed model
    #[arg(long, conflicts_with = "model")]
    model_sha256: Option<String>,

    /// Force a fresh download of the managed model
    #[arg(short, long, requires = "model_url", conflicts_with = "model")]
    fresh: bool,

    /// JSON file with an employee profile; flags override its values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the prediction as JSON
    #[arg(long)]
    json: bool,

    /// Threads ONNX Runtime may use within an operator (0 = runtime default)
    #[arg(long, default_value_t = 0)]
    intra_threads: usize,

    #[command(flatten)]
    profile: ProfileArgs,
}

#[derive(clap::Args)]
struct ProfileArgs {
    /// Age [18-60, default 30]
    #[arg(long)]
    age: Option<u32>,
    /// Daily rate [100-2000, default 1000]
    #[arg(long)]
    daily_rate: Option<u32>,
    /// Distance from home [1-30, default 5]
    #[arg(long)]
    distance_from_home: Option<u32>,
    /// Education level [1-5, default 1]
    #[arg(long)]
    education: Option<u32>,
    /// Employee number [1-1000, default 1]
    #[arg(long)]
    employee_number: Option<u32>,
    /// Environment satisfaction [1-4, default 3]
    #[arg(long)]
    environment_satisfaction: Option<u32>,
    /// Hourly rate [50-200, default 100]
    #[arg(long)]
    hourly_rate: Option<u32>,
    /// Job involvement [1-4, default 3]
    #[arg(long)]
    job_involvement: Option<u32>,
    /// Job level [1-5, default 1]
    #[arg(long)]
    job_level: Option<u32>,
    /// Job satisfaction [1-4, default 3]
    #[arg(long)]
    job_satisfaction: Option<u32>,
    /// Monthly income [1000-20000, default 5000]
    #[arg(long)]
    monthly_income: Option<u32>,
    /// Monthly rate [1000-20000, default 5000]
    #[arg(long)]
    monthly_rate: Option<u32>,
    /// Number of companies worked at [0-10, default 1]
    #[arg(long)]
    num_companies_worked: Option<u32>,
    /// Percent salary hike [0-50, default 10]
    #[arg(long)]
    percent_salary_hike: Option<u32>,
    /// Performance rating [1-4, default 3]
    #[arg(long)]
    performance_rating: Option<u32>,
    /// Relationship satisfaction [1-4, default 3]
    #[arg(long)]
    relationship_satisfaction: Option<u32>,
    /// Stock option level [0-3, default 0]
    #[arg(long)]
    stock_option_level: Option<u32>,
    /// Total working years [0-40, default 5]
    #[arg(long)]
    total_working_years: Option<u32>,
    /// Trainings last year [0-10, default 2]
    #[arg(long)]
    training_times_last_year: Option<u32>,
    /// Work-life balance [1-4, default 3]
    #[arg(long)]
    work_life_balance: Option<u32>,
    /// Years at company [0-40, default 3]
    #[arg(long)]
    years_at_company: Option<u32>,
    /// Years in current role [0-20, default 2]
    #[arg(long)]
    years_in_current_role: Option<u32>,
    /// Years since last promotion [0-15, default 1]
    #[arg(long)]
    years_since_last_promotion: Option<u32>,
    /// Years with current manager [0-20, default 2]
    #[arg(long)]
    years_with_curr_manager: Option<u32>,
    /// Male or Female [default Male]
    #[arg(long)]
    gender: Option<Gender>,
    /// Yes or No [default Yes]
    #[arg(long)]
    over_time: Option<OverTime>,
    /// Non-Travel, Travel_Rarely or Travel_Frequently [default Non-Travel]
    #[arg(long)]
    business_travel: Option<BusinessTravel>,
    /// Sales, Research & Development or Human Resources [default Sales]
    #[arg(long)]
    department: Option<Department>,
    /// Life Sciences, Medical, Marketing, Other, Technical Degree or Human Resources [default Life Sciences]
    #[arg(long)]
    education_field: Option<EducationField>,
    /// Job role, e.g. Manager or Sales Executive [default Human Resources]
    #[arg(long)]
    job_role: Option<JobRole>,
    /// Married, Single or Divorced [default Married]
    #[arg(long)]
    marital_status: Option<MaritalStatus>,
}

macro_rules! apply_overrides {
    ($args:expr, $profile:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $args.$field {
                $profile.$field = value;
            }
        )+
    };
}

impl ProfileArgs {
    fn apply(&self, profile: &mut EmployeeProfile) {
        apply_overrides!(self, profile;
            age, daily_rate, distance_from_home, education, employee_number,
            environment_satisfaction, hourly_rate, job_involvement, job_level,
            job_satisfaction, monthly_income, monthly_rate, num_companies_worked,
            percent_salary_hike, performance_rating, relationship_satisfaction,
            stock_option_level, total_working_years, training_times_last_year,
            work_life_balance, years_at_company, years_in_current_role,
            years_since_last_promotion, years_with_curr_manager,
            gender, over_time, business_travel, department, education_field,
            job_role, marital_status,
        );
    }
}

fn load_profile(args: &Args) -> Result<EmployeeProfile> {
    let mut profile = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile from {}", path.display()))?;
            EmployeeProfile::from_json(&json)
                .with_context(|| format!("Invalid profile in {}", path.display()))?
        }
        None => EmployeeProfile::default(),
    };
    args.profile.apply(&mut profile);
    Ok(profile)
}

async fn load_classifier(args: &Args) -> Result<Classifier> {
    let config = RuntimeConfig {
        intra_threads: args.intra_threads,
        ..Default::default()
    };
    let builder = Classifier::builder().with_runtime_config(config);

    let builder = if let Some(path) = &args.model {
        builder.with_model_file(path)?
    } else {
        let manager = ModelManager::new_default()
            .context("Failed to create model directory")?;

        match (&args.model_url, &args.model_sha256) {
            (Some(url), Some(hash)) => {
                let info = ModelInfo::new(&args.model_name, url, hash);
                if args.fresh {
                    info!("Fresh download requested - removing any existing model file...");
                    manager.remove_download(&info.name)?;
                }
                manager.ensure_model_downloaded(&info).await
                    .with_context(|| format!("Failed to download model '{}'", info.name))?;
                builder.with_managed_model(&manager, &info)?
            }
            _ => {
                let path = manager.require_model(&args.model_name)
                    .with_context(|| format!(
                        "No model found in {}; pass --model or --model-url with --model-sha256",
                        manager.models_dir().display()
                    ))?;
                builder.with_model_file(path)?
            }
        }
    };

    Ok(builder.build()?)
}

fn print_prediction(prediction: &Prediction, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(prediction)?);
    } else {
        println!("Prediction");
        println!("  {}", prediction.label);
        println!("Probability of Leaving");
        println!("  {}", prediction.probability_display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let profile = load_profile(&args)?;

    let start_time = Instant::now();
    info!("Loading classifier...");
    let classifier = load_classifier(&args).await?;
    let model_info = classifier.info();
    info!(
        "Loaded {} ({} features, input '{}') in {:.2?}",
        model_info.model_path,
        model_info.num_features,
        model_info.input_name,
        start_time.elapsed()
    );

    let prediction = predict_profile(&classifier, &profile)?;
    print_prediction(&prediction, args.json)?;

    info!("Done in {:.2?} (schema width {})", start_time.elapsed(), classifier.schema().len());
    Ok(())
}
