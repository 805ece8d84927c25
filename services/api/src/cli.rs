use crate::server;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use medlife::error::AppError;
use medlife::workflows::screening::{
    select_questions, Answer, Biometrics, CategoryBucketing, RiskEvaluator,
};
use medlife::workflows::subjects::age_on;

#[derive(Parser, Debug)]
#[command(
    name = "MedLife",
    about = "Run the MedLife health screening service or try the questionnaire offline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the screening questions that apply to an age
    Questions(QuestionsArgs),
    /// Evaluate a set of yes answers without storing anything
    Screen(ScreenArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Do not start the background medication and weather reminders
    #[arg(long)]
    pub(crate) no_reminders: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// Age in whole years
    #[arg(long, conflicts_with = "birth_date")]
    pub(crate) age: Option<u32>,
    /// Birth date (YYYY-MM-DD); age is computed against today
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) birth_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Age in whole years
    #[arg(long)]
    pub(crate) age: u32,
    #[arg(long)]
    pub(crate) weight_kg: f64,
    /// Height in centimetres
    #[arg(long)]
    pub(crate) height_cm: f64,
    /// Question ids answered yes, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) yes: Vec<u32>,
    /// Answer bucketing rule: catalog or id_range
    #[arg(long, default_value = "catalog", value_parser = parse_bucketing)]
    pub(crate) bucketing: CategoryBucketing,
}

fn parse_bucketing(raw: &str) -> Result<CategoryBucketing, String> {
    CategoryBucketing::parse(raw).ok_or_else(|| format!("unknown bucketing '{raw}'"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Questions(args) => {
            print_questions(args);
            Ok(())
        }
        Command::Screen(args) => {
            print_screening(args);
            Ok(())
        }
    }
}

fn print_questions(args: QuestionsArgs) {
    let today = Local::now().date_naive();
    let age = match (args.age, args.birth_date) {
        (Some(age), _) => age,
        (None, Some(birth_date)) => age_on(birth_date, today),
        (None, None) => 0,
    };

    let questions = select_questions(age);
    println!("Screening questions for age {age} ({} total)", questions.len());
    for question in questions {
        println!(
            "  [{:>2}] {:<15} {}",
            question.id,
            question.category.label(),
            question.text
        );
    }
}

fn print_screening(args: ScreenArgs) {
    let answers: Vec<Answer> = args.yes.iter().copied().map(Answer::yes).collect();
    let biometrics = Biometrics {
        age_years: args.age,
        weight_kg: args.weight_kg,
        height_cm: args.height_cm,
    };

    let findings = RiskEvaluator::new(args.bucketing).evaluate(&answers, &biometrics);
    let bmi = biometrics.bmi();
    if bmi.is_finite() {
        println!("BMI: {bmi:.1}");
    } else {
        println!("BMI: unavailable (height must be above zero)");
    }

    if findings.is_empty() {
        println!("No elevated risk detected.");
        return;
    }

    println!("Findings:");
    for finding in findings {
        println!(
            "  {} ({}) -> {}: {}",
            finding.disease,
            finding.risk_level.label(),
            finding.referral_specialty,
            finding.recommendation
        );
    }
}
