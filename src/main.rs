use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use underwriter::application::underwriting::UnderwritingService;
use underwriter::config::InferenceEnvConfig;
use underwriter::domain::applicant::{ApplicantContact, ApplicantRecord, LocaleNumber};
use underwriter::domain::emi::{EmiCalculator, EmiOutcome, round_money};
use underwriter::infrastructure::logging::init_tracing;
use underwriter::infrastructure::{ModelStore, ReportWriter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Loan approval prediction and EMI calculation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one application against the trained model
    Assess(AssessArgs),
    /// Compute the equal monthly installment of a loan
    Emi(EmiArgs),
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory for the text/JSON report (overrides REPORT_DIR)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "")]
    full_name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    /// CIBIL score (300-900)
    #[arg(long, default_value_t = 750.0)]
    cibil_score: f64,

    /// Annual income (INR)
    #[arg(long, default_value_t = 5_000_000.0)]
    income_annum: f64,

    /// Loan amount (INR)
    #[arg(long, default_value_t = 2_000_000.0)]
    loan_amount: f64,

    /// Loan term in months
    #[arg(long, default_value_t = 24.0)]
    loan_term: f64,

    /// Annual interest rate in percent; "7,5" is accepted. Defaults to DEFAULT_INTEREST_RATE
    #[arg(long)]
    loan_interest: Option<String>,

    /// Loan as a percentage of income; "20,0" is accepted
    #[arg(long, default_value = "20.0")]
    loan_percent_income: String,

    #[arg(long, default_value_t = 1.0)]
    active_loans: f64,

    /// Men | Women
    #[arg(long, default_value = "Men")]
    gender: String,

    /// Single | Married
    #[arg(long, default_value = "Married")]
    marital_status: String,

    /// employed | self employed | unemployed | student
    #[arg(long, default_value = "employed")]
    employee_status: String,

    /// MORTGAGE | OWN | RENT
    #[arg(long, default_value = "OWN")]
    residence_type: String,

    /// Vehicle | Personal | Home Renovation | Education | Medical | Other
    #[arg(long, default_value = "Vehicle")]
    loan_purpose: String,
}

#[derive(Args, Debug)]
struct EmiArgs {
    /// Principal (INR)
    #[arg(long)]
    principal: f64,

    /// Annual interest rate in percent (defaults to DEFAULT_INTEREST_RATE)
    #[arg(long)]
    rate: Option<f64>,

    /// Tenure in months
    #[arg(long)]
    tenure: f64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = InferenceEnvConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    match cli.command {
        Command::Assess(args) => run_assess(args, &config),
        Command::Emi(args) => {
            run_emi(&args, &config);
            Ok(())
        }
    }
}

fn run_assess(args: AssessArgs, config: &InferenceEnvConfig) -> Result<()> {
    let model_path = args.model.clone().unwrap_or_else(|| config.model_path.clone());
    let store = ModelStore::new(model_path);

    // Without a model there is nothing to serve.
    let model = store
        .load()
        .with_context(|| format!("Cannot start without a model at {:?}", store.path()))?;
    if let Some(evaluation) = model.evaluation() {
        info!("Model held-out accuracy: {:.4}", evaluation.accuracy);
    }
    let service = UnderwritingService::new(Arc::new(model));

    let contact = ApplicantContact {
        full_name: args.full_name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
    };
    let record = ApplicantRecord {
        cibil_score: args.cibil_score,
        income_annum: args.income_annum,
        loan_amount: args.loan_amount,
        loan_term: args.loan_term,
        loan_interest: args
            .loan_interest
            .clone()
            .map(LocaleNumber::from)
            .unwrap_or(LocaleNumber::Value(config.default_interest_rate)),
        loan_percent_income: LocaleNumber::from(args.loan_percent_income.clone()),
        active_loans: args.active_loans,
        gender: args.gender,
        marital_status: args.marital_status,
        employee_status: args.employee_status,
        residence_type: args.residence_type,
        loan_purpose: args.loan_purpose,
    };

    let assessment = match service.assess(&contact, &record) {
        Ok(a) => a,
        Err(e) => {
            error!("Application could not be assessed: {}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment.report)?);
    } else {
        print!("{}", assessment.report.render_text());
    }

    if let Some(dir) = args.report_dir.or_else(|| config.report_dir.clone()) {
        let (text, json) = ReportWriter::new(dir).write(&assessment.report)?;
        info!("Report saved to {:?} and {:?}", text, json);
    }

    Ok(())
}

fn run_emi(args: &EmiArgs, config: &InferenceEnvConfig) {
    let rate = args.rate.unwrap_or(config.default_interest_rate);
    match EmiCalculator::calculate(args.principal, rate, args.tenure) {
        EmiOutcome::Calculated(b) => {
            println!("Monthly EMI (INR):    {}", money_or_not_calculated(b.monthly_rounded()));
            println!("Total Payable (INR):  {}", money_or_not_calculated(round_money(b.total_payable)));
            println!("Total Interest (INR): {}", money_or_not_calculated(round_money(b.total_interest)));
        }
        EmiOutcome::NotCalculated { reason } => {
            println!("Monthly EMI (INR):    not calculated ({})", reason);
        }
    }
}

fn money_or_not_calculated(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "not calculated".to_string(), |a| format!("{:.2}", a))
}
