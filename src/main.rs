use anyhow::{bail, Context, Result};
use certifile::identity::format_issue_date;
use certifile::{
    config, file_ops, CertificateDetails, CertificateRequest, CertificateStore, CheckOutcome,
    ValidationReport,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Certificate issuer and validator
#[derive(Parser, Debug)]
#[command(name = "certifile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Certificate store file (defaults to $CERT_DB_PATH or data/certificates_db.json)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log filter, e.g. `info` or `certifile=debug`
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a certificate and print its identifier and verification code
    Issue(IssueArgs),

    /// Check an identifier and optional verification code
    Validate {
        #[arg(long)]
        id: String,

        #[arg(long)]
        code: Option<String>,

        /// Print the validation result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the stored record for an identifier
    Show {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args, Debug)]
struct IssueArgs {
    /// Read fields from a `key: value` input file instead of flags
    #[arg(short, long, conflicts_with_all = ["student", "course"])]
    input: Option<PathBuf>,

    #[arg(long, required_unless_present = "input")]
    student: Option<String>,

    #[arg(long, required_unless_present = "input")]
    course: Option<String>,

    /// `YYYY-MM-DD` or `DD Month, YYYY`; defaults to today
    #[arg(long)]
    date: Option<String>,

    #[arg(long, default_value = "")]
    instructor: String,

    #[arg(long, default_value = "")]
    instructor_title: String,

    #[arg(long, default_value = "")]
    co_instructor: String,

    #[arg(long, default_value = "")]
    co_instructor_title: String,

    #[arg(long, default_value = "")]
    organization: String,

    #[arg(long, default_value = "")]
    place: String,

    #[arg(long = "type", default_value = "")]
    certification_type: String,

    #[arg(long, default_value = "")]
    hours: String,

    /// Print `{certificate_id, verification_code}` as JSON
    #[arg(long)]
    json: bool,
}

impl IssueArgs {
    fn into_request(self) -> Result<CertificateRequest> {
        if let Some(path) = &self.input {
            return file_ops::read_input_file(path)
                .with_context(|| format!("Failed to read input file {}", path.display()));
        }
        let (Some(student), Some(course)) = (self.student, self.course) else {
            bail!("--student and --course are required without --input");
        };
        let date = self
            .date
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
        Ok(CertificateRequest {
            subject_name: student,
            course_name: course,
            issue_date: date,
            details: CertificateDetails {
                instructor: self.instructor,
                instructor_title: self.instructor_title,
                co_instructor: self.co_instructor,
                co_instructor_title: self.co_instructor_title,
                organization: self.organization,
                venue: self.place,
                category: self.certification_type,
                duration: self.hours,
            },
        })
    }
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let store = CertificateStore::new(cli.db.unwrap_or_else(config::db_path));

    match cli.command {
        Commands::Issue(args) => {
            let json = args.json;
            let request = args.into_request()?;
            let issued = certifile::issue(&store, request).with_context(|| {
                format!("Failed to write certificate store {}", store.path().display())
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issued)?);
            } else {
                println!("Certificate issued successfully!");
                println!("Validation Information:");
                println!("  Certificate ID: {}", issued.certificate_id);
                println!("  Verification Code: {}", issued.verification_code);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { id, code, json } => {
            let outcome = certifile::check(&store, &id, code.as_deref()).with_context(|| {
                format!("Failed to read certificate store {}", store.path().display())
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ValidationReport::from(&outcome))?);
            } else {
                print_outcome(&outcome);
            }
            Ok(if outcome.is_valid() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Show { id } => {
            let record = store.get(&id).with_context(|| {
                format!("Failed to read certificate store {}", store.path().display())
            })?;
            match record {
                Some(r) => {
                    println!("{}", serde_json::to_string_pretty(&r)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("{}", CheckOutcome::NotFound);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn print_outcome(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Valid(r) => {
            println!("Certificate is valid!");
            println!("Certificate Details:");
            println!("  Student: {}", r.subject_name);
            println!("  Course: {}", r.course_name);
            println!("  Issue Date: {}", format_issue_date(Some(&r.issue_date)));
            if !r.details.instructor.is_empty() {
                println!("  Instructor: {}", r.details.instructor);
            }
            if !r.details.duration.is_empty() {
                println!("  Hours: {}", r.details.duration);
            }
        }
        other => println!("Certificate validation failed: {other}"),
    }
}
