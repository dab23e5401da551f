use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::service::parse_symptoms;
use triage_core::{AccessContext, ConfigValues, CoreConfig, Removal, TriageService};

use api_shared::ApiKeyGate;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Walk-in triage intake CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score symptoms without booking
    Assess {
        /// Reported symptoms
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Book a walk-in case
    Book {
        /// Subject name
        name: String,
        /// Reported symptoms
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Print the triage queue, most urgent first
    Queue {
        /// Doctor API key
        #[arg(long)]
        token: String,
    },
    /// Mark a case as consulted
    Consult {
        /// Case id
        id: i64,
        /// Doctor API key
        #[arg(long)]
        token: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CoreConfig::resolve(ConfigValues::from_env())?;
    let gate = ApiKeyGate::from_env_value(std::env::var("TRIAGE_API_KEY").ok());
    let service = TriageService::from_config(&config, Arc::new(gate))?;

    match cli.command {
        Commands::Assess { symptoms } => {
            let assessment = service.assess(&parse_symptoms(symptoms)?);
            println!(
                "Score: {}, Risk: {}, Priority: {}",
                assessment.severity_score, assessment.risk_level, assessment.priority
            );
        }
        Commands::Book { name, symptoms } => {
            let booking = service.book_case(&name, symptoms)?;
            println!(
                "Booked case {} (Risk: {}, Priority: {})",
                booking.id, booking.assessment.risk_level, booking.assessment.priority
            );
        }
        Commands::Queue { token } => {
            let cases = service.list_queue(&AccessContext::with_token(token))?;
            if cases.is_empty() {
                println!("No cases waiting.");
            } else {
                for case in cases {
                    let symptoms: Vec<&str> = case.symptoms.iter().map(|s| s.as_str()).collect();
                    println!(
                        "ID: {}, Priority: {}, Risk: {}, Score: {}, Name: {}, Symptoms: {}",
                        case.id,
                        case.priority,
                        case.risk_level,
                        case.severity_score,
                        case.subject_name,
                        symptoms.join(", ")
                    );
                }
            }
        }
        Commands::Consult { id, token } => {
            match service.remove_case(id, &AccessContext::with_token(token))? {
                Removal::Removed => println!("Case {} marked as consulted", id),
                Removal::AlreadyAbsent => println!("Case {} is not in the queue", id),
            }
        }
    }

    Ok(())
}
