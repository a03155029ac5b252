//! eir: one-shot prediction CLI.
//!
//! Loads the same configuration and artifacts as eird and runs them
//! locally, without a server.

use std::io::{self, IsTerminal, Read};

use clap::{Parser, Subcommand};

use eir::config::Config;

/// Eir CLI
#[derive(Parser)]
#[command(name = "eir")]
#[command(version = eir::PKG_VERSION)]
#[command(about = "Predict diseases from symptom text")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "EIR_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict a disease from symptom text
    Predict {
        /// Symptom text (or omit to read from stdin)
        text: Option<String>,
        /// Pretty-print the JSON result
        #[arg(short, long)]
        pretty: bool,
    },

    /// Load every artifact and report what was loaded
    Check,

    /// Show the precautions matched for a disease name
    Precautions {
        /// Disease name as the classifier labels it
        disease: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Predict { text, pretty } => {
            let text = resolve_text(text)?;
            let service = eir::loader::build_service(&config)?;
            let result = service.predict(&text)?;
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }

        Command::Check => {
            let service = eir::loader::build_service(&config)?;
            println!("eir {}", eir::version_string());
            println!(
                "encoder: {} ({} dims)",
                service.encoder().name(),
                service.encoder().dimensions()
            );
            println!(
                "classifier: {} ({} features, {} classes)",
                service.classifier().name(),
                service.classifier().expected_width(),
                service.classifier().num_classes()
            );
            println!("labels: {}", service.labels().len());
            println!(
                "precautions: {} rows (cutoff {})",
                service.precautions().len(),
                service.cutoff()
            );
        }

        Command::Precautions { disease } => {
            // Only the table is needed; skip loading the models.
            let table = eir::PrecautionTable::load(&config.precautions.path)?;
            match table.best_match(&disease) {
                Some((entry, score)) if score >= config.precautions.cutoff => {
                    println!("{} (score {score})", entry.disease);
                    for precaution in &entry.precautions {
                        println!("- {precaution}");
                    }
                }
                Some((entry, score)) => {
                    println!(
                        "best candidate '{}' scored {score}, below cutoff {}",
                        entry.disease, config.precautions.cutoff
                    );
                    println!("- {}", eir::NO_PRECAUTIONS);
                }
                None => println!("- {}", eir::NO_PRECAUTIONS),
            }
        }
    }

    Ok(())
}

/// Symptom text from the argument, or stdin when piped.
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    Err("predict: no input provided (pass text as argument or via stdin)".into())
}
