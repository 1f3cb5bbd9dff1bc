use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use math_guard_rs::api::server::GuardServer;
use math_guard_rs::{GuardConfig, Outcome, Pipeline};

const DEFAULT_INPUT: &str = "how can you explain 2x + 3 = 11?";

#[derive(Debug, Parser)]
#[command(name = "math-guard", version, about = "Guardrail-gated math solver")]
struct Cli {
    /// Model identifier sent to the endpoint
    #[arg(long, global = true, env = "MATH_GUARD_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long, global = true, env = "MATH_GUARD_BASE_URL")]
    base_url: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one question through the pipeline and print the result
    Run {
        #[arg(default_value = DEFAULT_INPUT)]
        input: String,
    },
    /// Serve the pipeline over HTTP
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = GuardConfig::from_env().context("loading configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let pipeline = Pipeline::new(&config).context("building pipeline")?;

    match cli.command.unwrap_or(Command::Run {
        input: DEFAULT_INPUT.to_string(),
    }) {
        Command::Run { input } => {
            let outcome = pipeline.process(&input).await?;
            match &outcome {
                Outcome::Accepted { .. } => println!("✅ {}", outcome),
                Outcome::BlockedByInput { .. } => println!("🚫 {}", outcome),
                Outcome::BlockedByOutput { .. } => println!("⚠️ {}", outcome),
            }
        }
        Command::Serve { port } => {
            let server = GuardServer::new(port, Arc::new(pipeline));
            server.start().await.map_err(anyhow::Error::msg)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "math_guard_rs=info,warn",
        1 => "math_guard_rs=debug,info",
        _ => "math_guard_rs=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}
