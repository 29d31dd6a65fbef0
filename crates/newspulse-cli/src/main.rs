mod analyze;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newspulse-cli")]
#[command(about = "NewsPulse news sentiment command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze recent news sentiment for a company
    Analyze {
        /// Company name to search for
        company: String,

        /// Base URL of the NewsPulse API server
        #[arg(long, env = "NEWSPULSE_SERVER_URL", default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Bearer token for the API
        #[arg(long, env = "NEWSPULSE_API_KEY")]
        api_key: Option<String>,

        /// Directory for the JSON report and audio files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Seconds to wait for the analysis to finish
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze {
            company,
            server,
            api_key,
            out_dir,
            timeout_secs,
        }) => {
            let options = analyze::AnalyzeOptions {
                server,
                api_key,
                out_dir,
                timeout_secs,
            };
            analyze::run_analyze(&company, &options).await?;
        }
        None => println!("newspulse-cli ready; try `newspulse-cli analyze <COMPANY>`"),
    }

    Ok(())
}
