//! coldwatch — cold-start latency statistics for a Lambda function.
//!
//! Submits the fixed cold-start Logs Insights query over the function's
//! log group, waits for the job to finish, and prints the per-memory-size
//! statistics as a table or as JSON.

use clap::Parser;
use tracing::info;

use coldwatch_insights::{AnalysisRequest, CloudWatchLogsClient, InsightsConfig, QueryRunner};

/// Query cold-start latency statistics for a Lambda function.
#[derive(Parser, Debug)]
#[command(name = "coldwatch", version, about)]
struct Cli {
    /// Lambda function name; its log group resolves to /aws/lambda/<name>.
    #[arg(long, env = "COLDWATCH_FUNCTION_NAME")]
    function_name: String,

    /// Start of the analysis window (RFC3339, "YYYY-MM-DD HH:MM:SS",
    /// date-only, or epoch seconds).
    #[arg(long, env = "COLDWATCH_START_TIME")]
    start_time: String,

    /// Print the result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coldwatch_core::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = InsightsConfig::from_env();
    info!(
        region = %config.region,
        function = %cli.function_name,
        "coldwatch starting"
    );

    let client = CloudWatchLogsClient::new(&config).await;
    let runner = QueryRunner::with_policy(client, config.retry_policy());

    let request = AnalysisRequest {
        start_time: cli.start_time,
        function_name: cli.function_name,
    };
    let analysis = runner.run(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analysis);
    }

    Ok(())
}
