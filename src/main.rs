mod aws;
mod core;

use clap::Parser;
use tracing::debug;

use crate::core::config::ReportConfig;
use crate::core::handler::{self, Collaborators};

#[derive(Parser)]
#[command(
    name = "costwatch",
    about = "AWS daily cost and resource report notifier",
    version
)]
struct Cli {
    /// Lookback window in days (overrides DAYS_TO_CHECK)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// SNS topic ARN to publish to (overrides SNS_TOPIC_ARN)
    #[arg(long)]
    topic_arn: Option<String>,

    /// Print the report to stdout instead of publishing to SNS
    #[arg(long)]
    dry_run: bool,

    /// Emit the invocation result as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ReportConfig::from_env()?;
    if let Some(days) = cli.days {
        config.days = days;
    }
    if let Some(arn) = cli.topic_arn {
        config.topic_arn = Some(arn);
    }
    if cli.dry_run {
        // A dry run never publishes, so any placeholder destination works
        config
            .topic_arn
            .get_or_insert_with(|| "dry-run".to_string());
    }
    debug!(days = config.days, dry_run = cli.dry_run, "configuration resolved");

    let clients = aws::AwsClients::new().await;
    let stdout_notifier = aws::notify::StdoutNotifier;
    let deps = Collaborators {
        billing: &clients.billing,
        compute: &clients.compute,
        database: &clients.database,
        storage: &clients.storage,
        functions: &clients.functions,
        notifier: if cli.dry_run {
            &stdout_notifier
        } else {
            &clients.notifier
        },
    };

    let response = handler::run(&deps, &config, chrono::Utc::now()).await;

    if cli.json {
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", response.body);
    }

    if response.status_code != 200 {
        std::process::exit(1);
    }
    Ok(())
}
