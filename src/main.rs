use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use atlas_advisor::{Advisor, AdvisorConfig, ConfigOverrides, DigestTransport, TracingReporter};

#[derive(Parser, Debug)]
#[command(name = "atlas-advisor")]
#[command(about = "Report slow queries and suggested indexes from the Atlas Performance Advisor")]
struct Args {
    /// Config file with project and key settings (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Atlas project (group) id
    #[arg(short, long)]
    project_id: Option<String>,

    /// Public API key
    #[arg(long)]
    public_key: Option<String>,

    /// Private API key (prefer ATLAS_ADVISOR_PRIVATE_KEY)
    #[arg(long)]
    private_key: Option<String>,

    /// Look back this many hours [default: 24]
    #[arg(short, long)]
    since: Option<u32>,

    /// Atlas API root
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds [default: 60]
    #[arg(long)]
    timeout: Option<u32>,

    /// Fetch slow queries and suggested indexes concurrently
    #[arg(long)]
    concurrent: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_id: self.project_id.clone(),
            public_key: self.public_key.clone(),
            private_key: self.private_key.clone(),
            since_hours: self.since,
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            concurrent: self.concurrent.then_some(true),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config = AdvisorConfig::load(args.config.as_deref(), args.overrides())?;
    info!(
        project_id = %config.project_id,
        since_hours = config.since_hours,
        "Querying Performance Advisor"
    );

    let transport = DigestTransport::builder()
        .credentials(&config.public_key, &config.private_key)
        .timeout(config.timeout())
        .build()?;
    let advisor = Advisor::new(
        Arc::new(transport),
        Arc::new(TracingReporter),
        &config.base_url,
    );

    if let Err(e) = advisor
        .run(&config.project_id, config.since_hours, config.fetch_mode())
        .await
    {
        error!(error = %e, "Performance Advisor run aborted");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
