use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calcatime_cli::commands::report::{self, OutputFormat, ReportOptions};
use calcatime_cli::provider::{CalendarUri, Credentials, ProviderError, open_source};
use calcatime_cli::{Cli, Config};
use calcatime_core::GroupingSpec;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; stdout is reserved for report data
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_cli(&cli);
    tracing::debug!(?config, "loaded configuration");

    let uri: CalendarUri = config
        .calendar
        .as_deref()
        .ok_or(ProviderError::MissingCalendar)?
        .parse::<CalendarUri>()
        .context("invalid calendar URI")?;
    let credentials = Credentials {
        domain: config.domain.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
    };
    let source = open_source(&uri, &credentials)?;

    let grouping = match config.default_grouping.as_deref() {
        Some(spec) => spec
            .parse::<GroupingSpec>()
            .with_context(|| format!("invalid grouping '{spec}'"))?,
        None => GroupingSpec::default_for(uri.provider.capabilities().supports_categories),
    };

    let format = if cli.output.json {
        OutputFormat::Json
    } else {
        OutputFormat::Csv
    };

    let options = ReportOptions {
        timespan: cli.timespan.iter().map(|t| t.to_lowercase()).collect(),
        grouping,
        include_zero: config.include_zero,
    };

    let today = Local::now().date_naive();
    let output = report::run(source.as_ref(), &options, format, today)?;
    println!("{}", output.trim_end());

    Ok(())
}
