mod config;

use clap::Parser;
use config::{Config, ConfigError, LoggingConfig, MetricsConfig};
use http::Request;
use http::header::HOST;
use metrics_exporter_statsd::StatsdBuilder;
use sentry_dsn::config::{ExtractorConfig, ValidationError};
use sentry_dsn::{Dsn, DsnError, DsnExtractor};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const METRICS_PREFIX: &str = "dsn_extract";

/// Recover the client DSN of a Sentry ingestion request
#[derive(Parser)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Request target, absolute (`https://host/api/1/store/`) or origin form (`/api/1/store/`)
    #[arg(long)]
    url: String,
    /// Value of the auth header, e.g. `Sentry sentry_key=...`
    #[arg(long)]
    auth: Option<String>,
    /// Transport-level host of the request
    #[arg(long)]
    host: Option<String>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid extractor config: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),
    #[error(transparent)]
    Extract(#[from] DsnError),
    #[error("could not serialize DSN: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid sentry DSN: {0}")]
    SentryDsn(#[from] sentry::types::ParseDsnError),
    #[error("statsd error: {0}")]
    Statsd(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    MetricsRecorder,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let _sentry = match init_logging(config.common.logging.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(metrics_config) = &config.common.metrics
        && let Err(e) = init_metrics(metrics_config)
    {
        tracing::warn!(error = %e, "Metrics disabled");
    }

    match run(&cli, &config.extractor) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, url = %cli.url, "Could not extract DSN");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &ExtractorConfig) -> Result<String, CliError> {
    let extractor = DsnExtractor::new(config)?;
    let dsn = extract(
        &extractor,
        config,
        &cli.url,
        cli.auth.as_deref(),
        cli.host.as_deref(),
    )?;
    Ok(serde_json::to_string_pretty(&dsn)?)
}

fn extract(
    extractor: &DsnExtractor,
    config: &ExtractorConfig,
    url: &str,
    auth: Option<&str>,
    host: Option<&str>,
) -> Result<Dsn, CliError> {
    let mut builder = Request::builder().method("POST").uri(url);
    if let Some(host) = host {
        builder = builder.header(HOST, host);
    }
    if let Some(auth) = auth {
        builder = builder.header(config.auth_header.as_str(), auth);
    }
    let request = builder.body(())?;

    Ok(extractor.from_request(&request)?)
}

fn init_logging(
    config: Option<&LoggingConfig>,
) -> Result<Option<sentry::ClientInitGuard>, CliError> {
    let level = config.and_then(|c| c.level.as_deref()).unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let guard = match config.and_then(|c| c.sentry_dsn.as_deref()) {
        Some(dsn) => Some(sentry::init(sentry::ClientOptions {
            dsn: Some(dsn.parse()?),
            release: sentry::release_name!(),
            ..Default::default()
        })),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(guard.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .init();

    Ok(guard)
}

fn init_metrics(config: &MetricsConfig) -> Result<(), CliError> {
    let recorder = StatsdBuilder::from(config.statsd_host.clone(), config.statsd_port)
        .build(Some(METRICS_PREFIX))?;
    metrics::set_global_recorder(recorder).map_err(|_| CliError::MetricsRecorder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "4784fbc50de2473f9977cfce8a9adce5";

    fn cli(url: &str, auth: Option<&str>, host: Option<&str>) -> Cli {
        Cli {
            config: None,
            url: url.to_string(),
            auth: auth.map(str::to_string),
            host: host.map(str::to_string),
        }
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from([
            "dsn-extract",
            "--url",
            "/api/1/store/",
            "--host",
            "sentry.io",
        ])
        .unwrap();
        assert_eq!(cli.url, "/api/1/store/");
        assert_eq!(cli.host.as_deref(), Some("sentry.io"));
        assert!(cli.auth.is_none());

        assert!(Cli::try_parse_from(["dsn-extract"]).is_err());
    }

    #[test]
    fn test_run_prints_json() {
        let cli = cli(
            "/api/1234/store/",
            Some(&format!("Sentry sentry_version=7, sentry_key={KEY}")),
            Some("o1.ingest.sentry.io"),
        );
        let json = run(&cli, &ExtractorConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["url"],
            format!("https://{KEY}@o1.ingest.sentry.io/1234")
        );
        assert_eq!(value["project_id"], "1234");
    }

    #[test]
    fn test_extracted_dsn_is_usable_by_sdk() {
        let config = ExtractorConfig::default();
        let extractor = DsnExtractor::new(&config).unwrap();
        let dsn = extract(
            &extractor,
            &config,
            &format!("https://sentry.io/api/42/envelope/?sentry_key={KEY}&sentry_secret={KEY}"),
            None,
            None,
        )
        .unwrap();

        let parsed: sentry::types::Dsn = dsn.url().unwrap().parse().unwrap();
        assert_eq!(parsed.public_key(), KEY);
        assert_eq!(parsed.secret_key(), Some(KEY));
        assert_eq!(parsed.host(), "sentry.io");
        assert_eq!(parsed.project_id().to_string(), "42");
    }

    #[test]
    fn test_errors() {
        let err = run(&cli("/api/1/store/", None, Some("sentry.io")), &ExtractorConfig::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Extract(DsnError::MissingCredentials)));

        let err = run(
            &cli(&format!("/nope/?sentry_key={KEY}"), None, None),
            &ExtractorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Extract(DsnError::MissingProjectId)));

        let config = ExtractorConfig {
            auth_header: "bad header".to_string(),
            default_host: None,
        };
        let err = run(&cli("/api/1/store/", None, None), &config).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_invalid_sentry_dsn() {
        let config = LoggingConfig {
            level: None,
            sentry_dsn: Some("not a dsn".to_string()),
        };
        assert!(matches!(
            init_logging(Some(&config)),
            Err(CliError::SentryDsn(_))
        ));
    }
}
