//! Zuper connector sync driver.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use zuper_application::{ConnectorSettings, SyncContext, ZuperConnector, run_sync_cycle};
use zuper_core::{AppError, AppResult};
use zuper_infrastructure::{DEFAULT_ZUPER_API_URL, ZuperHttpClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Sync,
    Validate,
    Metadata,
}

impl Command {
    fn parse(argument: Option<&str>) -> AppResult<Self> {
        match argument {
            None | Some("sync") => Ok(Self::Sync),
            Some("validate") => Ok(Self::Validate),
            Some("metadata") => Ok(Self::Metadata),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected sync, validate or metadata"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SyncConfig {
    api_url: String,
    api_key: String,
    page_size: u32,
    http_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = Command::parse(env::args().nth(1).as_deref())?;
    let config = SyncConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let client = ZuperHttpClient::new(&config.api_url, config.api_key.as_str(), http_client)?;
    info!(
        api_url = %client.base_url(),
        page_size = config.page_size,
        command = ?command,
        "zuper-sync started"
    );
    let connector = ZuperConnector::with_settings(
        Arc::new(client),
        ConnectorSettings {
            refresh_page_size: config.page_size,
            ..ConnectorSettings::default()
        },
    );

    let ctx = SyncContext::new();
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            signal_ctx.cancel();
        }
    });

    let output = match execute(command, &connector, &ctx, config.page_size).await {
        Ok(output) => output,
        Err(failure) if failure.is_cancelled() => {
            warn!(error = %failure, "zuper-sync interrupted before completion");
            return Err(failure);
        }
        Err(failure) => {
            error!(error = %failure, command = ?command, "zuper-sync failed");
            return Err(failure);
        }
    };
    println!("{output}");

    Ok(())
}

async fn execute(
    command: Command,
    connector: &ZuperConnector,
    ctx: &SyncContext,
    page_size: u32,
) -> AppResult<String> {
    match command {
        Command::Metadata => to_json(&connector.metadata()),
        Command::Validate => {
            let annotations = connector.validate(ctx).await?;
            info!("zuper credentials validated");
            to_json(&serde_json::json!({
                "valid": true,
                "rate_limit": annotations.rate_limit(),
            }))
        }
        Command::Sync => {
            let summary = run_sync_cycle(connector, ctx, page_size).await?;
            to_json(&summary)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))
}

impl SyncConfig {
    fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_url = lookup("ZUPER_API_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ZUPER_API_URL.to_owned());
        let api_key = required_env(&lookup, "ZUPER_API_KEY")?;
        let page_size = parse_env(&lookup, "ZUPER_PAGE_SIZE", 50_u32)?;
        let http_timeout_secs = parse_env(&lookup, "ZUPER_HTTP_TIMEOUT_SECS", 30_u64)?;

        if page_size == 0 {
            return Err(AppError::Validation(
                "ZUPER_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "ZUPER_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            api_key,
            page_size,
            http_timeout_secs,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
