//! Argument parsing and command dispatch.

use anyhow::anyhow;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use orbital_api_models::TargetOs;
use orbital_config::OrbitalConfig;
use orbital_telemetry::{LoggingConfig, init_logging};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::auth::{handle_login, handle_ok};
use crate::commands::features::{handle_features_get, handle_features_list};
use crate::commands::probe::{handle_probe, handle_query_create, handle_query_disable};
use crate::commands::results::{handle_results, handle_status};
use crate::commands::stock::handle_stock;
use crate::commands::webhook::{
    handle_webhook_create, handle_webhook_get, handle_webhook_list, handle_webhook_sendresult,
    handle_webhook_update,
};

const DEFAULT_EXPIRY_SECS: &str = "60";
const DEFAULT_POLL_SLEEP_SECS: &str = "5";
pub(crate) const MIN_POLL_WINDOW_SECS: u64 = 10;

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage(&err),
    };
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let result = match bootstrap(&cli, &trace_id) {
        Ok(ctx) => {
            dispatch(cli.command, &ctx)
                .instrument(info_span!("command", command = command_name, trace_id = %trace_id))
                .await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            debug!(command = command_name, error = ?err, "command failed");
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn report_usage(err: &clap::Error) -> i32 {
    // Help and version requests come back as errors from `try_parse`.
    if err.print().is_err() {
        eprintln!("{err}");
    }
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn bootstrap(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let mut config = OrbitalConfig::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.override_base_url(url)?;
    }
    config.debug |= cli.debug;
    config.insecure |= cli.insecure;

    init_logging(&LoggingConfig::for_cli(
        config.debug,
        config.log_format.as_deref(),
    ))
    .map_err(|err| CliError::failure(anyhow!("failed to initialise logging: {err}")))?;

    debug!(
        base_url = %config.base_url,
        insecure = config.insecure,
        timeout_secs = config.http_timeout.as_secs(),
        "configuration loaded"
    );
    AppContext::from_config(&config, trace_id)
}

async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Login => handle_login(ctx).await,
        Command::Ok => handle_ok(ctx).await,
        Command::Probe(args) => handle_probe(ctx, args).await,
        Command::Query(query) => match query {
            QueryCommand::Create(args) => handle_query_create(ctx, args).await,
            QueryCommand::Disable(args) => handle_query_disable(ctx, args).await,
        },
        Command::Results(args) => handle_results(ctx, args).await,
        Command::Status(args) => handle_status(ctx, args).await,
        Command::Stock => handle_stock(ctx).await,
        Command::Webhook(webhook) => match webhook {
            WebhookCommand::Create(args) => handle_webhook_create(ctx, args).await,
            WebhookCommand::Update(args) => handle_webhook_update(ctx, args).await,
            WebhookCommand::Get(args) => handle_webhook_get(ctx, args).await,
            WebhookCommand::List => handle_webhook_list(ctx).await,
            WebhookCommand::SendResult(args) => handle_webhook_sendresult(ctx, args).await,
        },
        Command::Features(features) => match features {
            FeaturesCommand::Get(args) => handle_features_get(ctx, args).await,
            FeaturesCommand::List => handle_features_list(ctx).await,
        },
    }
}

#[derive(Parser)]
#[command(
    name = "orbital",
    version,
    about = "Command-line client for the Orbital query service"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, help = "Service base URL (overrides ORBITAL_URL)")]
    api_url: Option<String>,
    #[arg(long, global = true, help = "Skip TLS certificate verification")]
    insecure: bool,
    #[arg(
        long,
        global = true,
        help = "Enable debug logging and request tracing"
    )]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in with the configured API key and print the session token
    Login,
    /// Print login information for the current session
    Ok,
    /// Submit an ad-hoc probe
    Probe(ProbeArgs),
    /// Manage scheduled queries
    #[command(subcommand)]
    Query(QueryCommand),
    /// Print result pages for a job
    Results(ResultsArgs),
    /// Summarise the first page of results for a job
    Status(StatusArgs),
    /// List the stock query catalog
    Stock,
    /// Manage saved webhooks
    #[command(subcommand)]
    Webhook(WebhookCommand),
    /// Inspect features
    #[command(subcommand)]
    Features(FeaturesCommand),
}

#[derive(Subcommand)]
#[allow(clippy::large_enum_variant)]
pub(crate) enum QueryCommand {
    /// Create a scheduled query
    Create(QueryCreateArgs),
    /// Disable a scheduled query
    Disable(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum WebhookCommand {
    /// Create a webhook
    Create(WebhookFields),
    /// Replace every field of a webhook
    Update(WebhookUpdateArgs),
    /// Show one webhook
    Get(IdArgs),
    /// List webhooks
    List,
    /// Re-send a stored result to a webhook
    #[command(name = "sendresult")]
    SendResult(SendResultArgs),
}

#[derive(Subcommand)]
pub(crate) enum FeaturesCommand {
    /// Show one feature
    Get(IdArgs),
    /// List features
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OsArg {
    Windows,
    Linux,
    Darwin,
}

impl From<OsArg> for TargetOs {
    fn from(value: OsArg) -> Self {
        match value {
            OsArg::Windows => Self::Windows,
            OsArg::Linux => Self::Linux,
            OsArg::Darwin => Self::Darwin,
        }
    }
}

/// Target selection shared by `probe` and `query create`.
#[derive(Args, Debug, Default)]
pub(crate) struct QueryTargetArgs {
    #[arg(help = "osquery SQL statements")]
    pub(crate) sql: Vec<String>,
    #[arg(long, value_delimiter = ',', help = "Per-statement names")]
    pub(crate) names: Vec<String>,
    #[arg(long, value_delimiter = ',', help = "Per-statement labels")]
    pub(crate) labels: Vec<String>,
    #[arg(
        long,
        default_value = DEFAULT_EXPIRY_SECS,
        value_parser = parse_non_negative,
        allow_hyphen_values = true,
        help = "Seconds until the probe expires"
    )]
    pub(crate) expiry: u64,
    #[arg(long, value_delimiter = ',', help = "Restrict to these node identifiers")]
    pub(crate) nodes: Vec<String>,
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        help = "Restrict to these operating systems"
    )]
    pub(crate) os: Vec<OsArg>,
    #[arg(long, help = "Stock query invocation: \"name key=value ...\"")]
    pub(crate) stock: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ProbeArgs {
    #[command(flatten)]
    pub(crate) target: QueryTargetArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QueryCreateArgs {
    #[command(flatten)]
    pub(crate) target: QueryTargetArgs,
    #[arg(
        long,
        value_parser = parse_non_negative,
        allow_hyphen_values = true,
        help = "Seconds between executions"
    )]
    pub(crate) interval: u64,
    #[arg(
        long = "postback",
        help = "Delivery target: \"URL [token [fingerprint [format [bucket region accesskey secretkey]]]]\""
    )]
    pub(crate) postbacks: Vec<String>,
    #[arg(long = "webhook", help = "Deliver results to a saved webhook")]
    pub(crate) webhooks: Vec<String>,
    #[arg(long, help = "Context returned with results: \"key=value,key2=value2\"")]
    pub(crate) context: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    #[arg(help = "Identifier")]
    pub(crate) id: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ResultsArgs {
    #[arg(help = "Job identifier")]
    pub(crate) job_id: String,
    #[arg(long, default_value = "", hide_default_value = true, help = "Resume from this cursor")]
    pub(crate) cursor: String,
    #[arg(
        long,
        value_parser = parse_poll_window,
        allow_hyphen_values = true,
        help = "Keep polling for up to this many seconds (minimum 10)"
    )]
    pub(crate) poll: Option<u64>,
    #[arg(
        long,
        default_value = DEFAULT_POLL_SLEEP_SECS,
        value_parser = parse_non_negative,
        allow_hyphen_values = true,
        help = "Seconds to sleep between polls"
    )]
    pub(crate) timeout: u64,
}

#[derive(Args, Debug)]
pub(crate) struct StatusArgs {
    #[arg(help = "Job identifier")]
    pub(crate) job_id: String,
}

/// Fields of a webhook; `update` replaces all of them.
#[derive(Args, Debug, Default)]
pub(crate) struct WebhookFields {
    #[arg(long, help = "Destination URL (optional for ctim)")]
    pub(crate) url: Option<String>,
    #[arg(long, help = "Bearer token (required for splunk)")]
    pub(crate) token: Option<String>,
    #[arg(long, help = "Certificate fingerprint to pin")]
    pub(crate) fingerprint: Option<String>,
    #[arg(long)]
    pub(crate) label: Option<String>,
    #[arg(long, help = "Payload format: default, ctim, splunk, or s3")]
    pub(crate) format: Option<String>,
    #[arg(long)]
    pub(crate) bucket: Option<String>,
    #[arg(long)]
    pub(crate) region: Option<String>,
    #[arg(long)]
    pub(crate) accesskey: Option<String>,
    #[arg(long)]
    pub(crate) secretkey: Option<String>,
    #[arg(long, help = "Create or leave the webhook disabled")]
    pub(crate) disabled: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WebhookUpdateArgs {
    #[arg(help = "Webhook identifier")]
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) fields: WebhookFields,
}

#[derive(Args, Debug)]
pub(crate) struct SendResultArgs {
    #[arg(help = "Webhook identifier")]
    pub(crate) webhook_id: String,
    #[arg(help = "Stored result identifier")]
    pub(crate) result_id: String,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login => "login",
        Command::Ok => "ok",
        Command::Probe(_) => "probe",
        Command::Query(QueryCommand::Create(_)) => "query_create",
        Command::Query(QueryCommand::Disable(_)) => "query_disable",
        Command::Results(_) => "results",
        Command::Status(_) => "status",
        Command::Stock => "stock",
        Command::Webhook(WebhookCommand::Create(_)) => "webhook_create",
        Command::Webhook(WebhookCommand::Update(_)) => "webhook_update",
        Command::Webhook(WebhookCommand::Get(_)) => "webhook_get",
        Command::Webhook(WebhookCommand::List) => "webhook_list",
        Command::Webhook(WebhookCommand::SendResult(_)) => "webhook_sendresult",
        Command::Features(FeaturesCommand::Get(_)) => "features_get",
        Command::Features(FeaturesCommand::List) => "features_list",
    }
}

fn parse_non_negative(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(format!("'{input}' must not be negative"));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| format!("'{input}' is not a non-negative integer"))
}

fn parse_poll_window(input: &str) -> Result<u64, String> {
    let seconds = parse_non_negative(input)?;
    if seconds < MIN_POLL_WINDOW_SECS {
        return Err(format!(
            "poll window must be at least {MIN_POLL_WINDOW_SECS} seconds, got {seconds}"
        ));
    }
    Ok(seconds)
}
