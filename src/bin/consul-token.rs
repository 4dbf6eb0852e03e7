use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use consul_token::config::proc_loader::file_to_config;
use consul_token::config::settings::Secret;
use consul_token::config::token::TokenState;
use consul_token::consul::transport::ReqwestTransport;
use consul_token::reconcile_token;
use consul_token::utils::constants::DEFAULT_CONFIG_PATH;
use consul_token::utils::logging;
use consul_token::utils::logging::LogLevel;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// overrides connection.management_token
    #[arg(long, env = "CONSUL_MGMT_TOKEN", hide_env_values = true)]
    management_token: Option<String>,
    /// overrides token.state
    #[arg(long, value_enum)]
    state: Option<TokenState>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read arguments and load YAML config
    // -------------------------------

    let args = Args::parse();
    let mut service_config = file_to_config(Path::new(&args.config))?;
    logging::run(service_config.logging.as_ref(), args.log_level);

    if let Some(token) = args.management_token {
        service_config.connection.management_token = Some(Secret::new(token));
    }
    if let Some(state) = args.state {
        service_config.token.state = state;
    }

    // -------------------------------
    // 2. Create request client
    // -------------------------------

    let transport = ReqwestTransport::new(&service_config.connection)
        .context("cannot build HTTP client")?;

    // -------------------------------
    // 3. Reconcile and report
    // -------------------------------

    info!(
        "reconciling token '{}' against {}",
        service_config.token.id,
        service_config.connection.base_url()
    );
    let outcome = reconcile_token(service_config.connection, &service_config.token, transport)
        .await
        .inspect_err(|e| error!("{}", e))?;

    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}
