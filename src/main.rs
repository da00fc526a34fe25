//! Compliance Node Utilities CLI
//!
//! Inspects how a compliance scan's node selector maps onto the cluster's
//! MachineConfigPools and which KubeletConfig currently shapes those nodes.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use compliance_nodeutils::{
    any_pool_matches, current_kubelet_config_for_pool, kubelet_config_rendered, node_roles,
    scan_name_from_profile, strip_node_sizing_fields, Error, MachineConfigPool, ResourceGetter,
    Result,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Compliance node utilities - inspect pools, roles and KubeletConfigs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scan name and roles for a profile and node selector
    ScanName {
        /// Profile name
        #[arg(long)]
        profile: String,

        /// Node selector label, as key=value (repeatable)
        #[arg(long = "selector", value_parser = parse_label)]
        selector: Vec<(String, String)>,
    },

    /// Find the pool matching a node selector and its current KubeletConfig
    Pool {
        /// Node selector label, as key=value (repeatable)
        #[arg(long = "selector", value_parser = parse_label, required = true)]
        selector: Vec<(String, String)>,
    },

    /// Print a kubelet configuration payload without node sizing fields
    StripSizing {
        /// JSON file holding the payload
        file: PathBuf,
    },
}

fn parse_label(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        None if !s.is_empty() => Ok((s.to_string(), String::new())),
        _ => Err(format!("invalid label '{}', expected key=value", s)),
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    match args.command {
        Command::ScanName { profile, selector } => {
            let selector: BTreeMap<_, _> = selector.into_iter().collect();
            println!("{}", scan_name_from_profile(&profile, &selector));
            for role in node_roles(&selector) {
                info!("  role: {}", role);
            }
        }
        Command::Pool { selector } => {
            let selector: BTreeMap<_, _> = selector.into_iter().collect();
            let client = kube::Client::try_default().await?;
            inspect_pool(&selector, &client).await?;
        }
        Command::StripSizing { file } => {
            let payload = std::fs::read(&file)?;
            let stripped = strip_node_sizing_fields(&payload)?;
            let stripped = String::from_utf8(stripped)
                .map_err(|e| Error::Internal(format!("stripped payload is not UTF-8: {}", e)))?;
            println!("{}", stripped);
        }
    }

    Ok(())
}

async fn inspect_pool<C: ResourceGetter>(
    selector: &BTreeMap<String, String>,
    client: &C,
) -> Result<()> {
    let pools: Vec<MachineConfigPool> = client.list().await?;
    info!("Found {} MachineConfigPools", pools.len());

    let Some(pool) = any_pool_matches(selector, &pools) else {
        warn!("No MachineConfigPool matches node selector {:?}", selector);
        return Ok(());
    };
    let pool_name = pool.metadata.name.as_deref().unwrap_or_default();
    println!("pool: {}", pool_name);

    match current_kubelet_config_for_pool(pool, client).await? {
        Some((mc, kc)) => {
            println!("machineconfig: {}", mc.metadata.name.as_deref().unwrap_or_default());
            println!("kubeletconfig: {}", kc.metadata.name.as_deref().unwrap_or_default());
            println!("rendered: {}", kubelet_config_rendered(&kc, &mc)?);
        }
        None => println!("kubeletconfig: <none>"),
    }

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "kube=info", "tower=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // stdout carries command output
    let layer = fmt::layer().with_writer(std::io::stderr);
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_target(true))
            .init();
    }
}
