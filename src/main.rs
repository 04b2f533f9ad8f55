//! Policy server command-line client.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args + config.toml
//!          │
//!          ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌─────────────────┐
//!   │ PolicyClient │───▶│  Transport   │───▶│  policy server  │
//!   │ (429 retry)  │    │ (auth, TLS,  │◀───│  REST API       │
//!   └──────┬───────┘    │  async poll) │    └─────────────────┘
//!          │            └──────────────┘
//!          ▼
//!   ┌──────────────────┐
//!   │ LabelGroupTable  │──▶ expand(root) → label hrefs
//!   └──────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Method;

use policy_client::config::load_config;
use policy_client::http::request::join_href;
use policy_client::observability::logging;
use policy_client::{ApiError, ApiRequest, Href, PolicyClient};

#[derive(Parser)]
#[command(name = "policy-client")]
#[command(about = "Command-line client for the policy server REST API", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "policy-client.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List label groups of a policy version
    LabelGroups {
        /// Policy version: draft or active
        #[arg(short, long, default_value = "draft")]
        status: String,

        /// Query filter as key=value (repeatable)
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },
    /// Expand a label group into every label it covers
    Expand {
        /// Policy version: draft or active
        #[arg(short, long, default_value = "draft")]
        status: String,

        /// Href of the label group to expand
        href: String,
    },
    /// GET a raw API path relative to /api/v2
    Get {
        path: String,

        /// Use the async job protocol
        #[arg(long)]
        r#async: bool,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("filter '{raw}' must look like key=value"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability);

    let client = PolicyClient::new(config)?;

    let result = match cli.command {
        Commands::LabelGroups { status, filter } => client
            .get_label_groups(filter.as_slice(), &status)
            .await
            .map(|(table, _)| serde_json::to_value(table.iter().collect::<Vec<_>>())),
        Commands::Expand { status, href } => {
            let no_filter: &[(&str, &str)] = &[];
            client
                .get_label_groups(no_filter, &status)
                .await
                .map(|_| serde_json::to_value(client.expand_label_group(&Href::from(href))))
        }
        Commands::Get { path, r#async } => {
            let url = join_href(&client.config().base_url(), &path)?;
            client
                .request(ApiRequest::new(Method::GET, url).with_async(r#async))
                .await
                .map(|resp| serde_json::from_str(&resp.body).or_else(|_| Ok(serde_json::Value::String(resp.body))))
        }
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value?)?);
            Ok(())
        }
        Err(e) => {
            report(&e);
            Err(e.into())
        }
    }
}

fn report(err: &ApiError) {
    tracing::error!(error = %err, "Request failed");
    if let Some(response) = err.response() {
        eprintln!("Error: {} returned status {}", response.url, response.status);
        if !response.body.is_empty() {
            eprintln!("Response: {}", response.body);
        }
    }
}
