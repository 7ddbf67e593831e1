mod fill;
mod lookup;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use formfill_contact::{check_phone, is_valid_email, normalize_dial_code, DialPlan};
use formfill_core::{AppConfig, FileSessionStore, UsageCounter};
use formfill_suggest::{filter_by_locality, parse_address, SuggestClient, SuggestSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "formfill")]
#[command(about = "Checkout form helpers: address suggest, company lookup, contact checks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query the address suggest API
    Suggest {
        /// Free-text address query
        query: String,
    },
    /// Look up a company in the business registry by its identifier (IČO)
    Lookup {
        /// Eight-digit company identifier; spaces are ignored
        ico: String,
    },
    /// Validate an email address
    CheckEmail { email: String },
    /// Validate a national phone number against a dialing plan
    CheckPhone {
        number: String,
        /// Dial code chosen in the country picker (e.g. +420)
        #[arg(long, default_value = "+420")]
        dial: String,
    },
    /// Mount the helpers on an in-memory checkout form and fill it
    Fill {
        /// Address typed into the first street field
        query: String,
        /// Index of the suggestion to select
        #[arg(long, default_value = "0")]
        pick: usize,
        /// Page path used for the activation check (defaults to the checkout route)
        #[arg(long)]
        path: Option<String>,
        /// Company identifier typed into the registry field
        #[arg(long)]
        ico: Option<String>,
    },
    /// Show suggest API usage for the current session
    Usage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = formfill_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Suggest { query }) => run_suggest(&config, &query).await?,
        Some(Commands::Lookup { ico }) => lookup::run_lookup(&config, &ico).await?,
        Some(Commands::CheckEmail { email }) => {
            let verdict = if is_valid_email(&email) { "valid" } else { "invalid" };
            println!("{email}: {verdict}");
        }
        Some(Commands::CheckPhone { number, dial }) => println!("{}", phone_report(&number, &dial)),
        Some(Commands::Fill {
            query,
            pick,
            path,
            ico,
        }) => fill::run_fill(&config, &query, pick, path, ico.as_deref()).await?,
        Some(Commands::Usage) => {
            let usage = usage_counter(&config);
            println!("API: {}", usage.count());
        }
        None => println!("formfill ready; see --help for commands"),
    }

    Ok(())
}

async fn run_suggest(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let client = suggest_client(config)?;
    let usage = usage_counter(config);

    let items = client.suggest(query).await?;
    usage.increment();
    let items = filter_by_locality(items, client.settings().locality.as_deref());

    if items.is_empty() {
        println!("no suggestions for {query:?}");
        return Ok(());
    }
    for (i, item) in items.iter().enumerate() {
        let parsed = parse_address(item, &config.home_country);
        println!(
            "{i:>2}  {:<40} {} {} {}",
            item.name, parsed.city, parsed.zip, parsed.country
        );
    }
    println!("API: {}", usage.count());
    Ok(())
}

/// The picker's dial attribute may carry a `+` or spaces; only digits count.
fn phone_report(number: &str, dial: &str) -> String {
    let dial = normalize_dial_code(dial);
    let check = check_phone(number, dial.as_deref());
    match dial.as_deref().and_then(DialPlan::from_dial_code) {
        Some(plan) => format!("{number} (+{}): {check:?}", plan.dial_code()),
        None => format!("{number} (unsupported dial code): {check:?}"),
    }
}

pub(crate) fn suggest_settings(config: &AppConfig) -> SuggestSettings {
    SuggestSettings {
        lang: config.suggest_lang.clone(),
        limit: config.suggest_limit,
        ..SuggestSettings::default()
    }
    .with_locality(config.suggest_locality.as_deref())
}

pub(crate) fn suggest_client(config: &AppConfig) -> anyhow::Result<SuggestClient> {
    let api_key = config
        .mapy_api_key
        .as_deref()
        .context("FORMFILL_MAPY_API_KEY must be set for address suggestions")?;
    let client = SuggestClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
        suggest_settings(config),
        &config.suggest_base_url,
    )?;
    Ok(client)
}

pub(crate) fn usage_counter(config: &AppConfig) -> Arc<UsageCounter> {
    let store = Arc::new(FileSessionStore::new(config.session_path.clone()));
    Arc::new(UsageCounter::new(
        store,
        Some(config.max_usage_per_session),
    ))
}
