//! Command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatwatch::catalog::{CatalogClient, CatalogConfig, CATALOG_BASE_URL};
use seatwatch::console::{Console, StdConsole};
use seatwatch::notify::{NotifyConfig, SmsNotifier};
use seatwatch::resolver::{Resolution, SectionResolver};
use seatwatch::session::SessionFlow;
use seatwatch::store::UserStore;

/// Command-line arguments for seatwatch
#[derive(Parser, Debug)]
#[command(name = "seatwatch")]
#[command(about = "Find a course section in the Purdue catalog and get texted its details")]
#[command(version)]
struct Args {
    /// Path to the account database
    #[arg(long, default_value = "app.db", env = "SEATWATCH_DB")]
    db_path: String,

    /// Base URL of the course catalog's OData endpoint
    #[arg(long, default_value = CATALOG_BASE_URL, env = "SEATWATCH_CATALOG_URL")]
    catalog_url: String,

    /// Skip TLS certificate verification when talking to the catalog
    #[arg(long)]
    insecure: bool,

    /// Phone number to text once a section is resolved
    #[arg(long, env = "SEATWATCH_TEXT_TO")]
    text_to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!(db = %args.db_path, catalog = %args.catalog_url, "starting seatwatch");

    let store = UserStore::open(&args.db_path)
        .with_context(|| format!("failed to open account database at {}", args.db_path))?;
    let catalog = CatalogClient::with_config(CatalogConfig {
        base_url: args.catalog_url.clone(),
        accept_invalid_certs: args.insecure,
        ..CatalogConfig::default()
    })
    .context("failed to build catalog client")?;

    let mut console = StdConsole;

    let Some(username) = SessionFlow::new(&store, &mut console).authenticate()? else {
        info!("session ended at the account gate");
        return Ok(());
    };
    console.write_line(&format!("\nWelcome, {username}!"));

    if !SessionFlow::new(&store, &mut console).wants_tracking()? {
        return Ok(());
    }

    let resolution = SectionResolver::new(&catalog, &mut console).run().await?;
    let resolved = match resolution {
        Resolution::Resolved(resolved) => resolved,
        Resolution::Aborted => {
            info!("search aborted");
            return Ok(());
        }
    };

    let summary = resolved.summary();
    console.write_line(&format!("\nTracked section: {summary}"));

    if let Some(to) = args.text_to.as_deref() {
        match NotifyConfig::from_env() {
            Ok(config) => {
                let notifier = SmsNotifier::new(config)?;
                let sid = notifier
                    .send(to, &summary)
                    .await
                    .context("failed to send the notification text")?;
                console.write_line(&format!("Text sent (message {sid})."));
            }
            Err(err) => {
                warn!(error = %err, "skipping text; notifier is not configured");
                console.write_line(
                    "Text skipped: Twilio credentials are not configured in the environment.",
                );
            }
        }
    }

    Ok(())
}
