//! ITPro CLI
//!
//! A command-line front end for the ITPro client core.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use itpro::{
    api::ApiClient,
    format::relative_time,
    messaging::{conversation_messages, derive_conversations, sort_by_recency},
    pricing::{PricingCatalog, PricingSelection},
    storage::{SessionStore, Settings},
};

#[derive(Parser)]
#[command(name = "itpro")]
#[command(about = "Command-line client for the IT Professionals network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file
    #[arg(long, global = true, default_value = "./data/settings.json")]
    settings: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and cache the session
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Clear the cached session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List conversations, newest first
    Conversations,

    /// Show the thread with one user
    Thread {
        /// Counterpart user ID
        user_id: String,
    },

    /// Send a direct message
    Send {
        /// Receiver user ID
        user_id: String,
        /// Message content
        message: String,
    },

    /// Price a job post or subscription
    Quote {
        /// Which catalogue to price against
        #[arg(value_enum)]
        catalog: CatalogKind,

        /// Tier ID (e.g. basic, featured, professional)
        #[arg(short, long)]
        tier: String,

        /// Add-on to enable (repeatable)
        #[arg(short, long = "add-on")]
        add_ons: Vec<String>,
    },

    /// List tiers and add-ons
    Plans {
        /// Which catalogue to list
        #[arg(value_enum, default_value = "job")]
        catalog: CatalogKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CatalogKind {
    Job,
    Subscription,
}

impl CatalogKind {
    fn catalog(self) -> PricingCatalog {
        match self {
            CatalogKind::Job => PricingCatalog::job_posts(),
            CatalogKind::Subscription => PricingCatalog::subscriptions(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    itpro::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Quote { catalog, tier, add_ons } => quote(catalog, tier, add_ons)?,
        Commands::Plans { catalog } => print_plans(&catalog.catalog()),
        Commands::Login { email, password } => {
            let client = connect(&cli.settings)?;
            let user = client.login(&email, &password).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Commands::Logout => {
            connect(&cli.settings)?.logout().await?;
            println!("Logged out.");
        }
        Commands::Whoami => {
            let client = connect(&cli.settings)?;
            let session = client.session();
            let session = session.lock().await;
            match session.user() {
                Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
                None => println!("Not logged in."),
            }
        }
        Commands::Conversations => list_conversations(&connect(&cli.settings)?).await?,
        Commands::Thread { user_id } => show_thread(&connect(&cli.settings)?, &user_id).await?,
        Commands::Send { user_id, message } => {
            connect(&cli.settings)?.send_message(&user_id, &message).await?;
            println!("Message sent.");
        }
    }

    Ok(())
}

/// API client over the configured settings and cached session
fn connect(settings_path: &str) -> Result<ApiClient> {
    let settings = Settings::load(settings_path).context("Failed to load settings")?;
    let session = SessionStore::open(&settings.session_path).context("Failed to open session")?;
    Ok(ApiClient::new(&settings, session)?)
}

async fn list_conversations(client: &ApiClient) -> Result<()> {
    let me = require_user(client).await?;
    let messages = client.messages().await?;
    let mut conversations = derive_conversations(&messages, &me);
    sort_by_recency(&mut conversations);

    if conversations.is_empty() {
        println!("(no conversations)");
    }
    let now = Utc::now();
    for c in &conversations {
        println!(
            "{} [{}]  {}",
            c.counterpart_name,
            c.counterpart_id,
            relative_time(c.last_message_time, now)
        );
        println!("  {}", c.preview(80));
    }
    Ok(())
}

async fn show_thread(client: &ApiClient, user_id: &str) -> Result<()> {
    let me = require_user(client).await?;
    let messages = client.messages().await?;
    let now = Utc::now();
    for m in conversation_messages(&messages, &me, user_id) {
        let who = if m.is_own(&me) {
            "you"
        } else {
            m.sender_name.as_deref().unwrap_or(&m.sender_id)
        };
        println!("[{}] {}: {}", relative_time(m.created_at, now), who, m.content);
    }
    Ok(())
}

async fn require_user(client: &ApiClient) -> Result<String> {
    match client.current_user_id().await {
        Some(id) => Ok(id),
        None => bail!("Not logged in. Run `itpro login <email> <password>` first."),
    }
}

fn quote(kind: CatalogKind, tier: String, add_ons: Vec<String>) -> Result<()> {
    let catalog = kind.catalog();
    let selection = add_ons
        .into_iter()
        .fold(PricingSelection::new(tier), |s, id| s.with_add_on(id, true));

    let quote = catalog.quote(&selection)?;
    for item in &quote.items {
        println!("{:<30} {:>10}", item.label, item.amount.to_string());
    }
    println!("{:-<41}", "");
    println!("{:<30} {:>10}", "Total", quote.total.to_string());
    Ok(())
}

fn print_plans(catalog: &PricingCatalog) {
    for tier in &catalog.tiers {
        let marker = if tier.popular { "  (most popular)" } else { "" };
        println!("{} [{}] {} / {}{}", tier.name, tier.id, tier.base_price, tier.duration, marker);
        for feature in &tier.features {
            println!("  - {}", feature);
        }
        let add_ons: Vec<String> = catalog
            .available_add_ons(&tier.id)
            .map(|a| format!("{} +{}", a.id, a.price_delta))
            .collect();
        if !add_ons.is_empty() {
            println!("  add-ons: {}", add_ons.join(", "));
        }
    }
}
