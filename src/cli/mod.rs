//! # CLI Module
//!
//! Maintenance command-line interface for the STARTTLS policy store.
//! Connection settings come from the environment (see `config`).
//!
//! ## Usage
//! ```bash
//! # Show the most recent scan of a domain
//! starttls-store latest example.com
//!
//! # Register a domain and issue a validation token
//! starttls-store register example.com --email postmaster@example.com
//! starttls-store token example.com
//!
//! # Redeem a token, moving the domain to the queue
//! starttls-store redeem 3f2a...
//!
//! # JSON output
//! starttls-store history example.com --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use serde::Serialize;
use starttls_store::config::Config;
use starttls_store::core::{
    DomainData, DomainRecord, DomainState, DomainStore, ScanRecord, ScanStore, SqliteDatabase,
    TokenRecord, TokenStore,
};
use starttls_store::error::{Result, StoreError};
use tracing::info;

/// STARTTLS policy store - inspect and maintain scan, domain and token records
#[derive(Parser, Debug)]
#[command(name = "starttls-store")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Use the `<DB_NAME>_dev` database
    #[arg(long, global = true)]
    dev: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the most recent scan of a domain
    Latest { domain: String },

    /// Show every scan of a domain, oldest first
    History { domain: String },

    /// Show the stored record of a domain
    Domain { name: String },

    /// Register a domain or update its fields
    Register {
        name: String,

        /// Contact email that receives validation tokens
        #[arg(short, long)]
        email: Option<String>,

        /// Workflow state to set
        #[arg(short, long)]
        state: Option<State>,
    },

    /// List domains in a workflow state
    List {
        #[arg(default_value = "queued")]
        state: State,
    },

    /// Issue a validation token for a registered domain
    Token { domain: String },

    /// Redeem a validation token and queue its domain
    Redeem { token: String },

    /// Delete every record from every table
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum State {
    Unvalidated,
    Queued,
    Validated,
    Failed,
}

impl From<State> for DomainState {
    fn from(state: State) -> Self {
        match state {
            State::Unvalidated => DomainState::Unvalidated,
            State::Queued => DomainState::Queued,
            State::Validated => DomainState::Validated,
            State::Failed => DomainState::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    starttls_store::init_tracing();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if cli.dev {
        config = config.with_db_suffix("dev");
    }
    let db = SqliteDatabase::open(&config)?;
    let printer = Printer {
        term: Term::stdout(),
        format: cli.output,
    };

    match cli.command {
        Commands::Latest { domain } => {
            let scan = db.get_latest_scan(&domain)?;
            printer.scans(&domain, std::slice::from_ref(&scan));
        }
        Commands::History { domain } => {
            let scans = db.get_all_scans(&domain)?;
            printer.scans(&domain, &scans);
        }
        Commands::Domain { name } => {
            let record = db.get_domain(&name)?;
            printer.domains(std::slice::from_ref(&record));
        }
        Commands::Register { name, email, state } => {
            let data = DomainData {
                name: name.clone(),
                email,
                state: state.map(DomainState::from),
            };
            db.put_domain(&data)?;
            let record = db.get_domain(&name)?;
            printer.domains(std::slice::from_ref(&record));
        }
        Commands::List { state } => {
            let records = db.get_domains(state.into())?;
            printer.domains(&records);
        }
        Commands::Token { domain } => {
            let token = db.put_token(&domain)?;
            printer.token(&token);
        }
        Commands::Redeem { token } => {
            let domain = redeem(&db, &token)?;
            printer.domains(std::slice::from_ref(&domain));
        }
        Commands::Clear { yes } => {
            if !yes {
                printer.notice("Refusing to clear tables without --yes");
                return Ok(());
            }
            db.clear_tables()?;
            printer.notice("All tables cleared");
        }
    }

    Ok(())
}

/// Redeem `token` and move its domain to the queue
fn redeem(db: &SqliteDatabase, token: &str) -> std::result::Result<DomainRecord, StoreError> {
    let domain = db.use_token(token)?;
    db.put_domain(&DomainData::new(domain.as_str()).with_state(DomainState::Queued))?;
    info!(domain = %domain, "Domain validated by token and queued");
    db.get_domain(&domain)
}

struct Printer {
    term: Term,
    format: OutputFormat,
}

impl Printer {
    fn scans(&self, domain: &str, scans: &[ScanRecord]) {
        match self.format {
            OutputFormat::Json => self.json(&scans),
            OutputFormat::Pretty => {
                self.line(&format!(
                    "{} {} ({} scans)",
                    style("Scans for").bold(),
                    style(domain).cyan(),
                    scans.len()
                ));
                for scan in scans {
                    self.line(&format!(
                        "  {} {}",
                        style(scan.timestamp.to_rfc3339()).dim(),
                        scan.data
                    ));
                }
            }
        }
    }

    fn domains(&self, records: &[DomainRecord]) {
        match self.format {
            OutputFormat::Json => self.json(&records),
            OutputFormat::Pretty => {
                if records.is_empty() {
                    self.line(&format!("  {}", style("No domains").dim()));
                }
                for record in records {
                    let email = if record.email.is_empty() {
                        style("(no email)".to_string()).dim()
                    } else {
                        style(record.email.clone())
                    };
                    self.line(&format!(
                        "  {} {} {}",
                        style(&record.name).cyan(),
                        style(record.state).yellow(),
                        email
                    ));
                }
            }
        }
    }

    fn token(&self, token: &TokenRecord) {
        match self.format {
            OutputFormat::Json => self.json(token),
            OutputFormat::Pretty => {
                self.line(&format!(
                    "{} token for {}",
                    style("✓").green().bold(),
                    style(&token.domain).cyan()
                ));
                self.line(&format!("  {}", style(&token.token).bold()));
                self.line(&format!(
                    "  {} {}",
                    style("expires").dim(),
                    token.expires.to_rfc3339()
                ));
            }
        }
    }

    fn notice(&self, message: &str) {
        match self.format {
            OutputFormat::Json => self.json(&serde_json::json!({ "message": message })),
            OutputFormat::Pretty => self.line(message),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.line(&text),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    fn line(&self, text: &str) {
        self.term.write_line(text).ok();
    }
}
