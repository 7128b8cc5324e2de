// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Herdbook CLI - multi-tenant livestock herd book

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use herdbook::commands::{self, Context};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "herdbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "HERDBOOK_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "HERDBOOK_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Email of the user to act as
    #[arg(long = "as", env = "HERDBOOK_USER", global = true)]
    acting_user: Option<String>,

    /// Tenant id (platform users)
    #[arg(long, env = "HERDBOOK_TENANT", global = true)]
    tenant: Option<u64>,

    /// Override today's date, YYYY-MM-DD
    #[arg(long, env = "HERDBOOK_TODAY", global = true)]
    today: Option<NaiveDate>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo herd to the data directory
    Seed {
        /// Overwrite an existing herd.json
        #[arg(long)]
        force: bool,
    },

    /// Manage herd animals
    Animal {
        /// Action: list, show, add, add-external, remove
        action: String,

        /// Animal tag or id
        target: Option<String>,

        #[command(flatten)]
        opts: commands::animal::AnimalOpts,
    },

    /// Pedigree, inbreeding and mate selection
    Lineage {
        /// Action: ancestors, descendants, pedigree, inbreeding, mates, generation
        action: String,

        /// Animal tag or id
        target: Option<String>,

        /// Generations to walk (defaults to pedigree_generations)
        #[arg(short, long)]
        generations: Option<u32>,

        /// Maximum sires to suggest
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Matings, pregnancies and births
    Breeding {
        /// Action: list, add, confirm, fail, birth, due
        action: String,

        /// Breeding record id
        target: Option<String>,

        #[command(flatten)]
        opts: commands::breeding::BreedingOpts,
    },

    /// Expense and sales summaries
    Finance {
        /// Action: summary
        #[arg(default_value = "summary")]
        action: String,

        /// Restrict to one farm
        #[arg(long)]
        farm: Option<u64>,

        /// First day included, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day included, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Stock levels
    Inventory {
        /// Action: list, low, adjust
        action: String,

        /// Inventory item id
        target: Option<String>,

        /// Quantity change for adjust
        #[arg(long, allow_hyphen_values = true)]
        delta: Option<f64>,

        /// Restrict to one farm
        #[arg(long)]
        farm: Option<u64>,
    },

    /// Role delegation between users
    Delegation {
        /// Action: list, grant, revoke
        action: String,

        /// Delegation id
        target: Option<String>,

        #[command(flatten)]
        opts: commands::delegation::DelegationOpts,
    },

    /// Browse the audit trail
    Audit {
        /// Action: list
        #[arg(default_value = "list")]
        action: String,

        /// Only entries by this user email
        #[arg(long)]
        user: Option<String>,

        /// Only this action: create, update, delete, export, delegate, revoke
        #[arg(long)]
        kind: Option<String>,

        /// Only entries on or after this date
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Maximum entries to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Tenant administration (super admins)
    Tenant {
        /// Action: list, show, suspend, activate
        action: String,

        /// Tenant id or slug
        target: Option<String>,
    },

    /// Subscription plan, usage and invoices
    Subscription {
        /// Action: show, usage, invoice
        #[arg(default_value = "show")]
        action: String,
    },

    /// Export pedigree graph or dataset
    Export {
        /// Output format (dot, json)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = herdbook::config::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over the flags
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        data_dir: cli.data_dir.unwrap_or_else(|| config.data_dir.clone()),
        acting_user: cli.acting_user.or_else(|| config.user.clone()),
        config_path: cli.config,
        tenant: cli.tenant,
        today: cli.today.unwrap_or_else(|| chrono::Local::now().date_naive()),
        json: cli.json,
        color: !cli.no_color && !cli.json && std::io::stdout().is_terminal(),
        config,
    };

    // Execute command
    match cli.command {
        Commands::Seed { force } => commands::seed::run(&ctx, force),
        Commands::Animal { action, target, opts } => {
            commands::animal::run(&ctx, &action, target, opts)
        }
        Commands::Lineage { action, target, generations, limit } => {
            commands::lineage::run(&ctx, &action, target, generations, limit)
        }
        Commands::Breeding { action, target, opts } => {
            commands::breeding::run(&ctx, &action, target, opts)
        }
        Commands::Finance { action, farm, from, to } => {
            commands::finance::run(&ctx, &action, farm, from, to)
        }
        Commands::Inventory { action, target, delta, farm } => {
            commands::inventory::run(&ctx, &action, target, delta, farm)
        }
        Commands::Delegation { action, target, opts } => {
            commands::delegation::run(&ctx, &action, target, opts)
        }
        Commands::Audit { action, user, kind, since, limit } => {
            commands::audit::run(&ctx, &action, user, kind, since, limit)
        }
        Commands::Tenant { action, target } => commands::tenant::run(&ctx, &action, target),
        Commands::Subscription { action } => commands::subscription::run(&ctx, &action),
        Commands::Export { format, output } => commands::export::run(&ctx, &format, output),
        Commands::Config { key, value } => commands::config::run(&ctx, &key, value),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
