//! Agencydesk CLI entry point.
//!
//! Provides `format`, `economics` and `roles` subcommands for rendering chat
//! messages, computing break-even figures and inspecting role rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use agencydesk::config::{self, Config};
use agencydesk::economics::{ServiceLine, UnitMetrics};
use agencydesk::format::{Formatter, RawMessage};
use agencydesk::render::{self, OutputFormat};
use agencydesk::roles::{AgentRole, RoleBook};

/// Chat formatting and unit economics for an ads agency.
#[derive(Parser)]
#[command(name = "agencydesk", version, about)]
struct Cli {
    /// Config file (defaults to `$AGENCYDESK_CONFIG_PATH` or `~/.agencydesk/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Format a chat message read from a file or stdin.
    Format {
        /// Message file; stdin when absent or `-`.
        file: Option<PathBuf>,
        /// Style the message as sent by the user.
        #[arg(long)]
        user: bool,
        /// Output format: text, html or json.
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },
    /// Compute unit economics for one service line.
    Economics(EconomicsArgs),
    /// Inspect role rules.
    Roles {
        /// Roles action.
        #[command(subcommand)]
        action: RolesAction,
    },
}

/// Inputs of the `economics` subcommand; unset values use the defaults.
#[derive(Args)]
struct EconomicsArgs {
    /// Average order value.
    #[arg(long)]
    aov: Option<f64>,
    /// Target ROAS.
    #[arg(long)]
    target_roas: Option<f64>,
    /// Tax rate in percent.
    #[arg(long)]
    tax_rate: Option<f64>,
    /// Return rate in percent.
    #[arg(long)]
    return_rate: Option<f64>,
    /// Cost of goods in percent.
    #[arg(long)]
    cogs: Option<f64>,
    /// Fulfillment cost per order.
    #[arg(long)]
    fulfillment_cost: Option<f64>,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Actions of the `roles` subcommand.
#[derive(Subcommand)]
enum RolesAction {
    /// List rule names and versions.
    List,
    /// Print the full system instruction of a role.
    Show {
        /// Role: assistant, client-creator or campaign-creator.
        role: AgentRole,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(agencydesk::logging::init_with_file(dir, &config.logging.level)?),
        None => {
            agencydesk::logging::init_console(&config.logging.level);
            None
        }
    };
    debug!("configuration loaded");

    match cli.command {
        Command::Format { file, user, output } => handle_format(&config, file, user, output),
        Command::Economics(args) => handle_economics(&args),
        Command::Roles { action } => handle_roles(&config, action),
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => {
            let mut config = config::load_config(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => config::load_default_config(),
    }
}

/// Read a message and print it in the requested format.
fn handle_format(
    config: &Config,
    file: Option<PathBuf>,
    user: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let text = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let formatter =
        Formatter::new(&config.formatter).context("invalid [formatter] configuration")?;
    let message = RawMessage { text, is_user: user };
    let formatted = formatter.format(&message);
    info!(nodes = formatted.nodes.len(), "message formatted");

    let rendered = render::render(&formatted, output).context("failed to render message")?;
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Print break-even figures for one service line.
fn handle_economics(args: &EconomicsArgs) -> anyhow::Result<()> {
    let defaults = ServiceLine::default();
    let line = ServiceLine {
        aov: args.aov.unwrap_or(defaults.aov),
        target_roas: args.target_roas.unwrap_or(defaults.target_roas),
        tax_rate: args.tax_rate.unwrap_or(defaults.tax_rate),
        return_rate: args.return_rate.unwrap_or(defaults.return_rate),
        cogs: args.cogs.unwrap_or(defaults.cogs),
        fulfillment_cost: args.fulfillment_cost.unwrap_or(defaults.fulfillment_cost),
        ..defaults
    };
    line.validate().context("invalid service line")?;
    let metrics = UnitMetrics::compute(&line);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    let currency = &line.currency;
    println!("Net revenue     {:>10.2} {currency}", metrics.net_revenue);
    println!("Gross profit    {:>10.2} {currency}", metrics.gross_profit);
    println!("Ad spend        {:>10.2} {currency}", metrics.ad_spend);
    println!("Net profit      {:>10.2} {currency}", metrics.net_profit);
    match metrics.break_even_roas {
        Some(roas) => println!("Break-even ROAS {roas:>10.2}"),
        None => println!("Break-even ROAS        n/a (no gross profit)"),
    }
    println!("Break-even CPA  {:>10.2} {currency}", metrics.break_even_cpa);
    Ok(())
}

/// List role rules or print one role's system instruction.
fn handle_roles(config: &Config, action: RolesAction) -> anyhow::Result<()> {
    let book = RoleBook::with_overrides(&config.roles).context("failed to load role rules")?;
    match action {
        RolesAction::List => {
            for rule in book.rules() {
                println!("{} v{}", rule.name, rule.version);
            }
        }
        RolesAction::Show { role } => println!("{}", book.system_instruction(role)),
    }
    Ok(())
}
