//! CLI binary for managing campaigns against the Emerald campaign API.

use std::io::{self, Write as _};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use emerald_campaigns::board::{BoardState, Notice, NoticeLevel};
use emerald_campaigns::client::CampaignBlockingClient;
use emerald_campaigns::config::{BASE_URL_ENV, Config};
use emerald_campaigns::error::CampaignError;
use emerald_campaigns::form::{FieldInput, FormField};
use emerald_campaigns::manager::CampaignManagerBlocking;
use emerald_campaigns::models::{Campaign, CampaignId, CampaignStatus};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::sync::watch;

/// Manager type used by every subcommand.
type Manager = CampaignManagerBlocking<CampaignBlockingClient>;

/// Campaign management CLI: create, edit and remove advertising campaigns.
#[derive(Debug, Parser)]
#[command(name = "campaigns", version, about)]
struct Cli {
    /// Override the campaign service URL (default: $CAMPAIGNS_API_URL or
    /// the public service).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Show the balance and every campaign.
    List,
    /// Create a new campaign.
    Create(CreateArgs),
    /// Edit an existing campaign; the full record is resent.
    Update(UpdateArgs),
    /// Delete a campaign.
    Delete {
        /// Campaign id.
        id: CampaignId,
    },
    /// List the towns a campaign may target.
    Towns,
}

/// Arguments for the `create` subcommand.
#[derive(Debug, Args)]
struct CreateArgs {
    /// Campaign name.
    #[arg(long)]
    name: String,
    /// Keywords separated by commas.
    #[arg(long)]
    keywords: String,
    /// Bid amount (at least 1).
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    bid_amount: String,
    /// Campaign fund (at least 1).
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    campaign_fund: String,
    /// Radius in kilometers (at least 1).
    #[arg(long, value_name = "KM", allow_hyphen_values = true)]
    radius: String,
    /// Target town (see `campaigns towns`).
    #[arg(long)]
    town: Option<String>,
    /// Create the campaign paused instead of active.
    #[arg(long)]
    paused: bool,
}

/// Arguments for the `update` subcommand. Omitted fields keep their
/// current value.
#[derive(Debug, Args)]
struct UpdateArgs {
    /// Campaign id.
    id: CampaignId,
    /// New name.
    #[arg(long)]
    name: Option<String>,
    /// New keywords.
    #[arg(long)]
    keywords: Option<String>,
    /// New bid amount.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    bid_amount: Option<String>,
    /// New campaign fund.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    campaign_fund: Option<String>,
    /// New radius in kilometers.
    #[arg(long, value_name = "KM", allow_hyphen_values = true)]
    radius: Option<String>,
    /// New town; pass an empty string to clear it.
    #[arg(long)]
    town: Option<String>,
    /// Mark the campaign active.
    #[arg(long, conflicts_with = "paused")]
    active: bool,
    /// Mark the campaign paused.
    #[arg(long)]
    paused: bool,
}

/// Renders board updates published by the manager.
#[derive(Debug)]
struct View {
    /// Board state channel.
    updates: watch::Receiver<BoardState>,
    /// Last notice printed, so a notice is shown once.
    last_notice: Option<Notice>,
}

impl View {
    /// Creates a view over the given updates.
    const fn new(updates: watch::Receiver<BoardState>) -> Self {
        Self {
            updates,
            last_notice: None,
        }
    }

    /// Prints whatever changed since the last flush: a new notice, and the
    /// board if `show_board` is set.
    fn flush(&mut self, show_board: bool) -> io::Result<()> {
        if !self.updates.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let state = self.updates.borrow_and_update().clone();
        if state.notice != self.last_notice {
            if let Some(notice) = state.notice.as_ref() {
                print_notice(notice)?;
            }
            self.last_notice.clone_from(&state.notice);
        }
        if show_board {
            write_board(&mut io::stdout().lock(), &state)?;
        }
        Ok(())
    }
}

/// Prints a failure to stderr.
fn print_error(context: &str, err: &dyn core::fmt::Display) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Builds the configuration from the environment and CLI flags.
fn load_config(api_url: Option<String>) -> emerald_campaigns::error::Result<Config> {
    let config = Config::from_env()?;
    match api_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.api_url) {
        Ok(config) => config,
        Err(err) => {
            print_error("failed to load configuration", &err)?;
            writeln!(
                io::stderr().lock(),
                "  {} set {} to an http(s) URL or pass --api-url",
                "hint:".cyan(),
                BASE_URL_ENV
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match CampaignBlockingClient::builder().config(&config).build() {
        Ok(client) => client,
        Err(err) => {
            print_error("failed to build client", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let manager = CampaignManagerBlocking::new(client);
    let mut view = View::new(manager.subscribe());
    dispatch(&manager, &config, &mut view, cli.command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(
    manager: &Manager,
    config: &Config,
    view: &mut View,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::List => cmd_list(manager, view),
        Command::Create(args) => cmd_create(manager, config, view, args),
        Command::Update(args) => cmd_update(manager, config, view, args),
        Command::Delete { id } => cmd_delete(manager, view, id),
        Command::Towns => cmd_towns(config),
    }
}

/// Maps an operation result onto an exit code.
const fn exit_code<T>(result: &Result<T, CampaignError>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Refreshes the list behind a spinner.
fn refresh_with_spinner(manager: &Manager) -> emerald_campaigns::error::Result<()> {
    let spinner = make_spinner("Fetching campaigns...");
    let result = manager.refresh();
    spinner.finish_and_clear();
    result
}

/// Executes the `list` subcommand.
fn cmd_list(manager: &Manager, view: &mut View) -> io::Result<ExitCode> {
    let result = refresh_with_spinner(manager);
    view.flush(result.is_ok())?;
    Ok(exit_code(&result))
}

/// Executes the `create` subcommand.
fn cmd_create(
    manager: &Manager,
    config: &Config,
    view: &mut View,
    args: CreateArgs,
) -> io::Result<ExitCode> {
    let fields = [
        (FormField::Name, Some(args.name)),
        (FormField::Keywords, Some(args.keywords)),
        (FormField::BidAmount, Some(args.bid_amount)),
        (FormField::CampaignFund, Some(args.campaign_fund)),
        (FormField::Town, args.town),
        (FormField::Radius, Some(args.radius)),
    ];
    if let Err(err) = apply_form(manager, fields, Some(!args.paused)) {
        print_error("invalid input", &err)?;
        return Ok(ExitCode::FAILURE);
    }
    submit_checked(manager, config, view)
}

/// Executes the `update` subcommand.
fn cmd_update(
    manager: &Manager,
    config: &Config,
    view: &mut View,
    args: UpdateArgs,
) -> io::Result<ExitCode> {
    if refresh_with_spinner(manager).is_err() {
        view.flush(false)?;
        return Ok(ExitCode::FAILURE);
    }
    if let Err(err) = manager.edit(args.id) {
        print_error("cannot edit", &err)?;
        return Ok(ExitCode::FAILURE);
    }

    let fields = [
        (FormField::Name, args.name),
        (FormField::Keywords, args.keywords),
        (FormField::BidAmount, args.bid_amount),
        (FormField::CampaignFund, args.campaign_fund),
        (FormField::Town, args.town),
        (FormField::Radius, args.radius),
    ];
    let status = match (args.active, args.paused) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    };
    if let Err(err) = apply_form(manager, fields, status) {
        print_error("invalid input", &err)?;
        return Ok(ExitCode::FAILURE);
    }
    submit_checked(manager, config, view)
}

/// Merges the provided text fields, and the status checkbox when given,
/// into the draft.
fn apply_form<const N: usize>(
    manager: &Manager,
    fields: [(FormField, Option<String>); N],
    active: Option<bool>,
) -> emerald_campaigns::error::Result<()> {
    for (field, value) in fields {
        if let Some(text) = value {
            manager.set_field(field, FieldInput::Text(text))?;
        }
    }
    match active {
        Some(checked) => manager.set_field(FormField::Status, FieldInput::Checkbox(checked)),
        None => Ok(()),
    }
}

/// Checks the form constraints, then submits and renders the outcome.
fn submit_checked(manager: &Manager, config: &Config, view: &mut View) -> io::Result<ExitCode> {
    let draft = manager.state().form.draft;
    if let Err(violation) = draft.check_constraints(config.towns()) {
        print_error("invalid input", &violation)?;
        return Ok(ExitCode::FAILURE);
    }

    let spinner = make_spinner("Saving campaign...");
    let result = manager.submit();
    spinner.finish_and_clear();
    view.flush(true)?;
    Ok(exit_code(&result))
}

/// Executes the `delete` subcommand.
fn cmd_delete(manager: &Manager, view: &mut View, id: CampaignId) -> io::Result<ExitCode> {
    if refresh_with_spinner(manager).is_err() {
        tracing::debug!("deleting without a fresh list");
    }
    let spinner = make_spinner("Deleting campaign...");
    let result = manager.remove(id);
    spinner.finish_and_clear();
    view.flush(true)?;
    Ok(exit_code(&result))
}

/// Executes the `towns` subcommand.
fn cmd_towns(config: &Config) -> io::Result<ExitCode> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Towns".green().bold())?;
    for town in config.towns() {
        writeln!(out, "  {town}")?;
    }
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints a notice: successes to stdout, errors to stderr.
fn print_notice(notice: &Notice) -> io::Result<()> {
    match notice.level {
        NoticeLevel::Success => writeln!(
            io::stdout().lock(),
            "{}",
            notice.message.green().bold()
        ),
        NoticeLevel::Error => writeln!(
            io::stderr().lock(),
            "{} {}",
            "error:".red().bold(),
            notice.message
        ),
    }
}

/// Writes the balance header and the campaign grid.
fn write_board<W: io::Write>(out: &mut W, state: &BoardState) -> io::Result<()> {
    writeln!(out, "{}", "Campaign Management".bold())?;
    writeln!(
        out,
        "{}",
        format!("Balance: {} Emeralds", state.balance).cyan()
    )?;
    writeln!(out)?;

    if state.campaigns.is_empty() {
        writeln!(out, "{}", "Add a campaign to get started".dimmed())?;
        return Ok(());
    }

    writeln!(out, "{}", campaign_table(&state.campaigns))?;
    Ok(())
}

/// Builds the campaign grid.
fn campaign_table(campaigns: &[Campaign]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Keywords").fg(Color::Cyan),
        Cell::new("Bid Amount").fg(Color::Cyan),
        Cell::new("Fund").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Town").fg(Color::Cyan),
        Cell::new("Radius").fg(Color::Cyan),
    ]);

    for campaign in campaigns {
        _ = table.add_row(vec![
            Cell::new(campaign.id),
            Cell::new(&campaign.name),
            Cell::new(&campaign.keywords),
            Cell::new(campaign.bid_amount),
            Cell::new(campaign.campaign_fund),
            status_cell(campaign.status),
            Cell::new(town_label(campaign.town.as_deref())),
            Cell::new(format!("{} [km]", campaign.radius)),
        ]);
    }
    table
}

/// Renders a status with a color hint.
fn status_cell(status: CampaignStatus) -> Cell {
    match status {
        CampaignStatus::Active => Cell::new(status).fg(Color::Green),
        CampaignStatus::Paused => Cell::new(status).fg(Color::Yellow),
    }
}

/// Returns the town or a placeholder.
fn town_label(town: Option<&str>) -> &str {
    town.unwrap_or("Not specified")
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself may be gone; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
