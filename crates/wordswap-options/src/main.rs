//! Wordswap options: command-line entry point.
//!
//! Edits the replacement rule list and global toggles stored in the
//! preference file.  Each invocation opens the page, applies one command,
//! and saves when the command changes something.
//!
//! # Usage
//!
//! ```text
//! wordswap-options [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list                         Show the rules in priority order
//!   add <FROM> [TO] [--ignore-case] [--whole-word] [--smart-case]
//!   edit <ROW> <FROM> [TO] [flags]
//!   delete <ROW>                 Remove a rule
//!   up <ROW>                     Move a rule up one step
//!   top <ROW>                    Move a rule to the top
//!   clear                        Remove every rule
//!   export                       Print the rules as JSON
//!   import [FILE]                Replace the rules with JSON from FILE (or stdin)
//!   settings [--dynamic on|off] [--timeout <MS>] [--skip-pre on|off] [--skip-code on|off]
//!
//! Options:
//!   --config <PATH>   Config file [env: WORDSWAP_CONFIG]
//!   --store <PATH>    Preference store file [env: WORDSWAP_STORE]
//! ```
//!
//! Rows are numbered from 1 as printed by `list`.
//!
//! # Architecture overview
//!
//! ```text
//! main()
//!  └─ load AppConfig (TOML)
//!  └─ JsonFileStore ──► PreferencesStore ──► AppState (OptionsPage)
//!  └─ ui_bridge command ──► save
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wordswap_options::application::preferences_store::PreferencesStore;
use wordswap_options::infrastructure::storage::config::{
    config_file_path, load_config_from, AppConfig,
};
use wordswap_options::infrastructure::storage::JsonFileStore;
use wordswap_options::infrastructure::ui_bridge::{
    self, AppState, CommandResult, RowDto, SaveSummaryDto, SettingsDto,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Manage Wordswap replacement rules and preferences.
#[derive(Debug, Parser)]
#[command(name = "wordswap-options", version, about)]
struct Cli {
    /// TOML config file.  Defaults to the platform config directory.
    #[arg(long, env = "WORDSWAP_CONFIG")]
    config: Option<PathBuf>,

    /// Preference store file.  Overrides `[storage] path` from the config.
    #[arg(long, env = "WORDSWAP_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the rules in priority order.
    List,
    /// Append a rule.
    Add(RuleArgs),
    /// Replace the rule in a row.
    Edit {
        /// Row number as shown by `list`.
        row: usize,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Remove a rule.
    Delete { row: usize },
    /// Move a rule up one step.
    Up { row: usize },
    /// Move a rule to the top.
    Top { row: usize },
    /// Remove every rule.
    Clear,
    /// Print the saved rules as JSON.
    Export,
    /// Replace every rule with a JSON array read from FILE, or stdin when omitted or `-`.
    Import { file: Option<PathBuf> },
    /// Show or change global toggles.
    Settings(SettingsArgs),
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Text to find.
    from: String,
    /// Replacement text.
    #[arg(default_value = "")]
    to: String,
    #[arg(long)]
    ignore_case: bool,
    #[arg(long)]
    whole_word: bool,
    #[arg(long)]
    smart_case: bool,
}

impl RuleArgs {
    fn into_row(self, position: usize) -> RowDto {
        RowDto {
            position,
            from: self.from,
            to: self.to,
            ignore_case: self.ignore_case,
            whole_word: self.whole_word,
            smart_case: self.smart_case,
        }
    }
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// Enable dynamic mode.
    #[arg(long, value_parser = parse_switch)]
    dynamic: Option<bool>,
    /// Dynamic mode delay in milliseconds.
    #[arg(long)]
    timeout: Option<String>,
    /// Skip text inside <pre> tags.
    #[arg(long, value_parser = parse_switch)]
    skip_pre: Option<bool>,
    /// Skip text inside <code> tags.
    #[arg(long, value_parser = parse_switch)]
    skip_code: Option<bool>,
}

impl SettingsArgs {
    fn is_empty(&self) -> bool {
        self.dynamic.is_none()
            && self.timeout.is_none()
            && self.skip_pre.is_none()
            && self.skip_code.is_none()
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got `{other}`")),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_app_config(cli.config.as_ref())?;

    // `RUST_LOG` overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store_path = match cli.store {
        Some(path) => path,
        None => config
            .store_path()
            .context("cannot locate the preference store; pass --store")?,
    };
    info!(path = %store_path.display(), "opening preference store");

    let store = PreferencesStore::new(Arc::new(JsonFileStore::new(store_path)));
    let state = AppState::open(store)
        .await
        .context("failed to load preferences")?;

    run(cli.command, state).await
}

fn load_app_config(explicit: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => match config_file_path() {
            Ok(path) => path,
            Err(_) => return Ok(AppConfig::default()),
        },
    };
    load_config_from(&path).with_context(|| format!("failed to read config {}", path.display()))
}

async fn run(command: Command, state: Arc<AppState>) -> anyhow::Result<()> {
    match command {
        Command::List => print_rows(&state).await?,
        Command::Add(rule) => {
            let appended = ui_bridge::append_rule(Arc::clone(&state), rule.into_row(0)).await;
            let position = expect_ok(appended)?;
            debug!(position, "rule appended");
            save(&state).await?;
        }
        Command::Edit { row, rule } => {
            let position = row_index(row)?;
            expect_ok(ui_bridge::update_row(Arc::clone(&state), rule.into_row(position)).await)?;
            save(&state).await?;
        }
        Command::Delete { row } => {
            if !expect_ok(ui_bridge::delete_row(Arc::clone(&state), row_index(row)?).await)? {
                bail!("no rule in row {row}");
            }
            save(&state).await?;
        }
        Command::Up { row } => {
            if expect_ok(ui_bridge::move_row_up(Arc::clone(&state), row_index(row)?).await)? {
                save(&state).await?;
            } else {
                println!("row {row} is already at the top or does not exist");
            }
        }
        Command::Top { row } => {
            if expect_ok(ui_bridge::move_row_to_top(Arc::clone(&state), row_index(row)?).await)? {
                save(&state).await?;
            } else {
                println!("row {row} is already at the top or does not exist");
            }
        }
        Command::Clear => {
            // The page leaves clearing unsaved; a CLI run is a complete interaction.
            expect_ok(ui_bridge::clear_rules(Arc::clone(&state)).await)?;
            save(&state).await?;
        }
        Command::Export => {
            println!("{}", expect_ok(ui_bridge::get_scratchpad(state).await)?);
        }
        Command::Import { file } => {
            let text = read_import_source(file)?;
            expect_ok(ui_bridge::set_scratchpad(Arc::clone(&state), text).await)?;
            let summary = expect_ok(ui_bridge::import_scratchpad(state).await)?;
            println!("imported {} rule(s)", summary.rules_saved);
        }
        Command::Settings(args) => {
            if args.is_empty() {
                print_settings(&state, None).await?;
            } else {
                let mut settings = expect_ok(ui_bridge::get_settings(Arc::clone(&state)).await)?;
                if let Some(on) = args.dynamic {
                    settings.use_dynamic_mode = on;
                }
                if let Some(text) = args.timeout {
                    settings.dynamic_timeout = text;
                }
                if let Some(on) = args.skip_pre {
                    settings.skip_pre_tags = on;
                }
                if let Some(on) = args.skip_code {
                    settings.skip_code_tags = on;
                }
                expect_ok(ui_bridge::update_settings(Arc::clone(&state), settings).await)?;
                let summary = save(&state).await?;
                print_settings(&state, Some(summary.dynamic_timeout_ms)).await?;
            }
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn expect_ok<T: serde::Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    match (result.success, result.data) {
        (true, Some(data)) => Ok(data),
        _ => bail!(result
            .error
            .unwrap_or_else(|| "command failed".to_string())),
    }
}

fn row_index(row: usize) -> anyhow::Result<usize> {
    match row.checked_sub(1) {
        Some(position) => Ok(position),
        None => bail!("rows are numbered from 1"),
    }
}

fn read_import_source(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn save(state: &Arc<AppState>) -> anyhow::Result<SaveSummaryDto> {
    let summary = expect_ok(ui_bridge::save(Arc::clone(state)).await)?;
    println!("saved {} rule(s)", summary.rules_saved);
    Ok(summary)
}

async fn print_rows(state: &Arc<AppState>) -> anyhow::Result<()> {
    let rows = expect_ok(ui_bridge::get_rows(Arc::clone(state)).await)?;
    if rows.iter().all(|r| r.from.is_empty()) {
        println!("(no rules)");
        return Ok(());
    }
    for row in rows.iter().filter(|r| !r.from.is_empty()) {
        let mut flags = Vec::new();
        if row.ignore_case {
            flags.push("ignore-case");
        }
        if row.whole_word {
            flags.push("whole-word");
        }
        if row.smart_case {
            flags.push("smart-case");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", flags.join(", "))
        };
        println!("{:>3}. {:?} -> {:?}{}", row.position + 1, row.from, row.to, flags);
    }
    Ok(())
}

/// `saved_timeout_ms` is the value just written, which differs from the typed
/// text when the text had no leading integer.
async fn print_settings(
    state: &Arc<AppState>,
    saved_timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let settings = expect_ok(ui_bridge::get_settings(Arc::clone(state)).await)?;
    for line in settings_lines(&settings, saved_timeout_ms) {
        println!("{line}");
    }
    Ok(())
}

fn settings_lines(settings: &SettingsDto, saved_timeout_ms: Option<u64>) -> Vec<String> {
    let switch = |on: bool| if on { "on" } else { "off" };
    let mut lines = vec![format!("dynamic mode: {}", switch(settings.use_dynamic_mode))];
    if settings.use_dynamic_mode {
        lines.push(match saved_timeout_ms {
            Some(ms) => format!("dynamic timeout: {ms} ms"),
            None => format!("dynamic timeout: {} ms", settings.dynamic_timeout),
        });
    }
    lines.push(format!("skip <pre>: {}", switch(settings.skip_pre_tags)));
    lines.push(format!("skip <code>: {}", switch(settings.skip_code_tags)));
    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────
