use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracker_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List today's consolidated tasks
    ///
    /// Example: tracker tasks
    Tasks,
    /// Show how many of today's tasks are done
    ///
    /// Example: tracker progress
    Progress,
    /// Show notices of the selected events and days
    ///
    /// Example: tracker notices
    Notices,
    /// List catalog events and which ones are selected
    ///
    /// Example: tracker events
    Events,
    /// Mark a task as done, or undo it
    ///
    /// Example: tracker toggle daily-login
    /// Example: tracker toggle save-bison --event server-reset-prep
    Toggle {
        id: String,
        #[arg(long, value_name = "EVENT_ID")]
        event: Option<String>,
    },
    /// Record progress toward a counted task
    ///
    /// Example: tracker count hunt-beasts 12
    Count {
        id: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
    /// Show per-event milestones of a counted task
    ///
    /// Example: tracker milestones hunt-beasts
    Milestones {
        id: String,
    },
    /// Select or deselect an event
    ///
    /// Example: tracker event lost-kingdom
    Event {
        id: String,
    },
    /// Choose the active day of a multi-day event
    ///
    /// Example: tracker day lost-kingdom lk-day-2
    Day {
        event_id: String,
        sub_event_id: String,
    },
    /// Reset completions and counters if the daily window has elapsed
    ///
    /// Example: tracker reset
    Reset,
    /// Keep checking for the daily reset
    ///
    /// Example: tracker watch
    /// Example: tracker watch --once
    Watch {
        #[arg(long)]
        once: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Catalog,
    CheckInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "catalog" | "catalog_path" => ConfigOverrideTarget::Catalog,
        "check_interval" | "check_interval_secs" => {
            value
                .parse::<u64>()
                .map_err(|_| format!("check_interval must be a number of seconds, got '{value}'"))?;
            ConfigOverrideTarget::CheckInterval
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds parsed overrides into a [`ConfigOverrides`]; later values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Catalog => {
                overrides.catalog_path = Some(PathBuf::from(parsed.value))
            }
            ConfigOverrideTarget::CheckInterval => {
                overrides.check_interval_secs = parsed.value.parse().ok()
            }
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
