use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CatalogError, DATASET_FILENAME};

/// View modes accepted by `--view`.
pub const VIEW_MODES: [&str; 2] = ["menu", "report"];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics and charts for a book catalog export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "book-analyzer",
    about = "Descriptive statistics and charts for a book catalog export",
    version
)]
pub struct Settings {
    /// Path to the catalog CSV file
    #[arg(long, default_value = DATASET_FILENAME)]
    pub dataset: PathBuf,

    /// Directory that receives generated charts
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// View mode
    #[arg(long, default_value = "menu", value_parser = ["menu", "report"])]
    pub view: String,

    /// Output format for the report view
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Number of authors listed by the top-authors analysis
    #[arg(long, default_value = "5")]
    pub top_authors: usize,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.book-analyzer/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".book-analyzer").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. clap keys args by field name, not flag spelling.
        if !is_arg_explicitly_set(&matches, "dataset") {
            if let Some(v) = last.dataset {
                settings.dataset = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output_dir") {
            if let Some(v) = last.output_dir {
                settings.output_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                match validate_view(&v) {
                    Ok(()) => settings.view = v,
                    Err(e) => tracing::warn!("Ignoring saved view: {}", e),
                }
            }
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("Could not persist settings: {}", e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            dataset: Some(s.dataset.clone()),
            output_dir: Some(s.output_dir.clone()),
            view: Some(s.view.clone()),
        }
    }
}

/// Reject a view name outside [`VIEW_MODES`].
///
/// clap checks `--view` itself; this covers values read back from
/// `last_used.json`, which may have been edited by hand.
pub fn validate_view(view: &str) -> crate::error::Result<()> {
    if VIEW_MODES.contains(&view) {
        return Ok(());
    }
    Err(CatalogError::Config(format!(
        "Unknown view mode '{}', expected one of: {}",
        view,
        VIEW_MODES.join(", ")
    )))
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
