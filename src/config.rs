//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/learnpath/learnpath.toml`
//! 3. Local config: `<content_dir>/.learnpath.toml`
//! 4. Environment variables: `LEARNPATH_*` prefix
//!
//! A content directory passed on the command line beats all of them.
//! `content_dir` is settled (and `~` expanded) before the local config is
//! looked up, so the local file is read from the directory actually used.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, SortOrder};

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub content_dir: Option<PathBuf>,
    pub topics: Option<PathBuf>,
    pub curricula_file: Option<PathBuf>,
    pub issues_file: Option<PathBuf>,
    pub cohorts_file: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub default_sort: Option<SortOrder>,
}

/// Unified configuration for learnpath.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the content snapshot (default: ./content)
    pub content_dir: PathBuf,
    /// Topic source: JSON file or directory of .md/.mdx files, relative to content_dir
    pub topics: PathBuf,
    pub curricula_file: PathBuf,
    pub issues_file: PathBuf,
    pub cohorts_file: PathBuf,
    /// Key-value state (dismissed banners); relative paths resolve against content_dir
    pub state_file: PathBuf,
    /// Sort order when none is requested
    pub default_sort: SortOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            topics: PathBuf::from("topics"),
            curricula_file: PathBuf::from("curricula.json"),
            issues_file: PathBuf::from("issues.json"),
            cohorts_file: PathBuf::from("cohorts.json"),
            state_file: default_state_file(),
            default_sort: SortOrder::Relevance,
        }
    }
}

fn default_state_file() -> PathBuf {
    ProjectDirs::from("", "", "learnpath")
        .map(|dirs| dirs.data_dir().join("state.json"))
        .unwrap_or_else(|| PathBuf::from(".learnpath-state.json"))
}

/// Get the XDG config directory for learnpath.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "learnpath").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("learnpath.toml"))
}

/// Get the path to the local config file in a content directory.
pub fn local_config_path(content_dir: &Path) -> PathBuf {
    content_dir.join(".learnpath.toml")
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Resolve a configured path against `content_dir` unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.content_dir.join(path)
        }
    }

    pub fn topics_path(&self) -> PathBuf {
        self.resolve(&self.topics)
    }

    pub fn curricula_path(&self) -> PathBuf {
        self.resolve(&self.curricula_file)
    }

    pub fn issues_path(&self) -> PathBuf {
        self.resolve(&self.issues_file)
    }

    pub fn cohorts_path(&self) -> PathBuf {
        self.resolve(&self.cohorts_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    /// Expand shell variables and tilde in path fields.
    fn expand_paths(&mut self) {
        self.content_dir = expand_path(&self.content_dir);
        self.topics = expand_path(&self.topics);
        self.curricula_file = expand_path(&self.curricula_file);
        self.issues_file = expand_path(&self.issues_file);
        self.cohorts_file = expand_path(&self.cohorts_file);
        self.state_file = expand_path(&self.state_file);
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            content_dir: overlay
                .content_dir
                .clone()
                .unwrap_or_else(|| self.content_dir.clone()),
            topics: overlay.topics.clone().unwrap_or_else(|| self.topics.clone()),
            curricula_file: overlay
                .curricula_file
                .clone()
                .unwrap_or_else(|| self.curricula_file.clone()),
            issues_file: overlay
                .issues_file
                .clone()
                .unwrap_or_else(|| self.issues_file.clone()),
            cohorts_file: overlay
                .cohorts_file
                .clone()
                .unwrap_or_else(|| self.cohorts_file.clone()),
            state_file: overlay
                .state_file
                .clone()
                .unwrap_or_else(|| self.state_file.clone()),
            default_sort: overlay.default_sort.unwrap_or(self.default_sort),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `content_dir` - Content directory from the command line, if given
    pub fn load(content_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), content_dir)
    }

    fn load_layers(
        global_path: Option<&Path>,
        content_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let env = Self::env_source()?;

        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path.filter(|p| p.exists()) {
            let raw = load_raw_settings(global_path)?;
            current = current.merge_with(&raw);
        }

        // content_dir is final before the local config is looked up
        if let Ok(val) = env.get_string("content_dir") {
            current.content_dir = PathBuf::from(val);
        }
        if let Some(dir) = content_dir {
            current.content_dir = dir.to_path_buf();
        }
        current.content_dir = expand_path(&current.content_dir);

        // 3. Local config next to the content
        let local_path = local_config_path(&current.content_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            // content_dir itself cannot move from inside the content dir
            let raw = RawSettings {
                content_dir: None,
                ..raw
            };
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, &env)?;

        current.expand_paths();
        Ok(current)
    }

    fn env_source() -> Result<Config, ApplicationError> {
        Config::builder()
            .add_source(Environment::with_prefix("LEARNPATH").separator("__"))
            .build()
            .map_err(config_err)
    }

    /// Apply LEARNPATH_* environment variables other than content_dir.
    fn apply_env_overrides(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = config.get_string("topics") {
            settings.topics = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("curricula_file") {
            settings.curricula_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("issues_file") {
            settings.issues_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("cohorts_file") {
            settings.cohorts_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("state_file") {
            settings.state_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_sort") {
            settings.default_sort = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("LEARNPATH_DEFAULT_SORT: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# learnpath configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/learnpath/learnpath.toml
#   Local:  <content_dir>/.learnpath.toml
#   Env:    LEARNPATH_* environment variables
#   CLI:    -C/--content-dir

# Root of the content snapshot
# content_dir = "content"

# Topics: a JSON array file or a directory of .md/.mdx files (relative to content_dir)
# topics = "topics"

# curricula_file = "curricula.json"
# issues_file = "issues.json"
# cohorts_file = "cohorts.json"

# Dismissed-banner state
# state_file = "~/.local/share/learnpath/state.json"

# relevance | newest | oldest
# default_sort = "relevance"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
