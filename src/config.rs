//! Run configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `DIPLO__`-prefixed environment variables (`DIPLO__RENDER__THREADS=8`),
//! then command-line flags. The result is validated once and never changes
//! during a run.

use crate::cli::Cli;
use config::{Config, Environment, File, FileFormat};
use diplo_core::{DEFAULT_MAX_ROUNDS, DocumentSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub output: OutputSettings,
    pub render: RenderSettings,
    pub server: ServerSettings,
    pub export: ExportSettings,
    pub postprocess: PostProcessSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub root: PathBuf,
    /// Subdirectory of `root` holding the documents.
    pub document_dir: PathBuf,
    pub schema: DocumentSchema,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/xml"),
            document_dir: PathBuf::from("document"),
            schema: DocumentSchema::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub root: PathBuf,
    /// Write `render-jobs/<basename>.json` for the multi-page renderer.
    pub per_document_jobs: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("target"),
            per_document_jobs: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Primary,
    Alternate,
}

/// How to launch one rendering engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub binary: String,
    pub script: String,
    /// Extra arguments placed before the script.
    pub flags: Vec<String>,
    /// First argument in debug mode; empty for none.
    pub debug_flag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub engine: Engine,
    pub primary: EngineSettings,
    pub alternate: EngineSettings,
    /// Worker pool size; 0 means one per CPU.
    pub threads: usize,
    pub allowed_failures: usize,
    pub max_rounds: usize,
    /// Per-page renderer timeout; none by default.
    pub timeout_secs: Option<u64>,
    pub debug: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            engine: Engine::Primary,
            primary: EngineSettings {
                binary: "/usr/local/bin/phantomjs".to_string(),
                script: "rendersvgs.js".to_string(),
                flags: Vec::new(),
                debug_flag: "--debug=errors".to_string(),
            },
            alternate: EngineSettings {
                binary: "node".to_string(),
                script: "rendersvgs-puppeteer.js".to_string(),
                flags: Vec::new(),
                debug_flag: String::new(),
            },
            threads: 0,
            allowed_failures: 0,
            max_rounds: DEFAULT_MAX_ROUNDS,
            timeout_secs: None,
            debug: false,
        }
    }
}

impl RenderSettings {
    /// The engine selected by `engine`.
    pub fn active_engine(&self) -> &EngineSettings {
        match self.engine {
            Engine::Primary => &self.primary,
            Engine::Alternate => &self.alternate,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub webapp_dir: PathBuf,
    pub entry: String,
    /// 0 picks a free port.
    pub port: u16,
    /// Only serve the webapp until interrupted; render nothing.
    pub server_only: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            webapp_dir: PathBuf::from("svg_rendering/page"),
            entry: "transcript-generation.html".to_string(),
            port: 0,
            server_only: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Transform command; `{input}` is replaced by the page's source path
    /// and stdout is taken as the JSON.
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessSettings {
    /// Stylesheet URI linked into prepared SVGs. Post-processing is off
    /// without one.
    pub stylesheet: Option<String>,
}

impl Settings {
    /// Loads and validates the settings for a command line.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = Self::load_layers(cli.config.as_deref())?;
        settings.apply_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, optional file and environment, without CLI overrides.
    pub fn load_layers(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("DIPLO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if cli.server_only {
            self.server.server_only = true;
        }
        if cli.debug {
            self.render.debug = true;
        }
        if let Some(threads) = cli.threads {
            self.render.threads = threads;
        }
        if let Some(allowed) = cli.allowed_failures {
            self.render.allowed_failures = allowed;
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "render.max_rounds must be at least 1".to_string(),
            ));
        }
        if self.render.active_engine().binary.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "render.{}.binary must not be empty",
                match self.render.engine {
                    Engine::Primary => "primary",
                    Engine::Alternate => "alternate",
                }
            )));
        }
        if !self.server.server_only && self.export.command.is_empty() {
            return Err(ConfigError::Invalid(
                "export.command is required unless running server-only".to_string(),
            ));
        }
        if self.server.entry.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.entry must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
