use clap::Parser;
use std::path::PathBuf;

/// Renders the diplomatic transcripts of a corpus to SVG.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "diplo", version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "DIPLO_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only run the asset server until interrupted.
    #[arg(long, env = "DIPLO_SERVER_ONLY")]
    pub server_only: bool,

    /// Pass the debug flag to the renderer and log debug messages.
    #[arg(long, env = "DIPLO_DEBUG")]
    pub debug: bool,

    /// Number of parallel render jobs (0 = one per CPU).
    #[arg(long, value_name = "COUNT")]
    pub threads: Option<usize>,

    /// Number of terminal page failures that still count as success.
    #[arg(long, value_name = "COUNT")]
    pub allowed_failures: Option<usize>,

    /// Asset server port (0 = any free port).
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,
}
