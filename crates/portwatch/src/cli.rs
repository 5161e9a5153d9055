//! Clap derive structures for the `portwatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portwatch -- live link state and neighbor discovery for a host's ports
#[derive(Debug, Parser)]
#[command(
    name = "portwatch",
    version,
    about = "Watch host port link state and discovered neighbors",
    long_about = "Polls a host's port-status service and shows link state, speed,\n\
        driver binding and the LLDP or ARP neighbor seen on each port.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "PORTWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Port service URL (overrides profile)
    #[arg(long, short = 'e', env = "PORTWATCH_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long, env = "PORTWATCH_INTERVAL", global = true)]
    pub interval: Option<u64>,

    /// Wait after a discovery trigger before re-polling, in milliseconds
    #[arg(long, env = "PORTWATCH_COOLDOWN", global = true)]
    pub cooldown: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, env = "PORTWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PORTWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "PORTWATCH_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch port status once and print it
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Poll continuously and redraw the port board when it changes
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Ask the host to re-run neighbor discovery
    Discover,

    /// Show discovered device and link counts
    Topology,

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATUS / WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Only show these ports (repeatable)
    #[arg(long = "port", value_name = "PORT")]
    pub ports: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only track these ports (repeatable); default is every reported port
    #[arg(long = "port", value_name = "PORT")]
    pub ports: Vec<String>,

    /// Also bind a selector entry per port alongside its status card
    #[arg(long)]
    pub selectors: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with one profile built from the global flags
    Init {
        /// Name of the profile to create
        #[arg(long, default_value = "default")]
        name: String,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
