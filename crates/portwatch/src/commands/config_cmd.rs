//! Config subcommand handlers.

use portwatch_config::{self as config, Config, Defaults, Profile};
use portwatch_core::config::DEFAULT_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{apply_overrides, output_format};
use crate::error::CliError;
use crate::output;

/// Config with a single profile built from the global flags.
fn initial_config(name: &str, global: &GlobalOpts) -> Result<Config, CliError> {
    let mut profile = Profile::new(DEFAULT_URL);
    apply_overrides(&mut profile, global);

    // Reject bad endpoints and intervals before anything is written.
    config::profile_to_monitor_config(&profile, &Defaults::default())?;

    let mut cfg = Config {
        default_profile: Some(name.to_owned()),
        ..Config::default()
    };
    cfg.profiles.insert(name.to_owned(), profile);
    Ok(cfg)
}

fn detail(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("<cannot render config: {e}>"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { name, force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = initial_config(&name, global)?;
            let written = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
                eprintln!("  Active profile: {name}");
                eprintln!("\n  Test it: portwatch status");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                output_format(global, &cfg.defaults),
                &cfg,
                detail,
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
