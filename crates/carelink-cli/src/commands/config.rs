//! Config command implementation.

use anyhow::Result;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, quiet: bool) -> Result<()> {
    let path = Config::path();
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load();
            if !quiet {
                eprintln!("# {}", path.display());
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            if path.exists() {
                if !quiet {
                    eprintln!("Config already exists at {}", path.display());
                }
                return Ok(());
            }
            Config::default().save()?;
            if !quiet {
                eprintln!("Created {}", path.display());
            }
        }
    }
    Ok(())
}
