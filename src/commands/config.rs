//! Config subcommand handler

use anyhow::Result;

use tsr::Config;

/// Show the effective configuration as TOML, preceded by its path.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    let origin = if path.exists() { "" } else { " (not found, defaults)" };
    println!("# {}{}", path.display(), origin);
    print!("{}", toml_str);
    Ok(())
}
