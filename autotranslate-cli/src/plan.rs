use autotranslate::plan;

use crate::config::{CliConfig, ConfigArgs};

/// Prints every file a translation run would create or modify, one per line.
pub fn run_plan_command(args: &ConfigArgs) -> Result<(), String> {
    let config = CliConfig::load(args)?;
    let pending = plan(&config.translation).map_err(|e| e.to_string())?;
    if pending.is_empty() {
        println!("Nothing to translate.");
        return Ok(());
    }
    for path in pending {
        println!("{}", path.display());
    }
    Ok(())
}
