//! `passport init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use passport_core::PassportConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    let config = PassportConfig::default();
    config.save(config_path)?;

    let base = config_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(base.join(&config.data.templates_dir))?;
    std::fs::create_dir_all(base.join(&config.data.schemas_dir))?;

    println!("Wrote {}", config_path.display());
    println!("Set [signing] verifier and issuer, then run 'passport keygen'.");
    Ok(())
}
