//! `passport lint` — Verify credentials and lint them against their schema.

use clap::Args;

use passport_core::PassportConfig;
use passport_credentials::Linter;

use super::finish;
use super::verify::verify_all;
use crate::data;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Input document (file, URL, or - for stdin).
    #[arg(long = "in", default_value = "-")]
    pub input: String,

    /// The document is the claim, not the whole credential.
    #[arg(long)]
    pub claim: bool,
}

pub async fn run(args: &LintArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let schemas = data::load_schemas(&config.data.schemas_dir)?;
    let linter = Linter::new(&schemas);
    let report = verify_all(&args.input, args.claim, config).await?;

    for outcome in report.outcomes() {
        if let Ok(result) = &outcome.result {
            if !result.valid {
                tracing::warn!(index = outcome.index, "credential did not verify; linting anyway");
            }
            let lints = linter.lint(&result.subject);
            println!("{}", serde_json::to_string_pretty(&lints)?);
        }
    }
    finish(&report)
}
