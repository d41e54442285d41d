//! `passport sign` — Sign every document of a stream.

use clap::Args;
use std::path::PathBuf;

use passport_core::{run_batch, PassportConfig};

use super::{credential_issuer, document_loader, emit_stream, finish, successes};

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Documents to sign (file, URL, or - for stdin).
    #[arg(long = "in", default_value = "-")]
    pub input: String,

    /// Key file written by `passport keygen`.
    #[arg(short, long)]
    pub key: PathBuf,

    /// Override the verification method URL named in proofs.
    #[arg(long)]
    pub verifier: Option<String>,
}

pub async fn run(args: &SignArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let issuer = credential_issuer(&args.key, args.verifier.as_deref(), config)?;
    let documents = document_loader(config)?.load(&args.input).await?;

    let issuer = &issuer;
    let report = run_batch(documents, config.concurrency(), |_, document| issuer.sign(document)).await;

    emit_stream(successes(&report))?;
    finish(&report)
}
