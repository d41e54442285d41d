//! `passport generate` — Assemble credential records with a recipe.

use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;

use passport_core::{path, run_batch, PassportConfig, Path};
use passport_credentials::{wrap_claim, CredentialIssuer};
use passport_templates::{Context, Recipe, TemplateRegistry};

use super::{credential_issuer, document_loader, emit_stream, finish, successes};
use crate::data;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Recipe describing the template chain.
    #[arg(short, long)]
    pub recipe: PathBuf,

    /// Input records (file, URL, or - for stdin).
    #[arg(long, default_value = "-")]
    pub records: String,

    /// Wrap each assembled record in a credential envelope.
    #[arg(long)]
    pub wrap: bool,

    /// Sign each credential with this key file (implies --wrap).
    #[arg(short, long)]
    pub key: Option<PathBuf>,

    /// Override the verification method URL named in proofs.
    #[arg(long)]
    pub verifier: Option<String>,

    /// Prefix of subject identifiers built from each record's `code`.
    #[arg(long, default_value = "did:example:")]
    pub id_prefix: String,

    /// Process at most this many records.
    #[arg(short, long)]
    pub n: Option<usize>,
}

/// Identifier of the subject described by `record`.
fn subject_id(prefix: &str, record: &Value) -> String {
    match path::get(record, &Path::parse("code")) {
        Some(Value::String(code)) if !code.is_empty() => format!("{prefix}{code}"),
        Some(Value::Number(code)) => format!("{prefix}{code}"),
        _ => format!("urn:uuid:{}", uuid::Uuid::now_v7()),
    }
}

async fn generate_one(
    index: usize,
    record: Value,
    args: &GenerateArgs,
    templates: &TemplateRegistry,
    recipe: &Recipe,
    issuer: Option<&CredentialIssuer>,
) -> anyhow::Result<Value> {
    let context = Context::new()
        .with_value("did", Value::String(subject_id(&args.id_prefix, &record)))
        .with_value("index", json!(index))
        .with_value("record", record);

    let assembled = recipe.assemble(templates, context)?;

    Ok(match issuer {
        Some(issuer) => issuer.issue(assembled).await?,
        None if args.wrap => wrap_claim(assembled),
        None => assembled,
    })
}

pub async fn run(args: &GenerateArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let templates = data::load_templates(&config.data.templates_dir)?;
    let recipe = data::load_recipe(&args.recipe)?;
    recipe.check(&templates)?;

    let issuer = match &args.key {
        Some(key) => Some(credential_issuer(key, args.verifier.as_deref(), config)?),
        None => None,
    };

    let mut records = document_loader(config)?.load(&args.records).await?;
    if let Some(n) = args.n {
        records.truncate(n);
    }
    tracing::info!(records = records.len(), recipe = %args.recipe.display(), "generating");

    let (templates, recipe, issuer) = (&templates, &recipe, issuer.as_ref());
    let report = run_batch(records, config.concurrency(), |index, record| {
        generate_one(index, record, args, templates, recipe, issuer)
    })
    .await;

    emit_stream(successes(&report))?;
    finish(&report)
}
