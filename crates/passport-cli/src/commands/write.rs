//! `passport write` — Write each document of a stream to its own file.

use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};

use passport_core::{run_batch, PassportConfig};
use passport_credentials::{document_id, file_stem};

use super::{document_loader, emit_stream, finish, successes};

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Documents to write (file, URL, or - for stdin).
    #[arg(long = "in", default_value = "-")]
    pub input: String,

    /// Where to write files.
    #[arg(long, default_value = "website")]
    pub folder: PathBuf,

    /// Pass written documents through to stdout (the default).
    #[arg(long, overrides_with = "no_out")]
    pub out: bool,

    /// Don't pass written documents through to stdout.
    #[arg(long = "no-out", overrides_with = "out")]
    pub no_out: bool,
}

impl WriteArgs {
    fn pass_through(&self) -> bool {
        !self.no_out
    }
}

/// Target file for `document` inside `folder`.
///
/// The file name is the part of the document id after its last `:`, and
/// must name a plain file: no separators, no `.`/`..`, not absolute.
fn target(folder: &Path, document: &Value) -> anyhow::Result<PathBuf> {
    let id = document_id(document).ok_or_else(|| anyhow::anyhow!("document has no id"))?;
    let stem = file_stem(id);
    if stem.is_empty() {
        anyhow::bail!("id {id} yields an empty file name");
    }
    if stem.contains(['/', '\\']) || stem == "." || stem == ".." || Path::new(stem).is_absolute() {
        anyhow::bail!("id {id} yields a file name outside {}", folder.display());
    }
    Ok(folder.join(format!("{stem}.json")))
}

async fn write_one(folder: &Path, document: Value) -> anyhow::Result<Value> {
    let path = target(folder, &document)?;
    tokio::fs::create_dir_all(folder).await?;
    tokio::fs::write(&path, serde_json::to_string_pretty(&document)?).await?;
    tracing::info!(path = %path.display(), "written");
    Ok(document)
}

pub async fn run(args: &WriteArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let documents = document_loader(config)?.load(&args.input).await?;
    let folder = args.folder.as_path();
    let report = run_batch(documents, config.concurrency(), |_, document| write_one(folder, document)).await;

    if args.pass_through() {
        emit_stream(successes(&report))?;
    }
    finish(&report)
}
