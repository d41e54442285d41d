//! `passport keygen` — Generate a signing key and its verification method.

use clap::Args;
use std::path::PathBuf;

use passport_core::PassportConfig;
use passport_crypto::{verification_method_document, KeyFile, KeyPair, MethodInfo};

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Directory to write the key files into.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Base name of the written files.
    #[arg(short, long, default_value = "issuer")]
    pub name: String,

    /// URL the verification method will be published at.
    #[arg(long)]
    pub verifier: Option<String>,

    /// Organization shown as the issuer when verifying.
    #[arg(long)]
    pub organization: Option<String>,

    /// Controller of the verification method.
    #[arg(long)]
    pub controller: Option<String>,

    /// Overwrite existing files.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &KeygenArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let verifier = args
        .verifier
        .clone()
        .or_else(|| config.signing.verifier.clone())
        .ok_or_else(|| anyhow::anyhow!("--verifier <url> is required (or set [signing] verifier)"))?;

    let key_path = args.out.join(format!("{}.key.json", args.name));
    let method_path = args.out.join(format!("{}.method.json", args.name));
    for path in [&key_path, &method_path] {
        if path.exists() && !args.force {
            anyhow::bail!("{} already exists", path.display());
        }
    }
    std::fs::create_dir_all(&args.out)?;

    let keypair = KeyPair::generate();
    KeyFile::new(&keypair, &verifier).save(&key_path)?;

    let info = MethodInfo {
        id: verifier.clone(),
        controller: args.controller.clone(),
        organization: args.organization.clone(),
    };
    let method = verification_method_document(&keypair.public_key(), &info);
    std::fs::write(&method_path, serde_json::to_string_pretty(&method)?)?;

    tracing::info!(key = %key_path.display(), method = %method_path.display(), "key generated");
    println!("Private key:          {}", key_path.display());
    println!("Verification method:  {}", method_path.display());
    println!("Publish the verification method at {verifier}");
    Ok(())
}
