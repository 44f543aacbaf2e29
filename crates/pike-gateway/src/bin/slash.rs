//! Offline slash recovery for two conflicting RLN shares.
//!
//! Takes two shares (JSON file paths or inline JSON), checks they spend
//! the same nullifier and ticket at distinct evaluation points, and
//! prints the recovered identity secret as a pretty JSON report.

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;

use pike_field::{felt, recovery};
use pike_ledger::share::Share;

#[derive(Parser, Debug)]
#[command(name = "slash", version, about = "Recover an identity secret from two shares")]
struct Cli {
    /// Path to a JSON share file, or the share as an inline JSON string
    share1: String,
    /// Path to a JSON share file, or the share as an inline JSON string
    share2: String,
    /// Expected identity secret to check the recovered value against
    #[arg(long = "expected-identity-secret")]
    expected_identity_secret: Option<String>,
}

/// Read a share from a file path, or parse the argument itself as JSON.
fn load_share(path_or_json: &str) -> anyhow::Result<Share> {
    let candidate = Path::new(path_or_json);
    let text = if candidate.exists() {
        std::fs::read_to_string(candidate)
            .with_context(|| format!("reading {}", candidate.display()))?
    } else {
        path_or_json.to_string()
    };
    let payload: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {path_or_json}"))?;
    Ok(Share::from_json(&payload)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let share1 = load_share(&cli.share1)?;
    let share2 = load_share(&cli.share2)?;

    if share1.nullifier != share2.nullifier {
        bail!("nullifiers do not match");
    }
    if share1.ticket_index != share2.ticket_index {
        bail!("ticket_index does not match");
    }
    if share1.x == share2.x {
        bail!("x values must be different to recover the secret");
    }

    let identity_secret =
        recovery::recover_identity_secret(share1.x, share1.y, share2.x, share2.y)?;
    let a1 = recovery::derive_slope(identity_secret, share1.x, share1.y)?;

    let mut report = json!({
        "nullifier": felt::to_hex(&share1.nullifier),
        "ticket_index": felt::to_hex(&share1.ticket_index),
        "share1": { "x": felt::to_hex(&share1.x), "y": felt::to_hex(&share1.y) },
        "share2": { "x": felt::to_hex(&share2.x), "y": felt::to_hex(&share2.y) },
        "recovered_identity_secret": felt::to_hex(&identity_secret),
        "derived_a1": felt::to_hex(&a1),
        "slash": true,
    });

    if let Some(raw) = &cli.expected_identity_secret {
        let expected = felt::from_text(raw).context("parsing --expected-identity-secret")?;
        report["expected_identity_secret"] = json!(felt::to_hex(&expected));
        report["identity_match"] = json!(expected == identity_secret);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
