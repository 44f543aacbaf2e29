//! Proof verification boundary.
//!
//! The gateway never inspects proofs itself; it hands a proof file to an
//! external verifier and branches on pass/fail only. The verifier is an
//! injected capability so the admission pipeline is testable without a
//! proving toolchain on the machine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::VerifierConfig;
use crate::{GatewayError, Result};

/// Pass/fail outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The proof checks out.
    Verified,
    /// The verifier rejected the proof.
    Failed {
        /// Combined stdout/stderr of the run, for diagnostics only.
        output: String,
    },
}

/// A proof verification capability.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Check the proof file at `proof`.
    ///
    /// A rejected proof is a [`Verdict::Failed`] value; errors are
    /// reserved for infrastructure failures (spawn, timeout).
    async fn verify(&self, proof: &Path) -> Result<Verdict>;
}

/// Verifier backed by an external command, `<command> [args..] <proof>`.
pub struct CommandVerifier {
    command: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandVerifier {
    /// Resolve the configured command and build a verifier.
    ///
    /// Bare names are searched through `PATH`; a name containing a path
    /// separator must exist as given. Resolution happens once at
    /// startup, so a missing verifier stops the daemon immediately
    /// instead of failing every submission.
    ///
    /// # Errors
    ///
    /// [`GatewayError::VerifierNotFound`] when no executable matches.
    pub fn resolve(config: &VerifierConfig) -> Result<Self> {
        let command = resolve_command(&config.command)?;
        tracing::info!(
            command = %command.display(),
            args = ?config.args,
            timeout_secs = config.timeout_secs,
            "verifier resolved"
        );
        Ok(Self {
            command,
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl ProofVerifier for CommandVerifier {
    async fn verify(&self, proof: &Path) -> Result<Verdict> {
        let mut command = Command::new(&self.command);
        command.args(&self.args).arg(proof).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| GatewayError::VerifierTimeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        let combined = combine_output(&output.stdout, &output.stderr);
        if output.status.success() {
            tracing::debug!(proof = %proof.display(), "verifier accepted proof");
            Ok(Verdict::Verified)
        } else {
            tracing::debug!(
                proof = %proof.display(),
                code = output.status.code(),
                "verifier rejected proof"
            );
            Ok(Verdict::Failed { output: combined })
        }
    }
}

/// Fixed-behavior verifier for tests and offline runs.
///
/// Lets the admission pipeline run without a real proving toolchain.
#[derive(Debug, Clone)]
pub struct StubVerifier {
    verdict: Option<Verdict>,
}

impl StubVerifier {
    /// A stub that accepts every proof.
    pub fn accepting() -> Self {
        Self {
            verdict: Some(Verdict::Verified),
        }
    }

    /// A stub that rejects every proof with the given diagnostic.
    pub fn rejecting(output: &str) -> Self {
        Self {
            verdict: Some(Verdict::Failed {
                output: output.to_string(),
            }),
        }
    }

    /// A stub whose every run fails as an infrastructure error.
    pub fn erroring() -> Self {
        Self { verdict: None }
    }
}

#[async_trait]
impl ProofVerifier for StubVerifier {
    async fn verify(&self, _proof: &Path) -> Result<Verdict> {
        match &self.verdict {
            Some(verdict) => Ok(verdict.clone()),
            None => Err(GatewayError::VerifierExec(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stub verifier offline",
            ))),
        }
    }
}

/// Combine a run's stdout and stderr the way operators expect to read
/// them: stdout first, stderr after, outer whitespace trimmed.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    format!("{}\n{}", stdout.trim(), stderr.trim())
        .trim()
        .to_string()
}

fn resolve_command(name: &str) -> Result<PathBuf> {
    let direct = Path::new(name);
    if name.contains(std::path::MAIN_SEPARATOR) {
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }
        return Err(GatewayError::VerifierNotFound(name.to_string()));
    }
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| GatewayError::VerifierNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_verifier(script: &str, timeout_secs: u64) -> CommandVerifier {
        CommandVerifier::resolve(&VerifierConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            timeout_secs,
        })
        .expect("sh on PATH")
    }

    #[test]
    fn test_resolve_from_path() {
        let verifier = shell_verifier("exit 0", 1);
        assert!(verifier.command.is_file());
    }

    #[test]
    fn test_resolve_missing_command() {
        let config = VerifierConfig {
            command: "definitely-not-a-real-verifier".to_string(),
            args: vec![],
            timeout_secs: 1,
        };
        assert!(matches!(
            CommandVerifier::resolve(&config),
            Err(GatewayError::VerifierNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_explicit_path_must_exist() {
        let config = VerifierConfig {
            command: "/nonexistent/bin/cairo-prove".to_string(),
            args: vec![],
            timeout_secs: 1,
        };
        assert!(matches!(
            CommandVerifier::resolve(&config),
            Err(GatewayError::VerifierNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_exit_zero_is_verified() {
        let verifier = shell_verifier("exit 0", 5);
        let verdict = verifier
            .verify(Path::new("/dev/null"))
            .await
            .expect("verifier runs");
        assert_eq!(verdict, Verdict::Verified);
    }

    #[tokio::test]
    async fn test_nonzero_exit_captures_output() {
        let verifier = shell_verifier("echo invalid proof; echo details >&2; exit 1", 5);
        let verdict = verifier
            .verify(Path::new("/dev/null"))
            .await
            .expect("verifier runs");
        match verdict {
            Verdict::Failed { output } => {
                assert!(output.contains("invalid proof"));
                assert!(output.contains("details"));
            }
            Verdict::Verified => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn test_proof_path_is_appended() {
        // With `sh -c <script>`, the appended proof path arrives as $0.
        let verifier = shell_verifier(r#"test -e "$0""#, 5);
        let present = verifier
            .verify(Path::new("/dev/null"))
            .await
            .expect("verifier runs");
        assert_eq!(present, Verdict::Verified);

        let absent = verifier
            .verify(Path::new("/nonexistent-proof.json"))
            .await
            .expect("verifier runs");
        assert!(matches!(absent, Verdict::Failed { .. }));
    }

    #[tokio::test]
    async fn test_slow_verifier_times_out() {
        let verifier = shell_verifier("sleep 5", 1);
        let err = verifier
            .verify(Path::new("/dev/null"))
            .await
            .expect_err("deadline passes");
        assert!(matches!(
            err,
            GatewayError::VerifierTimeout { timeout_secs: 1 }
        ));
    }

    #[tokio::test]
    async fn test_stub_verdicts() {
        let accept = StubVerifier::accepting();
        assert_eq!(
            accept.verify(Path::new("ignored")).await.expect("stub"),
            Verdict::Verified
        );

        let reject = StubVerifier::rejecting("bad proof");
        match reject.verify(Path::new("ignored")).await.expect("stub") {
            Verdict::Failed { output } => assert_eq!(output, "bad proof"),
            Verdict::Verified => panic!("expected rejection"),
        }

        let offline = StubVerifier::erroring();
        assert!(offline.verify(Path::new("ignored")).await.is_err());
    }

    #[test]
    fn test_combine_output_trims_and_joins() {
        assert_eq!(combine_output(b"out\n", b"err\n"), "out\nerr");
        assert_eq!(combine_output(b"", b"only stderr\n"), "only stderr");
        assert_eq!(combine_output(b"only stdout\n", b""), "only stdout");
        assert_eq!(combine_output(b"", b""), "");
    }
}
