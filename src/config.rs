use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Where the upload credential (API token) comes from.
///
/// Parsed from a source string: `file:<path>`, `env:<VAR>`, or `interactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Token stored in a file on disk (e.g. a service-account key).
    File(PathBuf),
    /// Token held in an environment variable (secret-store style).
    Env(String),
    /// Token prompted for on stdin.
    Interactive,
}

impl FromStr for CredentialSource {
    type Err = anyhow::Error;

    fn from_str(source: &str) -> Result<Self> {
        if source == "interactive" {
            return Ok(CredentialSource::Interactive);
        }
        match source.split_once(':') {
            Some(("file", path)) if !path.is_empty() => {
                Ok(CredentialSource::File(PathBuf::from(path)))
            }
            Some(("env", var)) if !var.is_empty() => Ok(CredentialSource::Env(var.to_string())),
            _ => bail!(
                "invalid credential source {source:?}, expected file:<path>, env:<VAR>, or interactive"
            ),
        }
    }
}

impl CredentialSource {
    /// Resolve the source to a token, trimmed of surrounding whitespace.
    pub fn resolve(&self) -> Result<String> {
        let raw = match self {
            CredentialSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read credential file {:?}", path))?,
            CredentialSource::Env(var) => std::env::var(var)
                .with_context(|| format!("Credential variable {var} is not set"))?,
            CredentialSource::Interactive => {
                eprint!("Upload token: ");
                std::io::stderr().flush().ok();
                let mut line = String::new();
                std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .context("Failed to read token from stdin")?;
                line
            }
        };

        let token = raw.trim();
        if token.is_empty() {
            bail!("resolved credential is empty");
        }
        Ok(token.to_string())
    }
}
