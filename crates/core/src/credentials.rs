//! Credential file loading
//!
//! Credentials are read once at startup from a JSON file (conventionally
//! `aws_credentials.json` in the working directory) and passed down by value.
//! There is no process-wide credential state and no persistence beyond the
//! file itself.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Conventional credential file name, resolved against the working directory
pub const DEFAULT_CREDENTIALS_FILE: &str = "aws_credentials.json";

/// Region used when the credential file does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Static access credentials for the object store
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Region (optional, defaults to [`DEFAULT_REGION`])
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible stores (optional)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Credentials {
    /// Region to use for client construction
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

/// Load credentials from a JSON file
///
/// A missing file and a malformed file are distinct failures; both abort the
/// run before any network call is made.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::CredentialsMissing(path.display().to_string()),
        _ => Error::Io(e),
    })?;

    let credentials: Credentials = serde_json::from_str(&content)
        .map_err(|e| Error::CredentialsInvalid(format!("{}: {}", path.display(), e)))?;

    // An endpoint that does not parse as a URL would otherwise surface as an
    // opaque SDK failure on the first request.
    if let Some(endpoint) = &credentials.endpoint {
        url::Url::parse(endpoint)?;
    }

    Ok(credentials)
}
