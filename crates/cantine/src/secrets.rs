//! Resolution of the OCR API key from the places it may be configured.
//!
//! Sources are tried in priority order:
//!
//! 1. **Direct value** in the config file, for quick local runs
//! 2. **File reference**, e.g. a mounted secret (`~` is expanded)
//! 3. **Environment variable**, `API_KEY_DOCUPIPE` unless configured otherwise

use std::fs;

use log::debug;
use secrecy::SecretString;

use crate::config::OcrConfig;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from the first source that is present and non-empty.
/// File contents and env values are trimmed.
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = direct.filter(|v| !v.is_empty()) {
        debug!("Using secret from direct value");
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = file_path.filter(|p| !p.is_empty()) {
        let expanded = expand_home(path);
        return match fs::read_to_string(&expanded) {
            Ok(content) => {
                debug!("Using secret from file {}", expanded);
                Ok(SecretString::from(content.trim().to_string()))
            }
            Err(e) => Err(SecretError::FileReadError {
                path: expanded,
                source: e,
            }),
        };
    }

    if let Some(var_name) = env_var.filter(|n| !n.is_empty()) {
        return match std::env::var(var_name) {
            Ok(value) => {
                debug!("Using secret from environment variable {}", var_name);
                Ok(SecretString::from(value.trim().to_string()))
            }
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                name: var_name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                name: var_name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSourceProvided)
}

/// The OCR service key, resolved from the `ocr` config block.
pub fn resolve_api_key(ocr: &OcrConfig) -> Result<SecretString> {
    resolve_secret(
        ocr.api_key.as_deref(),
        ocr.api_key_file.as_deref(),
        Some(ocr.api_key_env_var.as_str()),
    )
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}{}", home.to_string_lossy(), &path[1..]);
        }
    }
    path.to_string()
}
