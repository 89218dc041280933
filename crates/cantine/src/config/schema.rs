use serde::{Deserialize, Serialize};

use crate::ocr::client::DEFAULT_BASE_URL;
use crate::storage::DEFAULT_TABLE_FILENAME;

pub const DEFAULT_API_KEY_ENV_VAR: &str = "API_KEY_DOCUPIPE";
pub const DEFAULT_EXPORT_JSON: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub image_directory: String,
    pub output_directory: String,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Year for menu file names that do not carry one. Defaults to the
    /// current year.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default = "default_export_json")]
    pub export_json: bool,
    #[serde(default)]
    pub ocr: OcrConfig,
}

fn default_output_filename() -> String {
    DEFAULT_TABLE_FILENAME.to_string()
}

fn default_export_json() -> bool {
    DEFAULT_EXPORT_JSON
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Direct API key value. Prefer `api_key_file` or the environment.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_pause_between_images_ms")]
    pub pause_between_images_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env_var() -> String {
    DEFAULT_API_KEY_ENV_VAR.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_pause_between_images_ms() -> u64 {
    3000
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_file: None,
            api_key_env_var: default_api_key_env_var(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
            pause_between_images_ms: default_pause_between_images_ms(),
        }
    }
}
