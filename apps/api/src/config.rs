use anyhow::{Context, Result};

use crate::extraction::ExtractionPolicy;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    pub extraction_order: ExtractionPolicy,
    pub max_upload_bytes: usize,
    pub preview_chars: usize,
    pub raster_dpi: u32,
    pub pdftoppm_path: String,
    pub model_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            extraction_order: match std::env::var("EXTRACTION_ORDER") {
                Ok(raw) => raw
                    .parse::<ExtractionPolicy>()
                    .context("EXTRACTION_ORDER must list text_layer, vision, fallback_text_layer")?,
                Err(_) => ExtractionPolicy::default(),
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            preview_chars: parse_env("PREVIEW_CHARS", DEFAULT_PREVIEW_CHARS)?,
            raster_dpi: parse_env("RASTER_DPI", 150)?,
            pdftoppm_path: std::env::var("PDFTOPPM_PATH").unwrap_or_else(|_| "pdftoppm".to_string()),
            model_timeout_secs: parse_env("MODEL_TIMEOUT_SECS", 120)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config for handler tests; never read from the environment.
    pub fn for_tests() -> Self {
        Config {
            google_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            extraction_order: ExtractionPolicy::default(),
            max_upload_bytes: 1024 * 1024,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            raster_dpi: 150,
            pdftoppm_path: "pdftoppm".to_string(),
            model_timeout_secs: 5,
        }
    }
}
