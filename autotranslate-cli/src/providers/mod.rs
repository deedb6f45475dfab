//! HTTP clients of the supported translation backends.

pub mod azure;
pub mod deepl;
pub mod google;
pub mod libretranslate;
pub mod openai;

use std::time::Duration;

use autotranslate::{ProviderConfig, ProviderError, TextFormat, TranslationProvider};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

pub use azure::AzureProvider;
pub use deepl::DeepLProvider;
pub use google::GoogleProvider;
pub use libretranslate::LibreTranslateProvider;
pub use openai::OpenAiProvider;

/// Builds the backend selected by `config`. Invalid settings are reported before any
/// request is made.
pub fn build_provider(
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<Box<dyn TranslationProvider>, String> {
    config.validate().map_err(|e| e.to_string())?;
    let client = http_client(timeout)?;
    let provider: Box<dyn TranslationProvider> = match config {
        ProviderConfig::DeepL(c) => Box::new(DeepLProvider::new(c, client)?),
        ProviderConfig::Google(c) => Box::new(GoogleProvider::new(c, client)?),
        ProviderConfig::Azure(c) => Box::new(AzureProvider::new(c, client)?),
        ProviderConfig::LibreTranslate(c) => Box::new(LibreTranslateProvider::new(c, client)),
        ProviderConfig::OpenAi(c) => Box::new(OpenAiProvider::new(c, client)?),
    };
    Ok(provider)
}

fn http_client(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("autotranslate/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Returns a required secret; callers have already validated the config.
fn required(value: &Option<String>, name: &str) -> Result<String, String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("'{}' must be set", name))
}

/// Sends a request and decodes a JSON success body.
pub(crate) fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request
        .send()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        };
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// Checks that a backend answered with one text per input.
pub(crate) fn expect_len(texts: Vec<String>, expected: usize) -> Result<Vec<String>, ProviderError> {
    if texts.len() == expected {
        Ok(texts)
    } else {
        Err(ProviderError::LengthMismatch {
            expected,
            actual: texts.len(),
        })
    }
}

/// Value of the `format` parameter most HTTP APIs take.
pub(crate) fn format_param(format: TextFormat) -> &'static str {
    match format {
        TextFormat::Text => "text",
        TextFormat::Html => "html",
    }
}
