//! Google Cloud Translation API v2 with an API key.

use autotranslate::{ProviderError, TextFormat, TranslationProvider, config::GoogleConfig};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{expect_len, format_param, required, send_json};

const API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// The API accepts at most this many texts per request.
pub const MAX_TEXTS_PER_REQUEST: usize = 128;

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    model: Option<String>,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Deserialize)]
struct TranslationList {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleProvider {
    pub fn new(config: &GoogleConfig, client: Client) -> Result<Self, String> {
        Ok(Self {
            client,
            api_key: required(&config.api_key, "api_key")?,
            model: config.model.clone().filter(|m| !m.trim().is_empty()),
        })
    }
}

impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &str {
        "Google"
    }

    fn translate_batch(
        &self,
        texts: &[String],
        format: TextFormat,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut translated = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_TEXTS_PER_REQUEST) {
            let body = TranslateRequest {
                q: chunk,
                source,
                target,
                format: format_param(format),
                model: self.model.as_deref(),
            };
            let request = self
                .client
                .post(API_URL)
                .query(&[("key", self.api_key.as_str())])
                .json(&body);
            let response: TranslateResponse = send_json(request)?;
            let texts = response
                .data
                .translations
                .into_iter()
                .map(|t| t.translated_text)
                .collect();
            translated.extend(expect_len(texts, chunk.len())?);
        }
        Ok(translated)
    }
}
