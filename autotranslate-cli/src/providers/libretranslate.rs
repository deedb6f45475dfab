//! LibreTranslate (`/translate`), one request per text.

use autotranslate::{
    Locale, ProviderError, TextFormat, TranslationProvider, config::LibreTranslateConfig,
};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{format_param, send_json};

pub struct LibreTranslateProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

impl LibreTranslateProvider {
    pub fn new(config: &LibreTranslateConfig, client: Client) -> Self {
        Self {
            client,
            endpoint: format!("{}/translate", config.base_url.trim().trim_end_matches('/')),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }
}

impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    fn translate_batch(
        &self,
        texts: &[String],
        format: TextFormat,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        texts
            .iter()
            .map(|text| {
                let body = TranslateRequest {
                    q: text,
                    source,
                    target,
                    format: format_param(format),
                    api_key: self.api_key.as_deref(),
                };
                let response: TranslateResponse =
                    send_json(self.client.post(&self.endpoint).json(&body))?;
                Ok(response.translated_text)
            })
            .collect()
    }

    /// LibreTranslate models are per language; regions are not accepted.
    fn locale_to_api_string(&self, locale: &Locale, _is_source: bool) -> String {
        locale.language.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotranslate::locale::decode;

    #[test]
    fn test_endpoint_and_locale_codes() {
        let provider = LibreTranslateProvider::new(
            &LibreTranslateConfig {
                base_url: "http://localhost:5000/".to_string(),
                api_key: Some(" ".to_string()),
            },
            Client::new(),
        );
        assert_eq!(provider.endpoint, "http://localhost:5000/translate");
        assert!(provider.api_key.is_none());
        assert_eq!(
            provider.locale_to_api_string(&decode("pt-rBR").unwrap(), false),
            "pt"
        );
    }

    #[test]
    fn test_request_body() {
        let body = TranslateRequest {
            q: "Hello",
            source: "en",
            target: "de",
            format: format_param(TextFormat::Text),
            api_key: Some("secret"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["format"], "text");
        assert_eq!(json["api_key"], "secret");
    }
}
