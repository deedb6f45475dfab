//! Azure AI Translator v3.

use autotranslate::{ProviderError, TextFormat, TranslationProvider, config::AzureConfig};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{expect_len, required, send_json};

const API_VERSION: &str = "3.0";

pub struct AzureProvider {
    client: Client,
    key: String,
    region: Option<String>,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TextItem<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResult {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl AzureProvider {
    pub fn new(config: &AzureConfig, client: Client) -> Result<Self, String> {
        Ok(Self {
            client,
            key: required(&config.key, "key")?,
            region: config.region.clone().filter(|r| !r.trim().is_empty()),
            endpoint: format!("{}/translate", config.endpoint.trim_end_matches('/')),
        })
    }
}

fn text_type(format: TextFormat) -> &'static str {
    match format {
        TextFormat::Text => "plain",
        TextFormat::Html => "html",
    }
}

impl TranslationProvider for AzureProvider {
    fn name(&self) -> &str {
        "Azure"
    }

    fn translate_batch(
        &self,
        texts: &[String],
        format: TextFormat,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let body: Vec<TextItem> = texts
            .iter()
            .map(|text| TextItem {
                text: text.as_str(),
            })
            .collect();
        let mut request = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("api-version", API_VERSION),
                ("from", source),
                ("to", target),
                ("textType", text_type(format)),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&body);
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }

        let results: Vec<TranslateResult> = send_json(request)?;
        let translated = results
            .into_iter()
            .map(|result| {
                result
                    .translations
                    .into_iter()
                    .next()
                    .map(|t| t.text)
                    .ok_or_else(|| {
                        ProviderError::InvalidResponse("result without translations".to_string())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        expect_len(translated, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_pascal_case() {
        let body = vec![TextItem { text: "Hello" }];
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"[{"Text":"Hello"}]"#
        );
    }

    #[test]
    fn test_response_shape() {
        let json = r#"[{"translations": [{"text": "Hallo", "to": "de"}]}]"#;
        let results: Vec<TranslateResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].translations[0].text, "Hallo");
    }

    #[test]
    fn test_text_type() {
        assert_eq!(text_type(TextFormat::Text), "plain");
        assert_eq!(text_type(TextFormat::Html), "html");
    }
}
