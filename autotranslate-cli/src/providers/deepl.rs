//! DeepL API v2 (`/v2/translate`).

use autotranslate::{
    Locale, ProviderError, TextFormat, TranslationProvider, config::DeepLConfig,
};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{expect_len, required, send_json};

const FREE_API_URL: &str = "https://api-free.deepl.com";
const PRO_API_URL: &str = "https://api.deepl.com";
const FREE_KEY_SUFFIX: &str = ":fx";

/// DeepL accepts at most this many texts per request.
const MAX_TEXTS_PER_REQUEST: usize = 50;

pub struct DeepLProvider {
    client: Client,
    auth_key: String,
    endpoint: String,
    formality: Option<String>,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a [String],
    source_lang: &'a str,
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_handling: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl DeepLProvider {
    pub fn new(config: &DeepLConfig, client: Client) -> Result<Self, String> {
        let auth_key = required(&config.auth_key, "auth_key")?;
        let base = match &config.server_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ if auth_key.ends_with(FREE_KEY_SUFFIX) => FREE_API_URL.to_string(),
            _ => PRO_API_URL.to_string(),
        };
        Ok(Self {
            client,
            auth_key,
            endpoint: format!("{}/v2/translate", base.trim_end_matches('/')),
            formality: config.formality.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TranslationProvider for DeepLProvider {
    fn name(&self) -> &str {
        "DeepL"
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
                text: chunk,
                source_lang: source,
                target_lang: target,
                tag_handling: (format == TextFormat::Html).then_some("xml"),
                formality: self.formality.as_deref(),
            };
            let request = self
                .client
                .post(&self.endpoint)
                .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
                .json(&body);
            let response: TranslateResponse = send_json(request)?;
            let texts = response.translations.into_iter().map(|t| t.text).collect();
            translated.extend(expect_len(texts, chunk.len())?);
        }
        Ok(translated)
    }

    /// Uppercase codes, Chinese by script. Source languages are language only.
    fn locale_to_api_string(&self, locale: &Locale, is_source: bool) -> String {
        let code = match (locale.language.as_str(), locale.region.as_deref()) {
            ("zh", Some("CN")) => "ZH-HANS".to_string(),
            ("zh", Some("TW")) => "ZH-HANT".to_string(),
            _ => locale.iso_code().to_uppercase(),
        };
        if is_source {
            code.split('-').next().unwrap_or_default().to_string()
        } else {
            code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotranslate::locale::decode;

    fn provider(config: DeepLConfig) -> DeepLProvider {
        DeepLProvider::new(&config, Client::new()).unwrap()
    }

    #[test]
    fn test_endpoint_depends_on_key() {
        let free = provider(DeepLConfig {
            auth_key: Some("abc:fx".to_string()),
            ..Default::default()
        });
        assert_eq!(free.endpoint(), "https://api-free.deepl.com/v2/translate");

        let pro = provider(DeepLConfig {
            auth_key: Some("abc".to_string()),
            ..Default::default()
        });
        assert_eq!(pro.endpoint(), "https://api.deepl.com/v2/translate");

        let custom = provider(DeepLConfig {
            auth_key: Some("abc".to_string()),
            server_url: Some("http://localhost:3000/".to_string()),
            ..Default::default()
        });
        assert_eq!(custom.endpoint(), "http://localhost:3000/v2/translate");
    }

    #[test]
    fn test_locale_codes() {
        let deepl = provider(DeepLConfig {
            auth_key: Some("abc".to_string()),
            ..Default::default()
        });
        let zh_cn = decode("zh-rCN").unwrap();
        let zh_tw = decode("zh-rTW").unwrap();
        let en_us = decode("en-US").unwrap();
        let de = decode("de").unwrap();

        assert_eq!(deepl.locale_to_api_string(&zh_cn, false), "ZH-HANS");
        assert_eq!(deepl.locale_to_api_string(&zh_tw, false), "ZH-HANT");
        assert_eq!(deepl.locale_to_api_string(&en_us, false), "EN-US");
        assert_eq!(deepl.locale_to_api_string(&en_us, true), "EN");
        assert_eq!(deepl.locale_to_api_string(&zh_cn, true), "ZH");
        assert_eq!(deepl.locale_to_api_string(&de, false), "DE");
    }

    #[test]
    fn test_request_body() {
        let texts = vec!["Hello <s1/>".to_string()];
        let body = TranslateRequest {
            text: &texts,
            source_lang: "EN",
            target_lang: "DE",
            tag_handling: Some("xml"),
            formality: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"][0], "Hello <s1/>");
        assert_eq!(json["tag_handling"], "xml");
        assert!(json.get("formality").is_none());
    }
}
