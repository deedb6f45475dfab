//! OpenAI compatible chat completions, asked to answer with a JSON object.

use autotranslate::{ProviderError, TextFormat, TranslationProvider, config::OpenAiConfig};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{expect_len, required, send_json};

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    system_message: String,
}

/// User message sent to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    src_lang: &'a str,
    target_lang: &'a str,
    texts: &'a [String],
}

/// Answer expected from the model.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_texts: Vec<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, client: Client) -> Result<Self, String> {
        Ok(Self {
            client,
            api_key: required(&config.api_key, "api_key")?,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            system_message: config.system_message.clone(),
        })
    }

    /// System prompt, one worked example, then the actual request.
    fn messages(&self, request: &TranslateRequest) -> Result<Vec<Message>, ProviderError> {
        let example_texts = vec!["Hello".to_string(), "What is this?".to_string()];
        let example = TranslateRequest {
            src_lang: "en",
            target_lang: "de",
            texts: &example_texts,
        };
        let example_answer = TranslateResponse {
            translated_texts: vec!["Hallo".to_string(), "Was ist das?".to_string()],
        };
        Ok(vec![
            Message::new("system", self.system_message.clone()),
            Message::new("user", to_json(&example)?),
            Message::new("assistant", to_json(&example_answer)?),
            Message::new("user", to_json(request)?),
        ])
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ProviderError> {
    serde_json::to_string(value).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

impl TranslationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn translate_batch(
        &self,
        texts: &[String],
        _format: TextFormat,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: self.messages(&TranslateRequest {
                src_lang: source,
                target_lang: target,
                texts,
            })?,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = send_json(request)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no choices returned".to_string()))?;
        let answer: TranslateResponse = serde_json::from_str(&content)
            .map_err(|e| ProviderError::InvalidResponse(format!("unexpected answer: {}", e)))?;
        expect_len(answer.translated_texts, texts.len())
    }
}
