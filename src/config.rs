//! Immutable configuration values.
//!
//! All values are plain data, deserializable with serde and fully built before a run
//! starts. Loading them from files or the environment is left to the caller.

use std::{collections::BTreeSet, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    locale::{self, Locale},
};

pub const DEFAULT_SOURCE_LANGUAGE: &str = "en-US";
pub const DEFAULT_RES_DIRECTORY: &str = "src/main/res";
pub const DEFAULT_METADATA_DIRECTORY: &str = "fastlane/metadata/android";

/// What to translate and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Locale code of `values/strings.xml`.
    pub source_language: String,

    /// Locale codes to translate to. Empty means autodetect from the existing directories.
    pub target_languages: BTreeSet<String>,

    /// Locale codes or directory qualifiers skipped during autodetection.
    pub exclude_languages: BTreeSet<String>,

    pub strings_xml: StringsXmlConfig,

    pub fastlane: FastlaneConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_languages: BTreeSet::new(),
            exclude_languages: BTreeSet::new(),
            strings_xml: StringsXmlConfig::default(),
            fastlane: FastlaneConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Decodes the configured source language; an unknown code is a configuration error.
    pub fn source_locale(&self) -> Result<Locale, Error> {
        locale::decode(&self.source_language).ok_or_else(|| {
            Error::configuration(format!(
                "found non ISO code source_language: '{}'",
                self.source_language
            ))
        })
    }

    /// Decodes the metadata source language, falling back to the global one.
    pub fn fastlane_source_locale(&self) -> Result<Locale, Error> {
        match &self.fastlane.source_language {
            Some(code) => locale::decode(code).ok_or_else(|| {
                Error::configuration(format!(
                    "found non ISO code fastlane source_language: '{}'",
                    code
                ))
            }),
            None => self.source_locale(),
        }
    }

    /// Target codes of the metadata tree, falling back to the global ones.
    pub fn fastlane_target_languages(&self) -> &BTreeSet<String> {
        self.fastlane
            .target_languages
            .as_ref()
            .unwrap_or(&self.target_languages)
    }
}

/// `strings.xml` translation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsXmlConfig {
    pub enabled: bool,

    /// Directory holding `values/` and the `values-*/` directories.
    pub res_directory: PathBuf,
}

impl Default for StringsXmlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            res_directory: PathBuf::from(DEFAULT_RES_DIRECTORY),
        }
    }
}

/// Fastlane metadata translation settings. Disabled unless asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastlaneConfig {
    pub enabled: bool,

    /// Directory holding one subdirectory per locale, e.g. `en-US/`.
    pub metadata_directory: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_languages: Option<BTreeSet<String>>,
}

impl Default for FastlaneConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            metadata_directory: PathBuf::from(DEFAULT_METADATA_DIRECTORY),
            source_language: None,
            target_languages: None,
        }
    }
}

/// Backend selection with its settings. Matched exactly once to build the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "deepl")]
    DeepL(DeepLConfig),

    #[serde(rename = "google")]
    Google(GoogleConfig),

    #[serde(rename = "azure")]
    Azure(AzureConfig),

    #[serde(rename = "libre_translate")]
    LibreTranslate(LibreTranslateConfig),

    #[serde(rename = "openai")]
    OpenAi(OpenAiConfig),
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::DeepL(_) => "DeepL",
            ProviderConfig::Google(_) => "Google",
            ProviderConfig::Azure(_) => "Azure",
            ProviderConfig::LibreTranslate(_) => "LibreTranslate",
            ProviderConfig::OpenAi(_) => "OpenAI",
        }
    }

    /// Checks that every setting the backend needs is present.
    pub fn validate(&self) -> Result<(), Error> {
        let missing = match self {
            ProviderConfig::DeepL(c) => is_blank(&c.auth_key).then_some("'auth_key' must be set"),
            ProviderConfig::Google(c) => is_blank(&c.api_key).then_some("'api_key' must be set"),
            ProviderConfig::Azure(c) => is_blank(&c.key).then_some("'key' must be set"),
            ProviderConfig::LibreTranslate(c) => c
                .base_url
                .trim()
                .is_empty()
                .then_some("'base_url' must not be empty"),
            ProviderConfig::OpenAi(c) => is_blank(&c.api_key).then_some("'api_key' must be set"),
        };
        match missing {
            Some(constraint) => Err(Error::configuration(format!(
                "provider {} is invalid: {}",
                self.name(),
                constraint
            ))),
            None => Ok(()),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepLConfig {
    pub auth_key: Option<String>,

    /// Overrides the endpoint; by default keys ending in `:fx` use the free API.
    pub server_url: Option<String>,

    /// `more`, `less`, `prefer_more` or `prefer_less`.
    pub formality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,

    /// `base` or `nmt`.
    pub model: Option<String>,
}

pub const DEFAULT_AZURE_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub key: Option<String>,

    /// Resource region, required for regional and multi-service resources.
    pub region: Option<String>,

    pub endpoint: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            key: None,
            region: None,
            endpoint: DEFAULT_AZURE_ENDPOINT.to_string(),
        }
    }
}

pub const DEFAULT_LIBRE_TRANSLATE_URL: &str = "https://libretranslate.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibreTranslateConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LIBRE_TRANSLATE_URL.to_string(),
            api_key: None,
        }
    }
}

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_SYSTEM_MESSAGE: &str = "\
You're a professional translator for software projects, especially Android apps.
You are given text in a specified source language, and should translate it in the most suitable way to the specified target language.
The given texts can contain XML/HTML tags, as well as special string formatting placeholders like '%1$s',
do not translate them and keep them at the position they were originally by preserving the format of the text.
The input is a JSON object that contains:
 - the texts' source language ('srcLang'),
 - the desired target language ('targetLang'),
 - the list of texts that should be translated ('texts').
Answer with a JSON object containing the list 'translatedTexts' in the same order.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub system_message: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            system_message: DEFAULT_OPENAI_SYSTEM_MESSAGE.to_string(),
        }
    }
}
