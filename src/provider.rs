//! The translation backend capability.
//!
//! Every backend implements [`TranslationProvider`] once. The core never knows which
//! backend it talks to; it receives an already constructed provider and reuses it for
//! every batch of a run.

use serde::{Deserialize, Serialize};

use crate::{error::ProviderError, locale::Locale};

/// How the texts of a batch should be treated by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Plain text, e.g. Fastlane metadata files.
    Text,

    /// Text with markup that must survive translation, e.g. masked `strings.xml` values.
    Html,
}

/// A translation backend.
///
/// Implementations are called sequentially, one batch per target locale.
pub trait TranslationProvider: Send + Sync {
    /// Human readable backend name, used in log messages.
    fn name(&self) -> &str;

    /// Translates `texts` from `source` to `target`, both already converted with
    /// [`TranslationProvider::locale_to_api_string`].
    ///
    /// The result must have the same length and order as `texts`.
    fn translate_batch(
        &self,
        texts: &[String],
        format: TextFormat,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Converts a locale into the code the backend expects. `is_source` tells whether
    /// the locale is the source or the target of the translation.
    fn locale_to_api_string(&self, locale: &Locale, is_source: bool) -> String {
        let _ = is_source;
        locale.iso_code()
    }
}

/// Translates one batch between two locales and checks the length contract.
pub fn translate_locales(
    provider: &dyn TranslationProvider,
    texts: &[String],
    format: TextFormat,
    source: &Locale,
    target: &Locale,
) -> Result<Vec<String>, ProviderError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let source_code = provider.locale_to_api_string(source, true);
    let target_code = provider.locale_to_api_string(target, false);
    let translated = provider.translate_batch(texts, format, &source_code, &target_code)?;
    if translated.len() != texts.len() {
        return Err(ProviderError::LengthMismatch {
            expected: texts.len(),
            actual: translated.len(),
        });
    }
    Ok(translated)
}
