//! Loading of the TOML configuration file, environment secrets and command line overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use autotranslate::{ProviderConfig, TranslationConfig};
use clap::Args;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "autotranslate.toml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEEPL_AUTH_KEY_ENV: &str = "DEEPL_AUTH_KEY";
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const AZURE_TRANSLATOR_KEY_ENV: &str = "AZURE_TRANSLATOR_KEY";
pub const LIBRETRANSLATE_API_KEY_ENV: &str = "LIBRETRANSLATE_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Contents of `autotranslate.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub translation: TranslationConfig,

    pub provider: Option<ProviderConfig>,

    /// Timeout of every HTTP request to the provider, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            translation: TranslationConfig::default(),
            provider: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file [default: autotranslate.toml, if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Locale of values/strings.xml, e.g. en-US
    #[arg(short, long)]
    pub source_language: Option<String>,

    /// Locales to translate to (comma separated); autodetected when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub target_languages: Vec<String>,

    /// Locales or directory qualifiers to skip during autodetection (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude_languages: Vec<String>,

    /// Android res directory holding values/ and values-*/
    #[arg(long)]
    pub res_directory: Option<PathBuf>,

    /// Skip strings.xml translation
    #[arg(long)]
    pub no_strings_xml: bool,

    /// Also translate the Fastlane metadata tree
    #[arg(long)]
    pub fastlane: bool,

    /// Fastlane metadata directory holding one folder per locale
    #[arg(long)]
    pub metadata_directory: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Parses a configuration file. Relative directories are resolved against `base_dir`.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, String> {
        let mut config: CliConfig =
            toml::from_str(content).map_err(|e| format!("Invalid configuration: {}", e))?;
        let translation = &mut config.translation;
        translation.strings_xml.res_directory =
            resolve_path(base_dir, &translation.strings_xml.res_directory);
        translation.fastlane.metadata_directory =
            resolve_path(base_dir, &translation.fastlane.metadata_directory);
        Ok(config)
    }

    /// Loads the configuration selected by `args`, then applies overrides and secrets.
    pub fn load(args: &ConfigArgs) -> Result<Self, String> {
        let mut config = match &args.config {
            Some(path) => read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                read_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => CliConfig::default(),
        };
        config.apply_args(args);
        if let Some(provider) = config.provider.as_mut() {
            resolve_secrets(provider, |name| std::env::var(name).ok());
        }
        Ok(config)
    }

    /// Command line flags take precedence over file values.
    pub fn apply_args(&mut self, args: &ConfigArgs) {
        let translation = &mut self.translation;
        if let Some(source) = &args.source_language {
            translation.source_language = source.clone();
        }
        if !args.target_languages.is_empty() {
            translation.target_languages = args.target_languages.iter().cloned().collect();
        }
        if !args.exclude_languages.is_empty() {
            translation.exclude_languages = args.exclude_languages.iter().cloned().collect();
        }
        if let Some(dir) = &args.res_directory {
            translation.strings_xml.res_directory = dir.clone();
        }
        if args.no_strings_xml {
            translation.strings_xml.enabled = false;
        }
        if args.fastlane {
            translation.fastlane.enabled = true;
        }
        if let Some(dir) = &args.metadata_directory {
            translation.fastlane.metadata_directory = dir.clone();
        }
        if let Some(timeout) = args.timeout {
            self.request_timeout_secs = timeout;
        }
    }
}

fn read_file(path: &Path) -> Result<CliConfig, String> {
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read configuration {}: {}", path.display(), e))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    CliConfig::from_toml(&content, base_dir)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Fills in a missing provider secret from its environment variable.
/// A secret set in the file wins.
pub fn resolve_secrets<F>(provider: &mut ProviderConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let (slot, variable) = match provider {
        ProviderConfig::DeepL(c) => (&mut c.auth_key, DEEPL_AUTH_KEY_ENV),
        ProviderConfig::Google(c) => (&mut c.api_key, GOOGLE_API_KEY_ENV),
        ProviderConfig::Azure(c) => (&mut c.key, AZURE_TRANSLATOR_KEY_ENV),
        ProviderConfig::LibreTranslate(c) => (&mut c.api_key, LIBRETRANSLATE_API_KEY_ENV),
        ProviderConfig::OpenAi(c) => (&mut c.api_key, OPENAI_API_KEY_ENV),
    };
    if slot.as_deref().is_none_or(|v| v.trim().is_empty()) {
        if let Some(value) = lookup(variable).filter(|v| !v.trim().is_empty()) {
            debug!("Using provider secret from {}", variable);
            *slot = Some(value);
        }
    }
}
