//! Runs the configured translation pipelines with one provider.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cancel::CancelToken,
    config::TranslationConfig,
    error::Error,
    locale::Locale,
    metadata,
    provider::TranslationProvider,
    report::RunReport,
    strings_xml,
};

/// Drives a translation run.
///
/// All preconditions (decodable source locales, existing directories) are checked
/// before the first target is touched. After that, failures of single target locales
/// are recorded in the [`RunReport`] and never abort the run.
///
/// # Example
///
/// ```rust,no_run
/// use autotranslate::{CancelToken, Orchestrator, TranslationConfig};
/// # use autotranslate::{ProviderError, TextFormat, TranslationProvider};
/// # struct Echo;
/// # impl TranslationProvider for Echo {
/// #     fn name(&self) -> &str { "echo" }
/// #     fn translate_batch(&self, texts: &[String], _: TextFormat, _: &str, _: &str)
/// #         -> Result<Vec<String>, ProviderError> { Ok(texts.to_vec()) }
/// # }
///
/// let provider = Echo;
/// let orchestrator = Orchestrator::new(TranslationConfig::default(), &provider);
/// let report = orchestrator.run(&CancelToken::new())?;
/// println!("{:?}", report.summary());
/// # Ok::<(), autotranslate::Error>(())
/// ```
pub struct Orchestrator<'a> {
    config: TranslationConfig,
    provider: &'a dyn TranslationProvider,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: TranslationConfig, provider: &'a dyn TranslationProvider) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn run(&self, cancel: &CancelToken) -> Result<RunReport, Error> {
        let run = Preflight::check(&self.config)?;
        let mut report = RunReport::default();

        if let Some(res_dir) = &run.res_directory {
            info!(
                "StringsXmlTranslation: provider={}, resDirectory={}, sourceLanguage={}, targetLanguages={:?}",
                self.provider.name(),
                res_dir.display(),
                run.source,
                self.config.target_languages
            );
            let targets = strings_xml::resolve_targets(
                res_dir,
                &self.config.target_languages,
                &self.config.exclude_languages,
                &run.source,
            )?;
            report.strings_xml =
                strings_xml::translate(res_dir, self.provider, &run.source, &targets, cancel)?;
        }

        if let Some((metadata_dir, source)) = &run.metadata {
            info!(
                "FastlaneTranslation: provider={}, metadataDirectory={}, sourceLanguage={}, targetLanguages={:?}",
                self.provider.name(),
                metadata_dir.display(),
                source,
                self.config.fastlane_target_languages()
            );
            if metadata::locate_source_dir(metadata_dir, source)?.is_some() {
                let targets = metadata::resolve_targets(
                    metadata_dir,
                    self.config.fastlane_target_languages(),
                    &self.config.exclude_languages,
                    source,
                )?;
                report.fastlane =
                    metadata::translate(metadata_dir, self.provider, source, &targets, cancel)?;
            }
        }

        let summary = report.summary();
        info!(
            "Finished: {} updated, {} skipped, {} failed, {} cancelled",
            summary.updated, summary.skipped, summary.failed, summary.cancelled
        );
        Ok(report)
    }
}

/// Files a run with `config` would create or modify. No provider is involved.
pub fn plan(config: &TranslationConfig) -> Result<Vec<PathBuf>, Error> {
    let run = Preflight::check(config)?;
    let mut pending = Vec::new();

    if let Some(res_dir) = &run.res_directory {
        if strings_xml::source_file(res_dir).exists() {
            let targets = strings_xml::resolve_targets(
                res_dir,
                &config.target_languages,
                &config.exclude_languages,
                &run.source,
            )?;
            pending.extend(strings_xml::pending_outputs(res_dir, &targets)?);
        }
    }

    if let Some((metadata_dir, source)) = &run.metadata {
        if metadata::locate_source_dir(metadata_dir, source)?.is_some() {
            let targets = metadata::resolve_targets(
                metadata_dir,
                config.fastlane_target_languages(),
                &config.exclude_languages,
                source,
            )?;
            pending.extend(metadata::pending_outputs(metadata_dir, source, &targets)?);
        }
    }
    Ok(pending)
}

/// Checked preconditions of a run. A disabled pipeline is `None`.
struct Preflight {
    source: Locale,
    res_directory: Option<PathBuf>,
    metadata: Option<(PathBuf, Locale)>,
}

impl Preflight {
    fn check(config: &TranslationConfig) -> Result<Self, Error> {
        let source = config.source_locale()?;

        let res_directory = if config.strings_xml.enabled {
            let dir = &config.strings_xml.res_directory;
            if !dir.is_dir() {
                return Err(Error::configuration(format!(
                    "strings_xml 'res_directory' does not exist: {}",
                    dir.display()
                )));
            }
            Some(dir.clone())
        } else {
            None
        };

        let metadata = if config.fastlane.enabled {
            let dir = &config.fastlane.metadata_directory;
            if !dir.is_dir() {
                return Err(Error::configuration(format!(
                    "fastlane 'metadata_directory' does not exist: {}",
                    dir.display()
                )));
            }
            Some((dir.clone(), config.fastlane_source_locale()?))
        } else {
            None
        };

        Ok(Self {
            source,
            res_directory,
            metadata,
        })
    }
}
