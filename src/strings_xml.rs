//! Translation of Android `strings.xml` resources.
//!
//! The source table lives in `values/strings.xml`; every target locale has its own
//! `values-{qualifier}/strings.xml`. Only keys missing from a target are sent to the
//! provider, and existing target values are never overwritten.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
    cancel::CancelToken,
    error::Error,
    locale::{self, Locale},
    placeholder,
    provider::{TextFormat, TranslationProvider, translate_locales},
    report::{LocaleOutcome, PipelineReport},
    traits::Parser,
    types::{ResourceKey, ResourceTable},
};

pub const STRINGS_FILE_NAME: &str = "strings.xml";
pub const SOURCE_VALUES_DIR: &str = "values";
pub const VALUES_DIR_PREFIX: &str = "values-";

/// Path of the source table below a resource directory.
pub fn source_file(res_dir: &Path) -> PathBuf {
    res_dir.join(SOURCE_VALUES_DIR).join(STRINGS_FILE_NAME)
}

/// One target locale to translate, against the source and what the target already has.
#[derive(Debug, Clone, Copy)]
pub struct TranslationJob<'a> {
    pub source_locale: &'a Locale,
    pub target_locale: &'a Locale,
    pub source: &'a ResourceTable,
    pub existing: &'a ResourceTable,
}

impl<'a> TranslationJob<'a> {
    /// Source keys the target does not have yet, in table order.
    pub fn missing_keys(&self) -> Vec<&'a ResourceKey> {
        self.source
            .keys()
            .filter(|key| !self.existing.contains_key(key))
            .collect()
    }

    /// Merges translations of [`TranslationJob::missing_keys`], given in the same
    /// order, into a copy of the existing table.
    pub fn merge(&self, translations: Vec<String>) -> ResourceTable {
        let mut merged = self.existing.clone();
        for (key, value) in self.missing_keys().into_iter().zip(translations) {
            merged.insert(key.clone(), value);
        }
        merged
    }
}

/// Resolves target locales to the `strings.xml` each one is written to.
///
/// With `explicit` codes, each is decoded and its path is built by re-encoding the
/// locale. Otherwise every `values-*` directory below `res_dir` is a candidate and keeps
/// its literal directory as output, minus `exclude` and the source locale. Codes that
/// do not decode are skipped with a warning.
pub fn resolve_targets(
    res_dir: &Path,
    explicit: &BTreeSet<String>,
    exclude: &BTreeSet<String>,
    source: &Locale,
) -> Result<BTreeMap<Locale, PathBuf>, Error> {
    if !explicit.is_empty() {
        return Ok(explicit
            .iter()
            .filter_map(|code| decode_or_warn(code))
            .map(|locale| {
                let dir = format!("{}{}", VALUES_DIR_PREFIX, locale::encode(&locale));
                let path = res_dir.join(dir).join(STRINGS_FILE_NAME);
                (locale, path)
            })
            .collect());
    }

    info!("Auto-detecting target languages in {}", res_dir.display());
    if !exclude.is_empty() {
        info!("Excluding languages from autodetect: {:?}", exclude);
    }
    let excluded_locales: BTreeSet<Locale> =
        exclude.iter().filter_map(|code| locale::decode(code)).collect();

    let mut qualifiers = Vec::new();
    for entry in fs::read_dir(res_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(qualifier) = name.strip_prefix(VALUES_DIR_PREFIX) {
            qualifiers.push((qualifier.to_string(), entry.path()));
        }
    }
    qualifiers.sort();

    let mut targets = BTreeMap::new();
    for (qualifier, dir) in qualifiers {
        if exclude.contains(&qualifier) {
            continue;
        }
        let Some(locale) = decode_or_warn(&qualifier) else {
            continue;
        };
        if &locale == source || excluded_locales.contains(&locale) {
            continue;
        }
        targets
            .entry(locale)
            .or_insert_with(|| dir.join(STRINGS_FILE_NAME));
    }
    Ok(targets)
}

fn decode_or_warn(code: &str) -> Option<Locale> {
    let decoded = locale::decode(code);
    if decoded.is_none() {
        warn!(
            "[{}] {}, will skip translation for it",
            code,
            Error::LocaleDecode(code.to_string())
        );
    }
    decoded
}

/// Reads a target table; an absent file is an empty table.
pub fn read_existing(path: &Path) -> Result<ResourceTable, Error> {
    if path.exists() {
        ResourceTable::read_from(path)
    } else {
        Ok(ResourceTable::new())
    }
}

/// Translates the missing strings of every target and writes the merged tables.
///
/// Returns `Ok(None)` if the source has no translatable strings. A missing or malformed
/// source file, or a malformed existing target file, aborts with an error. Provider and
/// write failures only fail their own locale.
pub fn translate(
    res_dir: &Path,
    provider: &dyn TranslationProvider,
    source_locale: &Locale,
    targets: &BTreeMap<Locale, PathBuf>,
    cancel: &CancelToken,
) -> Result<Option<PipelineReport>, Error> {
    let source_path = source_file(res_dir);
    if !source_path.exists() {
        return Err(Error::configuration(format!(
            "source file '{}' does not exist, check that res_directory is configured correctly (currently '{}')",
            source_path.display(),
            res_dir.display()
        )));
    }
    let source = ResourceTable::read_from(&source_path)?;
    if source.is_empty() {
        info!("No translatable <string> entries found in base strings.xml. Nothing to do.");
        return Ok(None);
    }

    let mut report = PipelineReport::default();
    for (target_locale, target_path) in targets {
        let label = target_locale.to_string();
        if cancel.is_cancelled() {
            warn!("[{}] Cancelled before translation", label);
            report.record(label, LocaleOutcome::Cancelled);
            continue;
        }

        let existing = read_existing(target_path)?;
        let job = TranslationJob {
            source_locale,
            target_locale,
            source: &source,
            existing: &existing,
        };
        let outcome = translate_job(&job, provider, target_path, &label);
        report.record(label, outcome);
    }
    Ok(Some(report))
}

fn translate_job(
    job: &TranslationJob<'_>,
    provider: &dyn TranslationProvider,
    target_path: &Path,
    label: &str,
) -> LocaleOutcome {
    let missing = job.missing_keys();
    if missing.is_empty() {
        info!(
            "[{}] All strings already present ({}). Skipping.",
            label,
            job.existing.len()
        );
        return LocaleOutcome::Skipped;
    }
    debug!("[{}] {} strings missing", label, missing.len());

    let masked: Vec<String> = missing
        .iter()
        .map(|key| placeholder::mask(job.source.get(key).unwrap_or_default()).into_owned())
        .collect();

    let translated = match translate_locales(
        provider,
        &masked,
        TextFormat::Html,
        job.source_locale,
        job.target_locale,
    ) {
        Ok(translated) => translated,
        Err(e) => {
            error!("[{}] Translation failed: {}", label, e);
            return LocaleOutcome::Failed {
                reason: Error::from(e).to_string(),
            };
        }
    };

    let translated: Vec<String> = translated
        .iter()
        .map(|text| placeholder::unmask(text).into_owned())
        .collect();
    let added = translated.len();
    let merged = job.merge(translated);

    if let Err(e) = write_table(&merged, target_path) {
        error!("[{}] Writing {} failed: {}", label, target_path.display(), e);
        return LocaleOutcome::Failed {
            reason: e.to_string(),
        };
    }
    info!(
        "[{}] Wrote {} new translations. Total strings now: {}.",
        label,
        added,
        merged.len()
    );
    LocaleOutcome::Updated {
        added,
        total: merged.len(),
    }
}

fn write_table(table: &ResourceTable, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    table.write_to(path)
}

/// Target files a run would create or modify, without calling a provider.
pub fn pending_outputs(
    res_dir: &Path,
    targets: &BTreeMap<Locale, PathBuf>,
) -> Result<Vec<PathBuf>, Error> {
    let source = ResourceTable::read_from(source_file(res_dir))?;
    if source.is_empty() {
        return Ok(Vec::new());
    }
    let mut pending = Vec::new();
    for (locale, path) in targets {
        let existing = read_existing(path)?;
        let job = TranslationJob {
            source_locale: locale,
            target_locale: locale,
            source: &source,
            existing: &existing,
        };
        if !job.missing_keys().is_empty() {
            pending.push(path.clone());
        }
    }
    Ok(pending)
}
