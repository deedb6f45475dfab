//! Translation of Fastlane metadata trees.
//!
//! The metadata root holds one directory per locale (`en-US/`, `de-DE/`, ...), each with
//! an arbitrary nested set of `.txt` files. A file counts as translated as soon as it
//! exists at the mirrored path of the target directory; its content is never compared.

use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{
    cancel::CancelToken,
    error::Error,
    locale::{self, Locale},
    provider::{TextFormat, TranslationProvider, translate_locales},
    report::{LocaleOutcome, PipelineReport},
};

pub const METADATA_FILE_EXTENSION: &str = "txt";

/// A target locale directory of the metadata tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTarget {
    pub locale: Locale,

    /// Directory name below the metadata root, as configured or discovered.
    pub code: String,
}

/// The source directory of a metadata tree and its `.txt` files.
#[derive(Debug, Clone)]
pub struct MetadataSource {
    pub dir: PathBuf,

    /// Paths relative to `dir`, sorted.
    pub files: Vec<PathBuf>,
}

impl MetadataSource {
    /// Loads the source directory of `root`.
    ///
    /// `Ok(None)` means there is nothing to translate: the root has no locale
    /// directories, none of them matches `source`, or the match holds no `.txt` file.
    pub fn locate(root: &Path, source: &Locale) -> Result<Option<MetadataSource>, Error> {
        if !root.is_dir() {
            return Err(Error::configuration(format!(
                "Fastlane metadata directory does not exist: {}",
                root.display()
            )));
        }
        let Some(dir) = locate_source_dir(root, source)? else {
            return Ok(None);
        };
        let files = list_text_files(&dir)?;
        if files.is_empty() {
            info!(
                "No .txt files found in Fastlane source folder '{}'. Nothing to translate.",
                dir_name(&dir)
            );
            return Ok(None);
        }
        Ok(Some(MetadataSource { dir, files }))
    }

    /// Name of the source directory below the metadata root.
    pub fn code(&self) -> String {
        dir_name(&self.dir)
    }

    /// Source files that do not exist below `target_dir` yet.
    pub fn missing_files(&self, target_dir: &Path) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|relative| !target_dir.join(relative).exists())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Returns the first subdirectory of `root`, by name, whose name decodes to `source`.
///
/// Logs why nothing was found when the result is `None`.
pub fn locate_source_dir(root: &Path, source: &Locale) -> Result<Option<PathBuf>, Error> {
    let dirs = locale_dirs(root)?;
    if dirs.is_empty() {
        info!(
            "Fastlane metadata directory {} has no locale folders. Skipping Fastlane translation.",
            root.display()
        );
        return Ok(None);
    }
    let found = dirs
        .into_iter()
        .find(|dir| locale::decode(&dir_name(dir)).as_ref() == Some(source));
    if found.is_none() {
        info!(
            "No Fastlane source folder matching source_language={} found. Skipping Fastlane translation.",
            source
        );
    }
    Ok(found)
}

/// Resolves the target directories.
///
/// With `explicit` codes those are used as directory names; otherwise every
/// subdirectory of `root` not listed in `exclude` is a candidate. Codes that do not
/// decode are dropped with a warning. Any code decoding to `source` is dropped too,
/// whatever its spelling (`en_US` next to `en-US`).
pub fn resolve_targets(
    root: &Path,
    explicit: &BTreeSet<String>,
    exclude: &BTreeSet<String>,
    source: &Locale,
) -> Result<Vec<MetadataTarget>, Error> {
    let codes: Vec<String> = if explicit.is_empty() {
        locale_dirs(root)?
            .iter()
            .map(|dir| dir_name(dir))
            .filter(|code| !exclude.contains(code))
            .collect()
    } else {
        explicit.iter().cloned().collect()
    };

    Ok(codes
        .into_iter()
        .filter_map(|code| match locale::decode(&code) {
            Some(locale) => Some(MetadataTarget { locale, code }),
            None => {
                warn!("[Fastlane:{}] Not a valid ISO locale. Skipping.", code);
                None
            }
        })
        .filter(|target| target.locale != *source)
        .collect())
}

/// Translates the missing `.txt` files of every target directory.
///
/// Returns `Ok(None)` when there is nothing to translate. Provider and write failures
/// only fail their own target.
pub fn translate(
    root: &Path,
    provider: &dyn TranslationProvider,
    source_locale: &Locale,
    targets: &[MetadataTarget],
    cancel: &CancelToken,
) -> Result<Option<PipelineReport>, Error> {
    let Some(source) = MetadataSource::locate(root, source_locale)? else {
        return Ok(None);
    };

    let mut report = PipelineReport::default();
    for target in targets {
        if target.code == source.code() || target.locale == *source_locale {
            continue;
        }
        if cancel.is_cancelled() {
            warn!("[Fastlane:{}] Cancelled before translation", target.code);
            report.record(target.code.clone(), LocaleOutcome::Cancelled);
            continue;
        }
        let outcome = translate_target(root, &source, provider, source_locale, target);
        report.record(target.code.clone(), outcome);
    }
    Ok(Some(report))
}

fn translate_target(
    root: &Path,
    source: &MetadataSource,
    provider: &dyn TranslationProvider,
    source_locale: &Locale,
    target: &MetadataTarget,
) -> LocaleOutcome {
    let target_dir = root.join(&target.code);
    let missing = source.missing_files(&target_dir);
    if missing.is_empty() {
        info!(
            "[Fastlane:{}] All {} files already present. Skipping.",
            target.code,
            source.files.len()
        );
        return LocaleOutcome::Skipped;
    }
    debug!("[Fastlane:{}] {} files missing", target.code, missing.len());

    let contents = match missing
        .iter()
        .map(|relative| read_text(&source.dir.join(relative)))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(contents) => contents,
        Err(e) => {
            error!("[Fastlane:{}] Reading source files failed: {}", target.code, e);
            return LocaleOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let translated = match translate_locales(
        provider,
        &contents,
        TextFormat::Text,
        source_locale,
        &target.locale,
    ) {
        Ok(translated) => translated,
        Err(e) => {
            error!("[Fastlane:{}] Translation failed: {}", target.code, e);
            return LocaleOutcome::Failed {
                reason: Error::from(e).to_string(),
            };
        }
    };

    for (relative, text) in missing.iter().zip(&translated) {
        let path = target_dir.join(relative);
        if let Err(e) = write_text(&path, text) {
            error!(
                "[Fastlane:{}] Writing {} failed: {}",
                target.code,
                path.display(),
                e
            );
            return LocaleOutcome::Failed {
                reason: e.to_string(),
            };
        }
    }
    info!(
        "[Fastlane:{}] Wrote {} translated .txt files.",
        target.code,
        translated.len()
    );
    LocaleOutcome::Updated {
        added: translated.len(),
        total: source.files.len(),
    }
}

/// Files a run would create, without calling a provider.
pub fn pending_outputs(
    root: &Path,
    source_locale: &Locale,
    targets: &[MetadataTarget],
) -> Result<Vec<PathBuf>, Error> {
    let Some(source) = MetadataSource::locate(root, source_locale)? else {
        return Ok(Vec::new());
    };
    let source_code = source.code();
    let mut pending = Vec::new();
    for target in targets
        .iter()
        .filter(|t| t.code != source_code && t.locale != *source_locale)
    {
        let target_dir = root.join(&target.code);
        pending.extend(
            source
                .missing_files(&target_dir)
                .into_iter()
                .map(|relative| target_dir.join(relative)),
        );
    }
    Ok(pending)
}

fn locale_dirs(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = entry.path();
        let is_text = path
            .extension()
            .is_some_and(|ext| ext == METADATA_FILE_EXTENSION);
        if entry.file_type().is_file() && is_text {
            if let Ok(relative) = path.strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads a metadata file, decoding UTF-16 when it starts with a byte order mark.
fn read_text(path: &Path) -> Result<String, Error> {
    let file = File::open(path)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

fn write_text(path: &Path, text: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}
