//! Per-locale outcomes of a translation run.

use serde::Serialize;

/// What happened to one target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocaleOutcome {
    /// New translations were written.
    Updated { added: usize, total: usize },

    /// Nothing was missing; the provider was not called.
    Skipped,

    /// The provider call or the write failed; the target was left untouched.
    Failed { reason: String },

    /// The run was cancelled before this locale was processed.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleReport {
    /// Directory qualifier or code the locale was resolved from.
    pub target: String,

    #[serde(flatten)]
    pub outcome: LocaleOutcome,
}

/// Outcomes of one pipeline (`strings.xml` or Fastlane metadata), in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub locales: Vec<LocaleReport>,
}

impl PipelineReport {
    pub fn record(&mut self, target: impl Into<String>, outcome: LocaleOutcome) {
        self.locales.push(LocaleReport {
            target: target.into(),
            outcome,
        });
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for report in &self.locales {
            summary.count(&report.outcome);
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl Summary {
    fn count(&mut self, outcome: &LocaleOutcome) {
        match outcome {
            LocaleOutcome::Updated { .. } => self.updated += 1,
            LocaleOutcome::Skipped => self.skipped += 1,
            LocaleOutcome::Failed { .. } => self.failed += 1,
            LocaleOutcome::Cancelled => self.cancelled += 1,
        }
    }

    fn add(self, other: Summary) -> Summary {
        Summary {
            updated: self.updated + other.updated,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
            cancelled: self.cancelled + other.cancelled,
        }
    }
}

/// Result of a whole run. A pipeline that was disabled or found nothing to do is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strings_xml: Option<PipelineReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastlane: Option<PipelineReport>,
}

impl RunReport {
    pub fn summary(&self) -> Summary {
        [&self.strings_xml, &self.fastlane]
            .into_iter()
            .flatten()
            .map(PipelineReport::summary)
            .fold(Summary::default(), Summary::add)
    }

    pub fn has_failures(&self) -> bool {
        self.summary().failed > 0
    }
}
