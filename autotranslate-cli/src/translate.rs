use std::{fs, path::Path, time::Duration};

use autotranslate::{
    CancelToken, LocaleOutcome, Orchestrator, RunReport, report::PipelineReport,
};

use tracing::info;

use crate::{
    config::{CliConfig, ConfigArgs},
    providers::build_provider,
};

/// Runs a full translation and prints its summary.
///
/// Fatal configuration problems are returned as `Err`; per locale failures are part of
/// the returned report.
pub fn run_translate_command(
    args: &ConfigArgs,
    report_json: Option<&Path>,
) -> Result<RunReport, String> {
    let config = CliConfig::load(args)?;
    let provider_config = config
        .provider
        .as_ref()
        .ok_or("No [provider] configured. Set one in autotranslate.toml.")?;
    let provider = build_provider(
        provider_config,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let report = Orchestrator::new(config.translation, provider.as_ref())
        .run(&CancelToken::new())
        .map_err(|e| e.to_string())?;

    print!("{}", format_report(&report));
    if let Some(path) = report_json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
        info!("Wrote run report to {}", path.display());
    }
    Ok(report)
}

/// Human readable summary of a run.
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    if let Some(strings) = &report.strings_xml {
        format_pipeline(&mut out, "strings.xml", strings);
    }
    if let Some(fastlane) = &report.fastlane {
        format_pipeline(&mut out, "Fastlane metadata", fastlane);
    }
    let summary = report.summary();
    out.push_str(&format!(
        "Summary: {} updated, {} skipped, {} failed, {} cancelled\n",
        summary.updated, summary.skipped, summary.failed, summary.cancelled
    ));
    out
}

fn format_pipeline(out: &mut String, title: &str, pipeline: &PipelineReport) {
    out.push_str(&format!("{}:\n", title));
    for locale in &pipeline.locales {
        let status = match &locale.outcome {
            LocaleOutcome::Updated { added, total } => {
                format!("updated ({} added, {} total)", added, total)
            }
            LocaleOutcome::Skipped => "up to date".to_string(),
            LocaleOutcome::Failed { reason } => format!("FAILED: {}", reason),
            LocaleOutcome::Cancelled => "cancelled".to_string(),
        };
        out.push_str(&format!("  {:<10} {}\n", locale.target, status));
    }
}
