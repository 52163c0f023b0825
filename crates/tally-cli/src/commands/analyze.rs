//! Ad-hoc analysis command

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::analysis::{AnalysisResult, Analyzer};
use tally_core::config::AnalysisSettings;
use tally_core::ingest::read_rows_from_path;
use tally_core::models::QuickAnalysis;
use tracing::{debug, warn};

use super::{format_money, truncate};

/// Flags for `tally analyze`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    pub fallback: bool,
    pub check: bool,
    pub json: bool,
}

pub async fn cmd_analyze(
    file: &Path,
    settings: &AnalysisSettings,
    options: AnalyzeOptions,
) -> Result<AnalysisResult> {
    let rows = read_rows_from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if rows.is_empty() {
        anyhow::bail!("No data rows found in {}", file.display());
    }

    let analyzer = Analyzer::from_settings(settings)?;

    if options.check {
        if let Some(remote) = analyzer.remote() {
            match remote.health_check().await {
                Ok(()) => debug!("Analysis endpoint {} is reachable", remote.url()),
                // The analysis call below fails the same way and falls back
                Err(e) if options.fallback => {
                    warn!("Analysis endpoint {} is unreachable: {}", remote.url(), e);
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("Analysis endpoint {} is unreachable", remote.url())));
                }
            }
        }
    }

    let result = if options.fallback {
        let outcome = analyzer.analyze_with_fallback(&rows).await?;
        if let Some(e) = &outcome.remote_error {
            eprintln!("⚠️  Remote analysis failed ({}), showing local analysis", e);
        }
        outcome.result
    } else {
        analyzer.analyze(&rows).await.context("Analysis failed")?
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result);
    }

    println!();
    println!("🔎 Analysis of {} ({} rows)", file.display(), rows.len());
    println!("   ─────────────────────────────────────────────");

    match &result {
        AnalysisResult::Local(analysis) => print_quick_analysis(analysis),
        AnalysisResult::Api(data) => {
            println!("   Source: remote endpoint");
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }

    Ok(result)
}

fn print_quick_analysis(analysis: &QuickAnalysis) {
    println!("   Inflow:   ${:>12}", format_money(analysis.inflow));
    println!("   Outflow:  ${:>12}", format_money(analysis.outflow));
    println!("   Net:      ${:>12}", format_money(analysis.net));

    if analysis.top_categories.is_empty() {
        return;
    }

    println!();
    println!("   Top categories");
    for (i, cat) in analysis.top_categories.iter().enumerate() {
        println!(
            "   {:>2}. {:25} │ {:>12}",
            i + 1,
            truncate(&cat.name, 25),
            format_money(cat.total)
        );
    }
}
