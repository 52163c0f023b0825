//! Ad-hoc analysis of uploaded tables
//!
//! Rows are either summarized locally ([`quick_analysis`]) or forwarded to a
//! configured remote endpoint. The result records which path produced it.

mod quick;
mod remote;

pub use quick::{quick_analysis, rows_from_json, TOP_CATEGORY_LIMIT};
pub use remote::RemoteAnalyzer;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AnalysisSettings;
use crate::error::{Error, Result};
use crate::fields::AdHocRow;
use crate::models::QuickAnalysis;

/// Analysis output tagged with the path that produced it
///
/// Serializes as `{"mode": "local" | "api", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "data", rename_all = "lowercase")]
pub enum AnalysisResult {
    /// Computed in-process
    Local(QuickAnalysis),
    /// Verbatim response from the remote endpoint
    Api(Value),
}

impl AnalysisResult {
    pub fn mode(&self) -> &'static str {
        match self {
            AnalysisResult::Local(_) => "local",
            AnalysisResult::Api(_) => "api",
        }
    }
}

/// Outcome of [`Analyzer::analyze_with_fallback`]
#[derive(Debug)]
pub struct FallbackOutcome {
    pub result: AnalysisResult,
    /// The remote failure that triggered the local fallback, if any
    pub remote_error: Option<Error>,
}

/// Chooses between the remote endpoint and local analysis
#[derive(Clone, Default)]
pub struct Analyzer {
    remote: Option<RemoteAnalyzer>,
}

impl Analyzer {
    /// Analyzer that only ever runs locally
    pub fn local() -> Self {
        Self { remote: None }
    }

    /// Analyzer that forwards rows to `remote`
    pub fn with_remote(remote: RemoteAnalyzer) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// Remote when a URL is configured, local otherwise
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self> {
        Ok(Self {
            remote: RemoteAnalyzer::from_settings(settings)?,
        })
    }

    pub fn remote(&self) -> Option<&RemoteAnalyzer> {
        self.remote.as_ref()
    }

    /// Analyze rows; a remote failure is returned as an error
    pub async fn analyze(&self, rows: &[AdHocRow]) -> Result<AnalysisResult> {
        match &self.remote {
            Some(remote) => {
                info!("Analyzing {} rows via {}", rows.len(), remote.url());
                Ok(AnalysisResult::Api(remote.analyze(rows).await?))
            }
            None => {
                info!("Analyzing {} rows locally", rows.len());
                Ok(AnalysisResult::Local(quick_analysis(rows)))
            }
        }
    }

    /// Analyze rows, falling back to local analysis when the remote call fails
    ///
    /// Only transport and endpoint failures fall back; anything else is
    /// propagated.
    pub async fn analyze_with_fallback(&self, rows: &[AdHocRow]) -> Result<FallbackOutcome> {
        match self.analyze(rows).await {
            Ok(result) => Ok(FallbackOutcome {
                result,
                remote_error: None,
            }),
            Err(e) if e.is_recoverable_analysis_failure() => {
                warn!("Remote analysis failed, using local analysis: {}", e);
                Ok(FallbackOutcome {
                    result: AnalysisResult::Local(quick_analysis(rows)),
                    remote_error: Some(e),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<AdHocRow> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_result_serialization() {
        let local = AnalysisResult::Local(QuickAnalysis::default());
        let value = serde_json::to_value(&local).unwrap();
        assert_eq!(value["mode"], "local");
        assert_eq!(value["data"]["inflow"], 0.0);
        assert!(value["data"]["topCategories"].is_array());

        let api = AnalysisResult::Api(json!({"insight": "ok"}));
        let value = serde_json::to_value(&api).unwrap();
        assert_eq!(value, json!({"mode": "api", "data": {"insight": "ok"}}));
        assert_eq!(api.mode(), "api");
    }

    #[tokio::test]
    async fn test_local_without_url() {
        let analyzer = Analyzer::from_settings(&AnalysisSettings::default()).unwrap();
        assert!(analyzer.remote().is_none());

        let result = analyzer
            .analyze(&rows(vec![json!({"amount": -4, "category": "Fees"})]))
            .await
            .unwrap();

        match result {
            AnalysisResult::Local(analysis) => {
                assert_eq!(analysis.outflow, crate::money::Money::from_units(4));
                assert_eq!(analysis.top_categories[0].name, "Fees");
            }
            other => panic!("expected local analysis, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back() {
        // Port 9 (discard) on localhost is not expected to be listening
        let remote = RemoteAnalyzer::new(
            "http://127.0.0.1:9/analyze",
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let analyzer = Analyzer::with_remote(remote);
        let data = rows(vec![json!({"amount": 10})]);

        assert!(analyzer.analyze(&data).await.is_err());

        let outcome = analyzer.analyze_with_fallback(&data).await.unwrap();
        assert!(outcome.remote_error.is_some());
        assert_eq!(outcome.result.mode(), "local");
    }
}
