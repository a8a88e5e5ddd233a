//! Report data model.
//!
//! Strict, read-only snapshots consumed by the assembler and renderers.
//! External records arrive loosely typed; [`crate::normalize`] converts them
//! into these shapes in one defaulting pass before the engine runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Threshold applied when an experiment does not carry one for a metric.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Output format of a report artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated, styled PDF document.
    Document,
    /// Flat delimited text export.
    Tabular,
}

impl ReportFormat {
    /// Human-readable label shown on the document cover.
    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Document => "PDF Document",
            ReportFormat::Tabular => "CSV Export",
        }
    }
}

/// Canonical report sections. Output order is fixed regardless of the order
/// toggles appear in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    ExecutiveSummary,
    EvaluationContext,
    ModelUnderTest,
    EvaluationSetup,
    MetricResults,
    SafetyCompliance,
    SampleDetails,
    ArenaComparison,
    Recommendations,
}

impl SectionId {
    /// Fixed output order, independent of input order.
    pub const CANONICAL_ORDER: [SectionId; 9] = [
        SectionId::ExecutiveSummary,
        SectionId::EvaluationContext,
        SectionId::ModelUnderTest,
        SectionId::EvaluationSetup,
        SectionId::MetricResults,
        SectionId::SafetyCompliance,
        SectionId::SampleDetails,
        SectionId::ArenaComparison,
        SectionId::Recommendations,
    ];

    /// Title used when the configuration does not override the label.
    pub fn default_title(&self) -> &'static str {
        match self {
            SectionId::ExecutiveSummary => "Executive Summary",
            SectionId::EvaluationContext => "Evaluation Context",
            SectionId::ModelUnderTest => "Model Under Test",
            SectionId::EvaluationSetup => "Evaluation Setup",
            SectionId::MetricResults => "Metric Results",
            SectionId::SafetyCompliance => "Safety & Compliance",
            SectionId::SampleDetails => "Sample Details",
            SectionId::ArenaComparison => "Arena Comparison",
            SectionId::Recommendations => "Recommendations",
        }
    }
}

/// Per-section toggle from the report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionToggle {
    pub id: SectionId,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Configuration for one report build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    pub format: ReportFormat,
    /// Ordered selection. Must be non-empty for a report to be produced.
    pub experiment_ids: Vec<String>,
    /// Section toggles. A section absent from this list is enabled.
    #[serde(default)]
    pub sections: Vec<SectionToggle>,
    #[serde(default)]
    pub include_detailed_samples: bool,
    #[serde(default)]
    pub include_arena: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl ReportConfig {
    /// Whether `id` should appear in the output.
    pub fn section_enabled(&self, id: SectionId) -> bool {
        self.sections
            .iter()
            .find(|toggle| toggle.id == id)
            .map(|toggle| toggle.enabled)
            .unwrap_or(true)
    }

    /// Section title, honoring a configured label override.
    pub fn section_title(&self, id: SectionId) -> String {
        self.sections
            .iter()
            .find(|toggle| toggle.id == id)
            .and_then(|toggle| toggle.label.clone())
            .unwrap_or_else(|| id.default_title().to_string())
    }
}

/// Aggregated scores for one metric of one experiment. All scores and rates
/// are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub average_score: f64,
    pub pass_rate: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Samples contributing to this summary.
    pub total_evaluated: u64,
}

/// One completed evaluation run of a model against a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub model: String,
    pub dataset: String,
    pub judge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    pub total_samples: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall-clock run time, when the source reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    pub metric_summaries: BTreeMap<String, MetricSummary>,
    pub metric_thresholds: BTreeMap<String, f64>,
    /// Per-sample results; empty when the source supplied none.
    #[serde(default)]
    pub detailed_results: Vec<SampleResult>,
}

impl ExperimentRecord {
    /// Pass/fail threshold for `metric`, falling back to [`DEFAULT_THRESHOLD`].
    pub fn threshold_for(&self, metric: &str) -> f64 {
        self.metric_thresholds
            .get(metric)
            .copied()
            .unwrap_or(DEFAULT_THRESHOLD)
    }
}

/// One evaluated sample of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResult {
    pub sample_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protected_attributes: Vec<String>,
    pub input: String,
    pub actual_output: String,
    pub expected_output: String,
    pub response_length: u64,
    pub word_count: u64,
    pub metric_scores: BTreeMap<String, SampleScore>,
    pub timestamp: DateTime<Utc>,
}

/// Score of one metric on one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleScore {
    pub score: f64,
    pub passed: bool,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One head-to-head multi-model comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaRecord {
    pub id: String,
    pub name: String,
    /// Winning model; `None` records a tie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub contestants: Vec<ArenaContestant>,
    pub criteria: Vec<String>,
    pub rounds: u64,
    pub created_at: DateTime<Utc>,
}

/// Standing of one model inside an arena comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaContestant {
    pub model: String,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
    pub avg_score: f64,
}

/// Row of the experiment selection feed. Not consumed by the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentListing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_sections(sections: Vec<SectionToggle>) -> ReportConfig {
        ReportConfig {
            title: "Q3 Review".to_string(),
            format: ReportFormat::Document,
            experiment_ids: vec!["exp-1".to_string()],
            sections,
            include_detailed_samples: false,
            include_arena: false,
            project: None,
            organization: None,
        }
    }

    #[test]
    fn sections_absent_from_config_are_enabled() {
        let config = config_with_sections(vec![SectionToggle {
            id: SectionId::SampleDetails,
            enabled: false,
            label: None,
            description: None,
        }]);
        assert!(!config.section_enabled(SectionId::SampleDetails));
        assert!(config.section_enabled(SectionId::ExecutiveSummary));
    }

    #[test]
    fn section_title_honors_label_override() {
        let config = config_with_sections(vec![SectionToggle {
            id: SectionId::Recommendations,
            enabled: true,
            label: Some("Next Steps".to_string()),
            description: None,
        }]);
        assert_eq!(config.section_title(SectionId::Recommendations), "Next Steps");
        assert_eq!(
            config.section_title(SectionId::MetricResults),
            "Metric Results"
        );
    }

    #[test]
    fn section_ids_round_trip_as_kebab_case() {
        let json = serde_json::to_string(&SectionId::ExecutiveSummary).unwrap();
        assert_eq!(json, "\"executive-summary\"");
        let parsed: SectionId = serde_json::from_str("\"arena-comparison\"").unwrap();
        assert_eq!(parsed, SectionId::ArenaComparison);
    }

    #[test]
    fn threshold_falls_back_to_default() {
        let exp = ExperimentRecord {
            id: "exp-1".to_string(),
            name: "exp-1".to_string(),
            status: "completed".to_string(),
            model: "N/A".to_string(),
            dataset: "N/A".to_string(),
            judge: "N/A".to_string(),
            use_case: None,
            total_samples: 0,
            created_at: DateTime::UNIX_EPOCH,
            completed_at: None,
            duration_secs: None,
            metric_summaries: BTreeMap::new(),
            metric_thresholds: BTreeMap::from([("bias".to_string(), 0.3)]),
            detailed_results: Vec::new(),
        };
        assert_eq!(exp.threshold_for("bias"), 0.3);
        assert_eq!(exp.threshold_for("accuracy"), DEFAULT_THRESHOLD);
    }
}
