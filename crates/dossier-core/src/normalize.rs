//! Loose wire shapes and the single defaulting pass into the strict model.
//!
//! External records arrive as camelCase JSON with most fields optional. The
//! orchestrator normalizes them here once, instead of scattering
//! null-coalescing through the assembler and renderers: absent dataset,
//! judge, or model render as "N/A"; absent maps become empty; scores and
//! thresholds are clamped into [0, 1]; malformed sample lists are dropped
//! so the sample-details output is omitted rather than half-rendered.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{
    ArenaContestant, ArenaRecord, ExperimentRecord, MetricSummary, SampleResult, SampleScore,
};

const NOT_AVAILABLE: &str = "N/A";

/// Experiment detail record as supplied by the collaborator API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExperimentRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub judge: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub total_samples: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub metric_summaries: Option<BTreeMap<String, RawMetricSummary>>,
    #[serde(default)]
    pub metric_thresholds: Option<BTreeMap<String, f64>>,
    /// Kept as raw JSON so one malformed sample drops the list, not the
    /// whole record.
    #[serde(default)]
    pub detailed_results: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetricSummary {
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub pass_rate: Option<f64>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub total_evaluated: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSampleResult {
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub protected_attributes: Vec<String>,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub actual_output: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub response_length: Option<u64>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub metric_scores: BTreeMap<String, RawSampleScore>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSampleScore {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Arena record as supplied by the collaborator API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArenaRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub contestants: Vec<RawArenaContestant>,
    #[serde(default)]
    pub criteria: Vec<String>,
    #[serde(default)]
    pub rounds: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArenaContestant {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub wins: Option<u64>,
    #[serde(default)]
    pub losses: Option<u64>,
    #[serde(default)]
    pub ties: Option<u64>,
    #[serde(default)]
    pub avg_score: Option<f64>,
}

/// Normalize one experiment detail record.
pub fn experiment(raw: RawExperimentRecord) -> ExperimentRecord {
    let metric_summaries = raw
        .metric_summaries
        .unwrap_or_default()
        .into_iter()
        .map(|(name, s)| {
            (
                name,
                MetricSummary {
                    average_score: unit(s.average_score),
                    pass_rate: unit(s.pass_rate),
                    min_score: unit(s.min_score),
                    max_score: unit(s.max_score),
                    total_evaluated: s.total_evaluated.unwrap_or(0),
                },
            )
        })
        .collect();
    let metric_thresholds = raw
        .metric_thresholds
        .unwrap_or_default()
        .into_iter()
        .map(|(name, t)| (name, t.clamp(0.0, 1.0)))
        .collect();
    let detailed_results = raw.detailed_results.map(samples).unwrap_or_default();

    ExperimentRecord {
        name: raw.name.unwrap_or_else(|| raw.id.clone()),
        status: raw.status.unwrap_or_else(|| "unknown".to_string()),
        model: raw.model.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        dataset: raw.dataset.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        judge: raw.judge.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        use_case: raw.use_case,
        total_samples: raw.total_samples.unwrap_or(0),
        created_at: raw.created_at.unwrap_or(DateTime::UNIX_EPOCH),
        completed_at: raw.completed_at,
        duration_secs: raw.duration_secs,
        metric_summaries,
        metric_thresholds,
        detailed_results,
        id: raw.id,
    }
}

/// Normalize one arena record.
pub fn arena(raw: RawArenaRecord) -> ArenaRecord {
    let contestants = raw
        .contestants
        .into_iter()
        .map(|c| ArenaContestant {
            model: c.model.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            wins: c.wins.unwrap_or(0),
            losses: c.losses.unwrap_or(0),
            ties: c.ties.unwrap_or(0),
            avg_score: unit(c.avg_score),
        })
        .collect();
    ArenaRecord {
        name: raw.name.unwrap_or_else(|| raw.id.clone()),
        winner: raw.winner,
        contestants,
        criteria: raw.criteria,
        rounds: raw.rounds.unwrap_or(0),
        created_at: raw.created_at.unwrap_or(DateTime::UNIX_EPOCH),
        id: raw.id,
    }
}

fn samples(value: serde_json::Value) -> Vec<SampleResult> {
    match serde_json::from_value::<Vec<RawSampleResult>>(value) {
        Ok(raw) => raw.into_iter().enumerate().map(sample).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "malformed detailedResults; omitting samples");
            Vec::new()
        }
    }
}

fn sample((index, raw): (usize, RawSampleResult)) -> SampleResult {
    SampleResult {
        sample_id: raw
            .sample_id
            .unwrap_or_else(|| format!("sample-{}", index + 1)),
        protected_attributes: raw.protected_attributes,
        input: raw.input,
        actual_output: raw.actual_output,
        expected_output: raw.expected_output,
        response_length: raw.response_length.unwrap_or(0),
        word_count: raw.word_count.unwrap_or(0),
        metric_scores: raw
            .metric_scores
            .into_iter()
            .map(|(name, s)| {
                (
                    name,
                    SampleScore {
                        score: s.score.clamp(0.0, 1.0),
                        passed: s.passed,
                        threshold: s.threshold.unwrap_or(crate::model::DEFAULT_THRESHOLD),
                        reason: s.reason,
                    },
                )
            })
            .collect(),
        timestamp: raw.timestamp.unwrap_or(DateTime::UNIX_EPOCH),
    }
}

fn unit(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).clamp(0.0, 1.0)
}
