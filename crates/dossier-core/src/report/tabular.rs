//! Flat delimited export.
//!
//! One artifact, sequential labeled blocks separated by a blank line. Every
//! field is quoted; embedded quotes are doubled by the writer, so any field
//! parses back to the original string.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};

use crate::errors::ExportError;
use crate::fmt::percent;
use crate::metrics::{self, MetricTaxonomy};
use crate::model::{ExperimentRecord, ReportConfig};

/// Writes the delimited export; walks the experiment data independently of
/// the document assembler since the flat shape differs.
pub struct TabularExporter {
    taxonomy: MetricTaxonomy,
}

impl TabularExporter {
    pub fn new(taxonomy: MetricTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Emit the full export as one byte buffer.
    pub fn export(
        &self,
        config: &ReportConfig,
        experiments: &[ExperimentRecord],
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, ExportError> {
        let mut blocks: Vec<Vec<u8>> = Vec::new();
        blocks.push(self.header_block(config, generated_at)?);
        blocks.push(self.summary_block(experiments)?);
        blocks.push(self.metric_block(experiments)?);
        for exp in experiments {
            if exp.detailed_results.is_empty() {
                continue;
            }
            blocks.push(self.sample_block(exp)?);
        }
        // Each block already ends with a record terminator; joining with one
        // more newline yields the blank separator line.
        Ok(blocks.join(&b"\n"[..]))
    }

    fn writer() -> csv::Writer<Vec<u8>> {
        WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .flexible(true)
            .from_writer(Vec::new())
    }

    fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
        writer
            .into_inner()
            .map_err(|e| ExportError::Buffer(e.to_string()))
    }

    fn header_block(
        &self,
        config: &ReportConfig,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, ExportError> {
        let mut w = Self::writer();
        w.write_record([config.title.as_str()])?;
        w.write_record([format!(
            "Project: {}",
            config.project.as_deref().unwrap_or("N/A")
        )])?;
        w.write_record([format!("Generated: {}", generated_at.to_rfc3339())])?;
        Self::finish(w)
    }

    fn summary_block(&self, experiments: &[ExperimentRecord]) -> Result<Vec<u8>, ExportError> {
        let mut w = Self::writer();
        w.write_record(["EXPERIMENT SUMMARY"])?;
        w.write_record([
            "Name", "Model", "Dataset", "Judge", "Samples", "Status", "Created",
        ])?;
        for exp in experiments {
            w.write_record([
                exp.name.clone(),
                exp.model.clone(),
                exp.dataset.clone(),
                exp.judge.clone(),
                exp.total_samples.to_string(),
                exp.status.clone(),
                exp.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ])?;
        }
        Self::finish(w)
    }

    fn metric_block(&self, experiments: &[ExperimentRecord]) -> Result<Vec<u8>, ExportError> {
        let mut w = Self::writer();
        w.write_record(["METRIC RESULTS"])?;
        w.write_record([
            "Experiment",
            "Metric",
            "Avg Score",
            "Pass Rate",
            "Min",
            "Max",
            "Threshold",
            "Status",
            "Category",
        ])?;
        for exp in experiments {
            for (name, summary) in &exp.metric_summaries {
                let class = self.taxonomy.classify(name);
                let threshold = exp.threshold_for(name);
                let status =
                    if metrics::passed(summary.average_score, threshold, class.inverted) {
                        "PASS"
                    } else {
                        "FAIL"
                    };
                w.write_record([
                    exp.name.clone(),
                    metrics::format_metric_name(name),
                    percent(summary.average_score),
                    percent(summary.pass_rate),
                    percent(summary.min_score),
                    percent(summary.max_score),
                    percent(threshold),
                    status.to_string(),
                    class.category.as_str().to_string(),
                ])?;
            }
        }
        Self::finish(w)
    }

    fn sample_block(&self, exp: &ExperimentRecord) -> Result<Vec<u8>, ExportError> {
        let mut w = Self::writer();
        w.write_record([format!("SAMPLE DETAILS - {}", exp.name)])?;

        // Metric columns follow the first sample's score keys: all score
        // columns, then all passed columns.
        let metric_names: Vec<&String> = exp.detailed_results[0].metric_scores.keys().collect();
        let mut head = vec!["#".to_string(), "Input".to_string(), "Output".to_string()];
        head.extend(
            metric_names
                .iter()
                .map(|name| format!("{} Score", metrics::format_metric_name(name))),
        );
        head.extend(
            metric_names
                .iter()
                .map(|name| format!("{} Passed", metrics::format_metric_name(name))),
        );
        w.write_record(&head)?;

        for (i, sample) in exp.detailed_results.iter().enumerate() {
            let mut row = vec![
                (i + 1).to_string(),
                sample.input.clone(),
                sample.actual_output.clone(),
            ];
            for name in &metric_names {
                match sample.metric_scores.get(*name) {
                    Some(score) => row.push(format!("{:.2}", score.score)),
                    None => row.push(String::new()),
                }
            }
            for name in &metric_names {
                match sample.metric_scores.get(*name) {
                    Some(score) => row.push(score.passed.to_string()),
                    None => row.push(String::new()),
                }
            }
            w.write_record(&row)?;
        }
        Self::finish(w)
    }
}
