//! Report assembly.
//!
//! Turns a configuration plus a batch of fetched records into the ordered,
//! canonical section tree consumed by the document renderer. Assembly is
//! pure: it borrows the records, mutates nothing, and produces the same
//! tree for the same inputs.

use chrono::{DateTime, Utc};

use crate::fmt::{percent, truncate};
use crate::metrics::{self, MetricCategory, MetricTaxonomy};
use crate::model::{ArenaRecord, ExperimentRecord, MetricSummary, ReportConfig, SectionId};

/// Samples rendered per experiment in the paginated document.
pub const SAMPLE_ROW_CAP: usize = 50;

/// Input text shown per sample row before truncation.
const SAMPLE_TEXT_CHARS: usize = 60;

/// Pass/fail marker carried on table cells so renderers can tint them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Pass,
    Fail,
}

/// One table cell with an optional status tint.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub status: Option<CellStatus>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: None,
        }
    }

    /// PASS/FAIL cell tinted by outcome.
    pub fn verdict(passed: bool) -> Self {
        Self::tinted(if passed { "PASS" } else { "FAIL" }, passed)
    }

    /// Arbitrary text tinted by outcome.
    pub fn tinted(text: impl Into<String>, passed: bool) -> Self {
        Self {
            text: text.into(),
            status: Some(if passed {
                CellStatus::Pass
            } else {
                CellStatus::Fail
            }),
        }
    }
}

/// Head/body table inside a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// One renderable unit inside a section.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Labeled facts, one per line, optionally under a subheading.
    KeyValues {
        title: Option<String>,
        pairs: Vec<(String, String)>,
    },
    Table(Table),
    /// Free-standing paragraph.
    Note(String),
    /// Bulleted list.
    Bullets(Vec<String>),
}

/// One report section in canonical position.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

/// Borrowed inputs for one assembly pass. The engine retains no references
/// beyond the call.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub config: &'a ReportConfig,
    pub experiments: &'a [ExperimentRecord],
    pub arenas: &'a [ArenaRecord],
    pub generated_at: DateTime<Utc>,
}

/// Builds the canonical section sequence from fetched records.
pub struct ReportAssembler {
    taxonomy: MetricTaxonomy,
}

impl ReportAssembler {
    pub fn new(taxonomy: MetricTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Build the ordered section tree. Sections disabled in config, gated
    /// off by flags, or left without content are omitted.
    pub fn assemble(&self, inputs: ReportInputs<'_>) -> Vec<Section> {
        let mut sections = Vec::new();
        for id in SectionId::CANONICAL_ORDER {
            if !inputs.config.section_enabled(id) {
                continue;
            }
            let Some(blocks) = self.section_blocks(id, inputs) else {
                continue;
            };
            if blocks.is_empty() {
                continue;
            }
            sections.push(Section {
                id,
                title: inputs.config.section_title(id),
                blocks,
            });
        }
        tracing::debug!(sections = sections.len(), "assembled report outline");
        sections
    }

    /// `None` means the section is gated off by a config flag; an empty
    /// vector means the section has no content for these inputs.
    fn section_blocks(&self, id: SectionId, inputs: ReportInputs<'_>) -> Option<Vec<ContentBlock>> {
        match id {
            SectionId::ExecutiveSummary => Some(self.executive_summary(inputs.experiments)),
            SectionId::EvaluationContext => Some(self.evaluation_context(inputs)),
            SectionId::ModelUnderTest => Some(self.model_under_test(inputs.experiments)),
            SectionId::EvaluationSetup => Some(self.evaluation_setup(inputs.experiments)),
            SectionId::MetricResults => Some(self.metric_results(inputs.experiments)),
            SectionId::SafetyCompliance => Some(self.safety_compliance(inputs.experiments)),
            SectionId::SampleDetails => inputs
                .config
                .include_detailed_samples
                .then(|| self.sample_details(inputs.experiments)),
            SectionId::ArenaComparison => inputs
                .config
                .include_arena
                .then(|| self.arena_comparison(inputs.arenas)),
            SectionId::Recommendations => Some(self.recommendations(inputs.experiments)),
        }
    }

    fn executive_summary(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        experiments
            .iter()
            .map(|exp| {
                let total = exp.metric_summaries.len();
                let passing = exp
                    .metric_summaries
                    .iter()
                    .filter(|(name, summary)| self.metric_passed(exp, name, summary))
                    .count();
                let average = if total == 0 {
                    0.0
                } else {
                    exp.metric_summaries
                        .values()
                        .map(|s| s.average_score)
                        .sum::<f64>()
                        / total as f64
                };
                let verdict = if passing == total {
                    "PASS"
                } else if passing as f64 >= 0.7 * total as f64 {
                    "PARTIAL PASS"
                } else {
                    "FAIL"
                };
                ContentBlock::KeyValues {
                    title: Some(exp.name.clone()),
                    pairs: vec![
                        ("Metrics Evaluated".to_string(), total.to_string()),
                        ("Metrics Passing".to_string(), format!("{passing} of {total}")),
                        ("Average Score".to_string(), percent(average)),
                        ("Verdict".to_string(), verdict.to_string()),
                    ],
                }
            })
            .collect()
    }

    fn evaluation_context(&self, inputs: ReportInputs<'_>) -> Vec<ContentBlock> {
        let config = inputs.config;
        let mut pairs = vec![
            (
                "Project".to_string(),
                config.project.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Organization".to_string(),
                config
                    .organization
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Date".to_string(),
                inputs.generated_at.format("%Y-%m-%d").to_string(),
            ),
            ("Experiments".to_string(), inputs.experiments.len().to_string()),
        ];
        if let Some(use_case) = inputs
            .experiments
            .first()
            .and_then(|exp| exp.use_case.as_deref())
        {
            pairs.push(("Use Case".to_string(), use_case.to_string()));
        }
        vec![ContentBlock::KeyValues { title: None, pairs }]
    }

    fn model_under_test(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        experiments
            .iter()
            .map(|exp| {
                let mut pairs = vec![
                    ("Model".to_string(), exp.model.clone()),
                    ("Dataset".to_string(), exp.dataset.clone()),
                    ("Judge".to_string(), exp.judge.clone()),
                    (
                        "Created".to_string(),
                        exp.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                    ),
                ];
                if let Some(secs) = exp.duration_secs {
                    pairs.push(("Duration".to_string(), crate::fmt::duration(secs)));
                }
                ContentBlock::KeyValues {
                    title: Some(exp.name.clone()),
                    pairs,
                }
            })
            .collect()
    }

    fn evaluation_setup(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        experiments
            .iter()
            .map(|exp| {
                let thresholds: Vec<String> = exp
                    .metric_summaries
                    .keys()
                    .map(|name| {
                        format!(
                            "{}: {}",
                            metrics::format_metric_name(name),
                            percent(exp.threshold_for(name))
                        )
                    })
                    .collect();
                let metric_list: Vec<String> = exp
                    .metric_summaries
                    .keys()
                    .map(|name| metrics::format_metric_name(name))
                    .collect();
                ContentBlock::KeyValues {
                    title: Some(exp.name.clone()),
                    pairs: vec![
                        ("Samples".to_string(), exp.total_samples.to_string()),
                        (
                            "Thresholds".to_string(),
                            if thresholds.is_empty() {
                                "None".to_string()
                            } else {
                                thresholds.join(", ")
                            },
                        ),
                        (
                            "Metrics".to_string(),
                            if metric_list.is_empty() {
                                "None".to_string()
                            } else {
                                metric_list.join(", ")
                            },
                        ),
                    ],
                }
            })
            .collect()
    }

    fn metric_results(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        for exp in experiments {
            let mut quality = Vec::new();
            let mut safety = Vec::new();
            for (name, summary) in &exp.metric_summaries {
                let class = self.taxonomy.classify(name);
                let threshold = exp.threshold_for(name);
                let pass = metrics::passed(summary.average_score, threshold, class.inverted);
                let row = vec![
                    Cell::plain(metrics::format_metric_name(name)),
                    Cell::plain(percent(summary.average_score)),
                    Cell::plain(percent(summary.pass_rate)),
                    Cell::plain(percent(threshold)),
                    Cell::verdict(pass),
                    Cell::plain(metrics::rating(summary.average_score, class.inverted).label()),
                ];
                match class.category {
                    MetricCategory::Quality => quality.push(row),
                    MetricCategory::Safety => safety.push(row),
                }
            }
            for (group, rows) in [("Quality Metrics", quality), ("Safety Metrics", safety)] {
                if rows.is_empty() {
                    continue;
                }
                blocks.push(ContentBlock::Table(Table {
                    title: Some(format!("{}: {group}", exp.name)),
                    header: header(&[
                        "Metric",
                        "Avg Score",
                        "Pass Rate",
                        "Threshold",
                        "Status",
                        "Rating",
                    ]),
                    rows,
                }));
            }
        }
        blocks
    }

    fn safety_compliance(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        for exp in experiments {
            let safety: Vec<(&String, &MetricSummary)> = exp
                .metric_summaries
                .iter()
                .filter(|(name, _)| {
                    self.taxonomy.classify(name).category == MetricCategory::Safety
                })
                .collect();
            if safety.is_empty() {
                blocks.push(ContentBlock::Note(format!(
                    "No safety metrics were evaluated for {}.",
                    exp.name
                )));
                continue;
            }

            let mut rows = Vec::new();
            let mut notes = Vec::new();
            for (name, summary) in safety {
                let class = self.taxonomy.classify(name);
                let threshold = exp.threshold_for(name);
                let pass = metrics::passed(summary.average_score, threshold, class.inverted);
                let display = metrics::format_metric_name(name);
                rows.push(vec![
                    Cell::plain(display.clone()),
                    Cell::plain(percent(summary.average_score)),
                    Cell::plain(percent(threshold)),
                    Cell::verdict(pass),
                ]);
                if !pass {
                    notes.push(remediation(
                        &display,
                        summary.average_score,
                        threshold,
                        class.inverted,
                    ));
                }
            }
            blocks.push(ContentBlock::Table(Table {
                title: Some(format!("{}: Safety Compliance", exp.name)),
                header: header(&["Metric", "Avg Score", "Threshold", "Status"]),
                rows,
            }));
            blocks.extend(notes.into_iter().map(ContentBlock::Note));
        }
        blocks
    }

    fn sample_details(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        for exp in experiments {
            if exp.detailed_results.is_empty() {
                continue;
            }
            // Metric columns follow the first sample's score keys.
            let metric_names: Vec<&String> =
                exp.detailed_results[0].metric_scores.keys().collect();
            let mut head = header(&["#", "Input", "Output"]);
            head.extend(
                metric_names
                    .iter()
                    .map(|name| metrics::format_metric_name(name)),
            );

            let rows = exp
                .detailed_results
                .iter()
                .take(SAMPLE_ROW_CAP)
                .enumerate()
                .map(|(i, sample)| {
                    let mut row = vec![
                        Cell::plain((i + 1).to_string()),
                        Cell::plain(truncate(&sample.input, SAMPLE_TEXT_CHARS)),
                        Cell::plain(truncate(&sample.actual_output, SAMPLE_TEXT_CHARS)),
                    ];
                    for name in &metric_names {
                        match sample.metric_scores.get(*name) {
                            Some(score) => row.push(Cell::tinted(
                                format!("{:.2}", score.score),
                                score.passed,
                            )),
                            None => row.push(Cell::plain("-")),
                        }
                    }
                    row
                })
                .collect();

            blocks.push(ContentBlock::Table(Table {
                title: Some(exp.name.clone()),
                header: head,
                rows,
            }));
            if exp.detailed_results.len() > SAMPLE_ROW_CAP {
                blocks.push(ContentBlock::Note(format!(
                    "Showing first {} of {} samples for {}.",
                    SAMPLE_ROW_CAP,
                    exp.detailed_results.len(),
                    exp.name
                )));
            }
        }
        blocks
    }

    fn arena_comparison(&self, arenas: &[ArenaRecord]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        for arena in arenas {
            let rows = arena
                .contestants
                .iter()
                .map(|c| {
                    vec![
                        Cell::plain(c.model.clone()),
                        Cell::plain(c.wins.to_string()),
                        Cell::plain(c.losses.to_string()),
                        Cell::plain(c.ties.to_string()),
                        Cell::plain(percent(c.avg_score)),
                    ]
                })
                .collect();
            blocks.push(ContentBlock::Table(Table {
                title: Some(arena.name.clone()),
                header: header(&["Model", "Wins", "Losses", "Ties", "Avg Score"]),
                rows,
            }));
            let outcome = match &arena.winner {
                Some(winner) => format!("Winner: {winner} after {} rounds.", arena.rounds),
                None => format!("Result: tie after {} rounds.", arena.rounds),
            };
            blocks.push(ContentBlock::Note(if arena.criteria.is_empty() {
                outcome
            } else {
                format!("{outcome} Criteria: {}.", arena.criteria.join(", "))
            }));
        }
        blocks
    }

    fn recommendations(&self, experiments: &[ExperimentRecord]) -> Vec<ContentBlock> {
        let mut items = Vec::new();
        for exp in experiments {
            for (name, summary) in &exp.metric_summaries {
                let class = self.taxonomy.classify(name);
                let threshold = exp.threshold_for(name);
                if !metrics::passed(summary.average_score, threshold, class.inverted) {
                    items.push(format!(
                        "{}: {}",
                        exp.name,
                        remediation(
                            &metrics::format_metric_name(name),
                            summary.average_score,
                            threshold,
                            class.inverted,
                        )
                    ));
                }
            }
        }
        if items.is_empty() {
            vec![ContentBlock::Note(
                "All evaluated metrics meet their thresholds; no remediation is required."
                    .to_string(),
            )]
        } else {
            vec![ContentBlock::Bullets(items)]
        }
    }

    fn metric_passed(&self, exp: &ExperimentRecord, name: &str, summary: &MetricSummary) -> bool {
        let class = self.taxonomy.classify(name);
        metrics::passed(summary.average_score, exp.threshold_for(name), class.inverted)
    }
}

/// Remediation sentence for a failing metric. Wording follows the metric
/// direction: inverted metrics exceed their ceiling, normal metrics fall
/// short of their target.
fn remediation(display: &str, average: f64, threshold: f64, inverted: bool) -> String {
    if inverted {
        format!(
            "{display} averages {}, exceeding the {} ceiling; add mitigations to bring it down.",
            percent(average),
            percent(threshold)
        )
    } else {
        format!(
            "{display} averages {}, below the {} target; strengthen the evaluation pipeline to raise it.",
            percent(average),
            percent(threshold)
        )
    }
}

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArenaContestant, ReportFormat, SampleScore, SectionToggle};
    use chrono::DateTime;
    use std::collections::BTreeMap;

    fn experiment(name: &str) -> ExperimentRecord {
        ExperimentRecord {
            id: name.to_string(),
            name: name.to_string(),
            status: "completed".to_string(),
            model: "test-model".to_string(),
            dataset: "test-set".to_string(),
            judge: "gpt-judge".to_string(),
            use_case: Some("support-bot".to_string()),
            total_samples: 100,
            created_at: DateTime::UNIX_EPOCH,
            completed_at: None,
            duration_secs: Some(272),
            metric_summaries: BTreeMap::new(),
            metric_thresholds: BTreeMap::new(),
            detailed_results: Vec::new(),
        }
    }

    fn summary(average: f64) -> MetricSummary {
        MetricSummary {
            average_score: average,
            pass_rate: average,
            min_score: 0.0,
            max_score: 1.0,
            total_evaluated: 100,
        }
    }

    fn sample(id: &str, score: f64, passed: bool) -> crate::model::SampleResult {
        crate::model::SampleResult {
            sample_id: id.to_string(),
            protected_attributes: Vec::new(),
            input: format!("input {id}"),
            actual_output: format!("output {id}"),
            expected_output: String::new(),
            response_length: 10,
            word_count: 2,
            metric_scores: BTreeMap::from([(
                "accuracy".to_string(),
                SampleScore {
                    score,
                    passed,
                    threshold: 0.5,
                    reason: None,
                },
            )]),
            timestamp: DateTime::UNIX_EPOCH,
        }
    }

    fn config(experiments: &[&ExperimentRecord]) -> ReportConfig {
        ReportConfig {
            title: "Q3 Review".to_string(),
            format: ReportFormat::Document,
            experiment_ids: experiments.iter().map(|e| e.id.clone()).collect(),
            sections: Vec::new(),
            include_detailed_samples: false,
            include_arena: false,
            project: Some("Atlas".to_string()),
            organization: Some("Acme".to_string()),
        }
    }

    fn assemble(
        config: &ReportConfig,
        experiments: &[ExperimentRecord],
        arenas: &[ArenaRecord],
    ) -> Vec<Section> {
        ReportAssembler::new(MetricTaxonomy::default()).assemble(ReportInputs {
            config,
            experiments,
            arenas,
            generated_at: DateTime::UNIX_EPOCH,
        })
    }

    fn section<'a>(sections: &'a [Section], id: SectionId) -> Option<&'a Section> {
        sections.iter().find(|s| s.id == id)
    }

    #[test]
    fn sections_come_out_in_canonical_order() {
        let exp = experiment("exp-a");
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| {
                SectionId::CANONICAL_ORDER
                    .iter()
                    .position(|id| *id == s.id)
                    .unwrap()
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn disabled_sections_are_omitted() {
        let exp = experiment("exp-a");
        let mut cfg = config(&[&exp]);
        cfg.sections.push(SectionToggle {
            id: SectionId::ExecutiveSummary,
            enabled: false,
            label: None,
            description: None,
        });
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        assert!(section(&sections, SectionId::ExecutiveSummary).is_none());
        assert!(section(&sections, SectionId::EvaluationContext).is_some());
    }

    #[test]
    fn executive_verdicts_follow_pass_fractions() {
        let mut all_pass = experiment("all-pass");
        all_pass
            .metric_summaries
            .insert("accuracy".to_string(), summary(0.9));

        let mut partial = experiment("partial");
        for (i, avg) in [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.2, 0.2, 0.2].iter().enumerate() {
            partial
                .metric_summaries
                .insert(format!("metric{i:02}"), summary(*avg));
        }

        let mut failing = experiment("failing");
        failing
            .metric_summaries
            .insert("accuracy".to_string(), summary(0.2));
        failing
            .metric_summaries
            .insert("relevance".to_string(), summary(0.3));

        let experiments = vec![all_pass, partial, failing];
        let cfg = config(&experiments.iter().collect::<Vec<_>>());
        let sections = assemble(&cfg, &experiments, &[]);
        let exec = section(&sections, SectionId::ExecutiveSummary).unwrap();

        let verdicts: Vec<&str> = exec
            .blocks
            .iter()
            .map(|block| match block {
                ContentBlock::KeyValues { pairs, .. } => pairs
                    .iter()
                    .find(|(k, _)| k == "Verdict")
                    .map(|(_, v)| v.as_str())
                    .unwrap(),
                other => panic!("unexpected block {other:?}"),
            })
            .collect();
        assert_eq!(verdicts, vec!["PASS", "PARTIAL PASS", "FAIL"]);
    }

    #[test]
    fn metric_results_split_quality_and_safety() {
        let mut exp = experiment("exp-a");
        exp.metric_summaries
            .insert("accuracy".to_string(), summary(0.9));
        exp.metric_summaries.insert("bias".to_string(), summary(0.2));
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let results = section(&sections, SectionId::MetricResults).unwrap();

        let titles: Vec<&str> = results
            .blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Table(table) => table.title.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(
            titles,
            vec!["exp-a: Quality Metrics", "exp-a: Safety Metrics"]
        );
    }

    #[test]
    fn failing_bias_metric_gets_fail_status() {
        // bias averages 0.6 against a 0.5 ceiling: inverted, so FAIL.
        let mut exp = experiment("exp-a");
        exp.metric_summaries.insert("bias".to_string(), summary(0.6));
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let results = section(&sections, SectionId::MetricResults).unwrap();
        let ContentBlock::Table(table) = &results.blocks[0] else {
            panic!("expected table");
        };
        let status = &table.rows[0][4];
        assert_eq!(status.text, "FAIL");
        assert_eq!(status.status, Some(CellStatus::Fail));
    }

    #[test]
    fn safety_section_notes_absence_of_safety_metrics() {
        let mut exp = experiment("exp-a");
        exp.metric_summaries
            .insert("accuracy".to_string(), summary(0.9));
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let safety = section(&sections, SectionId::SafetyCompliance).unwrap();
        assert_eq!(
            safety.blocks,
            vec![ContentBlock::Note(
                "No safety metrics were evaluated for exp-a.".to_string()
            )]
        );
    }

    #[test]
    fn safety_section_adds_remediation_for_failures() {
        let mut exp = experiment("exp-a");
        exp.metric_summaries
            .insert("toxicity".to_string(), summary(0.7));
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let safety = section(&sections, SectionId::SafetyCompliance).unwrap();
        assert_eq!(safety.blocks.len(), 2);
        let ContentBlock::Note(note) = &safety.blocks[1] else {
            panic!("expected remediation note");
        };
        assert!(note.contains("Toxicity"), "{note}");
        assert!(note.contains("exceeding"), "{note}");
    }

    #[test]
    fn recommendations_collapse_to_single_success_sentence() {
        let mut exp = experiment("exp-a");
        exp.metric_summaries
            .insert("accuracy".to_string(), summary(0.9));
        exp.metric_summaries.insert("bias".to_string(), summary(0.1));
        let cfg = config(&[&exp]);
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let recs = section(&sections, SectionId::Recommendations).unwrap();
        assert_eq!(
            recs.blocks,
            vec![ContentBlock::Note(
                "All evaluated metrics meet their thresholds; no remediation is required."
                    .to_string()
            )]
        );
    }

    #[test]
    fn recommendations_branch_wording_on_direction() {
        // Two experiments, each with exactly one failing metric: one
        // inverted (bias), one normal (accuracy).
        let mut inverted = experiment("inverted");
        inverted
            .metric_summaries
            .insert("bias".to_string(), summary(0.6));
        let mut normal = experiment("normal");
        normal
            .metric_summaries
            .insert("accuracy".to_string(), summary(0.3));

        let experiments = vec![inverted, normal];
        let cfg = config(&experiments.iter().collect::<Vec<_>>());
        let sections = assemble(&cfg, &experiments, &[]);
        let recs = section(&sections, SectionId::Recommendations).unwrap();
        let ContentBlock::Bullets(items) = &recs.blocks[0] else {
            panic!("expected bullets");
        };
        assert_eq!(items.len(), 2);
        let inverted_item = items.iter().find(|i| i.starts_with("inverted:")).unwrap();
        let normal_item = items.iter().find(|i| i.starts_with("normal:")).unwrap();
        assert!(inverted_item.contains("exceeding"), "{inverted_item}");
        assert!(normal_item.contains("below"), "{normal_item}");
    }

    #[test]
    fn sample_details_require_flag_and_data() {
        let mut with_samples = experiment("with-samples");
        with_samples.detailed_results = vec![sample("s1", 0.9, true)];
        let empty = experiment("empty");

        let experiments = vec![with_samples, empty];
        let mut cfg = config(&experiments.iter().collect::<Vec<_>>());

        // Flag off: section absent even though data exists.
        let sections = assemble(&cfg, &experiments, &[]);
        assert!(section(&sections, SectionId::SampleDetails).is_none());

        // Flag on: one table for the experiment with samples, nothing for
        // the experiment with an empty result list.
        cfg.include_detailed_samples = true;
        let sections = assemble(&cfg, &experiments, &[]);
        let details = section(&sections, SectionId::SampleDetails).unwrap();
        let tables: Vec<&Table> = details
            .blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title.as_deref(), Some("with-samples"));
        assert_eq!(tables[0].header, vec!["#", "Input", "Output", "Accuracy"]);
    }

    #[test]
    fn sample_details_cap_rows_and_note_truncation() {
        let mut exp = experiment("big");
        exp.detailed_results = (0..75)
            .map(|i| sample(&format!("s{i}"), 0.9, true))
            .collect();
        let mut cfg = config(&[&exp]);
        cfg.include_detailed_samples = true;
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        let details = section(&sections, SectionId::SampleDetails).unwrap();
        let ContentBlock::Table(table) = &details.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), SAMPLE_ROW_CAP);
        assert_eq!(
            details.blocks[1],
            ContentBlock::Note("Showing first 50 of 75 samples for big.".to_string())
        );
    }

    #[test]
    fn arena_section_requires_flag_and_records() {
        let exp = experiment("exp-a");
        let arena = ArenaRecord {
            id: "ar-1".to_string(),
            name: "Spring Arena".to_string(),
            winner: Some("model-x".to_string()),
            contestants: vec![ArenaContestant {
                model: "model-x".to_string(),
                wins: 7,
                losses: 2,
                ties: 1,
                avg_score: 0.81,
            }],
            criteria: vec!["helpfulness".to_string()],
            rounds: 10,
            created_at: DateTime::UNIX_EPOCH,
        };

        let mut cfg = config(&[&exp]);
        cfg.include_arena = true;

        // Flag on but no records: section omitted.
        let sections = assemble(&cfg, &[exp.clone()], &[]);
        assert!(section(&sections, SectionId::ArenaComparison).is_none());

        let sections = assemble(&cfg, &[exp.clone()], &[arena]);
        let arena_section = section(&sections, SectionId::ArenaComparison).unwrap();
        let ContentBlock::Table(table) = &arena_section.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.header, vec!["Model", "Wins", "Losses", "Ties", "Avg Score"]);
        assert_eq!(table.rows[0][4].text, "81.0%");
        let ContentBlock::Note(note) = &arena_section.blocks[1] else {
            panic!("expected note");
        };
        assert!(note.contains("Winner: model-x"), "{note}");
    }
}
