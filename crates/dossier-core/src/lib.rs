//! Evaluation report generation engine.
//!
//! Consumes structured results of completed LLM-evaluation experiments (and
//! optional head-to-head arena comparisons) and deterministically produces
//! exactly one downloadable artifact per invocation: a paginated PDF report
//! or a flat delimited export. Assembly and rendering are pure with respect
//! to their inputs; all records are pre-fetched and borrowed for the
//! duration of one build.

pub mod assemble;
pub mod errors;
pub mod fmt;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod report;
pub mod service;

// Convenience re-exports
pub use assemble::{ContentBlock, ReportAssembler, ReportInputs, Section};
pub use errors::{ExportError, RenderError, ReportError};
pub use metrics::{format_metric_name, MetricCategory, MetricClass, MetricTaxonomy, Rating};
pub use model::{
    ArenaContestant, ArenaRecord, ExperimentListing, ExperimentRecord, MetricSummary,
    ReportConfig, ReportFormat, SampleResult, SectionId, SectionToggle, DEFAULT_THRESHOLD,
};
pub use report::{report_file_name, slug, ReportArtifact};
pub use service::{ArenaStore, ExperimentStore, ReportService, ARENA_CAP};
