//! Report orchestration.
//!
//! Resolves experiment and arena records through the store seams, then
//! produces exactly one artifact. Experiment detail fetches are mutually
//! independent and fatal on failure; arena fetches are best-effort and
//! capped. No state crosses calls; each invocation allocates its own
//! buffer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{join_all, try_join_all};

use crate::assemble::{ReportAssembler, ReportInputs};
use crate::errors::ReportError;
use crate::metrics::MetricTaxonomy;
use crate::model::{ArenaRecord, ExperimentListing, ExperimentRecord, ReportConfig, ReportFormat};
use crate::normalize::{self, RawArenaRecord, RawExperimentRecord};
use crate::report::document::{render_document, CoverPage};
use crate::report::pdf::{PdfSink, Theme};
use crate::report::tabular::TabularExporter;
use crate::report::{report_file_name, ReportArtifact};

/// Most arena records folded into one report.
pub const ARENA_CAP: usize = 5;

/// Supplies experiment listings and detail records.
#[async_trait]
pub trait ExperimentStore: Send + Sync {
    /// Selection feed for callers; not consumed by the engine itself.
    async fn list_experiments(&self) -> anyhow::Result<Vec<ExperimentListing>>;

    async fn fetch_experiment(&self, id: &str) -> anyhow::Result<RawExperimentRecord>;
}

/// Supplies arena comparison records.
#[async_trait]
pub trait ArenaStore: Send + Sync {
    async fn list_arenas(&self) -> anyhow::Result<Vec<String>>;

    async fn fetch_arena(&self, id: &str) -> anyhow::Result<RawArenaRecord>;
}

/// One-shot report builder over injected stores.
pub struct ReportService<E, A> {
    experiments: E,
    arenas: A,
    taxonomy: MetricTaxonomy,
    theme: Theme,
}

impl<E: ExperimentStore, A: ArenaStore> ReportService<E, A> {
    pub fn new(experiments: E, arenas: A) -> Self {
        Self {
            experiments,
            arenas,
            taxonomy: MetricTaxonomy::default(),
            theme: Theme::default(),
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: MetricTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Generate one report artifact. Any failure aborts the operation with
    /// no partial artifact produced.
    pub async fn generate(
        &self,
        config: &ReportConfig,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportArtifact, ReportError> {
        if config.experiment_ids.is_empty() {
            return Err(ReportError::EmptySelection);
        }
        let experiments = self.fetch_experiments(config).await?;
        let arenas = if config.include_arena {
            self.fetch_arenas().await
        } else {
            Vec::new()
        };
        tracing::info!(
            experiments = experiments.len(),
            arenas = arenas.len(),
            format = ?config.format,
            "generating report"
        );
        match config.format {
            ReportFormat::Document => {
                self.document_artifact(config, &experiments, &arenas, generated_at)
            }
            ReportFormat::Tabular => self.tabular_artifact(config, &experiments, generated_at),
        }
    }

    async fn fetch_experiments(
        &self,
        config: &ReportConfig,
    ) -> Result<Vec<ExperimentRecord>, ReportError> {
        try_join_all(config.experiment_ids.iter().map(|id| async move {
            let raw = self
                .experiments
                .fetch_experiment(id)
                .await
                .map_err(|source| ReportError::ExperimentFetch {
                    id: id.clone(),
                    source,
                })?;
            Ok::<ExperimentRecord, ReportError>(normalize::experiment(raw))
        }))
        .await
    }

    async fn fetch_arenas(&self) -> Vec<ArenaRecord> {
        let ids = match self.arenas.list_arenas().await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::warn!(error = %err, "arena listing failed; continuing without arenas");
                return Vec::new();
            }
        };
        let fetches = ids.iter().take(ARENA_CAP).map(|id| async move {
            match self.arenas.fetch_arena(id).await {
                Ok(raw) => Some(normalize::arena(raw)),
                Err(err) => {
                    tracing::warn!(arena = %id, error = %err, "skipping arena record");
                    None
                }
            }
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }

    fn document_artifact(
        &self,
        config: &ReportConfig,
        experiments: &[ExperimentRecord],
        arenas: &[ArenaRecord],
        generated_at: DateTime<Utc>,
    ) -> Result<ReportArtifact, ReportError> {
        let assembler = ReportAssembler::new(self.taxonomy.clone());
        let sections = assembler.assemble(ReportInputs {
            config,
            experiments,
            arenas,
            generated_at,
        });
        let cover = CoverPage {
            title: "Evaluation Report".to_string(),
            subtitle: config.title.clone(),
            facts: vec![
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
                    generated_at.format("%Y-%m-%d").to_string(),
                ),
                ("Experiments".to_string(), experiments.len().to_string()),
                ("Format".to_string(), config.format.label().to_string()),
            ],
        };
        let sink = PdfSink::new(&config.title, self.theme.clone())?;
        let bytes = render_document(sink, &cover, &sections)?;
        Ok(ReportArtifact {
            file_name: report_file_name(&config.title, "pdf"),
            content_type: "application/pdf",
            bytes,
        })
    }

    fn tabular_artifact(
        &self,
        config: &ReportConfig,
        experiments: &[ExperimentRecord],
        generated_at: DateTime<Utc>,
    ) -> Result<ReportArtifact, ReportError> {
        let exporter = TabularExporter::new(self.taxonomy.clone());
        let bytes = exporter.export(config, experiments, generated_at)?;
        Ok(ReportArtifact {
            file_name: report_file_name(&config.title, "csv"),
            content_type: "text/csv",
            bytes,
        })
    }
}
