use anyhow::Context;
use chrono::Utc;

use dossier_core::{ReportConfig, ReportService};

use crate::cli::args::GenerateArgs;
use crate::exit_codes;
use crate::store::JsonDirStore;

pub async fn run(args: GenerateArgs) -> anyhow::Result<i32> {
    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config {}", args.config.display()))?;
    let config: ReportConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", args.config.display()))?;

    let store = JsonDirStore::new(&args.data_dir);
    let service = ReportService::new(store.clone(), store);
    let artifact = service.generate(&config, Utc::now()).await?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    let path = args.out_dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        bytes = artifact.bytes.len(),
        content_type = artifact.content_type,
        "report written"
    );
    println!("{}", path.display());
    Ok(exit_codes::OK)
}
