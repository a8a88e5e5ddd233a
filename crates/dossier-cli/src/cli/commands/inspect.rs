use dossier_core::fmt::percent;
use dossier_core::metrics::{self, MetricTaxonomy};
use dossier_core::normalize;
use dossier_core::service::ExperimentStore;

use crate::cli::args::InspectArgs;
use crate::exit_codes;
use crate::store::JsonDirStore;

pub async fn run(args: InspectArgs) -> anyhow::Result<i32> {
    let store = JsonDirStore::new(&args.data_dir);
    let exp = normalize::experiment(store.fetch_experiment(&args.id).await?);
    let taxonomy = MetricTaxonomy::default();

    println!("{} ({})", exp.name, exp.id);
    println!(
        "Model: {}  Dataset: {}  Judge: {}  Status: {}",
        exp.model, exp.dataset, exp.judge, exp.status
    );
    println!();

    let mut pass = 0;
    let mut fail = 0;
    for (name, summary) in &exp.metric_summaries {
        let class = taxonomy.classify(name);
        let threshold = exp.threshold_for(name);
        let ok = metrics::passed(summary.average_score, threshold, class.inverted);
        if ok {
            pass += 1;
        } else {
            fail += 1;
        }
        let icon = if ok { "✅" } else { "❌" };
        println!(
            "{} {:<28} {:>7}  (threshold {:>7}, {})",
            icon,
            metrics::format_metric_name(name),
            percent(summary.average_score),
            percent(threshold),
            metrics::rating(summary.average_score, class.inverted).label()
        );
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Summary: {} passed, {} failed, {} samples evaluated",
        pass, fail, exp.total_samples
    );
    Ok(exit_codes::OK)
}
