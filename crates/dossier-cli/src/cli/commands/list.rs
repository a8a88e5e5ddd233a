use dossier_core::service::ExperimentStore;

use crate::cli::args::ListArgs;
use crate::exit_codes;
use crate::store::JsonDirStore;

pub async fn run(args: ListArgs) -> anyhow::Result<i32> {
    let store = JsonDirStore::new(&args.data_dir);
    let listings = store.list_experiments().await?;
    if listings.is_empty() {
        println!("no experiments found in {}", args.data_dir.display());
        return Ok(exit_codes::OK);
    }
    for listing in listings {
        println!(
            "{:<24} {:<28} {:<20} {}",
            listing.id, listing.name, listing.model, listing.status
        );
    }
    Ok(exit_codes::OK)
}
