pub mod generate;
pub mod inspect;
pub mod list;

use crate::cli::args::{Cli, Command};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Generate(args) => generate::run(args).await,
        Command::Inspect(args) => inspect::run(args).await,
        Command::List(args) => list::run(args).await,
    }
}
