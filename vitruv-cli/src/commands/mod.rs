pub mod analyze;
pub mod structure;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full pipeline: extract structure, render diagrams, request refactor advice
    Analyze(analyze::AnalyzeArgs),
    /// Extract structure only and print it to stdout
    Structure(structure::StructureArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Analyze(args) => analyze::run(args).await,
        Command::Structure(args) => structure::run(args).await,
    }
}
