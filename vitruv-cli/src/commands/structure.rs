use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use vitruv_core::render::dot_from_structure;
use vitruv_graphs::SourceAnalyzer;

#[derive(Args, Debug)]
pub struct StructureArgs {
    /// Path to the source file to analyze
    pub file: PathBuf,

    /// Output format: json, dot
    #[arg(long, default_value = "json", value_parser = ["json", "dot"])]
    pub format: String,
}

#[allow(clippy::unused_async)]
pub async fn run(args: StructureArgs) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Source file not found: {}", args.file.display()))?;

    let mut analyzer = SourceAnalyzer::new()?;
    let structure = analyzer.analyze(&source)?;

    if args.format == "dot" {
        match dot_from_structure(&structure) {
            Some(description) => print!("{description}"),
            None => eprintln!("No defined functions found to visualize."),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&structure)?);
    }

    Ok(())
}
