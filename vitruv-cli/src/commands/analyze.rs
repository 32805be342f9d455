use std::path::PathBuf;

use clap::Args;

use vitruv_core::config::VitruvConfig;
use vitruv_core::pipeline::AnalyzePipeline;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the source file to analyze
    pub file: PathBuf,

    /// LLM provider: ollama, openai, custom
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name (e.g. "llama3", "mistral")
    #[arg(long)]
    pub model: Option<String>,

    /// Provider base URL (e.g. "http://localhost:11434")
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output directory for diagram artifacts
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Diagram format passed to Graphviz (png, svg, ...)
    #[arg(long)]
    pub format: Option<String>,

    /// Skip the refactor-advice step (extraction and "before" diagram only)
    #[arg(long)]
    pub no_advice: bool,

    /// Path to a vitruv.toml configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = VitruvConfig::load(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.advice.provider = provider;
    }
    if let Some(model) = args.model {
        config.advice.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.advice.base_url = Some(base_url);
    }
    if let Some(dir) = args.out_dir {
        config.output.dir = dir;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    println!("Analyzing source file: {}", args.file.display());

    let mut pipeline = AnalyzePipeline::from_config(&config, !args.no_advice)?;
    let outcome = pipeline.run(&args.file).await?;

    println!("Extracted structure:");
    println!("{}", serde_json::to_string_pretty(&outcome.structure)?);

    match &outcome.before_diagram {
        Some(path) => println!("\n'Before' diagram saved to {}", path.display()),
        None => println!("\nNo 'before' diagram produced."),
    }

    if let Some(advice) = &outcome.advice {
        println!("\n--- Architect's Suggestion ---");
        println!("\nSummary: {}", advice.summary);
        println!("\nReasoning:");
        for point in advice.reasoning.points() {
            println!("- {point}");
        }
        match &outcome.after_diagram {
            Some(path) => println!("\n'After' diagram saved to {}", path.display()),
            None => println!("\nNo 'after' diagram produced."),
        }
    } else if !args.no_advice {
        println!("\nNo usable refactor advice; skipped the 'after' diagram.");
    }

    Ok(())
}
