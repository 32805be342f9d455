// Per-file pipeline orchestration — read → extract → render → advise.
//
// Control flow is strictly linear; failures that prevent any meaningful
// output abort the file, while the optional "after" diagram degrades
// gracefully.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use vitruv_graphs::{CodeStructure, SourceAnalyzer};

use crate::advice::{RefactorAdvice, RefactorAdvisor};
use crate::config::VitruvConfig;
use crate::error::{InputError, RenderError, Result, VitruvError};
use crate::llm::providers::create_provider;
use crate::render::{GraphDescription, GraphvizRenderer, dot_from_structure};

/// Everything one `analyze` invocation produced.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub structure: CodeStructure,
    pub before_diagram: Option<PathBuf>,
    pub advice: Option<RefactorAdvice>,
    pub after_diagram: Option<PathBuf>,
}

/// Orchestrates the linear pipeline for a single source file.
#[derive(Debug)]
pub struct AnalyzePipeline {
    analyzer: SourceAnalyzer,
    renderer: GraphvizRenderer,
    advisor: Option<RefactorAdvisor>,
}

impl AnalyzePipeline {
    /// Build a pipeline from configuration.
    ///
    /// Grammar and query compilation failures surface here, before any file
    /// is touched.
    pub fn from_config(config: &VitruvConfig, with_advice: bool) -> Result<Self> {
        let analyzer = SourceAnalyzer::new()?;
        let renderer = GraphvizRenderer::new(config.output.dir.clone())
            .with_program(config.output.program.clone())
            .with_format(config.output.format.clone());

        let advisor = if with_advice {
            let api_key = std::env::var(&config.advice.api_key_env).ok();
            let provider = create_provider(
                &config.advice.provider,
                &config.advice.model,
                config.advice.base_url.as_deref(),
                api_key.as_deref(),
            )?;
            Some(RefactorAdvisor::new(provider, config.advice.temperature))
        } else {
            None
        };

        Ok(Self {
            analyzer,
            renderer,
            advisor,
        })
    }

    /// Run the full pipeline over one source file.
    pub async fn run(&mut self, file: &Path) -> Result<AnalyzeOutcome> {
        let source = read_source(file)?;
        let structure = self.analyzer.analyze(&source)?;
        let stem = file_stem(file);

        // "Before" diagram straight from the extracted structure.
        let before_diagram = match dot_from_structure(&structure) {
            Some(description) => self.render_or_skip(&description, &format!("{stem}_before"))?,
            None => {
                info!("No defined functions found to visualize");
                None
            }
        };

        // Advice is optional: provider failures and contract violations
        // degrade to a missing "after" diagram, never a crash.
        let (advice, after_diagram) = match &self.advisor {
            Some(advisor) => match advisor.suggest(&structure).await {
                Ok((advice, usage)) => {
                    info!(
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        "Advice received"
                    );
                    let description =
                        GraphDescription::from_dot(advice.new_architecture_dot.clone());
                    let after = self.render_or_skip(&description, &format!("{stem}_after"))?;
                    (Some(advice), after)
                }
                Err(e) => {
                    warn!(error = %e, "Refactor advice unavailable; continuing without it");
                    (None, None)
                }
            },
            None => (None, None),
        };

        Ok(AnalyzeOutcome {
            structure,
            before_diagram,
            advice,
            after_diagram,
        })
    }

    /// Render one description. A rejected description is reported and that
    /// artifact skipped; a missing Graphviz installation aborts the run.
    fn render_or_skip(
        &self,
        description: &GraphDescription,
        stem: &str,
    ) -> Result<Option<PathBuf>> {
        match self.renderer.render(description, stem) {
            Ok(path) => Ok(Some(path)),
            Err(e @ VitruvError::Render(RenderError::ExecutableNotFound { .. })) => Err(e),
            Err(e) => {
                warn!(error = %e, "Diagram skipped");
                Ok(None)
            }
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(VitruvError::Input(InputError::NotFound {
            path: path.display().to_string(),
        }));
    }
    std::fs::read_to_string(path).map_err(|e| {
        VitruvError::Input(InputError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "source".to_string(), |s| s.to_string_lossy().into_owned())
}

// ── Tests ───────────────────────────────────────────────────────────
