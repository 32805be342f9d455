// Invocation of the external Graphviz executable.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{RenderError, Result, VitruvError};

use super::GraphDescription;

/// Renders graph descriptions to image artifacts via a Graphviz subprocess.
///
/// Each render spawns an isolated subprocess; there is no pooling and no
/// timeout, matching the synchronous pipeline model.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
    format: String,
    output_dir: PathBuf,
}

impl GraphvizRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: "dot".to_string(),
            format: "png".to_string(),
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Render a description to `<output_dir>/<stem>.<format>`.
    ///
    /// No structural validation happens here beyond what Graphviz itself
    /// performs on the piped-in text.
    pub fn render(&self, description: &GraphDescription, stem: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(RenderError::Io)?;
        let output_path = self.output_dir.join(format!("{stem}.{}", self.format));

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VitruvError::Render(RenderError::ExecutableNotFound {
                        program: self.program.clone(),
                    })
                } else {
                    VitruvError::Render(RenderError::Io(e))
                }
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(description.as_str().as_bytes())
                .map_err(RenderError::Io)?;
        }
        drop(child.stdin.take());

        let output = child.wait_with_output().map_err(RenderError::Io)?;
        if !output.status.success() {
            return Err(VitruvError::Render(RenderError::InvalidDescription {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                description: description.as_str().to_string(),
            }));
        }

        info!(path = %output_path.display(), "Diagram rendered");
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let renderer =
            GraphvizRenderer::new(dir.path()).with_program("vitruv-nonexistent-renderer");
        let description = GraphDescription::from_dot("digraph G { a -> b; }");

        let err = renderer
            .render(&description, "sample")
            .expect_err("missing executable should fail");
        assert!(matches!(
            err,
            VitruvError::Render(RenderError::ExecutableNotFound { .. })
        ));
        assert!(err.to_string().contains("brew install graphviz"));
    }

    #[test]
    fn output_path_uses_stem_and_format() {
        let renderer = GraphvizRenderer::new("out").with_format("svg");
        assert_eq!(renderer.format, "svg");
        assert_eq!(renderer.output_dir, PathBuf::from("out"));
    }
}
