/// Top-level Vitruv error type.
///
/// All fallible operations in `vitruv-core` return [`Result<T, VitruvError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum VitruvError {
    /// Error reading the source file under analysis.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from the extraction engine (grammar, queries, tree-sitter).
    #[error("Graph engine error: {0}")]
    Graph(#[from] vitruv_graphs::GraphError),

    /// Error from the refactor-advice collaborator.
    #[error("Advice error: {0}")]
    Advice(#[from] AdviceError),

    /// Error producing diagram artifacts.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors reading the source file under analysis. Fatal for that file: no
/// partial artifacts are produced.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// The source path does not exist or is not a regular file.
    #[error("Source file not found: {path}")]
    NotFound {
        /// Path as given by the caller.
        path: String,
    },

    /// The file exists but could not be read (permissions, encoding).
    #[error("Cannot read {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Errors from the refactor-advice collaborator, an untrusted boundary.
#[derive(thiserror::Error, Debug)]
pub enum AdviceError {
    /// Network-level failure reaching the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider returned a non-success HTTP status.
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code from the provider.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Provider envelope could not be decoded.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// The response payload does not match the advice schema. The raw text
    /// is echoed for diagnosis.
    #[error("Contract violation: {message}\n--- raw response ---\n{raw}")]
    Contract { message: String, raw: String },

    /// Provider configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors producing diagram artifacts.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The Graphviz executable is not installed or not on PATH. Fatal: no
    /// diagram can be produced without it.
    #[error(
        "Graphviz executable '{program}' not found.\n\
         Install Graphviz first:\n  \
         macOS:   brew install graphviz\n  \
         Debian:  sudo apt-get install graphviz\n  \
         Windows: choco install graphviz"
    )]
    ExecutableNotFound { program: String },

    /// The renderer rejected the graph description. The offending text is
    /// echoed; other artifacts may still be produced.
    #[error(
        "Graphviz rejected the graph description: {message}\n\
         --- offending description ---\n{description}"
    )]
    InvalidDescription { message: String, description: String },

    /// Filesystem I/O while writing artifacts.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in Vitruv configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, VitruvError>`.
pub type Result<T> = std::result::Result<T, VitruvError>;
