//! Miette diagnostic conversion for CLI errors.

use crate::error::{CliError, ServerError};
use miette::Report;
use mokia_graph::GraphError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Graph(e) => graph_error_to_miette(e),
        CliError::Server(ServerError::Bind { addr, source }) => miette::miette!(
            help = "Is another process using this port? Pass --port 0 to pick a free one",
            "Failed to bind to {}: {}",
            addr,
            source
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a module loading error to a miette Report
pub fn graph_error_to_miette(err: GraphError) -> Report {
    match err {
        GraphError::ResolutionFailed { specifier, from } => miette::miette!(
            help = "Relative imports start with ./ or ../, bare names are looked up in mock_modules/",
            "Cannot resolve '{}' imported from {}",
            specifier,
            from.display()
        ),
        GraphError::CircularImport { cycle } => miette::miette!(
            help = "Remove one of the imports in the chain",
            "Circular import detected:\n{}",
            cycle
        ),
        GraphError::InvalidModule { path, message } => miette::miette!(
            help = "Known keys are imports, host, port, prefix, priority, silent and routes",
            "Invalid module {}: {}",
            path.display(),
            message
        ),
        _ => miette::miette!("{}", err),
    }
}
