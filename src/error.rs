//! Error types for edugraph.

use std::io;

/// Result type alias for edugraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for edugraph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Already initialized.
    #[error("Already initialized in this directory")]
    AlreadyInitialized,

    /// Not initialized.
    #[error("Not initialized. Run `edugraph init` first")]
    NotInitialized,

    /// Domain not found by code.
    #[error("Domain {0} not found")]
    DomainNotFound(i64),

    /// Domain name is already in use.
    #[error("A domain named '{0}' already exists")]
    DomainNameTaken(String),

    /// Skill not found within a domain.
    #[error("Skill {0}.{1} not found")]
    SkillNotFound(i64, i64),

    /// Strategy not found within a skill.
    #[error("Strategy {0}.{1}.{2} not found")]
    StrategyNotFound(i64, i64, i64),

    /// Action not found within a strategy.
    #[error("Action {0} not found in this strategy")]
    ActionNotFound(i64),

    /// Action already has this prerequisite.
    #[error("Action already requires strategy {0}.{1}")]
    DuplicatePrerequisite(i64, i64),

    /// Graph not found by name.
    #[error("Graph '{0}' not found")]
    GraphNotFound(String),

    /// Graph name is already in use.
    #[error("A graph named '{0}' already exists")]
    GraphNameTaken(String),

    /// Vertex not found within a graph.
    #[error("Vertex {1} not found in graph '{0}'")]
    VertexNotFound(String, i64),

    /// Edge not found between two vertices.
    #[error("No edge {0} -> {1} in this graph")]
    EdgeNotFound(i64, i64),

    /// Graph contains a cycle, so it has no topological order.
    #[error("Graph '{0}' contains a cycle: {1}")]
    GraphCyclic(String, String),

    /// Malformed JSON graph document.
    #[error("Cannot import graph: {0}")]
    BadImport(String),
}

/// Format a list of codes as a dotted path, e.g. `1.2.3`.
pub fn format_code_path(codes: &[i64]) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_path() {
        assert_eq!(format_code_path(&[1, 2, 3]), "1.2.3");
        assert_eq!(format_code_path(&[7]), "7");
        assert_eq!(format_code_path(&[]), "");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::SkillNotFound(1, 4).to_string(),
            "Skill 1.4 not found"
        );
        assert_eq!(
            Error::GraphNameTaken("pipeline".to_string()).to_string(),
            "A graph named 'pipeline' already exists"
        );
        assert_eq!(
            Error::VertexNotFound("pipeline".to_string(), 3).to_string(),
            "Vertex 3 not found in graph 'pipeline'"
        );
    }
}
