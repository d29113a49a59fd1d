//! Diagram document loading.
//!
//! Reads the flat node/edge list produced by the diagram layer from a JSON or
//! YAML document. Both `nodes` and `edges` may be omitted.
//!
//! ```json
//! { "nodes": [{ "id": "A" }], "edges": [{ "from": "A", "to": "B", "weight": 2 }] }
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::models::Diagram;

/// Errors raised while reading a diagram document.
#[derive(Debug, Error)]
pub enum DiagramLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON diagram: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML diagram: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported diagram format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Serialization format of a diagram document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    Json,
    Yaml,
}

impl DiagramFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse a diagram document from a string.
pub fn parse_diagram(text: &str, format: DiagramFormat) -> Result<Diagram, DiagramLoadError> {
    let diagram = match format {
        DiagramFormat::Json => serde_json::from_str(text)?,
        DiagramFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(diagram)
}

/// Load a diagram document, choosing the format from the file extension.
pub fn load_diagram(path: &Path) -> Result<Diagram, DiagramLoadError> {
    let format = DiagramFormat::from_path(path)
        .ok_or_else(|| DiagramLoadError::UnsupportedFormat(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path).map_err(|source| DiagramLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let diagram = parse_diagram(&text, format)?;
    tracing::debug!(
        "Loaded diagram from {} ({} nodes, {} edges)",
        path.display(),
        diagram.nodes.len(),
        diagram.edges.len()
    );
    Ok(diagram)
}

// ============================================================================
// Tests
// ============================================================================
