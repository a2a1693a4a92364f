//! Reanchor - constraint migration for view hierarchies
//!
//! This library models a view hierarchy and its layout constraints as an arena
//! graph and provides the operations needed to insert wrapper views without
//! breaking layout: edge anchoring ([`Graph::set_anchors`]) and subview
//! migration ([`Graph::migrate_subviews`]). A small scene language drives the
//! same operations from text.
//!
//! # Example
//!
//! ```rust
//! use reanchor::run;
//!
//! let out = run(r#"
//!     view content { view title }
//!     constrain title.top = content.top + 8
//!     view clipping in content
//!     fill clipping
//!     migrate content -> clipping
//!     dump content
//! "#).unwrap();
//! assert!(out.contains("title.top == clipping.top + 8"));
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod scene;

pub use config::{ConfigError, SceneConfig};
pub use error::ParseError;
pub use graph::{AnchorSpec, Graph, GraphError, MigrationReport};
pub use parser::{parse, Document};
pub use scene::{Scene, SceneError};

use thiserror::Error;

/// Errors that can occur while running a scene
#[derive(Debug, Error)]
pub enum RunError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while executing statements
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

impl From<Vec<ParseError>> for RunError {
    fn from(errors: Vec<ParseError>) -> Self {
        RunError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run scene source with default configuration and return its output
///
/// The output is the text produced by the scene's `dump` and `solve` statements.
pub fn run(source: &str) -> Result<String, RunError> {
    run_with_config(source, &SceneConfig::default())
}

/// Run scene source with custom configuration
///
/// # Example
///
/// ```rust
/// use reanchor::{run_with_config, SceneConfig};
///
/// let config = SceneConfig::new().with_root_size(100.0, 40.0);
/// let out = run_with_config("view root solve root", &config).unwrap();
/// assert_eq!(out, "root x=0.0 y=0.0 w=100.0 h=40.0\n");
/// ```
pub fn run_with_config(source: &str, config: &SceneConfig) -> Result<String, RunError> {
    let doc = parse(source)?;
    let mut scene = Scene::new(config.clone());
    scene.execute(&doc)?;
    Ok(scene.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_empty() {
        assert_eq!(run("").unwrap(), "");
    }

    #[test]
    fn test_run_dump() {
        let out = run("view a { view b } dump a").unwrap();
        assert_eq!(out, "a #0\n  b #1\n");
    }

    #[test]
    fn test_run_parse_error() {
        let err = run("view {").unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
    }

    #[test]
    fn test_run_scene_error() {
        let err = run("dump nowhere").unwrap_err();
        assert!(matches!(err, RunError::Scene(SceneError::UndefinedIdentifier { .. })));
    }
}
