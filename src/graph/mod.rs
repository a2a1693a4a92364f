//! Constraint graph: nodes, layout guides and the constraints between them
//!
//! [`Graph`] is an arena of view-like nodes. On top of it sit the anchor builder
//! ([`Graph::set_anchors`]), the subview migrator ([`Graph::migrate_subviews`]),
//! a tree dump for debugging, and a frame solver to check layouts.

pub mod anchors;
pub mod dump;
pub mod error;
pub mod migrate;
pub mod model;
pub mod solver;
pub mod types;

pub use anchors::AnchorSpec;
pub use dump::DumpStyle;
pub use error::GraphError;
pub use migrate::{rewrite, MigrationReport, Rewrite};
pub use model::{Graph, LayoutGuide};
pub use solver::{solve_frames, Frame, Frames, SolverError};
pub use types::*;
