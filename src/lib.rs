//! edugraph - instructional-design catalog and directed-graph editor
//! over SQLite.
//!
//! Two entity families share one database: the Domain -> Skill ->
//! Strategy -> Action hierarchy, where everything below a domain is
//! addressed by auto-assigned per-parent codes, and the Graph -> Vertex
//! -> Edge editor with JSON interchange, topological sorting, and DOT
//! rendering on every mutation.

pub mod cli;
pub mod db;
pub mod domain;
pub mod error;
pub mod graph;

pub use db::{Connection, Schema, DB_FILE};
pub use domain::DomainRepository;
pub use error::{Error, Result};
pub use graph::GraphRepository;
