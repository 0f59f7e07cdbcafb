//! Models for the graph editor.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A directed graph with a unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl Graph {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A vertex of a graph.
///
/// The `vid` is the user-visible per-graph identifier; the storage `id`
/// never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: i64,
    pub graph_id: i64,
    pub vid: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Vertex {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            graph_id: row.get("graph_id")?,
            vid: row.get("vid")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }

    /// Display label used in listings and DOT output.
    pub fn label(&self) -> String {
        format!("{}: {}", self.vid, self.name)
    }
}

/// A directed edge, joined to its endpoint VIDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub source_vid: i64,
    pub target_vid: i64,
    pub description: Option<String>,
}

impl Edge {
    /// Build an Edge from a row of the standard edge join
    /// (`e.id, s.vid AS source_vid, t.vid AS target_vid, e.description`).
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            source_vid: row.get("source_vid")?,
            target_vid: row.get("target_vid")?,
            description: row.get("description")?,
        })
    }
}
