//! GraphViz DOT rendering.
//!
//! Every graph mutation regenerates a DOT document for the affected graph;
//! rasterizing it is left to graphviz (`dot -Tpng <file> -o <file>.png`).

use crate::error::Result;
use crate::graph::model::{Edge, Vertex};
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for rendered graph documents.
pub const RENDER_DIR: &str = ".edugraph/graphs";

/// Produce a DOT document for a graph.
///
/// One node per vertex labelled `"<vid>: <name>"`, one arrow per edge with
/// the edge description as its label when present.
pub fn to_dot(name: &str, vertices: &[Vertex], edges: &[Edge]) -> String {
    let mut dot = String::new();
    dot.push_str(&format!("digraph {} {{\n", quote(name)));

    for vertex in vertices {
        dot.push_str(&format!(
            "    v{} [label={}];\n",
            vertex.vid,
            quote(&vertex.label())
        ));
    }
    for edge in edges {
        match &edge.description {
            Some(desc) if !desc.is_empty() => {
                dot.push_str(&format!(
                    "    v{} -> v{} [label={}];\n",
                    edge.source_vid,
                    edge.target_vid,
                    quote(desc)
                ));
            }
            _ => {
                dot.push_str(&format!(
                    "    v{} -> v{};\n",
                    edge.source_vid, edge.target_vid
                ));
            }
        }
    }

    dot.push_str("}\n");
    dot
}

/// Write the DOT document for a graph under `dir`, creating the directory
/// if needed. Returns the path of the written file.
pub fn write_dot(dir: &Path, name: &str, vertices: &[Vertex], edges: &[Edge]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.dot"));
    fs::write(&path, to_dot(name, vertices, edges))?;
    Ok(path)
}

/// Quote and escape a string for DOT.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(vid: i64, name: &str) -> Vertex {
        Vertex {
            id: vid,
            graph_id: 1,
            vid,
            name: name.to_string(),
            description: None,
        }
    }

    fn edge(source: i64, target: i64, desc: Option<&str>) -> Edge {
        Edge {
            id: 0,
            source_vid: source,
            target_vid: target,
            description: desc.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_to_dot_nodes_and_edges() {
        let vertices = vec![vertex(1, "read"), vertex(2, "parse")];
        let edges = vec![edge(1, 2, None)];

        let dot = to_dot("pipeline", &vertices, &edges);
        assert!(dot.starts_with("digraph \"pipeline\" {"));
        assert!(dot.contains("v1 [label=\"1: read\"];"));
        assert!(dot.contains("v2 [label=\"2: parse\"];"));
        assert!(dot.contains("v1 -> v2;"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_to_dot_edge_label() {
        let vertices = vec![vertex(1, "a"), vertex(2, "b")];
        let edges = vec![edge(1, 2, Some("feeds"))];

        let dot = to_dot("g", &vertices, &edges);
        assert!(dot.contains("v1 -> v2 [label=\"feeds\"];"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn test_write_dot_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("renders");

        let path = write_dot(&dir, "g", &[vertex(1, "only")], &[]).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "g.dot");

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("v1 [label=\"1: only\"];"));
    }
}
