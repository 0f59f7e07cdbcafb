//! Graph repository - high-level operations on graphs, vertices, and edges.
//!
//! Graphs are addressed by name, vertices by `(graph, vid)`. Every
//! mutation regenerates the graph's DOT document (unless rendering is
//! disabled, as it is for in-memory repositories).

use crate::db::Connection;
use crate::error::{Error, Result};
use crate::graph::json::{EdgeDoc, GraphDoc, VertexDoc};
use crate::graph::model::{Edge, Graph, Vertex};
use crate::graph::render;
use crate::graph::topsort::topological_order;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Name given to the synthetic root vertex inserted by `add_null_point`.
pub const NULL_POINT: &str = "null-point";

/// Direction of a new edge relative to an existing vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// The new vertex points at the existing one (existing gains an
    /// incoming edge).
    Incoming,
    /// The existing vertex points at the new one.
    Outgoing,
}

/// Repository over the Graph -> Vertex -> Edge entities.
pub struct GraphRepository {
    conn: Connection,
    render_dir: Option<PathBuf>,
}

impl GraphRepository {
    /// Open a repository over the default database file, rendering DOT
    /// documents under [`render::RENDER_DIR`].
    pub fn open() -> Result<Self> {
        let conn = Connection::open_default()?;
        Ok(Self {
            conn,
            render_dir: Some(PathBuf::from(render::RENDER_DIR)),
        })
    }

    /// Open an in-memory repository for testing. Rendering is disabled.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            render_dir: None,
        })
    }

    /// Get the underlying connection.
    pub fn conn(&mut self) -> &mut Connection {
        &mut self.conn
    }

    // --- graphs ---

    /// Create a new, empty graph.
    pub fn create_graph(&mut self, name: String, description: Option<String>) -> Result<Graph> {
        if self.graph_name_exists(&name)? {
            return Err(Error::GraphNameTaken(name));
        }

        insert_graph(self.conn.as_conn(), &name, description.as_deref())?;
        self.get_graph(&name)
    }

    /// Get a graph by name.
    pub fn get_graph(&mut self, name: &str) -> Result<Graph> {
        self.conn
            .query_row(
                "SELECT * FROM graphs WHERE name = ?",
                &[&name as &dyn rusqlite::ToSql],
                Graph::from_row,
            )
            .map_err(|_| Error::GraphNotFound(name.to_string()))
    }

    /// List all graphs in name order.
    pub fn list_graphs(&mut self) -> Result<Vec<Graph>> {
        self.conn
            .query("SELECT * FROM graphs ORDER BY name", &[], Graph::from_row)
    }

    /// Get a graph with its vertices (in VID order) and edges (in
    /// (source, target) VID order), re-rendering its DOT document.
    pub fn graph_detail(&mut self, name: &str) -> Result<(Graph, Vec<Vertex>, Vec<Edge>)> {
        let graph = self.get_graph(name)?;
        let vertices = self.vertices(graph.id)?;
        let edges = self.edges(graph.id)?;
        self.maybe_render(&graph)?;
        Ok((graph, vertices, edges))
    }

    /// All vertices of a graph in VID order.
    pub fn vertices(&mut self, graph_id: i64) -> Result<Vec<Vertex>> {
        self.conn.query(
            "SELECT * FROM vertices WHERE graph_id = ? ORDER BY vid",
            &[&graph_id as &dyn rusqlite::ToSql],
            Vertex::from_row,
        )
    }

    /// All edges of a graph in (source VID, target VID) order.
    pub fn edges(&mut self, graph_id: i64) -> Result<Vec<Edge>> {
        self.conn.query(
            "SELECT e.id, s.vid AS source_vid, t.vid AS target_vid, e.description
             FROM edges e
             JOIN vertices s ON s.id = e.source_id
             JOIN vertices t ON t.id = e.target_id
             WHERE s.graph_id = ?
             ORDER BY source_vid, target_vid",
            &[&graph_id as &dyn rusqlite::ToSql],
            Edge::from_row,
        )
    }

    // --- vertices ---

    /// Add a vertex with the next free VID.
    pub fn add_vertex(
        &mut self,
        graph_name: &str,
        name: String,
        description: Option<String>,
    ) -> Result<Vertex> {
        let graph = self.get_graph(graph_name)?;
        let vid = next_vid(self.conn.as_conn(), graph.id)?;
        insert_vertex(self.conn.as_conn(), graph.id, vid, &name, description.as_deref())?;
        self.maybe_render(&graph)?;
        self.get_vertex(graph_name, vid)
    }

    /// Get a vertex by its VID within a graph.
    pub fn get_vertex(&mut self, graph_name: &str, vid: i64) -> Result<Vertex> {
        let graph = self.get_graph(graph_name)?;
        self.conn
            .query_row(
                "SELECT * FROM vertices WHERE graph_id = ? AND vid = ?",
                &[
                    &graph.id as &dyn rusqlite::ToSql,
                    &vid as &dyn rusqlite::ToSql,
                ],
                Vertex::from_row,
            )
            .map_err(|_| Error::VertexNotFound(graph_name.to_string(), vid))
    }

    /// Get a vertex with its incoming and outgoing edges.
    pub fn vertex_detail(
        &mut self,
        graph_name: &str,
        vid: i64,
    ) -> Result<(Vertex, Vec<Edge>, Vec<Edge>)> {
        let vertex = self.get_vertex(graph_name, vid)?;

        let incoming = self.conn.query(
            "SELECT e.id, s.vid AS source_vid, t.vid AS target_vid, e.description
             FROM edges e
             JOIN vertices s ON s.id = e.source_id
             JOIN vertices t ON t.id = e.target_id
             WHERE e.target_id = ?
             ORDER BY source_vid",
            &[&vertex.id as &dyn rusqlite::ToSql],
            Edge::from_row,
        )?;
        let outgoing = self.conn.query(
            "SELECT e.id, s.vid AS source_vid, t.vid AS target_vid, e.description
             FROM edges e
             JOIN vertices s ON s.id = e.source_id
             JOIN vertices t ON t.id = e.target_id
             WHERE e.source_id = ?
             ORDER BY target_vid",
            &[&vertex.id as &dyn rusqlite::ToSql],
            Edge::from_row,
        )?;

        Ok((vertex, incoming, outgoing))
    }

    // --- edges ---

    /// Add an edge between two existing vertices of a graph. Parallel
    /// edges and self-loops are allowed.
    pub fn add_edge(
        &mut self,
        graph_name: &str,
        source_vid: i64,
        target_vid: i64,
        description: Option<String>,
    ) -> Result<Edge> {
        let graph = self.get_graph(graph_name)?;
        let source = self.get_vertex(graph_name, source_vid)?;
        let target = self.get_vertex(graph_name, target_vid)?;

        let id = insert_edge(self.conn.as_conn(), source.id, target.id, description.as_deref())?;
        self.maybe_render(&graph)?;

        Ok(Edge {
            id,
            source_vid,
            target_vid,
            description,
        })
    }

    /// Create a new vertex and immediately link it to an existing one.
    ///
    /// With [`LinkDirection::Incoming`] the new vertex points at the
    /// existing vertex; with [`LinkDirection::Outgoing`] the existing
    /// vertex points at the new one.
    pub fn add_vertex_with_edge(
        &mut self,
        graph_name: &str,
        name: String,
        description: Option<String>,
        direction: LinkDirection,
        peer_vid: i64,
        edge_description: Option<String>,
    ) -> Result<(Vertex, Edge)> {
        let graph = self.get_graph(graph_name)?;
        let peer = self.get_vertex(graph_name, peer_vid)?;

        let tx = self.conn.transaction()?;
        let vid = next_vid(&tx, graph.id)?;
        let vertex_id = insert_vertex(&tx, graph.id, vid, &name, description.as_deref())?;

        let (source_id, target_id, source_vid, target_vid) = match direction {
            LinkDirection::Incoming => (vertex_id, peer.id, vid, peer_vid),
            LinkDirection::Outgoing => (peer.id, vertex_id, peer_vid, vid),
        };
        let edge_id = insert_edge(&tx, source_id, target_id, edge_description.as_deref())?;
        tx.commit()?;

        self.maybe_render(&graph)?;

        let vertex = self.get_vertex(graph_name, vid)?;
        let edge = Edge {
            id: edge_id,
            source_vid,
            target_vid,
            description: edge_description,
        };
        Ok((vertex, edge))
    }

    /// Remove the edge(s) between two vertices. Parallel edges are all
    /// removed; returns how many were.
    pub fn remove_edge(
        &mut self,
        graph_name: &str,
        source_vid: i64,
        target_vid: i64,
    ) -> Result<usize> {
        let graph = self.get_graph(graph_name)?;
        let source = self.get_vertex(graph_name, source_vid)?;
        let target = self.get_vertex(graph_name, target_vid)?;

        let removed = self.conn.execute(
            "DELETE FROM edges WHERE source_id = ? AND target_id = ?",
            &[
                &source.id as &dyn rusqlite::ToSql,
                &target.id as &dyn rusqlite::ToSql,
            ],
        )?;
        if removed == 0 {
            return Err(Error::EdgeNotFound(source_vid, target_vid));
        }

        self.maybe_render(&graph)?;
        Ok(removed)
    }

    /// Insert a synthetic root: a vertex named [`NULL_POINT`] with an edge
    /// to every vertex that had no incoming edges.
    ///
    /// The zero-in-degree set is computed before the null point exists, so
    /// the null point never links to itself.
    pub fn add_null_point(&mut self, graph_name: &str) -> Result<Vertex> {
        let graph = self.get_graph(graph_name)?;

        let roots: Vec<i64> = self.conn.query(
            "SELECT v.id FROM vertices v
             WHERE v.graph_id = ?
               AND NOT EXISTS (SELECT 1 FROM edges e WHERE e.target_id = v.id)
             ORDER BY v.vid",
            &[&graph.id as &dyn rusqlite::ToSql],
            |row| row.get(0),
        )?;

        let tx = self.conn.transaction()?;
        let vid = next_vid(&tx, graph.id)?;
        let null_id = insert_vertex(&tx, graph.id, vid, NULL_POINT, None)?;
        for root_id in roots {
            insert_edge(&tx, null_id, root_id, None)?;
        }
        tx.commit()?;

        self.maybe_render(&graph)?;
        self.get_vertex(graph_name, vid)
    }

    // --- import / export ---

    /// Export a graph as a JSON document.
    pub fn export(&mut self, graph_name: &str) -> Result<GraphDoc> {
        let graph = self.get_graph(graph_name)?;
        let vertices = self.vertices(graph.id)?;
        let edges = self.edges(graph.id)?;

        Ok(GraphDoc {
            name: graph.name,
            description: graph.description,
            vertexes: vertices
                .into_iter()
                .map(|v| VertexDoc {
                    vid: v.vid,
                    name: v.name,
                    description: v.description,
                })
                .collect(),
            edges: edges
                .into_iter()
                .map(|e| EdgeDoc {
                    source: e.source_vid,
                    target: e.target_vid,
                    description: e.description,
                })
                .collect(),
        })
    }

    /// Import a graph from a JSON document.
    ///
    /// The whole document is validated before anything is written: the
    /// name must be free, VIDs must be unique, and every edge must
    /// reference a declared VID. The inserts then run in one
    /// transaction, so a failed import leaves nothing behind.
    pub fn import(&mut self, doc: &GraphDoc) -> Result<Graph> {
        if self.graph_name_exists(&doc.name)? {
            return Err(Error::GraphNameTaken(doc.name.clone()));
        }

        let mut vids: HashSet<i64> = HashSet::new();
        for vertex in &doc.vertexes {
            if !vids.insert(vertex.vid) {
                return Err(Error::BadImport(format!("duplicate VID {}", vertex.vid)));
            }
        }
        for edge in &doc.edges {
            for vid in [edge.source, edge.target] {
                if !vids.contains(&vid) {
                    return Err(Error::BadImport(format!(
                        "edge references unknown VID {vid}"
                    )));
                }
            }
        }

        let tx = self.conn.transaction()?;
        let graph_id = insert_graph(&tx, &doc.name, doc.description.as_deref())?;

        let mut vertex_ids: HashMap<i64, i64> = HashMap::new();
        for vertex in &doc.vertexes {
            let id = insert_vertex(
                &tx,
                graph_id,
                vertex.vid,
                &vertex.name,
                vertex.description.as_deref(),
            )?;
            vertex_ids.insert(vertex.vid, id);
        }
        for edge in &doc.edges {
            // Validated above, so the lookups cannot miss.
            let source_id = vertex_ids[&edge.source];
            let target_id = vertex_ids[&edge.target];
            insert_edge(&tx, source_id, target_id, edge.description.as_deref())?;
        }
        tx.commit()?;

        let graph = self.get_graph(&doc.name)?;
        self.maybe_render(&graph)?;
        Ok(graph)
    }

    // --- topological-sort transform ---

    /// Create a new graph whose vertices are the old graph's renumbered
    /// 1..N in topological order, with every edge remapped accordingly.
    /// The new graph inherits the old description.
    pub fn topsort(&mut self, graph_name: &str, new_name: String) -> Result<Graph> {
        if self.graph_name_exists(&new_name)? {
            return Err(Error::GraphNameTaken(new_name));
        }

        let old = self.get_graph(graph_name)?;
        let vertices = self.vertices(old.id)?;
        let edges = self.edges(old.id)?;

        let vids: Vec<i64> = vertices.iter().map(|v| v.vid).collect();
        let pairs: Vec<(i64, i64)> = edges.iter().map(|e| (e.source_vid, e.target_vid)).collect();

        let order = topological_order(&vids, &pairs)
            .map_err(|cycle| Error::GraphCyclic(graph_name.to_string(), cycle.format()))?;

        let by_vid: HashMap<i64, &Vertex> = vertices.iter().map(|v| (v.vid, v)).collect();
        let mut new_vid: HashMap<i64, i64> = HashMap::new();
        let mut new_ids: HashMap<i64, i64> = HashMap::new();

        let tx = self.conn.transaction()?;
        let graph_id = insert_graph(&tx, &new_name, old.description.as_deref())?;

        for (i, old_vid) in order.iter().enumerate() {
            let vid = i as i64 + 1;
            let vertex = by_vid[old_vid];
            let id = insert_vertex(&tx, graph_id, vid, &vertex.name, vertex.description.as_deref())?;
            new_vid.insert(*old_vid, vid);
            new_ids.insert(vid, id);
        }

        for edge in &edges {
            let source_id = new_ids[&new_vid[&edge.source_vid]];
            let target_id = new_ids[&new_vid[&edge.target_vid]];
            insert_edge(&tx, source_id, target_id, edge.description.as_deref())?;
        }
        tx.commit()?;

        let new_graph = self.get_graph(&new_name)?;
        self.maybe_render(&new_graph)?;
        Ok(new_graph)
    }

    // --- internals ---

    fn graph_name_exists(&mut self, name: &str) -> Result<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM graphs WHERE name = ?",
                &[&name as &dyn rusqlite::ToSql],
                |row| row.get(0),
            )
            .ok();
        Ok(existing.is_some())
    }

    /// Regenerate the DOT document for a graph, if rendering is enabled.
    fn maybe_render(&mut self, graph: &Graph) -> Result<Option<PathBuf>> {
        let Some(dir) = self.render_dir.clone() else {
            return Ok(None);
        };
        let vertices = self.vertices(graph.id)?;
        let edges = self.edges(graph.id)?;
        let path = render::write_dot(&dir, &graph.name, &vertices, &edges)?;
        Ok(Some(path))
    }
}

// Row-level inserts, shared by the direct and transactional paths. They
// take a plain `rusqlite::Connection` so a `Transaction` works too.

fn insert_graph(
    conn: &rusqlite::Connection,
    name: &str,
    description: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO graphs (name, description) VALUES (?, ?)",
        rusqlite::params![name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Next free VID within a graph (1 for an empty graph).
fn next_vid(conn: &rusqlite::Connection, graph_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(vid), 0) + 1 FROM vertices WHERE graph_id = ?",
        rusqlite::params![graph_id],
        |row| row.get(0),
    )
}

fn insert_vertex(
    conn: &rusqlite::Connection,
    graph_id: i64,
    vid: i64,
    name: &str,
    description: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO vertices (graph_id, vid, name, description) VALUES (?, ?, ?, ?)",
        rusqlite::params![graph_id, vid, name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_edge(
    conn: &rusqlite::Connection,
    source_id: i64,
    target_id: i64,
    description: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO edges (source_id, target_id, description) VALUES (?, ?, ?)",
        rusqlite::params![source_id, target_id, description],
    )?;
    Ok(conn.last_insert_rowid())
}
