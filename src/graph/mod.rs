//! Directed-graph editor: graphs, vertices, edges, JSON interchange,
//! topological sorting, and DOT rendering.

pub mod cycle;
pub mod json;
pub mod model;
pub mod render;
pub mod repository;
pub mod topsort;

pub use cycle::{find_cycle, CyclePath};
pub use json::{EdgeDoc, GraphDoc, VertexDoc};
pub use model::{Edge, Graph, Vertex};
pub use repository::{GraphRepository, LinkDirection, NULL_POINT};
pub use topsort::topological_order;
