//! JSON wire format for graph import/export.
//!
//! The document shape (including the `VID` and `vertexes` spellings) is a
//! stable interchange format; do not rename fields.

use serde::{Deserialize, Serialize};

/// A whole graph as a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDoc {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub vertexes: Vec<VertexDoc>,
    pub edges: Vec<EdgeDoc>,
}

/// A vertex in the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDoc {
    #[serde(rename = "VID")]
    pub vid: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An edge in the wire format, referencing endpoint VIDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDoc {
    pub source: i64,
    pub target: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_format() {
        let json = r#"{
            "name": "pipeline",
            "description": "build steps",
            "vertexes": [
                {"VID": 1, "name": "read", "description": null},
                {"VID": 2, "name": "parse"}
            ],
            "edges": [
                {"source": 1, "target": 2, "description": "feeds"}
            ]
        }"#;

        let doc: GraphDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "pipeline");
        assert_eq!(doc.vertexes.len(), 2);
        assert_eq!(doc.vertexes[0].vid, 1);
        assert_eq!(doc.vertexes[1].description, None);
        assert_eq!(doc.edges[0].source, 1);
        assert_eq!(doc.edges[0].description.as_deref(), Some("feeds"));
    }

    #[test]
    fn test_serialize_uses_upper_vid() {
        let doc = GraphDoc {
            name: "g".to_string(),
            description: None,
            vertexes: vec![VertexDoc {
                vid: 1,
                name: "a".to_string(),
                description: None,
            }],
            edges: vec![],
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"VID\":1"));
        assert!(json.contains("\"vertexes\""));
    }
}
