//! Structural description of an application for introspection.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub reads: Vec<String>,
    pub writes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// `None` for unconditional edges.
    pub condition: Option<String>,
}

/// Nodes in registration order; edges in evaluation order per source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationGraph {
    pub entrypoint: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ApplicationGraph {
    /// Outgoing edges of `source`, in evaluation order.
    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph application {\n");
        for node in &self.nodes {
            let shape = if node.name == self.entrypoint {
                "doublecircle"
            } else {
                "box"
            };
            let _ = writeln!(out, "    \"{}\" [shape={shape}];", node.name);
        }
        for edge in &self.edges {
            match &edge.condition {
                Some(condition) => {
                    let label = condition.replace('"', "\\\"");
                    let _ = writeln!(
                        out,
                        "    \"{}\" -> \"{}\" [label=\"{label}\"];",
                        edge.source, edge.target
                    );
                }
                None => {
                    let _ = writeln!(out, "    \"{}\" -> \"{}\";", edge.source, edge.target);
                }
            }
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ApplicationGraph {
        ApplicationGraph {
            entrypoint: "draft".to_string(),
            nodes: vec![
                GraphNode {
                    name: "draft".to_string(),
                    reads: vec![],
                    writes: vec!["body".to_string()],
                },
                GraphNode {
                    name: "publish".to_string(),
                    reads: vec!["body".to_string()],
                    writes: vec![],
                },
            ],
            edges: vec![
                GraphEdge {
                    source: "draft".to_string(),
                    target: "publish".to_string(),
                    condition: Some("status == \"ok\"".to_string()),
                },
                GraphEdge {
                    source: "draft".to_string(),
                    target: "draft".to_string(),
                    condition: None,
                },
            ],
        }
    }

    #[test]
    fn edges_from_filters_by_source() {
        let graph = graph();
        let targets: Vec<&str> = graph.edges_from("draft").map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["publish", "draft"]);
        assert_eq!(graph.edges_from("publish").count(), 0);
    }

    #[test]
    fn dot_output_escapes_labels() {
        let dot = graph().to_dot();
        assert!(dot.starts_with("digraph application {"));
        assert!(dot.contains("\"draft\" [shape=doublecircle];"));
        assert!(dot.contains("\"draft\" -> \"publish\" [label=\"status == \\\"ok\\\"\"];"));
        assert!(dot.contains("\"draft\" -> \"draft\";"));
    }
}
