use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::contig::{Contig, Link};
use crate::core::graph::ScaffoldGraph;
use crate::core::types::{LinkOrientation, Orientation};
use crate::parsing::ParseError;
use crate::utils::validation::{check_contig_limit, parse_length, parse_number};

/// Node-link document layout
#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkDocument {
    #[serde(default = "directed_default")]
    directed: bool,

    #[serde(default)]
    multigraph: bool,

    #[serde(default)]
    graph: Map<String, Value>,

    nodes: Vec<Map<String, Value>>,

    #[serde(default, alias = "edges")]
    links: Vec<Map<String, Value>>,
}

fn directed_default() -> bool {
    true
}

/// Read a node-link JSON graph from a file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_graph_reader`].
pub fn read_graph(path: &Path) -> Result<ScaffoldGraph, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_graph_reader(BufReader::new(file))
}

/// Parse a node-link JSON graph from a string
///
/// # Errors
///
/// See [`parse_graph_reader`].
pub fn parse_graph_str(text: &str) -> Result<ScaffoldGraph, ParseError> {
    parse_graph_reader(text.as_bytes())
}

/// Parse a node-link JSON graph
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, `ParseError::InvalidFormat` for an
/// undirected graph or missing/invalid attributes, `ParseError::UnknownContig` for
/// a link to an unlisted node, or `ParseError::TooManyContigs` if the limit is exceeded.
pub fn parse_graph_reader<R: Read>(reader: R) -> Result<ScaffoldGraph, ParseError> {
    let document: NodeLinkDocument = serde_json::from_reader(reader)?;
    if !document.directed {
        return Err(ParseError::InvalidFormat(
            "graph must be directed".to_string(),
        ));
    }

    let mut graph = ScaffoldGraph::new();
    for (i, node) in document.nodes.into_iter().enumerate() {
        if check_contig_limit(graph.contig_count()).is_some() {
            return Err(ParseError::TooManyContigs(graph.contig_count()));
        }
        graph.add_contig(parse_node(i, node)?);
    }

    for (i, mut attributes) in document.links.into_iter().enumerate() {
        let from = take_id(&mut attributes, "source")
            .ok_or_else(|| ParseError::InvalidFormat(format!("link {i} has no source")))?;
        let to = take_id(&mut attributes, "target")
            .ok_or_else(|| ParseError::InvalidFormat(format!("link {i} has no target")))?;
        for name in [&from, &to] {
            if graph.node(name).is_none() {
                return Err(ParseError::UnknownContig {
                    from: from.clone(),
                    to: to.clone(),
                    missing: name.clone(),
                });
            }
        }

        let orientation = attributes
            .remove("orientation")
            .as_ref()
            .and_then(Value::as_str)
            .and_then(LinkOrientation::parse)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "link {from} -> {to} has no valid orientation (EE, EB, BB or BE)"
                ))
            })?;
        let mean = attributes
            .remove("mean")
            .as_ref()
            .and_then(parse_number)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!("link {from} -> {to} has no numeric mean"))
            })?;

        let mut link = Link::new(orientation, mean);
        link.attributes = attributes;
        graph.add_link(&from, &to, link);
    }

    Ok(graph)
}

fn parse_node(index: usize, mut attributes: Map<String, Value>) -> Result<Contig, ParseError> {
    let name = take_id(&mut attributes, "id")
        .ok_or_else(|| ParseError::InvalidFormat(format!("node {index} has no id")))?;
    let length = attributes
        .remove("length")
        .as_ref()
        .and_then(parse_length)
        .ok_or_else(|| {
            ParseError::InvalidFormat(format!("contig {name} has no valid length"))
        })?;
    let orientation = attributes
        .remove("orientation")
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Orientation::parse)
        .ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "contig {name} has no valid orientation (FOW or REV)"
            ))
        })?;

    let mut contig = Contig::new(name, length, orientation);
    contig.attributes = attributes;
    Ok(contig)
}

/// Remove a node identifier attribute, accepting strings and integers
fn take_id(attributes: &mut Map<String, Value>, key: &str) -> Option<String> {
    match attributes.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Node-link JSON representation of a graph
#[must_use]
pub fn graph_to_json(graph: &ScaffoldGraph) -> Value {
    let nodes = graph
        .nodes()
        .map(|node| {
            let contig = graph.contig(node);
            let mut object = contig.attributes.clone();
            object.insert("id".to_string(), Value::from(contig.name.clone()));
            object.insert("length".to_string(), Value::from(contig.length));
            object.insert(
                "orientation".to_string(),
                Value::from(contig.orientation.as_str()),
            );
            object
        })
        .collect();

    let links = graph
        .links()
        .filter_map(|edge| {
            let (a, b) = graph.endpoints(edge)?;
            let link = graph.link(edge);
            let mut object = link.attributes.clone();
            object.insert("source".to_string(), Value::from(graph.name(a)));
            object.insert("target".to_string(), Value::from(graph.name(b)));
            object.insert(
                "orientation".to_string(),
                Value::from(link.orientation.as_str()),
            );
            object.insert("mean".to_string(), Value::from(link.mean));
            Some(object)
        })
        .collect();

    let document = NodeLinkDocument {
        directed: true,
        multigraph: false,
        graph: Map::new(),
        nodes,
        links,
    };
    serde_json::to_value(document).unwrap_or(Value::Null)
}

/// Write a graph as pretty-printed node-link JSON
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be written.
pub fn write_graph(graph: &ScaffoldGraph, path: &Path) -> Result<(), ParseError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &graph_to_json(graph))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
