//! Readers and writers for the tool's file formats.
//!
//! - **Scaffold graphs**: node-link JSON as written by `networkx.node_link_data`
//! - **Depth tables**: `samtools depth` output, plain or gzip-compressed
//!
//! ## Graph attributes
//!
//! | Element | Attribute     | Values                         | Required |
//! |---------|---------------|--------------------------------|----------|
//! | node    | `id`          | string or integer              | Yes |
//! | node    | `length`      | non-negative integer or string | Yes |
//! | node    | `orientation` | `FOW`, `REV`                   | Yes |
//! | link    | `orientation` | `EE`, `EB`, `BB`, `BE`         | Yes |
//! | link    | `mean`        | number or numeric string       | Yes |
//!
//! Any other attributes are kept and written back unchanged.
//!
//! ## Example
//!
//! ```rust
//! use scaffold_delink::parsing::graph::parse_graph_str;
//!
//! let json = r#"{
//!     "directed": true,
//!     "nodes": [
//!         {"id": "ctg1", "length": "100", "orientation": "FOW"},
//!         {"id": "ctg2", "length": 50, "orientation": "FOW"}
//!     ],
//!     "links": [{"source": "ctg1", "target": "ctg2", "orientation": "EE", "mean": "10.0"}]
//! }"#;
//! let graph = parse_graph_str(json).unwrap();
//! assert_eq!(graph.contig_count(), 2);
//! assert_eq!(graph.link_count(), 1);
//! ```

pub mod depth;
pub mod graph;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Link {from} -> {to} refers to unknown contig {missing}")]
    UnknownContig {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Line {line}: position {position} is outside contig {contig} of length {length}")]
    PositionOutOfRange {
        line: usize,
        contig: String,
        position: u64,
        length: u64,
    },

    #[error("Too many contigs: {0} exceeds maximum allowed")]
    TooManyContigs(usize),
}
