use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::core::graph::ScaffoldGraph;
use crate::coverage::compositor::CoverageTable;
use crate::parsing::ParseError;

/// Read a `samtools depth` table, decompressing `.gz` files
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_depth_reader`].
pub fn read_depth(path: &Path, graph: &ScaffoldGraph) -> Result<CoverageTable, ParseError> {
    let file = std::fs::File::open(path)?;
    let gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if gzipped {
        parse_depth_reader(BufReader::new(MultiGzDecoder::new(file)), graph)
    } else {
        parse_depth_reader(BufReader::new(file), graph)
    }
}

/// Parse `contig<TAB>position<TAB>depth` rows into per-contig depth vectors.
///
/// Every contig of `graph` gets a vector of its length; positions absent from the
/// table are 0. Positions are 1-based. Rows for contigs not in the graph are
/// ignored. Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for a row with fewer than 3 fields or an
/// invalid number, or `ParseError::PositionOutOfRange` for a position outside its
/// contig.
pub fn parse_depth_reader<R: BufRead>(
    reader: R,
    graph: &ScaffoldGraph,
) -> Result<CoverageTable, ParseError> {
    let mut table = CoverageTable::new();
    for node in graph.nodes() {
        let contig = graph.contig(node);
        let length = usize::try_from(contig.length).map_err(|_| {
            ParseError::InvalidFormat(format!("contig {} is too long", contig.name))
        })?;
        table.insert(contig.name.clone(), vec![0.0; length]);
    }

    let mut rows = 0usize;
    let mut ignored = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based
        let line_num = i + 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 3 fields"
            )));
        }

        let contig = fields[0].trim();
        let Some(depths) = table.get_mut(contig) else {
            ignored += 1;
            continue;
        };

        let position: u64 = fields[1].trim().parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid position on line {}: '{}'",
                line_num, fields[1]
            ))
        })?;
        let depth: f64 = fields[2]
            .trim()
            .parse()
            .ok()
            .filter(|d: &f64| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid depth on line {}: '{}'",
                    line_num, fields[2]
                ))
            })?;

        let length = depths.len() as u64;
        let slot = usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|p| depths.get_mut(p));
        match slot {
            Some(slot) => *slot = depth,
            None => {
                return Err(ParseError::PositionOutOfRange {
                    line: line_num,
                    contig: contig.to_string(),
                    position,
                    length,
                })
            }
        }
        rows += 1;
    }

    debug!(
        "Read {} depth rows for {} contigs ({} rows for contigs not in the graph)",
        rows,
        table.len(),
        ignored
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::Contig;
    use crate::core::types::Orientation;
    use std::io::Write;

    fn graph() -> ScaffoldGraph {
        let mut g = ScaffoldGraph::new();
        g.add_contig(Contig::new("A", 4, Orientation::Forward));
        g.add_contig(Contig::new("B", 2, Orientation::Reverse));
        g
    }

    #[test]
    fn test_parse_depth() {
        let text = "# samtools depth\nA\t1\t3\nA\t3\t7.5\nX\t9\t1\n\nB\t2\t4\n";
        let table = parse_depth_reader(text.as_bytes(), &graph()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(&[3.0, 0.0, 7.5, 0.0][..]));
        assert_eq!(table.get("B"), Some(&[0.0, 4.0][..]));
        assert_eq!(table.get("X"), None);
    }

    #[test]
    fn test_position_out_of_range() {
        for text in ["A\t5\t1\n", "A\t0\t1\n"] {
            let err = parse_depth_reader(text.as_bytes(), &graph()).unwrap_err();
            assert!(matches!(
                err,
                ParseError::PositionOutOfRange { line: 1, length: 4, .. }
            ));
        }
    }

    #[test]
    fn test_malformed_rows() {
        assert!(matches!(
            parse_depth_reader("A\t1\n".as_bytes(), &graph()),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(parse_depth_reader("A\tone\t1\n".as_bytes(), &graph()).is_err());
        assert!(parse_depth_reader("A\t1\t-2\n".as_bytes(), &graph()).is_err());
    }

    #[test]
    fn test_read_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.tsv.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"A\t2\t5\nB\t1\t6\n").unwrap();
        encoder.finish().unwrap();

        let table = read_depth(&path, &graph()).unwrap();
        assert_eq!(table.get("A"), Some(&[0.0, 5.0, 0.0, 0.0][..]));
        assert_eq!(table.get("B"), Some(&[6.0, 0.0][..]));
    }
}
