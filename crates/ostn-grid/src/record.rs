//! Correction records and the line-oriented dataset format.
//!
//! Each line of the dataset holds one grid node:
//!
//! ```text
//! node_id,node_easting,node_northing,shift_east,shift_north,geoid_undulation,datum_flag
//! 220065,651000,313000,102.775,-78.244,44.252,1
//! ```
//!
//! Blank lines are ignored, and so is a single header line if it is the
//! first non-blank line of the file.

use std::io::BufRead;

use ostn_common::VerticalDatum;
use serde::Serialize;

use crate::error::{Result, TransformError};
use crate::geometry::{node_indices, CELL_SIZE};

/// Number of comma separated fields on a record line.
pub const FIELD_COUNT: usize = 7;

/// Allowed difference between a record's node position and its id (meters).
const POSITION_TOLERANCE: f64 = 0.001;

/// Corrections stored at one grid node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridNodeRecord {
    pub node_id: u32,
    /// Easting shift ETRS89 → OSGB36 (meters)
    pub shift_east: f64,
    /// Northing shift ETRS89 → OSGB36 (meters)
    pub shift_north: f64,
    /// Geoid height above the GRS80 ellipsoid (meters)
    pub geoid_undulation: f64,
    pub vertical_datum: VerticalDatum,
}

impl GridNodeRecord {
    /// Parse one dataset line.
    ///
    /// `line_number` is only used for error reporting.
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(TransformError::malformed(
                line_number,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }

        let node_id = parse_node_id(fields[0]).ok_or_else(|| {
            TransformError::malformed(line_number, format!("invalid node id '{}'", fields[0]))
        })?;

        // Node position must agree with the id, or the id column is corrupt
        let easting = parse_number(fields[1], "node easting", line_number)?;
        let northing = parse_number(fields[2], "node northing", line_number)?;
        let (east_index, north_index) = node_indices(node_id).ok_or_else(|| {
            TransformError::malformed(line_number, format!("invalid node id {}", node_id))
        })?;
        let expected = (east_index as f64 * CELL_SIZE, north_index as f64 * CELL_SIZE);
        if (easting - expected.0).abs() > POSITION_TOLERANCE
            || (northing - expected.1).abs() > POSITION_TOLERANCE
        {
            return Err(TransformError::malformed(
                line_number,
                format!(
                    "node {} is at ({}, {}) but the record says ({}, {})",
                    node_id, expected.0, expected.1, easting, northing
                ),
            ));
        }

        let shift_east = parse_number(fields[3], "shift_east", line_number)?;
        let shift_north = parse_number(fields[4], "shift_north", line_number)?;
        let geoid_undulation = parse_number(fields[5], "geoid_undulation", line_number)?;

        let code: u8 = fields[6].trim().parse().map_err(|_| {
            TransformError::malformed(line_number, format!("invalid datum flag '{}'", fields[6]))
        })?;
        let vertical_datum = VerticalDatum::from_code(code)
            .map_err(|e| TransformError::malformed(line_number, e.to_string()))?;

        Ok(Self {
            node_id,
            shift_east,
            shift_north,
            geoid_undulation,
            vertical_datum,
        })
    }
}

/// Parse a node id token.
///
/// Only plain decimal digits without leading zeros are accepted, so a token
/// matches exactly one id.
pub fn parse_node_id(token: &str) -> Option<u32> {
    if token.is_empty() || token.starts_with('0') || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Leading node id token of a line, without parsing the rest.
pub(crate) fn leading_node_id(line: &str, line_number: usize) -> Result<u32> {
    let token = line.split(',').next().unwrap_or_default();
    parse_node_id(token)
        .ok_or_else(|| TransformError::malformed(line_number, format!("invalid node id '{}'", token)))
}

fn parse_number(field: &str, name: &str, line_number: usize) -> Result<f64> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TransformError::malformed(
            line_number,
            format!("{} '{}' is not a finite number", name, field),
        )),
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Iterator over the record lines of a dataset.
///
/// Yields `(line_number, line)` with 1-based line numbers, skipping blank
/// lines and a leading header. A UTF-8 byte order mark at the start of the
/// input is dropped.
pub(crate) struct DatasetLines<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
    seen_content: bool,
}

impl<R: BufRead> DatasetLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            seen_content: false,
        }
    }
}

impl<R: BufRead> Iterator for DatasetLines<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if self.line_number == 1 {
                if let Some(rest) = line.strip_prefix(BYTE_ORDER_MARK) {
                    line = rest.to_string();
                }
            }

            if line.trim().is_empty() {
                continue;
            }

            let first_content = !self.seen_content;
            self.seen_content = true;
            if first_content && is_header(&line) {
                continue;
            }

            return Some(Ok((self.line_number, line)));
        }
    }
}

fn is_header(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let record = GridNodeRecord::parse("220065,651000,313000,102.775,-78.244,44.252,1", 1)
            .unwrap();
        assert_eq!(record.node_id, 220065);
        assert_eq!(record.shift_east, 102.775);
        assert_eq!(record.shift_north, -78.244);
        assert_eq!(record.geoid_undulation, 44.252);
        assert_eq!(record.vertical_datum, VerticalDatum::NewlynMainland);
    }

    #[test]
    fn test_parse_record_with_crlf() {
        let record = GridNodeRecord::parse("1,0,0,0.000,0.000,0.000,0\r", 1).unwrap();
        assert_eq!(record.vertical_datum, VerticalDatum::OutsideModelBoundary);
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            "220065,651000,313000,102.787,-78.242,44.236",
            "220065,651000,313000,102.787,-78.242,44.236,1,9",
            "abc,651000,313000,102.787,-78.242,44.236,1",
            "0220065,651000,313000,102.787,-78.242,44.236,1",
            "220065,x,313000,102.787,-78.242,44.236,1",
            "220065,651000,313000,east,-78.242,44.236,1",
            "220065,651000,313000,102.787,NaN,44.236,1",
            "220065,651000,313000,102.787,-78.242,44.236,99",
            "220065,651000,313000,102.787,-78.242,44.236,-1",
        ];
        for (i, line) in cases.iter().enumerate() {
            match GridNodeRecord::parse(line, i + 1) {
                Err(TransformError::MalformedRecord { line, .. }) => assert_eq!(line, i + 1),
                other => panic!("expected malformed record for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_position_must_match_node_id() {
        // Id 220053 is node (639, 313), not (651, 313)
        match GridNodeRecord::parse("220053,651000,313000,102.775,-78.244,44.252,1", 4) {
            Err(TransformError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("220053"), "{}", reason);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }

        assert!(GridNodeRecord::parse("220065,651000.0,313000.000,0,0,0,1", 1).is_ok());
        assert!(GridNodeRecord::parse("220065,651000,314000,0,0,0,1", 1).is_err());
    }

    #[test]
    fn test_parse_node_id_is_exact() {
        assert_eq!(parse_node_id("1"), Some(1));
        assert_eq!(parse_node_id("876951"), Some(876951));
        assert_eq!(parse_node_id("0"), None);
        assert_eq!(parse_node_id("01"), None);
        assert_eq!(parse_node_id("+1"), None);
        assert_eq!(parse_node_id(" 1"), None);
        assert_eq!(parse_node_id(""), None);
        assert_eq!(parse_node_id("99999999999"), None);
    }

    #[test]
    fn test_dataset_lines_skip_header_and_blanks() {
        let text = "Point_ID,E,N,SE,SN,SG,FLAG\n\n1,0,0,0,0,0,0\n\n2,1000,0,0,0,0,0\n";
        let lines: Vec<(usize, String)> = DatasetLines::new(text.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                (3, "1,0,0,0,0,0,0".to_string()),
                (5, "2,1000,0,0,0,0,0".to_string()),
            ]
        );
    }

    #[test]
    fn test_byte_order_mark_is_dropped() {
        let text = "\u{feff}Point_ID,E,N,SE,SN,SG,FLAG\n1,0,0,0,0,0,0\n";
        let lines: Vec<_> = DatasetLines::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines, vec![(2, "1,0,0,0,0,0,0".to_string())]);

        let text = "\u{feff}1,0,0,0.100,0.200,0.300,1\n";
        let (line_number, line) = DatasetLines::new(text.as_bytes()).next().unwrap().unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(GridNodeRecord::parse(&line, line_number).unwrap().node_id, 1);
    }

    #[test]
    fn test_header_only_skipped_at_start() {
        let text = "1,0,0,0,0,0,0\nPoint_ID,E,N,SE,SN,SG,FLAG\n";
        let lines: Vec<_> = DatasetLines::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert!(leading_node_id(&lines[1].1, lines[1].0).is_err());
    }
}
