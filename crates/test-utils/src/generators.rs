//! Generators for synthetic OSTN correction datasets.
//!
//! The real OSTN02 file holds 701 x 1251 nodes. Tests only need a handful of
//! cells, so these helpers emit dataset text for a small rectangle of nodes
//! using the same line layout:
//!
//! ```text
//! node_id,node_easting,node_northing,shift_east,shift_north,geoid_undulation,datum_flag
//! ```

use std::io::Write;
use std::ops::Range;

/// Nodes per grid row in the OSTN dataset.
pub const OSTN_ROW_WIDTH: u32 = 701;

/// Node spacing in meters.
pub const OSTN_CELL_SIZE: f64 = 1000.0;

/// Node id for a pair of grid indices (1-based, row-major from the SW corner).
pub fn ostn_node_id(east_index: u32, north_index: u32) -> u32 {
    east_index + north_index * OSTN_ROW_WIDTH + 1
}

/// Corrections stored at one node: (shift_east, shift_north, geoid_undulation, datum_flag).
pub type NodeShift = (f64, f64, f64, u8);

/// Formats a single dataset line for the node at the given indices.
pub fn ostn_record_line(east_index: u32, north_index: u32, shift: NodeShift) -> String {
    let (se, sn, sg, flag) = shift;
    format!(
        "{},{},{},{:.3},{:.3},{:.3},{}",
        ostn_node_id(east_index, north_index),
        east_index * 1000,
        north_index * 1000,
        se,
        sn,
        sg,
        flag
    )
}

/// Creates dataset text covering a rectangle of node indices.
///
/// Lines are written in ascending node id order, as in the published file.
///
/// # Example
///
/// ```
/// use test_utils::{create_ostn_dataset, uniform_shift};
///
/// let text = create_ostn_dataset(10..12, 20..22, uniform_shift(100.0, -80.0, 45.0, 1));
/// assert_eq!(text.lines().count(), 4);
/// assert!(text.starts_with("14031,10000,20000,100.000,-80.000,45.000,1"));
/// ```
pub fn create_ostn_dataset<F>(east: Range<u32>, north: Range<u32>, shift: F) -> String
where
    F: Fn(u32, u32) -> NodeShift,
{
    let mut out = String::new();
    for n in north {
        for e in east.clone() {
            out.push_str(&ostn_record_line(e, n, shift(e, n)));
            out.push('\n');
        }
    }
    out
}

/// Same shift at every node.
pub fn uniform_shift(se: f64, sn: f64, sg: f64, flag: u8) -> impl Fn(u32, u32) -> NodeShift {
    move |_, _| (se, sn, sg, flag)
}

/// Shift field that varies linearly with the node indices.
///
/// Values stay close to the magnitudes found in OSTN02 around East Anglia
/// and never need more than three decimals, so writing them to dataset text
/// only loses float rounding. Compare against them with a tolerance.
///
/// - shift_east = 100 + 0.002 * e + 0.001 * n
/// - shift_north = -80 + 0.001 * e - 0.003 * n
/// - geoid = 40 + 0.005 * n
pub fn linear_shift(e: u32, n: u32) -> NodeShift {
    let e = e as f64;
    let n = n as f64;
    (
        100.0 + 0.002 * e + 0.001 * n,
        -80.0 + 0.001 * e - 0.003 * n,
        40.0 + 0.005 * n,
        1,
    )
}

/// Writes dataset text to a temporary file.
///
/// The file is removed when the returned handle is dropped.
pub fn write_dataset_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("ostn_test_")
        .suffix(".txt")
        .tempfile()
        .expect("Failed to create temporary dataset file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary dataset file");
    file.flush().expect("Failed to flush temporary dataset file");
    file
}
