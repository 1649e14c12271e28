//! End-to-end transformation tests over synthetic and published datasets.

use std::io::BufRead;

use ostn_grid::{
    bilinear_correct, node_id, DenseGrid, GeodeticCoordinate, OstnTransformer, RecordSource,
    ScanSource, SharedGrid, SourceCoordinate, TransformError, VerticalDatum,
};
use projection::dms_to_decimal;
use test_utils::{
    assert_approx_eq, assert_grid_approx_eq, caister, create_ostn_dataset, extent, linear_shift,
    ostn_record_line, require_test_file, write_dataset_file,
};

fn caister_dataset() -> String {
    let (e, n) = caister::CELL;
    create_ostn_dataset(e - 1..e + 3, n - 1..n + 3, caister::corner_shift)
}

fn scan_source(text: String) -> ScanSource {
    ScanSource::new(
        move || Ok(Box::new(std::io::Cursor::new(text.clone().into_bytes())) as Box<dyn BufRead + Send>),
        64,
        3,
    )
    .unwrap()
}

/// Sample points spread over a 10 x 10 km block, including grid lines.
fn sample_points() -> Vec<SourceCoordinate> {
    let mut points = Vec::new();
    for i in 0..23 {
        for j in 0..17 {
            points.push(SourceCoordinate::new(
                i as f64 * 437.5,
                j as f64 * 612.25,
                50.0 + i as f64,
            ));
        }
    }
    points.push(SourceCoordinate::new(3000.0, 4000.0, 0.0));
    points
}

#[test]
fn test_caister_reference_point() {
    let grid = DenseGrid::from_reader(caister_dataset().as_bytes()).unwrap();
    let transformer = OstnTransformer::new(grid);

    let target = transformer
        .transform(SourceCoordinate::new(
            caister::ETRS89_EASTING,
            caister::ETRS89_NORTHING,
            caister::ETRS89_HEIGHT,
        ))
        .unwrap();

    assert_grid_approx_eq!(
        (target.easting, target.northing),
        (caister::OSGB36_EASTING, caister::OSGB36_NORTHING),
        0.001
    );
    assert_approx_eq!(target.orthometric_height, caister::ODN_HEIGHT, 0.001);
    assert_eq!(target.vertical_datum, VerticalDatum::NewlynMainland);

    let cell = transformer
        .locate(caister::ETRS89_EASTING, caister::ETRS89_NORTHING)
        .unwrap();
    assert_eq!(cell.corners, caister::CORNER_IDS);
}

#[test]
fn test_caister_corners_pin_interpolation_order() {
    let grid = DenseGrid::from_reader(caister_dataset().as_bytes()).unwrap();
    let transformer = OstnTransformer::new(grid);
    let cell = transformer
        .locate(caister::ETRS89_EASTING, caister::ETRS89_NORTHING)
        .unwrap();
    let corners = transformer.source().records(&cell.corners).unwrap();
    let expected = bilinear_correct(&corners, cell.t, cell.u);

    // Any other corner order, or t and u swapped, misses the reference by more than 1 mm
    let orders = [[1, 0, 2, 3], [0, 3, 2, 1], [3, 2, 1, 0], [2, 3, 0, 1], [0, 1, 3, 2]];
    for order in orders {
        let shuffled = order.map(|i| corners[i]);
        let wrong = bilinear_correct(&shuffled, cell.t, cell.u);
        let miss = (wrong.delta_east - expected.delta_east)
            .abs()
            .max((wrong.delta_north - expected.delta_north).abs())
            .max((wrong.delta_height - expected.delta_height).abs());
        assert!(miss > 0.001, "order {:?} is indistinguishable", order);
    }

    let transposed = bilinear_correct(&corners, cell.u, cell.t);
    assert!((transposed.delta_east - expected.delta_east).abs() > 0.001);
}

#[test]
fn test_caister_from_latitude_longitude() {
    let grid = DenseGrid::from_reader(caister_dataset().as_bytes()).unwrap();
    let transformer = OstnTransformer::new(grid);

    let (d, m, s) = caister::ETRS89_LAT_DMS;
    let lat = dms_to_decimal(d, m, s);
    let (d, m, s) = caister::ETRS89_LON_DMS;
    let lon = dms_to_decimal(d, m, s);

    let target = transformer
        .transform_geodetic(GeodeticCoordinate::new(lat, lon, caister::ETRS89_HEIGHT))
        .unwrap();

    assert_grid_approx_eq!(
        (target.easting, target.northing),
        (caister::OSGB36_EASTING, caister::OSGB36_NORTHING),
        0.003
    );
}

#[test]
fn test_continuity_across_cell_edges() {
    let text = create_ostn_dataset(0..12, 0..12, linear_shift);
    let transformer = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());
    let geometry = transformer.geometry();

    for k in 0..40 {
        let along = 3000.0 + k as f64 * 123.456;

        // Vertical grid line at easting 5000 shared by columns 4 and 5
        let north_index = (along / 1000.0).floor() as u32;
        let west = geometry.cell_at(4, north_index, 5000.0, along).unwrap();
        let east = geometry.cell_at(5, north_index, 5000.0, along).unwrap();
        let a = transformer.correction_in_cell(&west).unwrap();
        let b = transformer.correction_in_cell(&east).unwrap();
        assert_eq!(a.delta_east.to_bits(), b.delta_east.to_bits());
        assert_eq!(a.delta_north.to_bits(), b.delta_north.to_bits());
        assert_eq!(a.delta_height.to_bits(), b.delta_height.to_bits());

        // Horizontal grid line at northing 6000 shared by rows 5 and 6
        let east_index = (along / 1000.0).floor() as u32;
        let south = geometry.cell_at(east_index, 5, along, 6000.0).unwrap();
        let north = geometry.cell_at(east_index, 6, along, 6000.0).unwrap();
        let a = transformer.correction_in_cell(&south).unwrap();
        let b = transformer.correction_in_cell(&north).unwrap();
        assert_eq!(a.delta_east.to_bits(), b.delta_east.to_bits());
        assert_eq!(a.delta_north.to_bits(), b.delta_north.to_bits());
        assert_eq!(a.delta_height.to_bits(), b.delta_height.to_bits());
    }
}

#[test]
fn test_corner_points_return_node_values() {
    let text = create_ostn_dataset(0..6, 0..6, linear_shift);
    let transformer = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());

    for (e, n) in [(1u32, 1u32), (2, 3), (4, 4)] {
        let correction = transformer
            .correction_at(e as f64 * 1000.0, n as f64 * 1000.0)
            .unwrap();
        let record = transformer.source().record(node_id(e, n)).unwrap();
        assert_eq!(correction.delta_east, record.shift_east);
        assert_eq!(correction.delta_north, record.shift_north);
        assert_eq!(correction.delta_height, record.geoid_undulation);
    }
}

#[test]
fn test_missing_corner_is_not_found() {
    let hole = node_id(2, 2);
    let text: String = create_ostn_dataset(0..6, 0..6, linear_shift)
        .lines()
        .filter(|line| !line.starts_with(&format!("{},", hole)))
        .map(|line| format!("{}\n", line))
        .collect();

    let dense = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());
    let scan = OstnTransformer::new(scan_source(text));

    // All four cells touching the missing node
    for (e, n) in [(1500.0, 1500.0), (2500.0, 1500.0), (2500.0, 2500.0), (1500.0, 2500.0)] {
        for result in [dense.correction_at(e, n), scan.correction_at(e, n)] {
            match result {
                Err(TransformError::RecordNotFound(id)) => assert_eq!(id, hole),
                other => panic!("expected RecordNotFound({}), got {:?}", hole, other),
            }
        }
    }

    // Neighbouring cells are unaffected
    assert!(dense.correction_at(3500.0, 3500.0).is_ok());
    assert!(scan.correction_at(500.0, 500.0).is_ok());
}

#[test]
fn test_out_of_range_is_distinct_from_not_found() {
    let text = create_ostn_dataset(0..6, 0..6, linear_shift);
    let transformer = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());

    // Beyond the last loaded row
    assert!(matches!(
        transformer.correction_at(1000.0, 5500.0),
        Err(TransformError::OutOfRange { .. })
    ));
    // Inside the rows but east of the loaded columns: the nodes simply have no records
    assert!(matches!(
        transformer.correction_at(8500.0, 1500.0),
        Err(TransformError::RecordNotFound(_))
    ));
    // Past the last column of the national grid
    assert!(matches!(
        transformer.correction_at(700_500.0, 1500.0),
        Err(TransformError::OutOfRange { .. })
    ));
}

#[test]
fn test_resolvers_are_equivalent_and_deterministic() {
    let text = create_ostn_dataset(0..11, 0..11, linear_shift);
    let dense = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());
    let scan = OstnTransformer::new(scan_source(text));
    assert_eq!(dense.geometry(), scan.geometry());

    for point in sample_points() {
        match (dense.transform(point), scan.transform(point), dense.transform(point)) {
            (Ok(a), Ok(b), Ok(c)) => {
                for (x, y) in [
                    (a.easting, b.easting),
                    (a.northing, b.northing),
                    (a.orthometric_height, b.orthometric_height),
                    (a.easting, c.easting),
                    (a.orthometric_height, c.orthometric_height),
                ] {
                    assert_eq!(x.to_bits(), y.to_bits(), "mismatch at {:?}", point);
                }
                assert_eq!(a.vertical_datum, b.vertical_datum);
            }
            (Err(a), Err(b), Err(_)) => {
                assert_eq!(std::mem::discriminant(&a), std::mem::discriminant(&b));
            }
            other => panic!("resolvers disagree at {:?}: {:?}", point, other),
        }
    }
}

#[test]
fn test_batch_matches_sequential() {
    let text = create_ostn_dataset(0..11, 0..11, linear_shift);
    let dense = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());
    let scan = OstnTransformer::new(scan_source(text));

    let points = sample_points();
    let batch = scan.transform_batch(&points);
    assert_eq!(batch.len(), points.len());

    for (point, result) in points.iter().zip(batch) {
        match (dense.transform(*point), result) {
            (Ok(expected), Ok(actual)) => {
                assert_eq!(expected.easting.to_bits(), actual.easting.to_bits());
                assert_eq!(expected.northing.to_bits(), actual.northing.to_bits());
            }
            (Err(_), Err(_)) => {}
            other => panic!("batch result differs at {:?}: {:?}", point, other),
        }
    }

    let stats = scan.source().cache_stats();
    assert!(stats.hits > 0);
    assert!(stats.entries <= 64);
}

#[test]
fn test_datum_flag_from_south_west_corner() {
    // Columns 3 and beyond are in the St Mary's region
    let text = create_ostn_dataset(0..6, 0..4, |e, n| {
        let (se, sn, sg, _) = linear_shift(e, n);
        (se, sn, sg, if e >= 3 { 2 } else { 1 })
    });
    let transformer = OstnTransformer::new(DenseGrid::from_reader(text.as_bytes()).unwrap());

    // Cell (2, 1) straddles the boundary; even close to its east edge the SW corner wins
    let straddling = transformer.correction_at(2999.0, 1500.0).unwrap();
    assert_eq!(straddling.vertical_datum, VerticalDatum::NewlynMainland);

    let inside = transformer.correction_at(3001.0, 1500.0).unwrap();
    assert_eq!(inside.vertical_datum, VerticalDatum::StMarys);
}

#[test]
fn test_load_from_file_with_bom_header_and_blank_lines() {
    let mut text = String::from("\u{feff}Point_ID,ETRS89_Easting,ETRS89_Northing,SE,SN,SG,Datum\r\n\r\n");
    for n in 0..4 {
        for e in 0..4 {
            text.push_str(&ostn_record_line(e, n, linear_shift(e, n)));
            text.push_str("\r\n");
        }
        text.push('\n');
    }
    let file = write_dataset_file(&text);

    let dense = DenseGrid::from_path(file.path()).unwrap();
    assert_eq!(dense.len(), 16);

    let scan = ScanSource::from_path(file.path(), 16, 3).unwrap();
    assert_eq!(scan.max_node_id(), dense.max_node_id());
    assert_eq!(scan.record(node_id(3, 3)).unwrap(), dense.record(node_id(3, 3)).unwrap());

    let shared = SharedGrid::from_path(file.path());
    let transformer = shared.transformer().unwrap();
    assert!(transformer.correction_at(1500.0, 1500.0).is_ok());
    assert!(shared.is_loaded());
}

#[test]
fn test_malformed_dataset_file() {
    let mut text = create_ostn_dataset(0..3, 0..3, linear_shift);
    text.push_str("9999,1000,1000,1.0,2.0\n");
    let file = write_dataset_file(&text);

    assert!(matches!(
        DenseGrid::from_path(file.path()),
        Err(TransformError::MalformedRecord { line: 10, .. })
    ));
    assert!(matches!(
        ScanSource::from_path(file.path(), 16, 3),
        Err(TransformError::MalformedRecord { line: 10, .. })
    ));
}

#[test]
fn test_published_dataset_caister() {
    let path = require_test_file!("OSTN02_OSGM02_GB.txt");

    let grid = DenseGrid::from_path(&path).unwrap();
    assert_eq!(grid.max_node_id(), extent::MAX_NODE_ID);

    let transformer = OstnTransformer::new(grid);
    assert_eq!(transformer.geometry().rows(), extent::ROWS);
    let target = transformer
        .transform(SourceCoordinate::new(
            caister::ETRS89_EASTING,
            caister::ETRS89_NORTHING,
            caister::ETRS89_HEIGHT,
        ))
        .unwrap();

    assert_grid_approx_eq!(
        (target.easting, target.northing),
        (caister::OSGB36_EASTING, caister::OSGB36_NORTHING),
        0.002
    );
    assert_eq!(target.vertical_datum, VerticalDatum::NewlynMainland);
}
