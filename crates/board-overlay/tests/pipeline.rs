//! End-to-end pipeline: descriptor file -> calibration -> per-frame
//! reconstruction, placements and storage grid.

use board_overlay::{
    ColorSample, FrameError, LayoutDescriptor, Point, Session,
};

const LAYOUT: &str = r#"{
    "conductor_board": "amplifier-main",
    "physicalattributes": {
        "origin_vector": { "x": 0.0, "y": 0.0 },
        "rotation": 0,
        "referencewidth": 200.0,
        "referenceheight": 120.0,
        "boardwidth": 160.0,
        "boardheight": 100.0,
        "distRefsToBoardCorners": [
            [20.0, 12.0],
            [20.0, 12.0],
            [20.0, 12.0],
            [20.0, 12.0]
        ]
    },
    "componentstorage": {
        "rows": 2,
        "columns": 2,
        "referenceMiddlePointswidth": 100.0,
        "referenceMiddlePointsheight": 100.0,
        "referenceCornerPointswidth": 100.0,
        "referenceCornerPointsheight": 100.0,
        "boxOffsetX": 0.0,
        "boxOffsetY": 0.0,
        "boxWidth": 50.0,
        "boxHeight": 50.0,
        "distRefsToStorageCorners": [
            [0.0, 0.0],
            [0.0, 0.0],
            [0.0, 0.0],
            [0.0, 0.0]
        ]
    },
    "components": [
        {
            "name": "IC4",
            "occurrences": 1,
            "coordinates": [[80.0, 50.0, 0.0, 0.0]],
            "width": 16.0,
            "height": 10.0,
            "polarity": 1,
            "box": 4
        }
    ]
}"#;

fn sample() -> ColorSample {
    ColorSample {
        red: 210.0,
        green: 190.0,
        blue: 170.0,
    }
}

fn calibrate_from_disk() -> Session {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.json");
    std::fs::write(&path, LAYOUT).expect("write layout");
    Session::calibrate(sample(), &path).expect("calibrate")
}

/// Board markers forming an exact 1000 x 600 px rectangle, matching
/// the 200 x 120 physical reference span at 5 px per unit.
fn board_markers() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 600.0),
        Point::new(1000.0, 600.0),
        Point::new(1000.0, 0.0),
    ]
}

fn storage_markers() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 400.0),
        Point::new(400.0, 400.0),
        Point::new(400.0, 0.0),
    ]
}

#[test]
fn missing_descriptor_file_fails_calibration() {
    let err = Session::calibrate(sample(), "/nonexistent/layout.json").expect_err("no file");
    assert!(err.to_string().contains("No such file"));
}

#[test]
fn full_frame_pass_produces_consistent_geometry() {
    let session = calibrate_from_disk();
    assert_eq!(session.summary().board_name, "amplifier-main");

    // Reference markers sit 20 x 12 physical units outside the board
    // corners: at 5 px per unit the board quad is inset (100, 60).
    let board = session.reconstruct_board(&board_markers()).expect("board");
    assert!(board.is_well_formed());
    let tl = board.top_left();
    let br = board.bottom_right();
    assert!((tl.x - 100.0).abs() < 1e-9 && (tl.y - 60.0).abs() < 1e-9);
    assert!((br.x - 900.0).abs() < 1e-9 && (br.y - 540.0).abs() < 1e-9);

    // The lone IC sits dead center of the 160 x 100 board.
    let placements = session.build_assembly_placements(&board, 0).expect("boxes");
    assert_eq!(placements.len(), 1);
    let cx: f64 = placements[0].corners.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy: f64 = placements[0].corners.iter().map(|p| p.y).sum::<f64>() / 4.0;
    assert!((cx - 500.0).abs() < 1e-9);
    assert!((cy - 300.0).abs() < 1e-9);

    // Zero storage distances: the rack quad is the marker quad itself,
    // split into a 2x2 grid with 50/100 steps.
    let rack = session.reconstruct_storage(&storage_markers()).expect("rack");
    assert_eq!(*rack.corners(), *storage_markers().as_slice().first_chunk::<4>().unwrap());

    let cells = session.build_storage_grid(&rack).expect("cells");
    assert_eq!(cells.len(), 4);

    // Withdrawal target for IC4 is box 4 -> row-major cell 3, the
    // bottom-right quarter.
    let target = session.withdrawal_box_index(0).expect("index");
    assert_eq!(target, 3);
    let cell = &cells[target];
    let cx: f64 = cell.corners.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy: f64 = cell.corners.iter().map(|p| p.y).sum::<f64>() / 4.0;
    assert!((cx - 300.0).abs() < 1e-9);
    assert!((cy - 300.0).abs() < 1e-9);
}

#[test]
fn frame_errors_never_poison_the_session() {
    let session = calibrate_from_disk();

    assert!(matches!(
        session.reconstruct_board(&[]),
        Err(FrameError::PointCount { expected: 4, got: 0 })
    ));

    // The session still works on the next (valid) frame.
    let board = session.reconstruct_board(&board_markers()).expect("board");
    assert!(board.is_well_formed());
}

#[test]
fn descriptor_write_and_reload_round_trips() {
    let layout = LayoutDescriptor::from_json_str(LAYOUT).expect("layout");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roundtrip.json");
    layout.write_json(&path).expect("write");

    let back = LayoutDescriptor::load_json(&path).expect("reload");
    assert_eq!(back.board_name, layout.board_name);
    assert_eq!(back.storage.rows, layout.storage.rows);
    assert_eq!(back.components[0].box_number, 4);
}
