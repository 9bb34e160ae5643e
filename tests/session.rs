use std::fs;

use vessel_routing::prelude::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn load_from_config_file() {
    init();
    let dir = tempfile::tempdir().unwrap();

    fs::write(
        dir.path().join("session.json"),
        r#"{
            "calibration": {
                "anchors": {
                    "north_latitude": 9.0,
                    "south_latitude": 0.0,
                    "west_longitude": 0.0,
                    "east_longitude": 9.0
                },
                "pixel_width": 10,
                "pixel_height": 10,
                "cell_size": 1
            },
            "planner": { "mode_conflict": "reject" },
            "wind_tolerance": 10.0,
            "heuristic_table": "heuristic.csv",
            "wind_table": "wind.csv",
            "blocked_cells": "blocked.csv"
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("heuristic.csv"),
        "longitude,latitude,heuristic\n0.0,9.0,0.2\n1.0,8.0,0.3\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("wind.csv"),
        "longitude,latitude,wind_direction_10m_dominant\n1.0,8.0,45\n",
    )
    .unwrap();
    let blocked: String = (0..9).map(|y| format!("5,{}\n", y)).collect();
    fs::write(dir.path().join("blocked.csv"), format!("x,y\n{}", blocked)).unwrap();

    let config = SessionConfig::from_path(&dir.path().join("session.json")).unwrap();
    assert_eq!(config.calibration.lookup_resolution, 0.25);

    let session = NavigationSession::load(&config).unwrap();
    assert_eq!(session.mapper().width(), 10);
    assert_eq!(session.heuristic().len(), 2);
    assert_eq!(session.wind().len(), 1);
    assert_eq!(session.wind().tolerance(), 10.0);
    assert_eq!(session.obstacles().blocked_count(), 9);
    assert_eq!(
        session.heuristic().value_at(session.mapper().grid_to_geo((1, 1))),
        0.3
    );

    let planner = session.planner();
    assert!(matches!(
        planner.plan_flags((0, 0), (9, 9), true, true),
        Err(Error::InvalidMode)
    ));

    let result = planner.plan((0, 0), (9, 9), TransportMode::Cargo).unwrap();
    let path = result.route.unwrap();
    assert!(path.contains(&(5, 9)));
    assert!(path.iter().all(|&cell| !session.obstacles().is_blocked(cell)));
}

#[test]
fn raster_blocks_the_route() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("raster.txt");
    fs::write(&raster_path, "..#..\n..#..\n..#..\n..#..\n..#..\n").unwrap();

    let config = SessionConfig {
        calibration: MapCalibration::square(5, BorderAnchors::new(4.0, 0.0, 0.0, 4.0)),
        navigability_raster: Some(raster_path),
        ..SessionConfig::default()
    };
    let session = NavigationSession::load(&config).unwrap();

    let result = session.planner().plan((0, 2), (4, 2), TransportMode::Passenger).unwrap();
    assert_eq!(result.route, Err(NoRoute::Exhausted));
}

#[test]
fn malformed_tables_are_errors() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let wind = dir.path().join("wind.csv");
    fs::write(&wind, "longitude,latitude,wind_direction_10m_dominant\n1.0,north,45\n").unwrap();

    let config = SessionConfig {
        wind_table: Some(wind),
        ..SessionConfig::default()
    };
    assert!(matches!(
        NavigationSession::load(&config),
        Err(Error::Csv(_))
    ));

    let bad_json = dir.path().join("session.json");
    fs::write(&bad_json, "{ \"wind_tolerance\": \"wide\" }").unwrap();
    assert!(matches!(
        SessionConfig::from_path(&bad_json),
        Err(Error::Json(_))
    ));
}

#[test]
fn from_parts() {
    init();
    let calibration = MapCalibration::square(4, BorderAnchors::new(3.0, 0.0, 0.0, 3.0));
    let session = NavigationSession::from_parts(
        CoordinateMapper::new(calibration).unwrap(),
        ObstacleMap::open(4, 4),
        HeuristicField::empty(calibration.lookup_resolution),
        WindField::empty(calibration.lookup_resolution),
        PlannerConfig::default(),
    );
    let path = session
        .planner()
        .plan((0, 0), (3, 0), TransportMode::Default)
        .unwrap()
        .route
        .unwrap();
    assert_eq!(path.path, vec![(1, 0), (2, 0), (3, 0)]);
}
