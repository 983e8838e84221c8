//! End-to-end planning properties over the public API.
//!
//! Run with: cargo test -p sar-core --test planning_test

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sar_core::{
    destination, distance, ground_footprint, plan_grid, Boundary, CoverageModel, FlightPlanner,
    GeoPoint, PlannerError, PlannerParameters, SearchPattern, SpiralArea,
};

fn pt(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint { lat, lon }
}

fn rectangle(lat: f64, lon: f64, d_lat: f64, d_lon: f64) -> Boundary {
    Boundary::new(vec![
        pt(lat, lon),
        pt(lat, lon + d_lon),
        pt(lat + d_lat, lon + d_lon),
        pt(lat + d_lat, lon),
    ])
    .expect("rectangle is a valid boundary")
}

#[test]
fn destination_then_distance_round_trips() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let origin = pt(rng.random_range(-60.0..60.0), rng.random_range(-170.0..170.0));
        let bearing = rng.random_range(0.0..360.0);
        let d = rng.random_range(1.0..100_000.0);

        let target = destination(origin, bearing, d).unwrap();
        let back = distance(origin, target).unwrap();
        assert!(
            (back - d).abs() <= d * 1e-3,
            "origin {origin:?} bearing {bearing} d {d} -> {back}"
        );
    }
}

#[test]
fn distance_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let a = pt(rng.random_range(-90.0..=90.0), rng.random_range(-180.0..=180.0));
        let b = pt(rng.random_range(-90.0..=90.0), rng.random_range(-180.0..=180.0));
        let ab = distance(a, b).unwrap();
        let ba = distance(b, a).unwrap();
        assert!((ab - ba).abs() < 1e-6, "{a:?} {b:?}");
    }
}

#[test]
fn footprint_grows_with_altitude() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let fov_h = rng.random_range(10.0..150.0);
        let fov_v = rng.random_range(10.0..150.0);
        let angle = rng.random_range(5.0..=90.0);
        let low = rng.random_range(5.0..200.0);
        let high = low + rng.random_range(1.0..200.0);

        let a = ground_footprint(low, fov_h, fov_v, angle);
        let b = ground_footprint(high, fov_h, fov_v, angle);
        assert!(b.width_m >= a.width_m);
        assert!(b.height_m >= a.height_m);
    }
}

#[test]
fn grid_waypoints_stay_inside_boundary() {
    let planner = FlightPlanner::default();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..40 {
        let boundary = rectangle(
            rng.random_range(-50.0..50.0),
            rng.random_range(-150.0..150.0),
            rng.random_range(0.001..0.02),
            rng.random_range(0.001..0.02),
        );
        let result = planner
            .plan_grid_search(&boundary, planner.defaults())
            .unwrap();
        assert!(!result.is_empty());
        for wp in &result.waypoints {
            assert!(boundary.contains(wp.position()), "{wp:?} outside");
        }
    }
}

#[test]
fn grid_waypoints_stay_inside_concave_boundary() {
    let notch = Boundary::new(vec![
        pt(0.0, 0.0),
        pt(0.0, 0.02),
        pt(0.01, 0.02),
        pt(0.004, 0.01),
        pt(0.01, 0.0),
    ])
    .unwrap();
    let planner = FlightPlanner::default();
    let result = planner.plan_grid_search(&notch, planner.defaults()).unwrap();
    assert!(result.waypoint_count > 0);
    assert!(result.waypoints.iter().all(|wp| notch.contains(wp.position())));
}

#[test]
fn halving_track_spacing_doubles_tracks() {
    let boundary = rectangle(0.0, 0.0, 0.01, 0.02);
    let planner = FlightPlanner::default();
    let wide = PlannerParameters {
        altitude: 100.0,
        ..Default::default()
    };
    let narrow = PlannerParameters {
        altitude: 50.0,
        ..Default::default()
    };

    let t1 = planner
        .plan_grid_search(&boundary, &wide)
        .unwrap()
        .track_count
        .unwrap();
    let t2 = planner
        .plan_grid_search(&boundary, &narrow)
        .unwrap()
        .track_count
        .unwrap();
    let intervals_wide = t1 as i64 - 1;
    let intervals_narrow = t2 as i64 - 1;
    assert!(
        (intervals_narrow - 2 * intervals_wide).abs() <= 1,
        "{t1} tracks vs {t2}"
    );
}

#[test]
fn doubling_extent_doubles_tracks() {
    let planner = FlightPlanner::default();
    let tracks = |d_lat: f64| {
        planner
            .plan_grid_search(&rectangle(10.0, 20.0, d_lat, 0.05), planner.defaults())
            .unwrap()
            .track_count
            .unwrap() as i64
    };
    let (t1, t2) = (tracks(0.01), tracks(0.02));
    assert!(((t2 - 1) - 2 * (t1 - 1)).abs() <= 1, "{t1} tracks vs {t2}");
}

#[test]
fn sweep_direction_alternates() {
    let boundary = rectangle(0.0, 0.0, 0.002, 0.01);
    let coverage = CoverageModel::from_params(&PlannerParameters::default()).unwrap();
    let sweep = plan_grid(&boundary, &coverage);
    assert!(sweep.tracks.len() >= 2);
    for pair in sweep.tracks.windows(2) {
        let first_east = pair[0].last().unwrap().lon > pair[0][0].lon;
        let second_east = pair[1].last().unwrap().lon > pair[1][0].lon;
        assert_ne!(first_east, second_east);
    }
    for pair in sweep.tracks.windows(2) {
        let forward: Vec<f64> = pair[0].iter().map(|p| p.lon).collect();
        let mut back: Vec<f64> = pair[1].iter().map(|p| p.lon).collect();
        back.reverse();
        assert_eq!(forward.len(), back.len());
        for (a, b) in forward.iter().zip(&back) {
            assert!((a - b).abs() < 1e-12);
        }
    }
    // the first track starts at the western edge
    assert!(sweep.tracks[0][0].lon.abs() < 1e-9);
}

#[test]
fn spiral_terminates_within_radius() {
    let planner = FlightPlanner::default();
    let center = pt(33.68, -117.83);
    let result = planner
        .plan_spiral_search(
            SpiralArea::Circle {
                center,
                radius_m: 1_000.0,
            },
            planner.defaults(),
        )
        .unwrap();
    assert_eq!(result.pattern, SearchPattern::Spiral);
    assert_eq!(result.waypoints[0].position(), center);
    for wp in &result.waypoints {
        assert!(distance(center, wp.position()).unwrap() <= 1_000.0 + 1e-6);
    }
}

#[test]
fn oversized_spiral_is_truncated_with_warning() {
    let planner = FlightPlanner::default();
    let result = planner
        .plan_spiral_search(
            SpiralArea::Circle {
                center: pt(0.0, 0.0),
                radius_m: 1_000_000.0,
            },
            planner.defaults(),
        )
        .unwrap();
    assert!(result.waypoint_count <= sar_core::spiral::MAX_SPIRAL_CANDIDATES);
    assert!(result.warnings.iter().any(|w| w.contains("truncated")));
}

#[test]
fn two_point_boundary_is_rejected() {
    let err = Boundary::new(vec![pt(0.0, 0.0), pt(0.0, 0.01)]).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidBoundary(_)));

    let err = Boundary::from_json("[[0, 0], [0, 0.01]]").unwrap_err();
    assert!(matches!(err, PlannerError::InvalidBoundary(_)));
}

#[test]
fn one_kilometer_leg_at_five_meters_per_second() {
    let points = [pt(0.0, 0.0), pt(0.0, 0.01)];
    let secs = sar_core::estimate_duration(&points, 5.0).unwrap();
    assert!((secs - 222.6).abs() <= 222.6 * 0.01, "{secs}");
}

#[test]
fn full_front_overlap_is_invalid() {
    let planner = FlightPlanner::default();
    let params = PlannerParameters {
        front_overlap: 100.0,
        ..Default::default()
    };
    let err = planner
        .plan_grid_search(&rectangle(0.0, 0.0, 0.002, 0.01), &params)
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidParameter(_)));
}
