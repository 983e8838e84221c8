//! Boustrophedon ("lawn-mower") sweep clipped to the search boundary.

use crate::boundary::{Boundary, LineSegment, Orientation};
use crate::coverage::CoverageModel;
use crate::models::GeoPoint;

/// Clipped segments shorter than this collapse to a single waypoint.
const MIN_SEGMENT_M: f64 = 1e-3;

/// Waypoints a single sweep may emit before it is cut short.
pub const MAX_GRID_WAYPOINTS: usize = 100_000;

/// Sweep tracks in flight order.
#[derive(Debug, Clone)]
pub struct GridSweep {
    pub orientation: Orientation,
    /// Waypoints of each non-empty track, already direction-alternated
    pub tracks: Vec<Vec<GeoPoint>>,
    /// Probe lines cast, including those that missed the polygon
    pub probes_cast: usize,
    pub warnings: Vec<String>,
}

impl GridSweep {
    /// Concatenate every track into one flight path.
    pub fn into_path(self) -> Vec<GeoPoint> {
        self.tracks.into_iter().flatten().collect()
    }
}

/// Lay parallel tracks across `boundary`, one track spacing apart.
///
/// Tracks run along the boundary's [`Boundary::orientation_hint`]. The first
/// and last probes lie on the bounding box edges. Each probe is clipped to
/// the polygon; probes that miss it (concave pockets) are skipped. Within a
/// track, segments are visited west-to-east (south-to-north for vertical
/// sweeps) and densified at the model's waypoint spacing. Every emitted
/// track then reverses the direction of the previously emitted one.
///
/// The sweep stops before the first track that would take it past
/// [`MAX_GRID_WAYPOINTS`] and records a warning.
pub fn plan_grid(boundary: &Boundary, coverage: &CoverageModel) -> GridSweep {
    let orientation = boundary.orientation_hint();
    let bbox = boundary.bounding_box();
    let spacing = coverage.track_spacing_m;

    let (extent_m, lo, hi) = match orientation {
        Orientation::Horizontal => (bbox.height_m(), bbox.min_lat, bbox.max_lat),
        Orientation::Vertical => (bbox.width_m(), bbox.min_lon, bbox.max_lon),
    };

    let mut warnings = Vec::new();
    if extent_m < spacing {
        warnings.push(format!(
            "search area is {extent_m:.1} m across, narrower than one {spacing:.1} m pass; \
             flying the minimum two tracks"
        ));
    }

    // n intervals -> n + 1 probes, never fewer than two
    let intervals = ((extent_m / spacing).ceil() as usize).max(1);

    let mut tracks = Vec::new();
    let mut total = 0usize;
    let mut probes_cast = 0usize;
    let mut forward = true;
    for i in 0..=intervals {
        probes_cast += 1;
        let offset = (lo + (hi - lo) * (i as f64 / intervals as f64)).clamp(lo, hi);
        let probe = match orientation {
            Orientation::Horizontal => LineSegment::new(
                GeoPoint { lat: offset, lon: bbox.min_lon },
                GeoPoint { lat: offset, lon: bbox.max_lon },
            ),
            Orientation::Vertical => LineSegment::new(
                GeoPoint { lat: bbox.min_lat, lon: offset },
                GeoPoint { lat: bbox.max_lat, lon: offset },
            ),
        };

        let segments = boundary.clip_line(&probe);
        if segments.is_empty() {
            continue;
        }

        let needed: usize = segments
            .iter()
            .map(|segment| densified_len(segment, coverage.waypoint_spacing_m))
            .sum();
        if total.saturating_add(needed) > MAX_GRID_WAYPOINTS {
            warnings.push(format!(
                "grid truncated at {MAX_GRID_WAYPOINTS} waypoints after {} of {} tracks",
                tracks.len(),
                intervals + 1
            ));
            break;
        }

        let mut track: Vec<GeoPoint> = segments
            .iter()
            .flat_map(|segment| densify(segment, coverage.waypoint_spacing_m))
            .collect();
        if !forward {
            track.reverse();
        }
        forward = !forward;
        total += track.len();
        tracks.push(track);
    }

    if tracks.is_empty() && probes_cast == intervals + 1 {
        warnings.push("no sweep track intersects the boundary".to_string());
    }

    GridSweep {
        orientation,
        tracks,
        probes_cast,
        warnings,
    }
}

/// Number of points [`densify`] produces for `segment`.
fn densified_len(segment: &LineSegment, max_spacing_m: f64) -> usize {
    let length = segment.length_m();
    if length < MIN_SEGMENT_M {
        1
    } else {
        ((length / max_spacing_m).ceil() as usize).max(1) + 1
    }
}

/// Both endpoints plus evenly spaced interior points no more than
/// `max_spacing_m` apart.
fn densify(segment: &LineSegment, max_spacing_m: f64) -> Vec<GeoPoint> {
    let count = densified_len(segment, max_spacing_m);
    if count == 1 {
        return vec![segment.start];
    }
    let steps = count - 1;
    (0..=steps)
        .map(|k| segment.interpolate(k as f64 / steps as f64))
        .collect()
}
