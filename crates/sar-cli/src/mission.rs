//! Mission-upload item list.
//!
//! Mirrors the flight controller's mission protocol: item 0 is the home
//! position, the planned waypoints follow, and a return-to-launch command
//! closes the mission.

use sar_core::{GeoPoint, Waypoint};
use serde::{Deserialize, Serialize};

/// Global frame with altitude relative to home.
pub const FRAME_GLOBAL_RELATIVE_ALT: u8 = 3;
pub const CMD_NAV_WAYPOINT: u16 = 16;
pub const CMD_NAV_RETURN_TO_LAUNCH: u16 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionItem {
    pub seq: usize,
    pub frame: u8,
    pub command: u16,
    /// Hold time, seconds
    pub param1: f64,
    /// Acceptance radius, meters
    pub param2: f64,
    /// Pass radius, meters
    pub param3: f64,
    /// Yaw, degrees
    pub param4: f64,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl MissionItem {
    fn nav(seq: usize, lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            seq,
            frame: FRAME_GLOBAL_RELATIVE_ALT,
            command: CMD_NAV_WAYPOINT,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            lat,
            lon,
            alt,
        }
    }
}

/// Wrap planned waypoints with a home item and a trailing RTL.
pub fn build_mission(home: GeoPoint, waypoints: &[Waypoint]) -> Vec<MissionItem> {
    let mut items = Vec::with_capacity(waypoints.len() + 2);
    items.push(MissionItem::nav(0, home.lat, home.lon, 0.0));

    for wp in waypoints {
        let mut item = MissionItem::nav(items.len(), wp.lat, wp.lon, wp.alt);
        item.param1 = wp.hold_time_s.unwrap_or(0.0);
        item.param2 = wp.acceptance_radius_m.unwrap_or(0.0);
        items.push(item);
    }

    let mut rtl = MissionItem::nav(items.len(), 0.0, 0.0, 0.0);
    rtl.command = CMD_NAV_RETURN_TO_LAUNCH;
    items.push(rtl);
    items
}
