//! Link classification by name suffix.

use serde::{Deserialize, Serialize};

/// Suffix marking a link as a navigation destination.
pub const PARKING_SPOT_SUFFIX: &str = "nav_goal_link";

/// Suffix marking a link as a manipulation target.
pub const SURFACE_SUFFIX: &str = "surface_link";

/// The kind of goal a link offers.
///
/// Every per-category constant (marker naming, box shape, color, handler
/// selection) is looked up through this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    ParkingSpot,
    SurfaceGoal,
}

impl LinkKind {
    /// Checked in this order; the first match wins.
    pub const ALL: [LinkKind; 2] = [LinkKind::ParkingSpot, LinkKind::SurfaceGoal];

    /// Link-name suffix that selects this kind.
    pub fn link_suffix(self) -> &'static str {
        match self {
            LinkKind::ParkingSpot => PARKING_SPOT_SUFFIX,
            LinkKind::SurfaceGoal => SURFACE_SUFFIX,
        }
    }
}

/// Classifies a link by its name, or `None` when it offers no goal.
///
/// Names shorter than a suffix simply do not match.
pub fn classify(link_name: &str) -> Option<LinkKind> {
    LinkKind::ALL
        .into_iter()
        .find(|kind| link_name.ends_with(kind.link_suffix()))
}
