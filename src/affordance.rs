//! Clickable affordances registered for classified links.

use serde::{Deserialize, Serialize};

use crate::classify::LinkKind;

/// RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// An axis-aligned box drawn at the affordance origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    /// Edge lengths along x, y, z in meters.
    pub dimensions: [f64; 3],
    pub color: Rgba,
}

/// How a control reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Click-to-activate; the affordance does not move.
    Button,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    pub interaction_mode: InteractionMode,
    pub always_visible: bool,
    pub markers: Vec<BoxShape>,
}

/// A clickable marker anchored at one link frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affordance {
    /// Registry key, unique per frame and kind.
    pub name: String,
    pub frame_id: String,
    pub scale: f64,
    pub controls: Vec<Control>,
}

impl LinkKind {
    /// Appended to the frame id to form the affordance name.
    pub fn marker_suffix(self) -> &'static str {
        match self {
            LinkKind::ParkingSpot => "_parking_spot",
            LinkKind::SurfaceGoal => "_surface",
        }
    }

    pub fn control_name(self) -> &'static str {
        match self {
            LinkKind::ParkingSpot => "parking spot",
            LinkKind::SurfaceGoal => "surface",
        }
    }

    /// Box drawn for this kind.
    ///
    /// Surfaces use a fixed box rather than the real surface extent.
    pub fn shape(self) -> BoxShape {
        match self {
            LinkKind::ParkingSpot => BoxShape {
                dimensions: [0.15, 0.15, 0.05],
                color: Rgba { r: 0.0, g: 0.5, b: 0.25, a: 1.0 },
            },
            LinkKind::SurfaceGoal => BoxShape {
                dimensions: [0.35, 0.35, 0.05],
                color: Rgba { r: 0.5, g: 0.0, b: 0.25, a: 1.0 },
            },
        }
    }
}

/// Builds the affordance for a link of the given kind.
///
/// Never fails; an empty frame id produces a valid, if odd, name.
pub fn build_affordance(kind: LinkKind, frame_id: &str) -> Affordance {
    Affordance {
        name: format!("{frame_id}{}", kind.marker_suffix()),
        frame_id: frame_id.to_string(),
        scale: 1.0,
        controls: vec![Control {
            name: kind.control_name().to_string(),
            interaction_mode: InteractionMode::Button,
            always_visible: true,
            markers: vec![kind.shape()],
        }],
    }
}

pub fn build_parking_affordance(frame_id: &str) -> Affordance {
    build_affordance(LinkKind::ParkingSpot, frame_id)
}

pub fn build_surface_affordance(frame_id: &str) -> Affordance {
    build_affordance(LinkKind::SurfaceGoal, frame_id)
}
