//! Message primitives exchanged with the marker registries and action executors.
//!
//! These mirror the shape of the stamped geometry messages the navigation stack
//! consumes, backed by [`nalgebra`] types for downstream math convenience.

use nalgebra::{Point3, Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Time at which a message was stamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: i64,
    pub nanosec: u32,
}

/// Timestamp plus the frame a message is expressed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Stamp,
    pub frame_id: String,
}

impl Header {
    pub fn new(frame_id: impl Into<String>) -> Self {
        Self {
            stamp: Stamp::default(),
            frame_id: frame_id.into(),
        }
    }
}

/// A position and orientation.
///
/// The orientation is a raw [`Quaternion`], not a [`UnitQuaternion`]: goals built
/// from click points carry whatever the click produced. Use
/// [`Pose::unit_orientation`] before treating it as a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3<f64>,
    pub orientation: Quaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Quaternion::identity(),
        }
    }
}

impl Pose {
    /// Renormalized orientation, or `None` for a zero quaternion.
    pub fn unit_orientation(&self) -> Option<UnitQuaternion<f64>> {
        UnitQuaternion::try_new(self.orientation, f64::EPSILON)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

/// Category of a user interaction reported by a marker registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEvent {
    KeepAlive,
    PoseUpdate,
    MenuSelect,
    ButtonClick,
    MouseDown,
    MouseUp,
}

/// A user interaction with one affordance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Name of the affordance that was clicked.
    pub marker_name: String,
    pub event_type: FeedbackEvent,
    pub header: Header,
    /// Current pose of the affordance.
    pub pose: Pose,
    /// Where the click ray hit the affordance.
    pub mouse_point: Point3<f64>,
}

impl InteractionEvent {
    /// Only a released mouse button triggers a goal.
    pub fn is_actionable(&self) -> bool {
        self.event_type == FeedbackEvent::MouseUp
    }
}

/// Goal submitted to the navigation executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationGoal {
    pub target_pose: PoseStamped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_orientation_renormalizes() {
        let pose = Pose {
            position: Point3::origin(),
            orientation: Quaternion::new(1.0, 1.0, 2.0, 3.0),
        };

        let unit = pose.unit_orientation().expect("non-zero quaternion");
        let norm = 15.0_f64.sqrt();
        assert!((unit.quaternion().i - 1.0 / norm).abs() < 1e-12);
        assert!((unit.quaternion().k - 3.0 / norm).abs() < 1e-12);
        assert!((unit.quaternion().w - 1.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn zero_orientation_has_no_rotation() {
        let pose = Pose {
            position: Point3::origin(),
            orientation: Quaternion::new(0.0, 0.0, 0.0, 0.0),
        };
        assert!(pose.unit_orientation().is_none());
    }

    #[test]
    fn event_category_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&FeedbackEvent::MouseUp).expect("serialize");
        assert_eq!(json, "\"mouse_up\"");
    }

    #[test]
    fn only_mouse_up_is_actionable() {
        let mut event = InteractionEvent {
            marker_name: "m".to_string(),
            event_type: FeedbackEvent::MouseDown,
            header: Header::new("map"),
            pose: Pose::default(),
            mouse_point: Point3::origin(),
        };
        assert!(!event.is_actionable());

        event.event_type = FeedbackEvent::MouseUp;
        assert!(event.is_actionable());
    }
}
