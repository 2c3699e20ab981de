//! Click handlers for parking spots and surfaces.
//!
//! Goal construction is split from dispatch: [`parking_goal`] and [`surface_goal`]
//! are pure, while the handler types forward the result to an executor.

use std::sync::Arc;

use async_trait::async_trait;
use nalgebra::Quaternion;
use tracing::{error, info, warn};

use crate::messages::{InteractionEvent, NavigationGoal, PoseStamped};
use crate::{ClickHandler, ManipulationExecutor, NavigationExecutor};

/// What a handler did with one interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The event was not a released mouse button.
    Ignored,
    /// The goal was handed to an executor.
    Submitted(PoseStamped),
    /// The goal was built but no executor is attached to receive it.
    Undispatched(PoseStamped),
}

impl ClickOutcome {
    pub fn goal(&self) -> Option<&PoseStamped> {
        match self {
            ClickOutcome::Ignored => None,
            ClickOutcome::Submitted(goal) | ClickOutcome::Undispatched(goal) => Some(goal),
        }
    }
}

/// Navigation goal for a parking-spot click.
///
/// Header and position come from the event. The orientation is the click point
/// read as `(x, y, z)` with `w = 1`, which is generally not a unit quaternion;
/// consumers should call [`crate::Pose::unit_orientation`].
pub fn parking_goal(event: &InteractionEvent) -> Option<PoseStamped> {
    if !event.is_actionable() {
        return None;
    }

    let mut pose = event.pose;
    let p = event.mouse_point;
    pose.orientation = Quaternion::new(1.0, p.x, p.y, p.z);

    Some(PoseStamped {
        header: event.header.clone(),
        pose,
    })
}

/// Pointing goal for a surface click.
///
/// The orientation is always `(0, 0, 1, 1)`, independent of where the click landed.
pub fn surface_goal(event: &InteractionEvent) -> Option<PoseStamped> {
    if !event.is_actionable() {
        return None;
    }

    let mut pose = event.pose;
    pose.orientation = Quaternion::new(1.0, 0.0, 0.0, 1.0);

    Some(PoseStamped {
        header: event.header.clone(),
        pose,
    })
}

/// Sends a navigation goal for every qualifying parking-spot click.
pub struct ParkingClickHandler {
    navigation: Arc<dyn NavigationExecutor>,
}

impl ParkingClickHandler {
    pub fn new(navigation: Arc<dyn NavigationExecutor>) -> Self {
        Self { navigation }
    }
}

#[async_trait]
impl ClickHandler for ParkingClickHandler {
    async fn on_feedback(&self, event: &InteractionEvent) -> ClickOutcome {
        let Some(goal) = parking_goal(event) else {
            return ClickOutcome::Ignored;
        };

        info!(marker = %event.marker_name, "parking spot clicked");

        let submission = NavigationGoal {
            target_pose: goal.clone(),
        };
        // Failures surface through the executor; nothing is retried here.
        if let Err(e) = self.navigation.submit_goal(submission).await {
            error!(marker = %event.marker_name, "navigation goal submission failed: {e}");
        }

        ClickOutcome::Submitted(goal)
    }
}

/// Builds pointing goals for surface clicks.
///
/// Without a [`ManipulationExecutor`] the goal is reported as
/// [`ClickOutcome::Undispatched`] and no call is made.
#[derive(Default)]
pub struct SurfaceClickHandler {
    manipulation: Option<Arc<dyn ManipulationExecutor>>,
}

impl SurfaceClickHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manipulation(manipulation: Arc<dyn ManipulationExecutor>) -> Self {
        Self {
            manipulation: Some(manipulation),
        }
    }
}

#[async_trait]
impl ClickHandler for SurfaceClickHandler {
    async fn on_feedback(&self, event: &InteractionEvent) -> ClickOutcome {
        let Some(goal) = surface_goal(event) else {
            return ClickOutcome::Ignored;
        };

        info!(marker = %event.marker_name, "surface clicked");

        match &self.manipulation {
            Some(manipulation) => {
                if let Err(e) = manipulation.point_at(goal.clone()).await {
                    error!(marker = %event.marker_name, "pointing goal submission failed: {e}");
                }
                ClickOutcome::Submitted(goal)
            }
            None => {
                warn!(
                    marker = %event.marker_name,
                    "no manipulation executor attached, pointing goal not dispatched"
                );
                ClickOutcome::Undispatched(goal)
            }
        }
    }
}
