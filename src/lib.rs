//! Clickable parking spots and surfaces over a robot's furniture description.
//!
//! This crate defines:
//! - [`classify`]: decides from a link name whether it is a parking spot or a surface.
//! - [`affordance`]: the clickable box registered for each classified link.
//! - [`handlers`]: turns a click into a navigation or pointing goal.
//! - [`feedback`]: reads click feedback and routes it to the registry that owns the marker.
//! - [`Orchestrator`]: walks the description once, registers every affordance and
//!   commits the registries.
//! - [`NavigationExecutor`] / [`ManipulationExecutor`]: the async contracts goals are
//!   handed to.

use async_trait::async_trait;

pub mod affordance;
pub mod classify;
pub mod config;
pub mod description;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod handlers;
pub mod messages;
pub mod orchestrator;
pub mod registry;

pub use affordance::{build_parking_affordance, build_surface_affordance, Affordance};
pub use classify::{classify, LinkKind};
pub use config::MarkersConfig;
pub use description::{StructureSource, UrdfFile};
pub use error::{Error, Result};
pub use executor::IpcNavigationClient;
pub use feedback::FeedbackRouter;
pub use handlers::{ClickOutcome, ParkingClickHandler, SurfaceClickHandler};
pub use messages::{FeedbackEvent, Header, InteractionEvent, NavigationGoal, Pose, PoseStamped};
pub use orchestrator::{Orchestrator, RegistrationCounts};
pub use registry::{MarkerRegistry, MarkerServer};

/// The service that drives the base to a parking spot.
///
/// Implementations must accept concurrent submissions; the most recent goal wins.
#[async_trait]
pub trait NavigationExecutor: Send + Sync {
    /// Blocks until the executor accepts goals.
    async fn wait_for_ready(&self) -> Result<()>;

    /// Hands a goal over without waiting for the executor's verdict.
    async fn submit_goal(&self, goal: NavigationGoal) -> Result<()>;
}

/// The service that would point the arm at a surface.
///
/// Nothing in this crate provides one; [`SurfaceClickHandler`] calls it only when
/// one is attached.
#[async_trait]
pub trait ManipulationExecutor: Send + Sync {
    async fn point_at(&self, goal: PoseStamped) -> Result<()>;
}

/// Reacts to interaction feedback for the affordances it is bound to.
///
/// Handlers are invoked concurrently, one call per user interaction.
#[async_trait]
pub trait ClickHandler: Send + Sync {
    async fn on_feedback(&self, event: &InteractionEvent) -> ClickOutcome;
}
