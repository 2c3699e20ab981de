//! Registration of every classified link with its marker registry.

use std::sync::Arc;

use tracing::{debug, info};

use crate::affordance::build_affordance;
use crate::classify::{classify, LinkKind};
use crate::description::StructureSource;
use crate::error::Result;
use crate::handlers::{ParkingClickHandler, SurfaceClickHandler};
use crate::registry::MarkerRegistry;
use crate::{ClickHandler, NavigationExecutor};

/// How many affordances one registration pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationCounts {
    pub parking: usize,
    pub surface: usize,
}

impl RegistrationCounts {
    pub fn total(&self) -> usize {
        self.parking + self.surface
    }
}

/// Owns the click handlers and performs the one-time registration pass.
pub struct Orchestrator {
    navigation: Arc<dyn NavigationExecutor>,
    parking_handler: Arc<dyn ClickHandler>,
    surface_handler: Arc<dyn ClickHandler>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Default wiring: parking clicks go to `navigation`, surface clicks have no
    /// manipulation executor.
    pub fn new(navigation: Arc<dyn NavigationExecutor>) -> Self {
        let parking_handler = Arc::new(ParkingClickHandler::new(navigation.clone()));
        Self {
            navigation,
            parking_handler,
            surface_handler: Arc::new(SurfaceClickHandler::new()),
        }
    }

    /// Replaces the handler bound to surface affordances.
    pub fn with_surface_handler(mut self, handler: Arc<dyn ClickHandler>) -> Self {
        self.surface_handler = handler;
        self
    }

    /// Handler bound to affordances of `kind`.
    pub fn handler(&self, kind: LinkKind) -> Arc<dyn ClickHandler> {
        match kind {
            LinkKind::ParkingSpot => self.parking_handler.clone(),
            LinkKind::SurfaceGoal => self.surface_handler.clone(),
        }
    }

    /// Classifies every link once, inserts one affordance per classified link into
    /// the matching registry, then commits both registries.
    pub fn register_all<I>(
        &self,
        links: I,
        parking: &mut dyn MarkerRegistry,
        surface: &mut dyn MarkerRegistry,
    ) -> RegistrationCounts
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut counts = RegistrationCounts::default();

        for link in links {
            let link = link.as_ref();
            let Some(kind) = classify(link) else {
                debug!(link, "link offers no goal");
                continue;
            };

            let affordance = build_affordance(kind, link);
            let handler = self.handler(kind);
            match kind {
                LinkKind::ParkingSpot => {
                    parking.insert(affordance, handler);
                    counts.parking += 1;
                }
                LinkKind::SurfaceGoal => {
                    surface.insert(affordance, handler);
                    counts.surface += 1;
                }
            }
        }

        parking.apply_changes();
        surface.apply_changes();
        counts
    }

    /// Startup sequence: wait for the navigation executor, load the description,
    /// register and commit.
    ///
    /// # Errors
    ///
    /// Fails if the executor never becomes ready or the description is unavailable.
    /// Nothing is inserted or committed in either case.
    pub async fn start(
        &self,
        source: &dyn StructureSource,
        parking: &mut dyn MarkerRegistry,
        surface: &mut dyn MarkerRegistry,
    ) -> Result<RegistrationCounts> {
        self.navigation.wait_for_ready().await?;

        let links = source.link_names()?;

        info!("creating parking spots and surfaces");
        let counts = self.register_all(&links, parking, surface);
        info!(
            parking = counts.parking,
            surface = counts.surface,
            skipped = links.len() - counts.total(),
            "registered affordances"
        );
        Ok(counts)
    }
}
