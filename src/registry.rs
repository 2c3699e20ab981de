//! Marker registries that affordances are published through.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::affordance::Affordance;
use crate::handlers::ClickOutcome;
use crate::messages::InteractionEvent;
use crate::ClickHandler;

/// A sink for affordances and the handlers bound to them.
///
/// Inserted affordances are not guaranteed visible until [`MarkerRegistry::apply_changes`].
pub trait MarkerRegistry {
    fn insert(&mut self, affordance: Affordance, handler: Arc<dyn ClickHandler>);

    /// Publishes everything inserted so far and returns how many affordances were published.
    fn apply_changes(&mut self) -> usize;
}

struct Entry {
    affordance: Affordance,
    handler: Arc<dyn ClickHandler>,
}

/// In-process registry that routes interaction feedback to bound handlers.
///
/// Once committed and shared, the server is only read, so concurrent
/// [`MarkerServer::dispatch`] calls need no locking.
pub struct MarkerServer {
    name: String,
    pending: HashMap<String, Entry>,
    live: HashMap<String, Entry>,
}

impl std::fmt::Debug for MarkerServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerServer")
            .field("name", &self.name)
            .field("pending_len", &self.pending.len())
            .field("live_len", &self.live.len())
            .finish()
    }
}

impl MarkerServer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: HashMap::new(),
            live: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live affordances.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of affordances waiting for the next commit.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Looks up a live affordance by name.
    pub fn get(&self, name: &str) -> Option<&Affordance> {
        self.live.get(name).map(|entry| &entry.affordance)
    }

    /// Names of all live affordances, sorted.
    pub fn marker_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.live.keys().cloned().collect();
        names.sort();
        names
    }

    /// Routes an event to the handler of the live affordance it names.
    ///
    /// Returns `None` when no live affordance has that name.
    pub async fn dispatch(&self, event: &InteractionEvent) -> Option<ClickOutcome> {
        let entry = self.live.get(&event.marker_name)?;
        Some(entry.handler.on_feedback(event).await)
    }
}

impl MarkerRegistry for MarkerServer {
    fn insert(&mut self, affordance: Affordance, handler: Arc<dyn ClickHandler>) {
        debug!(server = %self.name, marker = %affordance.name, "inserting affordance");
        // Re-inserting a name replaces the earlier entry.
        self.pending
            .insert(affordance.name.clone(), Entry { affordance, handler });
    }

    fn apply_changes(&mut self) -> usize {
        let published = self.pending.len();
        self.live.extend(self.pending.drain());
        info!(server = %self.name, published, live = self.live.len(), "applied marker changes");
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordance::{build_parking_affordance, build_surface_affordance};
    use crate::handlers::tests::{click, RecordingNavigation};
    use crate::handlers::{ParkingClickHandler, SurfaceClickHandler};
    use crate::messages::FeedbackEvent;

    fn handler() -> Arc<dyn ClickHandler> {
        Arc::new(SurfaceClickHandler::new())
    }

    #[test]
    fn inserts_are_invisible_until_applied() {
        let mut server = MarkerServer::new("surfaces_markers");
        server.insert(build_surface_affordance("table1_surface_link"), handler());

        assert!(server.is_empty());
        assert_eq!(server.pending_len(), 1);

        assert_eq!(server.apply_changes(), 1);
        assert_eq!(server.len(), 1);
        assert_eq!(server.pending_len(), 0);
        assert!(server.get("table1_surface_link_surface").is_some());
    }

    #[test]
    fn reinserting_a_name_replaces_it() {
        let mut server = MarkerServer::new("parking_markers");
        server.insert(build_parking_affordance("a_nav_goal_link"), handler());
        server.insert(build_parking_affordance("a_nav_goal_link"), handler());

        assert_eq!(server.apply_changes(), 1);
        assert_eq!(server.marker_names(), vec!["a_nav_goal_link_parking_spot"]);
    }

    #[tokio::test]
    async fn dispatch_routes_only_to_live_markers() {
        let mut server = MarkerServer::new("surfaces_markers");
        server.insert(build_surface_affordance("t_surface_link"), handler());

        let event = click("t_surface_link_surface", FeedbackEvent::MouseUp);
        assert!(server.dispatch(&event).await.is_none());

        server.apply_changes();
        let outcome = server.dispatch(&event).await.expect("marker is live");
        assert!(matches!(outcome, ClickOutcome::Undispatched(_)));

        let unknown = click("nope", FeedbackEvent::MouseUp);
        assert!(server.dispatch(&unknown).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_clicks_each_submit_a_goal() {
        const CLICKS: usize = 64;
        let navigation = Arc::new(RecordingNavigation::default());

        let mut server = MarkerServer::new("parking_markers");
        server.insert(
            build_parking_affordance("chairA_nav_goal_link"),
            Arc::new(ParkingClickHandler::new(navigation.clone())),
        );
        server.apply_changes();
        let server = Arc::new(server);

        let tasks: Vec<_> = (0..CLICKS)
            .map(|_| {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    let event = click("chairA_nav_goal_link_parking_spot", FeedbackEvent::MouseUp);
                    server.dispatch(&event).await
                })
            })
            .collect();

        for task in tasks {
            let outcome = task.await.expect("dispatch task").expect("marker is live");
            assert!(matches!(outcome, ClickOutcome::Submitted(_)));
        }
        assert_eq!(navigation.goals.lock().unwrap().len(), CLICKS);
    }
}
