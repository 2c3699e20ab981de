//! Interaction feedback intake and routing.
//!
//! Feedback arrives as newline-delimited JSON [`InteractionEvent`]s. Each event is
//! offered to the parking registry first and to the surface registry second.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::handlers::ClickOutcome;
use crate::messages::InteractionEvent;
use crate::registry::MarkerServer;

/// Parses one feedback line. Blank and malformed lines yield `None`; malformed
/// ones are logged.
pub fn parse_feedback_line(line: &str) -> Option<InteractionEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("skipping malformed feedback: {e}");
            None
        }
    }
}

/// Forwards every well-formed event read from `reader` until it closes or the
/// receiving side goes away. Returns how many events were forwarded.
pub fn read_feedback<R: BufRead>(reader: R, events: &mpsc::UnboundedSender<InteractionEvent>) -> usize {
    let mut forwarded = 0;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("feedback connection closed: {e}");
                break;
            }
        };

        if let Some(event) = parse_feedback_line(&line) {
            if events.send(event).is_err() {
                break;
            }
            forwarded += 1;
        }
    }

    forwarded
}

/// Routes events to whichever committed registry owns the clicked marker.
#[derive(Debug, Clone)]
pub struct FeedbackRouter {
    parking: Arc<MarkerServer>,
    surface: Arc<MarkerServer>,
}

impl FeedbackRouter {
    pub fn new(parking: Arc<MarkerServer>, surface: Arc<MarkerServer>) -> Self {
        Self { parking, surface }
    }

    /// Outcome of the handler bound to the event's marker, or `None` if neither
    /// registry has it.
    pub async fn route(&self, event: &InteractionEvent) -> Option<ClickOutcome> {
        if let Some(outcome) = self.parking.dispatch(event).await {
            return Some(outcome);
        }
        if let Some(outcome) = self.surface.dispatch(event).await {
            return Some(outcome);
        }

        warn!(
            marker = %event.marker_name,
            parking = self.parking.name(),
            surface = self.surface.name(),
            "feedback for unknown marker"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordance::{build_parking_affordance, build_surface_affordance};
    use crate::handlers::tests::{click, RecordingNavigation};
    use crate::handlers::{ParkingClickHandler, SurfaceClickHandler};
    use crate::messages::FeedbackEvent;
    use crate::registry::MarkerRegistry;
    use std::io::Cursor;

    fn router(navigation: Arc<RecordingNavigation>) -> FeedbackRouter {
        let mut parking = MarkerServer::new("parking_markers");
        parking.insert(
            build_parking_affordance("chairA_nav_goal_link"),
            Arc::new(ParkingClickHandler::new(navigation)),
        );
        parking.apply_changes();

        let mut surface = MarkerServer::new("surfaces_markers");
        surface.insert(
            build_surface_affordance("table1_surface_link"),
            Arc::new(SurfaceClickHandler::new()),
        );
        surface.apply_changes();

        FeedbackRouter::new(Arc::new(parking), Arc::new(surface))
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let valid = serde_json::to_string(&click("a", FeedbackEvent::MouseUp)).expect("serialize");
        let input = format!("{valid}\n{{\"marker_name\": 3}}\n\n   \nnot json\n{valid}\n");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let forwarded = read_feedback(Cursor::new(input), &tx);

        assert_eq!(forwarded, 2);
        assert_eq!(rx.try_recv().expect("first event").marker_name, "a");
        assert_eq!(rx.try_recv().expect("second event").marker_name, "a");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reading_stops_when_receiver_is_gone() {
        let valid = serde_json::to_string(&click("a", FeedbackEvent::MouseUp)).expect("serialize");
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        assert_eq!(read_feedback(Cursor::new(format!("{valid}\n{valid}\n")), &tx), 0);
    }

    #[tokio::test]
    async fn parking_marker_is_routed_to_navigation() {
        let navigation = Arc::new(RecordingNavigation::default());
        let router = router(navigation.clone());

        let event = click("chairA_nav_goal_link_parking_spot", FeedbackEvent::MouseUp);
        let outcome = router.route(&event).await.expect("parking marker is live");

        assert!(matches!(outcome, ClickOutcome::Submitted(_)));
        assert_eq!(navigation.goals.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn surface_marker_falls_through_to_surface_registry() {
        let navigation = Arc::new(RecordingNavigation::default());
        let router = router(navigation.clone());

        let event = click("table1_surface_link_surface", FeedbackEvent::MouseUp);
        let outcome = router.route(&event).await.expect("surface marker is live");

        assert!(matches!(outcome, ClickOutcome::Undispatched(_)));
        assert!(navigation.goals.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_marker_has_no_outcome() {
        let navigation = Arc::new(RecordingNavigation::default());
        let router = router(navigation.clone());

        let event = click("shelf_parking_spot", FeedbackEvent::MouseUp);
        assert!(router.route(&event).await.is_none());
        assert!(navigation.goals.lock().unwrap().is_empty());
    }
}
