use crossbeam_channel::{unbounded, Receiver, Sender};
use geograph_core::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Map mode lifecycle
    MapModeEnter,
    MapModeExit,

    // Viewport commands (host-dispatched, mirroring the widget's custom
    // zoom-in / zoom-out / fit-content / zoom-to-item events)
    ZoomIn,
    ZoomOut,
    FitContent,
    ZoomToItem {
        id: NodeId,
    },

    // Outbound notifications
    /// The visible node set changed; any cached search results over the
    /// visible graph are stale.
    SearchResultsInvalidated,
    ShowInfo {
        message: String,
    },
    ShowWarning {
        message: String,
    },
}

/// Unbounded in-process mailbox connecting the host UI to the
/// synchronization core.
///
/// Senders and receivers are cheap clones of the same channel; publishing
/// never blocks. All handling is synchronous; the bus only decouples *who*
/// raises an event from *when* it is drained.
#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("event bus has no live receiver, dropping event");
        }
    }

    /// Drain all pending events into a listener. Intended to be called once
    /// per UI frame or per host event-loop turn.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events drained from the bus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_receive() {
        let bus = EventBus::new();
        bus.publish(Event::ZoomToItem { id: NodeId(123) });

        match bus.receiver().recv().unwrap() {
            Event::ZoomToItem { id } => assert_eq!(id, NodeId(123)),
            other => panic!("expected ZoomToItem, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_drains_in_order() {
        struct Recorder(Vec<Event>);
        impl EventListener for Recorder {
            fn handle_event(&mut self, event: &Event) {
                self.0.push(event.clone());
            }
        }

        let bus = EventBus::new();
        bus.publish(Event::MapModeEnter);
        bus.publish(Event::SearchResultsInvalidated);
        bus.publish(Event::MapModeExit);

        let mut recorder = Recorder(Vec::new());
        bus.dispatch_to(&mut recorder);

        assert_eq!(
            recorder.0,
            vec![
                Event::MapModeEnter,
                Event::SearchResultsInvalidated,
                Event::MapModeExit,
            ]
        );
    }

    #[test]
    fn test_dispatch_on_empty_bus_is_a_noop() {
        struct Counter(usize);
        impl EventListener for Counter {
            fn handle_event(&mut self, _event: &Event) {
                self.0 += 1;
            }
        }

        let bus = EventBus::new();
        let mut counter = Counter(0);
        bus.dispatch_to(&mut counter);
        assert_eq!(counter.0, 0);
    }
}
