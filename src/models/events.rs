//! Model change notifications
//!
//! Staves queue an event for every change a renderer has to redraw. The host
//! drains the queue after each operation; nothing here calls back into the UI.

use serde::{Deserialize, Serialize};

use super::clef::ClefShape;
use super::pitch::Pitch;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Clef,
    Neume,
    Division,
    Custos,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModelEvent {
    #[serde(rename_all = "camelCase")]
    Mounted {
        kind: ElementKind,
        id: Option<String>,
        index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Removed { kind: ElementKind, id: Option<String> },
    /// Sounding pitches of a neume changed while its position stayed put
    #[serde(rename_all = "camelCase")]
    PitchChanged {
        id: Option<String>,
        index: usize,
        pitches: Vec<Option<Pitch>>,
    },
    #[serde(rename_all = "camelCase")]
    ClefChanged {
        id: Option<String>,
        shape: ClefShape,
        staff_pos: i32,
    },
    #[serde(rename_all = "camelCase")]
    CustosChanged {
        id: Option<String>,
        pitch: Pitch,
        staff_pos: Option<i32>,
    },
}

/// FIFO of pending events owned by one staff
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    events: Vec<ModelEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ModelEvent) {
        log::trace!("queued {:?}", event);
        self.events.push(event);
    }

    pub fn take(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEvent> {
        self.events.iter()
    }
}

/// An event tagged with the staff that raised it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageEvent {
    pub staff: usize,
    #[serde(flatten)]
    pub event: ModelEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.push(ModelEvent::Removed { kind: ElementKind::Neume, id: Some("n1".into()) });
        queue.push(ModelEvent::Removed { kind: ElementKind::Clef, id: None });
        assert_eq!(queue.len(), 2);

        let events = queue.take();
        assert!(queue.is_empty());
        assert!(matches!(events[0], ModelEvent::Removed { kind: ElementKind::Neume, .. }));
        assert!(matches!(events[1], ModelEvent::Removed { kind: ElementKind::Clef, .. }));
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = PageEvent {
            staff: 2,
            event: ModelEvent::ClefChanged { id: Some("c1".into()), shape: ClefShape::F, staff_pos: -2 },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "clefChanged");
        assert_eq!(json["staff"], 2);
        assert_eq!(json["staffPos"], -2);
        assert_eq!(json["shape"], "f");
    }
}
