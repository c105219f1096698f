//! Per-source holding area for the most recent raw event batches.

use std::collections::HashMap;

use crate::event::CalendarEvent;

/// The most recent batch per source id.
///
/// Each delivery replaces the previous batch wholesale; readers must treat
/// stored events as immutable and clone before decorating. The input order
/// carries no meaning, the builder imposes its own.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    batches: HashMap<String, Vec<CalendarEvent>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the batch for `source_id` (full replacement, never a merge).
    pub fn put(&mut self, source_id: &str, events: Vec<CalendarEvent>) {
        self.batches.insert(source_id.to_string(), events);
    }

    /// The current batch for one source.
    pub fn get(&self, source_id: &str) -> Option<&[CalendarEvent]> {
        self.batches.get(source_id).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str) -> CalendarEvent {
        CalendarEvent {
            title: title.into(),
            start_date: 0,
            end_date: 1,
            full_day_event: false,
            location: None,
            visibility: None,
            first_year: None,
        }
    }

    #[test]
    fn put_replaces_wholesale() {
        let mut store = EventStore::new();
        store.put("a", vec![event("one"), event("two")]);
        store.put("a", vec![event("three")]);

        let batch = store.get("a").unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].title, "three");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_source_is_none() {
        let store = EventStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }
}
