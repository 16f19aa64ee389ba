//! Day-to-events lookup for rendering.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::event::Event;

/// Events grouped by calendar day, built once per render pass.
///
/// Within a day, events keep the order of the slice they were built from.
#[derive(Debug, Default)]
pub struct EventIndex<'a> {
    by_day: HashMap<NaiveDate, Vec<&'a Event>>,
}

impl<'a> EventIndex<'a> {
    pub fn build(events: &'a [Event]) -> Self {
        let mut by_day: HashMap<NaiveDate, Vec<&'a Event>> = HashMap::new();
        for event in events {
            by_day.entry(event.date).or_default().push(event);
        }
        EventIndex { by_day }
    }

    pub fn for_day(&self, day: NaiveDate) -> &[&'a Event] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct days that have at least one event.
    pub fn day_count(&self) -> usize {
        self.by_day.len()
    }
}

/// Unindexed lookup: scans the whole slice. Same result as `EventIndex::for_day`.
pub fn events_on(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.is_on(day)).collect()
}
