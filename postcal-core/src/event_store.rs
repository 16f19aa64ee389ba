//! Authoritative in-memory collection of scheduled posts.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult, ValidationError};
use crate::event::{Event, EventId};

/// A mutation produced by an editing session and applied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    Create {
        caption: String,
        date: NaiveDate,
        image: Option<String>,
    },
    Update {
        id: EventId,
        caption: String,
        date: NaiveDate,
        image: Option<String>,
    },
    Delete(EventId),
}

/// Owns every event and its identity.
///
/// Events are kept in insertion order; updates replace in place so an edit
/// never moves a post relative to its neighbours.
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Store a new post under a fresh identifier.
    ///
    /// The caption is validated here as well as in the session, so the store
    /// never holds an empty caption regardless of the caller.
    pub fn create(
        &mut self,
        caption: &str,
        date: NaiveDate,
        image: Option<String>,
    ) -> ScheduleResult<Event> {
        validate_caption(caption)?;

        let event = Event {
            id: self.fresh_id(),
            date,
            title: caption.to_string(),
            image,
        };
        self.events.push(event.clone());

        debug!(id = %event.id, %date, "created event");
        Ok(event)
    }

    /// Replace caption, date and image of an existing post. The id never changes.
    pub fn update(
        &mut self,
        id: EventId,
        caption: &str,
        date: NaiveDate,
        image: Option<String>,
    ) -> ScheduleResult<Event> {
        validate_caption(caption)?;

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ScheduleError::NotFound(id))?;

        event.title = caption.to_string();
        event.date = date;
        event.image = image;

        debug!(%id, %date, "updated event");
        Ok(event.clone())
    }

    /// Remove a post. Unknown ids are ignored and yield `None`.
    pub fn delete(&mut self, id: EventId) -> Option<Event> {
        let Some(pos) = self.events.iter().position(|e| e.id == id) else {
            debug!(%id, "delete ignored, no such event");
            return None;
        };

        debug!(%id, "deleted event");
        Some(self.events.remove(pos))
    }

    /// Apply a session's commit or delete request.
    /// Returns the stored event for create/update and the removed one for delete.
    pub fn apply(&mut self, command: StoreCommand) -> ScheduleResult<Option<Event>> {
        match command {
            StoreCommand::Create {
                caption,
                date,
                image,
            } => self.create(&caption, date, image).map(Some),
            StoreCommand::Update {
                id,
                caption,
                date,
                image,
            } => self.update(id, &caption, date, image).map(Some),
            StoreCommand::Delete(id) => Ok(self.delete(id)),
        }
    }

    // v4 collisions are not expected, but ids must be unique among live events
    fn fresh_id(&self) -> EventId {
        loop {
            let id = EventId::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }
}

fn validate_caption(caption: &str) -> Result<(), ValidationError> {
    if caption.trim().is_empty() {
        return Err(ValidationError::EmptyCaption);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // --- create ---

    #[test]
    fn create_assigns_unique_ids() {
        let mut store = EventStore::new();
        let ids: HashSet<_> = (0..500)
            .map(|i| {
                store
                    .create(&format!("post {i}"), date(2025, 6, 10), None)
                    .unwrap()
                    .id
            })
            .collect();

        assert_eq!(ids.len(), 500);
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn create_rejects_blank_caption() {
        let mut store = EventStore::new();
        let err = store.create("   ", date(2025, 6, 10), None).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Validation(ValidationError::EmptyCaption)
        ));
        assert!(store.is_empty());
    }

    // --- update ---

    #[test]
    fn update_replaces_fields_and_keeps_id() {
        let mut store = EventStore::new();
        let original = store
            .create("Launch post", date(2025, 6, 10), None)
            .unwrap();

        let updated = store
            .update(
                original.id,
                "Launch day!",
                date(2025, 6, 12),
                Some("data:image/png;base64,AAAA".into()),
            )
            .unwrap();

        assert_eq!(updated.id, original.id);
        let stored = store.get(original.id).unwrap();
        assert_eq!(stored.title, "Launch day!");
        assert_eq!(stored.date, date(2025, 6, 12));
        assert_eq!(stored.image.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn update_can_clear_image() {
        let mut store = EventStore::new();
        let e = store
            .create("With image", date(2025, 6, 10), Some("img".into()))
            .unwrap();
        store.update(e.id, "With image", e.date, None).unwrap();
        assert_eq!(store.get(e.id).unwrap().image, None);
    }

    #[test]
    fn identical_update_is_observably_equal() {
        let mut store = EventStore::new();
        let original = store
            .create("Hello", date(2025, 6, 10), Some("img".into()))
            .unwrap();
        let updated = store
            .update(original.id, "Hello", date(2025, 6, 10), Some("img".into()))
            .unwrap();

        assert_eq!(original, updated);
        assert_eq!(store.get(original.id), Some(&original));
    }

    #[test]
    fn update_keeps_insertion_position() {
        let mut store = EventStore::new();
        let a = store.create("a", date(2025, 6, 10), None).unwrap();
        let b = store.create("b", date(2025, 6, 10), None).unwrap();
        let c = store.create("c", date(2025, 6, 10), None).unwrap();

        store.update(a.id, "a2", date(2025, 6, 11), None).unwrap();

        let order: Vec<_> = store.events().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut store = EventStore::new();
        let mut other = EventStore::new();
        let ghost = other.create("ghost", date(2025, 6, 10), None).unwrap();

        let err = store
            .update(ghost.id, "x", date(2025, 6, 10), None)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound(id) if id == ghost.id));
    }

    // --- delete ---

    #[test]
    fn delete_removes_event() {
        let mut store = EventStore::new();
        let e = store.create("bye", date(2025, 6, 10), None).unwrap();
        assert_eq!(store.delete(e.id), Some(e.clone()));
        assert!(store.get(e.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn delete_missing_id_is_a_no_op() {
        let mut store = EventStore::new();
        store.create("keep", date(2025, 6, 10), None).unwrap();
        let mut other = EventStore::new();
        let ghost = other.create("ghost", date(2025, 6, 10), None).unwrap();

        assert_eq!(store.delete(ghost.id), None);
        assert_eq!(store.len(), 1);
    }

    // --- apply ---

    #[test]
    fn apply_routes_commands() {
        let mut store = EventStore::new();
        let created = store
            .apply(StoreCommand::Create {
                caption: "first".into(),
                date: date(2025, 6, 10),
                image: None,
            })
            .unwrap()
            .unwrap();

        store
            .apply(StoreCommand::Update {
                id: created.id,
                caption: "second".into(),
                date: date(2025, 6, 10),
                image: None,
            })
            .unwrap();
        assert_eq!(store.get(created.id).unwrap().title, "second");

        let removed = store.apply(StoreCommand::Delete(created.id)).unwrap();
        assert_eq!(removed.map(|e| e.id), Some(created.id));
        assert!(store.is_empty());
    }
}
