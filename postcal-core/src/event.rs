//! Scheduled post type.
//!
//! A post is placed on a local calendar day. There is no time-of-day
//! component: two posts on the same day always share that day's cell.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier assigned by the event store at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    pub(crate) fn new_v4() -> Self {
        EventId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scheduled post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Local calendar day the post is scheduled for
    pub date: NaiveDate,
    /// Caption text (never empty once stored)
    pub title: String,
    /// Embedded image payload, passed through untouched
    pub image: Option<String>,
}

impl Event {
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
