//! Calendar page state: one store, one session, one visible range.

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::clock::Clock;
use crate::date_grid::{self, CalendarDay, ViewMode};
use crate::error::{ScheduleError, ScheduleResult};
use crate::event::Event;
use crate::event_index::EventIndex;
use crate::event_store::{EventStore, StoreCommand};
use crate::session::{Effect, SessionController};

pub struct Planner<C: Clock> {
    store: EventStore,
    session: SessionController<C>,
    reference: NaiveDate,
    view: ViewMode,
}

impl<C: Clock> Planner<C> {
    /// Start on the page containing today.
    pub fn new(session: SessionController<C>, view: ViewMode) -> Self {
        let reference = session.today();
        Planner {
            store: EventStore::new(),
            session,
            reference,
            view,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn session(&self) -> &SessionController<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController<C> {
        &mut self.session
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn title(&self) -> String {
        self.view.title(self.reference)
    }

    // NAVIGATION:

    pub fn go_to(&mut self, reference: NaiveDate) {
        self.reference = reference;
    }

    pub fn next(&mut self) {
        self.reference = self.view.step(self.reference, true);
    }

    pub fn previous(&mut self) {
        self.reference = self.view.step(self.reference, false);
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    // RENDER INPUTS:

    pub fn grid(&self) -> Vec<CalendarDay> {
        date_grid::generate(self.reference, self.view, self.session.today())
    }

    pub fn index(&self) -> EventIndex<'_> {
        EventIndex::build(self.store.events())
    }

    /// Events whose day is visible on the current page, in store order.
    pub fn visible_events(&self) -> Vec<&Event> {
        let (start, end) = date_grid::visible_range(self.reference, self.view);
        self.store
            .events()
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    // EFFECTS:

    /// Forward a controller effect to the store.
    ///
    /// Only `Commit` reaches the store; generation requests must be run by
    /// the caller. A missing id on update points at a stale session and is
    /// logged as an error before being returned.
    pub fn apply(&mut self, effect: Effect) -> ScheduleResult<Option<Event>> {
        let Effect::Commit(command) = effect else {
            return Ok(None);
        };

        let is_delete = matches!(command, StoreCommand::Delete(_));
        match self.store.apply(command) {
            Ok(event) => {
                debug!(is_delete, events = self.store.len(), "applied session commit");
                Ok(event)
            }
            Err(ScheduleError::NotFound(id)) => {
                error!(%id, "session referenced an event the store does not have");
                Err(ScheduleError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Save the open session and apply the result.
    pub fn save(&mut self) -> ScheduleResult<Option<Event>> {
        let effect = self.session.save()?;
        self.apply(effect)
    }

    /// Confirm the pending dialog. Delete confirmations are applied here;
    /// an overwrite confirmation is returned as `Effect::Generate`.
    pub fn confirm(&mut self) -> ScheduleResult<Effect> {
        match self.session.confirm() {
            effect @ Effect::Commit(_) => {
                self.apply(effect)?;
                Ok(Effect::Updated)
            }
            other => Ok(other),
        }
    }
}
