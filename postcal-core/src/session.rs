//! Editing session state machine.
//!
//! A session opens when a day or a post is selected and ends on save,
//! delete or close. The controller never touches the event store: save and
//! delete hand a `StoreCommand` back to the caller, and caption generation
//! hands back a `GenerationRequest` the caller fulfils asynchronously.
//!
//! ```text
//! Closed --select_day--> CreatingNew --save--> Closed (+Create)
//! Closed --select_event--> Editing --save--> Closed (+Update)
//! Editing --request_generate_caption (caption set)--> ConfirmingOverwrite
//! ConfirmingOverwrite --confirm--> Editing (+Generate) | --cancel--> Editing
//! Editing --request_delete--> ConfirmingDelete
//! ConfirmingDelete --confirm--> Closed (+Delete) | --cancel--> Editing
//! any --close--> Closed
//! ```

use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, warn};

use crate::caption::{CaptionGenerator, Theme};
use crate::clock::Clock;
use crate::error::{ScheduleError, ScheduleResult, ValidationError};
use crate::event::{Event, EventId};
use crate::event_store::StoreCommand;

/// Work-in-progress values for the post being created or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub target_date: Option<NaiveDate>,
    pub caption: String,
    pub image: Option<String>,
    pub theme: Theme,
}

impl Draft {
    fn empty(day: NaiveDate, theme: Theme) -> Self {
        Draft {
            target_date: Some(day),
            caption: String::new(),
            image: None,
            theme,
        }
    }

    fn from_event(event: &Event, theme: Theme) -> Self {
        Draft {
            target_date: Some(event.date),
            caption: event.title.clone(),
            image: event.image.clone(),
            theme,
        }
    }

    fn has_caption(&self) -> bool {
        !self.caption.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    CreatingNew(Draft),
    Editing { event_id: EventId, draft: Draft },
    ConfirmingOverwrite { event_id: EventId, draft: Draft },
    ConfirmingDelete { event_id: EventId, draft: Draft },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Closed => "closed",
            SessionState::CreatingNew(_) => "creating",
            SessionState::Editing { .. } => "editing",
            SessionState::ConfirmingOverwrite { .. } => "confirming-overwrite",
            SessionState::ConfirmingDelete { .. } => "confirming-delete",
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            SessionState::Closed => None,
            SessionState::CreatingNew(draft)
            | SessionState::Editing { draft, .. }
            | SessionState::ConfirmingOverwrite { draft, .. }
            | SessionState::ConfirmingDelete { draft, .. } => Some(draft),
        }
    }

    /// Draft that the user may currently change (not while a confirmation is shown).
    fn editable_draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            SessionState::CreatingNew(draft) | SessionState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn event_id(&self) -> Option<EventId> {
        match self {
            SessionState::Editing { event_id, .. }
            | SessionState::ConfirmingOverwrite { event_id, .. }
            | SessionState::ConfirmingDelete { event_id, .. } => Some(*event_id),
            _ => None,
        }
    }
}

/// Identifies one outstanding caption generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    session: u64,
    request: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: GenerationTicket,
    pub theme: Theme,
}

/// What the caller has to do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Action does not apply in the current state; nothing changed.
    Ignored,
    /// State or draft changed; re-render.
    Updated,
    /// Apply this to the event store. The session is already closed.
    Commit(StoreCommand),
    /// Run the caption generator and report back with `complete_generation`.
    Generate(GenerationRequest),
}

pub struct SessionController<C> {
    clock: C,
    default_theme: Theme,
    state: SessionState,
    session_seq: u64,
    request_seq: u64,
    pending: Option<GenerationTicket>,
}

impl<C: Clock> SessionController<C> {
    pub fn new(clock: C) -> Self {
        SessionController {
            clock,
            default_theme: Theme::default(),
            state: SessionState::Closed,
            session_seq: 0,
            request_seq: 0,
            pending: None,
        }
    }

    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.state.draft()
    }

    pub fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    /// A caption generation is in flight for this session.
    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // OPENING:

    /// Start a new post on `day`. Days before today are rejected.
    pub fn select_day(&mut self, day: NaiveDate) -> ScheduleResult<Effect> {
        if self.is_open() {
            return Ok(Effect::Ignored);
        }
        self.reject_past(day)?;

        self.open(SessionState::CreatingNew(Draft::empty(day, self.default_theme)));
        Ok(Effect::Updated)
    }

    /// Shortcut for a new post scheduled today.
    pub fn create_for_today(&mut self) -> ScheduleResult<Effect> {
        self.select_day(self.today())
    }

    /// Edit an existing post. Posts on past days are read-only.
    pub fn select_event(&mut self, event: &Event) -> ScheduleResult<Effect> {
        if self.is_open() {
            return Ok(Effect::Ignored);
        }
        self.reject_past(event.date)?;

        self.open(SessionState::Editing {
            event_id: event.id,
            draft: Draft::from_event(event, self.default_theme),
        });
        Ok(Effect::Updated)
    }

    // DRAFT EDITS:

    pub fn set_caption(&mut self, caption: &str) -> Effect {
        self.edit_draft(|draft| draft.caption = caption.to_string())
    }

    /// Change or clear the target date. Past dates are only refused on save.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> Effect {
        self.edit_draft(|draft| draft.target_date = date)
    }

    pub fn set_image(&mut self, image: Option<String>) -> Effect {
        self.edit_draft(|draft| draft.image = image)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Effect {
        self.edit_draft(|draft| draft.theme = theme)
    }

    // CAPTION GENERATION:

    /// Ask for a generated caption.
    ///
    /// Editing a post whose draft already has a caption goes through
    /// `ConfirmingOverwrite` first. New posts and empty drafts generate
    /// straight away. Ignored while a generation is in flight.
    pub fn request_generate_caption(&mut self) -> Effect {
        if self.pending.is_some() {
            debug!("generate ignored, request already in flight");
            return Effect::Ignored;
        }

        match std::mem::take(&mut self.state) {
            SessionState::Editing { event_id, draft } if draft.has_caption() => {
                self.state = SessionState::ConfirmingOverwrite { event_id, draft };
                debug!(%event_id, "asking before caption overwrite");
                Effect::Updated
            }
            state @ (SessionState::CreatingNew(_) | SessionState::Editing { .. }) => {
                self.state = state;
                self.start_generation()
            }
            other => {
                self.state = other;
                Effect::Ignored
            }
        }
    }

    /// Deliver a generator result.
    ///
    /// Results for a closed or replaced session, or for a ticket that is no
    /// longer current, are dropped. A failure leaves the draft as it was.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: ScheduleResult<String>,
    ) -> ScheduleResult<Effect> {
        if self.pending != Some(ticket) || ticket.session != self.session_seq {
            debug!(?ticket, "discarding stale caption result");
            return Ok(Effect::Ignored);
        }
        self.pending = None;

        let caption = result.inspect_err(|e| warn!("caption generation failed: {e}"))?;
        match self.state.editable_draft_mut() {
            Some(draft) => {
                draft.caption = caption;
                Ok(Effect::Updated)
            }
            None => Ok(Effect::Ignored),
        }
    }

    /// Run a generation request to completion against `generator`.
    /// A generator slower than `limit` counts as a failure.
    pub async fn run_generation<G>(
        &mut self,
        generator: &G,
        request: GenerationRequest,
        limit: Duration,
    ) -> ScheduleResult<Effect>
    where
        G: CaptionGenerator + ?Sized,
    {
        let result = match tokio::time::timeout(limit, generator.generate(request.theme)).await {
            Ok(result) => result,
            Err(_) => Err(ScheduleError::Generation(format!(
                "timed out after {}",
                humantime::format_duration(limit)
            ))),
        };
        self.complete_generation(request.ticket, result)
    }

    /// `request_generate_caption` followed by `run_generation` when no
    /// confirmation is needed.
    pub async fn generate_caption<G>(
        &mut self,
        generator: &G,
        limit: Duration,
    ) -> ScheduleResult<Effect>
    where
        G: CaptionGenerator + ?Sized,
    {
        match self.request_generate_caption() {
            Effect::Generate(request) => self.run_generation(generator, request, limit).await,
            other => Ok(other),
        }
    }

    // SAVE / DELETE:

    /// Validate the draft and close the session with a create or update.
    /// On a validation error the session is left untouched. Ignored while a
    /// generation is in flight.
    pub fn save(&mut self) -> ScheduleResult<Effect> {
        if self.pending.is_some() {
            debug!("save ignored, generation in flight");
            return Ok(Effect::Ignored);
        }
        let (event_id, draft) = match &self.state {
            SessionState::CreatingNew(draft) => (None, draft),
            SessionState::Editing { event_id, draft } => (Some(*event_id), draft),
            _ => return Ok(Effect::Ignored),
        };

        if !draft.has_caption() {
            return Err(ValidationError::EmptyCaption.into());
        }
        let date = draft.target_date.ok_or(ValidationError::MissingDate)?;
        self.reject_past(date)?;

        let caption = draft.caption.clone();
        let image = draft.image.clone();
        let command = match event_id {
            None => StoreCommand::Create {
                caption,
                date,
                image,
            },
            Some(id) => StoreCommand::Update {
                id,
                caption,
                date,
                image,
            },
        };

        self.reset();
        Ok(Effect::Commit(command))
    }

    pub fn request_delete(&mut self) -> Effect {
        if self.pending.is_some() {
            return Effect::Ignored;
        }
        match std::mem::take(&mut self.state) {
            SessionState::Editing { event_id, draft } => {
                self.state = SessionState::ConfirmingDelete { event_id, draft };
                Effect::Updated
            }
            other => {
                self.state = other;
                Effect::Ignored
            }
        }
    }

    // CONFIRMATION:

    pub fn confirm(&mut self) -> Effect {
        match std::mem::take(&mut self.state) {
            SessionState::ConfirmingOverwrite { event_id, draft } => {
                self.state = SessionState::Editing { event_id, draft };
                self.start_generation()
            }
            SessionState::ConfirmingDelete { event_id, .. } => {
                self.reset();
                Effect::Commit(StoreCommand::Delete(event_id))
            }
            other => {
                self.state = other;
                Effect::Ignored
            }
        }
    }

    pub fn cancel(&mut self) -> Effect {
        match std::mem::take(&mut self.state) {
            SessionState::ConfirmingOverwrite { event_id, draft }
            | SessionState::ConfirmingDelete { event_id, draft } => {
                self.state = SessionState::Editing { event_id, draft };
                Effect::Updated
            }
            other => {
                self.state = other;
                Effect::Ignored
            }
        }
    }

    /// Discard the draft. Any in-flight generation result will be dropped.
    pub fn close(&mut self) -> Effect {
        if !self.is_open() {
            return Effect::Ignored;
        }
        self.reset();
        Effect::Updated
    }

    // INTERNALS:

    fn reject_past(&self, day: NaiveDate) -> Result<(), ValidationError> {
        let today = self.today();
        if day < today {
            warn!(%day, %today, "refusing past date");
            return Err(ValidationError::PastDate(day));
        }
        Ok(())
    }

    fn open(&mut self, state: SessionState) {
        self.session_seq += 1;
        self.pending = None;
        debug!(session = self.session_seq, state = state.name(), "session opened");
        self.state = state;
    }

    fn reset(&mut self) {
        debug!(session = self.session_seq, "session closed");
        self.state = SessionState::Closed;
        self.pending = None;
    }

    /// Draft edits wait until any pending generation has reported back.
    fn edit_draft(&mut self, apply: impl FnOnce(&mut Draft)) -> Effect {
        if self.pending.is_some() {
            debug!("draft edit ignored, generation in flight");
            return Effect::Ignored;
        }
        match self.state.editable_draft_mut() {
            Some(draft) => {
                apply(draft);
                Effect::Updated
            }
            None => Effect::Ignored,
        }
    }

    fn start_generation(&mut self) -> Effect {
        let Some(theme) = self.state.draft().map(|d| d.theme) else {
            return Effect::Ignored;
        };

        self.request_seq += 1;
        let ticket = GenerationTicket {
            session: self.session_seq,
            request: self.request_seq,
        };
        self.pending = Some(ticket);

        debug!(?ticket, %theme, "caption generation started");
        Effect::Generate(GenerationRequest { ticket, theme })
    }
}
