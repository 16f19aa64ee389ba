use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;
use postcal_core::caption::{CaptionGenerator, Theme};
use postcal_core::clock::Clock;
use postcal_core::date_grid::ViewMode;
use postcal_core::image::ImageEncoder;
use postcal_core::planner::Planner;
use postcal_core::session::{Effect, GenerationRequest, SessionState};
use postcal_core::ScheduleError;
use tracing::{debug, warn};

use crate::dates::parse_date;
use crate::render::{self, Render};
use crate::utils::tui;

/// External collaborators the interactive loop hands to the session.
pub struct Collaborators<'a> {
    pub generator: &'a dyn CaptionGenerator,
    pub encoder: &'a dyn ImageEncoder,
    pub caption_timeout: Duration,
}

#[derive(Clone, Copy)]
enum CalendarAction {
    Previous,
    Next,
    ToggleView,
    GoTo,
    CreateToday,
    OpenDay,
    OpenPost,
    Quit,
}

#[derive(Clone, Copy)]
enum DraftAction {
    EditCaption,
    ChangeDate,
    AttachImage,
    RemoveImage,
    ChooseTheme,
    GenerateCaption,
    Delete,
    Save,
    Close,
}

pub async fn run<C: Clock>(mut planner: Planner<C>, tools: Collaborators<'_>) -> Result<()> {
    loop {
        println!("{}", render::page(&planner));

        if !calendar_menu(&mut planner)? {
            return Ok(());
        }

        while planner.session().is_open() {
            println!("{}", planner.session().state().render());
            session_step(&mut planner, &tools).await?;
        }
    }
}

/// Returns false when the user quits.
fn calendar_menu<C: Clock>(planner: &mut Planner<C>) -> Result<bool> {
    let toggle_label = match planner.view() {
        ViewMode::Month => "Switch to week view",
        ViewMode::Week => "Switch to month view",
    };

    let mut actions = vec![
        (CalendarAction::Next, "Next"),
        (CalendarAction::Previous, "Previous"),
        (CalendarAction::ToggleView, toggle_label),
        (CalendarAction::GoTo, "Go to date"),
        (CalendarAction::CreateToday, "Create post"),
        (CalendarAction::OpenDay, "Schedule on a day"),
    ];
    if !planner.visible_events().is_empty() {
        actions.push((CalendarAction::OpenPost, "Open a post"));
    }
    actions.push((CalendarAction::Quit, "Quit"));

    let labels: Vec<&str> = actions.iter().map(|(_, label)| *label).collect();
    let selection = Select::new()
        .with_prompt("  Calendar")
        .items(&labels)
        .default(0)
        .interact()?;

    match actions[selection].0 {
        CalendarAction::Next => planner.next(),
        CalendarAction::Previous => planner.previous(),
        CalendarAction::ToggleView => planner.toggle_view(),
        CalendarAction::GoTo => {
            if let Some(date) = prompt_date("  Go to", None)? {
                planner.go_to(date);
            }
        }
        CalendarAction::CreateToday => report(planner.session_mut().create_for_today()),
        CalendarAction::OpenDay => {
            if let Some(day) = prompt_date("  Which day?", None)? {
                report(planner.session_mut().select_day(day));
            }
        }
        CalendarAction::OpenPost => {
            let events: Vec<_> = planner.visible_events().into_iter().cloned().collect();
            let labels: Vec<String> = events.iter().map(render::event_choice).collect();
            let selection = Select::new()
                .with_prompt("  Post")
                .items(&labels)
                .default(0)
                .interact()?;
            report(planner.session_mut().select_event(&events[selection]));
        }
        CalendarAction::Quit => return Ok(false),
    }

    Ok(true)
}

async fn session_step<C: Clock>(planner: &mut Planner<C>, tools: &Collaborators<'_>) -> Result<()> {
    match planner.session().state() {
        SessionState::Closed => Ok(()),
        SessionState::CreatingNew(_) | SessionState::Editing { .. } => {
            draft_menu(planner, tools).await
        }
        SessionState::ConfirmingOverwrite { .. } => {
            let replace = Confirm::new()
                .with_prompt("  This will overwrite your current caption. Continue?")
                .default(false)
                .interact()?;

            if !replace {
                planner.session_mut().cancel();
                return Ok(());
            }
            if let Effect::Generate(request) = planner.confirm()? {
                generate(planner, tools, request).await;
            }
            Ok(())
        }
        SessionState::ConfirmingDelete { .. } => {
            let delete = Confirm::new()
                .with_prompt("  This will permanently remove this post from your calendar. Are you sure?")
                .default(false)
                .interact()?;

            if delete {
                planner.confirm()?;
                println!("{}", "  Post deleted".green());
            } else {
                planner.session_mut().cancel();
            }
            Ok(())
        }
    }
}

async fn draft_menu<C: Clock>(planner: &mut Planner<C>, tools: &Collaborators<'_>) -> Result<()> {
    let session = planner.session();
    let Some(draft) = session.draft().cloned() else {
        return Ok(());
    };
    let editing = session.state().event_id().is_some();

    let theme_label = format!("Theme: {}", draft.theme.label());
    let mut actions = vec![
        (DraftAction::EditCaption, "Edit caption".to_string()),
        (DraftAction::GenerateCaption, "Generate caption".to_string()),
        (DraftAction::ChooseTheme, theme_label),
        (DraftAction::ChangeDate, "Change date".to_string()),
    ];
    if draft.image.is_some() {
        actions.push((DraftAction::RemoveImage, "Remove image".to_string()));
    } else {
        actions.push((DraftAction::AttachImage, "Upload image".to_string()));
    }
    if editing {
        actions.push((DraftAction::Delete, "Delete".to_string()));
    }
    let save_label = if editing { "Update post" } else { "Schedule post" };
    actions.push((DraftAction::Save, save_label.to_string()));
    actions.push((DraftAction::Close, "Cancel".to_string()));

    let labels: Vec<&str> = actions.iter().map(|(_, label)| label.as_str()).collect();
    let selection = Select::new()
        .with_prompt("  Post")
        .items(&labels)
        .default(0)
        .interact()?;

    let session = planner.session_mut();
    match actions[selection].0 {
        DraftAction::EditCaption => {
            let caption: String = Input::new()
                .with_prompt("  Caption")
                .with_initial_text(draft.caption)
                .allow_empty(true)
                .interact_text()?;
            session.set_caption(&caption);
        }
        DraftAction::ChangeDate => {
            let date = prompt_date("  Post date (empty clears)", draft.target_date)?;
            if date.is_some_and(|d| d < session.today()) {
                eprintln!("  {}", "Cannot schedule in the past".red());
            }
            session.set_date(date);
        }
        DraftAction::AttachImage => {
            let path: String = Input::new().with_prompt("  Image file").interact_text()?;
            match tools.encoder.encode_file(Path::new(path.trim())) {
                Ok(image) => {
                    session.set_image(Some(image));
                }
                Err(e) => {
                    warn!(path = path.trim(), error = %e, "image upload failed");
                    eprintln!("  {}", e.to_string().red());
                }
            }
        }
        DraftAction::RemoveImage => {
            session.set_image(None);
        }
        DraftAction::ChooseTheme => {
            let labels: Vec<&str> = Theme::ALL.iter().map(|t| t.label()).collect();
            let current = Theme::ALL.iter().position(|t| *t == draft.theme).unwrap_or(0);
            let selection = Select::new()
                .with_prompt("  Theme")
                .items(&labels)
                .default(current)
                .interact()?;
            session.set_theme(Theme::ALL[selection]);
        }
        DraftAction::GenerateCaption => {
            if let Effect::Generate(request) = session.request_generate_caption() {
                generate(planner, tools, request).await;
            }
        }
        DraftAction::Delete => {
            session.request_delete();
        }
        DraftAction::Save => match planner.save() {
            Ok(Some(event)) => {
                let verb = if editing { "Updated" } else { "Scheduled" };
                println!(
                    "{}",
                    format!("  {}: {} on {}", verb, event.title, event.date).green()
                );
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "save rejected");
                eprintln!("  {}", e.to_string().red());
            }
        },
        DraftAction::Close => {
            session.close();
        }
    }

    Ok(())
}

/// Run one generation with a spinner. Failures are shown and leave the draft as it was.
async fn generate<C: Clock>(
    planner: &mut Planner<C>,
    tools: &Collaborators<'_>,
    request: GenerationRequest,
) {
    let spinner = tui::create_spinner(format!("Writing a {} caption", request.theme));
    let result = planner
        .session_mut()
        .run_generation(tools.generator, request, tools.caption_timeout)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(effect) => debug!(?effect, "caption generation finished"),
        Err(e) => {
            warn!(error = %e, "caption generation failed");
            eprintln!("  {}", format!("{e}. Try again.").red());
        }
    }
}

/// Prompt for a day with retry on parse errors. Empty input yields `None`.
fn prompt_date(prompt: &str, initial: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let initial = initial
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .with_initial_text(initial.clone())
            .allow_empty(true)
            .interact_text()?;

        if input.trim().is_empty() {
            return Ok(None);
        }
        match parse_date(&input) {
            Ok(date) => return Ok(Some(date)),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Show a rejected session action without leaving the loop.
fn report(result: Result<Effect, ScheduleError>) {
    if let Err(e) = result {
        debug!(error = %e, "action rejected");
        eprintln!("  {}", e.to_string().red());
    }
}
