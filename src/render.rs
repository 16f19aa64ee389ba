//! Terminal rendering for postcal-core types.

use owo_colors::OwoColorize;
use postcal_core::clock::Clock;
use postcal_core::date_grid::{self, CalendarDay, ViewMode, WEEKDAY_LABELS};
use postcal_core::event_index::EventIndex;
use postcal_core::planner::Planner;
use postcal_core::session::{Draft, SessionState};
use postcal_core::Event;

use crate::utils::tui::truncate;

/// Width of one month-view column, excluding the separator.
const CELL_WIDTH: usize = 12;
/// Posts listed per month cell before collapsing into "+n more".
const CELL_POSTS: usize = 2;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let image = if self.image.is_some() { " 🖼" } else { "" };
        format!("{}{}", self.title.blue(), image)
    }
}

impl Render for Draft {
    fn render(&self) -> String {
        let date = self
            .target_date
            .map(|d| d.format("%A, %b %-d %Y").to_string())
            .unwrap_or_else(|| "(no date)".to_string());
        let caption = if self.caption.trim().is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            self.caption.clone()
        };
        let image = if self.image.is_some() { "attached" } else { "none" };

        [
            format!("   {}  {}", "Date:".dimmed(), date),
            format!("   {}  {}", "Caption:".dimmed(), caption),
            format!("   {}  {}", "Image:".dimmed(), image),
            format!("   {}  {}", "Theme:".dimmed(), self.theme.label()),
        ]
        .join("\n")
    }
}

impl Render for SessionState {
    fn render(&self) -> String {
        let heading = match self {
            SessionState::Closed => return String::new(),
            SessionState::CreatingNew(_) => "Schedule Post",
            SessionState::Editing { .. } => "Edit Post",
            SessionState::ConfirmingOverwrite { .. } => "Replace Caption?",
            SessionState::ConfirmingDelete { .. } => "Delete Post?",
        };
        let draft = self.draft().map(|d| d.render()).unwrap_or_default();
        format!("\n  {}\n{}", heading.bold(), draft)
    }
}

/// Full page: title plus month or week body.
pub fn page<C: Clock>(planner: &Planner<C>) -> String {
    let days = planner.grid();
    let index = planner.index();

    let body = match planner.view() {
        ViewMode::Month => month(&days, &index),
        ViewMode::Week => week(&days, &index),
    };

    format!("\n  {}\n\n{}", planner.title().bold(), body)
}

fn month(days: &[CalendarDay], index: &EventIndex) -> String {
    let mut lines = Vec::new();

    let header: Vec<String> = WEEKDAY_LABELS
        .iter()
        .map(|label| format!("{:<width$}", label.to_uppercase(), width = CELL_WIDTH))
        .collect();
    lines.push(format!("    {}", header.join(" ").dimmed()));

    for row in date_grid::weeks(days) {
        let marker = if row.iter().any(|d| d.is_in_current_week) {
            "▸".cyan().to_string()
        } else {
            " ".to_string()
        };

        let numbers: Vec<String> = row.iter().map(day_number).collect();
        lines.push(format!("  {} {}", marker, numbers.join(" ")));

        for slot in 0..=CELL_POSTS {
            let cells: Vec<String> = row.iter().map(|day| post_slot(day, index, slot)).collect();
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            lines.push(format!("    {}", cells.join(" ")));
        }
    }

    lines.join("\n")
}

fn day_number(day: &CalendarDay) -> String {
    let label = if day.is_today {
        format!("{} today", day.date.format("%-d"))
    } else if day.is_in_reference_month {
        day.date.format("%-d").to_string()
    } else {
        day.date.format("%b %-d").to_string()
    };
    let padded = format!("{:<width$}", label, width = CELL_WIDTH);

    if day.is_today {
        padded.bold().green().to_string()
    } else if day.is_past {
        padded.dimmed().to_string()
    } else {
        padded
    }
}

/// One line inside a month cell: a post title, "+n more", or blank.
fn post_slot(day: &CalendarDay, index: &EventIndex, slot: usize) -> String {
    let events = index.for_day(day.date);
    let blank = " ".repeat(CELL_WIDTH);

    let text = if slot < CELL_POSTS {
        match events.get(slot) {
            Some(event) => truncate(&event.title, CELL_WIDTH),
            None => return blank,
        }
    } else if events.len() > CELL_POSTS {
        format!("+{} more", events.len() - CELL_POSTS)
    } else {
        return blank;
    };

    let padded = format!("{:<width$}", text, width = CELL_WIDTH);
    if day.is_past {
        padded.dimmed().to_string()
    } else {
        padded.blue().to_string()
    }
}

fn week(days: &[CalendarDay], index: &EventIndex) -> String {
    let mut lines = Vec::new();

    for day in days {
        let heading = day.date.format("%A, %b %-d").to_string();
        let heading = if day.is_today {
            format!("{} {}", heading.bold().green(), "(today)".green())
        } else if day.is_past {
            heading.dimmed().to_string()
        } else {
            heading.bold().to_string()
        };
        lines.push(format!("  {}", heading));

        let events = index.for_day(day.date);
        if events.is_empty() {
            lines.push(format!("     {}", "no posts".dimmed()));
        }
        for event in events {
            lines.push(format!("   • {}", event.render()));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Label used when picking a post from a list.
pub fn event_choice(event: &Event) -> String {
    format!("{}  {}", event.date.format("%a %b %-d"), truncate(&event.title, 40))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use postcal_core::clock::FixedClock;
    use postcal_core::session::SessionController;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planner_with_posts(view: ViewMode, posts: &[(NaiveDate, &str)]) -> Planner<FixedClock> {
        let mut planner = Planner::new(SessionController::new(FixedClock(date(2025, 6, 1))), view);
        for (day, caption) in posts {
            planner.session_mut().select_day(*day).unwrap();
            planner.session_mut().set_caption(caption);
            planner.save().unwrap();
        }
        planner
    }

    #[test]
    fn month_page_lists_posts_and_title() {
        let planner = planner_with_posts(ViewMode::Month, &[(date(2025, 6, 10), "Launch post")]);
        let page = page(&planner);

        assert!(page.contains("June 2025"));
        assert!(page.contains("SUN"));
        assert!(page.contains("Launch post"));
        assert!(page.contains("1 today"));
    }

    #[test]
    fn month_cell_collapses_extra_posts() {
        let day = date(2025, 6, 12);
        let planner = planner_with_posts(
            ViewMode::Month,
            &[(day, "one"), (day, "two"), (day, "three"), (day, "four")],
        );
        let page = page(&planner);

        assert!(page.contains("one"));
        assert!(page.contains("two"));
        assert!(!page.contains("three"));
        assert!(page.contains("+2 more"));
    }

    #[test]
    fn week_page_shows_each_day() {
        let planner = planner_with_posts(ViewMode::Week, &[(date(2025, 6, 3), "Tuesday post")]);
        let page = page(&planner);

        assert!(page.contains("Week of Jun 1 - Jun 7"));
        assert!(page.contains("Sunday, Jun 1"));
        assert!(page.contains("Saturday, Jun 7"));
        assert!(page.contains("Tuesday post"));
        assert_eq!(page.matches("no posts").count(), 6);
    }

    #[test]
    fn session_panel_headings() {
        let mut session = SessionController::new(FixedClock(date(2025, 6, 1)));
        assert_eq!(session.state().render(), "");

        session.create_for_today().unwrap();
        let panel = session.state().render();
        assert!(panel.contains("Schedule Post"));
        assert!(panel.contains("(empty)"));
        assert!(panel.contains("Motivational"));
    }
}
