use anyhow::Result;
use chrono::NaiveDate;
use postcal_core::clock::SystemClock;
use postcal_core::date_grid::ViewMode;
use postcal_core::planner::Planner;
use postcal_core::session::SessionController;

use crate::render;

/// Print one page of the calendar and exit.
pub fn run(view: ViewMode, date: Option<NaiveDate>) -> Result<()> {
    let mut planner = Planner::new(SessionController::new(SystemClock), view);
    if let Some(date) = date {
        planner.go_to(date);
    }

    println!("{}", render::page(&planner));
    Ok(())
}
