use crate::models::contribution::{
    CalendarGrid, ContributionDay, DateRange, GridDay, GridWeek, LevelClass,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

pub const GRID_WEEKS: usize = 53;
pub const DAYS_PER_WEEK: usize = 7;

/// Sunday on or before January 1 of `year`; may fall in the previous year
pub fn grid_start(year: i32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let days_since_sunday = jan_first.weekday().num_days_from_sunday();
    jan_first.checked_sub_signed(Duration::days(days_since_sunday as i64))
}

/// Lay out a year of contributions on a 53 x 7 grid.
///
/// The grid always holds 371 consecutive days starting at [`grid_start`], so
/// the last cells may spill into the following year and, for years that would
/// need a 54th column, the final days of December are not shown. Days missing
/// from `contributions` are rendered as zero. When a date appears twice the
/// later entry is used. Dates outside the grid are ignored.
///
/// Returns `None` only when `year` is outside the range chrono can represent.
pub fn build_calendar_grid(year: i32, contributions: &[ContributionDay]) -> Option<CalendarGrid> {
    let start = grid_start(year)?;
    // Make sure the whole surface is representable before walking it
    start.checked_add_signed(Duration::days((GRID_WEEKS * DAYS_PER_WEEK) as i64 - 1))?;

    let mut contribution_map: HashMap<NaiveDate, &ContributionDay> = HashMap::new();
    for contribution in contributions {
        contribution_map.insert(contribution.date, contribution);
    }

    let mut dates = start.iter_days();
    let weeks = (0..GRID_WEEKS)
        .map(|_| GridWeek {
            days: dates
                .by_ref()
                .take(DAYS_PER_WEEK)
                .map(|date| match contribution_map.get(&date) {
                    Some(day) => GridDay {
                        date,
                        value: day.value,
                        level_class: day.level.level_class(),
                    },
                    None => GridDay {
                        date,
                        value: 0,
                        level_class: LevelClass::Level0,
                    },
                })
                .collect(),
        })
        .collect();

    Some(CalendarGrid { weeks })
}

/// Whole calendar year as a query window, `YYYY-01-01T00:00:00Z` to
/// `YYYY-12-31T23:59:59Z`
pub fn year_range(year: i32) -> Option<DateRange> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    let to = NaiveDate::from_ymd_opt(year, 12, 31)?
        .and_hms_opt(23, 59, 59)?
        .and_utc();
    Some(DateRange { from, to })
}
