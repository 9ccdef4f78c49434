//src/calendar.rs
use crate::day::{DayOptions, DayView};
use crate::store::Store;
use crate::{ServiceError, Session};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use tracing::debug;

/// Days after today cannot be opened.
pub fn is_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `"Mar 4 Mon"`, with the year appended outside the current year.
pub fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    let base = format!("{} {} {}", date.format("%b"), date.day(), date.format("%a"));
    if date.year() == today.year() {
        base
    } else {
        format!("{base} {}", date.year())
    }
}

/// Rows of the month view. Each row is one week starting on `week_start`;
/// cells outside the month are `None`.
pub fn month_grid(month: NaiveDate, week_start: Weekday) -> Vec<[Option<NaiveDate>; 7]> {
    let first = first_of_month(month);
    let lead = (7 + first.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut column = lead as usize;
    let mut day = Some(first);
    while let Some(date) = day.filter(|d| d.month() == first.month()) {
        row[column] = Some(date);
        column += 1;
        if column == 7 {
            rows.push(row);
            row = [None; 7];
            column = 0;
        }
        day = date.succ_opt();
    }
    if column > 0 {
        rows.push(row);
    }
    rows
}

#[derive(Debug, Clone)]
pub enum CalendarView {
    Grid,
    Day(Box<DayView>),
}

/// Navigation between the month grid and a single day.
#[derive(Debug, Clone)]
pub struct CalendarShell {
    session: Session,
    options: DayOptions,
    week_start: Weekday,
    cursor: NaiveDate,
    displayed_month: NaiveDate,
    view: CalendarView,
}

impl CalendarShell {
    pub fn new(session: Session, options: DayOptions, week_start: Weekday, today: NaiveDate) -> Self {
        Self {
            session,
            options,
            week_start,
            cursor: today,
            displayed_month: first_of_month(today),
            view: CalendarView::Grid,
        }
    }

    pub const fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn day(&self) -> Option<&DayView> {
        match &self.view {
            CalendarView::Day(day) => Some(day.as_ref()),
            CalendarView::Grid => None,
        }
    }

    pub fn day_mut(&mut self) -> Option<&mut DayView> {
        match &mut self.view {
            CalendarView::Day(day) => Some(day.as_mut()),
            CalendarView::Grid => None,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.day().map(DayView::date)
    }

    pub const fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub const fn displayed_month(&self) -> NaiveDate {
        self.displayed_month
    }

    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        month_grid(self.displayed_month, self.week_start)
    }

    /// Moves the grid cursor; the displayed month follows it.
    pub fn move_cursor(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = date;
            self.displayed_month = first_of_month(date);
        }
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_month(-1);
    }

    fn shift_month(&mut self, delta: i32) {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.displayed_month.checked_add_months(months)
        } else {
            self.displayed_month.checked_sub_months(months)
        };
        if let Some(month) = shifted {
            self.displayed_month = month;
            // Keep the day of month where possible, clamped to the month length.
            let target = self.cursor.day();
            let last = month_grid(month, self.week_start)
                .into_iter()
                .flatten()
                .flatten()
                .last()
                .unwrap_or(month);
            self.cursor = month.with_day(target.min(last.day())).unwrap_or(month);
        }
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) {
        self.cursor = today;
        self.displayed_month = first_of_month(today);
    }

    /// Opens the day view for `date`. Future dates are refused.
    pub fn select_date(
        &mut self,
        store: &dyn Store,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ServiceError> {
        if !is_selectable(date, today) {
            return Err(ServiceError::FutureDate(date));
        }
        debug!(%date, "opening day view");
        self.cursor = date;
        self.displayed_month = first_of_month(date);
        let day = DayView::open(store, self.session.clone(), date, &self.options);
        self.view = CalendarView::Day(Box::new(day));
        Ok(())
    }

    pub fn select_cursor(&mut self, store: &dyn Store, today: NaiveDate) -> Result<(), ServiceError> {
        self.select_date(store, self.cursor, today)
    }

    /// Returns to the grid. `false` when the grid was already shown.
    pub fn back(&mut self) -> bool {
        match self.view {
            CalendarView::Grid => false,
            CalendarView::Day(_) => {
                self.view = CalendarView::Grid;
                true
            }
        }
    }
}
