// calendar-athlete-tui/src/ui/calendar_tab.rs
use crate::{app::App, ui::day_view::render_day_view};
use calendar_athlete_lib::{is_selectable, today};
use chrono::{Datelike, Days, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub fn render_calendar_tab(f: &mut Frame, app: &mut App, area: Rect) {
    if app.calendar.day().is_some() {
        render_day_view(f, app, area);
    } else {
        render_month_grid(f, app, area);
    }
}

fn render_month_grid(f: &mut Frame, app: &App, area: Rect) {
    let today = today();
    let month = app.calendar.displayed_month();
    let cursor = app.calendar.cursor();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(month.format("%B %Y").to_string())
        .alignment(Alignment::Center)
        .bold();
    f.render_widget(title, chunks[0]);

    // Header follows the configured first day of the week
    let week_start = app.calendar.week_start();
    let header_cells = (0..7u64).map(|offset| {
        let label = first_weekday_date(month, week_start)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .map(|d| d.format("%a").to_string())
            .unwrap_or_default();
        Cell::from(label).style(Style::default().fg(Color::LightBlue))
    });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = app.calendar.grid().into_iter().map(|week| {
        let cells = week.into_iter().map(|slot| match slot {
            Some(date) => Cell::from(format!("{:>3}", date.day())).style(day_style(date, cursor, today)),
            None => Cell::from(""),
        });
        Row::new(cells).height(2)
    });

    let widths = [Constraint::Length(6); 7];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title("Select a day"));

    let grid_area = centered_width(chunks[1], 7 * 7 + 2);
    f.render_widget(table, grid_area);
}

fn day_style(date: NaiveDate, cursor: NaiveDate, today: NaiveDate) -> Style {
    let mut style = Style::default();
    if !is_selectable(date, today) {
        style = style.fg(Color::DarkGray);
    }
    if date == today {
        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    if date == cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

// Any date whose weekday is `week_start`, used to label the header columns.
fn first_weekday_date(month: NaiveDate, week_start: chrono::Weekday) -> Option<NaiveDate> {
    let lead = (7 + month.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    month.checked_sub_days(Days::new(u64::from(lead)))
}

fn centered_width(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
