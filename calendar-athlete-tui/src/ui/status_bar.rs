// calendar-athlete-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, ActiveTab, App};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

fn hint_text(app: &App) -> &'static str {
    if app.editing.is_some() {
        return " [Enter] Save | [Esc] Cancel | [Backspace] Delete ";
    }
    match app.active_modal {
        ActiveModal::Help => return " [Esc/Enter/?] Close Help ",
        ActiveModal::PlanUpdated { .. } => return " [Any key] Close ",
        ActiveModal::None => {}
    }
    match app.active_tab {
        ActiveTab::Calendar => match app.calendar.day() {
            None => "[←→/hl] Day | [↑↓/jk] Week | [p/n] Month | [t]oday | [Enter] Open | [?] Help | [Q]uit ",
            Some(day) if day.drag().is_some() => "[↑↓/jk] Move | [Space/Enter] Drop | [Esc] Cancel ",
            Some(day) if day.is_edit_mode() => "[jk] Scroll | [Space] Grab | [e] Done | [Esc] Back ",
            Some(day) if day.workout().is_none() => "[Enter/A] Add from plan | [Esc] Back | [?] Help ",
            Some(_) => "[jk/Tab] Focus | [hl] Field | [Enter] Edit | [a]dd | [x] Delete | [e] Reorder | [p] Plan | [Esc] Back ",
        },
        ActiveTab::Plans => "[↑↓/jk] Nav | [Enter] Open/Edit | [r]eload | [?] Help | [Q]uit ",
    }
}

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(hint_text(app)).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
