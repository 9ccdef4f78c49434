// calendar-athlete-tui/src/ui/tabs.rs
use crate::app::{ActiveTab, App};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Calendar (F1)", "Plans (F2)"];
    let selected = match app.active_tab {
        ActiveTab::Calendar => 0,
        ActiveTab::Plans => 1,
    };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Calendar Athlete ({})", app.service.session.user_id)),
        )
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}
