// calendar-athlete-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::centered_rect,
};
use ratatui::{
    layout::{Alignment, Margin},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::PlanUpdated {
            day,
            exercise_count,
        } => render_plan_updated_modal(f, day.title(), *exercise_count),
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 80, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" Q: Quit Application"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" F1/F2: Calendar / Plans"),
        Line::from(""),
        Line::from("--- Calendar (F1) ---").style(Style::new().bold().underlined()),
        Line::from(" h/l / ←/→: Previous/Next Day"),
        Line::from(" k/j / ↑/↓: Previous/Next Week"),
        Line::from(" p/n: Previous/Next Month, t: Today"),
        Line::from(" Enter: Open Day (future days are disabled)"),
        Line::from(""),
        Line::from("--- Day View ---").style(Style::new().bold().underlined()),
        Line::from(" k/j, mouse wheel: Scroll Exercises"),
        Line::from(" Tab/Shift-Tab: Jump to Next/Previous Exercise"),
        Line::from(" h/l: Select Field, Enter: Edit Field"),
        Line::from(" a: Add Exercise, x: Delete Exercise"),
        Line::from(" A: Add Workout From Plan"),
        Line::from(" e: Toggle Reorder Mode, Space: Grab/Drop"),
        Line::from(" p: Update Plan Template With These Values"),
        Line::from(" Esc: Back to Calendar"),
        Line::from(""),
        Line::from("--- Plans (F2) ---").style(Style::new().bold().underlined()),
        Line::from(" k/j: Navigate, Enter: Open Day / Edit Field"),
        Line::from(" r: Reload Plans"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_plan_updated_modal(f: &mut Frame, day: &str, exercise_count: usize) {
    let block = Block::default()
        .title("Plan Updated")
        .borders(Borders::ALL)
        .border_style(Style::new().green());
    let area = centered_rect(40, 20, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(format!("The {day} plan now has {exercise_count} exercises.")),
        Line::from(""),
        Line::from(Span::styled(" Press any key ", Style::new().italic().yellow())),
    ];
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}
