// calendar-athlete-tui/src/ui/plans_tab.rs
use crate::app::{App, EditTarget, PlanRow};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render_plans_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let unit = app.service.config.units.weight_label();
    let items: Vec<ListItem> = app
        .plan_rows()
        .into_iter()
        .map(|row| ListItem::new(row_line(app, row, unit)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Weekly Plan"),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.plan_list_state);
}

fn row_line(app: &App, row: PlanRow, unit: &str) -> Line<'static> {
    match row {
        PlanRow::Day(day) => {
            let plan = app.plans.plan_for(day);
            let marker = if app.plans.is_open(day) { "▾" } else { "▸" };
            let kind_style = if plan.is_rest() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Line::from(vec![
                Span::raw(format!("{marker} {:<10}", day.title())),
                Span::styled(plan.kind.clone(), kind_style),
            ])
        }
        PlanRow::Name { day, exercise } => {
            let plan = app.plans.plan_for(day);
            let name = app
                .draft_for(&EditTarget::PlanName { day, exercise })
                .map_or_else(|| plan.exercises[exercise].name.clone(), |d| format!("{d}_"));
            Line::from(vec![
                Span::raw("    "),
                Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            ])
        }
        PlanRow::Reps { day, exercise, set } => {
            let plan = app.plans.plan_for(day);
            let entry = &plan.exercises[exercise].sets[set];
            let reps = app
                .draft_for(&EditTarget::PlanReps { day, exercise, set })
                .map_or_else(|| entry.reps.to_string(), |d| format!("{d}_"));
            Line::from(vec![
                Span::raw(format!("      Set {}: {} {unit} × ", set + 1, entry.weight)),
                Span::styled(reps, Style::default().fg(Color::Yellow)),
                Span::raw(" reps"),
            ])
        }
    }
}
