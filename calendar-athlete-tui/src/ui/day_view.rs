// calendar-athlete-tui/src/ui/day_view.rs
use crate::app::{day_fields, App, DayField, EditTarget};
use calendar_athlete_lib::{format_date, move_item, today, DayName, DayView, Exercise};
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_day_view(f: &mut Frame, app: &App, area: Rect) {
    let Some(day) = app.calendar.day() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    f.render_widget(Paragraph::new(header_line(day)), chunks[0]);

    let Some(workout) = day.workout() else {
        render_empty_day(f, day, chunks[1]);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", workout.kind))
        .border_style(if day.is_edit_mode() {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let (lines, focus_line) = exercise_lines(app, day);
    // Keep the focused exercise in the upper third of the view
    let scroll = focus_line.saturating_sub(usize::from(chunks[1].height / 3));
    let body = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(body, chunks[1]);
}

fn header_line(day: &DayView) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format_date(day.date(), today()),
        Style::default().bold(),
    )];
    if day.is_edit_mode() {
        spans.push(Span::styled("  [reordering]", Style::default().fg(Color::Magenta)));
    }
    if day.has_changes() {
        spans.push(Span::styled(
            "  changed: [p] update plan template",
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn empty_day_message(date: NaiveDate, today: NaiveDate) -> String {
    format!("No workout found for {}", format_date(date, today))
}

fn render_empty_day(f: &mut Frame, day: &DayView, area: Rect) {
    let weekday = DayName::from_date(day.date()).title();
    let text = vec![
        Line::from(""),
        Line::from(empty_day_message(day.date(), today())),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter/A] Add Workout",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!("from the {weekday} plan"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

// Lines for every exercise plus the index of the focused exercise's first line.
fn exercise_lines<'a>(app: &'a App, day: &'a DayView) -> (Vec<Line<'a>>, usize) {
    let unit = app.service.config.units.weight_label();
    let exercises = day.exercises();

    // While dragging, preview the order the drop would produce
    let (order, moved_to): (Vec<usize>, Option<usize>) = match day.drag() {
        Some(drag) => {
            let indices: Vec<usize> = (0..exercises.len()).collect();
            (move_item(&indices, drag.active, drag.over), Some(drag.over))
        }
        None => ((0..exercises.len()).collect(), None),
    };

    let mut lines = Vec::new();
    let mut focus_line = 0;
    for (position, &index) in order.iter().enumerate() {
        let exercise = &exercises[index];
        let focused = moved_to.is_none() && index == day.focus.index();
        let handle = match moved_to {
            Some(slot) if slot == position => "▶ ",
            _ if day.is_edit_mode() => "≡ ",
            _ => "  ",
        };

        if focused {
            focus_line = lines.len();
            lines.extend(expanded_lines(app, index, exercise, unit, handle));
        } else {
            let style = if moved_to == Some(position) {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(handle),
                Span::styled(exercise.name.clone(), style),
                Span::styled(
                    format!(
                        "  {} {unit} · {} sets",
                        exercise.weight_groups().join("/"),
                        exercise.sets.len()
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
    (lines, focus_line)
}

fn expanded_lines<'a>(
    app: &'a App,
    index: usize,
    exercise: &'a Exercise,
    unit: &'static str,
    handle: &'static str,
) -> Vec<Line<'a>> {
    let fields = day_fields(exercise);
    let selected = fields.get(app.day_field_index);
    let field_style = |field: &DayField| {
        if selected == Some(field) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let name_target = EditTarget::DayName { exercise: index };
    let name = app
        .draft_for(&name_target)
        .map_or_else(|| exercise.name.clone(), |d| format!("{d}_"));
    let mut lines = vec![Line::from(vec![
        Span::raw(handle),
        Span::styled(name, field_style(&DayField::Name).add_modifier(Modifier::BOLD)),
    ])];

    let mut weight_spans = vec![Span::raw("    Weight: ")];
    for (i, weight) in exercise.weight_groups().into_iter().enumerate() {
        if i > 0 {
            weight_spans.push(Span::raw("/"));
        }
        let target = EditTarget::DayWeight {
            exercise: index,
            old: weight.to_string(),
        };
        let text = app
            .draft_for(&target)
            .map_or_else(|| weight.to_string(), |d| format!("{d}_"));
        weight_spans.push(Span::styled(
            text,
            field_style(&DayField::Weight(weight.to_string())),
        ));
    }
    weight_spans.push(Span::raw(format!(" {unit}")));
    lines.push(Line::from(weight_spans));

    for (set, entry) in exercise.sets.iter().enumerate() {
        let target = EditTarget::DayReps { exercise: index, set };
        let reps = app
            .draft_for(&target)
            .map_or_else(|| entry.reps.to_string(), |d| format!("{d}_"));
        lines.push(Line::from(vec![
            Span::raw(format!("    Set {}: ", set + 1)),
            Span::styled(reps, field_style(&DayField::Reps(set))),
            Span::raw(" reps"),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_day_names_the_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(empty_day_message(date, today), "No workout found for Mar 4 Mon");
    }
}
