// src/app/input.rs
use super::{
    navigation_helpers::{list_clamp, list_next, list_previous},
    state::{ActiveModal, ActiveTab, App},
};
use anyhow::Result;
use calendar_athlete_lib::today;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // An open inline edit captures every key
        if self.editing.is_some() {
            self.handle_edit_input(key);
            return Ok(());
        }

        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
            return Ok(());
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::F(1) => self.active_tab = ActiveTab::Calendar,
            KeyCode::F(2) => self.active_tab = ActiveTab::Plans,
            _ => {
                // Delegate to tab-specific handler
                match self.active_tab {
                    ActiveTab::Calendar if self.calendar.day().is_some() => {
                        self.handle_day_input(key);
                    }
                    ActiveTab::Calendar => self.handle_grid_input(key),
                    ActiveTab::Plans => self.handle_plans_input(key),
                }
            }
        }
        Ok(())
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.active_tab != ActiveTab::Calendar || self.editing.is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_day(1),
            MouseEventKind::ScrollUp => self.scroll_day(-1),
            _ => {}
        }
    }

    fn handle_edit_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Esc => self.editing = None,
            KeyCode::Backspace => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.field.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.field.insert_char(c);
                }
            }
            _ => {}
        }
    }

    // --- Modal Input Handling ---
    fn handle_modal_input(&mut self, key: KeyEvent) {
        match self.active_modal {
            ActiveModal::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
                    self.active_modal = ActiveModal::None;
                }
                _ => {} // Ignore other keys in help
            },
            // Any key dismisses the confirmation
            ActiveModal::PlanUpdated { .. } => self.active_modal = ActiveModal::None,
            ActiveModal::None => {}
        }
    }

    // --- Tab-Specific Input Handling ---
    fn handle_grid_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.calendar.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => self.calendar.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.calendar.move_cursor(-7),
            KeyCode::Char('j') | KeyCode::Down => self.calendar.move_cursor(7),
            KeyCode::Char('n') | KeyCode::PageDown => self.calendar.next_month(),
            KeyCode::Char('p') | KeyCode::PageUp => self.calendar.prev_month(),
            KeyCode::Char('t') => self.calendar.jump_to_today(today()),
            KeyCode::Enter => self.open_cursor_day(),
            _ => {}
        }
    }

    fn handle_day_input(&mut self, key: KeyEvent) {
        let dragging = self
            .calendar
            .day()
            .is_some_and(|day| day.drag().is_some());
        if dragging {
            match key.code {
                KeyCode::Char('k') | KeyCode::Up => self.drag_over(-1),
                KeyCode::Char('j') | KeyCode::Down => self.drag_over(1),
                KeyCode::Char(' ') | KeyCode::Enter => self.grab_or_drop(),
                KeyCode::Esc => {
                    if let Some(day) = self.calendar.day_mut() {
                        day.cancel_drag();
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.close_day(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_day(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_day(-1),
            KeyCode::Tab => self.jump_day_focus(1),
            KeyCode::BackTab => self.jump_day_focus(-1),
            KeyCode::Char('h') | KeyCode::Left => self.move_field_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_field_cursor(1),
            KeyCode::Enter => {
                let has_workout = self
                    .calendar
                    .day()
                    .is_some_and(|day| day.workout().is_some());
                if has_workout {
                    self.begin_day_edit();
                } else {
                    self.add_sample_workout();
                }
            }
            KeyCode::Char('A') => self.add_sample_workout(),
            KeyCode::Char('a') => self.add_exercise(),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_focused_exercise(),
            KeyCode::Char('e') => self.toggle_edit_order(),
            KeyCode::Char(' ') => self.grab_or_drop(),
            KeyCode::Char('p') => self.push_to_plan(),
            _ => {}
        }
    }

    fn drag_over(&mut self, delta: isize) {
        if let Some(day) = self.calendar.day_mut() {
            day.drag_over(delta);
        }
    }

    fn handle_plans_input(&mut self, key: KeyEvent) {
        let len = self.plan_rows().len();
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => list_previous(&mut self.plan_list_state, len),
            KeyCode::Char('j') | KeyCode::Down => list_next(&mut self.plan_list_state, len),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_plan_row(),
            KeyCode::Char('r') => self.reload_plans(),
            _ => {}
        }
        // Opening or closing a day changes the row count
        let len = self.plan_rows().len();
        list_clamp(&mut self.plan_list_state, len);
    }
}
