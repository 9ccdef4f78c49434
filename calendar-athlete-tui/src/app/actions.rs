// src/app/actions.rs
use super::navigation_helpers::step_clamped;
use super::state::{day_fields, ActiveEdit, ActiveModal, App, DayField, EditTarget, PlanRow};
use calendar_athlete_lib::{today, DayName, EditableField, ServiceError};
use std::time::Instant;

/// Scroll units per exercise in the day view.
pub const SCROLL_STEP: usize = 3;

pub fn max_scroll_offset(count: usize) -> usize {
    count * SCROLL_STEP
}

impl App {
    // --- Calendar grid ---

    pub(crate) fn open_cursor_day(&mut self) {
        let result = self
            .calendar
            .select_cursor(self.service.store(), today());
        self.day_field_index = 0;
        self.report(result);
    }

    pub(crate) fn close_day(&mut self) {
        self.editing = None;
        self.calendar.back();
    }

    // --- Day view focus ---

    /// Raw scroll input (j/k, mouse wheel). Focus follows the offset.
    pub(crate) fn scroll_day(&mut self, delta: isize) {
        let Some(day) = self.calendar.day_mut() else {
            return;
        };
        let count = day.exercises().len();
        let max = max_scroll_offset(count);
        let offset = (day.focus.offset() as isize + delta).clamp(0, max as isize) as usize;
        if day.focus.on_scroll(offset, max, count, Instant::now()).is_some() {
            self.day_field_index = 0;
        }
    }

    /// Programmatic jump to the neighbouring exercise (Tab/BackTab).
    pub(crate) fn jump_day_focus(&mut self, delta: isize) {
        let Some(day) = self.calendar.day_mut() else {
            return;
        };
        let count = day.exercises().len();
        let target = step_clamped(day.focus.index(), delta, count);
        if day
            .focus
            .jump_to(target, count, max_scroll_offset(count), Instant::now())
            .is_some()
        {
            self.day_field_index = 0;
        }
    }

    pub(crate) fn move_field_cursor(&mut self, delta: isize) {
        let Some(day) = self.calendar.day() else {
            return;
        };
        let len = day
            .exercises()
            .get(day.focus.index())
            .map_or(0, |ex| day_fields(ex).len());
        self.day_field_index = step_clamped(self.day_field_index, delta, len);
    }

    pub(crate) fn selected_day_field(&self) -> Option<DayField> {
        let day = self.calendar.day()?;
        let exercise = day.exercises().get(day.focus.index())?;
        day_fields(exercise).into_iter().nth(self.day_field_index)
    }

    // --- Day view mutations ---

    pub(crate) fn begin_day_edit(&mut self) {
        let Some(day) = self.calendar.day() else {
            return;
        };
        let index = day.focus.index();
        let Some(exercise) = day.exercises().get(index) else {
            return;
        };
        let Some(selected) = self.selected_day_field() else {
            return;
        };
        let (target, value) = match selected {
            DayField::Name => (EditTarget::DayName { exercise: index }, exercise.name.clone()),
            DayField::Weight(old) => (
                EditTarget::DayWeight {
                    exercise: index,
                    old: old.clone(),
                },
                old,
            ),
            DayField::Reps(set) => (
                EditTarget::DayReps {
                    exercise: index,
                    set,
                },
                exercise.sets[set].reps.to_string(),
            ),
        };

        let mut field = EditableField::new(value);
        field.set_disabled(day.is_edit_mode());
        if field.activate() {
            self.editing = Some(ActiveEdit { target, field });
        } else {
            self.set_error("Finish reordering before editing values".to_string());
        }
    }

    pub(crate) fn add_exercise(&mut self) {
        let store = self.service.store();
        let result = match self.calendar.day_mut() {
            Some(day) => day.add_exercise(store),
            None => Ok(()),
        };
        self.report(result);
    }

    pub(crate) fn delete_focused_exercise(&mut self) {
        let store = self.service.store();
        let result = match self.calendar.day_mut() {
            Some(day) => {
                let index = day.focus.index();
                day.delete_exercise(store, index)
            }
            None => Ok(()),
        };
        self.day_field_index = 0;
        self.report(result);
    }

    pub(crate) fn add_sample_workout(&mut self) {
        let store = self.service.store();
        let result = match self.calendar.day_mut() {
            Some(day) => day.add_sample_workout(store),
            None => Ok(()),
        };
        self.report(result);
    }

    pub(crate) fn push_to_plan(&mut self) {
        let store = self.service.store();
        let Some(day) = self.calendar.day_mut() else {
            return;
        };
        let weekday = DayName::from_date(day.date());
        match day.update_plan_with_current_values(store) {
            Ok(plan) => {
                // Plans tab shows stale data until reloaded
                self.plans_loaded = false;
                self.active_modal = ActiveModal::PlanUpdated {
                    day: weekday,
                    exercise_count: plan.exercises.len(),
                };
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub(crate) fn toggle_edit_order(&mut self) {
        if let Some(day) = self.calendar.day_mut() {
            day.toggle_edit_mode();
        }
    }

    /// Space in edit mode: grab the focused exercise, or drop the grabbed one.
    pub(crate) fn grab_or_drop(&mut self) {
        let store = self.service.store();
        let Some(day) = self.calendar.day_mut() else {
            return;
        };
        if day.drag().is_some() {
            let result = day.drop_drag(store);
            self.report(result);
        } else if !day.begin_drag(day.focus.index()) {
            self.set_error("Press [e] to reorder exercises".to_string());
        }
    }

    // --- Plans tab ---

    pub(crate) fn activate_plan_row(&mut self) {
        match self.selected_plan_row() {
            Some(PlanRow::Day(day)) => self.plans.toggle_day(day),
            Some(PlanRow::Name { day, exercise }) => {
                let value = self.plans.plan_for(day).exercises[exercise].name.clone();
                self.start_edit(EditTarget::PlanName { day, exercise }, value);
            }
            Some(PlanRow::Reps { day, exercise, set }) => {
                let value = self.plans.plan_for(day).exercises[exercise].sets[set]
                    .reps
                    .to_string();
                self.start_edit(EditTarget::PlanReps { day, exercise, set }, value);
            }
            None => {}
        }
    }

    fn start_edit(&mut self, target: EditTarget, value: String) {
        let mut field = EditableField::new(value);
        field.activate();
        self.editing = Some(ActiveEdit { target, field });
    }

    // --- Shared edit commit ---

    pub(crate) fn commit_edit(&mut self) {
        let Some(mut edit) = self.editing.take() else {
            return;
        };
        let Some(value) = edit.field.commit(|v| v.to_owned()) else {
            return;
        };
        let result = self.save_edit(edit.target, &value);
        self.report(result);
    }

    fn save_edit(&mut self, target: EditTarget, value: &str) -> Result<(), ServiceError> {
        let store = self.service.store();
        match target {
            EditTarget::PlanName { day, exercise } => {
                self.plans.update_name(store, day, exercise, value)
            }
            EditTarget::PlanReps { day, exercise, set } => {
                self.plans.update_reps(store, day, exercise, set, value)
            }
            day_target => {
                let Some(day) = self.calendar.day_mut() else {
                    return Ok(());
                };
                match day_target {
                    EditTarget::DayName { exercise } => day.update_name(store, exercise, value),
                    EditTarget::DayWeight { exercise, old } => {
                        day.update_weight(store, exercise, &old, value)
                    }
                    EditTarget::DayReps { exercise, set } => {
                        day.update_reps(store, exercise, set, value)
                    }
                    EditTarget::PlanName { .. } | EditTarget::PlanReps { .. } => Ok(()),
                }
            }
        }
    }
}
