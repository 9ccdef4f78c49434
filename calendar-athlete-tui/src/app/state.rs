//src/app/state.rs
use calendar_athlete_lib::{
    today, AppService, CalendarShell, DayName, EditableField, Exercise, PlanEditor,
};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

const ERROR_DISPLAY: Duration = Duration::from_secs(5);

// Represents the active UI tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Calendar,
    Plans,
}

// Represents the state of active modals
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    PlanUpdated { day: DayName, exercise_count: usize },
}

/// Editable cell of the focused exercise in the day view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DayField {
    Name,
    Weight(String), // One entry per distinct weight
    Reps(usize),
}

/// Cells of `exercise` in cursor order: name, weight groups, then every set.
pub fn day_fields(exercise: &Exercise) -> Vec<DayField> {
    let mut fields = vec![DayField::Name];
    fields.extend(
        exercise
            .weight_groups()
            .into_iter()
            .map(|w| DayField::Weight(w.to_string())),
    );
    fields.extend((0..exercise.sets.len()).map(DayField::Reps));
    fields
}

/// Row of the plans tab: a day header, or a cell of the open day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanRow {
    Day(DayName),
    Name { day: DayName, exercise: usize },
    Reps { day: DayName, exercise: usize, set: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditTarget {
    DayName { exercise: usize },
    DayWeight { exercise: usize, old: String },
    DayReps { exercise: usize, set: usize },
    PlanName { day: DayName, exercise: usize },
    PlanReps { day: DayName, exercise: usize, set: usize },
}

#[derive(Clone, Debug)]
pub struct ActiveEdit {
    pub target: EditTarget,
    pub field: EditableField,
}

// Holds the application state
pub struct App {
    pub service: AppService, // The core service from the library
    pub active_tab: ActiveTab,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>, // To display errors
    pub editing: Option<ActiveEdit>,

    // === Calendar Tab State ===
    pub calendar: CalendarShell,
    pub day_field_index: usize, // Cursor inside the focused exercise

    // === Plans Tab State ===
    pub plans: PlanEditor,
    pub plans_loaded: bool,
    pub plan_list_state: ListState,

    // For debouncing error messages
    pub(crate) error_clear_time: Option<Instant>,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let calendar = service.calendar(today());
        let plans = service.plan_editor();
        let mut app = Self {
            active_tab: ActiveTab::Calendar,
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            editing: None,
            calendar,
            day_field_index: 0,
            plans,
            plans_loaded: false,
            plan_list_state: ListState::default(),
            error_clear_time: None,
            service, // Move service in
        };
        app.plan_list_state.select(Some(0));
        app
    }

    // Fetch or update data based on the active tab
    pub fn refresh_data_for_active_tab(&mut self) {
        // Clear error message after a delay
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }

        if self.active_tab == ActiveTab::Plans && !self.plans_loaded {
            self.reload_plans();
        }
    }

    pub fn reload_plans(&mut self) {
        let source = self.plans.load(self.service.store());
        self.plans_loaded = true;
        if source == calendar_athlete_lib::PlanSource::Unavailable {
            self.set_error("Could not load plans".to_string());
        }
    }

    pub(crate) fn set_error(&mut self, msg: String) {
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY);
    }

    /// Surfaces a failed operation in the status bar.
    pub(crate) fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            self.set_error(e.to_string());
        }
    }

    pub fn plan_rows(&self) -> Vec<PlanRow> {
        let mut rows = Vec::new();
        for day in DayName::iter() {
            rows.push(PlanRow::Day(day));
            if !self.plans.is_open(day) {
                continue;
            }
            let plan = self.plans.plan_for(day);
            if plan.is_rest() {
                continue;
            }
            for (exercise, ex) in plan.exercises.iter().enumerate() {
                rows.push(PlanRow::Name { day, exercise });
                rows.extend((0..ex.sets.len()).map(|set| PlanRow::Reps { day, exercise, set }));
            }
        }
        rows
    }

    pub fn selected_plan_row(&self) -> Option<PlanRow> {
        let index = self.plan_list_state.selected()?;
        self.plan_rows().get(index).copied()
    }

    /// Draft text for `target` while it is being edited.
    pub fn draft_for(&self, target: &EditTarget) -> Option<&str> {
        self.editing
            .as_ref()
            .filter(|edit| &edit.target == target)
            .map(|edit| edit.field.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar_athlete_lib::Set;

    #[test]
    fn day_fields_list_name_weights_then_sets() {
        let exercise = Exercise {
            name: "Bench".into(),
            sets: vec![Set::new("40", 10), Set::new("45", 8), Set::new("40", 6)],
        };
        assert_eq!(
            day_fields(&exercise),
            vec![
                DayField::Name,
                DayField::Weight("40".into()),
                DayField::Weight("45".into()),
                DayField::Reps(0),
                DayField::Reps(1),
                DayField::Reps(2),
            ]
        );
    }
}
