//src/day.rs
use crate::config::Config;
use crate::focus::FocusTracker;
use crate::model::{parse_reps, DayName, Exercise, Plan, Workout};
use crate::optimistic;
use crate::reorder::{move_item, DragEnd, DragState};
use crate::store::{Store, StoreError};
use crate::{ServiceError, Session};
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{error, info, warn};

/// Construction parameters shared by every day view.
#[derive(Debug, Clone)]
pub struct DayOptions {
    pub new_exercise: Exercise,
    pub scroll_settle: Duration,
    pub transition: Duration,
}

impl DayOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            new_exercise: config.new_exercise.to_exercise(),
            scroll_settle: config.focus.scroll_settle(),
            transition: config.focus.transition(),
        }
    }
}

impl Default for DayOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Loads the workout for a day, deleting a stored workout that has no
/// exercises left. Fetch failures read as "no workout".
pub fn fetch_workout(store: &dyn Store, session: &Session, date: NaiveDate) -> Option<Workout> {
    match store.get_workout(&session.user_id, date) {
        Ok(Some(workout)) if workout.is_empty() => {
            info!(%date, "deleting stored workout without exercises");
            if let Err(e) = store.delete_workout(&session.user_id, date) {
                error!(%date, error = %e, "failed to delete empty workout");
            }
            None
        }
        Ok(workout) => workout,
        Err(e) => {
            warn!(%date, error = %e, "failed to fetch workout, showing none");
            None
        }
    }
}

/// Writes `candidate` for the day, deleting instead of saving when it has no
/// exercises. Returns what the store now holds.
fn persist_workout(
    store: &dyn Store,
    session: &Session,
    date: NaiveDate,
    candidate: &Option<Workout>,
) -> Result<Option<Workout>, StoreError> {
    match candidate {
        Some(workout) if !workout.is_empty() => {
            store.save_workout(&session.user_id, date, workout)?;
            Ok(Some(workout.clone()))
        }
        _ => {
            store.delete_workout(&session.user_id, date)?;
            Ok(None)
        }
    }
}

/// Template update used by "Update Plan Template".
///
/// Plan exercises keep their order. One whose name equals a workout
/// exercise's name takes that exercise's sets; the rest stay untouched.
/// Workout exercises the plan does not know are appended as they are.
pub fn merge_into_plan(plan: &Plan, workout: &Workout) -> Plan {
    let mut exercises: Vec<Exercise> = plan
        .exercises
        .iter()
        .map(|planned| {
            match workout.exercises.iter().find(|done| done.name == planned.name) {
                Some(done) => Exercise {
                    name: planned.name.clone(),
                    sets: done.sets.clone(),
                },
                None => planned.clone(),
            }
        })
        .collect();
    exercises.extend(
        workout
            .exercises
            .iter()
            .filter(|done| !plan.exercises.iter().any(|p| p.name == done.name))
            .cloned(),
    );
    Plan {
        kind: plan.kind.clone(),
        exercises,
    }
}

/// The authoritative in-memory workout of one calendar day and every
/// mutation on it.
#[derive(Debug, Clone)]
pub struct DayView {
    session: Session,
    date: NaiveDate,
    workout: Option<Workout>,
    has_changes: bool,
    edit_mode: bool,
    drag: Option<DragState>,
    new_exercise: Exercise,
    pub focus: FocusTracker,
}

impl DayView {
    pub fn new(
        session: Session,
        date: NaiveDate,
        workout: Option<Workout>,
        options: &DayOptions,
    ) -> Self {
        Self {
            session,
            date,
            workout,
            has_changes: false,
            edit_mode: false,
            drag: None,
            new_exercise: options.new_exercise.clone(),
            focus: FocusTracker::new(options.scroll_settle, options.transition),
        }
    }

    /// Fetches the day's workout (self-healing empty records) and opens it.
    pub fn open(store: &dyn Store, session: Session, date: NaiveDate, options: &DayOptions) -> Self {
        let workout = fetch_workout(store, &session, date);
        Self::new(session, date, workout, options)
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn workout(&self) -> Option<&Workout> {
        self.workout.as_ref()
    }

    pub fn exercises(&self) -> &[Exercise] {
        self.workout
            .as_ref()
            .map_or(&[], |w| w.exercises.as_slice())
    }

    /// Set after an edit until the values are pushed into the plan.
    pub const fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub const fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub const fn drag(&self) -> Option<DragState> {
        self.drag
    }

    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        self.drag = None;
    }

    /// Grabs exercise `index`. Only possible in edit mode.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        if !self.edit_mode || index >= self.exercises().len() {
            return false;
        }
        self.drag = Some(DragState::grab(index));
        true
    }

    pub fn drag_over(&mut self, delta: isize) {
        let len = self.exercises().len();
        if let Some(drag) = self.drag.as_mut() {
            drag.hover_by(delta, len);
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drops the grabbed exercise on the hovered slot.
    pub fn drop_drag(&mut self, store: &dyn Store) -> Result<(), ServiceError> {
        match self.drag.take() {
            Some(drag) => self.handle_drag_end(store, drag.release()),
            None => Ok(()),
        }
    }

    /// Reorders optimistically; a failed save restores the previous order.
    pub fn handle_drag_end(&mut self, store: &dyn Store, event: DragEnd) -> Result<(), ServiceError> {
        let Some((from, to)) = event.resolve() else {
            return Ok(());
        };
        let workout = self.current()?;
        let len = workout.exercises.len();
        if from >= len || to >= len {
            return Err(ServiceError::ExerciseNotFound(from.max(to)));
        }
        let next = Workout {
            kind: workout.kind.clone(),
            exercises: move_item(&workout.exercises, from, to),
        };
        self.persist_change(store, next, false, "reorder exercises")
    }

    /// `raw` may be `"12"` or `"12 reps"`.
    pub fn update_reps(
        &mut self,
        store: &dyn Store,
        exercise: usize,
        set: usize,
        raw: &str,
    ) -> Result<(), ServiceError> {
        let reps = parse_reps(raw)?;
        let mut next = self.current()?.clone();
        let target = next
            .exercises
            .get_mut(exercise)
            .ok_or(ServiceError::ExerciseNotFound(exercise))?
            .sets
            .get_mut(set)
            .ok_or(ServiceError::SetNotFound { exercise, set })?;
        target.reps = reps;
        self.persist_change(store, next, true, "update reps")
    }

    /// Replaces `old_weight` with `new_weight` on every set of the exercise
    /// that carries it.
    pub fn update_weight(
        &mut self,
        store: &dyn Store,
        exercise: usize,
        old_weight: &str,
        new_weight: &str,
    ) -> Result<(), ServiceError> {
        let new_weight = new_weight.trim();
        let mut next = self.current()?.clone();
        let target = next
            .exercises
            .get_mut(exercise)
            .ok_or(ServiceError::ExerciseNotFound(exercise))?;
        for set in target.sets.iter_mut().filter(|s| s.weight == old_weight) {
            set.weight = new_weight.to_string();
        }
        self.persist_change(store, next, true, "update weight")
    }

    pub fn update_name(
        &mut self,
        store: &dyn Store,
        exercise: usize,
        name: &str,
    ) -> Result<(), ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let mut next = self.current()?.clone();
        next.exercises
            .get_mut(exercise)
            .ok_or(ServiceError::ExerciseNotFound(exercise))?
            .name = name.to_string();
        self.persist_change(store, next, true, "rename exercise")
    }

    pub fn add_exercise(&mut self, store: &dyn Store) -> Result<(), ServiceError> {
        let mut next = self.current()?.clone();
        next.exercises.push(self.new_exercise.clone());
        self.persist_change(store, next, true, "add exercise")
    }

    /// Removing the last exercise deletes the whole workout. Refused while
    /// reordering.
    pub fn delete_exercise(&mut self, store: &dyn Store, exercise: usize) -> Result<(), ServiceError> {
        if self.edit_mode {
            return Err(ServiceError::ReorderInProgress);
        }
        let mut next = self.current()?.clone();
        if exercise >= next.exercises.len() {
            return Err(ServiceError::ExerciseNotFound(exercise));
        }
        next.exercises.remove(exercise);
        self.persist_change(store, next, true, "delete exercise")
    }

    /// Pushes the current sets of this workout into the weekday's plan.
    pub fn update_plan_with_current_values(&mut self, store: &dyn Store) -> Result<Plan, ServiceError> {
        let workout = self.current()?;
        let day = DayName::from_date(self.date);
        let plan = store
            .get_plan(&self.session.user_id, day)
            .map_err(|e| {
                error!(%day, error = %e, "failed to load plan");
                e
            })?
            .ok_or(ServiceError::NoPlanForDay(day))?;

        let updated = merge_into_plan(&plan, workout);
        store
            .save_plan(&self.session.user_id, day, &updated)
            .map_err(|e| {
                error!(%day, error = %e, "failed to update plan");
                e
            })?;
        self.has_changes = false;
        info!(%day, date = %self.date, "plan updated from workout");
        Ok(updated)
    }

    /// Creates the day's workout from the weekday's plan.
    pub fn add_sample_workout(&mut self, store: &dyn Store) -> Result<(), ServiceError> {
        if self.workout.is_some() {
            return Err(ServiceError::WorkoutExists(self.date));
        }
        let day = DayName::from_date(self.date);
        let plan = store
            .get_plan(&self.session.user_id, day)?
            .ok_or(ServiceError::NoPlanForDay(day))?;
        if plan.exercises.is_empty() {
            return Err(ServiceError::EmptyPlan(day));
        }
        self.focus.reset();
        self.persist_change(store, Workout::from(&plan), false, "add workout from plan")
    }

    fn current(&self) -> Result<&Workout, ServiceError> {
        self.workout
            .as_ref()
            .ok_or(ServiceError::NoWorkout(self.date))
    }

    fn persist_change(
        &mut self,
        store: &dyn Store,
        next: Workout,
        marks_changes: bool,
        action: &str,
    ) -> Result<(), ServiceError> {
        if self.workout.as_ref() == Some(&next) {
            return Ok(());
        }
        let date = self.date;
        let session = &self.session;
        let result = optimistic::apply(&mut self.workout, Some(next), |candidate| {
            persist_workout(store, session, date, candidate)
        });

        match result {
            Ok(_) => {
                let len = self.exercises().len();
                self.focus.clamp(len);
                if marks_changes {
                    self.has_changes = true;
                }
                match &self.workout {
                    Some(_) => info!(%date, action, "workout saved"),
                    None => info!(%date, action, "workout emptied and deleted"),
                }
                Ok(())
            }
            Err(e) => {
                error!(%date, action, error = %e, "failed to persist workout change");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Set;

    fn exercise(name: &str, weight: &str, reps: &[u32]) -> Exercise {
        Exercise {
            name: name.into(),
            sets: reps.iter().map(|&r| Set::new(weight, r)).collect(),
        }
    }

    #[test]
    fn merge_overwrites_matching_sets_and_keeps_unmatched_plan_exercises() {
        let plan = Plan {
            kind: "Legs".into(),
            exercises: vec![
                exercise("Squat", "60", &[10, 10]),
                exercise("Calf Raise", "40", &[15]),
            ],
        };
        let workout = Workout {
            kind: "Legs".into(),
            exercises: vec![
                exercise("Lunge", "12", &[10]),
                exercise("Squat", "65", &[8, 8, 6]),
            ],
        };

        let merged = merge_into_plan(&plan, &workout);
        assert_eq!(merged.kind, "Legs");
        assert_eq!(merged.exercises[0], exercise("Squat", "65", &[8, 8, 6]));
        assert_eq!(merged.exercises[1], plan.exercises[1]);
        assert_eq!(merged.exercises[2], exercise("Lunge", "12", &[10]));
        assert_eq!(merged.exercises.len(), 3);
    }
}
