//src/plans.rs
use crate::defaults::default_plans;
use crate::model::{parse_reps, DayName, Plan};
use crate::optimistic;
use crate::store::Store;
use crate::{ServiceError, Session};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Where the editor's plans came from on the last load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Stored,
    /// Nothing was stored; the default week was written.
    Seeded,
    /// The store could not be read. Nothing is shown and nothing is seeded.
    Unavailable,
}

/// Editor over the seven weekday plans, one day expanded at a time.
#[derive(Debug, Clone)]
pub struct PlanEditor {
    session: Session,
    plans: BTreeMap<DayName, Plan>,
    open_day: Option<DayName>,
}

impl PlanEditor {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            plans: BTreeMap::new(),
            open_day: None,
        }
    }

    pub fn load(&mut self, store: &dyn Store) -> PlanSource {
        let stored = match store.get_all_plans(&self.session.user_id) {
            Ok(plans) => plans,
            Err(e) => {
                warn!(error = %e, "failed to fetch plans");
                self.plans.clear();
                return PlanSource::Unavailable;
            }
        };
        if !stored.is_empty() {
            self.plans = stored;
            return PlanSource::Stored;
        }

        let defaults = default_plans();
        for (day, plan) in &defaults {
            if let Err(e) = store.save_plan(&self.session.user_id, *day, plan) {
                error!(%day, error = %e, "failed to save default plan");
            }
        }
        info!(user = %self.session.user_id, "seeded default plans");
        self.plans = defaults;
        PlanSource::Seeded
    }

    pub const fn plans(&self) -> &BTreeMap<DayName, Plan> {
        &self.plans
    }

    /// The stored plan, or a Rest placeholder for a day without one.
    pub fn plan_for(&self, day: DayName) -> Cow<'_, Plan> {
        self.plans
            .get(&day)
            .map_or_else(|| Cow::Owned(Plan::rest()), Cow::Borrowed)
    }

    pub const fn open_day(&self) -> Option<DayName> {
        self.open_day
    }

    pub fn is_open(&self, day: DayName) -> bool {
        self.open_day == Some(day)
    }

    /// Opening a day closes the previously open one; toggling the open day closes it.
    pub fn toggle_day(&mut self, day: DayName) {
        self.open_day = if self.is_open(day) { None } else { Some(day) };
    }

    pub fn update_name(
        &mut self,
        store: &dyn Store,
        day: DayName,
        exercise: usize,
        name: &str,
    ) -> Result<(), ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let mut next = self.plan_for(day).into_owned();
        next.exercises
            .get_mut(exercise)
            .ok_or(ServiceError::ExerciseNotFound(exercise))?
            .name = name.to_string();
        self.persist_day(store, day, next)
    }

    pub fn update_reps(
        &mut self,
        store: &dyn Store,
        day: DayName,
        exercise: usize,
        set: usize,
        raw: &str,
    ) -> Result<(), ServiceError> {
        let reps = parse_reps(raw)?;
        let mut next = self.plan_for(day).into_owned();
        next.exercises
            .get_mut(exercise)
            .ok_or(ServiceError::ExerciseNotFound(exercise))?
            .sets
            .get_mut(set)
            .ok_or(ServiceError::SetNotFound { exercise, set })?
            .reps = reps;
        self.persist_day(store, day, next)
    }

    fn persist_day(&mut self, store: &dyn Store, day: DayName, next: Plan) -> Result<(), ServiceError> {
        let user_id = &self.session.user_id;
        let mut current = self.plans.get(&day).cloned();
        let result = optimistic::apply(&mut current, Some(next), |candidate| match candidate {
            Some(plan) => store.save_plan(user_id, day, plan).map(|()| candidate.clone()),
            None => Ok(None),
        });
        match current {
            Some(plan) => self.plans.insert(day, plan),
            None => self.plans.remove(&day),
        };
        match result {
            Ok(_) => {
                info!(%day, "plan saved");
                Ok(())
            }
            Err(e) => {
                error!(%day, error = %e, "failed to save plan, reverted");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn only_one_day_open_at_a_time() {
        let mut editor = PlanEditor::new(Session::new("u"));
        editor.toggle_day(DayName::Monday);
        editor.toggle_day(DayName::Friday);
        assert!(editor.is_open(DayName::Friday));
        assert!(!editor.is_open(DayName::Monday));
        editor.toggle_day(DayName::Friday);
        assert_eq!(editor.open_day(), None);
    }

    #[test]
    fn missing_day_reads_as_rest() {
        let store = MemoryStore::new();
        let mut editor = PlanEditor::new(Session::new("u"));
        editor.load(&store);
        let mut plans = editor.plans().clone();
        plans.remove(&DayName::Tuesday);
        let sparse = PlanEditor {
            plans,
            ..editor
        };
        assert!(sparse.plan_for(DayName::Tuesday).is_rest());
        assert!(!sparse.plan_for(DayName::Monday).is_rest());
    }
}
