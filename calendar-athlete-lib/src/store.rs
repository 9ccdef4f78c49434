//src/store.rs
use crate::model::{DayName, Plan, Workout};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode or decode document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("Remote store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence of the per-day workout logs, keyed by `(user_id, date)`.
pub trait WorkoutStore {
    fn get_workout(&self, user_id: &str, date: NaiveDate) -> Result<Option<Workout>, StoreError>;
    fn save_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        workout: &Workout,
    ) -> Result<(), StoreError>;
    fn delete_workout(&self, user_id: &str, date: NaiveDate) -> Result<(), StoreError>;
}

/// Persistence of the weekly template, keyed by `(user_id, day)`.
pub trait PlanStore {
    fn get_plan(&self, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError>;
    fn save_plan(&self, user_id: &str, day: DayName, plan: &Plan) -> Result<(), StoreError>;
    /// Every stored plan of the user. Days without a plan are simply absent.
    fn get_all_plans(&self, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError>;
}

pub trait Store: WorkoutStore + PlanStore {}

impl<T: WorkoutStore + PlanStore> Store for T {}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    workouts: RefCell<HashMap<(String, NaiveDate), Workout>>,
    plans: RefCell<HashMap<(String, DayName), Plan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkoutStore for MemoryStore {
    fn get_workout(&self, user_id: &str, date: NaiveDate) -> Result<Option<Workout>, StoreError> {
        Ok(self
            .workouts
            .borrow()
            .get(&(user_id.to_string(), date))
            .cloned())
    }

    fn save_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        workout: &Workout,
    ) -> Result<(), StoreError> {
        self.workouts
            .borrow_mut()
            .insert((user_id.to_string(), date), workout.clone());
        Ok(())
    }

    fn delete_workout(&self, user_id: &str, date: NaiveDate) -> Result<(), StoreError> {
        self.workouts
            .borrow_mut()
            .remove(&(user_id.to_string(), date));
        Ok(())
    }
}

impl PlanStore for MemoryStore {
    fn get_plan(&self, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError> {
        Ok(self
            .plans
            .borrow()
            .get(&(user_id.to_string(), day))
            .cloned())
    }

    fn save_plan(&self, user_id: &str, day: DayName, plan: &Plan) -> Result<(), StoreError> {
        self.plans
            .borrow_mut()
            .insert((user_id.to_string(), day), plan.clone());
        Ok(())
    }

    fn get_all_plans(&self, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError> {
        Ok(self
            .plans
            .borrow()
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|((_, day), plan)| (*day, plan.clone()))
            .collect())
    }
}
