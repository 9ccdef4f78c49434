// src/lib.rs
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// --- Declare modules ---
pub mod calendar;
mod config;
pub mod day;
pub mod db;
mod defaults;
pub mod editable;
pub mod focus;
pub mod model;
pub mod optimistic;
pub mod plans;
pub mod remote;
pub mod reorder;
pub mod store;

// --- Expose public types ---
pub use calendar::{format_date, is_selectable, month_grid, CalendarShell, CalendarView};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, FocusConfig, NewExerciseConfig, StandardColor,
    StoreBackend, StoreConfig, Theme, Units, WeekStart,
};
pub use day::{merge_into_plan, DayOptions, DayView};
pub use db::{get_data_dir as get_data_dir_util, get_db_path as get_db_path_util, SqliteStore};
pub use defaults::default_plans;
pub use editable::EditableField;
pub use focus::FocusTracker;
pub use model::{parse_reps, DayName, Exercise, InvalidReps, Plan, Set, Workout};
pub use plans::{PlanEditor, PlanSource};
pub use remote::RemoteStore;
pub use reorder::{move_item, DragEnd, DragState};
pub use store::{MemoryStore, PlanStore, Store, StoreError, WorkoutStore};

/// Identity every store call is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("No plan found for {}", .0.title())]
    NoPlanForDay(DayName),
    #[error("The {} plan has no exercises", .0.title())]
    EmptyPlan(DayName),
    #[error(transparent)]
    InvalidReps(#[from] InvalidReps),
    #[error("Exercise name cannot be empty.")]
    EmptyName,
    #[error("No exercise at position {}", .0 + 1)]
    ExerciseNotFound(usize),
    #[error("Exercise {} has no set {}", .exercise + 1, .set + 1)]
    SetNotFound { exercise: usize, set: usize },
    #[error("No workout logged for {0}")]
    NoWorkout(NaiveDate),
    #[error("A workout already exists for {0}")]
    WorkoutExists(NaiveDate),
    #[error("{0} is in the future")]
    FutureDate(NaiveDate),
    #[error("Finish reordering before deleting exercises")]
    ReorderInProgress,
}

pub struct AppService {
    pub config: Config,
    pub store: Box<dyn Store>,
    pub session: Session,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config loading or opening the configured store fails.
    pub fn initialize() -> Result<Self> {
        Self::initialize_with_backend(None)
    }

    /// Like `initialize`, but `backend` replaces the configured store backend
    /// for this run without touching the config file.
    /// # Errors
    /// Returns `anyhow::Error` if config loading or opening the store fails.
    pub fn initialize_with_backend(backend: Option<StoreBackend>) -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;
        let mut store_settings = config.store.clone();
        if let Some(backend) = backend {
            store_settings.backend = backend;
        }
        let store = open_store(&store_settings, &config_path)?;
        info!(backend = ?store_settings.backend, user = %config.user_id, "service initialized");

        Ok(Self {
            session: Session::new(config.user_id.clone()),
            config,
            store,
            config_path,
        })
    }

    /// Service over an explicit store, used by tests and embedders.
    pub fn with_store(config: Config, store: Box<dyn Store>, config_path: PathBuf) -> Self {
        Self {
            session: Session::new(config.user_id.clone()),
            config,
            store,
            config_path,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Switches the active user and persists the choice.
    /// # Errors
    /// - `ConfigError::EmptyUserId` for a blank id.
    /// - `ConfigError` variants if saving fails.
    pub fn set_user_id(&mut self, user_id: &str) -> Result<(), ConfigError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ConfigError::EmptyUserId);
        }
        self.config.user_id = user_id.to_string();
        self.session = Session::new(user_id);
        self.save_config()
    }

    /// Sets the table header color.
    /// # Errors
    /// Returns `ConfigError::InvalidColor` for unknown names, or a save error.
    pub fn set_theme_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    pub fn day_options(&self) -> DayOptions {
        DayOptions::from_config(&self.config)
    }

    pub fn calendar(&self, today: NaiveDate) -> CalendarShell {
        CalendarShell::new(
            self.session.clone(),
            self.day_options(),
            self.config.week_starts_on.into(),
            today,
        )
    }

    pub fn plan_editor(&self) -> PlanEditor {
        PlanEditor::new(self.session.clone())
    }

    /// Opens a day directly, e.g. for one-shot CLI edits.
    /// # Errors
    /// `ServiceError::FutureDate` for dates after today.
    pub fn open_day(&self, date: NaiveDate) -> Result<DayView, ServiceError> {
        if !is_selectable(date, today()) {
            return Err(ServiceError::FutureDate(date));
        }
        Ok(DayView::open(
            self.store(),
            self.session.clone(),
            date,
            &self.day_options(),
        ))
    }

    /// Loads the plans, seeding the defaults for a new user.
    pub fn load_plans(&self) -> (PlanEditor, PlanSource) {
        let mut editor = self.plan_editor();
        let source = editor.load(self.store());
        (editor, source)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn open_store(settings: &StoreConfig, config_path: &Path) -> Result<Box<dyn Store>> {
    match settings.backend {
        StoreBackend::Sqlite => {
            let db_path = match &settings.database_path {
                Some(path) => path.clone(),
                None => db::get_db_path().context("Failed to determine database path")?,
            };
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database at {db_path:?}"))?;
            Ok(Box::new(store))
        }
        StoreBackend::Remote => {
            let url = settings
                .remote_url
                .as_deref()
                .ok_or_else(|| ConfigError::RemoteUrlMissing(config_path.to_path_buf()))?;
            let store = RemoteStore::new(url)
                .with_context(|| format!("Failed to create remote store client for {url}"))?;
            Ok(Box::new(store))
        }
        StoreBackend::Memory => Ok(Box::new(MemoryStore::new())),
    }
}
