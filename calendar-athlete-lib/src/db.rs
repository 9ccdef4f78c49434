//src/db.rs
use crate::model::{DayName, Plan, Workout};
use crate::store::{PlanStore, StoreError, WorkoutStore};
use chrono::{NaiveDate, Utc};
use rusqlite::{named_params, params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

const DB_FILE_NAME: &str = "calendar-athlete.sqlite";
const APP_DATA_DIR: &str = "calendar-athlete"; // Same dir name as config

/// The app's data directory, created if missing. Holds the database and log files.
/// Exposed at crate root as get_data_dir_util
pub fn get_data_dir() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir().ok_or(StoreError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir)
}

/// Gets the path to the SQLite database file within the app's data directory.
/// Exposed at crate root as get_db_path_util
pub fn get_db_path() -> Result<PathBuf, StoreError> {
    Ok(get_data_dir()?.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    Ok(conn)
}

/// Initializes the document tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS workouts (
            user_id TEXT NOT NULL,
            date TEXT NOT NULL, -- YYYY-MM-DD
            doc TEXT NOT NULL, -- JSON workout document
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, date)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS plans (
            user_id TEXT NOT NULL,
            day TEXT NOT NULL CHECK(day IN ('monday', 'tuesday', 'wednesday', 'thursday', 'friday', 'saturday', 'sunday')),
            doc TEXT NOT NULL, -- JSON plan document
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, day)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date)",
        [],
    )?;

    Ok(())
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn get_workout(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<Workout>, StoreError> {
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM workouts WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_key(date)],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|d| serde_json::from_str(&d).map_err(StoreError::from))
        .transpose()
}

/// Inserts or replaces the workout document for the day (last write wins).
pub fn upsert_workout(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
    workout: &Workout,
) -> Result<(), StoreError> {
    let doc = serde_json::to_string(workout)?;
    conn.execute(
        "INSERT INTO workouts (user_id, date, doc, updated_at)
         VALUES (:user, :date, :doc, :ts)
         ON CONFLICT(user_id, date) DO UPDATE SET doc = excluded.doc, updated_at = excluded.updated_at",
        named_params! {
            ":user": user_id,
            ":date": date_key(date),
            ":doc": doc,
            ":ts": Utc::now().to_rfc3339(),
        },
    )?;
    debug!(user_id, %date, "workout document written");
    Ok(())
}

/// Deletes the workout for the day. Deleting an absent workout is not an error.
pub fn delete_workout(conn: &Connection, user_id: &str, date: NaiveDate) -> Result<u64, StoreError> {
    let rows_affected = conn.execute(
        "DELETE FROM workouts WHERE user_id = ?1 AND date = ?2",
        params![user_id, date_key(date)],
    )?;
    Ok(rows_affected as u64)
}

pub fn get_plan(conn: &Connection, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError> {
    let doc: Option<String> = conn
        .query_row(
            "SELECT doc FROM plans WHERE user_id = ?1 AND day = ?2",
            params![user_id, day.as_ref()],
            |row| row.get(0),
        )
        .optional()?;
    doc.map(|d| serde_json::from_str(&d).map_err(StoreError::from))
        .transpose()
}

pub fn upsert_plan(
    conn: &Connection,
    user_id: &str,
    day: DayName,
    plan: &Plan,
) -> Result<(), StoreError> {
    let doc = serde_json::to_string(plan)?;
    conn.execute(
        "INSERT INTO plans (user_id, day, doc, updated_at)
         VALUES (:user, :day, :doc, :ts)
         ON CONFLICT(user_id, day) DO UPDATE SET doc = excluded.doc, updated_at = excluded.updated_at",
        named_params! {
            ":user": user_id,
            ":day": day.as_ref(),
            ":doc": doc,
            ":ts": Utc::now().to_rfc3339(),
        },
    )?;
    Ok(())
}

pub fn list_plans(conn: &Connection, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError> {
    let mut stmt = conn.prepare("SELECT day, doc FROM plans WHERE user_id = ?1")?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut plans = BTreeMap::new();
    for row in rows {
        let (day_str, doc) = row?;
        match DayName::from_str(&day_str) {
            Ok(day) => {
                plans.insert(day, serde_json::from_str(&doc)?);
            }
            Err(_) => warn!(day = %day_str, "skipping plan stored under unknown day"),
        }
    }
    Ok(plans)
}

/// `WorkoutStore`/`PlanStore` backed by a local SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and initializes) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(open_db(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl WorkoutStore for SqliteStore {
    fn get_workout(&self, user_id: &str, date: NaiveDate) -> Result<Option<Workout>, StoreError> {
        get_workout(&self.conn, user_id, date)
    }

    fn save_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        workout: &Workout,
    ) -> Result<(), StoreError> {
        upsert_workout(&self.conn, user_id, date, workout)
    }

    fn delete_workout(&self, user_id: &str, date: NaiveDate) -> Result<(), StoreError> {
        delete_workout(&self.conn, user_id, date).map(|_| ())
    }
}

impl PlanStore for SqliteStore {
    fn get_plan(&self, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError> {
        get_plan(&self.conn, user_id, day)
    }

    fn save_plan(&self, user_id: &str, day: DayName, plan: &Plan) -> Result<(), StoreError> {
        upsert_plan(&self.conn, user_id, day, plan)
    }

    fn get_all_plans(&self, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError> {
        list_plans(&self.conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exercise, Set};

    fn bench_day() -> Workout {
        Workout {
            kind: "Push".into(),
            exercises: vec![Exercise {
                name: "Bench".into(),
                sets: vec![Set::new("40", 10), Set::new("40", 8)],
            }],
        }
    }

    #[test]
    fn workout_upsert_replaces_the_document() -> Result<(), StoreError> {
        let store = SqliteStore::open_in_memory()?;
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(store.get_workout("u1", date)?, None);

        let mut workout = bench_day();
        store.save_workout("u1", date, &workout)?;
        workout.exercises[0].sets[1].reps = 9;
        store.save_workout("u1", date, &workout)?;
        assert_eq!(store.get_workout("u1", date)?, Some(workout));

        assert_eq!(delete_workout(store.connection(), "u1", date)?, 1);
        // Deleting again is fine
        assert_eq!(delete_workout(store.connection(), "u1", date)?, 0);
        assert_eq!(store.get_workout("u1", date)?, None);
        Ok(())
    }

    #[test]
    fn plans_are_listed_per_user_by_weekday() -> Result<(), StoreError> {
        let store = SqliteStore::open_in_memory()?;
        let push = Plan {
            kind: "Push".into(),
            exercises: bench_day().exercises,
        };
        store.save_plan("u1", DayName::Monday, &push)?;
        store.save_plan("u1", DayName::Sunday, &Plan::rest())?;
        store.save_plan("u2", DayName::Friday, &Plan::rest())?;

        let plans = store.get_all_plans("u1")?;
        assert_eq!(plans.keys().copied().collect::<Vec<_>>(), vec![DayName::Monday, DayName::Sunday]);
        assert_eq!(plans[&DayName::Monday], push);
        assert_eq!(store.get_plan("u1", DayName::Friday)?, None);

        let stored_key: String = store.connection().query_row(
            "SELECT day FROM plans WHERE user_id = 'u1' AND doc LIKE '%Push%'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(stored_key, "monday");
        Ok(())
    }
}
