use anyhow::Result;
use calendar_athlete_lib::{
    AppService, CalendarShell, Config, DayName, DayOptions, DayView, DragEnd, Exercise,
    MemoryStore, Plan, PlanEditor, PlanSource, PlanStore, ServiceError, Session, Set,
    SqliteStore, Store, StoreError, Workout, WorkoutStore,
};
use chrono::{NaiveDate, Weekday};
use std::cell::Cell;
use std::collections::BTreeMap;

const USER: &str = "athlete-1";

// Store wrapper that can be switched to fail reads or writes
struct FlakyStore {
    inner: SqliteStore,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Result<Self> {
        Ok(Self {
            inner: SqliteStore::open_in_memory()?,
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        })
    }

    fn read_guard(&self) -> Result<(), StoreError> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl WorkoutStore for FlakyStore {
    fn get_workout(&self, user_id: &str, date: NaiveDate) -> Result<Option<Workout>, StoreError> {
        self.read_guard()?;
        self.inner.get_workout(user_id, date)
    }

    fn save_workout(&self, user_id: &str, date: NaiveDate, workout: &Workout) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.save_workout(user_id, date, workout)
    }

    fn delete_workout(&self, user_id: &str, date: NaiveDate) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.delete_workout(user_id, date)
    }
}

impl PlanStore for FlakyStore {
    fn get_plan(&self, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError> {
        self.read_guard()?;
        self.inner.get_plan(user_id, day)
    }

    fn save_plan(&self, user_id: &str, day: DayName, plan: &Plan) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.save_plan(user_id, day, plan)
    }

    fn get_all_plans(&self, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError> {
        self.read_guard()?;
        self.inner.get_all_plans(user_id)
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn exercise(name: &str, weight: &str, reps: &[u32]) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets: reps.iter().map(|&r| Set::new(weight, r)).collect(),
    }
}

fn workout(kind: &str, exercises: Vec<Exercise>) -> Workout {
    Workout {
        kind: kind.to_string(),
        exercises,
    }
}

// Stores `stored` for the Monday and opens its day view
fn open_with(store: &dyn Store, stored: &Workout) -> Result<DayView> {
    store.save_workout(USER, monday(), stored)?;
    Ok(DayView::open(
        store,
        Session::new(USER),
        monday(),
        &DayOptions::default(),
    ))
}

#[test]
fn test_deleting_last_exercise_deletes_workout() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = open_with(
        &store,
        &workout("Push", vec![exercise("Bench", "40", &[10, 10])]),
    )?;

    day.delete_exercise(&store, 0)?;

    assert!(day.workout().is_none());
    assert!(store.get_workout(USER, monday())?.is_none());
    Ok(())
}

#[test]
fn test_drag_reorder_is_persisted() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let a = exercise("A", "10", &[5]);
    let b = exercise("B", "20", &[5]);
    let mut day = open_with(&store, &workout("Push", vec![a.clone(), b.clone()]))?;

    day.handle_drag_end(&store, DragEnd { active: 0, over: Some(1) })?;

    let expected = vec![b, a];
    assert_eq!(day.exercises(), expected.as_slice());
    assert_eq!(store.get_workout(USER, monday())?.unwrap().exercises, expected);
    assert!(!day.has_changes(), "reordering is not a value change");
    Ok(())
}

#[test]
fn test_keyboard_drag_moves_grabbed_exercise() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let names = ["A", "B", "C"];
    let mut day = open_with(
        &store,
        &workout("Pull", names.iter().map(|n| exercise(n, "5", &[8])).collect()),
    )?;

    assert!(!day.begin_drag(0), "dragging needs edit mode");
    day.toggle_edit_mode();
    assert!(day.begin_drag(2));
    day.drag_over(-2);
    day.drop_drag(&store)?;

    let order: Vec<&str> = day.exercises().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B"]);
    assert!(day.drag().is_none());
    Ok(())
}

#[test]
fn test_drop_outside_or_on_itself_changes_nothing() -> Result<()> {
    let store = FlakyStore::new()?;
    let mut day = open_with(
        &store,
        &workout("Push", vec![exercise("A", "1", &[1]), exercise("B", "1", &[1])]),
    )?;
    store.fail_writes.set(true);

    day.handle_drag_end(&store, DragEnd { active: 0, over: None })?;
    day.handle_drag_end(&store, DragEnd { active: 1, over: Some(1) })?;

    assert_eq!(day.exercises()[0].name, "A");
    Ok(())
}

#[test]
fn test_failed_reorder_rolls_back() -> Result<()> {
    let store = FlakyStore::new()?;
    let original = workout("Push", vec![exercise("A", "1", &[1]), exercise("B", "1", &[1])]);
    let mut day = open_with(&store, &original)?;
    store.fail_writes.set(true);

    let result = day.handle_drag_end(&store, DragEnd { active: 0, over: Some(1) });

    assert!(matches!(result, Err(ServiceError::Store(_))));
    assert_eq!(day.workout(), Some(&original));
    store.fail_writes.set(false);
    assert_eq!(store.get_workout(USER, monday())?, Some(original));
    Ok(())
}

#[test]
fn test_update_reps_changes_only_that_set() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let stored = workout(
        "Legs",
        vec![
            exercise("Squat", "60", &[10, 10, 10]),
            exercise("Lunge", "12", &[10]),
        ],
    );
    let mut day = open_with(&store, &stored)?;

    day.update_reps(&store, 0, 0, "12 reps")?;

    let mut expected = stored;
    expected.exercises[0].sets[0].reps = 12;
    assert_eq!(store.get_workout(USER, monday())?, Some(expected.clone()));
    assert_eq!(day.workout(), Some(&expected));
    assert!(day.has_changes());
    Ok(())
}

#[test]
fn test_invalid_reps_are_rejected_without_writing() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let stored = workout("Legs", vec![exercise("Squat", "60", &[10])]);
    let mut day = open_with(&store, &stored)?;

    let result = day.update_reps(&store, 0, 0, "ten");

    assert!(matches!(result, Err(ServiceError::InvalidReps(_))));
    assert_eq!(day.workout(), Some(&stored));
    assert!(!day.has_changes());
    Ok(())
}

#[test]
fn test_update_weight_replaces_every_matching_set() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = open_with(
        &store,
        &workout(
            "Push",
            vec![Exercise {
                name: "Bench".into(),
                sets: vec![Set::new("40", 10), Set::new("45", 8), Set::new("40", 6)],
            }],
        ),
    )?;

    day.update_weight(&store, 0, "40", " 42.5 ")?;

    let saved = store.get_workout(USER, monday())?.unwrap();
    let weights: Vec<&str> = saved.exercises[0].sets.iter().map(|s| s.weight.as_str()).collect();
    assert_eq!(weights, vec!["42.5", "45", "42.5"]);
    assert_eq!(saved.exercises[0].weight_groups(), vec!["42.5", "45"]);
    Ok(())
}

#[test]
fn test_rename_exercise_and_reject_blank_name() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = open_with(&store, &workout("Push", vec![exercise("Bench", "40", &[10])]))?;

    assert!(matches!(
        day.update_name(&store, 0, "   "),
        Err(ServiceError::EmptyName)
    ));
    day.update_name(&store, 0, "Incline Bench")?;

    assert_eq!(
        store.get_workout(USER, monday())?.unwrap().exercises[0].name,
        "Incline Bench"
    );
    assert!(matches!(
        day.update_name(&store, 4, "X"),
        Err(ServiceError::ExerciseNotFound(4))
    ));
    Ok(())
}

#[test]
fn test_add_exercise_appends_template() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = open_with(&store, &workout("Push", vec![exercise("Bench", "40", &[10])]))?;

    day.add_exercise(&store)?;

    let saved = store.get_workout(USER, monday())?.unwrap();
    assert_eq!(saved.exercises.len(), 2);
    assert_eq!(saved.exercises[1], exercise("New Exercise", "20", &[12, 12, 12]));
    Ok(())
}

#[test]
fn test_stored_empty_workout_is_deleted_on_open() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let day = open_with(&store, &workout("Push", vec![]))?;

    assert!(day.workout().is_none());
    assert!(store.get_workout(USER, monday())?.is_none());
    Ok(())
}

#[test]
fn test_fetch_failure_shows_no_workout() -> Result<()> {
    let store = FlakyStore::new()?;
    store.save_workout(USER, monday(), &workout("Push", vec![exercise("Bench", "40", &[10])]))?;
    store.fail_reads.set(true);

    let day = DayView::open(&store, Session::new(USER), monday(), &DayOptions::default());

    assert!(day.workout().is_none());
    Ok(())
}

#[test]
fn test_update_plan_keeps_unmatched_plan_exercises() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let plan = Plan {
        kind: "Push".into(),
        exercises: vec![
            exercise("Bench", "40", &[10, 10]),
            exercise("Dips", "0", &[12]),
        ],
    };
    store.save_plan(USER, DayName::Monday, &plan)?;
    let mut day = open_with(
        &store,
        &workout(
            "Push",
            vec![
                exercise("Bench", "45", &[8, 8, 8]),
                exercise("Cable Fly", "15", &[12]),
            ],
        ),
    )?;
    day.update_reps(&store, 0, 2, "6")?;
    assert!(day.has_changes());

    let updated = day.update_plan_with_current_values(&store)?;

    let stored = store.get_plan(USER, DayName::Monday)?.unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stored.exercises[0], exercise("Bench", "45", &[8, 8, 6]));
    assert_eq!(stored.exercises[1], plan.exercises[1]);
    assert_eq!(stored.exercises[2].name, "Cable Fly");
    assert!(!day.has_changes());
    Ok(())
}

#[test]
fn test_update_plan_without_plan_fails() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = open_with(&store, &workout("Push", vec![exercise("Bench", "40", &[10])]))?;

    let result = day.update_plan_with_current_values(&store);

    assert!(matches!(
        result,
        Err(ServiceError::NoPlanForDay(DayName::Monday))
    ));
    Ok(())
}

#[test]
fn test_add_sample_workout_requires_plan() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut day = DayView::open(&store, Session::new(USER), monday(), &DayOptions::default());

    let result = day.add_sample_workout(&store);
    assert!(matches!(
        result,
        Err(ServiceError::NoPlanForDay(DayName::Monday))
    ));
    assert!(result.unwrap_err().to_string().contains("Monday"));

    store.save_plan(USER, DayName::Monday, &Plan::rest())?;
    assert!(matches!(
        day.add_sample_workout(&store),
        Err(ServiceError::EmptyPlan(DayName::Monday))
    ));
    assert!(day.workout().is_none());
    Ok(())
}

#[test]
fn test_add_sample_workout_copies_plan() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let plan = Plan {
        kind: "Push".into(),
        exercises: vec![exercise("Bench", "40", &[10, 10, 8])],
    };
    store.save_plan(USER, DayName::Monday, &plan)?;
    let mut day = DayView::open(&store, Session::new(USER), monday(), &DayOptions::default());

    day.add_sample_workout(&store)?;

    let expected = Workout::from(&plan);
    assert_eq!(day.workout(), Some(&expected));
    assert_eq!(store.get_workout(USER, monday())?, Some(expected));
    assert!(matches!(
        day.add_sample_workout(&store),
        Err(ServiceError::WorkoutExists(_))
    ));
    Ok(())
}

#[test]
fn test_calendar_refuses_future_dates() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let today = monday();
    let mut shell = CalendarShell::new(Session::new(USER), DayOptions::default(), Weekday::Mon, today);

    let tomorrow = today.succ_opt().unwrap();
    assert!(matches!(
        shell.select_date(&store, tomorrow, today),
        Err(ServiceError::FutureDate(_))
    ));
    assert!(shell.day().is_none());

    shell.select_date(&store, today, today)?;
    assert_eq!(shell.selected_date(), Some(today));
    assert!(shell.back());
    assert!(!shell.back());
    Ok(())
}

#[test]
fn test_plans_are_seeded_for_new_user() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let mut editor = PlanEditor::new(Session::new(USER));

    assert_eq!(editor.load(&store), PlanSource::Seeded);
    assert_eq!(store.get_all_plans(USER)?.len(), 7);
    assert!(editor.plan_for(DayName::Thursday).is_rest());

    let mut again = PlanEditor::new(Session::new(USER));
    assert_eq!(again.load(&store), PlanSource::Stored);
    assert_eq!(again.plans(), editor.plans());
    Ok(())
}

#[test]
fn test_plan_load_failure_does_not_seed() -> Result<()> {
    let store = FlakyStore::new()?;
    store.fail_reads.set(true);
    let mut editor = PlanEditor::new(Session::new(USER));

    assert_eq!(editor.load(&store), PlanSource::Unavailable);
    assert!(editor.plans().is_empty());
    store.fail_reads.set(false);
    assert!(store.get_all_plans(USER)?.is_empty());
    Ok(())
}

#[test]
fn test_plan_edit_persists_and_rolls_back_on_failure() -> Result<()> {
    let store = FlakyStore::new()?;
    let mut editor = PlanEditor::new(Session::new(USER));
    editor.load(&store);
    let before = editor.plan_for(DayName::Monday).into_owned();

    editor.update_reps(&store, DayName::Monday, 0, 0, "15")?;
    editor.update_name(&store, DayName::Monday, 1, "Arnold Press")?;
    let saved = store.get_plan(USER, DayName::Monday)?.unwrap();
    assert_eq!(saved.exercises[0].sets[0].reps, 15);
    assert_eq!(saved.exercises[1].name, "Arnold Press");
    assert_eq!(saved.exercises[2..], before.exercises[2..]);

    store.fail_writes.set(true);
    let result = editor.update_reps(&store, DayName::Monday, 0, 0, "3");
    assert!(matches!(result, Err(ServiceError::Store(_))));
    assert_eq!(editor.plan_for(DayName::Monday).exercises[0].sets[0].reps, 15);
    Ok(())
}

#[test]
fn test_users_are_isolated() -> Result<()> {
    let store = MemoryStore::new();
    store.save_workout("a", monday(), &workout("Push", vec![exercise("Bench", "40", &[10])]))?;

    assert!(store.get_workout("b", monday())?.is_none());
    let day = DayView::open(&store, Session::new("b"), monday(), &DayOptions::default());
    assert!(day.workout().is_none());
    Ok(())
}

#[test]
fn test_service_with_memory_store() -> Result<()> {
    let config = Config {
        user_id: USER.to_string(),
        ..Default::default()
    };
    let service = AppService::with_store(config, Box::new(MemoryStore::new()), "test_config.toml".into());

    let (editor, source) = service.load_plans();
    assert_eq!(source, PlanSource::Seeded);
    assert_eq!(editor.plans().len(), 7);

    let mut day = service.open_day(monday())?;
    day.add_sample_workout(service.store())?;
    assert_eq!(
        service.store().get_workout(USER, monday())?.unwrap().kind,
        "Push"
    );
    Ok(())
}

#[test]
fn test_delete_is_refused_while_reordering() -> Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let stored = workout("Push", vec![exercise("A", "1", &[1]), exercise("B", "1", &[1])]);
    let mut day = open_with(&store, &stored)?;
    day.toggle_edit_mode();

    let result = day.delete_exercise(&store, 0);

    assert!(matches!(result, Err(ServiceError::ReorderInProgress)));
    assert_eq!(day.workout(), Some(&stored));
    assert_eq!(store.get_workout(USER, monday())?, Some(stored.clone()));

    day.toggle_edit_mode();
    day.delete_exercise(&store, 0)?;
    assert_eq!(day.exercises().len(), 1);
    Ok(())
}

#[test]
fn test_failed_field_edits_keep_last_saved_workout() -> Result<()> {
    let store = FlakyStore::new()?;
    let stored = workout("Push", vec![exercise("Bench", "40", &[10, 8])]);
    let mut day = open_with(&store, &stored)?;
    store.fail_writes.set(true);

    let attempts = [
        day.update_reps(&store, 0, 1, "9"),
        day.update_weight(&store, 0, "40", "42.5"),
        day.update_name(&store, 0, "Incline Bench"),
        day.add_exercise(&store),
    ];

    for result in attempts {
        assert!(matches!(result, Err(ServiceError::Store(_))));
    }
    assert_eq!(day.workout(), Some(&stored));
    assert!(!day.has_changes());
    store.fail_writes.set(false);
    assert_eq!(store.get_workout(USER, monday())?, Some(stored));
    Ok(())
}

#[test]
fn test_failed_delete_of_last_exercise_keeps_workout() -> Result<()> {
    let store = FlakyStore::new()?;
    let stored = workout("Push", vec![exercise("Bench", "40", &[10])]);
    let mut day = open_with(&store, &stored)?;
    store.fail_writes.set(true);

    let result = day.delete_exercise(&store, 0);

    assert!(matches!(result, Err(ServiceError::Store(_))));
    assert_eq!(day.workout(), Some(&stored));
    assert!(!day.has_changes());
    store.fail_writes.set(false);
    assert_eq!(store.get_workout(USER, monday())?, Some(stored));
    Ok(())
}
