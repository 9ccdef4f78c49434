//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use calendar_athlete_lib::{
    calendar::first_of_month, day::fetch_workout, format_date, month_grid, parse_color, today, AppService, DayName,
    DayView, DragEnd, Plan, PlanSource, Set, StoreBackend, Units, Workout,
};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "CALENDAR_ATHLETE_LOG";

fn main() -> Result<()> {
    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {shell}..."); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout()); // Print script to stdout
        return Ok(()); // Exit after generating script
    }

    // Logs go to stderr so CSV output stays clean
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    tracing::debug!(command = ?cli_args.command, "dispatching");

    // Initialize the application service (loads config, opens the store)
    let backend = cli_args.memory.then_some(StoreBackend::Memory);
    let mut service = AppService::initialize_with_backend(backend)
        .context("Failed to initialize application service")?;
    let header_color = parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Blue); // Fallback
    let units = service.config.units;

    // --- Execute Commands using AppService ---
    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            // This case is handled above, but keep it exhaustive
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Show { date } => {
            let day = service.open_day(date)?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::Calendar { month } => {
            let month = month.unwrap_or_else(|| first_of_month(today()));
            print_month(&service, month, export_csv, header_color)?;
        }
        cli::Commands::AddWorkout { date } => {
            let mut day = service.open_day(date)?;
            day.add_sample_workout(service.store())
                .with_context(|| format!("Error adding workout for {date}"))?;
            println!("Added workout for {} from the {} plan.", format_date(date, today()), DayName::from_date(date).title());
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::AddExercise { date } => {
            let mut day = service.open_day(date)?;
            day.add_exercise(service.store())
                .context("Error adding exercise")?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::DeleteExercise { exercise, date } => {
            let mut day = service.open_day(date)?;
            day.delete_exercise(service.store(), position(exercise)?)
                .context("Error deleting exercise")?;
            if day.workout().is_none() {
                println!("Deleted the last exercise; the workout for {date} was removed.");
            } else {
                print_day(&day, export_csv, header_color, units)?;
            }
        }
        cli::Commands::Move { from, to, date } => {
            let mut day = service.open_day(date)?;
            let event = DragEnd {
                active: position(from)?,
                over: Some(position(to)?),
            };
            day.handle_drag_end(service.store(), event)
                .context("Error moving exercise")?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::SetReps {
            exercise,
            set,
            reps,
            date,
        } => {
            let mut day = service.open_day(date)?;
            day.update_reps(service.store(), position(exercise)?, position(set)?, &reps)
                .context("Error updating reps")?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::SetWeight {
            exercise,
            old,
            new,
            date,
        } => {
            let mut day = service.open_day(date)?;
            day.update_weight(service.store(), position(exercise)?, &old, &new)
                .context("Error updating weight")?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::Rename {
            exercise,
            name,
            date,
        } => {
            let mut day = service.open_day(date)?;
            day.update_name(service.store(), position(exercise)?, &name)
                .context("Error renaming exercise")?;
            print_day(&day, export_csv, header_color, units)?;
        }
        cli::Commands::PushPlan { date } => {
            let mut day = service.open_day(date)?;
            let plan = day
                .update_plan_with_current_values(service.store())
                .context("Error updating plan")?;
            let weekday = DayName::from_date(date);
            println!("Updated the {} plan with the values from {}.", weekday.title(), format_date(date, today()));
            print_plans(&[(weekday, plan)], export_csv, header_color, units)?;
        }
        cli::Commands::Plans { day } => {
            let (editor, source) = service.load_plans();
            match source {
                PlanSource::Unavailable => bail!("Could not load plans from the store."),
                PlanSource::Seeded => eprintln!("No plans stored yet; saved the default week."),
                PlanSource::Stored => {}
            }
            let days: Vec<DayName> = match day {
                Some(d) => vec![d],
                None => DayName::iter().collect(),
            };
            let plans: Vec<(DayName, Plan)> = days
                .into_iter()
                .map(|d| (d, editor.plan_for(d).into_owned()))
                .collect();
            print_plans(&plans, export_csv, header_color, units)?;
        }
        cli::Commands::PlanRename { day, exercise, name } => {
            let (mut editor, _) = service.load_plans();
            editor
                .update_name(service.store(), day, position(exercise)?, &name)
                .context("Error renaming plan exercise")?;
            print_plans(&[(day, editor.plan_for(day).into_owned())], export_csv, header_color, units)?;
        }
        cli::Commands::PlanSetReps {
            day,
            exercise,
            set,
            reps,
        } => {
            let (mut editor, _) = service.load_plans();
            editor
                .update_reps(service.store(), day, position(exercise)?, position(set)?, &reps)
                .context("Error updating plan reps")?;
            print_plans(&[(day, editor.plan_for(day).into_owned())], export_csv, header_color, units)?;
        }
        cli::Commands::Config { action } => match action.unwrap_or(cli::ConfigAction::Show) {
            cli::ConfigAction::Show => print_config(&service, header_color),
            cli::ConfigAction::Path => println!("{}", service.get_config_path().display()),
            cli::ConfigAction::SetUser { user_id } => {
                service.set_user_id(&user_id)?;
                println!("Now logging as '{}'.", service.session.user_id);
            }
            cli::ConfigAction::SetUnits { units } => {
                let units = match units {
                    cli::UnitsCli::Metric => Units::Metric,
                    cli::UnitsCli::Imperial => Units::Imperial,
                };
                service.set_units(units)?;
                println!("Units set to {units:?}.");
            }
            cli::ConfigAction::SetHeaderColor { color } => {
                service.set_theme_header_color(&color)?;
                println!("Header color set to {}.", service.config.theme.header_color);
            }
        },
    }

    Ok(())
}

// 1-based position from the command line to a list index
fn position(value: usize) -> Result<usize> {
    if value == 0 {
        bail!("Positions start at 1.");
    }
    Ok(value - 1)
}

fn sets_summary(sets: &[Set]) -> String {
    sets
        .iter()
        .map(|s| format!("{}×{}", s.weight, s.reps))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_day(day: &DayView, export_csv: bool, header_color: Color, units: Units) -> Result<()> {
    match day.workout() {
        None => {
            println!("No workout logged for {}.", format_date(day.date(), today()));
            Ok(())
        }
        Some(workout) if export_csv => print_workout_csv(day.date(), workout, units),
        Some(workout) => {
            println!("{} · {}", format_date(day.date(), today()), workout.kind);
            print_workout_table(workout, header_color, units);
            if day.has_changes() {
                println!("Run `ca push-plan {}` to copy these values into the plan.", day.date());
            }
            Ok(())
        }
    }
}

fn print_workout_table(workout: &Workout, header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Sets (weight×reps)").fg(header_color),
        ]);

    for (i, exercise) in workout.exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&exercise.name).add_attribute(Attribute::Bold),
            Cell::new(exercise.weight_groups().join("/")),
            Cell::new(sets_summary(&exercise.sets)),
        ]);
    }
    println!("{table}");
}

fn print_workout_csv(date: NaiveDate, workout: &Workout, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Date",
        "Type",
        "Position",
        "Exercise",
        "Set",
        &format!("Weight_{}", units.weight_label()),
        "Reps",
    ])?;
    for (i, exercise) in workout.exercises.iter().enumerate() {
        for (s, set) in exercise.sets.iter().enumerate() {
            writer.write_record([
                date.to_string(),
                workout.kind.clone(),
                (i + 1).to_string(),
                exercise.name.clone(),
                (s + 1).to_string(),
                set.weight.clone(),
                set.reps.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn print_plans(
    plans: &[(DayName, Plan)],
    export_csv: bool,
    header_color: Color,
    units: Units,
) -> Result<()> {
    if export_csv {
        let mut writer = csv::Writer::from_writer(io::stdout());
        writer.write_record(["Day", "Type", "Position", "Exercise", "Set", &format!("Weight_{}", units.weight_label()), "Reps"])?;
        for (day, plan) in plans {
            for (i, exercise) in plan.exercises.iter().enumerate() {
                for (s, set) in exercise.sets.iter().enumerate() {
                    writer.write_record([
                        day.to_string(),
                        plan.kind.clone(),
                        (i + 1).to_string(),
                        exercise.name.clone(),
                        (s + 1).to_string(),
                        set.weight.clone(),
                        set.reps.to_string(),
                    ])?;
                }
            }
        }
        writer.flush()?;
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Day").fg(header_color),
            Cell::new("Type").fg(header_color),
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new(format!("Sets (weight {}×reps)", units.weight_label())).fg(header_color),
        ]);
    for (day, plan) in plans {
        // Rest days get a single row without exercises
        if plan.is_rest() || plan.exercises.is_empty() {
            table.add_row(vec![
                Cell::new(day.title()),
                Cell::new(&plan.kind),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]);
            continue;
        }
        for (i, exercise) in plan.exercises.iter().enumerate() {
            let (day_cell, kind_cell) = if i == 0 {
                (day.title(), plan.kind.as_str())
            } else {
                ("", "")
            };
            table.add_row(vec![
                Cell::new(day_cell),
                Cell::new(kind_cell),
                Cell::new(i + 1),
                Cell::new(&exercise.name),
                Cell::new(sets_summary(&exercise.sets)),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

fn print_month(service: &AppService, month: NaiveDate, export_csv: bool, header_color: Color) -> Result<()> {
    let today = today();
    let grid = month_grid(month, service.config.week_starts_on.into());
    // Same rules as opening the day: failures and empty workouts read as none
    let logged = |date: NaiveDate| fetch_workout(service.store(), &service.session, date);

    if export_csv {
        let mut writer = csv::Writer::from_writer(io::stdout());
        writer.write_record(["Date", "Type", "Exercises"])?;
        for date in grid.iter().flatten().flatten() {
            if let Some(workout) = logged(*date) {
                writer.write_record([
                    date.to_string(),
                    workout.kind.clone(),
                    workout.exercises.len().to_string(),
                ])?;
            }
        }
        writer.flush()?;
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(
        week_labels(service.config.week_starts_on.into())
            .into_iter()
            .map(|label| Cell::new(label).fg(header_color))
            .collect::<Vec<_>>(),
    );

    for week in &grid {
        let row: Vec<Cell> = week
            .iter()
            .map(|slot| match slot {
                None => Cell::new(""),
                Some(date) => {
                    let mut text = date.day().to_string();
                    if let Some(workout) = logged(*date) {
                        text = format!("{text}\n{}", workout.kind);
                    }
                    let mut cell = Cell::new(text);
                    if *date == today {
                        cell = cell.add_attribute(Attribute::Bold).fg(Color::Yellow);
                    } else if *date > today {
                        cell = cell.fg(Color::DarkGrey);
                    }
                    cell
                }
            })
            .collect();
        table.add_row(row);
    }
    println!("{}", month.format("%B %Y"));
    println!("{table}");
    Ok(())
}

fn week_labels(week_start: chrono::Weekday) -> Vec<String> {
    let mut labels = Vec::with_capacity(7);
    let mut day = week_start;
    for _ in 0..7 {
        labels.push(day.to_string());
        day = day.succ();
    }
    labels
}

fn print_config(service: &AppService, header_color: Color) {
    let config = &service.config;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Setting").fg(header_color),
            Cell::new("Value").fg(header_color),
        ]);
    let rows = [
        ("Config file", service.get_config_path().display().to_string()),
        ("User", config.user_id.clone()),
        ("Units", format!("{:?}", config.units)),
        ("Week starts on", format!("{:?}", config.week_starts_on)),
        ("Store backend", format!("{:?}", config.store.backend)),
        ("Remote URL", config.store.remote_url.clone().unwrap_or_else(|| "-".to_string())),
        (
            "Database path",
            config
                .store
                .database_path
                .as_ref()
                .map_or_else(|| "(default)".to_string(), |p| p.display().to_string()),
        ),
        (
            "New exercise",
            format!(
                "{} ({} × {} {} × {})",
                config.new_exercise.name,
                config.new_exercise.sets,
                config.new_exercise.weight,
                config.units.weight_label(),
                config.new_exercise.reps
            ),
        ),
        (
            "Focus timing",
            format!(
                "transition {} ms, scroll settle {} ms",
                config.focus.transition_ms, config.focus.scroll_settle_ms
            ),
        ),
        ("Header color", config.theme.header_color.clone()),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{table}");
}
