// calendar-athlete-cli/src/cli.rs
use calendar_athlete_lib::{today, DayName};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about = "A calendar of workout logs with a weekly plan template", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print tables as CSV to stdout
    #[arg(long, global = true)]
    pub export_csv: bool,

    /// Use a throwaway in-memory store for this run
    #[arg(long, global = true)]
    pub memory: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Print the path of the config file
    Path,
    /// Switch the user whose workouts are read and written
    SetUser { user_id: String },
    /// Set the weight units used for display
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set the table header color (e.g. "Blue", "darkgreen")
    SetHeaderColor { color: String },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the workout logged on a day
    Show {
        /// Date ('today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY)
        #[arg(default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Print a month with the days that have workouts marked
    Calendar {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
    /// Create the day's workout from the weekday plan
    AddWorkout {
        #[arg(default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Append a new default exercise to the day's workout
    AddExercise {
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Delete an exercise (1-based position); deleting the last one removes the workout
    DeleteExercise {
        exercise: usize,
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Move an exercise from one position to another (1-based)
    Move {
        from: usize,
        to: usize,
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Set the reps of one set (positions are 1-based)
    SetReps {
        exercise: usize,
        set: usize,
        /// Rep count, e.g. "12" or "12 reps"
        reps: String,
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Replace a weight on every set of an exercise that uses it
    SetWeight {
        exercise: usize,
        old: String,
        new: String,
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Rename an exercise of the day's workout
    Rename {
        exercise: usize,
        name: String,
        #[arg(short, long, default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Copy the day's current sets into its weekday plan
    PushPlan {
        #[arg(default_value = "today", value_parser = parse_date_shorthand)]
        date: NaiveDate,
    },
    /// Show the weekly plan (seeds the defaults for a new user)
    Plans {
        /// Only this weekday
        #[arg(value_parser = parse_day_name)]
        day: Option<DayName>,
    },
    /// Rename an exercise in a weekday plan
    PlanRename {
        #[arg(value_parser = parse_day_name)]
        day: DayName,
        exercise: usize,
        name: String,
    },
    /// Set the reps of one set in a weekday plan
    PlanSetReps {
        #[arg(value_parser = parse_day_name)]
        day: DayName,
        exercise: usize,
        set: usize,
        reps: String,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Generate shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Accepts 'today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY and YYYY/MM/DD.
/// The shorthands use the local date, the same clock that refuses future days.
pub fn parse_date_shorthand(s: &str) -> Result<NaiveDate, String> {
    match s.to_lowercase().as_str() {
        "today" => Ok(today()),
        "yesterday" => today()
            .pred_opt()
            .ok_or_else(|| "No date before today.".to_string()),
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
            .map_err(|_| {
                format!("Invalid date format: '{s}'. Use 'today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY, or YYYY/MM/DD.")
            }),
    }
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month: '{s}'. Use YYYY-MM."))
}

pub fn parse_day_name(s: &str) -> Result<DayName, String> {
    DayName::from_str(s.trim()).map_err(|_| format!("Invalid day: '{s}'. Use a weekday name like 'monday'."))
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Command structure for completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dates_parse_in_all_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(parse_date_shorthand("2024-03-04"), Ok(expected));
        assert_eq!(parse_date_shorthand("04.03.2024"), Ok(expected));
        assert_eq!(parse_date_shorthand("2024/03/04"), Ok(expected));
        assert!(parse_date_shorthand("March 4").is_err());
        assert_eq!(parse_month("2024-03"), Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn shorthands_follow_the_local_date() {
        let local = today();
        assert_eq!(parse_date_shorthand("today"), Ok(local));
        assert_eq!(parse_date_shorthand("Yesterday"), Ok(local.pred_opt().unwrap()));
    }

    #[test]
    fn day_names_parse_case_insensitively() {
        assert_eq!(parse_day_name("Friday"), Ok(DayName::Friday));
        assert!(parse_day_name("funday").is_err());
    }

    #[test]
    fn positions_and_date_flag_parse() {
        let cli = Cli::try_parse_from(["ca", "set-reps", "1", "2", "12 reps", "-d", "2024-03-04"]).unwrap();
        match cli.command {
            Commands::SetReps { exercise, set, reps, date } => {
                assert_eq!((exercise, set, reps.as_str()), (1, 2, "12 reps"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
