//src/defaults.rs
use crate::model::{DayName, Exercise, Plan, Set};
use std::collections::BTreeMap;

fn exercise(name: &str, weight: &str, reps: &[u32]) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets: reps.iter().map(|&r| Set::new(weight, r)).collect(),
    }
}

fn plan(kind: &str, exercises: Vec<Exercise>) -> Plan {
    Plan {
        kind: kind.to_string(),
        exercises,
    }
}

/// Weekly template written for users that have no plans stored yet.
pub fn default_plans() -> BTreeMap<DayName, Plan> {
    BTreeMap::from([
        (
            DayName::Monday,
            plan(
                "Push",
                vec![
                    exercise("Bench Press", "40", &[10, 10, 8]),
                    exercise("Overhead Press", "25", &[10, 10, 8]),
                    exercise("Incline Dumbbell Press", "14", &[12, 12, 10]),
                    exercise("Triceps Pushdown", "20", &[12, 12, 12]),
                ],
            ),
        ),
        (
            DayName::Tuesday,
            plan(
                "Pull",
                vec![
                    exercise("Deadlift", "80", &[5, 5, 5]),
                    exercise("Barbell Row", "40", &[10, 10, 8]),
                    exercise("Lat Pulldown", "45", &[12, 10, 10]),
                    exercise("Biceps Curl", "10", &[12, 12, 12]),
                ],
            ),
        ),
        (
            DayName::Wednesday,
            plan(
                "Legs",
                vec![
                    exercise("Squat", "60", &[10, 8, 8]),
                    exercise("Romanian Deadlift", "50", &[10, 10, 10]),
                    exercise("Leg Press", "100", &[12, 12, 10]),
                    exercise("Calf Raise", "40", &[15, 15, 15]),
                ],
            ),
        ),
        (DayName::Thursday, Plan::rest()),
        (
            DayName::Friday,
            plan(
                "Upper",
                vec![
                    exercise("Bench Press", "40", &[8, 8, 8]),
                    exercise("Pull Up", "0", &[8, 8, 6]),
                    exercise("Lateral Raise", "8", &[15, 15, 12]),
                ],
            ),
        ),
        (
            DayName::Saturday,
            plan(
                "Lower",
                vec![
                    exercise("Squat", "60", &[8, 8, 8]),
                    exercise("Hip Thrust", "60", &[12, 12, 10]),
                    exercise("Lunge", "12", &[10, 10, 10]),
                ],
            ),
        ),
        (DayName::Sunday, Plan::rest()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_day_has_a_default() {
        let plans = default_plans();
        for day in DayName::iter() {
            assert!(plans.contains_key(&day), "missing default for {day}");
        }
        assert!(plans.values().filter(|p| p.is_rest()).all(|p| p.exercises.is_empty()));
    }
}
