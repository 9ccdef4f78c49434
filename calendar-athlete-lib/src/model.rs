//src/model.rs
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

pub const REST_TYPE: &str = "Rest";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid rep count")]
pub struct InvalidReps(pub String);

/// Parses a rep count from user input or a stored document.
///
/// Accepts a bare integer (`"12"`) and the display form with a suffix
/// (`"12 reps"`, `"1 rep"`). Everything else is rejected.
pub fn parse_reps(input: &str) -> Result<u32, InvalidReps> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    let number = lower
        .strip_suffix("reps")
        .or_else(|| lower.strip_suffix("rep"))
        .unwrap_or(&lower)
        .trim();
    number
        .parse::<u32>()
        .map_err(|_| InvalidReps(trimmed.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Set {
    #[serde(deserialize_with = "deserialize_weight")]
    pub weight: String,
    #[serde(deserialize_with = "deserialize_reps")]
    pub reps: u32,
}

impl Set {
    pub fn new(weight: impl Into<String>, reps: u32) -> Self {
        Self {
            weight: weight.into(),
            reps,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<Set>,
}

impl Exercise {
    /// Distinct weights in first-seen order, e.g. `["40", "45"]` for display as `40/45`.
    pub fn weight_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for set in &self.sets {
            if !groups.contains(&set.weight.as_str()) {
                groups.push(&set.weight);
            }
        }
        groups
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Workout {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Plan {
    /// Placeholder shown for days that have no stored plan.
    pub fn rest() -> Self {
        Self {
            kind: REST_TYPE.to_string(),
            exercises: Vec::new(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.kind == REST_TYPE
    }
}

impl From<&Plan> for Workout {
    fn from(plan: &Plan) -> Self {
        Self {
            kind: plan.kind.clone(),
            exercises: plan.exercises.clone(),
        }
    }
}

// Store key for plans is the lowercase English weekday name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Capitalized name for headings ("Monday").
    pub const fn title(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayName {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

// Documents written by older clients carry reps as numbers, numeric strings
// or "12 reps"; all of them collapse to the integer form here.
fn deserialize_reps<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawReps {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match RawReps::deserialize(deserializer)? {
        RawReps::Int(n) => u32::try_from(n).map_err(serde::de::Error::custom),
        RawReps::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Ok(f as u32)
        }
        RawReps::Float(f) => Err(serde::de::Error::custom(InvalidReps(f.to_string()))),
        RawReps::Text(s) => parse_reps(&s).map_err(serde::de::Error::custom),
    }
}

fn deserialize_weight<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWeight {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match RawWeight::deserialize(deserializer)? {
        RawWeight::Int(n) => n.to_string(),
        RawWeight::Float(f) => f.to_string(),
        RawWeight::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parse_reps_accepts_suffix_and_whitespace() {
        assert_eq!(parse_reps("12"), Ok(12));
        assert_eq!(parse_reps(" 12 reps "), Ok(12));
        assert_eq!(parse_reps("1 rep"), Ok(1));
        assert_eq!(parse_reps("8Reps"), Ok(8));
        assert!(parse_reps("twelve").is_err());
        assert!(parse_reps("").is_err());
        assert!(parse_reps("-3").is_err());
    }

    #[test]
    fn set_reps_are_canonicalized_when_reading_documents() {
        let json = r#"{"type":"Push","exercises":[{"name":"Bench","sets":[
            {"weight":"40","reps":10},
            {"weight":40,"reps":"10"},
            {"weight":42.5,"reps":"10 reps"}
        ]}]}"#;
        let workout: Workout = serde_json::from_str(json).unwrap();
        let sets = &workout.exercises[0].sets;
        assert!(sets.iter().all(|s| s.reps == 10));
        assert_eq!(sets[1].weight, "40");
        assert_eq!(sets[2].weight, "42.5");
    }

    #[test]
    fn missing_exercises_field_reads_as_empty() {
        let workout: Workout = serde_json::from_str(r#"{"type":"Rest"}"#).unwrap();
        assert!(workout.is_empty());
    }

    #[test]
    fn workout_serializes_type_field() {
        let workout = Workout {
            kind: "Pull".into(),
            exercises: vec![],
        };
        let json = serde_json::to_string(&workout).unwrap();
        assert_eq!(json, r#"{"type":"Pull","exercises":[]}"#);
    }

    #[test]
    fn weight_groups_keep_first_seen_order() {
        let exercise = Exercise {
            name: "Squat".into(),
            sets: vec![Set::new("60", 5), Set::new("70", 5), Set::new("60", 5)],
        };
        assert_eq!(exercise.weight_groups(), vec!["60", "70"]);
    }

    #[test]
    fn day_name_keys_are_lowercase() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(); // a Monday
        assert_eq!(DayName::from_date(date), DayName::Monday);
        assert_eq!(DayName::Monday.to_string(), "monday");
        assert_eq!(DayName::from_str("Friday").unwrap(), DayName::Friday);
        assert_eq!(DayName::Sunday.title(), "Sunday");
    }
}
