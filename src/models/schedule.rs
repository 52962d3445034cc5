//! Instructor availability and blockouts.
//!
//! `day_of_week` is 0 (Sunday) through 6 (Saturday). Storage may hold it
//! as an integer, a numeric string or a weekday name; reads normalize all
//! of them, writes send the numeric text form.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::DataError;

const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Normalize a stored day-of-week value to 0..=6.
pub fn parse_day_of_week(value: &Value) -> Option<u8> {
    let day = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => {
            let s = s.trim().trim_matches('"').to_lowercase();
            match s.parse::<u64>() {
                Ok(n) => n,
                Err(_) if s.len() >= 3 => WEEKDAYS.iter().position(|day| day.starts_with(&s))? as u64,
                Err(_) => return None,
            }
        }
        _ => return None,
    };

    (day <= 6).then_some(day as u8)
}

pub fn validate_day_of_week(day: u8) -> Result<u8, DataError> {
    if day <= 6 {
        Ok(day)
    } else {
        Err(DataError::Validation(format!(
            "day_of_week must be between 0 and 6, got {}",
            day
        )))
    }
}

fn day_as_text<S: Serializer>(day: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&day.to_string())
}

fn optional_day_as_text<S: Serializer>(day: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    match day {
        Some(day) => day_as_text(day, serializer),
        None => serializer.serialize_none(),
    }
}

/// Weekly recurring window in which an instructor can teach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: String,
    pub instructor_id: String,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Row of the `availability` table
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRow {
    pub id: String,
    pub instructor_id: String,
    pub day_of_week: Value,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TryFrom<AvailabilityRow> for Availability {
    type Error = DataError;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        let day_of_week = parse_day_of_week(&row.day_of_week).ok_or_else(|| {
            DataError::Decode(format!(
                "availability {} has unrecognized day_of_week {}",
                row.id, row.day_of_week
            ))
        })?;

        Ok(Self {
            id: row.id,
            instructor_id: row.instructor_id,
            day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAvailability {
    pub instructor_id: String,
    #[serde(serialize_with = "day_as_text")]
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAvailability {
    #[serde(serialize_with = "optional_day_as_text", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

impl UpdateAvailability {
    pub fn is_empty(&self) -> bool {
        self.day_of_week.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Date on which an instructor is unavailable. Missing times mean the
/// whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blockout {
    pub id: String,
    pub instructor_id: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

/// Row of the `blockouts` table
#[derive(Debug, Clone, Deserialize)]
pub struct BlockoutRow {
    pub id: String,
    pub instructor_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<BlockoutRow> for Blockout {
    fn from(row: BlockoutRow) -> Self {
        Self {
            id: row.id,
            instructor_id: row.instructor_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            reason: row.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBlockout {
    pub instructor_id: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBlockout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UpdateBlockout {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.start_time.is_none() && self.end_time.is_none() && self.reason.is_none()
    }
}
