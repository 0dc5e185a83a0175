//! Typed rows for the health-data, exercise-log and sleep-record collections.
//!
//! Create payloads and response rows are separate types: the backend assigns
//! ids and timestamps, and response datetimes come back without an offset.

use bon::Builder;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating one vitals row
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct NewHealthRecord {
    pub user_id: i64,
    pub record_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic_pressure: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic_pressure: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_sugar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
}

/// One vitals row as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    pub record_id: i64,
    pub user_id: i64,
    pub record_date: NaiveDateTime,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub systolic_pressure: Option<i32>,
    pub diastolic_pressure: Option<i32>,
    pub blood_sugar: Option<f64>,
    pub cholesterol: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload for logging one workout
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct NewExerciseLog {
    pub user_id: i64,
    #[builder(into)]
    pub exercise_type: String,
    pub duration_minutes: i32,
    pub log_date: NaiveDate,
}

/// One workout row as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub log_id: i64,
    pub user_id: i64,
    pub exercise_type: String,
    pub duration_minutes: i32,
    pub log_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload for recording one night of sleep.
///
/// `bedtime`/`wake_time` are full instants (the night may span midnight);
/// `sleep_date` is the calendar night being recorded.
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct NewSleepRecord {
    pub user_id: i64,
    pub sleep_date: NaiveDate,
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<f64>,
    /// 1-10 self-reported score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub notes: Option<String>,
}

/// One sleep row as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepRecord {
    pub sleep_id: i64,
    pub user_id: i64,
    pub sleep_date: NaiveDate,
    pub bedtime: Option<NaiveDateTime>,
    pub wake_time: Option<NaiveDateTime>,
    pub sleep_duration: Option<f64>,
    pub sleep_quality: Option<i32>,
    pub deep_sleep_hours: Option<f64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_health_record_omits_absent_fields() {
        let record = NewHealthRecord::builder()
            .user_id(7)
            .record_date(NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"))
            .weight(72.5)
            .build();

        let json = serde_json::to_value(&record).expect("encode record");
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["record_date"], "2025-06-01");
        assert_eq!(json["weight"], 72.5);
        assert!(json.get("height").is_none());
        assert!(json.get("cholesterol").is_none());
    }

    #[test]
    fn health_record_decodes_backend_row() {
        let json = r#"{
            "record_id": 12,
            "user_id": 7,
            "record_date": "2025-06-01T00:00:00",
            "height": 180.0,
            "weight": 72.5,
            "systolic_pressure": 120,
            "diastolic_pressure": 80,
            "blood_sugar": null,
            "cholesterol": null,
            "created_at": "2025-06-01T08:30:00",
            "updated_at": "2025-06-01T08:30:00"
        }"#;

        let record: HealthRecord = serde_json::from_str(json).expect("decode row");
        assert_eq!(record.record_id, 12);
        assert_eq!(record.systolic_pressure, Some(120));
        assert!(record.blood_sugar.is_none());
    }

    #[test]
    fn sleep_record_round_trip_shapes() {
        let new = NewSleepRecord::builder()
            .user_id(7)
            .sleep_date(NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"))
            .bedtime("2025-06-01T22:30:00Z".parse().expect("valid instant"))
            .wake_time("2025-06-02T06:30:00Z".parse().expect("valid instant"))
            .sleep_duration(8.0)
            .sleep_quality(8)
            .build();

        let json = serde_json::to_value(&new).expect("encode sleep");
        assert_eq!(json["sleep_date"], "2025-06-01");
        assert!(json.get("notes").is_none());

        let row = r#"{
            "sleep_id": 3,
            "user_id": 7,
            "sleep_date": "2025-06-01",
            "bedtime": "2025-06-01T22:30:00",
            "wake_time": "2025-06-02T06:30:00",
            "sleep_duration": 8.0,
            "sleep_quality": 8,
            "deep_sleep_hours": 2.5,
            "notes": null,
            "created_at": "2025-06-02T07:00:00",
            "updated_at": "2025-06-02T07:00:00"
        }"#;
        let record: SleepRecord = serde_json::from_str(row).expect("decode sleep row");
        assert_eq!(record.sleep_quality, Some(8));
        assert!(record.notes.is_none());
    }
}
