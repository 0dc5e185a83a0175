//! Read-only analytics queries: overview stats, per-metric trends,
//! per-user summaries and category distributions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Metrics accepted by the trends endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TrendMetric {
    Weight,
    Bmi,
    Systolic,
    Diastolic,
    BloodSugar,
    Cholesterol,
}

/// Time windows accepted by the trends endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum TrendPeriod {
    #[strum(serialize = "7d")]
    Week,
    #[default]
    #[strum(serialize = "30d")]
    Month,
    #[strum(serialize = "90d")]
    Quarter,
    #[strum(serialize = "1y")]
    Year,
}

/// Category groupings accepted by the distribution endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DistributionMetric {
    BmiCategory,
    BloodPressureCategory,
    BloodSugarCategory,
}

/// Aggregate stats across the selected records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthOverview {
    pub total_records: i64,
    pub total_users: i64,
    pub avg_bmi: Option<f64>,
    pub avg_systolic: Option<f64>,
    pub avg_diastolic: Option<f64>,
    pub avg_blood_sugar: Option<f64>,
    pub avg_cholesterol: Option<f64>,
}

/// One day's averaged value in a trend series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub value: Option<f64>,
    pub count: i64,
}

/// Trend query result: the metric and period echo the request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSeries {
    pub metric: String,
    pub data: Vec<TrendPoint>,
    pub period: String,
}

/// Per-user health snapshot with the backend's computed score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserHealthSummary {
    pub user_id: i64,
    pub username: String,
    pub latest_record_date: Option<NaiveDateTime>,
    pub bmi: Option<f64>,
    pub health_score: Option<f64>,
    pub risk_level: String,
}

/// One category bucket in a distribution query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionBucket {
    pub category: String,
    pub count: i64,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_match_the_api_paths() {
        assert_eq!(TrendMetric::Weight.to_string(), "weight");
        assert_eq!(TrendMetric::BloodSugar.to_string(), "blood_sugar");
        assert_eq!(DistributionMetric::BmiCategory.to_string(), "bmi_category");
    }

    #[test]
    fn periods_use_the_api_shorthand() {
        assert_eq!(TrendPeriod::Week.to_string(), "7d");
        assert_eq!(TrendPeriod::default().to_string(), "30d");
        assert_eq!(TrendPeriod::Year.to_string(), "1y");
    }

    #[test]
    fn overview_decodes_nullable_averages() {
        let json = r#"{
            "total_records": 42,
            "total_users": 3,
            "avg_bmi": 22.5,
            "avg_systolic": 118.0,
            "avg_diastolic": 76.0,
            "avg_blood_sugar": null,
            "avg_cholesterol": null
        }"#;

        let overview: HealthOverview = serde_json::from_str(json).expect("decode overview");
        assert_eq!(overview.total_records, 42);
        assert!(overview.avg_blood_sugar.is_none());
    }
}
