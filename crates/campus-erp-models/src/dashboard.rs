//! Dashboard aggregates and the recent-activity feed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rows taken from each activity source before merging.
pub const ACTIVITIES_PER_SOURCE: i64 = 5;
/// Length of the merged feed.
pub const ACTIVITY_FEED_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HousingOccupancy {
    pub total_capacity: i64,
    pub total_occupied: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    /// Users with the `student` role
    pub total_students: i64,
    /// Faculty profiles on record
    pub total_faculty: i64,
    pub total_departments: i64,
    /// Courses scheduled in an active semester
    pub active_courses: i64,
    pub library_resources: i64,
    pub housing_occupancy: HousingOccupancy,
    /// Research projects in progress
    pub research_projects: i64,
    /// Approved compliance reports
    pub compliance_score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Library,
    Housing,
    Counseling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    /// ISO-8601 date or timestamp
    pub date: String,
}

impl Activity {
    pub fn borrowing(user_name: &str, title: &str, borrow_date: NaiveDate) -> Self {
        Self {
            kind: ActivityKind::Library,
            description: format!("{} borrowed {}", user_name, title),
            date: borrow_date.to_string(),
        }
    }

    pub fn housing_application(student_name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            kind: ActivityKind::Housing,
            description: format!("New housing application from {}", student_name),
            date: created_at.to_rfc3339(),
        }
    }

    pub fn counseling(student_name: &str, date: NaiveDate) -> Self {
        Self {
            kind: ActivityKind::Counseling,
            description: format!("Counseling session scheduled for {}", student_name),
            date: date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentActivitiesResponse {
    pub activities: Vec<Activity>,
}

/// Most recent first, capped at [`ACTIVITY_FEED_LIMIT`].
///
/// Dates compare as strings. A timestamp sorts after the bare date of the
/// same day. Ties keep source order.
pub fn merge_activities(sources: impl IntoIterator<Item = Vec<Activity>>) -> Vec<Activity> {
    let mut activities: Vec<Activity> = sources.into_iter().flatten().collect();
    activities.sort_by(|a, b| b.date.cmp(&a.date));
    activities.truncate(ACTIVITY_FEED_LIMIT);
    activities
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_descriptions() {
        let a = Activity::borrowing("Jane Doe", "Dune", date(2, 1));
        assert_eq!(a.description, "Jane Doe borrowed Dune");
        assert_eq!(a.date, "2025-02-01");

        let created = Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap();
        let h = Activity::housing_application("Jane Doe", created);
        assert_eq!(h.description, "New housing application from Jane Doe");
        assert!(h.date.starts_with("2025-02-03T10:00:00"));

        let c = Activity::counseling("Jane Doe", date(2, 4));
        assert_eq!(c.description, "Counseling session scheduled for Jane Doe");
    }

    #[test]
    fn test_merge_sorts_descending_and_caps() {
        let library: Vec<Activity> = (1..=5)
            .map(|d| Activity::borrowing("A", "Book", date(1, d)))
            .collect();
        let counseling: Vec<Activity> = (10..=14)
            .map(|d| Activity::counseling("B", date(1, d)))
            .collect();
        let housing = vec![Activity::housing_application(
            "C",
            Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap(),
        )];

        let merged = merge_activities([library, housing, counseling]);
        assert_eq!(merged.len(), ACTIVITY_FEED_LIMIT);
        assert_eq!(merged[0].kind, ActivityKind::Housing);
        assert_eq!(merged[1].date, "2025-01-14");
        assert!(merged.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(merged.last().unwrap().date, "2025-01-02");
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_activities(Vec::<Vec<Activity>>::new()).is_empty());
    }

    #[test]
    fn test_activity_serializes_type_key() {
        let json = serde_json::to_value(Activity::counseling("B", date(3, 1))).unwrap();
        assert_eq!(json["type"], "counseling");
        assert_eq!(json["date"], "2025-03-01");
    }
}
