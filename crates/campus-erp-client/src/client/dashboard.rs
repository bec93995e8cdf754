//! Dashboard API operations.

use campus_erp_models::dashboard::{Activity, DashboardStats, RecentActivitiesResponse};

use super::CampusErpClient;
use crate::error::Result;

impl CampusErpClient {
    pub async fn stats(&self) -> Result<DashboardStats> {
        self.get_authorized("/api/stats", &[]).await
    }

    pub async fn recent_activities(&self) -> Result<Vec<Activity>> {
        let response: RecentActivitiesResponse =
            self.get_authorized("/api/recent-activities", &[]).await?;
        Ok(response.activities)
    }
}
