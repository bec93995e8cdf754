pub use campus_erp_models::dashboard::{
    ACTIVITIES_PER_SOURCE, Activity, DashboardStats, HousingOccupancy, RecentActivitiesResponse,
    merge_activities,
};
