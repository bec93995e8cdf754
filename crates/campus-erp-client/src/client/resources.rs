//! Paginated resource listings.

use campus_erp_core::PaginationMeta;
use serde::Deserialize;
use serde_json::Value;

use super::CampusErpClient;
use crate::error::{ClientError, Result};

/// A listable resource and the columns shown for it.
///
/// Columns are JSON field names; a dotted name reads a nested object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Resource {
    pub fn path(&self) -> String {
        format!("/api/{}", self.name)
    }
}

pub const RESOURCES: &[Resource] = &[
    Resource {
        name: "users",
        columns: &["username", "first_name", "last_name", "email", "role"],
    },
    Resource {
        name: "departments",
        columns: &["code", "name", "head_name"],
    },
    Resource {
        name: "academic-years",
        columns: &["year", "start_date", "end_date", "is_active"],
    },
    Resource {
        name: "semesters",
        columns: &["name", "academic_year_display", "start_date", "end_date", "is_active"],
    },
    Resource {
        name: "courses",
        columns: &["code", "name", "credits", "department_name", "instructor_name"],
    },
    Resource {
        name: "faculty-profiles",
        columns: &["user_details.username", "position", "department_name", "office_location"],
    },
    Resource {
        name: "publications",
        columns: &["title", "faculty_name", "journal", "citation_count"],
    },
    Resource {
        name: "research-grants",
        columns: &["name", "amount", "deadline", "status"],
    },
    Resource {
        name: "research-projects",
        columns: &["title", "principal_investigator_name", "status", "budget"],
    },
    Resource {
        name: "library-resources",
        columns: &["title", "author", "resource_type", "availability_status"],
    },
    Resource {
        name: "library-borrowings",
        columns: &["resource_details.title", "user_name", "borrow_date", "due_date", "return_date"],
    },
    Resource {
        name: "housing",
        columns: &["building", "room_number", "room_type", "occupied", "capacity", "availability"],
    },
    Resource {
        name: "housing-applications",
        columns: &["student_name", "preferred_building", "room_type", "semester_display", "status"],
    },
    Resource {
        name: "counseling-appointments",
        columns: &["student_name", "counselor_name", "date", "time", "status"],
    },
    Resource {
        name: "health-records",
        columns: &["student_name", "visit_date", "visit_type"],
    },
    Resource {
        name: "fitness-classes",
        columns: &["name", "instructor", "schedule", "enrolled", "capacity"],
    },
    Resource {
        name: "compliance-reports",
        columns: &["title", "report_type", "generated_by_name", "status"],
    },
    Resource {
        name: "audits",
        columns: &["audit_type", "assigned_to_name", "start_date", "due_date", "status"],
    },
];

pub fn find_resource(name: &str) -> Result<Resource> {
    let name = name.trim().trim_matches('/');
    RESOURCES
        .iter()
        .find(|r| r.name == name || r.name.replace('-', "_") == name)
        .copied()
        .ok_or_else(|| ClientError::UnknownResource(name.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ResourcePage {
    pub data: Vec<Value>,
    pub meta: PaginationMeta,
}

impl CampusErpClient {
    pub async fn list_resource(
        &self,
        resource: &Resource,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ResourcePage> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_authorized(&resource.path(), &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_resource_by_path_or_snake_case() {
        assert_eq!(find_resource("courses").unwrap().name, "courses");
        assert_eq!(
            find_resource("library_resources").unwrap().path(),
            "/api/library-resources"
        );
        assert_eq!(find_resource("/audits/").unwrap().name, "audits");
    }

    #[test]
    fn test_unknown_resource() {
        assert!(matches!(
            find_resource("timetables"),
            Err(ClientError::UnknownResource(name)) if name == "timetables"
        ));
    }

    #[test]
    fn test_every_resource_has_columns() {
        assert_eq!(RESOURCES.len(), 18);
        assert!(RESOURCES.iter().all(|r| !r.columns.is_empty()));
    }

    #[test]
    fn test_page_deserializes() {
        let page: ResourcePage = serde_json::from_str(
            r#"{"data":[{"code":"CS"}],"meta":{"total":1,"limit":10,"offset":0,"has_more":false}}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total, 1);
    }
}
