pub use campus_erp_models::compliance::{
    Audit, AuditFilterParams, AuditStatus, ComplianceReport, ComplianceReportFilterParams,
    CreateAuditDto, CreateComplianceReportDto, PaginatedAuditsResponse,
    PaginatedComplianceReportsResponse, ReportStatus, UpdateAuditDto, UpdateComplianceReportDto,
};
pub use campus_erp_models::ids::{AuditId, ComplianceReportId};
