pub mod auth;
pub mod department;
pub mod employee;
pub mod payroll;
pub mod report;

pub use auth::AuthService;
pub use department::DepartmentService;
pub use employee::EmployeeService;
pub use payroll::PayrollService;
pub use report::{ReportFilter, ReportService};
