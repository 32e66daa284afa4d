use crate::api::attendance::{AttendanceActionResponse, AttendanceListResponse, AttendanceQuery};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse};
use crate::api::payroll::{CreatePayroll, PaginatedPayrollResponse, PayrollQuery, UpdatePayroll};
use crate::model::account::{AccountDto, AccountStatus};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::payroll::{PayrollRecord, PayrollStatus};
use crate::model::role::Role;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dayflow HR API",
        version = "1.0.0",
        description = r#"
## Dayflow — HR, attendance and payroll

This API powers an HR management system for day-to-day workforce operations.

### 🔹 Key Features
- **Employee Management**
  - Provision, update, list and view employee accounts
- **Attendance Tracking**
  - Daily check-in / check-out with per-day session records and live status
- **Leave Management**
  - Apply for leave, approve/reject requests, and view leave history
- **Payroll Management**
  - Create payroll runs, update amounts, and view payroll records

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Administrative operations (provisioning, leave decisions, payroll) require the **admin** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,

        crate::api::payroll::create_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls
    ),
    components(
        schemas(
            Role,
            AccountDto,
            AccountStatus,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceQuery,
            AttendanceActionResponse,
            AttendanceListResponse,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            PayrollRecord,
            PayrollStatus,
            CreatePayroll,
            UpdatePayroll,
            PayrollQuery,
            PaginatedPayrollResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
