use crate::api::leave_request::{
    CreateLeave, DecisionPayload, LeaveActionResponse, LeaveFilter, LeaveListResponse,
    UpdateLeave,
};
use crate::leave::stats::{Bucket, LeaveStatsSnapshot, StatusBreakdown};
use crate::model::leave_request::{LeaveAction, LeaveRequest, LeaveStatus, LeaveType};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Request Lifecycle API",
        version = "1.0.0",
        description = r#"
## Time-Off (Leave) Request Lifecycle Service

Backend for the two-stage leave approval workflow (Department Head → Admin).

### 🔹 Key Features
- **Requests**
  - File, edit and withdraw leave requests while still pending
- **Approvals**
  - Department-head and admin decisions, with date/paid-day adjustments on approve
- **Accounting**
  - Paid/unpaid day splits against configurable per-type yearly entitlements
- **Statistics**
  - Per-employee / per-department / per-year roll-ups by leave type and status

### 🔐 Security
All endpoints require **JWT Bearer authentication**. Decisions are role-scoped:
department heads decide only their own department's first stage, admins decide both.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination and statistics on list endpoints
- Non-fatal entitlement clamps are returned as a `warning` field

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::dept_head_action,
        crate::api::leave_request::admin_action,
    ),
    components(
        schemas(
            LeaveType,
            LeaveStatus,
            LeaveAction,
            LeaveRequest,
            CreateLeave,
            UpdateLeave,
            DecisionPayload,
            LeaveFilter,
            LeaveActionResponse,
            LeaveListResponse,
            Bucket,
            StatusBreakdown,
            LeaveStatsSnapshot
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request lifecycle APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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
