use crate::auth::auth::AuthUser;
use crate::leave::{accounting, calendar, policy, state, stats};
use crate::leave::error::LeaveError;
use crate::leave::state::Stage;
use crate::model::leave_request::{
    LeaveAction, LeaveRequest, LeaveRequestRow, LeaveStatus, LeaveType,
};
use crate::model::role::Role;
use crate::utils::db_utils::{SqlUpdate, SqlValue};
use crate::utils::{directory, entitlement_cache, holiday_cache};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Employee to file for; admins only. Defaults to the caller's own record.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
}

/// Payload for either approval stage. On approve the decider may adjust the
/// dates and the paid-day count as a condition of approval; the split is then
/// re-derived before the transition commits.
#[derive(Deserialize, ToSchema)]
pub struct DecisionPayload {
    #[schema(example = "approved")]
    pub action: LeaveAction,
    /// Mandatory for rejections.
    #[schema(example = "insufficient coverage")]
    pub comment: Option<String>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = 3)]
    pub paid_leave: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    pub leave_type: Option<LeaveType>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID (admins and dept heads)
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by department ID (admins; dept heads are pinned to their own)
    #[schema(example = 10)]
    pub department_id: Option<u64>,
    /// Filter by lifecycle status
    #[schema(example = "pending_dept_head")]
    pub status: Option<LeaveStatus>,
    /// Filter by the calendar year of the start date
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
    Date(NaiveDate),
}

/// Mutation result: the persisted record plus the non-fatal entitlement
/// warning when a requested paid-day value had to be clamped.
#[derive(Serialize, ToSchema)]
pub struct LeaveActionResponse {
    pub data: LeaveRequest,
    #[schema(example = "paid_leave reduced to 2 to stay within the yearly annual entitlement")]
    pub warning: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
    pub stats: stats::LeaveStatsSnapshot,
}

/* =========================
Shared plumbing
========================= */

fn internal(err: anyhow::Error) -> LeaveError {
    LeaveError::Corrupt(err.to_string())
}

async fn fetch_request(pool: &MySqlPool, leave_id: u64) -> Result<LeaveRequest, LeaveError> {
    let row = sqlx::query_as::<_, LeaveRequestRow>(
        r#"
        SELECT *
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await?
    .ok_or(LeaveError::NotFound)?;

    LeaveRequest::try_from(row).map_err(LeaveError::Corrupt)
}

/// SUM of approved paid days for one employee/type/year. With `exclude_self`
/// the request under evaluation is left out of the sum, so editing an
/// already-approved request does not count its own paid days as consumed.
fn prior_paid_sql(exclude_self: bool) -> String {
    let mut sql = String::from(
        "SELECT COALESCE(CAST(SUM(paid_leave) AS SIGNED), 0) \
         FROM leave_requests \
         WHERE employee_id = ? \
           AND leave_type = ? \
           AND status = 'approved' \
           AND start_date >= ? AND start_date <= ?",
    );
    if exclude_self {
        sql.push_str(" AND id <> ?");
    }
    sql
}

/// Paid days already approved for this employee/type whose start date falls
/// in the given calendar year, excluding `exclude_id` (the request being
/// evaluated) when it is already among the approved rows.
async fn prior_approved_paid_days(
    pool: &MySqlPool,
    employee_id: u64,
    leave_type: LeaveType,
    year: i32,
    exclude_id: Option<u64>,
) -> Result<u32, LeaveError> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let to = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);

    let sql = prior_paid_sql(exclude_id.is_some());
    let mut query = sqlx::query_as::<_, (i64,)>(&sql)
        .bind(employee_id)
        .bind(<&'static str>::from(leave_type))
        .bind(from)
        .bind(to);
    if let Some(id) = exclude_id {
        query = query.bind(id);
    }

    let (total,) = query.fetch_one(pool).await?;

    Ok(total.max(0) as u32)
}

/// Run the calendar and the accounting engine for a (possibly edited) range.
/// Returns the split plus the entitlement warning, or a `ValidationError`
/// when the range is reversed or covers no working days.
async fn derive_split(
    pool: &MySqlPool,
    employee_id: u64,
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    requested_paid: Option<u32>,
    exclude_id: Option<u64>,
) -> Result<(accounting::Split, Option<String>), LeaveError> {
    if start > end {
        return Err(LeaveError::Validation(
            "start_date cannot be after end_date".to_string(),
        ));
    }

    let config = entitlement_cache::entitlement_config(pool).await.map_err(internal)?;
    let holidays = holiday_cache::holidays_for_range(pool, start, end)
        .await
        .map_err(internal)?;

    let working_days = calendar::working_days(start, end, &config.weekends, &holidays);
    if working_days == 0 {
        return Err(LeaveError::Validation(
            "The requested range falls entirely on weekends or holidays".to_string(),
        ));
    }

    let prior =
        prior_approved_paid_days(pool, employee_id, leave_type, start.year(), exclude_id).await?;
    let split = accounting::split(
        working_days,
        config.annualized_limit(leave_type),
        prior,
        requested_paid,
    );

    let warning = split.clamped.then(|| {
        tracing::warn!(
            employee_id,
            leave_type = %leave_type,
            requested = requested_paid,
            granted = split.paid_leave,
            "Requested paid days exceeded the remaining entitlement; clamped"
        );
        format!(
            "paid_leave reduced to {} to stay within the yearly {} entitlement",
            split.paid_leave, leave_type
        )
    });

    Ok((split, warning))
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveActionResponse),
        (status = 400, description = "Invalid dates, empty reason or zero working days"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match payload.employee_id {
        None => auth.require_employee_id()?,
        Some(id) if auth.is_admin() || auth.employee_id == Some(id) => id,
        Some(_) => {
            return Err(LeaveError::Unauthorized(
                "Only admins may file a request on behalf of another employee".to_string(),
            )
            .into());
        }
    };

    if payload.reason.trim().is_empty() {
        return Err(LeaveError::Validation("reason is required".to_string()).into());
    }

    let department_id = directory::employee_department(pool.get_ref(), employee_id)
        .await
        .map_err(LeaveError::from)?
        .ok_or_else(|| LeaveError::Validation(format!("Unknown employee {}", employee_id)))?;

    let (split, _) = derive_split(
        pool.get_ref(),
        employee_id,
        payload.leave_type,
        payload.start_date,
        payload.end_date,
        None,
        None,
    )
    .await?;

    let dept_head_ids = directory::dept_head_ids(pool.get_ref(), department_id)
        .await
        .map_err(LeaveError::from)?;

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, department_id, leave_type, start_date, end_date, reason,
             paid_leave, unpaid_leave, status, dept_head_ids, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(department_id)
    .bind(<&'static str>::from(payload.leave_type))
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.reason.trim())
    .bind(split.paid_leave)
    .bind(split.unpaid_leave)
    .bind(<&'static str>::from(LeaveStatus::PendingDeptHead))
    .bind(Json(&dept_head_ids))
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        LeaveError::from(e)
    })?;

    let created = fetch_request(pool.get_ref(), result.last_insert_id()).await?;
    tracing::info!(
        leave_id = created.id,
        employee_id,
        department_id,
        paid = created.paid_leave,
        unpaid = created.unpaid_leave,
        "Leave request submitted"
    );

    Ok(HttpResponse::Ok().json(LeaveActionResponse { data: created, warning: None }))
}

/* =========================
Stage decisions
========================= */

async fn apply_decision(
    auth: &AuthUser,
    pool: &MySqlPool,
    leave_id: u64,
    payload: &DecisionPayload,
    stage: Stage,
) -> Result<HttpResponse, LeaveError> {
    let request = fetch_request(pool, leave_id).await?;

    // Heads appointed after the request was filed are not in the snapshot
    // list; fall back to the live directory before denying.
    let manages_department = if stage == Stage::DeptHead
        && auth.role == Role::DeptHead
        && !request.dept_head_ids.contains(&auth.actor_id())
    {
        directory::dept_head_ids(pool, request.department_id)
            .await
            .map_err(LeaveError::from)?
            .contains(&auth.actor_id())
    } else {
        false
    };

    policy::can_decide(auth.role, auth.actor_id(), &request, stage, manages_department)?;
    state::validate_comment(payload.action, payload.comment.as_deref())?;
    let transition = state::transition(request.status, stage, payload.action)?;

    // Approvals re-derive the split: either for edited dates/paid days, or to
    // re-clamp the persisted value against entitlement consumed since filing.
    let mut warning = None;
    let mut accounting_update = None;
    if payload.action == LeaveAction::Approved {
        let start = payload.start_date.unwrap_or(request.start_date);
        let end = payload.end_date.unwrap_or(request.end_date);
        let requested = payload.paid_leave.or(Some(request.paid_leave));
        let (split, clamp_warning) = derive_split(
            pool,
            request.employee_id,
            request.leave_type,
            start,
            end,
            requested,
            Some(request.id),
        )
        .await?;
        warning = clamp_warning;
        accounting_update = Some((start, end, split));
    }

    let now = Utc::now();
    let mut update = SqlUpdate::new("leave_requests")
        .set("status", SqlValue::Str(transition.next.into()))
        .set("updated_at", SqlValue::DateTime(now));

    if let Some((start, end, split)) = accounting_update {
        update = update
            .set("start_date", SqlValue::Date(start))
            .set("end_date", SqlValue::Date(end))
            .set("paid_leave", SqlValue::U32(split.paid_leave))
            .set("unpaid_leave", SqlValue::U32(split.unpaid_leave));
    }

    if transition.records_dept_stage {
        update = update
            .set("dept_head_id", SqlValue::U64(auth.actor_id()))
            .set("dept_head_action", SqlValue::Str(payload.action.into()))
            .set_if(
                "dept_head_comment",
                payload.comment.clone().map(SqlValue::String),
            )
            .set("dept_head_action_at", SqlValue::DateTime(now));
    }
    if transition.records_admin_stage {
        update = update
            .set("admin_id", SqlValue::U64(auth.user_id))
            .set("admin_action", SqlValue::Str(payload.action.into()))
            .set_if(
                "admin_comment",
                payload.comment.clone().map(SqlValue::String),
            )
            .set("admin_action_at", SqlValue::DateTime(now));
    }

    // Compare-and-set on the status we read: a racing decision makes this a
    // no-op and the caller gets AlreadyDecided instead of overwriting it.
    let affected = update
        .filter("id", SqlValue::U64(leave_id))
        .filter("status", SqlValue::Str(request.status.into()))
        .execute(pool)
        .await?;

    if affected == 0 {
        return Err(LeaveError::AlreadyDecided);
    }

    let updated = fetch_request(pool, leave_id).await?;
    tracing::info!(
        leave_id,
        actor = auth.user_id,
        action = %payload.action,
        from = %request.status,
        to = %updated.status,
        "Leave decision recorded"
    );

    Ok(HttpResponse::Ok().json(LeaveActionResponse { data: updated, warning }))
}

/// Department-head decision on the first stage.
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/dept-head-action",
    params(("leave_id" = u64, Path, description = "ID of the leave request")),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Decision recorded", body = LeaveActionResponse),
        (status = 400, description = "Invalid payload (e.g. rejection without comment)"),
        (status = 403, description = "Not an eligible department head"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Stage already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn dept_head_action(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecisionPayload>,
) -> actix_web::Result<impl Responder> {
    let response =
        apply_decision(&auth, pool.get_ref(), path.into_inner(), &payload, Stage::DeptHead)
            .await?;
    Ok(response)
}

/// Admin decision; finalizes both stages at once when the request is still
/// at the department-head stage.
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/admin-action",
    params(("leave_id" = u64, Path, description = "ID of the leave request")),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Decision recorded", body = LeaveActionResponse),
        (status = 400, description = "Invalid payload (e.g. rejection without comment)"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Stage already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn admin_action(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecisionPayload>,
) -> actix_web::Result<impl Responder> {
    let response =
        apply_decision(&auth, pool.get_ref(), path.into_inner(), &payload, Stage::Admin).await?;
    Ok(response)
}

/* =========================
Edit / delete (window-guarded)
========================= */

#[utoipa::path(
    patch,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave request updated", body = LeaveActionResponse),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Edit window closed or not the owner"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "A decision landed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let request = fetch_request(pool.get_ref(), leave_id).await?;

    policy::can_modify(auth.role, auth.employee_id, &request)?;

    if payload.leave_type.is_none()
        && payload.start_date.is_none()
        && payload.end_date.is_none()
        && payload.reason.is_none()
    {
        return Err(LeaveError::Validation("No fields provided for update".to_string()).into());
    }

    if let Some(reason) = &payload.reason {
        if reason.trim().is_empty() {
            return Err(LeaveError::Validation("reason cannot be empty".to_string()).into());
        }
    }

    let now = Utc::now();
    let mut update = SqlUpdate::new("leave_requests")
        .set("updated_at", SqlValue::DateTime(now))
        .set_if(
            "reason",
            payload.reason.as_ref().map(|r| SqlValue::String(r.trim().to_string())),
        );

    // Date or type changes re-run the accounting engine in default mode.
    let leave_type = payload.leave_type.unwrap_or(request.leave_type);
    let start = payload.start_date.unwrap_or(request.start_date);
    let end = payload.end_date.unwrap_or(request.end_date);
    let mut warning = None;
    if leave_type != request.leave_type || start != request.start_date || end != request.end_date
    {
        let (split, clamp_warning) = derive_split(
            pool.get_ref(),
            request.employee_id,
            leave_type,
            start,
            end,
            None,
            Some(request.id),
        )
        .await?;
        warning = clamp_warning;
        update = update
            .set("leave_type", SqlValue::Str(leave_type.into()))
            .set("start_date", SqlValue::Date(start))
            .set("end_date", SqlValue::Date(end))
            .set("paid_leave", SqlValue::U32(split.paid_leave))
            .set("unpaid_leave", SqlValue::U32(split.unpaid_leave));
    }

    // Same optimistic guard as decisions: an edit must not land on a record
    // that has since left the status it was read at.
    let affected = update
        .filter("id", SqlValue::U64(leave_id))
        .filter("status", SqlValue::Str(request.status.into()))
        .execute(pool.get_ref())
        .await
        .map_err(LeaveError::from)?;

    if affected == 0 {
        return Err(LeaveError::AlreadyDecided.into());
    }

    let updated = fetch_request(pool.get_ref(), leave_id).await?;
    Ok(HttpResponse::Ok().json(LeaveActionResponse { data: updated, warning }))
}

#[utoipa::path(
    delete,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request")),
    responses(
        (status = 200, description = "Leave request deleted", body = Object, example = json!({
            "message": "Leave request deleted"
        })),
        (status = 403, description = "Edit window closed or not the owner"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "A decision landed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let request = fetch_request(pool.get_ref(), leave_id).await?;

    policy::can_modify(auth.role, auth.employee_id, &request)?;

    let result = sqlx::query(
        r#"
        DELETE FROM leave_requests
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(leave_id)
    .bind(<&'static str>::from(request.status))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to delete leave request");
        LeaveError::from(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::AlreadyDecided.into());
    }

    tracing::info!(leave_id, actor = auth.user_id, "Leave request deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request deleted"
    })))
}

/* =========================
Reads
========================= */

#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 403, description = "Not visible to this actor"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = fetch_request(pool.get_ref(), path.into_inner()).await?;
    policy::can_view(auth.role, auth.employee_id, &request)?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list with statistics", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Role scoping
    // -------------------------
    let (employee_filter, department_filter) = match auth.role {
        Role::Admin => (query.employee_id, query.department_id),
        Role::DeptHead => {
            let own = auth.require_employee_id()?;
            let department = directory::employee_department(pool.get_ref(), own)
                .await
                .map_err(LeaveError::from)?
                .ok_or_else(|| {
                    LeaveError::Unauthorized("No department on record for this actor".to_string())
                })?;
            (query.employee_id, Some(department))
        }
        Role::Employee => (Some(auth.require_employee_id()?), None),
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_filter {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(dept_id) = department_filter {
        where_sql.push_str(" AND department_id = ?");
        args.push(FilterValue::U64(dept_id));
    }
    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.into()));
    }
    if let Some(year) = query.year {
        where_sql.push_str(" AND start_date >= ? AND start_date <= ?");
        args.push(FilterValue::Date(
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        ));
        args.push(FilterValue::Date(
            NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
        ));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        LeaveError::from(e)
    })?;

    // -------------------------
    // DATA query (page)
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT *
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequestRow>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(*s),
            FilterValue::Date(d) => data_q.bind(*d),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            LeaveError::from(e)
        })?;

    let data = rows
        .into_iter()
        .map(LeaveRequest::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LeaveError::Corrupt)?;

    // -------------------------
    // STATS query (full matching set, aggregated in the core)
    // -------------------------
    let stats_sql = format!("SELECT * FROM leave_requests{}", where_sql);
    let mut stats_q = sqlx::query_as::<_, LeaveRequestRow>(&stats_sql);
    for arg in &args {
        stats_q = match arg {
            FilterValue::U64(v) => stats_q.bind(*v),
            FilterValue::Str(s) => stats_q.bind(*s),
            FilterValue::Date(d) => stats_q.bind(*d),
        };
    }

    let matching = stats_q
        .fetch_all(pool.get_ref())
        .await
        .map_err(LeaveError::from)?
        .into_iter()
        .map(LeaveRequest::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LeaveError::Corrupt)?;

    let snapshot = stats::aggregate(
        &matching,
        &stats::StatsFilter {
            employee_id: employee_filter,
            department_id: department_filter,
            year: query.year,
        },
    );

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data,
        page,
        per_page,
        total,
        stats: snapshot,
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prior_paid_sum_excludes_the_request_under_evaluation() {
        // Re-deriving the split for an existing request (approve with edits,
        // or an admin editing an approved one) must not count that request's
        // own paid days as already consumed.
        let sql = prior_paid_sql(true);
        assert!(sql.ends_with("AND id <> ?"));
        assert!(sql.contains("status = 'approved'"));
    }

    #[test]
    fn prior_paid_sum_over_all_rows_for_new_requests() {
        let sql = prior_paid_sql(false);
        assert!(!sql.contains("id <> ?"));
        assert!(sql.contains("SUM(paid_leave)"));
    }

    #[test]
    fn list_response_echoes_pagination_untruncated() {
        let response = LeaveListResponse {
            data: Vec::new(),
            page: u64::MAX,
            per_page: 100,
            total: 0,
            stats: stats::aggregate(&[], &stats::StatsFilter::default()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["page"], serde_json::Value::from(u64::MAX));
        assert_eq!(json["per_page"], serde_json::Value::from(100u64));
    }
}
