//! Handlers for the `/salaries` resource (payroll records).
//!
//! HR and admins only. `net_salary` is always recomputed from basic pay,
//! bonus and deductions, and `pay_period` is normalised to the first of
//! the month.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use hrms_core::audit::{actions, entities};
use hrms_core::error::CoreError;
use hrms_core::payroll::{
    PAYMENT_CANCELLED, PAYMENT_PAID, PAYMENT_PENDING, PAYMENT_TRANSITIONS, VALID_PAYMENT_STATUSES,
};
use hrms_core::stats::{total, zero_filled};
use hrms_core::transition::ensure_allowed;
use hrms_core::types::{Date, DbId};
use hrms_db::models::common::StatsQuery;
use hrms_db::models::salary::{
    CreateSalary, PaySalary, SalaryDetail, SalaryQuery, SalaryStats, UpdateSalary,
};
use hrms_db::populate;
use hrms_db::repositories::SalaryRepo;
use rust_decimal::Decimal;
use serde_json::json;

use super::{not_found, status_changed};
use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{self, JsonBody, OptionalJson, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireHr;
use crate::response::{ack, created, ok, ApiResponse, Created, JsonResponse};
use crate::state::AppState;

/// POST /api/v1/salaries
pub async fn create_salary(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    ValidJson(input): ValidJson<CreateSalary>,
) -> AppResult<Created<SalaryDetail>> {
    let salary =
        SalaryRepo::create(&state.pool, &input, input.pay_period(), input.net_salary()).await?;

    tracing::info!(
        salary_id = salary.id,
        employee_id = salary.employee_id,
        pay_period = %salary.pay_period,
        net = %salary.net_salary,
        "Salary record created"
    );
    audit::record(
        &state.pool,
        &user,
        actions::CREATE,
        entities::SALARY,
        Some(salary.id),
        Some(json!({ "employee_id": salary.employee_id, "pay_period": salary.pay_period })),
    )
    .await;

    let detail = populate::salary(&state.pool, salary).await?;
    Ok(created(detail, "Salary record created"))
}

/// GET /api/v1/salaries
///
/// Filters: `employee_id`, `payment_status`, `from`/`to` on pay period.
pub async fn list_salaries(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Query(params): Query<SalaryQuery>,
) -> AppResult<JsonResponse<Vec<SalaryDetail>>> {
    let page = params.page_request();
    let rows = SalaryRepo::list(&state.pool, &params, page).await?;
    let total = SalaryRepo::count(&state.pool, &params).await?;
    let data = populate::salaries(&state.pool, rows).await?;
    Ok(Json(ApiResponse::page(data, page, total)))
}

/// GET /api/v1/salaries/{id}
pub async fn get_salary(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<SalaryDetail>> {
    let salary = SalaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Salary", id))?;
    Ok(ok(populate::salary(&state.pool, salary).await?))
}

/// PUT /api/v1/salaries/{id}
///
/// Only pending records are editable; the payment status changes through
/// `/pay` and `/cancel`.
pub async fn update_salary(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateSalary>,
) -> AppResult<JsonResponse<SalaryDetail>> {
    let current = SalaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Salary", id))?;
    if current.payment_status != PAYMENT_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only pending salary records can be updated (current status: '{}')",
            current.payment_status
        ))));
    }

    let merged = input.apply_to(&current);
    extract::validate(&merged)?;

    let salary = SalaryRepo::update_pending(
        &state.pool,
        id,
        &merged,
        merged.pay_period(),
        merged.net_salary(),
    )
    .await?
    .ok_or_else(|| status_changed("Salary"))?;

    tracing::info!(salary_id = id, net = %salary.net_salary, "Salary record updated");
    audit::record(
        &state.pool,
        &user,
        actions::UPDATE,
        entities::SALARY,
        Some(id),
        None,
    )
    .await;

    Ok(ok(populate::salary(&state.pool, salary).await?))
}

/// DELETE /api/v1/salaries/{id}
pub async fn delete_salary(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<Option<()>>> {
    SalaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Salary", id))?;
    if !SalaryRepo::delete(&state.pool, id).await? {
        return Err(not_found("Salary", id));
    }

    tracing::info!(salary_id = id, user_id = user.user_id, "Salary record deleted");
    audit::record(
        &state.pool,
        &user,
        actions::DELETE,
        entities::SALARY,
        Some(id),
        None,
    )
    .await;

    Ok(ack("Salary record deleted"))
}

/// POST /api/v1/salaries/{id}/pay
///
/// `payment_date` defaults to today (UTC).
pub async fn pay_salary(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
    OptionalJson(body): OptionalJson<PaySalary>,
) -> AppResult<JsonResponse<SalaryDetail>> {
    let payment_date = body.payment_date.unwrap_or_else(|| Utc::now().date_naive());
    transition(&state, &user, id, PAYMENT_PAID, Some(payment_date)).await
}

/// POST /api/v1/salaries/{id}/cancel
pub async fn cancel_salary(
    State(state): State<AppState>,
    RequireHr(user): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<JsonResponse<SalaryDetail>> {
    transition(&state, &user, id, PAYMENT_CANCELLED, None).await
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    to: &str,
    payment_date: Option<Date>,
) -> AppResult<JsonResponse<SalaryDetail>> {
    let current = SalaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Salary", id))?;
    ensure_allowed("Salary", PAYMENT_TRANSITIONS, &current.payment_status, to)?;

    let salary = SalaryRepo::transition(
        &state.pool,
        id,
        &current.payment_status,
        to,
        user.user_id,
        payment_date,
    )
    .await?
    .ok_or_else(|| status_changed("Salary"))?;

    tracing::info!(salary_id = id, status = to, processed_by = user.user_id, "Salary transitioned");
    audit::record(
        &state.pool,
        &user,
        actions::PROCESS,
        entities::SALARY,
        Some(id),
        Some(json!({ "from": current.payment_status, "to": to, "payment_date": payment_date })),
    )
    .await;

    Ok(ok(populate::salary(&state.pool, salary).await?))
}

/// GET /api/v1/salaries/stats
pub async fn salary_stats(
    State(state): State<AppState>,
    RequireHr(_user): RequireHr,
    Query(scope): Query<StatsQuery>,
) -> AppResult<JsonResponse<SalaryStats>> {
    let rows = SalaryRepo::totals_by_status(&state.pool, &scope).await?;

    let mut net_by_status: BTreeMap<String, Decimal> = VALID_PAYMENT_STATUSES
        .iter()
        .map(|s| (s.to_string(), Decimal::ZERO))
        .collect();
    for (status, _, net) in &rows {
        *net_by_status.entry(status.clone()).or_insert(Decimal::ZERO) += *net;
    }
    let by_status = zero_filled(
        VALID_PAYMENT_STATUSES,
        rows.into_iter().map(|(status, count, _)| (status, count)),
    );

    Ok(ok(SalaryStats {
        total: total(&by_status),
        total_net: net_by_status.values().copied().sum(),
        by_status,
        net_by_status,
    }))
}
