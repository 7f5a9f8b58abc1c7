// src/donation_handlers.rs
//! Handlers for the donation-request collection. The listing endpoint goes
//! through the query engine in `donation_query`; the rest is plain CRUD.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::donation_query::{list_donation_requests, ListDonationRequestsQuery};
use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{CreateDonationRequest, DonationRequest, UpdateDonationRequest};
use crate::store::SqliteDonationRequestStore;
use crate::AppState;

// ==================== LIST (QUERY ENGINE) ====================

/// GET /donation-requests
///
/// Response body is `{data: [...], count: n}` where `count` is the total
/// matching the filter before pagination.
pub async fn get_donation_requests(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListDonationRequestsQuery>,
) -> ApiResult<HttpResponse> {
    let params = query.normalize();
    let store = SqliteDonationRequestStore::new(app_state.db_pool.clone());

    let page = list_donation_requests(&store, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

// ==================== GET BY ID ====================

pub async fn get_donation_request(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let request: Option<DonationRequest> =
        sqlx::query_as("SELECT * FROM donation_requests WHERE id = ?")
            .bind(&id)
            .fetch_optional(&app_state.db_pool)
            .await?;

    match request {
        Some(r) => Ok(HttpResponse::Ok().json(ApiResponse::success(r))),
        None => Err(ApiError::donation_request_not_found(&id)),
    }
}

// ==================== CREATE ====================

pub async fn create_donation_request(
    app_state: web::Data<Arc<AppState>>,
    request: web::Json<CreateDonationRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO donation_requests (
            id, name, recipient_name, hospital_name, phone, blood_group,
            district, donation_date, donation_time, full_address,
            request_message, email, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&request.name)
    .bind(&request.recipient_name)
    .bind(&request.hospital_name)
    .bind(&request.phone)
    .bind(&request.blood_group)
    .bind(&request.district)
    .bind(&request.donation_date)
    .bind(&request.donation_time)
    .bind(&request.full_address)
    .bind(&request.request_message)
    .bind(&request.email)
    .bind(&now)
    .execute(&app_state.db_pool)
    .await?;

    let created: DonationRequest = sqlx::query_as("SELECT * FROM donation_requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&app_state.db_pool)
        .await?;

    info!(
        "Created donation request: {} for {} ({})",
        created.blood_group, created.recipient_name, id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== UPDATE ====================

/// PATCH /donation-requests/{id}
///
/// Replaces the fixed set of mutable fields. Owner email and creation
/// timestamp are left untouched.
pub async fn update_donation_request(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<UpdateDonationRequest>,
) -> ApiResult<HttpResponse> {
    update.validate()?;
    let id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE donation_requests
        SET name = ?, recipient_name = ?, hospital_name = ?, phone = ?,
            blood_group = ?, district = ?, donation_date = ?, donation_time = ?,
            full_address = ?, request_message = ?
        WHERE id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.recipient_name)
    .bind(&update.hospital_name)
    .bind(&update.phone)
    .bind(&update.blood_group)
    .bind(&update.district)
    .bind(&update.donation_date)
    .bind(&update.donation_time)
    .bind(&update.full_address)
    .bind(&update.request_message)
    .bind(&id)
    .execute(&app_state.db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::donation_request_not_found(&id));
    }

    let updated: DonationRequest = sqlx::query_as("SELECT * FROM donation_requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Updated donation request: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

// ==================== DELETE ====================

pub async fn delete_donation_request(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM donation_requests WHERE id = ?")
        .bind(&id)
        .execute(&app_state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::donation_request_not_found(&id));
    }

    info!("Deleted donation request: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        (),
        "Donation request deleted successfully".to_string(),
    )))
}
