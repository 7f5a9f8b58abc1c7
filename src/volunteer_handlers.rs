// src/volunteer_handlers.rs
//! Handlers for the volunteer collection

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;
use crate::handlers::ApiResponse;
use crate::models::{CreateVolunteerRequest, Volunteer};
use crate::AppState;

// ==================== GET ALL VOLUNTEERS ====================

pub async fn get_volunteers(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let volunteers: Vec<Volunteer> =
        sqlx::query_as("SELECT * FROM volunteers ORDER BY created_at ASC")
            .fetch_all(&app_state.db_pool)
            .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(volunteers)))
}

// ==================== CREATE VOLUNTEER ====================

pub async fn create_volunteer(
    app_state: web::Data<Arc<AppState>>,
    volunteer: web::Json<CreateVolunteerRequest>,
) -> ApiResult<HttpResponse> {
    volunteer.validate()?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO volunteers (id, name, email, phone, district, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&volunteer.name)
    .bind(&volunteer.email)
    .bind(&volunteer.phone)
    .bind(&volunteer.district)
    .bind(&now)
    .execute(&app_state.db_pool)
    .await?;

    let created: Volunteer = sqlx::query_as("SELECT * FROM volunteers WHERE id = ?")
        .bind(&id)
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Created volunteer: {} ({})", created.email, id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}
