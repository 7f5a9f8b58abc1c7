// src/user_handlers.rs
//! Handlers for the user collection

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{CreateUserRequest, User};
use crate::AppState;

// ==================== GET ALL USERS ====================

pub async fn get_users(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

// ==================== GET USER BY EMAIL ====================

pub async fn get_user_by_email(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let email = path.into_inner();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&app_state.db_pool)
        .await?;

    match user {
        Some(u) => Ok(HttpResponse::Ok().json(ApiResponse::success(u))),
        None => Err(ApiError::user_not_found(&email)),
    }
}

// ==================== CREATE USER ====================

pub async fn create_user(
    app_state: web::Data<Arc<AppState>>,
    user: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    user.validate()?;

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&user.email)
        .fetch_optional(&app_state.db_pool)
        .await?;

    if existing.is_some() {
        return Err(ApiError::user_already_exists(&user.email));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let role = user.role.clone().unwrap_or_else(|| "donor".to_string());

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, avatar, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.avatar)
    .bind(&role)
    .bind(&now)
    .execute(&app_state.db_pool)
    .await?;

    let created: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Created user: {} ({})", created.email, id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}
