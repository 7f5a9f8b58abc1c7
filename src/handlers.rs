// src/handlers.rs
use actix_web::HttpResponse;
use serde::Serialize;

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

// ==================== ROOT & HEALTH ====================

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Donate blood, save lives!")
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
