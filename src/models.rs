// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== USER ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 1000, message = "Avatar URL cannot exceed 1000 characters"))]
    pub avatar: Option<String>,

    pub role: Option<String>,
}

// ==================== VOLUNTEER ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Volunteer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateVolunteerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 50, message = "Phone cannot exceed 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "District cannot exceed 255 characters"))]
    pub district: Option<String>,
}

// ==================== DONATION REQUEST ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct DonationRequest {
    pub id: String,
    pub name: String,
    pub recipient_name: String,
    pub hospital_name: String,
    pub phone: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,
    pub district: String,
    pub donation_date: String,
    pub donation_time: String,
    pub full_address: String,
    pub request_message: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateDonationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Recipient name must be between 1 and 255 characters"))]
    pub recipient_name: String,

    #[validate(length(min = 1, max = 255, message = "Hospital name must be between 1 and 255 characters"))]
    pub hospital_name: String,

    #[validate(length(min = 1, max = 50, message = "Phone must be between 1 and 50 characters"))]
    pub phone: String,

    #[serde(rename = "bloodGroup")]
    #[validate(length(min = 1, max = 10, message = "Blood group must be between 1 and 10 characters"))]
    pub blood_group: String,

    #[validate(length(min = 1, max = 255, message = "District must be between 1 and 255 characters"))]
    pub district: String,

    #[validate(length(min = 1, max = 50, message = "Donation date must be between 1 and 50 characters"))]
    pub donation_date: String,

    #[validate(length(min = 1, max = 50, message = "Donation time must be between 1 and 50 characters"))]
    pub donation_time: String,

    #[validate(length(min = 1, max = 1000, message = "Full address must be between 1 and 1000 characters"))]
    pub full_address: String,

    #[validate(length(max = 2000, message = "Request message cannot exceed 2000 characters"))]
    pub request_message: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    pub email: String,
}

/// Full replacement of the mutable fields. Owner email and creation
/// timestamp are never touched by an update.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct UpdateDonationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Recipient name must be between 1 and 255 characters"))]
    pub recipient_name: String,

    #[validate(length(min = 1, max = 255, message = "Hospital name must be between 1 and 255 characters"))]
    pub hospital_name: String,

    #[validate(length(min = 1, max = 50, message = "Phone must be between 1 and 50 characters"))]
    pub phone: String,

    #[serde(rename = "bloodGroup")]
    #[validate(length(min = 1, max = 10, message = "Blood group must be between 1 and 10 characters"))]
    pub blood_group: String,

    #[validate(length(min = 1, max = 255, message = "District must be between 1 and 255 characters"))]
    pub district: String,

    #[validate(length(min = 1, max = 50, message = "Donation date must be between 1 and 50 characters"))]
    pub donation_date: String,

    #[validate(length(min = 1, max = 50, message = "Donation time must be between 1 and 50 characters"))]
    pub donation_time: String,

    #[validate(length(min = 1, max = 1000, message = "Full address must be between 1 and 1000 characters"))]
    pub full_address: String,

    #[validate(length(max = 2000, message = "Request message cannot exceed 2000 characters"))]
    pub request_message: String,
}
