// src/db.rs - Database migrations and setup

use anyhow::Result;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys and WAL mode
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 255),
            email TEXT NOT NULL UNIQUE CHECK(length(email) >= 5 AND length(email) <= 255),
            avatar TEXT CHECK(avatar IS NULL OR length(avatar) <= 1000),
            role TEXT NOT NULL DEFAULT 'donor' CHECK(length(role) <= 50),
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS volunteers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 255),
            email TEXT NOT NULL CHECK(length(email) >= 5 AND length(email) <= 255),
            phone TEXT CHECK(phone IS NULL OR length(phone) <= 50),
            district TEXT CHECK(district IS NULL OR length(district) <= 255),
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS donation_requests (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 255),
            recipient_name TEXT NOT NULL CHECK(length(recipient_name) > 0 AND length(recipient_name) <= 255),
            hospital_name TEXT NOT NULL CHECK(length(hospital_name) > 0 AND length(hospital_name) <= 255),
            phone TEXT NOT NULL CHECK(length(phone) > 0 AND length(phone) <= 50),
            blood_group TEXT NOT NULL CHECK(length(blood_group) > 0 AND length(blood_group) <= 10),
            district TEXT NOT NULL CHECK(length(district) > 0 AND length(district) <= 255),
            donation_date TEXT NOT NULL CHECK(length(donation_date) <= 50),
            donation_time TEXT NOT NULL CHECK(length(donation_time) <= 50),
            full_address TEXT NOT NULL CHECK(length(full_address) <= 1000),
            request_message TEXT NOT NULL CHECK(length(request_message) <= 2000),
            email TEXT NOT NULL CHECK(length(email) >= 5 AND length(email) <= 255),
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the listing engine: filter columns and the sort key
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_donation_requests_email ON donation_requests(email)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_donation_requests_blood_group ON donation_requests(blood_group COLLATE NOCASE)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_donation_requests_created_at ON donation_requests(created_at, id)",
    )
    .execute(pool)
    .await?;

    log::info!("Database migrations completed");

    Ok(())
}
