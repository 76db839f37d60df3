//! Zodiac Leads API Library
//!
//! Backend for the Chinese zodiac wheel promotion: resolves a visitor's
//! birth year to a sign and fortune, captures leads in exchange for a
//! coupon, and lets an authenticated admin list, delete and export them.
//!
//! # Modules
//!
//! - `api`: Route table and API documentation.
//! - `core`: Domain logic re-exports.
//! - `integrations`: Store and auth backends re-exports.
//! - `admin_handlers`: Authenticated admin endpoints.
//! - `backend`: Persistence/auth boundary over the configured store.
//! - `config`: Configuration management.
//! - `csv_export`: Lead CSV export.
//! - `db`: Database connection and schema.
//! - `db_storage`: Postgres lead storage.
//! - `errors`: Error handling types.
//! - `handlers`: Public HTTP handlers and shared state.
//! - `local_auth`: Configured single-admin sessions.
//! - `models`: Lead and API data models.
//! - `supabase_client`: Hosted Supabase client.
//! - `validation`: Form validation rules.
//! - `zodiac`: Sign catalog and year resolution.

pub mod api;
pub mod core;
pub mod integrations;

pub mod admin_handlers;
pub mod backend;
pub mod config;
pub mod csv_export;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod local_auth;
pub mod models;
pub mod supabase_client;
pub mod validation;
pub mod zodiac;
