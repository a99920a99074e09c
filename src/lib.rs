//! Credential and session subsystem for the chirpy service: password
//! hashing, signed access tokens, revocable refresh tokens and request
//! credential extraction, plus a thin actix-web adapter.

pub mod auth;
pub mod configuration;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
