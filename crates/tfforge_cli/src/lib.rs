//! # tfforge_cli
//!
//! Web portal and command line front-end for `tfforge_iac`.
//!
//! The [`server`] module exposes the axum router used by `tfforge serve`;
//! [`page`] renders the confirmation page returned after a submission.

pub mod page;
pub mod server;

pub use server::{build_router, ApiError, AppState};
