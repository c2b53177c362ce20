//! Flightmock HTTP Server Library
//!
//! This module exposes the server pieces for the binary and for testing.
//!
//! The main entry point is [`create_app`], which creates a configured Axum router
//! around an injected [`FlightTable`](flightmock_core::FlightTable).

pub mod banner;
pub mod error;
mod main_impl;
pub mod tunnel;

pub use error::TunnelError;
pub use main_impl::{create_app, run};
