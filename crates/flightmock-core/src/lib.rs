//! # Flightmock Core
//!
//! Simulated flight-delay data for exercising a payout oracle without a real
//! flight-data provider.
//!
//! The crate holds a single immutable [`FlightTable`] and one operation,
//! [`FlightTable::get_status`], which is total: every input string, known or
//! not, produces a [`FlightRecord`].
//!
//! ## Usage
//!
//! ```rust
//! use flightmock_core::FlightTable;
//!
//! let table = FlightTable::reference();
//!
//! let record = table.get_status("bf1234");
//! assert_eq!(record.flight_id, "BF1234");
//! assert_eq!(record.delay_minutes, 210);
//!
//! // Unknown flights are reported on time
//! let record = table.get_status("zz0000");
//! assert_eq!(record.status, "On Time");
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod table;

pub use error::TableError;
pub use record::{normalize_flight_id, FlightRecord};
pub use table::FlightTable;
