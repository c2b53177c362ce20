//! Startup listing for operators.
//!
//! Shows which flights a payout oracle would accept or reject. The
//! annotation is never part of an HTTP response.

use std::net::SocketAddr;

use flightmock_core::{FlightRecord, FlightTable};
use tracing::info;

/// One line per flight: `BF1234: Delayed (210m) -> PAYOUT`.
pub fn describe_entry(record: &FlightRecord) -> String {
    let outcome = if record.is_payout_eligible() {
        "PAYOUT"
    } else {
        "REJECT"
    };
    format!(
        "{}: {} ({}m) -> {}",
        record.flight_id, record.status, record.delay_minutes, outcome
    )
}

/// Logs the local address, the public URL if one is known, and every table entry.
pub fn log_banner(table: &FlightTable, local_addr: SocketAddr, public_url: Option<&str>) {
    info!("listening on http://{local_addr}");
    match public_url {
        Some(url) => info!("public URL: {url}"),
        None => info!("no public URL configured, serving locally only"),
    }
    info!("{} flight(s) available for proof generation:", table.len());
    for record in table.iter() {
        info!("  {}", describe_entry(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_flight_is_marked_payout() {
        let record = FlightRecord::new("BF1234", 210, "Delayed");
        assert_eq!(describe_entry(&record), "BF1234: Delayed (210m) -> PAYOUT");
    }

    #[test]
    fn short_delay_is_marked_reject() {
        let record = FlightRecord::new("KL002", 29, "Delayed");
        assert_eq!(describe_entry(&record), "KL002: Delayed (29m) -> REJECT");
    }

    #[test]
    fn on_time_is_marked_reject() {
        let record = FlightRecord::new("US101", 5, "On Time");
        assert!(describe_entry(&record).ends_with("REJECT"));
    }
}
