use serde::{Deserialize, Serialize};

use crate::config::{status, thresholds};

/// Simulated punctuality of a single flight.
///
/// Serializes to the exact wire shape consumed by the oracle's attestation
/// request: `{"flightId": ..., "delay_minutes": ..., "status": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Normalized (uppercase) flight identifier.
    #[serde(rename = "flightId")]
    pub flight_id: String,
    /// Minutes of delay.
    pub delay_minutes: u32,
    /// Free-form status label such as `"Delayed"` or `"On Time"`.
    pub status: String,
}

impl FlightRecord {
    pub fn new(flight_id: impl Into<String>, delay_minutes: u32, status: impl Into<String>) -> Self {
        Self {
            flight_id: flight_id.into(),
            delay_minutes,
            status: status.into(),
        }
    }

    /// The record returned for any flight the table does not know about.
    pub fn on_time(flight_id: impl Into<String>) -> Self {
        Self::new(flight_id, 0, status::ON_TIME)
    }

    /// Whether a downstream payout oracle would accept this record as a claimable delay.
    ///
    /// Only used for operator output; it is never part of a response.
    pub fn is_payout_eligible(&self) -> bool {
        self.delay_minutes >= thresholds::PAYOUT_THRESHOLD_MINUTES && self.status == status::DELAYED
    }
}

/// Canonical form of a flight identifier: Unicode uppercase, nothing else.
///
/// No trimming or validation is applied, so `""` stays `""`.
pub fn normalize_flight_id(flight_id: &str) -> String {
    flight_id.to_uppercase()
}
