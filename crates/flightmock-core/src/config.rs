//! Constants shared by the lookup table, the server and the CLI.
//!
//! The values mirror the behaviour the downstream payout oracle expects from
//! a flight-data provider, so they are centralized here rather than repeated
//! at each call site.

/// Thresholds used for operator-facing annotations.
pub mod thresholds {
    /// Minimum delay (in minutes) at which a `"Delayed"` flight qualifies for a payout.
    ///
    /// The lookup itself never encodes eligibility; this is only used to
    /// annotate the startup listing.
    pub const PAYOUT_THRESHOLD_MINUTES: u32 = 30;
}

/// Status labels used by the reference table and the default record.
pub mod status {
    /// Label for a flight that departed late.
    pub const DELAYED: &str = "Delayed";

    /// Label for a flight that departed on schedule. Also the status of the default record.
    pub const ON_TIME: &str = "On Time";
}

/// Network defaults for the HTTP service.
pub mod server {
    use std::net::{IpAddr, Ipv4Addr};

    /// Port the service listens on when none is configured.
    pub const DEFAULT_PORT: u16 = 8000;

    /// Loopback by default; the public address comes from the tunnel, not from binding wide.
    pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
}
