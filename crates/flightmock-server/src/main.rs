//! Flightmock HTTP Server - Binary Entry Point
//!
//! The implementation lives in the library crate so integration tests can
//! build the router without a socket.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flightmock_server::run().await
}
