use std::io;
use std::process::ExitStatus;

/// Failures of the optional public tunnel.
///
/// None of these stop the server; they are logged and the service keeps
/// answering on its local address.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("tunnel command is empty")]
    EmptyCommand,

    #[error("failed to start tunnel program `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("tunnel program `{program}` exited during startup ({status})")]
    Exited { program: String, status: ExitStatus },

    #[error("lost track of tunnel program `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}
