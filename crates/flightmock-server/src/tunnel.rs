//! Best-effort public exposure through an external tunnel program.
//!
//! The server never talks to a tunnel provider itself. An operator supplies
//! a command line (for example `ngrok http {port}`) and the server runs it as
//! a child process once the local listener is bound. Any credentials the
//! program needs are inherited from the environment.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::error::TunnelError;

/// How long a freshly spawned tunnel must survive to count as established.
pub const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Argument placeholder replaced by the locally bound port.
pub const PORT_PLACEHOLDER: &str = "{port}";

/// Program and arguments used to expose the local port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl TunnelCommand {
    /// Splits an argv-style list into program and arguments, skipping empty words.
    pub fn from_argv<I>(argv: I) -> Result<Self, TunnelError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut words = argv.into_iter().filter(|w| !w.is_empty());
        let program = words.next().ok_or(TunnelError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Arguments with every [`PORT_PLACEHOLDER`] substituted.
    pub fn args_for_port(&self, port: u16) -> Vec<String> {
        let port = port.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace(PORT_PLACEHOLDER, &port))
            .collect()
    }
}

/// A running tunnel process. Dropping it kills the process.
#[derive(Debug)]
pub struct Tunnel {
    program: String,
    child: Child,
}

impl Tunnel {
    /// Spawns the tunnel program for `port` and waits [`STARTUP_GRACE`] for it to settle.
    ///
    /// # Errors
    ///
    /// [`TunnelError::Spawn`] if the program cannot be started and
    /// [`TunnelError::Exited`] if it terminates within the grace period.
    pub async fn open(command: &TunnelCommand, port: u16) -> Result<Self, TunnelError> {
        let program = command.program.clone();
        let mut child = Command::new(&command.program)
            .args(command.args_for_port(port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TunnelError::Spawn {
                program: program.clone(),
                source,
            })?;

        match tokio::time::timeout(STARTUP_GRACE, child.wait()).await {
            Ok(Ok(status)) => Err(TunnelError::Exited { program, status }),
            Ok(Err(source)) => Err(TunnelError::Wait { program, source }),
            Err(_) => {
                info!(program = %program, pid = ?child.id(), "tunnel process running");
                Ok(Self { program, child })
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Stops the tunnel process and reaps it.
    pub async fn close(mut self) {
        match self.child.kill().await {
            Ok(()) => info!(program = %self.program, "tunnel process stopped"),
            Err(e) => warn!(program = %self.program, error = %e, "failed to stop tunnel process"),
        }
    }
}
