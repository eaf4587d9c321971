//! CGI program execution.
//!
//! The worker writes a bare 200 status line and `Date`/`Server` headers,
//! then hands the client socket to the program as its stdout and stderr.
//! The program finishes the header block and writes the body itself.

use std::collections::BTreeMap;
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use tokio::net::TcpStream;
use tokio::process::Command;

use crate::http::request::Request;

pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const QUERY_STRING: &str = "QUERY_STRING";

/// Everything needed to launch one CGI program for one request.
///
/// Request context travels in `env`, built fresh per request and applied to
/// the child only; the server's own environment is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiInvocation {
    pub program: PathBuf,
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
}

impl CgiInvocation {
    pub fn new(program: impl Into<PathBuf>, working_dir: &Path, request: &Request) -> Self {
        let mut env = BTreeMap::new();
        env.insert(REQUEST_METHOD.to_string(), request.method.to_string());
        if let Some(query) = &request.query {
            env.insert(QUERY_STRING.to_string(), query.clone());
        }

        Self {
            program: program.into(),
            working_dir: working_dir.to_path_buf(),
            env,
        }
    }

    /// The command for this invocation, without any stdio wiring.
    ///
    /// The child inherits the server environment plus the request
    /// variables.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(Stdio::null());
        command
    }

    /// Runs the program with `socket` as its stdout and stderr and waits for
    /// it to exit.
    ///
    /// A program that cannot be started is only logged: the client has
    /// already received the 200 header and sees the connection close.
    pub async fn run_on(&self, socket: TcpStream) -> anyhow::Result<()> {
        let socket = socket
            .into_std()
            .context("Failed to detach client socket")?;
        socket.set_nonblocking(false)?;
        let stderr = socket.try_clone().context("Failed to clone client socket")?;

        // Our copies of the socket go away with `command`, so the client sees
        // EOF as soon as the program exits.
        let spawned = {
            let mut command = self.command();
            command
                .stdout(Stdio::from(OwnedFd::from(socket)))
                .stderr(Stdio::from(OwnedFd::from(stderr)));
            command.spawn()
        };

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(
                    program = %self.program.display(),
                    error = %e,
                    "Failed to launch CGI program"
                );
                return Ok(());
            }
        };

        let status = child.wait().await?;
        tracing::debug!(program = %self.program.display(), %status, "CGI program finished");

        Ok(())
    }
}
