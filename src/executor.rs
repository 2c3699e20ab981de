//! Navigation executor client over a local socket.
//!
//! Goals travel as newline-delimited JSON [`NavigationGoal`]s. The executor's verdict
//! is never read back; it reports on its own channel.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use interprocess::local_socket::LocalSocketStream;
use tracing::{debug, info, warn};

use crate::config::NavigationConfig;
use crate::error::{Error, Result};
use crate::messages::NavigationGoal;
use crate::NavigationExecutor;

type SharedStream = Arc<Mutex<Option<LocalSocketStream>>>;

/// Client for a navigation executor listening on a local socket.
///
/// Socket writes run on tokio's blocking pool, so a stalled executor never holds up
/// a runtime worker. A connection that fails a write is dropped and the next
/// submission connects again; the failed goal itself is not resent.
pub struct IpcNavigationClient {
    socket: String,
    poll_interval: Duration,
    /// `None` waits forever.
    ready_timeout: Option<Duration>,
    stream: SharedStream,
}

impl std::fmt::Debug for IpcNavigationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcNavigationClient")
            .field("socket", &self.socket)
            .field("poll_interval", &self.poll_interval)
            .field("ready_timeout", &self.ready_timeout)
            .finish()
    }
}

impl IpcNavigationClient {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            socket: config.socket.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            ready_timeout: (config.ready_timeout_ms > 0)
                .then(|| Duration::from_millis(config.ready_timeout_ms)),
            stream: Arc::new(Mutex::new(None)),
        }
    }

    pub fn socket(&self) -> &str {
        &self.socket
    }
}

fn lock_poisoned() -> Error {
    Error::Submission("navigation connection lock poisoned".to_string())
}

/// Writes one goal line, connecting first if no live connection is held.
fn write_line(stream: &Mutex<Option<LocalSocketStream>>, socket: &str, line: &[u8]) -> Result<()> {
    let mut guard = stream.lock().map_err(|_| lock_poisoned())?;

    if guard.is_none() {
        let conn = LocalSocketStream::connect(socket).map_err(|e| {
            Error::Submission(format!("navigation executor not connected: {e}"))
        })?;
        info!(socket, "reconnected to navigation executor");
        *guard = Some(conn);
    }

    let written = match guard.as_mut() {
        Some(conn) => conn.write_all(line).and_then(|_| conn.flush()),
        None => return Err(Error::Submission("navigation executor not connected".to_string())),
    };

    if let Err(e) = written {
        *guard = None;
        warn!(socket, "dropping navigation connection: {e}");
        return Err(Error::Submission(e.to_string()));
    }
    Ok(())
}

#[async_trait]
impl NavigationExecutor for IpcNavigationClient {
    async fn wait_for_ready(&self) -> Result<()> {
        let started = Instant::now();

        loop {
            match LocalSocketStream::connect(self.socket.as_str()) {
                Ok(stream) => {
                    *self.stream.lock().map_err(|_| lock_poisoned())? = Some(stream);
                    info!(socket = %self.socket, "connected to navigation executor");
                    return Ok(());
                }
                Err(e) => {
                    if let Some(timeout) = self.ready_timeout {
                        if started.elapsed() >= timeout {
                            return Err(Error::ExecutorUnreachable(format!(
                                "{} not ready after {:?}: {e}",
                                self.socket, timeout
                            )));
                        }
                    }
                    debug!(socket = %self.socket, "navigation executor not ready: {e}");
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn submit_goal(&self, goal: NavigationGoal) -> Result<()> {
        let mut line = serde_json::to_vec(&goal)?;
        line.push(b'\n');

        let stream = Arc::clone(&self.stream);
        let socket = self.socket.clone();
        tokio::task::spawn_blocking(move || write_line(&stream, &socket, &line))
            .await
            .map_err(|e| Error::Submission(format!("submission task failed: {e}")))??;

        debug!(frame = %goal.target_pose.header.frame_id, "navigation goal sent");
        Ok(())
    }
}
