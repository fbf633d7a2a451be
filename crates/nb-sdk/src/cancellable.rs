//! Cancellable long-running operations: large transfers and the
//! Google Drive OAuth wait both need a `start`/`cancel` handle the UI can
//! act on from another thread. The core only ever runs the transfer
//! binary as a subprocess, so cancellation is "terminate, then kill after
//! a bounded grace period" rather than anything cooperative inside this
//! process.

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// A spawned transfer-binary invocation the caller can cancel from
/// another thread. `cancel` issues a terminate-then-kill sequence
///: on unix, `SIGTERM` first, then `SIGKILL` if the process
/// hasn't exited within [`TERMINATE_GRACE_PERIOD`].
pub struct CancellableTransfer {
    child: Child,
    cancelled: Arc<AtomicBool>,
}

impl CancellableTransfer {
    pub fn spawn(binary: &str, args: &[String]) -> std::io::Result<Self> {
        let child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        Ok(Self {
            child,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A cheap, clonable flag the caller can poll or hand to another
    /// thread to learn whether `cancel` was called, independent of
    /// whether the process has actually exited yet.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Block until the process exits, returning its collected output.
    /// Spec §5: "no cleanup of partially-transferred files is performed"
    /// — this call never retries or cleans up on its own.
    pub fn wait(mut self) -> std::io::Result<std::process::Output> {
        self.child.wait_with_output()
    }

    #[cfg(unix)]
    pub fn cancel(&mut self) -> std::io::Result<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        let pid = self.child.id() as i32;
        unsafe {
            libc::kill(pid, libc::SIGTERM);
        }
        let deadline = std::time::Instant::now() + TERMINATE_GRACE_PERIOD;
        loop {
            match self.child.try_wait()? {
                Some(_) => return Ok(()),
                None if std::time::Instant::now() >= deadline => {
                    self.child.kill()?;
                    let _ = self.child.wait();
                    return Ok(());
                }
                None => std::thread::sleep(Duration::from_millis(100)),
            }
        }
    }

    #[cfg(not(unix))]
    pub fn cancel(&mut self) -> std::io::Result<()> {
        self.cancelled.store(true, Ordering::SeqCst);
        self.child.kill()
    }
}

/// Cooperative cancel point for the Google Drive OAuth wait (spec §9:
/// "model as a cancellable task with a cooperative cancel point checked
/// between backend polls"). `poll` is called repeatedly until it reports
/// the flow has completed or `token` is flipped; there is no fixed
/// timeout, matching spec §5's "SSH host-key verification has no timeout
/// (interactive)" treatment of the equivalent wait on the SSH side.
pub async fn wait_for_gdrive_oauth<F>(
    token: Arc<AtomicBool>,
    poll_interval: Duration,
    mut poll: F,
) -> Option<String>
where
    F: FnMut() -> Option<String>,
{
    loop {
        if token.load(Ordering::SeqCst) {
            return None;
        }
        if let Some(client_id) = poll() {
            return Some(client_id);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn oauth_wait_returns_as_soon_as_poll_succeeds() {
        let token = Arc::new(AtomicBool::new(false));
        let calls = AtomicUsize::new(0);
        let result = wait_for_gdrive_oauth(token, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n >= 2 {
                Some("client-id".to_string())
            } else {
                None
            }
        })
        .await;
        assert_eq!(result, Some("client-id".to_string()));
    }

    #[tokio::test]
    async fn oauth_wait_returns_none_once_cancelled() {
        let token = Arc::new(AtomicBool::new(true));
        let result = wait_for_gdrive_oauth(token, Duration::from_millis(1), || None).await;
        assert_eq!(result, None);
    }
}
