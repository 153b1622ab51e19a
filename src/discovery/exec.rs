// Bounded subprocess invocation for the external detectors.
//
// Each detector run is a blocking call with a wall-clock deadline. On
// timeout the child is killed and the caller sees `None`, which it treats
// as "zero candidates from this tool".

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Captured output of a completed child process.
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run a command to completion with a wall-clock timeout.
///
/// Returns `Ok(None)` when the deadline passes before the child exits;
/// the child is killed in that case. Spawn failures (tool not installed)
/// surface as `Err` so the caller can log and move on.
pub fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> std::io::Result<Option<CapturedOutput>> {
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    debug!("Spawning: {:?}", command);
    let mut child = command.spawn()?;

    // Pipes must be drained while waiting or a chatty child deadlocks on
    // a full pipe buffer.
    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                warn!("Command exceeded {:?} timeout, killing", timeout);
                kill_and_reap(&mut child);
                return Ok(None);
            }
            None => std::thread::sleep(Duration::from_millis(50)),
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(Some(CapturedOutput {
        stdout,
        stderr,
        success: status.success(),
    }))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!("Failed to kill timed-out child: {}", e);
    }
    let _ = child.wait();
}
