use core::time::Duration;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::str;
use std::sync::{Arc, Mutex};
use std::thread::{self, sleep, JoinHandle};
use std::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::{handle_exec_error, handle_generic_error, Error};

/// Timeout applied to read-only chain queries.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout applied to transaction submission, which may wait on gas simulation.
pub const TX_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_CHILD_INTERVAL: Duration = Duration::from_millis(50);

/**
   How long to keep reading output after a timed-out child is killed.
   Descendants of the child may still hold the pipes open.
*/
const DRAIN_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

pub fn simple_exec(desc: &str, command_path: &str, args: &[&str]) -> Result<ExecOutput, Error> {
    exec_with_timeout(desc, command_path, args, QUERY_TIMEOUT)
}

/**
   Run a command to completion, killing it if it does not exit within
   `timeout`.

   Stdout and stderr are drained on background threads so that a chatty
   child cannot block on a full pipe while we wait for it. After a
   timeout the output read so far is reported, without waiting for
   descendants that keep the pipes open.
*/
pub fn exec_with_timeout(
    desc: &str,
    command_path: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<ExecOutput, Error> {
    debug!(
        "Executing command for {}: {} {}",
        desc,
        command_path,
        itertools::join(args, " ")
    );

    let mut child = Command::new(command_path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(handle_exec_error(command_path))?;

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let Some(status) = wait_until(&mut child, timeout)? else {
        let drain_deadline = Instant::now() + DRAIN_GRACE;
        let stdout = stdout_reader.collect_until(drain_deadline);
        let stderr = stderr_reader.collect_until(drain_deadline);

        let output = format!("{}{}", stdout, stderr);
        return Err(Error::command_timeout(
            command_path.to_string(),
            timeout,
            output.trim().to_string(),
        ));
    };

    let stdout = stdout_reader.collect()?;
    let stderr = stderr_reader.collect()?;

    if status.success() {
        trace!(
            "command executed successfully with stdout: {}, stderr: {}",
            stdout,
            stderr
        );

        Ok(ExecOutput { stdout, stderr })
    } else {
        let message = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        Err(Error::command_failed(
            command_path.to_string(),
            status.code(),
            message,
        ))
    }
}

fn wait_until(
    child: &mut Child,
    timeout: Duration,
) -> Result<Option<std::process::ExitStatus>, Error> {
    let started = Instant::now();

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if started.elapsed() >= timeout {
            // The child may exit between the check and the kill.
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }

        sleep(POLL_CHILD_INTERVAL);
    }
}

/**
   A pipe being read on a background thread into a shared buffer, so that
   partial output stays reachable when the reader is abandoned.
*/
struct OutputReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<std::io::Result<()>>,
}

fn drain(source: Option<impl Read + Send + 'static>) -> OutputReader {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = buffer.clone();

    let handle = thread::spawn(move || {
        let Some(mut source) = source else {
            return Ok(());
        };

        let mut chunk = [0u8; 4096];
        loop {
            let read = source.read(&mut chunk)?;
            if read == 0 {
                return Ok(());
            }
            sink.lock()
                .unwrap_or_else(|e| e.into_inner())
                .extend_from_slice(&chunk[..read]);
        }
    });

    OutputReader { buffer, handle }
}

impl OutputReader {
    fn collect(self) -> Result<String, Error> {
        self.handle
            .join()
            .map_err(|_| handle_generic_error(eyre::eyre!("output reader thread panicked")))??;

        let bytes = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let output = str::from_utf8(&bytes).map_err(handle_generic_error)?;

        Ok(output.to_string())
    }

    /// The output read by `deadline`. The reader thread is detached if the pipe is still open.
    fn collect_until(self, deadline: Instant) -> String {
        while !self.handle.is_finished() && Instant::now() < deadline {
            sleep(POLL_CHILD_INTERVAL);
        }

        if !self.handle.is_finished() {
            warn!("output pipe still open after killing command; reporting partial output");
        }

        let bytes = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let output = String::from_utf8_lossy(&bytes).into_owned();

        output
    }
}
