use crate::error::PipelineError;
use std::io;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Runs a collaborator command to completion with a bounded wait.
/// The child is killed once the deadline passes. Returns the exit status
/// and whatever the child wrote to stderr (commands are expected to run
/// with a quiet log level, so the pipe stays small).
pub fn run_with_timeout(
    cmd: &mut Command,
    what: &str,
    timeout: Duration,
) -> Result<(std::process::ExitStatus, String), PipelineError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain stderr from a separate thread while polling. Reading only
    // after exit would let a chatty child fill the pipe and block, and
    // the bounded wait would then kill a healthy collaborator.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PipelineError::CollaboratorTimeout {
                what: what.to_string(),
                secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    Ok((status, stderr))
}

/// Fails early with a readable message when the transcoder binary is missing
/// from PATH, instead of surfacing a bare NotFound mid-run.
pub fn require_binary(program: &str) -> Result<(), PipelineError> {
    match Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' not found on PATH", program),
        ))),
        Err(e) => Err(PipelineError::Io(e)),
    }
}
