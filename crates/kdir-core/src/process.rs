use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a program and capture stdout/stderr, optionally feeding `stdin`.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or the I/O streams cannot
/// be read entirely.
pub fn run_command(program: &Path, args: &[String], stdin: Option<&[u8]>) -> Result<RunOutput> {
    let shown = program.display().to_string();
    let mut command = Command::new(program);
    command.args(args);
    command.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    tracing::debug!(program = %shown, ?args, "spawning");
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {shown}"))?;

    // Stdin is fed from its own thread; the child may fill stdout before reading it all.
    let writer = match (stdin, child.stdin.take()) {
        (Some(bytes), Some(mut pipe)) => {
            let bytes = bytes.to_vec();
            Some(thread::spawn(move || pipe.write_all(&bytes)))
        }
        _ => None,
    };

    let output = child
        .wait_with_output()
        .with_context(|| format!("failed to wait for {shown}"))?;
    if let Some(handle) = writer {
        let written = handle
            .join()
            .map_err(|_| anyhow::anyhow!("stdin thread panicked"))?;
        match written {
            Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(err).with_context(|| format!("failed to write stdin of {shown}"));
            }
            _ => {}
        }
    }

    let code = output.status.code().unwrap_or(-1);
    tracing::debug!(program = %shown, code, "finished");
    Ok(RunOutput {
        code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
