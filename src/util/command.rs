use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::error::{DebgraphError, Result};

/// Run `program` and return its stdout, failing on a nonzero exit.
pub fn capture_stdout(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to run {program}"))?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(DebgraphError::Other(anyhow::anyhow!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// Feed `input` to `program` on stdin and collect its stdout.
pub fn pipe_through(program: &str, args: &[String], input: &[u8]) -> Result<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to run {program}"))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("{program} stdin unavailable"))?;
    // stdin is fed while stdout drains.
    let (output, written) = std::thread::scope(|scope| {
        let writer = scope.spawn(move || stdin.write_all(input));
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
        (output, written)
    });
    let output = output.with_context(|| format!("failed to wait for {program}"))?;

    if !output.status.success() {
        return Err(DebgraphError::Other(anyhow::anyhow!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    written.with_context(|| format!("failed to write to {program}"))?;
    Ok(output.stdout)
}
