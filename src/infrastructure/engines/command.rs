use super::engine::EngineError;
use std::ffi::OsStr;
use std::io;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Run an external synthesizer to completion and return its stdout.
///
/// A binary that is not installed maps to [`EngineError::Unavailable`] so the
/// registry can move on to the next engine.
pub(crate) async fn run<I, S>(program: &str, args: I, stdin: Option<&str>) -> Result<Vec<u8>, EngineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = ?cmd, "Running synthesizer");

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EngineError::Unavailable(format!("{} is not installed", program)),
        _ => EngineError::Io(e),
    })?;

    // Fed from its own task so a child that exits early still reports its
    // exit status and stderr
    let writer = match (stdin, child.stdin.take()) {
        (Some(text), Some(mut pipe)) => {
            let text = text.to_owned();
            Some(tokio::spawn(async move {
                pipe.write_all(text.as_bytes()).await?;
                pipe.shutdown().await
            }))
        }
        _ => None,
    };

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(EngineError::CommandFailed {
            command: program.to_string(),
            detail: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!(command = program, "Synthesizer exited before reading all input");
            }
            Ok(Err(e)) => return Err(EngineError::Io(e)),
            Err(e) => return Err(EngineError::Io(io::Error::new(io::ErrorKind::Other, e))),
        }
    }

    Ok(output.stdout)
}
