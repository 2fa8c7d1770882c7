//! Child process helpers shared by the adapters.

use crate::ToolError;
use std::process::{Command, Output, Stdio};

/// Run `cmd` to completion, failing on a non-zero exit.
///
/// Only stdout is returned; stderr is kept for the error message so tool
/// warnings never end up in the JSON being parsed.
pub(crate) fn run(tool: &str, cmd: &mut Command) -> Result<String, ToolError> {
    if which::which(tool).is_err() {
        return Err(ToolError::NotAvailable(tool.to_string()));
    }

    tracing::debug!(?cmd, "running {tool}");
    let output: Output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ToolError::Io {
            tool: tool.to_string(),
            source,
        })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "signal".to_string(),
        };
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First non-empty stdout line of a successful command.
pub(crate) fn first_line_of(argv: &[&str]) -> Option<String> {
    let (program, args) = argv.split_first()?;
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|s| {
            s.lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
}
