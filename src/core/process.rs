use anyhow::{Context, Result};
use std::time::Duration;

/// Run a command with arguments and a timeout, returning stdout as a String.
pub async fn run_command(cmd: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let output = tokio::time::timeout(
        timeout,
        tokio::process::Command::new(cmd)
            .args(args)
            .output(),
    )
    .await
    .context(format!("Command `{}` timed out", cmd))?
    .context(format!("Failed to execute `{}`", cmd))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "`{} {}` exited with {}: {}",
            cmd,
            args.first().copied().unwrap_or_default(),
            output.status,
            stderr.trim()
        );
    }

    let stdout = String::from_utf8(output.stdout)
        .context(format!("Non-UTF8 output from `{}`", cmd))?;
    Ok(stdout.trim().to_string())
}
