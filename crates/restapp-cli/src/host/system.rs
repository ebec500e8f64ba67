//! End-of-session actions against the operating system.

use std::process::Command;

use restapp_core::{CoreError, TerminalActionExecutor};

/// Runs the platform's mute/shutdown commands.
#[derive(Debug, Default)]
pub struct SystemActions;

/// Logs the action instead of running it.
#[derive(Debug, Default)]
pub struct DryRunActions {
    pub executed: Vec<&'static str>,
}

fn run(program: &str, args: &[&str]) -> Result<(), CoreError> {
    tracing::info!(program, ?args, "running system command");
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CoreError::Io(std::io::Error::other(format!(
            "{program} exited with {status}"
        ))))
    }
}

impl TerminalActionExecutor for SystemActions {
    fn mute(&mut self) -> Result<(), CoreError> {
        if cfg!(target_os = "windows") {
            // VK_VOLUME_MUTE toggles the master mute.
            run(
                "powershell",
                &[
                    "-NoProfile",
                    "-Command",
                    "(New-Object -ComObject WScript.Shell).SendKeys([char]173)",
                ],
            )
        } else if cfg!(target_os = "macos") {
            run("osascript", &["-e", "set volume output muted true"])
        } else {
            run("pactl", &["set-sink-mute", "@DEFAULT_SINK@", "1"])
                .or_else(|_| run("amixer", &["-q", "set", "Master", "mute"]))
        }
    }

    fn shutdown(&mut self) -> Result<(), CoreError> {
        if cfg!(target_os = "windows") {
            run("shutdown", &["/s", "/t", "1"])
        } else if cfg!(target_os = "macos") {
            run("osascript", &["-e", "tell app \"System Events\" to shut down"])
        } else {
            run("systemctl", &["poweroff"])
        }
    }
}

impl TerminalActionExecutor for DryRunActions {
    fn mute(&mut self) -> Result<(), CoreError> {
        tracing::info!("dry run: would mute system audio");
        self.executed.push("mute");
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), CoreError> {
        tracing::info!("dry run: would shut down");
        self.executed.push("shutdown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restapp_core::TerminalAction;

    #[test]
    fn dry_run_records_action() {
        let mut exec = DryRunActions::default();
        exec.execute(TerminalAction::Shutdown).unwrap();
        exec.execute(TerminalAction::Mute).unwrap();
        assert_eq!(exec.executed, vec!["shutdown", "mute"]);
    }
}
