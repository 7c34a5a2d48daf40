//! Start slideshow surfaces as their own processes.
//!
//! A child gets nothing but the shared data directory (through `LECTERN_DATA`). It runs
//! `slideshow_command` (for example `x-terminal-emulator -e lectern slideshow`), which
//! must open its own window: the child's stdout is discarded so it cannot draw over the
//! control prompt. Without a configured command `open` refuses and points at running
//! `lectern slideshow` in a second terminal.
//!
//! [`Slideshows`] owns every child it started. Exited children are reaped on the next
//! `open`, and the rest are killed and waited on when the control loop ends.

use anyhow::{bail, Context, Result};
use lecternapp::config::LecternConfig;
use lecternapp::init::DATA_ENV;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<String>,
}

pub fn slideshow_invocation(config: &LecternConfig, data_dir: &Path) -> Result<Invocation> {
    let command = config
        .slideshow_command
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = match parts.next() {
        Some(program) => program,
        None => bail!(
            "No slideshow_command configured. Run `lectern --data {} slideshow` in another \
             terminal, or set slideshow_command (e.g. `x-terminal-emulator -e lectern slideshow`)",
            data_dir.display()
        ),
    };
    Ok(Invocation {
        program: program.into(),
        args: parts.collect(),
    })
}

#[derive(Debug, Default)]
pub struct Slideshows {
    children: Vec<Child>,
}

impl Slideshows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a slideshow and return its process id.
    pub fn open(&mut self, config: &LecternConfig, data_dir: &Path) -> Result<u32> {
        self.reap();
        let invocation = slideshow_invocation(config, data_dir)?;
        tracing::info!(program = ?invocation.program, args = ?invocation.args, "starting slideshow");

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .env(DATA_ENV, data_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {:?}", invocation.program))?;
        let pid = child.id();
        self.children.push(child);
        Ok(pid)
    }

    /// Forget children that already exited.
    pub fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(pid = child.id(), %status, "slideshow exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(pid = child.id(), error = %e, "could not poll slideshow");
                false
            }
        });
    }

    pub fn running(&mut self) -> usize {
        self.reap();
        self.children.len()
    }

    /// Kill and wait on every child still running. Returns how many were stopped.
    pub fn shutdown(&mut self) -> usize {
        self.reap();
        let mut stopped = 0;
        for mut child in self.children.drain(..) {
            let pid = child.id();
            if let Err(e) = child.kill() {
                tracing::debug!(pid, error = %e, "slideshow already gone");
            }
            match child.wait() {
                Ok(status) => {
                    tracing::info!(pid, %status, "slideshow stopped");
                    stopped += 1;
                }
                Err(e) => tracing::warn!(pid, error = %e, "could not wait on slideshow"),
            }
        }
        stopped
    }
}

impl Drop for Slideshows {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn with_command(command: &str) -> LecternConfig {
        LecternConfig {
            slideshow_command: Some(command.into()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_command_is_refused_with_a_hint() {
        let err = slideshow_invocation(&LecternConfig::default(), Path::new("/srv/lectern"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("lectern --data /srv/lectern slideshow"), "{err}");
        assert!(err.contains("slideshow_command"), "{err}");

        let mut slideshows = Slideshows::new();
        assert!(slideshows
            .open(&LecternConfig::default(), Path::new("/srv/lectern"))
            .is_err());
        assert_eq!(slideshows.running(), 0);
    }

    #[test]
    fn blank_command_is_refused() {
        assert!(slideshow_invocation(&with_command("   "), Path::new("/tmp")).is_err());
    }

    #[test]
    fn configured_command_is_split() {
        let invocation =
            slideshow_invocation(&with_command("xterm -e lectern slideshow"), Path::new("/tmp"))
                .unwrap();
        assert_eq!(invocation.program, OsString::from("xterm"));
        assert_eq!(invocation.args, vec!["-e", "lectern", "slideshow"]);
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_kills_and_reaps_children() {
        let dir = tempfile::tempdir().unwrap();
        let mut slideshows = Slideshows::new();
        slideshows.open(&with_command("sleep 30"), dir.path()).unwrap();
        slideshows.open(&with_command("sleep 30"), dir.path()).unwrap();
        assert_eq!(slideshows.running(), 2);

        let started = Instant::now();
        assert_eq!(slideshows.shutdown(), 2);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(slideshows.running(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn exited_children_are_reaped() {
        let dir = tempfile::tempdir().unwrap();
        let mut slideshows = Slideshows::new();
        slideshows.open(&with_command("true"), dir.path()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while slideshows.running() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(slideshows.running(), 0);
        assert_eq!(slideshows.shutdown(), 0);
    }
}
