//! Settings editor running as a child process
//!
//! The child is this executable started with the `configure` subcommand and
//! pointed at the same storage directory and catalog profile, so it edits the
//! same persisted overrides. While the child is alive, further opens are
//! no-ops; once it exits the next open starts a new one.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command};
use tracing::{debug, error, info, warn};

use super::ConfigurationSurface;
use crate::constants::{editor, env};
use crate::settings::{CatalogProfile, SharedSettings};

/// How the editor child gets launched
#[derive(Debug, Clone)]
pub struct EditorCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl EditorCommand {
    /// `<current exe> configure`
    pub fn current_exe() -> Result<Self> {
        let program = std::env::current_exe().context("Failed to resolve executable path")?;
        Ok(Self {
            program,
            args: vec![editor::SUBCOMMAND.into()],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    NotStarted,
    Running(u32),
    Exited(Option<i32>),
}

pub struct EditorProcess {
    command: EditorCommand,
    storage_dir: PathBuf,
    child: Option<Child>,
    status: EditorStatus,
}

impl EditorProcess {
    pub fn new(command: EditorCommand, storage_dir: PathBuf) -> Self {
        Self {
            command,
            storage_dir,
            child: None,
            status: EditorStatus::NotStarted,
        }
    }

    /// Refresh and return the child's status
    pub fn poll(&mut self) -> EditorStatus {
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    info!(pid = child.id(), exit = ?status.code(), "Settings editor exited");
                    self.child = None;
                    self.status = EditorStatus::Exited(status.code());
                }
                Ok(None) => {
                    self.status = EditorStatus::Running(child.id());
                }
                Err(err) => {
                    error!(error = ?err, "Failed to query settings editor status");
                }
            }
        }
        self.status
    }

    fn spawn(&self, profile: CatalogProfile) -> Result<Child> {
        let profile = match profile {
            CatalogProfile::Standard => "standard",
            CatalogProfile::Development => "development",
        };
        Command::new(&self.command.program)
            .args(&self.command.args)
            .env(env::STORAGE_DIR, &self.storage_dir)
            .env(env::PROFILE, profile)
            .spawn()
            .with_context(|| format!("Failed to spawn settings editor {:?}", self.command.program))
    }

    /// Stop the child if it is still running
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            info!(pid = child.id(), "Stopping settings editor");
            let _ = child.kill();
            let status = child
                .wait()
                .context("Failed to wait for settings editor exit")?;
            self.status = EditorStatus::Exited(status.code());
        }
        Ok(())
    }
}

impl ConfigurationSurface for EditorProcess {
    fn open(&mut self, settings: SharedSettings) -> Result<()> {
        if let EditorStatus::Running(pid) = self.poll() {
            debug!(pid, "Settings editor already open");
            return Ok(());
        }

        let child = self.spawn(settings.catalog().profile())?;
        let pid = child.id();
        info!(pid, storage_dir = %self.storage_dir.display(), "Started settings editor");
        self.child = Some(child);
        self.status = EditorStatus::Running(pid);
        Ok(())
    }
}

impl Drop for EditorProcess {
    fn drop(&mut self) {
        // Leave a running editor alone; it only writes the shared storage
        if let Some(child) = &self.child {
            warn!(pid = child.id(), "Settings editor still running");
        }
    }
}
