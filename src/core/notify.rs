//! Entry confirmation notifications.
//!
//! Delivery is fire-and-forget: a failed send is logged and dropped, it never
//! reaches the caller that recorded the entry.

use crate::config::NotificationConfig;
use crate::errors::{AppError, AppResult};
use crate::models::entry::PointEntry;
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// RFC 822 style rendering used by file-based transports.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("From: {}\n", self.from));
        out.push_str(&format!("To: {}\n", self.to.join(", ")));
        if !self.cc.is_empty() {
            out.push_str(&format!("Cc: {}\n", self.cc.join(", ")));
        }
        out.push_str(&format!("Subject: {}\n", self.subject));
        out.push_str(&format!("Date: {}\n", Local::now().to_rfc2822()));
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> AppResult<()>;
}

/// Writes each message as a `.eml` file into a pickup directory.
pub struct SpoolTransport {
    dir: PathBuf,
}

static SPOOL_SEQ: AtomicU64 = AtomicU64::new(0);

impl SpoolTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MailTransport for SpoolTransport {
    fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::Notification(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let seq = SPOOL_SEQ.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            "{}-{}-{seq}.eml",
            Local::now().format("%Y%m%d%H%M%S%6f"),
            std::process::id()
        );
        let path = self.dir.join(name);

        fs::write(&path, mail.render()).map_err(|e| {
            AppError::Notification(format!("cannot write {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "spooled notification");
        Ok(())
    }
}

pub struct Notifier {
    cfg: NotificationConfig,
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(cfg: NotificationConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { cfg, transport }
    }

    pub fn from_config(cfg: &NotificationConfig) -> Self {
        let transport = Arc::new(SpoolTransport::new(&cfg.spool_dir));
        Self::new(cfg.clone(), transport)
    }

    pub fn compose_entry_confirmation(
        &self,
        employee_name: &str,
        recipient: &str,
        entry: &PointEntry,
    ) -> OutgoingMail {
        let notes = if entry.notes.is_empty() {
            "-"
        } else {
            entry.notes.as_str()
        };

        let body = format!(
            "Hello {employee_name},\n\n\
             Your points were recorded:\n\n\
             Date/Time: {}\n\
             Category:  {}\n\
             Points:    {}\n\
             Notes:     {notes}\n\n\
             Regards,\n\
             Points system\n",
            entry.timestamp_str(),
            entry.category,
            entry.points,
        );

        let cc = if self.cfg.copy_sender {
            vec![self.cfg.sender.clone()]
        } else {
            Vec::new()
        };

        OutgoingMail {
            from: self.cfg.sender.clone(),
            to: vec![recipient.to_string()],
            cc,
            subject: "Points recorded".to_string(),
            body,
        }
    }

    /// Queue a confirmation for `entry` on a background thread.
    ///
    /// Returns `None` when notifications are disabled or the employee has no
    /// address configured.
    pub fn entry_recorded(
        &self,
        employee_name: &str,
        entry: &PointEntry,
    ) -> Option<JoinHandle<()>> {
        if !self.cfg.enabled {
            return None;
        }

        let Some(recipient) = self.cfg.recipients.get(employee_name) else {
            tracing::warn!(employee = employee_name, "no notification address configured");
            return None;
        };

        let mail = self.compose_entry_confirmation(employee_name, recipient, entry);
        let transport = Arc::clone(&self.transport);
        let employee = employee_name.to_string();

        let spawned = thread::Builder::new()
            .name("notify".to_string())
            .spawn(move || match transport.send(&mail) {
                Ok(()) => tracing::info!(employee = %employee, to = ?mail.to, "confirmation sent"),
                Err(e) => tracing::error!(employee = %employee, error = %e, "confirmation failed"),
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "cannot start notification thread");
                None
            }
        }
    }
}
