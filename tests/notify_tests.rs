use refpoints::config::NotificationConfig;
use refpoints::core::notify::{MailTransport, Notifier, OutgoingMail, SpoolTransport};
use refpoints::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod common;
use common::entry;

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl MailTransport for Recorder {
    fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

struct Broken;

impl MailTransport for Broken {
    fn send(&self, _mail: &OutgoingMail) -> AppResult<()> {
        Err(AppError::Notification("smtp down".into()))
    }
}

fn cfg(enabled: bool) -> NotificationConfig {
    let mut recipients = BTreeMap::new();
    recipients.insert("Ana".to_string(), "ana@example.com".to_string());

    NotificationConfig {
        enabled,
        sender: "points@example.com".to_string(),
        copy_sender: true,
        spool_dir: String::new(),
        recipients,
    }
}

fn spool_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("refpoints_spool_{name}"));
    fs::remove_dir_all(&dir).ok();
    dir
}

#[test]
fn confirmation_goes_to_the_mapped_address_with_sender_in_copy() {
    let recorder = Arc::new(Recorder::default());
    let notifier = Notifier::new(cfg(true), recorder.clone());

    let e = entry(7, 1, "2025-09-02 10:30:00", 450);
    let handle = notifier.entry_recorded("Ana", &e).expect("thread started");
    handle.join().unwrap();

    let sent = recorder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, ["ana@example.com"]);
    assert_eq!(sent[0].cc, ["points@example.com"]);
    assert!(sent[0].body.contains("2025-09-02 10:30:00"));
    assert!(sent[0].body.contains("450"));
    assert!(sent[0].body.contains("REDUC"));
}

#[test]
fn unknown_recipient_and_disabled_config_send_nothing() {
    let recorder = Arc::new(Recorder::default());
    let e = entry(1, 1, "2025-09-02", 10);

    let notifier = Notifier::new(cfg(true), recorder.clone());
    assert!(notifier.entry_recorded("Bruno", &e).is_none());

    let disabled = Notifier::new(cfg(false), recorder.clone());
    assert!(disabled.entry_recorded("Ana", &e).is_none());

    assert!(recorder.sent.lock().unwrap().is_empty());
}

#[test]
fn delivery_failure_is_swallowed() {
    let notifier = Notifier::new(cfg(true), Arc::new(Broken));
    let e = entry(1, 1, "2025-09-02", 10);

    let handle = notifier.entry_recorded("Ana", &e).expect("thread started");
    assert!(handle.join().is_ok());
}

#[test]
fn spool_transport_writes_one_file_per_message() {
    let dir = spool_dir("writes");
    let transport = SpoolTransport::new(&dir);

    let notifier = Notifier::new(cfg(true), Arc::new(SpoolTransport::new(&dir)));
    let recorded = entry(1, 1, "2025-09-02", 10);
    let mail = notifier.compose_entry_confirmation("Ana", "ana@example.com", &recorded);

    transport.send(&mail).unwrap();
    transport.send(&mail).unwrap();

    let files: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(files.len(), 2);

    let path = files[0].as_ref().unwrap().path();
    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with("From: points@example.com\n"));
    assert!(text.contains("To: ana@example.com\n"));
    assert!(text.contains("Cc: points@example.com\n"));
    assert!(text.contains("Subject: Points recorded\n"));
}

#[test]
fn copy_to_sender_can_be_turned_off() {
    let mut c = cfg(true);
    c.copy_sender = false;
    let notifier = Notifier::new(c, Arc::new(Recorder::default()));

    let recorded = entry(1, 1, "2025-09-02", 10);
    let mail = notifier.compose_entry_confirmation("Ana", "ana@example.com", &recorded);
    assert!(mail.cc.is_empty());
    assert!(!mail.render().contains("Cc:"));
}
