//! Terminal stand-ins for the page's notification area and document.

use std::io::Write;

use odr_api::{DocumentView, Notification, Notifier};

/// Prints notifications to stderr as `[<title>] <text>`.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(icon = %notification.icon, sticky = notification.sticky, "notification");
        eprintln!("[{}] {}", notification.title, notification.text);
    }
}

/// Dumps the raw server diagnostic to stdout in place of normal output.
#[derive(Debug, Default)]
pub struct StdoutView;

impl DocumentView for StdoutView {
    fn replace_document(&self, raw_body: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(raw_body.as_bytes());
        if !raw_body.ends_with('\n') {
            let _ = out.write_all(b"\n");
        }
        let _ = out.flush();
    }
}
