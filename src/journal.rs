//! Journal of composition attempts.
//!
//! Each preview the admin runs is recorded here so editors can see what
//! a template produced and when it failed. Entries live in memory for
//! the session; a purge drops entries past the retention window.

use chrono::{DateTime, Duration, Utc};

use crate::settings::AppSettings;
use crate::template::compose::{ComposeError, ComposedMessage};
use crate::template::MessageTemplate;

/// Outcome of one composition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Success,
    Failure,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Success => write!(f, "SUCCESS. Message composed."),
            EntryStatus::Failure => write!(f, "FAILURE. Message not composed due to errors."),
        }
    }
}

/// The record of one attempt to compose a templated message.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub template: String,
    pub recipients: Vec<String>,
    pub status: EntryStatus,
    /// Problem description for failures, empty for successes.
    pub message: String,
    /// Rendered subject and body, captured only when settings allow.
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt, honoring the journal settings and the
    /// template's suppress flag. Returns whether an entry was written.
    pub fn record(
        &mut self,
        template: &MessageTemplate,
        recipients: &[String],
        outcome: Result<&ComposedMessage, &ComposeError>,
        settings: &AppSettings,
    ) -> bool {
        if !settings.log_previews || template.suppress_log {
            return false;
        }

        let (status, message, content) = match outcome {
            Ok(composed) => {
                let content = settings
                    .log_content
                    .then(|| format!("Subject: {}\n\n{}", composed.subject, composed.body));
                (EntryStatus::Success, String::new(), content)
            }
            Err(err) => (EntryStatus::Failure, err.problems.join("; "), None),
        };

        self.entries.push(JournalEntry {
            template: template.label(),
            recipients: recipients.to_vec(),
            status,
            message,
            content,
            timestamp: Utc::now(),
        });
        true
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries older than the retention window, as seen from `now`.
    ///
    /// Failures survive the purge when `purge_failed_entries` is off.
    /// Returns how many entries were removed.
    pub fn purge(&mut self, now: DateTime<Utc>, settings: &AppSettings) -> usize {
        let cutoff = now - Duration::days(settings.log_retention_days);
        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.timestamp > cutoff
                || (entry.status == EntryStatus::Failure && !settings.purge_failed_entries)
        });
        before - self.entries.len()
    }
}
