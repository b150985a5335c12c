//! Message template model and the operations built around it.
//!
//! A [`MessageTemplate`] is what the admin form edits: subject and body
//! templates plus the envelope defaults and flags that shape composition.
//! The surrounding modules cover the catalog ([`registry`]), placeholder
//! rendering ([`render`]), plain-text autogeneration ([`autogen`]), and
//! message assembly ([`compose`]).

pub mod autogen;
pub mod compose;
pub mod registry;
pub mod render;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::visibility::PLAIN_TEXT;

/// A template for an email message authored in the admin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessageTemplate {
    /// Template name, unique together with `scope`.
    pub name: String,
    /// Optional related-object key specializing this template. Lookup
    /// falls back to the unscoped template of the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub description: String,
    /// MIME type of the authored body. Anything other than `text/plain`
    /// is edited and composed as HTML.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Derive the plain-text part from the HTML body when composing.
    #[serde(default = "default_true")]
    pub autogenerate_text: bool,
    pub subject_template: String,
    #[serde(default)]
    pub body_template: String,
    #[serde(default)]
    pub body_template_html: String,
    /// Address messages appear to be sent from. `None` falls back to the
    /// application default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Addresses CCed on every message composed from this template, in
    /// addition to any given per message.
    #[serde(default)]
    pub base_cc: Vec<String>,
    /// As `base_cc`, for BCC.
    #[serde(default)]
    pub base_bcc: Vec<String>,
    /// Disabled templates are never returned by catalog lookups.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Skip journal entries for this template regardless of settings.
    /// Useful for frequently composed, low-value messages.
    #[serde(default)]
    pub suppress_log: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_user: String,
}

impl MessageTemplate {
    /// Create an empty enabled plain-text template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: None,
            description: String::new(),
            content_type: default_content_type(),
            autogenerate_text: true,
            subject_template: String::new(),
            body_template: String::new(),
            body_template_html: String::new(),
            sender: None,
            base_cc: Vec::new(),
            base_bcc: Vec::new(),
            enabled: true,
            suppress_log: false,
            edited_date: None,
            edited_user: String::new(),
        }
    }

    pub fn is_plain_text(&self) -> bool {
        self.content_type == PLAIN_TEXT
    }

    /// Display label: name, scope, and a disabled marker.
    pub fn label(&self) -> String {
        let status = if self.enabled { "" } else { " (Disabled)" };
        match &self.scope {
            Some(scope) => format!("{} for {}{}", self.name, scope, status),
            None => format!("{}{}", self.name, status),
        }
    }

    /// Stamp edit metadata after a change in the admin.
    pub fn touch(&mut self, user: &str) {
        self.edited_date = Some(Utc::now());
        self.edited_user = user.to_string();
    }
}

fn default_content_type() -> String {
    PLAIN_TEXT.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::visibility::HTML;

    #[test]
    fn new_templates_default_to_plain_text() {
        let template = MessageTemplate::new("Welcome");
        assert!(template.is_plain_text());
        assert!(template.enabled);
        assert!(template.autogenerate_text);
    }

    #[test]
    fn labels_include_scope_and_disabled_marker() {
        let mut template = MessageTemplate::new("Welcome");
        assert_eq!(template.label(), "Welcome");

        template.scope = Some("eu-site".to_string());
        template.enabled = false;
        assert_eq!(template.label(), "Welcome for eu-site (Disabled)");
    }

    #[test]
    fn yaml_defaults_match_the_model_defaults() {
        let template: MessageTemplate = serde_yaml::from_str(
            "name: Reset\nsubject_template: Reset your password\n",
        )
        .unwrap();
        assert_eq!(template.content_type, PLAIN_TEXT);
        assert!(template.autogenerate_text);
        assert!(template.enabled);
        assert!(!template.suppress_log);
        assert!(template.base_cc.is_empty());
    }

    #[test]
    fn content_type_round_trips_as_a_string() {
        let mut template = MessageTemplate::new("Digest");
        template.content_type = HTML.to_string();
        let yaml = serde_yaml::to_string(&template).unwrap();
        let back: MessageTemplate = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.content_type, HTML);
    }
}
