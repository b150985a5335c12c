//! Message composition.
//!
//! Composing takes a template, the per-message draft data, and the
//! application settings, and produces a [`ComposedMessage`] value. There
//! is no transport here; the admin shows the result as a preview and the
//! journal records the attempt.

use thiserror::Error;

use super::autogen::html_to_text;
use super::render::{render, RenderContext};
use super::MessageTemplate;
use crate::settings::AppSettings;

/// Per-message inputs supplied when composing from a template.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub context: RenderContext,
    /// Overrides the template sender and the application default.
    pub from: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    /// Prepended to the rendered subject, e.g. `"[staging] "`.
    pub subject_prefix: String,
}

/// A fully assembled message, ready for a mail transport.
///
/// A present `html_body` means multipart/alternative with the HTML part
/// preferred; `body` is always the plain-text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

/// Composition failure. Subject and body problems are collected so the
/// admin reports all of them in one pass.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to compose {template:?}: {}", .problems.join("; "))]
pub struct ComposeError {
    pub template: String,
    pub problems: Vec<String>,
}

/// Resolve the sender address: draft override, then template sender,
/// then the application default.
pub fn resolve_sender(
    template: &MessageTemplate,
    draft: &Draft,
    settings: &AppSettings,
) -> String {
    draft
        .from
        .clone()
        .or_else(|| template.sender.clone())
        .unwrap_or_else(|| settings.default_from_email.clone())
}

/// Merge a template's base address list with a per-message list.
///
/// Duplicates collapse and the result is sorted, so the same inputs
/// always produce the same header regardless of where an address came
/// from.
pub fn merge_addresses(base: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = base.iter().chain(extra).cloned().collect();
    merged.sort();
    merged.dedup();
    merged
}

/// Assemble a message from a template and a draft.
pub fn compose(
    template: &MessageTemplate,
    draft: &Draft,
    settings: &AppSettings,
) -> Result<ComposedMessage, ComposeError> {
    let mut problems = Vec::new();

    let subject = match render(&template.subject_template, &draft.context) {
        Ok(rendered) => format!("{}{}", draft.subject_prefix, rendered),
        Err(err) => {
            problems.push(format!("failed to render subject ({err})"));
            String::new()
        }
    };

    // The HTML body only exists for HTML-format templates.
    let html = if template.is_plain_text() {
        None
    } else {
        match render(&template.body_template_html, &draft.context) {
            Ok(rendered) => Some(rendered),
            Err(err) => {
                problems.push(format!("failed to render HTML body ({err})"));
                None
            }
        }
    };

    let body = if !template.is_plain_text() && template.autogenerate_text {
        html.as_deref().map(html_to_text).unwrap_or_default()
    } else {
        match render(&template.body_template, &draft.context) {
            Ok(rendered) => rendered,
            Err(err) => {
                problems.push(format!("failed to render body ({err})"));
                String::new()
            }
        }
    };

    if !problems.is_empty() {
        return Err(ComposeError {
            template: template.name.clone(),
            problems,
        });
    }

    let html_body = if settings.allow_html_messages {
        html
    } else {
        None
    };

    Ok(ComposedMessage {
        from: resolve_sender(template, draft, settings),
        to: draft.to.clone(),
        cc: merge_addresses(&template.base_cc, &draft.cc),
        bcc: merge_addresses(&template.base_bcc, &draft.bcc),
        subject,
        body,
        html_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::visibility::HTML;
    use crate::template::render::context_from_pairs;

    fn settings() -> AppSettings {
        AppSettings {
            default_from_email: "noreply@example.com".to_string(),
            ..AppSettings::default()
        }
    }

    fn text_template() -> MessageTemplate {
        let mut t = MessageTemplate::new("Welcome");
        t.subject_template = "Test 1 Subject {{ hello }}".to_string();
        t.body_template = "Test 1 body {{ world }}".to_string();
        t
    }

    fn html_template() -> MessageTemplate {
        let mut t = MessageTemplate::new("Digest");
        t.content_type = HTML.to_string();
        t.subject_template = "Digest".to_string();
        t.body_template = "{{ hello }} {{ world }} in text!".to_string();
        t.body_template_html = "<h1>{{ hello }} {{ world }} in HTML!</h1>".to_string();
        t
    }

    fn draft() -> Draft {
        Draft {
            context: context_from_pairs(["hello=*HELLO*", "world=*WORLD*"]),
            to: vec!["to@example.com".to_string()],
            ..Draft::default()
        }
    }

    #[test]
    fn sender_falls_back_from_draft_to_template_to_settings() {
        let mut template = text_template();
        let mut d = draft();

        assert_eq!(
            resolve_sender(&template, &d, &settings()),
            "noreply@example.com"
        );

        template.sender = Some("team@example.com".to_string());
        assert_eq!(
            resolve_sender(&template, &d, &settings()),
            "team@example.com"
        );

        d.from = Some("override@example.com".to_string());
        assert_eq!(
            resolve_sender(&template, &d, &settings()),
            "override@example.com"
        );
    }

    #[test]
    fn cc_and_bcc_merge_as_a_sorted_set() {
        let mut template = text_template();
        template.base_cc = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let mut d = draft();
        d.cc = vec!["c@example.com".to_string(), "a@example.com".to_string()];

        let message = compose(&template, &d, &settings()).unwrap();
        assert_eq!(
            message.cc,
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
        assert!(message.bcc.is_empty());
    }

    #[test]
    fn subject_and_body_render_with_prefix() {
        let mut d = draft();
        d.subject_prefix = "[PREFIX] ".to_string();

        let message = compose(&text_template(), &d, &settings()).unwrap();
        assert_eq!(message.subject, "[PREFIX] Test 1 Subject *HELLO*");
        assert_eq!(message.body, "Test 1 body *WORLD*");
        assert_eq!(message.html_body, None);
    }

    #[test]
    fn html_templates_compose_a_multipart_message() {
        let message = compose(&html_template(), &draft(), &settings()).unwrap();
        assert_eq!(
            message.html_body.as_deref(),
            Some("<h1>*HELLO* *WORLD* in HTML!</h1>")
        );
        // Autogenerated from the rendered HTML, not from body_template.
        assert_eq!(message.body, "# *HELLO* *WORLD* in HTML!");
    }

    #[test]
    fn autogenerate_off_uses_the_authored_text_body() {
        let mut template = html_template();
        template.autogenerate_text = false;

        let message = compose(&template, &draft(), &settings()).unwrap();
        assert_eq!(message.body, "*HELLO* *WORLD* in text!");
        assert!(message.html_body.is_some());
    }

    #[test]
    fn disallowing_html_drops_the_html_part() {
        let mut s = settings();
        s.allow_html_messages = false;
        let mut template = html_template();
        template.autogenerate_text = false;

        let message = compose(&template, &draft(), &s).unwrap();
        assert_eq!(message.html_body, None);
        assert_eq!(message.body, "*HELLO* *WORLD* in text!");
    }

    #[test]
    fn plain_templates_never_gain_an_html_part() {
        let message = compose(&text_template(), &draft(), &settings()).unwrap();
        assert_eq!(message.html_body, None);
    }

    #[test]
    fn render_failures_are_collected() {
        let mut template = html_template();
        template.subject_template = "broken {{ subject".to_string();
        template.body_template_html = "broken {{ body".to_string();

        let err = compose(&template, &draft(), &settings()).unwrap_err();
        assert_eq!(err.template, "Digest");
        assert_eq!(err.problems.len(), 2);
        assert!(err.problems[0].contains("subject"));
        assert!(err.problems[1].contains("HTML body"));
    }
}
