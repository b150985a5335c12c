//! Field visibility rules for the template editor form.
//!
//! Three form regions are managed: the plain-text body, the HTML body,
//! and the autogenerate-text checkbox row. Which of them an editor sees
//! depends on the content-type selector and the checkbox state. The
//! mapping is a fixed decision table with no memory of prior evaluations.

/// MIME type that selects plain-text editing mode.
pub const PLAIN_TEXT: &str = "text/plain";

/// MIME type for HTML templates.
///
/// Only [`PLAIN_TEXT`] is special-cased; every other content type,
/// including this one, takes the HTML branch of the table.
pub const HTML: &str = "text/html";

/// Snapshot of the two form inputs the visibility rules read.
///
/// Taken from the form at evaluation time and thrown away afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub content_type: String,
    pub autogenerate_text: bool,
}

/// Resolved visibility for the three managed form regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Plain-text body editor.
    pub body_text: bool,
    /// HTML body editor.
    pub body_html: bool,
    /// Autogenerate-text checkbox row.
    pub autogenerate: bool,
}

impl FieldLayout {
    /// Resolve the decision table for a content type and checkbox state.
    ///
    /// Plain-text mode wins regardless of the checkbox: the HTML editor
    /// and the checkbox row are pointless for a text-only template. In
    /// HTML mode with autogeneration on, the manual plain-text editor is
    /// hidden because its content would be overwritten; with
    /// autogeneration off, everything is shown.
    pub fn resolve(content_type: &str, autogenerate_text: bool) -> Self {
        if content_type == PLAIN_TEXT {
            Self {
                body_text: true,
                body_html: false,
                autogenerate: false,
            }
        } else if autogenerate_text {
            Self {
                body_text: false,
                body_html: true,
                autogenerate: true,
            }
        } else {
            Self {
                body_text: true,
                body_html: true,
                autogenerate: true,
            }
        }
    }

    /// Resolve from a captured form snapshot.
    pub fn for_state(state: &FormState) -> Self {
        Self::resolve(&state.content_type, state.autogenerate_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_shows_only_text_body() {
        for autogen in [true, false] {
            let layout = FieldLayout::resolve(PLAIN_TEXT, autogen);
            assert!(layout.body_text);
            assert!(!layout.body_html);
            assert!(!layout.autogenerate);
        }
    }

    #[test]
    fn html_with_autogen_hides_text_body() {
        let layout = FieldLayout::resolve(HTML, true);
        assert!(!layout.body_text);
        assert!(layout.body_html);
        assert!(layout.autogenerate);
    }

    #[test]
    fn html_without_autogen_shows_everything() {
        let layout = FieldLayout::resolve(HTML, false);
        assert!(layout.body_text);
        assert!(layout.body_html);
        assert!(layout.autogenerate);
    }

    #[test]
    fn unknown_types_take_the_html_branch() {
        assert_eq!(
            FieldLayout::resolve("text/markdown", true),
            FieldLayout::resolve(HTML, true)
        );
        assert_eq!(
            FieldLayout::resolve("", false),
            FieldLayout::resolve(HTML, false)
        );
    }

    #[test]
    fn resolution_is_pure() {
        let first = FieldLayout::resolve(HTML, true);
        let second = FieldLayout::resolve(HTML, true);
        assert_eq!(first, second);
    }
}
