//! Plain-text autogeneration from an HTML body.
//!
//! Templates authored as HTML usually want a matching text part without
//! the author maintaining two bodies. This converter produces a readable
//! rendition: headings become `#`-prefixed lines, block tags break lines,
//! every other tag is stripped, and common entities are decoded. It is a
//! text extractor for email bodies, not an HTML parser.

/// Convert rendered HTML into the plain-text part of a message.
pub fn html_to_text(html: &str) -> String {
    let mut raw = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        push_text(&mut raw, &rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('>') else {
            // A stray '<' with no closing '>' is kept as literal text.
            push_text(&mut raw, &rest[open..]);
            rest = "";
            break;
        };

        let tag = &after_open[..close];
        rest = &after_open[close + 1..];

        let (name, is_closing) = tag_name(tag);
        match name.as_str() {
            // Contents of these carry no message text.
            "script" | "style" if !is_closing => {
                let closer = format!("</{name}");
                match rest.to_ascii_lowercase().find(&closer) {
                    Some(idx) => {
                        let skip_to = rest[idx..].find('>').map(|g| idx + g + 1);
                        rest = skip_to.map(|i| &rest[i..]).unwrap_or("");
                    }
                    None => rest = "",
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if is_closing {
                    raw.push_str("\n\n");
                } else {
                    let level = name.as_bytes()[1] - b'0';
                    raw.push_str("\n\n");
                    for _ in 0..level {
                        raw.push('#');
                    }
                    raw.push(' ');
                }
            }
            "br" => raw.push('\n'),
            "li" if !is_closing => raw.push_str("\n- "),
            "p" | "div" | "tr" | "table" | "ul" | "ol" | "blockquote" => {
                raw.push_str("\n\n");
            }
            _ => {}
        }
    }
    push_text(&mut raw, rest);

    collapse_whitespace(&raw)
}

/// Extract the tag name from the text between `<` and `>`.
fn tag_name(tag: &str) -> (String, bool) {
    let tag = tag.trim();
    let (tag, is_closing) = match tag.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (tag, false),
    };
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (name, is_closing)
}

/// Append text content, decoding the entities that show up in email HTML.
///
/// Line breaks in the HTML source are formatting, not content; they are
/// folded into spaces here. Structural breaks come from the tag handling
/// above.
fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        push_plain(out, &rest[..amp]);
        let after = &rest[amp + 1..];

        // Entities are short; a ';' further away means a bare ampersand.
        match after.find(';').filter(|&i| i <= 8) {
            Some(end) => {
                let entity = &after[..end];
                match decode_entity(entity) {
                    Some(decoded) => out.push_str(&decoded),
                    None => {
                        out.push('&');
                        out.push_str(entity);
                        out.push(';');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    push_plain(out, rest);
}

fn push_plain(out: &mut String, text: &str) {
    for ch in text.chars() {
        out.push(if ch.is_whitespace() { ' ' } else { ch });
    }
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            return char::from_u32(value).map(String::from);
        }
    };
    Some(decoded.to_string())
}

/// Collapse runs of spaces, cap consecutive line breaks at one blank
/// line, and trim the ends.
fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0u8;
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch == '\n' {
            newlines = newlines.saturating_add(1);
            pending_space = false;
        } else if ch.is_whitespace() {
            pending_space = true;
        } else {
            if newlines > 0 {
                if !out.is_empty() {
                    out.push('\n');
                    if newlines > 1 {
                        out.push('\n');
                    }
                }
                newlines = 0;
            } else if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_become_hash_lines() {
        let text = html_to_text("<h1>*HELLO* *WORLD* in HTML!</h1>");
        assert_eq!(text, "# *HELLO* *WORLD* in HTML!");

        let text = html_to_text("<h3>Details</h3><p>Body</p>");
        assert_eq!(text, "### Details\n\nBody");
    }

    #[test]
    fn inline_tags_are_stripped() {
        let text = html_to_text("Hello <strong>world</strong>, <em>again</em>.");
        assert_eq!(text, "Hello world, again.");
    }

    #[test]
    fn block_tags_break_lines() {
        let text = html_to_text("<p>First</p><p>Second</p>line<br>break");
        assert_eq!(text, "First\n\nSecond\n\nline\nbreak");
    }

    #[test]
    fn list_items_become_bullets() {
        let text = html_to_text("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(text, "- one\n- two");
    }

    #[test]
    fn entities_are_decoded() {
        let text = html_to_text("Fish &amp; chips &lt;today&gt; for &#163;5&nbsp;only");
        assert_eq!(text, "Fish & chips <today> for \u{a3}5 only");
    }

    #[test]
    fn unknown_entities_pass_through() {
        let text = html_to_text("a &bogus; b &incrediblylongname; c");
        assert_eq!(text, "a &bogus; b &incrediblylongname; c");
    }

    #[test]
    fn script_and_style_contents_are_dropped() {
        let text = html_to_text("<style>p { color: red }</style><p>Visible</p><script>var x = 1;</script>");
        assert_eq!(text, "Visible");
    }

    #[test]
    fn attributes_do_not_leak_into_text() {
        let text = html_to_text(r#"<p class="lead">Hi <a href="https://example.com">there</a></p>"#);
        assert_eq!(text, "Hi there");
    }

    #[test]
    fn whitespace_collapses() {
        let text = html_to_text("<p>spaced    out\n\n\n  text</p>");
        assert_eq!(text, "spaced out text");
    }

    #[test]
    fn stray_angle_bracket_is_literal() {
        let text = html_to_text("1 < 2 for sure");
        assert_eq!(text, "1 < 2 for sure");
    }
}
