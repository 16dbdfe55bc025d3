//! Markup - Page markup to terminal text
//!
//! Pages render HTML-like strings. The terminal host only shows their
//! text: tags are dropped, block-level tags end the current line, runs of
//! whitespace collapse to one space and the common entities are decoded.
//! Lines are then wrapped to the width of the watch face.

const BLOCK_TAGS: &[&str] = &[
    "br", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "section", "header",
    "footer", "tr",
];

fn is_block(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

/// Decode `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&#39;`, `&apos;`, `&nbsp;`.
/// Unknown entities are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest.find(';').and_then(|end| {
            let replacement = match &rest[..=end] {
                "&amp;" => '&',
                "&lt;" => '<',
                "&gt;" => '>',
                "&quot;" => '"',
                "&#39;" | "&apos;" => '\'',
                "&nbsp;" => ' ',
                _ => return None,
            };
            Some((replacement, end + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn flush(line: &mut String, lines: &mut Vec<String>) {
    let text = decode_entities(line.trim());
    if !text.is_empty() {
        lines.push(text);
    }
    line.clear();
}

/// Text lines of a markup string. Empty lines are dropped.
pub fn to_lines(markup: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut chars = markup.chars();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
                if is_block(&tag) {
                    flush(&mut line, &mut lines);
                }
            }
            c if c.is_whitespace() => {
                if !line.is_empty() && !line.ends_with(' ') {
                    line.push(' ');
                }
            }
            c => line.push(c),
        }
    }
    flush(&mut line, &mut lines);

    lines
}

/// Display width of a character in terminal cells.
fn char_width(c: char) -> usize {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)
        || (0x2E80..=0x9FFF).contains(&code)
        || (0xAC00..=0xD7A3).contains(&code)
        || (0xF900..=0xFAFF).contains(&code)
        || (0xFF00..=0xFF60).contains(&code)
        || (0x1F300..=0x1F9FF).contains(&code)
    {
        2
    } else {
        1
    }
}

pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Wrap one line at word boundaries. Words wider than `width` are split.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    if width == 0 || text_width(text) <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split(' ') {
        let word_width = text_width(word);
        let needed = if current.is_empty() { word_width } else { word_width + 1 };

        if current_width + needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width += needed;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        for c in word.chars() {
            let w = char_width(c);
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Markup rendered to lines no wider than `width`.
pub fn render_text(markup: &str, width: u16) -> Vec<String> {
    to_lines(markup)
        .iter()
        .flat_map(|line| wrap(line, width))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tags_dropped() {
        assert_eq!(to_lines("<div>A</div>"), vec!["A"]);
        assert_eq!(to_lines("<span>in</span><b>line</b>"), vec!["inline"]);
    }

    #[test]
    fn test_block_tags_break_lines() {
        let markup = "<div><h1>Contacts</h1><ul><li>Ann</li><li>Bob</li></ul>line<br/>next</div>";
        assert_eq!(
            to_lines(markup),
            vec!["Contacts", "Ann", "Bob", "line", "next"]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        let markup = "<div>\n    Hello\n    <span>big</span>   world\n</div>";
        assert_eq!(to_lines(markup), vec!["Hello big world"]);
    }

    #[test]
    fn test_entities_decoded_after_tags() {
        assert_eq!(
            to_lines("<p>a &amp; b &lt;c&gt; &quot;d&quot; &#39;e&#39;</p>"),
            vec!["a & b <c> \"d\" 'e'"]
        );
        assert_eq!(decode_entities("&unknown; & x"), "&unknown; & x");
    }

    #[test]
    fn test_wrap_at_words() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_render_text_wraps_each_line() {
        assert_eq!(
            render_text("<h1>Hello there</h1><p>x</p>", 5),
            vec!["Hello", "there", "x"]
        );
    }

    #[test]
    fn test_line_wider_than_u16() {
        let line = "x".repeat(70_000);
        assert_eq!(text_width(&line), 70_000);

        let lines = wrap(&line, 36);
        assert_eq!(lines.len(), 70_000usize.div_ceil(36));
        assert!(lines.iter().all(|l| text_width(l) <= 36));

        let words = vec!["日本"; 20_000].join(" ");
        assert_eq!(text_width(&words), 99_999);
        assert_eq!(wrap(&words, 9)[0], "日本 日本");
    }

    #[test]
    fn test_wide_chars() {
        assert_eq!(text_width("日本"), 4);
        assert_eq!(text_width("ab"), 2);
    }
}
