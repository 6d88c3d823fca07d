use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum SegmentMode {
    /// Split after `.`, `!` or `?` (plus trailing quotes/brackets) when the
    /// next character is whitespace or the end of the text.
    #[default]
    Sentences,
    /// Split on every occurrence of a fixed delimiter.
    Delimiter(String),
}

/// Split `text` into ordered, trimmed, non-empty segments.
pub fn segment(text: &str, mode: &SegmentMode) -> Vec<String> {
    match mode {
        SegmentMode::Sentences => split_sentences(text),
        SegmentMode::Delimiter(delimiter) if delimiter.is_empty() => {
            let mut segments = Vec::new();
            push_segment(&mut segments, text);
            segments
        }
        SegmentMode::Delimiter(delimiter) => {
            let mut segments = Vec::new();
            for part in text.split(delimiter.as_str()) {
                push_segment(&mut segments, part);
            }
            segments
        }
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if is_terminator(next) || is_closer(next) {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            push_segment(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_segment(&mut sentences, &text[start..]);
    sentences
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}
