/// Calculate the display width of a string, accounting for wide characters
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c {
            // Most CJK characters take 2 columns
            '\u{1100}'..='\u{115F}' |  // Hangul Jamo
            '\u{2E80}'..='\u{303F}' |  // CJK radicals, Kangxi, symbols
            '\u{3040}'..='\u{33FF}' |  // Kana, Bopomofo, enclosed, compatibility
            '\u{3400}'..='\u{4DBF}' |  // CJK Unified Ideographs Extension A
            '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
            '\u{A000}'..='\u{A4CF}' |  // Yi
            '\u{AC00}'..='\u{D7AF}' |  // Hangul Syllables
            '\u{F900}'..='\u{FAFF}' |  // CJK Compatibility Ideographs
            '\u{FE10}'..='\u{FE19}' |  // Vertical Forms
            '\u{FE30}'..='\u{FE6F}' |  // CJK compatibility and small forms
            '\u{FF00}'..='\u{FFEF}' |  // Halfwidth and Fullwidth Forms
            '\u{20000}'..='\u{2EBEF}' => 2, // CJK Extensions B-F
            _ => 1,
        })
        .sum()
}

/// First `max_chars` characters of `text`, with `...` appended only when
/// something was cut off.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Wrap a string into lines with a given maximum display width.
pub fn wrap_text(text: &str, max_line_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if display_width(remaining) <= max_line_len {
            lines.push(remaining.to_string());
            break;
        }

        let mut break_pos = 0;
        let mut char_end = 0;
        let mut current_width = 0;
        for (pos, ch) in remaining.char_indices() {
            let char_width = display_width(ch.encode_utf8(&mut [0; 4]));
            if current_width + char_width > max_line_len {
                break;
            }
            if ch == ' ' {
                break_pos = pos;
            }
            char_end = pos + ch.len_utf8();
            current_width += char_width;
        }

        if break_pos > 0 {
            lines.push(remaining[..break_pos].to_string());
            remaining = remaining[break_pos + 1..].trim_start();
        } else {
            // No space found, break at display width boundary
            let char_end = char_end.max(remaining.chars().next().map_or(0, char::len_utf8));
            lines.push(remaining[..char_end].to_string());
            remaining = &remaining[char_end..];
        }
    }
    lines
}
