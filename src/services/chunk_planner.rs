//! Fixed-width chunking of the prompt-prefixed document text.
//!
//! Widths are counted in characters, never in model tokens. Line breaking
//! follows the classic greedy text-wrap rules: tabs expand to 8-column stops,
//! every whitespace character becomes one space, runs of spaces are kept
//! inside a line, and a line breaks at a space or after the hyphen of a
//! hyphenated word. Words longer than the width are cut, after their last
//! fitting hyphen when there is one.

const TAB_SIZE: usize = 8;

/// Whitespace recognised as a break point. Non-breaking spaces stay in words.
const BREAKABLE_WHITESPACE: [char; 6] = ['\t', '\n', '\x0b', '\x0c', '\r', ' '];

/// Splits `prefix + body` into consecutive chunks of at most `width` characters.
///
/// The prefix is joined without a separator, so it must carry its own
/// trailing newlines. A non-empty prefix always yields at least one chunk.
pub fn plan(prefix: &str, body: &str, width: usize) -> Vec<String> {
    assert!(width > 0, "chunk width must be greater than zero");

    let mut text = String::with_capacity(prefix.len() + body.len());
    text.push_str(prefix);
    text.push_str(body);

    let chunks = wrap(&normalize_whitespace(&text), width);
    tracing::debug!(
        "Planned {} chunk(s) from {} chars at width {width}",
        chunks.len(),
        text.chars().count()
    );
    chunks
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;

    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            c if BREAKABLE_WHITESPACE.contains(&c) => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_punct(c: char) -> bool {
    is_word_char(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Length of a `--` dash run at `at` that sits between two words.
fn em_dash_len(chars: &[char], at: usize) -> Option<usize> {
    if at == 0 || !is_word_punct(chars[at - 1]) {
        return None;
    }
    let run = chars[at..].iter().take_while(|&&c| c == '-').count();
    (run >= 2 && chars.get(at + run).is_some_and(|&c| is_word_char(c))).then_some(run)
}

/// True when a word may break after the hyphen at `at`, as in `self-evaluation`.
fn hyphen_break_at(chars: &[char], at: usize) -> bool {
    let letter = |k: usize| chars.get(k).is_some_and(|&c| is_letter(c));
    let dash = |k: usize| chars.get(k) == Some(&'-');

    if at < 2 || !dash(at) {
        return false;
    }
    let behind = (letter(at - 2) && letter(at - 1))
        || (at >= 3 && letter(at - 3) && dash(at - 2) && letter(at - 1));
    let ahead = letter(at + 1) && (letter(at + 2) || (dash(at + 2) && letter(at + 3)));
    behind && ahead
}

fn chunk_end(chars: &[char], start: usize) -> usize {
    if chars[start] == ' ' {
        return start + chars[start..].iter().take_while(|&&c| c == ' ').count();
    }
    if let Some(run) = em_dash_len(chars, start) {
        return start + run;
    }

    let mut end = start + 1;
    loop {
        if hyphen_break_at(chars, end) {
            return end + 1;
        }
        if end == chars.len() || chars[end] == ' ' || em_dash_len(chars, end).is_some() {
            return end;
        }
        end += 1;
    }
}

/// Space runs and words, in order. Hyphenated words are split after each
/// breakable hyphen and dashes between words stand alone.
fn split_chunks(text: &str) -> Vec<&str> {
    let indexed: Vec<(usize, char)> = text.char_indices().collect();
    let chars: Vec<char> = indexed.iter().map(|&(_, c)| c).collect();
    let offset = |k: usize| indexed.get(k).map_or(text.len(), |&(i, _)| i);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = chunk_end(&chars, start);
        chunks.push(&text[offset(start)..offset(end)]);
        start = end;
    }

    chunks
}

/// Empty pieces count as whitespace too.
fn is_space(run: &str) -> bool {
    run.chars().all(|c| c == ' ')
}

fn char_len(run: &str) -> usize {
    run.chars().count()
}

fn byte_offset(run: &str, chars: usize) -> usize {
    run.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(run.len())
}

/// Where to cut an overlong word: after its last hyphen within `space_left`,
/// unless only hyphens precede it.
fn long_word_cut(word: &str, space_left: usize) -> usize {
    let head: Vec<char> = word.chars().take(space_left).collect();
    match head.iter().rposition(|&c| c == '-') {
        Some(hyphen) if hyphen > 0 && head[..hyphen].iter().any(|&c| c != '-') => hyphen + 1,
        _ => space_left,
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    // Reversed so the next run is always at the end.
    let mut pending: Vec<&str> = split_chunks(text);
    pending.reverse();

    let mut lines: Vec<String> = Vec::new();

    while !pending.is_empty() {
        let mut line: Vec<&str> = Vec::new();
        let mut line_len = 0usize;

        // Leading spaces are dropped on every line but the first.
        if !lines.is_empty() && pending.last().is_some_and(|r| is_space(r)) {
            pending.pop();
        }

        while let Some(&run) = pending.last() {
            let len = char_len(run);
            if line_len + len > width {
                break;
            }
            line.push(run);
            line_len += len;
            pending.pop();
        }

        if let Some(run) = pending.last_mut()
            && char_len(run) > width
        {
            let current: &str = *run;
            let cut = long_word_cut(current, width - line_len);
            let (head, tail) = current.split_at(byte_offset(current, cut));
            // An empty head still shields trailing spaces from being dropped.
            line.push(head);
            *run = tail;
        }

        if line.last().is_some_and(|r| is_space(r)) {
            line.pop();
        }

        if !line.is_empty() {
            lines.push(line.concat());
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Summarize this clearly so a parent can understand their rights and responsibilities in plain language:\n\n";

    fn normalized(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let body = "Parents have the right to review records.\nSchools must respond within 45 days.\n";
        let chunks = plan(PREFIX, body, 1000);

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0],
            "Summarize this clearly so a parent can understand their rights and responsibilities \
             in plain language:  Parents have the right to review records. Schools must respond \
             within 45 days."
        );
    }

    #[test]
    fn test_chunks_respect_width_and_reconstruct_input() {
        let body = (0..400)
            .map(|i| format!("clause{i} applies to district {}.", i % 7))
            .collect::<Vec<_>>()
            .join("\n");

        for width in [1, 7, 40, 1000] {
            let chunks = plan(PREFIX, &body, width);
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(chunk.chars().count() <= width, "{chunk:?} exceeds {width}");
            }
            if width >= 40 {
                assert_eq!(
                    normalized(&chunks.join(" ")),
                    normalized(&format!("{PREFIX}{body}"))
                );
            }
        }
    }

    #[test]
    fn test_breaks_at_spaces_not_inside_words() {
        let chunks = plan("", "alpha bravo charlie delta echo", 7);
        assert_eq!(chunks, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
    }

    #[test]
    fn test_packs_words_greedily() {
        let chunks = plan("", "aa bb cc dd ee", 5);
        assert_eq!(chunks, vec!["aa bb", "cc dd", "ee"]);
    }

    #[test]
    fn test_long_word_is_cut() {
        let chunks = plan("", "abcdefghij klm", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij", "klm"]);
    }

    #[test]
    fn test_long_word_fills_current_line() {
        let chunks = plan("", "ab cdefghij", 5);
        assert_eq!(chunks, vec!["ab cd", "efghi", "j"]);
    }

    #[test]
    fn test_hyphenated_word_breaks_at_chunk_boundary() {
        let body = "word ".repeat(198) + "self-evaluation rules apply.";
        let chunks = plan("", &body, 1000);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 995);
        assert!(chunks[0].ends_with("word word self-"));
        assert_eq!(chunks[1], "evaluation rules apply.");
    }

    #[test]
    fn test_breaks_after_hyphens_between_letters() {
        assert_eq!(
            plan("", "well-known state-of-the-art policy", 12),
            vec!["well-known", "state-of-", "the-art", "policy"]
        );
        assert_eq!(plan("", "co-op pre-K 3-day", 5), vec!["co-op", "pre-K", "3-day"]);
        assert_eq!(plan("", "self-evaluation", 8), vec!["self-eva", "luation"]);
    }

    #[test]
    fn test_double_dash_between_words_stands_alone() {
        assert_eq!(plan("", "rights--and duties", 8), vec!["rights--", "and", "duties"]);
        assert_eq!(plan("", "x -- y", 10), vec!["x -- y"]);
    }

    #[test]
    fn test_long_word_is_cut_after_last_fitting_hyphen() {
        assert_eq!(plan("", "2024-2025-plan", 8), vec!["2024-", "2025-", "plan"]);
        assert_eq!(plan("", "e-mail", 3), vec!["e-", "mai", "l"]);
        assert_eq!(plan("", "---abc", 2), vec!["--", "-a", "bc"]);
    }

    #[test]
    fn test_leading_whitespace_survives_overflow() {
        assert_eq!(plan("", "\tabx", 1), vec![" ", "a", "b", "x"]);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        assert_eq!(plan("", "x:\n\ny", 100), vec!["x:  y"]);
        assert_eq!(plan("", "a\tb", 100), vec!["a       b"]);
        assert_eq!(plan("", "line\r\nnext", 100), vec!["line  next"]);
    }

    #[test]
    fn test_leading_space_kept_on_first_line_only() {
        assert_eq!(plan("", "  lead word", 100), vec!["  lead word"]);
        assert_eq!(plan("", "one   two", 4), vec!["one", "two"]);
    }

    #[test]
    fn test_empty_body_keeps_prefix() {
        let chunks = plan(PREFIX, "", 1000);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("Summarize this clearly"));
        assert!(!chunks[0].ends_with(' '));
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(plan("", "", 10).is_empty());
        assert!(plan("", " \n\t ", 10).is_empty());
    }

    #[test]
    fn test_width_counts_characters() {
        let chunks = plan("", "ééé ààà", 3);
        assert_eq!(chunks, vec!["ééé", "ààà"]);
    }

    #[test]
    #[should_panic(expected = "chunk width")]
    fn test_zero_width_panics() {
        plan("x", "y", 0);
    }
}
