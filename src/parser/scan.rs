/// Upper bound on opening delimiters tried, so a long prose response with
/// many stray brackets stays cheap to scan.
const MAX_BLOCK_ATTEMPTS: usize = 64;

/// Balanced `{...}` / `[...]` substrings of `text`, in order of their
/// opening delimiter. Delimiters inside double-quoted strings are ignored.
pub fn balanced_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|&(_, c)| c == '{' || c == '[')
        .take(MAX_BLOCK_ATTEMPTS)
        .filter_map(move |(start, _)| balanced_from(text, start))
}

fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop() != Some(c) {
                    return None;
                }
                if closers.is_empty() {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
