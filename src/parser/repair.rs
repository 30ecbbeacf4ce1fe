/// Best-effort fix-up of near-JSON produced by a text generator.
///
/// - raw line breaks, carriage returns and tabs inside string literals are
///   escaped;
/// - a comma followed only by whitespace before `}` or `]` is dropped.
///
/// Valid JSON passes through byte-for-byte.
pub fn repair(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if closes_next(&chars[i + 1..]) => {}
            _ => out.push(c),
        }
    }

    out
}

fn closes_next(rest: &[char]) -> bool {
    matches!(
        rest.iter().find(|c| !c.is_whitespace()),
        Some('}') | Some(']')
    )
}
