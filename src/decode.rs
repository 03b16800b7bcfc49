//! Decoding of HTML entities embedded in Open Trivia DB payloads.
//!
//! The API serves question and answer text with entity escapes
//! (`&quot;`, `&#039;`, ...). This covers the named entities it actually
//! emits plus decimal/hex numeric references; anything unrecognized passes
//! through verbatim.

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "quot" => '"',
        "amp" => '&',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "deg" => '\u{b0}',
        "eacute" => '\u{e9}',
        "aacute" => '\u{e1}',
        "iacute" => '\u{ed}',
        "oacute" => '\u{f3}',
        "uacute" => '\u{fa}',
        "ntilde" => '\u{f1}',
        "ouml" => '\u{f6}',
        "uuml" => '\u{fc}',
        "auml" => '\u{e4}',
        "szlig" => '\u{df}',
        "pi" => '\u{3c0}',
        _ => return None,
    };
    Some(ch)
}

fn numeric_entity(body: &str) -> Option<char> {
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

/// Replaces entity escapes in `raw` with the characters they stand for.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // Entity names are short; a distant or missing ';' means a bare '&'.
        let semi = tail[1..].find(';').map(|i| i + 1);
        let decoded = match semi {
            Some(semi) if semi <= 9 => {
                let body = &tail[1..semi];
                if let Some(num) = body.strip_prefix('#') {
                    numeric_entity(num)
                } else {
                    named_entity(body)
                }
            }
            _ => None,
        };

        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[semi.unwrap() + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
