/*
 * Accelerator ("mnemonic") markers in display text.
 *
 * A single `&` makes the next character the keyboard accelerator; `&&` is a
 * literal ampersand. `None` text is accepted everywhere and means "no text",
 * which is distinct from the empty string.
 */

pub const MNEMONIC_MARKER: char = '&';

/// Case used when reporting the accelerator character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicCase {
    Upper,
    Lower,
}

/// Walks `text` and returns the character designated by every unescaped
/// marker that is not the last character.
fn effective_mnemonics(text: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = text.chars().peekable();
    std::iter::from_fn(move || {
        while let Some(c) = chars.next() {
            if c != MNEMONIC_MARKER {
                continue;
            }
            match chars.peek().copied() {
                Some(MNEMONIC_MARKER) => {
                    chars.next();
                }
                Some(next) => return Some(next),
                None => return None,
            }
        }
        None
    })
}

/// True when `text` carries exactly one effective mnemonic.
pub fn has_mnemonic(text: Option<&str>) -> bool {
    text.is_some_and(|text| effective_mnemonics(text).take(2).count() == 1)
}

/// The first effective mnemonic of `text`, folded to `case`.
pub fn mnemonic(text: Option<&str>, case: MnemonicCase) -> Option<char> {
    let c = effective_mnemonics(text?).next()?;
    let folded = match case {
        MnemonicCase::Upper => c.to_uppercase().next(),
        MnemonicCase::Lower => c.to_lowercase().next(),
    };
    Some(folded.unwrap_or(c))
}

/// Doubles every marker so the text displays literally.
pub fn escape_mnemonics(text: Option<&str>) -> Option<String> {
    let text = text?;
    let mut escaped = String::with_capacity(text.len() + text.matches(MNEMONIC_MARKER).count());
    for c in text.chars() {
        if c == MNEMONIC_MARKER {
            escaped.push(MNEMONIC_MARKER);
        }
        escaped.push(c);
    }
    Some(escaped)
}

/// The text as displayed: single markers removed, `&&` collapsed to `&`.
/// A trailing lone marker is kept, as the native controls draw it.
pub fn strip_mnemonics(text: Option<&str>) -> Option<String> {
    let text = text?;
    let mut stripped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == MNEMONIC_MARKER {
            match chars.peek() {
                Some(&MNEMONIC_MARKER) => {
                    chars.next();
                    stripped.push(MNEMONIC_MARKER);
                }
                Some(_) => {}
                None => stripped.push(MNEMONIC_MARKER),
            }
        } else {
            stripped.push(c);
        }
    }
    Some(stripped)
}
