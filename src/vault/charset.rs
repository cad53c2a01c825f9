//! The character universe for keys and secrets.
//!
//! Validation always checks against the full alphabet.  Generation uses
//! whatever `Alphabet` the caller passes, which may have some symbols
//! removed by the `omit_symbols` setting.

/// Punctuation allowed in keys and secrets.
pub const SYMBOLS: &str = "!@#$";

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of characters to draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Symbols, lowercase letters, digits, uppercase letters.
    pub fn full() -> Self {
        Self {
            chars: SYMBOLS
                .chars()
                .chain(LOWERCASE.chars())
                .chain(DIGITS.chars())
                .chain(UPPERCASE.chars())
                .collect(),
        }
    }

    /// The full alphabet with every character of `omit` removed.
    pub fn omitting(omit: &str) -> Self {
        let mut alphabet = Self::full();
        alphabet.chars.retain(|c| !omit.contains(*c));
        alphabet
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::full()
    }
}

/// True iff `s` is non-empty and every character is in the full alphabet.
pub fn is_legit(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_alphabet_size() {
        assert_eq!(Alphabet::full().len(), 4 + 26 + 10 + 26);
    }

    #[test]
    fn omitting_removes_only_named_chars() {
        let a = Alphabet::omitting("@$");
        assert!(!a.contains('@'));
        assert!(!a.contains('$'));
        assert!(a.contains('!'));
        assert!(a.contains('z'));
        assert_eq!(a.len(), Alphabet::full().len() - 2);
    }

    #[test]
    fn legit_strings() {
        assert!(is_legit("ab$"));
        assert!(is_legit("Secret1!"));
        assert!(is_legit("0"));
    }

    #[test]
    fn rejected_strings() {
        assert!(!is_legit(""));
        assert!(!is_legit("ab c"));
        assert!(!is_legit("tab\t"));
        assert!(!is_legit("percent%"));
        assert!(!is_legit("ümlaut"));
        assert!(!is_legit("brace}"));
    }

    #[test]
    fn every_full_alphabet_char_is_legit() {
        let all: String = Alphabet::full().chars().iter().collect();
        assert!(is_legit(&all));
    }
}
