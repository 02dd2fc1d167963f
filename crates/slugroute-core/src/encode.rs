//! URL word encoding
//!
//! Generated URL words are restricted to Latin letters, Cyrillic letters,
//! CJK ideographs, digits, underscore and hyphen. Everything else becomes a
//! word separator (`-`).

/// Character class of acceptable URL word characters, in regex syntax
///
/// Meant to be used case-insensitively.
pub const ACCEPTABLE_CHARACTERS: &str = r"a-zа-я0-9_\p{Han}-";

/// Turns a stored value into a URL-safe token
pub trait WordEncoder {
    /// Encode `value`, case-folding it when `lowercase` is set
    fn encode(&self, value: &str, lowercase: bool) -> String;
}

/// Default word encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlWordEncoder;

impl WordEncoder for UrlWordEncoder {
    fn encode(&self, value: &str, lowercase: bool) -> String {
        let mut out = String::with_capacity(value.len());
        let mut pending_dash = false;

        for c in value.chars() {
            let c = fold_accent(c);
            if is_acceptable_char(c) && c != '-' {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                if lowercase {
                    out.extend(c.to_lowercase());
                } else {
                    out.push(c);
                }
            } else {
                pending_dash = true;
            }
        }

        out
    }
}

/// Is `c` part of [`ACCEPTABLE_CHARACTERS`] (case-insensitively)?
pub fn is_acceptable_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('а'..='я').contains(&c)
        || ('А'..='Я').contains(&c)
        || is_han(c)
}

fn is_han(c: char) -> bool {
    matches!(c,
        '\u{2E80}'..='\u{2FDF}'
        | '\u{3005}'
        | '\u{3007}'
        | '\u{3021}'..='\u{3029}'
        | '\u{3038}'..='\u{303B}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}'
        | '\u{30000}'..='\u{3134F}')
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ё' => 'е',
        'Ё' => 'Е',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lowercase() {
        let encoder = UrlWordEncoder;
        assert_eq!(encoder.encode("De La Vega", true), "de-la-vega");
        assert_eq!(encoder.encode("De La Vega", false), "De-La-Vega");
    }

    #[test]
    fn test_encode_collapses_separators() {
        let encoder = UrlWordEncoder;
        assert_eq!(encoder.encode("  Rock & Roll -- 1969! ", true), "rock-roll-1969");
        assert_eq!(encoder.encode("snake_case", true), "snake_case");
    }

    #[test]
    fn test_encode_accents_and_scripts() {
        let encoder = UrlWordEncoder;
        assert_eq!(encoder.encode("Città Vecchia", true), "citta-vecchia");
        assert_eq!(encoder.encode("Привет мир", true), "привет-мир");
        assert_eq!(encoder.encode("北京 大学", true), "北京-大学");
    }

    #[test]
    fn test_encode_numbers_only() {
        assert_eq!(UrlWordEncoder.encode("42", true), "42");
        assert_eq!(UrlWordEncoder.encode("", true), "");
    }

    #[test]
    fn test_acceptable_chars() {
        assert!(is_acceptable_char('z'));
        assert!(is_acceptable_char('Z'));
        assert!(is_acceptable_char('ж'));
        assert!(is_acceptable_char('中'));
        assert!(is_acceptable_char('-'));
        assert!(!is_acceptable_char('/'));
        assert!(!is_acceptable_char('?'));
        assert!(!is_acceptable_char(' '));
    }
}
