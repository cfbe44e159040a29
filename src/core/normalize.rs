//! Text normalization used for identity comparison.
//!
//! A normalized token is lower-case ASCII `[a-z0-9]` words separated by single
//! spaces. Turkish letters fold to their base letter through a fixed table;
//! anything else outside the kept alphabet becomes a word break.

/// Fixed character folding table, applied before case folding so that
/// `İ` maps to a plain `i` instead of `i` + combining dot.
const TRANSLITERATION: &[(char, char)] = &[
    ('ı', 'i'),
    ('ş', 's'),
    ('ğ', 'g'),
    ('ü', 'u'),
    ('ö', 'o'),
    ('ç', 'c'),
    ('İ', 'i'),
    ('Ş', 's'),
    ('Ğ', 'g'),
    ('Ü', 'u'),
    ('Ö', 'o'),
    ('Ç', 'c'),
];

#[inline]
fn transliterate(c: char) -> Option<char> {
    TRANSLITERATION
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

#[inline]
fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Normalize a single piece of text. `None` is treated as an empty string.
///
/// ```
/// use identity_score::core::normalize::normalize_token;
///
/// assert_eq!(normalize_token(Some("İstanbul Şişli")), "istanbul sisli");
/// assert_eq!(normalize_token(Some("  Atatürk Cad. No:5/3 ")), "ataturk cad no 5 3");
/// assert_eq!(normalize_token(None), "");
/// ```
pub fn normalize_token(text: Option<&str>) -> String {
    let text = text.unwrap_or("").trim();
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;

    let mut push = |c: char| {
        if is_kept(c) {
            if pending_break && !out.is_empty() {
                out.push(' ');
            }
            pending_break = false;
            out.push(c);
        } else {
            pending_break = true;
        }
    };

    for c in text.chars() {
        match transliterate(c) {
            Some(to) => push(to),
            None => c.to_lowercase().for_each(&mut push),
        }
    }

    out
}

/// Normalize a first/last name pair into one token, first name first.
pub fn normalize_name(first: Option<&str>, last: Option<&str>) -> String {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    normalize_token(Some(joined.trim()))
}

/// Normalize the six comparable address parts into one token.
pub fn normalize_address(
    country: Option<&str>,
    city: Option<&str>,
    district: Option<&str>,
    postal: Option<&str>,
    line1: Option<&str>,
    line2: Option<&str>,
) -> String {
    let joined = [country, city, district, postal, line1, line2]
        .iter()
        .map(|part| part.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ");
    normalize_token(Some(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_folding() {
        assert_eq!(normalize_token(Some("İstanbul Şişli")), "istanbul sisli");
        assert_eq!(normalize_token(Some("ĞÜÖÇIığüöç")), "guociiguoc");
    }

    #[test]
    fn test_dotted_capital_i_has_no_combining_mark() {
        assert_eq!(normalize_token(Some("ALİ")), "ali");
        assert_eq!(normalize_token(Some("İzmir")), "izmir");
    }

    #[test]
    fn test_punctuation_runs_become_single_space() {
        assert_eq!(normalize_token(Some("a--b,,,c")), "a b c");
        assert_eq!(normalize_token(Some("...leading and trailing!!!")), "leading and trailing");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_token(Some("  foo \t\n  bar  ")), "foo bar");
    }

    #[test]
    fn test_unmapped_accents_are_breaks() {
        // Only the fixed table folds; other accented letters are dropped.
        assert_eq!(normalize_token(Some("José")), "jos");
        assert_eq!(normalize_token(Some("Müller-Lüdenscheidt")), "muller ludenscheidt");
    }

    #[test]
    fn test_empty_and_none() {
        assert_eq!(normalize_token(None), "");
        assert_eq!(normalize_token(Some("")), "");
        assert_eq!(normalize_token(Some("   ")), "");
        assert_eq!(normalize_token(Some("!!!")), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "İstanbul Şişli",
            "  Çankaya / ANKARA 06690 ",
            "Bağdat Cd. No:12 D:4",
            "",
            "ß straße",
            "ÀÉÎÕÜ",
            "x\u{307}y",
        ];
        for s in samples {
            let once = normalize_token(Some(s));
            assert_eq!(normalize_token(Some(&once)), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("Ali"), Some("Veli")), "ali veli");
        assert_eq!(normalize_name(Some("ALİ"), Some("veli")), "ali veli");
        assert_eq!(normalize_name(None, Some("Veli")), "veli");
        assert_eq!(normalize_name(Some("Ali"), None), "ali");
        assert_eq!(normalize_name(None, None), "");
    }

    #[test]
    fn test_normalize_address_order() {
        let addr = normalize_address(
            Some("Türkiye"),
            Some("İstanbul"),
            Some("Kadıköy"),
            Some("34710"),
            Some("Moda Cd. 5"),
            None,
        );
        assert_eq!(addr, "turkiye istanbul kadikoy 34710 moda cd 5");
        assert_eq!(normalize_address(None, None, None, None, None, None), "");
    }
}
