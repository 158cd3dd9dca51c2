use once_cell::sync::Lazy;
use regex::Regex;

/// Mojibake left behind by a UTF-8 dagger (†) decoded as Windows-1252,
/// together with the letter the page sets right after it.
pub const DAGGER_ARTIFACT: &str = "\u{e2}\u{20ac}\u{a0}a";

/// Noise removed from every data cell, in one alternation pass:
/// non-breaking space, newline, the dagger artifact, thousands separators.
static CELL_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(\u{a0})|(\n)|(\u{e2}\u{20ac}\u{a0}a)|,").expect("noise regex"));

/// Header cell text with trailing newlines stripped; nothing else changes.
pub fn clean_header(raw: &str) -> String {
    raw.trim_end_matches('\n').to_string()
}

/// Data cell text with every noise match removed.
pub fn clean_cell(raw: &str) -> String {
    CELL_NOISE.replace_all(raw, "").into_owned()
}

/// Strict numeric read of a cleaned cell. Surrounding whitespace is allowed.
pub fn parse_number(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_loses_only_trailing_newlines() {
        assert_eq!(clean_header("B\n"), "B");
        assert_eq!(clean_header("A"), "A");
        assert_eq!(
            clean_header("Area\n(thousands of km2)[24]\n\n"),
            "Area\n(thousands of km2)[24]"
        );
        assert_eq!(clean_header(" C \n"), " C ");
    }

    #[test]
    fn cell_noise_is_removed() {
        assert_eq!(clean_cell("1,234\n\u{a0}"), "1234");
        assert_eq!(clean_cell("\u{a0}Germany\n"), "Germany");
        assert_eq!(clean_cell(&format!("Malta{}", DAGGER_ARTIFACT)), "Malta");
        assert_eq!(clean_cell("12.5 (est.)"), "12.5 (est.)");
    }

    #[test]
    fn artifact_wins_over_its_inner_nbsp() {
        // The whole artifact goes, trailing letter included.
        assert_eq!(clean_cell("604\u{e2}\u{20ac}\u{a0}a"), "604");
        assert_eq!(parse_number(&clean_cell("604\u{e2}\u{20ac}\u{a0}a")), Some(604.0));
        assert_eq!(clean_cell("x\u{e2}\u{20ac}\u{a0}ay"), "xy");
    }

    #[test]
    fn partial_artifact_only_loses_its_nbsp() {
        assert_eq!(clean_cell("x\u{e2}\u{20ac}\u{a0}y"), "x\u{e2}\u{20ac}y");
        assert_eq!(clean_cell("x\u{e2}y"), "x\u{e2}y");
    }

    #[test]
    fn numbers_parse_strictly() {
        assert_eq!(parse_number("1234"), Some(1234.0));
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("-2"), Some(-2.0));
        assert_eq!(parse_number("12[a]"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
