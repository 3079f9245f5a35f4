use crate::sections::introduction::domain::Locale;

const DEVANAGARI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Replace ASCII digits with Devanagari digits; everything else passes
/// through untouched.
pub(crate) fn localize_digits(text: &str, locale: Locale) -> String {
    match locale {
        Locale::English => text.to_string(),
        Locale::Nepali => text
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => DEVANAGARI_DIGITS[d as usize],
                None => c,
            })
            .collect(),
    }
}

/// Integer with locale-appropriate digit grouping: western thousands for
/// English, the 2-2-3 lakh/crore pattern for Nepali.
pub(crate) fn format_count(value: u64, locale: Locale) -> String {
    let digits = value.to_string();
    let grouped = match locale {
        Locale::English => group_thousands(&digits),
        Locale::Nepali => group_south_asian(&digits),
    };
    localize_digits(&grouped, locale)
}

/// Decimal trimmed of trailing zeros, with localized digits.
pub(crate) fn format_decimal(value: f64, max_places: usize, locale: Locale) -> String {
    let mut text = format!("{value:.max_places$}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    localize_digits(&text, locale)
}

fn group_thousands(digits: &str) -> String {
    group_from_right(digits, |index| index > 0 && index % 3 == 0)
}

fn group_south_asian(digits: &str) -> String {
    group_from_right(digits, |index| {
        index == 3 || (index > 3 && (index - 3) % 2 == 0)
    })
}

fn group_from_right(digits: &str, split_at: impl Fn(usize) -> bool) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 2);
    for (position, c) in chars.iter().enumerate() {
        let from_right = chars.len() - position;
        if position > 0 && split_at(from_right) {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_uses_western_grouping() {
        assert_eq!(format_count(2100, Locale::English), "2,100");
        assert_eq!(format_count(123_456_789, Locale::English), "123,456,789");
        assert_eq!(format_count(999, Locale::English), "999");
    }

    #[test]
    fn nepali_uses_lakh_grouping_and_devanagari_digits() {
        assert_eq!(format_count(2100, Locale::Nepali), "२,१००");
        assert_eq!(format_count(123_456, Locale::Nepali), "१,२३,४५६");
        assert_eq!(format_count(12_345_678, Locale::Nepali), "१,२३,४५,६७८");
    }

    #[test]
    fn decimals_trim_trailing_zeros() {
        assert_eq!(format_decimal(46.4, 1, Locale::English), "46.4");
        assert_eq!(format_decimal(46.0, 1, Locale::English), "46");
        assert_eq!(format_decimal(45.3, 1, Locale::Nepali), "४५.३");
    }
}
