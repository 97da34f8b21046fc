use catalog_models::Title;

// Latin-1 Supplement through Latin Extended-B
const LATIN_EXTENDED: std::ops::RangeInclusive<char> = '\u{00C0}'..='\u{024F}';

/// Approximates "English title" by script: every letter must be Latin.
///
/// Titles without any letters ("1917", "2012") pass.
pub fn is_english_title(title: &Title) -> bool {
    title
        .title
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_ascii_alphabetic() || LATIN_EXTENDED.contains(&c))
}
