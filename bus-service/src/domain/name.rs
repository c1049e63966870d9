//! Person name normalization.

/// Capitalize a name.
///
/// Trims surrounding whitespace, lowercases everything, then uppercases the
/// first character and the character after each space. Characters are
/// consumed two at a time when a space is met, and the final character is
/// always copied as-is, so a single letter after a space in the last
/// position keeps its lowercase form.
///
/// Empty input is returned unchanged.
///
/// # Examples
///
/// ```
/// use bus_service::domain::capitalize;
///
/// assert_eq!(capitalize("  jOHN smith "), "John Smith");
/// assert_eq!(capitalize("mary ann"), "Mary Ann");
/// assert_eq!(capitalize("ab c"), "Ab c");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(value: &str) -> String {
    let chars: Vec<char> = value.trim().to_lowercase().chars().collect();
    let Some(&first) = chars.first() else {
        return String::new();
    };

    let mut capitalized = String::with_capacity(value.len());
    capitalized.extend(first.to_uppercase());
    if chars.len() == 1 {
        return capitalized;
    }

    let last = chars.len() - 1;
    let mut i = 1;
    while i < last {
        if chars[i] == ' ' && i + 1 < last {
            capitalized.push(' ');
            capitalized.extend(chars[i + 1].to_uppercase());
            i += 2;
        } else {
            capitalized.push(chars[i]);
            i += 1;
        }
    }
    capitalized.push(chars[last]);

    capitalized
}

/// Compose the display name stored alongside a driver: `"{last}, {first}"`.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{last_name}, {first_name}")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Capitalizing twice gives the same result as capitalizing once
        #[test]
        fn idempotent(s in "[a-zA-Z ]{0,24}") {
            let once = capitalize(&s);
            prop_assert_eq!(capitalize(&once), once);
        }

        /// Only letter case changes, apart from trimming
        #[test]
        fn preserves_letters(s in "[a-zA-Z ]{0,24}") {
            prop_assert_eq!(capitalize(&s).to_lowercase(), s.trim().to_lowercase());
        }

        /// The first character is always uppercase
        #[test]
        fn first_letter_upper(s in "[a-z][a-z ]{0,20}") {
            let out = capitalize(&s);
            prop_assert!(out.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
        }
    }
}
