//! Protection of positional format placeholders during translation.
//!
//! `%1$s` is rewritten to the self-closing tag `<s1/>` before texts are sent to a
//! provider in markup mode, which keeps tags untouched, and restored afterwards.
//! A text that already contains something shaped like `<s1/>` is restored to a
//! placeholder as well; this is a known limitation.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"%(\d+)\$([a-z])").unwrap();
    static ref MARKER_REGEX: Regex = Regex::new(r"<([a-z])(\d+)/>").unwrap();
}

/// Rewrites every `%<index>$<letter>` into `<letter><index>/>`.
pub fn mask(text: &str) -> Cow<'_, str> {
    PLACEHOLDER_REGEX.replace_all(text, "<${2}${1}/>")
}

/// Restores placeholders masked by [`mask`].
pub fn unmask(text: &str) -> Cow<'_, str> {
    MARKER_REGEX.replace_all(text, "%${2}$$${1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mask() {
        assert_eq!(
            mask("This is %1$d Test to check if %20$s works"),
            "This is <d1/> Test to check if <s20/> works"
        );
    }

    #[test]
    fn test_mask_leaves_other_text_alone() {
        assert_eq!(mask("This works"), "This works");
        assert_eq!(mask("50%% and %d and %s"), "50%% and %d and %s");
        assert!(matches!(mask("no placeholders"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unmask() {
        assert_eq!(
            unmask("Dies ist <d1/> Test, ob <s20/> funktioniert"),
            "Dies ist %1$d Test, ob %20$s funktioniert"
        );
        assert_eq!(unmask("<b>bold</b>"), "<b>bold</b>");
    }

    #[test]
    fn test_pre_existing_marker_is_not_preserved() {
        // Accepted limitation: marker syntax present before masking gets unmasked too.
        assert_eq!(unmask(&mask("<s1/>")), "%1$s");
    }

    proptest! {
        #[test]
        fn prop_unmask_inverts_mask(
            parts in prop::collection::vec(
                prop_oneof![
                    "[A-Za-z0-9 ,.!?%]{0,12}",
                    (1u32..50, "[a-z]").prop_map(|(i, c)| format!("%{}${}", i, c)),
                ],
                0..8,
            )
        ) {
            let text = parts.concat();
            prop_assert_eq!(unmask(&mask(&text)).into_owned(), text);
        }
    }
}
