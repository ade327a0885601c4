// tests/properties.rs

use proptest::prelude::*;

use scriptjob::api::obscure;
use scriptjob::job::first_doc_line;
use scriptjob::locale::language_fallbacks;

proptest! {
    #[test]
    fn obscure_is_an_involution(text in ".*") {
        prop_assert_eq!(obscure(&obscure(&text)), text);
    }

    #[test]
    fn obscure_keeps_length_in_chars(text in ".*") {
        prop_assert_eq!(obscure(&text).chars().count(), text.chars().count());
    }

    #[test]
    fn first_doc_line_is_a_single_trimmed_line(doc in "[ \\ta-zA-Z.\\n]{0,64}") {
        if let Some(line) = first_doc_line(&doc) {
            prop_assert!(!line.is_empty());
            prop_assert!(!line.contains('\n'));
            prop_assert_eq!(line.trim(), line.as_str());
        } else {
            prop_assert!(doc.trim().is_empty());
        }
    }

    #[test]
    fn language_fallbacks_end_with_bare_language(
        lang in "[a-z]{2,3}",
        territory in proptest::option::of("[A-Z]{2}"),
        modifier in proptest::option::of("[a-z]{3,6}"),
    ) {
        let mut locale = lang.clone();
        if let Some(t) = &territory {
            locale.push('_');
            locale.push_str(t);
        }
        locale.push_str(".UTF-8");
        if let Some(m) = &modifier {
            locale.push('@');
            locale.push_str(m);
        }

        let fallbacks = language_fallbacks(&locale);
        prop_assert_eq!(fallbacks.last(), Some(&lang));
        prop_assert!(fallbacks.iter().all(|l| !l.contains(".UTF-8")));
    }
}

#[test]
fn language_fallback_examples() {
    assert_eq!(
        language_fallbacks("sr_RS.UTF-8@latin"),
        vec!["sr_RS@latin", "sr_RS", "sr@latin", "sr"]
    );
    assert_eq!(language_fallbacks("de_DE.UTF-8"), vec!["de_DE", "de"]);
    assert_eq!(language_fallbacks("fr"), vec!["fr"]);
    assert!(language_fallbacks("C").is_empty());
    assert!(language_fallbacks("POSIX").is_empty());
}
