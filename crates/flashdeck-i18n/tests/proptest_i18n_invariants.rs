//! Property-based invariant tests for the i18n crate.
//!
//! 1. Interpolation with no placeholders is identity
//! 2. Interpolation is not recursive
//! 3. Missing args leave placeholder tokens intact
//! 4. Missing keys are `None` in an empty catalog
//! 5. `Language::parse` never panics and round-trips its own tags
//! 6. Coverage percentages stay in [0, 100]
//! 7. The JSON file store keeps every key it was given

use flashdeck_i18n::catalog::{LocaleStrings, StringCatalog, interpolate};
use flashdeck_i18n::preference::{JsonFileStore, LANGUAGE_KEY, LanguagePreference, PreferenceStore};
use flashdeck_i18n::Language;
use proptest::prelude::*;

proptest! {
    #[test]
    fn interpolation_no_placeholders_identity(text in "[a-zA-Z0-9 .,!?光合]*") {
        let mut catalog = StringCatalog::new();
        let mut en = LocaleStrings::new();
        en.insert("test", text.as_str());
        catalog.add_locale("en", en);
        prop_assert_eq!(catalog.format("en", "test", &[]), Some(text.clone()));
        prop_assert_eq!(catalog.format("zh-CN", "test", &[]), Some(text));
    }

    #[test]
    fn missing_args_preserve_tokens(name in "[a-z]{1,10}") {
        let template = format!("Value: {{{name}}}");
        prop_assert_eq!(interpolate(&template, &[]), template.clone());
    }

    #[test]
    fn missing_key_returns_none(key in "[a-z.]{1,20}") {
        let catalog = StringCatalog::new();
        prop_assert_eq!(catalog.get("en", &key), None);
        prop_assert_eq!(catalog.format("zh-CN", &key, &[]), None);
    }

    #[test]
    fn language_parse_never_panics(raw in ".*") {
        let _ = Language::parse(&raw);
    }

    #[test]
    fn coverage_percent_bounded(n_keys in 0usize..=10, n_locales in 1usize..=3) {
        let mut catalog = StringCatalog::new();
        for locale_idx in 0..n_locales {
            let mut ls = LocaleStrings::new();
            for k in 0..n_keys {
                if k % (locale_idx + 1) == 0 {
                    ls.insert(format!("key_{k}"), format!("val_{k}"));
                }
            }
            catalog.add_locale(&format!("l{locale_idx}"), ls);
        }

        let report = catalog.coverage_report();
        for lc in &report.locales {
            prop_assert!((0.0..=100.0).contains(&lc.coverage_percent));
            prop_assert_eq!(lc.present + lc.missing.len(), report.total_keys);
        }
    }

    #[test]
    fn json_store_keeps_all_keys(entries in proptest::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 语言\"]{0,12}", 0..6)) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("prefs.json"));
        for (k, v) in &entries {
            store.set(k, v).expect("write");
        }
        for (k, v) in &entries {
            prop_assert_eq!(store.get(k).expect("read"), Some(v.clone()));
        }
    }
}

#[test]
fn interpolation_not_recursive() {
    assert_eq!(interpolate("Hello {name}!", &[("name", "{name}")]), "Hello {name}!");
    assert_eq!(interpolate("Hello {name}!", &[("name", "{other}")]), "Hello {other}!");
}

#[test]
fn tags_round_trip() {
    for language in Language::ALL {
        assert_eq!(Language::parse(language.tag()).ok(), Some(language));
    }
}

#[test]
fn language_preference_persists_to_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");

    let mut pref = LanguagePreference::new(JsonFileStore::new(&path));
    assert_eq!(pref.current().expect("read"), Language::English);
    pref.set(Language::SimplifiedChinese).expect("write");

    let reopened = LanguagePreference::new(JsonFileStore::new(&path));
    assert_eq!(reopened.current().expect("read"), Language::SimplifiedChinese);
    let raw = std::fs::read_to_string(&path).expect("file");
    assert!(raw.contains(LANGUAGE_KEY));
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{not json").expect("seed");
    let pref = LanguagePreference::new(JsonFileStore::new(&path));
    let err = pref.current().expect_err("corrupt");
    assert!(err.to_string().contains("not valid JSON"));
}
