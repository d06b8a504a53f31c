use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Autocomplete keywords for a food name: every lowercase word plus each of
/// its prefixes, deduplicated and sorted.
pub fn search_keywords(food_name: &str) -> Vec<String> {
    lazy_static! {
        static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
    }
    let lower = food_name.to_lowercase();
    let mut keywords = BTreeSet::new();
    for word in WORD_RE.find_iter(&lower) {
        let word = word.as_str();
        for (idx, ch) in word.char_indices() {
            keywords.insert(word[..idx + ch.len_utf8()].to_string());
        }
    }
    keywords.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_prefixes() {
        let kw = search_keywords("Egg Roll");
        assert_eq!(kw, vec!["e", "eg", "egg", "r", "ro", "rol", "roll"]);
    }

    #[test]
    fn splits_on_punctuation_and_dedups() {
        let kw = search_keywords("Rice, fried (rice)");
        assert!(kw.contains(&"rice".to_string()));
        assert!(kw.contains(&"fried".to_string()));
        assert_eq!(kw.iter().filter(|k| k.as_str() == "rice").count(), 1);
        assert!(!kw.iter().any(|k| k.contains(',') || k.contains('(')));
    }

    #[test]
    fn handles_multibyte_words() {
        let kw = search_keywords("Crème");
        assert!(kw.contains(&"crè".to_string()));
        assert!(kw.contains(&"crème".to_string()));
    }

    #[test]
    fn empty_name_has_no_keywords() {
        assert!(search_keywords("  - ").is_empty());
    }
}
