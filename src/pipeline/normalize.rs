use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::{DisallowedTermSet, InformalTermMap, Lexicon};

/// URLs, mentions, hashtags, the literal `user`, the `x??` masking pattern,
/// and raw newlines/tabs. Alternatives are tried leftmost-first, in order.
/// The `http?://` branch also catches links with a truncated `htt` scheme.
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((www\.[^\s]+)|(https?://[^\s]+)|(http?://[^\s]+))|([#@]\S+)|user|x.{2}|\n|\t")
        .expect("noise pattern is valid")
});

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-zA-Z]+").expect("symbol pattern is valid"));

/// Trait for rewriting raw text into its cleaned form
pub trait Normalizer {
    /// Clean a single text. Total: never fails on string input.
    fn normalize(&self, text: &str) -> String;
}

/// The five-stage cleansing pipeline driven by a shared [`Lexicon`].
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    lexicon: Arc<Lexicon>,
}

impl TextNormalizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl Normalizer for TextNormalizer {
    fn normalize(&self, text: &str) -> String {
        // Order matters: noise patterns need their punctuation intact, and the
        // lookups expect lowercase, symbol-free tokens.
        let text = fold_case(text);
        let text = strip_noise(&text);
        let text = strip_symbols(&text);
        let text = substitute_informal(&text, self.lexicon.informal());
        remove_disallowed(&text, self.lexicon.disallowed())
    }
}

/// Stage 1: locale-independent lowercase.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Stage 2: replace every noise match with a single space.
pub fn strip_noise(text: &str) -> String {
    NOISE.replace_all(text, " ").into_owned()
}

/// Stage 3: collapse every run of non-ASCII-alphanumerics into one space.
pub fn strip_symbols(text: &str) -> String {
    NON_ALPHANUMERIC.replace_all(text, " ").into_owned()
}

/// Stage 4: swap informal tokens for their canonical form.
pub fn substitute_informal(text: &str, informal: &InformalTermMap) -> String {
    text.split_whitespace()
        .map(|token| informal.get(token).map(String::as_str).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stage 5: drop disallowed tokens.
pub fn remove_disallowed(text: &str, disallowed: &DisallowedTermSet) -> String {
    text.split_whitespace()
        .filter(|token| !disallowed.contains(*token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(informal: &[(&str, &str)], disallowed: &[&str]) -> TextNormalizer {
        let informal = informal
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let disallowed = disallowed.iter().map(|s| s.to_string()).collect();
        TextNormalizer::new(Arc::new(Lexicon::new(informal, disallowed)))
    }

    fn plain() -> TextNormalizer {
        TextNormalizer::new(Arc::new(Lexicon::empty()))
    }

    #[test]
    fn test_mention_and_mask_removed() {
        let out = plain().normalize("HaLo @budi gimana x21 kabarnya??");
        assert_eq!(out, "halo gimana kabarnya");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(plain().normalize(""), "");
        assert_eq!(plain().normalize("   \n\t "), "");
    }

    #[test]
    fn test_informal_substitution() {
        let n = normalizer(&[("gw", "saya")], &[]);
        assert_eq!(n.normalize("gw mau makan"), "saya mau makan");
        assert_eq!(n.normalize("GW mau makan!!"), "saya mau makan");
    }

    #[test]
    fn test_disallowed_removal() {
        let n = normalizer(&[], &["bego"]);
        assert_eq!(n.normalize("dasar bego lu"), "dasar lu");
        assert_eq!(n.normalize("bego"), "");
    }

    #[test]
    fn test_substitution_runs_before_removal() {
        // A term mapped onto a disallowed word is removed in the last stage
        let n = normalizer(&[("bgo", "bego")], &["bego"]);
        assert_eq!(n.normalize("kamu bgo"), "kamu");
    }

    #[test]
    fn test_disallowed_match_is_case_sensitive() {
        // Only lowercase tokens survive to the last stage, so an uppercase
        // entry can never match.
        let n = normalizer(&[], &["BEGO"]);
        assert_eq!(n.normalize("BEGO"), "bego");
    }

    #[test]
    fn test_urls_removed() {
        let out = plain().normalize("check https://example.com now");
        assert!(!out.contains("http"));
        assert!(!out.contains("example.com"));
        assert_eq!(out, "check now");

        assert_eq!(plain().normalize("lihat www.detik.com/news ya"), "lihat ya");
        assert_eq!(plain().normalize("cek http://t.co/abc"), "cek");
    }

    #[test]
    fn test_truncated_scheme_url_removed() {
        assert_eq!(plain().normalize("cek htt://abc.com ya"), "cek ya");
    }

    #[test]
    fn test_hashtag_and_user_removed() {
        assert_eq!(plain().normalize("USER #2019GantiPresiden mantap"), "mantap");
    }

    #[test]
    fn test_user_and_mask_match_inside_words() {
        // Both patterns are unanchored, like the masking they target
        assert_eq!(strip_noise("username"), " name");
        assert_eq!(strip_noise("\\xf0\\x9f"), "\\ \\ ");
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(strip_noise("a\nb\tc"), "a b c");
    }

    #[test]
    fn test_symbols_collapse_to_single_space() {
        assert_eq!(strip_symbols("halo!!!  dunia...é"), "halo dunia ");
    }

    #[test]
    fn test_substitute_collapses_whitespace() {
        let map = InformalTermMap::new();
        assert_eq!(substitute_informal("  a   b  ", &map), "a b");
    }

    #[test]
    fn test_case_invariance() {
        let n = normalizer(&[("gw", "saya")], &["anjing"]);
        for input in ["Gw Lagi di RUMAH", "ANJING lu @Budi", "cek WWW.Example.COM ok", "ñandú"] {
            assert_eq!(n.normalize(input), n.normalize(&input.to_uppercase()));
        }
    }

    #[test]
    fn test_idempotent_on_clean_output() {
        let n = normalizer(&[("gw", "saya")], &["bego"]);
        let once = n.normalize("Gw BEGO banget sih, liat https://t.co/x #viral");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn test_deterministic() {
        let n = normalizer(&[("gw", "saya")], &[]);
        let input = "Gw @a #b user x12 !!";
        assert_eq!(n.normalize(input), n.normalize(input));
    }
}
