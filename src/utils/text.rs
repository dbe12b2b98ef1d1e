// src/utils/text.rs

//! Text folding and tokenizing for content matching.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Lowercase `text` and strip Latin diacritics.
///
/// Covers the Latin-1 Supplement and Latin Extended-A letters found in
/// Portuguese, Spanish, French, Italian and German titles; other characters
/// are only lowercased.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match strip_diacritic(c) {
            Some(base) => out.push_str(base),
            None => out.push(c),
        }
    }
    out
}

fn strip_diacritic(c: char) -> Option<&'static str> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    };
    Some(base)
}

/// Significant words of a term: folded, longer than `min_len` characters,
/// not stop words, first occurrence only.
pub fn significant_tokens(term: &str, min_len: usize, stop_words: &[String]) -> Vec<String> {
    let stop: HashSet<String> = stop_words.iter().map(|w| fold(w)).collect();
    let mut seen = HashSet::new();

    term.unicode_words()
        .map(fold)
        .filter(|word| word.chars().count() > min_len)
        .filter(|word| !stop.contains(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
