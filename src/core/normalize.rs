//! Canonicalization of brewery and beer names.
//!
//! Names from the two catalogs are written by different people at different
//! times, so the same brewery shows up as `Bell's Brewery, Inc.` in one and
//! `Bells Brewery` in the other. Normalization folds accented letters, strips
//! legal-entity suffixes and punctuation noise, and lowercases, so that the
//! scorer only ever compares the words that identify an entity.
//!
//! Tokenization splits on runs of whitespace and hyphens. Tokens in
//! [`IGNORED_WORDS`] never count toward word overlap, but they do take part in
//! bigram construction.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::types::NameKind;

/// Tokens excluded from word-overlap scoring
pub const IGNORED_WORDS: [&str; 7] = ["", "-", "/", "+", "and", "the", "of"];

const ACCENTED: &str = "ÀÁÂÃÄÅàáâãäåĀāĂăĄąÇçĆćĈĉĊċČčÐðĎďĐđÈÉÊËèéêëĒēĔĕĖėĘęĚěĜĝĞğĠġĢģĤĥĦħÌÍÎÏìíîïĨĩĪīĬĭĮįİıĴĵĶķĸĹĺĻļĽľĿŀŁłÑñŃńŅņŇňŉŊŋÒÓÔÕÖØòóôõöøŌōŎŏŐőŔŕŖŗŘřŚśŜŝŞşŠšſŢţŤťŦŧÙÚÛÜùúûüŨũŪūŬŭŮůŰűŲųŴŵÝýÿŶŷŸŹźŻżŽž";
const UNACCENTED: &str = "AAAAAAaaaaaaAaAaAaCcCcCcCcCcDdDdDdEEEEeeeeEeEeEeEeEeGgGgGgGgHhHhIIIIiiiiIiIiIiIiIiJjKkkLlLlLlLlLlNnNnNnNnnNnOOOOOOooooooOoOoOoRrRrRrSsSsSsSssTtTtTtUUUUuuuuUuUuUuUuUuUuWwYyyYyYZzZzZz";

static FOLD_TABLE: Lazy<HashMap<char, char>> =
    Lazy::new(|| ACCENTED.chars().zip(UNACCENTED.chars()).collect());

/// Rewrite rules applied to every name, in order. Each rule runs over the
/// output of the previous one.
static NAME_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile_rules(&[
        (r"(?i)'s\b", "s"),
        (r",", ""),
        (r"&", " and "),
        (r"(?i)\sCo\.?(\s|$)", "${1}"),
        (r"(?i)\sCompany\.?(\s|$)", "${1}"),
        (r"(?i)\sL\.?L\.?C\.?(\s|$)", "${1}"),
        (r"(?i)\sInc\.?(\s|$)", "${1}"),
        (r"(?i)\sLtd\.?(\s|$)", "${1}"),
        (r"(?i)\sLimited(\s|$)", "${1}"),
        (r"(?i)\sA\.?G\.?(\s|$)", "${1}"),
        (r"(?i)\sS\.?A\.?(\s|$)", "${1}"),
        (r"(?i)\sN\.?V\.?(\s|$)", "${1}"),
        (r"(?i)\sB\.? ?V\.?(\s|$)", "${1}"),
        (r"(?i)\sC\.?L\.?(\s|$)", "${1}"),
        (r"(?i)\sA\.?\s?S\.?(\s|$)", "${1}"),
        (r"(?i)\sGmbH(\s|$)", "${1}"),
        (r"(?i)\s\(samuel adams\)$", ""),
        (r"(?i)\s/ bridgeport brewpub \+ bakery$", ""),
    ])
});

/// Extra rules for brewery names only
static BREWERY_RULES: Lazy<Vec<(Regex, &'static str)>> =
    Lazy::new(|| compile_rules(&[(r"(?i)\bbrew(?:ing|ery)\b", "")]));

fn compile_rules(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            // Patterns are compile-time constants covered by the unit tests
            let rule = Regex::new(pattern).expect("normalization rule is a valid regex");
            (rule, *replacement)
        })
        .collect()
}

/// Replace accented Latin letters with their unaccented ASCII base, keeping case.
#[must_use]
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| FOLD_TABLE.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Normalize a beer (or any non-brewery) name.
#[must_use]
pub fn normalize(raw: &str) -> String {
    normalize_as(raw, NameKind::Beer)
}

/// Normalize a brewery name. Also strips standalone `Brewing`/`Brewery`.
#[must_use]
pub fn normalize_brewery(raw: &str) -> String {
    normalize_as(raw, NameKind::Brewery)
}

/// Normalize a name of the given kind.
///
/// The rewrite pass is repeated until the output stops changing, so
/// `normalize_as(normalize_as(x, k), k) == normalize_as(x, k)` always holds.
#[must_use]
pub fn normalize_as(raw: &str, kind: NameKind) -> String {
    let mut current = normalize_once(raw, kind);
    loop {
        let next = normalize_once(&current, kind);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str, kind: NameKind) -> String {
    let mut name = fold_diacritics(raw);

    for (rule, replacement) in NAME_RULES.iter() {
        name = rule.replace_all(&name, *replacement).into_owned();
    }

    if kind == NameKind::Brewery {
        for (rule, replacement) in BREWERY_RULES.iter() {
            name = rule.replace_all(&name, *replacement).into_owned();
        }
    }

    collapse_whitespace(&name.to_lowercase())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Remove the leading tokens a beer name shares with its brewery's name.
///
/// `great lakes big black smoke` under `great lakes` becomes `big black smoke`.
/// Both arguments are expected to be normalized already. A beer named exactly
/// after its brewery is returned unchanged rather than emptied.
#[must_use]
pub fn strip_common_prefix(name: &str, brewery: &str) -> String {
    let mut remaining = name;
    let mut stripped = false;

    for token in tokenize(brewery) {
        let trimmed = remaining.trim_start_matches(is_delimiter);
        match trimmed.strip_prefix(token) {
            Some(after) if after.is_empty() || after.starts_with(is_delimiter) => {
                remaining = after;
                stripped = true;
            }
            _ => break,
        }
    }

    let remaining = remaining.trim_start_matches(is_delimiter);
    if !stripped || remaining.is_empty() {
        return name.to_string();
    }
    remaining.to_string()
}

/// Split a name into raw tokens on runs of whitespace and hyphens
#[must_use]
pub fn tokenize(name: &str) -> Vec<&str> {
    name.split(is_delimiter).filter(|t| !t.is_empty()).collect()
}

#[must_use]
pub fn is_ignored(token: &str) -> bool {
    IGNORED_WORDS.contains(&token)
}

/// Distinct tokens of a name that count toward word overlap, in sorted order
#[must_use]
pub fn word_set(name: &str) -> BTreeSet<&str> {
    tokenize(name).into_iter().filter(|t| !is_ignored(t)).collect()
}

/// Key used for a pair of adjacent tokens
#[must_use]
pub fn bigram_key(first: &str, second: &str) -> String {
    format!("{first} {second}")
}

/// Distinct adjacent token pairs of a name, ignore-set included, in sorted order
#[must_use]
pub fn bigram_set(name: &str) -> BTreeSet<String> {
    tokenize(name)
        .windows(2)
        .map(|pair| bigram_key(pair[0], pair[1]))
        .collect()
}
