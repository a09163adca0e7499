use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UNIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(tablespoon|teaspoon|pound|ounce|cup|gallon|quart|pint|kilogram|gram|milliliter|liter)s?\b",
    )
    .expect("unit pattern is valid")
});

/// 單位縮寫對照表。 / Unit words and their abbreviations.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("tablespoon", "tbsp"),
    ("teaspoon", "tsp"),
    ("pound", "lb"),
    ("ounce", "oz"),
    ("cup", "c."),
    ("gallon", "gal"),
    ("quart", "qt"),
    ("pint", "pt"),
    ("kilogram", "kg"),
    ("gram", "g"),
    ("milliliter", "ml"),
    ("liter", "L"),
];

/// 將常見計量單位縮寫以節省版面寬度。 / Shortens common unit words ("2 tablespoons" -> "2 tbsp").
///
/// Only whole words are replaced, so "cupcake" or "grammar" pass through untouched.
/// The abbreviations never match the pattern themselves, which makes the
/// transform idempotent.
pub fn abbreviate(text: &str) -> String {
    UNIT_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let unit = caps[1].to_ascii_lowercase();
            ABBREVIATIONS
                .iter()
                .find(|(word, _)| *word == unit)
                .map(|(_, short)| (*short).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
