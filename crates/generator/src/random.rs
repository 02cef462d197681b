//! Lorem text and small random helpers.
//!
//! Text comes from the `fake` crate's lorem corpus; everything takes the
//! caller's RNG so a seeded run is reproducible end to end.

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Paragraphs, Words};
use rand::Rng;

/// `true` with the given probability (clamped to `0.0..=1.0`).
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.random_bool(probability.clamp(0.0, 1.0))
}

/// Between `min` and `max` (inclusive) lorem words.
pub fn words<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> Vec<String> {
    let count = rng.random_range(min..=max.max(min));
    Words(count..count + 1).fake_with_rng(rng)
}

/// One lorem paragraph of three to five sentences.
pub fn paragraph<R: Rng + ?Sized>(rng: &mut R) -> String {
    Paragraph(3..6).fake_with_rng(rng)
}

/// `count` lorem paragraphs separated by blank lines.
pub fn paragraphs<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    let paragraphs: Vec<String> = Paragraphs(count..count + 1).fake_with_rng(rng);
    paragraphs.join("\n\n")
}

/// Uppercase the first character.
#[must_use]
pub fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// A random EAN-8 barcode (seven digits plus check digit).
pub fn ean8<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: Vec<u32> = (0..7).map(|_| rng.random_range(0..10)).collect();
    let weighted: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    let check = (10 - weighted % 10) % 10;

    digits
        .iter()
        .chain(std::iter::once(&check))
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

/// A random `rrggbb` color.
pub fn hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let rgb: u32 = rng.random_range(0..=0x00FF_FFFF);
    format!("{rgb:06x}")
}

/// Drop repeated entries, keeping first occurrences in order.
#[must_use]
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
