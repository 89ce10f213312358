//! Flesch–Kincaid grade level and Flesch reading ease.

use crate::segments::{count_syllables, segment_sentences, word_tokens};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readability {
    pub words: u32,
    pub sentences: u32,
    pub syllables: u32,
    pub grade: f64,
    pub ease: f64,
}

pub fn flesch_kincaid_grade(words: u32, sentences: u32, syllables: u32) -> f64 {
    if words == 0 || sentences == 0 {
        return 0.0;
    }
    let wps = words as f64 / sentences as f64;
    let spw = syllables as f64 / words as f64;
    0.39 * wps + 11.8 * spw - 15.59
}

pub fn flesch_reading_ease(words: u32, sentences: u32, syllables: u32) -> f64 {
    if words == 0 || sentences == 0 {
        return 0.0;
    }
    let wps = words as f64 / sentences as f64;
    let spw = syllables as f64 / words as f64;
    206.835 - 1.015 * wps - 84.6 * spw
}

pub fn analyze(text: &str) -> Readability {
    let tokens = word_tokens(text);
    let words = tokens.len() as u32;
    let syllables: u32 = tokens.iter().map(|w| count_syllables(w)).sum();
    let sentences = if words == 0 { 0 } else { (segment_sentences(text).len() as u32).max(1) };
    Readability {
        words,
        sentences,
        syllables,
        grade: flesch_kincaid_grade(words, sentences, syllables),
        ease: flesch_reading_ease(words, sentences, syllables),
    }
}
