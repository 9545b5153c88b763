//! Lexicon-based polarity scorer.
//!
//! A small word → polarity dictionary with negation and intensifier
//! handling, in the spirit of pattern/TextBlob scoring: matched word
//! polarities are averaged and the result clamped to `[-1, 1]`.

use std::collections::{HashMap, HashSet};

use super::sentiment::PolarityScorer;
use crate::error::ScoringError;

/// Factor applied to a polarity following a negation ("not good").
const NEGATION_FACTOR: f64 = -0.5;

/// Number of following words a negation reaches ("not the best").
const NEGATION_WINDOW: usize = 3;

/// Sentiment scorer for English review text
pub struct LexiconScorer {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            polarity: Self::build_polarity_lexicon(),
            intensifiers: Self::build_intensifier_lexicon(),
            negations: [
                "not", "no", "never", "neither", "nor", "dont", "doesnt", "didnt", "isnt",
                "wasnt", "cant", "couldnt", "wont", "wouldnt", "hardly",
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Score already-normalized text (lowercase, no punctuation).
    pub fn score(&self, text: &str) -> f64 {
        let mut hits: Vec<f64> = Vec::new();
        let mut negate = 0usize;
        let mut boost = 1.0;

        for word in text.split_whitespace() {
            if self.negations.contains(word) {
                negate = NEGATION_WINDOW;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(word) {
                boost *= factor;
                continue;
            }
            if let Some(&p) = self.polarity.get(word) {
                let mut p = p * boost;
                if negate > 0 {
                    p *= NEGATION_FACTOR;
                }
                hits.push(p.clamp(-1.0, 1.0));
                negate = 0;
            } else {
                negate = negate.saturating_sub(1);
            }
            boost = 1.0;
        }

        if hits.is_empty() {
            return 0.0;
        }
        (hits.iter().sum::<f64>() / hits.len() as f64).clamp(-1.0, 1.0)
    }

    /// Build word polarity lexicon
    fn build_polarity_lexicon() -> HashMap<&'static str, f64> {
        [
            // Strong praise
            ("excellent", 1.0), ("perfect", 1.0), ("best", 1.0), ("wonderful", 1.0),
            ("masterpiece", 1.0), ("brilliant", 0.9), ("amazing", 0.6), ("outstanding", 0.5),
            ("fantastic", 0.4), ("superb", 1.0), ("awesome", 1.0), ("beautiful", 0.85),
            ("loved", 0.7), ("love", 0.5), ("great", 0.8), ("favorite", 0.5),

            // Mild praise
            ("good", 0.7), ("nice", 0.6), ("enjoyed", 0.4), ("enjoyable", 0.5),
            ("interesting", 0.5), ("fun", 0.3), ("happy", 0.8), ("recommend", 0.3),
            ("recommended", 0.3), ("engaging", 0.4), ("compelling", 0.5), ("fine", 0.4),
            ("helpful", 0.5), ("useful", 0.3), ("clever", 0.5), ("well", 0.3),

            // Mild criticism
            ("slow", -0.3), ("long", -0.05), ("confusing", -0.3), ("predictable", -0.2),
            ("dull", -0.4), ("flat", -0.25), ("weak", -0.4), ("mediocre", -0.5),
            ("disappointing", -0.6), ("disappointed", -0.75), ("boring", -1.0), ("bland", -0.5),

            // Strong criticism
            ("bad", -0.7), ("poor", -0.4), ("terrible", -1.0), ("awful", -1.0),
            ("horrible", -1.0), ("worst", -1.0), ("hate", -0.8), ("hated", -0.9),
            ("waste", -0.2), ("useless", -0.5), ("stupid", -0.8), ("annoying", -0.8),
            ("sad", -0.5), ("wrong", -0.5),
        ]
        .into_iter()
        .collect()
    }

    /// Build intensifier lexicon (multipliers on the next polar word)
    fn build_intensifier_lexicon() -> HashMap<&'static str, f64> {
        [
            ("very", 1.3), ("really", 1.3), ("extremely", 1.5), ("so", 1.2),
            ("incredibly", 1.5), ("truly", 1.2), ("quite", 1.1), ("too", 1.1),
            ("somewhat", 0.7), ("slightly", 0.5), ("barely", 0.5),
        ]
        .into_iter()
        .collect()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, ScoringError> {
        Ok(self.score(text))
    }
}
