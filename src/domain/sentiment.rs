//! Lexicon-based sentiment scoring with a VADER-style compound score.

use std::collections::HashMap;

/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;
/// Scalar added (or removed) by an intensity modifier.
const BOOSTER_INCREMENT: f64 = 0.293;
/// Multiplier applied when a negation precedes a lexicon hit.
const NEGATION_SCALAR: f64 = -0.74;
/// How many preceding tokens are searched for a negation.
const NEGATION_WINDOW: usize = 3;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
];

const BOOSTERS: &[&str] = &[
    "very",
    "extremely",
    "highly",
    "hugely",
    "incredibly",
    "remarkably",
    "significantly",
    "sharply",
    "substantially",
    "really",
];

const DAMPENERS: &[&str] = &["slightly", "somewhat", "barely", "marginally", "mildly"];

/// Scores text against a word → valence lexicon (valences roughly in [-4, 4]).
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: HashMap<String, f64>,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: HashMap<String, f64>) -> Self {
        Self { lexicon }
    }

    /// Add or override lexicon entries.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        for (word, valence) in entries {
            self.lexicon.insert(word.to_lowercase(), valence);
        }
        self
    }

    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    /// Compound polarity in [-1, 1]; 0 when no lexicon word appears.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                continue;
            };
            let mut valence = base;

            if let Some(prev) = i.checked_sub(1).map(|j| tokens[j].as_str()) {
                if BOOSTERS.contains(&prev) {
                    valence += BOOSTER_INCREMENT * base.signum();
                } else if DAMPENERS.contains(&prev) {
                    valence -= BOOSTER_INCREMENT * base.signum();
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|t| is_negation(t)) {
                valence *= NEGATION_SCALAR;
            }

            sum += valence;
        }

        normalize(sum)
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        let lexicon = DEFAULT_LEXICON
            .iter()
            .map(|(word, valence)| (word.to_string(), *valence))
            .collect();
        Self { lexicon }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("strong", 2.3),
    ("stronger", 2.1),
    ("gain", 2.4),
    ("gains", 1.8),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 1.9),
    ("rise", 1.2),
    ("rises", 1.2),
    ("rose", 1.2),
    ("rising", 1.1),
    ("soar", 2.3),
    ("soared", 2.4),
    ("surge", 1.9),
    ("surged", 1.9),
    ("rally", 1.8),
    ("rallied", 1.8),
    ("beat", 1.4),
    ("beats", 1.4),
    ("growth", 1.6),
    ("record", 1.1),
    ("bullish", 2.0),
    ("upgrade", 1.6),
    ("upgraded", 1.6),
    ("outperform", 1.8),
    ("positive", 2.6),
    ("success", 2.7),
    ("successful", 2.8),
    ("win", 2.8),
    ("boost", 1.7),
    ("boosted", 1.7),
    ("optimistic", 2.0),
    ("innovative", 1.9),
    ("confident", 2.2),
    ("recovery", 1.5),
    ("bad", -2.5),
    ("weak", -1.9),
    ("weaker", -1.9),
    ("loss", -1.3),
    ("losses", -1.6),
    ("lose", -1.7),
    ("plunge", -2.0),
    ("plunged", -2.1),
    ("fall", -1.1),
    ("fell", -1.1),
    ("drop", -1.1),
    ("dropped", -1.2),
    ("decline", -1.5),
    ("declined", -1.5),
    ("crash", -2.6),
    ("crashed", -2.6),
    ("bearish", -2.0),
    ("downgrade", -1.6),
    ("downgraded", -1.6),
    ("lawsuit", -1.8),
    ("fraud", -3.0),
    ("risk", -1.1),
    ("risky", -1.4),
    ("fear", -2.2),
    ("fears", -2.1),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("miss", -1.2),
    ("missed", -1.3),
    ("awful", -2.6),
    ("terrible", -2.9),
    ("poor", -2.1),
    ("recession", -2.2),
    ("layoffs", -1.9),
    ("bankrupt", -2.6),
    ("bankruptcy", -2.5),
    ("slump", -2.0),
    ("volatile", -1.0),
    ("uncertainty", -1.4),
    ("warning", -1.4),
    ("debt", -1.5),
    ("scandal", -2.4),
    ("investigation", -1.2),
];
