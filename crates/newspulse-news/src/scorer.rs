//! Lexicon-based compound sentiment scorer for news headlines.

/// Produces a compound polarity score in `[-1.0, 1.0]` for arbitrary text.
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Word valences on a `[-4.0, 4.0]` scale, tuned for business news.
///
/// Keys are lowercase single words.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("gain", 1.6),
    ("gains", 1.6),
    ("growth", 1.6),
    ("grow", 1.4),
    ("grows", 1.4),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 1.9),
    ("surge", 1.5),
    ("surges", 1.5),
    ("soar", 1.8),
    ("soars", 1.8),
    ("rally", 1.4),
    ("rallies", 1.4),
    ("rise", 1.1),
    ("rises", 1.1),
    ("beat", 1.0),
    ("beats", 1.0),
    ("strong", 2.0),
    ("stronger", 2.0),
    ("success", 2.7),
    ("successful", 2.8),
    ("win", 2.8),
    ("wins", 2.7),
    ("won", 2.7),
    ("award", 2.5),
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("best", 3.2),
    ("boost", 1.7),
    ("boosts", 1.7),
    ("upgrade", 1.4),
    ("upgraded", 1.4),
    ("record", 0.5),
    ("innovative", 2.2),
    ("innovation", 1.9),
    ("expand", 1.2),
    ("expands", 1.2),
    ("expansion", 1.2),
    ("launch", 0.9),
    ("launches", 0.9),
    ("partnership", 1.5),
    ("approve", 1.9),
    ("approved", 1.8),
    ("positive", 2.6),
    ("optimistic", 2.3),
    ("confident", 2.2),
    ("improve", 1.9),
    ("improved", 2.1),
    ("recovery", 1.4),
    ("opportunity", 1.8),
    ("benefit", 2.0),
    ("leading", 1.3),
    ("milestone", 1.6),
    ("celebrate", 2.7),
    ("happy", 2.7),
    ("love", 3.2),
    ("bullish", 1.9),
    ("outperform", 1.7),
    // Negative
    ("loss", -1.3),
    ("losses", -1.7),
    ("lose", -1.7),
    ("decline", -1.5),
    ("declines", -1.5),
    ("drop", -1.1),
    ("drops", -1.1),
    ("fall", -1.1),
    ("falls", -1.1),
    ("plunge", -2.0),
    ("plunges", -2.0),
    ("slump", -1.8),
    ("crash", -2.4),
    ("weak", -1.9),
    ("weaker", -1.9),
    ("miss", -1.2),
    ("misses", -1.2),
    ("lawsuit", -1.8),
    ("sue", -1.5),
    ("sued", -1.8),
    ("fraud", -2.8),
    ("scandal", -2.6),
    ("probe", -1.0),
    ("investigation", -1.1),
    ("fine", -0.8),
    ("fined", -1.6),
    ("penalty", -1.9),
    ("recall", -1.8),
    ("layoffs", -2.0),
    ("cuts", -1.1),
    ("bankruptcy", -2.8),
    ("bankrupt", -2.6),
    ("debt", -1.5),
    ("crisis", -3.1),
    ("risk", -1.1),
    ("risks", -1.1),
    ("warning", -1.4),
    ("warns", -1.4),
    ("downgrade", -1.5),
    ("downgraded", -1.5),
    ("bad", -2.5),
    ("worst", -3.1),
    ("fail", -2.5),
    ("fails", -2.3),
    ("failed", -2.3),
    ("failure", -2.3),
    ("problem", -1.7),
    ("problems", -1.7),
    ("concern", -1.2),
    ("concerns", -1.4),
    ("delay", -1.3),
    ("delayed", -1.3),
    ("halt", -1.4),
    ("strike", -1.5),
    ("protest", -1.0),
    ("ban", -2.6),
    ("banned", -2.0),
    ("illegal", -2.6),
    ("bearish", -1.8),
    ("underperform", -1.6),
    ("negative", -2.7),
    ("uncertainty", -1.4),
    ("volatile", -1.1),
];

/// Words that intensify the sentiment word that follows them.
const BOOSTERS: &[&str] = &[
    "very",
    "extremely",
    "highly",
    "hugely",
    "incredibly",
    "really",
    "significantly",
    "sharply",
    "strongly",
    "massively",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "cannot",
];

const BOOSTER_INCREMENT: f64 = 0.293;
const NEGATION_SCALAR: f64 = -0.74;
const NEGATION_WINDOW: usize = 3;
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Lexicon scorer with negation and booster handling.
///
/// Each known word contributes its valence. A booster directly before it
/// pushes the valence further from zero; a negation within the three preceding
/// tokens flips and damps it. The summed valence `s` is normalised to
/// `s / sqrt(s² + 15)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        compound_score(text)
    }
}

fn valence(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|&&(lex_word, _)| lex_word == word)
        .map(|&(_, weight)| weight)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn normalize_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
        .replace('\u{2019}', "'")
}

/// Score `text` into `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn compound_score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0_f64;
    for (i, token) in tokens.iter().enumerate() {
        let Some(mut v) = valence(token) else {
            continue;
        };

        if i > 0 && BOOSTERS.contains(&tokens[i - 1].as_str()) {
            v += BOOSTER_INCREMENT.copysign(v);
        }

        let window_start = i.saturating_sub(NEGATION_WINDOW);
        if tokens[window_start..i].iter().any(|t| is_negation(t)) {
            v *= NEGATION_SCALAR;
        }

        sum += v;
    }

    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
