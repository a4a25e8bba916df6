// Polarity values and the negation/contrast scorer.
use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Width of the negation window on each side of the anchor.
pub const DEFAULT_NEGATION_WINDOW: usize = 2;

// Negation and contrast markers that flip the sign of a nearby opinion
static CONTRAST_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "n't", "'t", "however", "but", "despite", "though", "except", "although", "oddly",
    ]
    .iter()
    .copied()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn value(self) -> i32 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }

    /// Review-level polarity: ratings of 3 and above are positive.
    pub fn from_rating(rating: i64) -> Self {
        if rating >= 3 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}

impl From<Polarity> for i32 {
    fn from(p: Polarity) -> i32 {
        p.value()
    }
}

impl TryFrom<i32> for Polarity {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Polarity::Positive),
            -1 => Ok(Polarity::Negative),
            other => Err(format!("polarity must be 1 or -1, got {}", other)),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

pub fn is_contrast_marker(token: &str) -> bool {
    CONTRAST_MARKERS.contains(token) || CONTRAST_MARKERS.contains(token.to_lowercase().as_str())
}

/// Returns -1 when a negation or contrast marker occurs in
/// `[pos - window, pos + window)`, clamped to the sentence, else +1.
pub fn negation_multiplier<S: AsRef<str>>(tokens: &[S], pos: usize, window: usize) -> i32 {
    let start = pos.saturating_sub(window);
    let end = tokens.len().min(pos.saturating_add(window));
    if start >= end {
        return 1;
    }
    if tokens[start..end]
        .iter()
        .any(|t| is_contrast_marker(t.as_ref()))
    {
        -1
    } else {
        1
    }
}
