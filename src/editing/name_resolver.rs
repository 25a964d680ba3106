//! Resolve a free-text place reference to a known place name
//!
//! Matchers run in a fixed order and the first one that produces a match
//! wins, even when a later matcher would score the input closer.

use serde::Serialize;
use tracing::debug;

/// Characters dropped by normalization, in addition to whitespace
const STRIPPED_PUNCTUATION: [char; 12] = [
    '-', '_', '(', ')', '[', ']', '{', '}', ',', '.', '·', '•',
];

/// Matcher tiers in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Normalized,
    Substring,
    EditDistance,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 5] = [
        MatchTier::Exact,
        MatchTier::CaseInsensitive,
        MatchTier::Normalized,
        MatchTier::Substring,
        MatchTier::EditDistance,
    ];

    /// Run this tier alone. Returns the index of the winning name and, for
    /// the edit-distance tier, its distance.
    #[must_use]
    pub fn try_match(self, input: &str, names: &[String]) -> Option<(usize, Option<usize>)> {
        let input_norm = normalize(input);
        match self {
            MatchTier::Exact => names.iter().position(|n| n == input).map(|i| (i, None)),
            MatchTier::CaseInsensitive => {
                let lowered = input.to_lowercase();
                names
                    .iter()
                    .position(|n| n.to_lowercase() == lowered)
                    .map(|i| (i, None))
            }
            MatchTier::Normalized => names
                .iter()
                .position(|n| !input_norm.is_empty() && normalize(n) == input_norm)
                .map(|i| (i, None)),
            MatchTier::Substring => names
                .iter()
                .position(|n| {
                    contains_either_way(input, n)
                        || contains_either_way(&input_norm, &normalize(n))
                })
                .map(|i| (i, None)),
            MatchTier::EditDistance => {
                let mut best: Option<(usize, usize)> = None;
                for (i, name) in names.iter().enumerate() {
                    let d = levenshtein(&input_norm, &normalize(name));
                    // strict comparison keeps the first-seen name on ties
                    if best.is_none_or(|(_, best_d)| d < best_d) {
                        best = Some((i, d));
                    }
                }
                best.map(|(i, d)| (i, Some(d)))
            }
        }
    }
}

/// Winning name and how it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzyMatchResult {
    pub name: String,
    pub tier: MatchTier,
    /// Only set by the edit-distance tier
    pub distance: Option<usize>,
}

pub struct NameResolver;

impl NameResolver {
    /// Closest known name for `input`, or `None` when `names` is empty or
    /// `input` is empty or whitespace-only
    #[must_use]
    pub fn resolve_closest(input: &str, names: &[String]) -> Option<String> {
        Self::resolve(input, names).map(|m| m.name)
    }

    /// Like [`NameResolver::resolve_closest`] but reports the tier that matched.
    /// Whitespace-only input never matches, even against blank names.
    #[must_use]
    pub fn resolve(input: &str, names: &[String]) -> Option<FuzzyMatchResult> {
        if input.trim().is_empty() || names.is_empty() {
            return None;
        }

        let result = MatchTier::ORDER.iter().find_map(|&tier| {
            tier.try_match(input, names).map(|(i, distance)| FuzzyMatchResult {
                name: names[i].clone(),
                tier,
                distance,
            })
        });

        if let Some(found) = &result {
            debug!("Resolved '{}' to '{}' via {:?}", input, found.name, found.tier);
        }
        result
    }
}

/// Lowercase and drop whitespace and common punctuation
#[must_use]
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

fn contains_either_way(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Levenshtein distance over Unicode scalar values
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
