//! TF-IDF vectorization over a two-document corpus plus cosine similarity.
//!
//! Two interchangeable IDF laws sit behind the `Vectorizer` trait; the
//! scorer holds an `Arc<dyn Vectorizer>` picked at startup.
//!
//! Tokens shorter than two characters are dropped, unigrams and bigrams are
//! both counted and there is no stop-word removal, so technical tokens such
//! as `sql` or `cpp` survive. Vectors are `BTreeMap`s, which keeps float
//! summation order (and therefore every score) reproducible.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub type TermVector = BTreeMap<String, f64>;

pub trait Vectorizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// TF-IDF vectors for the corpus `[a, b]`. Inputs are normalized text.
    fn vectorize(&self, a: &str, b: &str) -> (TermVector, TermVector);

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let (va, vb) = self.vectorize(a, b);
        cosine(&va, &vb)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// IDF laws
// ────────────────────────────────────────────────────────────────────────────

/// Smoothed IDF, `ln((1 + n) / (1 + df)) + 1`, as used by mainstream ML
/// toolkits. Terms shared by both documents keep a weight of 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothTfidf;

impl Vectorizer for SmoothTfidf {
    fn name(&self) -> &'static str {
        "smooth"
    }

    fn vectorize(&self, a: &str, b: &str) -> (TermVector, TermVector) {
        tfidf(a, b, |n, df| ((1.0 + n) / (1.0 + df)).ln() + 1.0)
    }
}

/// Natural-log IDF, `ln(N / max(1, df))` with `N = 2`. Terms present in
/// both documents get weight 0, so only asymmetric vocabulary contributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalTfidf;

impl Vectorizer for NaturalTfidf {
    fn name(&self) -> &'static str {
        "natural"
    }

    fn vectorize(&self, a: &str, b: &str) -> (TermVector, TermVector) {
        tfidf(a, b, |n, df| (n / df.max(1.0)).ln())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorizerKind {
    #[default]
    Smooth,
    Natural,
}

impl VectorizerKind {
    pub fn build(self) -> Arc<dyn Vectorizer> {
        match self {
            VectorizerKind::Smooth => Arc::new(SmoothTfidf),
            VectorizerKind::Natural => Arc::new(NaturalTfidf),
        }
    }
}

impl FromStr for VectorizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smooth" | "library" => Ok(VectorizerKind::Smooth),
            "natural" | "fallback" => Ok(VectorizerKind::Natural),
            other => Err(format!("unknown vectorizer '{other}' (expected smooth or natural)")),
        }
    }
}

impl fmt::Display for VectorizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VectorizerKind::Smooth => "smooth",
            VectorizerKind::Natural => "natural",
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared machinery
// ────────────────────────────────────────────────────────────────────────────

/// Unigrams of at least two characters followed by their adjacent bigrams.
pub fn terms(normalized: &str) -> Vec<String> {
    let unigrams: Vec<&str> = normalized
        .split(' ')
        .filter(|t| t.chars().count() >= 2)
        .collect();
    let bigrams = unigrams.windows(2).map(|w| format!("{} {}", w[0], w[1]));
    unigrams
        .iter()
        .map(|t| t.to_string())
        .chain(bigrams)
        .collect()
}

fn term_counts(normalized: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for term in terms(normalized) {
        *counts.entry(term).or_insert(0.0) += 1.0;
    }
    counts
}

fn tfidf(a: &str, b: &str, idf: impl Fn(f64, f64) -> f64) -> (TermVector, TermVector) {
    const N_DOCS: f64 = 2.0;
    let (ca, cb) = (term_counts(a), term_counts(b));

    let weigh = |own: &BTreeMap<String, f64>, other: &BTreeMap<String, f64>| -> TermVector {
        own.iter()
            .map(|(term, tf)| {
                let df = if other.contains_key(term) { 2.0 } else { 1.0 };
                (term.clone(), tf * idf(N_DOCS, df))
            })
            .collect()
    };

    (weigh(&ca, &cb), weigh(&cb, &ca))
}

/// Cosine similarity clipped to [0, 1]. A zero vector on either side gives 0.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let norm = |v: &TermVector| v.values().map(|w| w * w).sum::<f64>().sqrt();
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    (dot / (na * nb)).clamp(0.0, 1.0)
}
