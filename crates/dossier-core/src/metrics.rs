//! Metric semantics: quality vs. safety classification, pass/fail direction,
//! qualitative rating, and display-name formatting.

use serde::{Deserialize, Serialize};

/// Broad grouping of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    Quality,
    Safety,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Quality => "quality",
            MetricCategory::Safety => "safety",
        }
    }
}

/// Classification of one metric name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricClass {
    pub category: MetricCategory,
    /// Lower raw scores are better when set.
    pub inverted: bool,
}

/// Four-level qualitative rating derived from a direction-corrected score.
/// Variants are ordered ascending so comparisons follow score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        }
    }
}

/// Owns the safety-metric marker list so alternate taxonomies can be
/// substituted in tests instead of reading ambient constants.
#[derive(Debug, Clone)]
pub struct MetricTaxonomy {
    safety_markers: Vec<String>,
}

impl Default for MetricTaxonomy {
    fn default() -> Self {
        Self::new(["bias", "toxicity", "hallucination", "conversation-safety"])
    }
}

impl MetricTaxonomy {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            safety_markers: markers.into_iter().map(|m| fold(m.as_ref())).collect(),
        }
    }

    /// Classify a metric by case-insensitive substring match against the
    /// marker list. Safety metrics are inverted: a lower raw score is
    /// better.
    pub fn classify(&self, metric: &str) -> MetricClass {
        let folded = fold(metric);
        let safety = self
            .safety_markers
            .iter()
            .any(|marker| folded.contains(marker.as_str()));
        MetricClass {
            category: if safety {
                MetricCategory::Safety
            } else {
                MetricCategory::Quality
            },
            inverted: safety,
        }
    }
}

/// Pass/fail of a score against a threshold, honoring direction.
pub fn passed(score: f64, threshold: f64, inverted: bool) -> bool {
    if inverted {
        score <= threshold
    } else {
        score >= threshold
    }
}

/// Qualitative rating over the effective (direction-corrected) score.
/// Buckets are exhaustive and non-overlapping over [0, 1].
pub fn rating(score: f64, inverted: bool) -> Rating {
    let effective = if inverted { 1.0 - score } else { score };
    if effective >= 0.8 {
        Rating::Excellent
    } else if effective >= 0.6 {
        Rating::Good
    } else if effective >= 0.4 {
        Rating::Fair
    } else {
        Rating::Poor
    }
}

/// Turn an identifier-style metric name into a display name: a space is
/// inserted before a lowercase-to-uppercase transition and before an
/// uppercase run followed by a capitalized word, then each word is
/// title-cased. `answerRelevancy` becomes `Answer Relevancy`, `XMLParser`
/// becomes `XML Parser`.
pub fn format_metric_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            let prev = chars[i - 1];
            let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
            let acronym_boundary = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if lower_to_upper || acronym_boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut cs = word.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().collect::<String>() + cs.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive alphanumeric fold used for marker matching, so
/// `conversationSafety`, `conversation_safety`, and `Conversation-Safety`
/// all match the `conversation-safety` marker.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
