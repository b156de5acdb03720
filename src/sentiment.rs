use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

/// Polarity scores for one piece of text, as produced by the VADER scorer.
/// Only `compound` is consumed downstream; the other fields are kept for the
/// JSON surface and for logging.
#[derive(Clone, Copy, Debug)]
pub struct ScoreSet {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Sentiment bucket derived from a compound score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentLabel {
    Happy,
    Sad,
    Neutral,
}

impl SentimentLabel {
    /// Map a compound score to a label. Both thresholds are inclusive;
    /// everything strictly inside (-0.05, 0.05) is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            SentimentLabel::Happy
        } else if compound <= -0.05 {
            SentimentLabel::Sad
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Happy => "Happy",
            SentimentLabel::Sad => "Sad",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Happy => "😄",
            SentimentLabel::Sad => "😔",
            SentimentLabel::Neutral => "😐",
        }
    }

    /// Decorative image shown next to the label on the text result page.
    pub fn image_url(&self) -> &'static str {
        match self {
            SentimentLabel::Happy => {
                "https://st.depositphotos.com/1016482/2236/i/950/depositphotos_22362437-stock-photo-background-with-heap-of-yellow.jpg"
            }
            SentimentLabel::Sad => {
                "https://www.ecopetit.cat/wpic/mpic/270-2706765_sad-emoji-cover-photo-for-fb.jpg"
            }
            SentimentLabel::Neutral => {
                "https://atlas-content-cdn.pixelsquid.com/stock-images/neutral-face-facial-expression-L63Mrq1-600.jpg"
            }
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a submitted review sentence-by-sentence.
#[derive(Clone, Copy, Debug)]
pub struct TextAnalysis {
    pub label: SentimentLabel,
    pub mean_compound: f64,
    pub segment_count: usize,
}

/// Split submitted text into sentence-like segments: split on the literal
/// `.`, trim surrounding whitespace, drop empty pieces. Order is preserved.
pub fn split_segments(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Shared scoring collaborator. The VADER lexicon itself is process-wide
/// state behind the `vader_sentiment` crate, initialized on first use and
/// never mutated, so this handle is cheap and read-only.
pub struct SentimentAnalyzer {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            inner: SentimentIntensityAnalyzer::new(),
        }
    }

    pub fn score(&self, text: &str) -> ScoreSet {
        let scores = self.inner.polarity_scores(text);
        ScoreSet {
            negative: scores.get("neg").copied().unwrap_or(0.0),
            neutral: scores.get("neu").copied().unwrap_or(0.0),
            positive: scores.get("pos").copied().unwrap_or(0.0),
            compound: scores.get("compound").copied().unwrap_or(0.0),
        }
    }

    /// Score a review segment-by-segment and average the compound scores.
    ///
    /// Returns `None` when no segment survives splitting (text made of dots
    /// and whitespace only); callers treat that like an empty submission
    /// rather than dividing by zero.
    pub fn analyze_review(&self, text: &str) -> Option<TextAnalysis> {
        let segments = split_segments(text);
        if segments.is_empty() {
            return None;
        }

        let sum: f64 = segments
            .iter()
            .map(|segment| self.score(segment).compound)
            .sum();
        let mean_compound = sum / segments.len() as f64;

        Some(TextAnalysis {
            label: SentimentLabel::from_compound(mean_compound),
            mean_compound,
            segment_count: segments.len(),
        })
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds_are_inclusive() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Happy);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Sad);
        assert_eq!(SentimentLabel::from_compound(0.0), SentimentLabel::Neutral);
        assert_eq!(
            SentimentLabel::from_compound(0.0499),
            SentimentLabel::Neutral
        );
        assert_eq!(
            SentimentLabel::from_compound(-0.0499),
            SentimentLabel::Neutral
        );
        assert_eq!(SentimentLabel::from_compound(1.0), SentimentLabel::Happy);
        assert_eq!(SentimentLabel::from_compound(-1.0), SentimentLabel::Sad);
        // The mapper is total, not clamped to [-1, 1]
        assert_eq!(SentimentLabel::from_compound(3.7), SentimentLabel::Happy);
        assert_eq!(SentimentLabel::from_compound(-3.7), SentimentLabel::Sad);
    }

    #[test]
    fn decorations_follow_label() {
        assert_eq!(SentimentLabel::Happy.emoji(), "😄");
        assert_eq!(SentimentLabel::Sad.emoji(), "😔");
        assert_eq!(SentimentLabel::Neutral.emoji(), "😐");
        assert!(SentimentLabel::Happy.image_url().contains("depositphotos"));
        assert!(SentimentLabel::Sad.image_url().contains("ecopetit"));
        assert!(SentimentLabel::Neutral.image_url().contains("pixelsquid"));
    }

    #[test]
    fn split_trims_and_drops_empty_segments() {
        assert_eq!(
            split_segments("I love this. I hate that."),
            vec!["I love this", "I hate that"]
        );
        assert_eq!(split_segments("  one .  . two. "), vec!["one", "two"]);
        assert_eq!(split_segments("no delimiter"), vec!["no delimiter"]);
        assert!(split_segments("...").is_empty());
        assert!(split_segments(" . . ").is_empty());
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn mean_compound_is_arithmetic_mean_of_segments() {
        let analyzer = SentimentAnalyzer::new();
        let first = analyzer.score("I love this").compound;
        let second = analyzer.score("I hate that").compound;

        let analysis = analyzer
            .analyze_review("I love this. I hate that.")
            .expect("two segments");
        assert_eq!(analysis.segment_count, 2);
        assert!((analysis.mean_compound - (first + second) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_submissions_yield_no_analysis() {
        let analyzer = SentimentAnalyzer::new();
        assert!(analyzer.analyze_review("").is_none());
        assert!(analyzer.analyze_review("...").is_none());
        assert!(analyzer.analyze_review(" .  . ").is_none());
    }

    #[test]
    fn scoring_is_deterministic() {
        let analyzer = SentimentAnalyzer::new();
        let once = analyzer.analyze_review("What a wonderful day.").unwrap();
        let twice = analyzer.analyze_review("What a wonderful day.").unwrap();
        assert_eq!(once.label, twice.label);
        assert_eq!(once.mean_compound, twice.mean_compound);
    }

    #[test]
    fn polar_reviews_map_to_expected_labels() {
        let analyzer = SentimentAnalyzer::new();
        let happy = analyzer.analyze_review("I love this product.").unwrap();
        assert_eq!(happy.label, SentimentLabel::Happy);

        let sad = analyzer.analyze_review("This was a terrible mistake.").unwrap();
        assert_eq!(sad.label, SentimentLabel::Sad);
    }
}
