//! Confusion counts and derived scores.

use std::collections::BTreeMap;
use std::fmt;

/// Per-label confusion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl LabelCounts {
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        harmonic_mean(self.precision(), self.recall())
    }

    /// Number of gold instances with this label.
    pub fn support(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    fn merge(&mut self, other: &LabelCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

/// Accumulated gold/predicted comparisons.
///
/// Evaluations from several folds combine by adding their counts, so the
/// scores of a merged evaluation are computed over all folds at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    counts: BTreeMap<String, LabelCounts>,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction against its gold label.
    pub fn add(&mut self, gold: &str, predicted: &str) {
        if gold == predicted {
            self.entry(gold).true_positives += 1;
        } else {
            self.entry(predicted).false_positives += 1;
            self.entry(gold).false_negatives += 1;
        }
    }

    fn entry(&mut self, label: &str) -> &mut LabelCounts {
        self.counts.entry(label.to_string()).or_default()
    }

    /// Add every count of `other` into this evaluation.
    pub fn merge(&mut self, other: &Evaluation) {
        for (label, counts) in &other.counts {
            self.entry(label).merge(counts);
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn counts(&self, label: &str) -> Option<&LabelCounts> {
        self.counts.get(label)
    }

    /// Number of recorded predictions.
    pub fn total(&self) -> usize {
        self.counts.values().map(LabelCounts::support).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn summed(&self) -> LabelCounts {
        let mut sum = LabelCounts::default();
        for counts in self.counts.values() {
            sum.merge(counts);
        }
        sum
    }

    /// Micro-averaged precision.
    pub fn precision(&self) -> f64 {
        self.summed().precision()
    }

    /// Micro-averaged recall.
    pub fn recall(&self) -> f64 {
        self.summed().recall()
    }

    /// Micro-averaged F1; the fitness value.
    pub fn f1(&self) -> f64 {
        self.summed().f1()
    }

    pub fn macro_precision(&self) -> f64 {
        self.macro_average(LabelCounts::precision)
    }

    pub fn macro_recall(&self) -> f64 {
        self.macro_average(LabelCounts::recall)
    }

    pub fn macro_f1(&self) -> f64 {
        self.macro_average(LabelCounts::f1)
    }

    fn macro_average(&self, score: fn(&LabelCounts) -> f64) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        self.counts.values().map(score).sum::<f64>() / self.counts.len() as f64
    }
}

impl FromIterator<Evaluation> for Evaluation {
    fn from_iter<T: IntoIterator<Item = Evaluation>>(iter: T) -> Self {
        let mut combined = Evaluation::new();
        for evaluation in iter {
            combined.merge(&evaluation);
        }
        combined
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels().map(str::len).chain([5]).max().unwrap_or(5);
        writeln!(
            f,
            "{:<width$} {:>9} {:>9} {:>9} {:>7}",
            "label", "precision", "recall", "f1", "support"
        )?;
        let mut row = |name: &str, p: f64, r: f64, f1: f64, support: usize| {
            writeln!(f, "{:<width$} {:>9.4} {:>9.4} {:>9.4} {:>7}", name, p, r, f1, support)
        };
        for (label, counts) in &self.counts {
            row(label, counts.precision(), counts.recall(), counts.f1(), counts.support())?;
        }
        let total = self.total();
        row("micro", self.precision(), self.recall(), self.f1(), total)?;
        write!(
            f,
            "{:<width$} {:>9.4} {:>9.4} {:>9.4} {:>7}",
            "macro",
            self.macro_precision(),
            self.macro_recall(),
            self.macro_f1(),
            total
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a + b == 0.0 {
        0.0
    } else {
        2.0 * a * b / (a + b)
    }
}
