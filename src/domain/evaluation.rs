use crate::domain::prediction::LoanDecision;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation of a classifier: accuracy plus per-class
/// precision/recall/F1 and their macro and support-weighted averages.
///
/// Undefined ratios (no predictions or no samples of a class) count as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub samples: usize,
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_predictions(actual: &[LoanDecision], predicted: &[LoanDecision]) -> Self {
        let n = actual.len().min(predicted.len());
        let pairs: Vec<(LoanDecision, LoanDecision)> = actual[..n]
            .iter()
            .copied()
            .zip(predicted[..n].iter().copied())
            .collect();

        let correct = pairs.iter().filter(|(a, p)| a == p).count();
        let accuracy = ratio(correct, n);

        let classes: Vec<ClassMetrics> = LoanDecision::ALL
            .iter()
            .map(|class| {
                let tp = pairs.iter().filter(|(a, p)| a == class && p == class).count();
                let predicted_pos = pairs.iter().filter(|(_, p)| p == class).count();
                let support = pairs.iter().filter(|(a, _)| a == class).count();

                let precision = ratio(tp, predicted_pos);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };

                ClassMetrics {
                    label: class.to_string().to_lowercase(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let k = classes.len() as f64;
        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            support: n,
        };

        let weighted = |get: fn(&ClassMetrics) -> f64| -> f64 {
            if n == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| get(c) * c.support as f64)
                .sum::<f64>()
                / n as f64
        };
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: n,
        };

        Self {
            accuracy,
            samples: n,
            classes,
            macro_avg,
            weighted_avg,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            write_row(f, c)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.samples
        )?;
        write_row(f, &self.macro_avg)?;
        write_row(f, &self.weighted_avg)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, c: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
        c.label, c.precision, c.recall, c.f1, c.support
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::LoanDecision::{Approved as A, Rejected as R};

    #[test]
    fn test_perfect_predictions() {
        let actual = vec![A, R, A, R];
        let report = ClassificationReport::from_predictions(&actual, &actual);

        assert_eq!(report.accuracy, 1.0);
        assert!(report.classes.iter().all(|c| c.f1 == 1.0));
        assert_eq!(report.weighted_avg.support, 4);
    }

    #[test]
    fn test_mixed_predictions() {
        // approved: tp=2, predicted=3, support=3 -> p=2/3, r=2/3
        // rejected: tp=1, predicted=2, support=2 -> p=1/2, r=1/2
        let actual = vec![A, A, A, R, R];
        let predicted = vec![A, A, R, R, A];
        let report = ClassificationReport::from_predictions(&actual, &predicted);

        assert!((report.accuracy - 0.6).abs() < 1e-12);
        let approved = &report.classes[0];
        assert_eq!(approved.label, "approved");
        assert!((approved.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((approved.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(approved.support, 3);

        let rejected = &report.classes[1];
        assert!((rejected.f1 - 0.5).abs() < 1e-12);

        let expected_weighted_f1 = (approved.f1 * 3.0 + rejected.f1 * 2.0) / 5.0;
        assert!((report.weighted_avg.f1 - expected_weighted_f1).abs() < 1e-12);
    }

    #[test]
    fn test_absent_class_scores_zero() {
        let actual = vec![A, A];
        let predicted = vec![A, A];
        let report = ClassificationReport::from_predictions(&actual, &predicted);

        let rejected = &report.classes[1];
        assert_eq!(rejected.support, 0);
        assert_eq!(rejected.precision, 0.0);
        assert_eq!(rejected.f1, 0.0);
        assert_eq!(report.macro_avg.f1, 0.5);
    }

    #[test]
    fn test_display_contains_rows() {
        let report = ClassificationReport::from_predictions(&[A, R], &[A, A]);
        let text = report.to_string();
        assert!(text.contains("approved"));
        assert!(text.contains("rejected"));
        assert!(text.contains("accuracy"));
        assert!(text.contains("weighted avg"));
    }
}
