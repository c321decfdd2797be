//! Fairness classification of two offer totals

use crate::config::{ClassifierConfig, DifferenceSign, FairBand};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Discrete fairness label, from your point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictLabel {
    HugeLoss,
    Loss,
    Fair,
    Win,
    HugeWin,
    Neutral,
}

impl VerdictLabel {
    /// Label the counterparty would see for the same trade
    pub fn mirror(self) -> Self {
        match self {
            VerdictLabel::HugeLoss => VerdictLabel::HugeWin,
            VerdictLabel::Loss => VerdictLabel::Win,
            VerdictLabel::Fair => VerdictLabel::Fair,
            VerdictLabel::Win => VerdictLabel::Loss,
            VerdictLabel::HugeWin => VerdictLabel::HugeLoss,
            VerdictLabel::Neutral => VerdictLabel::Neutral,
        }
    }

    pub fn is_favorable(self) -> bool {
        matches!(self, VerdictLabel::Win | VerdictLabel::HugeWin)
    }

    pub fn is_unfavorable(self) -> bool {
        matches!(self, VerdictLabel::Loss | VerdictLabel::HugeLoss)
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerdictLabel::HugeLoss => "HUGE LOSS",
            VerdictLabel::Loss => "LOSS",
            VerdictLabel::Fair => "FAIR",
            VerdictLabel::Win => "WIN",
            VerdictLabel::HugeWin => "HUGE WIN",
            VerdictLabel::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

/// Outcome of comparing your total against theirs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub label: VerdictLabel,

    /// `their_total - your_total`; positive favors you
    pub difference: i64,

    /// `|difference|` as a share of both totals combined, 0..=100
    pub percentage: f64,

    /// Your total as a share of both totals, 50 when both are zero
    pub your_share: f64,

    /// `100 - your_share`
    pub their_share: f64,
}

/// Stateless classifier over a fixed threshold configuration
#[derive(Debug, Clone, Default)]
pub struct FairnessClassifier {
    config: ClassifierConfig,
}

impl FairnessClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a trade where you give `your_total` and receive `their_total`
    pub fn classify(&self, your_total: u64, their_total: u64) -> Verdict {
        let verdict = classify(your_total, their_total, &self.config);
        debug!(
            "Classified {} vs {}: {} (difference {}, {:.2}%)",
            your_total, their_total, verdict.label, verdict.difference, verdict.percentage
        );
        verdict
    }
}

/// Classify a trade where you give `your_total` and receive `their_total`
pub fn classify(your_total: u64, their_total: u64, config: &ClassifierConfig) -> Verdict {
    if your_total == 0 && their_total == 0 {
        return Verdict {
            label: VerdictLabel::Neutral,
            difference: 0,
            percentage: 0.0,
            your_share: 50.0,
            their_share: 50.0,
        };
    }

    let signed = their_total as i128 - your_total as i128;
    let magnitude = signed.unsigned_abs();
    let combined = your_total as f64 + their_total as f64;

    let unfavorable = match config.sign {
        DifferenceSign::TheirsMinusYours => signed < 0,
        DifferenceSign::YoursMinusTheirs => signed > 0,
    };

    let model = &config.model;
    let fair = model.within_fair(magnitude, your_total, their_total);
    let label = if unfavorable {
        if fair && config.fair_band == FairBand::Symmetric {
            VerdictLabel::Fair
        } else if model.within_loss(magnitude, your_total, their_total) {
            VerdictLabel::Loss
        } else {
            VerdictLabel::HugeLoss
        }
    } else if fair {
        VerdictLabel::Fair
    } else if model.within_win(magnitude, your_total, their_total) {
        VerdictLabel::Win
    } else {
        VerdictLabel::HugeWin
    };

    let percentage = (magnitude as f64 / combined * 100.0).clamp(0.0, 100.0);
    let your_share = (your_total as f64 / combined * 100.0).clamp(0.0, 100.0);

    Verdict {
        label,
        difference: saturate_i64(signed),
        percentage,
        your_share,
        their_share: 100.0 - your_share,
    }
}

fn saturate_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
