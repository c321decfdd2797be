use crate::error::{TradeError, TradeResult};
use serde::{Deserialize, Serialize};

/// Basis points in one whole (100%)
pub const BPS_SCALE: u64 = 10_000;

/// Default fair band for the relative model (±10%)
pub const DEFAULT_FAIR_BPS: u64 = 1_000;

/// Default win / huge-loss cutoff for the relative model (±25%)
pub const DEFAULT_HUGE_BPS: u64 = 2_500;

/// Configuration for the fairness classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    /// Which side of zero the FAIR band covers
    #[serde(default)]
    pub fair_band: FairBand,

    /// Which way round the difference is read when picking a label
    #[serde(default)]
    pub sign: DifferenceSign,

    /// Rule mapping a difference to a verdict
    pub model: ThresholdModel,
}

/// Extent of the FAIR band around a zero difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FairBand {
    /// Any unfavorable difference is LOSS or HUGE_LOSS; FAIR only covers `0..=fair`
    #[default]
    NonNegativeOnly,
    /// FAIR covers `-fair..=fair`, so a small loss still reads as FAIR
    Symmetric,
}

/// Orientation of the difference the labels are read from
///
/// The reported `difference` is always `their_total - your_total`; this only
/// decides which sign counts as unfavorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceSign {
    /// Receiving more than you give is favorable
    #[default]
    TheirsMinusYours,
    /// Giving more than you receive is favorable
    YoursMinusTheirs,
}

/// Rule mapping the signed difference between two totals to a verdict band
///
/// Every model has three cutoffs on the magnitude of the difference:
/// `fair` bounds the FAIR band, `win` separates WIN from HUGE_WIN and
/// `huge_loss` separates LOSS from HUGE_LOSS. All cutoffs are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdModel {
    /// Cutoffs in raw value units
    Absolute { fair: u64, win: u64, huge_loss: u64 },

    /// Cutoffs in basis points of a normalizing base
    Relative {
        normalization: Normalization,
        fair_bps: u64,
        win_bps: u64,
        huge_loss_bps: u64,
        #[serde(default)]
        zero_base: ZeroBase,
    },
}

/// Which total a relative threshold is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Sum of both totals
    Combined,
    /// The smaller of the two totals
    Smaller,
    /// Your total alone
    YourSide,
}

/// How a relative model treats a zero normalizing base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBase {
    /// Any non-zero difference lies beyond every cutoff
    #[default]
    Unbounded,
    /// The ratio is taken as zero, inside every cutoff
    ZeroRatio,
}

impl Normalization {
    /// Base value the difference is compared against
    pub fn base(self, your_total: u64, their_total: u64) -> u128 {
        match self {
            Normalization::Combined => your_total as u128 + their_total as u128,
            Normalization::Smaller => your_total.min(their_total) as u128,
            Normalization::YourSide => your_total as u128,
        }
    }
}

impl std::str::FromStr for Normalization {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(Normalization::Combined),
            "smaller" => Ok(Normalization::Smaller),
            "your_side" | "yours" => Ok(Normalization::YourSide),
            other => Err(TradeError::Config(format!("unknown normalization '{other}'"))),
        }
    }
}

impl std::str::FromStr for FairBand {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "non_negative_only" => Ok(FairBand::NonNegativeOnly),
            "symmetric" => Ok(FairBand::Symmetric),
            other => Err(TradeError::Config(format!("unknown fair band '{other}'"))),
        }
    }
}

impl std::str::FromStr for DifferenceSign {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "theirs_minus_yours" => Ok(DifferenceSign::TheirsMinusYours),
            "yours_minus_theirs" => Ok(DifferenceSign::YoursMinusTheirs),
            other => Err(TradeError::Config(format!("unknown difference sign '{other}'"))),
        }
    }
}

impl std::str::FromStr for ZeroBase {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unbounded" => Ok(ZeroBase::Unbounded),
            "zero_ratio" => Ok(ZeroBase::ZeroRatio),
            other => Err(TradeError::Config(format!("unknown zero base policy '{other}'"))),
        }
    }
}

impl Default for ThresholdModel {
    fn default() -> Self {
        ThresholdModel::Relative {
            normalization: Normalization::Smaller,
            fair_bps: DEFAULT_FAIR_BPS,
            win_bps: DEFAULT_HUGE_BPS,
            huge_loss_bps: DEFAULT_HUGE_BPS,
            zero_base: ZeroBase::Unbounded,
        }
    }
}

impl ThresholdModel {
    /// Value cutoffs of the classic calculator UI
    ///
    /// HUGE LOSS starts at a 100M loss inclusive, which for integer values is
    /// the same as LOSS ending at 99,999,999.
    pub fn legacy_absolute() -> Self {
        ThresholdModel::Absolute { fair: 50_000_000, win: 200_000_000, huge_loss: 99_999_999 }
    }

    /// Percentage-of-your-side cutoffs of the classic calculate endpoint
    pub fn legacy_relative() -> Self {
        ThresholdModel::Relative {
            normalization: Normalization::YourSide,
            fair_bps: DEFAULT_FAIR_BPS,
            win_bps: DEFAULT_HUGE_BPS,
            huge_loss_bps: DEFAULT_HUGE_BPS,
            zero_base: ZeroBase::ZeroRatio,
        }
    }

    /// Whether `magnitude` falls inside the FAIR band
    pub fn within_fair(&self, magnitude: u128, your_total: u64, their_total: u64) -> bool {
        match self {
            ThresholdModel::Absolute { fair, .. } => magnitude <= *fair as u128,
            ThresholdModel::Relative { normalization, fair_bps, zero_base, .. } => within_bps(
                magnitude,
                *fair_bps,
                normalization.base(your_total, their_total),
                *zero_base,
            ),
        }
    }

    /// Whether a favorable `magnitude` stays a plain WIN
    pub fn within_win(&self, magnitude: u128, your_total: u64, their_total: u64) -> bool {
        match self {
            ThresholdModel::Absolute { win, .. } => magnitude <= *win as u128,
            ThresholdModel::Relative { normalization, win_bps, zero_base, .. } => within_bps(
                magnitude,
                *win_bps,
                normalization.base(your_total, their_total),
                *zero_base,
            ),
        }
    }

    /// Whether an unfavorable `magnitude` stays a plain LOSS
    pub fn within_loss(&self, magnitude: u128, your_total: u64, their_total: u64) -> bool {
        match self {
            ThresholdModel::Absolute { huge_loss, .. } => magnitude <= *huge_loss as u128,
            ThresholdModel::Relative { normalization, huge_loss_bps, zero_base, .. } => {
                within_bps(
                    magnitude,
                    *huge_loss_bps,
                    normalization.base(your_total, their_total),
                    *zero_base,
                )
            }
        }
    }

    /// Cutoffs are symmetric when WIN and LOSS share the same bound
    pub fn is_symmetric(&self) -> bool {
        match self {
            ThresholdModel::Absolute { win, huge_loss, .. } => win == huge_loss,
            ThresholdModel::Relative { normalization, win_bps, huge_loss_bps, .. } => {
                win_bps == huge_loss_bps && *normalization != Normalization::YourSide
            }
        }
    }
}

/// `magnitude / base <= bps / 10_000`, in exact integer arithmetic.
fn within_bps(magnitude: u128, bps: u64, base: u128, zero_base: ZeroBase) -> bool {
    if base == 0 {
        return match zero_base {
            ZeroBase::Unbounded => magnitude == 0,
            ZeroBase::ZeroRatio => true,
        };
    }
    magnitude.saturating_mul(BPS_SCALE as u128) <= (bps as u128).saturating_mul(base)
}

impl ClassifierConfig {
    pub fn new(model: ThresholdModel) -> Self {
        Self { model, ..Self::default() }
    }

    pub fn with_fair_band(mut self, fair_band: FairBand) -> Self {
        self.fair_band = fair_band;
        self
    }

    pub fn with_sign(mut self, sign: DifferenceSign) -> Self {
        self.sign = sign;
        self
    }

    /// Labels of the classic calculator UI: any loss is LOSS or HUGE LOSS
    pub fn legacy_absolute() -> Self {
        Self::new(ThresholdModel::legacy_absolute())
    }

    /// Labels of the classic calculate endpoint
    ///
    /// That endpoint reads `your - their` against your total, with FAIR on
    /// both sides of zero and an empty side of yours counting as 0%.
    pub fn legacy_relative() -> Self {
        Self::new(ThresholdModel::legacy_relative())
            .with_fair_band(FairBand::Symmetric)
            .with_sign(DifferenceSign::YoursMinusTheirs)
    }

    /// Whether swapping the two sides always mirrors the label
    pub fn mirrors_on_swap(&self) -> bool {
        self.fair_band == FairBand::Symmetric && self.model.is_symmetric()
    }

    /// Reject cutoffs that would make the FAIR band swallow WIN or LOSS
    pub fn validate(&self) -> TradeResult<()> {
        let (fair, win, huge_loss) = match &self.model {
            ThresholdModel::Absolute { fair, win, huge_loss } => (*fair, *win, *huge_loss),
            ThresholdModel::Relative { fair_bps, win_bps, huge_loss_bps, .. } => {
                (*fair_bps, *win_bps, *huge_loss_bps)
            }
        };

        if fair > win {
            return Err(TradeError::InvalidInput(format!(
                "fair threshold {fair} exceeds win threshold {win}"
            )));
        }
        if self.fair_band == FairBand::Symmetric && fair > huge_loss {
            return Err(TradeError::InvalidInput(format!(
                "fair threshold {fair} exceeds huge loss threshold {huge_loss}"
            )));
        }
        Ok(())
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> TradeResult<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; split out so tests need not touch the process env
    pub fn with_env_overrides<F>(mut self, var: F) -> TradeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = var("TRADE_THRESHOLD_MODEL") {
            self = match kind.to_ascii_lowercase().as_str() {
                "absolute" => ClassifierConfig::legacy_absolute(),
                "relative" => ClassifierConfig::default(),
                "legacy_relative" => ClassifierConfig::legacy_relative(),
                other => {
                    return Err(TradeError::Config(format!("unknown threshold model '{other}'")))
                }
            };
        }
        if let Some(value) = var("TRADE_FAIR_BAND") {
            self.fair_band = value.parse()?;
        }
        if let Some(value) = var("TRADE_DIFFERENCE_SIGN") {
            self.sign = value.parse()?;
        }

        match &mut self.model {
            ThresholdModel::Absolute { fair, win, huge_loss } => {
                override_u64(&var, "TRADE_FAIR_VALUE", fair)?;
                override_u64(&var, "TRADE_WIN_VALUE", win)?;
                override_u64(&var, "TRADE_HUGE_LOSS_VALUE", huge_loss)?;
            }
            ThresholdModel::Relative {
                normalization,
                fair_bps,
                win_bps,
                huge_loss_bps,
                zero_base,
            } => {
                if let Some(value) = var("TRADE_NORMALIZATION") {
                    *normalization = value.parse()?;
                }
                if let Some(value) = var("TRADE_ZERO_BASE") {
                    *zero_base = value.parse()?;
                }
                override_u64(&var, "TRADE_FAIR_BPS", fair_bps)?;
                override_u64(&var, "TRADE_WIN_BPS", win_bps)?;
                override_u64(&var, "TRADE_HUGE_LOSS_BPS", huge_loss_bps)?;
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> TradeResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TradeError::Config(format!("reading {path}: {e}")))?;
        let config: ClassifierConfig =
            toml::from_str(&content).map_err(|e| TradeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &str) -> TradeResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| TradeError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| TradeError::Config(format!("writing {path}: {e}")))
    }
}

fn override_u64<F>(var: &F, key: &str, target: &mut u64) -> TradeResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = var(key) {
        *target = raw.trim().parse().map_err(|_| {
            TradeError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
        })?;
    }
    Ok(())
}
