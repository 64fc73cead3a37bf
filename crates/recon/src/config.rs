use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer};

use crate::error::ReconError;
use crate::model::decimal_from_f64;

/// The filer's own company. Never a counterparty on either side of a comparison.
pub const DEFAULT_SELF_COMPANY: &str = "Example Company Oy";

/// Largest absolute-amount difference still treated as the same payment.
pub const DEFAULT_AMOUNT_TOLERANCE: Decimal = dec!(0.01);

/// Pairs whose nearest dates are further apart than this are unrelated.
pub const DEFAULT_DATE_WINDOW_DAYS: u32 = 30;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_self_company")]
    pub self_company: String,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            self_company: default_self_company(),
            tolerance: ToleranceConfig::default(),
        }
    }
}

fn default_name() -> String {
    "default".into()
}

fn default_self_company() -> String {
    DEFAULT_SELF_COMPANY.into()
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    #[serde(default = "default_amount", deserialize_with = "de_tolerance_amount")]
    pub amount: Decimal,
    #[serde(default = "default_date_window_days")]
    pub date_window_days: u32,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT_TOLERANCE,
            date_window_days: DEFAULT_DATE_WINDOW_DAYS,
        }
    }
}

fn default_amount() -> Decimal {
    DEFAULT_AMOUNT_TOLERANCE
}

/// `amount = 0.01`, `amount = 1` and `amount = "0.01"` are all accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

fn de_tolerance_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let parsed = match RawAmount::deserialize(d)? {
        RawAmount::Int(n) => Some(Decimal::from(n)),
        RawAmount::Float(n) => decimal_from_f64(n),
        RawAmount::Text(s) => s.trim().parse().ok(),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("tolerance.amount must be a decimal number"))
}

fn default_date_window_days() -> u32 {
    DEFAULT_DATE_WINDOW_DAYS
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.tolerance.amount < Decimal::ZERO {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.amount must not be negative, got {}",
                self.tolerance.amount
            )));
        }

        if self.self_company.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "self_company must not be blank".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
