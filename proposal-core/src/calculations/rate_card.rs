//! Prices, percentages and salesperson rules that feed the engine.
//!
//! [`RateCard::default`] carries the company's current price list. A rate
//! card can also be deserialized from configuration; any key it omits keeps
//! its default.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Product, TierValues};

/// Errors raised while validating a [`RateCard`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateCardError {
    /// A percentage must be a fraction in `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    PercentageOutOfRange { name: &'static str, value: Decimal },

    /// Prices, rates and thresholds cannot be negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },
}

/// Warranty registration costs charged per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarrantyRates {
    /// Flat Uniflex fee, independent of roof size.
    pub uniflex_flat: TierValues<Decimal>,

    /// Below this many squares the Gaco minimum fee applies.
    pub gaco_minimum_squares: Decimal,

    /// Gaco fee for small roofs.
    pub gaco_minimum: TierValues<Decimal>,

    /// Gaco fee per square at or above the threshold.
    pub gaco_per_square: TierValues<Decimal>,
}

impl Default for WarrantyRates {
    fn default() -> Self {
        Self {
            uniflex_flat: TierValues::splat(Decimal::from(500)),
            gaco_minimum_squares: Decimal::from(75),
            gaco_minimum: TierValues::new(
                Decimal::from(750),
                Decimal::from(1125),
                Decimal::from(1500),
            ),
            gaco_per_square: TierValues::new(
                Decimal::from(10),
                Decimal::from(15),
                Decimal::from(20),
            ),
        }
    }
}

/// Base prices and policy percentages used when a field is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateCard {
    /// Crew cost per labor day.
    pub base_labor_rate: Decimal,
    pub gaco_silicone_price: Decimal,
    pub uniflex_silicone_price: Decimal,
    pub patch_price: Decimal,
    pub bleed_trap_price: Decimal,
    pub flashing_price: Decimal,
    pub bleed_block_price: Decimal,
    pub drainage_mat_price: Decimal,
    pub gaco_foam_price: Decimal,
    pub uniflex_foam_price: Decimal,
    /// Rock/Foam/Coat labor charged per square.
    pub rfc_labor_rate: Decimal,

    pub base_office_fee_pct: Decimal,
    pub elevated_office_fee_pct: Decimal,
    /// Salespeople whose proposals carry the elevated office fee.
    pub elevated_office_fee_salespeople: Vec<String>,

    pub commission_pct: Decimal,
    /// Salespeople paid commission; everyone else earns zero.
    pub commissioned_salespeople: Vec<String>,

    /// Share of pre-share profit set aside before reporting profit.
    pub profit_share_pct: Decimal,

    pub warranty: WarrantyRates,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            base_labor_rate: Decimal::from(3250),
            gaco_silicone_price: Decimal::from(210),
            uniflex_silicone_price: Decimal::from(240),
            patch_price: Decimal::from(125),
            bleed_trap_price: Decimal::from(168),
            flashing_price: Decimal::from(162),
            bleed_block_price: Decimal::from(100),
            drainage_mat_price: Decimal::from(150),
            gaco_foam_price: Decimal::from(2430),
            uniflex_foam_price: Decimal::from(2490),
            rfc_labor_rate: Decimal::from(250),
            base_office_fee_pct: Decimal::new(3, 2),
            elevated_office_fee_pct: Decimal::new(5, 2),
            elevated_office_fee_salespeople: vec!["David Estes".to_string()],
            commission_pct: Decimal::new(10, 2),
            commissioned_salespeople: vec!["David Estes".to_string(), "Vern Abbott".to_string()],
            profit_share_pct: Decimal::new(10, 2),
            warranty: WarrantyRates::default(),
        }
    }
}

impl RateCard {
    /// Validates every price and percentage.
    ///
    /// # Errors
    ///
    /// Returns [`RateCardError`] for the first percentage outside `[0, 1]` or
    /// the first negative amount encountered.
    pub fn validate(&self) -> Result<(), RateCardError> {
        for (name, value) in [
            ("base_office_fee_pct", self.base_office_fee_pct),
            ("elevated_office_fee_pct", self.elevated_office_fee_pct),
            ("commission_pct", self.commission_pct),
            ("profit_share_pct", self.profit_share_pct),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RateCardError::PercentageOutOfRange { name, value });
            }
        }

        let w = &self.warranty;
        for (name, value) in [
            ("base_labor_rate", self.base_labor_rate),
            ("gaco_silicone_price", self.gaco_silicone_price),
            ("uniflex_silicone_price", self.uniflex_silicone_price),
            ("patch_price", self.patch_price),
            ("bleed_trap_price", self.bleed_trap_price),
            ("flashing_price", self.flashing_price),
            ("bleed_block_price", self.bleed_block_price),
            ("drainage_mat_price", self.drainage_mat_price),
            ("gaco_foam_price", self.gaco_foam_price),
            ("uniflex_foam_price", self.uniflex_foam_price),
            ("rfc_labor_rate", self.rfc_labor_rate),
            ("warranty.gaco_minimum_squares", w.gaco_minimum_squares),
        ] {
            if value < Decimal::ZERO {
                return Err(RateCardError::NegativeAmount { name, value });
            }
        }

        for (name, tiers) in [
            ("warranty.uniflex_flat", &w.uniflex_flat),
            ("warranty.gaco_minimum", &w.gaco_minimum),
            ("warranty.gaco_per_square", &w.gaco_per_square),
        ] {
            for value in [tiers.ten, tiers.fifteen, tiers.twenty] {
                if value < Decimal::ZERO {
                    return Err(RateCardError::NegativeAmount { name, value });
                }
            }
        }

        Ok(())
    }

    /// Base silicone price, or `None` for an unrecognised product.
    pub fn silicone_price(
        &self,
        product: Option<Product>,
    ) -> Option<Decimal> {
        match product? {
            Product::Gaco => Some(self.gaco_silicone_price),
            Product::Uniflex => Some(self.uniflex_silicone_price),
        }
    }

    pub fn foam_price(
        &self,
        product: Option<Product>,
    ) -> Decimal {
        match product {
            Some(Product::Gaco) => self.gaco_foam_price,
            Some(Product::Uniflex) => self.uniflex_foam_price,
            None => Decimal::ZERO,
        }
    }

    /// Default office fee for a salesperson.
    pub fn office_fee_pct_for(
        &self,
        salesperson: &str,
    ) -> Decimal {
        if contains_name(&self.elevated_office_fee_salespeople, salesperson) {
            self.elevated_office_fee_pct
        } else {
            self.base_office_fee_pct
        }
    }

    pub fn commission_pct_for(
        &self,
        salesperson: &str,
    ) -> Decimal {
        if contains_name(&self.commissioned_salespeople, salesperson) {
            self.commission_pct
        } else {
            Decimal::ZERO
        }
    }
}

fn contains_name(
    names: &[String],
    salesperson: &str,
) -> bool {
    let salesperson = salesperson.trim();
    !salesperson.is_empty() && names.iter().any(|n| n.trim() == salesperson)
}
