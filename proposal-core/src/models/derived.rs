use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    JobSite, LineItemInput, PreviousInputs, Product, ProposalInputs, RoofType, TierValues,
};

/// A resolved material line with its extended total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub units: Decimal,
    pub price: Decimal,
    /// Whole-number units times whole-number price.
    pub total: Decimal,
}

impl LineItem {
    fn as_input(&self) -> LineItemInput {
        LineItemInput::new(Some(self.units), Some(self.price))
    }
}

/// Output of one recalculation: every editable field after override
/// resolution, plus all computed prices, costs and profit figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub site: JobSite,
    pub roof_type: RoofType,
    pub product: Option<Product>,
    pub warranty_included: bool,
    pub submitted_by: String,
    pub squares: Decimal,
    pub proposal_note: String,
    pub proposal_language: String,

    pub labor_days: Decimal,
    pub price_per_square: TierValues<Decimal>,
    pub total_price: TierValues<Decimal>,

    /// Coverage factors after any adjusted-coverage delta.
    pub coverage: TierValues<Decimal>,
    pub adjusted_coverage: Decimal,
    /// Silicone quantities per tier; `silicone.units` equals `silicone_units.ten`.
    pub silicone_units: TierValues<Decimal>,

    pub silicone: LineItem,
    pub patch: LineItem,
    pub bleed_trap: LineItem,
    pub flashing: LineItem,
    pub bleed_block: LineItem,
    pub drainage_mat: LineItem,
    pub foam: LineItem,

    pub rfc_labor_price: Decimal,
    pub rfc_labor_total: Decimal,
    pub base_labor_price: Decimal,
    pub base_labor_total: Decimal,

    pub scarifying_total: Decimal,
    pub travel_total: Decimal,
    pub misc_total: Decimal,

    pub warranty_cost: TierValues<Decimal>,
    pub office_fee_pct: Decimal,
    pub office_fee_total: Decimal,
    pub commission_pct: Decimal,
    pub commission_amount: Decimal,

    pub total_cost: Decimal,
    pub profit_share: Decimal,
    pub profit: Decimal,
    /// Profit as a fraction of the 10-year total, two decimal places.
    pub profit_pct: Decimal,
    pub daily_profit: Decimal,
}

impl DerivedRecord {
    /// Snapshot to echo back with the next revision.
    pub fn previous(&self) -> PreviousInputs {
        PreviousInputs {
            squares: self.squares,
            roof_type: self.roof_type.clone(),
            product: self.product,
            submitted_by: self.submitted_by.clone(),
            adjusted_coverage: self.adjusted_coverage,
            silicone_units_10: Some(self.silicone.units),
        }
    }

    /// Current inputs for the next revision when the user edits nothing.
    pub fn to_inputs(&self) -> ProposalInputs {
        ProposalInputs {
            site: self.site.clone(),
            roof_type: self.roof_type.clone(),
            product: self.product,
            warranty_included: self.warranty_included,
            submitted_by: self.submitted_by.clone(),
            squares: self.squares,
            labor_days: Some(self.labor_days),
            price_per_square_10: Some(self.price_per_square.ten),
            adjusted_coverage: Some(self.adjusted_coverage),
            office_fee_pct: Some(self.office_fee_pct),
            silicone: self.silicone.as_input(),
            patch: self.patch.as_input(),
            bleed_trap: self.bleed_trap.as_input(),
            flashing: self.flashing.as_input(),
            bleed_block: self.bleed_block.as_input(),
            drainage_mat: self.drainage_mat.as_input(),
            foam: self.foam.as_input(),
            rfc_labor_price: Some(self.rfc_labor_price),
            base_labor_price: Some(self.base_labor_price),
            scarifying_total: self.scarifying_total,
            travel_total: self.travel_total,
            misc_total: self.misc_total,
            proposal_note: self.proposal_note.clone(),
            proposal_language: self.proposal_language.clone(),
        }
    }
}
