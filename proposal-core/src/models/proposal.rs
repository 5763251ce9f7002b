use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Product, RoofType};

/// Customer and project address printed on the proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSite {
    pub customer_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Caller-supplied quantity and unit price for one material line.
///
/// `None` stands for a blank or unparseable entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub units: Option<Decimal>,
    pub price: Option<Decimal>,
}

impl LineItemInput {
    pub fn new(
        units: Option<Decimal>,
        price: Option<Decimal>,
    ) -> Self {
        Self { units, price }
    }
}

/// One revision of a proposal as submitted by the caller.
///
/// Optional fields distinguish "left blank" from an explicit value; the
/// engine recomputes blank or zero entries from their business rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInputs {
    pub site: JobSite,
    pub roof_type: RoofType,
    pub product: Option<Product>,
    pub warranty_included: bool,
    pub submitted_by: String,

    /// Roof area in squares (100 sq ft each).
    pub squares: Decimal,

    pub labor_days: Option<Decimal>,
    pub price_per_square_10: Option<Decimal>,
    /// Additive delta applied to all three coverage factors.
    pub adjusted_coverage: Option<Decimal>,
    /// Office fee as a fraction (0.03 = 3%).
    pub office_fee_pct: Option<Decimal>,

    /// Silicone coating; `units` is the 10-year quantity.
    pub silicone: LineItemInput,
    pub patch: LineItemInput,
    pub bleed_trap: LineItemInput,
    pub flashing: LineItemInput,
    pub bleed_block: LineItemInput,
    pub drainage_mat: LineItemInput,
    pub foam: LineItemInput,

    pub rfc_labor_price: Option<Decimal>,
    /// Crew cost per labor day.
    pub base_labor_price: Option<Decimal>,

    pub scarifying_total: Decimal,
    pub travel_total: Decimal,
    pub misc_total: Decimal,

    pub proposal_note: String,
    pub proposal_language: String,
}

impl Default for ProposalInputs {
    /// The blank template a new proposal starts from.
    fn default() -> Self {
        Self {
            site: JobSite::default(),
            roof_type: RoofType::default(),
            product: Some(Product::Uniflex),
            warranty_included: true,
            submitted_by: String::new(),
            squares: Decimal::ZERO,
            labor_days: None,
            price_per_square_10: None,
            adjusted_coverage: None,
            office_fee_pct: None,
            silicone: LineItemInput::default(),
            patch: LineItemInput::default(),
            bleed_trap: LineItemInput::default(),
            flashing: LineItemInput::default(),
            bleed_block: LineItemInput::default(),
            drainage_mat: LineItemInput::default(),
            foam: LineItemInput::default(),
            rfc_labor_price: None,
            base_labor_price: None,
            scarifying_total: Decimal::ZERO,
            travel_total: Decimal::ZERO,
            misc_total: Decimal::ZERO,
            proposal_note: String::new(),
            proposal_language: String::new(),
        }
    }
}

/// The fields of the prior revision that drive change detection.
///
/// Callers echo these back on every submission; nothing is remembered between
/// engine calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousInputs {
    pub squares: Decimal,
    pub roof_type: RoofType,
    pub product: Option<Product>,
    pub submitted_by: String,
    pub adjusted_coverage: Decimal,
    pub silicone_units_10: Option<Decimal>,
}

impl PreviousInputs {
    /// A snapshot identical to `inputs`, so no field counts as changed.
    ///
    /// Used right after importing an existing spreadsheet.
    pub fn unchanged_from(inputs: &ProposalInputs) -> Self {
        Self {
            squares: inputs.squares,
            roof_type: inputs.roof_type.clone(),
            product: inputs.product,
            submitted_by: inputs.submitted_by.clone(),
            adjusted_coverage: inputs.adjusted_coverage.unwrap_or(Decimal::ZERO),
            silicone_units_10: inputs.silicone.units,
        }
    }
}

impl Default for PreviousInputs {
    /// Matches the blank template's hidden fields.
    fn default() -> Self {
        Self {
            squares: Decimal::ZERO,
            roof_type: RoofType::default(),
            product: Some(Product::Uniflex),
            submitted_by: String::new(),
            adjusted_coverage: Decimal::ZERO,
            silicone_units_10: None,
        }
    }
}
