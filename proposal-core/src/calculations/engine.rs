use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculations::aggregation::{CostBreakdown, ProfitSummary, materials_total};
use crate::calculations::line_items::LineItemResolver;
use crate::calculations::pricing::{
    commission_pct, fee_on, office_fee_pct, square_prices, total_prices, warranty_costs,
};
use crate::calculations::rate_card::{RateCard, RateCardError};
use crate::calculations::resolve::Changes;
use crate::models::{DerivedRecord, PreviousInputs, ProposalInputs};

/// Recalculates a proposal revision against a validated [`RateCard`].
///
/// The engine keeps no state between calls; the caller supplies the previous
/// snapshot each time, usually from [`DerivedRecord::previous`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::{PreviousInputs, Product, ProposalEngine, ProposalInputs, RoofType};
///
/// let engine = ProposalEngine::default();
/// let inputs = ProposalInputs {
///     roof_type: RoofType::ModBit,
///     product: Some(Product::Gaco),
///     squares: dec!(47),
///     ..ProposalInputs::default()
/// };
///
/// let record = engine.recalculate(&inputs, &PreviousInputs::default());
///
/// assert_eq!(record.patch.units, dec!(5));
/// assert_eq!(record.bleed_trap.units, dec!(10));
/// assert_eq!(record.price_per_square.ten, dec!(340));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProposalEngine {
    rates: RateCard,
}

impl ProposalEngine {
    /// Creates an engine after validating `rates`.
    ///
    /// # Errors
    ///
    /// Returns [`RateCardError`] if any percentage is outside `[0, 1]` or any
    /// price is negative.
    pub fn new(rates: RateCard) -> Result<Self, RateCardError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Runs the full pipeline for one revision.
    ///
    /// Never fails: blank entries are recomputed, unknown roof types and
    /// products price at zero, and divisions by zero yield zero.
    pub fn recalculate(
        &self,
        inputs: &ProposalInputs,
        previous: &PreviousInputs,
    ) -> DerivedRecord {
        self.warn_on_unpriced(inputs);

        let rates = &self.rates;
        let changes = Changes::detect(inputs, previous);
        let items = LineItemResolver::new(rates, inputs, previous, &changes);

        // Labor days
        let labor_days = items.labor_days();

        // Per-square prices
        let price_per_square = square_prices(inputs, &changes);

        // Silicone
        let silicone = items.silicone();

        // Single items
        let patch = items.patch();
        let bleed_trap = items.bleed_trap();
        let flashing = items.flashing();
        let bleed_block = items.bleed_block();
        let drainage_mat = items.drainage_mat();
        let foam = items.foam();

        // Labor
        let rfc_labor_price = items.rfc_labor_price();
        let rfc_labor_total = rfc_labor_price.saturating_mul(inputs.squares);
        let base_labor_price = items.base_labor_price();
        let base_labor_total = base_labor_price.saturating_mul(labor_days);

        // Warranty and tier totals
        let warranty_cost = warranty_costs(rates, inputs);
        let total_price = total_prices(inputs, &price_per_square, &warranty_cost);

        // Office fee and commission, both on the 10-year total
        let office_fee_pct = office_fee_pct(rates, inputs, &changes);
        let office_fee_total = fee_on(total_price.ten, office_fee_pct);
        let commission_pct = commission_pct(rates, inputs);
        let commission_amount = fee_on(total_price.ten, commission_pct);

        // Aggregation
        let costs = CostBreakdown {
            materials_total: materials_total([
                &silicone.item,
                &patch,
                &bleed_trap,
                &flashing,
                &bleed_block,
                &drainage_mat,
                &foam,
            ]),
            rfc_labor_total,
            base_labor_total,
            scarifying_total: inputs.scarifying_total,
            travel_total: inputs.travel_total,
            misc_total: inputs.misc_total,
            warranty_cost_10: warranty_cost.ten,
            office_fee_total,
            commission_amount,
        };
        let summary = ProfitSummary::compute(
            &costs,
            total_price.ten,
            labor_days,
            rates.profit_share_pct,
        );

        if [total_price.ten, summary.total_cost].contains(&Decimal::MAX) {
            warn!(
                customer = %inputs.site.customer_name,
                "figures exceed the representable range; totals are saturated"
            );
        }

        debug!(
            total_price_10 = %total_price.ten,
            total_cost = %summary.total_cost,
            profit = %summary.profit,
            "recalculated proposal"
        );

        DerivedRecord {
            site: inputs.site.clone(),
            roof_type: inputs.roof_type.clone(),
            product: inputs.product,
            warranty_included: inputs.warranty_included,
            submitted_by: inputs.submitted_by.clone(),
            squares: inputs.squares,
            proposal_note: inputs.proposal_note.clone(),
            proposal_language: inputs.proposal_language.clone(),
            labor_days,
            price_per_square,
            total_price,
            coverage: silicone.coverage,
            adjusted_coverage: silicone.adjusted_coverage,
            silicone_units: silicone.units,
            silicone: silicone.item,
            patch,
            bleed_trap,
            flashing,
            bleed_block,
            drainage_mat,
            foam,
            rfc_labor_price,
            rfc_labor_total,
            base_labor_price,
            base_labor_total,
            scarifying_total: inputs.scarifying_total,
            travel_total: inputs.travel_total,
            misc_total: inputs.misc_total,
            warranty_cost,
            office_fee_pct,
            office_fee_total,
            commission_pct,
            commission_amount,
            total_cost: summary.total_cost,
            profit_share: summary.profit_share,
            profit: summary.profit,
            profit_pct: summary.profit_pct,
            daily_profit: summary.daily_profit,
        }
    }

    /// Recalculates an imported proposal that has no earlier revision.
    ///
    /// Previous equals current, so every non-blank entry is kept and only
    /// blanks are filled in.
    pub fn recalculate_imported(
        &self,
        inputs: &ProposalInputs,
    ) -> DerivedRecord {
        info!(customer = %inputs.site.customer_name, "recalculating imported proposal");
        self.recalculate(inputs, &PreviousInputs::unchanged_from(inputs))
    }

    fn warn_on_unpriced(
        &self,
        inputs: &ProposalInputs,
    ) {
        let roof = &inputs.roof_type;
        if !roof.is_known() && !roof.as_str().trim().is_empty() {
            warn!(roof_type = %roof, "unrecognised roof type; catalog values are zero");
        }
        if inputs.product.is_none() {
            warn!("no recognised product; product-specific prices are zero");
        }
        if inputs.squares < Decimal::ZERO {
            warn!(squares = %inputs.squares, "negative roof area");
        }
    }
}
