//! Tier selling prices, warranty costs and the fees charged on the 10-year
//! total.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::catalog::base_square_prices;
use crate::calculations::common::{is_blank, round_whole, saturating_sum};
use crate::calculations::rate_card::RateCard;
use crate::calculations::resolve::{Changes, resolve_field};
use crate::models::{Product, ProposalInputs, TierValues};

/// Per-square selling price for each tier.
///
/// A roof-type change resets all three tiers to the catalog. Otherwise the
/// 10-year price may be overridden, and the 15- and 20-year prices keep their
/// catalog spread above it.
pub fn square_prices(
    inputs: &ProposalInputs,
    changes: &Changes,
) -> TierValues<Decimal> {
    let base = base_square_prices(&inputs.roof_type);
    if changes.roof_type {
        debug!(roof = %inputs.roof_type, "roof type changed; using catalog prices");
        return base;
    }

    let ten = resolve_field(inputs.price_per_square_10, false, || base.ten);
    let delta = ten.saturating_sub(base.ten);
    TierValues::new(
        ten,
        base.fifteen.saturating_add(delta),
        base.twenty.saturating_add(delta),
    )
}

/// Warranty registration cost per tier; zero when the warranty is declined.
pub fn warranty_costs(
    rates: &RateCard,
    inputs: &ProposalInputs,
) -> TierValues<Decimal> {
    if !inputs.warranty_included {
        return TierValues::splat(Decimal::ZERO);
    }

    let w = &rates.warranty;
    match inputs.product {
        Some(Product::Uniflex) => w.uniflex_flat,
        Some(Product::Gaco) if inputs.squares < w.gaco_minimum_squares => w.gaco_minimum,
        Some(Product::Gaco) => w.gaco_per_square.map(|rate| rate.saturating_mul(inputs.squares)),
        None => TierValues::splat(Decimal::ZERO),
    }
}

/// Office fee percentage, reset to the salesperson's default when the
/// submitter changes or the entry is blank.
pub fn office_fee_pct(
    rates: &RateCard,
    inputs: &ProposalInputs,
    changes: &Changes,
) -> Decimal {
    let default = rates.office_fee_pct_for(&inputs.submitted_by);
    if changes.submitted_by || is_blank(inputs.office_fee_pct) {
        return default;
    }
    inputs.office_fee_pct.unwrap_or(default)
}

/// Commission is never overridden.
pub fn commission_pct(
    rates: &RateCard,
    inputs: &ProposalInputs,
) -> Decimal {
    rates.commission_pct_for(&inputs.submitted_by)
}

/// Squares times the tier price, plus warranty, travel and misc.
pub fn total_prices(
    inputs: &ProposalInputs,
    price_per_square: &TierValues<Decimal>,
    warranty: &TierValues<Decimal>,
) -> TierValues<Decimal> {
    let tier_total = |price: Decimal, warranty: Decimal| {
        saturating_sum([
            inputs.squares.saturating_mul(price),
            warranty,
            inputs.travel_total,
            inputs.misc_total,
        ])
    };
    TierValues::new(
        tier_total(price_per_square.ten, warranty.ten),
        tier_total(price_per_square.fifteen, warranty.fifteen),
        tier_total(price_per_square.twenty, warranty.twenty),
    )
}

/// Share of `total` at `pct`, rounded to whole dollars.
pub fn fee_on(
    total: Decimal,
    pct: Decimal,
) -> Decimal {
    round_whole(total.saturating_mul(pct))
}
