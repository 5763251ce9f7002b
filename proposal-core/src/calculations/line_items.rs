//! Quantity and unit-price rules for each material and labor line.
//!
//! | Line         | Applies when              | Units                          | Triggers |
//! |--------------|---------------------------|--------------------------------|----------|
//! | Silicone     | always                    | squares ÷ 5 × coverage         | product, roof, squares, adjusted coverage |
//! | Patch        | Gaco                      | ⌈squares ÷ 10⌉                 | product, squares (price: product) |
//! | Bleed trap   | Gaco on Mod Bit           | ⌈squares ÷ 5⌉                  | product, roof, squares |
//! | Flashing     | Uniflex                   | ⌈squares ÷ 20⌉ or ⌈squares ÷ 10⌉ | product, roof, squares |
//! | Bleed block  | Uniflex on Mod Bit        | ⌈squares ÷ 5⌉                  | product, roof, squares, effective adjusted coverage |
//! | Drainage mat | ballasted roofs           | ⌈squares ÷ 18⌉                 | roof, squares |
//! | Foam         | Rock/Foam/Coat            | ⌈squares ÷ 25⌉                 | product, roof, squares |
//! | Labor days   | always                    | ⌈squares ÷ 30⌉ ballasted, else ⌈squares ÷ 45⌉ | roof, squares |
//!
//! Lines that do not apply resolve to zero units at a zero price.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::aggregation::priced_line;
use crate::calculations::catalog::coverage_factors;
use crate::calculations::common::{almost_equal, ceil_units, is_blank, safe_div};
use crate::calculations::rate_card::RateCard;
use crate::calculations::resolve::{Changes, Trigger, resolve_field};
use crate::models::{LineItem, LineItemInput, PreviousInputs, Product, ProposalInputs, RoofType, TierValues};

const SQUARES_PER_PATCH: i64 = 10;
const SQUARES_PER_BLEED_UNIT: i64 = 5;
const SQUARES_PER_DRAINAGE_MAT: i64 = 18;
const SQUARES_PER_FOAM_UNIT: i64 = 25;
const COVERAGE_BASIS_SQUARES: i64 = 5;
const BALLASTED_SQUARES_PER_DAY: i64 = 30;
const SQUARES_PER_DAY: i64 = 45;

/// Silicone coating resolved for all three tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiliconeLine {
    /// The 10-year quantity at the resolved price.
    pub item: LineItem,
    pub units: TierValues<Decimal>,
    /// Coverage factors actually applied.
    pub coverage: TierValues<Decimal>,
    /// Adjusted coverage carried forward; zero after a manual unit edit.
    pub adjusted_coverage: Decimal,
}

/// Resolves each line item against its triggers.
///
/// Holds only borrowed state, so building one per recalculation is free.
#[derive(Debug, Clone, Copy)]
pub struct LineItemResolver<'a> {
    rates: &'a RateCard,
    inputs: &'a ProposalInputs,
    previous: &'a PreviousInputs,
    changes: &'a Changes,
}

impl<'a> LineItemResolver<'a> {
    pub fn new(
        rates: &'a RateCard,
        inputs: &'a ProposalInputs,
        previous: &'a PreviousInputs,
        changes: &'a Changes,
    ) -> Self {
        Self {
            rates,
            inputs,
            previous,
            changes,
        }
    }

    /// Squares divided by `per`, rounded up.
    fn squares_per(
        &self,
        per: i64,
    ) -> Decimal {
        ceil_units(self.inputs.squares / Decimal::from(per))
    }

    /// Resolves a units/price pair that share one trigger set.
    fn resolve_pair(
        &self,
        name: &'static str,
        input: LineItemInput,
        triggers: &[Trigger],
        base_units: Decimal,
        base_price: Decimal,
    ) -> LineItem {
        let recompute = self.changes.any(triggers);
        debug!(item = name, recompute, "resolving line item");
        priced_line(
            resolve_field(input.units, recompute, || base_units),
            resolve_field(input.price, recompute, || base_price),
        )
    }

    fn product_is(
        &self,
        product: Product,
    ) -> bool {
        self.inputs.product == Some(product)
    }

    pub fn labor_days(&self) -> Decimal {
        let per_day = if self.inputs.roof_type.is_ballasted() {
            BALLASTED_SQUARES_PER_DAY
        } else {
            SQUARES_PER_DAY
        };
        resolve_field(
            self.inputs.labor_days,
            self.changes.any(&[Trigger::RoofType, Trigger::Squares]),
            || self.squares_per(per_day),
        )
    }

    /// The 10-year silicone quantity if the user typed a new one this
    /// revision.
    pub fn manual_silicone_units(&self) -> Option<Decimal> {
        let current = self.inputs.silicone.units;
        if is_blank(current) {
            return None;
        }
        let edited = match (current, self.previous.silicone_units_10) {
            (Some(now), Some(before)) => !almost_equal(now, before),
            _ => true,
        };
        if edited { current } else { None }
    }

    /// Adjusted coverage in effect this revision: zero after a manual silicone
    /// edit, otherwise the submitted value.
    pub fn effective_adjusted_coverage(&self) -> Decimal {
        match self.manual_silicone_units() {
            Some(_) => Decimal::ZERO,
            None => self.inputs.adjusted_coverage.unwrap_or(Decimal::ZERO),
        }
    }

    pub fn silicone(&self) -> SiliconeLine {
        let inputs = self.inputs;
        let base_coverage = coverage_factors(inputs.product, &inputs.roof_type);
        let manual = self.manual_silicone_units();

        let adjusted_coverage = self.effective_adjusted_coverage();
        let coverage = base_coverage.map(|c| c.saturating_add(adjusted_coverage));
        let per_basis = inputs.squares / Decimal::from(COVERAGE_BASIS_SQUARES);

        let units = match manual {
            Some(ten) => {
                debug!(units = %ten, "silicone units edited; deriving other tiers by coverage ratio");
                let scaled = |factor: Decimal| {
                    if coverage.ten.is_zero() {
                        ten
                    } else {
                        safe_div(ten.saturating_mul(factor), coverage.ten)
                    }
                };
                TierValues::new(ten, scaled(coverage.fifteen), scaled(coverage.twenty))
            }
            None => {
                let calculated = coverage.map(|c| per_basis.saturating_mul(c));
                let recompute = self.changes.any(&[
                    Trigger::Product,
                    Trigger::RoofType,
                    Trigger::Squares,
                    Trigger::AdjustedCoverage,
                ]);
                let ten = resolve_field(inputs.silicone.units, recompute, || calculated.ten);
                TierValues::new(ten, calculated.fifteen, calculated.twenty)
            }
        }
        .map(ceil_units);

        let price = resolve_field(inputs.silicone.price, self.changes.product, || {
            self.rates
                .silicone_price(inputs.product)
                .or(inputs.silicone.price)
                .unwrap_or(Decimal::ZERO)
        });

        SiliconeLine {
            item: priced_line(units.ten, price),
            units,
            coverage,
            adjusted_coverage,
        }
    }

    /// Patch units follow product and squares; the price only follows product.
    pub fn patch(&self) -> LineItem {
        let applies = self.product_is(Product::Gaco);
        let base_units = if applies {
            self.squares_per(SQUARES_PER_PATCH)
        } else {
            Decimal::ZERO
        };
        let base_price = if applies {
            self.rates.patch_price
        } else {
            Decimal::ZERO
        };

        let input = self.inputs.patch;
        let units_recompute = self.changes.any(&[Trigger::Product, Trigger::Squares]);
        let price_recompute = self.changes.product;
        debug!(item = "patch", units_recompute, price_recompute, "resolving line item");
        priced_line(
            resolve_field(input.units, units_recompute, || base_units),
            resolve_field(input.price, price_recompute, || base_price),
        )
    }

    pub fn bleed_trap(&self) -> LineItem {
        let applies = self.product_is(Product::Gaco) && self.inputs.roof_type == RoofType::ModBit;
        let (units, price) = if applies {
            (self.squares_per(SQUARES_PER_BLEED_UNIT), self.rates.bleed_trap_price)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        self.resolve_pair(
            "bleed_trap",
            self.inputs.bleed_trap,
            &[Trigger::Product, Trigger::RoofType, Trigger::Squares],
            units,
            price,
        )
    }

    pub fn flashing(&self) -> LineItem {
        let (units, price) = if self.product_is(Product::Uniflex) {
            let per = match self.inputs.roof_type {
                RoofType::TpoEpdm | RoofType::ModBit | RoofType::RockFoamCoat => 20,
                _ => 10,
            };
            (self.squares_per(per), self.rates.flashing_price)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        self.resolve_pair(
            "flashing",
            self.inputs.flashing,
            &[Trigger::Product, Trigger::RoofType, Trigger::Squares],
            units,
            price,
        )
    }

    /// Bleed block also resets when the effective adjusted coverage differs
    /// from the previous revision, including a reset by a manual silicone edit.
    pub fn bleed_block(&self) -> LineItem {
        let applies =
            self.product_is(Product::Uniflex) && self.inputs.roof_type == RoofType::ModBit;
        let (units, price) = if applies {
            (self.squares_per(SQUARES_PER_BLEED_UNIT), self.rates.bleed_block_price)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let input = self.inputs.bleed_block;
        let recompute = self
            .changes
            .any(&[Trigger::Product, Trigger::RoofType, Trigger::Squares])
            || !almost_equal(self.effective_adjusted_coverage(), self.previous.adjusted_coverage);
        debug!(item = "bleed_block", recompute, "resolving line item");
        priced_line(
            resolve_field(input.units, recompute, || units),
            resolve_field(input.price, recompute, || price),
        )
    }

    /// Drainage mat ignores product changes.
    pub fn drainage_mat(&self) -> LineItem {
        let (units, price) = if self.inputs.roof_type.is_ballasted() {
            (self.squares_per(SQUARES_PER_DRAINAGE_MAT), self.rates.drainage_mat_price)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        self.resolve_pair(
            "drainage_mat",
            self.inputs.drainage_mat,
            &[Trigger::RoofType, Trigger::Squares],
            units,
            price,
        )
    }

    pub fn foam(&self) -> LineItem {
        let (units, price) = if self.inputs.roof_type == RoofType::RockFoamCoat {
            (
                self.squares_per(SQUARES_PER_FOAM_UNIT),
                self.rates.foam_price(self.inputs.product),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        self.resolve_pair(
            "foam",
            self.inputs.foam,
            &[Trigger::Product, Trigger::RoofType, Trigger::Squares],
            units,
            price,
        )
    }

    /// Per-square Rock/Foam/Coat labor rate.
    pub fn rfc_labor_price(&self) -> Decimal {
        resolve_field(self.inputs.rfc_labor_price, self.changes.roof_type, || {
            if self.inputs.roof_type == RoofType::RockFoamCoat {
                self.rates.rfc_labor_rate
            } else {
                Decimal::ZERO
            }
        })
    }

    /// Crew cost per day; only a blank entry is reset.
    pub fn base_labor_price(&self) -> Decimal {
        resolve_field(self.inputs.base_labor_price, false, || self.rates.base_labor_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn inputs(
        product: Product,
        roof: RoofType,
        squares: Decimal,
    ) -> ProposalInputs {
        ProposalInputs {
            product: Some(product),
            roof_type: roof,
            squares,
            ..ProposalInputs::default()
        }
    }

    /// Resolves with a previous snapshot identical to `current`.
    fn unchanged<T>(
        current: &ProposalInputs,
        f: impl FnOnce(&LineItemResolver<'_>) -> T,
    ) -> T {
        let previous = PreviousInputs::unchanged_from(current);
        with_previous(current, &previous, f)
    }

    fn with_previous<T>(
        current: &ProposalInputs,
        previous: &PreviousInputs,
        f: impl FnOnce(&LineItemResolver<'_>) -> T,
    ) -> T {
        let rates = RateCard::default();
        let changes = Changes::detect(current, previous);
        let resolver = LineItemResolver::new(&rates, current, previous, &changes);
        f(&resolver)
    }

    /// Previous snapshot from a blank template, so every trigger fires.
    fn fresh<T>(
        current: &ProposalInputs,
        f: impl FnOnce(&LineItemResolver<'_>) -> T,
    ) -> T {
        with_previous(current, &PreviousInputs::default(), f)
    }

    // =========================================================================
    // labor_days tests
    // =========================================================================

    #[test]
    fn labor_days_uses_45_squares_per_day() {
        let current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));

        assert_eq!(fresh(&current, |r| r.labor_days()), dec!(3)); // ⌈100/45⌉
    }

    #[test]
    fn labor_days_uses_30_squares_per_day_on_ballasted_roofs() {
        let current = inputs(Product::Gaco, RoofType::Ballasted60Mil, dec!(100));

        assert_eq!(fresh(&current, |r| r.labor_days()), dec!(4)); // ⌈100/30⌉
    }

    #[test]
    fn labor_days_override_survives_product_change() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.labor_days = Some(dec!(6));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.product = Some(Product::Uniflex);

        assert_eq!(with_previous(&current, &previous, |r| r.labor_days()), dec!(6));
    }

    #[test]
    fn labor_days_override_reset_by_squares_change() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.labor_days = Some(dec!(6));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.squares = dec!(90);

        assert_eq!(with_previous(&current, &previous, |r| r.labor_days()), dec!(3));
    }

    // =========================================================================
    // silicone tests
    // =========================================================================

    #[test]
    fn silicone_units_follow_coverage_and_round_up() {
        let current = inputs(Product::Gaco, RoofType::ModBit, dec!(47));

        let line = fresh(&current, |r| r.silicone());

        // 47 / 5 = 9.4 → × 1.25, 1.75, 2.25
        assert_eq!(line.units, TierValues::new(dec!(12), dec!(17), dec!(22)));
        assert_eq!(line.item.units, dec!(12));
        assert_eq!(line.item.price, dec!(210));
        assert_eq!(line.item.total, dec!(2520));
    }

    #[test]
    fn silicone_adjusted_coverage_applies_to_every_tier() {
        let mut current = inputs(Product::Uniflex, RoofType::TpoEpdm, dec!(100));
        current.adjusted_coverage = Some(dec!(0.5));

        let line = fresh(&current, |r| r.silicone());

        assert_eq!(line.coverage, TierValues::new(dec!(2.0), dec!(2.5), dec!(3.0)));
        assert_eq!(line.units, TierValues::new(dec!(40), dec!(50), dec!(60)));
        assert_eq!(line.adjusted_coverage, dec!(0.5));
    }

    #[test]
    fn silicone_adjusted_coverage_change_recomputes_units() {
        let mut current = inputs(Product::Uniflex, RoofType::TpoEpdm, dec!(100));
        current.silicone.units = Some(dec!(30));
        let previous = PreviousInputs::unchanged_from(&current);
        current.adjusted_coverage = Some(dec!(0.5));

        let line = with_previous(&current, &previous, |r| r.silicone());

        assert_eq!(line.item.units, dec!(40)); // 20 × 2.0
    }

    #[test]
    fn silicone_unchanged_units_are_preserved() {
        let mut current = inputs(Product::Uniflex, RoofType::TpoEpdm, dec!(100));
        current.silicone = LineItemInput::new(Some(dec!(33)), Some(dec!(250)));

        let line = unchanged(&current, |r| r.silicone());

        assert_eq!(line.item.units, dec!(33));
        assert_eq!(line.item.price, dec!(250));
        // Other tiers still come from coverage.
        assert_eq!(line.units.fifteen, dec!(40));
        assert_eq!(line.units.twenty, dec!(50));
    }

    #[test]
    fn silicone_manual_edit_resets_adjusted_coverage_and_scales_tiers() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.adjusted_coverage = Some(dec!(0.5));
        current.silicone.units = Some(dec!(30));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.silicone_units_10 = Some(dec!(35));

        let line = with_previous(&current, &previous, |r| r.silicone());

        assert_eq!(line.adjusted_coverage, Decimal::ZERO);
        assert_eq!(line.coverage, TierValues::new(dec!(1.25), dec!(1.75), dec!(2.25)));
        // 30 × 1.75/1.25 = 42, 30 × 2.25/1.25 = 54
        assert_eq!(line.units, TierValues::new(dec!(30), dec!(42), dec!(54)));
    }

    #[test]
    fn silicone_manual_edit_wins_over_trigger_changes() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.silicone.units = Some(dec!(40));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.product = Some(Product::Uniflex);
        previous.roof_type = RoofType::ModBit;
        previous.squares = dec!(90);
        previous.silicone_units_10 = Some(dec!(30));

        let line = with_previous(&current, &previous, |r| r.silicone());

        // 40 × 1.75/1.25 = 56, 40 × 2.25/1.25 = 72
        assert_eq!(line.units, TierValues::new(dec!(40), dec!(56), dec!(72)));
        assert_eq!(line.adjusted_coverage, Decimal::ZERO);
        assert_eq!(line.item.price, dec!(210));
    }

    #[test]
    fn silicone_manual_edit_rounds_scaled_tiers_up() {
        let mut current = inputs(Product::Uniflex, RoofType::Ballasted60Mil, dec!(100));
        current.silicone.units = Some(dec!(31));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.silicone_units_10 = Some(dec!(60));

        let line = with_previous(&current, &previous, |r| r.silicone());

        // 31 × 3.5/3.0 = 36.17, 31 × 4.0/3.0 = 41.33
        assert_eq!(line.units, TierValues::new(dec!(31), dec!(37), dec!(42)));
    }

    #[test]
    fn silicone_manual_edit_without_coverage_copies_units() {
        let mut current = inputs(Product::Gaco, RoofType::parse("Shingle"), dec!(100));
        current.silicone.units = Some(dec!(12));

        let line = fresh(&current, |r| r.silicone());

        assert_eq!(line.units, TierValues::splat(dec!(12)));
    }

    #[test]
    fn manual_silicone_units_ignores_drift_within_tolerance() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.silicone.units = Some(dec!(25.0000001));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.silicone_units_10 = Some(dec!(25));

        assert_eq!(
            with_previous(&current, &previous, |r| r.manual_silicone_units()),
            None
        );
    }

    #[test]
    fn silicone_price_resets_on_product_change() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.silicone.price = Some(dec!(260));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.product = Some(Product::Uniflex);

        let line = with_previous(&current, &previous, |r| r.silicone());

        assert_eq!(line.item.price, dec!(210));
    }

    #[test]
    fn silicone_price_kept_for_unknown_product() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(100));
        current.product = None;
        current.silicone.price = Some(dec!(199));

        let line = fresh(&current, |r| r.silicone());

        assert_eq!(line.item.price, dec!(199));
        assert_eq!(line.item.units, Decimal::ZERO);
    }

    // =========================================================================
    // patch / bleed trap tests
    // =========================================================================

    #[test]
    fn gaco_mod_bit_patch_and_bleed_trap_round_up() {
        let current = inputs(Product::Gaco, RoofType::ModBit, dec!(47));

        let (patch, bleed_trap) = fresh(&current, |r| (r.patch(), r.bleed_trap()));

        assert_eq!(patch.units, dec!(5));
        assert_eq!(patch.price, dec!(125));
        assert_eq!(bleed_trap.units, dec!(10));
        assert_eq!(bleed_trap.price, dec!(168));
        assert_eq!(bleed_trap.total, dec!(1680));
    }

    #[test]
    fn patch_is_not_used_with_uniflex() {
        let current = inputs(Product::Uniflex, RoofType::ModBit, dec!(47));

        let patch = fresh(&current, |r| r.patch());

        assert_eq!(patch, LineItem::default());
    }

    #[test]
    fn patch_price_override_survives_squares_change() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(50));
        current.patch = LineItemInput::new(Some(dec!(9)), Some(dec!(130)));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.squares = dec!(40);

        let patch = with_previous(&current, &previous, |r| r.patch());

        assert_eq!(patch.units, dec!(5));
        assert_eq!(patch.price, dec!(130));
    }

    #[test]
    fn patch_override_preserved_when_triggers_unchanged() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(50));
        current.patch = LineItemInput::new(Some(dec!(9)), Some(dec!(130)));

        let patch = unchanged(&current, |r| r.patch());

        assert_eq!(patch.units, dec!(9));
        assert_eq!(patch.price, dec!(130));
        assert_eq!(patch.total, dec!(1170));
    }

    #[test]
    fn bleed_trap_only_on_mod_bit() {
        let current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(47));

        assert_eq!(fresh(&current, |r| r.bleed_trap()), LineItem::default());
    }

    // =========================================================================
    // flashing / bleed block tests
    // =========================================================================

    #[test]
    fn flashing_uses_twenty_squares_on_low_slope_roofs() {
        for roof in [RoofType::TpoEpdm, RoofType::ModBit, RoofType::RockFoamCoat] {
            let current = inputs(Product::Uniflex, roof, dec!(45));

            let flashing = fresh(&current, |r| r.flashing());

            assert_eq!(flashing.units, dec!(3));
            assert_eq!(flashing.price, dec!(162));
        }
    }

    #[test]
    fn flashing_uses_ten_squares_elsewhere() {
        let current = inputs(Product::Uniflex, RoofType::Metal, dec!(45));

        assert_eq!(fresh(&current, |r| r.flashing()).units, dec!(5));
    }

    #[test]
    fn flashing_is_not_used_with_gaco() {
        let current = inputs(Product::Gaco, RoofType::Metal, dec!(45));

        assert_eq!(fresh(&current, |r| r.flashing()), LineItem::default());
    }

    #[test]
    fn bleed_block_resets_when_adjusted_coverage_changes() {
        let mut current = inputs(Product::Uniflex, RoofType::ModBit, dec!(47));
        current.bleed_block = LineItemInput::new(Some(dec!(4)), Some(dec!(90)));
        let previous = PreviousInputs::unchanged_from(&current);
        current.adjusted_coverage = Some(dec!(0.25));

        let bleed_block = with_previous(&current, &previous, |r| r.bleed_block());

        assert_eq!(bleed_block.units, dec!(10));
        assert_eq!(bleed_block.price, dec!(100));
    }

    #[test]
    fn bleed_block_resets_when_manual_silicone_edit_clears_coverage() {
        let mut current = inputs(Product::Uniflex, RoofType::ModBit, dec!(47));
        current.adjusted_coverage = Some(dec!(0.25));
        current.bleed_block = LineItemInput::new(Some(dec!(4)), Some(dec!(90)));
        current.silicone.units = Some(dec!(40));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.silicone_units_10 = Some(dec!(30));

        let (silicone, bleed_block) =
            with_previous(&current, &previous, |r| (r.silicone(), r.bleed_block()));

        assert_eq!(silicone.adjusted_coverage, Decimal::ZERO);
        assert_eq!(bleed_block.units, dec!(10));
        assert_eq!(bleed_block.price, dec!(100));
    }

    #[test]
    fn bleed_block_override_kept_when_coverage_carries_over() {
        let mut current = inputs(Product::Uniflex, RoofType::ModBit, dec!(47));
        current.adjusted_coverage = Some(dec!(0.25));
        current.bleed_block = LineItemInput::new(Some(dec!(4)), Some(dec!(90)));

        let bleed_block = unchanged(&current, |r| r.bleed_block());

        assert_eq!(bleed_block.units, dec!(4));
        assert_eq!(bleed_block.price, dec!(90));
    }

    // =========================================================================
    // drainage mat / foam / labor price tests
    // =========================================================================

    #[test]
    fn drainage_mat_on_ballasted_roofs() {
        let current = inputs(Product::Gaco, RoofType::Ballasted45Mil, dec!(100));

        let mat = fresh(&current, |r| r.drainage_mat());

        assert_eq!(mat.units, dec!(6)); // ⌈100/18⌉
        assert_eq!(mat.price, dec!(150));
    }

    #[test]
    fn drainage_mat_override_survives_product_change() {
        let mut current = inputs(Product::Gaco, RoofType::Ballasted45Mil, dec!(100));
        current.drainage_mat = LineItemInput::new(Some(dec!(8)), Some(dec!(140)));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.product = Some(Product::Uniflex);

        let mat = with_previous(&current, &previous, |r| r.drainage_mat());

        assert_eq!(mat.units, dec!(8));
        assert_eq!(mat.price, dec!(140));
    }

    #[test]
    fn foam_override_reset_by_product_change() {
        let mut current = inputs(Product::Uniflex, RoofType::RockFoamCoat, dec!(60));
        current.foam = LineItemInput::new(Some(dec!(5)), Some(dec!(2000)));
        let mut previous = PreviousInputs::unchanged_from(&current);
        previous.product = Some(Product::Gaco);

        let foam = with_previous(&current, &previous, |r| r.foam());

        assert_eq!(foam.units, dec!(3)); // ⌈60/25⌉
        assert_eq!(foam.price, dec!(2490));
    }

    #[test]
    fn rfc_labor_price_only_for_rock_foam_coat() {
        let rfc = inputs(Product::Gaco, RoofType::RockFoamCoat, dec!(60));
        let tpo = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(60));

        assert_eq!(fresh(&rfc, |r| r.rfc_labor_price()), dec!(250));
        assert_eq!(fresh(&tpo, |r| r.rfc_labor_price()), Decimal::ZERO);
    }

    #[test]
    fn base_labor_price_only_resets_when_blank() {
        let mut current = inputs(Product::Gaco, RoofType::TpoEpdm, dec!(60));

        assert_eq!(fresh(&current, |r| r.base_labor_price()), dec!(3250));

        current.base_labor_price = Some(dec!(3500));
        assert_eq!(fresh(&current, |r| r.base_labor_price()), dec!(3500));
    }
}
