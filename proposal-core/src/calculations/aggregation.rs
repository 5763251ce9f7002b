//! Extended totals, cost roll-up and profit figures.
//!
//! | Figure        | Formula |
//! |---------------|---------|
//! | Extended total| ROUND(units) × ROUND(price) |
//! | Total cost    | Σ extended totals + RFC labor + base labor + scarifying + travel + misc + 10-yr warranty + office fee + commission |
//! | Profit share  | ROUND(profit share % × (10-yr total − total cost)) |
//! | Profit        | 10-yr total − total cost − profit share |
//! | Profit %      | ROUND(profit ÷ 10-yr total, 2), zero when the total is zero |
//! | Daily profit  | ROUND(profit ÷ labor days), zero when there are no labor days |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{excel_round, round_whole, safe_div, saturating_sum};
use crate::models::LineItem;

/// Multiplies whole-number units by a whole-number price.
///
/// Each factor is rounded half-up on its own before multiplying, which is how
/// the profit-summary spreadsheet computes its line totals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::aggregation::extended_total;
///
/// // 3.4 rounds to 3 and 9.5 rounds to 10.
/// assert_eq!(extended_total(dec!(3.4), dec!(9.5)), dec!(30));
/// ```
pub fn extended_total(
    units: Decimal,
    price: Decimal,
) -> Decimal {
    round_whole(units).saturating_mul(round_whole(price))
}

/// Builds a resolved line with its extended total.
pub fn priced_line(
    units: Decimal,
    price: Decimal,
) -> LineItem {
    LineItem {
        units,
        price,
        total: extended_total(units, price),
    }
}

/// Every cost that counts against the 10-year selling price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub materials_total: Decimal,
    pub rfc_labor_total: Decimal,
    pub base_labor_total: Decimal,
    pub scarifying_total: Decimal,
    pub travel_total: Decimal,
    pub misc_total: Decimal,
    pub warranty_cost_10: Decimal,
    pub office_fee_total: Decimal,
    pub commission_amount: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        saturating_sum([
            self.materials_total,
            self.rfc_labor_total,
            self.base_labor_total,
            self.scarifying_total,
            self.travel_total,
            self.misc_total,
            self.warranty_cost_10,
            self.office_fee_total,
            self.commission_amount,
        ])
    }
}

/// Sum of the extended totals of `items`.
pub fn materials_total<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Decimal {
    saturating_sum(items.into_iter().map(|item| item.total))
}

/// Profit figures derived from the 10-year total and the cost roll-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_cost: Decimal,
    pub profit_share: Decimal,
    pub profit: Decimal,
    pub profit_pct: Decimal,
    pub daily_profit: Decimal,
}

impl ProfitSummary {
    pub fn compute(
        costs: &CostBreakdown,
        total_price_10: Decimal,
        labor_days: Decimal,
        profit_share_pct: Decimal,
    ) -> Self {
        let total_cost = costs.total();
        let margin = total_price_10.saturating_sub(total_cost);
        let profit_share = round_whole(profit_share_pct.saturating_mul(margin));
        let profit = margin.saturating_sub(profit_share);

        Self {
            total_cost,
            profit_share,
            profit,
            profit_pct: excel_round(safe_div(profit, total_price_10), 2),
            daily_profit: round_whole(safe_div(profit, labor_days)),
        }
    }
}
