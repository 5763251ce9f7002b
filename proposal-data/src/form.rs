//! Flat name/value form used to exchange proposals with the outside world.
//!
//! A proposal travels as a map of form field names to text. Decoding turns
//! one submission into the current inputs plus the previous-revision snapshot
//! carried in its `previous_*` hidden fields; encoding turns a derived record
//! back into a form whose hidden fields describe that record, so the result
//! can be edited and submitted again.
//!
//! ## Numbers
//!
//! Amounts tolerate `$`, thousands commas and stray whitespace. Blank cells
//! decode to `None`; malformed text is logged and also decodes to `None`.
//!
//! Percentages also accept a trailing `%`. Values up to and including 1 are
//! already fractions; anything above 1 is a whole percent:
//!
//! | Cell    | Fraction |
//! |---------|----------|
//! | `0.05`  | 0.05     |
//! | `1`     | 1 (100%) |
//! | `1.5`   | 0.015    |
//! | `5`     | 0.05     |
//! | `5%`    | 0.05     |
//! | `1%`    | 1 (100%) |
//!
//! The `%` sign does not change the rule, so `1%` still reads as 100%; write
//! `0.01` for one percent.
//!
//! ## Legacy names
//!
//! | Field                | Also accepted as        |
//! |----------------------|-------------------------|
//! | `current_roof`       | `roof_type`             |
//! | `adjusted_coverage`  | `adjust_coverage`       |
//! | `bleed_trap_units`   | `sw_bleed_trap_units`   |
//! | `bleed_trap_price`   | `sw_bleed_trap_price`   |
//! | `proposal_language`  | `includes_text`         |

use std::collections::BTreeMap;

use proposal_core::{
    DerivedRecord, JobSite, LineItem, LineItemInput, PreviousInputs, Product, ProposalInputs,
    RoofType,
};
use rust_decimal::Decimal;
use tracing::warn;

/// Field name to raw text.
pub type FormFields = BTreeMap<String, String>;

/// Form field names.
pub mod field {
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const STREET_ADDRESS: &str = "street_address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const ZIP_CODE: &str = "zip_code";
    pub const CURRENT_ROOF: &str = "current_roof";
    pub const SQUARES: &str = "squares";
    pub const PRODUCT: &str = "product";
    pub const WARRANTY_INCL: &str = "warranty_incl";
    pub const SUBMITTED_BY: &str = "submitted_by";
    pub const LABOR_DAYS: &str = "labor_days";
    pub const PRICE_PER_SQ_10: &str = "price_per_sq_10";
    pub const PRICE_PER_SQ_15: &str = "price_per_sq_15";
    pub const PRICE_PER_SQ_20: &str = "price_per_sq_20";
    pub const TOTAL_PRICE_10: &str = "total_price_10";
    pub const TOTAL_PRICE_15: &str = "total_price_15";
    pub const TOTAL_PRICE_20: &str = "total_price_20";
    pub const ADJUSTED_COVERAGE: &str = "adjusted_coverage";
    pub const OFFICE_FEE_PCT: &str = "office_fee_pct";
    pub const SILICONE_UNITS_10: &str = "silicone_units_10";
    pub const SILICONE_PRICE: &str = "silicone_price";
    pub const GACO_PATCH_UNITS: &str = "gaco_patch_units";
    pub const GACO_PATCH_PRICE: &str = "gaco_patch_price";
    pub const BLEED_TRAP_UNITS: &str = "bleed_trap_units";
    pub const BLEED_TRAP_PRICE: &str = "bleed_trap_price";
    pub const FLASHING_UNITS: &str = "sw_1flash_units";
    pub const FLASHING_PRICE: &str = "sw_1flash_price";
    pub const BLEED_BLOCK_UNITS: &str = "sw_bleed_block_units";
    pub const BLEED_BLOCK_PRICE: &str = "sw_bleed_block_price";
    pub const DRAINAGE_MAT_UNITS: &str = "drainage_mat_units";
    pub const DRAINAGE_MAT_PRICE: &str = "drainage_mat_price";
    pub const FOAM_UNITS: &str = "foam_units";
    pub const FOAM_PRICE: &str = "foam_price";
    pub const RFC_LABOR_PRICE: &str = "rfc_labor_price";
    pub const BASE_LABOR_PRICE: &str = "pcs_labor_price";
    pub const SCARIFYING_TOTAL: &str = "scarifying_total";
    pub const TRAVEL_TOTAL: &str = "travel_total";
    pub const MISC_TOTAL: &str = "misc_costs_total";
    pub const PROPOSAL_NOTE: &str = "proposal_note";
    pub const PROPOSAL_LANGUAGE: &str = "proposal_language";

    pub const PREVIOUS_SQUARES: &str = "previous_squares";
    pub const PREVIOUS_ROOF_TYPE: &str = "previous_roof_type";
    pub const PREVIOUS_PRODUCT: &str = "previous_product";
    pub const PREVIOUS_ADJUSTED_COVERAGE: &str = "previous_adjusted_coverage";
    pub const PREVIOUS_SUBMITTED_BY: &str = "previous_submitted_by";
    pub const PREVIOUS_SILICONE_UNITS_10: &str = "previous_silicone_units_10";

    pub(crate) const LEGACY_ROOF_TYPE: &str = "roof_type";
    pub(crate) const LEGACY_ADJUST_COVERAGE: &str = "adjust_coverage";
    pub(crate) const LEGACY_BLEED_TRAP_UNITS: &str = "sw_bleed_trap_units";
    pub(crate) const LEGACY_BLEED_TRAP_PRICE: &str = "sw_bleed_trap_price";
    pub(crate) const LEGACY_INCLUDES_TEXT: &str = "includes_text";
}

/// One decoded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub current: ProposalInputs,
    pub previous: PreviousInputs,
}

/// Strips currency decoration: whitespace, `$` and thousands commas.
fn normalize_amount(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect()
}

/// Parses a currency or quantity cell.
///
/// Returns `None` for blank input, or when parsing fails (logs a warning on
/// parse failure).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().map_or_else(
        |e| {
            warn!(input = %s, "invalid amount: {}", e);
            None
        },
        Some,
    )
}

/// Parses a percentage cell into a fraction.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_data::form::parse_percent;
///
/// assert_eq!(parse_percent("5%"), Some(dec!(0.05)));
/// assert_eq!(parse_percent("0.05"), Some(dec!(0.05)));
/// assert_eq!(parse_percent("1"), Some(dec!(1)));
/// assert_eq!(parse_percent("2"), Some(dec!(0.02)));
/// assert_eq!(parse_percent(""), None);
/// ```
pub fn parse_percent(s: &str) -> Option<Decimal> {
    let value = parse_amount(&s.replace('%', ""))?;
    if value > Decimal::ONE {
        Some(value / Decimal::ONE_HUNDRED)
    } else {
        Some(value)
    }
}

/// First non-blank value among `names`, trimmed; empty when none is present.
fn text<'a>(
    fields: &'a FormFields,
    names: &[&str],
) -> &'a str {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn amount(
    fields: &FormFields,
    names: &[&str],
) -> Option<Decimal> {
    parse_amount(text(fields, names))
}

fn amount_or_zero(
    fields: &FormFields,
    name: &str,
) -> Decimal {
    amount(fields, &[name]).unwrap_or(Decimal::ZERO)
}

fn line(
    fields: &FormFields,
    units: &[&str],
    price: &[&str],
) -> LineItemInput {
    LineItemInput::new(amount(fields, units), amount(fields, price))
}

/// Decodes a form submission into current inputs and the previous snapshot.
///
/// Missing `previous_*` fields fall back to values that register as a change
/// (zero squares, blank roof type and product), except the previous silicone
/// quantity, which defaults to the current one so a first render does not
/// count as a manual edit.
pub fn decode_form(fields: &FormFields) -> FormSubmission {
    use self::field::*;

    let silicone = line(fields, &[SILICONE_UNITS_10], &[SILICONE_PRICE]);

    let current = ProposalInputs {
        site: JobSite {
            customer_name: text(fields, &[CUSTOMER_NAME]).to_string(),
            street_address: text(fields, &[STREET_ADDRESS]).to_string(),
            city: text(fields, &[CITY]).to_string(),
            state: text(fields, &[STATE]).to_string(),
            zip_code: text(fields, &[ZIP_CODE]).to_string(),
        },
        roof_type: RoofType::parse(text(fields, &[CURRENT_ROOF, LEGACY_ROOF_TYPE])),
        product: Product::parse(text(fields, &[PRODUCT])),
        warranty_included: text(fields, &[WARRANTY_INCL]).eq_ignore_ascii_case("yes"),
        submitted_by: text(fields, &[SUBMITTED_BY]).to_string(),
        squares: amount_or_zero(fields, SQUARES),
        labor_days: amount(fields, &[LABOR_DAYS]),
        price_per_square_10: amount(fields, &[PRICE_PER_SQ_10]),
        adjusted_coverage: amount(fields, &[ADJUSTED_COVERAGE, LEGACY_ADJUST_COVERAGE]),
        office_fee_pct: parse_percent(text(fields, &[OFFICE_FEE_PCT])),
        silicone,
        patch: line(fields, &[GACO_PATCH_UNITS], &[GACO_PATCH_PRICE]),
        bleed_trap: line(
            fields,
            &[BLEED_TRAP_UNITS, LEGACY_BLEED_TRAP_UNITS],
            &[BLEED_TRAP_PRICE, LEGACY_BLEED_TRAP_PRICE],
        ),
        flashing: line(fields, &[FLASHING_UNITS], &[FLASHING_PRICE]),
        bleed_block: line(fields, &[BLEED_BLOCK_UNITS], &[BLEED_BLOCK_PRICE]),
        drainage_mat: line(fields, &[DRAINAGE_MAT_UNITS], &[DRAINAGE_MAT_PRICE]),
        foam: line(fields, &[FOAM_UNITS], &[FOAM_PRICE]),
        rfc_labor_price: amount(fields, &[RFC_LABOR_PRICE]),
        base_labor_price: amount(fields, &[BASE_LABOR_PRICE]),
        scarifying_total: amount_or_zero(fields, SCARIFYING_TOTAL),
        travel_total: amount_or_zero(fields, TRAVEL_TOTAL),
        misc_total: amount_or_zero(fields, MISC_TOTAL),
        proposal_note: text(fields, &[PROPOSAL_NOTE]).to_string(),
        proposal_language: text(fields, &[PROPOSAL_LANGUAGE, LEGACY_INCLUDES_TEXT]).to_string(),
    };

    let previous = PreviousInputs {
        squares: amount_or_zero(fields, PREVIOUS_SQUARES),
        roof_type: RoofType::parse(text(fields, &[PREVIOUS_ROOF_TYPE])),
        product: Product::parse(text(fields, &[PREVIOUS_PRODUCT])),
        submitted_by: text(fields, &[PREVIOUS_SUBMITTED_BY]).to_string(),
        adjusted_coverage: amount_or_zero(fields, PREVIOUS_ADJUSTED_COVERAGE),
        silicone_units_10: amount(fields, &[PREVIOUS_SILICONE_UNITS_10]).or(silicone.units),
    };

    FormSubmission { current, previous }
}

/// Renders a decimal without trailing zeros.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Builds the echo-back form for a derived record.
///
/// Every computed figure is included alongside the editable fields, and the
/// `previous_*` fields are set from the record itself.
pub fn encode_record(record: &DerivedRecord) -> FormFields {
    use self::field::*;

    let mut fields = FormFields::new();
    let mut put = |name: &str, value: String| {
        fields.insert(name.to_string(), value);
    };
    let num = format_decimal;

    put(CUSTOMER_NAME, record.site.customer_name.clone());
    put(STREET_ADDRESS, record.site.street_address.clone());
    put(CITY, record.site.city.clone());
    put(STATE, record.site.state.clone());
    put(ZIP_CODE, record.site.zip_code.clone());
    put(CURRENT_ROOF, record.roof_type.as_str().to_string());
    put(SQUARES, num(record.squares));
    put(PRODUCT, Product::label(record.product).to_string());
    put(WARRANTY_INCL, yes_no(record.warranty_included).to_string());
    put(SUBMITTED_BY, record.submitted_by.clone());
    put(PROPOSAL_NOTE, record.proposal_note.clone());
    put(PROPOSAL_LANGUAGE, record.proposal_language.clone());

    put(LABOR_DAYS, num(record.labor_days));
    put(PRICE_PER_SQ_10, num(record.price_per_square.ten));
    put(PRICE_PER_SQ_15, num(record.price_per_square.fifteen));
    put(PRICE_PER_SQ_20, num(record.price_per_square.twenty));
    put(TOTAL_PRICE_10, num(record.total_price.ten));
    put(TOTAL_PRICE_15, num(record.total_price.fifteen));
    put(TOTAL_PRICE_20, num(record.total_price.twenty));

    put("coverage_10", num(record.coverage.ten));
    put("coverage_15", num(record.coverage.fifteen));
    put("coverage_20", num(record.coverage.twenty));
    put(ADJUSTED_COVERAGE, num(record.adjusted_coverage));
    put("silicone_units_15", num(record.silicone_units.fifteen));
    put("silicone_units_20", num(record.silicone_units.twenty));

    for (units, price, total, item) in [
        (SILICONE_UNITS_10, SILICONE_PRICE, "silicone_total", &record.silicone),
        (GACO_PATCH_UNITS, GACO_PATCH_PRICE, "gaco_patch_total", &record.patch),
        (BLEED_TRAP_UNITS, BLEED_TRAP_PRICE, "bleed_trap_total", &record.bleed_trap),
        (FLASHING_UNITS, FLASHING_PRICE, "sw_1flash_total", &record.flashing),
        (BLEED_BLOCK_UNITS, BLEED_BLOCK_PRICE, "sw_bleed_block_total", &record.bleed_block),
        (DRAINAGE_MAT_UNITS, DRAINAGE_MAT_PRICE, "drainage_mat_total", &record.drainage_mat),
        (FOAM_UNITS, FOAM_PRICE, "foam_total", &record.foam),
    ] {
        let LineItem {
            units: u,
            price: p,
            total: t,
        } = *item;
        put(units, num(u));
        put(price, num(p));
        put(total, num(t));
    }

    put(RFC_LABOR_PRICE, num(record.rfc_labor_price));
    put("rfc_labor_total", num(record.rfc_labor_total));
    put(BASE_LABOR_PRICE, num(record.base_labor_price));
    put("pcs_labor_total", num(record.base_labor_total));
    put(SCARIFYING_TOTAL, num(record.scarifying_total));
    put(TRAVEL_TOTAL, num(record.travel_total));
    put(MISC_TOTAL, num(record.misc_total));

    put("warranty_10_total", num(record.warranty_cost.ten));
    put("warranty_15_total", num(record.warranty_cost.fifteen));
    put("warranty_20_total", num(record.warranty_cost.twenty));
    put(OFFICE_FEE_PCT, num(record.office_fee_pct));
    put("office_fee_total", num(record.office_fee_total));
    put("commission_pct", num(record.commission_pct));
    put("commission_amt", num(record.commission_amount));
    put("total_cost", num(record.total_cost));
    put("profit_share", num(record.profit_share));
    put("pcs_profit", num(record.profit));
    put("profit_pct", num(record.profit_pct));
    put("daily_profit", num(record.daily_profit));

    let previous = record.previous();
    put(PREVIOUS_SQUARES, num(previous.squares));
    put(PREVIOUS_ROOF_TYPE, previous.roof_type.as_str().to_string());
    put(PREVIOUS_PRODUCT, Product::label(previous.product).to_string());
    put(PREVIOUS_ADJUSTED_COVERAGE, num(previous.adjusted_coverage));
    put(PREVIOUS_SUBMITTED_BY, previous.submitted_by);
    put(
        PREVIOUS_SILICONE_UNITS_10,
        previous.silicone_units_10.map(num).unwrap_or_default(),
    );

    fields
}

/// Warranty flag as shown on forms and proposals.
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
