//! Proposal documents rendered from `[[Placeholder]]` templates.
//!
//! | Placeholder              | Value |
//! |--------------------------|-------|
//! | `CustomerName`, `ProjectStreetAddr`, `ProjectCity`, `ProjectState`, `ProjectZip` | job site |
//! | `Date`                   | e.g. `March 04, 2025` |
//! | `Squares`, `SubmittedBy` | as entered |
//! | `PriceIncludesLanguage`  | fixed Gaco wording, otherwise the proposal language |
//! | `WarrantyIncluded`       | `IS INCLUDED` / `IS NOT INCLUDED` for Gaco, otherwise `Yes` / `No` |
//! | `10YrTotalPrice` …       | whole dollars with thousands separators |
//! | `AdditionalLanguage`     | the proposal language |
//!
//! Placeholders without a value are left in the text untouched.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use proposal_core::calculations::common::round_whole;
use proposal_core::{DerivedRecord, Product, RoofType};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::form::{format_decimal, yes_no};

/// Placeholder name (without brackets) to replacement text.
pub type Placeholders = BTreeMap<&'static str, String>;

/// Errors raised while rendering a document.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

const GACO_PREFIX: &str = "Gaco S42 Proposal - ";
const UNIFLEX_PREFIX: &str = "Uniflex Proposal - ";

const GACO_INCLUDES_WARRANTY: &str =
    "* Price Includes material, labor, trash pickup, haul away and Gaco Warranty Fee";
const GACO_EXCLUDES_WARRANTY: &str = "* Price Includes material, labor, trash pickup and haul away";

fn prefix(product: Option<Product>) -> &'static str {
    match product {
        Some(Product::Gaco) => GACO_PREFIX,
        _ => UNIFLEX_PREFIX,
    }
}

/// Template file stem for a product and roof type.
///
/// # Examples
///
/// ```
/// use proposal_core::{Product, RoofType};
/// use proposal_data::document::template_stem;
///
/// assert_eq!(
///     template_stem(Some(Product::Gaco), &RoofType::Metal),
///     "Gaco S42 Proposal - TPO EPDM Metal"
/// );
/// ```
pub fn template_stem(
    product: Option<Product>,
    roof: &RoofType,
) -> String {
    let suffix = match roof {
        RoofType::TpoEpdm | RoofType::Metal => "TPO EPDM Metal",
        RoofType::ModBit => "Mod Bit",
        RoofType::RockFoamCoat => "RFC",
        RoofType::Ballasted45Mil => "Ballasted 45mil",
        RoofType::Ballasted60Mil => "Ballasted 60mil",
        RoofType::Other(_) => "Unknown",
    };
    format!("{}{}", prefix(product), suffix)
}

/// Output document stem, named after the street address.
pub fn output_stem(
    product: Option<Product>,
    street_address: &str,
) -> String {
    format!("{}{}", prefix(product), street_address)
}

/// Formats a whole-dollar amount with thousands separators, rounding half-up.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_data::document::format_thousands;
///
/// assert_eq!(format_thousands(dec!(1234567.5)), "1,234,568");
/// assert_eq!(format_thousands(dec!(-950)), "-950");
/// ```
pub fn format_thousands(value: Decimal) -> String {
    let whole = round_whole(value).normalize();
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Builds the replacement map for one proposal.
pub fn placeholders(
    record: &DerivedRecord,
    date: NaiveDate,
) -> Placeholders {
    let language = if record.proposal_language.trim().is_empty() {
        " ".to_string()
    } else {
        record.proposal_language.clone()
    };

    let (price_includes, warranty) = match record.product {
        Some(Product::Gaco) if record.warranty_included => {
            (GACO_INCLUDES_WARRANTY.to_string(), "IS INCLUDED".to_string())
        }
        Some(Product::Gaco) => (GACO_EXCLUDES_WARRANTY.to_string(), "IS NOT INCLUDED".to_string()),
        _ => (language.clone(), yes_no(record.warranty_included).to_string()),
    };

    let site = &record.site;
    Placeholders::from([
        ("CustomerName", site.customer_name.clone()),
        ("ProjectStreetAddr", site.street_address.clone()),
        ("ProjectCity", site.city.clone()),
        ("ProjectState", site.state.clone()),
        ("ProjectZip", site.zip_code.clone()),
        ("Date", date.format("%B %d, %Y").to_string()),
        ("Squares", format_decimal(record.squares)),
        ("PriceIncludesLanguage", price_includes),
        ("WarrantyIncluded", warranty),
        ("SubmittedBy", record.submitted_by.clone()),
        ("10YrTotalPrice", format_thousands(record.total_price.ten)),
        ("15YrTotalPrice", format_thousands(record.total_price.fifteen)),
        ("20YrTotalPrice", format_thousands(record.total_price.twenty)),
        ("AdditionalLanguage", language),
    ])
}

fn placeholder_pattern() -> Result<&'static Regex, TemplateError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\[\[([A-Za-z0-9]+)\]\]"))
        .as_ref()
        .map_err(|e| TemplateError::Pattern(e.clone()))
}

/// Replaces every known `[[Name]]` in `text`.
///
/// # Errors
///
/// Returns [`TemplateError::Pattern`] only if the placeholder pattern fails
/// to compile.
pub fn render_template(
    text: &str,
    values: &Placeholders,
) -> Result<String, TemplateError> {
    let pattern = placeholder_pattern()?;
    let rendered = pattern.replace_all(text, |caps: &Captures<'_>| {
        values
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(rendered.into_owned())
}

/// Reads `template`, fills in `values` and writes the result to `output`.
///
/// # Errors
///
/// Returns [`TemplateError::Read`] or [`TemplateError::Write`] on I/O
/// failure.
pub fn render_file(
    template: &Path,
    output: &Path,
    values: &Placeholders,
) -> Result<(), TemplateError> {
    let text = std::fs::read_to_string(template).map_err(|source| TemplateError::Read {
        path: template.to_path_buf(),
        source,
    })?;
    let rendered = render_template(&text, values)?;
    std::fs::write(output, rendered).map_err(|source| TemplateError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    debug!(output = %output.display(), "rendered proposal document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proposal_core::{JobSite, ProposalEngine, ProposalInputs};
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        product: Product,
        warranty_included: bool,
    ) -> DerivedRecord {
        let inputs = ProposalInputs {
            site: JobSite {
                customer_name: "Harbor Storage".to_string(),
                street_address: "12 Dock Rd".to_string(),
                city: "Tacoma".to_string(),
                state: "WA".to_string(),
                zip_code: "98421".to_string(),
            },
            roof_type: RoofType::TpoEpdm,
            product: Some(product),
            warranty_included,
            submitted_by: "Vern Abbott".to_string(),
            squares: dec!(100),
            proposal_language: "Includes seam prep".to_string(),
            ..ProposalInputs::default()
        };
        ProposalEngine::default().recalculate_imported(&inputs)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    // =========================================================================
    // template_stem / output_stem tests
    // =========================================================================

    #[test]
    fn template_stem_covers_every_roof_type() {
        let cases = [
            (RoofType::TpoEpdm, "Uniflex Proposal - TPO EPDM Metal"),
            (RoofType::ModBit, "Uniflex Proposal - Mod Bit"),
            (RoofType::RockFoamCoat, "Uniflex Proposal - RFC"),
            (RoofType::Ballasted45Mil, "Uniflex Proposal - Ballasted 45mil"),
            (RoofType::Ballasted60Mil, "Uniflex Proposal - Ballasted 60mil"),
            (RoofType::parse("Shingle"), "Uniflex Proposal - Unknown"),
        ];

        for (roof, expected) in cases {
            assert_eq!(template_stem(Some(Product::Uniflex), &roof), expected);
        }
    }

    #[test]
    fn unknown_product_uses_uniflex_templates() {
        assert_eq!(
            template_stem(None, &RoofType::ModBit),
            "Uniflex Proposal - Mod Bit"
        );
        assert_eq!(output_stem(None, "12 Dock Rd"), "Uniflex Proposal - 12 Dock Rd");
    }

    #[test]
    fn output_stem_uses_street_address() {
        assert_eq!(
            output_stem(Some(Product::Gaco), "12 Dock Rd"),
            "Gaco S42 Proposal - 12 Dock Rd"
        );
    }

    // =========================================================================
    // format_thousands tests
    // =========================================================================

    #[test]
    fn format_thousands_groups_digits() {
        assert_eq!(format_thousands(dec!(0)), "0");
        assert_eq!(format_thousands(dec!(999)), "999");
        assert_eq!(format_thousands(dec!(1000)), "1,000");
        assert_eq!(format_thousands(dec!(34000.00)), "34,000");
        assert_eq!(format_thousands(dec!(-1234.5)), "-1,235");
    }

    // =========================================================================
    // placeholders tests
    // =========================================================================

    #[test]
    fn gaco_with_warranty_uses_fixed_wording() {
        let values = placeholders(&record(Product::Gaco, true), date());

        assert_eq!(values["PriceIncludesLanguage"], GACO_INCLUDES_WARRANTY);
        assert_eq!(values["WarrantyIncluded"], "IS INCLUDED");
        assert_eq!(values["AdditionalLanguage"], "Includes seam prep");
    }

    #[test]
    fn gaco_without_warranty_says_not_included() {
        let values = placeholders(&record(Product::Gaco, false), date());

        assert_eq!(values["PriceIncludesLanguage"], GACO_EXCLUDES_WARRANTY);
        assert_eq!(values["WarrantyIncluded"], "IS NOT INCLUDED");
    }

    #[test]
    fn uniflex_uses_proposal_language_and_yes_no() {
        let values = placeholders(&record(Product::Uniflex, false), date());

        assert_eq!(values["PriceIncludesLanguage"], "Includes seam prep");
        assert_eq!(values["WarrantyIncluded"], "No");
    }

    #[test]
    fn placeholders_format_date_squares_and_totals() {
        let values = placeholders(&record(Product::Gaco, true), date());

        assert_eq!(values["Date"], "March 04, 2025");
        assert_eq!(values["Squares"], "100");
        assert_eq!(values["10YrTotalPrice"], "34,000");
        assert_eq!(values["15YrTotalPrice"], "38,500");
        assert_eq!(values["20YrTotalPrice"], "43,000");
        assert_eq!(values["ProjectZip"], "98421");
    }

    // =========================================================================
    // render_template tests
    // =========================================================================

    #[test]
    fn render_replaces_known_and_keeps_unknown() {
        let values = Placeholders::from([("CustomerName", "Harbor Storage".to_string())]);

        let text = render_template("Dear [[CustomerName]], see [[Attachment]].", &values).unwrap();

        assert_eq!(text, "Dear Harbor Storage, see [[Attachment]].");
    }

    #[test]
    fn render_replaces_repeated_placeholders() {
        let values = Placeholders::from([("10YrTotalPrice", "34,000".to_string())]);

        let text = render_template("[[10YrTotalPrice]] / [[10YrTotalPrice]]", &values).unwrap();

        assert_eq!(text, "34,000 / 34,000");
    }

    #[test]
    fn render_ignores_single_brackets() {
        let values = Placeholders::from([("Date", "today".to_string())]);

        assert_eq!(render_template("[Date] [[ Date ]]", &values).unwrap(), "[Date] [[ Date ]]");
    }
}
