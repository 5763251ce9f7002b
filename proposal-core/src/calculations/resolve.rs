//! Change detection and the reset-or-preserve rule.
//!
//! Every editable field has a set of trigger fields. When any trigger differs
//! between the current and previous snapshots, or the field itself is blank,
//! the field is recomputed from its business rule. Otherwise the caller's
//! value is kept verbatim.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{almost_equal, is_blank};
use crate::models::{PreviousInputs, ProposalInputs};

/// A field whose change can force dependent fields to recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Product,
    RoofType,
    Squares,
    AdjustedCoverage,
    SubmittedBy,
}

/// Which trigger fields differ between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub product: bool,
    pub roof_type: bool,
    pub squares: bool,
    pub adjusted_coverage: bool,
    pub submitted_by: bool,
}

impl Changes {
    /// Compares the current snapshot against the previous one.
    ///
    /// Numeric fields are compared within the change tolerance; a blank
    /// adjusted coverage counts as zero.
    pub fn detect(
        current: &ProposalInputs,
        previous: &PreviousInputs,
    ) -> Self {
        let changes = Self {
            product: current.product != previous.product,
            roof_type: current.roof_type != previous.roof_type,
            squares: !almost_equal(current.squares, previous.squares),
            adjusted_coverage: !almost_equal(
                current.adjusted_coverage.unwrap_or(Decimal::ZERO),
                previous.adjusted_coverage,
            ),
            submitted_by: current.submitted_by != previous.submitted_by,
        };
        debug!(?changes, "detected trigger changes");
        changes
    }

    pub fn changed(
        &self,
        trigger: Trigger,
    ) -> bool {
        match trigger {
            Trigger::Product => self.product,
            Trigger::RoofType => self.roof_type,
            Trigger::Squares => self.squares,
            Trigger::AdjustedCoverage => self.adjusted_coverage,
            Trigger::SubmittedBy => self.submitted_by,
        }
    }

    /// `true` when any of `triggers` changed.
    pub fn any(
        &self,
        triggers: &[Trigger],
    ) -> bool {
        triggers.iter().any(|t| self.changed(*t))
    }
}

/// Returns `base()` when a trigger changed or `current` is blank; otherwise
/// the caller's value unchanged.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::resolve::resolve_field;
///
/// // Unchanged triggers keep the override.
/// assert_eq!(resolve_field(Some(dec!(7)), false, || dec!(5)), dec!(7));
/// // A trigger change discards it.
/// assert_eq!(resolve_field(Some(dec!(7)), true, || dec!(5)), dec!(5));
/// // Blank or zero entries are recomputed.
/// assert_eq!(resolve_field(None, false, || dec!(5)), dec!(5));
/// assert_eq!(resolve_field(Some(dec!(0)), false, || dec!(5)), dec!(5));
/// ```
pub fn resolve_field(
    current: Option<Decimal>,
    triggered: bool,
    base: impl FnOnce() -> Decimal,
) -> Decimal {
    match current {
        Some(value) if !triggered && !is_blank(current) => value,
        _ => base(),
    }
}
