//! Recalculation pipeline for roof-coating proposals.
//!
//! Each revision runs the same ordered steps: change detection, labor days,
//! per-square prices, silicone, the single line items, labor, warranty, office
//! fee and commission, then aggregation into cost and profit figures. The
//! [`ProposalEngine`] drives them; the step modules are public so callers can
//! reuse individual rules.

pub mod aggregation;
pub mod catalog;
pub mod common;
mod engine;
pub mod line_items;
pub mod pricing;
pub mod rate_card;
pub mod resolve;

pub use engine::ProposalEngine;
pub use rate_card::{RateCard, RateCardError, WarrantyRates};
