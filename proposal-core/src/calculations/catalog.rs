//! Fixed lookup tables keyed by roof type and product.
//!
//! | Roof type        | Price 10/15/20 | Gaco coverage    | Uniflex coverage |
//! |------------------|----------------|------------------|------------------|
//! | TPO/EPDM         | 330/370/410    | 1.25/1.75/2.25   | 1.5/2.0/2.5      |
//! | Metal            | 335/375/415    | 1.25/1.75/2.25   | 1.5/2.0/2.5      |
//! | Mod Bit          | 340/380/420    | 1.25/1.75/2.25   | 1.5/2.0/2.5      |
//! | Ballasted 60 mil | 480/520/560    | 2.5/3.25/3.75    | 3.0/3.5/4.0      |
//! | Ballasted 45 mil | 575/615/655    | 3.0/4.5/5.5      | 3.5/5.0/6.0      |
//! | Rock/Foam/Coat   | 690/730/770    | 1.25/1.75/2.25   | 1.5/2.0/2.5      |
//!
//! Coverage factors are gallons per five squares. Unknown roof types or
//! products resolve to zero in both tables.

use rust_decimal::Decimal;

use crate::models::{Product, RoofType, TierValues};

const fn hundredths(
    ten: u32,
    fifteen: u32,
    twenty: u32,
) -> TierValues<Decimal> {
    TierValues::new(
        Decimal::from_parts(ten, 0, 0, false, 2),
        Decimal::from_parts(fifteen, 0, 0, false, 2),
        Decimal::from_parts(twenty, 0, 0, false, 2),
    )
}

/// Base per-square selling price for each tier.
pub fn base_square_prices(roof: &RoofType) -> TierValues<Decimal> {
    let (ten, fifteen, twenty): (i64, i64, i64) = match roof {
        RoofType::TpoEpdm => (330, 370, 410),
        RoofType::Metal => (335, 375, 415),
        RoofType::ModBit => (340, 380, 420),
        RoofType::Ballasted60Mil => (480, 520, 560),
        RoofType::Ballasted45Mil => (575, 615, 655),
        RoofType::RockFoamCoat => (690, 730, 770),
        RoofType::Other(_) => (0, 0, 0),
    };
    TierValues::new(ten, fifteen, twenty).map(Decimal::from)
}

/// Unadjusted coverage factors for a product on a roof type.
pub fn coverage_factors(
    product: Option<Product>,
    roof: &RoofType,
) -> TierValues<Decimal> {
    let Some(product) = product else {
        return TierValues::splat(Decimal::ZERO);
    };
    match (product, roof) {
        (_, RoofType::Other(_)) => TierValues::splat(Decimal::ZERO),
        (Product::Gaco, RoofType::Ballasted60Mil) => hundredths(250, 325, 375),
        (Product::Gaco, RoofType::Ballasted45Mil) => hundredths(300, 450, 550),
        (Product::Gaco, _) => hundredths(125, 175, 225),
        (Product::Uniflex, RoofType::Ballasted60Mil) => hundredths(300, 350, 400),
        (Product::Uniflex, RoofType::Ballasted45Mil) => hundredths(350, 500, 600),
        (Product::Uniflex, _) => hundredths(150, 200, 250),
    }
}
