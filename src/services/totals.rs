// src/services/totals.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::invoice::Totals;

/// TVA marroquina padrão, 20%: TTC = HT * 1.20
pub const TAX_FACTOR: Decimal = Decimal::from_parts(120, 0, 0, false, 2);

/// Duas casas, meio para longe do zero (0.005 -> 0.01, -0.005 -> -0.01).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Cálculo reverso a partir do TTC.
///
/// O imposto é o resto depois de arredondar o HT, e não 20% do HT arredondado
/// separadamente: `ht + tax == ttc` vale sempre, com até 0.01 de diferença
/// em relação ao cálculo ingênuo da taxa.
pub fn compute_totals(ttc: Decimal) -> Totals {
    let ttc = round2(ttc);
    let ht = round2(ttc / TAX_FACTOR);
    let tax = round2(ttc - ht);
    Totals { ht, tax, ttc }
}

/// `None` quando o produto não cabe num `Decimal`.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price).map(round2)
}

/// Soma dos totais de linha; `None` em overflow.
pub fn sum_lines<I>(totals: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    totals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(total))
}
