// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// ICE marocain: identificador fixo de 15 caracteres.
pub const TAX_ID_LENGTH: usize = 15;

/// Maior preço unitário que cabe em NUMERIC(12, 2): 9 999 999 999.99
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Maior valor que cabe nas colunas de total, NUMERIC(14, 2): 999 999 999 999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_unit_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    if *val > MAX_UNIT_PRICE {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_UNIT_PRICE.to_string());
        err.message = Some("O preço unitário excede o máximo permitido.".into());
        return Err(err);
    }
    Ok(())
}

/// Retorna o comprimento recebido quando o ICE não tem exatamente 15 caracteres.
pub fn check_tax_id(tax_id: &str) -> Result<(), usize> {
    let length = tax_id.trim().chars().count();
    if length != TAX_ID_LENGTH {
        return Err(length);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_zero_is_accepted() {
        let mut negative_zero = Decimal::new(0, 2);
        negative_zero.set_sign_negative(true);
        assert!(negative_zero.is_sign_negative());

        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&negative_zero).is_ok());
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn column_limits() {
        assert_eq!(MAX_UNIT_PRICE, dec!(9999999999.99));
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
    }

    #[test]
    fn unit_price_has_both_bounds() {
        assert!(validate_unit_price(&dec!(0)).is_ok());
        assert!(validate_unit_price(&MAX_UNIT_PRICE).is_ok());
        assert!(validate_unit_price(&dec!(10000000000.00)).is_err());
        assert!(validate_unit_price(&Decimal::MAX).is_err());
        assert!(validate_unit_price(&dec!(-0.01)).is_err());
    }

    #[test]
    fn tax_id_must_have_fifteen_characters() {
        assert_eq!(check_tax_id("001234567000089"), Ok(()));
        assert_eq!(check_tax_id(" 001234567000089 "), Ok(()));
        assert_eq!(check_tax_id("12345"), Err(5));
        assert_eq!(check_tax_id(""), Err(0));
    }
}
