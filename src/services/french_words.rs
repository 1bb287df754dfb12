// src/services/french_words.rs

// Valores por extenso em francês, para a cláusula legal impressa na fatura.
// As tabelas abaixo são ortografia, não aritmética: não "simplificar".

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::services::totals::round2;

pub const LEGAL_CLAUSE_PREFIX: &str = "Arrêté la présente facture à la somme de : ";

const UNITS: [&str; 10] = ["", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf"];

const TEENS: [&str; 10] = [
    "dix", "onze", "douze", "treize", "quatorze", "quinze", "seize", "dix-sept", "dix-huit", "dix-neuf",
];

// Radicais de 20 a 69 (índice = dezena)
const TENS: [&str; 7] = ["", "dix", "vingt", "trente", "quarante", "cinquante", "soixante"];

const BILLION: u64 = 1_000_000_000;
const MILLION: u64 = 1_000_000;
const THOUSAND: u64 = 1_000;

/// Cardinal de um inteiro com sinal.
pub fn render(n: i64) -> String {
    if n < 0 {
        // unsigned_abs evita o overflow de -i64::MIN
        return format!("moins {}", render_unsigned(n.unsigned_abs()));
    }
    render_unsigned(n as u64)
}

fn render_unsigned(mut n: u64) -> String {
    if n == 0 {
        return "zéro".to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    if n >= BILLION {
        let billions = n / BILLION;
        n %= BILLION;
        if billions == 1 {
            parts.push("un milliard".to_string());
        } else {
            parts.push(format!("{} milliards", render_unsigned(billions)));
        }
    }

    if n >= MILLION {
        let millions = n / MILLION;
        n %= MILLION;
        if millions == 1 {
            parts.push("un million".to_string());
        } else {
            parts.push(format!("{} millions", render_unsigned(millions)));
        }
    }

    if n >= THOUSAND {
        let thousands = n / THOUSAND;
        n %= THOUSAND;
        // "mille" é invariável
        if thousands == 1 {
            parts.push("mille".to_string());
        } else {
            parts.push(format!("{} mille", render_unsigned(thousands)));
        }
    }

    if n > 0 {
        parts.push(render_below_thousand(n as usize));
    }

    parts.join(" ")
}

fn render_below_thousand(n: usize) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut parts: Vec<String> = Vec::new();
    match hundreds {
        0 => {}
        1 => parts.push("cent".to_string()),
        // "cents" só quando nada vem depois
        h if rest == 0 => parts.push(format!("{} cents", UNITS[h])),
        h => parts.push(format!("{} cent", UNITS[h])),
    }

    if rest > 0 {
        parts.push(render_below_hundred(rest));
    }

    parts.join(" ")
}

fn render_below_hundred(n: usize) -> String {
    let tens = n / 10;
    let units = n % 10;

    match n {
        1..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[units].to_string(),
        70..=79 if units == 1 => "soixante-et-onze".to_string(),
        70..=79 => format!("soixante-{}", TEENS[units]),
        80 => "quatre-vingts".to_string(),
        81..=89 => format!("quatre-vingt-{}", UNITS[units]),
        90..=99 => format!("quatre-vingt-{}", TEENS[units]),
        _ if units == 0 => TENS[tens].to_string(),
        _ if units == 1 => format!("{}-et-un", TENS[tens]),
        _ => format!("{}-{}", TENS[tens], UNITS[units]),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Cent vingt-et-un dirhams et cinq centimes". Sem cláusula de centimes quando zero.
///
/// O valor é arredondado a duas casas antes da separação. Retorna `None` quando a
/// parte inteira não cabe em `u64`; o valor nunca é truncado em silêncio.
pub fn amount_in_words(amount: Decimal) -> Option<String> {
    let amount = round2(amount);
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let amount = amount.abs();

    let whole = amount.trunc();
    let cents = ((amount - whole) * Decimal::ONE_HUNDRED).trunc();

    let whole = whole.to_u64()?;
    let cents = cents.to_u64()?;

    let words = render_unsigned(whole);
    let mut text = if negative {
        format!("Moins {} dirhams", words)
    } else {
        format!("{} dirhams", capitalize(&words))
    };
    if cents > 0 {
        text.push_str(&format!(" et {} centimes", render_unsigned(cents)));
    }
    Some(text)
}

/// Cláusula completa, como é gravada na fatura e impressa no documento.
pub fn legal_clause(amount: Decimal) -> Option<String> {
    amount_in_words(amount).map(|words| format!("{}{}", LEGAL_CLAUSE_PREFIX, words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn units_and_teens() {
        assert_eq!(render(0), "zéro");
        assert_eq!(render(1), "un");
        assert_eq!(render(9), "neuf");
        assert_eq!(render(10), "dix");
        assert_eq!(render(16), "seize");
        assert_eq!(render(17), "dix-sept");
        assert_eq!(render(19), "dix-neuf");
    }

    #[test]
    fn twenty_to_sixty_nine() {
        assert_eq!(render(20), "vingt");
        assert_eq!(render(21), "vingt-et-un");
        assert_eq!(render(22), "vingt-deux");
        assert_eq!(render(31), "trente-et-un");
        assert_eq!(render(45), "quarante-cinq");
        assert_eq!(render(59), "cinquante-neuf");
        assert_eq!(render(61), "soixante-et-un");
        assert_eq!(render(69), "soixante-neuf");
    }

    #[test]
    fn vigesimal_seventies_eighties_nineties() {
        assert_eq!(render(70), "soixante-dix");
        assert_eq!(render(71), "soixante-et-onze");
        assert_eq!(render(72), "soixante-douze");
        assert_eq!(render(79), "soixante-dix-neuf");
        assert_eq!(render(80), "quatre-vingts");
        assert_eq!(render(81), "quatre-vingt-un");
        assert_eq!(render(88), "quatre-vingt-huit");
        assert_eq!(render(90), "quatre-vingt-dix");
        assert_eq!(render(91), "quatre-vingt-onze");
        assert_eq!(render(99), "quatre-vingt-dix-neuf");
    }

    #[test]
    fn hundreds_pluralize_only_when_nothing_follows() {
        assert_eq!(render(100), "cent");
        assert_eq!(render(101), "cent un");
        assert_eq!(render(121), "cent vingt-et-un");
        assert_eq!(render(200), "deux cents");
        assert_eq!(render(201), "deux cent un");
        assert_eq!(render(380), "trois cent quatre-vingts");
        assert_eq!(render(999), "neuf cent quatre-vingt-dix-neuf");
    }

    #[test]
    fn large_magnitudes() {
        assert_eq!(render(1000), "mille");
        assert_eq!(render(1001), "mille un");
        assert_eq!(render(2000), "deux mille");
        assert_eq!(render(1_000_000), "un million");
        assert_eq!(render(2_500_000), "deux millions cinq cents mille");
        assert_eq!(render(1_000_000_000), "un milliard");
        assert_eq!(render(3_000_000_021), "trois milliards vingt-et-un");
        assert_eq!(render(15_780), "quinze mille sept cent quatre-vingts");
    }

    #[test]
    fn negatives_including_the_minimum() {
        assert_eq!(render(-5), "moins cinq");
        let min = render(i64::MIN);
        assert!(min.starts_with("moins neuf milliards"));
        assert!(min.ends_with("huit cent huit"));
    }

    #[test]
    fn zero_amount_has_no_centimes_clause() {
        let text = amount_in_words(Decimal::ZERO).unwrap();
        assert_eq!(text, "Zéro dirhams");
        assert!(text.to_lowercase().contains("zéro dirhams"));
        assert!(!text.contains("centimes"));
    }

    #[test]
    fn whole_part_is_capitalized() {
        assert_eq!(amount_in_words(dec!(121.00)).as_deref(), Some("Cent vingt-et-un dirhams"));
        assert_eq!(amount_in_words(dec!(80.00)).as_deref(), Some("Quatre-vingts dirhams"));
        assert_eq!(amount_in_words(dec!(81.00)).as_deref(), Some("Quatre-vingt-un dirhams"));
    }

    #[test]
    fn centimes_clause() {
        assert_eq!(
            amount_in_words(dec!(71.05)).as_deref(),
            Some("Soixante-et-onze dirhams et cinq centimes")
        );
        assert_eq!(
            amount_in_words(dec!(1200.80)).as_deref(),
            Some("Mille deux cents dirhams et quatre-vingts centimes")
        );
        assert_eq!(amount_in_words(dec!(0.5)).as_deref(), Some("Zéro dirhams et cinquante centimes"));
    }

    #[test]
    fn sign_is_kept_below_one() {
        assert_eq!(
            amount_in_words(dec!(-0.50)).as_deref(),
            Some("Moins zéro dirhams et cinquante centimes")
        );
        assert_eq!(amount_in_words(dec!(-12)).as_deref(), Some("Moins douze dirhams"));
    }

    #[test]
    fn amounts_beyond_u64_are_refused() {
        assert_eq!(amount_in_words(dec!(100000000000000000000)), None);
        assert!(amount_in_words(Decimal::from(u64::MAX)).is_some());
        assert_eq!(legal_clause(Decimal::MAX), None);
    }

    #[test]
    fn legal_clause_prefixes_the_phrase() {
        assert_eq!(
            legal_clause(dec!(120.00)).as_deref(),
            Some("Arrêté la présente facture à la somme de : Cent vingt dirhams")
        );
    }
}
