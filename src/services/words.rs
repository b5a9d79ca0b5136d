// src/services/words.rs
//
// English amount-in-words using the Indian numbering system
// (hundred, thousand, lakh, crore). Used for the "Amount in Words" field on
// the printed invoice.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

// 100 crore; amounts at or above this have no representation here.
const MAX_RUPEES: u64 = 1_000_000_000;

/// Renders an amount as Indian-convention currency words, e.g.
/// `2360` -> "Two Thousand Three Hundred Sixty Rupees Only".
///
/// Returns `None` for negative amounts and for amounts of 100 crore rupees
/// or more; the caller degrades to an empty field in that case.
pub fn rupees_in_words(amount: Decimal) -> Option<String> {
    if amount.is_sign_negative() {
        return None;
    }

    let amount = amount.round_dp(2);
    let rupees = amount.trunc().to_u64()?;
    let paise = ((amount - amount.trunc()) * Decimal::ONE_HUNDRED)
        .round()
        .to_u64()?;

    if rupees >= MAX_RUPEES {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();

    if rupees > 0 {
        let mut rupee_words = Vec::new();
        push_group(&mut rupee_words, rupees / 10_000_000, "Crore");
        push_group(&mut rupee_words, (rupees / 100_000) % 100, "Lakh");
        push_group(&mut rupee_words, (rupees / 1_000) % 100, "Thousand");
        let rest = rupees % 1_000;
        if rest > 0 {
            rupee_words.push(below_thousand(rest));
        }
        parts.push(format!("{} Rupees", rupee_words.join(" ")));
    } else if paise == 0 {
        parts.push("Zero Rupees".to_string());
    }

    if paise > 0 {
        let words = format!("{} Paise", below_thousand(paise));
        if parts.is_empty() {
            parts.push(words);
        } else {
            parts.push(format!("and {words}"));
        }
    }

    Some(format!("{} Only", parts.join(" ")))
}

fn push_group(words: &mut Vec<String>, count: u64, scale: &str) {
    if count > 0 {
        words.push(format!("{} {scale}", below_hundred(count)));
    }
}

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}
