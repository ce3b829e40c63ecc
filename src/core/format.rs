//! Display formatting for amounts and shares. Amounts are rounded to whole
//! rupees and grouped the Indian way (`12,34,567`); rounding happens here
//! and nowhere in the computation.

pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = amount.round();
    // Beyond 2^53 the integer digits are no longer exact; `{:.0}` still
    // renders every digit without exponent notation.
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_indian(&digits);
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_percent(percent: f64) -> String {
    if !percent.is_finite() {
        return "0.0".to_string();
    }
    let text = format!("{percent:.1}");
    if text == "-0.0" { "0.0".to_string() } else { text }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let lead = head.len() % 2;
    if lead > 0 {
        out.push_str(&head[..lead]);
    }
    for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
        if lead > 0 || i > 0 {
            out.push(',');
        }
        out.extend(pair.iter().map(|b| *b as char));
    }
    out.push(',');
    out.push_str(tail);
    out
}
