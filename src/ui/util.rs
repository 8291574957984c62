use rust_decimal::Decimal;
use std::str::FromStr;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Parse a user-entered money amount. Only positive finite decimals pass;
/// anything else (garbage, zero, negatives) is `None`.
pub(crate) fn parse_amount(input: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(input.trim()).ok()?;
    if amount > Decimal::ZERO {
        Some(amount)
    } else {
        None
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Keep a list cursor visible within a page of `page` rows.
pub(crate) fn clamp_scroll(index: usize, scroll: &mut usize, page: usize) {
    let page = page.max(1);
    if index < *scroll {
        *scroll = index;
    } else if index >= *scroll + page {
        *scroll = index + 1 - page;
    }
}
