#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(4.5)), "$4.50");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(-42.99)), "-$42.99");
}

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("12.50"), Some(dec!(12.50)));
    assert_eq!(parse_amount("  99 "), Some(dec!(99)));
    assert_eq!(parse_amount("0"), None);
    assert_eq!(parse_amount("-5"), None);
    assert_eq!(parse_amount("abc"), None);
    assert_eq!(parse_amount(""), None);
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("a longer string", 7), "a long…");
    assert_eq!(truncate("héllo wörld", 6), "héllo…");
    assert_eq!(truncate("anything", 0), "");
}

#[test]
fn test_clamp_scroll() {
    let mut scroll = 0;
    clamp_scroll(5, &mut scroll, 10);
    assert_eq!(scroll, 0);

    clamp_scroll(12, &mut scroll, 10);
    assert_eq!(scroll, 3);

    clamp_scroll(1, &mut scroll, 10);
    assert_eq!(scroll, 1);

    // Zero-height pages clamp to one row
    let mut scroll = 0;
    clamp_scroll(3, &mut scroll, 0);
    assert_eq!(scroll, 3);
}
