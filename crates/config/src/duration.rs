//! Duration strings: a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix, such as `5s`, `1m30s`, `1.5h` or `300ms`.
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0`
//! needs no unit. Negative durations are rejected.

use std::time::Duration;

const UNITS: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

pub(crate) fn parse(input: &str) -> Option<Duration> {
    let input = input.trim();
    let input = input.strip_prefix('+').unwrap_or(input);
    if input == "0" {
        return Some(Duration::ZERO);
    }
    if input.is_empty() {
        return None;
    }
    let mut rest = input;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let unit_len = tail.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let (_, factor) = UNITS.iter().find(|(name, _)| *name == unit)?;

        let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut nanos = whole.checked_mul(*factor)?;
        if !fraction.is_empty() {
            // Digits past nanosecond precision are dropped.
            let fraction = &fraction[..fraction.len().min(18)];
            let scale = 10u128.pow(u32::try_from(fraction.len()).ok()?);
            let digits: u128 = fraction.parse().ok()?;
            nanos = nanos.checked_add(digits.checked_mul(*factor)? / scale)?;
        }
        total = total.checked_add(nanos)?;
        rest = tail;
    }
    u64::try_from(total).ok().map(Duration::from_nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5s", Some(Duration::from_secs(5)))]
    #[case("250ms", Some(Duration::from_millis(250)))]
    #[case("1m30s", Some(Duration::from_secs(90)))]
    #[case("2h", Some(Duration::from_secs(7200)))]
    #[case("0", Some(Duration::ZERO))]
    #[case(" 10s ", Some(Duration::from_secs(10)))]
    #[case("+10s", Some(Duration::from_secs(10)))]
    #[case("1.5s", Some(Duration::from_millis(1500)))]
    #[case(".5s", Some(Duration::from_millis(500)))]
    #[case("1.5h", Some(Duration::from_secs(5400)))]
    #[case("1h2m3.25s", Some(Duration::from_millis(3_723_250)))]
    #[case("300us", Some(Duration::from_micros(300)))]
    #[case("300µs", Some(Duration::from_micros(300)))]
    #[case("10ns", Some(Duration::from_nanos(10)))]
    #[case("0.0000000001s", Some(Duration::ZERO))]
    #[case("5", None)]
    #[case("s", None)]
    #[case(".s", None)]
    #[case("1..5s", None)]
    #[case("5d", None)]
    #[case("-5s", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<Duration>) {
        assert_eq!(parse(input), expected);
    }
}
