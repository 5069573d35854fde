/// Rounds half up, the way the calendar has always rounded money and amounts.
/// NaN and infinities collapse to 0.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Whole-dollar display with thousands separators, e.g. `$12,345`.
pub fn money(value: f64) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < 0 { "-" } else { "" };
    format!("${}{}", sign, group_thousands(rounded.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(3.7), 4);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(f64::NAN), 0);
        assert_eq!(round_half_up(f64::INFINITY), 0);
    }

    #[test]
    fn test_round_half_up_near_representable_limits() {
        // Largest double below 0.5; adding 0.5 first would round it up to 1.
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(-0.49999999999999994), 0);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497);
        assert_eq!(round_half_up(-4503599627370497.0), -4503599627370497);
    }

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "$0");
        assert_eq!(money(999.4), "$999");
        assert_eq!(money(1000.0), "$1,000");
        assert_eq!(money(1234567.5), "$1,234,568");
        assert_eq!(money(-1500.0), "$-1,500");
        assert_eq!(money(f64::NAN), "$0");
    }
}
