// Formatting utilities shared by the layout code

use crate::aggregator_core::TrendSignal;

/// Group digits in threes: 1234567 -> "1,234,567"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a KES amount for display
pub fn format_kes(amount: u64) -> String {
    format!("KES {}", format_count(amount))
}

/// Format a signed percentage for display
pub fn format_pct(pct: f64) -> String {
    format!("{:+.1}%", pct)
}

/// Human label for a trend signal
pub fn signal_label(signal: TrendSignal) -> &'static str {
    match signal {
        TrendSignal::Spike => "SPIKE ▲",
        TrendSignal::Drop => "DROP ▼",
        TrendSignal::Stable => "STABLE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_kes() {
        assert_eq!(format_kes(45000), "KES 45,000");
    }

    #[test]
    fn test_format_pct_keeps_sign() {
        assert_eq!(format_pct(60.0), "+60.0%");
        assert_eq!(format_pct(-60.0), "-60.0%");
    }
}
