use crate::types::BudgetCategory;

/// Chart palette. Segment `i` uses `PALETTE[i % 5]`, so a sixth category repeats the first
/// color.
pub const PALETTE: [&str; 5] = ["#0ea5e9", "#22c55e", "#f59e0b", "#ef4444", "#8b5cf6"];

pub fn segment_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One budget category placed on the donut chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSegment {
    pub category: String,
    pub amount: f64,
    pub color: &'static str,
    /// Fraction of the total, `0.0` when the total is zero.
    pub share: f64,
    /// Sum of the shares of all preceding segments.
    pub offset: f64,
}

pub fn budget_segments(breakdown: &[BudgetCategory]) -> Vec<ChartSegment> {
    let total: f64 = breakdown.iter().map(|entry| entry.amount).sum();
    let mut offset = 0.0;

    breakdown
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let share = if total > 0.0 { entry.amount / total } else { 0.0 };
            let segment = ChartSegment {
                category: entry.category.clone(),
                amount: entry.amount,
                color: segment_color(index),
                share,
                offset,
            };
            offset += share;
            segment
        })
        .collect()
}

/// `¥` amount with thousands separators and at most two decimals, e.g. `¥3,100`.
pub fn format_cny(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match fraction {
        0 => format!("{sign}¥{grouped}"),
        f if f % 10 == 0 => format!("{sign}¥{grouped}.{}", f / 10),
        f => format!("{sign}¥{grouped}.{f:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(amounts: &[f64]) -> Vec<BudgetCategory> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| BudgetCategory {
                category: format!("c{i}"),
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn test_colors_cycle_modulo_palette() {
        let segments = budget_segments(&categories(&[1.0; 12]));
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.color, PALETTE[i % 5]);
        }
        assert_eq!(segments[5].color, segments[0].color);
    }

    #[test]
    fn test_shares_and_offsets() {
        let segments = budget_segments(&categories(&[2000.0, 800.0, 300.0]));
        let total_share: f64 = segments.iter().map(|s| s.share).sum();
        assert!((total_share - 1.0).abs() < 1e-9);
        assert_eq!(segments[0].offset, 0.0);
        assert!((segments[2].offset - 2800.0 / 3100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_is_safe() {
        let segments = budget_segments(&categories(&[0.0, 0.0]));
        assert!(segments.iter().all(|s| s.share == 0.0));
        assert!(budget_segments(&[]).is_empty());
    }

    #[test]
    fn test_format_cny() {
        assert_eq!(format_cny(3100.0), "¥3,100");
        assert_eq!(format_cny(0.0), "¥0");
        assert_eq!(format_cny(999.0), "¥999");
        assert_eq!(format_cny(1234567.5), "¥1,234,567.5");
        assert_eq!(format_cny(12.25), "¥12.25");
    }
}
