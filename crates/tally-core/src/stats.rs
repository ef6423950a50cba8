//! Central-tendency helpers over monthly samples.

use rust_decimal::Decimal;

use tally_domain::MonthlyBucket;

/// Statistical median of `values`, or `None` for an empty sample.
///
/// The sample is sorted here; callers may pass values in any order.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(midpoint(sorted[mid - 1], sorted[mid]))
    }
}

/// Mean of `low <= high` without overflowing near `Decimal::MAX`.
fn midpoint(low: Decimal, high: Decimal) -> Decimal {
    match low.checked_add(high) {
        Some(sum) => sum / Decimal::TWO,
        // Only same-signed operands overflow, and then the gap always fits.
        None => low + (high - low) / Decimal::TWO,
    }
}

/// Median of the bucket sums; zero when there is no history.
pub fn median_of_buckets(buckets: &[MonthlyBucket]) -> Decimal {
    let sums: Vec<Decimal> = buckets.iter().map(|bucket| bucket.sum).collect();
    median(&sums).unwrap_or(Decimal::ZERO)
}
