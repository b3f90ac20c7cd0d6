/// Whole-number percentage, `0` when there is nothing to divide by.
pub fn percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as u32
}

pub(crate) fn percentage_pair(numerators: [u32; 2], denominators: [u32; 2]) -> [u32; 2] {
    [
        percentage(numerators[0], denominators[0]),
        percentage(numerators[1], denominators[1]),
    ]
}

/// Winners per unforced error, two decimals. With no errors the raw winner
/// count is returned instead of an infinite ratio.
pub fn winner_to_error_ratio(winners: u32, errors: u32) -> f64 {
    if errors == 0 {
        return winners as f64;
    }
    (winners as f64 / errors as f64 * 100.0).round() / 100.0
}
