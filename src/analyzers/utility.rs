/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Index and value of the largest element. Ties resolve to the earliest index.
pub fn first_max(values: &[usize]) -> Option<(usize, usize)> {
    first_extreme(values, |candidate, best| candidate > best)
}

/// Index and value of the smallest element. Ties resolve to the earliest index.
pub fn first_min(values: &[usize]) -> Option<(usize, usize)> {
    first_extreme(values, |candidate, best| candidate < best)
}

fn first_extreme(
    values: &[usize],
    beats: impl Fn(usize, usize) -> bool,
) -> Option<(usize, usize)> {
    let mut iter = values.iter().copied().enumerate();
    let mut best = iter.next()?;
    for (idx, value) in iter {
        // strict comparison keeps the first of equal values
        if beats(value, best.1) {
            best = (idx, value);
        }
    }
    Some(best)
}
