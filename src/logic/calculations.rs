/// Arithmetic mean, `None` for an empty series
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Least-squares slope of `values` against their index position (0, 1, 2, ...).
///
/// The slope is taken in the order the slice is given. For a newest-first
/// series a negative slope means the values get smaller toward older data.
/// Series shorter than 2 have no trend and yield 0.0.
pub fn linear_trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    num / den
}

/// Weighted average with weights normalized to sum to 1.
///
/// Values and weights are paired positionally; extra entries on either side
/// are ignored. Returns `None` when the paired weights sum to zero.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> Option<f64> {
    let pairs = values.len().min(weights.len());
    let total: f64 = weights[..pairs].iter().sum();

    if pairs == 0 || total == 0.0 {
        return None;
    }

    Some(
        values[..pairs]
            .iter()
            .zip(&weights[..pairs])
            .map(|(v, w)| v * (w / total))
            .sum(),
    )
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
