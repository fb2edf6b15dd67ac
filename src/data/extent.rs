//! Axis bounds derived from pipeline output, so the viewer never computes
//! them itself.

/// `(min, max)` over the finite values, or `None` if there are none.
pub fn value_extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Upper axis bound: the largest value times `factor`. An empty input or
/// a zero maximum falls back to `1.0` before scaling so the axis never
/// collapses.
pub fn padded_max<I>(values: I, factor: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let max = value_extent(values)
        .map(|(_, hi)| hi)
        .filter(|hi| *hi != 0.0)
        .unwrap_or(1.0);
    max * factor
}
