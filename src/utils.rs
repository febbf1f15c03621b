use itertools::Itertools;

/// Formats whole seconds as `{h}h{m}m{s}s`, e.g. `1h2m5s`.
pub fn format_duration_hms(duration_secs: f64) -> String {
    let total = duration_secs.max(0.).floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    format!("{h}h{m}m{s}s")
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `(min, max)` over the values, `None` for an empty iterator.
pub fn min_max<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
}
