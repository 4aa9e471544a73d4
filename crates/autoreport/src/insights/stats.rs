//! Association statistics used by the insights stage.
//!
//! Every function returns `None` when the statistic is undefined for its
//! input (too few observations, zero variance, degenerate tables).

use indexmap::IndexSet;

// ── Pearson ─────────────────────────────────────────────────────────

/// Pearson product-moment correlation of two equally long samples.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

// ── Chi-squared / Cramér's V ────────────────────────────────────────

/// Pearson chi-squared statistic of a flat row-major contingency table,
/// without continuity correction.
pub fn chi_squared(table: &[f64], n_rows: usize, n_cols: usize) -> Option<f64> {
    if n_rows == 0 || n_cols == 0 || table.len() != n_rows * n_cols {
        return None;
    }

    let n: f64 = table.iter().sum();
    if n <= 0.0 {
        return None;
    }

    let row_sums: Vec<f64> = table.chunks(n_cols).map(|r| r.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..n_cols)
        .map(|c| (0..n_rows).map(|r| table[r * n_cols + c]).sum())
        .collect();

    let mut stat = 0.0;
    for r in 0..n_rows {
        for c in 0..n_cols {
            let expected = row_sums[r] * col_sums[c] / n;
            if expected > 0.0 {
                let diff = table[r * n_cols + c] - expected;
                stat += diff * diff / expected;
            }
        }
    }
    Some(stat)
}

/// Bias-corrected Cramér's V (Bergsma 2013) of a flat row-major table.
///
/// Undefined when either side has fewer than two levels or the corrected
/// denominator is not positive.
pub fn cramers_v(table: &[f64], n_rows: usize, n_cols: usize) -> Option<f64> {
    if n_rows < 2 || n_cols < 2 {
        return None;
    }
    let chi2 = chi_squared(table, n_rows, n_cols)?;
    let n: f64 = table.iter().sum();
    if n <= 1.0 {
        return None;
    }

    let r = n_rows as f64;
    let k = n_cols as f64;
    let phi2 = chi2 / n;
    let phi2_corr = (phi2 - (k - 1.0) * (r - 1.0) / (n - 1.0)).max(0.0);
    let r_corr = r - (r - 1.0).powi(2) / (n - 1.0);
    let k_corr = k - (k - 1.0).powi(2) / (n - 1.0);
    let denom = (k_corr - 1.0).min(r_corr - 1.0);

    if denom > 0.0 {
        Some((phi2_corr / denom).sqrt())
    } else {
        None
    }
}

// ── Mixed ───────────────────────────────────────────────────────────

/// Largest absolute Pearson correlation between a one-hot indicator of each
/// category and the numeric sample.
///
/// Levels whose indicator is constant contribute nothing.
pub fn max_dummy_correlation(categories: &[&str], numbers: &[f64]) -> Option<f64> {
    if categories.len() != numbers.len() {
        return None;
    }

    let levels: IndexSet<&str> = categories.iter().copied().collect();
    levels
        .iter()
        .filter_map(|level| {
            let indicator: Vec<f64> = categories
                .iter()
                .map(|c| if c == level { 1.0 } else { 0.0 })
                .collect();
            pearson(&indicator, numbers)
        })
        .map(f64::abs)
        .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r))))
}
