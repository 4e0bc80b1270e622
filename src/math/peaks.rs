//! 1-D peak detection with prominence and minimum-distance gating.

/// Indices of retained peaks in `xs`, in ascending order.
///
/// A candidate is a strict local maximum (`xs[i-1] < xs[i] > xs[i+1]`,
/// `1 <= i <= len-2`). Candidates survive two gates:
///
/// - prominence — the smaller of the drops from the peak down to the lowest
///   value seen while walking left/right until a strictly higher sample or
///   the array edge — must be at least `min_prominence`;
/// - when two survivors are closer than `min_distance` bins, only the taller
///   is kept (ties keep the earlier index).
///
/// Inputs shorter than three samples have no interior and yield nothing.
pub fn find_peaks(xs: &[f64], min_prominence: f64, min_distance: usize) -> Vec<usize> {
    if xs.len() < 3 {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = Vec::new();
    for i in 1..xs.len() - 1 {
        if xs[i - 1] < xs[i] && xs[i + 1] < xs[i] {
            candidates.push(i);
        }
    }
    candidates.retain(|&i| prominence(xs, i) >= min_prominence);

    if min_distance > 1 && candidates.len() > 1 {
        // Tallest first; ties resolved toward the earlier index.
        let mut by_height = candidates.clone();
        by_height.sort_by(|&a, &b| xs[b].total_cmp(&xs[a]).then(a.cmp(&b)));

        let mut kept: Vec<usize> = Vec::with_capacity(by_height.len());
        for i in by_height {
            if kept.iter().all(|&j| i.abs_diff(j) >= min_distance) {
                kept.push(i);
            }
        }
        kept.sort_unstable();
        return kept;
    }

    candidates
}

/// Vertical drop from `xs[i]` to the highest saddle separating it from any
/// taller sample (or the array edge), per side; the prominence is the
/// smaller of the two drops.
fn prominence(xs: &[f64], i: usize) -> f64 {
    let peak = xs[i];

    let mut left_min = peak;
    for &x in xs[..i].iter().rev() {
        if x > peak {
            break;
        }
        left_min = left_min.min(x);
    }

    let mut right_min = peak;
    for &x in &xs[i + 1..] {
        if x > peak {
            break;
        }
        right_min = right_min.min(x);
    }

    (peak - left_min).min(peak - right_min)
}
