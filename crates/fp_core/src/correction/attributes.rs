//! Attribute coherence
//!
//! A player rated 85 overall with no attribute near 85 looks wrong. Points are
//! redistributed until enough attributes reach the overall rating.

use crate::config::AttributeConfig;

pub const ATTRIBUTE_COUNT: usize = 6;

fn at_or_above(values: &[f64; ATTRIBUTE_COUNT], overall: f64) -> usize {
    values.iter().filter(|v| **v >= overall).count()
}

/// Indices below `overall`, closest first. Ties keep attribute order.
fn below_by_gap(values: &[f64; ATTRIBUTE_COUNT], overall: f64) -> Vec<usize> {
    let mut below: Vec<usize> = (0..ATTRIBUTE_COUNT).filter(|&i| values[i] < overall).collect();
    below.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    below
}

fn budget(gaps: &[f64], missing: usize, cfg: &AttributeConfig) -> f64 {
    if missing <= 1 {
        return gaps.first().copied().unwrap_or(0.0).ceil();
    }
    let closest: f64 = gaps.iter().take(missing).sum();
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let boost = 1.0 + (avg_gap / cfg.boost_divisor).powf(cfg.boost_exponent) * cfg.boost_weight;
    (closest * cfg.budget_scale * boost).ceil()
}

/// Values are in attribute order. Non-finite entries must be replaced
/// before calling.
pub fn fix_attributes(
    mut values: [f64; ATTRIBUTE_COUNT],
    overall: f64,
    cfg: &AttributeConfig,
) -> [f64; ATTRIBUTE_COUNT] {
    let required = cfg.required_at_or_above.min(ATTRIBUTE_COUNT);
    let reached = at_or_above(&values, overall);
    if reached >= required {
        return values;
    }

    let below = below_by_gap(&values, overall);
    let missing = (required - reached).min(below.len());
    let gaps: Vec<f64> = below.iter().map(|&i| overall - values[i]).collect();

    let mut remaining = budget(&gaps, missing, cfg);
    let mut priority: Vec<usize> = below[..missing].to_vec();
    let others: Vec<usize> = below[missing..].to_vec();

    while remaining > 0.0 && at_or_above(&values, overall) < required {
        let mut spent = 0.0;

        for &i in &priority {
            let points = cfg.priority_points.min(remaining - spent);
            if points <= 0.0 {
                break;
            }
            values[i] += points;
            spent += points;
        }
        priority.retain(|&i| values[i] < overall);

        if at_or_above(&values, overall) < required {
            for &i in &others {
                if values[i] >= overall {
                    continue;
                }
                let points = cfg.other_points.min(remaining - spent);
                if points <= 0.0 {
                    break;
                }
                values[i] += points;
                spent += points;
            }
        }

        if spent <= 0.0 {
            break;
        }
        remaining -= spent;
    }

    // budget exhausted: lift the closest remaining attributes
    let short = required.saturating_sub(at_or_above(&values, overall));
    for i in below_by_gap(&values, overall).into_iter().take(short) {
        values[i] = overall;
    }

    values
}
