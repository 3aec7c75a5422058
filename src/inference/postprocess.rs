//! Converts raw classifier scores into probabilities and a top class

use crate::utils::round_to;

/// Decimal places reported for each probability
pub const PROBABILITY_DECIMALS: i32 = 4;

/// Numerically stable softmax: the max score is subtracted before `exp`
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value. Ties resolve to the lowest index.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Probabilities rounded for the response, in class-index order
pub fn round_probabilities(probabilities: &[f32]) -> Vec<f32> {
    probabilities
        .iter()
        .map(|&p| round_to(p, PROBABILITY_DECIMALS))
        .collect()
}
