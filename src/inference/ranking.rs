//! Top-K selection over a probability vector

/// Indices of the `k` highest probabilities, best first.
///
/// Returns `min(k, probs.len())` pairs. The sort is stable, so equal
/// probabilities keep ascending index order.
pub fn top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

    order
        .into_iter()
        .take(k)
        .map(|i| (i, probs[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_order() {
        let probs = [0.05, 0.6, 0.1, 0.25];
        let top = top_k(&probs, 3);
        assert_eq!(top, vec![(1, 0.6), (3, 0.25), (2, 0.1)]);
    }

    #[test]
    fn test_k_larger_than_len() {
        let probs = [0.3, 0.7];
        let top = top_k(&probs, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 1);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let probs = [0.2, 0.4, 0.2, 0.4];
        let top = top_k(&probs, 4);
        let indices: Vec<usize> = top.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_empty() {
        assert!(top_k(&[], 5).is_empty());
        assert!(top_k(&[0.5], 0).is_empty());
    }
}
