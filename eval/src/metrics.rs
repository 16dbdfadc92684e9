//! Rank metrics over graded relevance. `rels[i]` is the judged relevance of
//! the document retrieved at rank `i + 1`, zero when unjudged.

pub fn precision_at_k(rels: &[f64], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = rels.iter().take(k).filter(|&&r| r > 0.0).count();
    hits as f64 / k as f64
}

fn gain(rel: f64) -> f64 {
    rel.exp2() - 1.0
}

pub fn dcg_at_k(rels: &[f64], k: usize) -> f64 {
    rels.iter()
        .take(k)
        .enumerate()
        .map(|(i, &r)| gain(r) / ((i + 2) as f64).log2())
        .sum()
}

/// The ideal ordering is the retrieved documents re-sorted by relevance, so
/// judged documents that were never retrieved do not lower the score.
pub fn ndcg_at_k(rels: &[f64], k: usize) -> f64 {
    let mut ideal = rels.to_vec();
    ideal.sort_unstable_by(|a, b| b.total_cmp(a));
    let idcg = dcg_at_k(&ideal, k);
    if idcg == 0.0 {
        return 0.0;
    }
    dcg_at_k(rels, k) / idcg
}

/// Expected reciprocal rank, with stop probabilities scaled by the highest
/// grade among the retrieved documents.
pub fn err_at_k(rels: &[f64], k: usize) -> f64 {
    let max = rels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut err = 0.0;
    let mut p = 1.0;
    for (i, &r) in rels.iter().take(k).enumerate() {
        let stop = gain(r) / max.exp2();
        err += p * stop / (i + 1) as f64;
        p *= 1.0 - stop;
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn precision_divides_by_k_not_by_retrieved() {
        let rels = [1.0, 0.0, 2.0];
        assert!(close(precision_at_k(&rels, 1), 1.0));
        assert!(close(precision_at_k(&rels, 3), 2.0 / 3.0));
        assert!(close(precision_at_k(&rels, 10), 0.2));
        assert_eq!(precision_at_k(&rels, 0), 0.0);
    }

    #[test]
    fn ndcg_is_one_for_ideal_order() {
        assert!(close(ndcg_at_k(&[2.0, 1.0, 0.0], 3), 1.0));
        assert_eq!(ndcg_at_k(&[0.0, 0.0], 5), 0.0);
        assert_eq!(ndcg_at_k(&[], 5), 0.0);
    }

    #[test]
    fn ndcg_penalizes_inversions() {
        // dcg = 1/1 + 3/log2(3), idcg = 3/1 + 1/log2(3)
        let expected = (1.0 + 3.0 / 3f64.log2()) / (3.0 + 1.0 / 3f64.log2());
        assert!(close(ndcg_at_k(&[1.0, 2.0], 2), expected));
    }

    #[test]
    fn err_discounts_later_ranks() {
        // a top-grade document stops the scan with probability 3/4
        assert!(close(err_at_k(&[2.0, 2.0, 1.0], 3), 0.75 + 0.25 * 0.75 / 2.0 + 0.25 * 0.25 * 0.25 / 3.0));
        assert!(close(err_at_k(&[1.0], 1), 0.5));
        assert_eq!(err_at_k(&[0.0, 0.0], 2), 0.0);
        assert_eq!(err_at_k(&[], 3), 0.0);
    }
}
