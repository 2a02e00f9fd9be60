use rand::Rng;

/// Draw up to `k` distinct members of `pop`, each step picking from what is
/// left with probability proportional to its weight.
///
/// Negative weights count as zero. When the remaining weight is exhausted the
/// draw falls back to uniform over the remaining pool. A `weights` slice
/// shorter than `pop` treats the missing weights as zero.
pub fn weighted_sample_without_replacement<T, R>(pop: &[T], weights: &[f64], k: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut pool: Vec<usize> = (0..pop.len()).collect();
    let mut w: Vec<f64> = (0..pop.len())
        .map(|i| weights.get(i).copied().unwrap_or(0.0).max(0.0))
        .collect();

    let draws = k.min(pool.len());
    let mut selected = Vec::with_capacity(draws);

    for _ in 0..draws {
        let total: f64 = w.iter().sum();
        let idx = if total > 0.0 && total.is_finite() {
            let r = rng.gen::<f64>() * total;
            let mut cum = 0.0;
            // float drift can leave r just above the final sum
            let mut pick = w.iter().rposition(|ww| *ww > 0.0).unwrap_or(w.len() - 1);
            for (i, ww) in w.iter().enumerate() {
                cum += ww;
                if r <= cum && *ww > 0.0 {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            rng.gen_range(0..pool.len())
        };

        selected.push(pop[pool.remove(idx)].clone());
        w.remove(idx);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_returns_unique_members() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = vec!["a", "b", "c", "d", "e"];
        let weights = vec![5.0, 4.0, 3.0, 2.0, 1.0];

        for k in 0..8 {
            let out = weighted_sample_without_replacement(&pop, &weights, k, &mut rng);
            assert_eq!(out.len(), k.min(pop.len()));
            let uniq: HashSet<_> = out.iter().collect();
            assert_eq!(uniq.len(), out.len(), "duplicate draw");
            assert!(out.iter().all(|x| pop.contains(x)));
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(11);
        let pop = vec![1, 2, 3, 4];
        let out = weighted_sample_without_replacement(&pop, &[0.0; 4], 4, &mut rng);
        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, pop);
    }

    #[test]
    fn test_zero_weight_member_drawn_last() {
        let mut rng = StdRng::seed_from_u64(3);
        let pop = vec!["heavy", "light", "none"];
        for _ in 0..200 {
            let out = weighted_sample_without_replacement(&pop, &[10.0, 1.0, 0.0], 3, &mut rng);
            assert_eq!(out[2], "none");
        }
    }

    #[test]
    fn test_same_seed_same_order() {
        let pop: Vec<u32> = (0..20).collect();
        let weights: Vec<f64> = (0..20).map(|i| f64::from(i) + 1.0).collect();
        let a = weighted_sample_without_replacement(&pop, &weights, 20, &mut StdRng::seed_from_u64(99));
        let b = weighted_sample_without_replacement(&pop, &weights, 20, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_heavier_weight_leads_more_often() {
        let mut rng = StdRng::seed_from_u64(2024);
        let pop = vec!["front", "mid", "back"];
        let weights = vec![300.0, 100.0, 10.0];
        let mut firsts = [0u32; 3];

        for _ in 0..5000 {
            let out = weighted_sample_without_replacement(&pop, &weights, 1, &mut rng);
            let i = pop.iter().position(|p| *p == out[0]).unwrap();
            firsts[i] += 1;
        }

        assert!(firsts[0] > firsts[1], "{firsts:?}");
        assert!(firsts[1] > firsts[2], "{firsts:?}");
    }
}
