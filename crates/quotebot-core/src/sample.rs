//! Random selection of quotes.
//!
//! Every function takes the RNG as a parameter so callers can use the
//! thread-local generator while tests use a seeded one. Selection is uniform
//! and without replacement: a candidate never appears twice in one result.

use rand::Rng;

/// The smallest number of quotes a query can ask for.
pub const MIN_AMOUNT: usize = 1;

/// Default ceiling for multi-quote queries.
pub const DEFAULT_MAX_AMOUNT: usize = 10;

/// Clamp a caller-supplied amount into `[MIN_AMOUNT, max]`. A missing amount
/// means a single quote.
pub fn clamp_amount(requested: Option<i64>, max: usize) -> usize {
  let max = max.max(MIN_AMOUNT);
  match requested {
    None => MIN_AMOUNT,
    Some(n) if n < MIN_AMOUNT as i64 => MIN_AMOUNT,
    Some(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
  }
}

/// Pick one candidate uniformly at random. Returns `None` for an empty input.
pub fn choose_one<T, R>(mut candidates: Vec<T>, rng: &mut R) -> Option<T>
where
  R: Rng + ?Sized,
{
  if candidates.is_empty() {
    return None;
  }
  let index = rng.gen_range(0..candidates.len());
  Some(candidates.swap_remove(index))
}

/// Pick `amount` distinct candidates uniformly at random.
///
/// If there are no more candidates than requested, all of them are returned
/// without sampling. The order of the result is unspecified.
pub fn choose_n<T, R>(mut candidates: Vec<T>, amount: usize, rng: &mut R) -> Vec<T>
where
  R: Rng + ?Sized,
{
  if amount == 0 {
    return Vec::new();
  }
  if amount == 1 {
    return choose_one(candidates, rng).into_iter().collect();
  }
  if candidates.len() <= amount {
    return candidates;
  }

  let mut chosen = Vec::with_capacity(amount);
  for _ in 0..amount {
    let index = rng.gen_range(0..candidates.len());
    chosen.push(candidates.swap_remove(index));
  }
  chosen
}

#[cfg(test)]
mod tests {
  use std::collections::{BTreeMap, HashSet};

  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn rng() -> StdRng { StdRng::seed_from_u64(0x5eed) }

  #[test]
  fn clamp_defaults_to_one() {
    assert_eq!(clamp_amount(None, 10), 1);
  }

  #[test]
  fn clamp_bounds() {
    assert_eq!(clamp_amount(Some(0), 10), 1);
    assert_eq!(clamp_amount(Some(-7), 10), 1);
    assert_eq!(clamp_amount(Some(4), 10), 4);
    assert_eq!(clamp_amount(Some(10), 10), 10);
    assert_eq!(clamp_amount(Some(11), 10), 10);
    assert_eq!(clamp_amount(Some(i64::MAX), 20), 20);
  }

  #[test]
  fn choose_one_empty_is_none() {
    let empty: Vec<u32> = Vec::new();
    assert_eq!(choose_one(empty, &mut rng()), None);
  }

  #[test]
  fn choose_one_single_candidate() {
    assert_eq!(choose_one(vec!["only"], &mut rng()), Some("only"));
  }

  #[test]
  fn choose_n_amount_one_on_empty_is_empty() {
    let empty: Vec<u32> = Vec::new();
    assert!(choose_n(empty, 1, &mut rng()).is_empty());
  }

  #[test]
  fn choose_n_returns_distinct_members() {
    let mut rng = rng();
    let candidates: Vec<u32> = (0..20).collect();
    for amount in 1..=20 {
      let chosen = choose_n(candidates.clone(), amount, &mut rng);
      assert_eq!(chosen.len(), amount);
      let unique: HashSet<_> = chosen.iter().collect();
      assert_eq!(unique.len(), amount, "duplicate in {chosen:?}");
      assert!(chosen.iter().all(|c| candidates.contains(c)));
    }
  }

  #[test]
  fn choose_n_more_than_available_returns_everything() {
    let candidates = vec!['a', 'b', 'c', 'd', 'e'];
    let mut chosen = choose_n(candidates.clone(), 10, &mut rng());
    chosen.sort_unstable();
    assert_eq!(chosen, candidates);

    let mut exact = choose_n(candidates.clone(), 5, &mut rng());
    exact.sort_unstable();
    assert_eq!(exact, candidates);
  }

  #[test]
  fn choose_n_zero_is_empty() {
    assert!(choose_n(vec![1, 2, 3], 0, &mut rng()).is_empty());
  }

  #[test]
  fn choose_n_is_roughly_uniform() {
    // 5 candidates, pick 2 per draw: each should be included ~40% of the time.
    let mut rng = rng();
    let mut hits: BTreeMap<u8, u32> = BTreeMap::new();
    let draws = 10_000;
    for _ in 0..draws {
      for c in choose_n(vec![0u8, 1, 2, 3, 4], 2, &mut rng) {
        *hits.entry(c).or_default() += 1;
      }
    }
    for (candidate, count) in hits {
      let share = f64::from(count) / f64::from(draws);
      assert!(
        (0.35..0.45).contains(&share),
        "candidate {candidate} picked {share:.3} of the time"
      );
    }
  }
}
