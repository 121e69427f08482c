use crate::enumeration::{Enumeration, EnumerationOrder};
use crate::filter::Predicate;
use crate::generator::generate;
use crate::lengths::LengthRange;
use crate::offset::OffsetSpec;
use crate::pool::Pool;
use crate::scan::{ScanBound, Update};
use proptest::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;

/// Small pools keep `|pool|^len` manageable.
fn small_pool() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..5)
}

fn enumerate(pool: &Pool, start: usize, stop: usize) -> Vec<Vec<u8>> {
    Enumeration::new(Rc::new(pool.clone()), LengthRange::new(start, Some(stop))).collect()
}

proptest! {
    /// Property 1: Cardinality
    /// Length `i` contributes exactly `|pool|^i` distinct values of length `i`.
    #[test]
    fn prop_product_cardinality(bytes in small_pool(), len in 1usize..4) {
        let pool = Pool::new(bytes);
        let values = enumerate(&pool, len, len + 1);

        prop_assert_eq!(values.len(), pool.len().pow(len as u32));
        prop_assert!(values.iter().all(|v| v.len() == len));
        prop_assert!(values.iter().all(|v| v.iter().all(|b| pool.as_bytes().contains(b))));

        let distinct: HashSet<&Vec<u8>> = values.iter().collect();
        prop_assert_eq!(distinct.len(), values.len());
    }

    /// Property 2: Ordering
    /// Values ascend strictly in length-then-pool-order.
    #[test]
    fn prop_enumeration_is_ordered(bytes in small_pool(), stop in 1usize..4) {
        let pool = Pool::new(bytes);
        let order = EnumerationOrder::new(&pool);
        let values = enumerate(&pool, 0, stop);

        prop_assert!(values.first().is_some_and(|v| v.is_empty()));
        for pair in values.windows(2) {
            prop_assert!(pair[0].len() <= pair[1].len());
            prop_assert!(order.compare(&pair[0], &pair[1]).is_lt());
        }
    }

    /// Property 3: Seeking
    /// `nth(n)` lands on the same value as stepping `n + 1` times.
    #[test]
    fn prop_nth_matches_stepping(bytes in small_pool(), start in 0usize..2, n in 0usize..200) {
        let pool = Pool::new(bytes);
        let range = LengthRange::new(start, Some(5));
        let stepped = Enumeration::new(Rc::new(pool.clone()), range).nth_by_stepping(n);
        let mut seek = Enumeration::new(Rc::new(pool), range);
        prop_assert_eq!(seek.nth(n), stepped);
    }

    /// Property 4: Scan start
    /// The first scanned value is the sentinel itself when it is enumerated,
    /// otherwise the next value after it in enumeration order.
    #[test]
    fn prop_scan_start_lands_on_sentinel(
        bytes in small_pool(),
        sentinel in prop::collection::vec(any::<u8>(), 0..4),
    ) {
        let pool = Pool::new(bytes);
        let order = EnumerationOrder::new(&pool);
        let expected = enumerate(&pool, 0, 4)
            .into_iter()
            .find(|v| order.compare(v, &sentinel).is_ge());

        let g = generate(0, Some(4), pool)
            .scan(ScanBound::Sentinel(sentinel.clone()).into(), Update::Keep, true)
            .unwrap();
        let first = g.values().next();
        prop_assert_eq!(&first, &expected);
        if let Some(first) = first {
            let is_member = first == sentinel;
            prop_assert!(is_member || order.compare(&first, &sentinel).is_gt());
        }
    }

    /// Property 5: Scan offset
    /// An offset scan drops exactly that many raw values.
    #[test]
    fn prop_scan_offset_skips_count(bytes in small_pool(), k in 0usize..40) {
        let pool = Pool::new(bytes);
        let raw = enumerate(&pool, 0, 4);
        let g = generate(0, Some(4), pool)
            .scan(ScanBound::Offset(k).into(), Update::Keep, true)
            .unwrap();
        let scanned: Vec<Vec<u8>> = g.values().collect();
        prop_assert_eq!(scanned, raw.into_iter().skip(k).collect::<Vec<_>>());
    }

    /// Property 6: Filter partition
    /// A filter and its inverse split the stream into disjoint, complete halves.
    #[test]
    fn prop_filter_partitions(bytes in small_pool(), pivot in any::<u8>()) {
        let pool = Pool::new(bytes);
        let g = generate(1, Some(4), pool);
        let below = Predicate::new(move |v| v[0] < pivot);
        let kept: Vec<Vec<u8>> = g.filter(Some(below.clone()), false).unwrap().values().collect();
        let dropped: Vec<Vec<u8>> = g.filter(Some(below), true).unwrap().values().collect();
        let all: Vec<Vec<u8>> = g.values().collect();

        prop_assert_eq!(kept.len() + dropped.len(), all.len());
        prop_assert!(kept.iter().all(|v| v[0] < pivot));
        prop_assert!(dropped.iter().all(|v| v[0] >= pivot));
    }

    /// Property 7: Offset slicing
    /// Offsets behave like `skip(start).step_by(step)` bounded by `stop`.
    #[test]
    fn prop_offset_matches_slice(
        bytes in small_pool(),
        start in 0usize..20,
        length in 0usize..20,
        step in 1usize..4,
    ) {
        let pool = Pool::new(bytes);
        let all = enumerate(&pool, 0, 4);
        let expected: Vec<Vec<u8>> = all
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i >= start && *i < start + length && (i - start) % step == 0)
            .map(|(_, v)| v)
            .collect();

        let g = generate(0, Some(4), pool)
            .offset(OffsetSpec::new().start(start).length(length).step(step))
            .unwrap();
        prop_assert_eq!(g.values().collect::<Vec<_>>(), expected);
    }
}

impl Enumeration {
    /// Reference implementation of `nth` that generates every skipped value.
    fn nth_by_stepping(mut self, n: usize) -> Option<Vec<u8>> {
        for _ in 0..n {
            self.next()?;
        }
        self.next()
    }
}

/// Bolero fuzz test: No panics for arbitrary pipeline configurations
#[cfg(test)]
#[test]
fn fuzz_pipeline_no_panic() {
    bolero::check!()
        .with_type::<(Vec<u8>, u8, u8, Vec<u8>, u8, bool)>()
        .for_each(|(pool, start, stop, sentinel, skip, inclusive)| {
            let pool = Pool::new(pool.iter().copied().take(4));
            let start = usize::from(*start % 3);
            let stop = start + usize::from(*stop % 3);
            let g = generate(start, Some(stop), pool.clone());

            let scanned = g
                .scan(
                    ScanBound::Sentinel(sentinel.clone()).into(),
                    ScanBound::Offset(usize::from(*skip)).into(),
                    *inclusive,
                )
                .unwrap();
            let values: Vec<Vec<u8>> = scanned.values().collect();
            assert!(values.len() <= usize::from(*skip) + 1);
            assert!(values
                .iter()
                .all(|v| v.iter().all(|b| pool.as_bytes().contains(b))));
        });
}

/// Bolero fuzz test: Seeking always agrees with stepping
#[cfg(test)]
#[test]
fn fuzz_nth_matches_stepping() {
    bolero::check!()
        .with_type::<(Vec<u8>, u16)>()
        .for_each(|(pool, n)| {
            let pool = Rc::new(Pool::new(pool.iter().copied().take(6)));
            let range = LengthRange::new(0, None);
            let n = usize::from(*n % 512);

            let stepped = Enumeration::new(Rc::clone(&pool), range).nth_by_stepping(n);
            let seeked = Enumeration::new(pool, range).nth(n);
            assert_eq!(seeked, stepped);
        });
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_two_letter_round_trip() {
        let g = generate(0, Some(3), Pool::from(&b"ab"[..]));
        let values: Vec<String> = g
            .values()
            .map(|v| String::from_utf8(v).unwrap())
            .collect();
        assert_eq!(values, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn test_independent_pipelines() {
        let root = generate(1, Some(3), Pool::from(&b"ab"[..]));
        let scanned = root
            .scan(ScanBound::Offset(1).into(), Update::Keep, true)
            .unwrap();
        let filtered = scanned
            .filter(Some(Predicate::new(|v| v.len() == 2)), false)
            .unwrap();

        assert_eq!(filtered.values().next(), Some(b"aa".to_vec()));
        assert_eq!(root.values().next(), Some(b"a".to_vec()));
        assert_eq!(scanned.values().next(), Some(b"b".to_vec()));
        assert_eq!(filtered.values().next(), Some(b"ab".to_vec()));
    }
}
