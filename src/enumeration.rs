use crate::lengths::{LengthRange, Lengths};
use crate::pool::Pool;
use std::cmp::Ordering;
use std::rc::Rc;

/// Lazy enumeration of every string over a pool, shortest first.
///
/// Within one length, strings come in odometer order: the leftmost position
/// varies slowest and pool order is digit order. The stream is single pass.
/// It is finite when the length range is bounded or the pool is empty.
///
/// `nth` (and therefore `skip`) seeks arithmetically instead of generating the
/// skipped values.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pool: Rc<Pool>,
    lengths: Lengths,
    pending_empty: bool,
    odometer: Option<Odometer>,
    position: u128,
}

impl Enumeration {
    pub fn new(pool: Rc<Pool>, range: LengthRange) -> Self {
        Self {
            pool,
            lengths: range.lengths(),
            pending_empty: range.includes_empty(),
            odometer: None,
            position: 0,
        }
    }

    /// Number of values yielded or skipped so far.
    pub fn position(&self) -> u128 {
        self.position
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Opens the odometer for the next length. Returns false once lengths run out.
    fn open_next_length(&mut self) -> bool {
        // An empty pool has no strings of any positive length.
        if self.pool.is_empty() {
            return false;
        }
        match self.lengths.next() {
            Some(len) => {
                self.odometer = Some(Odometer::new(len));
                true
            }
            None => false,
        }
    }
}

impl Iterator for Enumeration {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.pending_empty {
            self.pending_empty = false;
            self.position += 1;
            return Some(Vec::new());
        }

        let base = self.pool.len();
        loop {
            if let Some(odometer) = &mut self.odometer {
                if odometer.advance(base) {
                    self.position += 1;
                    return Some(odometer.render(&self.pool));
                }
                self.odometer = None;
            }
            if !self.open_next_length() {
                return None;
            }
        }
    }

    fn nth(&mut self, n: usize) -> Option<Vec<u8>> {
        let mut n = n;
        if self.pending_empty {
            if n == 0 {
                return self.next();
            }
            self.pending_empty = false;
            self.position += 1;
            n -= 1;
        }

        let base = self.pool.len();
        loop {
            if let Some(odometer) = &mut self.odometer {
                match odometer.remaining(base) {
                    Some(remaining) if remaining <= n as u128 => {
                        // Skip the rest of this length wholesale.
                        n -= remaining as usize;
                        self.position += remaining;
                        self.odometer = None;
                    }
                    // Remaining exceeds n, or is too large to count.
                    _ => {
                        odometer.skip(base, n);
                        self.position += n as u128;
                        return self.next();
                    }
                }
            }
            if !self.open_next_length() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let empty = usize::from(self.pending_empty);
        if self.pool.is_empty() {
            return (empty, Some(empty));
        }
        if !self.lengths_bounded() {
            return (usize::MAX, None);
        }

        let base = self.pool.len();
        let current = self
            .odometer
            .as_ref()
            .map_or(Some(0), |odometer| odometer.remaining(base));
        let upcoming = if base == 1 {
            self.lengths.size_hint().1.map(|n| n as u128)
        } else {
            self.lengths
                .clone()
                .try_fold(0u128, |acc, len| acc.checked_add(power(base, len)?))
        };
        let total = current
            .zip(upcoming)
            .and_then(|(a, b)| a.checked_add(b))
            .and_then(|t| t.checked_add(empty as u128))
            .and_then(|t| usize::try_from(t).ok());
        match total {
            Some(total) => (total, Some(total)),
            None => (usize::MAX, None),
        }
    }
}

impl Enumeration {
    fn lengths_bounded(&self) -> bool {
        self.lengths.size_hint().1.is_some()
    }

    /// Number of values still to come that sort before `value`.
    ///
    /// Only answered before any positive length has been opened, and only
    /// when every byte of `value` is in the pool. `None` otherwise, or if the
    /// count does not fit in a u128.
    pub(crate) fn count_before(&self, value: &[u8]) -> Option<u128> {
        if self.odometer.is_some() {
            return None;
        }
        let base = self.pool.len();
        let bytes = self.pool.as_bytes();
        let digits = value.iter().try_fold(0u128, |acc, byte| {
            let digit = bytes.iter().position(|b| b == byte)?;
            acc.checked_mul(base as u128)?.checked_add(digit as u128)
        })?;

        let mut count = u128::from(self.pending_empty && !value.is_empty());
        for len in self.lengths.clone() {
            if len >= value.len() {
                if len == value.len() {
                    count = count.checked_add(digits)?;
                }
                break;
            }
            count = count.checked_add(power(base, len)?)?;
        }
        Some(count)
    }
}

/// Digit state for one string length.
#[derive(Debug, Clone)]
struct Odometer {
    digits: Vec<usize>,
    started: bool,
}

impl Odometer {
    fn new(len: usize) -> Self {
        Self {
            digits: vec![0; len],
            started: false,
        }
    }

    /// Moves to the next tuple. Returns false after the last one.
    fn advance(&mut self, base: usize) -> bool {
        if !self.started {
            self.started = true;
            return true;
        }
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < base {
                return true;
            }
            *digit = 0;
        }
        false
    }

    /// Tuples of this length not yet yielded, or `None` if that does not fit in a u128.
    fn remaining(&self, base: usize) -> Option<u128> {
        let total = power(base, self.digits.len())?;
        if !self.started {
            return Some(total);
        }
        let rank = self.digits.iter().try_fold(0u128, |acc, &digit| {
            acc.checked_mul(base as u128)?.checked_add(digit as u128)
        })?;
        Some(total - rank - 1)
    }

    /// Skips `n` tuples so the next `advance` lands on the one after them.
    ///
    /// `n` must be smaller than `remaining`.
    fn skip(&mut self, base: usize, n: usize) {
        if n == 0 {
            return;
        }
        let mut carry = if self.started {
            n
        } else {
            self.started = true;
            n - 1
        };
        for digit in self.digits.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = *digit + carry % base;
            *digit = sum % base;
            carry = carry / base + sum / base;
        }
        debug_assert_eq!(carry, 0, "skip past the end of a length");
    }

    fn render(&self, pool: &Pool) -> Vec<u8> {
        let bytes = pool.as_bytes();
        self.digits.iter().map(|&digit| bytes[digit]).collect()
    }
}

/// Total order matching the enumeration order of a pool.
///
/// Shorter strings sort first. Equal lengths compare position by position
/// using pool order. Bytes outside the pool sort after every pool byte,
/// by value.
#[derive(Debug, Clone)]
pub(crate) struct EnumerationOrder {
    rank: [u16; 256],
}

impl EnumerationOrder {
    pub(crate) fn new(pool: &Pool) -> Self {
        let mut rank = [0u16; 256];
        for (byte, slot) in rank.iter_mut().enumerate() {
            *slot = (pool.len() + byte) as u16;
        }
        for (index, &byte) in pool.as_bytes().iter().enumerate() {
            rank[byte as usize] = index as u16;
        }
        Self { rank }
    }

    pub(crate) fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.len().cmp(&b.len()).then_with(|| {
            a.iter()
                .zip(b)
                .map(|(&x, &y)| self.rank[x as usize].cmp(&self.rank[y as usize]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

fn power(base: usize, exp: usize) -> Option<u128> {
    let exp = u32::try_from(exp).ok()?;
    (base as u128).checked_pow(exp)
}
