use crate::error::{Error, Result};

/// The range of string lengths to enumerate.
///
/// `start` is the shortest length, `stop` is an exclusive upper bound and
/// `None` leaves the range unbounded. Length zero is never produced by
/// [`LengthRange::lengths`]; the empty string is handled separately when
/// `start == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LengthRange {
    pub start: usize,
    pub stop: Option<usize>,
}

impl LengthRange {
    pub fn new(start: usize, stop: Option<usize>) -> Self {
        Self { start, stop }
    }

    /// Creates a range from signed bounds, rejecting negatives.
    pub fn try_new(start: i64, stop: Option<i64>) -> Result<Self> {
        let invalid = || Error::InvalidRange { start, stop };
        let start_len = usize::try_from(start).map_err(|_| invalid())?;
        let stop_len = match stop {
            Some(stop) => Some(usize::try_from(stop).map_err(|_| invalid())?),
            None => None,
        };
        Ok(Self::new(start_len, stop_len))
    }

    /// Whether the empty string belongs to the enumeration.
    pub fn includes_empty(&self) -> bool {
        self.start == 0
    }

    pub fn is_bounded(&self) -> bool {
        self.stop.is_some()
    }

    /// Returns a fresh iterator over the non-zero lengths of this range.
    pub fn lengths(&self) -> Lengths {
        Lengths {
            next: self.start.max(1),
            stop: self.stop,
        }
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::new(1, None)
    }
}

/// Ascending iterator over string lengths.
#[derive(Debug, Clone)]
pub struct Lengths {
    next: usize,
    stop: Option<usize>,
}

impl Iterator for Lengths {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if let Some(stop) = self.stop {
            if self.next >= stop {
                return None;
            }
        }
        let len = self.next;
        self.next = self.next.checked_add(1)?;
        Some(len)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.stop {
            Some(stop) => {
                let n = stop.saturating_sub(self.next);
                (n, Some(n))
            }
            None => (usize::MAX, None),
        }
    }
}
