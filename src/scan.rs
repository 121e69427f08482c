use crate::enumeration::{Enumeration, EnumerationOrder};
use crate::error::{Error, Result};

/// A boxed, lazily evaluated stream of generated values.
pub(crate) type Stream = Box<dyn Iterator<Item = Vec<u8>>>;

/// One end of a scan.
///
/// Sentinels compare in enumeration order: shorter strings first, then position
/// by position in pool order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanBound {
    /// A literal string compared against each value.
    Sentinel(Vec<u8>),
    /// A count of values into the raw enumeration order.
    Offset(usize),
}

impl From<&[u8]> for ScanBound {
    fn from(value: &[u8]) -> Self {
        ScanBound::Sentinel(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ScanBound {
    fn from(value: &[u8; N]) -> Self {
        ScanBound::Sentinel(value.to_vec())
    }
}

impl From<Vec<u8>> for ScanBound {
    fn from(value: Vec<u8>) -> Self {
        ScanBound::Sentinel(value)
    }
}

impl From<&str> for ScanBound {
    fn from(value: &str) -> Self {
        ScanBound::Sentinel(value.as_bytes().to_vec())
    }
}

impl TryFrom<i64> for ScanBound {
    type Error = Error;

    /// Accepts the signed offset form, where `-k` counts `k` values into the
    /// enumeration.
    fn try_from(value: i64) -> Result<Self> {
        if value >= 0 {
            return Err(Error::invalid_scan(format!(
                "integer bound {} must be negative",
                value
            )));
        }
        usize::try_from(value.unsigned_abs())
            .map(ScanBound::Offset)
            .map_err(|_| Error::invalid_scan(format!("offset {} out of range", value)))
    }
}

/// A requested change to one optional setting.
///
/// Distinguishes "leave as is" from "explicitly remove".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Update<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Update<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Update::Keep)
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Set(value)
    }
}

/// An active scan bound together with its inclusivity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    pub value: ScanBound,
    pub inclusive: bool,
}

impl Bound {
    /// Whether a value at raw index `index` lies at or past this start bound.
    fn reached(&self, index: usize, value: &[u8], order: &EnumerationOrder) -> bool {
        match &self.value {
            ScanBound::Sentinel(s) if self.inclusive => order.compare(value, s).is_ge(),
            ScanBound::Sentinel(s) => order.compare(value, s).is_gt(),
            ScanBound::Offset(k) if self.inclusive => index >= *k,
            ScanBound::Offset(k) => index > *k,
        }
    }

    /// Whether a value at raw index `index` still lies within this stop bound.
    fn admits(&self, index: usize, value: &[u8], order: &EnumerationOrder) -> bool {
        match &self.value {
            ScanBound::Sentinel(s) if self.inclusive => order.compare(value, s).is_le(),
            ScanBound::Sentinel(s) => order.compare(value, s).is_lt(),
            ScanBound::Offset(m) if self.inclusive => index <= *m,
            ScanBound::Offset(m) => index < *m,
        }
    }

    /// First raw index an offset start admits.
    fn first_index(&self) -> Option<usize> {
        match self.value {
            ScanBound::Offset(k) if self.inclusive => Some(k),
            ScanBound::Offset(k) => Some(k.saturating_add(1)),
            ScanBound::Sentinel(_) => None,
        }
    }

    /// Raw index one past the last an offset stop admits.
    fn end_index(&self) -> Option<usize> {
        match self.value {
            ScanBound::Offset(m) if self.inclusive => Some(m.saturating_add(1)),
            ScanBound::Offset(m) => Some(m),
            ScanBound::Sentinel(_) => None,
        }
    }
}

/// The scan bounds active on a generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scan {
    pub start: Option<Bound>,
    pub stop: Option<Bound>,
}

impl Scan {
    /// Resolves a scan request against the active bounds.
    ///
    /// Kept bounds retain their own inclusivity; newly set bounds take `inclusive`.
    pub fn update(
        &self,
        start: Update<ScanBound>,
        stop: Update<ScanBound>,
        inclusive: bool,
    ) -> Result<Scan> {
        if start.is_keep() && stop.is_keep() {
            return Err(Error::invalid_scan("a start or stop bound is required"));
        }
        let resolve = |update: Update<ScanBound>, current: &Option<Bound>| match update {
            Update::Keep => current.clone(),
            Update::Clear => None,
            Update::Set(value) => Some(Bound { value, inclusive }),
        };
        Ok(Scan {
            start: resolve(start, &self.start),
            stop: resolve(stop, &self.stop),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }

    /// Wraps the raw enumeration with these bounds.
    pub(crate) fn apply(&self, raw: Enumeration) -> Stream {
        let first = self.start.as_ref().and_then(Bound::first_index);
        let end = self.stop.as_ref().and_then(Bound::end_index);

        if let (Some(first), Some(end)) = (first, end) {
            return Box::new(raw.skip(first).take(end.saturating_sub(first)));
        }
        if self.is_unbounded() {
            return Box::new(raw);
        }

        // Offsets are absolute over the raw enumeration, so indices are kept
        // alongside values until both bounds have been applied.
        let order = EnumerationOrder::new(raw.pool());
        let stop_order = order.clone();
        // A sentinel start made of pool bytes seeks straight to its rank.
        // The skip below then drops at most the sentinel itself.
        let seek = match &self.start {
            Some(Bound {
                value: ScanBound::Sentinel(sentinel),
                ..
            }) => raw
                .count_before(sentinel)
                .and_then(|count| usize::try_from(count).ok()),
            _ => None,
        };
        let base = first.or(seek).unwrap_or(0);
        let indexed = raw
            .skip(base)
            .enumerate()
            .map(move |(i, value)| (base + i, value));
        let start = self.start.clone().filter(|_| first.is_none());
        let stop = self.stop.clone();
        Box::new(
            indexed
                .skip_while(move |(i, value)| match &start {
                    Some(bound) => !bound.reached(*i, value, &order),
                    None => false,
                })
                .take_while(move |(i, value)| match &stop {
                    Some(bound) => bound.admits(*i, value, &stop_order),
                    None => true,
                })
                .map(|(_, value)| value),
        )
    }
}
