use crate::error::{Error, Result};
use ahash::AHashSet as HashSet;
use std::fmt::Debug;

/// The byte alphabet used for enumeration.
///
/// Bytes are deduplicated on construction. The first occurrence of a byte fixes
/// its position, and that order is the digit order of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    bytes: Vec<u8>,
}

impl Pool {
    /// Creates a pool from raw bytes, dropping repeats.
    pub fn new<I: IntoIterator<Item = u8>>(bytes: I) -> Self {
        let mut seen = HashSet::new();
        let bytes = bytes.into_iter().filter(|b| seen.insert(*b)).collect();
        Self { bytes }
    }

    /// Creates a pool from any values convertible to a byte.
    ///
    /// Fails on the first element outside `0..=255`.
    pub fn try_from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: TryInto<u8> + Copy + Debug,
    {
        let bytes = values
            .into_iter()
            .map(|value| {
                value.try_into().map_err(|_| Error::InvalidPool {
                    element: format!("{:?}", value),
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self::new(bytes))
    }

    /// Creates a pool from the characters of a string.
    ///
    /// Every character must be at most U+00FF.
    pub fn from_chars(chars: &str) -> Result<Self> {
        Self::try_from_values(chars.chars())
    }

    /// The full pool of all 256 byte values in ascending order.
    pub fn all() -> Self {
        Self {
            bytes: (0..=u8::MAX).collect(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the byte at digit position `index`.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<u8> for Pool {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<&[u8]> for Pool {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied())
    }
}
