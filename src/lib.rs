//! # bruteforce-rs - Lazy Brute-Force String Enumeration
//!
//! Enumerates every byte string over a fixed pool, shortest first, without
//! materializing anything the consumer does not pull.
//!
//! The raw enumeration can be reshaped by three composable stages:
//! 1. **Scan**: bound the raw stream by sentinel strings or by value counts
//! 2. **Filter**: keep (or drop) values matching a chain of predicates
//! 3. **Offset**: take a start/stop/step slice of what remains
//!
//! Every stage returns a new immutable handle that shares its unchanged parts
//! with the handle it came from.
//!
//! ## Example
//!
//! ```
//! use bruteforce_rs::{generate, OffsetSpec, Pool, Predicate, ScanBound, Update};
//!
//! let root = generate(0, Some(3), Pool::from(&b"ab"[..]));
//!
//! let all: Vec<Vec<u8>> = root.values().collect();
//! assert_eq!(all.len(), 7);
//! assert!(all[0].is_empty());
//! assert_eq!(all[3], b"aa");
//!
//! let tail = root
//!     .fork()
//!     .scan(ScanBound::from("aa").into(), Update::Keep, true)
//!     .unwrap()
//!     .filter(Some(Predicate::new(|v| v.ends_with(b"b"))), false)
//!     .unwrap()
//!     .offset(OffsetSpec::new().length(1))
//!     .unwrap();
//! assert_eq!(tail.values().collect::<Vec<_>>(), vec![b"ab".to_vec()]);
//! ```
//!
//! ## Performance
//!
//! - O(length) work per generated value
//! - Count-based skips (offset scans, `nth`) seek arithmetically instead of
//!   generating the skipped values

mod enumeration;
mod error;
mod filter;
mod generator;
mod lengths;
mod offset;
mod pool;
mod scan;

#[cfg(test)]
mod tests;

pub use enumeration::Enumeration;
pub use error::{Error, Result};
pub use filter::{FilterEntry, Predicate};
pub use generator::{generate, GenerateConfig, Generator, Values};
pub use lengths::{LengthRange, Lengths};
pub use offset::{Offset, OffsetSpec};
pub use pool::Pool;
pub use scan::{Bound, Scan, ScanBound, Update};
