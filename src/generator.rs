use crate::enumeration::Enumeration;
use crate::error::{Error, Result};
use crate::filter::{FilterChain, FilterEntry, Predicate};
use crate::lengths::LengthRange;
use crate::offset::{Offset, OffsetSpec};
use crate::pool::Pool;
use crate::scan::{Bound, Scan, ScanBound, Stream, Update};
use log::{debug, trace};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Construction parameters for a root [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Shortest string length. Zero adds the empty string.
    pub start: usize,
    /// Exclusive upper bound on length, or `None` for no bound.
    pub stop: Option<usize>,
    pub pool: Pool,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn stop(mut self, stop: Option<usize>) -> Self {
        self.stop = stop;
        self
    }

    pub fn pool(mut self, pool: Pool) -> Self {
        self.pool = pool;
        self
    }

    pub fn build(self) -> Generator {
        Generator::from_range(LengthRange::new(self.start, self.stop), self.pool)
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            start: 1,
            stop: None,
            pool: Pool::all(),
        }
    }
}

/// Creates a root generator over `pool` for lengths in `[start, stop)`.
pub fn generate(start: usize, stop: Option<usize>, pool: Pool) -> Generator {
    GenerateConfig::new().start(start).stop(stop).pool(pool).build()
}

/// Immutable inputs shared by a root generator and everything derived from it.
#[derive(Debug)]
struct Source {
    pool: Rc<Pool>,
    range: LengthRange,
}

struct Inner {
    source: Rc<Source>,
    scan: Scan,
    filters: FilterChain,
    offset: Offset,
    cursor: RefCell<Option<Stream>>,
}

impl Inner {
    fn open(&self) -> Stream {
        debug!(
            "opening stream: lengths={:?} pool_len={} scan={:?} filters={} offset={:?}",
            self.source.range,
            self.source.pool.len(),
            self.scan,
            self.filters.len(),
            self.offset
        );
        let raw = Enumeration::new(Rc::clone(&self.source.pool), self.source.range);
        let scanned = self.scan.apply(raw);
        let filtered = self.filters.apply(scanned);
        self.offset.apply(filtered)
    }
}

/// A handle on one configured enumeration pipeline.
///
/// Handles are immutable. `scan`, `filter` and `offset` return either this
/// same handle (when nothing would change) or a new one that shares the pool,
/// length range and earlier filters with it. Cloning a handle yields the same
/// instance, cursor included; use [`Generator::fork`] for an independent one.
///
/// Each handle owns a single forward cursor, opened on the first pull. A
/// derived handle always starts from the beginning of its own pipeline, no
/// matter how far its parent has been consumed.
#[derive(Clone)]
pub struct Generator {
    inner: Rc<Inner>,
}

impl Generator {
    pub fn new(config: GenerateConfig) -> Self {
        config.build()
    }

    pub fn from_range(range: LengthRange, pool: Pool) -> Self {
        let source = Rc::new(Source {
            pool: Rc::new(pool),
            range,
        });
        Self::from_parts(source, Scan::default(), FilterChain::default(), Offset::default())
    }

    /// Enumerates the strings from `first` (inclusive) up to `last` (exclusive).
    ///
    /// Lengths are limited to `first.len()..=last.len()`.
    pub fn between(first: &[u8], last: &[u8], pool: Pool) -> Self {
        let range = LengthRange::new(first.len(), Some(last.len().saturating_add(1)));
        let source = Rc::new(Source {
            pool: Rc::new(pool),
            range,
        });
        let scan = Scan {
            start: Some(Bound {
                value: ScanBound::from(first),
                inclusive: true,
            }),
            stop: Some(Bound {
                value: ScanBound::from(last),
                inclusive: false,
            }),
        };
        debug!("between {:?} and {:?}", first, last);
        Self::from_parts(source, scan, FilterChain::default(), Offset::default())
    }

    fn from_parts(source: Rc<Source>, scan: Scan, filters: FilterChain, offset: Offset) -> Self {
        Self {
            inner: Rc::new(Inner {
                source,
                scan,
                filters,
                offset,
                cursor: RefCell::new(None),
            }),
        }
    }

    /// Returns true if both handles are the same instance.
    pub fn ptr_eq(a: &Generator, b: &Generator) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Bounds the raw enumeration.
    ///
    /// `Keep` reuses the active bound with its inclusivity, `Clear` removes it,
    /// and `Set` installs a new bound with `inclusive`. Bounds are always applied
    /// to the raw enumeration, and active filters run after them.
    pub fn scan(
        &self,
        start: Update<ScanBound>,
        stop: Update<ScanBound>,
        inclusive: bool,
    ) -> Result<Generator> {
        let scan = self.inner.scan.update(start, stop, inclusive)?;
        if scan == self.inner.scan {
            trace!("scan unchanged, reusing handle");
            return Ok(self.clone());
        }
        debug!("deriving scan: {:?}", scan);
        Ok(Self::from_parts(
            Rc::clone(&self.inner.source),
            scan,
            self.inner.filters.clone(),
            self.inner.offset,
        ))
    }

    /// Appends a filter, or clears all filters when `predicate` is `None`.
    ///
    /// With `inverse` set, values for which the predicate is false are kept.
    pub fn filter(&self, predicate: Option<Predicate>, inverse: bool) -> Result<Generator> {
        let filters = match predicate {
            None if inverse => return Err(Error::InvalidFilter),
            None if self.inner.filters.is_empty() => {
                trace!("no filters to clear, reusing handle");
                return Ok(self.clone());
            }
            None => {
                debug!("clearing {} filters", self.inner.filters.len());
                FilterChain::default()
            }
            Some(predicate) if self.inner.filters.ends_with(&predicate, inverse) => {
                trace!("filter already at tail, reusing handle");
                return Ok(self.clone());
            }
            Some(predicate) => {
                debug!(
                    "appending filter #{} (inverse={})",
                    self.inner.filters.len() + 1,
                    inverse
                );
                self.inner.filters.push(predicate, inverse)
            }
        };
        Ok(Self::from_parts(
            Rc::clone(&self.inner.source),
            self.inner.scan.clone(),
            filters,
            self.inner.offset,
        ))
    }

    /// Replaces the final index slice applied after all filters.
    pub fn offset(&self, spec: OffsetSpec) -> Result<Generator> {
        let offset = spec.resolve()?;
        if offset == self.inner.offset {
            trace!("offset unchanged, reusing handle");
            return Ok(self.clone());
        }
        debug!("deriving offset: {:?}", offset);
        Ok(Self::from_parts(
            Rc::clone(&self.inner.source),
            self.inner.scan.clone(),
            self.inner.filters.clone(),
            offset,
        ))
    }

    /// A new handle with the same stages and a cursor at the beginning.
    pub fn fork(&self) -> Generator {
        Self::from_parts(
            Rc::clone(&self.inner.source),
            self.inner.scan.clone(),
            self.inner.filters.clone(),
            self.inner.offset,
        )
    }

    /// Iterates this handle's stream, resuming from its current position.
    pub fn values(&self) -> Values<'_> {
        Values { generator: self }
    }

    pub fn pool(&self) -> &Pool {
        &self.inner.source.pool
    }

    pub fn lengths(&self) -> LengthRange {
        self.inner.source.range
    }

    pub fn scan_start(&self) -> Option<&Bound> {
        self.inner.scan.start.as_ref()
    }

    pub fn scan_stop(&self) -> Option<&Bound> {
        self.inner.scan.stop.as_ref()
    }

    pub fn filter_count(&self) -> usize {
        self.inner.filters.len()
    }

    /// Active filters in the order they are applied.
    pub fn filters(&self) -> Vec<FilterEntry> {
        self.inner.filters.entries()
    }

    pub fn offset_spec(&self) -> Offset {
        self.inner.offset
    }

    fn with_cursor<R>(&self, f: impl FnOnce(&mut Stream) -> R) -> R {
        let mut cursor = self.inner.cursor.borrow_mut();
        f(cursor.get_or_insert_with(|| self.inner.open()))
    }

    fn pull(&self) -> Option<Vec<u8>> {
        self.with_cursor(|stream| stream.next())
    }
}

impl Default for Generator {
    fn default() -> Self {
        GenerateConfig::default().build()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("pool_len", &self.inner.source.pool.len())
            .field("lengths", &self.inner.source.range)
            .field("scan", &self.inner.scan)
            .field("filters", &self.inner.filters)
            .field("offset", &self.inner.offset)
            .field(
                "opened",
                &self.inner.cursor.try_borrow().map_or(true, |c| c.is_some()),
            )
            .finish()
    }
}

/// Iterator over a generator's stream.
///
/// Pulls from the handle's shared cursor, so dropping a `Values` and calling
/// [`Generator::values`] again continues where it stopped.
pub struct Values<'a> {
    generator: &'a Generator,
}

impl Iterator for Values<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.generator.pull()
    }

    // Unfiltered pipelines seek without generating skipped values.
    fn nth(&mut self, n: usize) -> Option<Vec<u8>> {
        self.generator.with_cursor(|stream| stream.nth(n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.generator.with_cursor(|stream| stream.size_hint())
    }
}

impl<'a> IntoIterator for &'a Generator {
    type Item = Vec<u8>;
    type IntoIter = Values<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}
