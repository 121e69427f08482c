use crate::error::{Error, Result};
use crate::scan::Stream;

/// An index slice request: `start`, then either `stop` or `length`, and `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSpec {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: usize,
    pub length: Option<usize>,
}

impl OffsetSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn stop(mut self, stop: usize) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Validates the request and normalizes `length` into `stop`.
    pub fn resolve(&self) -> Result<Offset> {
        if self.stop.is_some() && self.length.is_some() {
            return Err(Error::invalid_offset("stop and length are mutually exclusive"));
        }
        if self.step == 0 {
            return Err(Error::invalid_offset("step must be at least 1"));
        }
        let stop = self
            .length
            .map(|length| self.start.saturating_add(length))
            .or(self.stop);
        Ok(Offset {
            start: self.start,
            stop,
            step: self.step,
        })
    }
}

impl Default for OffsetSpec {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
            length: None,
        }
    }
}

/// A validated slice over the filtered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: usize,
}

impl Offset {
    pub fn is_identity(&self) -> bool {
        *self == Offset::default()
    }

    pub(crate) fn apply(&self, stream: Stream) -> Stream {
        if self.is_identity() {
            return stream;
        }
        let stepped = stream.skip(self.start).step_by(self.step);
        match self.stop {
            Some(stop) => {
                let span = stop.saturating_sub(self.start);
                Box::new(stepped.take(span.div_ceil(self.step)))
            }
            None => Box::new(stepped),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: u8) -> Stream {
        Box::new((0..n).map(|i| vec![i]))
    }

    fn sliced(spec: OffsetSpec, n: u8) -> Vec<u8> {
        spec.resolve()
            .unwrap()
            .apply(numbers(n))
            .map(|v| v[0])
            .collect()
    }

    #[test]
    fn test_start_and_length() {
        assert_eq!(sliced(OffsetSpec::new().start(2).length(3), 10), vec![2, 3, 4]);
        assert_eq!(sliced(OffsetSpec::new().start(2).length(3), 4), vec![2, 3]);
    }

    #[test]
    fn test_start_stop_step() {
        assert_eq!(
            sliced(OffsetSpec::new().start(1).stop(8).step(3), 20),
            vec![1, 4, 7]
        );
        assert_eq!(
            sliced(OffsetSpec::new().start(1).stop(7).step(3), 20),
            vec![1, 4]
        );
        assert_eq!(sliced(OffsetSpec::new().step(4), 10), vec![0, 4, 8]);
    }

    #[test]
    fn test_stop_before_start_is_empty() {
        assert!(sliced(OffsetSpec::new().start(5).stop(3), 10).is_empty());
    }

    #[test]
    fn test_identity() {
        let offset = OffsetSpec::default().resolve().unwrap();
        assert!(offset.is_identity());
        assert_eq!(sliced(OffsetSpec::default(), 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_length_resolves_to_stop() {
        let offset = OffsetSpec::new().start(4).length(2).resolve().unwrap();
        assert_eq!(
            offset,
            Offset {
                start: 4,
                stop: Some(6),
                step: 1
            }
        );
    }

    #[test]
    fn test_stop_and_length_rejected() {
        let err = OffsetSpec::new().stop(3).length(2).resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidOffset { .. }));
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = OffsetSpec::new().step(0).resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidOffset { .. }));
    }
}
