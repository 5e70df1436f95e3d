//! Fixed-capacity storage for per-iteration timing samples.

/// An append-only buffer of per-iteration mean nanosecond values.
///
/// Allocated once per benchmark; samples are never mutated after being
/// appended, and appends past capacity are discarded.
#[derive(Debug)]
pub(crate) struct SampleBuffer {
    samples: Vec<f64>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> SampleBuffer {
        SampleBuffer {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, returning false if the buffer is already full.
    pub fn push(&mut self, value: f64) -> bool {
        if self.samples.len() >= self.capacity {
            return false;
        }
        self.samples.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_up_to_capacity() {
        let mut buf = SampleBuffer::new(3);
        assert!(buf.push(1.0));
        assert!(buf.push(2.0));
        assert!(buf.push(3.0));
        assert!(buf.is_full());
        assert!(!buf.push(4.0));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_capacity_discards_everything() {
        let mut buf = SampleBuffer::new(0);
        assert!(buf.is_full());
        assert!(!buf.push(1.0));
        assert_eq!(buf.len(), 0);
    }
}
