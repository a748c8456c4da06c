#[cfg(feature = "tracing")]
use tracing::instrument;

/// Largest number of strings produced by a single refill.
pub const MAX_REFILL: usize = 1000;

/// A zero-argument source of strings, as consumed by [`Pool`].
///
/// Implemented for every `FnMut() -> String` closure.
pub trait Mint {
    /// Produces the next string.
    fn mint(&mut self) -> String;
}

impl<F: FnMut() -> String> Mint for F {
    fn mint(&mut self) -> String {
        self()
    }
}

/// A buffer of pre-built strings, refilled in batches of at most [`MAX_REFILL`].
///
/// Refills happen synchronously inside [`get`](Pool::get) and
/// [`get_batch`](Pool::get_batch), only when the buffer runs dry, so the cost of
/// generation is paid in bursts instead of on every call.
///
/// A pool with a capacity of zero is disabled: it never allocates a buffer,
/// [`get`](Pool::get) returns `None` and [`get_batch`](Pool::get_batch) calls the
/// source directly.
///
/// The pool adds no uniqueness of its own, the strings are exactly as unique
/// as the source makes them.
///
/// # Example
///
/// ```
/// use snipid::Pool;
///
/// let mut counter = 0;
/// let mut pool = Pool::new(3, move || {
///     counter += 1;
///     counter.to_string()
/// });
///
/// assert_eq!(pool.len(), 3);
/// assert!(pool.get().is_some());
/// assert_eq!(pool.get_batch(5).len(), 5);
/// ```
#[derive(Debug)]
pub struct Pool<S> {
    capacity: usize,
    buffer: Vec<String>,
    source: S,
}

impl<S: Mint> Pool<S> {
    /// Creates a pool holding up to `capacity` strings from `source`, and fills it
    /// up to `capacity`, in as many refills as that takes.
    pub fn new(capacity: usize, source: S) -> Self {
        let mut pool = Self {
            capacity,
            buffer: Vec::new(),
            source,
        };

        while pool.buffer.len() < capacity {
            pool.refill(capacity);
        }

        pool
    }

    /// Takes one buffered string, refilling first if the buffer is empty.
    ///
    /// Returns `None` if pooling is disabled (capacity zero).
    pub fn get(&mut self) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }

        if self.buffer.is_empty() {
            self.refill(self.capacity);
        }

        self.buffer.pop()
    }

    /// Takes exactly `count` strings, oldest first.
    ///
    /// Refills as often as needed to hold `count` strings, even beyond capacity.
    /// With pooling disabled, the source is called `count` times instead.
    pub fn get_batch(&mut self, count: usize) -> Vec<String> {
        if self.capacity == 0 {
            return (0..count).map(|_| self.source.mint()).collect();
        }

        let target = self.capacity.max(count);
        while self.buffer.len() < count {
            self.refill(target);
        }

        self.buffer.drain(..count).collect()
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    fn refill(&mut self, target: usize) {
        let batch = target.saturating_sub(self.buffer.len()).min(MAX_REFILL);

        self.buffer.reserve(batch);
        for _ in 0..batch {
            let minted = self.source.mint();
            self.buffer.push(minted);
        }
    }
}

impl<S> Pool<S> {
    /// Number of strings currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Checks whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The configured capacity, zero when pooling is disabled.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gives access to the source, e.g. to bypass a disabled pool.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Gives read access to the source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The buffered strings, oldest first.
    #[must_use]
    pub fn buffered(&self) -> &[String] {
        &self.buffer
    }

    /// Drops all buffered strings. They are not handed out anymore.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn counting() -> (Rc<Cell<usize>>, impl FnMut() -> String) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source = move || {
            counter.set(counter.get() + 1);
            counter.get().to_string()
        };
        (calls, source)
    }

    #[test]
    fn test_disabled_pool() {
        let (calls, source) = counting();
        let mut pool = Pool::new(0, source);

        assert_eq!(pool.get(), None);
        assert_eq!(pool.buffer.capacity(), 0);
        assert_eq!(calls.get(), 0);

        assert_eq!(pool.get_batch(3), ["1", "2", "3"]);
        assert_eq!(pool.source_mut().mint(), "4");
        assert_eq!(pool.buffer.capacity(), 0);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_prefill_and_get() {
        let (calls, source) = counting();
        let mut pool = Pool::new(3, source);

        assert_eq!(calls.get(), 3);
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.get().as_deref(), Some("3"));
        assert_eq!(pool.get().as_deref(), Some("2"));
        assert_eq!(pool.get().as_deref(), Some("1"));
        assert!(pool.is_empty());
        assert_eq!(calls.get(), 3);

        // Refills on exhaustion only.
        assert_eq!(pool.get().as_deref(), Some("6"));
        assert_eq!(calls.get(), 6);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_batch_larger_than_capacity() {
        let (_calls, source) = counting();
        let mut pool = Pool::new(4, source);

        let batch = pool.get_batch(10);
        assert_eq!(batch.len(), 10);
        assert_eq!(batch[0], "1");
        assert_eq!(batch[9], "10");

        assert_eq!(pool.get_batch(0).len(), 0);
    }

    #[test]
    fn test_prefill_beyond_refill_cap() {
        let (calls, source) = counting();
        let mut pool = Pool::new(2500, source);

        assert_eq!(calls.get(), 2500);
        assert_eq!(pool.len(), 2500);

        let batch = pool.get_batch(2500);
        assert_eq!(batch.len(), 2500);
        assert_eq!(calls.get(), 2500);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_refill_on_get_is_capped() {
        let (calls, source) = counting();
        let mut pool = Pool::new(2500, source);

        pool.clear();
        assert!(pool.get().is_some());
        assert_eq!(calls.get(), 3500);
        assert_eq!(pool.len(), 999);
    }

    #[test]
    fn test_capacity_and_clear() {
        let (calls, source) = counting();
        let mut pool = Pool::new(3, source);
        assert_eq!(pool.capacity(), 3);

        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 3);
        assert_eq!(calls.get(), 3);

        // Cleared strings are never handed out.
        assert_eq!(pool.get().as_deref(), Some("6"));
        assert_eq!(pool.get_batch(2), ["4", "5"]);

        let (_calls, source) = counting();
        assert_eq!(Pool::new(0, source).capacity(), 0);
    }
}
