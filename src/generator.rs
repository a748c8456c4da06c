use std::{collections::HashSet, fmt};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    base_n, create_random_generator, Error, IdLayout, Mint, Options, ParsedId, Parser, Pool, RandomGenerator,
    RandomStrategy, SystemClock, TimeSource, MAX_DATACENTER_ID, MAX_WORKER_ID,
};

/// A generator for short identifiers.
///
/// An identifier is built from, in this order:
///
/// - the prefix,
/// - the number of intervals elapsed since the epoch, written with the alphabet
///   (left out entirely while it is zero, or if the interval is zero),
/// - the worker id and the datacenter id, if configured,
/// - the salt, `salt_length` random symbols.
///
/// Every instance is independent. Instances are not synchronized, give each thread
/// its own generator (for example one per worker id) or wrap it in a `Mutex`.
///
/// # Example
///
/// ```
/// use snipid::{Options, SnipId};
///
/// let options = Options::default()
///     .with_prefix("t-")
///     .with_interval(1000)
///     .with_worker_id(1)
///     .with_datacenter_id(1);
///
/// let mut generator = SnipId::new(options)?;
///
/// let id = generator.generate();
/// assert!(id.starts_with("t-"));
///
/// let parsed = generator.parse(&id);
/// assert_eq!(parsed.worker_id, Some(1));
/// assert_eq!(parsed.datacenter_id, Some(1));
/// assert_eq!(parsed.salt.len(), 6);
/// # Ok::<(), snipid::Error>(())
/// ```
pub struct SnipId<T = SystemClock> {
    parser: Parser,
    pool: Pool<Minter<T>>,
}

impl SnipId {
    /// Creates a generator reading the system clock.
    ///
    /// # Errors
    ///
    /// Fails if the worker id or the datacenter id is out of range, see [`Options::validate`].
    pub fn new(options: Options) -> Result<Self, Error> {
        Self::with_time_source(options, SystemClock)
    }
}

impl Default for SnipId {
    /// A generator with [`Options::default()`].
    fn default() -> Self {
        Self::build(
            Options::default(),
            SystemClock,
            create_random_generator(RandomStrategy::Default),
        )
    }
}

impl<T: TimeSource> SnipId<T> {
    /// Creates a generator reading the time from `time`.
    ///
    /// # Errors
    ///
    /// Fails if the worker id or the datacenter id is out of range, see [`Options::validate`].
    pub fn with_time_source(options: Options, time: T) -> Result<Self, Error> {
        let random = create_random_generator(options.random_strategy);
        Self::from_parts(options, time, random)
    }

    /// Creates a generator with its own source of randomness.
    ///
    /// The `random_strategy` of `options` is ignored here.
    ///
    /// # Errors
    ///
    /// Fails if the worker id or the datacenter id is out of range, see [`Options::validate`].
    pub fn from_parts(options: Options, time: T, random: Box<dyn RandomGenerator>) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self::build(options, time, random))
    }

    /// Skips validation, `options` must be known to be valid.
    pub(crate) fn build(options: Options, time: T, random: Box<dyn RandomGenerator>) -> Self {
        let parser = Parser::new(&options);
        let pool_size = options.pool_size;

        let minter = Minter {
            worker: id_field(options.worker_id.map(u128::from), MAX_WORKER_ID.into(), &options),
            datacenter: id_field(options.datacenter_id.map(u128::from), MAX_DATACENTER_ID.into(), &options),
            seen: options.collision_detection.then(HashSet::new),
            options,
            random,
            time,
        };

        Self {
            parser,
            pool: Pool::new(pool_size, minter),
        }
    }

    /// Returns a new identifier.
    ///
    /// With pooling enabled, the identifier is taken from the pool, so its
    /// timestamp is the time the pool was last refilled.
    ///
    /// # Hangs
    ///
    /// With collision detection enabled, a fresh salt is drawn until the identifier
    /// is new. Once the alphabet and salt length run out of combinations for the
    /// current timestamp, this never returns.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&mut self) -> String {
        match self.pool.get() {
            Some(id) => id,
            None => self.pool.source_mut().mint(),
        }
    }

    /// Returns `count` new identifiers.
    ///
    /// Drains the pool if pooling is enabled, otherwise generates them one by one.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn batch(&mut self, count: usize) -> Vec<String> {
        self.pool.get_batch(count)
    }

    /// Splits an identifier into its fields, see [`Parser::parse`].
    #[must_use]
    pub fn parse(&self, id: &str) -> ParsedId {
        self.parser.parse(id)
    }

    /// The options this generator was created with.
    #[must_use]
    pub const fn options(&self) -> &Options {
        self.parser.options()
    }

    /// Number of identifiers waiting in the pool.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Number of identifiers remembered by collision detection.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.pool.source().seen.as_ref().map_or(0, HashSet::len)
    }

    /// Forgets all handed out identifiers, bounding the memory collision detection uses.
    ///
    /// Identifiers still waiting in the pool are kept, so they remain unique.
    /// Identifiers handed out before may be generated again afterwards.
    pub fn clear_seen(&mut self) {
        let pending = self.pool.buffered().to_vec();
        if let Some(seen) = self.pool.source_mut().seen.as_mut() {
            seen.clear();
            seen.extend(pending);
        }
    }
}

impl<T> fmt::Debug for SnipId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnipId")
            .field("options", self.parser.options())
            .field("pooled", &self.pool.len())
            .finish_non_exhaustive()
    }
}

/// Builds identifiers one at a time, the source behind the pool.
struct Minter<T> {
    options: Options,
    random: Box<dyn RandomGenerator>,
    time: T,
    worker: String,
    datacenter: String,
    seen: Option<HashSet<String>>,
}

impl<T: TimeSource> Minter<T> {
    fn timestamp(&self) -> String {
        let Options { epoch, interval, .. } = self.options;

        if interval == 0 {
            return String::new();
        }

        let elapsed = self.time.current_millis().saturating_sub(epoch) / interval;
        base_n::encode(elapsed.into(), &self.options.symbols)
    }
}

impl<T: TimeSource> Mint for Minter<T> {
    fn mint(&mut self) -> String {
        let timestamp = self.timestamp();

        loop {
            let salt = self.random.generate(self.options.salt_length, &self.options.symbols);
            let id = format!(
                "{prefix}{timestamp}{worker}{datacenter}{salt}",
                prefix = self.options.prefix,
                worker = self.worker,
                datacenter = self.datacenter,
            );

            if let Some(seen) = self.seen.as_mut() {
                if !seen.insert(id.clone()) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%id, "collision, drawing a new salt");
                    continue;
                }
            }

            return id;
        }
    }
}

fn id_field(id: Option<u128>, max: u128, options: &Options) -> String {
    let Some(id) = id else {
        return String::new();
    };

    match options.layout {
        IdLayout::Compact => id.to_string(),
        IdLayout::Fixed => {
            let width = base_n::width_for(max, &options.symbols);
            base_n::encode_fixed(id, width, &options.symbols)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::{Alphabet, DefaultRandom};

    const EPOCH: u64 = 1_000_000;

    #[derive(Clone)]
    struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        fn at(millis: u64) -> Self {
            Self(Arc::new(AtomicU64::new(millis)))
        }
        fn set(&self, millis: u64) {
            self.0.store(millis, Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualClock {
        fn current_millis(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Cycles through the four salts of length 2 over a binary alphabet.
    struct Cycle(Arc<AtomicUsize>);

    impl RandomGenerator for Cycle {
        fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            base_n::encode_fixed((n % 4) as u128, length, alphabet)
        }
    }

    fn options() -> Options {
        Options::default().with_epoch(EPOCH).with_interval(10)
    }

    #[test]
    fn test_layout() {
        let clock = ManualClock::at(EPOCH + 625);
        let options = options().with_prefix("o-").with_worker_id(3).with_datacenter_id(0);
        let mut generator =
            SnipId::from_parts(options, clock, Box::new(DefaultRandom::from_seed(1))).unwrap();

        let id = generator.generate();
        assert_eq!(id.len(), 2 + 2 + 1 + 1 + 6);
        assert!(id.starts_with("o-1030"), "{id}");
    }

    #[test]
    fn test_fixed_layout() {
        let clock = ManualClock::at(EPOCH);
        let options = options()
            .with_layout(IdLayout::Fixed)
            .with_worker_id(1023)
            .with_datacenter_id(5)
            .with_salt_length(3);
        let mut generator = SnipId::with_time_source(options, clock).unwrap();

        let id = generator.generate();
        assert!(id.starts_with("GV5"), "{id}");

        let parsed = generator.parse(&id);
        assert_eq!(parsed.timestamp, Some(EPOCH));
        assert_eq!(parsed.worker_id, Some(1023));
        assert_eq!(parsed.datacenter_id, Some(5));
        assert_eq!(parsed.salt, &id[3..]);
    }

    #[test]
    fn test_timestamp_field() {
        let clock = ManualClock::at(EPOCH - 5);
        let mut generator = SnipId::with_time_source(options(), clock.clone()).unwrap();

        // Before the epoch and right at it, there is no timestamp field.
        assert_eq!(generator.generate().len(), 6);
        clock.set(EPOCH + 9);
        assert_eq!(generator.generate().len(), 6);

        clock.set(EPOCH + 10);
        assert!(generator.generate().starts_with('1'));

        clock.set(EPOCH + 620);
        let id = generator.generate();
        assert!(id.starts_with("10"), "{id}");
        assert_eq!(generator.parse(&id).timestamp, Some(EPOCH + 620));
    }

    #[test]
    fn test_interval_zero() {
        let clock = ManualClock::at(EPOCH + 1_000_000);
        let mut generator = SnipId::with_time_source(options().with_interval(0), clock).unwrap();
        assert_eq!(generator.generate().len(), 6);
    }

    #[test]
    fn test_collision_retry() {
        let clock = ManualClock::at(EPOCH);
        let calls = Arc::new(AtomicUsize::new(0));
        let options = options()
            .with_symbols("AB".parse().unwrap())
            .with_salt_length(2)
            .with_collision_detection(true);

        let mut generator = SnipId::from_parts(options, clock, Box::new(Cycle(Arc::clone(&calls)))).unwrap();

        let mut ids: Vec<String> = (0..4).map(|_| generator.generate()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(generator.seen_count(), 4);

        ids.sort();
        assert_eq!(ids, ["AA", "AB", "BA", "BB"]);

        // Every salt is taken now, forgetting them makes room again.
        generator.clear_seen();
        assert_eq!(generator.seen_count(), 0);
        assert_eq!(generator.generate(), "AA");
    }

    #[test]
    fn test_collision_skips_duplicates() {
        let clock = ManualClock::at(EPOCH);
        let calls = Arc::new(AtomicUsize::new(0));
        let options = options()
            .with_symbols("AB".parse().unwrap())
            .with_salt_length(2)
            .with_collision_detection(true);
        let mut generator = SnipId::from_parts(options, clock, Box::new(Cycle(Arc::clone(&calls)))).unwrap();

        assert_eq!(generator.generate(), "AA");
        calls.store(4, Ordering::SeqCst);
        // The cycle repeats "AA" first, which is rejected.
        assert_eq!(generator.generate(), "AB");
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_pooled_generation() {
        let clock = ManualClock::at(EPOCH);
        let options = options().with_pool_size(5).with_collision_detection(true);
        let mut generator = SnipId::with_time_source(options, clock).unwrap();

        assert_eq!(generator.pooled(), 5);
        assert_eq!(generator.seen_count(), 5);

        generator.generate();
        assert_eq!(generator.pooled(), 4);

        assert_eq!(generator.batch(12).len(), 12);
        assert_eq!(generator.pooled(), 0);

        // Pooled identifiers stay reserved across clear_seen.
        generator.generate();
        assert_eq!(generator.pooled(), 4);
        generator.clear_seen();
        assert_eq!(generator.seen_count(), 4);
    }

    #[test]
    fn test_rejects_invalid_options() {
        assert_eq!(
            SnipId::new(Options::default().with_worker_id(1024)).unwrap_err(),
            Error::WorkerIdOutOfRange(1024)
        );
        assert_eq!(
            SnipId::new(Options::default().with_datacenter_id(32)).unwrap_err(),
            Error::DatacenterIdOutOfRange(32)
        );
    }

    #[test]
    fn test_debug() {
        let generator = SnipId::new(options().with_pool_size(2)).unwrap();
        let debug = format!("{generator:?}");
        assert!(debug.starts_with("SnipId { options: Options {"), "{debug}");
        assert!(debug.contains("pooled: 2"), "{debug}");
    }
}
