use std::{convert::Infallible, fmt, str::FromStr, time::SystemTime};

use rand::{rngs::OsRng, rngs::StdRng, Rng as _, RngCore, SeedableRng as _}; // cspell:disable-line

use crate::Alphabet;

/// Selects how the random salt of an identifier is drawn.
///
/// Tags are parsed leniently: an unknown tag selects [`RandomStrategy::Default`]
/// instead of failing.
///
/// ```
/// use snipid::RandomStrategy;
///
/// assert_eq!(RandomStrategy::from_tag("secure"), RandomStrategy::Secure);
/// assert_eq!(RandomStrategy::from_tag("nanoid"), RandomStrategy::Nanoid);
/// assert_eq!(RandomStrategy::from_tag("whatever"), RandomStrategy::Default);
/// ```
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RandomStrategy {
    /// Uniform draws from a general purpose pseudo-random generator, see [`DefaultRandom`].
    #[default]
    Default,
    /// Rejection sampling of random bytes, see [`NanoidRandom`].
    Nanoid,
    /// Operating system randomness, see [`SecureRandom`].
    Secure,
}

impl RandomStrategy {
    /// Resolves a strategy tag, falling back to [`RandomStrategy::Default`] for unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "nanoid" => Self::Nanoid,
            "secure" => Self::Secure,
            _ => Self::Default,
        }
    }

    /// The tag naming this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Nanoid => "nanoid",
            Self::Secure => "secure",
        }
    }
}

impl FromStr for RandomStrategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for RandomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source for random salts.
///
/// Implementations return exactly `length` symbols taken from `alphabet`.
/// Calls are independent of each other, apart from sharing the underlying
/// source of randomness.
///
/// # Example
///
/// ```
/// use snipid::{Alphabet, RandomGenerator};
///
/// // Not random at all, but handy for reproducible output.
/// struct FirstSymbol;
///
/// impl RandomGenerator for FirstSymbol {
///     fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String {
///         std::iter::repeat(alphabet.symbols()[0]).take(length).collect()
///     }
/// }
///
/// let alphabet: Alphabet = "xyz".parse()?;
/// assert_eq!(FirstSymbol.generate(3, &alphabet), "xxx");
/// # Ok::<(), snipid::Error>(())
/// ```
pub trait RandomGenerator: Send {
    /// Returns a string of `length` symbols drawn from `alphabet`.
    fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String;
}

/// Creates the generator for `strategy`.
///
/// For [`RandomStrategy::Secure`] the operating system source is probed once, here.
/// If it is not usable, a [`DefaultRandom`] is returned instead and no error is raised.
#[must_use]
pub fn create_random_generator(strategy: RandomStrategy) -> Box<dyn RandomGenerator> {
    match strategy {
        RandomStrategy::Default => Box::new(DefaultRandom::new()),
        RandomStrategy::Nanoid => Box::new(NanoidRandom::new()),
        RandomStrategy::Secure => match SecureRandom::probe() {
            Some(secure) => Box::new(secure),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!("secure random source unavailable, using default strategy");
                Box::new(DefaultRandom::new())
            }
        },
    }
}

/// Draws each symbol independently and uniformly with a seeded [`StdRng`].
///
/// Fast, but not meant for identifiers which must be hard to guess.
pub struct DefaultRandom {
    rng: StdRng,
}

impl DefaultRandom {
    /// Creates a generator seeded from the operating system.
    ///
    /// Should the operating system refuse to deliver a seed, the generator is
    /// seeded from the system clock instead.
    #[must_use]
    pub fn new() -> Self {
        let rng = StdRng::from_rng(OsRng).unwrap_or_else(|_| StdRng::seed_from_u64(clock_seed()));
        Self { rng }
    }

    /// Creates a reproducible generator from a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DefaultRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomGenerator for DefaultRandom {
    fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String {
        let symbols = alphabet.symbols();
        (0..length).map(|_| symbols[self.rng.gen_range(0..symbols.len())]).collect()
    }
}

/// Rejection sampling in the style of `nanoid`.
///
/// Random bytes are masked down to the smallest power of two covering the
/// alphabet. Masked values outside the alphabet are dropped and drawing
/// continues until enough symbols are collected, so there is no modulo bias.
/// Every candidate byte comes fresh from the generator.
pub struct NanoidRandom {
    rng: StdRng,
    bytes: Vec<u8>,
}

impl NanoidRandom {
    /// Creates a generator seeded from the operating system, see [`DefaultRandom::new`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(OsRng).unwrap_or_else(|_| StdRng::seed_from_u64(clock_seed())))
    }

    /// Creates a reproducible generator from a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    const fn with_rng(rng: StdRng) -> Self {
        Self { rng, bytes: Vec::new() }
    }
}

impl Default for NanoidRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomGenerator for NanoidRandom {
    fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String {
        let size = alphabet.len();
        let mask = size.next_power_of_two() - 1;

        let mut id = String::with_capacity(length);
        let mut count = 0;

        if length == 0 {
            return id;
        }

        if mask > usize::from(u8::MAX) {
            // A byte cannot address alphabets this large, draw whole words.
            while count < length {
                if let Some(symbol) = alphabet.symbol(self.rng.next_u32() as usize & mask) {
                    id.push(symbol);
                    count += 1;
                }
            }
            return id;
        }

        // Enough bytes to usually finish in one round.
        let step = (8 * mask * length).div_ceil(5 * size);
        self.bytes.resize(step, 0);

        loop {
            self.rng.fill_bytes(&mut self.bytes);

            for &byte in &self.bytes {
                if let Some(symbol) = alphabet.symbol(usize::from(byte) & mask) {
                    id.push(symbol);
                    count += 1;
                    if count == length {
                        return id;
                    }
                }
            }
        }
    }
}

/// Draws from a cryptographically secure source, [`OsRng`] by default.
///
/// Each 32 bit word is masked to the smallest power of two covering the
/// alphabet. A masked value outside the alphabet is dropped and fresh words
/// are drawn until the salt is complete, so every symbol is equally likely
/// for any alphabet size. If the source fails, the salt is drawn from an
/// owned [`DefaultRandom`] instead.
pub struct SecureRandom<R = OsRng> {
    source: R,
    fallback: DefaultRandom,
    words: Vec<u32>,
}

impl SecureRandom {
    /// Returns a generator backed by [`OsRng`], or `None` if the operating system
    /// cannot deliver random bytes right now.
    #[must_use]
    pub fn probe() -> Option<Self> {
        let mut probe = [0u8; 4];
        OsRng.try_fill_bytes(&mut probe).ok()?;
        Some(Self::with_source(OsRng))
    }
}

impl<R: RngCore + Send> SecureRandom<R> {
    /// Uses `source` for randomness. Nothing is probed.
    #[must_use]
    pub fn with_source(source: R) -> Self {
        Self {
            source,
            fallback: DefaultRandom::new(),
            words: Vec::new(),
        }
    }
}

impl<R: RngCore + Send> RandomGenerator for SecureRandom<R> {
    fn generate(&mut self, length: usize, alphabet: &Alphabet) -> String {
        let size = alphabet.len();
        let mask = size.next_power_of_two() - 1;

        let mut id = String::with_capacity(length);
        let mut count = 0;

        while count < length {
            self.words.resize(length - count, 0);

            if let Err(_error) = self.source.try_fill(&mut self.words[..]) {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_error, "secure random source failed, using default strategy");
                return self.fallback.generate(length, alphabet);
            }

            for &word in &self.words {
                if let Some(symbol) = alphabet.symbol(word as usize & mask) {
                    id.push(symbol);
                    count += 1;
                }
            }
        }

        id
    }
}

fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |since_epoch| since_epoch.as_nanos());

    // Fold in the process id to keep processes started in the same tick apart.
    (nanos as u64) ^ (u64::from(std::process::id()) << 32)
}
