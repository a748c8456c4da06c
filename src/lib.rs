//! # Short Structured Identifiers
//!
//! This crate generates short identifiers, like order numbers, session ids or
//! short link slugs, with a structure similar to Snowflake ids: a timestamp,
//! an optional worker id and datacenter id, and a random salt. Unlike Snowflake
//! ids they are not integers but strings written with any alphabet you choose.
//! An identifier can later be split back into its fields.
//!
//! ## Generating Identifiers
//!
//! Identifiers are generated by a [`SnipId`] generator:
//!
//! ```
//! use snipid::SnipId;
//!
//! let mut generator = SnipId::default();
//!
//! let id = generator.generate();
//! let ids = generator.batch(10);
//!
//! assert_eq!(ids.len(), 10);
//! ```
//!
//! For a single identifier there is the shortcut [`generate()`].
//!
//! ## Configuring Identifiers
//!
//! Everything about an identifier is configured with [`Options`]:
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use snipid::{Options, RandomStrategy, SnipId};
//!
//! let options = Options::default()
//!     .with_symbols("ABCDEFGHJKLMNPQRSTUVWXYZ23456789".parse()?)
//!     .with_prefix("ord-")
//!     .with_interval(1000)
//!     .with_salt_length(4)
//!     .with_random_strategy(RandomStrategy::Secure)
//!     .with_collision_detection(true);
//!
//! let mut generator = SnipId::new(options)?;
//!
//! let id = generator.generate();
//! assert!(id.starts_with("ord-"));
//! # Ok(()) }
//! ```
//!
//! Creating a generator fails with an [`Error`] if the worker id or datacenter id
//! is out of range. An [`Alphabet`] with less than two symbols or with repeated
//! symbols cannot be built in the first place.
//!
//! ## Parsing Identifiers
//!
//! A generator splits identifiers into their fields with [`SnipId::parse()`].
//! Without a generator at hand, a [`Parser`] does the same for given options:
//!
//! ```
//! use snipid::{Options, SnipId};
//!
//! let options = Options::default().with_interval(1000).with_worker_id(7);
//! let mut generator = SnipId::new(options.clone())?;
//!
//! let id = generator.generate();
//! let parsed = snipid::parse(&id, &options);
//!
//! assert_eq!(parsed.worker_id, Some(7));
//! assert!(parsed.timestamp.is_some());
//! # Ok::<(), snipid::Error>(())
//! ```
//!
//! Parsing never fails. It only works for identifiers generated with the same
//! options, anything else yields meaningless fields.
//!
//! ## Loading Options with `Serde`
//!
//! For serializing/deserializing the feature flag `serde` needs to be enabled:
//!
//! ```bash
//! cargo add snipid -F serde
//! ```
//!
//! Once the `serde` feature is enabled, options can be part of any configuration.
//! Missing fields take their default values:
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! # #[cfg(feature = "serde")]
//! # {
//! # use serde_derive as serde;
//! use serde::Deserialize;
//! use snipid::{Options, SnipId};
//!
//! #[derive(Deserialize)]
//! struct Config {
//!     listen: String,
//!     ids: Options,
//! }
//!
//! let json = r#"{ "listen": "0.0.0.0:8080", "ids": { "prefix": "s-", "saltLength": 8 } }"#;
//! let config: Config = serde_json::from_str(json)?;
//!
//! let mut generator = SnipId::new(config.ids)?;
//! assert!(generator.generate().starts_with("s-"));
//! # }
//! # Ok(()) }
//! ```
//!
//! ## Random Strategies
//!
//! The salt is drawn by a [`RandomGenerator`] picked with [`RandomStrategy`]:
//!
//! - [`RandomStrategy::Default`]: fast uniform draws from a seeded pseudo-random generator.
//! - [`RandomStrategy::Nanoid`]: rejection sampling of random bytes, free of modulo bias.
//! - [`RandomStrategy::Secure`]: randomness from the operating system, unbiased for any
//!   alphabet size. If the operating system cannot deliver, the default strategy is used
//!   instead, without raising an error.
//!
//! ## Guarantees
//!
//! With collision detection enabled, a generator never hands out the same identifier
//! twice. It remembers every identifier for its whole lifetime (see
//! [`SnipId::clear_seen()`]). There is no uniqueness across generators or processes,
//! other than what worker ids, datacenter ids and the salt make likely.
//!
//! Generators are not synchronized. Use one generator per thread, or guard it with a mutex.
//!
//! ## Feature Flags
//!
//! - **`serde`**: Serialization of [`Options`], [`Alphabet`], [`RandomStrategy`] and [`ParsedId`] via `Serde`, optional.
//! - **`tracing`**: Spans and events via `tracing` for generation, parsing, pool refills and
//!   random source fallbacks, optional.
//!

mod alphabet;
mod base_n;
mod error;
mod generator;
mod options;
mod parser;
mod pool;
mod random;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod util;

pub use alphabet::Alphabet;
pub use base_n::{decode, encode};
pub use error::Error;
pub use generator::SnipId;
pub use options::{IdLayout, Options, MAX_DATACENTER_ID, MAX_WORKER_ID};
pub use parser::{parse, ParsedId, Parser};
pub use pool::{Mint, Pool, MAX_REFILL};
pub use random::{
    create_random_generator, DefaultRandom, NanoidRandom, RandomGenerator, RandomStrategy, SecureRandom,
};
pub use time::{SystemClock, TimeSource, DEFAULT_EPOCH};

/// Salt length of the identifiers returned by [`generate()`].
pub const SHORTCUT_SALT_LENGTH: usize = 4;

/// Generates a single identifier with default options, except for a shorter
/// salt of [`SHORTCUT_SALT_LENGTH`] symbols.
///
/// Every call creates and drops a generator, so collision detection and
/// pooling don't apply. Keep a [`SnipId`] around when generating many identifiers.
///
/// # Example
///
/// ```
/// use snipid::{Options, SHORTCUT_SALT_LENGTH};
///
/// let id = snipid::generate();
///
/// let options = Options::default().with_salt_length(SHORTCUT_SALT_LENGTH);
/// assert_eq!(snipid::parse(&id, &options).salt.len(), 4);
/// ```
#[must_use]
pub fn generate() -> String {
    let options = Options::default().with_salt_length(SHORTCUT_SALT_LENGTH);
    SnipId::build(options, SystemClock, create_random_generator(RandomStrategy::Default)).generate()
}
