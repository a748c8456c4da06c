use std::{
    fmt,
    time::{Duration, SystemTime},
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{base_n, util, Alphabet, IdLayout, Options};

/// The fields recovered from an identifier by [`Parser::parse`].
///
/// Parsing is best-effort: a field is `None` if it is disabled in the options,
/// missing from the identifier, or could not be decoded. Nothing checks that the
/// identifier was produced with the same options, so fields read from a foreign
/// identifier are unverified.
#[derive(Clone, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ParsedId {
    /// Start of the interval the identifier was generated in, milliseconds since the Unix epoch.
    pub timestamp: Option<u64>,
    /// The worker id.
    pub worker_id: Option<u16>,
    /// The datacenter id.
    pub datacenter_id: Option<u8>,
    /// All symbols after the id fields.
    pub salt: String,
}

impl ParsedId {
    /// Returns the timestamp as a [`SystemTime`].
    #[must_use]
    pub fn datetime(&self) -> Option<SystemTime> {
        self.timestamp
            .and_then(|millis| SystemTime::UNIX_EPOCH.checked_add(Duration::from_millis(millis)))
    }
}

impl fmt::Debug for ParsedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_parsed(self, f)
    }
}

/// Splits identifiers into their fields.
///
/// A parser must be built from the same [`Options`] which generated the
/// identifiers. The prefix is removed if present, its absence is tolerated.
///
/// # Example
///
/// ```
/// use snipid::{Options, Parser};
///
/// let options = Options::default()
///     .with_prefix("t-")
///     .with_interval(1000)
///     .with_epoch(0)
///     .with_legacy_ids(1, 2)
///     .with_salt_length(3);
///
/// let parsed = Parser::new(&options).parse("t-1012xyz");
///
/// assert_eq!(parsed.timestamp, Some(62_000));
/// assert_eq!(parsed.worker_id, Some(1));
/// assert_eq!(parsed.datacenter_id, Some(2));
/// assert_eq!(parsed.salt, "xyz");
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    options: Options,
    worker_width: usize,
    datacenter_width: usize,
}

impl Parser {
    /// Creates a parser for identifiers generated with `options`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            options: options.clone(),
            worker_width: options.worker_width(),
            datacenter_width: options.datacenter_width(),
        }
    }

    /// The options this parser reads identifiers with.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Splits `id` into timestamp, worker id, datacenter id and salt.
    ///
    /// The timestamp field has no fixed width: it is whatever is left in front of
    /// the id fields and the salt.
    #[must_use]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn parse(&self, id: &str) -> ParsedId {
        let options = &self.options;

        let rest = id.strip_prefix(options.prefix.as_str()).unwrap_or(id);
        let chars: Vec<char> = rest.chars().collect();

        let mut parsed = ParsedId::default();
        let mut position = 0;

        if options.interval > 0 && !chars.is_empty() {
            let fixed = self.worker_width + self.datacenter_width + options.salt_length;
            let length = chars.len().saturating_sub(fixed);
            let digits: String = chars[..length].iter().collect();

            parsed.timestamp = base_n::decode(&digits, &options.symbols)
                .ok()
                .and_then(|units| units.checked_mul(u128::from(options.interval)))
                .and_then(|millis| millis.checked_add(u128::from(options.epoch)))
                .and_then(|millis| u64::try_from(millis).ok());

            position = length;
        }

        if options.worker_id.is_some() && position < chars.len() {
            let field = take(&chars, position, self.worker_width);
            parsed.worker_id = read_field(field, options.layout, &options.symbols)
                .and_then(|value| u16::try_from(value).ok());
            position += field.len();
        }

        if options.datacenter_id.is_some() && position < chars.len() {
            let field = take(&chars, position, self.datacenter_width);
            parsed.datacenter_id = read_field(field, options.layout, &options.symbols)
                .and_then(|value| u8::try_from(value).ok());
            position += field.len();
        }

        parsed.salt = chars[position..].iter().collect();
        parsed
    }
}

/// Parses `id` with a throwaway [`Parser`] for `options`.
#[must_use]
pub fn parse(id: &str, options: &Options) -> ParsedId {
    Parser::new(options).parse(id)
}

fn take(chars: &[char], position: usize, width: usize) -> &[char] {
    let end = position.saturating_add(width).min(chars.len());
    &chars[position..end]
}

fn read_field(field: &[char], layout: IdLayout, symbols: &Alphabet) -> Option<u128> {
    match layout {
        IdLayout::Compact => {
            let &c = field.first()?;
            c.to_digit(10).or_else(|| symbols.index_of(c)).map(u128::from)
        }
        IdLayout::Fixed => {
            let digits: String = field.iter().collect();
            base_n::decode(&digits, symbols).ok()
        }
    }
}
