use crate::{time::DEFAULT_EPOCH, Alphabet, Error, RandomStrategy};

/// Largest allowed worker id.
pub const MAX_WORKER_ID: u16 = 1023;

/// Largest allowed datacenter id.
pub const MAX_DATACENTER_ID: u8 = 31;

/// How worker and datacenter ids are written into an identifier.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IdLayout {
    /// Each id is written as its decimal number and read back as a single character.
    ///
    /// The decimal digits need not be part of the alphabet. When reading, a
    /// character which is not a decimal digit is taken as its position in the
    /// alphabet. Only ids below 10 survive a round trip through
    /// [`SnipId::parse`](crate::SnipId::parse), larger ids span several characters
    /// which the parser cannot tell apart from the salt.
    #[default]
    Compact,
    /// Each id is written with the alphabet, left-padded to the width its maximum value needs.
    ///
    /// With the default 62 symbols a worker id takes two symbols and a datacenter
    /// id one. Every id in range survives a round trip.
    Fixed,
}

/// Configuration of a [`SnipId`](crate::SnipId) generator.
///
/// All fields are public and every field has a default, so options are
/// usually built from [`Options::default()`] with the `with_*` setters:
///
/// ```
/// use snipid::{Options, RandomStrategy};
///
/// let options = Options::default()
///     .with_prefix("ord-")
///     .with_interval(1000)
///     .with_worker_id(3)
///     .with_random_strategy(RandomStrategy::Secure);
///
/// assert_eq!(options.worker_id, Some(3));
/// assert!(options.validate().is_ok());
/// ```
///
/// Options are checked when a generator is created, see [`Options::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Options {
    /// Alphabet for the timestamp and the salt. Defaults to [`Alphabet::base62`].
    pub symbols: Alphabet,
    /// Number of random symbols at the end of each identifier. Defaults to 6.
    pub salt_length: usize,
    /// Origin of the timestamp field, in milliseconds since the Unix epoch.
    /// Defaults to [`DEFAULT_EPOCH`].
    pub epoch: u64,
    /// Length of one timestamp unit in milliseconds. Zero leaves out the timestamp.
    /// Defaults to 1.
    pub interval: u64,
    /// Literal text in front of every identifier. Defaults to empty.
    pub prefix: String,
    /// Worker id in `0..=1023`, or `None` to leave the field out.
    pub worker_id: Option<u16>,
    /// Datacenter id in `0..=31`, or `None` to leave the field out.
    pub datacenter_id: Option<u8>,
    /// Layout of the worker and datacenter fields.
    pub layout: IdLayout,
    /// How the salt is drawn.
    pub random_strategy: RandomStrategy,
    /// Remember every identifier and never hand out one twice.
    pub collision_detection: bool,
    /// Number of identifiers generated ahead of time. Zero disables pooling.
    pub pool_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            symbols: Alphabet::base62(),
            salt_length: 6,
            epoch: DEFAULT_EPOCH,
            interval: 1,
            prefix: String::new(),
            worker_id: None,
            datacenter_id: None,
            layout: IdLayout::Compact,
            random_strategy: RandomStrategy::Default,
            collision_detection: false,
            pool_size: 0,
        }
    }
}

impl Options {
    /// Checks the ranges of the worker and datacenter ids.
    ///
    /// The alphabet has been checked already when it was built.
    ///
    /// # Errors
    ///
    /// [`Error::WorkerIdOutOfRange`] or [`Error::DatacenterIdOutOfRange`].
    pub const fn validate(&self) -> Result<(), Error> {
        if let Some(id) = self.worker_id {
            if id > MAX_WORKER_ID {
                return Err(Error::WorkerIdOutOfRange(id));
            }
        }
        if let Some(id) = self.datacenter_id {
            if id > MAX_DATACENTER_ID {
                return Err(Error::DatacenterIdOutOfRange(id));
            }
        }
        Ok(())
    }

    /// Sets the alphabet.
    #[must_use]
    pub fn with_symbols(mut self, symbols: Alphabet) -> Self {
        self.symbols = symbols;
        self
    }

    /// Sets the number of random symbols.
    #[must_use]
    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    /// Sets the epoch, in milliseconds since the Unix epoch.
    #[must_use]
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Sets the timestamp unit in milliseconds, zero disables the timestamp.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables the worker field. Zero is a regular id here, not "disabled".
    #[must_use]
    pub fn with_worker_id(mut self, worker_id: u16) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Enables the datacenter field. Zero is a regular id here, not "disabled".
    #[must_use]
    pub fn with_datacenter_id(mut self, datacenter_id: u8) -> Self {
        self.datacenter_id = Some(datacenter_id);
        self
    }

    /// Sets both ids the way older configurations do, where `0` means "no field".
    ///
    /// ```
    /// use snipid::Options;
    ///
    /// let options = Options::default().with_legacy_ids(0, 7);
    ///
    /// assert_eq!(options.worker_id, None);
    /// assert_eq!(options.datacenter_id, Some(7));
    /// ```
    #[must_use]
    pub fn with_legacy_ids(mut self, worker_id: u16, datacenter_id: u8) -> Self {
        self.worker_id = (worker_id > 0).then_some(worker_id);
        self.datacenter_id = (datacenter_id > 0).then_some(datacenter_id);
        self
    }

    /// Sets the layout of the id fields.
    #[must_use]
    pub fn with_layout(mut self, layout: IdLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the random strategy.
    #[must_use]
    pub fn with_random_strategy(mut self, random_strategy: RandomStrategy) -> Self {
        self.random_strategy = random_strategy;
        self
    }

    /// Turns collision detection on or off.
    #[must_use]
    pub fn with_collision_detection(mut self, enabled: bool) -> Self {
        self.collision_detection = enabled;
        self
    }

    /// Sets the pool size, zero disables pooling.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Number of symbols the worker field takes, zero if it is disabled.
    pub(crate) fn worker_width(&self) -> usize {
        self.worker_id
            .map_or(0, |_| self.field_width(u128::from(MAX_WORKER_ID)))
    }

    /// Number of symbols the datacenter field takes, zero if it is disabled.
    pub(crate) fn datacenter_width(&self) -> usize {
        self.datacenter_id
            .map_or(0, |_| self.field_width(u128::from(MAX_DATACENTER_ID)))
    }

    fn field_width(&self, max: u128) -> usize {
        match self.layout {
            IdLayout::Compact => 1,
            IdLayout::Fixed => crate::base_n::width_for(max, &self.symbols),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.symbols.len(), 62);
        assert_eq!(options.salt_length, 6);
        assert_eq!(options.interval, 1);
        assert_eq!(options.worker_id, None);
        assert_eq!(options.datacenter_id, None);
        assert_eq!(options.pool_size, 0);
        assert!(!options.collision_detection);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Options::default().with_worker_id(0).validate().is_ok());
        assert!(Options::default().with_worker_id(1023).validate().is_ok());
        assert_eq!(
            Options::default().with_worker_id(1024).validate(),
            Err(Error::WorkerIdOutOfRange(1024))
        );

        assert!(Options::default().with_datacenter_id(31).validate().is_ok());
        assert_eq!(
            Options::default().with_datacenter_id(32).validate(),
            Err(Error::DatacenterIdOutOfRange(32))
        );
    }

    #[test]
    fn test_field_widths() {
        let options = Options::default();
        assert_eq!(options.worker_width(), 0);
        assert_eq!(options.datacenter_width(), 0);

        let compact = options.clone().with_worker_id(0).with_datacenter_id(0);
        assert_eq!(compact.worker_width(), 1);
        assert_eq!(compact.datacenter_width(), 1);

        let fixed = compact.with_layout(IdLayout::Fixed);
        assert_eq!(fixed.worker_width(), 2);
        assert_eq!(fixed.datacenter_width(), 1);

        let ternary = fixed.with_symbols("ABC".parse().unwrap());
        assert_eq!(ternary.worker_width(), 7);
        assert_eq!(ternary.datacenter_width(), 4);
    }
}
