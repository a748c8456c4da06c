use std::{collections::HashMap, fmt, str::FromStr};

use crate::Error;

// cspell:disable-next-line
const BASE62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// An ordered set of symbols used both as numeral digits and as the salt alphabet.
///
/// The position of a symbol is its digit value: the first symbol is `0`,
/// the second `1` and so on. An `Alphabet` always holds at least two symbols,
/// and every symbol occurs only once, so decoding is unambiguous.
///
/// # Example
///
/// ```
/// use snipid::Alphabet;
///
/// let alphabet = Alphabet::new("ABC".chars())?;
///
/// assert_eq!(alphabet.len(), 3);
/// assert_eq!(alphabet.index_of('C'), Some(2));
/// assert_eq!(alphabet.symbol(1), Some('B'));
///
/// assert!(Alphabet::new("A".chars()).is_err());
/// assert!(Alphabet::new("ABA".chars()).is_err());
/// # Ok::<(), snipid::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    lookup: HashMap<char, u32>,
}

impl Alphabet {
    /// Creates an alphabet from an ordered sequence of symbols.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AlphabetTooShort`] for less than two symbols,
    /// and with [`Error::DuplicateSymbol`] when a symbol is repeated.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self, Error> {
        let symbols: Vec<char> = symbols.into_iter().collect();

        if symbols.len() < 2 {
            return Err(Error::AlphabetTooShort);
        }

        let mut lookup = HashMap::with_capacity(symbols.len());
        for (index, &symbol) in symbols.iter().enumerate() {
            let index = u32::try_from(index).map_err(|_| Error::Overflow)?;
            if lookup.insert(symbol, index).is_some() {
                return Err(Error::DuplicateSymbol(symbol));
            }
        }

        Ok(Self { symbols, lookup })
    }

    /// The 62 ASCII digits and letters, digits first, then upper case, then lower case.
    #[must_use]
    pub fn base62() -> Self {
        Self::new(BASE62.chars()).unwrap_or_else(|_| unreachable!("base62 alphabet is valid"))
    }

    /// Number of symbols, the radix of the encoding.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`, an alphabet holds at least two symbols.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The radix as a 128 bit number, ready for arithmetic.
    #[must_use]
    pub(crate) fn radix(&self) -> u128 {
        self.symbols.len() as u128
    }

    /// Returns the symbol with the digit value `index`.
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Returns the digit value of `symbol`, or `None` if it is not part of the alphabet.
    #[must_use]
    pub fn index_of(&self, symbol: char) -> Option<u32> {
        self.lookup.get(&symbol).copied()
    }

    /// Checks whether `symbol` is part of the alphabet.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.lookup.contains_key(&symbol)
    }

    /// The symbols in digit order.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base62()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.to_string()).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.chars())
    }
}

impl TryFrom<&[char]> for Alphabet {
    type Error = Error;

    fn try_from(symbols: &[char]) -> Result<Self, Self::Error> {
        Self::new(symbols.iter().copied())
    }
}
