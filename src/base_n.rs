use crate::{Alphabet, Error};

/// Encodes `n` in base `alphabet.len()`, most significant symbol first.
///
/// Zero encodes to the empty string, so an identifier simply has no
/// timestamp field when no interval has elapsed since the epoch.
pub fn encode(n: u128, alphabet: &Alphabet) -> String {
    encode_fixed(n, 0, alphabet)
}

/// Like [`encode`], but left-pads the result with the zero symbol to at least `width` symbols.
///
/// Values which need more than `width` symbols are not truncated.
pub fn encode_fixed(mut n: u128, width: usize, alphabet: &Alphabet) -> String {
    let radix = alphabet.radix();
    let mut digits = Vec::with_capacity(width.max(8));

    while n > 0 {
        // Remainder is smaller than the alphabet length, so it always fits.
        digits.push(alphabet.symbols()[(n % radix) as usize]);
        n /= radix;
    }

    let zero = alphabet.symbols()[0];
    while digits.len() < width {
        digits.push(zero);
    }

    digits.iter().rev().collect()
}

/// Decodes a string produced by [`encode`] or [`encode_fixed`] with the same alphabet.
///
/// The empty string decodes to zero.
///
/// # Errors
///
/// Returns [`Error::InvalidChar`] for symbols not in the alphabet and
/// [`Error::Overflow`] if the value does not fit into 128 bits.
pub fn decode(s: &str, alphabet: &Alphabet) -> Result<u128, Error> {
    let radix = alphabet.radix();

    s.chars().try_fold(0u128, |n, c| {
        let digit = alphabet.index_of(c).ok_or(Error::InvalidChar)?;
        n.checked_mul(radix)
            .and_then(|n| n.checked_add(u128::from(digit)))
            .ok_or(Error::Overflow)
    })
}

/// Number of symbols needed to write every value in `0..=max`.
pub fn width_for(max: u128, alphabet: &Alphabet) -> usize {
    let radix = alphabet.radix();

    let mut width = 1;
    let mut reach = radix;
    while reach <= max {
        width += 1;
        match reach.checked_mul(radix) {
            Some(next) => reach = next,
            None => break,
        }
    }
    width
}
