//! Six-bit packed integers.
//!
//! Each character carries six bits. Characters above `?` (ASCII 63) carry their code minus 64,
//! everything else carries its code as-is, which lets the wire alphabet use both `@`..`~` and
//! `?`. Characters are concatenated most significant first and the result is read as a two's
//! complement number over `6 * len` bits.
//!
//! # Examples
//!
//! ```
//! use pseudobinary::sixbit;
//! assert_eq!(Some(100), sixbit::decode("Ad").unwrap());
//! assert_eq!(Some(-5), sixbit::decode("??{").unwrap());
//! assert_eq!(None, sixbit::decode("///").unwrap());
//! ```

/// The character used to mark a missing value.
pub const MISSING: char = '/';

/// The widest group we can decode without overflowing an `i64`.
pub const MAX_WIDTH: usize = 10;

const BITS_PER_CHARACTER: usize = 6;

/// An error returned when decoding a six-bit group.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// There were no characters to decode.
    #[fail(display = "empty six-bit group")]
    Empty,

    /// The character is outside of the ASCII range.
    #[fail(display = "invalid six-bit character: {:?}", _0)]
    InvalidCharacter(char),

    /// The group has too many characters to fit in an `i64`.
    #[fail(display = "six-bit group is too wide: {} characters", _0)]
    TooWide(usize),
}

/// Decodes a group of six-bit characters into a signed integer.
///
/// Returns `None` if the group is made up entirely of the missing value character.
///
/// # Examples
///
/// ```
/// use pseudobinary::sixbit;
/// assert_eq!(Some(1234), sixbit::decode("@SR").unwrap());
/// assert_eq!(Some(-1), sixbit::decode("??").unwrap());
/// assert!(sixbit::decode("").is_err());
/// ```
pub fn decode(s: &str) -> Result<Option<i64>, Error> {
    if s.is_empty() {
        return Err(Error::Empty);
    }
    if s.chars().all(|c| c == MISSING) {
        return Ok(None);
    }
    let width = s.chars().count();
    if width > MAX_WIDTH {
        return Err(Error::TooWide(width));
    }
    let mut value = 0i64;
    for c in s.chars() {
        if !c.is_ascii() {
            return Err(Error::InvalidCharacter(c));
        }
        value = (value << BITS_PER_CHARACTER) | i64::from(six_bits(c as u8));
    }
    let bits = BITS_PER_CHARACTER * width;
    if (value >> (bits - 1)) & 1 == 1 {
        value -= 1 << bits;
    }
    Ok(Some(value))
}

/// Encodes a signed integer into `width` six-bit characters.
///
/// Returns `None` if the value can't be represented in that many characters.
///
/// # Examples
///
/// ```
/// use pseudobinary::sixbit;
/// assert_eq!(Some("@SR".to_string()), sixbit::encode(1234, 3));
/// assert_eq!(None, sixbit::encode(4096, 2));
/// ```
pub fn encode(value: i64, width: usize) -> Option<String> {
    if width == 0 || width > MAX_WIDTH {
        return None;
    }
    let bits = BITS_PER_CHARACTER * width;
    let limit = 1i64 << (bits - 1);
    if value < -limit || value >= limit {
        return None;
    }
    let unsigned = if value < 0 { value + (1 << bits) } else { value };
    Some(
        (0..width)
            .rev()
            .map(|i| {
                let n = ((unsigned >> (BITS_PER_CHARACTER * i)) & 0x3f) as u8;
                if n == 0x3f {
                    '?'
                } else {
                    (n + 64) as char
                }
            })
            .collect(),
    )
}

fn six_bits(byte: u8) -> u8 {
    if byte > 63 {
        byte - 64
    } else {
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing() {
        assert_eq!(None, decode("///").unwrap());
        assert_eq!(None, decode("//").unwrap());
        assert_eq!(Some(47 * 64 + 1), decode("/A").unwrap());
    }

    #[test]
    fn both_ranges() {
        assert_eq!(Some(0), decode("@@").unwrap());
        assert_eq!(Some(63), decode("@?").unwrap());
        assert_eq!(Some(63), decode("@\x7f").unwrap());
        assert_eq!(Some(1), decode("@A").unwrap());
    }

    #[test]
    fn negative() {
        assert_eq!(Some(-1), decode("???").unwrap());
        assert_eq!(Some(-2048), decode("`@").unwrap());
        assert_eq!(Some(2047), decode("_?").unwrap());
        assert_eq!(Some(-49933), decode("333").unwrap());
    }

    #[test]
    fn errors() {
        assert_eq!(Error::Empty, decode("").unwrap_err());
        assert_eq!(Error::InvalidCharacter('é'), decode("@é").unwrap_err());
        assert_eq!(Error::TooWide(11), decode("@@@@@@@@@@@").unwrap_err());
    }

    #[test]
    fn round_trip_two_characters() {
        for value in -2048..2048 {
            let encoded = encode(value, 2).unwrap();
            assert_eq!(Some(value), decode(&encoded).unwrap(), "{}", encoded);
        }
    }

    #[test]
    fn round_trip_three_characters() {
        for value in (-131_072..131_072).step_by(97) {
            let encoded = encode(value, 3).unwrap();
            assert_eq!(Some(value), decode(&encoded).unwrap(), "{}", encoded);
        }
        assert_eq!(Some(131_071), decode(&encode(131_071, 3).unwrap()).unwrap());
        assert_eq!(Some(-131_072), decode(&encode(-131_072, 3).unwrap()).unwrap());
    }

    #[test]
    fn encode_out_of_range() {
        assert_eq!(None, encode(2048, 2));
        assert_eq!(None, encode(-2049, 2));
        assert_eq!(None, encode(0, 0));
    }
}
