//! Fixed-length strings carried in DPRC commands.

use core::fmt;

use mc_cmd::field;

/// Size of an object type or label in a command, NUL terminator included.
pub const NAME_LEN: usize = 16;

/// A NUL-padded object type (`"dpni"`, `"mcp"`, ...) or object label.
///
/// Occupies two consecutive command params, one byte per 8-bit field,
/// little-endian.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Name([u8; NAME_LEN]);

impl Name {
    /// Creates a name from a string constant.
    ///
    /// Panics (at compile time when used in a `const`) if `s` is longer than
    /// `NAME_LEN - 1` bytes.
    pub const fn new(s: &str) -> Self {
        match Self::try_new(s) {
            Ok(name) => name,
            Err(_) => panic!("name does not fit in 15 bytes"),
        }
    }

    /// Creates a name, checking its length.
    pub const fn try_new(s: &str) -> Result<Self, NameTooLong> {
        let bytes = s.as_bytes();
        if bytes.len() >= NAME_LEN {
            return Err(NameTooLong { len: bytes.len() });
        }

        let mut out = [0u8; NAME_LEN];
        let mut i = 0;
        while i < bytes.len() {
            out[i] = bytes[i];
            i += 1;
        }
        Ok(Self(out))
    }

    /// Wraps raw bytes read from a response.
    pub const fn from_raw(raw: [u8; NAME_LEN]) -> Self {
        Self(raw)
    }

    /// Returns the raw, NUL-padded bytes.
    pub const fn to_raw(self) -> [u8; NAME_LEN] {
        self.0
    }

    /// Returns the bytes up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.0.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
        &self.0[..len]
    }

    /// Returns the name as a string, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Writes the name into `params[0..2]`.
    pub(crate) fn pack(&self, params: &mut [u64]) {
        field::pack_bytes(&mut params[..2], &self.0);
    }

    /// Reads a name from `params[0..2]`.
    pub(crate) fn unpack(params: &[u64]) -> Self {
        Self(field::unpack_bytes(&params[..2]))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Name({s:?})"),
            None => write!(f, "Name({:?})", self.as_bytes()),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

/// Error returned by [`Name::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("name of {len} bytes does not fit in {} bytes", NAME_LEN - 1)]
pub struct NameTooLong {
    /// Length of the rejected string.
    pub len: usize,
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_pack_layout() {
        let mut params = [0u64; 3];
        Name::new("dpmcp").pack(&mut params[1..]);

        assert_eq!(params[0], 0);
        assert_eq!(params[1], u64::from_le_bytes(*b"dpmcp\0\0\0"));
        assert_eq!(params[2], 0);
        assert_eq!(Name::unpack(&params[1..]), Name::new("dpmcp"));
    }

    #[test]
    fn test_longest_name_keeps_terminator() {
        let name = Name::new("0123456789abcde");
        let mut params = [0u64; 2];
        name.pack(&mut params);

        assert_eq!(params[1] >> 56, 0);
        assert_eq!(name.as_str(), Some("0123456789abcde"));
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            Name::try_new("0123456789abcdef"),
            Err(NameTooLong { len: 16 })
        );
    }

    #[test]
    fn test_unterminated_response() {
        let name = Name::from_raw(*b"abcdefghijklmnop");
        assert_eq!(name.as_str(), Some("abcdefghijklmnop"));
        assert!(!name.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Name::new("dpio").to_string(), "dpio");
        assert_eq!(Name::default().to_string(), "");
        assert!(Name::default().is_empty());
    }
}
