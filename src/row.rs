//! Fixed-width row codec.
//!
//! Layout of one serialized row (`ROW_SIZE` bytes, no header):
//!
//! ```text
//! | id: u32 LE (4) | username (32, zero padded) | email (255, zero padded) |
//! 0                4                            36                         291
//! ```

use std::fmt;

use crate::error::PrepareError;
use crate::{
    EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: [u8; USERNAME_SIZE],
    pub email: [u8; EMAIL_SIZE],
}

impl Row {
    /// Builds a row from raw text fields, rejecting any field whose byte
    /// length exceeds its column capacity. No encoding is assumed.
    pub fn new(
        id: u32,
        username: impl AsRef<[u8]>,
        email: impl AsRef<[u8]>,
    ) -> Result<Self, PrepareError> {
        Ok(Self {
            id,
            username: to_fixed_bytes(username.as_ref())?,
            email: to_fixed_bytes(email.as_ref())?,
        })
    }

    /// Username bytes without trailing zero padding.
    pub fn username(&self) -> &[u8] {
        trim_padding(&self.username)
    }

    /// Email bytes without trailing zero padding.
    pub fn email(&self) -> &[u8] {
        trim_padding(&self.email)
    }

    /// Writes this row into the first `ROW_SIZE` bytes of `dest`.
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than `ROW_SIZE`.
    pub fn serialize(&self, dest: &mut [u8]) {
        assert!(
            dest.len() >= ROW_SIZE,
            "row slot too small: {} < {ROW_SIZE}",
            dest.len()
        );

        dest[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        dest[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE].copy_from_slice(&self.username);
        dest[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE].copy_from_slice(&self.email);
    }

    /// Reads a row from the first `ROW_SIZE` bytes of `src`. Padding is
    /// kept as-is.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `ROW_SIZE`.
    pub fn deserialize(src: &[u8]) -> Self {
        assert!(
            src.len() >= ROW_SIZE,
            "row slot too small: {} < {ROW_SIZE}",
            src.len()
        );

        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        let mut username = [0u8; USERNAME_SIZE];
        username.copy_from_slice(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);

        let mut email = [0u8; EMAIL_SIZE];
        email.copy_from_slice(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);

        Self {
            id: u32::from_le_bytes(id),
            username,
            email,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.id,
            String::from_utf8_lossy(self.username()),
            String::from_utf8_lossy(self.email())
        )
    }
}

fn to_fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N], PrepareError> {
    if bytes.len() > N {
        return Err(PrepareError::StringTooLong);
    }

    let mut buffer = [0u8; N];
    buffer[..bytes.len()].copy_from_slice(bytes);
    Ok(buffer)
}

fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &field[..end]
}
