//! Encoder configuration.

/// What to do with characters outside ASCII in identifier strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonAsciiPolicy {
    /// Fail the encode with [`crate::Error::NonAscii`].
    #[default]
    Reject,
    /// Send a `?` byte per UTF-16 code unit of each non-ASCII character, so characters above
    /// U+FFFF become `??`. This is what receivers see from senders built on the .NET ASCII
    /// encoder. Length limits apply to the replaced bytes.
    Replace,
}

/// Options for [`crate::protocol::extended_position::encode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderConfig {
    pub non_ascii: NonAsciiPolicy,
}

impl EncoderConfig {
    pub fn with_non_ascii(mut self, policy: NonAsciiPolicy) -> Self {
        self.non_ascii = policy;
        self
    }
}
