use std::fmt::Display;

use encoding_rs::{Encoding, UTF_8};

use crate::error::EncodingError;

/// A mailbox ready to be written into a header: `address` plus an optional
/// personal name known to be representable in the header charset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    personal: Option<String>,
    address: String,
}

/// Plain ASCII as far as headers go: no 8-bit characters and no control
/// characters other than CR, LF and TAB.
fn is_header_ascii(text: &str) -> bool {
    text.chars().all(|c| {
        let c = c as u32;
        c < 0x7F && (c >= 0x20 || c == 0x0D || c == 0x0A || c == 0x09)
    })
}

impl Address {
    pub fn new(personal: Option<String>, address: impl Into<String>) -> Result<Self, EncodingError> {
        Self::with_charset(personal, address, UTF_8)
    }

    pub fn with_charset(
        personal: Option<String>,
        address: impl Into<String>,
        charset: &'static Encoding,
    ) -> Result<Self, EncodingError> {
        if let Some(personal) = &personal {
            if !is_header_ascii(personal) {
                let (_, _, had_errors) = charset.encode(personal);
                if had_errors {
                    return Err(EncodingError::Unmappable {
                        charset: charset.name(),
                        personal: personal.clone(),
                    });
                }
            }
        }
        Ok(Address {
            personal,
            address: address.into(),
        })
    }

    pub fn personal(&self) -> Option<&str> {
        self.personal.as_deref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.personal {
            Some(personal) if !personal.is_empty() => write!(f, "{} <{}>", personal, self.address),
            _ => write!(f, "<{}>", self.address),
        }
    }
}
