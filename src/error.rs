use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The personal name has characters the header charset cannot represent.
    Unmappable {
        charset: &'static str,
        personal: String,
    },
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Unmappable { charset, personal } => write!(
                f,
                "Personal name {:?} cannot be encoded as {}",
                personal, charset
            ),
        }
    }
}

impl std::error::Error for EncodingError {}
