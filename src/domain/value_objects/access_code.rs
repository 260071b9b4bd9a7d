use std::fmt;

/// Number of characters in a quiz access code
pub const ACCESS_CODE_LEN: usize = 6;

/// A complete quiz access code, normalised to uppercase for display.
/// Matching against the store is case-insensitive through [`AccessCode::lower`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessCode(String);

impl AccessCode {
    /// Returns `None` until the input holds exactly six characters
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.trim().to_uppercase();
        if code.chars().count() == ACCESS_CODE_LEN {
            Some(Self(code))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lower(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
