use serde::Serialize;

/// A single errno record as found in a vendor source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrnoEntry {
    /// Numeric value when the source states it. Symbol-only formats leave this
    /// unset; the generated code resolves the symbol through `libc`.
    pub number: Option<u32>,
    /// Symbolic name such as `EPERM`. Unset for the literal `0` entry.
    pub name: Option<String>,
    /// The message exactly as written between the quotes.
    pub message: String,
}

impl ErrnoEntry {
    /// Entry for a macro-style line, where the key is either a symbol or `0`.
    pub fn from_key(key: &str, message: &str) -> ErrnoEntry {
        if key == "0" {
            ErrnoEntry {
                number: Some(0),
                name: None,
                message: message.to_string(),
            }
        } else {
            ErrnoEntry {
                number: None,
                name: Some(key.to_string()),
                message: message.to_string(),
            }
        }
    }

    /// Entry whose number is stated in the source.
    pub fn numbered(number: u32, name: &str, message: &str) -> ErrnoEntry {
        ErrnoEntry {
            number: Some(number),
            name: Some(name.to_string()),
            message: message.to_string(),
        }
    }

    /// Human-readable key: the symbol if there is one, else the number.
    pub fn label(&self) -> String {
        match (&self.name, self.number) {
            (Some(name), _) => name.clone(),
            (None, Some(number)) => number.to_string(),
            (None, None) => "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_key_is_numbered() {
        let e = ErrnoEntry::from_key("0", "No error information");
        assert_eq!(e.number, Some(0));
        assert_eq!(e.name, None);
        assert_eq!(e.label(), "0");
    }

    #[test]
    fn test_symbol_key_has_no_number() {
        let e = ErrnoEntry::from_key("EPERM", "Operation not permitted");
        assert_eq!(e.number, None);
        assert_eq!(e.name.as_deref(), Some("EPERM"));
        assert_eq!(e.label(), "EPERM");
    }
}
