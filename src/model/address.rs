//! Sender address extraction from a decoded `From` header.

/// A sender identity pulled out of a header value.
///
/// The extraction rule is deliberately loose: anything wrapped in angle
/// brackets wins, and a value without brackets is taken verbatim as the
/// address. The allow-list gate compares against `address` exactly, so a
/// malformed header simply never matches a configured sender.
///
/// # Examples
/// - `"Jane Doe <jane@example.com>"` → `display_name = "Jane Doe"`, `address = "jane@example.com"`
/// - `"user@example.com"` → `display_name = ""`, `address = "user@example.com"`
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare address checked against the allow-list.
    pub address: String,
}

impl EmailAddress {
    /// Parse a single sender from a header value.
    ///
    /// Supported formats:
    /// - `"user@domain.com"`
    /// - `"<user@domain.com>"`
    /// - `"Display Name <user@domain.com>"`
    /// - `"\"Display, Name\" <user@domain.com>"`
    ///
    /// A value with no recognizable structure is stored as-is in `address`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self {
                display_name: String::new(),
                address: String::new(),
            };
        }

        // Try "Display Name <address>" or "<address>"
        if let Some(angle_start) = trimmed.rfind('<') {
            if let Some(angle_end) = trimmed.rfind('>') {
                if angle_end > angle_start {
                    let addr = trimmed[angle_start + 1..angle_end].trim().to_string();
                    let name_part = trimmed[..angle_start].trim();
                    let display_name = strip_quotes(name_part);
                    return Self {
                        display_name,
                        address: addr,
                    };
                }
            }
        }

        // Bare address: "user@domain.com"
        if trimmed.contains('@') {
            return Self {
                display_name: String::new(),
                address: trimmed.to_string(),
            };
        }

        // Fallback: store as-is
        Self {
            display_name: String::new(),
            address: trimmed.to_string(),
        }
    }

    /// Format for display: `"Display Name <address>"` or just `"address"`.
    pub fn display(&self) -> String {
        if self.display_name.is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.display_name, self.address)
        }
    }
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_address() {
        let addr = EmailAddress::parse("user@example.com");
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name, "");
    }

    #[test]
    fn test_parse_angle_address() {
        let addr = EmailAddress::parse("<user@example.com>");
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name, "");
    }

    #[test]
    fn test_parse_name_and_address() {
        let addr = EmailAddress::parse("Jane Doe <jane@example.com>");
        assert_eq!(addr.address, "jane@example.com");
        assert_eq!(addr.display_name, "Jane Doe");
    }

    #[test]
    fn test_parse_quoted_name() {
        let addr = EmailAddress::parse("\"Last, First\" <user@example.com>");
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name, "Last, First");
    }

    #[test]
    fn test_parse_no_brackets_no_at_keeps_raw() {
        // Loose rule: a bracketless value is the address, whatever it is.
        let addr = EmailAddress::parse("bounces.example.com");
        assert_eq!(addr.address, "bounces.example.com");
        assert_eq!(addr.display_name, "");
    }

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress {
            display_name: "Alice".to_string(),
            address: "alice@example.com".to_string(),
        };
        assert_eq!(addr.display(), "Alice <alice@example.com>");
    }

    #[test]
    fn test_display_without_name() {
        let addr = EmailAddress {
            display_name: String::new(),
            address: "alice@example.com".to_string(),
        };
        assert_eq!(addr.display(), "alice@example.com");
    }

    #[test]
    fn test_parse_empty() {
        let addr = EmailAddress::parse("");
        assert_eq!(addr.address, "");
    }
}
