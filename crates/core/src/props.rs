//! Property composition and visibility mapping
//!
//! Raw value lists from scripts become the engine's `;`-delimited property
//! wire format here, and the two-tier visibility model picks between a
//! target's direct property and its propagated `INTERFACE_*` counterpart.

/// Whether a property affects only the target itself or also its consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Interface,
}

impl Visibility {
    /// Parse the script-level spelling. `public` and `interface` both mean
    /// propagation to consumers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Visibility::Private),
            "public" | "interface" => Some(Visibility::Interface),
            _ => None,
        }
    }

    /// Select the property name for this visibility
    pub fn property_name(&self, base: &str) -> String {
        match self {
            Visibility::Private => base.to_string(),
            Visibility::Interface => format!("INTERFACE_{base}"),
        }
    }
}

/// Join definition tokens into the wire format, stripping a literal `-D`
/// prefix so bare `NAME=VALUE` and compiler-flag form store identically
pub fn compose_definitions<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            t.strip_prefix("-D").unwrap_or(t).to_string()
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Join compile-option tokens. Deliberately the same routine as definitions,
/// stripping rule included.
pub fn compose_options<S: AsRef<str>>(tokens: &[S]) -> String {
    compose_definitions(tokens)
}

/// Translate well-known symbolic script values into the engine's expected
/// literals. Allowlist-based; unknown names or values pass through unchanged.
pub fn adjust_known_property(name: &str, value: &str) -> String {
    if name == "LANGUAGE_STANDARD" {
        match value {
            "cpp_11" => return "11".to_string(),
            "cpp_14" => return "14".to_string(),
            "cpp_17" => return "17".to_string(),
            "cpp_20" => return "20".to_string(),
            _ => {}
        }
    }

    value.to_string()
}
