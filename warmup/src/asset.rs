//! Asset references and fetch priority hints.
//!
//! An [`AssetRef`] identifies one loadable image resource. It is either a
//! plain resource locator (usually a URL) or a pre-resolved [`ModuleHandle`]
//! that pairs a stable identifier with the locator it resolved to.

use std::fmt;
use std::str::FromStr;

/// A pre-resolved module reference.
///
/// Hosts that bundle their images typically know each asset under a stable
/// identifier (for example `hero/background`) that resolves to a hashed URL
/// at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleHandle {
    /// Stable identifier for the asset.
    pub id: String,
    /// Locator the identifier resolved to.
    pub locator: String,
}

impl ModuleHandle {
    /// Create a new module handle.
    pub fn new(id: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locator: locator.into(),
        }
    }
}

/// Identifies one loadable resource. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// A direct resource locator.
    Locator(String),
    /// A pre-resolved module reference.
    Handle(ModuleHandle),
}

impl AssetRef {
    /// Create a reference from a plain locator.
    pub fn locator(locator: impl Into<String>) -> Self {
        AssetRef::Locator(locator.into())
    }

    /// Create a reference from a module identifier and its resolved locator.
    pub fn handle(id: impl Into<String>, locator: impl Into<String>) -> Self {
        AssetRef::Handle(ModuleHandle::new(id, locator))
    }

    /// The locator used to fetch this asset.
    ///
    /// Two references with the same locator describe the same resource.
    pub fn as_locator(&self) -> &str {
        match self {
            AssetRef::Locator(locator) => locator,
            AssetRef::Handle(handle) => &handle.locator,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Locator(locator) => write!(f, "{}", locator),
            AssetRef::Handle(handle) => write!(f, "{} ({})", handle.id, handle.locator),
        }
    }
}

impl From<&str> for AssetRef {
    fn from(locator: &str) -> Self {
        AssetRef::locator(locator)
    }
}

impl From<String> for AssetRef {
    fn from(locator: String) -> Self {
        AssetRef::Locator(locator)
    }
}

/// HTTP `Priority` header value sent for high-priority fetches (RFC 9218).
pub const HIGH_PRIORITY_HEADER: &str = "u=1";

/// Fetch priority hint passed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Ask the transport to favour this fetch over others in flight.
    High,
    /// Background fetch.
    Low,
    /// Let the transport decide.
    #[default]
    Auto,
}

impl Priority {
    /// Value for the HTTP `Priority` request header, if a hint is attached.
    ///
    /// Only [`Priority::High`] attaches a hint.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            Priority::High => Some(HIGH_PRIORITY_HEADER),
            Priority::Low | Priority::Auto => None,
        }
    }

    /// Lowercase name as used in configuration and manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Low => "low",
            Priority::Auto => "auto",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "low" => Ok(Priority::Low),
            "auto" => Ok(Priority::Auto),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_and_handle_share_locator() {
        let plain = AssetRef::locator("https://cdn.example.com/hero.png");
        let handle = AssetRef::handle("hero", "https://cdn.example.com/hero.png");

        assert_eq!(plain.as_locator(), handle.as_locator());
        assert_ne!(plain, handle);
    }

    #[test]
    fn test_display() {
        assert_eq!(AssetRef::locator("/a.png").to_string(), "/a.png");
        assert_eq!(AssetRef::handle("hero", "/a.png").to_string(), "hero (/a.png)");
    }

    #[test]
    fn test_only_high_priority_attaches_hint() {
        assert_eq!(Priority::High.header_value(), Some(HIGH_PRIORITY_HEADER));
        assert_eq!(Priority::Low.header_value(), None);
        assert_eq!(Priority::Auto.header_value(), None);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" low ".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("auto".parse::<Priority>(), Ok(Priority::Auto));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Auto);
    }
}
