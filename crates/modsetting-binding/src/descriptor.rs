//! Identity of a module taking part in a binding.

use std::fmt;

/// Identity of a loaded module: what the host shows in its UI and the stable
/// name it keys stored settings by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModDescriptor {
    /// Human-readable name shown in the settings UI.
    pub display_name: String,

    /// Stable unique name.
    pub name: String,
}

impl ModDescriptor {
    /// Create a descriptor from a display name and a stable name.
    pub fn new(display_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
        }
    }

    /// Both identity fields carry a value.
    ///
    /// Calls made on behalf of a descriptor that is not populated are
    /// rejected before any host lookup.
    pub fn is_populated(&self) -> bool {
        !self.display_name.trim().is_empty() && !self.name.trim().is_empty()
    }
}

impl fmt::Display for ModDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.name)
    }
}
