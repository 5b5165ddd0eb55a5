//! Capabilities the ModSetting host exposes.
//!
//! Each capability is a named host operation. The set is closed: names the
//! binding does not know about are rejected, and every known capability must
//! be present on the host before a binding is accepted.

use std::fmt;
use thiserror::Error;

/// A capability exposed by the host module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityName {
    /// Add a dropdown list control.
    AddDropDownList,

    /// Add a slider control (real and integer overloads).
    AddSlider,

    /// Add a toggle control.
    AddToggle,

    /// Add a keybinding control defaulting to no key.
    AddKeybinding,

    /// Read the current value of a control.
    GetValue,

    /// Write the current value of a control.
    SetValue,

    /// Remove one control.
    RemoveUI,

    /// Remove every control owned by a module.
    RemoveMod,

    /// Add a text input control.
    AddInput,

    /// Whether saved settings exist for a module.
    HasConfig,

    /// Read a saved value directly from persisted settings.
    GetSavedValue,

    /// Add a keybinding control with an explicit default key.
    AddKeybindingWithDefault,

    /// Add a button.
    AddButton,

    /// Add a collapsible group of existing controls.
    AddGroup,
}

/// Every capability the binding depends on. A host missing any of them is
/// rejected.
pub const REQUIRED_CAPABILITIES: &[CapabilityName] = &[
    CapabilityName::AddDropDownList,
    CapabilityName::AddSlider,
    CapabilityName::AddToggle,
    CapabilityName::AddKeybinding,
    CapabilityName::GetValue,
    CapabilityName::SetValue,
    CapabilityName::RemoveUI,
    CapabilityName::RemoveMod,
    CapabilityName::AddInput,
    CapabilityName::HasConfig,
    CapabilityName::GetSavedValue,
    CapabilityName::AddKeybindingWithDefault,
    CapabilityName::AddButton,
    CapabilityName::AddGroup,
];

impl CapabilityName {
    /// Parse a capability from its operation name.
    pub fn parse(s: &str) -> Result<Self, CapabilityParseError> {
        let name = s.trim();
        if name.is_empty() {
            return Err(CapabilityParseError::Empty);
        }

        REQUIRED_CAPABILITIES
            .iter()
            .copied()
            .find(|cap| cap.as_str() == name)
            .ok_or_else(|| CapabilityParseError::Unknown(name.to_string()))
    }

    /// Operation name the host exposes this capability under.
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityName::AddDropDownList => "AddDropDownList",
            CapabilityName::AddSlider => "AddSlider",
            CapabilityName::AddToggle => "AddToggle",
            CapabilityName::AddKeybinding => "AddKeybinding",
            CapabilityName::GetValue => "GetValue",
            CapabilityName::SetValue => "SetValue",
            CapabilityName::RemoveUI => "RemoveUI",
            CapabilityName::RemoveMod => "RemoveMod",
            CapabilityName::AddInput => "AddInput",
            CapabilityName::HasConfig => "HasConfig",
            CapabilityName::GetSavedValue => "GetSavedValue",
            CapabilityName::AddKeybindingWithDefault => "AddKeybindingWithDefault",
            CapabilityName::AddButton => "AddButton",
            CapabilityName::AddGroup => "AddGroup",
        }
    }

    /// Whether calls to this capability address a single control by key.
    pub fn is_per_control(self) -> bool {
        !matches!(self, CapabilityName::RemoveMod | CapabilityName::HasConfig)
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability name parse errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityParseError {
    #[error("capability name must not be empty")]
    Empty,

    #[error("unknown capability: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_capability() {
        for cap in REQUIRED_CAPABILITIES {
            assert_eq!(CapabilityName::parse(cap.as_str()), Ok(*cap));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            CapabilityName::parse("AddColorPicker"),
            Err(CapabilityParseError::Unknown("AddColorPicker".to_string()))
        );
        assert_eq!(CapabilityName::parse("  "), Err(CapabilityParseError::Empty));
        // Names are case sensitive, like the host's operation names.
        assert!(CapabilityName::parse("addtoggle").is_err());
    }

    #[test]
    fn test_required_set_is_complete() {
        assert_eq!(REQUIRED_CAPABILITIES.len(), 14);
        let unique: std::collections::HashSet<_> = REQUIRED_CAPABILITIES.iter().collect();
        assert_eq!(unique.len(), REQUIRED_CAPABILITIES.len());
    }

    #[test]
    fn test_per_control() {
        assert!(CapabilityName::AddToggle.is_per_control());
        assert!(CapabilityName::GetSavedValue.is_per_control());
        assert!(!CapabilityName::RemoveMod.is_per_control());
        assert!(!CapabilityName::HasConfig.is_per_control());
    }
}
