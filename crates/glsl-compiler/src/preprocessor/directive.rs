//! Directive-tail parsing: recognizing which of the eleven directive kinds a
//! `#`-line names (§4.4).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DirectiveKind {
    Define,
    Undef,
    If,
    Ifdef,
    Ifndef,
    Else,
    Elif,
    Endif,
    Include,
    Line,
    Error,
    Pragma,
    Extension,
    Version,
}

impl DirectiveKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "define" => DirectiveKind::Define,
            "undef" => DirectiveKind::Undef,
            "if" => DirectiveKind::If,
            "ifdef" => DirectiveKind::Ifdef,
            "ifndef" => DirectiveKind::Ifndef,
            "else" => DirectiveKind::Else,
            "elif" => DirectiveKind::Elif,
            "endif" => DirectiveKind::Endif,
            "include" => DirectiveKind::Include,
            "line" => DirectiveKind::Line,
            "error" => DirectiveKind::Error,
            "pragma" => DirectiveKind::Pragma,
            "extension" => DirectiveKind::Extension,
            "version" => DirectiveKind::Version,
            _ => return None,
        })
    }

    /// Directives valid even while skipping an inactive `#if` branch —
    /// everything else is dropped along with ordinary tokens.
    pub fn processed_while_inactive(self) -> bool {
        matches!(
            self,
            DirectiveKind::If | DirectiveKind::Ifdef | DirectiveKind::Ifndef | DirectiveKind::Elif | DirectiveKind::Else | DirectiveKind::Endif
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExtensionBehavior {
    Enable,
    Require,
    Warn,
    Disable,
}

impl ExtensionBehavior {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "enable" => ExtensionBehavior::Enable,
            "require" => ExtensionBehavior::Require,
            "warn" => ExtensionBehavior::Warn,
            "disable" => ExtensionBehavior::Disable,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VersionProfile {
    Core,
    Compatibility,
    Es,
}

impl VersionProfile {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "core" => VersionProfile::Core,
            "compatibility" => VersionProfile::Compatibility,
            "es" => VersionProfile::Es,
            _ => return None,
        })
    }

    /// Defaulted profile when a `#version` line omits one (§4.4).
    pub fn default_for_version(version: i64) -> Self {
        if version >= 300 {
            VersionProfile::Core
        } else {
            VersionProfile::Compatibility
        }
    }
}
