//! Field Model - Render-Ready Version Metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource file-type code for executables.
pub const VFT_APP: u32 = 0x1;
/// Resource file-type code for dynamic libraries.
pub const VFT_DLL: u32 = 0x2;

/// Four-part major.minor.build.revision version.
///
/// Parsing accepts two to four dot-separated non-negative components;
/// missing trailing components become 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionQuadruplet {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl VersionQuadruplet {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self { major, minor, build, revision }
    }

    /// Parse a version string. A single component, more than four
    /// components, or any non-numeric component is a failure.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let pieces: Vec<&str> = trimmed.split('.').collect();
        if pieces.len() < 2 || pieces.len() > 4 {
            return None;
        }

        let mut parts = [0u32; 4];
        for (idx, piece) in pieces.iter().enumerate() {
            parts[idx] = piece.trim().parse::<u32>().ok()?;
        }

        Some(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl fmt::Display for VersionQuadruplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

/// Build output flavor, mapped to a fixed resource file-type code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationKind {
    Application,
    DynamicLibrary,
}

impl ConfigurationKind {
    /// Case-insensitive; unrecognized values are a validation failure,
    /// never a default.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "APPLICATION" => Some(Self::Application),
            "DYNAMICLIBRARY" => Some(Self::DynamicLibrary),
            _ => None,
        }
    }

    pub fn file_type(self) -> u32 {
        match self {
            Self::Application => VFT_APP,
            Self::DynamicLibrary => VFT_DLL,
        }
    }
}

/// The resolved, immutable field mapping handed to an emitter.
///
/// Numeric and string fields are disjoint key spaces. Iteration order is
/// the order fields were added, so rendering is stable across calls.
/// Blank string values are dropped at insertion time and never rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSet {
    numeric: Vec<(String, u32)>,
    strings: Vec<(String, String)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_numeric(&mut self, name: &str, value: u32) {
        self.numeric.push((name.to_string(), value));
    }

    /// Blank and whitespace-only values are omitted entirely.
    pub fn push_string(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.strings.push((name.to_string(), value));
        }
    }

    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, u32)> {
        self.numeric.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn string_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn numeric(&self, name: &str) -> Option<u32> {
        self.numeric.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_four_components() {
        let version = VersionQuadruplet::parse("1.2.3.4").unwrap();
        assert_eq!(version, VersionQuadruplet::new(1, 2, 3, 4));
        assert_eq!(version.to_string(), "1.2.3.4");
    }

    #[test]
    fn parse_zero_pads_short_versions() {
        assert_eq!(
            VersionQuadruplet::parse("1.2"),
            Some(VersionQuadruplet::new(1, 2, 0, 0))
        );
        assert_eq!(
            VersionQuadruplet::parse("7.8.9"),
            Some(VersionQuadruplet::new(7, 8, 9, 0))
        );
    }

    #[test]
    fn parse_rejects_invalid_shapes() {
        assert_eq!(VersionQuadruplet::parse(""), None);
        assert_eq!(VersionQuadruplet::parse("1"), None);
        assert_eq!(VersionQuadruplet::parse("1.2.3.4.5"), None);
        assert_eq!(VersionQuadruplet::parse("1.two"), None);
        assert_eq!(VersionQuadruplet::parse("-1.2"), None);
        assert_eq!(VersionQuadruplet::parse("1..2"), None);
    }

    #[test]
    fn configuration_kind_mapping() {
        assert_eq!(
            ConfigurationKind::parse("application"),
            Some(ConfigurationKind::Application)
        );
        assert_eq!(
            ConfigurationKind::parse("DynamicLibrary"),
            Some(ConfigurationKind::DynamicLibrary)
        );
        assert_eq!(ConfigurationKind::parse("StaticLibrary"), None);
        assert_eq!(ConfigurationKind::Application.file_type(), VFT_APP);
        assert_eq!(ConfigurationKind::DynamicLibrary.file_type(), VFT_DLL);
    }

    #[test]
    fn field_set_drops_blank_strings() {
        let mut fields = FieldSet::new();
        fields.push_string("NGBV_TITLE", "Tool");
        fields.push_string("NGBV_COMPANY", "   ");
        fields.push_string("NGBV_PRODUCT", "");

        assert_eq!(fields.string("NGBV_TITLE"), Some("Tool"));
        assert_eq!(fields.string("NGBV_COMPANY"), None);
        assert_eq!(fields.string("NGBV_PRODUCT"), None);
        assert_eq!(fields.string_fields().count(), 1);
    }
}
