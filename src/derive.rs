//! Field Derivation - Rule/Diagnostic Separation
//!
//! Rules produce structured diagnostics.
//! The caller maps diagnostics to actions; nothing is logged ambiently.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::fields::{ConfigurationKind, FieldSet, VersionQuadruplet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    UnsupportedConfiguration,
    InvalidFileVersion,
    LanguageUnsupported,
    UnknownLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

/// Raw inputs for one derivation, as supplied by the build wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfoInput {
    pub configuration: String,
    pub file_version: String,
    #[serde(default)]
    pub assembly_version: Option<String>,
    #[serde(default)]
    pub informational_version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub codepage: Option<String>,
    #[serde(default)]
    pub assembly_name: Option<String>,
    pub target_file_name: String,
}

/// Outcome of one derivation: a complete field set, or a non-empty
/// diagnostic list. Never a partial field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivation {
    pub fields: Option<FieldSet>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Derivation {
    pub fn success(fields: FieldSet) -> Self {
        Self { fields: Some(fields), diagnostics: vec![] }
    }

    pub fn failure(diagnostics: Vec<Diagnostic>) -> Self {
        Self { fields: None, diagnostics }
    }

    pub fn is_valid(&self) -> bool {
        self.fields.is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }
}

/// The field deriver - validates raw inputs and resolves fallbacks
pub struct FieldDeriver;

impl FieldDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Independent rules are all evaluated so one run surfaces every
    /// actionable error before anything is rendered.
    pub fn derive(&self, input: &VersionInfoInput) -> Derivation {
        let mut diagnostics = vec![];

        let configuration = self.resolve_configuration(input, &mut diagnostics);
        let file_version = self.resolve_file_version(input, &mut diagnostics);
        let lcid = self.resolve_lcid(input.language.as_deref(), &mut diagnostics);

        let (Some(configuration), Some(file_version), Some(lcid)) =
            (configuration, file_version, lcid)
        else {
            return Derivation::failure(diagnostics);
        };

        // Missing or unparseable assembly version falls back silently.
        let product_version = input
            .assembly_version
            .as_deref()
            .and_then(VersionQuadruplet::parse)
            .unwrap_or(file_version);

        // Non-numeric codepage falls back silently as well.
        let codepage = input
            .codepage
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);

        // Wrapping matches the original 32-bit arithmetic for oversized LCIDs.
        let version_block = format!("{:08X}", lcid.wrapping_shl(16) | codepage);

        let assembly_name = input.assembly_name.as_deref().unwrap_or("");
        let internal_name = Path::new(&input.target_file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let default_copyright = format!(
            "Copyright (c) {}. All rights reserved.",
            Local::now().year()
        );

        let mut fields = FieldSet::new();

        fields.push_numeric("NBGV_FILE_MAJOR_VERSION", file_version.major);
        fields.push_numeric("NBGV_FILE_MINOR_VERSION", file_version.minor);
        fields.push_numeric("NBGV_FILE_BUILD_VERSION", file_version.build);
        fields.push_numeric("NBGV_FILE_REVISION_VERSION", file_version.revision);
        fields.push_numeric("NBGV_PRODUCT_MAJOR_VERSION", product_version.major);
        fields.push_numeric("NBGV_PRODUCT_MINOR_VERSION", product_version.minor);
        fields.push_numeric("NBGV_PRODUCT_BUILD_VERSION", product_version.build);
        fields.push_numeric("NBGV_PRODUCT_REVISION_VERSION", product_version.revision);
        fields.push_numeric("NBGV_FILE_TYPE", configuration.file_type());
        fields.push_numeric("NBGV_LCID", lcid);
        fields.push_numeric("NBGV_CODEPAGE", codepage);

        fields.push_string("NBGV_PRODUCT_VERSION", product_version.to_string());
        fields.push_string("NBGV_FILE_VERSION", file_version.to_string());
        fields.push_string(
            "NBGV_INFORMATIONAL_VERSION",
            default_if_blank(
                input.informational_version.as_deref(),
                &product_version.to_string(),
            ),
        );
        fields.push_string("NGBV_FILE_NAME", input.target_file_name.clone());
        fields.push_string("NGBV_INTERNAL_NAME", internal_name);
        fields.push_string(
            "NGBV_TITLE",
            default_if_blank(input.title.as_deref(), assembly_name),
        );
        fields.push_string(
            "NGBV_PRODUCT",
            default_if_blank(input.product.as_deref(), assembly_name),
        );
        fields.push_string(
            "NBGV_COPYRIGHT",
            default_if_blank(input.copyright.as_deref(), &default_copyright),
        );
        fields.push_string(
            "NGBV_COMPANY",
            default_if_blank(input.company.as_deref(), assembly_name),
        );
        fields.push_string("NBGV_VERSION_BLOCK", version_block);

        Derivation {
            fields: Some(fields),
            diagnostics,
        }
    }

    fn resolve_configuration(
        &self,
        input: &VersionInfoInput,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ConfigurationKind> {
        let configuration = ConfigurationKind::parse(&input.configuration);
        if configuration.is_none() {
            diagnostics.push(Diagnostic {
                code: DiagnosticCode::UnsupportedConfiguration,
                severity: DiagnosticSeverity::Error,
                message: format!(
                    "Unsupported configuration '{}'. Only 'Application' and 'DynamicLibrary' are supported at this time.",
                    input.configuration
                ),
                expected: Some("Application or DynamicLibrary".to_string()),
                actual: Some(input.configuration.clone()),
                remediation: vec![
                    "Set the configuration to 'Application' or 'DynamicLibrary'".to_string(),
                ],
            });
        }
        configuration
    }

    fn resolve_file_version(
        &self,
        input: &VersionInfoInput,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<VersionQuadruplet> {
        let file_version = VersionQuadruplet::parse(&input.file_version);
        if file_version.is_none() {
            diagnostics.push(Diagnostic {
                code: DiagnosticCode::InvalidFileVersion,
                severity: DiagnosticSeverity::Error,
                message: format!(
                    "Cannot process file version '{}' into a valid four part version.",
                    input.file_version
                ),
                expected: Some("major.minor[.build[.revision]]".to_string()),
                actual: Some(input.file_version.clone()),
                remediation: vec![
                    "Supply a file version with two to four numeric components".to_string(),
                ],
            });
        }
        file_version
    }

    fn resolve_lcid(
        &self,
        language: Option<&str>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<u32> {
        let Some(language) = language.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Some(0);
        };

        if let Ok(lcid) = language.parse::<u32>() {
            return Some(lcid);
        }

        self.resolve_locale_name(language, diagnostics)
    }

    #[cfg(feature = "locale-names")]
    fn resolve_locale_name(
        &self,
        language: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<u32> {
        let lcid = crate::locale::lookup(language);
        if lcid.is_none() {
            diagnostics.push(Diagnostic {
                code: DiagnosticCode::UnknownLanguage,
                severity: DiagnosticSeverity::Error,
                message: format!(
                    "Unknown language '{}'. Cannot determine the LCID for that culture.",
                    language
                ),
                expected: None,
                actual: Some(language.to_string()),
                remediation: vec!["Use a known culture name or a numeric LCID".to_string()],
            });
        }
        lcid
    }

    #[cfg(not(feature = "locale-names"))]
    fn resolve_locale_name(
        &self,
        language: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<u32> {
        diagnostics.push(Diagnostic {
            code: DiagnosticCode::LanguageUnsupported,
            severity: DiagnosticSeverity::Error,
            message: format!(
                "Unknown language '{}'. Must specify the language as an LCID.",
                language
            ),
            expected: None,
            actual: Some(language.to_string()),
            remediation: vec!["Specify the language as a numeric LCID".to_string()],
        });
        None
    }
}

impl Default for FieldDeriver {
    fn default() -> Self {
        Self::new()
    }
}

fn default_if_blank(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
