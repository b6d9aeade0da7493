//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::HashMap;

use nativever_core::{
    GenerationPipeline, GenerateRequest, PipelineError,
    derive::{DiagnosticCode, VersionInfoInput},
    pipeline::write_artifact,
};

fn contoso_input() -> VersionInfoInput {
    VersionInfoInput {
        configuration: "Application".to_string(),
        file_version: "1.2.3.4".to_string(),
        assembly_version: None,
        informational_version: None,
        title: None,
        product: None,
        company: None,
        copyright: None,
        language: None,
        codepage: None,
        assembly_name: Some("Contoso.Tool".to_string()),
        target_file_name: "Contoso.Tool.dll".to_string(),
    }
}

fn contoso_request() -> GenerateRequest {
    GenerateRequest {
        code_language: "c++".to_string(),
        input: contoso_input(),
    }
}

#[test]
fn invariant_generate_refuses_invalid_input() {
    // generate must derive internally; a bad configuration can never
    // reach the emitter.
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.input.configuration = "StaticLibrary".to_string();

    let result = pipeline.generate(&request);
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Derivation failed"));
    assert!(err.to_string().contains("StaticLibrary"));
}

#[test]
fn invariant_valid_input_generates() {
    let pipeline = GenerationPipeline::default();

    let artifact = pipeline.generate(&contoso_request()).unwrap();
    assert!(artifact.derivation.is_valid());
    assert!(!artifact.content_hash.is_empty());
    assert!(artifact.text.starts_with("#pragma once\n"));
}

#[test]
fn invariant_worked_example_fields() {
    let pipeline = GenerationPipeline::default();

    let artifact = pipeline.generate(&contoso_request()).unwrap();
    let fields = artifact.derivation.fields.as_ref().unwrap();

    assert_eq!(fields.numeric("NBGV_FILE_MAJOR_VERSION"), Some(1));
    assert_eq!(fields.numeric("NBGV_FILE_MINOR_VERSION"), Some(2));
    assert_eq!(fields.numeric("NBGV_FILE_BUILD_VERSION"), Some(3));
    assert_eq!(fields.numeric("NBGV_FILE_REVISION_VERSION"), Some(4));

    // Assembly version absent: product mirrors the file version.
    assert_eq!(fields.numeric("NBGV_PRODUCT_MAJOR_VERSION"), Some(1));
    assert_eq!(fields.numeric("NBGV_PRODUCT_MINOR_VERSION"), Some(2));
    assert_eq!(fields.numeric("NBGV_PRODUCT_BUILD_VERSION"), Some(3));
    assert_eq!(fields.numeric("NBGV_PRODUCT_REVISION_VERSION"), Some(4));

    assert_eq!(fields.numeric("NBGV_FILE_TYPE"), Some(0x1));
    assert_eq!(fields.string("NGBV_INTERNAL_NAME"), Some("Contoso.Tool"));
    assert_eq!(fields.string("NGBV_FILE_NAME"), Some("Contoso.Tool.dll"));
}

#[test]
fn invariant_output_deterministic() {
    // Same request must produce byte-identical text and content hash.
    let pipeline = GenerationPipeline::default();

    let artifact1 = pipeline.generate(&contoso_request()).unwrap();
    let artifact2 = pipeline.generate(&contoso_request()).unwrap();

    assert_eq!(artifact1.text, artifact2.text);
    assert_eq!(artifact1.content_hash, artifact2.content_hash);
    assert_eq!(artifact1.job_hash, artifact2.job_hash);
}

#[test]
fn invariant_numeric_defines_as_a_set() {
    // Consumers must not rely on define order; assert set equality.
    let pipeline = GenerationPipeline::default();
    let artifact = pipeline.generate(&contoso_request()).unwrap();

    let mut defines = HashMap::new();
    for line in artifact.text.lines() {
        if let Some(rest) = line.strip_prefix("#define ") {
            if let Some((name, value)) = rest.split_once(' ') {
                if let Ok(value) = value.parse::<u32>() {
                    defines.insert(name.to_string(), value);
                }
            }
        }
    }

    let expected: HashMap<String, u32> = [
        ("NBGV_FILE_MAJOR_VERSION", 1),
        ("NBGV_FILE_MINOR_VERSION", 2),
        ("NBGV_FILE_BUILD_VERSION", 3),
        ("NBGV_FILE_REVISION_VERSION", 4),
        ("NBGV_PRODUCT_MAJOR_VERSION", 1),
        ("NBGV_PRODUCT_MINOR_VERSION", 2),
        ("NBGV_PRODUCT_BUILD_VERSION", 3),
        ("NBGV_PRODUCT_REVISION_VERSION", 4),
        ("NBGV_FILE_TYPE", 1),
        ("NBGV_LCID", 0),
        ("NBGV_CODEPAGE", 0),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    assert_eq!(defines, expected);
}

#[test]
fn invariant_short_version_zero_pads() {
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.input.file_version = "1.2".to_string();

    let artifact = pipeline.generate(&request).unwrap();
    let fields = artifact.derivation.fields.as_ref().unwrap();

    assert_eq!(fields.numeric("NBGV_FILE_BUILD_VERSION"), Some(0));
    assert_eq!(fields.numeric("NBGV_FILE_REVISION_VERSION"), Some(0));
    assert_eq!(fields.string("NBGV_FILE_VERSION"), Some("1.2.0.0"));
}

#[test]
fn invariant_backslashes_doubled_in_output() {
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.input.target_file_name = r"bin\Contoso.Tool.dll".to_string();

    let artifact = pipeline.generate(&request).unwrap();
    assert!(artifact.text.contains(
        r#"#define NGBV_FILE_NAME NBGV_VERSION_STRING("bin\\Contoso.Tool.dll")"#
    ));
}

#[test]
fn invariant_blank_fields_never_defined() {
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.input.assembly_name = None;
    request.input.title = Some("   ".to_string());

    let artifact = pipeline.generate(&request).unwrap();
    assert!(!artifact.text.contains("#define NGBV_TITLE"));
    assert!(!artifact.text.contains("#define NGBV_PRODUCT"));
    assert!(!artifact.text.contains("#define NGBV_COMPANY"));
}

#[test]
fn invariant_unsupported_language_tag() {
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.code_language = "rust".to_string();

    let result = pipeline.generate(&request);
    assert!(matches!(
        result,
        Err(PipelineError::UnsupportedCodeLanguage(_))
    ));
}

#[test]
fn invariant_all_actionable_errors_surfaced() {
    let pipeline = GenerationPipeline::default();

    let mut request = contoso_request();
    request.input.configuration = "StaticLibrary".to_string();
    request.input.file_version = "one.two".to_string();

    let derivation = pipeline.derive_fields(&request).unwrap();
    assert!(!derivation.is_valid());

    let codes: Vec<_> = derivation.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes.contains(&DiagnosticCode::UnsupportedConfiguration));
    assert!(codes.contains(&DiagnosticCode::InvalidFileVersion));
}

#[test]
fn invariant_write_artifact_creates_parent_dirs() {
    let pipeline = GenerationPipeline::default();
    let artifact = pipeline.generate(&contoso_request()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("obj").join("Release").join("version.h");

    write_artifact(&path, &artifact).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, artifact.text);
}

#[test]
fn invariant_resource_block_present_and_last() {
    let pipeline = GenerationPipeline::default();
    let artifact = pipeline.generate(&contoso_request()).unwrap();

    let rc_at = artifact.text.find("#ifdef RC_INVOKED").unwrap();
    let last_define_at = artifact.text.rfind("#define").unwrap();
    assert!(last_define_at < rc_at);
    assert!(artifact.text.ends_with("#endif\n"));
    assert!(artifact.text.contains("VS_VERSION_INFO VERSIONINFO"));
    assert!(artifact.text.contains("BLOCK \"StringFileInfo\""));
    assert!(artifact.text.contains("BLOCK \"VarFileInfo\""));
}
