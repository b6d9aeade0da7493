//! Generation Pipeline - Single Entry Point
//!
//! CRITICAL: generate MUST call derive internally. No bypass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use std::fs;
use std::io;
use std::path::Path;

use crate::derive::{Derivation, FieldDeriver, VersionInfoInput};
use crate::emit::EmitterRegistry;
use crate::hashing::{compute_content_hash, compute_job_hash};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static DERIVATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_derivation_call_count() -> u32 {
    DERIVATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_derivation_call_count() {
    DERIVATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No emitter available for language: {0}. No version info will be generated.")]
    UnsupportedCodeLanguage(String),

    #[error("Derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default = "default_language")]
    pub code_language: String,
    pub input: VersionInfoInput,
}

fn default_language() -> String {
    "c++".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub id: String,
    pub language: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
    pub job_hash: String,
    pub derivation: Derivation,
    pub text: String,
}

/// The generation pipeline - single entry point for all version-info operations
pub struct GenerationPipeline {
    emitters: EmitterRegistry,
    deriver: FieldDeriver,
}

impl GenerationPipeline {
    pub fn new(emitters: EmitterRegistry) -> Self {
        Self {
            emitters,
            deriver: FieldDeriver::new(),
        }
    }

    /// List the registered target languages
    pub fn languages(&self) -> Vec<&'static str> {
        self.emitters.languages()
    }

    /// Derive the field set for a request without rendering.
    ///
    /// This is the ONLY derivation entry point.
    pub fn derive_fields(&self, request: &GenerateRequest) -> Result<Derivation, PipelineError> {
        #[cfg(feature = "test-hooks")]
        DERIVATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        if self.emitters.get(&request.code_language).is_none() {
            return Err(PipelineError::UnsupportedCodeLanguage(
                request.code_language.clone(),
            ));
        }

        Ok(self.deriver.derive(&request.input))
    }

    /// Generate the version-info artifact
    ///
    /// CRITICAL: This ALWAYS calls derive_fields internally. No bypass possible.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedArtifact, PipelineError> {
        let emitter = self.emitters.get(&request.code_language).ok_or_else(|| {
            PipelineError::UnsupportedCodeLanguage(request.code_language.clone())
        })?;

        // MANDATORY: Derivation is always called. This is non-negotiable.
        let derivation = self.derive_fields(request)?;

        // If derivation failed, refuse to render anything.
        let Some(fields) = derivation.fields.as_ref() else {
            let messages: Vec<_> = derivation
                .diagnostics
                .iter()
                .map(|d| d.message.clone())
                .collect();
            return Err(PipelineError::DerivationFailed(messages.join("; ")));
        };

        let text = emitter.render(fields);

        let job_hash = compute_job_hash(&request.code_language, &request.input, ENGINE_VERSION)?;
        let content_hash = compute_content_hash(&text);

        Ok(GeneratedArtifact {
            id: Uuid::new_v4().to_string(),
            language: emitter.language().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            content_hash,
            job_hash,
            derivation,
            text,
        })
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new(EmitterRegistry::default())
    }
}

/// Wrapper-side persistence: create parent directories, plain overwrite.
pub fn write_artifact(path: &Path, artifact: &GeneratedArtifact) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &artifact.text)
}
