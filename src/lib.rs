//! NativeVer Core - Native Version Metadata Compiler
//!
//! # Engine Guarantees (Non-Negotiable)
//! 1. Fields Are Derived, Never Guessed
//! 2. Diagnostics Are Values
//! 3. Derivation Is Protective
//! 4. Deterministic Output
//! 5. One Invocation, One FieldSet
//! 6. Wrappers Persist, Engine Renders

pub mod fields;
pub mod derive;
#[cfg(feature = "locale-names")]
pub mod locale;
pub mod emit;
pub mod hashing;
pub mod pipeline;

pub use fields::{ConfigurationKind, FieldSet, VersionQuadruplet};
pub use derive::{Derivation, Diagnostic, DiagnosticCode, DiagnosticSeverity, FieldDeriver, VersionInfoInput};
pub use emit::{CppEmitter, Emitter, EmitterRegistry};
pub use hashing::{canonical_json, compute_content_hash, compute_job_hash};
pub use pipeline::{GeneratedArtifact, GenerateRequest, GenerationPipeline, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
