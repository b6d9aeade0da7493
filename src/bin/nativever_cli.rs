//! NativeVer CLI - Bridge interface for build wrappers
//!
//! Commands: languages, derive, generate
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use nativever_core::{
    GenerationPipeline, GenerateRequest,
    derive::VersionInfoInput,
    pipeline::write_artifact,
};

#[derive(Parser)]
#[command(name = "nativever-cli")]
#[command(about = "NativeVer CLI - Native Version Metadata Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported target languages
    Languages,

    /// Derive the field set without rendering
    Derive {
        /// JSON payload (VersionInfoInput)
        #[arg(short, long)]
        payload: String,
    },

    /// Generate the version-info artifact
    Generate {
        /// Target language tag
        #[arg(short, long, default_value = "c++")]
        language: String,

        /// JSON payload (VersionInfoInput)
        #[arg(short, long)]
        payload: String,

        /// Output file; parent directories are created as needed
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let pipeline = GenerationPipeline::default();

    match cli.command {
        Commands::Languages => {
            println!(
                "{}",
                serde_json::to_string_pretty(&pipeline.languages()).unwrap()
            );
            ExitCode::SUCCESS
        }

        Commands::Derive { payload } => {
            let input: VersionInfoInput = match serde_json::from_str(&payload) {
                Ok(i) => i,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let request = GenerateRequest {
                code_language: "c++".to_string(),
                input,
            };

            match pipeline.derive_fields(&request) {
                Ok(derivation) => {
                    println!("{}", serde_json::to_string_pretty(&derivation).unwrap());
                    if derivation.is_valid() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Validation failure
                    }
                }
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "{}"}}"#, e);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Generate { language, payload, output } => {
            let input: VersionInfoInput = match serde_json::from_str(&payload) {
                Ok(i) => i,
                Err(e) => {
                    println!(r#"{{"success": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let request = GenerateRequest {
                code_language: language,
                input,
            };

            match pipeline.generate(&request) {
                Ok(artifact) => {
                    // No partial output: the file is written only on success.
                    if let Some(path) = &output {
                        if let Err(e) = write_artifact(path, &artifact) {
                            let result = serde_json::json!({
                                "success": false,
                                "error": format!("Failed to write {}: {}", path.display(), e),
                            });
                            println!("{}", serde_json::to_string(&result).unwrap());
                            return ExitCode::FAILURE;
                        }
                    }

                    let result = serde_json::json!({
                        "success": true,
                        "artifact": artifact,
                    });
                    println!("{}", serde_json::to_string_pretty(&result).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let result = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&result).unwrap());
                    ExitCode::from(2) // Generation failure (validation)
                }
            }
        }
    }
}
