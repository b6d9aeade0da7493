//! Artifact Emitters - Deterministic Text Rendering
//!
//! An emitter is a pure function of a FieldSet: same fields, same bytes.
//! One emitter per target language, resolved through the registry by tag.

use crate::fields::FieldSet;

const FILE_HEADER_COMMENT: &str = "\
------------------------------------------------------------------------------
 <auto-generated>
     This code was generated by a tool.

     Changes to this file may cause incorrect behavior and will be lost if
     the code is regenerated.
 </auto-generated>
------------------------------------------------------------------------------";

const VERSION_STRING_DEFINE: &str = "\
#if defined(_UNICODE)
#define NBGV_VERSION_STRING(x) L ##x
#else
#define NBGV_VERSION_STRING(x) x
#endif";

const VERSION_INFO_RESOURCE: &str = r#"#ifdef RC_INVOKED

#include <winres.h>

VS_VERSION_INFO VERSIONINFO
  FILEVERSION     NBGV_FILE_MAJOR_VERSION,NBGV_FILE_MINOR_VERSION,NBGV_FILE_BUILD_VERSION,NBGV_FILE_REVISION_VERSION
  PRODUCTVERSION  NBGV_PRODUCT_MAJOR_VERSION,NBGV_PRODUCT_MINOR_VERSION,NBGV_PRODUCT_BUILD_VERSION,NBGV_PRODUCT_REVISION_VERSION
  FILEFLAGSMASK   0x3FL
#ifdef _DEBUG
  FILEFLAGS       0x1L
#else
  FILEFLAGS       0x0L
#endif
  FILEOS          0x4L
  FILETYPE        NBGV_FILE_TYPE
  FILESUBTYPE     0x0L
BEGIN
  BLOCK "StringFileInfo"
  BEGIN
    BLOCK NBGV_VERSION_BLOCK
    BEGIN
      VALUE "CompanyName", NGBV_COMPANY
      VALUE "FileDescription", NGBV_TITLE
      VALUE "FileVersion", NBGV_FILE_VERSION
      VALUE "InternalName", NGBV_INTERNAL_NAME
      VALUE "OriginalFilename", NGBV_FILE_NAME
      VALUE "ProductName", NGBV_PRODUCT
      VALUE "ProductVersion", NBGV_INFORMATIONAL_VERSION
      VALUE "LegalCopyright", NBGV_COPYRIGHT
    END
  END

  BLOCK "VarFileInfo"
  BEGIN
    VALUE "Translation", NBGV_LCID, NBGV_CODEPAGE
  END
END

#endif"#;

/// Render contract implemented once per target language.
pub trait Emitter {
    /// Language tag the registry resolves, e.g. `"c++"`.
    fn language(&self) -> &'static str;

    fn render(&self, fields: &FieldSet) -> String;
}

/// C/C++ header emitter: defines plus an embedded resource script.
pub struct CppEmitter;

impl Emitter for CppEmitter {
    fn language(&self) -> &'static str {
        "c++"
    }

    fn render(&self, fields: &FieldSet) -> String {
        let mut out = SourceWriter::new();

        out.line("#pragma once");
        out.comment(FILE_HEADER_COMMENT, "//");
        out.blank();

        out.content(VERSION_STRING_DEFINE);
        out.blank();

        // Numeric first: the resource block references these by name.
        for (name, value) in fields.numeric_fields() {
            out.define_int(name, value);
        }
        for (name, value) in fields.string_fields() {
            out.define_string(name, value);
        }
        out.blank();

        out.content(VERSION_INFO_RESOURCE);
        out.finish()
    }
}

/// Emitter registry - resolves language tags case-insensitively
pub struct EmitterRegistry {
    emitters: Vec<Box<dyn Emitter>>,
}

impl EmitterRegistry {
    pub fn new() -> Self {
        Self {
            emitters: vec![Box::new(CppEmitter)],
        }
    }

    pub fn register(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.push(emitter);
    }

    pub fn get(&self, language: &str) -> Option<&dyn Emitter> {
        let language = language.trim();
        self.emitters
            .iter()
            .find(|emitter| emitter.language().eq_ignore_ascii_case(language))
            .map(|emitter| emitter.as_ref())
    }

    pub fn languages(&self) -> Vec<&'static str> {
        self.emitters.iter().map(|emitter| emitter.language()).collect()
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Locally owned accumulator, built fresh per render call.
struct SourceWriter {
    buf: String,
}

impl SourceWriter {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    fn line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn content(&mut self, content: &str) {
        self.line(content);
    }

    fn comment(&mut self, comment: &str, token: &str) {
        for line in comment.lines() {
            self.buf.push_str(token);
            self.line(line);
        }
    }

    fn define_int(&mut self, name: &str, value: u32) {
        self.line(&format!("#define {name} {value}"));
    }

    fn define_string(&mut self, name: &str, value: &str) {
        let escaped = value.replace('\\', "\\\\");
        self.line(&format!("#define {name} NBGV_VERSION_STRING(\"{escaped}\")"));
    }

    fn finish(self) -> String {
        self.buf
    }
}
