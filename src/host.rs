//! The seam between this crate and the engine that owns the shader.
//!
//! The parser itself never talks to the host; a caller implements
//! [`ShaderIntrospectionHost`] over whatever engine facility exists
//! (reflection, native bindings, a test double) and feeds the results in.

use crate::messages::CompilerMessage;

pub type BoxedHostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Global keywords that hosts are known to omit from their reported
/// keyword lists even though they appear in variant headers and compiler
/// messages. Host glue appends these to [`ShaderIntrospectionHost::global_keywords`]
/// output before seeding a keyword set.
///
/// The list is likely incomplete and may depend on the host version; it is
/// kept to the markers actually observed rather than extended by guesswork.
pub const IMPLICIT_GLOBAL_KEYWORDS: &[&str] = &[
    "STEREO_INSTANCING_ON",
    "INSTANCING_ON",
    "PROCEDURAL_INSTANCING_ON",
];

/// Shader introspection surface the host must provide.
pub trait ShaderIntrospectionHost {
    /// Global keywords applicable to the shader.
    fn global_keywords(&self) -> Result<Vec<String>, BoxedHostError>;

    /// Local keywords applicable to the shader. Hosts without a separate
    /// local-keyword axis return an empty list, permanently.
    fn local_keywords(&self) -> Result<Vec<String>, BoxedHostError>;

    /// Number of variants the host expects for the shader.
    fn variant_count(&self) -> Result<u64, BoxedHostError>;

    /// Ask the host to (re)write the preprocessed dump.
    fn trigger_preprocess(&mut self) -> Result<(), BoxedHostError>;

    /// Current compiler diagnostics for the shader.
    fn read_messages(&self) -> Result<Vec<CompilerMessage>, BoxedHostError>;
}

/// File name under which the host writes the preprocessed dump:
/// `Preprocessed-<shader name>.shader`, with path separators in the shader
/// name replaced so the name flattens to a single file.
pub fn dump_file_name(shader_name: &str) -> String {
    let flattened: String = shader_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("Preprocessed-{}.shader", flattened)
}
