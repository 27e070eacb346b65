/// Errors from GPU resource creation.
///
/// All of these are reported, never retried: startup callers abort on
/// them, steady-state callers log and degrade to a skip state.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("attachment extent {width}x{height} exceeds device limit {max}")]
    AttachmentTooLarge { width: u32, height: u32, max: u32 },

    #[error("shader module rejected: {0}")]
    Shader(String),

    #[error("render pipeline rejected: {0}")]
    Pipeline(String),
}
