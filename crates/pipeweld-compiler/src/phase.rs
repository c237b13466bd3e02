//! Phase trait

use crate::context::{CompilationContext, ContextStage};
use crate::error::Result;

/// One step of the compilation pipeline
///
/// A phase reads the context fields produced by earlier phases and adds its
/// own; it never rewrites what a later phase will produce.
pub trait Phase {
    /// Phase name used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Stage the context reaches once this phase succeeds
    fn stage(&self) -> ContextStage;

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()>;
}
