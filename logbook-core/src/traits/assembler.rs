use crate::config::AssemblyConfig;
use crate::errors::LogbookResult;
use crate::models::{AssembledContext, RetrievedItem};

/// Turns ranked items into size-bounded context text.
pub trait Assembler: Send + Sync {
    fn assemble(
        &self,
        items: Vec<RetrievedItem>,
        config: &AssemblyConfig,
    ) -> LogbookResult<AssembledContext>;
}
