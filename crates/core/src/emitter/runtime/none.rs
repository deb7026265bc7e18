//! Types-only output.

use super::{RuntimeBackend, ValidatorSyntax};
use crate::config::RuntimeChoice;

/// Emits the `Schemas` and `Endpoints` types and the client, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesOnly;

impl RuntimeBackend for TypesOnly {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::None
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        None
    }
}
