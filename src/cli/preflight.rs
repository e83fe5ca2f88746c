//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::Result;
use crate::openai::check_api_key;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Extraction only needs network access.
    Extract,
    /// Summaries and Q&A digests need an API key.
    Summarize,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Extract => {
            // No external requirements for extraction
        }
        Operation::Summarize => {
            check_api_key()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_extract_no_requirements() {
        assert!(check(Operation::Extract).is_ok());
    }
}
