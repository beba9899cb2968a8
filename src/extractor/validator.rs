use crate::error::{IdlBuildError, Result};

/// Generated IDL is consumed with LF line endings only.
pub fn validate_extracted_text(text: &str) -> Result<()> {
    match text.find('\r') {
        Some(offset) => {
            let line = text[..offset].matches('\n').count() + 1;
            Err(IdlBuildError::CarriageReturn { line, offset })
        }
        None => Ok(()),
    }
}
