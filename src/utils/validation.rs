//! Centralized validation for uploaded workbooks.

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Largest accepted upload body. Panel workbooks run tens of kilobytes.
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Smallest possible zip archive: a bare end-of-central-directory record.
pub const MIN_UPLOAD_SIZE: usize = 22;

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File does not look like an xlsx workbook")]
    NotXlsx,
    #[error("File size out of bounds ({MIN_UPLOAD_SIZE}..={MAX_UPLOAD_SIZE} bytes)")]
    InvalidSize,
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    // Check for null bytes and other control characters
    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    // Sanitize filename by keeping only safe characters
    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Prevent hidden files (starting with .) unless it's a known extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has a known safe extension
fn has_known_extension(filename: &str) -> bool {
    let safe_extensions = [".xlsx", ".xls"];

    safe_extensions
        .iter()
        .any(|ext| filename.to_lowercase().ends_with(ext))
}

/// True when the content opens like a zip container, which every xlsx
/// workbook is.
#[must_use]
pub fn looks_like_xlsx(content: &[u8]) -> bool {
    content.starts_with(b"PK\x03\x04")
}

/// Comprehensive input validation for an uploaded workbook
///
/// Performs complete security validation for file uploads:
/// - Filename sanitization and security checks
/// - Body size bounds
/// - Format validation via the zip magic number
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation fails, the body size
/// is out of bounds, or the content is not a zip container.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<Option<String>, ValidationError> {
    let validated_filename = if let Some(name) = filename {
        Some(validate_filename(name)?)
    } else {
        None
    };

    if content.len() < MIN_UPLOAD_SIZE || content.len() > MAX_UPLOAD_SIZE {
        return Err(ValidationError::InvalidSize);
    }

    if !looks_like_xlsx(content) {
        return Err(ValidationError::NotXlsx);
    }

    Ok(validated_filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_safe() {
        assert!(validate_filename("antigram.xlsx").is_ok());
        assert!(validate_filename("panel-2026.xls").is_ok());
        assert!(validate_filename("panel revisi 3.xlsx").is_ok());
        assert!(validate_filename("data_file.xlsx").is_ok());
    }

    #[test]
    fn test_validate_filename_dangerous() {
        // Directory traversal attempts
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("..\\windows\\system32").is_err());
        assert!(validate_filename("test/../../secret").is_err());

        // Null bytes and control characters
        assert!(validate_filename("test\0.xlsx").is_err());
        assert!(validate_filename("test\x01.xlsx").is_err());

        // Too long filename
        let long_name = "a".repeat(300);
        assert!(validate_filename(&long_name).is_err());

        // Empty or whitespace-only
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());

        // Hidden files without known extensions
        assert!(validate_filename(".hidden").is_err());
    }

    #[test]
    fn test_validate_filename_sanitization() {
        // Should remove dangerous characters but keep safe ones
        let result = validate_filename("panel@#$%2026.xlsx").unwrap();
        assert_eq!(result, "panel2026.xlsx");

        // Should preserve safe characters
        let result = validate_filename("my-panel_123.xlsx").unwrap();
        assert_eq!(result, "my-panel_123.xlsx");
    }

    #[test]
    fn test_has_known_extension() {
        assert!(has_known_extension(".xlsx"));
        assert!(has_known_extension("panel.XLSX"));
        assert!(has_known_extension("old-panel.xls"));

        assert!(!has_known_extension(".exe"));
        assert!(!has_known_extension(".hidden"));
        assert!(!has_known_extension("panel.csv"));
    }

    #[test]
    fn test_looks_like_xlsx() {
        assert!(looks_like_xlsx(b"PK\x03\x04rest-of-archive"));
        assert!(!looks_like_xlsx(b"MZ\x90\x00"));
        assert!(!looks_like_xlsx(b"<html>"));
        assert!(!looks_like_xlsx(b""));
        assert!(!looks_like_xlsx(b"PK"));
    }

    #[test]
    fn test_validate_upload_complete() {
        let mut workbook = b"PK\x03\x04".to_vec();
        workbook.resize(200, 0);

        // Valid upload with filename
        let result = validate_upload(Some("panel.xlsx"), &workbook);
        assert_eq!(result.unwrap().unwrap(), "panel.xlsx");

        // Valid upload without filename
        let result = validate_upload(None, &workbook);
        assert!(result.unwrap().is_none());

        // Invalid filename
        assert!(validate_upload(Some("../etc/passwd"), &workbook).is_err());

        // Not a zip container
        assert!(matches!(
            validate_upload(Some("panel.xlsx"), b"plain text, long enough to pass size"),
            Err(ValidationError::NotXlsx)
        ));
    }

    #[test]
    fn test_validate_upload_size_bounds() {
        // Below the smallest possible archive
        assert!(matches!(
            validate_upload(None, b"PK\x03\x04"),
            Err(ValidationError::InvalidSize)
        ));

        // At the boundary
        let mut smallest = b"PK\x03\x04".to_vec();
        smallest.resize(MIN_UPLOAD_SIZE, 0);
        assert!(validate_upload(None, &smallest).is_ok());

        // Over the cap
        let mut oversized = b"PK\x03\x04".to_vec();
        oversized.resize(MAX_UPLOAD_SIZE + 1, 0);
        assert!(matches!(
            validate_upload(None, &oversized),
            Err(ValidationError::InvalidSize)
        ));
    }
}
