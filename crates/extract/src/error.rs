// ABOUTME: Error types for the extraction core including ErrorCode enum and ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A required element (title, content container) was not found.
    StructuralMiss,
    /// The assembled article failed schema validation.
    SchemaViolation,
    /// The page URL did not match any registered platform.
    UnknownPlatform,
    /// The matched platform has no crawler or publisher for the operation.
    Unsupported,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::StructuralMiss => "structural miss",
            ErrorCode::SchemaViolation => "schema violation",
            ErrorCode::UnknownPlatform => "unknown platform",
            ErrorCode::Unsupported => "unsupported operation",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for article extraction and dispatch operations.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub platform: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "newsclip: {} {}: {}", self.op, self.platform, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    /// Create a StructuralMiss error.
    pub fn structural_miss(
        platform: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::StructuralMiss,
            platform: platform.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a SchemaViolation error from a list of collected violations.
    pub fn schema_violation(
        platform: impl Into<String>,
        op: impl Into<String>,
        errors: &[String],
    ) -> Self {
        Self {
            code: ErrorCode::SchemaViolation,
            platform: platform.into(),
            op: op.into(),
            source: Some(anyhow::anyhow!("{}", errors.join(", "))),
        }
    }

    /// Create an UnknownPlatform error.
    pub fn unknown_platform(url: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownPlatform,
            platform: "unknown".to_string(),
            op: op.into(),
            source: Some(anyhow::anyhow!("no platform matches {}", url.into())),
        }
    }

    /// Create an Unsupported error.
    pub fn unsupported(
        platform: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Unsupported,
            platform: platform.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a StructuralMiss error.
    pub fn is_structural_miss(&self) -> bool {
        self.code == ErrorCode::StructuralMiss
    }

    /// Returns true if this is a SchemaViolation error.
    pub fn is_schema_violation(&self) -> bool {
        self.code == ErrorCode::SchemaViolation
    }

    /// Returns true if this is an UnknownPlatform error.
    pub fn is_unknown_platform(&self) -> bool {
        self.code == ErrorCode::UnknownPlatform
    }

    /// Returns true if this is an Unsupported error.
    pub fn is_unsupported(&self) -> bool {
        self.code == ErrorCode::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_miss_display() {
        let err = ExtractError::structural_miss(
            "netease",
            "crawl_article",
            Some(anyhow::anyhow!("content container not found")),
        );
        let msg = err.to_string();
        assert!(msg.contains("crawl_article"));
        assert!(msg.contains("netease"));
        assert!(msg.contains("structural miss"));
        assert!(msg.contains("content container not found"));
        assert!(err.is_structural_miss());
        assert!(!err.is_schema_violation());
    }

    #[test]
    fn schema_violation_joins_errors() {
        let errors = vec![
            "missing required field: title".to_string(),
            "missing author.nickname".to_string(),
        ];
        let err = ExtractError::schema_violation("baidu", "crawl_article", &errors);
        assert!(err.is_schema_violation());
        let msg = err.to_string();
        assert!(msg.contains("missing required field: title, missing author.nickname"));
    }

    #[test]
    fn unknown_platform_mentions_url() {
        let err = ExtractError::unknown_platform("https://example.com/x", "crawl_article");
        assert!(err.is_unknown_platform());
        assert!(err.to_string().contains("https://example.com/x"));
    }
}
