use crate::utils::error::{ProofError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProofError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ProofError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProofError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// S3 bucket naming rules: 3-63 chars, lowercase letters, digits, hyphens and dots.
pub fn validate_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| ProofError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("Bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "Bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("Bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("proxy_url", "https://example.com").is_ok());
        assert!(validate_url("proxy_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("proxy_url", "").is_err());
        assert!(validate_url("proxy_url", "invalid-url").is_err());
        assert!(validate_url("proxy_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("max_upload_bytes", 5, 1).is_ok());
        assert!(validate_positive_number("max_upload_bytes", 0, 1).is_err());
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("bucket", "font-proofs").is_ok());
        assert!(validate_bucket_name("bucket", "ab").is_err());
        assert!(validate_bucket_name("bucket", "Font_Proofs").is_err());
        assert!(validate_bucket_name("bucket", "-proofs").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("x".to_string());
        let missing: Option<String> = None;
        assert!(validate_required_field("bucket", &present).is_ok());
        assert!(validate_required_field("bucket", &missing).is_err());
    }
}
