use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::config::LoggerConfig;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid");
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern is valid");
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"\b\d{10}\b").expect("identifier pattern is valid");
    static ref PHONE_REGEX: Regex = Regex::new(r"(?:\+1[-.\s]?)?\(\d{3}\)[-.\s]?\d{3}[-.\s]?\d{4}\b|\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\b")
        .expect("phone pattern is valid");
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_identifiers: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_identifiers: true,
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            hash_for_correlation: false,
        }
    }
}

/// PII redactor for user-supplied text headed for the logs
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn from_logger_config(config: &LoggerConfig) -> Self {
        Self::new(RedactionConfig {
            enabled: config.redaction_enabled,
            hash_for_correlation: config.hash_for_correlation,
            ..RedactionConfig::default()
        })
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // SSNs and phones first: their digit groups would otherwise be
        // picked apart by the identifier pattern.
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", |_| "***-**-****".to_string());
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", |_| "(***) ***-****".to_string());
        }

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", mask_email);
        }

        if self.config.redact_identifiers {
            result = self.replace(&IDENTIFIER_REGEX, &result, "ID", mask_identifier);
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: fn(&str) -> String) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{}[{}]", label, hash_value(matched))
                } else {
                    mask(matched)
                }
            })
            .to_string()
    }
}

fn mask_identifier(id: &str) -> String {
    let visible = id.len().saturating_sub(4);
    let tail: String = id.chars().skip(visible).collect();
    format!("{}{}", "*".repeat(visible), tail)
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((user, domain)) => {
            let user_head: String = user.chars().take(1).collect();
            let domain_head: String = domain.chars().take(1).collect();
            format!("{user_head}***@{domain_head}***")
        }
        None => "***@***".to_string(),
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // First 8 bytes keep the tag short while staying stable for correlation
    general_purpose::STANDARD_NO_PAD.encode(digest.get(..8).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig::default())
    }

    #[test]
    fn test_identifier_redaction_keeps_last_four() {
        let redacted = masking_redactor().redact("Provider 0000012345 filtered");
        assert_eq!(redacted, "Provider ******2345 filtered");
    }

    #[test]
    fn test_short_numbers_are_left_alone() {
        let redacted = masking_redactor().redact("Provider ID 4521");
        assert_eq!(redacted, "Provider ID 4521");
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking_redactor().redact("Uploaded by john.doe@example.com");
        assert!(redacted.contains("j***@e***"));
        assert!(!redacted.contains("john.doe"));
    }

    #[test]
    fn test_phone_redaction() {
        let redacted = masking_redactor().redact("Call me at (555) 123-4567");
        assert!(redacted.contains("(***) ***-****"));
    }

    #[test]
    fn test_ssn_redaction() {
        let redacted = masking_redactor().redact("SSN 123-45-6789 on file");
        assert_eq!(redacted, "SSN ***-**-**** on file");
    }

    #[test]
    fn test_hash_for_correlation_is_stable() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });

        let first = redactor.redact("0000012345");
        let second = redactor.redact("0000012345");
        assert_eq!(first, second);
        assert!(first.starts_with("ID["));
        assert!(!first.contains("0000012345"));
    }

    #[test]
    fn test_disabled_redactor_passes_text_through() {
        let config = LoggerConfig {
            redaction_enabled: false,
            ..LoggerConfig::default()
        };
        let redactor = PiiRedactor::from_logger_config(&config);
        assert_eq!(redactor.redact("0000012345"), "0000012345");
    }
}
