use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref LOCAL_PART: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9._]*$").expect("Hardcoded regex should always compile");
    static ref DOMAIN: Regex =
        Regex::new(r"^[A-Za-z]+\.[A-Za-z.]+$").expect("Hardcoded regex should always compile");
}

/// Reasons a candidate username (an email-shaped login) is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username is empty")]
    Empty,
    #[error("username must start with a letter")]
    InvalidStart,
    #[error("username must contain '@'")]
    MissingAt,
    #[error("username must contain exactly one '@'")]
    MultipleAt,
    #[error("only letters, digits, '.' and '_' are allowed before '@'")]
    InvalidLocalPart,
    #[error("'.' cannot follow '@' directly")]
    EmptyDomainLabel,
    #[error("domain must be letter groups separated by '.', e.g. mail.com")]
    InvalidDomain,
}

/// Function to check username format, reporting the first rule that fails.
///
/// Usernames are never normalized: case is preserved and compared exactly.
pub fn check_username(username: &str) -> Result<(), UsernameError> {
    let first = username.chars().next().ok_or(UsernameError::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(UsernameError::InvalidStart);
    }

    let (local, domain) = match username.split_once('@') {
        Some(parts) => parts,
        None => return Err(UsernameError::MissingAt),
    };
    if domain.contains('@') {
        return Err(UsernameError::MultipleAt);
    }
    if !LOCAL_PART.is_match(local) {
        return Err(UsernameError::InvalidLocalPart);
    }
    if domain.starts_with('.') {
        return Err(UsernameError::EmptyDomainLabel);
    }
    if !DOMAIN.is_match(domain) {
        return Err(UsernameError::InvalidDomain);
    }
    Ok(())
}

/// Returns true when the username is a well-formed login
pub fn validate_username(username: &str) -> bool {
    check_username(username).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("abc@mail.com"));
        assert!(validate_username("John.Doe_99@Example.co.uk"));
        assert!(validate_username("a@b.c"));
        assert!(validate_username("a.b.c@mail.org"));
    }

    #[test]
    fn test_invalid_start() {
        assert_eq!(check_username("1abc@mail.com"), Err(UsernameError::InvalidStart));
        assert_eq!(check_username("_abc@mail.com"), Err(UsernameError::InvalidStart));
        assert_eq!(check_username(".abc@mail.com"), Err(UsernameError::InvalidStart));
        assert_eq!(check_username("@mail.com"), Err(UsernameError::InvalidStart));
        assert_eq!(check_username("ébc@mail.com"), Err(UsernameError::InvalidStart));
        assert_eq!(check_username(""), Err(UsernameError::Empty));
    }

    #[test]
    fn test_at_sign_rules() {
        assert_eq!(check_username("abcmail.com"), Err(UsernameError::MissingAt));
        assert_eq!(check_username("abc@mail@x.com"), Err(UsernameError::MultipleAt));
        assert_eq!(check_username("abc@.com"), Err(UsernameError::EmptyDomainLabel));
        assert!(!validate_username("abc@."));
    }

    #[test]
    fn test_local_part_characters() {
        assert_eq!(check_username("ab-c@mail.com"), Err(UsernameError::InvalidLocalPart));
        assert_eq!(check_username("ab c@mail.com"), Err(UsernameError::InvalidLocalPart));
        assert_eq!(check_username("ab:c@mail.com"), Err(UsernameError::InvalidLocalPart));
        assert_eq!(check_username("ab+tag@mail.com"), Err(UsernameError::InvalidLocalPart));
    }

    #[test]
    fn test_domain_rules() {
        // Single label domain
        assert_eq!(check_username("abc@mail"), Err(UsernameError::InvalidDomain));
        // Digits are not allowed in the domain
        assert_eq!(check_username("abc@mail1.com"), Err(UsernameError::InvalidDomain));
        assert_eq!(check_username("abc@mail.c0m"), Err(UsernameError::InvalidDomain));
        // Nothing after the dot
        assert_eq!(check_username("abc@mail."), Err(UsernameError::InvalidDomain));
        assert_eq!(check_username("abc@"), Err(UsernameError::InvalidDomain));
    }

    #[test]
    fn test_no_normalization() {
        // Surrounding whitespace is not trimmed here
        assert!(!validate_username(" abc@mail.com"));
        assert!(!validate_username("abc@mail.com "));
        assert!(!validate_username("abc@mail.com\n"));
        assert!(validate_username("ABC@MAIL.COM"));
    }

    #[test]
    fn test_matches_login_grammar() {
        let grammar = Regex::new(r"^[a-zA-Z][a-zA-Z0-9._]*@[a-zA-Z]+\.[a-zA-Z.]+$").unwrap();
        let samples = [
            "abc@mail.com",
            "1abc@mail.com",
            "abc@.com",
            "abc@mail",
            "a_b.c@x.y.z",
            "abc@mail..com",
            "abc@mail.com.",
            "abc@@mail.com",
            "Zed@Q.r",
            "x@y.z@w.v",
            "",
        ];
        for sample in samples {
            let expected = grammar.is_match(sample) && !sample.contains("@.");
            assert_eq!(validate_username(sample), expected, "mismatch for {:?}", sample);
        }
    }
}
