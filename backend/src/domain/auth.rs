//! Authentication primitives such as login credentials and password digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

use super::EmailAddress;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// E-mail was missing or malformed.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised through [`EmailAddress`].
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use opsdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// E-mail address suitable for user lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Failure while hashing a password or reading a stored digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordDigestError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password digest is malformed: {0}")]
    Malformed(String),
}

/// Argon2id password hash in PHC string form.
///
/// The PHC string carries its own salt and cost parameters, so digests
/// written with older parameters keep verifying.
///
/// # Examples
/// ```
/// use opsdesk::domain::PasswordDigest;
///
/// let digest = PasswordDigest::hash("correct horse").unwrap();
/// assert!(digest.as_ref().starts_with("$argon2id$"));
/// assert_eq!(digest.verify("correct horse"), Ok(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordDigestError::Hash(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a digest loaded from storage.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Check a candidate password.
    ///
    /// A mismatch is `Ok(false)`; a digest that does not parse as a PHC
    /// string is an error.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordDigestError> {
        let parsed = PasswordHash::new(&self.0)
            .map_err(|err| PasswordDigestError::Malformed(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordDigestError::Malformed(err.to_string())),
        }
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", " spaced ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    fn digest_verifies_matching_password_only() {
        let digest = PasswordDigest::hash("correct horse").expect("hashes");

        assert_eq!(digest.verify("correct horse"), Ok(true));
        assert_eq!(digest.verify("wrong horse"), Ok(false));
    }

    #[rstest]
    fn digest_is_an_argon2id_phc_string() {
        let digest = PasswordDigest::hash("pw").expect("hashes");

        assert!(digest.as_ref().starts_with("$argon2id$"));
        assert!(!digest.as_ref().contains("pw$"));
    }

    #[rstest]
    fn equal_passwords_get_distinct_salts() {
        let first = PasswordDigest::hash("same").expect("hashes");
        let second = PasswordDigest::hash("same").expect("hashes");

        assert_ne!(first, second);
        assert_eq!(second.verify("same"), Ok(true));
    }

    #[rstest]
    #[case("abc")]
    #[case("5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8")]
    fn legacy_or_garbled_digests_are_malformed(#[case] stored: &str) {
        let digest = PasswordDigest::from_stored(stored);

        assert!(matches!(
            digest.verify("pw"),
            Err(PasswordDigestError::Malformed(_))
        ));
    }
}
