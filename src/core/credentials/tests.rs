//! Tests for credential generation

#[cfg(test)]
mod tests {
    use super::super::{
        Credential, DEFAULT_SECRET_BYTES, FINGERPRINT_LEN, FINGERPRINT_NAME_LEN,
        SECRET_DISPLAY_LEN, fingerprint, generate,
    };

    #[test]
    fn test_secret_length() {
        let cred = generate(DEFAULT_SECRET_BYTES).unwrap();
        assert_eq!(cred.secret.len(), SECRET_DISPLAY_LEN);
    }

    #[test]
    fn test_secret_is_url_safe() {
        let cred = generate(DEFAULT_SECRET_BYTES).unwrap();
        assert!(
            cred.secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_secrets_are_unique() {
        let first = generate(DEFAULT_SECRET_BYTES).unwrap();
        let second = generate(DEFAULT_SECRET_BYTES).unwrap();
        assert_ne!(first.secret, second.secret);
        assert_ne!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn test_short_byte_length_yields_shorter_secret() {
        // 12 bytes encode to 16 URL-safe characters, below the display cap.
        let cred = generate(12).unwrap();
        assert_eq!(cred.secret.len(), 16);
    }

    #[test]
    fn test_fingerprint_length_and_format() {
        let fp = fingerprint("some-secret");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("same-secret"), fingerprint("same-secret"));
        assert_ne!(fingerprint("secret-a"), fingerprint("secret-b"));
    }

    #[test]
    fn test_generated_fingerprint_matches_recomputation() {
        // Write-time and read-time fingerprints must agree, this is what
        // makes delete-by-secret find the record it is looking for.
        let cred = generate(DEFAULT_SECRET_BYTES).unwrap();
        assert_eq!(cred.fingerprint, fingerprint(&cred.secret));
    }

    #[test]
    fn test_name_prefix() {
        let cred = Credential {
            secret: "irrelevant".to_string(),
            fingerprint: "0123456789abcdef0123456789abcdef".to_string(),
        };
        assert_eq!(cred.name_prefix(), "01234567");
        assert_eq!(cred.name_prefix().len(), FINGERPRINT_NAME_LEN);
    }
}
