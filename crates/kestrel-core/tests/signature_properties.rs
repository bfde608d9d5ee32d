//! Property tests for message signatures

use kestrel_core::signature::SUPPORTED_ALGORITHMS;
use kestrel_core::{MessageParts, SignatureConfig, SignatureEngine};
use proptest::prelude::*;

fn digest_hex_len(algorithm: &str) -> usize {
    match algorithm {
        "sha1" => 40,
        "sha224" => 56,
        "sha256" => 64,
        "sha384" => 96,
        "sha512" => 128,
        other => panic!("no expected length for {other}"),
    }
}

proptest! {
    #[test]
    fn signature_is_deterministic(
        algorithm in prop::sample::select(SUPPORTED_ALGORITHMS),
        key in "\\PC*",
        header in "\\PC*",
        parent in "\\PC*",
        metadata in "\\PC*",
        content in "\\PC*",
    ) {
        let engine = SignatureEngine::new();
        let config = SignatureConfig::hmac(algorithm, key);
        let parts = MessageParts::new(&header, &parent, &metadata, &content);

        let first = engine.compute_signature(&config, &parts).unwrap();
        let second = engine.compute_signature(&config, &parts).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn signature_is_lowercase_hex_of_digest_size(
        algorithm in prop::sample::select(SUPPORTED_ALGORITHMS),
        key in "\\PC*",
        content in "\\PC*",
    ) {
        let engine = SignatureEngine::new();
        let config = SignatureConfig::hmac(algorithm, key);
        let parts = MessageParts::new("{}", "{}", "{}", &content);

        let signature = engine.compute_signature(&config, &parts).unwrap();
        prop_assert_eq!(signature.len(), digest_hex_len(algorithm));
        prop_assert!(signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn disabled_signature_is_always_empty(
        header in "\\PC*",
        parent in "\\PC*",
        metadata in "\\PC*",
        content in "\\PC*",
    ) {
        let engine = SignatureEngine::new();
        let parts = MessageParts::new(&header, &parent, &metadata, &content);

        let signature = engine.compute_signature(&SignatureConfig::Disabled, &parts).unwrap();
        prop_assert_eq!(signature, "");
    }

    #[test]
    fn computed_signature_verifies(
        key in "\\PC*",
        header in "\\PC*",
        content in "\\PC*",
    ) {
        let engine = SignatureEngine::new();
        let config = SignatureConfig::hmac("sha256", key);
        let parts = MessageParts::new(&header, "{}", "{}", &content);

        let signature = engine.compute_signature(&config, &parts).unwrap();
        prop_assert!(engine.verify_signature(&config, &signature, &parts).is_ok());
    }
}
