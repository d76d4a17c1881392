use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptchaError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(CaptchaError::lookup("x").to_string().contains("lookup error:"));
    assert!(CaptchaError::range("x").to_string().contains("range error:"));
    assert!(CaptchaError::render("x").to_string().contains("render error:"));
    assert!(CaptchaError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptchaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_config());
}

#[test]
fn is_config_only_matches_config() {
    assert!(CaptchaError::config("x").is_config());
    assert!(!CaptchaError::lookup("x").is_config());
}
