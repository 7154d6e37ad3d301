use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LoupeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(LoupeError::render("x").to_string().contains("render error:"));
    assert!(
        LoupeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LoupeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
