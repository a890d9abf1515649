use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PenError::config("x").to_string().contains("config error:"));
    assert!(
        PenError::protocol("x")
            .to_string()
            .contains("protocol error:")
    );
    assert!(PenError::channel("x").to_string().contains("channel error:"));
    assert!(PenError::render("x").to_string().contains("render error:"));
    assert!(PenError::asset("x").to_string().contains("asset error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_errors_convert() {
    fn fails() -> PenResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, PenError::Io(_)));
    assert!(err.to_string().contains("port taken"));
}
