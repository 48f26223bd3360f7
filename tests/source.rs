#[cfg(test)]
mod source_tests {
    use std::fs;
    use std::io;
    use std::path::PathBuf;

    use heartlisp::error::LangError;
    use heartlisp::interpreter::Interpreter;
    use heartlisp::source::{decode, read_source};
    use heartlisp::value::Value;

    fn scratch_file(name: &str, bytes: &[u8]) -> PathBuf {
        let path: PathBuf =
            std::env::temp_dir().join(format!("heartlisp-{}-{}", std::process::id(), name));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_read_source_runs() {
        let path = scratch_file("ok.hl", b"(<3 sq [x] (* x x)) (sq 7)");

        let source: String = read_source(&path).unwrap();
        assert_eq!(Interpreter::default().run_source(&source).unwrap(), Value::Int(49));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_file_is_empty_source() {
        let path = scratch_file("empty.hl", b"");

        assert_eq!(read_source(&path).unwrap(), "");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let path: PathBuf = std::env::temp_dir().join("heartlisp-no-such-file.hl");

        let err = read_source(&path).unwrap_err();
        assert!(
            matches!(err, LangError::Io(ref e) if e.kind() == io::ErrorKind::NotFound),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let path = scratch_file("bad.hl", b"(print \"\xff\")");

        let err = read_source(&path).unwrap_err();
        assert!(matches!(err, LangError::Utf8(_)), "{:?}", err);
        assert!(!err.is_internal());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_wrapped_errors_display_transparently() {
        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "locked");
        assert_eq!(LangError::from(inner).to_string(), "locked");

        let utf8 = std::str::from_utf8(b"\xc3").unwrap_err();
        assert_eq!(decode(b"\xc3").unwrap_err().to_string(), utf8.to_string());
        assert_eq!(decode(b"(+ 1 2)").unwrap(), "(+ 1 2)");
    }
}
