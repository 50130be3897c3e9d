//! End-to-end conversions through the engine, including the error contract
//! that callers rely on for localized messages.

use textconv::{
    AsciiCodec, Codec, ConversionEngine, ConversionRequest, EncodingFormat, ErrorKind, Response,
    Utf8Codec, Utf16Codec, convert,
};

use EncodingFormat::*;

#[test]
fn test_text_to_hex() {
    let result = convert("AB", Utf8, Hex).unwrap();
    assert_eq!(result.output, "4142");
}

#[test]
fn test_hex_to_binary() {
    let result = convert("4142", Hex, Binary).unwrap();
    assert_eq!(result.output, "01000001 01000010");
    assert_eq!(result.byte_length(), 2);
    assert_eq!(result.codepoint_count, 2);
}

#[test]
fn test_emoji_to_surrogate_pair_escape() {
    let result = convert("😀", Utf8, UnicodeEscape).unwrap();
    assert_eq!(result.output, "\\ud83d\\ude00");
    assert_eq!(result.codepoint_count, 1);
    assert_eq!(result.byte_length(), 4);
}

#[test]
fn test_malformed_hex() {
    let err = convert("4G", Hex, Utf8).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidHexDigit);
    assert_eq!(err.kind.as_str(), "InvalidHexDigit");
    assert_eq!(err.position, 1);
}

#[test]
fn test_overlong_nul_rejected() {
    let err = Utf8Codec.decode(&[0xC0, 0x80]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OverlongEncoding);

    let err = ConversionEngine::new()
        .convert_bytes(&[0xC0, 0x80], Utf8, Hex)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::OverlongEncoding);
}

#[test]
fn test_lone_high_surrogate_rejected() {
    let err = Utf16Codec::default().decode(&[0x00, 0xD8]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::LoneHighSurrogate);

    let err = ConversionEngine::new()
        .convert_bytes(&[0x00, 0xD8], Utf16, Utf8)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::LoneHighSurrogate);
    assert_eq!(err.position, 0);
}

#[test]
fn test_ascii_boundary() {
    let ok = textconv::CodepointSequence::from_scalars(&[0x7F]).unwrap();
    assert!(AsciiCodec.encode(&ok).is_ok());

    let bad = textconv::CodepointSequence::from_scalars(&[0x80]).unwrap();
    let err = AsciiCodec.encode(&bad).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CodepointOutOfRange);
}

#[test]
fn test_escape_to_every_format() {
    let engine = ConversionEngine::new();
    let escaped = "\\u0048\\u0069";

    let expected = [
        (Utf8, "Hi"),
        (Utf16, "Hi"),
        (Ascii, "Hi"),
        (Iso8859_1, "Hi"),
        (Hex, "4869"),
        (Binary, "01001000 01101001"),
        (UnicodeEscape, "\\u0048\\u0069"),
    ];
    for (target, output) in expected {
        let result = engine.convert_str(escaped, UnicodeEscape, target).unwrap();
        assert_eq!(result.output, output, "target {target}");
    }
}

#[test]
fn test_utf16_target_bytes() {
    let result = convert("A😀", Utf8, Utf16).unwrap();
    assert_eq!(result.encoded, vec![0x41, 0x00, 0x3D, 0xD8, 0x00, 0xDE]);
    assert_eq!(result.byte_length(), 6);
    assert_eq!(result.codepoint_count, 2);
}

#[test]
fn test_raw_bytes_through_formatters() {
    let engine = ConversionEngine::new();

    // Latin-1 byte 0xE9 decodes to U+00E9, which is two UTF-8 bytes
    let result = engine.convert_bytes(&[b'c', 0xE9], Iso8859_1, Hex).unwrap();
    assert_eq!(result.output, "63c3a9");

    let err = engine.convert_bytes(&[b'o', 0xFF], Ascii, Utf8).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonAsciiByte);
    assert_eq!(err.position, 1);

    // Framing sources read their bytes as UTF-8 text
    let result = engine.convert_bytes(b"48 69\n", Hex, Utf8).unwrap();
    assert_eq!(result.output, "Hi");
}

#[test]
fn test_invalid_bytes_between_framings_and_codecs() {
    let err = convert("e282", Hex, Utf8).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TruncatedSequence);

    let err = convert("ed a0 80", Hex, UnicodeEscape).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SurrogateInUtf8);

    let err = convert("01000001 1111", Binary, Hex).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidBinaryToken);
    assert_eq!(err.position, 9);

    let err = convert("abc", Hex, Binary).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OddHexLength);
    assert_eq!(err.position, 2);
}

#[test]
fn test_unpaired_escape_in_request() {
    let request = ConversionRequest::new("ok \\ud800!", UnicodeEscape, Utf8);
    let err = ConversionEngine::new().convert(&request).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnpairedSurrogateEscape);
    assert_eq!(err.position, 3);
}

#[test]
fn test_request_deserializes_from_wire_names() {
    let request: ConversionRequest = serde_json::from_str(
        r#"{"input":"é","sourceFormat":"utf8","targetFormat":"iso-8859-1"}"#,
    )
    .unwrap();
    assert_eq!(request.source_format, Utf8);
    assert_eq!(request.target_format, Iso8859_1);

    let result = ConversionEngine::new().convert(&request).unwrap();
    assert_eq!(result.encoded, vec![0xE9]);
}

#[test]
fn test_response_json_shape() {
    let ok = Response::from(&convert("AB", Utf8, Hex));
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "ok": true,
            "output": "4142",
            "byteLength": 2,
            "codepointCount": 2
        })
    );

    let err = Response::from(&convert("4G", Hex, Utf8));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorKind"], "InvalidHexDigit");
    assert_eq!(json["position"], 1);
    assert!(json["detail"].is_string());
    assert!(json.get("output").is_none());
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = ConversionEngine::new();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("thread {i} ✓");
                let hex = engine.convert_str(&text, Utf8, Hex).unwrap();
                engine.convert_str(&hex.output, Hex, Utf8).unwrap().output
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("thread {i} ✓"));
    }
}

#[test]
fn test_empty_input() {
    for source in EncodingFormat::ALL {
        for target in EncodingFormat::ALL {
            let result = convert("", source, target).unwrap();
            assert_eq!(result.output, "");
            assert_eq!(result.byte_length(), 0);
            assert_eq!(result.codepoint_count, 0);
        }
    }
}
