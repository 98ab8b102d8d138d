//! Decoding of batch input files, which spreadsheet tools often export in a
//! legacy code page (GBK, Windows-1252, Shift_JIS) instead of UTF-8.

use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::UTF_8;
use log::{debug, warn};

use crate::error::TaricResult;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

pub fn decode_file(path: &Path) -> TaricResult<DecodedText> {
    let bytes = fs::read(path)?;
    Ok(decode_bytes(&bytes))
}

pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    // BOM UTF-8 (EF BB BF)
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return DecodedText {
            text: String::from_utf8_lossy(rest).into_owned(),
            encoding: "utf-8-sig",
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!("input decoded as {} with replacement characters", encoding.name());
    } else {
        debug!("input detected as {}", encoding.name());
    }

    DecodedText {
        text: text.into_owned(),
        encoding: encoding.name(),
    }
}
