//! Entry-name decoding.
//!
//! ZIP stores entry names as raw bytes. Entries flagged as UTF-8 are decoded
//! as UTF-8 by the zip library and everything else as CP437. Archives
//! produced by tools that ignore the flag (common with localized Windows
//! archivers) need an explicit codec, which is injected into an
//! [`ArchiveReader`](crate::ArchiveReader) with
//! [`with_name_codec`](crate::ArchiveReader::with_name_codec).

use std::borrow::Cow;

use codepage_437::BorrowFromCp437;
use codepage_437::CP437_CONTROL;

/// Decodes raw entry-name bytes from the central directory.
pub trait NameCodec {
    /// Decodes a raw entry name.
    fn decode(&self, raw: &[u8]) -> String;

    /// Short identifier of the codec, used in logs.
    fn label(&self) -> &'static str;
}

/// IBM code page 437, the historical ZIP default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cp437;

impl NameCodec for Cp437 {
    fn decode(&self, raw: &[u8]) -> String {
        Cow::borrow_from_cp437(raw, &CP437_CONTROL).into_owned()
    }

    fn label(&self) -> &'static str {
        "cp437"
    }
}

/// UTF-8, replacing invalid sequences with U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Lossy;

impl NameCodec for Utf8Lossy {
    fn decode(&self, raw: &[u8]) -> String {
        String::from_utf8_lossy(raw).into_owned()
    }

    fn label(&self) -> &'static str {
        "utf8"
    }
}
