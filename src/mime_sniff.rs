//! Content-type detection from file bytes.
//!
//! Follows the WHATWG MIME Sniffing standard (the same table browsers and
//! most HTTP stacks use). Only the first 512 bytes are examined, and the
//! result is always a valid media type; unknown binary data falls back to
//! `application/octet-stream`.

const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

enum Signature {
    /// HTML tag, matched case-insensitively after leading whitespace and
    /// followed by a space or `>`.
    Html(&'static [u8]),
    Exact(&'static [u8], &'static str),
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_whitespace: bool,
        content_type: &'static str,
    },
    Mp4,
    WebM,
    Text,
}

const fn masked(mask: &'static [u8], pattern: &'static [u8], content_type: &'static str) -> Signature {
    Signature::Masked {
        mask,
        pattern,
        skip_whitespace: false,
        content_type,
    }
}

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_whitespace: true,
        content_type: "text/xml; charset=utf-8",
    },
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),
    // byte order marks
    masked(b"\xFF\xFF\x00\x00", b"\xFE\xFF\x00\x00", "text/plain; charset=utf-16be"),
    masked(b"\xFF\xFF\x00\x00", b"\xFF\xFE\x00\x00", "text/plain; charset=utf-16le"),
    masked(b"\xFF\xFF\xFF\x00", b"\xEF\xBB\xBF\x00", TEXT_PLAIN_UTF8),
    // images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WEBPVP",
        "image/webp",
    ),
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // audio and video
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"FORM\x00\x00\x00\x00AIFF",
        "audio/aiff",
    ),
    masked(b"\xFF\xFF\xFF", b"ID3", "audio/mpeg"),
    masked(b"\xFF\xFF\xFF\xFF\xFF", b"OggS\x00", "application/ogg"),
    masked(
        b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        b"MThd\x00\x00\x00\x06",
        "audio/midi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00AVI ",
        "video/avi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WAVE",
        "audio/wave",
    ),
    Signature::Mp4,
    Signature::WebM,
    // fonts
    masked(
        b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\xFF\xFF",
        b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00LP",
        "application/vnd.ms-fontobject",
    ),
    Signature::Exact(b"\x00\x01\x00\x00", "font/ttf"),
    Signature::Exact(b"OTTO", "font/otf"),
    Signature::Exact(b"ttcf", "font/collection"),
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),
    // archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00\x61\x73\x6D", "application/wasm"),
    Signature::Text,
];

/// Returns the media type of `data`.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|sig| sig.matches(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Html(tag) => html_match(&data[first_non_ws..], tag),
            Signature::Exact(sig, content_type) => data.starts_with(sig).then_some(*content_type),
            Signature::Masked {
                mask,
                pattern,
                skip_whitespace,
                content_type,
            } => {
                let data = if *skip_whitespace {
                    &data[first_non_ws..]
                } else {
                    data
                };
                if data.len() < pattern.len() {
                    return None;
                }
                data.iter()
                    .zip(mask.iter())
                    .zip(pattern.iter())
                    .all(|((d, m), p)| d & m == *p)
                    .then_some(*content_type)
            }
            Signature::Mp4 => mp4_match(data),
            Signature::WebM => webm_match(data),
            Signature::Text => text_match(&data[first_non_ws..]),
        }
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

fn html_match(data: &[u8], tag: &[u8]) -> Option<&'static str> {
    if data.len() < tag.len() + 1 {
        return None;
    }
    let prefix_matches = tag.iter().zip(data.iter()).all(|(t, d)| {
        if t.is_ascii_uppercase() {
            d.to_ascii_uppercase() == *t
        } else {
            d == t
        }
    });
    if !prefix_matches {
        return None;
    }
    // the tag must be terminated
    matches!(data[tag.len()], b' ' | b'>').then_some("text/html; charset=utf-8")
}

fn mp4_match(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return None;
    }
    (8..box_size)
        .step_by(4)
        // bytes 12..16 hold the minor version
        .filter(|st| *st != 12)
        .any(|st| data.get(st..st + 3) == Some(b"mp4".as_slice()))
        .then_some("video/mp4")
}

fn webm_match(data: &[u8]) -> Option<&'static str> {
    if !data.starts_with(b"\x1A\x45\xDF\xA3") {
        return None;
    }
    // look for the EBML DocType element followed by "webm"
    let window = &data[4..data.len().min(4 + 38)];
    window
        .windows(2)
        .position(|w| w == b"\x42\x82")
        .and_then(|pos| {
            let after = &data[4 + pos + 2..];
            after
                .get(..after.len().min(8))
                .filter(|head| head.windows(4).any(|w| w == b"webm"))
        })
        .map(|_| "video/webm")
}

fn text_match(data: &[u8]) -> Option<&'static str> {
    let has_binary = data
        .iter()
        .any(|b| matches!(*b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F));
    (!has_binary).then_some(TEXT_PLAIN_UTF8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_images() {
        assert_eq!(
            detect_content_type(b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00\x00\x0DIHDR"),
            "image/png"
        );
        assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "image/jpeg");
        assert_eq!(detect_content_type(b"GIF89a\x01\x00\x01\x00"), "image/gif");
        assert_eq!(
            detect_content_type(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            "image/webp"
        );
    }

    #[test]
    fn test_detect_pdf_and_archives() {
        assert_eq!(detect_content_type(b"%PDF-1.7\n%\xE2\xE3"), "application/pdf");
        assert_eq!(
            detect_content_type(b"PK\x03\x04\x14\x00\x00\x00"),
            "application/zip"
        );
        assert_eq!(
            detect_content_type(b"\x1F\x8B\x08\x00\x00\x00"),
            "application/x-gzip"
        );
    }

    #[test]
    fn test_detect_html_case_insensitive_after_whitespace() {
        assert_eq!(
            detect_content_type(b"  \n<!doctype html><html></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            detect_content_type(b"<p>hello</p>"),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_html_tag_needs_terminator() {
        // "<pre>" is not "<p" followed by space or '>'
        assert_eq!(detect_content_type(b"<pre>code</pre>"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_detect_xml() {
        assert_eq!(
            detect_content_type(b"<?xml version=\"1.0\"?><root/>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn test_detect_plain_text() {
        assert_eq!(detect_content_type(b"Hello, World!\r\n"), TEXT_PLAIN_UTF8);
        assert_eq!(detect_content_type(b""), TEXT_PLAIN_UTF8);
        assert_eq!(
            detect_content_type("naïve UTF-8 text".as_bytes()),
            TEXT_PLAIN_UTF8
        );
    }

    #[test]
    fn test_detect_bom() {
        assert_eq!(
            detect_content_type(b"\xFE\xFF\x00h\x00i"),
            "text/plain; charset=utf-16be"
        );
        assert_eq!(detect_content_type(b"\xEF\xBB\xBFhi"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_detect_mp4() {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftypmp42");
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"mp42isom");
        assert_eq!(detect_content_type(&data), "video/mp4");
    }

    #[test]
    fn test_detect_webm() {
        let data = b"\x1A\x45\xDF\xA3\x9F\x42\x86\x81\x01\x42\x82\x84webm\x42\x87";
        assert_eq!(detect_content_type(data), "video/webm");
    }

    #[test]
    fn test_detect_binary_fallback() {
        assert_eq!(detect_content_type(b"\x01\x02\x03\x04garbage"), OCTET_STREAM);
    }

    #[test]
    fn test_only_first_512_bytes_are_sniffed() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), TEXT_PLAIN_UTF8);
    }
}
