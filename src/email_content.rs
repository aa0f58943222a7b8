use crate::boundary::chunk_split;
use crate::error::{MailError, Result};
use crate::mime_sniff::detect_content_type;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::engine::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;

const CRLF: &str = "\r\n";

// File attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Wraps in-memory bytes, sniffing their content type.
    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let mime_type = detect_content_type(&data).to_string();
        Self {
            file_name: file_name.into(),
            mime_type,
            data,
        }
    }

    /// Reads `dir/file_name` from disk.
    ///
    /// The attachment keeps `file_name` as given, so a caller-side directory
    /// never leaks into the `filename=` parameter.
    pub async fn from_path(dir: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let path = dir.as_ref().join(file_name);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Self::from_bytes(file_name, data)),
            Err(source) => Err(MailError::FileRead { path, source }),
        }
    }

    /// Base64 body split into `line_width` lines, each CRLF-terminated.
    pub fn encoded_body(&self, line_width: usize) -> String {
        chunk_split(&STANDARD.encode(&self.data), line_width, CRLF)
    }
}

// Longest UTF-8 run per encoded word; 39 bytes become 52 base64 characters,
// so `Subject: ` plus one word stays within 76 columns
const ENCODED_WORD_BYTES: usize = 39;

// RFC 2231 attribute-char: everything but these is percent-encoded
const PARAM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

// Reject values that would let a caller inject extra headers
fn check_header<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.contains(['\r', '\n']) {
        return Err(MailError::InvalidHeader(name.to_string()));
    }
    Ok(value)
}

/// RFC 2047 `B` encoding for non-ASCII header text.
///
/// Long values are split into several encoded words on character boundaries
/// and folded onto continuation lines.
pub fn encode_header_word(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut start = 0;
    while start < value.len() {
        let mut end = (start + ENCODED_WORD_BYTES).min(value.len());
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        words.push(format!(
            "=?UTF-8?B?{}?=",
            STANDARD.encode(&value.as_bytes()[start..end])
        ));
        start = end;
    }
    words.join("\r\n ")
}

/// Formats a `Content-Type`/`Content-Disposition` parameter.
///
/// ASCII values are quoted with `\\` and `"` escaped. Anything else uses the
/// RFC 2231 extended form, `name*=UTF-8''` followed by percent-encoded bytes.
pub fn header_param(name: &str, value: &str) -> String {
    if value.is_ascii() {
        let quoted = value.replace('\\', "\\\\").replace('"', "\\\"");
        return format!("{}=\"{}\"", name, quoted);
    }

    format!(
        "{}*=UTF-8''{}",
        name,
        utf8_percent_encode(value, PARAM_ENCODE_SET)
    )
}

/// Builds a single-part `text/plain` message.
pub fn build_plain_message(to: &str, subject: &str, body: &str) -> Result<Vec<u8>> {
    let to = check_header("To", to)?;
    let subject = encode_header_word(check_header("Subject", subject)?);

    let mut message = String::new();
    message.push_str(&format!("To: {}{}", to, CRLF));
    message.push_str(&format!("Subject: {}{}", subject, CRLF));
    message.push_str(&format!("MIME-Version: 1.0{}", CRLF));
    message.push_str(&format!(
        "Content-Type: text/plain; charset=\"UTF-8\"{}",
        CRLF
    ));
    message.push_str(CRLF);
    message.push_str(body);

    Ok(message.into_bytes())
}

/// Builds a `multipart/mixed` message with a text part followed by one
/// base64 attachment part, delimited by `boundary`.
pub fn build_multipart_message(
    to: &str,
    subject: &str,
    content: &str,
    attachment: &Attachment,
    boundary: &str,
    line_width: usize,
) -> Result<Vec<u8>> {
    let to = check_header("To", to)?;
    let subject = encode_header_word(check_header("Subject", subject)?);
    let file_name = check_header("filename", &attachment.file_name)?;
    let text_encoding = if content.is_ascii() { "7bit" } else { "8bit" };

    let mut message = String::new();

    // Top-level headers
    message.push_str(&format!(
        "Content-Type: multipart/mixed; boundary={}{}",
        boundary, CRLF
    ));
    message.push_str(&format!("MIME-Version: 1.0{}", CRLF));
    message.push_str(&format!("To: {}{}", to, CRLF));
    message.push_str(&format!("Subject: {}{}", subject, CRLF));
    message.push_str(CRLF);

    // Text part
    message.push_str(&format!("--{}{}", boundary, CRLF));
    message.push_str(&format!(
        "Content-Type: text/plain; charset=\"UTF-8\"{}",
        CRLF
    ));
    message.push_str(&format!("MIME-Version: 1.0{}", CRLF));
    message.push_str(&format!(
        "Content-Transfer-Encoding: {}{}",
        text_encoding, CRLF
    ));
    message.push_str(CRLF);
    message.push_str(content);
    message.push_str(CRLF);
    message.push_str(CRLF);

    // Attachment part
    message.push_str(&format!("--{}{}", boundary, CRLF));
    message.push_str(&format!(
        "Content-Type: {}; {}{}",
        attachment.mime_type,
        header_param("name", file_name),
        CRLF
    ));
    message.push_str(&format!("MIME-Version: 1.0{}", CRLF));
    message.push_str(&format!("Content-Transfer-Encoding: base64{}", CRLF));
    message.push_str(&format!(
        "Content-Disposition: attachment; {}{}",
        header_param("filename", file_name),
        CRLF
    ));
    message.push_str(CRLF);
    message.push_str(&attachment.encoded_body(line_width));

    message.push_str(&format!("--{}--", boundary));

    Ok(message.into_bytes())
}

/// Encodes a complete message for the `raw` field of a Gmail send request.
pub fn encode_raw(message: &[u8]) -> String {
    URL_SAFE.encode(message)
}
