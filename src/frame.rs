//! Payload frames: the text that actually gets hidden in an image.
//!
//! Layout:
//!
//! ```text
//! MARK:<name>:<size>:<base64(body)>
//! ```
//!
//! where `<size>` is the length of the original payload and `body` is either
//! `salt (16) || "|ENCRYPTED|" || token` or `"|PLAIN|" || payload`.
//! Base64 never produces `:`, so the fourth field is taken verbatim.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

use crate::crypto::{
    decrypt_with_password, encrypt_with_password, generate_salt, SymmetricError, SALT_LEN,
    TOKEN_OVERHEAD,
};

/// Literal tag that opens every frame.
pub const FRAME_MARKER: &str = "MARK";

/// Body marker for password-protected payloads, located right after the salt.
pub const ENCRYPTED_TAG: &[u8] = b"|ENCRYPTED|";

/// Body marker for unprotected payloads, located at offset 0.
pub const PLAIN_TAG: &[u8] = b"|PLAIN|";

/// Longest accepted payload name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Body bytes added on top of the payload by the encrypted layout.
pub const ENCRYPTED_BODY_OVERHEAD: usize = SALT_LEN + ENCRYPTED_TAG.len() + TOKEN_OVERHEAD;

/// Upper bound of the `MARK:<name>:<size>:` prefix.
pub const MAX_HEADER_LEN: usize = FRAME_MARKER.len() + MAX_NAME_LEN + 20 + 3;

/// Errors that can occur while building or parsing a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid payload name: {0}")]
    InvalidName(&'static str),

    #[error("No payload marker found")]
    MissingMarker,

    #[error("Malformed frame: {0}")]
    Malformed(&'static str),

    #[error("Invalid base64 body: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Unrecognized body marker")]
    UnknownBodyMarker,

    #[error("Payload is encrypted but no password was provided")]
    PasswordRequired,

    #[error("Authentication failed: wrong password or corrupted data")]
    Authentication,

    #[error("Encrypted payload has expired")]
    TokenExpired,

    #[error("Encryption failed")]
    Encryption,

    #[error("Payload size mismatch: declared {declared} bytes, recovered {actual}")]
    SizeMismatch { declared: u64, actual: u64 },
}

impl From<SymmetricError> for FrameError {
    fn from(err: SymmetricError) -> Self {
        match err {
            SymmetricError::EncryptionFailed => FrameError::Encryption,
            SymmetricError::AuthenticationFailed => FrameError::Authentication,
            SymmetricError::TokenExpired { .. } => FrameError::TokenExpired,
        }
    }
}

/// A successfully parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    /// Display name of the payload (usually the original file name).
    pub name: String,
    /// The recovered payload bytes.
    pub data: Vec<u8>,
    /// Whether the payload was password-protected.
    pub encrypted: bool,
}

/// Frame metadata readable without a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub name: String,
    pub declared_size: u64,
    pub encrypted: bool,
    pub encoded_len: usize,
}

/// Borrowed view of the four frame fields.
struct RawFrame<'a> {
    name: &'a str,
    declared_size: u64,
    encoded: &'a str,
}

enum Body<'a> {
    Encrypted {
        salt: [u8; SALT_LEN],
        token: &'a [u8],
    },
    Plain(&'a [u8]),
}

fn check_name(name: &str) -> Result<(), FrameError> {
    if name.is_empty() {
        return Err(FrameError::InvalidName("name is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FrameError::InvalidName("name is longer than 255 bytes"));
    }
    if name.contains(':') {
        return Err(FrameError::InvalidName("name contains ':'"));
    }
    if name.chars().any(char::is_control) {
        return Err(FrameError::InvalidName("name contains control characters"));
    }
    Ok(())
}

/// A salt starting with the plain marker would make the body ambiguous.
fn fresh_salt() -> [u8; SALT_LEN] {
    loop {
        let salt = generate_salt();
        if !salt.starts_with(PLAIN_TAG) {
            return salt;
        }
    }
}

/// Builds the frame text for a payload.
///
/// With a non-empty `password` the payload is encrypted under a fresh salt;
/// an empty password is treated the same as none.
pub fn build_frame(
    name: &str,
    payload: &[u8],
    password: Option<&str>,
) -> Result<String, FrameError> {
    check_name(name)?;

    let body = match password.filter(|p| !p.is_empty()) {
        Some(password) => {
            let salt = fresh_salt();
            let token = encrypt_with_password(payload, password, &salt)?;
            let mut body = Vec::with_capacity(SALT_LEN + ENCRYPTED_TAG.len() + token.len());
            body.extend_from_slice(&salt);
            body.extend_from_slice(ENCRYPTED_TAG);
            body.extend_from_slice(&token);
            body
        }
        None => {
            let mut body = Vec::with_capacity(PLAIN_TAG.len() + payload.len());
            body.extend_from_slice(PLAIN_TAG);
            body.extend_from_slice(payload);
            body
        }
    };

    Ok(format!(
        "{}:{}:{}:{}",
        FRAME_MARKER,
        name,
        payload.len(),
        BASE64.encode(body)
    ))
}

fn split_frame(text: &str) -> Result<RawFrame<'_>, FrameError> {
    let rest = text
        .strip_prefix(FRAME_MARKER)
        .and_then(|r| r.strip_prefix(':'))
        .ok_or(FrameError::MissingMarker)?;

    let mut fields = rest.splitn(3, ':');
    let (name, size, encoded) = match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(size), Some(encoded)) => (name, size, encoded),
        _ => return Err(FrameError::Malformed("expected 4 colon-separated fields")),
    };

    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::Malformed("size field is not a decimal number"));
    }
    let declared_size = size
        .parse::<u64>()
        .map_err(|_| FrameError::Malformed("size field out of range"))?;

    Ok(RawFrame {
        name,
        declared_size,
        encoded,
    })
}

fn classify_body(body: &[u8]) -> Result<Body<'_>, FrameError> {
    if let Some(payload) = body.strip_prefix(PLAIN_TAG) {
        return Ok(Body::Plain(payload));
    }

    let tag_end = SALT_LEN + ENCRYPTED_TAG.len();
    if body.len() >= tag_end && &body[SALT_LEN..tag_end] == ENCRYPTED_TAG {
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&body[..SALT_LEN]);
        return Ok(Body::Encrypted {
            salt,
            token: &body[tag_end..],
        });
    }

    Err(FrameError::UnknownBodyMarker)
}

/// Reads a frame's metadata without decrypting it.
pub fn inspect_frame(text: &str) -> Result<FrameInfo, FrameError> {
    let raw = split_frame(text)?;
    let body = BASE64.decode(raw.encoded)?;
    let encrypted = matches!(classify_body(&body)?, Body::Encrypted { .. });

    Ok(FrameInfo {
        name: raw.name.to_string(),
        declared_size: raw.declared_size,
        encrypted,
        encoded_len: raw.encoded.len(),
    })
}

/// Parses a frame and recovers its payload.
pub fn parse_frame(text: &str, password: Option<&str>) -> Result<ParsedFrame, FrameError> {
    parse_frame_with_ttl(text, password, None)
}

/// Parses a frame, rejecting encrypted payloads older than `ttl`.
pub fn parse_frame_with_ttl(
    text: &str,
    password: Option<&str>,
    ttl: Option<Duration>,
) -> Result<ParsedFrame, FrameError> {
    let raw = split_frame(text)?;
    let body = BASE64.decode(raw.encoded)?;

    let (data, encrypted) = match classify_body(&body)? {
        Body::Encrypted { salt, token } => {
            let password = password
                .filter(|p| !p.is_empty())
                .ok_or(FrameError::PasswordRequired)?;
            (decrypt_with_password(token, password, &salt, ttl)?, true)
        }
        Body::Plain(payload) => (payload.to_vec(), false),
    };

    let actual = data.len() as u64;
    if actual != raw.declared_size {
        return Err(FrameError::SizeMismatch {
            declared: raw.declared_size,
            actual,
        });
    }

    Ok(ParsedFrame {
        name: raw.name.to_string(),
        data,
        encrypted,
    })
}
