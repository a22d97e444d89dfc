//! Internal form: `BERTY://PB/<base43 blob>`
//!
//! Meant for device-to-device QR scans. The whole record is serialized and
//! written with the QR-safe alphabet so a QR encoder can stay in alphanumeric
//! mode, which gives the smallest symbol for a given payload.

use crate::basex::BASE43;
use crate::error::{LinkError, LinkResult};
use crate::link::{from_bytes_exact, strip_prefix_ignore_case};
use crate::types::LinkRecord;

/// Prefix of every internal link; matched case-insensitively on decode
pub const INTERNAL_PREFIX: &str = "BERTY://";

/// Format tag for a base43 postcard blob. Other framings would get their own tag.
pub const INTERNAL_FORMAT_PB: &str = "PB";

/// Build the internal link for a full record.
pub(crate) fn encode(link: &LinkRecord) -> LinkResult<String> {
    let bytes = postcard::to_stdvec(link)?;
    Ok(format!(
        "{}{}/{}",
        INTERNAL_PREFIX,
        INTERNAL_FORMAT_PB,
        BASE43.encode(&bytes)
    ))
}

/// Decode an internal link.
///
/// # Errors
///
/// Returns `LinkError::UnsupportedFormat` if `uri` lacks the internal prefix,
/// `LinkError::UnsupportedLinkType` for a format tag other than `PB`, and an
/// `InvalidInput`-kind error for missing segments, bad base43 or a malformed
/// record.
pub fn decode(uri: &str) -> LinkResult<LinkRecord> {
    let rest =
        strip_prefix_ignore_case(uri, INTERNAL_PREFIX).ok_or(LinkError::UnsupportedFormat)?;

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() < 2 {
        return Err(LinkError::TooFewParts);
    }
    if !parts[0].eq_ignore_ascii_case(INTERNAL_FORMAT_PB) {
        return Err(LinkError::UnsupportedLinkType(parts[0].to_string()));
    }

    // `/` is part of the alphabet, so the blob may span several segments.
    let blob = parts[1..].join("/");
    let bytes = BASE43.decode(&blob)?;
    let link: LinkRecord = from_bytes_exact(&bytes)?;

    link.validate()?;
    Ok(link)
}
