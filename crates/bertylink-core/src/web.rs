//! Web form: `https://berty.tech/id#<kind>/<base58 blob>[/<query>]`
//!
//! Everything after `#` stays on the client, so the web server hosting the
//! landing page never sees the payload. The blob holds the reduced machine
//! record; the display name travels as a readable `name=` parameter.

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::basex::DecodeError;
use crate::error::{LinkError, LinkResult};
use crate::link::{from_bytes_exact, strip_prefix_ignore_case};
use crate::projection::{HumanParams, Projection, CONTACT_TAG, GROUP_TAG, NAME_PARAM};
use crate::types::{BertyGroup, BertyId, LinkKind, LinkRecord};

/// Prefix of every web link; matched case-insensitively on decode
pub const WEB_PREFIX: &str = "https://berty.tech/id#";

/// Map a web kind tag to its link kind. Tags are case-sensitive.
pub(crate) fn kind_from_tag(tag: &str) -> LinkKind {
    match tag {
        CONTACT_TAG => LinkKind::ContactInviteV1,
        GROUP_TAG => LinkKind::GroupV1,
        _ => LinkKind::Unknown,
    }
}

/// Build the web link for a projected record.
pub(crate) fn encode(projection: &Projection<'_>) -> LinkResult<String> {
    let machine = projection.machine.to_bytes()?;
    let mut path = format!("{}/{}", projection.kind_tag, bs58::encode(&machine).into_string());
    if !projection.human.is_empty() {
        path.push('/');
        path.push_str(&encode_query(&projection.human));
    }
    Ok(format!("{}{}", WEB_PREFIX, path))
}

/// `application/x-www-form-urlencoded` serialization, keys in sorted order.
fn encode_query(params: &HumanParams) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Parse a query string, keeping the first value of each key.
///
/// Unlike `form_urlencoded::parse`, a malformed `%` escape or a value that
/// does not decode to UTF-8 is an error instead of being passed through.
fn decode_query(query: &str) -> LinkResult<HumanParams> {
    let mut params = HumanParams::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = unescape(key)?;
        let value = unescape(value)?;
        params.entry(key).or_insert(value);
    }
    Ok(params)
}

fn unescape(component: &str) -> LinkResult<String> {
    let bytes = component.as_bytes();
    for (index, _) in component.match_indices('%') {
        let escape = bytes.get(index + 1..index + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(LinkError::InvalidQuery(format!(
                "malformed escape at index {} in {:?}",
                index, component
            )));
        }
    }

    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| LinkError::InvalidQuery(format!("{:?} is not UTF-8 once decoded", component)))
}

/// Decode a web link.
///
/// # Errors
///
/// Returns `LinkError::UnsupportedFormat` if `uri` lacks the web prefix, and an
/// `InvalidInput`-kind error for an empty fragment, fewer than two segments,
/// an unknown kind tag, bad base58, a malformed query or a malformed blob.
pub fn decode(uri: &str) -> LinkResult<LinkRecord> {
    let fragment = strip_prefix_ignore_case(uri, WEB_PREFIX).ok_or(LinkError::UnsupportedFormat)?;
    if fragment.is_empty() {
        return Err(LinkError::MissingFragment);
    }

    let parts: Vec<&str> = fragment.split('/').collect();
    if parts.len() < 2 {
        return Err(LinkError::TooFewParts);
    }

    let machine = bs58::decode(parts[1])
        .into_vec()
        .map_err(DecodeError::from)?;
    let human = if parts.len() > 2 {
        decode_query(&parts[2..].join("/"))?
    } else {
        HumanParams::new()
    };
    let name = human.get(NAME_PARAM).map(String::as_str).unwrap_or_default();

    let link = match kind_from_tag(parts[0]) {
        LinkKind::ContactInviteV1 => {
            let mut id: BertyId = from_bytes_exact(&machine)?;
            merge_name(&mut id.display_name, name);
            LinkRecord::ContactInviteV1(id)
        }
        LinkKind::GroupV1 => {
            let mut group: BertyGroup = from_bytes_exact(&machine)?;
            merge_name(&mut group.display_name, name);
            LinkRecord::GroupV1(group)
        }
        LinkKind::Unknown => return Err(LinkError::UnknownKind(parts[0].to_string())),
    };

    link.validate()?;
    Ok(link)
}

/// A name already in the blob wins over the query parameter.
fn merge_name(display_name: &mut String, human_name: &str) {
    if display_name.is_empty() && !human_name.is_empty() {
        *display_name = human_name.to_string();
    }
}
