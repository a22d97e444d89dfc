//! Marshaling entry points and format dispatch
//!
//! [`marshal`] turns one record into both textual forms; [`unmarshal`] takes
//! any string, recognises which form it is by prefix, and routes it to the
//! matching decoder.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LinkError, LinkResult};
use crate::internal::{self, INTERNAL_PREFIX};
use crate::projection::project;
use crate::types::LinkRecord;
use crate::web::{self, WEB_PREFIX};

/// The two shareable representations of one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshaledLink {
    /// `BERTY://PB/...`, for QR codes scanned by the app
    pub internal: String,
    /// `https://berty.tech/id#...`, for pasting anywhere
    pub web: String,
}

/// Produce the internal and web links for a record.
///
/// The web link carries a reduced record (a contact's display name is moved
/// to a readable query parameter), the internal link carries everything.
///
/// # Errors
///
/// Returns the validation error if the record can't be shared, or
/// `LinkError::Serialization` if the record can't be serialized.
pub fn marshal(link: &LinkRecord) -> LinkResult<MarshaledLink> {
    link.validate()?;

    let projection = project(link);
    let web = web::encode(&projection)?;
    let internal = internal::encode(projection.qr)?;

    debug!(
        kind = %link.kind(),
        web_len = web.len(),
        internal_len = internal.len(),
        "Link marshaled"
    );
    Ok(MarshaledLink { internal, web })
}

/// Decode a link produced by [`marshal`], or a hand-crafted one.
///
/// # Errors
///
/// - `LinkError::MissingInput` for an empty string
/// - `LinkError::UnsupportedFormat` when neither prefix matches
/// - any decoder error from the matching form
pub fn unmarshal(uri: &str) -> LinkResult<LinkRecord> {
    if uri.is_empty() {
        return Err(LinkError::MissingInput);
    }

    let result = if has_prefix_ignore_case(uri, INTERNAL_PREFIX) {
        internal::decode(uri)
    } else if has_prefix_ignore_case(uri, WEB_PREFIX) {
        web::decode(uri)
    } else {
        Err(LinkError::UnsupportedFormat)
    };

    match &result {
        Ok(link) => debug!(kind = %link.kind(), "Link unmarshaled"),
        Err(e) => debug!(error = %e, "Rejected link"),
    }
    result
}

impl LinkRecord {
    /// See [`marshal`].
    pub fn marshal(&self) -> LinkResult<MarshaledLink> {
        marshal(self)
    }

    /// Web link only.
    pub fn marshal_web(&self) -> LinkResult<String> {
        self.validate()?;
        web::encode(&project(self))
    }

    /// Internal link only.
    pub fn marshal_internal(&self) -> LinkResult<String> {
        self.validate()?;
        internal::encode(self)
    }
}

impl FromStr for LinkRecord {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unmarshal(s)
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// `s` without `prefix`, compared ASCII case-insensitively.
pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if has_prefix_ignore_case(s, prefix) {
        // The prefix is ASCII, so a match ends on a char boundary.
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// Deserialize a complete postcard value, rejecting leftover bytes.
pub(crate) fn from_bytes_exact<T: DeserializeOwned>(bytes: &[u8]) -> LinkResult<T> {
    let (value, rest) = postcard::take_from_bytes(bytes)?;
    if !rest.is_empty() {
        return Err(LinkError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{BertyGroup, BertyId, Group, GroupType};

    fn alice() -> LinkRecord {
        BertyId::new(vec![0x01, 0x02, 0x03, 0x04], vec![0xAA, 0xBB, 0xCC])
            .with_name("Alice")
            .link()
    }

    fn book_club() -> LinkRecord {
        BertyGroup::new(Group::multi_member(
            vec![0x10; 32],
            vec![0x20; 32],
            vec![0x30; 64],
            vec![0x40; 32],
        ))
        .with_name("Book club")
        .link()
    }

    #[test]
    fn test_marshal_contact_scenario() {
        let marshaled = marshal(&alice()).unwrap();

        let path = marshaled.web.strip_prefix(WEB_PREFIX).unwrap();
        assert!(path.starts_with("contact/"));
        assert!(path.ends_with("/name=Alice"));
        assert!(marshaled.internal.starts_with("BERTY://PB/"));

        let decoded = unmarshal(&marshaled.web).unwrap();
        assert_eq!(decoded.display_name(), "Alice");
        assert_eq!(decoded, alice());
    }

    #[test]
    fn test_internal_roundtrip_is_exact() {
        for link in [alice(), book_club()] {
            let marshaled = marshal(&link).unwrap();
            assert_eq!(unmarshal(&marshaled.internal).unwrap(), link);
        }
    }

    #[test]
    fn test_single_form_helpers_match_marshal() {
        let link = book_club();
        let marshaled = link.marshal().unwrap();
        assert_eq!(link.marshal_web().unwrap(), marshaled.web);
        assert_eq!(link.marshal_internal().unwrap(), marshaled.internal);
    }

    #[test]
    fn test_marshal_rejects_invalid_group() {
        let group =
            Group::multi_member(vec![1], vec![2], vec![3], vec![4]).with_type(GroupType::Contact);
        let link = BertyGroup::new(group).link();

        let err = marshal(&link).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(link.marshal_web().is_err());
        assert!(link.marshal_internal().is_err());
    }

    #[test]
    fn test_marshal_rejects_missing_keys() {
        let err = marshal(&BertyId::new(Vec::new(), vec![1]).link()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
    }

    #[test]
    fn test_group_web_link_without_name() {
        let group = Group::multi_member(vec![1; 8], vec![2; 8], vec![3; 8], vec![4; 8]);
        let link = BertyGroup::new(group).link();
        let web = marshal(&link).unwrap().web;
        assert_eq!(web.strip_prefix(WEB_PREFIX).unwrap().split('/').count(), 2);

        let decoded = unmarshal(&web).unwrap();
        assert_eq!(decoded.display_name(), "");
        assert_eq!(decoded, link);
    }

    #[test]
    fn test_unmarshal_dispatch_errors() {
        assert!(matches!(unmarshal(""), Err(LinkError::MissingInput)));
        assert_eq!(unmarshal("").unwrap_err().kind(), ErrorKind::MissingInput);

        let err = unmarshal("https://example.com/#contact/abc").unwrap_err();
        assert!(matches!(err, LinkError::UnsupportedFormat));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Unsupported link format"));

        assert!(matches!(unmarshal("BERTY:/PB/AAA"), Err(LinkError::UnsupportedFormat)));
        assert!(matches!(
            unmarshal("BERTY://XY/anything"),
            Err(LinkError::UnsupportedLinkType(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let internal = alice().marshal_internal().unwrap();
        let parsed: LinkRecord = internal.parse().unwrap();
        assert_eq!(parsed, alice());
        assert!("not a link".parse::<LinkRecord>().is_err());
    }

    #[test]
    fn test_prefix_helpers() {
        assert_eq!(strip_prefix_ignore_case("berty://pb/X", INTERNAL_PREFIX), Some("pb/X"));
        assert_eq!(strip_prefix_ignore_case("BERT", INTERNAL_PREFIX), None);
        // Multi-byte character straddling the prefix length
        assert_eq!(strip_prefix_ignore_case("BERTY:/é", INTERNAL_PREFIX), None);
        assert!(has_prefix_ignore_case("HTTPS://Berty.Tech/ID#x", WEB_PREFIX));
    }

    #[test]
    fn test_from_bytes_exact() {
        let bytes = postcard::to_stdvec(&alice()).unwrap();
        let decoded: LinkRecord = from_bytes_exact(&bytes).unwrap();
        assert_eq!(decoded, alice());

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            from_bytes_exact::<LinkRecord>(&padded),
            Err(LinkError::TrailingBytes(1))
        ));
    }
}
