//! Property-based tests for link marshaling
//!
//! Uses proptest to verify round-trip and rejection properties of both
//! textual forms and of the base-N codec.

use bertylink_core::{
    marshal, unmarshal, BertyGroup, BertyId, ErrorKind, Group, GroupType, LinkRecord, BASE43,
    WEB_PREFIX,
};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

/// Non-empty key material
fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..64)
}

/// Any byte string, biased towards leading zeros
fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..128),
        (0..8usize, prop::collection::vec(any::<u8>(), 0..32)).prop_map(|(zeros, tail)| {
            let mut bytes = vec![0u8; zeros];
            bytes.extend(tail);
            bytes
        }),
    ]
}

/// Display names, including empty and non-ASCII ones
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::string::string_regex("[a-zA-Z0-9 ]{1,40}").expect("valid regex"),
        prop::string::string_regex(".{1,40}").expect("valid regex"),
    ]
}

fn contact_strategy() -> impl Strategy<Value = LinkRecord> {
    (key_strategy(), key_strategy(), name_strategy())
        .prop_map(|(pk, seed, name)| BertyId::new(pk, seed).with_name(name).link())
}

fn group_strategy() -> impl Strategy<Value = LinkRecord> {
    (
        key_strategy(),
        bytes_strategy(),
        bytes_strategy(),
        bytes_strategy(),
        name_strategy(),
    )
        .prop_map(|(pk, secret, sig, sign_pub, name)| {
            BertyGroup::new(Group::multi_member(pk, secret, sig, sign_pub))
                .with_name(name)
                .link()
        })
}

fn link_strategy() -> impl Strategy<Value = LinkRecord> {
    prop_oneof![contact_strategy(), group_strategy()]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Base43 decode inverts encode for every byte string
    #[test]
    fn base43_roundtrip(bytes in bytes_strategy()) {
        let encoded = BASE43.encode(&bytes);
        prop_assert_eq!(BASE43.decode(&encoded).unwrap(), bytes);
    }

    /// Base43 output is never longer than two symbols per input byte
    #[test]
    fn base43_length_is_bounded(bytes in bytes_strategy()) {
        prop_assert!(BASE43.encode(&bytes).len() <= bytes.len() * 2);
    }

    /// Base43 output only uses uppercase QR alphanumeric characters
    #[test]
    fn base43_is_qr_alphanumeric(bytes in bytes_strategy()) {
        let encoded = BASE43.encode(&bytes);
        prop_assert!(encoded
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || "$*-.:/".contains(c)));
    }

    /// Decoding arbitrary text never panics
    #[test]
    fn decode_arbitrary_text_never_panics(text in ".{0,64}") {
        let _ = BASE43.decode(&text);
        let _ = unmarshal(&text);
    }

    /// The internal form is a lossless encoding of the whole record
    #[test]
    fn internal_roundtrip(link in link_strategy()) {
        let marshaled = marshal(&link).unwrap();
        prop_assert_eq!(unmarshal(&marshaled.internal).unwrap(), link);
    }

    /// The web form keeps keys and display name for contacts
    #[test]
    fn web_contact_roundtrip(link in contact_strategy()) {
        let marshaled = marshal(&link).unwrap();
        let decoded = unmarshal(&marshaled.web).unwrap();

        let original = link.contact().unwrap();
        let decoded = decoded.contact().unwrap();
        prop_assert_eq!(&decoded.account_pk, &original.account_pk);
        prop_assert_eq!(&decoded.public_rendezvous_seed, &original.public_rendezvous_seed);
        prop_assert_eq!(&decoded.display_name, &original.display_name);
    }

    /// The web form keeps the whole group descriptor and name
    #[test]
    fn web_group_roundtrip(link in group_strategy()) {
        let marshaled = marshal(&link).unwrap();
        prop_assert_eq!(unmarshal(&marshaled.web).unwrap(), link);
    }

    /// Web links never leak the display name into the binary blob
    #[test]
    fn web_blob_has_no_display_name(link in link_strategy()) {
        let web = marshal(&link).unwrap().web;
        let path = web.strip_prefix(WEB_PREFIX).unwrap();
        let blob = path.split('/').nth(1).unwrap();
        let bytes = bs58::decode(blob).into_vec().unwrap();

        let stripped = match &link {
            LinkRecord::ContactInviteV1(id) => postcard::to_stdvec(
                &BertyId::new(id.account_pk.clone(), id.public_rendezvous_seed.clone()),
            ),
            LinkRecord::GroupV1(group) => postcard::to_stdvec(&BertyGroup::new(group.group.clone())),
        }
        .unwrap();
        prop_assert_eq!(bytes, stripped);
    }

    /// Only multi-member groups can be marshaled
    #[test]
    fn non_multi_member_groups_rejected(
        pk in key_strategy(),
        group_type in prop_oneof![
            Just(GroupType::Undefined),
            Just(GroupType::Account),
            Just(GroupType::Contact),
        ],
    ) {
        let group = Group::multi_member(pk, vec![1], vec![2], vec![3]).with_type(group_type);
        let err = marshal(&BertyGroup::new(group).link()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    /// Anything without a known prefix is rejected as invalid input
    #[test]
    fn unknown_prefix_rejected(text in "[a-z]{1,10}://[A-Za-z0-9/]{0,20}") {
        prop_assume!(!text.to_lowercase().starts_with("berty://"));
        let err = unmarshal(&text).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
