//! Link record types
//!
//! A [`LinkRecord`] is a tagged union: each invite kind carries exactly the
//! sub-record it needs, so a contact link can never hold group data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, LinkResult};

/// Kind of a shareable link.
///
/// `Unknown` never describes a valid record. It is what an unrecognised kind
/// tag parses to, and is always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Unknown,
    ContactInviteV1,
    GroupV1,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Unknown => "unknown",
            LinkKind::ContactInviteV1 => "contact-invite-v1",
            LinkKind::GroupV1 => "group-v1",
        };
        f.write_str(name)
    }
}

/// Group type as defined by the group-membership protocol.
///
/// Only [`GroupType::MultiMember`] groups may be shared through a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupType {
    #[default]
    Undefined,
    Account,
    Contact,
    MultiMember,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupType::Undefined => "undefined",
            GroupType::Account => "account",
            GroupType::Contact => "contact",
            GroupType::MultiMember => "multi-member",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "undefined" => Ok(GroupType::Undefined),
            "account" => Ok(GroupType::Account),
            "contact" => Ok(GroupType::Contact),
            "multi-member" | "multimember" => Ok(GroupType::MultiMember),
            other => Err(format!(
                "Invalid group type '{}'. Must be one of: undefined, account, contact, multi-member",
                other
            )),
        }
    }
}

/// Identity data needed to send a contact request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BertyId {
    /// Account public key
    pub account_pk: Vec<u8>,
    /// Seed of the public rendezvous point
    pub public_rendezvous_seed: Vec<u8>,
    /// Display name, empty when unknown
    pub display_name: String,
}

impl BertyId {
    pub fn new(account_pk: impl Into<Vec<u8>>, public_rendezvous_seed: impl Into<Vec<u8>>) -> Self {
        Self {
            account_pk: account_pk.into(),
            public_rendezvous_seed: public_rendezvous_seed.into(),
            display_name: String::new(),
        }
    }

    /// Set the display name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Wrap into a contact invite link.
    pub fn link(self) -> LinkRecord {
        LinkRecord::ContactInviteV1(self)
    }
}

/// Group descriptor.
///
/// Key material is carried as opaque bytes; nothing here verifies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub public_key: Vec<u8>,
    pub secret: Vec<u8>,
    /// Signature of `secret` by the group key
    pub secret_sig: Vec<u8>,
    pub group_type: GroupType,
    /// Public key used to verify group metadata
    pub sign_pub: Vec<u8>,
}

impl Group {
    /// Build a multi-member group descriptor, the only shareable type.
    pub fn multi_member(
        public_key: impl Into<Vec<u8>>,
        secret: impl Into<Vec<u8>>,
        secret_sig: impl Into<Vec<u8>>,
        sign_pub: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            secret: secret.into(),
            secret_sig: secret_sig.into(),
            group_type: GroupType::MultiMember,
            sign_pub: sign_pub.into(),
        }
    }

    /// Override the group type (builder pattern).
    pub fn with_type(mut self, group_type: GroupType) -> Self {
        self.group_type = group_type;
        self
    }
}

/// A group plus the name to show to invitees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BertyGroup {
    pub group: Group,
    /// Display name, empty when unknown
    pub display_name: String,
}

impl BertyGroup {
    pub fn new(group: Group) -> Self {
        Self {
            group,
            display_name: String::new(),
        }
    }

    /// Set the display name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Wrap into a group invite link.
    pub fn link(self) -> LinkRecord {
        LinkRecord::GroupV1(self)
    }
}

/// A shareable invite.
///
/// Records are plain values: marshaling borrows them, unmarshaling returns a
/// fresh one per call.
///
/// # Example
///
/// ```
/// use bertylink_core::{BertyId, LinkRecord};
///
/// let link = LinkRecord::for_identity(
///     BertyId::new(vec![1, 2, 3, 4], vec![0xAA, 0xBB, 0xCC]).with_name("Alice"),
/// );
/// let marshaled = link.marshal()?;
/// assert!(marshaled.web.starts_with("https://berty.tech/id#contact/"));
///
/// let decoded: LinkRecord = marshaled.internal.parse()?;
/// assert_eq!(decoded, link);
/// # Ok::<(), bertylink_core::LinkError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkRecord {
    ContactInviteV1(BertyId),
    GroupV1(BertyGroup),
}

impl LinkRecord {
    /// Link for an identity.
    pub fn for_identity(id: BertyId) -> Self {
        LinkRecord::ContactInviteV1(id)
    }

    /// Link for a group.
    pub fn for_group(group: BertyGroup) -> Self {
        LinkRecord::GroupV1(group)
    }

    pub fn kind(&self) -> LinkKind {
        match self {
            LinkRecord::ContactInviteV1(_) => LinkKind::ContactInviteV1,
            LinkRecord::GroupV1(_) => LinkKind::GroupV1,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            LinkRecord::ContactInviteV1(id) => &id.display_name,
            LinkRecord::GroupV1(group) => &group.display_name,
        }
    }

    /// Contact sub-record, if this is a contact invite.
    pub fn contact(&self) -> Option<&BertyId> {
        match self {
            LinkRecord::ContactInviteV1(id) => Some(id),
            LinkRecord::GroupV1(_) => None,
        }
    }

    /// Group sub-record, if this is a group invite.
    pub fn group(&self) -> Option<&BertyGroup> {
        match self {
            LinkRecord::GroupV1(group) => Some(group),
            LinkRecord::ContactInviteV1(_) => None,
        }
    }

    /// A valid contact invite.
    pub fn is_contact(&self) -> bool {
        self.kind() == LinkKind::ContactInviteV1 && self.validate().is_ok()
    }

    /// A valid, shareable group invite.
    pub fn is_group(&self) -> bool {
        self.kind() == LinkKind::GroupV1 && self.validate().is_ok()
    }

    /// Check the per-kind structural rules.
    ///
    /// # Errors
    ///
    /// - `LinkError::MissingField` if a mandatory key is empty
    /// - `LinkError::UnsupportedGroupType` for any group that is not multi-member
    pub fn validate(&self) -> LinkResult<()> {
        match self {
            LinkRecord::ContactInviteV1(id) => {
                if id.account_pk.is_empty() {
                    return Err(LinkError::MissingField("account_pk"));
                }
                if id.public_rendezvous_seed.is_empty() {
                    return Err(LinkError::MissingField("public_rendezvous_seed"));
                }
                Ok(())
            }
            LinkRecord::GroupV1(group) => {
                if group.group.public_key.is_empty() {
                    return Err(LinkError::MissingField("group.public_key"));
                }
                if group.group.group_type != GroupType::MultiMember {
                    return Err(LinkError::UnsupportedGroupType(group.group.group_type));
                }
                Ok(())
            }
        }
    }
}

impl From<BertyId> for LinkRecord {
    fn from(id: BertyId) -> Self {
        LinkRecord::ContactInviteV1(id)
    }
}

impl From<BertyGroup> for LinkRecord {
    fn from(group: BertyGroup) -> Self {
        LinkRecord::GroupV1(group)
    }
}
