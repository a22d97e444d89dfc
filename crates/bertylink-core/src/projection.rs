//! Per-kind field projection
//!
//! Splits a validated [`LinkRecord`] into what each textual form carries:
//! the web form gets a reduced binary record plus readable query parameters,
//! the internal (QR) form gets the whole record.

use std::collections::BTreeMap;

use crate::types::{BertyGroup, BertyId, LinkRecord};

/// Kind tag for contact invites in the web form
pub const CONTACT_TAG: &str = "contact";

/// Kind tag for group invites in the web form
pub const GROUP_TAG: &str = "group";

/// Query parameter carrying the display name
pub const NAME_PARAM: &str = "name";

/// Readable key/value pairs for the web form's query string, sorted by key.
pub type HumanParams = BTreeMap<String, String>;

/// Reduced record serialized into the web form's binary blob.
///
/// The variant is implied by the kind tag in the URL, so only the
/// sub-record itself is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineRecord {
    Contact(BertyId),
    Group(BertyGroup),
}

impl MachineRecord {
    pub fn to_bytes(&self) -> postcard::Result<Vec<u8>> {
        match self {
            MachineRecord::Contact(id) => postcard::to_stdvec(id),
            MachineRecord::Group(group) => postcard::to_stdvec(group),
        }
    }
}

/// Everything the two encoders need from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection<'a> {
    /// `contact` or `group`
    pub kind_tag: &'static str,
    pub machine: MachineRecord,
    pub human: HumanParams,
    /// Unreduced record for the internal form
    pub qr: &'a LinkRecord,
}

/// Project a record. Callers validate first.
pub fn project(link: &LinkRecord) -> Projection<'_> {
    let mut human = HumanParams::new();
    if !link.display_name().is_empty() {
        human.insert(NAME_PARAM.to_string(), link.display_name().to_string());
    }

    let (kind_tag, machine) = match link {
        LinkRecord::ContactInviteV1(id) => (
            CONTACT_TAG,
            MachineRecord::Contact(BertyId::new(
                id.account_pk.clone(),
                id.public_rendezvous_seed.clone(),
            )),
        ),
        // The whole group descriptor goes into the blob, secret included;
        // only the display name moves to the query string.
        LinkRecord::GroupV1(group) => (
            GROUP_TAG,
            MachineRecord::Group(BertyGroup::new(group.group.clone())),
        ),
    };

    Projection {
        kind_tag,
        machine,
        human,
        qr: link,
    }
}
