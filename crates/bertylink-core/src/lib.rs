//! Berty Link Codec
//!
//! Converts shareable invite records to and from text.
//!
//! ## Overview
//!
//! A [`LinkRecord`] (a contact invite or a group invite) has two textual
//! forms:
//!
//! - **Web**: `https://berty.tech/id#contact/<base58>/name=Alice`. Short, partly
//!   human-readable, and safe to paste into any chat. The payload sits after
//!   the `#` so the web server never receives it.
//! - **Internal**: `BERTY://PB/<base43>`. Uppercase only, so a QR code of it
//!   stays in alphanumeric mode and is as small as possible.
//!
//! Decoding never panics: any malformed input comes back as a [`LinkError`].
//!
//! ## Quick Start
//!
//! ```
//! use bertylink_core::{unmarshal, BertyGroup, Group, LinkRecord};
//!
//! let group = Group::multi_member(vec![1; 32], vec![2; 32], vec![3; 64], vec![4; 32]);
//! let link = LinkRecord::for_group(BertyGroup::new(group).with_name("Book club"));
//!
//! let marshaled = link.marshal()?;
//! println!("scan me: {}", marshaled.internal);
//! println!("share me: {}", marshaled.web);
//!
//! assert_eq!(unmarshal(&marshaled.internal)?, link);
//! assert_eq!(unmarshal(&marshaled.web)?, link);
//! # Ok::<(), bertylink_core::LinkError>(())
//! ```

pub mod basex;
pub mod error;
pub mod internal;
pub mod link;
pub mod projection;
pub mod types;
pub mod web;

// Re-exports
pub use basex::{Alphabet, AlphabetError, DecodeError, BASE43};
pub use error::{ErrorKind, LinkError, LinkResult};
pub use internal::{INTERNAL_FORMAT_PB, INTERNAL_PREFIX};
pub use link::{marshal, unmarshal, MarshaledLink};
pub use projection::{project, HumanParams, MachineRecord, Projection, CONTACT_TAG, GROUP_TAG};
pub use types::*;
pub use web::WEB_PREFIX;
