//! Record identifier resolution
//!
//! Deduplication and admission only ever compare identifiers produced here.

use std::borrow::Cow;

use crate::record::Record;

/// Maps a record to the key used to detect duplicates
pub trait IdentityPolicy: Send + Sync {
    fn resolve<'a>(&self, record: &'a Record) -> Cow<'a, str>;
}

/// `System_Link_ID` when present, else `"{name}-{address}"`.
///
/// The fallback is compared verbatim: case or whitespace differences yield
/// distinct identifiers, and two businesses sharing name and address collide.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkIdOrNameAddress;

impl IdentityPolicy for LinkIdOrNameAddress {
    fn resolve<'a>(&self, record: &'a Record) -> Cow<'a, str> {
        if record.link_id.is_empty() {
            Cow::Owned(format!("{}-{}", record.name, record.address))
        } else {
            Cow::Borrowed(&record.link_id)
        }
    }
}
