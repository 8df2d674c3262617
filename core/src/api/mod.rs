//! Upstream resources, one module per API namespace.
//!
//! Each module adds `build_*` / `parse_*` pairs to
//! [`ResellerClient`](crate::ResellerClient) and declares the request types
//! those operations encode. Requests are validated, resolved against a
//! baseline where the operation is a partial update, and only then encoded.

use serde::Deserialize;

use crate::error::ApiError;
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::form::EncodedForm;
use crate::mapped;
use crate::validate::{validate, Rule};
use crate::wire::{wire_enum, Mapped};

mod address;
pub mod contact;
pub mod customer;
pub mod dns;
pub mod domain;
pub mod forwarding;
pub mod general;
pub mod pricing;

pub use address::PostalAddress;

wire_enum! {
    /// Lifecycle status shared by contacts, customers and orders.
    pub enum EntityStatus {
        Active => "Active",
        InActive => "InActive",
        Deleted => "Deleted",
        Archived => "Archived",
        Suspended => "Suspended",
        VerificationPending => "Pending Verification",
        VerificationFailed => "Failed Verification",
        Restorable => "Pending Delete Restorable",
    }
}

/// Page selection for search operations: `no-of-records` and `page-no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: u16,
    pub page: u16,
}

impl Paging {
    pub fn new(limit: u16, page: u16) -> Self {
        Self { limit, page }
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self { limit: 10, page: 1 }
    }
}

mapped!(Paging { limit, page }, || FieldTable::builder()
    .scalar("limit")
    .on(Channel::SEARCH, "no-of-records")
    .rule(Rule::Required)
    .rule(Rule::Range(10, 500))
    .scalar("page")
    .on(Channel::SEARCH, "page-no")
    .rule(Rule::Required)
    .rule(Rule::Range(1, i64::from(u16::MAX)))
    .build());

/// Acknowledgement of a queued action (`eaqid`, `actionstatus`, …).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Action {
    #[serde(rename = "eaqid")]
    pub id: String,
    #[serde(rename = "entityid")]
    pub entity_id: String,
    #[serde(rename = "actiontype")]
    pub kind: String,
    #[serde(rename = "actiontypedesc")]
    pub description: String,
    #[serde(rename = "actionstatus")]
    pub status: String,
    #[serde(rename = "actionstatusdesc")]
    pub status_description: String,
}

/// Plain `{status, msg}` acknowledgement. Some endpoints say `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    pub status: String,
    #[serde(alias = "message")]
    pub msg: String,
}

/// Validation gate, then encode.
pub(crate) fn checked_form<T: Mapped>(
    value: &T,
    channel: Channel,
    version: SchemaVersion,
) -> Result<EncodedForm, ApiError> {
    validate(value)?;
    crate::encode::encode_versioned(value, channel, version)
}

/// `[(key, value)]` as a one-off form for calls without a request type.
pub(crate) fn form_of<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> EncodedForm {
    pairs.into_iter().collect()
}
