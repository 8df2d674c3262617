use serde::Deserialize;

use crate::field::{Channel, FieldTable};
use crate::mapped;
use crate::validate::Rule;

/// Postal address shared by contacts and customers.
///
/// Deserializes from the flat response keys (`address1`, `zip`, …) and
/// encodes as `address-line-1`, `zipcode`, …. `state` is only mandatory
/// when signing up a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    #[serde(rename = "address1")]
    pub line1: String,
    #[serde(rename = "address2")]
    pub line2: String,
    #[serde(rename = "address3")]
    pub line3: String,
    pub city: String,
    pub state: String,
    #[serde(skip)]
    pub other_state: String,
    pub country: String,
    #[serde(rename = "zip")]
    pub zipcode: String,
}

mapped!(
    PostalAddress { line1, line2, line3, city, state, other_state, country, zipcode },
    || FieldTable::builder()
        .scalar("line1")
        .on(Channel::ADD, "address-line-1")
        .on(Channel::MODIFY, "address-line-1")
        .on(Channel::SIGNUP, "address-line-1")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(64))
        .scalar("line2")
        .on(Channel::ADD, "address-line-2,optional")
        .on(Channel::MODIFY, "address-line-2,optional")
        .on(Channel::SIGNUP, "address-line-2,optional")
        .rule(Rule::MaxLen(64))
        .scalar("line3")
        .on(Channel::ADD, "address-line-3,optional")
        .on(Channel::MODIFY, "address-line-3,optional")
        .on(Channel::SIGNUP, "address-line-3,optional")
        .rule(Rule::MaxLen(64))
        .scalar("city")
        .on(Channel::ADD, "city")
        .on(Channel::MODIFY, "city")
        .on(Channel::SIGNUP, "city")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(64))
        .scalar("state")
        .on(Channel::ADD, "state,optional")
        .on(Channel::MODIFY, "state,optional")
        .on(Channel::SIGNUP, "state")
        .rule(Rule::MaxLen(64))
        .scalar("other_state")
        .on(Channel::SIGNUP, "other-state,optional")
        .scalar("country")
        .on(Channel::ADD, "country")
        .on(Channel::MODIFY, "country")
        .on(Channel::SIGNUP, "country")
        .rule(Rule::Required)
        .rule(Rule::CountryCode)
        .scalar("zipcode")
        .on(Channel::ADD, "zipcode")
        .on(Channel::MODIFY, "zipcode")
        .on(Channel::SIGNUP, "zipcode")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(16))
        .build()
);
