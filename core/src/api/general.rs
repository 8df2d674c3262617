//! `currency` and `country` namespaces: reference data.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::form_of;
use crate::client::{parse_json, ApiCall, ResellerClient};
use crate::codec::JsonInt;
use crate::error::{ApiError, FieldViolation};
use crate::form::EncodedForm;
use crate::http::{HttpRequest, HttpResponse};
use crate::validate::{is_country_code, Rule};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Currency {
    /// Minor units per major unit as the upstream counts them.
    #[serde(rename = "currencyunit")]
    pub unit: JsonInt,
    #[serde(rename = "currencyname")]
    pub name: String,
}

/// Currencies by ISO 4217 code.
pub type Currencies = BTreeMap<String, Currency>;

/// Country names by ISO 3166-1 alpha-2 code.
pub type Countries = BTreeMap<String, String>;

/// State names by state id.
pub type States = BTreeMap<String, String>;

impl ResellerClient {
    pub fn build_currency_details(&self) -> Result<HttpRequest, ApiError> {
        self.build_call(ApiCall::get("currency", "details", EncodedForm::new()))
    }

    pub fn parse_currency_details(&self, response: HttpResponse) -> Result<Currencies, ApiError> {
        parse_json(&response)
    }

    pub fn build_country_list(&self) -> Result<HttpRequest, ApiError> {
        self.build_call(ApiCall::get("country", "list", EncodedForm::new()))
    }

    pub fn parse_country_list(&self, response: HttpResponse) -> Result<Countries, ApiError> {
        parse_json(&response)
    }

    pub fn build_state_list(&self, country_code: &str) -> Result<HttpRequest, ApiError> {
        if !is_country_code(country_code) {
            return Err(ApiError::Validation(vec![FieldViolation {
                field: "country_code".into(),
                rule: Rule::CountryCode.name(),
                message: format!("{country_code:?} is not an ISO 3166-1 alpha-2 code"),
            }]));
        }
        let form = form_of([("country-code", country_code)]);
        self.build_call(ApiCall::get("country", "state-list", form))
    }

    /// The upstream keys its map by state name; this flips it to id first.
    pub fn parse_state_list(&self, response: HttpResponse) -> Result<States, ApiError> {
        let by_name: BTreeMap<String, String> = parse_json(&response)?;
        Ok(by_name.into_iter().map(|(name, id)| (id, name)).collect())
    }
}
