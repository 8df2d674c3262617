//! `domainforward` namespace: URL forwarding for a domain order.

use serde::Deserialize;

use super::{checked_form, form_of, StatusResponse};
use crate::client::{parse_bool, parse_json, require_id, ApiCall, ResellerClient};
use crate::codec::{JsonBool, JsonInt};
use crate::error::ApiError;
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::http::{HttpRequest, HttpResponse};
use crate::mapped;
use crate::merge::resolve;
use crate::validate::Rule;

const NAMESPACE: &str = "domainforward";

/// Forwarding settings. Activation only needs the target; `manage`
/// rewrites the whole service, so the three switches are mandatory there
/// and are backfilled from a baseline when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forwarding {
    pub order_id: String,
    pub sub_domain_prefix: String,
    pub forward_to: String,
    pub url_masking: Option<bool>,
    pub meta_tags: String,
    pub noframes: String,
    pub sub_domain_forwarding: Option<bool>,
    pub path_forwarding: Option<bool>,
}

mapped!(
    Forwarding {
        order_id, sub_domain_prefix, forward_to, url_masking, meta_tags, noframes,
        sub_domain_forwarding, path_forwarding
    },
    || FieldTable::builder()
        .scalar("order_id")
        .on(Channel::ADD, "order-id")
        .on(Channel::MODIFY, "order-id")
        .rule(Rule::Numeric)
        .scalar("sub_domain_prefix")
        .on(Channel::ADD, "sub-domain-prefix,optional")
        .on(Channel::MODIFY, "sub-domain-prefix,optional")
        .scalar("forward_to")
        .on(Channel::ADD, "forward-to")
        .on(Channel::MODIFY, "forward-to")
        .scalar("url_masking")
        .on(Channel::ADD, "url-masking,optional")
        .on(Channel::MODIFY, "url-masking")
        .scalar("meta_tags")
        .on(Channel::ADD, "meta-tags,optional")
        .on(Channel::MODIFY, "meta-tags,optional")
        .scalar("noframes")
        .on(Channel::ADD, "noframes,optional")
        .on(Channel::MODIFY, "noframes,optional")
        .scalar("sub_domain_forwarding")
        .on(Channel::ADD, "sub-domain-forwarding,optional")
        .on(Channel::MODIFY, "sub-domain-forwarding")
        .scalar("path_forwarding")
        .on(Channel::ADD, "path-forwarding,optional")
        .on(Channel::MODIFY, "path-forwarding")
        .build()
);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForwardingDetails {
    #[serde(rename = "forward")]
    pub forward_to: String,
    #[serde(rename = "urlmasking")]
    pub url_masking: Option<JsonBool>,
    #[serde(rename = "subdomainforwarding")]
    pub sub_domain_forwarding: Option<JsonBool>,
    #[serde(rename = "pathforwarding")]
    pub path_forwarding: Option<JsonBool>,
    pub noframes: String,
    #[serde(rename = "metatags")]
    pub meta_tags: String,
    #[serde(rename = "ipaddress")]
    pub ip_address: String,
    #[serde(rename = "domainname")]
    pub domain_name: String,
}

impl ForwardingDetails {
    /// Current settings as a baseline for [`ResellerClient::build_manage_forwarding`].
    pub fn to_baseline(&self, order_id: impl Into<String>) -> Forwarding {
        Forwarding {
            order_id: order_id.into(),
            sub_domain_prefix: String::new(),
            forward_to: self.forward_to.clone(),
            url_masking: self.url_masking.map(JsonBool::get),
            meta_tags: self.meta_tags.clone(),
            noframes: self.noframes.clone(),
            sub_domain_forwarding: self.sub_domain_forwarding.map(JsonBool::get),
            path_forwarding: self.path_forwarding.map(JsonBool::get),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForwardingDnsRecord {
    #[serde(rename = "timetolive")]
    pub ttl: Option<JsonInt>,
    #[serde(rename = "type")]
    pub record_type: String,
    pub host: String,
    pub value: String,
}

impl ResellerClient {
    pub fn build_activate_forwarding(&self, forwarding: &Forwarding) -> Result<HttpRequest, ApiError> {
        let form = checked_form(forwarding, Channel::ADD, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "activate", form))
    }

    pub fn parse_activate_forwarding(
        &self,
        response: HttpResponse,
    ) -> Result<StatusResponse, ApiError> {
        parse_json(&response)
    }

    pub fn build_forwarding_details(
        &self,
        order_id: &str,
        include_subdomain: bool,
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let include = include_subdomain.to_string();
        let form = form_of([("order-id", order_id), ("include-subdomain", include.as_str())]);
        self.build_call(ApiCall::get(NAMESPACE, "details", form))
    }

    pub fn parse_forwarding_details(
        &self,
        response: HttpResponse,
    ) -> Result<ForwardingDetails, ApiError> {
        parse_json(&response)
    }

    /// Update forwarding from the fields set in `changes`; the mandatory
    /// ones left unset are taken from `baseline`.
    pub fn build_manage_forwarding(
        &self,
        changes: &Forwarding,
        baseline: &Forwarding,
    ) -> Result<HttpRequest, ApiError> {
        let resolved = resolve(changes, baseline, Channel::MODIFY)?;
        let form = checked_form(&resolved, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "manage", form))
    }

    pub fn parse_manage_forwarding(
        &self,
        response: HttpResponse,
    ) -> Result<StatusResponse, ApiError> {
        parse_json(&response)
    }

    /// Records the forwarding service needs in the domain's zone.
    pub fn build_forwarding_dns_records(&self, domain_name: &str) -> Result<HttpRequest, ApiError> {
        let form = form_of([("domain-name", domain_name)]);
        self.build_call(ApiCall::get(NAMESPACE, "dns-records", form))
    }

    pub fn parse_forwarding_dns_records(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ForwardingDnsRecord>, ApiError> {
        parse_json(&response)
    }

    pub fn build_remove_forwarding(&self, domain_name: &str) -> Result<HttpRequest, ApiError> {
        let form = form_of([("domain-name", domain_name)]);
        self.build_call(ApiCall::post(NAMESPACE, "delete", form))
    }

    pub fn build_disable_sub_domain_forwarding(
        &self,
        order_id: &str,
        sub_domain_prefix: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id), ("sub-domain-prefix", sub_domain_prefix)]);
        self.build_call(ApiCall::post(NAMESPACE, "sub-domain-record/delete", form))
    }

    /// Shared by the remove and sub-domain disable operations.
    pub fn parse_forwarding_removed(&self, response: HttpResponse) -> Result<bool, ApiError> {
        parse_bool(&response)
    }
}
