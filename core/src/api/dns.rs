//! `dns` namespace: zone activation and record management.

use serde::Deserialize;

use super::{checked_form, form_of, Paging, StatusResponse};
use crate::client::{check_status, parse_json, require_id, ApiCall, ResellerClient};
use crate::codec::JsonInt;
use crate::envelope::Envelope;
use crate::error::{ApiError, FieldViolation};
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::http::{HttpRequest, HttpResponse};
use crate::mapped;
use crate::validate::Rule;
use crate::wire::wire_enum;

const NAMESPACE: &str = "dns";

/// Directives used when deleting a record: only the identifying fields.
const DELETE: Channel = Channel::named("delete");

wire_enum! {
    pub enum RecordType {
        A => "A",
        Aaaa => "AAAA",
        Cname => "CNAME",
        Mx => "MX",
        Ns => "NS",
        Txt => "TXT",
        Srv => "SRV",
    }
}

impl RecordType {
    /// Path segment of the per-type `manage/*-record` operations.
    pub fn slug(&self) -> &'static str {
        match self {
            RecordType::A => "ipv4",
            RecordType::Aaaa => "ipv6",
            RecordType::Cname => "cname",
            RecordType::Mx => "mx",
            RecordType::Ns => "ns",
            RecordType::Txt => "txt",
            RecordType::Srv => "srv",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DnsActivation {
    pub status: String,
    pub msg: String,
    #[serde(rename = "zoneid")]
    pub zone_id: String,
    #[serde(rename = "orderid")]
    pub order_id: String,
}

/// A record to add or delete. `priority` applies to MX and SRV, `port`
/// and `weight` to SRV only; they are left out while zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecord {
    pub domain_name: String,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    pub priority: u16,
    pub port: u16,
    pub weight: u16,
}

mapped!(
    DnsRecord { domain_name, host, value, ttl, priority, port, weight },
    || FieldTable::builder()
        .scalar("domain_name")
        .on(Channel::ADD, "domain-name")
        .on(DELETE, "domain-name")
        .rule(Rule::Required)
        .scalar("host")
        .on(Channel::ADD, "host,optional")
        .on(DELETE, "host,optional")
        .scalar("value")
        .on(Channel::ADD, "value")
        .on(DELETE, "value")
        .rule(Rule::Required)
        .scalar("ttl")
        .on(Channel::ADD, "ttl,optional")
        .scalar("priority")
        .on(Channel::ADD, "priority,optional")
        .scalar("port")
        .on(Channel::ADD, "port,optional")
        .on(DELETE, "port,optional")
        .scalar("weight")
        .on(Channel::ADD, "weight,optional")
        .on(DELETE, "weight,optional")
        .build()
);

/// Replace `current_value` with `new_value` on one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecordUpdate {
    pub domain_name: String,
    pub host: String,
    pub current_value: String,
    pub new_value: String,
    pub ttl: u32,
    pub priority: u16,
    pub port: u16,
    pub weight: u16,
}

mapped!(
    DnsRecordUpdate { domain_name, host, current_value, new_value, ttl, priority, port, weight },
    || FieldTable::builder()
        .scalar("domain_name")
        .on(Channel::MODIFY, "domain-name")
        .rule(Rule::Required)
        .scalar("host")
        .on(Channel::MODIFY, "host,optional")
        .scalar("current_value")
        .on(Channel::MODIFY, "current-value")
        .rule(Rule::Required)
        .scalar("new_value")
        .on(Channel::MODIFY, "new-value")
        .rule(Rule::Required)
        .scalar("ttl")
        .on(Channel::MODIFY, "ttl,optional")
        .scalar("priority")
        .on(Channel::MODIFY, "priority,optional")
        .scalar("port")
        .on(Channel::MODIFY, "port,optional")
        .scalar("weight")
        .on(Channel::MODIFY, "weight,optional")
        .build()
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoaRecord {
    pub domain_name: String,
    pub responsible_person: String,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub ttl: u32,
}

mapped!(
    SoaRecord { domain_name, responsible_person, refresh, retry, expire, ttl },
    || FieldTable::builder()
        .scalar("domain_name")
        .on(Channel::MODIFY, "domain-name")
        .rule(Rule::Required)
        .scalar("responsible_person")
        .on(Channel::MODIFY, "responsible-person")
        .rule(Rule::Required)
        .rule(Rule::Email)
        .scalar("refresh")
        .on(Channel::MODIFY, "refresh")
        .scalar("retry")
        .on(Channel::MODIFY, "retry")
        .scalar("expire")
        .on(Channel::MODIFY, "expire")
        .scalar("ttl")
        .on(Channel::MODIFY, "ttl")
        .build()
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSearch {
    pub domain_name: String,
    pub record_type: RecordType,
    pub paging: Paging,
    pub host: String,
    pub value: String,
}

impl RecordSearch {
    pub fn new(domain_name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            domain_name: domain_name.into(),
            record_type,
            paging: Paging::default(),
            host: String::new(),
            value: String::new(),
        }
    }
}

mapped!(
    RecordSearch { domain_name, record_type, paging, host, value },
    || FieldTable::builder()
        .scalar("domain_name")
        .on(Channel::SEARCH, "domain-name")
        .rule(Rule::Required)
        .scalar("record_type")
        .on(Channel::SEARCH, "type")
        .nested("paging")
        .on(Channel::SEARCH, "paging")
        .scalar("host")
        .on(Channel::SEARCH, "host,optional")
        .scalar("value")
        .on(Channel::SEARCH, "value,optional")
        .build()
);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DnsRecordEntry {
    #[serde(rename = "timetolive")]
    pub ttl: Option<JsonInt>,
    pub status: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub host: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsSearchResult {
    pub on_page: i64,
    pub total: i64,
    /// Records by upstream record number, ascending.
    pub records: Vec<(u64, DnsRecordEntry)>,
}

impl ResellerClient {
    pub fn build_activate_dns(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id)]);
        self.build_call(ApiCall::post(NAMESPACE, "activate", form))
    }

    pub fn parse_activate_dns(&self, response: HttpResponse) -> Result<DnsActivation, ApiError> {
        parse_json(&response)
    }

    pub fn build_add_record(
        &self,
        record_type: RecordType,
        record: &DnsRecord,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(record, Channel::ADD, SchemaVersion::V1)?;
        let operation = format!("manage/add-{}-record", record_type.slug());
        self.build_call(ApiCall::post(NAMESPACE, operation, form))
    }

    pub fn build_update_record(
        &self,
        record_type: RecordType,
        update: &DnsRecordUpdate,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(update, Channel::MODIFY, SchemaVersion::V1)?;
        let operation = format!("manage/update-{}-record", record_type.slug());
        self.build_call(ApiCall::post(NAMESPACE, operation, form))
    }

    pub fn build_delete_record(
        &self,
        record_type: RecordType,
        record: &DnsRecord,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(record, DELETE, SchemaVersion::V1)?;
        let operation = format!("manage/delete-{}-record", record_type.slug());
        self.build_call(ApiCall::post(NAMESPACE, operation, form))
    }

    /// Delete every record of any type matching `host` and `value`.
    pub fn build_delete_matching_records(
        &self,
        host: &str,
        value: &str,
    ) -> Result<HttpRequest, ApiError> {
        if host.is_empty() || value.is_empty() {
            let field = if host.is_empty() { "host" } else { "value" };
            return Err(ApiError::Validation(vec![FieldViolation {
                field: field.into(),
                rule: Rule::Required.name(),
                message: "is required".into(),
            }]));
        }
        let form = form_of([("host", host), ("value", value)]);
        self.build_call(ApiCall::get(NAMESPACE, "manage/delete-record", form))
    }

    pub fn build_update_soa(&self, soa: &SoaRecord) -> Result<HttpRequest, ApiError> {
        let form = checked_form(soa, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "manage/update-soa-record", form))
    }

    /// Shared by the add, update, delete, delete-matching and SOA record operations.
    pub fn parse_record_change(&self, response: HttpResponse) -> Result<StatusResponse, ApiError> {
        parse_json(&response)
    }

    pub fn build_search_records(&self, search: &RecordSearch) -> Result<HttpRequest, ApiError> {
        let form = checked_form(search, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, "manage/search-records", form))
    }

    pub fn parse_search_records(&self, response: HttpResponse) -> Result<DnsSearchResult, ApiError> {
        check_status(&response)?;
        let envelope = Envelope::parse(&response.body)?;
        Ok(DnsSearchResult {
            on_page: envelope.decode::<JsonInt>("recsonpage")?.unwrap_or_default().get(),
            total: envelope.decode::<JsonInt>("recsindb")?.unwrap_or_default().get(),
            records: envelope.records()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client;

    fn mx() -> DnsRecord {
        DnsRecord {
            domain_name: "example.com".into(),
            host: "@".into(),
            value: "mail.example.com".into(),
            ttl: 14400,
            priority: 10,
            ..Default::default()
        }
    }

    #[test]
    fn add_uses_type_slug_and_skips_unset_srv_fields() {
        let req = test_client().build_add_record(RecordType::Mx, &mx()).unwrap();
        assert_eq!(
            req.path,
            "http://localhost:3000/api/dns/manage/add-mx-record.json"
        );
        assert_eq!(
            req.body.as_deref(),
            Some("domain-name=example.com&host=%40&value=mail.example.com&ttl=14400&priority=10&auth-userid=42&api-key=s3cret")
        );
    }

    #[test]
    fn delete_sends_only_identifying_fields() {
        let req = test_client().build_delete_record(RecordType::Mx, &mx()).unwrap();
        assert!(req.path.ends_with("dns/manage/delete-mx-record.json"));
        let body = req.body.unwrap();
        assert!(!body.contains("ttl="));
        assert!(!body.contains("priority="));
    }

    #[test]
    fn txt_records_go_to_their_own_operation() {
        let txt = DnsRecord {
            value: "v=spf1 -all".into(),
            ..mx()
        };
        let req = test_client().build_add_record(RecordType::Txt, &txt).unwrap();
        assert!(req.path.ends_with("dns/manage/add-txt-record.json"));
    }

    #[test]
    fn update_requires_both_values() {
        let update = DnsRecordUpdate {
            domain_name: "example.com".into(),
            current_value: "192.0.2.1".into(),
            ..Default::default()
        };
        let err = test_client()
            .build_update_record(RecordType::A, &update)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v[0].field == "new_value"));
    }

    #[test]
    fn soa_requires_every_timer() {
        let soa = SoaRecord {
            domain_name: "example.com".into(),
            responsible_person: "hostmaster@example.com".into(),
            refresh: 7200,
            retry: 7200,
            expire: 172800,
            ttl: 0,
        };
        let err = test_client().build_update_soa(&soa).unwrap_err();
        assert!(matches!(err, ApiError::MissingRequiredField(ref k) if k == "ttl"));

        let req = test_client()
            .build_update_soa(&SoaRecord { ttl: 14400, ..soa })
            .unwrap();
        assert!(req.path.ends_with("dns/manage/update-soa-record.json"));
    }

    #[test]
    fn search_encodes_type_and_paging() {
        let search = RecordSearch {
            host: "www".into(),
            ..RecordSearch::new("example.com", RecordType::Aaaa)
        };
        let req = test_client().build_search_records(&search).unwrap();
        assert!(req.path.ends_with(
            "dns/manage/search-records.json?auth-userid=42&api-key=s3cret&domain-name=example.com&type=AAAA&no-of-records=10&page-no=1&host=www"
        ));
    }

    #[test]
    fn search_result_collects_numbered_records() {
        let body = r#"{
            "recsonpage": "2", "recsindb": 2,
            "2": {"timetolive": "3600", "status": "Active", "type": "A", "host": "www", "value": "192.0.2.2"},
            "1": {"timetolive": 7200, "status": "Active", "type": "A", "host": "@", "value": "192.0.2.1"}
        }"#;
        let result = test_client()
            .parse_search_records(HttpResponse::ok(body))
            .unwrap();
        assert_eq!((result.on_page, result.total), (2, 2));
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].0, 1);
        assert_eq!(result.records[0].1.ttl, Some(JsonInt(7200)));
        assert_eq!(result.records[1].1.value, "192.0.2.2");
    }

    #[test]
    fn activation_response() {
        let body = r#"{"status":"Success","msg":"activated","zoneid":"77","orderid":"1234"}"#;
        let act = test_client().parse_activate_dns(HttpResponse::ok(body)).unwrap();
        assert_eq!(act.zone_id, "77");
        assert_eq!(act.order_id, "1234");
    }

    #[test]
    fn delete_matching_records_is_a_get() {
        let req = test_client()
            .build_delete_matching_records("www", "192.0.2.1")
            .unwrap();
        assert!(req.path.ends_with(
            "/dns/manage/delete-record.json?auth-userid=42&api-key=s3cret&host=www&value=192.0.2.1"
        ));
        assert!(matches!(
            test_client().build_delete_matching_records("www", ""),
            Err(ApiError::Validation(ref v)) if v[0].field == "value"
        ));
    }
}
