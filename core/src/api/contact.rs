//! `contacts` namespace: registrant/admin/tech/billing contacts.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::{checked_form, form_of, Action, EntityStatus, Paging, PostalAddress};
use crate::attributes::EntityAttributes;
use crate::client::{
    check_status, expect_true, parse_id, parse_json, require_id, ApiCall, ResellerClient,
};
use crate::codec::{JsonBool, JsonInt, RawString, UnixTime};
use crate::envelope::Envelope;
use crate::error::{ApiError, FieldViolation};
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::form::EncodedForm;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapped;
use crate::merge::resolve;
use crate::validate::Rule;
use crate::wire::wire_enum;

const NAMESPACE: &str = "contacts";

/// Key prefixes the search and default-contact responses put on every field.
const KEY_PREFIXES: &[&str] = &["contact.", "entity."];

wire_enum! {
    /// Registry-specific contact flavour.
    #[derive(Default)]
    pub enum ContactType {
        #[default]
        Contact => "Contact",
        At => "AtContact",
        Br => "BrContact",
        BrOrg => "BrOrgContact",
        Ca => "CaContact",
        Cl => "ClContact",
        Cn => "CnContact",
        Co => "CoContact",
        Coop => "CoopContact",
        De => "DeContact",
        Es => "EsContact",
        Eu => "EuContact",
        Fr => "FrContact",
        Mx => "MxContact",
        Nl => "NlContact",
        Nyc => "NycContact",
        Uk => "UkContact",
        UkService => "UkServiceContact",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WhoisValidity {
    #[serde(rename = "valid")]
    pub is_valid: Option<JsonBool>,
    #[serde(rename = "invalidData")]
    pub invalid_data: Vec<String>,
}

/// A contact as sent on add/modify and as returned by `details`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(rename = "entityid")]
    pub id: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    #[serde(rename = "customerid")]
    pub customer_id: String,
    pub name: String,
    #[serde(rename = "emailaddr")]
    pub email: String,
    pub company: String,
    #[serde(flatten)]
    pub address: PostalAddress,
    #[serde(rename = "telnocc")]
    pub phone_cc: String,
    #[serde(rename = "telno")]
    pub phone: String,
    #[serde(rename = "faxnocc")]
    pub fax_cc: String,
    #[serde(rename = "faxno")]
    pub fax: String,
    #[serde(skip)]
    pub attributes: EntityAttributes,

    #[serde(rename = "currentstatus")]
    pub status: String,
    #[serde(rename = "contactstatus")]
    pub registry_status: String,
    #[serde(rename = "creationdt")]
    pub created: Option<UnixTime>,
    #[serde(rename = "designated-agent")]
    pub designated_agent: Option<JsonBool>,
    #[serde(rename = "whoisValidity")]
    pub whois_validity: Option<WhoisValidity>,
}

mapped!(
    Contact {
        id, contact_type, customer_id, name, email, company, address,
        phone_cc, phone, fax_cc, fax, attributes
    },
    || FieldTable::builder()
        .scalar("id")
        .on(Channel::ADD, "-")
        .on(Channel::MODIFY, "contact-id")
        .rule(Rule::Numeric)
        .scalar("contact_type")
        .on(Channel::ADD, "type")
        .scalar("customer_id")
        .on(Channel::ADD, "customer-id")
        .rule(Rule::Numeric)
        .scalar("name")
        .on(Channel::ADD, "name")
        .on(Channel::MODIFY, "name")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(255))
        .scalar("email")
        .on(Channel::ADD, "email")
        .on(Channel::MODIFY, "email")
        .rule(Rule::Required)
        .rule(Rule::Email)
        .scalar("company")
        .on(Channel::ADD, "company")
        .on(Channel::MODIFY, "company")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(255))
        .nested("address")
        .on(Channel::ADD, "address")
        .on(Channel::MODIFY, "address")
        .scalar("phone_cc")
        .on(Channel::ADD, "phone-cc")
        .on(Channel::MODIFY, "phone-cc")
        .rule(Rule::Required)
        .rule(Rule::LenBetween(1, 3))
        .rule(Rule::Numeric)
        .scalar("phone")
        .on(Channel::ADD, "phone")
        .on(Channel::MODIFY, "phone")
        .rule(Rule::Required)
        .rule(Rule::LenBetween(4, 12))
        .rule(Rule::Numeric)
        .scalar("fax_cc")
        .on(Channel::ADD, "fax-cc,optional")
        .on(Channel::MODIFY, "fax-cc,optional")
        .rule(Rule::LenBetween(1, 3))
        .scalar("fax")
        .on(Channel::ADD, "fax,optional")
        .on(Channel::MODIFY, "fax,optional")
        .rule(Rule::LenBetween(4, 12))
        .nested("attributes")
        .on(Channel::ADD, "attributes,optional")
        .on(Channel::MODIFY, "attributes,optional")
        .build()
);

/// Filters for `contacts/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactCriteria {
    pub customer_id: String,
    pub paging: Paging,
    pub contact_ids: Vec<String>,
    pub statuses: Vec<EntityStatus>,
    pub name: String,
    pub email: String,
    pub company: String,
    pub contact_type: Option<ContactType>,
    pub include_invalid: bool,
}

impl ContactCriteria {
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            ..Default::default()
        }
    }
}

mapped!(
    ContactCriteria {
        customer_id, paging, contact_ids, statuses, name, email, company,
        contact_type, include_invalid
    },
    || FieldTable::builder()
        .scalar("customer_id")
        .on(Channel::SEARCH, "customer-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .nested("paging")
        .on(Channel::SEARCH, "paging")
        .slice("contact_ids")
        .on(Channel::SEARCH, "contact-id,optional")
        .rule(Rule::Numeric)
        .slice("statuses")
        .on(Channel::SEARCH, "status,optional")
        .scalar("name")
        .on(Channel::SEARCH, "name,optional")
        .scalar("email")
        .on(Channel::SEARCH, "email,optional")
        .rule(Rule::Email)
        .scalar("company")
        .on(Channel::SEARCH, "company,optional")
        .scalar("contact_type")
        .on(Channel::SEARCH, "type,optional")
        .scalar("include_invalid")
        .on(Channel::SEARCH, "include-invalid,optional")
        .build()
);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSearchResult {
    pub on_page: i64,
    pub total: i64,
    pub contacts: Vec<Contact>,
}

/// Default contact ids of a customer, set through `contacts/modDefault`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultContacts {
    pub customer_id: String,
    pub registrant: String,
    pub admin: String,
    pub tech: String,
    pub billing: String,
    pub types: Vec<ContactType>,
}

mapped!(
    DefaultContacts { customer_id, registrant, admin, tech, billing, types },
    || FieldTable::builder()
        .scalar("customer_id")
        .on(Channel::MODIFY, "customer-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("registrant")
        .on(Channel::MODIFY, "reg-contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("admin")
        .on(Channel::MODIFY, "admin-contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("tech")
        .on(Channel::MODIFY, "tech-contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("billing")
        .on(Channel::MODIFY, "billing-contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .slice("types")
        .on(Channel::MODIFY, "type")
        .rule(Rule::Required)
        .build()
);

/// Default contacts by contact type, then by role (`registrant`, `admin`, …).
pub type DefaultContactDetails = BTreeMap<String, BTreeMap<String, Contact>>;

/// Registry-specific extra details for a contact, applied for the listed
/// product keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactExtraDetails {
    pub contact_id: String,
    pub attributes: EntityAttributes,
    pub product_keys: Vec<String>,
}

mapped!(
    ContactExtraDetails { contact_id, attributes, product_keys },
    || FieldTable::builder()
        .scalar("contact_id")
        .on(Channel::MODIFY, "contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .nested("attributes")
        .on(Channel::MODIFY, "attributes")
        .rule(Rule::Required)
        .slice("product_keys")
        .on(Channel::MODIFY, "product-key")
        .rule(Rule::Required)
        .build()
);

/// Contacts checked against registry eligibility criteria such as
/// `CED_ASIAN_COUNTRY` or `APP_PREF_NEXUS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrantCheck {
    pub contact_ids: Vec<String>,
    pub criteria: Vec<String>,
}

mapped!(RegistrantCheck { contact_ids, criteria }, || FieldTable::builder()
    .slice("contact_ids")
    .on(Channel::SEARCH, "contact-id")
    .rule(Rule::Required)
    .rule(Rule::Numeric)
    .slice("criteria")
    .on(Channel::SEARCH, "eligibility-criteria")
    .rule(Rule::Required)
    .build());

/// Verdicts by contact id, then criterion, kept as sent.
pub type RegistrantValidation = BTreeMap<String, BTreeMap<String, RawString>>;

const DETAILS_SUFFIX: &str = "ContactDetails";

impl ResellerClient {
    pub fn build_add_contact(&self, contact: &Contact) -> Result<HttpRequest, ApiError> {
        let form = checked_form(contact, Channel::ADD, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "add", form))
    }

    /// Id of the new contact.
    pub fn parse_add_contact(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_id(&response)
    }

    pub fn build_contact_details(&self, contact_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(contact_id)?;
        let form = form_of([("contact-id", contact_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "details", form))
    }

    pub fn parse_contact_details(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        parse_json(&response)
    }

    /// Modify a contact from the fields set in `changes`. Required fields
    /// left empty are taken from `baseline`, the contact as last fetched.
    pub fn build_modify_contact(
        &self,
        changes: &Contact,
        baseline: &Contact,
    ) -> Result<HttpRequest, ApiError> {
        let resolved = resolve(changes, baseline, Channel::MODIFY)?;
        let form = checked_form(&resolved, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "modify", form))
    }

    pub fn parse_modify_contact(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_search_contacts(&self, criteria: &ContactCriteria) -> Result<HttpRequest, ApiError> {
        let form = checked_form(criteria, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, "search", form))
    }

    pub fn parse_search_contacts(
        &self,
        response: HttpResponse,
    ) -> Result<ContactSearchResult, ApiError> {
        check_status(&response)?;
        let envelope = Envelope::parse_stripped(&response.body, KEY_PREFIXES)?;
        Ok(ContactSearchResult {
            on_page: envelope.decode::<JsonInt>("recsonpage")?.unwrap_or_default().get(),
            total: envelope.decode::<JsonInt>("recsindb")?.unwrap_or_default().get(),
            contacts: envelope.decode("result")?.unwrap_or_default(),
        })
    }

    pub fn build_delete_contact(&self, contact_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(contact_id)?;
        let form = form_of([("contact-id", contact_id)]);
        self.build_call(ApiCall::post(NAMESPACE, "delete", form))
    }

    pub fn parse_delete_contact(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    /// Default contacts of `customer_id` for each of `types`.
    pub fn build_default_contacts(
        &self,
        customer_id: &str,
        types: &[ContactType],
    ) -> Result<HttpRequest, ApiError> {
        require_id(customer_id)?;
        if types.is_empty() {
            return Err(ApiError::Validation(vec![FieldViolation {
                field: "types".into(),
                rule: Rule::Required.name(),
                message: "is required".into(),
            }]));
        }
        let mut form = form_of([("customer-id", customer_id)]);
        for t in types {
            form.append("type", t.as_str());
        }
        self.build_call(ApiCall::post(NAMESPACE, "default", form))
    }

    pub fn parse_default_contacts(
        &self,
        response: HttpResponse,
    ) -> Result<DefaultContactDetails, ApiError> {
        check_status(&response)?;
        let envelope = Envelope::parse_stripped(&response.body, KEY_PREFIXES)?;

        let mut out = DefaultContactDetails::new();
        for (contact_type, roles) in envelope.into_inner() {
            let Value::Object(roles) = roles else {
                continue;
            };
            let by_role = out.entry(contact_type).or_default();
            for (key, details) in roles {
                // Plain role keys hold only the contact id.
                let Some(role) = key.strip_suffix(DETAILS_SUFFIX) else {
                    continue;
                };
                by_role.insert(role.to_string(), Contact::deserialize(details)?);
            }
        }
        Ok(out)
    }

    pub fn build_set_default_contacts(
        &self,
        defaults: &DefaultContacts,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(defaults, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "modDefault", form))
    }

    pub fn parse_set_default_contacts(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn build_set_contact_details(
        &self,
        details: &ContactExtraDetails,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(details, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "set-details", form))
    }

    /// The upstream answers a bare `true`; anything else is a failure.
    pub fn parse_set_contact_details(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_true(&response, "contacts/set-details")
    }

    pub fn build_validate_registrant(
        &self,
        check: &RegistrantCheck,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(check, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, "validate-registrant", form))
    }

    pub fn parse_validate_registrant(
        &self,
        response: HttpResponse,
    ) -> Result<RegistrantValidation, ApiError> {
        parse_json(&response)
    }

    /// Text of the .CA registrant agreement, keyed by section.
    pub fn build_dotca_agreement(&self) -> Result<HttpRequest, ApiError> {
        self.build_call(ApiCall::get(
            "contacts/dotca",
            "registrantagreement",
            EncodedForm::new(),
        ))
    }

    pub fn parse_dotca_agreement(
        &self,
        response: HttpResponse,
    ) -> Result<BTreeMap<String, String>, ApiError> {
        parse_json(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client;
    use crate::http::HttpMethod;

    fn contact() -> Contact {
        Contact {
            contact_type: ContactType::Contact,
            customer_id: "1001".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            company: "N/A".into(),
            address: PostalAddress {
                line1: "1 Main St".into(),
                city: "New York".into(),
                country: "US".into(),
                zipcode: "10001".into(),
                ..Default::default()
            },
            phone_cc: "1".into(),
            phone: "5550100".into(),
            ..Default::default()
        }
    }

    fn body_form(req: &HttpRequest) -> EncodedForm {
        serde_urlencoded::from_str::<Vec<(String, String)>>(req.body.as_deref().unwrap())
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn add_encodes_add_channel() {
        let mut c = contact();
        c.attributes.add("sponsor1", "42");
        let req = test_client().build_add_contact(&c).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/contacts/add.json");

        let form = body_form(&req);
        assert_eq!(
            form.keys().collect::<Vec<_>>(),
            [
                "type", "customer-id", "name", "email", "company", "address-line-1", "city",
                "country", "zipcode", "phone-cc", "phone", "attr-name1", "attr-value1",
                "auth-userid", "api-key"
            ]
        );
        assert!(!form.contains_key("contact-id"));
    }

    #[test]
    fn add_rejects_invalid_contact_before_encoding() {
        let c = Contact {
            email: "nope".into(),
            ..contact()
        };
        let err = test_client().build_add_contact(&c).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v[0].field == "email"));
    }

    #[test]
    fn modify_backfills_required_fields_from_baseline() {
        let baseline = Contact {
            id: "555".into(),
            address: PostalAddress {
                state: "NY".into(),
                ..contact().address
            },
            fax: "5550199".into(),
            ..contact()
        };
        let changes = Contact {
            phone: "5550123".into(),
            ..Default::default()
        };
        let req = test_client().build_modify_contact(&changes, &baseline).unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/contacts/modify.json");

        let form = body_form(&req);
        assert_eq!(form.first("contact-id"), Some("555"));
        assert_eq!(form.first("name"), Some("Alice"));
        assert_eq!(form.first("city"), Some("New York"));
        assert_eq!(form.first("phone"), Some("5550123"));
        // optional fields left empty in `changes` are not carried over
        assert!(!form.contains_key("state"));
        assert!(!form.contains_key("fax"));
        assert!(!form.contains_key("type"));
    }

    #[test]
    fn modify_without_any_id_fails() {
        let err = test_client()
            .build_modify_contact(&Contact::default(), &contact())
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingRequiredField(ref k) if k == "contact-id"));
    }

    #[test]
    fn details_rejects_non_numeric_id() {
        let err = test_client().build_contact_details("12; drop").unwrap_err();
        assert!(matches!(err, ApiError::InvalidIdentifier(_)));
    }

    #[test]
    fn details_decodes_tolerant_fields() {
        let body = r#"{
            "entityid": "555", "type": "Contact", "customerid": "1001",
            "name": "Alice", "emailaddr": "alice@example.com", "company": "N/A",
            "address1": "1 Main St", "city": "New York", "country": "US", "zip": "10001",
            "telnocc": "1", "telno": "5550100",
            "creationdt": "1700000000", "designated-agent": "false",
            "whoisValidity": {"valid": "true", "invalidData": []}
        }"#;
        let c = test_client()
            .parse_contact_details(HttpResponse::ok(body))
            .unwrap();
        assert_eq!(c.id, "555");
        assert_eq!(c.address.city, "New York");
        assert_eq!(c.created.unwrap().get().timestamp(), 1_700_000_000);
        assert_eq!(c.designated_agent, Some(JsonBool(false)));
        assert_eq!(c.whois_validity.unwrap().is_valid, Some(JsonBool(true)));
    }

    #[test]
    fn search_encodes_criteria_with_paging() {
        let criteria = ContactCriteria {
            paging: Paging::new(20, 2),
            statuses: vec![EntityStatus::Active, EntityStatus::Suspended],
            contact_type: Some(ContactType::Uk),
            ..ContactCriteria::for_customer("1001")
        };
        let req = test_client().build_search_contacts(&criteria).unwrap();
        assert!(req.path.ends_with(
            "contacts/search.json?auth-userid=42&api-key=s3cret&customer-id=1001&no-of-records=20&page-no=2&status=Active&status=Suspended&type=UkContact"
        ));
    }

    #[test]
    fn search_strips_key_prefixes() {
        let body = r#"{
            "recsonpage": "2", "recsindb": "7",
            "result": [
                {"entity.entityid": "1", "contact.name": "Alice", "entity.customerid": "1001"},
                {"entity.entityid": "2", "contact.name": "Bob", "entity.customerid": "1001"}
            ]
        }"#;
        let result = test_client()
            .parse_search_contacts(HttpResponse::ok(body))
            .unwrap();
        assert_eq!(result.on_page, 2);
        assert_eq!(result.total, 7);
        let names: Vec<_> = result.contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(result.contacts[1].id, "2");
    }

    #[test]
    fn default_contacts_are_grouped_by_type_and_role() {
        let body = r#"{
            "Contact": {
                "registrant": "11", "admin": "12", "type": "Contact",
                "registrantContactDetails": {"entity.entityid": "11", "contact.name": "Reg"},
                "adminContactDetails": {"entity.entityid": "12", "contact.name": "Adm"}
            }
        }"#;
        let defaults = test_client()
            .parse_default_contacts(HttpResponse::ok(body))
            .unwrap();
        let roles = &defaults["Contact"];
        assert_eq!(roles.len(), 2);
        assert_eq!(roles["registrant"].name, "Reg");
        assert_eq!(roles["admin"].id, "12");
    }

    #[test]
    fn default_contacts_need_a_type() {
        let err = test_client().build_default_contacts("1001", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let req = test_client()
            .build_default_contacts("1001", &[ContactType::Contact, ContactType::Eu])
            .unwrap();
        assert_eq!(
            body_form(&req).get("type").unwrap(),
            ["Contact", "EuContact"]
        );
    }

    #[test]
    fn set_default_contacts_requires_all_ids() {
        let defaults = DefaultContacts {
            customer_id: "1001".into(),
            registrant: "11".into(),
            admin: "12".into(),
            tech: String::new(),
            billing: "14".into(),
            types: vec![ContactType::Contact],
        };
        let err = test_client().build_set_default_contacts(&defaults).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v[0].field == "tech"));
    }

    #[test]
    fn new_contacts_default_to_the_generic_type() {
        assert_eq!(ContactType::default(), ContactType::Contact);
        assert_eq!(Contact::default().contact_type.as_str(), "Contact");
    }

    #[test]
    fn validate_registrant_repeats_ids_and_criteria() {
        let check = RegistrantCheck {
            contact_ids: vec!["100001".into(), "100002".into()],
            criteria: vec!["CED_ASIAN_COUNTRY".into(), "APP_PREF_NEXUS".into()],
        };
        let req = test_client().build_validate_registrant(&check).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.path.ends_with(
            "/contacts/validate-registrant.json?auth-userid=42&api-key=s3cret&contact-id=100001&contact-id=100002&eligibility-criteria=CED_ASIAN_COUNTRY&eligibility-criteria=APP_PREF_NEXUS"
        ));

        let Err(ApiError::Validation(v)) = test_client().build_validate_registrant(&RegistrantCheck {
            contact_ids: vec!["abc".into()],
            criteria: vec![],
        }) else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = v.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["contact_ids", "criteria"]);
    }

    #[test]
    fn registrant_verdicts_keep_raw_json() {
        let body = r#"{"100001": {"CED_ASIAN_COUNTRY": {"status": "true"}, "APP_PREF_NEXUS": "false"}}"#;
        let result = test_client()
            .parse_validate_registrant(HttpResponse::ok(body))
            .unwrap();
        let verdicts = &result["100001"];
        assert_eq!(verdicts["APP_PREF_NEXUS"].as_str(), "false");
        let asian: BTreeMap<String, JsonBool> = verdicts["CED_ASIAN_COUNTRY"].decode().unwrap();
        assert_eq!(asian["status"], JsonBool(true));
    }

    #[test]
    fn dotca_agreement() {
        let req = test_client().build_dotca_agreement().unwrap();
        assert!(req
            .path
            .ends_with("/contacts/dotca/registrantagreement.json?auth-userid=42&api-key=s3cret"));
        let agreement = test_client()
            .parse_dotca_agreement(HttpResponse::ok(r#"{"version": "2.1", "agreement": "..."}"#))
            .unwrap();
        assert_eq!(agreement["version"], "2.1");
    }

    #[test]
    fn set_details_numbers_attributes_and_repeats_product_keys() {
        let details = ContactExtraDetails {
            contact_id: "100001".into(),
            attributes: [("CPR", "IND"), ("ca_lang", "en")].into_iter().collect(),
            product_keys: vec!["dotca".into()],
        };
        let req = test_client().build_set_contact_details(&details).unwrap();
        assert!(req.path.ends_with("/contacts/set-details.json"));
        assert_eq!(
            req.body.as_deref(),
            Some("contact-id=100001&attr-name1=CPR&attr-value1=IND&attr-name2=ca_lang&attr-value2=en&product-key=dotca&auth-userid=42&api-key=s3cret")
        );

        let err = test_client()
            .build_set_contact_details(&ContactExtraDetails {
                attributes: EntityAttributes::new(),
                ..details
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v[0].field == "attributes"));

        assert!(test_client()
            .parse_set_contact_details(HttpResponse::ok("true"))
            .is_ok());
        assert!(matches!(
            test_client().parse_set_contact_details(HttpResponse::ok("false")),
            Err(ApiError::OperationFailed(_))
        ));
    }
}
