//! `domains` and `orders` namespaces: availability, order search and order management.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{checked_form, form_of, Action, EntityStatus, Paging, PostalAddress, StatusResponse};
use crate::client::{check_status, parse_id, parse_json, require_id, ApiCall, ResellerClient};
use crate::codec::{JsonBool, JsonFloat, JsonInt, UnixTime};
use crate::envelope::Envelope;
use crate::error::{ApiError, FieldViolation};
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::http::{HttpRequest, HttpResponse};
use crate::mapped;
use crate::validate::Rule;
use crate::wire::{wire_enum, WireValue};

const NAMESPACE: &str = "domains";
const SUGGEST_NAMESPACE: &str = "domains/v5";
const ORDERS_NAMESPACE: &str = "orders";

const ORDER_KEY_PREFIXES: &[&str] = &["orders.", "entity.", "domains.", "entitytype."];

wire_enum! {
    pub enum RegistrationStatus {
        Unknown => "unknown",
        Available => "available",
        RegisteredThroughUs => "regthroughus",
        RegisteredThroughOthers => "regthroughothers",
    }
}

wire_enum! {
    pub enum SortBy {
        OrderId => "orderid",
        CustomerId => "customerid",
        EndTime => "endtime",
        Timestamp => "timestamp",
        EntityTypeId => "entitytypeid",
        CreationTime => "creationtime",
        CreationDate => "creationdt",
    }
}

wire_enum! {
    /// `na` marks TLDs without privacy protection.
    pub enum PrivacyState {
        Enabled => "true",
        Disabled => "false",
        Unsupported => "na",
    }
}

wire_enum! {
    pub enum InvoiceOption {
        NoInvoice => "NoInvoice",
        PayInvoice => "PayInvoice",
        KeepInvoice => "KeepInvoice",
        OnlyAdd => "OnlyAdd",
    }
}

wire_enum! {
    /// Sections requested from `domains/details`.
    pub enum DetailOption {
        All => "All",
        OrderDetails => "OrderDetails",
        ContactIds => "ContactIds",
        RegistrantContactDetails => "RegistrantContactDetails",
        AdminContactDetails => "AdminContactDetails",
        TechContactDetails => "TechContactDetails",
        BillingContactDetails => "BillingContactDetails",
        NsDetails => "NsDetails",
        DomainStatus => "DomainStatus",
        DnssecDetails => "DNSSECDetails",
        StatusDetails => "StatusDetails",
    }
}

/// Names without TLD crossed with TLDs, e.g. `["example"] × ["com", "net"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub domain_names: Vec<String>,
    pub tlds: Vec<String>,
}

mapped!(AvailabilityQuery { domain_names, tlds }, || FieldTable::builder()
    .slice("domain_names")
    .on(Channel::SEARCH, "domain-name")
    .rule(Rule::Required)
    .slice("tlds")
    .on(Channel::SEARCH, "tlds")
    .rule(Rule::Required)
    .build());

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainAvailability {
    #[serde(rename = "classkey", default)]
    pub class_key: String,
    pub status: RegistrationStatus,
}

/// Availability by fully qualified domain name.
pub type Availabilities = BTreeMap<String, DomainAvailability>;

/// One `order-by` entry, sent as `orderid` or `orderid desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub by: SortBy,
    pub descending: bool,
}

impl SortOrder {
    pub fn asc(by: SortBy) -> Self {
        Self {
            by,
            descending: false,
        }
    }

    pub fn desc(by: SortBy) -> Self {
        Self {
            by,
            descending: true,
        }
    }
}

impl WireValue for SortOrder {
    fn is_zero(&self) -> bool {
        false
    }

    fn wire_values(&self) -> Vec<String> {
        if self.descending {
            vec![format!("{} desc", self.by.as_str())]
        } else {
            vec![self.by.as_str().to_string()]
        }
    }
}

/// Filters for `domains/search`. Everything but paging is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersCriteria {
    pub paging: Paging,
    pub sort: Vec<SortOrder>,
    pub order_ids: Vec<String>,
    pub reseller_ids: Vec<String>,
    pub customer_ids: Vec<String>,
    pub product_keys: Vec<String>,
    pub domain_name: String,
    pub statuses: Vec<EntityStatus>,
    pub privacy: Option<PrivacyState>,
    pub show_child_orders: bool,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub expires_after: Option<DateTime<Utc>>,
    pub expires_before: Option<DateTime<Utc>>,
}

mapped!(
    OrdersCriteria {
        paging, sort, order_ids, reseller_ids, customer_ids, product_keys, domain_name,
        statuses, privacy, show_child_orders, created_after, created_before,
        expires_after, expires_before
    },
    || FieldTable::builder()
        .nested("paging")
        .on(Channel::SEARCH, "paging")
        .slice("sort")
        .on(Channel::SEARCH, "order-by,optional")
        .slice("order_ids")
        .on(Channel::SEARCH, "order-id,optional")
        .rule(Rule::Numeric)
        .slice("reseller_ids")
        .on(Channel::SEARCH, "reseller-id,optional")
        .rule(Rule::Numeric)
        .slice("customer_ids")
        .on(Channel::SEARCH, "customer-id,optional")
        .rule(Rule::Numeric)
        .slice("product_keys")
        .on(Channel::SEARCH, "product-key,optional")
        .scalar("domain_name")
        .on(Channel::SEARCH, "domain-name,optional")
        .slice("statuses")
        .on(Channel::SEARCH, "status,optional")
        .scalar("privacy")
        .on(Channel::SEARCH, "privacy-enabled,optional")
        .scalar("show_child_orders")
        .on(Channel::SEARCH, "show-child-orders,optional")
        .scalar("created_after")
        .on(Channel::SEARCH, "creation-date-start,optional")
        .scalar("created_before")
        .on(Channel::SEARCH, "creation-date-end,optional")
        .scalar("expires_after")
        .on(Channel::SEARCH, "expiry-date-start,optional")
        .scalar("expires_before")
        .on(Channel::SEARCH, "expiry-date-end,optional")
        .build()
);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderSummary {
    #[serde(rename = "orderid")]
    pub order_id: String,
    #[serde(rename = "customerid")]
    pub customer_id: String,
    #[serde(rename = "description")]
    pub domain_name: String,
    #[serde(rename = "entitytypename")]
    pub product: String,
    #[serde(rename = "currentstatus")]
    pub status: String,
    #[serde(rename = "creationtime")]
    pub created: Option<UnixTime>,
    #[serde(rename = "endtime")]
    pub expires: Option<UnixTime>,
    #[serde(rename = "autorenew")]
    pub auto_renew: Option<JsonBool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSearchResult {
    pub on_page: i64,
    pub total: i64,
    pub orders: Vec<(u64, OrderSummary)>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Gdpr {
    pub enabled: Option<JsonBool>,
    pub eligible: Option<JsonBool>,
}

/// Contact block embedded in order details.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderContact {
    #[serde(rename = "contactid")]
    pub id: String,
    #[serde(rename = "type")]
    pub contact_type: String,
    #[serde(rename = "customerid")]
    pub customer_id: String,
    pub name: String,
    pub company: String,
    #[serde(rename = "emailaddr")]
    pub email: String,
    #[serde(rename = "telnocc")]
    pub phone_cc: String,
    #[serde(rename = "telno")]
    pub phone: String,
    #[serde(rename = "contactstatus")]
    pub status: String,
    #[serde(flatten)]
    pub address: PostalAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderDetail {
    #[serde(rename = "orderid")]
    pub order_id: String,
    #[serde(rename = "entityid")]
    pub entity_id: String,
    #[serde(rename = "domainname")]
    pub domain_name: String,
    #[serde(rename = "classkey")]
    pub class_key: String,
    #[serde(rename = "productkey")]
    pub product_key: String,
    #[serde(rename = "productcategory")]
    pub product_category: String,
    #[serde(rename = "customerid")]
    pub customer_id: String,
    #[serde(rename = "currentstatus")]
    pub status: String,
    #[serde(rename = "orderstatus")]
    pub order_status: Vec<String>,
    #[serde(rename = "domainstatus")]
    pub domain_status: Vec<String>,
    #[serde(rename = "creationtime")]
    pub created: Option<UnixTime>,
    #[serde(rename = "endtime")]
    pub expires: Option<UnixTime>,
    #[serde(rename = "noOfNameServers")]
    pub name_server_count: Option<JsonInt>,
    pub ns1: String,
    pub ns2: String,
    pub addons: Vec<String>,
    pub gdpr: Gdpr,
    #[serde(rename = "allowdeletion")]
    pub allow_deletion: Option<JsonBool>,
    #[serde(rename = "isprivacyprotected")]
    pub privacy_protected: Option<JsonBool>,
    #[serde(rename = "privacyprotectedallowed")]
    pub privacy_allowed: Option<JsonBool>,
    #[serde(rename = "premiumdnsenabled")]
    pub premium_dns_enabled: Option<JsonBool>,
    #[serde(rename = "recurring")]
    pub recurring: Option<JsonBool>,
    #[serde(rename = "customercost")]
    pub customer_cost: Option<JsonFloat>,
    #[serde(rename = "resellercost")]
    pub reseller_cost: Option<JsonFloat>,
    #[serde(rename = "domsecret")]
    pub auth_code: String,
    #[serde(rename = "registrantcontactid")]
    pub registrant_contact_id: String,
    #[serde(rename = "admincontactid")]
    pub admin_contact_id: String,
    #[serde(rename = "techcontactid")]
    pub tech_contact_id: String,
    #[serde(rename = "billingcontactid")]
    pub billing_contact_id: String,
    #[serde(rename = "registrantcontact")]
    pub registrant_contact: Option<OrderContact>,
    #[serde(rename = "admincontact")]
    pub admin_contact: Option<OrderContact>,
    #[serde(rename = "techcontact")]
    pub tech_contact: Option<OrderContact>,
    #[serde(rename = "billingcontact")]
    pub billing_contact: Option<OrderContact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameServers {
    pub order_id: String,
    pub ns: Vec<String>,
}

mapped!(NameServers { order_id, ns }, || FieldTable::builder()
    .scalar("order_id")
    .on(Channel::MODIFY, "order-id")
    .rule(Rule::Required)
    .rule(Rule::Numeric)
    .slice("ns")
    .on(Channel::MODIFY, "ns")
    .rule(Rule::Required)
    .rule(Rule::MaxLen(253))
    .build());

/// Renewal of a registration order. `exp_date` is the current expiry and
/// guards against renewing twice.
#[derive(Debug, Clone, PartialEq)]
pub struct RenewOrder {
    pub order_id: String,
    pub years: u8,
    pub exp_date: DateTime<Utc>,
    pub purchase_privacy: bool,
    pub auto_renew: Option<bool>,
    pub invoice_option: InvoiceOption,
    pub discount_amount: f64,
    pub purchase_premium_dns: bool,
}

impl RenewOrder {
    pub fn new(order_id: impl Into<String>, years: u8, exp_date: DateTime<Utc>) -> Self {
        Self {
            order_id: order_id.into(),
            years,
            exp_date,
            purchase_privacy: false,
            auto_renew: Some(false),
            invoice_option: InvoiceOption::NoInvoice,
            discount_amount: 0.0,
            purchase_premium_dns: false,
        }
    }
}

mapped!(
    RenewOrder {
        order_id, years, exp_date, purchase_privacy, auto_renew, invoice_option,
        discount_amount, purchase_premium_dns
    },
    || FieldTable::builder()
        .scalar("order_id")
        .on(Channel::MODIFY, "order-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("years")
        .on(Channel::MODIFY, "years")
        .rule(Rule::Required)
        .rule(Rule::Range(1, 10))
        .scalar("exp_date")
        .on(Channel::MODIFY, "exp-date")
        .scalar("purchase_privacy")
        .on(Channel::MODIFY, "purchase-privacy,optional")
        .scalar("auto_renew")
        .on(Channel::MODIFY, "auto-renew")
        .rule(Rule::Required)
        .scalar("invoice_option")
        .on(Channel::MODIFY, "invoice-option")
        .scalar("discount_amount")
        .on(Channel::MODIFY, "discount-amount,optional")
        .scalar("purchase_premium_dns")
        .on(Channel::MODIFY, "purchase-premium-dns,optional")
        .build()
);

/// [`Action`] with the invoice it produced.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BillableAction {
    #[serde(flatten)]
    pub action: Action,
    #[serde(rename = "customerid")]
    pub customer_id: String,
    #[serde(rename = "invoiceid")]
    pub invoice_id: String,
    #[serde(rename = "sellingamount")]
    pub selling_amount: Option<JsonFloat>,
    #[serde(rename = "unutilisedsellingamount")]
    pub unutilised_selling_amount: Option<JsonFloat>,
    #[serde(rename = "sellingcurrencysymbol")]
    pub currency_symbol: String,
}

/// Switch privacy protection on or off. The upstream records `reason`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyProtection {
    pub order_id: String,
    pub protect_privacy: Option<bool>,
    pub reason: String,
}

impl PrivacyProtection {
    pub fn new(order_id: impl Into<String>, protect: bool, reason: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            protect_privacy: Some(protect),
            reason: reason.into(),
        }
    }
}

mapped!(PrivacyProtection { order_id, protect_privacy, reason }, || FieldTable::builder()
    .scalar("order_id")
    .on(Channel::MODIFY, "order-id")
    .rule(Rule::Required)
    .rule(Rule::Numeric)
    .scalar("protect_privacy")
    .on(Channel::MODIFY, "protect-privacy")
    .rule(Rule::Required)
    .scalar("reason")
    .on(Channel::MODIFY, "reason")
    .rule(Rule::Required)
    .rule(Rule::MaxLen(500))
    .build());

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Locks {
    #[serde(rename = "transferlock")]
    pub transfer_lock: JsonBool,
    #[serde(rename = "customerlock")]
    pub customer_lock: JsonBool,
}

/// Keyword for `domains/v5/suggest-names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub keyword: String,
    /// Restrict suggestions to one TLD, without the dot.
    pub tld_only: String,
    pub exact_match: Option<bool>,
    pub adult: Option<bool>,
}

impl SuggestionQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            tld_only: String::new(),
            exact_match: Some(false),
            adult: Some(false),
        }
    }
}

mapped!(SuggestionQuery { keyword, tld_only, exact_match, adult }, || FieldTable::builder()
    .scalar("keyword")
    .on(Channel::SEARCH, "keyword")
    .rule(Rule::Required)
    .rule(Rule::MaxLen(63))
    .scalar("tld_only")
    .on(Channel::SEARCH, "tld-only,optional")
    .scalar("exact_match")
    .on(Channel::SEARCH, "exact-match,optional")
    .scalar("adult")
    .on(Channel::SEARCH, "adult,optional")
    .build());

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NameSuggestion {
    pub status: String,
    pub in_ga: Option<JsonBool>,
    pub score: Option<JsonFloat>,
    pub spin: String,
}

/// Suggestions by fully qualified domain name.
pub type NameSuggestions = BTreeMap<String, NameSuggestion>;

/// Contact ids of a registration order. Admin, tech and billing take `-1`
/// for TLDs without that role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderContacts {
    pub order_id: String,
    pub registrant_contact_id: String,
    pub admin_contact_id: String,
    pub tech_contact_id: String,
    pub billing_contact_id: String,
    pub sixty_day_lock_optout: Option<bool>,
    pub designated_agent: Option<bool>,
    pub attr_name: String,
    pub attr_value: String,
}

mapped!(
    OrderContacts {
        order_id, registrant_contact_id, admin_contact_id, tech_contact_id,
        billing_contact_id, sixty_day_lock_optout, designated_agent, attr_name, attr_value
    },
    || FieldTable::builder()
        .scalar("order_id")
        .on(Channel::MODIFY, "order-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("registrant_contact_id")
        .on(Channel::MODIFY, "reg-contact-id")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("admin_contact_id")
        .on(Channel::MODIFY, "admin-contact-id")
        .rule(Rule::Required)
        .scalar("tech_contact_id")
        .on(Channel::MODIFY, "tech-contact-id")
        .rule(Rule::Required)
        .scalar("billing_contact_id")
        .on(Channel::MODIFY, "billing-contact-id")
        .rule(Rule::Required)
        .scalar("sixty_day_lock_optout")
        .on(Channel::MODIFY, "sixty-day-lock-optout,optional")
        .scalar("designated_agent")
        .on(Channel::MODIFY, "designated-agent,optional")
        .scalar("attr_name")
        .on(Channel::MODIFY, "attr-name,optional")
        .scalar("attr_value")
        .on(Channel::MODIFY, "attr-value,optional")
        .build()
);

/// A child name server (glue record) and its addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildNameServer {
    pub order_id: String,
    pub cns: String,
    pub ips: Vec<String>,
}

mapped!(ChildNameServer { order_id, cns, ips }, || FieldTable::builder()
    .scalar("order_id")
    .on(Channel::MODIFY, "order-id")
    .rule(Rule::Required)
    .rule(Rule::Numeric)
    .scalar("cns")
    .on(Channel::MODIFY, "cns")
    .rule(Rule::Required)
    .rule(Rule::MaxLen(253))
    .slice("ips")
    .on(Channel::MODIFY, "ip")
    .rule(Rule::Required)
    .build());

/// Acknowledgement of `domains/delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeletedOrder {
    pub status: String,
    #[serde(rename = "eaqid")]
    pub action_id: String,
    #[serde(rename = "currentaction")]
    pub current_action: String,
}

impl ResellerClient {
    pub fn build_check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(query, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, "available", form))
    }

    pub fn parse_check_availability(
        &self,
        response: HttpResponse,
    ) -> Result<Availabilities, ApiError> {
        parse_json(&response)
    }

    pub fn build_search_orders(&self, criteria: &OrdersCriteria) -> Result<HttpRequest, ApiError> {
        let form = checked_form(criteria, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, "search", form))
    }

    pub fn parse_search_orders(&self, response: HttpResponse) -> Result<OrderSearchResult, ApiError> {
        check_status(&response)?;
        let envelope = Envelope::parse_stripped(&response.body, ORDER_KEY_PREFIXES)?;
        Ok(OrderSearchResult {
            on_page: envelope.decode::<JsonInt>("recsonpage")?.unwrap_or_default().get(),
            total: envelope.decode::<JsonInt>("recsindb")?.unwrap_or_default().get(),
            orders: envelope.records()?,
        })
    }

    /// Order id of a registered domain name.
    pub fn build_order_id(&self, domain_name: &str) -> Result<HttpRequest, ApiError> {
        let form = form_of([("domain-name", domain_name)]);
        self.build_call(ApiCall::get(NAMESPACE, "orderid", form))
    }

    pub fn parse_order_id(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_id(&response)
    }

    /// `options` defaults to [`DetailOption::All`] when empty.
    pub fn build_order_details(
        &self,
        order_id: &str,
        options: &[DetailOption],
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let mut form = form_of([("order-id", order_id)]);
        let options = if options.is_empty() {
            &[DetailOption::All][..]
        } else {
            options
        };
        for option in options {
            form.append("options", option.as_str());
        }
        self.build_call(ApiCall::get(NAMESPACE, "details", form))
    }

    pub fn parse_order_details(&self, response: HttpResponse) -> Result<OrderDetail, ApiError> {
        parse_json(&response)
    }

    pub fn build_customer_default_ns(&self, customer_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(customer_id)?;
        let form = form_of([("customer-id", customer_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "customer-default-ns", form))
    }

    pub fn parse_customer_default_ns(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        parse_json(&response)
    }

    pub fn build_modify_name_servers(&self, ns: &NameServers) -> Result<HttpRequest, ApiError> {
        let form = checked_form(ns, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "modify-ns", form))
    }

    pub fn parse_modify_name_servers(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_renew(&self, renew: &RenewOrder) -> Result<HttpRequest, ApiError> {
        let form = checked_form(renew, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "renew", form))
    }

    pub fn parse_renew(&self, response: HttpResponse) -> Result<BillableAction, ApiError> {
        parse_json(&response)
    }

    pub fn build_modify_privacy_protection(
        &self,
        change: &PrivacyProtection,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(change, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "modify-privacy-protection", form))
    }

    pub fn parse_modify_privacy_protection(
        &self,
        response: HttpResponse,
    ) -> Result<BillableAction, ApiError> {
        parse_json(&response)
    }

    pub fn build_enable_theft_protection(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id)]);
        self.build_call(ApiCall::post(NAMESPACE, "enable-theft-protection", form))
    }

    pub fn build_disable_theft_protection(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id)]);
        self.build_call(ApiCall::post(NAMESPACE, "disable-theft-protection", form))
    }

    /// Parses both the enable and the disable response.
    pub fn parse_theft_protection(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_locks(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id)]);
        self.build_call(ApiCall::get(NAMESPACE, "locks", form))
    }

    pub fn parse_locks(&self, response: HttpResponse) -> Result<Locks, ApiError> {
        parse_json(&response)
    }

    pub fn build_suggest_names(&self, query: &SuggestionQuery) -> Result<HttpRequest, ApiError> {
        let form = checked_form(query, Channel::SEARCH, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(SUGGEST_NAMESPACE, "suggest-names", form))
    }

    pub fn parse_suggest_names(&self, response: HttpResponse) -> Result<NameSuggestions, ApiError> {
        parse_json(&response)
    }

    pub fn build_modify_order_contacts(
        &self,
        contacts: &OrderContacts,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(contacts, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "modify-contact", form))
    }

    pub fn parse_modify_order_contacts(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_add_child_name_server(
        &self,
        cns: &ChildNameServer,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(cns, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "add-cns", form))
    }

    pub fn build_rename_child_name_server(
        &self,
        order_id: &str,
        old_cns: &str,
        new_cns: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        require_text(&[("old_cns", old_cns), ("new_cns", new_cns)])?;
        let form = form_of([("order-id", order_id), ("old-cns", old_cns), ("new-cns", new_cns)]);
        self.build_call(ApiCall::post(NAMESPACE, "modify-cns-name", form))
    }

    pub fn build_modify_child_name_server_ip(
        &self,
        order_id: &str,
        cns: &str,
        old_ip: &str,
        new_ip: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        require_text(&[("cns", cns), ("old_ip", old_ip), ("new_ip", new_ip)])?;
        let form = form_of([
            ("order-id", order_id),
            ("cns", cns),
            ("old-ip", old_ip),
            ("new-ip", new_ip),
        ]);
        self.build_call(ApiCall::post(NAMESPACE, "modify-cns-ip", form))
    }

    /// `cns.ips` lists the addresses to remove.
    pub fn build_delete_child_name_server_ip(
        &self,
        cns: &ChildNameServer,
    ) -> Result<HttpRequest, ApiError> {
        let form = checked_form(cns, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(NAMESPACE, "delete-cns-ip", form))
    }

    /// Parses the response of every child name server call.
    pub fn parse_child_name_server(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_suspend_order(&self, order_id: &str, reason: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        require_text(&[("reason", reason)])?;
        let form = form_of([("order-id", order_id), ("reason", reason)]);
        self.build_call(ApiCall::post(ORDERS_NAMESPACE, "suspend", form))
    }

    pub fn build_unsuspend_order(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let form = form_of([("order-id", order_id)]);
        self.build_call(ApiCall::post(ORDERS_NAMESPACE, "unsuspend", form))
    }

    /// Parses both the suspend and the unsuspend response.
    pub fn parse_order_suspension(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    pub fn build_modify_auth_code(
        &self,
        order_id: &str,
        auth_code: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_text(&[("auth_code", auth_code)])?;
        self.order_call("modify-auth-code", order_id, &[("auth-code", auth_code)])
    }

    pub fn build_resend_transfer_approval(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        self.order_call("resend-rfa", order_id, &[])
    }

    pub fn build_cancel_transfer(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        self.order_call("cancel-transfer", order_id, &[])
    }

    pub fn parse_cancel_transfer(&self, response: HttpResponse) -> Result<StatusResponse, ApiError> {
        parse_json(&response)
    }

    pub fn build_delete_domain(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        self.order_call("delete", order_id, &[])
    }

    pub fn parse_delete_domain(&self, response: HttpResponse) -> Result<DeletedOrder, ApiError> {
        parse_json(&response)
    }

    pub fn build_restore_domain(
        &self,
        order_id: &str,
        invoice_option: InvoiceOption,
    ) -> Result<HttpRequest, ApiError> {
        self.order_call("restore", order_id, &[("invoice-option", invoice_option.as_str())])
    }

    /// `.tel` WHOIS publication preference.
    pub fn build_modify_tel_whois_preference(
        &self,
        order_id: &str,
        whois_type: &str,
        publish: bool,
    ) -> Result<HttpRequest, ApiError> {
        require_text(&[("whois_type", whois_type)])?;
        let publish = if publish { "y" } else { "n" };
        self.order_call(
            "tel/modify-whois-pref",
            order_id,
            &[("whois-type", whois_type), ("publish", publish)],
        )
    }

    /// Release a `.uk` name to the registrar holding `new_tag`.
    pub fn build_release_uk_domain(
        &self,
        order_id: &str,
        new_tag: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_text(&[("new_tag", new_tag)])?;
        self.order_call("uk/release", order_id, &[("new-tag", new_tag)])
    }

    pub fn build_recheck_de_name_servers(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        self.order_call("de/recheck-ns", order_id, &[])
    }

    /// Associate a `.xxx` membership token; an empty id dissociates it.
    pub fn build_xxx_association(
        &self,
        order_id: &str,
        association_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.order_call(
            "dotxxx/association-details",
            order_id,
            &[("association-id", association_id)],
        )
    }

    /// Parses the action returned by the order maintenance calls: auth
    /// code, transfer approval mail, restore and the TLD specific calls.
    pub fn parse_order_action(&self, response: HttpResponse) -> Result<Action, ApiError> {
        parse_json(&response)
    }

    fn order_call(
        &self,
        operation: &str,
        order_id: &str,
        extra: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        require_id(order_id)?;
        let mut form = form_of([("order-id", order_id)]);
        for (key, value) in extra {
            form.append(key, *value);
        }
        self.build_call(ApiCall::post(NAMESPACE, operation, form))
    }
}

/// Every listed value must be non-empty.
fn require_text(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let violations: Vec<FieldViolation> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| FieldViolation {
            field: field.to_string(),
            rule: Rule::Required.name(),
            message: "is required".into(),
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(violations))
    }
}
