//! `customers` namespace: signup, lookup and password changes.

use serde::Deserialize;

use super::{checked_form, PostalAddress};
use crate::client::{expect_true, parse_id, parse_json, ApiCall, ResellerClient};
use crate::codec::{JsonBool, JsonFloat, UnixTime};
use crate::error::ApiError;
use crate::field::{Channel, FieldTable, SchemaVersion};
use crate::http::{HttpRequest, HttpResponse};
use crate::mapped;
use crate::validate::{is_email, is_numeric, Rule};

const NAMESPACE: &str = "customers";

/// New customer account. The consent flags only exist from
/// [`SchemaVersion::V2`] on and are dropped when signing up against V1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub name: String,
    pub company: String,
    pub address: PostalAddress,
    pub lang_pref: String,
    pub phone_cc: String,
    pub phone: String,
    pub alt_phone_cc: String,
    pub alt_phone: String,
    pub fax_cc: String,
    pub fax: String,
    pub mobile_cc: String,
    pub mobile: String,
    pub vat_id: String,
    pub sms_consent: bool,
    pub email_marketing_consent: bool,
    pub accept_policy: bool,
}

mapped!(
    SignupForm {
        username, password, name, company, address, lang_pref, phone_cc, phone,
        alt_phone_cc, alt_phone, fax_cc, fax, mobile_cc, mobile, vat_id,
        sms_consent, email_marketing_consent, accept_policy
    },
    || FieldTable::builder()
        .scalar("username")
        .on(Channel::SIGNUP, "username")
        .rule(Rule::Required)
        .rule(Rule::Email)
        .scalar("password")
        .on(Channel::SIGNUP, "passwd")
        .rule(Rule::Required)
        .rule(Rule::LenBetween(9, 16))
        .rule(Rule::Password)
        .scalar("name")
        .on(Channel::SIGNUP, "name")
        .rule(Rule::Required)
        .scalar("company")
        .on(Channel::SIGNUP, "company")
        .rule(Rule::Required)
        .nested("address")
        .on(Channel::SIGNUP, "address")
        .scalar("lang_pref")
        .on(Channel::SIGNUP, "lang-pref")
        .rule(Rule::Required)
        .scalar("phone_cc")
        .on(Channel::SIGNUP, "phone-cc")
        .rule(Rule::Required)
        .rule(Rule::LenBetween(1, 3))
        .rule(Rule::Numeric)
        .scalar("phone")
        .on(Channel::SIGNUP, "phone")
        .rule(Rule::Required)
        .rule(Rule::Numeric)
        .scalar("alt_phone_cc")
        .on(Channel::SIGNUP, "alt-phone-cc,optional")
        .rule(Rule::LenBetween(1, 3))
        .rule(Rule::Numeric)
        .scalar("alt_phone")
        .on(Channel::SIGNUP, "alt-phone,optional")
        .rule(Rule::Numeric)
        .scalar("fax_cc")
        .on(Channel::SIGNUP, "fax-cc,optional")
        .rule(Rule::LenBetween(1, 3))
        .rule(Rule::Numeric)
        .scalar("fax")
        .on(Channel::SIGNUP, "fax,optional")
        .rule(Rule::Numeric)
        // the upstream only accepts the capitalised mobile keys
        .scalar("mobile_cc")
        .on(Channel::SIGNUP, "Mobile-cc,optional")
        .rule(Rule::LenBetween(1, 3))
        .rule(Rule::Numeric)
        .scalar("mobile")
        .on(Channel::SIGNUP, "Mobile,optional")
        .rule(Rule::Numeric)
        .scalar("vat_id")
        .on(Channel::SIGNUP, "vat-id,optional")
        .scalar("sms_consent")
        .on(Channel::SIGNUP, "sms-consent,optional")
        .on_version(Channel::SIGNUP, SchemaVersion::V1, "-")
        .scalar("email_marketing_consent")
        .on(Channel::SIGNUP, "email-marketing-consent,optional")
        .on_version(Channel::SIGNUP, SchemaVersion::V1, "-")
        .scalar("accept_policy")
        .on(Channel::SIGNUP, "accept-policy,optional")
        .on_version(Channel::SIGNUP, SchemaVersion::V1, "-")
        .build()
);

/// Look a customer up by login e-mail or by numeric id; exactly one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerLookup {
    pub username: String,
    pub customer_id: String,
}

impl CustomerLookup {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn by_id(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            ..Default::default()
        }
    }

    /// E-mail addresses select `details`, decimal ids `details-by-id`.
    pub fn parse(id_or_email: &str) -> Result<Self, ApiError> {
        if is_email(id_or_email) {
            Ok(Self::by_username(id_or_email))
        } else if is_numeric(id_or_email) {
            Ok(Self::by_id(id_or_email))
        } else {
            Err(ApiError::InvalidIdentifier(id_or_email.to_string()))
        }
    }

    fn operation(&self) -> &'static str {
        if self.username.is_empty() {
            "details-by-id"
        } else {
            "details"
        }
    }
}

mapped!(CustomerLookup { username, customer_id }, || FieldTable::builder()
    .scalar("username")
    .on(Channel::DETAILS, "username,optional")
    .rule(Rule::Email)
    .scalar("customer_id")
    .on(Channel::DETAILS, "customer-id,optional")
    .rule(Rule::Numeric)
    .exactly_one_of(&["username", "customer_id"])
    .build());

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    #[serde(rename = "customerid")]
    pub id: String,
    pub username: String,
    #[serde(rename = "resellerid")]
    pub reseller_id: String,
    #[serde(rename = "parentid")]
    pub parent_id: String,
    pub name: String,
    pub company: String,
    #[serde(rename = "useremail")]
    pub email: String,
    #[serde(rename = "telnocc")]
    pub phone_cc: String,
    #[serde(rename = "telno")]
    pub phone: String,
    #[serde(rename = "mobilenocc")]
    pub mobile_cc: String,
    #[serde(rename = "mobileno")]
    pub mobile: String,
    #[serde(flatten)]
    pub address: PostalAddress,
    #[serde(rename = "stateid")]
    pub state_id: String,
    pub pin: String,
    #[serde(rename = "creationdt")]
    pub created: Option<UnixTime>,
    #[serde(rename = "customerstatus")]
    pub status: String,
    #[serde(rename = "salescontactid")]
    pub sales_contact_id: String,
    #[serde(rename = "langpref")]
    pub lang_pref: String,
    #[serde(rename = "totalreceipts")]
    pub total_receipts: Option<JsonFloat>,
    #[serde(rename = "twofactorauth_enabled")]
    pub two_factor: Option<JsonBool>,
    #[serde(rename = "twofactorsmsauth_enabled")]
    pub two_factor_sms: Option<JsonBool>,
    #[serde(rename = "twofactorgoogleauth_enabled")]
    pub two_factor_google: Option<JsonBool>,
    #[serde(rename = "isDominicanTaxConfiguredByParent")]
    pub dominican_tax_configured: Option<JsonBool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePassword {
    pub customer_id: String,
    pub new_password: String,
}

mapped!(ChangePassword { customer_id, new_password }, || FieldTable::builder()
    .scalar("customer_id")
    .on(Channel::MODIFY, "customer-id")
    .rule(Rule::Required)
    .rule(Rule::Numeric)
    .scalar("new_password")
    .on(Channel::MODIFY, "new-passwd")
    .rule(Rule::Required)
    .rule(Rule::LenBetween(9, 16))
    .rule(Rule::Password)
    .build());

impl ResellerClient {
    /// Sign up against the current (V2) schema.
    pub fn build_signup(&self, form: &SignupForm) -> Result<HttpRequest, ApiError> {
        self.build_signup_versioned(form, SchemaVersion::V2)
    }

    pub fn build_signup_versioned(
        &self,
        form: &SignupForm,
        version: SchemaVersion,
    ) -> Result<HttpRequest, ApiError> {
        let encoded = checked_form(form, Channel::SIGNUP, version)?;
        self.build_call(ApiCall::post(version.namespace(NAMESPACE), "signup", encoded))
    }

    /// Id of the new customer.
    pub fn parse_signup(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_id(&response)
    }

    pub fn build_customer_details(&self, lookup: &CustomerLookup) -> Result<HttpRequest, ApiError> {
        let form = checked_form(lookup, Channel::DETAILS, SchemaVersion::V1)?;
        self.build_call(ApiCall::get(NAMESPACE, lookup.operation(), form))
    }

    pub fn parse_customer_details(
        &self,
        response: HttpResponse,
    ) -> Result<CustomerDetails, ApiError> {
        parse_json(&response)
    }

    pub fn build_change_password(&self, change: &ChangePassword) -> Result<HttpRequest, ApiError> {
        let form = checked_form(change, Channel::MODIFY, SchemaVersion::V1)?;
        self.build_call(ApiCall::post(
            SchemaVersion::V2.namespace(NAMESPACE),
            "change-password",
            form,
        ))
    }

    /// A `false` body means the password was left unchanged.
    pub fn parse_change_password(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_true(&response, "customers/change-password")
    }
}
