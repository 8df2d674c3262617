//! In-memory stand-in for the reseller HTTP API.
//!
//! Serves a subset of the `contacts` and `customers` namespaces under
//! `/api` with the upstream's quirks: form-encoded input on GET and POST,
//! numbers and booleans sent as strings, prefixed keys in search results,
//! and `{status, message}` error bodies.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

/// Reseller id accepted as `auth-userid`.
pub const RESELLER_ID: &str = "1000";
/// Key accepted as `api-key`.
pub const API_KEY: &str = "mock-key";

/// Fixed creation time reported for every entity.
const CREATED_AT: &str = "1700000000";
const FIRST_ID: u64 = 100_000;

const CONTACT_REQUIRED: &[&str] = &[
    "name",
    "email",
    "company",
    "address-line-1",
    "city",
    "country",
    "zipcode",
    "phone-cc",
    "phone",
];

const SIGNUP_REQUIRED: &[&str] = &[
    "username",
    "passwd",
    "name",
    "company",
    "address-line-1",
    "city",
    "state",
    "country",
    "zipcode",
    "lang-pref",
    "phone-cc",
    "phone",
];

/// Decoded form or query string; keys may repeat.
#[derive(Debug, Default, Clone)]
pub struct Params(Vec<(String, String)>);

impl Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn require(&self, key: &str) -> Result<&str, Failure> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Failure::upstream(format!("Required parameter missing: {key}")))
    }

    fn require_all(&self, keys: &[&str]) -> Result<(), Failure> {
        keys.iter().try_for_each(|key| self.require(key).map(|_| ()))
    }

    fn id(&self, key: &str) -> Result<u64, Failure> {
        self.require(key)?
            .parse()
            .map_err(|_| Failure::upstream(format!("Invalid {key}")))
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

/// Error response in the upstream's `{status, message}` shape.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication failed".to_string(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "rejecting request");
        (
            self.status,
            Json(json!({"status": "ERROR", "message": self.message})),
        )
            .into_response()
    }
}

#[derive(Debug, Clone)]
struct Contact {
    customer_id: u64,
    contact_type: String,
    fields: BTreeMap<String, String>,
}

impl Contact {
    fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    fn details(&self, id: u64) -> Value {
        json!({
            "entityid": id.to_string(),
            "contactid": id.to_string(),
            "type": self.contact_type,
            "customerid": self.customer_id.to_string(),
            "parentkey": RESELLER_ID,
            "name": self.field("name"),
            "company": self.field("company"),
            "emailaddr": self.field("email"),
            "address1": self.field("address-line-1"),
            "address2": self.field("address-line-2"),
            "address3": self.field("address-line-3"),
            "city": self.field("city"),
            "state": self.field("state"),
            "country": self.field("country"),
            "zip": self.field("zipcode"),
            "telnocc": self.field("phone-cc"),
            "telno": self.field("phone"),
            "faxnocc": self.field("fax-cc"),
            "faxno": self.field("fax"),
            "currentstatus": "Active",
            "contactstatus": "Active",
            "creationdt": CREATED_AT,
            "designated-agent": "false",
        })
    }

    fn search_entry(&self, id: u64) -> Value {
        json!({
            "entity.entityid": id.to_string(),
            "entity.customerid": self.customer_id.to_string(),
            "entity.currentstatus": "Active",
            "contact.type": self.contact_type,
            "contact.name": self.field("name"),
            "contact.company": self.field("company"),
            "contact.emailaddr": self.field("email"),
            "contact.city": self.field("city"),
            "contact.country": self.field("country"),
        })
    }
}

#[derive(Debug, Clone)]
struct Customer {
    fields: BTreeMap<String, String>,
}

impl Customer {
    fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    fn details(&self, id: u64) -> Value {
        json!({
            "customerid": id.to_string(),
            "username": self.field("username"),
            "resellerid": RESELLER_ID,
            "parentid": RESELLER_ID,
            "name": self.field("name"),
            "company": self.field("company"),
            "useremail": self.field("username"),
            "telnocc": self.field("phone-cc"),
            "telno": self.field("phone"),
            "address1": self.field("address-line-1"),
            "city": self.field("city"),
            "state": self.field("state"),
            "country": self.field("country"),
            "zip": self.field("zipcode"),
            "langpref": self.field("lang-pref"),
            "creationdt": CREATED_AT,
            "customerstatus": "Active",
            "totalreceipts": "0.00",
            "twofactorauth_enabled": "false",
        })
    }
}

#[derive(Debug)]
pub struct Store {
    next_id: u64,
    contacts: BTreeMap<u64, Contact>,
    customers: BTreeMap<u64, Customer>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            contacts: BTreeMap::new(),
            customers: BTreeMap::new(),
        }
    }
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contact(&self, params: &Params) -> Result<(u64, &Contact), Failure> {
        let id = params.id("contact-id")?;
        self.contacts
            .get(&id)
            .map(|c| (id, c))
            .ok_or_else(|| Failure::upstream(format!("Invalid Contact Id: {id}")))
    }

    fn customer_exists(&self, id: u64) -> Result<(), Failure> {
        if self.customers.contains_key(&id) {
            Ok(())
        } else {
            Err(Failure::upstream(format!("Invalid Customer Id: {id}")))
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/contacts/add.json", post(add_contact))
        .route("/api/contacts/details.json", get(contact_details))
        .route("/api/contacts/modify.json", post(modify_contact))
        .route("/api/contacts/search.json", get(search_contacts))
        .route("/api/contacts/delete.json", post(delete_contact))
        .route("/api/customers/v2/signup.json", post(signup))
        .route("/api/customers/details.json", get(customer_details))
        .route("/api/customers/details-by-id.json", get(customer_details_by_id))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Form extractor that reads the query string on GET and the body on POST.
type Input = Form<Vec<(String, String)>>;

fn authenticate(Form(pairs): Input) -> Result<Params, Failure> {
    let params = Params(pairs);
    if params.get("auth-userid") == Some(RESELLER_ID) && params.get("api-key") == Some(API_KEY) {
        Ok(params)
    } else {
        Err(Failure::unauthorized())
    }
}

fn action(id: u64, eaq_id: u64, kind: &str, description: &str) -> Value {
    json!({
        "eaqid": eaq_id.to_string(),
        "entityid": id.to_string(),
        "actiontype": kind,
        "actiontypedesc": description,
        "actionstatus": "Success",
        "actionstatusdesc": "Action completed successfully.",
    })
}

fn contact_fields(params: &Params) -> BTreeMap<String, String> {
    CONTACT_REQUIRED
        .iter()
        .chain(&["address-line-2", "address-line-3", "state", "fax-cc", "fax"])
        .filter_map(|key| Some((key.to_string(), params.get(key)?.to_string())))
        .collect()
}

async fn add_contact(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    params.require_all(CONTACT_REQUIRED)?;
    let customer_id = params.id("customer-id")?;
    let contact_type = params.require("type")?.to_string();

    let mut store = db.write().await;
    store.customer_exists(customer_id)?;
    let id = store.allocate_id();
    store.contacts.insert(
        id,
        Contact {
            customer_id,
            contact_type,
            fields: contact_fields(&params),
        },
    );
    debug!(id, customer_id, "contact added");
    // ids are sent as bare numbers
    Ok(Json(json!(id)))
}

async fn contact_details(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    let store = db.read().await;
    let (id, contact) = store.contact(&params)?;
    Ok(Json(contact.details(id)))
}

/// The upstream replaces the whole contact, so every mandatory field must
/// be present again.
async fn modify_contact(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    params.require_all(CONTACT_REQUIRED)?;

    let mut store = db.write().await;
    let (id, _) = store.contact(&params)?;
    let eaq_id = store.allocate_id();
    if let Some(contact) = store.contacts.get_mut(&id) {
        contact.fields = contact_fields(&params);
    }
    debug!(id, "contact modified");
    Ok(Json(action(id, eaq_id, "Mod", "Modification of Contact Details")))
}

async fn search_contacts(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    let customer_id = params.id("customer-id")?;
    let limit = params.id("no-of-records")? as usize;
    let page = params.id("page-no")?.max(1) as usize;
    let names = params.all("name");

    let store = db.read().await;
    let matching: Vec<Value> = store
        .contacts
        .iter()
        .filter(|(_, c)| c.customer_id == customer_id)
        .filter(|(_, c)| names.is_empty() || names.contains(&c.field("name")))
        .map(|(id, c)| c.search_entry(*id))
        .collect();
    let result: Vec<Value> = matching
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .cloned()
        .collect();

    Ok(Json(json!({
        "recsonpage": result.len().to_string(),
        "recsindb": matching.len().to_string(),
        "result": result,
    })))
}

async fn delete_contact(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    let mut store = db.write().await;
    let (id, _) = store.contact(&params)?;
    store.contacts.remove(&id);
    let eaq_id = store.allocate_id();
    debug!(id, "contact deleted");
    Ok(Json(action(id, eaq_id, "Del", "Deletion of Contact")))
}

async fn signup(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    params.require_all(SIGNUP_REQUIRED)?;
    let username = params.text("username");

    let mut store = db.write().await;
    if store
        .customers
        .values()
        .any(|c| c.field("username") == username)
    {
        return Err(Failure::upstream(format!(
            "{username} is already a Customer."
        )));
    }
    let id = store.allocate_id();
    let fields = SIGNUP_REQUIRED
        .iter()
        .filter(|key| **key != "passwd")
        .map(|key| (key.to_string(), params.text(key)))
        .collect();
    store.customers.insert(id, Customer { fields });
    debug!(id, "customer signed up");
    // signup answers with a quoted id
    Ok(Json(json!(id.to_string())))
}

async fn customer_details(State(db): State<Db>, input: Input) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    let username = params.require("username")?;
    let store = db.read().await;
    store
        .customers
        .iter()
        .find(|(_, c)| c.field("username") == username)
        .map(|(id, c)| Json(c.details(*id)))
        .ok_or_else(|| Failure::upstream(format!("Invalid username: {username}")))
}

async fn customer_details_by_id(
    State(db): State<Db>,
    input: Input,
) -> Result<Json<Value>, Failure> {
    let params = authenticate(input)?;
    let id = params.id("customer-id")?;
    let store = db.read().await;
    store
        .customers
        .get(&id)
        .map(|c| Json(c.details(id)))
        .ok_or_else(|| Failure::upstream(format!("Invalid Customer Id: {id}")))
}
