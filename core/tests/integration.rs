//! Customer and contact lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client's
//! `build_*` / `parse_*` pairs over real HTTP using ureq. The modify step
//! sends a partial change set, so it only succeeds if the resolver fills the
//! mandatory fields back in from the fetched contact.

use reseller_core::api::contact::{Contact, ContactCriteria, ContactType};
use reseller_core::api::customer::{CustomerLookup, SignupForm};
use reseller_core::api::PostalAddress;
use reseller_core::{
    ApiError, ClientConfig, Environment, HttpMethod, HttpRequest, HttpResponse, ResellerClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Non-2xx statuses come back as data so the client can read the
/// upstream's error envelope.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let content_type = req.header("content-type").unwrap_or_default().to_string();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type(content_type)
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: std::net::SocketAddr, api_key: &str) -> ResellerClient {
    let config = ClientConfig::new(mock_server::RESELLER_ID, api_key, Environment::Test)
        .unwrap()
        .with_base_url(&format!("http://{addr}/api"));
    ResellerClient::new(config)
}

fn address() -> PostalAddress {
    PostalAddress {
        line1: "1 Main St".into(),
        city: "New York".into(),
        state: "NY".into(),
        country: "US".into(),
        zipcode: "10001".into(),
        ..Default::default()
    }
}

#[test]
fn customer_and_contact_lifecycle() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    // Step 1: sign a customer up.
    let signup = SignupForm {
        username: "alice@example.com".into(),
        password: "Secret#2024".into(),
        name: "Alice".into(),
        company: "N/A".into(),
        address: address(),
        lang_pref: "en".into(),
        phone_cc: "1".into(),
        phone: "5550100".into(),
        accept_policy: true,
        ..Default::default()
    };
    let req = client.build_signup(&signup).unwrap();
    let customer_id = client.parse_signup(execute(req)).unwrap();
    assert_eq!(customer_id, "100000");

    // Step 2: look the customer up by e-mail and by id.
    let req = client
        .build_customer_details(&CustomerLookup::parse("alice@example.com").unwrap())
        .unwrap();
    let by_name = client.parse_customer_details(execute(req)).unwrap();
    assert_eq!(by_name.id, customer_id);
    assert_eq!(by_name.address.city, "New York");
    assert_eq!(by_name.created.unwrap().get().timestamp(), 1_700_000_000);

    let req = client
        .build_customer_details(&CustomerLookup::by_id(&customer_id))
        .unwrap();
    let by_id = client.parse_customer_details(execute(req)).unwrap();
    assert_eq!(by_id.username, "alice@example.com");

    // Step 3: add a contact owned by the customer.
    let contact = Contact {
        contact_type: ContactType::Contact,
        customer_id: customer_id.clone(),
        name: "Alice".into(),
        email: "alice@example.com".into(),
        company: "N/A".into(),
        address: address(),
        phone_cc: "1".into(),
        phone: "5550100".into(),
        ..Default::default()
    };
    let req = client.build_add_contact(&contact).unwrap();
    let contact_id = client.parse_add_contact(execute(req)).unwrap();
    assert_eq!(contact_id, "100001");

    // Step 4: fetch it back as the baseline for a partial update.
    let req = client.build_contact_details(&contact_id).unwrap();
    let baseline = client.parse_contact_details(execute(req)).unwrap();
    assert_eq!(baseline.id, contact_id);
    assert_eq!(baseline.email, "alice@example.com");
    assert_eq!(baseline.status, "Active");

    // Step 5: change only the phone number.
    let changes = Contact {
        phone: "5550123".into(),
        ..Default::default()
    };
    let req = client.build_modify_contact(&changes, &baseline).unwrap();
    let action = client.parse_modify_contact(execute(req)).unwrap();
    assert_eq!(action.entity_id, contact_id);
    assert_eq!(action.status, "Success");

    let req = client.build_contact_details(&contact_id).unwrap();
    let updated = client.parse_contact_details(execute(req)).unwrap();
    assert_eq!(updated.phone, "5550123");
    assert_eq!(updated.name, "Alice");
    assert_eq!(updated.address.city, "New York");

    // Step 6: search by customer.
    let req = client
        .build_search_contacts(&ContactCriteria::for_customer(&customer_id))
        .unwrap();
    let found = client.parse_search_contacts(execute(req)).unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.on_page, 1);
    assert_eq!(found.contacts[0].name, "Alice");
    assert_eq!(found.contacts[0].id, contact_id);

    // Step 7: delete, then the contact is gone.
    let req = client.build_delete_contact(&contact_id).unwrap();
    let action = client.parse_delete_contact(execute(req)).unwrap();
    assert_eq!(action.kind, "Del");

    let req = client.build_contact_details(&contact_id).unwrap();
    let err = client.parse_contact_details(execute(req)).unwrap_err();
    match err {
        ApiError::Upstream { status, message } => {
            assert_eq!(status, "ERROR");
            assert_eq!(message, format!("invalid contact id: {contact_id}"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
fn wrong_api_key_is_an_upstream_error() {
    let addr = start_server();
    let client = client_for(addr, "not-the-key");

    let req = client
        .build_customer_details(&CustomerLookup::by_id("100000"))
        .unwrap();
    let err = client.parse_customer_details(execute(req)).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Upstream { ref message, .. } if message == "authentication failed"
    ));
}

#[test]
fn invalid_input_never_reaches_the_server() {
    let client = client_for("127.0.0.1:9".parse().unwrap(), mock_server::API_KEY);

    let contact = Contact {
        customer_id: "100000".into(),
        name: "Alice".into(),
        email: "not-an-email".into(),
        company: "N/A".into(),
        address: address(),
        phone_cc: "1".into(),
        phone: "5550100".into(),
        ..Default::default()
    };
    let err = client.build_add_contact(&contact).unwrap_err();
    match err {
        ApiError::Validation(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "email");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
