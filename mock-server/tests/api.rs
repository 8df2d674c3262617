use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, API_KEY, RESELLER_ID};
use serde_json::Value;
use tower::ServiceExt;

const AUTH: &str = "auth-userid=1000&api-key=mock-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_post(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(format!("{body}&{AUTH}"))
        .unwrap()
}

fn query_get(path: &str, query: &str) -> Request<String> {
    Request::builder()
        .uri(format!("{path}?{AUTH}&{query}"))
        .body(String::new())
        .unwrap()
}

const SIGNUP: &str = "username=budi%40example.co.id&passwd=Rahasia%212024&name=Budi&company=PT+Contoh\
&address-line-1=Jl.+Sudirman+1&city=Jakarta&state=DKI+Jakarta&country=ID&zipcode=10220\
&lang-pref=en&phone-cc=62&phone=215550100";

const CONTACT: &str = "type=Contact&customer-id=100000&name=Alice&email=alice%40example.com\
&company=N%2FA&address-line-1=1+Main+St&city=New+York&country=US&zipcode=10001\
&phone-cc=1&phone=5550100";

#[test]
fn credentials_match_auth_query() {
    assert_eq!(AUTH, format!("auth-userid={RESELLER_ID}&api-key={API_KEY}"));
}

// --- auth ---

#[tokio::test]
async fn wrong_key_is_rejected_with_status_envelope() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/customers/details-by-id.json?auth-userid=1000&api-key=nope&customer-id=1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["message"], "Authentication failed");
}

// --- customers ---

#[tokio::test]
async fn signup_returns_quoted_id() {
    let resp = app()
        .oneshot(form_post("/api/customers/v2/signup.json", SIGNUP))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"\"100000\"");
}

#[tokio::test]
async fn signup_missing_field_returns_500() {
    let resp = app()
        .oneshot(form_post("/api/customers/v2/signup.json", "username=x%40example.com"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Required parameter missing: passwd");
}

#[tokio::test]
async fn unknown_customer_id() {
    let resp = app()
        .oneshot(query_get("/api/customers/details-by-id.json", "customer-id=42"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["message"], "Invalid Customer Id: 42");
}

#[tokio::test]
async fn contact_needs_existing_customer() {
    let resp = app()
        .oneshot(form_post("/api/contacts/add.json", CONTACT))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await["message"],
        "Invalid Customer Id: 100000"
    );
}

#[tokio::test]
async fn get_with_form_content_is_read_from_query() {
    let resp = app()
        .oneshot(query_get("/api/contacts/details.json", "contact-id=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["message"], "Invalid contact-id");
}

// --- full customer/contact lifecycle ---

#[tokio::test]
async fn contact_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // signup
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post("/api/customers/v2/signup.json", SIGNUP))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // customer by username
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(query_get(
            "/api/customers/details.json",
            "username=budi%40example.co.id",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let customer = body_json(resp).await;
    assert_eq!(customer["customerid"], "100000");
    assert_eq!(customer["totalreceipts"], "0.00");

    // add contact
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post("/api/contacts/add.json", CONTACT))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let id = body_json(resp).await;
    assert_eq!(id, 100_001);

    // modify with a partial form is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post(
            "/api/contacts/modify.json",
            "contact-id=100001&phone=5550123",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await["message"],
        "Required parameter missing: name"
    );

    // modify with the full form
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post(
            "/api/contacts/modify.json",
            &format!("contact-id=100001&{}", CONTACT.replace("5550100", "5550123")),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let action = body_json(resp).await;
    assert_eq!(action["entityid"], "100001");
    assert_eq!(action["actionstatus"], "Success");

    // details reflect the change
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(query_get("/api/contacts/details.json", "contact-id=100001"))
        .await
        .unwrap();
    let details = body_json(resp).await;
    assert_eq!(details["telno"], "5550123");
    assert_eq!(details["city"], "New York");

    // search returns prefixed keys
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(query_get(
            "/api/contacts/search.json",
            "customer-id=100000&no-of-records=10&page-no=1",
        ))
        .await
        .unwrap();
    let search = body_json(resp).await;
    assert_eq!(search["recsindb"], "1");
    assert_eq!(search["result"][0]["contact.name"], "Alice");
    assert_eq!(search["result"][0]["entity.entityid"], "100001");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post("/api/contacts/delete.json", "contact-id=100001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["actiontype"], "Del");

    // details after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(query_get("/api/contacts/details.json", "contact-id=100001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
