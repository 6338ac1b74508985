use roster_client::HttpUserApi;
use roster_form::{FormController, FormError, ValidationError};
use roster_types::{Field, SubmitMode};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ann_list() -> Value {
    json!({
        "users": [
            {"id": "1", "data": {"first_name": "Ann", "last_name": "Lee", "email": "a@x.com", "phone": "111"}}
        ]
    })
}

async fn controller(server: &MockServer) -> FormController<HttpUserApi> {
    let api = HttpUserApi::new(Url::parse(&server.uri()).unwrap()).unwrap();
    FormController::new(api)
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ann_list()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/user/delete/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": "1"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/user/delete/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut form = controller(&server).await;
    form.load().await.unwrap();
    assert_eq!(form.users().len(), 1);

    form.delete("1").await.unwrap();
    assert!(form.users().is_empty());

    let err = form.delete("1").await.unwrap_err();
    assert!(matches!(err, FormError::Api(ref e) if e.is_not_found()));
    assert!(form.users().is_empty());

    // load, delete, reload, failed delete: no reload after the failure.
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_sends_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ann_list()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = controller(&server).await;
    form.load().await.unwrap();
    form.update_field(Field::FirstName, "Bob");
    form.update_field(Field::LastName, "Ray");
    form.update_field(Field::Email, "b@x.com");
    form.update_field(Field::Phone, "222");

    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.mode, SubmitMode::Create);
    assert_eq!(outcome.response, json!({"status": "ok"}));
    assert!(!form.draft().is_editing());
    assert!(form.draft().fields.first_name.is_empty());

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["id"], json!(outcome.id));
    assert_eq!(body["first_name"], json!("Bob"));
    assert_eq!(body["phone"], json!("222"));

    let gets = requests
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(gets, 2);
}

#[tokio::test]
async fn test_duplicate_name_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ann_list()))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = controller(&server).await;
    form.load().await.unwrap();
    form.update_field(Field::FirstName, "ANN");
    form.update_field(Field::LastName, "lee");
    form.update_field(Field::Email, "other@x.com");
    form.update_field(Field::Phone, "999");

    let err = form.submit().await.unwrap_err();
    assert!(matches!(
        err,
        FormError::Validation(ValidationError::DuplicateName)
    ));
    assert_eq!(err.to_string(), "Duplicate name");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_update_keeps_edit_draft() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ann_list()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user/update/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut form = controller(&server).await;
    form.load().await.unwrap();
    form.begin_edit_by_id("1").unwrap();
    form.update_field(Field::Email, "ann@x.com");

    assert!(matches!(form.submit().await, Err(FormError::Api(_))));
    assert_eq!(form.draft().id, "1");
    assert_eq!(form.draft().fields.email, "ann@x.com");
    assert_eq!(form.users()[0].data.email, "a@x.com");
}
