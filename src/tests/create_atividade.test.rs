use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::{json, Value};

use crate::apis_mock::{
    login_request, multipart_request, session_cookie, test_app, TestState, ADMIN_PASSWORD,
};
use crate::constants::{MESSAGE_ACCESS_DENIED, MESSAGE_REQUIRED_FIELDS};

#[actix_rt::test]
async fn form_create_then_json_list() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;
    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = multipart_request("/atividades", &[("materia", "Math"), ("descricao", "HW1")], None)
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let req = test::TestRequest::get().uri("/atividades").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        list,
        json!([{
            "id": 1,
            "subject": "Math",
            "description": "HW1",
            "grade": null,
            "dueDate": null,
            "attachment": null
        }])
    );
}

#[actix_rt::test]
async fn form_create_requires_admin() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;

    let req = multipart_request("/atividades", &[("materia", "Math"), ("descricao", "HW1")], None)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(test::read_body(resp).await, MESSAGE_ACCESS_DENIED);

    assert!(state.service.list().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn form_create_with_missing_fields_is_rejected() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;
    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = multipart_request("/atividades", &[("materia", "Math"), ("descricao", "")], None)
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, MESSAGE_REQUIRED_FIELDS);

    assert!(state.service.list().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn form_create_with_grade_and_due_date() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;
    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = multipart_request(
        "/atividades",
        &[
            ("materia", "Física"),
            ("descricao", "Relatório"),
            ("nota", "8.5"),
            ("dataEntrega", "2024-05-01"),
        ],
        None,
    )
    .cookie(cookie.clone())
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let req = multipart_request(
        "/atividades",
        &[("materia", "Física"), ("descricao", "Relatório"), ("nota", "oito")],
        None,
    )
    .cookie(cookie)
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/atividades/1").to_request();
    let atividade: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(atividade["grade"], json!(8.5));
    assert_eq!(atividade["dueDate"], json!("2024-05-01"));
    assert_eq!(state.service.list().await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn json_create_validates_and_is_gated() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;

    let req = test::TestRequest::post()
        .uri("/atividades")
        .set_json(json!({"subject": "Math", "description": "HW1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": MESSAGE_ACCESS_DENIED}));

    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = test::TestRequest::post()
        .uri("/atividades")
        .cookie(cookie.clone())
        .set_json(json!({"subject": "Math"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": MESSAGE_REQUIRED_FIELDS}));
    assert!(state.service.list().await.unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/atividades")
        .cookie(cookie)
        .set_json(json!({"materia": "Math", "descricao": "HW1", "nota": 10}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["grade"], json!(10.0));
}

#[actix_rt::test]
async fn json_create_checks_the_gate_before_the_body() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;

    let req = test::TestRequest::post()
        .uri("/atividades")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": MESSAGE_ACCESS_DENIED}));

    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let req = test::TestRequest::post()
        .uri("/atividades")
        .cookie(cookie)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    assert!(state.service.list().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn urlencoded_form_create() {
    let state = TestState::memory();
    let app = test::init_service(test_app(&state)).await;

    let req = test::TestRequest::post()
        .uri("/atividades")
        .set_form([("materia", "Math"), ("descricao", "HW1")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, login_request(ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = test::TestRequest::post()
        .uri("/atividades")
        .cookie(cookie.clone())
        .set_form([("materia", "Math"), ("descricao", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, MESSAGE_REQUIRED_FIELDS);

    let req = test::TestRequest::post()
        .uri("/atividades")
        .cookie(cookie)
        .set_form([
            ("materia", "Math"),
            ("descricao", "HW1"),
            ("nota", "8.5"),
            ("dataEntrega", "2024-05-01"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let stored = state.service.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subject, "Math");
    assert_eq!(stored[0].grade, Some(8.5));
    assert_eq!(stored[0].attachment, None);
}
