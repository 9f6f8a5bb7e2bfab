use super::*;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "5b1d6c0e-2f43-4a8e-9d0b-7c3e1f2a9b64";

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest, "invalid_request")]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized, "unauthorized")]
#[case(Error::forbidden("x"), ErrorCode::Forbidden, "forbidden")]
#[case(Error::not_found("x"), ErrorCode::NotFound, "not_found")]
#[case(Error::conflict("x"), ErrorCode::Conflict, "conflict")]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable, "service_unavailable")]
#[case(Error::internal("x"), ErrorCode::InternalError, "internal_error")]
fn shorthand_sets_code_and_wire_name(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] wire: &str,
) {
    assert_eq!(error.code(), code);
    assert_eq!(serde_json::to_value(code).expect("serialise code"), json!(wire));
}

#[rstest]
fn outside_a_request_there_is_no_trace_id() {
    assert_eq!(Error::internal("boom").trace_id(), None);
}

#[rstest]
#[tokio::test]
async fn inside_a_request_the_trace_id_is_captured() {
    let id: TraceId = TRACE_ID.parse().expect("uuid");

    let error = TraceId::scope(id, async { Error::not_found("No such post.") }).await;

    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn envelope_omits_absent_fields() {
    let value = serde_json::to_value(Error::forbidden("Not yours.")).expect("serialise");

    assert_eq!(value, json!({"code": "forbidden", "message": "Not yours."}));
}

#[rstest]
fn envelope_uses_camel_case_trace_id() {
    let error = Error::invalid_request("Title is required.")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "title"}));

    assert_eq!(
        serde_json::to_value(&error).expect("serialise"),
        json!({
            "code": "invalid_request",
            "message": "Title is required.",
            "traceId": TRACE_ID,
            "details": {"field": "title"},
        })
    );
}

#[rstest]
fn envelope_deserialises_without_optional_fields() {
    let error: Error =
        serde_json::from_value(json!({"code": "conflict", "message": "taken"})).expect("parse");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.details(), None);
}
