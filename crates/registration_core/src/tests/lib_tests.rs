use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Option<RegistrationRequest>>>,
    reply_status: StatusCode,
    reply_body: Option<String>,
}

async fn handle_register(
    State(state): State<StubState>,
    Json(payload): Json<RegistrationRequest>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.captured.lock().await = Some(payload);
    (state.reply_status, state.reply_body.clone().unwrap_or_default())
}

async fn spawn_stub(reply_status: StatusCode, reply_body: Option<&str>) -> Result<(String, StubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StubState {
        hits: Arc::new(AtomicUsize::new(0)),
        captured: Arc::new(Mutex::new(None)),
        reply_status,
        reply_body: reply_body.map(str::to_string),
    };
    let app = Router::new()
        .route(REGISTER_PATH, post(handle_register))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn controller_for(server_url: &str) -> RegistrationController {
    let client = RegistrationClient::new(server_url).expect("parse stub url");
    RegistrationController::new(client)
}

#[tokio::test]
async fn successful_submit_reports_success_and_clears_fields() {
    let (server_url, stub) = spawn_stub(StatusCode::OK, Some(r#"{"message":"welcome"}"#))
        .await
        .expect("spawn stub");
    let mut controller = controller_for(&server_url);

    let state = controller.submit("alice", "a@b.com").await;

    assert_eq!(
        state,
        SubmissionState::Succeeded {
            message: "welcome".to_string()
        }
    );
    assert_eq!(controller.form(), &RegistrationForm::default());
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);

    let captured = stub.captured.lock().await.clone().expect("captured request");
    assert_eq!(captured.username, "alice");
    assert_eq!(captured.email, "a@b.com");
}

#[tokio::test]
async fn blank_fields_fail_validation_without_touching_the_network() {
    let (server_url, stub) = spawn_stub(StatusCode::OK, Some(r#"{"message":"welcome"}"#))
        .await
        .expect("spawn stub");
    let mut controller = controller_for(&server_url);

    for (username, email) in [("", "a@b.com"), ("   ", "a@b.com"), ("alice", ""), ("alice", " \t")]
    {
        let state = controller.submit(username, email).await;
        assert_eq!(
            state,
            SubmissionState::Failed {
                message: FILL_ALL_FIELDS_MESSAGE.to_string()
            }
        );
    }

    assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn success_without_usable_message_is_ambiguous_and_keeps_fields() {
    for body in ["{}", r#"{"message":""}"#, r#"{"message":null}"#, "created"] {
        let (server_url, _stub) = spawn_stub(StatusCode::OK, Some(body))
            .await
            .expect("spawn stub");
        let mut controller = controller_for(&server_url);

        let state = controller.submit("alice", "a@b.com").await;

        assert_eq!(
            state,
            SubmissionState::AmbiguousSuccess {
                message: AMBIGUOUS_RESPONSE_MESSAGE.to_string()
            },
            "body {body:?} should be ambiguous"
        );
        assert_eq!(controller.form(), &RegistrationForm::new("alice", "a@b.com"));
    }
}

#[tokio::test]
async fn rejection_surfaces_the_server_message() {
    let (server_url, _stub) = spawn_stub(
        StatusCode::BAD_REQUEST,
        Some(r#"{"message":"username already taken"}"#),
    )
    .await
    .expect("spawn stub");
    let mut controller = controller_for(&server_url);

    let state = controller.submit("alice", "a@b.com").await;

    assert_eq!(
        state,
        SubmissionState::Failed {
            message: "username already taken".to_string()
        }
    );
    assert_eq!(controller.form(), &RegistrationForm::new("alice", "a@b.com"));
}

#[tokio::test]
async fn rejection_without_usable_message_falls_back_to_the_generic_text() {
    for (status, body) in [
        (StatusCode::INTERNAL_SERVER_ERROR, None),
        (StatusCode::BAD_REQUEST, Some(r#"{"message":""}"#)),
        (StatusCode::BAD_GATEWAY, Some("oops")),
    ] {
        let (server_url, _stub) = spawn_stub(status, body).await.expect("spawn stub");
        let mut controller = controller_for(&server_url);

        let state = controller.submit("alice", "a@b.com").await;

        assert_eq!(
            state,
            SubmissionState::Failed {
                message: GENERIC_FAILURE_MESSAGE.to_string()
            },
            "status {status} body {body:?} should fall back"
        );
    }
}

#[tokio::test]
async fn unreachable_endpoint_fails_with_the_generic_text() {
    // Bind then drop to get an address nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let mut controller = controller_for(&format!("http://{addr}"));
    let state = controller.submit("alice", "a@b.com").await;

    assert_eq!(
        state,
        SubmissionState::Failed {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn transitions_pass_through_submitting_on_every_network_outcome() {
    for (status, body, terminal_is) in [
        (StatusCode::OK, r#"{"message":"welcome"}"#, "succeeded"),
        (StatusCode::OK, "{}", "ambiguous_success"),
        (StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#, "failed"),
    ] {
        let (server_url, _stub) = spawn_stub(status, Some(body)).await.expect("spawn stub");
        let mut controller = controller_for(&server_url);
        let mut events = controller.subscribe();

        controller.submit("alice", "a@b.com").await;

        assert_eq!(
            events.try_recv().expect("first transition"),
            SubmissionState::Submitting
        );
        let terminal = events.try_recv().expect("second transition");
        assert!(terminal.is_terminal());
        assert_eq!(terminal.name(), terminal_is);
        assert!(events.try_recv().is_err(), "no extra transitions expected");
    }
}

#[tokio::test]
async fn validation_failure_emits_a_single_terminal_transition() {
    let (server_url, _stub) = spawn_stub(StatusCode::OK, None).await.expect("spawn stub");
    let mut controller = controller_for(&server_url);
    let mut events = controller.subscribe();

    controller.submit("", "").await;

    assert_eq!(
        events.try_recv().expect("transition"),
        SubmissionState::Failed {
            message: FILL_ALL_FIELDS_MESSAGE.to_string()
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn editing_fields_returns_a_finished_attempt_to_idle() {
    let (server_url, _stub) = spawn_stub(StatusCode::BAD_REQUEST, Some(r#"{"message":"nope"}"#))
        .await
        .expect("spawn stub");
    let mut controller = controller_for(&server_url);

    controller.submit("alice", "a@b.com").await;
    assert!(controller.state().is_terminal());

    controller.note_fields_edited();
    assert_eq!(controller.state(), &SubmissionState::Idle);

    // A second edit is a no-op; the machine is already idle.
    controller.note_fields_edited();
    assert_eq!(controller.state(), &SubmissionState::Idle);
}

#[tokio::test]
async fn the_form_is_reusable_after_a_failure() {
    let (bad_url, _bad_stub) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, None)
        .await
        .expect("spawn stub");
    let mut controller = controller_for(&bad_url);

    let state = controller.submit("alice", "a@b.com").await;
    assert_eq!(state.severity(), StatusSeverity::Error);

    // Same controller, second attempt straight from the terminal state.
    let state = controller.submit("", "a@b.com").await;
    assert_eq!(
        state,
        SubmissionState::Failed {
            message: FILL_ALL_FIELDS_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn client_appends_the_register_path_to_the_server_root() {
    let client = RegistrationClient::new("http://127.0.0.1:9").expect("parse url");
    assert_eq!(client.endpoint().path(), REGISTER_PATH);
}
