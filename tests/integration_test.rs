use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::tempdir;

/// Command with a clean credential environment.
fn todoist() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("todoist"));
    cmd.env_remove("TODOIST_API_TOKEN")
        .env_remove("TODOIST_OAUTH_TOKEN")
        .env_remove("TODOIST_CLIENT_ID")
        .env_remove("TODOIST_REDIRECT_URI")
        .env_remove("TODOIST_OAUTH_STATE_PATH")
        .env_remove("TODOIST_RETRY_MAX_ATTEMPTS")
        .env_remove("TODOIST_RETRY_BACKOFF");
    cmd
}

#[test]
fn test_list_projects_with_static_token() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/projects")
        .match_header("Authorization", "Bearer static_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"1","name":"Inbox"},{"id":"2","name":"Barcelona Trip"}]"#)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "static_token")
        .args(["projects", "list", "--api-url", &server.url()])
        .assert()
        .success()
        .stdout("ID: 1, Name: Inbox\nID: 2, Name: Barcelona Trip\n");

    mock.assert();
}

#[test]
fn test_oauth_token_overrides_static_token() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/tasks")
        .match_header("Authorization", "Bearer oauth_token")
        .match_query(Matcher::UrlEncoded("filter".into(), "today".into()))
        .with_status(200)
        .with_body(r#"[{"id":"7","content":"Pack bags","priority":1}]"#)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "static_token")
        .env("TODOIST_OAUTH_TOKEN", "oauth_token")
        .args(["tasks", "list", "--filter", "today", "--api-url", &server.url()])
        .assert()
        .success()
        .stdout("ID: 7, Content: Pack bags\n");

    mock.assert();
}

#[test]
fn test_missing_credentials_fail_with_remediation() {
    todoist()
        .args(["projects", "list", "--api-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TODOIST_API_TOKEN"));
}

#[test]
fn test_close_task() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/tasks/42/close")
        .with_status(204)
        .create();

    todoist()
        .args(["--oauth-token", "tok", "tasks", "close", "42"])
        .args(["--api-url", &server.url()])
        .assert()
        .success()
        .stdout("Closed task 42\n");

    mock.assert();
}

#[test]
fn test_add_task_prints_created_task() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/tasks")
        .match_body(Matcher::Json(serde_json::json!({
            "content": "Book flights",
            "priority": 4
        })))
        .with_status(200)
        .with_body(r#"{"id":"99","content":"Book flights","priority":4}"#)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "tok")
        .args(["tasks", "add", "Book flights", "--priority", "4"])
        .args(["--api-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "99""#));

    mock.assert();
}

#[test]
fn test_not_found_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("DELETE", "/tasks/404")
        .with_status(404)
        .with_body("Task not found")
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "tok")
        .args(["tasks", "delete", "404", "--api-url", &server.url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}

#[test]
fn test_retries_service_unavailable() {
    let mut server = Server::new();
    let unavailable = server
        .mock("GET", "/projects")
        .with_status(503)
        .expect(2)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "tok")
        .env("TODOIST_RETRY_DELAY_MS", "1")
        .args(["projects", "list", "--retries", "1", "--api-url", &server.url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));

    unavailable.assert();
}

#[test]
fn test_retry_count_from_environment() {
    let mut server = Server::new();
    let unavailable = server
        .mock("GET", "/projects")
        .with_status(503)
        .expect(3)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "tok")
        .env("TODOIST_RETRY_MAX_ATTEMPTS", "2")
        .env("TODOIST_RETRY_DELAY_MS", "1")
        .env("TODOIST_RETRY_BACKOFF", "inf")
        .args(["projects", "list", "--api-url", &server.url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));

    unavailable.assert();
}

#[test]
fn test_task_id_cannot_escape_tasks_path() {
    let mut server = Server::new();
    let project = server.mock("DELETE", "/projects/5").expect(0).create();
    let task = server
        .mock("DELETE", "/tasks/1%2F..%2F..%2Fprojects%2F5")
        .with_status(404)
        .create();

    todoist()
        .env("TODOIST_API_TOKEN", "tok")
        .args(["tasks", "delete", "1/../../projects/5", "--api-url", &server.url()])
        .assert()
        .failure();

    project.assert();
    task.assert();
}

#[test]
fn test_auth_url_and_state_round_trip() {
    let dir = tempdir().unwrap();
    let state_path = dir.path().join("oauth_state");

    let output = todoist()
        .env("TODOIST_CLIENT_ID", "client123")
        .env("TODOIST_OAUTH_STATE_PATH", &state_path)
        .args(["auth", "url"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let url = String::from_utf8(output).unwrap();
    assert!(url.starts_with("https://todoist.com/oauth/authorize?"));
    assert!(url.contains("client_id=client123"));

    let state = std::fs::read_to_string(&state_path).unwrap();
    assert!(url.contains(&format!("state={}", state.trim())));

    todoist()
        .env("TODOIST_OAUTH_STATE_PATH", &state_path)
        .args(["auth", "check-state", state.trim()])
        .assert()
        .success();

    todoist()
        .env("TODOIST_OAUTH_STATE_PATH", &state_path)
        .args(["auth", "check-state", "forged"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatch"));
}

#[test]
fn test_auth_url_requires_client_id() {
    todoist()
        .args(["auth", "url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TODOIST_CLIENT_ID"));
}
