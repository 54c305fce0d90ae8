use assert_cmd::Command;
use ghjson::codec;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;

const CONTENTS_PATH: &str = "/repos/alice/data/contents/data/default.json";

fn ghjson() -> Command {
    let mut cmd = Command::cargo_bin("ghjson").unwrap();
    cmd.env_remove("GHJSON_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GHJSON_API_BASE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    ghjson()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("put"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("fmt"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_fmt_stdin() {
    ghjson()
        .args(["fmt", "-"])
        .write_stdin(r#"{"hello":"world","list":[1,2]}"#)
        .assert()
        .success()
        .stdout("{\n  \"hello\": \"world\",\n  \"list\": [\n    1,\n    2\n  ]\n}\n");
}

#[test]
fn test_fmt_preserves_key_order() {
    ghjson()
        .args(["fmt", "-"])
        .write_stdin(r#"{"zeta":1,"alpha":2}"#)
        .assert()
        .success()
        .stdout("{\n  \"zeta\": 1,\n  \"alpha\": 2\n}\n");
}

#[test]
fn test_fmt_invalid() {
    ghjson()
        .args(["fmt", "-"])
        .write_stdin("{invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON: "));
}

#[test]
fn test_fmt_in_place() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"{{"a":{{"b":true}}}}"#).unwrap();
    f.flush().unwrap();

    ghjson()
        .arg("fmt")
        .arg(f.path())
        .arg("--in-place")
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(f.path()).unwrap(),
        "{\n  \"a\": {\n    \"b\": true\n  }\n}\n"
    );
}

#[test]
fn test_validate_valid_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "[1, 2, 3]").unwrap();
    f.flush().unwrap();

    ghjson()
        .arg("validate")
        .arg(f.path())
        .assert()
        .success()
        .stdout("Valid JSON\n");
}

#[test]
fn test_validate_invalid_stdin() {
    ghjson()
        .args(["validate", "-"])
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON: "));
}

#[test]
fn test_get_requires_owner_and_repo() {
    ghjson()
        .arg("get")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--owner"));
}

#[test]
fn test_get_rejects_blank_owner() {
    ghjson()
        .args(["get", "--owner", " ", "--repo", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner is empty"));
}

#[test]
fn test_get_unreachable_host() {
    ghjson()
        .args(["get", "--owner", "alice", "--repo", "data"])
        .args(["--api-base", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load file: Transport error"));
}

#[test]
fn test_get_prints_remote_document() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", CONTENTS_PATH)
        .match_header("authorization", "token t0ken")
        .with_status(200)
        .with_body(
            json!({
                "sha": "abc123",
                "content": codec::encode_content(&json!({"hello": "world"})),
            })
            .to_string(),
        )
        .create();

    ghjson()
        .args(["get", "--owner", "alice", "--repo", "data"])
        .args(["--api-base", server.url().as_str(), "--token", "t0ken"])
        .assert()
        .success()
        .stdout("{\n  \"hello\": \"world\"\n}\n")
        .stderr(predicate::str::contains("Loaded JSON from repository"));
    mock.assert();
}

#[test]
fn test_put_saves_with_loaded_version() {
    let mut server = mockito::Server::new();
    let get = server
        .mock("GET", CONTENTS_PATH)
        .with_status(200)
        .with_body(
            json!({
                "sha": "abc123",
                "content": codec::encode_content(&json!({"hello": "world"})),
            })
            .to_string(),
        )
        .create();
    let put = server
        .mock("PUT", CONTENTS_PATH)
        .match_header("authorization", "token t0ken")
        .match_body(mockito::Matcher::Json(json!({
            "message": "Update JSON data",
            "content": codec::encode_content(&json!({"hello": "updated"})),
            "sha": "abc123",
        })))
        .with_status(200)
        .with_body(json!({"content": {"sha": "def456"}, "commit": {"sha": "c0ffee"}}).to_string())
        .create();

    ghjson()
        .args(["put", "--owner", "alice", "--repo", "data", "--input", "-"])
        .args(["--api-base", server.url().as_str(), "--token", "t0ken"])
        .write_stdin(r#"{"hello":"updated"}"#)
        .assert()
        .success()
        .stdout("def456\n")
        .stderr(predicate::str::contains("Saved changes to repository"));
    get.assert();
    put.assert();
}

#[test]
fn test_put_conflict_fails() {
    let mut server = mockito::Server::new();
    let _get = server
        .mock("GET", CONTENTS_PATH)
        .with_status(200)
        .with_body(
            json!({"sha": "abc123", "content": codec::encode_content(&json!({}))}).to_string(),
        )
        .create();
    let put = server
        .mock("PUT", CONTENTS_PATH)
        .with_status(409)
        .with_body(r#"{"message": "data/default.json does not match abc123"}"#)
        .create();

    ghjson()
        .args(["put", "--owner", "alice", "--repo", "data", "--input", "-"])
        .args(["--api-base", server.url().as_str()])
        .write_stdin("[1]")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Save failed: data/default.json does not match abc123",
        ));
    put.assert();
}
