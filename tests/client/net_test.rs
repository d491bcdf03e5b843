//! Local trust and ticket store lookup tests.

use p4_query::net::{local_ticket, trusted_fingerprint};
use p4_query::P4Config;

use crate::support::{mixed, ok, ScriptedRunner};

#[tokio::test]
async fn fingerprint_for_matching_address() {
    let runner = ScriptedRunner::new().on(
        "trust -l",
        ok("10.0.0.9:1666 11:22:33\n127.0.0.1:1666 AA:BB:CC\n"),
    );

    let fingerprint = trusted_fingerprint(&runner, &P4Config::default(), "ssl:127.0.0.1:1666")
        .await
        .unwrap();

    assert_eq!(fingerprint.as_deref(), Some("AA:BB:CC"));
}

#[tokio::test]
async fn trust_list_tolerates_stderr() {
    let runner = ScriptedRunner::new().on(
        "trust -l",
        mixed(0, "127.0.0.1:1666 AA:BB:CC\n", "P4TRUST file has unexpected permissions"),
    );

    let fingerprint = trusted_fingerprint(&runner, &P4Config::default(), "127.0.0.1:1666")
        .await
        .unwrap();

    assert_eq!(fingerprint.as_deref(), Some("AA:BB:CC"));
}

#[tokio::test]
async fn unknown_server_has_no_fingerprint() {
    let runner = ScriptedRunner::new().on("trust -l", ok("10.0.0.9:1666 11:22:33\n"));

    let fingerprint = trusted_fingerprint(&runner, &P4Config::default(), "127.0.0.1:1666")
        .await
        .unwrap();

    assert!(fingerprint.is_none());
}

#[tokio::test]
async fn local_ticket_for_user_and_server() {
    let runner = ScriptedRunner::new().on(
        "tickets",
        ok("10.0.0.9:1666 (alice) OTHER\n127.0.0.1:1666 (bob) BOBS\n127.0.0.1:1666 (alice) MINE\n"),
    );

    let ticket = local_ticket(&runner, &P4Config::default(), "alice", "127.0.0.1:1666")
        .await
        .unwrap();

    assert_eq!(ticket.as_deref(), Some("MINE"));
}
