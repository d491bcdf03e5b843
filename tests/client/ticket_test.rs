//! Ticket cache and login tests.

use p4_query::P4Error;

use super::{password_client, ticket_client};
use crate::support::{fail, mixed, ok, ScriptedRunner, DESCRIBE_4242, LOGIN_OK};

#[tokio::test]
async fn login_runs_once_across_queries() {
    let runner = ScriptedRunner::new()
        .on("login", ok(LOGIN_OK))
        .on("describe", ok(DESCRIBE_4242));
    let client = password_client(runner);

    client.describe(4242, false).await.unwrap();
    client.describe(4242, false).await.unwrap();

    assert_eq!(client.runner().count("login"), 1);
    assert_eq!(client.runner().count("describe"), 2);
    assert_eq!(client.tickets().len().await, 1);
}

#[tokio::test]
async fn ticket_accessor_logs_in_once() {
    let runner = ScriptedRunner::new().on("login", ok(LOGIN_OK));
    let client = password_client(runner);

    assert_eq!(client.ticket().await.unwrap(), "TICKET123");
    assert_eq!(client.ticket().await.unwrap(), "TICKET123");
    assert_eq!(client.runner().count("login"), 1);
}

#[tokio::test]
async fn queries_carry_the_ticket() {
    let runner = ScriptedRunner::new()
        .on("login", ok(LOGIN_OK))
        .on("describe", ok(DESCRIBE_4242));
    let client = password_client(runner);

    client.describe(4242, false).await.unwrap();

    let calls = client.runner().calls();
    let describe = calls.iter().find(|c| c.contains("describe")).unwrap();
    assert!(describe.contains("-P TICKET123"));
    assert!(describe.contains("-u alice"));
}

#[tokio::test]
async fn seeded_ticket_skips_login() {
    let runner = ScriptedRunner::new().on("describe", ok(DESCRIBE_4242));
    let client = ticket_client(runner);

    client.describe(4242, false).await.unwrap();

    assert_eq!(client.runner().count("login"), 0);
    assert!(client.runner().calls()[0].contains("-P SEEDED"));
}

#[tokio::test]
async fn login_failure_is_authentication_error() {
    let runner = ScriptedRunner::new().on(
        "login",
        fail(1, "Password invalid.\nUser alice not logged in."),
    );
    let client = password_client(runner);

    let err = client.ticket().await.unwrap_err();
    match err {
        P4Error::Authentication { exit_code, stderr } => {
            assert_eq!(exit_code, 1);
            assert_eq!(stderr, "Password invalid.\nUser alice not logged in.");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert!(client.tickets().is_empty().await);
}

#[tokio::test]
async fn login_stderr_with_zero_exit_fails() {
    let runner = ScriptedRunner::new().on("login", mixed(0, LOGIN_OK, "warning"));
    let client = password_client(runner);

    let err = client.ticket().await.unwrap_err();
    assert!(matches!(err, P4Error::Authentication { exit_code: 0, .. }));
}

#[tokio::test]
async fn missing_ticket_line_is_ticket_not_found() {
    let runner = ScriptedRunner::new().on("login", ok("User alice logged in.\n"));
    let client = password_client(runner);

    let err = client.ticket().await.unwrap_err();
    assert!(matches!(err, P4Error::TicketNotFound { .. }));
}

#[tokio::test]
async fn trust_already_established_retries_once() {
    let runner = ScriptedRunner::new()
        .on("login", fail(1, "Trust already established for this server."))
        .on("login", ok(LOGIN_OK));
    let client = super::P4Client::with_runner(
        p4_query::Credentials::with_password("alice", "hunter2", "perforce:1666")
            .trust("AA:BB:CC"),
        p4_query::P4Config::default(),
        runner,
    );

    assert_eq!(client.ticket().await.unwrap(), "TICKET123");
    assert_eq!(client.runner().count("login"), 2);
    assert!(client.runner().calls()[0].contains("trust -i"));
}

#[tokio::test]
async fn trust_retry_happens_only_once() {
    let runner = ScriptedRunner::new().on("login", fail(1, "Trust already established."));
    let client = super::P4Client::with_runner(
        p4_query::Credentials::with_password("alice", "hunter2", "perforce:1666")
            .trust("AA:BB:CC"),
        p4_query::P4Config::default(),
        runner,
    );

    let err = client.ticket().await.unwrap_err();
    assert!(matches!(err, P4Error::Authentication { .. }));
    assert_eq!(client.runner().count("login"), 2);
}
