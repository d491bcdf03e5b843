//! Changelist listing tests.

use p4_query::P4Error;

use super::ticket_client;
use crate::support::{fail, mixed, ok, ScriptedRunner};

const RANGE_OUTPUT: &str = "Change 200 on 2024/02/01 by alice@ws 'Release'\n\
Change 175 on 2024/01/20 by bob@ws 'Fix'\n\
Change 150 on 2024/01/10 by alice@ws 'Feature'\n\
Change 100 on 2024/01/01 by carol@ws 'Start'\n";

#[tokio::test]
async fn range_excludes_boundaries() {
    let runner = ScriptedRunner::new().on("changes", ok(RANGE_OUTPUT));
    let client = ticket_client(runner);

    let mut revisions = client
        .raw_changes_between("//depot/main/...", 100, 200)
        .await
        .unwrap();
    revisions.sort_unstable();

    assert_eq!(revisions, vec![150, 175]);
    assert!(client.runner().calls()[0].contains("//depot/main/...@100,@200"));
}

#[tokio::test]
async fn range_tolerates_stderr_with_stdout() {
    let runner = ScriptedRunner::new().on(
        "changes",
        mixed(0, RANGE_OUTPUT, "//depot/other/... - no such file(s)."),
    );
    let client = ticket_client(runner);

    let revisions = client
        .raw_changes_between("//depot/main/...", 100, 200)
        .await
        .unwrap();
    assert_eq!(revisions.len(), 2);
}

#[tokio::test]
async fn range_fails_on_stderr_alone() {
    let runner = ScriptedRunner::new().on("changes", fail(1, "Invalid revision range."));
    let client = ticket_client(runner);

    let err = client
        .raw_changes_between("//depot/main/...", 100, 200)
        .await
        .unwrap_err();
    assert!(matches!(err, P4Error::Command { .. }));
}

#[tokio::test]
async fn summaries_fold_continuation_lines() {
    let listing = "Change 3 on 2024/01/03 09:00:00 by carol@c-ws\n\
\n\
\tThird\n\
\tchange\n\
\n\
Change 2 on 2024/01/02 08:00:00 by bob@b-ws\n\
\n\
\tSecond\n\
\n\
Change 1 on 2024/01/01 07:00:00 by alice@a-ws\n";
    let runner = ScriptedRunner::new().on("changes", ok(listing));
    let client = ticket_client(runner);

    let changes = client
        .change_summaries("//depot/...", Some(3))
        .await
        .unwrap();

    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].description, "Third change");
    assert_eq!(changes[1].description, "Second");
    assert_eq!(changes[2].description, "");
    assert_eq!(changes[2].user, "alice");
    assert!(client.runner().calls()[0].contains("changes -l -t -m 3 //depot/..."));
}

#[tokio::test]
async fn single_change_lookup() {
    let runner = ScriptedRunner::new().on(
        "changes",
        ok("Change 42 on 2024/01/02 10:00:00 by alice@ws\n\n\tAnswer\n"),
    );
    let client = ticket_client(runner);

    let change = client.change(42).await.unwrap().unwrap();
    assert_eq!(change.revision, "42");
    assert_eq!(change.description, "Answer");
    assert!(client.runner().calls()[0].contains("@42,@42"));
}

#[tokio::test]
async fn single_change_lookup_empty_is_none() {
    let runner = ScriptedRunner::new().on("changes", ok(""));
    let client = ticket_client(runner);

    assert!(client.change(42).await.unwrap().is_none());
}
