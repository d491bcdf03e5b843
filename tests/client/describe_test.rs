//! Describe and annotate query tests.

use p4_query::parse::ChangeKind;
use p4_query::P4Error;

use super::ticket_client;
use crate::support::{fail, ok, ScriptedRunner, DESCRIBE_4242};

#[tokio::test]
async fn describe_change_parses_revision() {
    let runner = ScriptedRunner::new().on("describe", ok(DESCRIBE_4242));
    let client = ticket_client(runner);

    let change = client.describe_change(4242, true).await.unwrap().unwrap();

    assert_eq!(change.revision, "4242");
    assert_eq!(change.description, "Fix the frobnicator");
    assert_eq!(change.file_count(), 2);
    assert_eq!(
        change.files[0].differences,
        vec!["10c10\n< old\n---\n> new"]
    );
    assert!(client.runner().calls()[0].contains("describe -du 4242"));
}

#[tokio::test]
async fn describe_without_differences_uses_summary_flag() {
    let runner = ScriptedRunner::new().on("describe", ok(DESCRIBE_4242));
    let client = ticket_client(runner);

    let change = client.describe_change(4242, false).await.unwrap().unwrap();

    assert!(change.files.iter().all(|f| f.differences.is_empty()));
    assert!(client.runner().calls()[0].contains("describe -s 4242"));
}

#[tokio::test]
async fn no_such_changelist_is_none() {
    let runner =
        ScriptedRunner::new().on("describe", fail(1, "Change 99999 - no such changelist."));
    let client = ticket_client(runner);

    assert!(client.describe(99999, false).await.unwrap().is_none());
    assert!(client.describe_change(99999, false).await.unwrap().is_none());
}

#[tokio::test]
async fn headerless_output_is_invalid_revision() {
    let runner = ScriptedRunner::new().on("describe", ok("Nothing to see here.\n"));
    let client = ticket_client(runner);

    let err = client.describe_change(7, false).await.unwrap_err();
    assert!(matches!(err, P4Error::InvalidRevision(_)));
}

#[tokio::test]
async fn untranslatable_parameter_is_encoding_error() {
    let runner = ScriptedRunner::new().on(
        "describe",
        fail(1, "Command parameter could not be translated."),
    );
    let client = ticket_client(runner);

    let err = client.describe(7, false).await.unwrap_err();
    assert!(err.is_encoding());
    assert!(err.to_string().starts_with(p4_query::ENCODING_ERROR_MESSAGE));
}

#[tokio::test]
async fn command_error_embeds_redacted_command() {
    let runner = ScriptedRunner::new().on("describe", fail(1, "Connect to server failed."));
    let client = ticket_client(runner);

    let err = client.describe(7, false).await.unwrap_err();
    match err {
        P4Error::Command {
            command,
            exit_code,
            stderr,
        } => {
            assert!(command.contains("describe -s 7"));
            assert!(!command.contains("SEEDED"));
            assert_eq!(exit_code, 1);
            assert_eq!(stderr, "Connect to server failed.");
        }
        other => panic!("expected command error, got {other:?}"),
    }
}

#[tokio::test]
async fn annotate_file_filters_blank_lines() {
    let runner = ScriptedRunner::new().on(
        "annotate",
        ok("//depot/main/frob.c#3 - edit change 4242 (text)\n\n4200: int x;\n\n4242: int y;\n"),
    );
    let client = ticket_client(runner);

    let annotate = client.annotate_file("//depot/main/frob.c#3").await.unwrap();

    assert_eq!(annotate.file, "//depot/main/frob.c#3");
    assert_eq!(annotate.revision, "4242");
    assert_eq!(annotate.change, Some(ChangeKind::Edit));
    assert_eq!(annotate.lines.len(), 2);
    assert_eq!(annotate.lines[1].line_number, 2);
    assert_eq!(annotate.lines[1].text, "int y;");
}

#[tokio::test]
async fn annotate_change_skips_deleted_files() {
    let runner = ScriptedRunner::new()
        .on("describe", ok(DESCRIBE_4242))
        .on("annotate", ok("//depot/main/frob.c#3 - edit change 4242 (text)\n4242: x\n"));
    let client = ticket_client(runner);

    let change = client.describe_change(4242, false).await.unwrap().unwrap();
    let change = client.annotate_change(change).await.unwrap();

    assert!(change.files[0].annotate.is_some());
    assert!(change.files[1].annotate.is_none());
    assert_eq!(client.runner().count("annotate"), 1);
    assert!(client.runner().calls()[1].contains("//depot/main/frob.c#3"));
}

#[tokio::test]
async fn annotate_change_skips_renamed_away_files() {
    let describe = "Change 5000 by alice@alice-ws on 2024/02/01 09:00:00\n\
\n\
\tRename old to new\n\
\n\
Affected files ...\n\
\n\
... //depot/new.c#1 move/add\n\
... //depot/old.c#2 move/delete\n";
    let runner = ScriptedRunner::new()
        .on("describe", ok(describe))
        .on("old.c", fail(1, "//depot/old.c#2 - no file(s) at that revision."))
        .on("annotate", ok("//depot/new.c#1 - add change 5000 (text)\n5000: int c;\n"));
    let client = ticket_client(runner);

    let change = client.describe_change(5000, false).await.unwrap().unwrap();
    let change = client.annotate_change(change).await.unwrap();

    assert_eq!(change.files[0].annotate.as_ref().unwrap().lines.len(), 1);
    assert!(change.files[1].annotate.is_none());
    assert_eq!(client.runner().count("annotate"), 1);
    assert_eq!(client.runner().count("old.c"), 0);
}

#[tokio::test]
async fn untrusted_server_fails_describe_change() {
    let runner = ScriptedRunner::new().on(
        "describe",
        fail(
            1,
            "The authenticity of '10.0.0.1:1666' can't be established,\n\
To allow connection use the 'p4 trust' command.",
        ),
    );
    let client = ticket_client(runner);

    let raw = client.describe(4242, false).await.unwrap().unwrap();
    assert!(raw.trust_hint.is_some());

    let err = client.describe_change(4242, false).await.unwrap_err();
    assert!(matches!(err, P4Error::Untrusted { .. }));
}

#[tokio::test]
async fn timeout_names_redacted_command() {
    let runner = ScriptedRunner::new().on_timeout("annotate");
    let client = ticket_client(runner);

    let err = client.annotate("//depot/a.c").await.unwrap_err();
    match err {
        P4Error::Timeout { command, .. } => {
            assert!(command.contains("annotate"));
            assert!(!command.contains("SEEDED"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}
