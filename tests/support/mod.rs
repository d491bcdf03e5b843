//! Scripted command runner for driving the client without a server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use p4_query::exec::{CommandOutput, CommandRunner, ExecError};

enum Response {
    Output(CommandOutput),
    Timeout,
}

struct Rule {
    needle: String,
    responses: VecDeque<Response>,
}

/// Answers each command with the responses registered for the first needle
/// it contains. Multiple responses for one needle are served in order; the
/// last one repeats.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, needle: &str, response: Response) -> Self {
        {
            let mut rules = self.rules.lock().unwrap();
            match rules.iter_mut().find(|rule| rule.needle == needle) {
                Some(rule) => rule.responses.push_back(response),
                None => rules.push(Rule {
                    needle: needle.to_string(),
                    responses: VecDeque::from([response]),
                }),
            }
        }
        self
    }

    /// Respond to commands containing `needle` with `output`.
    pub fn on(self, needle: &str, output: CommandOutput) -> Self {
        self.push(needle, Response::Output(output))
    }

    /// Fail commands containing `needle` with a timeout.
    pub fn on_timeout(self, needle: &str) -> Self {
        self.push(needle, Response::Timeout)
    }

    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of command lines run that contain `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.contains(needle))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        self.calls.lock().unwrap().push(command_line.to_string());

        let mut rules = self.rules.lock().unwrap();
        let Some(rule) = rules
            .iter_mut()
            .find(|rule| command_line.contains(&rule.needle))
        else {
            return Ok(fail(1, "unscripted command"));
        };

        let response = if rule.responses.len() > 1 {
            rule.responses.pop_front()
        } else {
            None
        };

        match response.as_ref().or(rule.responses.front()) {
            Some(Response::Output(output)) => Ok(output.clone()),
            Some(Response::Timeout) => Err(ExecError::Timeout {
                command: command_line.to_string(),
                duration: Duration::from_secs(300),
            }),
            None => Ok(fail(1, "unscripted command")),
        }
    }
}

/// Successful output with the given stdout text.
pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput::from_bytes(0, stdout.as_bytes(), b"")
}

/// Failed output with the given stderr text.
pub fn fail(exit_code: i32, stderr: &str) -> CommandOutput {
    CommandOutput::from_bytes(exit_code, b"", stderr.as_bytes())
}

/// Output with both streams set.
pub fn mixed(exit_code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput::from_bytes(exit_code, stdout.as_bytes(), stderr.as_bytes())
}

/// `p4 login && p4 tickets` output for alice.
pub const LOGIN_OK: &str = "User alice logged in.\nperforce:1666 (alice) TICKET123\n";

pub const DESCRIBE_4242: &str = "Change 4242 by alice@alice-ws on 2024/01/02 10:00:00\n\
\n\
\tFix the frobnicator\n\
\n\
Affected files ...\n\
\n\
... //depot/main/frob.c#3 edit\n\
... //depot/main/old.c#7 delete\n\
\n\
Differences ...\n\
\n\
==== //depot/main/frob.c#3 (text) ====\n\
\n\
10c10\n\
< old\n\
---\n\
> new\n";
