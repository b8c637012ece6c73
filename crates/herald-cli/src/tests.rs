use super::*;

use std::cell::RefCell;
use std::io::Cursor;

use herald_core::AddressParseError;
use herald_core::test_support::{FakeNode, unreachable_port};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, scenario, then, when};

struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

#[derive(Default)]
struct TestWorld {
    config: Config,
    node: Option<FakeNode>,
    stdin: String,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: Option<ExitCode>,
    requests: Vec<String>,
}

impl TestWorld {
    fn start_node(&mut self, status: &str) {
        let node = FakeNode::spawn(status).expect("fake node");
        self.config.target = Some(node.target());
        self.node = Some(node);
    }

    fn run(&mut self, command: &str) {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = Self::build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut stdin = Cursor::new(self.stdin.clone().into_bytes());
        let io =
            IoStreams::with_terminal_status(&mut stdin, &mut self.stdout, &mut self.stderr, false);
        self.exit_code = Some(run_with_loader(args, io, &loader));
        if let Some(node) = self.node.as_mut() {
            self.requests = node.take_requests().expect("node requests");
        }
    }

    fn build_args(command: &str) -> Vec<OsString> {
        std::iter::once("herald")
            .chain(command.trim().trim_matches('"').split_whitespace())
            .map(OsString::from)
            .collect()
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }

    fn exit_code(&self) -> ExitCode {
        self.exit_code.expect("exit code recorded")
    }
}

fn run_once(config: Config, args: &[&str], stdin: &str) -> (ExitCode, String, String) {
    let mut input = Cursor::new(stdin.as_bytes().to_vec());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticConfigLoader::new(config);
    let io = IoStreams::with_terminal_status(&mut input, &mut stdout, &mut stderr, false);
    let exit = run_with_loader(args.iter().map(OsString::from), io, &loader);
    (
        exit,
        String::from_utf8(stdout).expect("stdout utf8"),
        String::from_utf8(stderr).expect("stderr utf8"),
    )
}

#[test]
fn missing_command_is_reported() {
    let (exit, stdout, stderr) = run_once(Config::default(), &["herald"], "");
    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(stderr.contains("a command must be provided"));
}

#[test]
fn invalid_target_error_leads_with_the_user_message() {
    let error = AppError::InvalidTarget(AddressParseError::MissingPort(String::from("robot:")));
    assert_eq!(
        error.to_string(),
        format!(
            "{}: missing port in 'robot:'",
            AddressParseError::USER_MESSAGE
        )
    );
}

#[test]
fn help_is_written_to_stdout() {
    let (exit, stdout, stderr) = run_once(Config::default(), &["herald", "--help"], "");
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(stdout.contains("Usage: herald"));
    assert!(stderr.is_empty());
}

#[test]
fn send_requires_a_phrase() {
    let config = Config {
        target: Some(String::from("127.0.0.1:8080")),
        ..Config::default()
    };
    let (exit, _, stderr) = run_once(config, &["herald", "send"], "");
    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stderr.contains("PHRASE"));
}

#[test]
fn recognizer_settings_are_emitted_as_json() {
    let config = Config {
        language: String::from("de-DE"),
        max_results: 2,
        ..Config::default()
    };
    let (exit, stdout, _) = run_once(config, &["herald", "--recognizer-settings"], "");
    assert_eq!(exit, ExitCode::SUCCESS);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("settings json");
    assert_eq!(json["language"], "de-DE");
    assert_eq!(json["model"], "free_form");
    assert_eq!(json["max_results"], 2);
    assert_eq!(json["prompt"], "e.G: cleanup object corny");
}

#[rstest]
#[case(Cycle::Delivered { recognized: true }, ExitCode::SUCCESS)]
#[case(Cycle::Delivered { recognized: false }, ExitCode::FAILURE)]
#[case(Cycle::Skipped, ExitCode::FAILURE)]
#[case(Cycle::Unavailable, ExitCode::FAILURE)]
#[case(Cycle::Closed, ExitCode::FAILURE)]
fn single_cycles_map_to_exit_codes(#[case] cycle: Cycle, #[case] expected: ExitCode) {
    assert_eq!(cycle.exit_code(), expected);
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

#[given("a command node answering {status}")]
fn given_command_node(world: &RefCell<TestWorld>, status: String) {
    world.borrow_mut().start_node(status.trim_matches('"'));
}

#[given("an unreachable command node")]
fn given_unreachable_node(world: &RefCell<TestWorld>) {
    let port = unreachable_port().expect("free port");
    world.borrow_mut().config.target = Some(format!("127.0.0.1:{port}"));
}

#[given("the target is {target}")]
fn given_target(world: &RefCell<TestWorld>, target: String) {
    world.borrow_mut().config.target = Some(target.trim_matches('"').to_owned());
}

#[given("no target is configured")]
fn given_no_target(world: &RefCell<TestWorld>) {
    world.borrow_mut().config.target = None;
}

#[given("stdin lines {lines}")]
fn given_stdin_lines(world: &RefCell<TestWorld>, lines: String) {
    let stdin: String = lines
        .trim_matches('"')
        .split('|')
        .map(|line| format!("{line}\n"))
        .collect();
    world.borrow_mut().stdin = stdin;
}

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: String) {
    world.borrow_mut().run(&command);
}

#[then("the node receives {request}")]
fn then_node_receives(world: &RefCell<TestWorld>, request: String) {
    let world = world.borrow();
    assert_eq!(world.requests, vec![request.trim_matches('"').to_owned()]);
}

#[then("no request reaches the node")]
fn then_no_request(world: &RefCell<TestWorld>) {
    assert!(world.borrow().requests.is_empty());
}

#[then("stdout contains {snippet}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, snippet: String) {
    let world = world.borrow();
    let stdout = world.stdout_text();
    let snippet = snippet.trim_matches('"');
    assert!(
        stdout.contains(snippet),
        "stdout {stdout:?} did not contain {snippet:?}"
    );
}

#[then("stderr contains {snippet}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, snippet: String) {
    let world = world.borrow();
    let stderr = world.stderr_text();
    let snippet = snippet.trim_matches('"');
    assert!(
        stderr.contains(snippet),
        "stderr {stderr:?} did not contain {snippet:?}"
    );
}

#[then("the CLI succeeds")]
fn then_success(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code(), ExitCode::SUCCESS);
}

#[then("the CLI fails")]
fn then_failure(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code(), ExitCode::FAILURE);
}

#[scenario(path = "tests/features/herald_cli.feature")]
fn herald_cli_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
