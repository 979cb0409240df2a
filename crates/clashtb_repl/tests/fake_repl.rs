//! Drives the client against a shell script that imitates the clashi
//! prompt protocol.

#![cfg(unix)]

use std::path::Path;
use std::time::{Duration, Instant};

use clashtb_repl::{ClientState, ReplClient, ReplError, ReplOptions, Simulator};

const FAKE_CLASHI: &str = r#"
printf 'Clashi, version 1.8\n'
printf 'clashi> '
while IFS= read -r line; do
  case "$line" in
    ':l '*)
      printf '%s\n' "$line"
      printf '[1 of 1] Compiling Top\nOk, one module loaded.\n' ;;
    'sampleN @System 4 '*)
      printf '%s\n' "$line"
      printf '\033[?1l\033>\033[1m[(0,Idle),(0,Run),(1,Run),(1,Idle)]\033[0m\n' ;;
    'sampleN @System 2 '*)
      printf '%s\n[(0,(0.0,0.0)),(1,(0.5,0.0))]\n' "$line" ;;
    'add '*)
      printf '3\n' ;;
    'boom'*)
      printf '<interactive>:1:1: error:\n    Variable not in scope: boom\n' ;;
    'hang'*)
      sleep 5 ;;
    'flood'*)
      while :; do printf 'chunkchunkchunkchunk\n'; done ;;
    'quit'*)
      exit 0 ;;
  esac
  printf 'clashi> '
done
"#;

fn fake() -> ReplOptions {
    ReplOptions {
        executable: "sh".into(),
        args: vec!["-c".into(), FAKE_CLASHI.into()],
        startup_timeout: Duration::from_secs(10),
        command_timeout: Duration::from_secs(10),
        ..ReplOptions::default()
    }
}

#[test]
fn start_reaches_ready() {
    let client = ReplClient::start(fake()).unwrap();
    assert_eq!(client.state(), ClientState::Ready);
}

#[test]
fn load_then_sample() {
    let mut client = ReplClient::start(fake()).unwrap();
    client.load(Path::new("Top.hs")).unwrap();
    let outputs = client
        .sample_n(4, "topEntity", "(fromList [0,1,0,0])", false)
        .unwrap();
    assert_eq!(
        outputs,
        vec![
            vec!["0", "0", "1", "1"],
            vec!["Idle", "Run", "Run", "Idle"],
        ]
    );
    assert_eq!(client.state(), ClientState::Ready);
}

#[test]
fn nested_values_through_trait() {
    let mut client = ReplClient::start(fake()).unwrap();
    let sim: &mut dyn Simulator = &mut client;
    let outputs = sim.sample_n(2, "top", "(fromList [0,1])", false).unwrap();
    assert_eq!(outputs[1], vec!["(0.0,0.0)", "(0.5,0.0)"]);
}

#[test]
fn evaluate_returns_trimmed_text() {
    let mut client = ReplClient::start(fake()).unwrap();
    let out = client.evaluate("add", &["1".into(), "2".into()]).unwrap();
    assert_eq!(out, "3");
}

#[test]
fn error_text_is_protocol_error_and_client_stays_ready() {
    let mut client = ReplClient::start(fake()).unwrap();
    match client.run_command("boom") {
        Err(ReplError::Protocol { output }) => {
            assert!(output.contains("Variable not in scope: boom"))
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
    assert_eq!(client.state(), ClientState::Ready);
    assert_eq!(client.evaluate("add", &["1".into(), "2".into()]).unwrap(), "3");
}

#[test]
fn timeout_kills_and_fails_fast_afterwards() {
    let mut client = ReplClient::start(fake()).unwrap();
    let err = client
        .run_command_with_timeout("hang", Duration::from_millis(200))
        .unwrap_err();
    assert!(matches!(err, ReplError::Timeout { .. }));
    assert_eq!(client.state(), ClientState::Terminated);
    assert!(matches!(
        client.run_command("add 1 2").unwrap_err(),
        ReplError::Terminated
    ));
    client.terminate();
    client.terminate();
}

#[test]
fn timeout_holds_while_output_keeps_streaming() {
    let (done, finished) = crossbeam::channel::bounded(1);
    std::thread::spawn(move || {
        let mut client = ReplClient::start(fake()).unwrap();
        let started = Instant::now();
        let result = client.run_command_with_timeout("flood", Duration::from_millis(300));
        let _ = done.send((result, started.elapsed(), client.state()));
    });

    let (result, elapsed, state) = finished
        .recv_timeout(Duration::from_secs(5))
        .expect("flooding command outlived its timeout");
    assert!(matches!(result.unwrap_err(), ReplError::Timeout { .. }));
    assert!(elapsed < Duration::from_secs(2));
    assert_eq!(state, ClientState::Terminated);
}

#[test]
fn exit_without_prompt_is_reported() {
    let mut client = ReplClient::start(fake()).unwrap();
    let err = client.run_command("quit").unwrap_err();
    assert!(matches!(err, ReplError::Exited { .. }));
    assert_eq!(client.state(), ClientState::Terminated);
}

#[test]
fn startup_timeout() {
    let options = ReplOptions {
        executable: "sh".into(),
        args: vec!["-c".into(), "exec sleep 5".into()],
        startup_timeout: Duration::from_millis(200),
        ..ReplOptions::default()
    };
    assert!(matches!(
        ReplClient::start(options).unwrap_err(),
        ReplError::Timeout { .. }
    ));
}
