use clashtb_common::{Signal, Value};
use clashtb_wave::{Chronogram, WaveError};

const FSM_TRACE: &str = r#"{
  "signal": [
    {"wave": "P......"},
    ["inputs",
      {"name": "start", "wave": "010...."},
      {"name": "data_ready", "wave": "0..1.0."}
    ],
    {},
    ["out (th)",
      {"name": "state", "wave": "3.45.3.", "data": ["Idle", "WaitData", "Done", "Idle"]}
    ]
  ],
  "head": {"text": "fsm", "tick": 0}
}"#;

#[test]
fn load_edit_save_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fsm.json");
    std::fs::write(&path, FSM_TRACE).unwrap();

    let mut cg = Chronogram::load(&path).unwrap();
    cg.set_templates([("state (actual)", "state")]);
    let mut actual = cg.signal("state").unwrap().renamed("state (actual)");
    actual.set(0, "WaitData").unwrap();
    cg.set_signals([&actual]).unwrap();

    let out = dir.path().join("fsm2.json");
    cg.save(&out).unwrap();

    let reloaded = Chronogram::load(&out).unwrap();
    let names: Vec<String> = reloaded
        .signals()
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, ["start", "data_ready", "state", "state (actual)"]);

    let expected = reloaded.signal("state").unwrap();
    let actual = reloaded.signal("state (actual)").unwrap();
    assert_eq!(expected.len(), 7);
    assert_eq!(actual.len(), 7);
    assert_eq!(actual[0].value(), Some(&Value::from("WaitData")));
    assert_eq!(actual[1].value(), Some(&Value::from("Idle")));
    assert_eq!(&actual.values()[2..], &expected.values()[2..]);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["head"]["text"], "fsm");
}

#[test]
fn session_groups_round_trip() {
    let inputs = vec![
        Signal::bit("start", [0i64, 1, 0, 0]).unwrap(),
        Signal::signed("offset", 4, [-2i64, -2, 3, 3]).unwrap().with_order(1),
    ];
    let outputs = vec![Signal::bit("out", "0011").unwrap()];
    let cg = Chronogram::from_groups(4, [("inputs", &inputs[..]), ("out", &outputs[..])]).unwrap();

    let text = cg.to_json().unwrap();
    let back = Chronogram::from_json(&text).unwrap();
    let decoded = back.group_signals("inputs").unwrap();
    assert_eq!(decoded[0].values(), inputs[0].values());
    assert_eq!(decoded[1].values(), inputs[1].values());
    assert_eq!(back.group_signals("out").unwrap()[0].values(), outputs[0].values());
}

#[test]
fn corrupt_trace_is_rejected() {
    let text = r#"{"signal": [{"name": "s", "wave": "33", "data": ["A"]}]}"#;
    let cg = Chronogram::from_json(text).unwrap();
    assert!(matches!(
        cg.signals().unwrap_err(),
        WaveError::DataLengthMismatch { symbols: 2, data: 1 }
    ));

    let text = r#"{"signal": [{"name": "s", "wave": ".0"}]}"#;
    let cg = Chronogram::from_json(text).unwrap();
    assert!(matches!(
        cg.signals().unwrap_err(),
        WaveError::LeadingContinuation
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Chronogram::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, WaveError::Io(_)));
}
