// tests/wire_format_tests.rs

use qbundle::{
    assemble_circuits, AssembleError, Bundle, BundleHeader, CircuitBuilder, ClassicalRegister, Gate,
    Operation, Param, QuantumRegister, RunConfig,
};
use serde_json::json;

fn teleport_like() -> qbundle::Circuit {
    let q = QuantumRegister::new("q", 3);
    let c0 = ClassicalRegister::new("c0", 1);
    let c1 = ClassicalRegister::new("c1", 1);
    CircuitBuilder::new("teleport")
        .add_qreg(q.clone())
        .add_creg(c0.clone())
        .add_creg(c1.clone())
        .add_op(Operation::gate(Gate::H, vec![q.qubit(1)]))
        .add_op(Operation::gate(Gate::Cx, vec![q.qubit(1), q.qubit(2)]))
        .add_op(Operation::gate(Gate::U1 { lambda: 0.25 }, vec![q.qubit(0)]))
        .add_op(Operation::measure(q.qubit(0), c0.clbit(0)))
        .add_op(Operation::measure(q.qubit(1), c1.clbit(0)))
        .add_op(Operation::gate(Gate::Z, vec![q.qubit(2)]).c_if(&c0, 1u32))
        .add_op(Operation::gate(Gate::X, vec![q.qubit(2)]).c_if(&c1, 1u32))
        .build()
}

#[test]
fn test_full_bundle_json_tree() -> Result<(), AssembleError> {
    let run_config = RunConfig::new().set("shots", 1024).set("memory_slots", 50);
    let header = BundleHeader::new().set("backend_name", "qasm_simulator");
    let bundle = assemble_circuits(&[teleport_like()], &run_config, "tele-1", header)?;

    let wire: serde_json::Value = serde_json::from_str(&bundle.to_json()?)?;
    let expected = json!({
        "id": "tele-1",
        "header": {"backend_name": "qasm_simulator"},
        "config": {"n_qubits": 3, "memory_slots": 2, "shots": 1024},
        "experiments": [{
            "header": {
                "name": "teleport",
                "qubit_labels": [["q", 0], ["q", 1], ["q", 2]],
                "clbit_labels": [["c0", 0], ["c1", 0]],
                "qreg_sizes": [["q", 3]],
                "creg_sizes": [["c0", 1], ["c1", 1]],
                "n_qubits": 3,
                "memory_slots": 2
            },
            "config": {"n_qubits": 3, "memory_slots": 2},
            "instructions": [
                {"name": "h", "qubits": [1]},
                {"name": "cx", "qubits": [1, 2]},
                {"name": "u1", "params": [0.25], "qubits": [0]},
                {"name": "measure", "qubits": [0], "memory": [0], "register": [0]},
                {"name": "measure", "qubits": [1], "memory": [1], "register": [1]},
                {"name": "bfunc", "mask": "0x1", "relation": "==", "val": "0x1", "register": 2},
                {"name": "z", "qubits": [2], "conditional": 2},
                {"name": "bfunc", "mask": "0x2", "relation": "==", "val": "0x2", "register": 3},
                {"name": "x", "qubits": [2], "conditional": 3}
            ]
        }]
    });
    assert_eq!(wire, expected);
    Ok(())
}

#[test]
fn test_bundle_round_trips_through_json() -> Result<(), AssembleError> {
    let bundle = assemble_circuits(
        &[teleport_like()],
        &RunConfig::new().set("seed", 11),
        "rt",
        BundleHeader::new(),
    )?;
    let decoded = Bundle::from_json(&bundle.to_json_pretty()?)?;
    assert_eq!(decoded, bundle);
    Ok(())
}

#[test]
fn test_mask_wider_than_64_bits_stays_hex_string() -> Result<(), AssembleError> {
    let q = QuantumRegister::new("q", 1);
    let pad = ClassicalRegister::new("pad", 70);
    let flag = ClassicalRegister::new("flag", 1);
    let circuit = CircuitBuilder::new("wide")
        .add_qreg(q.clone())
        .add_creg(pad)
        .add_creg(flag.clone())
        .add_op(Operation::gate(Gate::X, vec![q.qubit(0)]).c_if(&flag, 1u32))
        .build();
    let bundle = assemble_circuits(&[circuit], &RunConfig::new(), "wide", BundleHeader::new())?;
    let wire = serde_json::to_value(&bundle.experiments[0].instructions[0])?;
    // flag[0] sits at flat index 70.
    assert_eq!(wire["mask"], json!("0x400000000000000000"));
    assert_eq!(wire["val"], json!("0x400000000000000000"));
    assert_eq!(wire["register"], json!(71));
    Ok(())
}

#[test]
fn test_complex_and_text_params_encode() -> Result<(), AssembleError> {
    let q = QuantumRegister::new("q", 1);
    let gate = Gate::Custom {
        name: "snapshot".to_string(),
        params: vec![
            Param::Text("after_h".to_string()),
            Param::Complex(num_complex::Complex::new(0.5, -1.0)),
        ],
    };
    let circuit = CircuitBuilder::new("params")
        .add_qreg(q.clone())
        .add_op(Operation::gate(gate, vec![q.qubit(0)]))
        .build();
    let bundle = assemble_circuits(&[circuit], &RunConfig::new(), "params", BundleHeader::new())?;
    let wire = serde_json::to_value(&bundle.experiments[0].instructions[0])?;
    assert_eq!(wire, json!({"name": "snapshot", "params": ["after_h", [0.5, -1.0]], "qubits": [0]}));
    Ok(())
}

#[test]
fn test_malformed_run_config_rejected_at_entry() {
    let err = RunConfig::from_json_str("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, AssembleError::InvalidRunConfig { .. }));
    assert!(err.to_string().starts_with("Invalid Run Config"));
}
