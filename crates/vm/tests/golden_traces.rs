//! End-to-end golden traces for the subroutine instructions.
//!
//! Each scenario checks the full step-by-step trace: program counter,
//! mnemonic, gas before the step, step cost, data stack and return stack.

use subvm_common::{Code, U256};
use subvm_vm::{run_traced, AbortRecord, Config, Machine, RuntimeError, StepRecord, TraceLog};

const GAS: u64 = 10_000;

// ============================================================
// Helpers
// ============================================================

fn execute(hex: &str) -> (Result<subvm_vm::Outcome, RuntimeError>, TraceLog) {
    let code = Code::from_hex(hex).unwrap();
    let mut log = TraceLog::new();
    let result = run_traced(&code, &Config::with_gas_limit(GAS), &mut log);
    (result, log)
}

/// Expected step: (pc, op, cost, stack, return stack). `gas` is filled in
/// by accumulating costs from the starting budget.
type Expected<'a> = (usize, &'static str, u64, &'a [u64], &'a [usize]);

fn expected_steps(rows: &[Expected<'_>]) -> Vec<StepRecord> {
    let mut gas = GAS;
    rows.iter()
        .map(|&(pc, op, cost, stack, return_stack)| {
            let record = StepRecord {
                pc,
                op,
                gas,
                gas_cost: cost,
                depth: return_stack.len(),
                stack: stack.iter().map(|v| format!("{v:#x}")).collect(),
                return_stack: return_stack.to_vec(),
            };
            gas -= cost;
            record
        })
        .collect()
}

// ============================================================
// Scenario 1: single call and return
// ============================================================

#[test]
fn simple_subroutine_call() {
    // PUSH1 4, JUMPSUB, STOP, BEGINSUB, RETURNSUB
    let (result, log) = execute("6004b300b2b7");

    let outcome = result.unwrap();
    assert_eq!(outcome.gas_used, 14);
    assert_eq!(outcome.pc, 3);
    assert!(outcome.stack.is_empty());

    assert_eq!(
        log.steps,
        expected_steps(&[
            (0, "PUSH1", 3, &[], &[]),
            (2, "JUMPSUB", 8, &[4], &[]),
            (4, "BEGINSUB", 1, &[], &[3]),
            (5, "RETURNSUB", 2, &[], &[3]),
            (3, "STOP", 0, &[], &[]),
        ])
    );
    assert_eq!(log.total_cost(), 14);
    assert_eq!(log.abort, None);
}

// ============================================================
// Scenario 2: two levels of nesting
// ============================================================

#[test]
fn nested_subroutines() {
    let (result, log) = execute("6800000000000000000cb300b26011b3b7b2b7");

    let outcome = result.unwrap();
    assert_eq!(outcome.gas_used, 28);
    assert_eq!(outcome.pc, 11);

    assert_eq!(
        log.steps,
        expected_steps(&[
            (0, "PUSH9", 3, &[], &[]),
            (10, "JUMPSUB", 8, &[12], &[]),
            (12, "BEGINSUB", 1, &[], &[11]),
            (13, "PUSH1", 3, &[], &[11]),
            (15, "JUMPSUB", 8, &[17], &[11]),
            (17, "BEGINSUB", 1, &[], &[11, 16]),
            (18, "RETURNSUB", 2, &[], &[11, 16]),
            (16, "RETURNSUB", 2, &[], &[11]),
            (11, "STOP", 0, &[], &[]),
        ])
    );
    assert_eq!(log.max_return_depth(), 2);
}

// ============================================================
// Scenario 3: target out of code bounds
// ============================================================

#[test]
fn jumpsub_target_out_of_bounds() {
    let (result, log) = execute("6801000000000000000cb300b26011b3b7b2b7");

    let dest = U256::from_big_endian(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0x0c]);
    assert_eq!(
        result,
        Err(RuntimeError::InvalidJumpDestination { at: 10, dest })
    );
    assert_eq!(log.pcs(), vec![0, 10]);
    assert_eq!(
        log.abort,
        Some(AbortRecord {
            pc: 10,
            op: "JUMPSUB",
            error: "invalid jump destination".to_string(),
        })
    );
}

// ============================================================
// Scenario 4: RETURNSUB with nothing to return to
// ============================================================

#[test]
fn returnsub_without_call() {
    let (result, log) = execute("b75858");

    assert_eq!(result, Err(RuntimeError::ReturnStackUnderflow { at: 0 }));
    assert_eq!(log.pcs(), vec![0]);
    assert_eq!(
        log.abort,
        Some(AbortRecord {
            pc: 0,
            op: "RETURNSUB",
            error: "invalid retsub".to_string(),
        })
    );
}

// ============================================================
// Scenario 5: return lands exactly at the end of code
// ============================================================

#[test]
fn return_to_end_of_code_is_implicit_stop() {
    // PUSH1 5, JUMP, BEGINSUB, RETURNSUB, JUMPDEST, PUSH1 3, JUMPSUB
    let (result, log) = execute("600556b2b75b6003b3");

    let outcome = result.unwrap();
    assert_eq!(outcome.gas_used, 26);
    assert_eq!(outcome.pc, 9);

    assert_eq!(
        log.steps,
        expected_steps(&[
            (0, "PUSH1", 3, &[], &[]),
            (2, "JUMP", 8, &[5], &[]),
            (5, "JUMPDEST", 1, &[], &[]),
            (6, "PUSH1", 3, &[], &[]),
            (8, "JUMPSUB", 8, &[3], &[]),
            (3, "BEGINSUB", 1, &[], &[9]),
            (4, "RETURNSUB", 2, &[], &[9]),
        ])
    );
}

// ============================================================
// BEGINSUB reached without JUMPSUB
// ============================================================

#[test]
fn walking_into_beginsub_burns_all_gas() {
    // PUSH1 1, BEGINSUB, RETURNSUB
    let code = Code::from_hex("6001b2b7").unwrap();
    let mut vm = Machine::new(&code, &Config::with_gas_limit(GAS));
    assert_eq!(vm.execute(), Err(RuntimeError::OutOfGas { at: 2 }));
    assert_eq!(vm.gas_remaining(), 0);
    assert_eq!(vm.gas_used(), GAS);
}

#[test]
fn jumping_into_beginsub_burns_all_gas() {
    // PUSH1 3, JUMP, BEGINSUB, RETURNSUB
    let (result, log) = execute("600356b2b7");
    assert_eq!(result, Err(RuntimeError::OutOfGas { at: 3 }));
    assert_eq!(log.ops(), vec!["PUSH1", "JUMP", "BEGINSUB"]);
    assert_eq!(log.abort.unwrap().error, "out of gas");
}

#[test]
fn beginsub_at_start_of_code_burns_all_gas() {
    let (result, _) = execute("b2b7");
    assert_eq!(result, Err(RuntimeError::OutOfGas { at: 0 }));
}

// ============================================================
// Other abort paths
// ============================================================

#[test]
fn jumpsub_into_push_data_is_invalid() {
    // PUSH1 4, JUMPSUB, PUSH1 0xb2 -- offset 4 holds 0xb2 but as data
    let (result, _) = execute("6004b360b2");
    assert!(matches!(
        result,
        Err(RuntimeError::InvalidJumpDestination { at: 2, .. })
    ));
}

#[test]
fn jumpsub_to_jumpdest_is_invalid() {
    // PUSH1 4, JUMPSUB, STOP, JUMPDEST
    let (result, _) = execute("6004b3005b");
    assert!(matches!(
        result,
        Err(RuntimeError::InvalidJumpDestination { at: 2, .. })
    ));
}

#[test]
fn jumpsub_with_empty_data_stack_underflows() {
    let (result, _) = execute("b3");
    assert_eq!(
        result,
        Err(RuntimeError::StackUnderflow {
            at: 0,
            len: 0,
            required: 1
        })
    );
}

#[test]
fn unbounded_recursion_overflows_return_stack() {
    // 0: PUSH1 4, JUMPSUB, STOP
    // 4: BEGINSUB, PUSH1 4, JUMPSUB
    let code = Code::from_hex("6004b300b26004b3").unwrap();
    let mut vm = Machine::new(&code, &Config::default());
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::ReturnStackOverflow { at: 7 })
    );
    assert_eq!(vm.return_stack().len(), 1023);
    // the failed JUMPSUB left its target on the data stack
    assert_eq!(vm.stack(), &[U256::from(4u64)]);
    assert_eq!(vm.pc(), 7);
}

#[test]
fn insufficient_gas_for_landing() {
    // PUSH1 4 (3) + JUMPSUB (8) = 11, landing needs 1 more
    let code = Code::from_hex("6004b300b2b7").unwrap();
    let result = subvm_vm::run(&code, &Config::with_gas_limit(11));
    assert_eq!(result, Err(RuntimeError::OutOfGas { at: 4 }));
}

#[test]
fn exact_gas_is_enough() {
    let code = Code::from_hex("6004b300b2b7").unwrap();
    let outcome = subvm_vm::run(&code, &Config::with_gas_limit(14)).unwrap();
    assert_eq!(outcome.gas_used, 14);
}

// ============================================================
// Execution context lifetime
// ============================================================

#[test]
fn finished_context_is_not_reentered() {
    let code = Code::from_hex("b75858").unwrap();
    let mut vm = Machine::new(&code, &Config::with_gas_limit(GAS));
    let first = vm.execute();
    assert!(vm.is_finished());

    let mut log = TraceLog::new();
    let second = vm.execute_with(&mut log);
    assert_eq!(first, second);
    assert!(log.steps.is_empty());
}

#[test]
fn each_context_gets_its_own_return_stack() {
    // BEGINSUB body that never returns: PUSH1 4, JUMPSUB, STOP, BEGINSUB, STOP
    let code = Code::from_hex("6004b300b200").unwrap();
    let mut first = Machine::new(&code, &Config::default());
    first.execute().unwrap();
    assert_eq!(first.return_stack().as_slice(), &[3]);

    let second = Machine::new(&code, &Config::default());
    assert!(second.return_stack().is_empty());
}

#[test]
fn empty_code_halts_immediately() {
    let (result, log) = execute("");
    let outcome = result.unwrap();
    assert_eq!(outcome.gas_used, 0);
    assert_eq!(outcome.pc, 0);
    assert!(log.steps.is_empty());
}

#[test]
fn depth_is_return_stack_depth_before_each_step() {
    let (_, log) = execute("6800000000000000000cb300b26011b3b7b2b7");
    let depths: Vec<usize> = log.steps.iter().map(|s| s.depth).collect();
    assert_eq!(depths, vec![0, 0, 1, 1, 1, 2, 2, 1, 0]);
}

#[test]
fn step_records_serialize_camel_case() {
    let (_, log) = execute("6004b300b2b7");
    let json = serde_json::to_string(&log.steps[2]).unwrap();
    assert_eq!(
        json,
        format!(
            r#"{{"pc":4,"op":"BEGINSUB","gas":{},"gasCost":1,"depth":1,"stack":[],"returnStack":[3]}}"#,
            GAS - 11
        )
    );
}
