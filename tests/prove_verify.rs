// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! End-to-end proving and verification over BN254.

use ark_bn254::{Bn254, Fr, G1Affine};
use ark_ec::{AffineCurve, ProjectiveCurve};
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::test_rng;
use plonk_bn254::{
    Error, Gate, GateWires, Program, Proof, Prover, Setup, Witness,
};

/// A gate pinning a public variable: `1 * label + pi = 0`.
fn public_input_gate(label: &str) -> (Gate<Fr>, GateWires) {
    (
        Gate::new(
            Fr::from(1u64),
            Fr::from(0u64),
            Fr::from(0u64),
            Fr::from(0u64),
            Fr::from(0u64),
        ),
        GateWires::new(Some(label), None, None),
    )
}

/// `left * right = out`.
fn mul_gate(left: &str, right: &str, out: &str) -> (Gate<Fr>, GateWires) {
    (
        Gate::new(
            Fr::from(0u64),
            Fr::from(0u64),
            Fr::from(1u64),
            -Fr::from(1u64),
            Fr::from(0u64),
        ),
        GateWires::new(Some(left), Some(right), Some(out)),
    )
}

/// `left + right = out`.
fn add_gate(left: &str, right: &str, out: &str) -> (Gate<Fr>, GateWires) {
    (
        Gate::new(
            Fr::from(1u64),
            Fr::from(1u64),
            Fr::from(0u64),
            -Fr::from(1u64),
            Fr::from(0u64),
        ),
        GateWires::new(Some(left), Some(right), Some(out)),
    )
}

/// `left + constant = out`.
fn add_constant_gate(
    left: &str,
    constant: u64,
    out: &str,
) -> (Gate<Fr>, GateWires) {
    (
        Gate::new(
            Fr::from(1u64),
            Fr::from(0u64),
            Fr::from(0u64),
            -Fr::from(1u64),
            Fr::from(constant),
        ),
        GateWires::new(Some(left), None, Some(out)),
    )
}

fn program_of(
    rows: Vec<(Gate<Fr>, GateWires)>,
    public_inputs: &[&str],
    group_order: usize,
) -> Program<Fr> {
    let (gates, wires) = rows.into_iter().unzip();
    Program::new(
        gates,
        wires,
        public_inputs.iter().map(|s| s.to_string()).collect(),
        group_order,
    )
    .unwrap()
}

fn witness_of(entries: &[(&str, u64)]) -> Witness<Fr> {
    entries
        .iter()
        .map(|(label, value)| {
            (Some(label.to_string()), Fr::from(*value))
        })
        .collect()
}

/// The circuit `x * y + z = out` with `out` as a public input.
fn product_sum_program() -> Program<Fr> {
    program_of(
        vec![
            public_input_gate("out"),
            mul_gate("x", "y", "xy"),
            add_gate("xy", "z", "out"),
        ],
        &["out"],
        4,
    )
}

#[test]
fn product_sum_circuit_proves_and_verifies() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(4, rng);
    let program = product_sum_program();

    let witness = witness_of(&[
        ("x", 1),
        ("y", 2),
        ("z", 5),
        ("xy", 2),
        ("out", 7),
    ]);

    let prover = Prover::new(&setup, &program).unwrap();
    let verifier_key = prover.verifier_key().clone();
    let proof = prover.prove(&witness).unwrap();

    proof.verify(&verifier_key, &[Fr::from(7u64)]).unwrap();
}

#[test]
fn unsatisfying_witness_is_rejected_before_committing() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(4, rng);
    let program = product_sum_program();

    // 1 * 2 + 4 = 6, but the public output claims 7.
    let witness = witness_of(&[
        ("x", 1),
        ("y", 2),
        ("z", 4),
        ("xy", 2),
        ("out", 7),
    ]);

    let prover = Prover::new(&setup, &program).unwrap();
    assert!(matches!(
        prover.prove(&witness),
        Err(Error::WitnessDoesNotSatisfyCircuit)
    ));
}

#[test]
fn wrong_public_input_fails_verification() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(4, rng);
    let program = product_sum_program();

    let witness = witness_of(&[
        ("x", 1),
        ("y", 2),
        ("z", 5),
        ("xy", 2),
        ("out", 7),
    ]);

    let prover = Prover::new(&setup, &program).unwrap();
    let verifier_key = prover.verifier_key().clone();
    let proof = prover.prove(&witness).unwrap();

    assert!(matches!(
        proof.verify(&verifier_key, &[Fr::from(8u64)]),
        Err(Error::ProofVerificationError)
    ));
}

#[test]
fn cubic_circuit_proves_and_verifies() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(8, rng);

    // x^3 + x + 5 = 35 with x = 3.
    let program = program_of(
        vec![
            public_input_gate("out"),
            mul_gate("x", "x", "x2"),
            mul_gate("x2", "x", "x3"),
            add_gate("x3", "x", "x3_plus_x"),
            add_constant_gate("x3_plus_x", 5, "out"),
        ],
        &["out"],
        8,
    );
    let witness = witness_of(&[
        ("x", 3),
        ("x2", 9),
        ("x3", 27),
        ("x3_plus_x", 30),
        ("out", 35),
    ]);

    let prover = Prover::new(&setup, &program).unwrap();
    let verifier_key = prover.verifier_key().clone();
    let proof = prover.prove(&witness).unwrap();

    proof.verify(&verifier_key, &[Fr::from(35u64)]).unwrap();
}

fn bump(comm: &mut Commitment<Bn254>) {
    comm.0 = (comm.0.into_projective()
        + G1Affine::prime_subgroup_generator().into_projective())
    .into_affine();
}

#[test]
fn tampered_proofs_are_rejected() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(8, rng);

    // a * b = c without public inputs, over a subgroup of order 8.
    let program =
        program_of(vec![mul_gate("a", "b", "c")], &[], 8);
    let witness = witness_of(&[("a", 3), ("b", 4), ("c", 12)]);

    let prover = Prover::new(&setup, &program).unwrap();
    let verifier_key = prover.verifier_key().clone();
    let proof = prover.prove(&witness).unwrap();

    proof.verify(&verifier_key, &[]).unwrap();

    let mutations: [fn(&mut Proof<Bn254>); 9] = [
        |proof| bump(&mut proof.a_comm),
        |proof| bump(&mut proof.b_comm),
        |proof| bump(&mut proof.c_comm),
        |proof| bump(&mut proof.z_comm),
        |proof| bump(&mut proof.t_lo_comm),
        |proof| bump(&mut proof.t_mid_comm),
        |proof| bump(&mut proof.t_hi_comm),
        |proof| bump(&mut proof.w_z_comm),
        |proof| bump(&mut proof.w_zw_comm),
    ];
    for mutate in mutations {
        let mut tampered = proof.clone();
        mutate(&mut tampered);
        assert!(matches!(
            tampered.verify(&verifier_key, &[]),
            Err(Error::ProofVerificationError)
        ));
    }

    let mut tampered = proof.clone();
    tampered.evaluations.a_eval += Fr::from(1u64);
    assert!(matches!(
        tampered.verify(&verifier_key, &[]),
        Err(Error::ProofVerificationError)
    ));

    // Byte-level tampering is caught either at deserialization (the
    // point no longer lies on the curve) or by the pairing checks.
    let mut bytes = Vec::new();
    proof.serialize(&mut bytes).unwrap();
    for position in [0, bytes.len() / 2] {
        let mut flipped = bytes.clone();
        flipped[position] ^= 1;
        match Proof::<Bn254>::deserialize(flipped.as_slice()) {
            Ok(bad_proof) => assert!(
                bad_proof.verify(&verifier_key, &[]).is_err()
            ),
            Err(_) => {}
        }
    }
}

#[test]
fn proofs_are_deterministic() {
    let rng = &mut test_rng();
    let setup = Setup::<Bn254>::generate(4, rng);
    let program = product_sum_program();
    let witness = witness_of(&[
        ("x", 1),
        ("y", 2),
        ("z", 5),
        ("xy", 2),
        ("out", 7),
    ]);

    let first = Prover::new(&setup, &program)
        .unwrap()
        .prove(&witness)
        .unwrap();
    let second = Prover::new(&setup, &program)
        .unwrap()
        .prove(&witness)
        .unwrap();
    assert_eq!(first, second);
}
