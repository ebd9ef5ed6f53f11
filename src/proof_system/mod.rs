// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Proving and verifying proofs of circuit satisfiability.

mod proof;
mod prover;

pub use proof::{
    Message1, Message2, Message3, Message5, Proof, ProofEvaluations,
};
pub use prover::Prover;

use crate::transcript::TranscriptWrapper;
use ark_ec::PairingEngine;
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError,
    Write,
};

/// Commitments to the preprocessed circuit polynomials, together with
/// the G2 element of the setup. This is everything the verifier needs
/// besides the proof and the public inputs.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(
    Clone(bound = ""),
    Debug(bound = ""),
    Eq(bound = ""),
    PartialEq(bound = "")
)]
pub struct VerifierKey<E>
where
    E: PairingEngine,
{
    /// Order of the evaluation subgroup the circuit was preprocessed
    /// over.
    pub n: usize,

    /// Commitment to the multiplication selector polynomial.
    pub q_m: Commitment<E>,

    /// Commitment to the left input selector polynomial.
    pub q_l: Commitment<E>,

    /// Commitment to the right input selector polynomial.
    pub q_r: Commitment<E>,

    /// Commitment to the output selector polynomial.
    pub q_o: Commitment<E>,

    /// Commitment to the constant selector polynomial.
    pub q_c: Commitment<E>,

    /// Commitment to the left-wire permutation polynomial.
    pub left_sigma: Commitment<E>,

    /// Commitment to the right-wire permutation polynomial.
    pub right_sigma: Commitment<E>,

    /// Commitment to the output-wire permutation polynomial.
    pub out_sigma: Commitment<E>,

    /// `[x]_2` from the setup.
    pub x_2: E::G2Affine,
}

impl<E> VerifierKey<E>
where
    E: PairingEngine,
{
    /// Absorbs the circuit description into the transcript.
    ///
    /// Both the prover and the verifier seed their transcripts with the
    /// key before round 1, so the challenges bind the proof to the
    /// circuit being proven.
    pub(crate) fn seed_transcript(
        &self,
        transcript: &mut TranscriptWrapper<E>,
    ) {
        transcript.absorb_circuit_size(self.n as u64);
        transcript.absorb_commitment(b"q_m", &self.q_m);
        transcript.absorb_commitment(b"q_l", &self.q_l);
        transcript.absorb_commitment(b"q_r", &self.q_r);
        transcript.absorb_commitment(b"q_o", &self.q_o);
        transcript.absorb_commitment(b"q_c", &self.q_c);
        transcript.absorb_commitment(b"left_sigma", &self.left_sigma);
        transcript.absorb_commitment(b"right_sigma", &self.right_sigma);
        transcript.absorb_commitment(b"out_sigma", &self.out_sigma);
    }
}
