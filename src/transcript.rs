// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Fiat-Shamir transcript driving the five proving rounds.
//!
//! A thin layer over a [Merlin transcript](Transcript): the round
//! methods absorb each message's serialized elements and squeeze the
//! challenges that round produces. The prover and the verifier absorb
//! the same bytes in the same order, so squeezing reproduces identical
//! challenges on both sides.

use crate::proof_system::{Message1, Message2, Message3, ProofEvaluations};
use ark_ec::PairingEngine;
use ark_ff::PrimeField;
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::CanonicalSerialize;
use core::marker::PhantomData;
use merlin::Transcript;

/// Number of bytes squeezed per challenge; twice the scalar width keeps
/// the bias of the modular reduction negligible.
const CHALLENGE_BYTES: usize = 64;

/// Fiat-Shamir transcript of the five-round protocol.
#[derive(derivative::Derivative)]
#[derivative(Clone)]
pub(crate) struct TranscriptWrapper<E>
where
    E: PairingEngine,
{
    transcript: Transcript,

    /// Type Parameter Marker
    __: PhantomData<E>,
}

impl<E> TranscriptWrapper<E>
where
    E: PairingEngine,
{
    /// Builds a new [`TranscriptWrapper`] seeded with the given
    /// domain-separation `label`.
    pub fn new(label: &'static [u8]) -> Self {
        Self {
            transcript: Transcript::new(label),
            __: PhantomData,
        }
    }

    /// Absorbs the wire commitments and squeezes the permutation
    /// challenges `(beta, gamma)`.
    pub fn round_1(&mut self, msg: &Message1<E>) -> (E::Fr, E::Fr) {
        self.absorb_commitment(b"a", &msg.a_comm);
        self.absorb_commitment(b"b", &msg.b_comm);
        self.absorb_commitment(b"c", &msg.c_comm);
        (
            self.squeeze_challenge(b"beta"),
            self.squeeze_challenge(b"gamma"),
        )
    }

    /// Absorbs the grand-product commitment and squeezes the constraint
    /// combiner `alpha` and the coset shift.
    pub fn round_2(&mut self, msg: &Message2<E>) -> (E::Fr, E::Fr) {
        self.absorb_commitment(b"z", &msg.z_comm);
        (
            self.squeeze_challenge(b"alpha"),
            self.squeeze_challenge(b"coset shift"),
        )
    }

    /// Absorbs the split-quotient commitments and squeezes the
    /// evaluation point `zeta`.
    pub fn round_3(&mut self, msg: &Message3<E>) -> E::Fr {
        self.absorb_commitment(b"t_lo", &msg.t_lo_comm);
        self.absorb_commitment(b"t_mid", &msg.t_mid_comm);
        self.absorb_commitment(b"t_hi", &msg.t_hi_comm);
        self.squeeze_challenge(b"zeta")
    }

    /// Absorbs the opening evaluations and squeezes the batch combiner
    /// `v`.
    pub fn round_4(
        &mut self,
        evaluations: &ProofEvaluations<E::Fr>,
    ) -> E::Fr {
        self.absorb_scalar(b"a_eval", &evaluations.a_eval);
        self.absorb_scalar(b"b_eval", &evaluations.b_eval);
        self.absorb_scalar(b"c_eval", &evaluations.c_eval);
        self.absorb_scalar(b"left_sig_eval", &evaluations.left_sigma_eval);
        self.absorb_scalar(
            b"right_sig_eval",
            &evaluations.right_sigma_eval,
        );
        self.absorb_scalar(b"perm_eval", &evaluations.permutation_eval);
        self.squeeze_challenge(b"v")
    }

    /// Absorbs the subgroup order, separating transcripts of circuits
    /// with different sizes.
    pub fn absorb_circuit_size(&mut self, n: u64) {
        self.transcript.append_u64(b"group order", n);
    }

    /// Absorbs a commitment as its serialized curve point.
    pub fn absorb_commitment(
        &mut self,
        label: &'static [u8],
        commitment: &Commitment<E>,
    ) {
        let mut bytes = Vec::new();
        commitment
            .0
            .serialize(&mut bytes)
            .expect("infallible write to a byte vector");
        self.transcript.append_message(label, &bytes);
    }

    /// Absorbs a scalar as its serialized bytes.
    pub fn absorb_scalar(&mut self, label: &'static [u8], scalar: &E::Fr) {
        let mut bytes = Vec::new();
        scalar
            .serialize(&mut bytes)
            .expect("infallible write to a byte vector");
        self.transcript.append_message(label, &bytes);
    }

    /// Squeezes a challenge scalar bound to everything absorbed so far.
    fn squeeze_challenge(&mut self, label: &'static [u8]) -> E::Fr {
        let mut bytes = [0u8; CHALLENGE_BYTES];
        self.transcript.challenge_bytes(label, &mut bytes);
        E::Fr::from_le_bytes_mod_order(&bytes)
    }
}
