// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A pure-Rust implementation of the PLONK proving algorithm over BN254
//! with KZG polynomial commitments.
//!
//! Given a universal [`Setup`], a gate-level [`Program`] and a
//! [`Witness`] assignment, the [`Prover`] runs the five-round
//! Fiat-Shamir protocol and emits a constant-size [`Proof`] (nine G1
//! points and six scalars) that the witness satisfies the circuit. The
//! matching [`VerifierKey`] lets anyone check the proof with two
//! pairings.
//!
//! The crate is generic over the pairing engine in the arkworks style;
//! BN254 (via `ark_bn254::Bn254`) is the supported and tested
//! instantiation, and the trusted-setup file loader is specific to it.
//!
//! ```
//! use ark_bn254::{Bn254, Fr};
//! use plonk_bn254::{Gate, GateWires, Program, Prover, Setup, Witness};
//!
//! # fn main() -> Result<(), plonk_bn254::Error> {
//! // A single gate: a * b = c, over a subgroup of order 4.
//! let gates = vec![Gate::new(
//!     Fr::from(0u64),
//!     Fr::from(0u64),
//!     Fr::from(1u64),
//!     -Fr::from(1u64),
//!     Fr::from(0u64),
//! )];
//! let wires = vec![GateWires::new(Some("a"), Some("b"), Some("c"))];
//! let program = Program::new(gates, wires, vec![], 4)?;
//!
//! let setup = Setup::<Bn254>::generate(4, &mut rand_core::OsRng);
//! let prover = Prover::new(&setup, &program)?;
//! let verifier_key = prover.verifier_key().clone();
//!
//! let mut witness = Witness::new();
//! witness.insert(Some("a".into()), Fr::from(3u64));
//! witness.insert(Some("b".into()), Fr::from(4u64));
//! witness.insert(Some("c".into()), Fr::from(12u64));
//!
//! let proof = prover.prove(&witness)?;
//! proof.verify(&verifier_key, &[])?;
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

mod circuit;
mod error;
mod permutation;
mod poly;
mod proof_system;
mod setup;
mod transcript;
mod util;

pub use circuit::{
    CommonPreprocessedInput, Gate, GateWires, Program, WireLabel,
    Witness,
};
pub use error::Error;
pub use poly::{Basis, Polynomial};
pub use proof_system::{Proof, ProofEvaluations, Prover, VerifierKey};
pub use setup::Setup;
