// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A collection of all possible errors encountered in PLONK.

/// Defines all possible errors that can be encountered in PLONK.
///
/// Every error is fatal: the prover and verifier surface them immediately
/// and never retry.
#[derive(Debug)]
pub enum Error {
    // FFT errors
    /// This error occurs when an evaluation domain of the requested size
    /// cannot be constructed for the scalar field.
    InvalidEvalDomainSize {
        /// Log size of the group
        log_size_of_group: u32,
        /// Two-adicity of the scalar field
        adicity: u32,
    },

    // Polynomial engine errors
    /// This error occurs when two polynomials in different bases are
    /// combined pointwise.
    PolynomialBasisMismatch,
    /// This error occurs when two polynomials of different sizes are
    /// combined pointwise.
    PolynomialSizeMismatch {
        /// Size of the left operand
        left: usize,
        /// Size of the right operand
        right: usize,
    },
    /// This error occurs when a pointwise division hits a zero evaluation.
    /// It indicates an invalid coset shift or evaluation point.
    DivisionByZeroOnCoset,

    // Prover errors
    /// This error occurs when the wire assignments do not satisfy the gate
    /// constraints of the circuit.
    WitnessDoesNotSatisfyCircuit,
    /// This error occurs when the permutation grand product does not wrap
    /// around to one, i.e. the wire values are inconsistent with the copy
    /// constraints.
    PermutationProductDidNotClose,
    /// This error occurs when the quotient or linearization polynomial
    /// carries non-zero high-order monomial coefficients.
    QuotientDegreeOverflow,
    /// This error occurs when the circuit is not provided with all of the
    /// required inputs.
    CircuitInputsNotFound,

    // Preprocessing errors
    /// This error occurs when the gate and wire tables of a program have
    /// inconsistent lengths.
    MismatchedPolyLen,

    // Trusted setup errors
    /// This error occurs when a polynomial is committed against a setup
    /// with too few powers.
    SetupTooSmall {
        /// Size of the polynomial being committed
        polynomial_size: usize,
        /// Number of G1 powers in the setup
        setup_size: usize,
    },
    /// This error occurs when a trusted-setup file cannot be parsed.
    SetupFileMalformed {
        /// Description of the parse failure
        reason: String,
    },

    // Verifier errors
    /// This error occurs when a proof verification fails.
    ProofVerificationError,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEvalDomainSize {
                log_size_of_group,
                adicity,
            } => write!(
                f,
                "log-size of the evaluation domain group > two-adicity: \
                {:?} > {:?}",
                log_size_of_group, adicity
            ),
            Self::PolynomialBasisMismatch => {
                write!(f, "polynomial operands are in different bases")
            }
            Self::PolynomialSizeMismatch { left, right } => write!(
                f,
                "polynomial operands have different sizes: {} != {}",
                left, right
            ),
            Self::DivisionByZeroOnCoset => {
                write!(f, "pointwise division by a zero evaluation")
            }
            Self::WitnessDoesNotSatisfyCircuit => {
                write!(f, "witness does not satisfy the gate constraints")
            }
            Self::PermutationProductDidNotClose => {
                write!(f, "permutation grand product did not close to one")
            }
            Self::QuotientDegreeOverflow => {
                write!(f, "quotient polynomial exceeds its degree bound")
            }
            Self::CircuitInputsNotFound => {
                write!(f, "circuit inputs not found")
            }
            Self::MismatchedPolyLen => {
                write!(f, "the length of the gate and wire tables differ")
            }
            Self::SetupTooSmall {
                polynomial_size,
                setup_size,
            } => write!(
                f,
                "setup holds {} G1 powers but the polynomial has size {}",
                setup_size, polynomial_size
            ),
            Self::SetupFileMalformed { reason } => {
                write!(f, "setup file malformed: {}", reason)
            }
            Self::ProofVerificationError => {
                write!(f, "proof verification failed")
            }
        }
    }
}

impl std::error::Error for Error {}
