// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Gate-level circuit description.
//!
//! A [`Program`] is the flattened form of an arithmetic circuit: one
//! selector row and one wire-label triple per gate, plus the ordered
//! list of public-input labels. Preprocessing pads the tables to the
//! group order and derives the permutation polynomials from the wire
//! labels.
//!
//! Public inputs follow the pinning convention: the `j`-th public label
//! must be pinned by the gate in row `j` (a `q_l = 1` row whose left
//! wire is the public variable), since the public-input polynomial
//! carries `-value` in slot `j`.

use crate::error::Error;
use crate::permutation::Permutation;
use crate::poly::Polynomial;
use ark_ff::PrimeField;
use hashbrown::HashMap;

/// A wire label. `None` is the distinguished unused wire, which always
/// carries the value zero.
pub type WireLabel = Option<String>;

/// Assignment of a scalar to every wire label used by a circuit.
///
/// The unused label may be omitted; it defaults to zero.
pub type Witness<F> = HashMap<WireLabel, F>;

/// The wire labels of a single gate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GateWires {
    /// Label of the left input wire.
    pub left: WireLabel,
    /// Label of the right input wire.
    pub right: WireLabel,
    /// Label of the output wire.
    pub output: WireLabel,
}

impl GateWires {
    /// Builds a wire triple from optional label names.
    pub fn new(
        left: Option<&str>,
        right: Option<&str>,
        output: Option<&str>,
    ) -> Self {
        Self {
            left: left.map(str::to_owned),
            right: right.map(str::to_owned),
            output: output.map(str::to_owned),
        }
    }
}

/// Selector row of a single gate, enforcing
/// `q_l * a + q_r * b + q_m * a * b + q_o * c + q_c + pi = 0`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Gate<F>
where
    F: PrimeField,
{
    /// Left input selector.
    pub q_l: F,
    /// Right input selector.
    pub q_r: F,
    /// Multiplication selector.
    pub q_m: F,
    /// Output selector.
    pub q_o: F,
    /// Constant selector.
    pub q_c: F,
}

impl<F> Gate<F>
where
    F: PrimeField,
{
    /// Builds a gate from its five selector values.
    pub fn new(q_l: F, q_r: F, q_m: F, q_o: F, q_c: F) -> Self {
        Self {
            q_l,
            q_r,
            q_m,
            q_o,
            q_c,
        }
    }
}

/// Selector and permutation polynomials of a preprocessed circuit, all
/// in the Lagrange basis of size `group_order`. Immutable once built.
#[derive(Clone, Debug)]
pub struct CommonPreprocessedInput<F>
where
    F: PrimeField,
{
    /// Order of the evaluation subgroup; a power of two at least the
    /// number of gates.
    pub group_order: usize,
    /// Left input selector polynomial.
    pub q_l: Polynomial<F>,
    /// Right input selector polynomial.
    pub q_r: Polynomial<F>,
    /// Multiplication selector polynomial.
    pub q_m: Polynomial<F>,
    /// Output selector polynomial.
    pub q_o: Polynomial<F>,
    /// Constant selector polynomial.
    pub q_c: Polynomial<F>,
    /// Permutation polynomial of the left-wire column.
    pub left_sigma: Polynomial<F>,
    /// Permutation polynomial of the right-wire column.
    pub right_sigma: Polynomial<F>,
    /// Permutation polynomial of the output-wire column.
    pub out_sigma: Polynomial<F>,
}

/// A compiled circuit: gate selector rows, wire labels and public-input
/// labels.
#[derive(Clone, Debug)]
pub struct Program<F>
where
    F: PrimeField,
{
    group_order: usize,
    gates: Vec<Gate<F>>,
    wires: Vec<GateWires>,
    public_inputs: Vec<String>,
}

impl<F> Program<F>
where
    F: PrimeField,
{
    /// Builds a program after checking that the gate and wire tables
    /// agree in length and fit into the evaluation subgroup.
    pub fn new(
        gates: Vec<Gate<F>>,
        wires: Vec<GateWires>,
        public_inputs: Vec<String>,
        group_order: usize,
    ) -> Result<Self, Error> {
        if gates.len() != wires.len() {
            return Err(Error::MismatchedPolyLen);
        }
        // Fails fast on a group order that is not an FFT-friendly power
        // of two or is smaller than the gate count.
        Polynomial::<F>::subgroup_domain(group_order)?;
        if gates.len() > group_order
            || public_inputs.len() > group_order
        {
            return Err(Error::MismatchedPolyLen);
        }
        Ok(Self {
            group_order,
            gates,
            wires,
            public_inputs,
        })
    }

    /// Order of the evaluation subgroup.
    pub fn group_order(&self) -> usize {
        self.group_order
    }

    /// The wire-label triples, one per gate.
    pub fn wires(&self) -> &[GateWires] {
        &self.wires
    }

    /// The ordered labels designated as public inputs.
    pub fn public_assignments(&self) -> &[String] {
        &self.public_inputs
    }

    /// Pads the selector tables to the group order and derives the
    /// permutation polynomials from the wire labels.
    pub fn common_preprocessed_input(
        &self,
    ) -> Result<CommonPreprocessedInput<F>, Error> {
        let n = self.group_order;

        let mut q_l = vec![F::zero(); n];
        let mut q_r = vec![F::zero(); n];
        let mut q_m = vec![F::zero(); n];
        let mut q_o = vec![F::zero(); n];
        let mut q_c = vec![F::zero(); n];
        for (i, gate) in self.gates.iter().enumerate() {
            q_l[i] = gate.q_l;
            q_r[i] = gate.q_r;
            q_m[i] = gate.q_m;
            q_o[i] = gate.q_o;
            q_c[i] = gate.q_c;
        }

        let mut permutation = Permutation::with_capacity(n);
        for (i, gate_wires) in self.wires.iter().enumerate() {
            permutation.add_gate_wires(i, gate_wires);
        }
        let (left_sigma, right_sigma, out_sigma) =
            permutation.compute_sigma_polynomials(n)?;

        Ok(CommonPreprocessedInput {
            group_order: n,
            q_l: Polynomial::lagrange(q_l),
            q_r: Polynomial::lagrange(q_r),
            q_m: Polynomial::lagrange(q_m),
            q_o: Polynomial::lagrange(q_o),
            q_c: Polynomial::lagrange(q_c),
            left_sigma,
            right_sigma,
            out_sigma,
        })
    }
}

/// Looks up the value of a wire label in a witness.
///
/// The unused label defaults to zero; any other missing label is an
/// error.
pub(crate) fn witness_value<F>(
    witness: &Witness<F>,
    label: &WireLabel,
) -> Result<F, Error>
where
    F: PrimeField,
{
    match witness.get(label) {
        Some(value) => Ok(*value),
        None if label.is_none() => Ok(F::zero()),
        None => Err(Error::CircuitInputsNotFound),
    }
}
