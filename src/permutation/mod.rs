// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Permutations
//!
//! The copy constraints of a circuit are encoded as a permutation over
//! the wire positions: every set of cells wired to the same variable
//! forms a cycle. This module derives the sigma polynomials from the
//! wire labels and builds the grand-product accumulator column that
//! proves the wire values respect that permutation.

pub(crate) mod constants;

use crate::circuit::{GateWires, WireLabel};
use crate::error::Error;
use crate::poly::Polynomial;
use ark_ff::fields::batch_inversion;
use ark_ff::PrimeField;
use ark_poly::EvaluationDomain;
use constants::{K1, K2};
use core::marker::PhantomData;
use hashbrown::HashMap;
use itertools::izip;
use num_traits::Zero;

/// A wire position inside the gate table: column and row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WireData {
    /// Left wire of the gate at the given index.
    Left(usize),
    /// Right wire of the gate at the given index.
    Right(usize),
    /// Output wire of the gate at the given index.
    Output(usize),
}

/// Permutation provides the necessary state information and functions
/// to create the sigma polynomials. In the literature, Z(X) is the
/// "accumulator"; this codebase calls it the grand-product polynomial.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub(crate) struct Permutation<F>
where
    F: PrimeField,
{
    /// Maps a wire label to the positions it occupies.
    variable_map: HashMap<WireLabel, Vec<WireData>>,

    /// Type Parameter Marker
    __: PhantomData<F>,
}

impl<F> Permutation<F>
where
    F: PrimeField,
{
    /// Creates a Permutation struct with an expected capacity of `n`.
    pub fn with_capacity(expected_size: usize) -> Self {
        Self {
            variable_map: HashMap::with_capacity(expected_size),
            __: PhantomData,
        }
    }

    /// Records the three wire labels of the gate at `gate_index`.
    ///
    /// Cells sharing a label end up in the same cycle; the unused label
    /// is treated like any other since all of its cells carry zero.
    pub fn add_gate_wires(&mut self, gate_index: usize, wires: &GateWires) {
        self.add_wire(wires.left.clone(), WireData::Left(gate_index));
        self.add_wire(wires.right.clone(), WireData::Right(gate_index));
        self.add_wire(wires.output.clone(), WireData::Output(gate_index));
    }

    fn add_wire(&mut self, label: WireLabel, wire_data: WireData) {
        self.variable_map
            .entry(label)
            .or_insert_with(Vec::new)
            .push(wire_data);
    }

    /// Computes the sigma polynomials over the size-`n` domain.
    ///
    /// Positions are encoded as field elements: row `i` of the left,
    /// right and output columns map to `omega^i`, `K1 * omega^i` and
    /// `K2 * omega^i` respectively. Every cell takes the encoding of the
    /// next cell in its cycle; rows without gates keep the identity.
    pub fn compute_sigma_polynomials(
        &self,
        n: usize,
    ) -> Result<(Polynomial<F>, Polynomial<F>, Polynomial<F>), Error> {
        let domain = Polynomial::<F>::subgroup_domain(n)?;
        let roots: Vec<F> = domain.elements().collect();

        let mut left_sigma = roots.clone();
        let mut right_sigma: Vec<F> =
            roots.iter().map(|root| K1::<F>() * root).collect();
        let mut out_sigma: Vec<F> =
            roots.iter().map(|root| K2::<F>() * root).collect();

        let position_encoding = |wire: &WireData| match wire {
            WireData::Left(i) => roots[*i],
            WireData::Right(i) => K1::<F>() * roots[*i],
            WireData::Output(i) => K2::<F>() * roots[*i],
        };

        for cells in self.variable_map.values() {
            for (j, cell) in cells.iter().enumerate() {
                let next = &cells[(j + 1) % cells.len()];
                let encoding = position_encoding(next);
                match cell {
                    WireData::Left(i) => left_sigma[*i] = encoding,
                    WireData::Right(i) => right_sigma[*i] = encoding,
                    WireData::Output(i) => out_sigma[*i] = encoding,
                }
            }
        }

        Ok((
            Polynomial::lagrange(left_sigma),
            Polynomial::lagrange(right_sigma),
            Polynomial::lagrange(out_sigma),
        ))
    }
}

/// Builds the grand-product column `z` for the permutation argument.
///
/// `z[0] = 1` and each step multiplies the running product by the ratio
/// of the randomized position encodings to the randomized sigma
/// encodings. For wires consistent with the permutation the product
/// telescopes back to one after `n` steps; otherwise this returns
/// [`Error::PermutationProductDidNotClose`].
pub(crate) fn compute_grand_product<F>(
    roots: &[F],
    wires: (&[F], &[F], &[F]),
    sigmas: (&[F], &[F], &[F]),
    beta: F,
    gamma: F,
) -> Result<Vec<F>, Error>
where
    F: PrimeField,
{
    let (a, b, c) = wires;
    let (left_sigma, right_sigma, out_sigma) = sigmas;
    let n = roots.len();

    let rlc = |value: F, position: F| value + beta * position + gamma;

    let mut numerators = Vec::with_capacity(n);
    let mut denominators = Vec::with_capacity(n);
    for (root, a, b, c, s1, s2, s3) in
        izip!(roots, a, b, c, left_sigma, right_sigma, out_sigma)
    {
        numerators.push(
            rlc(*a, *root)
                * rlc(*b, K1::<F>() * root)
                * rlc(*c, K2::<F>() * root),
        );
        denominators.push(rlc(*a, *s1) * rlc(*b, *s2) * rlc(*c, *s3));
    }

    // A vanishing denominator means the accumulator cannot telescope.
    if denominators.iter().any(Zero::is_zero) {
        return Err(Error::PermutationProductDidNotClose);
    }
    let mut denominator_invs = denominators;
    batch_inversion(&mut denominator_invs);

    let mut values = Vec::with_capacity(n);
    let mut accumulator = F::one();
    for (numerator, denominator_inv) in
        numerators.iter().zip(denominator_invs.iter())
    {
        values.push(accumulator);
        accumulator *= *numerator * denominator_inv;
    }

    // The product over all rows must wrap around to one.
    if accumulator != F::one() {
        return Err(Error::PermutationProductDidNotClose);
    }

    #[cfg(debug_assertions)]
    for i in 0..n {
        debug_assert_eq!(
            values[(i + 1) % n],
            values[i] * numerators[i] * denominator_invs[i],
            "grand-product recurrence broken at row {}",
            i
        );
    }

    Ok(values)
}
