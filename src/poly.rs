// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Dual-basis polynomial arithmetic.
//!
//! Every polynomial carries a basis tag next to its values and all
//! operations check the tag at entry. The three bases are the evaluations
//! over the size-`n` subgroup of roots of unity (Lagrange), the monomial
//! coefficients (Monomial), and the evaluations over a multiplicative
//! coset of the subgroup of size `4n` (CosetExtendedLagrange). The coset
//! shift is sampled by the transcript, which keeps the evaluation grid off
//! the roots of unity and makes division by the vanishing polynomial
//! well-defined pointwise.

use crate::error::Error;
use crate::util::EvaluationDomainExt;
use ark_ff::fields::batch_inversion;
use ark_ff::{FftField, FftParameters, PrimeField};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use core::ops::{Add, Mul, Sub};
use num_traits::Zero;

/// Ratio between the coset-extended evaluation grid and the subgroup.
pub(crate) const COSET_EXTENSION: usize = 4;

/// The representation a [`Polynomial`]'s values are expressed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Basis {
    /// `values[i]` is the evaluation at the `i`-th root of unity.
    Lagrange,
    /// `values[i]` is the coefficient of `x^i`.
    Monomial,
    /// `values[i]` is the evaluation at `shift * mu^i` for `mu` a root of
    /// unity of the extended (4x) domain.
    CosetExtendedLagrange,
}

/// A polynomial over `F`, tagged with the basis its values live in.
///
/// The size of a polynomial is fixed at construction; pointwise
/// arithmetic requires operands of matching basis and size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Polynomial<F>
where
    F: PrimeField,
{
    /// Evaluations or coefficients, depending on `basis`.
    pub values: Vec<F>,

    /// The basis `values` are expressed in.
    pub basis: Basis,
}

impl<F> Polynomial<F>
where
    F: PrimeField,
{
    /// Wraps `values` in the given `basis`.
    pub fn new(values: Vec<F>, basis: Basis) -> Self {
        Self { values, basis }
    }

    /// Builds a Lagrange-basis polynomial from subgroup evaluations.
    pub fn lagrange(values: Vec<F>) -> Self {
        Self::new(values, Basis::Lagrange)
    }

    /// Builds a monomial-basis polynomial from coefficients.
    pub fn monomial(coeffs: Vec<F>) -> Self {
        Self::new(coeffs, Basis::Monomial)
    }

    /// The Lagrange basis polynomial of the size-`n` subgroup that is
    /// one at `X = 1` and zero at every other root of unity.
    pub fn first_lagrange_basis(size: usize) -> Self {
        let mut values = vec![F::zero(); size];
        if let Some(first) = values.first_mut() {
            *first = F::one();
        }
        Self::lagrange(values)
    }

    /// Number of values (evaluations or coefficients) held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the polynomial holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The evaluation domain matching `size`.
    pub(crate) fn subgroup_domain(
        size: usize,
    ) -> Result<GeneralEvaluationDomain<F>, Error> {
        GeneralEvaluationDomain::new(size).ok_or(
            Error::InvalidEvalDomainSize {
                log_size_of_group: size.trailing_zeros(),
                adicity:
                    <<F as FftField>::FftParams as FftParameters>::TWO_ADICITY,
            },
        )
    }

    /// Converts a monomial-basis polynomial into the Lagrange basis of the
    /// same size. Inverse of [`ifft`](Self::ifft).
    pub fn fft(&self) -> Result<Self, Error> {
        if self.basis != Basis::Monomial {
            return Err(Error::PolynomialBasisMismatch);
        }
        let domain = Self::subgroup_domain(self.len())?;
        Ok(Self::lagrange(domain.fft(&self.values)))
    }

    /// Converts a Lagrange-basis polynomial into the monomial basis of the
    /// same size. Inverse of [`fft`](Self::fft).
    pub fn ifft(&self) -> Result<Self, Error> {
        if self.basis != Basis::Lagrange {
            return Err(Error::PolynomialBasisMismatch);
        }
        let domain = Self::subgroup_domain(self.len())?;
        Ok(Self::monomial(domain.ifft(&self.values)))
    }

    /// Re-evaluates a size-`n` Lagrange polynomial over the shifted `4n`
    /// grid `shift * mu^i`.
    pub fn to_coset_extended_lagrange(
        &self,
        shift: F,
    ) -> Result<Self, Error> {
        if self.basis != Basis::Lagrange {
            return Err(Error::PolynomialBasisMismatch);
        }
        let extended_size = COSET_EXTENSION * self.len();
        let domain = Self::subgroup_domain(self.len())?;
        let extended_domain = Self::subgroup_domain(extended_size)?;

        let mut coeffs = domain.ifft(&self.values);
        coeffs.resize(extended_size, F::zero());
        distribute_powers(&mut coeffs, shift);

        Ok(Self::new(
            extended_domain.fft(&coeffs),
            Basis::CosetExtendedLagrange,
        ))
    }

    /// Interpolates the unique degree `< 4n` polynomial matching the coset
    /// evaluations and returns its monomial coefficients. Inverse of
    /// [`to_coset_extended_lagrange`](Self::to_coset_extended_lagrange).
    pub fn coset_extended_lagrange_to_coeffs(
        &self,
        shift: F,
    ) -> Result<Self, Error> {
        if self.basis != Basis::CosetExtendedLagrange {
            return Err(Error::PolynomialBasisMismatch);
        }
        let extended_domain = Self::subgroup_domain(self.len())?;
        let shift_inv =
            shift.inverse().ok_or(Error::DivisionByZeroOnCoset)?;

        let mut coeffs = extended_domain.ifft(&self.values);
        distribute_powers(&mut coeffs, shift_inv);

        Ok(Self::monomial(coeffs))
    }

    /// Rotates a Lagrange-basis polynomial by `k` positions, i.e. returns
    /// the polynomial `x -> p(omega^k * x)`.
    pub fn shift(&self, k: usize) -> Result<Self, Error> {
        if self.basis != Basis::Lagrange {
            return Err(Error::PolynomialBasisMismatch);
        }
        let mut values = self.values.clone();
        let len = values.len();
        values.rotate_left(k % len);
        Ok(Self::lagrange(values))
    }

    /// Evaluates a Lagrange-basis polynomial at an arbitrary point using
    /// the barycentric formula, in `O(n)` field operations.
    ///
    /// Points on the subgroup itself evaluate to the stored value.
    pub fn barycentric_eval(&self, point: F) -> Result<F, Error> {
        if self.basis != Basis::Lagrange {
            return Err(Error::PolynomialBasisMismatch);
        }
        let domain = Self::subgroup_domain(self.len())?;
        let vanishing = domain.evaluate_vanishing_polynomial(point);

        // The barycentric denominators degenerate on the subgroup, where
        // the evaluation is just a table lookup.
        if vanishing.is_zero() {
            let group_gen = domain.group_gen();
            let mut root = F::one();
            for value in &self.values {
                if root == point {
                    return Ok(*value);
                }
                root *= group_gen;
            }
            return Ok(F::zero());
        }

        let numerator = vanishing * domain.size_inv();

        // Only compute the denominators with non-zero evaluations.
        let non_zero_evaluations = (0..self.len())
            .filter(|&i| !self.values[i].is_zero())
            .collect::<Vec<_>>();

        let group_gen_inv = domain.group_gen_inv();
        let mut denominators = non_zero_evaluations
            .iter()
            .map(|&i| {
                group_gen_inv.pow(&[i as u64, 0, 0, 0]) * point - F::one()
            })
            .collect::<Vec<_>>();
        batch_inversion(&mut denominators);

        let result: F = non_zero_evaluations
            .iter()
            .zip(denominators.iter())
            .map(|(&i, denominator)| self.values[i] * denominator)
            .sum();

        Ok(result * numerator)
    }

    /// Evaluations of the identity polynomial `X` over the shifted grid of
    /// the given extended size.
    pub fn x_evals_over_coset(
        extended_size: usize,
        shift: F,
    ) -> Result<Self, Error> {
        let extended_domain = Self::subgroup_domain(extended_size)?;
        let values = extended_domain
            .elements()
            .map(|root| shift * root)
            .collect();
        Ok(Self::new(values, Basis::CosetExtendedLagrange))
    }

    /// Evaluations of the vanishing polynomial `X^n - 1` of the size-`n`
    /// subgroup over the shifted `4n` grid.
    ///
    /// Non-zero at every grid point whenever `shift^n` is not a 4th root
    /// of unity, which holds with overwhelming probability for a
    /// transcript-sampled shift.
    pub fn vanishing_evals_over_coset(
        group_order: usize,
        shift: F,
    ) -> Result<Self, Error> {
        let extended_size = COSET_EXTENSION * group_order;
        let extended_domain = Self::subgroup_domain(extended_size)?;
        let n = group_order as u64;

        let shift_n = shift.pow(&[n, 0, 0, 0]);
        let group_gen_n =
            extended_domain.group_gen().pow(&[n, 0, 0, 0]);

        let mut power = F::one();
        let values = (0..extended_size)
            .map(|_| {
                let value = shift_n * power - F::one();
                power *= group_gen_n;
                value
            })
            .collect();
        Ok(Self::new(values, Basis::CosetExtendedLagrange))
    }

    fn check_same_shape(&self, other: &Self) -> Result<(), Error> {
        if self.basis != other.basis {
            return Err(Error::PolynomialBasisMismatch);
        }
        if self.len() != other.len() {
            return Err(Error::PolynomialSizeMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }

    fn check_evaluation_basis(&self) -> Result<(), Error> {
        match self.basis {
            Basis::Lagrange | Basis::CosetExtendedLagrange => Ok(()),
            Basis::Monomial => Err(Error::PolynomialBasisMismatch),
        }
    }

    /// Pointwise (resp. coefficient-wise) sum of two polynomials of the
    /// same basis and size.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        self.check_same_shape(other)?;
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| *a + b)
            .collect();
        Ok(Self::new(values, self.basis))
    }

    /// Pointwise (resp. coefficient-wise) difference of two polynomials
    /// of the same basis and size.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.check_same_shape(other)?;
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| *a - b)
            .collect();
        Ok(Self::new(values, self.basis))
    }

    /// Pointwise product of two evaluation-basis polynomials of the same
    /// basis and size.
    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        self.check_same_shape(other)?;
        self.check_evaluation_basis()?;
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| *a * b)
            .collect();
        Ok(Self::new(values, self.basis))
    }

    /// Pointwise quotient of two evaluation-basis polynomials of the same
    /// basis and size. Fails if the divisor vanishes anywhere on the grid.
    pub fn div(&self, other: &Self) -> Result<Self, Error> {
        self.check_same_shape(other)?;
        self.check_evaluation_basis()?;
        if other.values.iter().any(Zero::is_zero) {
            return Err(Error::DivisionByZeroOnCoset);
        }
        let mut inverses = other.values.clone();
        batch_inversion(&mut inverses);
        let values = self
            .values
            .iter()
            .zip(inverses.iter())
            .map(|(a, b)| *a * b)
            .collect();
        Ok(Self::new(values, self.basis))
    }
}

/// Scales `coeffs[i]` by `g^i`.
fn distribute_powers<F>(coeffs: &mut [F], g: F)
where
    F: PrimeField,
{
    let mut power = F::one();
    for coeff in coeffs.iter_mut() {
        *coeff *= power;
        power *= g;
    }
}

impl<'a, F> Mul<F> for &'a Polynomial<F>
where
    F: PrimeField,
{
    type Output = Polynomial<F>;

    fn mul(self, scalar: F) -> Polynomial<F> {
        let values =
            self.values.iter().map(|value| *value * scalar).collect();
        Polynomial::new(values, self.basis)
    }
}

impl<'a, F> Add<F> for &'a Polynomial<F>
where
    F: PrimeField,
{
    type Output = Polynomial<F>;

    fn add(self, scalar: F) -> Polynomial<F> {
        match self.basis {
            // Adding a constant only touches the constant coefficient.
            Basis::Monomial => {
                let mut values = self.values.clone();
                if let Some(first) = values.first_mut() {
                    *first += scalar;
                }
                Polynomial::new(values, self.basis)
            }
            _ => {
                let values = self
                    .values
                    .iter()
                    .map(|value| *value + scalar)
                    .collect();
                Polynomial::new(values, self.basis)
            }
        }
    }
}

impl<'a, F> Sub<F> for &'a Polynomial<F>
where
    F: PrimeField,
{
    type Output = Polynomial<F>;

    fn sub(self, scalar: F) -> Polynomial<F> {
        self + (-scalar)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{Field, UniformRand};
    use ark_std::test_rng;
    use num_traits::One;

    fn random_lagrange(size: usize) -> Polynomial<Fr> {
        let rng = &mut test_rng();
        Polynomial::lagrange(
            (0..size).map(|_| Fr::rand(rng)).collect(),
        )
    }

    /// Horner evaluation of monomial coefficients, as an independent
    /// reference for the barycentric formula.
    fn horner_eval(coeffs: &[Fr], point: Fr) -> Fr {
        coeffs
            .iter()
            .rev()
            .fold(Fr::zero(), |acc, coeff| acc * point + coeff)
    }

    #[test]
    fn fft_round_trips() {
        let poly = random_lagrange(32);
        assert_eq!(poly.ifft().unwrap().fft().unwrap(), poly);

        let coeffs = poly.ifft().unwrap();
        assert_eq!(coeffs.fft().unwrap().ifft().unwrap(), coeffs);
    }

    #[test]
    fn fft_rejects_wrong_basis() {
        let poly = random_lagrange(8);
        assert!(matches!(
            poly.fft(),
            Err(Error::PolynomialBasisMismatch)
        ));
        assert!(matches!(
            poly.ifft().unwrap().ifft(),
            Err(Error::PolynomialBasisMismatch)
        ));
    }

    #[test]
    fn barycentric_matches_table_on_subgroup() {
        let poly = random_lagrange(16);
        let domain =
            Polynomial::<Fr>::subgroup_domain(16).unwrap();
        for (i, root) in domain.elements().enumerate() {
            assert_eq!(
                poly.barycentric_eval(root).unwrap(),
                poly.values[i]
            );
        }
    }

    #[test]
    fn barycentric_matches_horner_off_subgroup() {
        let rng = &mut test_rng();
        let poly = random_lagrange(16);
        let coeffs = poly.ifft().unwrap();
        for _ in 0..8 {
            let point = Fr::rand(rng);
            assert_eq!(
                poly.barycentric_eval(point).unwrap(),
                horner_eval(&coeffs.values, point)
            );
        }
    }

    #[test]
    fn coset_extension_round_trips() {
        let rng = &mut test_rng();
        let shift = Fr::rand(rng);
        let poly = random_lagrange(8);

        let extended =
            poly.to_coset_extended_lagrange(shift).unwrap();
        assert_eq!(extended.len(), COSET_EXTENSION * poly.len());

        let coeffs = extended
            .coset_extended_lagrange_to_coeffs(shift)
            .unwrap();
        let mut expected = poly.ifft().unwrap().values;
        expected.resize(COSET_EXTENSION * poly.len(), Fr::zero());
        assert_eq!(coeffs.values, expected);
    }

    #[test]
    fn coset_extension_evaluates_off_subgroup() {
        let rng = &mut test_rng();
        let shift = Fr::rand(rng);
        let poly = random_lagrange(8);
        let coeffs = poly.ifft().unwrap();

        let extended =
            poly.to_coset_extended_lagrange(shift).unwrap();
        let domain = Polynomial::<Fr>::subgroup_domain(32).unwrap();
        for (i, root) in domain.elements().enumerate() {
            assert_eq!(
                extended.values[i],
                horner_eval(&coeffs.values, shift * root)
            );
        }
    }

    #[test]
    fn shift_rotates_the_argument() {
        let rng = &mut test_rng();
        let poly = random_lagrange(16);
        let domain =
            Polynomial::<Fr>::subgroup_domain(16).unwrap();
        let omega = domain.group_gen();

        let point = Fr::rand(rng);
        assert_eq!(
            poly.shift(1).unwrap().barycentric_eval(point).unwrap(),
            poly.barycentric_eval(omega * point).unwrap()
        );
    }

    #[test]
    fn first_lagrange_basis_selects_the_first_root() {
        let rng = &mut test_rng();
        let l0 = Polynomial::<Fr>::first_lagrange_basis(8);
        let domain = Polynomial::<Fr>::subgroup_domain(8).unwrap();

        for (i, root) in domain.elements().enumerate() {
            let expected =
                if i == 0 { Fr::one() } else { Fr::zero() };
            assert_eq!(l0.barycentric_eval(root).unwrap(), expected);
        }

        // Off the subgroup it agrees with the closed form
        // (x^n - 1) / (n * (x - 1)).
        let point = Fr::rand(rng);
        let closed_form = (point.pow(&[8, 0, 0, 0]) - Fr::one())
            * (Fr::from(8u64) * (point - Fr::one()))
                .inverse()
                .unwrap();
        assert_eq!(
            l0.barycentric_eval(point).unwrap(),
            closed_form
        );
    }

    #[test]
    fn vanishing_evals_match_direct_evaluation() {
        let rng = &mut test_rng();
        let shift = Fr::rand(rng);
        let vanishing =
            Polynomial::<Fr>::vanishing_evals_over_coset(8, shift)
                .unwrap();
        let domain = Polynomial::<Fr>::subgroup_domain(32).unwrap();
        for (i, root) in domain.elements().enumerate() {
            let x = shift * root;
            assert_eq!(
                vanishing.values[i],
                x.pow(&[8, 0, 0, 0]) - Fr::one()
            );
        }
    }

    #[test]
    fn pointwise_division_rejects_zero_divisor() {
        let poly = random_lagrange(8);
        let mut divisor = random_lagrange(8);
        divisor.values[3] = Fr::zero();
        assert!(matches!(
            poly.div(&divisor),
            Err(Error::DivisionByZeroOnCoset)
        ));
    }

    #[test]
    fn pointwise_ops_check_shape() {
        let a = random_lagrange(8);
        let b = random_lagrange(16);
        assert!(matches!(
            a.add(&b),
            Err(Error::PolynomialSizeMismatch { left: 8, right: 16 })
        ));

        let c = b.ifft().unwrap();
        assert!(matches!(
            b.mul(&c),
            Err(Error::PolynomialBasisMismatch)
        ));
    }
}
