// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The universal trusted setup and the KZG commitment it supports.

mod ptau;

use crate::circuit::CommonPreprocessedInput;
use crate::error::Error;
use crate::poly::{Basis, Polynomial};
use crate::proof_system::VerifierKey;
use ark_ec::msm::VariableBaseMSM;
use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::{One, PrimeField, UniformRand};
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError,
    Write,
};
use rand_core::RngCore;

/// The structured reference string: consecutive G1 powers of a secret
/// point, plus that point in G2.
///
/// `powers_of_x[i] = [x^i]_1`, so a monomial-basis polynomial commits as
/// a single multiscalar multiplication against this table. The data is
/// read-only and may be shared by reference across concurrent proofs.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Setup<E>
where
    E: PairingEngine,
{
    /// `([1]_1, [x]_1, ..., [x^{d-1}]_1)`.
    pub powers_of_x: Vec<E::G1Affine>,

    /// `[x]_2`.
    pub x_2: E::G2Affine,
}

impl<E> Setup<E>
where
    E: PairingEngine,
{
    /// Wraps an externally produced reference string.
    pub fn new(powers_of_x: Vec<E::G1Affine>, x_2: E::G2Affine) -> Self {
        Self { powers_of_x, x_2 }
    }

    /// Samples a reference string of the given degree from a locally
    /// generated secret.
    ///
    /// Whoever runs this learns the secret, so the result is only
    /// trustworthy for testing. Production deployments load the output
    /// of a ceremony instead, e.g. via [`Setup::from_file`].
    pub fn generate<R>(degree: usize, rng: &mut R) -> Self
    where
        R: RngCore + ?Sized,
    {
        let x = E::Fr::rand(rng);
        let g_1 = E::G1Affine::prime_subgroup_generator();
        let g_2 = E::G2Affine::prime_subgroup_generator();

        let mut projective_powers = Vec::with_capacity(degree);
        let mut power = E::Fr::one();
        for _ in 0..degree {
            projective_powers.push(g_1.mul(power.into_repr()));
            power *= x;
        }

        Self {
            powers_of_x: ProjectiveCurve::batch_normalization_into_affine(
                &projective_powers,
            ),
            x_2: g_2.mul(x.into_repr()).into_affine(),
        }
    }

    /// Number of G1 powers, i.e. the largest committable size.
    pub fn max_degree(&self) -> usize {
        self.powers_of_x.len()
    }

    /// Commits to a polynomial as the linear combination of the G1
    /// powers with its monomial coefficients.
    ///
    /// Lagrange-basis polynomials are interpolated first; coset-extended
    /// evaluations have no unique coefficient form of committable size
    /// and are rejected.
    pub fn commit(
        &self,
        polynomial: &Polynomial<E::Fr>,
    ) -> Result<Commitment<E>, Error> {
        let coeffs = match polynomial.basis {
            Basis::Lagrange => polynomial.ifft()?.values,
            Basis::Monomial => polynomial.values.clone(),
            Basis::CosetExtendedLagrange => {
                return Err(Error::PolynomialBasisMismatch)
            }
        };
        if coeffs.len() > self.powers_of_x.len() {
            return Err(Error::SetupTooSmall {
                polynomial_size: coeffs.len(),
                setup_size: self.powers_of_x.len(),
            });
        }

        let scalars = coeffs
            .iter()
            .map(|coeff| coeff.into_repr())
            .collect::<Vec<_>>();
        Ok(Commitment(
            VariableBaseMSM::multi_scalar_mul(
                &self.powers_of_x[..scalars.len()],
                &scalars,
            )
            .into_affine(),
        ))
    }

    /// Commits to the eight preprocessed polynomials, producing the key
    /// the verifier works against.
    pub fn verification_key(
        &self,
        pk: &CommonPreprocessedInput<E::Fr>,
    ) -> Result<VerifierKey<E>, Error> {
        Ok(VerifierKey {
            n: pk.group_order,
            q_m: self.commit(&pk.q_m)?,
            q_l: self.commit(&pk.q_l)?,
            q_r: self.commit(&pk.q_r)?,
            q_o: self.commit(&pk.q_o)?,
            q_c: self.commit(&pk.q_c)?,
            left_sigma: self.commit(&pk.left_sigma)?,
            right_sigma: self.commit(&pk.right_sigma)?,
            out_sigma: self.commit(&pk.out_sigma)?,
            x_2: self.x_2,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::test_rng;

    #[test]
    fn commitments_are_linear() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);

        let p = Polynomial::lagrange(
            (0..8).map(|_| Fr::rand(rng)).collect(),
        );
        let q = Polynomial::lagrange(
            (0..8).map(|_| Fr::rand(rng)).collect(),
        );
        let a = Fr::rand(rng);
        let b = Fr::rand(rng);

        let combined = (&p * a).add(&(&q * b)).unwrap();
        let lhs = setup.commit(&combined).unwrap();

        let p_comm = setup.commit(&p).unwrap();
        let q_comm = setup.commit(&q).unwrap();
        let rhs = (p_comm.0.mul(a.into_repr())
            + q_comm.0.mul(b.into_repr()))
        .into_affine();

        assert_eq!(lhs.0, rhs);
    }

    #[test]
    fn lagrange_and_monomial_forms_commit_identically() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);

        let p = Polynomial::lagrange(
            (0..8).map(|_| Fr::rand(rng)).collect(),
        );
        let lhs = setup.commit(&p).unwrap();
        let rhs = setup.commit(&p.ifft().unwrap()).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn oversized_polynomials_are_rejected() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(4, rng);

        let p = Polynomial::lagrange(
            (0..8).map(|_| Fr::rand(rng)).collect(),
        );
        assert!(matches!(
            setup.commit(&p),
            Err(Error::SetupTooSmall {
                polynomial_size: 8,
                setup_size: 4,
            })
        ));
    }
}
