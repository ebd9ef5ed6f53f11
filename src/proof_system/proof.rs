// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A Proof stores the commitments and evaluations that are needed to
//! univocally identify a prove of some statement, together with its
//! verification procedure.
//!
//! The verifier never touches witness data: it replays the transcript
//! from the proof elements, reconstructs the commitment to the
//! linearization polynomial from the verification key, and reduces the
//! whole statement to two pairing checks.

use crate::error::Error;
use crate::permutation::constants::{K1, K2};
use crate::poly::Polynomial;
use crate::proof_system::VerifierKey;
use crate::transcript::TranscriptWrapper;
use crate::util::EvaluationDomainExt;
use ark_ec::msm::VariableBaseMSM;
use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_poly::EvaluationDomain;
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError,
    Write,
};

/// Round-1 message: commitments to the wire polynomials.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Message1<E>
where
    E: PairingEngine,
{
    /// Commitment to the left-wire polynomial.
    pub a_comm: Commitment<E>,
    /// Commitment to the right-wire polynomial.
    pub b_comm: Commitment<E>,
    /// Commitment to the output-wire polynomial.
    pub c_comm: Commitment<E>,
}

/// Round-2 message: commitment to the grand-product polynomial.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Message2<E>
where
    E: PairingEngine,
{
    /// Commitment to the grand-product polynomial.
    pub z_comm: Commitment<E>,
}

/// Round-3 message: commitments to the three quotient chunks.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Message3<E>
where
    E: PairingEngine,
{
    /// Commitment to the low quotient chunk.
    pub t_lo_comm: Commitment<E>,
    /// Commitment to the middle quotient chunk.
    pub t_mid_comm: Commitment<E>,
    /// Commitment to the high quotient chunk.
    pub t_hi_comm: Commitment<E>,
}

/// Round-4 message: the opening evaluations. Doubles as the evaluation
/// block of the final [`Proof`].
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(
    Clone(bound = ""),
    Copy(bound = ""),
    Debug(bound = ""),
    Default(bound = ""),
    Eq(bound = ""),
    PartialEq(bound = "")
)]
pub struct ProofEvaluations<F>
where
    F: PrimeField,
{
    /// Evaluation of the left-wire polynomial at the evaluation point.
    pub a_eval: F,

    /// Evaluation of the right-wire polynomial at the evaluation point.
    pub b_eval: F,

    /// Evaluation of the output-wire polynomial at the evaluation point.
    pub c_eval: F,

    /// Evaluation of the left-wire permutation polynomial at the
    /// evaluation point.
    pub left_sigma_eval: F,

    /// Evaluation of the right-wire permutation polynomial at the
    /// evaluation point.
    pub right_sigma_eval: F,

    /// Evaluation of the grand-product polynomial at the evaluation
    /// point shifted by one root of unity.
    pub permutation_eval: F,
}

/// Round-5 message: commitments to the opening-witness polynomials.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Message5<E>
where
    E: PairingEngine,
{
    /// Commitment to the opening witness at the evaluation point.
    pub w_z_comm: Commitment<E>,
    /// Commitment to the opening witness at the shifted evaluation
    /// point.
    pub w_zw_comm: Commitment<E>,
}

/// A Proof is a composition of `Commitment`s to the wire, grand-product,
/// split-quotient and opening-witness polynomials as well as the
/// [`ProofEvaluations`]: nine G1 points and six scalars in total.
///
/// Its main goal is to allow the verifier to formally check that the
/// secret witness used to generate it satisfies a circuit that both
/// prover and verifier have in common, succinctly and without learning
/// anything about the witness itself.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(
    Clone(bound = ""),
    Debug(bound = ""),
    Default(bound = ""),
    Eq(bound = ""),
    PartialEq(bound = "")
)]
pub struct Proof<E>
where
    E: PairingEngine,
{
    /// Commitment to the left-wire polynomial.
    pub a_comm: Commitment<E>,

    /// Commitment to the right-wire polynomial.
    pub b_comm: Commitment<E>,

    /// Commitment to the output-wire polynomial.
    pub c_comm: Commitment<E>,

    /// Commitment to the grand-product polynomial.
    pub z_comm: Commitment<E>,

    /// Commitment to the low chunk of the quotient polynomial.
    pub t_lo_comm: Commitment<E>,

    /// Commitment to the middle chunk of the quotient polynomial.
    pub t_mid_comm: Commitment<E>,

    /// Commitment to the high chunk of the quotient polynomial.
    pub t_hi_comm: Commitment<E>,

    /// Commitment to the opening-witness polynomial at the evaluation
    /// point.
    pub w_z_comm: Commitment<E>,

    /// Commitment to the opening-witness polynomial at the shifted
    /// evaluation point.
    pub w_zw_comm: Commitment<E>,

    /// The opening evaluations.
    pub evaluations: ProofEvaluations<E::Fr>,
}

impl<E> Proof<E>
where
    E: PairingEngine,
{
    /// Assembles a proof from the five round messages.
    pub(crate) fn from_messages(
        msg_1: Message1<E>,
        msg_2: Message2<E>,
        msg_3: Message3<E>,
        evaluations: ProofEvaluations<E::Fr>,
        msg_5: Message5<E>,
    ) -> Self {
        Self {
            a_comm: msg_1.a_comm,
            b_comm: msg_1.b_comm,
            c_comm: msg_1.c_comm,
            z_comm: msg_2.z_comm,
            t_lo_comm: msg_3.t_lo_comm,
            t_mid_comm: msg_3.t_mid_comm,
            t_hi_comm: msg_3.t_hi_comm,
            w_z_comm: msg_5.w_z_comm,
            w_zw_comm: msg_5.w_zw_comm,
            evaluations,
        }
    }

    /// Performs the verification of a [`Proof`] against the given
    /// verification key and public-input values.
    pub fn verify(
        &self,
        verifier_key: &VerifierKey<E>,
        pub_inputs: &[E::Fr],
    ) -> Result<(), Error> {
        let n = verifier_key.n;
        let domain = Polynomial::<E::Fr>::subgroup_domain(n)?;
        if pub_inputs.len() > n {
            return Err(Error::ProofVerificationError);
        }

        // In order for the verifier and prover to have the same view in
        // the non-interactive setting, the verifier simulates the
        // interaction by absorbing the same elements the prover absorbed,
        // hence generating the same challenges.
        let mut transcript = TranscriptWrapper::new(b"plonk");
        verifier_key.seed_transcript(&mut transcript);
        for input in pub_inputs {
            transcript.absorb_scalar(b"pub input", input);
        }

        let (beta, gamma) = transcript.round_1(&Message1 {
            a_comm: self.a_comm,
            b_comm: self.b_comm,
            c_comm: self.c_comm,
        });
        let (alpha, _coset_shift) = transcript.round_2(&Message2 {
            z_comm: self.z_comm,
        });
        let zeta = transcript.round_3(&Message3 {
            t_lo_comm: self.t_lo_comm,
            t_mid_comm: self.t_mid_comm,
            t_hi_comm: self.t_hi_comm,
        });
        let v = transcript.round_4(&self.evaluations);

        let z_h_eval = domain.evaluate_vanishing_polynomial(zeta);
        if z_h_eval.is_zero() {
            // The evaluation point landed on the subgroup itself, where
            // the quotient identity degenerates.
            return Err(Error::ProofVerificationError);
        }
        let l0_eval = Polynomial::first_lagrange_basis(n)
            .barycentric_eval(zeta)?;

        let mut pi_values = vec![E::Fr::zero(); n];
        for (slot, input) in pi_values.iter_mut().zip(pub_inputs.iter())
        {
            *slot = -*input;
        }
        let pi_eval = Polynomial::lagrange(pi_values)
            .barycentric_eval(zeta)?;

        let evaluations = self.evaluations;
        let rlc = |value: E::Fr, position: E::Fr| {
            value + beta * position + gamma
        };

        let n_64 = n as u64;
        let zeta_n = zeta.pow(&[n_64, 0, 0, 0]);
        let zeta_2n = zeta_n.square();
        let alpha_sq = alpha.square();

        let permutation_numerator = rlc(evaluations.a_eval, zeta)
            * rlc(evaluations.b_eval, K1::<E::Fr>() * zeta)
            * rlc(evaluations.c_eval, K2::<E::Fr>() * zeta);
        // The sigma-side product, with the output wire factored out so
        // its beta * S3 part can stay committed.
        let sigma_product =
            rlc(evaluations.a_eval, evaluations.left_sigma_eval)
                * rlc(evaluations.b_eval, evaluations.right_sigma_eval)
                * evaluations.permutation_eval;

        let v_powers = {
            let mut powers = Vec::with_capacity(5);
            let mut power = v;
            for _ in 0..5 {
                powers.push(power);
                power *= v;
            }
            powers
        };
        let batch_eval = v_powers[0] * evaluations.a_eval
            + v_powers[1] * evaluations.b_eval
            + v_powers[2] * evaluations.c_eval
            + v_powers[3] * evaluations.left_sigma_eval
            + v_powers[4] * evaluations.right_sigma_eval;

        // Aggregate commitment for the opening at `zeta`: the
        // reconstructed linearization commitment, the v-batched opened
        // commitments, the evaluation offset on the generator and the
        // `zeta`-shifted witness, folded into one multiscalar
        // multiplication.
        let generator = E::G1Affine::prime_subgroup_generator();
        let mut scalars = Vec::with_capacity(16);
        let mut points = Vec::with_capacity(16);

        scalars.push(evaluations.a_eval * evaluations.b_eval);
        points.push(verifier_key.q_m.0);
        scalars.push(evaluations.a_eval);
        points.push(verifier_key.q_l.0);
        scalars.push(evaluations.b_eval);
        points.push(verifier_key.q_r.0);
        scalars.push(evaluations.c_eval);
        points.push(verifier_key.q_o.0);
        scalars.push(E::Fr::one());
        points.push(verifier_key.q_c.0);

        scalars
            .push(alpha * permutation_numerator + alpha_sq * l0_eval);
        points.push(self.z_comm.0);
        scalars.push(-(alpha * beta * sigma_product));
        points.push(verifier_key.out_sigma.0);

        scalars.push(-z_h_eval);
        points.push(self.t_lo_comm.0);
        scalars.push(-(z_h_eval * zeta_n));
        points.push(self.t_mid_comm.0);
        scalars.push(-(z_h_eval * zeta_2n));
        points.push(self.t_hi_comm.0);

        scalars.push(
            pi_eval
                - alpha * sigma_product * (evaluations.c_eval + gamma)
                - alpha_sq * l0_eval
                - batch_eval,
        );
        points.push(generator);

        scalars.push(v_powers[0]);
        points.push(self.a_comm.0);
        scalars.push(v_powers[1]);
        points.push(self.b_comm.0);
        scalars.push(v_powers[2]);
        points.push(self.c_comm.0);
        scalars.push(v_powers[3]);
        points.push(verifier_key.left_sigma.0);
        scalars.push(v_powers[4]);
        points.push(verifier_key.right_sigma.0);

        scalars.push(zeta);
        points.push(self.w_z_comm.0);

        let scalars_repr = scalars
            .iter()
            .map(|scalar| scalar.into_repr())
            .collect::<Vec<_>>();
        let aggregate =
            VariableBaseMSM::multi_scalar_mul(&points, &scalars_repr);

        if !check_opening::<E>(
            self.w_z_comm.0,
            aggregate,
            verifier_key.x_2,
        ) {
            return Err(Error::ProofVerificationError);
        }

        // The shifted opening proves the claimed evaluation of the
        // grand-product polynomial at `zeta * omega`.
        let omega = domain.group_gen();
        let shifted_aggregate = self
            .w_zw_comm
            .0
            .mul((zeta * omega).into_repr())
            + self.z_comm.0.into_projective()
            - generator.mul(evaluations.permutation_eval.into_repr());

        if !check_opening::<E>(
            self.w_zw_comm.0,
            shifted_aggregate,
            verifier_key.x_2,
        ) {
            return Err(Error::ProofVerificationError);
        }

        Ok(())
    }
}

/// Checks `e(witness, [x]_2) == e(aggregate, [1]_2)`, which attests that
/// the polynomial folded into `aggregate` opens at the point folded into
/// it, with `witness` as the opening quotient.
fn check_opening<E>(
    witness: E::G1Affine,
    aggregate: E::G1Projective,
    x_2: E::G2Affine,
) -> bool
where
    E: PairingEngine,
{
    let pairs = [
        (
            E::G1Prepared::from(witness),
            E::G2Prepared::from(x_2),
        ),
        (
            E::G1Prepared::from((-aggregate).into_affine()),
            E::G2Prepared::from(E::G2Affine::prime_subgroup_generator()),
        ),
    ];
    E::product_of_pairings(&pairs).is_one()
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Bn254;
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    #[test]
    fn proof_serialization_round_trips() {
        let rng = &mut test_rng();
        let proof = Proof::<Bn254> {
            a_comm: Default::default(),
            b_comm: Default::default(),
            c_comm: Default::default(),
            z_comm: Default::default(),
            t_lo_comm: Default::default(),
            t_mid_comm: Default::default(),
            t_hi_comm: Default::default(),
            w_z_comm: Default::default(),
            w_zw_comm: Default::default(),
            evaluations: ProofEvaluations {
                a_eval: UniformRand::rand(rng),
                b_eval: UniformRand::rand(rng),
                c_eval: UniformRand::rand(rng),
                left_sigma_eval: UniformRand::rand(rng),
                right_sigma_eval: UniformRand::rand(rng),
                permutation_eval: UniformRand::rand(rng),
            },
        };

        let mut proof_bytes = vec![];
        proof.serialize(&mut proof_bytes).unwrap();

        let obtained_proof =
            Proof::<Bn254>::deserialize(proof_bytes.as_slice()).unwrap();

        assert!(proof == obtained_proof);
    }
}
