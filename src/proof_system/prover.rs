// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The five-round prover.
//!
//! Each round is a pure transition: it consumes the state produced by
//! earlier rounds plus the challenges squeezed from the transcript, and
//! returns the new state together with the message that gets absorbed
//! next. [`Prover::prove`] drives the rounds strictly in order and takes
//! the prover by value, so an instance proves exactly once.

use crate::circuit::{
    witness_value, CommonPreprocessedInput, Program, Witness,
};
use crate::error::Error;
use crate::permutation::compute_grand_product;
use crate::permutation::constants::{K1, K2};
use crate::poly::{Polynomial, COSET_EXTENSION};
use crate::proof_system::{
    Message1, Message2, Message3, Message5, Proof, ProofEvaluations,
    VerifierKey,
};
use crate::setup::Setup;
use crate::transcript::TranscriptWrapper;
use crate::util::EvaluationDomainExt;
use ark_ec::PairingEngine;
use ark_ff::{Field, One, PrimeField};
use ark_poly::EvaluationDomain;
use ark_poly_commit::kzg10::Commitment;
use num_traits::Zero;

/// The Lagrange-basis wire polynomials committed in round 1.
struct WirePolynomials<F>
where
    F: PrimeField,
{
    a: Polynomial<F>,
    b: Polynomial<F>,
    c: Polynomial<F>,
}

/// The three size-`n` chunks of the quotient polynomial, low to high.
struct QuotientChunks<F>
where
    F: PrimeField,
{
    t_lo: Polynomial<F>,
    t_mid: Polynomial<F>,
    t_hi: Polynomial<F>,
}

/// Coset expansions computed in round 3 and reused in round 5.
struct CosetExpansions<F>
where
    F: PrimeField,
{
    a: Polynomial<F>,
    b: Polynomial<F>,
    c: Polynomial<F>,
    z: Polynomial<F>,
    q_l: Polynomial<F>,
    q_r: Polynomial<F>,
    q_m: Polynomial<F>,
    q_o: Polynomial<F>,
    q_c: Polynomial<F>,
    left_sigma: Polynomial<F>,
    right_sigma: Polynomial<F>,
    out_sigma: Polynomial<F>,
}

/// Produces proofs that a witness satisfies a preprocessed circuit.
///
/// The setup and program are shared by reference and stay read-only, so
/// independent provers over the same circuit can run concurrently; a
/// single instance however is single-shot.
pub struct Prover<'a, E>
where
    E: PairingEngine,
{
    setup: &'a Setup<E>,
    program: &'a Program<E::Fr>,
    pk: CommonPreprocessedInput<E::Fr>,
    verifier_key: VerifierKey<E>,
}

impl<'a, E> Prover<'a, E>
where
    E: PairingEngine,
{
    /// Preprocesses the program and commits to its description.
    pub fn new(
        setup: &'a Setup<E>,
        program: &'a Program<E::Fr>,
    ) -> Result<Self, Error> {
        let pk = program.common_preprocessed_input()?;
        let verifier_key = setup.verification_key(&pk)?;
        Ok(Self {
            setup,
            program,
            pk,
            verifier_key,
        })
    }

    /// The verification key matching this prover's circuit.
    pub fn verifier_key(&self) -> &VerifierKey<E> {
        &self.verifier_key
    }

    /// Runs the five rounds and returns the proof.
    pub fn prove(
        self,
        witness: &Witness<E::Fr>,
    ) -> Result<Proof<E>, Error> {
        let mut transcript = TranscriptWrapper::new(b"plonk");

        // Bind the circuit description and the public inputs before any
        // commitment is absorbed, so every challenge depends on them.
        self.verifier_key.seed_transcript(&mut transcript);
        let public_values = self.public_values(witness)?;
        for value in &public_values {
            transcript.absorb_scalar(b"pub input", value);
        }
        let pi = self.public_input_polynomial(&public_values);

        let (wires, msg_1) = self.round_1(witness, &pi)?;
        let (beta, gamma) = transcript.round_1(&msg_1);

        let (z_poly, msg_2) = self.round_2(&wires, beta, gamma)?;
        let (alpha, coset_shift) = transcript.round_2(&msg_2);

        let (chunks, cosets, msg_3) = self.round_3(
            &wires,
            &z_poly,
            &pi,
            beta,
            gamma,
            alpha,
            coset_shift,
        )?;
        let zeta = transcript.round_3(&msg_3);

        let evaluations = self.round_4(&wires, &z_poly, zeta)?;
        let v = transcript.round_4(&evaluations);

        let msg_5 = self.round_5(
            &chunks,
            &cosets,
            &pi,
            &evaluations,
            beta,
            gamma,
            alpha,
            coset_shift,
            zeta,
            v,
        )?;

        Ok(Proof::from_messages(
            msg_1,
            msg_2,
            msg_3,
            evaluations,
            msg_5,
        ))
    }

    /// Looks up the witness value of every public-input label, in order.
    fn public_values(
        &self,
        witness: &Witness<E::Fr>,
    ) -> Result<Vec<E::Fr>, Error> {
        self.program
            .public_assignments()
            .iter()
            .map(|label| {
                witness_value(witness, &Some(label.clone()))
            })
            .collect()
    }

    /// The public-input polynomial carries `-value` in the slot of each
    /// public input and zero elsewhere.
    fn public_input_polynomial(
        &self,
        public_values: &[E::Fr],
    ) -> Polynomial<E::Fr> {
        let mut values = vec![E::Fr::zero(); self.pk.group_order];
        for (slot, value) in values.iter_mut().zip(public_values.iter())
        {
            *slot = -*value;
        }
        Polynomial::lagrange(values)
    }

    /// Round 1: interpolate and commit the wire polynomials.
    fn round_1(
        &self,
        witness: &Witness<E::Fr>,
        pi: &Polynomial<E::Fr>,
    ) -> Result<(WirePolynomials<E::Fr>, Message1<E>), Error> {
        let n = self.pk.group_order;

        let mut a = vec![E::Fr::zero(); n];
        let mut b = vec![E::Fr::zero(); n];
        let mut c = vec![E::Fr::zero(); n];
        for (i, gate_wires) in self.program.wires().iter().enumerate() {
            a[i] = witness_value(witness, &gate_wires.left)?;
            b[i] = witness_value(witness, &gate_wires.right)?;
            c[i] = witness_value(witness, &gate_wires.output)?;
        }
        let wires = WirePolynomials {
            a: Polynomial::lagrange(a),
            b: Polynomial::lagrange(b),
            c: Polynomial::lagrange(c),
        };

        // Refuse to commit to wires that break a gate constraint.
        let gate_residual = wires
            .a
            .mul(&self.pk.q_l)?
            .add(&wires.b.mul(&self.pk.q_r)?)?
            .add(&wires.a.mul(&wires.b)?.mul(&self.pk.q_m)?)?
            .add(&wires.c.mul(&self.pk.q_o)?)?
            .add(pi)?
            .add(&self.pk.q_c)?;
        if !gate_residual.values.iter().all(Zero::is_zero) {
            return Err(Error::WitnessDoesNotSatisfyCircuit);
        }

        let msg_1 = Message1 {
            a_comm: self.setup.commit(&wires.a)?,
            b_comm: self.setup.commit(&wires.b)?,
            c_comm: self.setup.commit(&wires.c)?,
        };
        Ok((wires, msg_1))
    }

    /// Round 2: build and commit the grand-product polynomial.
    fn round_2(
        &self,
        wires: &WirePolynomials<E::Fr>,
        beta: E::Fr,
        gamma: E::Fr,
    ) -> Result<(Polynomial<E::Fr>, Message2<E>), Error> {
        let domain =
            Polynomial::<E::Fr>::subgroup_domain(self.pk.group_order)?;
        let roots: Vec<E::Fr> = domain.elements().collect();

        let z_values = compute_grand_product(
            &roots,
            (&wires.a.values, &wires.b.values, &wires.c.values),
            (
                &self.pk.left_sigma.values,
                &self.pk.right_sigma.values,
                &self.pk.out_sigma.values,
            ),
            beta,
            gamma,
        )?;
        let z_poly = Polynomial::lagrange(z_values);

        let msg_2 = Message2 {
            z_comm: self.setup.commit(&z_poly)?,
        };
        Ok((z_poly, msg_2))
    }

    /// Round 3: assemble the quotient polynomial on the coset, split it
    /// and commit the chunks.
    #[allow(clippy::too_many_arguments)]
    fn round_3(
        &self,
        wires: &WirePolynomials<E::Fr>,
        z_poly: &Polynomial<E::Fr>,
        pi: &Polynomial<E::Fr>,
        beta: E::Fr,
        gamma: E::Fr,
        alpha: E::Fr,
        coset_shift: E::Fr,
    ) -> Result<
        (QuotientChunks<E::Fr>, CosetExpansions<E::Fr>, Message3<E>),
        Error,
    > {
        let n = self.pk.group_order;
        let extended_size = COSET_EXTENSION * n;

        let cosets = CosetExpansions {
            a: wires.a.to_coset_extended_lagrange(coset_shift)?,
            b: wires.b.to_coset_extended_lagrange(coset_shift)?,
            c: wires.c.to_coset_extended_lagrange(coset_shift)?,
            z: z_poly.to_coset_extended_lagrange(coset_shift)?,
            q_l: self.pk.q_l.to_coset_extended_lagrange(coset_shift)?,
            q_r: self.pk.q_r.to_coset_extended_lagrange(coset_shift)?,
            q_m: self.pk.q_m.to_coset_extended_lagrange(coset_shift)?,
            q_o: self.pk.q_o.to_coset_extended_lagrange(coset_shift)?,
            q_c: self.pk.q_c.to_coset_extended_lagrange(coset_shift)?,
            left_sigma: self
                .pk
                .left_sigma
                .to_coset_extended_lagrange(coset_shift)?,
            right_sigma: self
                .pk
                .right_sigma
                .to_coset_extended_lagrange(coset_shift)?,
            out_sigma: self
                .pk
                .out_sigma
                .to_coset_extended_lagrange(coset_shift)?,
        };
        let pi_coset = pi.to_coset_extended_lagrange(coset_shift)?;

        // Z evaluated one subgroup step ahead, i.e. Z(omega * X).
        let z_shifted_coset = z_poly
            .shift(1)?
            .to_coset_extended_lagrange(coset_shift)?;

        let x_coset = Polynomial::x_evals_over_coset(
            extended_size,
            coset_shift,
        )?;
        let z_h_coset =
            Polynomial::vanishing_evals_over_coset(n, coset_shift)?;

        let l0_coset = Polynomial::first_lagrange_basis(n)
            .to_coset_extended_lagrange(coset_shift)?;

        let rlc = |term: &Polynomial<E::Fr>,
                   position: &Polynomial<E::Fr>|
         -> Result<Polynomial<E::Fr>, Error> {
            (&(position * beta) + gamma).add(term)
        };

        // All gates are correct:
        //   A*QL + B*QR + A*B*QM + C*QO + PI + QC = 0 on the subgroup.
        let gate_term = cosets
            .a
            .mul(&cosets.q_l)?
            .add(&cosets.b.mul(&cosets.q_r)?)?
            .add(&cosets.a.mul(&cosets.b)?.mul(&cosets.q_m)?)?
            .add(&cosets.c.mul(&cosets.q_o)?)?
            .add(&pi_coset)?
            .add(&cosets.q_c)?;

        // The permutation accumulator is valid:
        //   Z(X) * prod of randomized positions
        //     = Z(omega X) * prod of randomized sigma images.
        let permutation_term = cosets
            .z
            .mul(&rlc(&cosets.a, &x_coset)?)?
            .mul(&rlc(&cosets.b, &(&x_coset * K1::<E::Fr>()))?)?
            .mul(&rlc(&cosets.c, &(&x_coset * K2::<E::Fr>()))?)?
            .sub(
                &z_shifted_coset
                    .mul(&rlc(&cosets.a, &cosets.left_sigma)?)?
                    .mul(&rlc(&cosets.b, &cosets.right_sigma)?)?
                    .mul(&rlc(&cosets.c, &cosets.out_sigma)?)?,
            )?;

        // The accumulator starts at one: (Z - 1) * L0 = 0.
        let boundary_term =
            (&cosets.z - E::Fr::one()).mul(&l0_coset)?;

        let numerator = gate_term
            .add(&(&permutation_term * alpha))?
            .add(&(&boundary_term * alpha.square()))?;
        let quotient = numerator.div(&z_h_coset)?;

        let quotient_coeffs =
            quotient.coset_extended_lagrange_to_coeffs(coset_shift)?;
        if !quotient_coeffs.values[3 * n..].iter().all(Zero::is_zero) {
            return Err(Error::QuotientDegreeOverflow);
        }

        let chunks = QuotientChunks {
            t_lo: Polynomial::monomial(
                quotient_coeffs.values[..n].to_vec(),
            )
            .fft()?,
            t_mid: Polynomial::monomial(
                quotient_coeffs.values[n..2 * n].to_vec(),
            )
            .fft()?,
            t_hi: Polynomial::monomial(
                quotient_coeffs.values[2 * n..3 * n].to_vec(),
            )
            .fft()?,
        };

        #[cfg(debug_assertions)]
        {
            let shift_n = coset_shift.pow(&[n as u64, 0, 0, 0]);
            debug_assert_eq!(
                chunks.t_lo.barycentric_eval(coset_shift).unwrap()
                    + chunks.t_mid.barycentric_eval(coset_shift).unwrap()
                        * shift_n
                    + chunks.t_hi.barycentric_eval(coset_shift).unwrap()
                        * shift_n.square(),
                quotient.values[0],
                "quotient chunks do not reconstruct the quotient"
            );
        }

        let msg_3 = Message3 {
            t_lo_comm: self.setup.commit(&chunks.t_lo)?,
            t_mid_comm: self.setup.commit(&chunks.t_mid)?,
            t_hi_comm: self.setup.commit(&chunks.t_hi)?,
        };
        Ok((chunks, cosets, msg_3))
    }

    /// Round 4: open the committed polynomials at the evaluation point.
    fn round_4(
        &self,
        wires: &WirePolynomials<E::Fr>,
        z_poly: &Polynomial<E::Fr>,
        zeta: E::Fr,
    ) -> Result<ProofEvaluations<E::Fr>, Error> {
        let domain =
            Polynomial::<E::Fr>::subgroup_domain(self.pk.group_order)?;
        let omega = domain.group_gen();

        Ok(ProofEvaluations {
            a_eval: wires.a.barycentric_eval(zeta)?,
            b_eval: wires.b.barycentric_eval(zeta)?,
            c_eval: wires.c.barycentric_eval(zeta)?,
            left_sigma_eval: self
                .pk
                .left_sigma
                .barycentric_eval(zeta)?,
            right_sigma_eval: self
                .pk
                .right_sigma
                .barycentric_eval(zeta)?,
            permutation_eval: z_poly
                .barycentric_eval(zeta * omega)?,
        })
    }

    /// Round 5: build the linearization polynomial and the two opening
    /// witnesses, and commit the latter.
    ///
    /// The linearization polynomial is a clever way to avoid providing
    /// evaluations of all the polynomials in the quotient identity: each
    /// term keeps exactly one committed factor and replaces the rest
    /// with their claimed evaluations, so the verifier can rebuild its
    /// commitment linearly and only needs a proof that it vanishes at
    /// the evaluation point.
    #[allow(clippy::too_many_arguments)]
    fn round_5(
        &self,
        chunks: &QuotientChunks<E::Fr>,
        cosets: &CosetExpansions<E::Fr>,
        pi: &Polynomial<E::Fr>,
        evaluations: &ProofEvaluations<E::Fr>,
        beta: E::Fr,
        gamma: E::Fr,
        alpha: E::Fr,
        coset_shift: E::Fr,
        zeta: E::Fr,
        v: E::Fr,
    ) -> Result<Message5<E>, Error> {
        let n = self.pk.group_order;
        let n_64 = n as u64;
        let extended_size = COSET_EXTENSION * n;
        let domain = Polynomial::<E::Fr>::subgroup_domain(n)?;
        let omega = domain.group_gen();

        let l0_eval = Polynomial::first_lagrange_basis(n)
            .barycentric_eval(zeta)?;
        let pi_eval = pi.barycentric_eval(zeta)?;

        let zeta_n = zeta.pow(&[n_64, 0, 0, 0]);
        let zeta_2n = zeta_n.square();
        let z_h_eval = zeta_n - E::Fr::one();

        let rlc = |value: E::Fr, position: E::Fr| {
            value + beta * position + gamma
        };

        let gate_part = (&cosets.q_m
            * (evaluations.a_eval * evaluations.b_eval))
            .add(&(&cosets.q_l * evaluations.a_eval))?
            .add(&(&cosets.q_r * evaluations.b_eval))?
            .add(&(&cosets.q_o * evaluations.c_eval))?
            .add(&(&cosets.q_c + pi_eval))?;

        let sigma_scalar =
            rlc(evaluations.a_eval, evaluations.left_sigma_eval)
                * rlc(
                    evaluations.b_eval,
                    evaluations.right_sigma_eval,
                )
                * evaluations.permutation_eval;
        let permutation_part = (&cosets.z
            * (rlc(evaluations.a_eval, zeta)
                * rlc(evaluations.b_eval, K1::<E::Fr>() * zeta)
                * rlc(evaluations.c_eval, K2::<E::Fr>() * zeta)))
            .sub(
                &(&(&(&cosets.out_sigma * beta)
                    + (evaluations.c_eval + gamma))
                    * sigma_scalar),
            )?;

        let boundary_part = &(&cosets.z - E::Fr::one()) * l0_eval;

        let quotient_part = &chunks
            .t_lo
            .to_coset_extended_lagrange(coset_shift)?
            .add(
                &(&chunks
                    .t_mid
                    .to_coset_extended_lagrange(coset_shift)?
                    * zeta_n),
            )?
            .add(
                &(&chunks
                    .t_hi
                    .to_coset_extended_lagrange(coset_shift)?
                    * zeta_2n),
            )? * z_h_eval;

        let linearization = gate_part
            .add(&(&permutation_part * alpha))?
            .add(&(&boundary_part * alpha.square()))?
            .sub(&quotient_part)?;

        // Everything beyond degree n must cancel; the verifier only
        // reconstructs a size-n commitment.
        let linearization_coeffs = linearization
            .coset_extended_lagrange_to_coeffs(coset_shift)?;
        if !linearization_coeffs.values[n..]
            .iter()
            .all(Zero::is_zero)
        {
            return Err(Error::QuotientDegreeOverflow);
        }

        #[cfg(debug_assertions)]
        {
            let truncated = Polynomial::monomial(
                linearization_coeffs.values[..n].to_vec(),
            )
            .fft()
            .unwrap();
            debug_assert!(
                truncated
                    .barycentric_eval(zeta)
                    .unwrap()
                    .is_zero(),
                "linearization polynomial does not vanish at zeta"
            );
        }

        let x_coset = Polynomial::x_evals_over_coset(
            extended_size,
            coset_shift,
        )?;

        // Batch the six openings at zeta with powers of v.
        let opened = |poly: &Polynomial<E::Fr>,
                      value: E::Fr,
                      power: E::Fr| {
            &(poly - value) * power
        };
        let v_2 = v.square();
        let v_3 = v_2 * v;
        let v_4 = v_3 * v;
        let v_5 = v_4 * v;
        let numerator = linearization
            .add(&opened(&cosets.a, evaluations.a_eval, v))?
            .add(&opened(&cosets.b, evaluations.b_eval, v_2))?
            .add(&opened(&cosets.c, evaluations.c_eval, v_3))?
            .add(&opened(
                &cosets.left_sigma,
                evaluations.left_sigma_eval,
                v_4,
            ))?
            .add(&opened(
                &cosets.right_sigma,
                evaluations.right_sigma_eval,
                v_5,
            ))?;

        let w_z_comm = self.commit_opening_witness(
            numerator,
            &(&x_coset - zeta),
            coset_shift,
        )?;

        // The shifted opening ties the claimed Z(omega * zeta) to the
        // grand-product commitment; it is the one place the argument
        // reaches across adjacent subgroup positions.
        let w_zw_comm = self.commit_opening_witness(
            &cosets.z - evaluations.permutation_eval,
            &(&x_coset - (zeta * omega)),
            coset_shift,
        )?;

        Ok(Message5 { w_z_comm, w_zw_comm })
    }

    /// Divides `numerator` by the linear divisor on the coset, enforces
    /// the size-n degree bound and commits to the truncated quotient.
    fn commit_opening_witness(
        &self,
        numerator: Polynomial<E::Fr>,
        divisor: &Polynomial<E::Fr>,
        coset_shift: E::Fr,
    ) -> Result<Commitment<E>, Error> {
        let n = self.pk.group_order;
        let witness = numerator.div(divisor)?;
        let coeffs =
            witness.coset_extended_lagrange_to_coeffs(coset_shift)?;
        if !coeffs.values[n..].iter().all(Zero::is_zero) {
            return Err(Error::QuotientDegreeOverflow);
        }
        self.setup
            .commit(&Polynomial::monomial(coeffs.values[..n].to_vec()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::circuit::{Gate, GateWires};
    use ark_bn254::{Bn254, Fr};
    use ark_std::test_rng;
    use num_traits::One;

    /// One multiplication gate `x * y = xy` plus an addition gate
    /// `xy + z = sum`, with `sum` pinned as a public input in row 0.
    fn product_sum_program() -> Program<Fr> {
        let gates = vec![
            Gate::new(
                Fr::one(),
                Fr::zero(),
                Fr::zero(),
                Fr::zero(),
                Fr::zero(),
            ),
            Gate::new(
                Fr::zero(),
                Fr::zero(),
                Fr::one(),
                -Fr::one(),
                Fr::zero(),
            ),
            Gate::new(
                Fr::one(),
                Fr::one(),
                Fr::zero(),
                -Fr::one(),
                Fr::zero(),
            ),
        ];
        let wires = vec![
            GateWires::new(Some("sum"), None, None),
            GateWires::new(Some("x"), Some("y"), Some("xy")),
            GateWires::new(Some("xy"), Some("z"), Some("sum")),
        ];
        Program::new(gates, wires, vec!["sum".to_owned()], 4).unwrap()
    }

    fn product_sum_witness() -> Witness<Fr> {
        let mut witness = Witness::new();
        witness.insert(Some("x".to_owned()), Fr::from(1u64));
        witness.insert(Some("y".to_owned()), Fr::from(2u64));
        witness.insert(Some("z".to_owned()), Fr::from(5u64));
        witness.insert(Some("xy".to_owned()), Fr::from(2u64));
        witness.insert(Some("sum".to_owned()), Fr::from(7u64));
        witness
    }

    #[test]
    fn tampered_sigma_fails_the_grand_product() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);
        let program = product_sum_program();

        let mut prover = Prover::new(&setup, &program).unwrap();
        // Rewire the left column's copy constraints arbitrarily.
        prover.pk.left_sigma.values[1] = Fr::from(9u64);

        let result = prover.prove(&product_sum_witness());
        assert!(matches!(
            result,
            Err(Error::PermutationProductDidNotClose)
        ));
    }

    #[test]
    fn missing_witness_label_is_reported() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);
        let program = product_sum_program();

        let mut witness = product_sum_witness();
        witness.remove(&Some("xy".to_owned()));

        let prover = Prover::new(&setup, &program).unwrap();
        assert!(matches!(
            prover.prove(&witness),
            Err(Error::CircuitInputsNotFound)
        ));
    }
}
