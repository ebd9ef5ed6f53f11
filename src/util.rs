// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Helpers over the [`ark_poly`] evaluation domains.

use ark_ff::FftField;
use ark_poly::GeneralEvaluationDomain;

/// Accessors for domain constants that [`GeneralEvaluationDomain`] keeps
/// inside its variants.
pub(crate) trait EvaluationDomainExt<F>
where
    F: FftField,
{
    /// Returns the generator of the multiplicative subgroup, i.e. the
    /// primitive root of unity the domain is built on.
    fn group_gen(&self) -> F;

    /// Returns the inverse of the group generator.
    fn group_gen_inv(&self) -> F;

    /// Returns the inverse of the domain size as a field element.
    fn size_inv(&self) -> F;
}

impl<F> EvaluationDomainExt<F> for GeneralEvaluationDomain<F>
where
    F: FftField,
{
    fn group_gen(&self) -> F {
        match self {
            GeneralEvaluationDomain::Radix2(domain) => domain.group_gen,
            GeneralEvaluationDomain::MixedRadix(domain) => domain.group_gen,
        }
    }

    fn group_gen_inv(&self) -> F {
        match self {
            GeneralEvaluationDomain::Radix2(domain) => domain.group_gen_inv,
            GeneralEvaluationDomain::MixedRadix(domain) => {
                domain.group_gen_inv
            }
        }
    }

    fn size_inv(&self) -> F {
        match self {
            GeneralEvaluationDomain::Radix2(domain) => domain.size_inv,
            GeneralEvaluationDomain::MixedRadix(domain) => domain.size_inv,
        }
    }
}
