// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Constants used by the permutation argument to ensure that the wire
//! subsets are disjoint.
//!
//! With `H` the subgroup of `n`-th roots of unity, the position sets `H`,
//! `K1 * H` and `K2 * H` must be pairwise disjoint cosets; `2` and `3`
//! satisfy this for the BN254 scalar field (and any field of odd
//! characteristic where `3/2` is not a root of unity of order dividing
//! `n`).

use ark_ff::PrimeField;

/// Coset separator for the right-wire column.
#[allow(non_snake_case)]
pub(crate) fn K1<F>() -> F
where
    F: PrimeField,
{
    F::from(2u64)
}

/// Coset separator for the output-wire column.
#[allow(non_snake_case)]
pub(crate) fn K2<F>() -> F
where
    F: PrimeField,
{
    F::from(3u64)
}
