// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Loader for trusted-setup files in the `snarkjs` "prepare phase 2"
//! binary layout.
//!
//! Byte 60 of the header holds the base-2 log of the number of G1
//! powers. The powers start at byte 80 as consecutive 32-byte
//! little-endian field elements encoding affine `(x, y)` pairs. Every
//! coordinate in the file is scaled by one uniform factor, recovered by
//! dividing the first stored coordinate by the known generator
//! x-coordinate. The G2 section is located by scanning for the scaled
//! first G2 generator coordinate; `[x]_2` follows the generator as four
//! 32-byte limbs forming two Fp2 coordinates.

use super::Setup;
use crate::error::Error;
use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineCurve;
use ark_ff::{BigInteger, BigInteger256, Field, PrimeField};
use num_traits::Zero;
use std::path::Path;

/// Byte offset of the base-2 log of the number of G1 powers.
const POWERS_OFFSET: usize = 60;

/// Byte offset of the first G1 coordinate.
const G1_OFFSET: usize = 80;

/// Size of one serialized base-field element.
const WORD: usize = 32;

/// Largest supported power count, bounded by the two-adicity of the
/// scalar field.
const MAX_LOG_POWERS: u8 = 28;

impl Setup<Bn254> {
    /// Reads a reference string from a trusted-setup file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read(path).map_err(|error| {
            malformed(format!("unable to read file: {}", error))
        })?;
        Self::from_bytes(&contents)
    }

    /// Parses a reference string from the raw file contents.
    pub fn from_bytes(contents: &[u8]) -> Result<Self, Error> {
        let log_powers = *contents
            .get(POWERS_OFFSET)
            .ok_or_else(|| malformed("file shorter than its header"))?;
        if log_powers > MAX_LOG_POWERS {
            return Err(malformed(format!(
                "power count 2^{} out of range",
                log_powers
            )));
        }
        let powers = 1usize << log_powers;

        let g1_end = G1_OFFSET + 2 * powers * WORD;
        if contents.len() < g1_end {
            return Err(malformed("G1 section truncated"));
        }
        let coordinates = contents[G1_OFFSET..g1_end]
            .chunks(WORD)
            .map(read_fq)
            .collect::<Result<Vec<_>, _>>()?;

        // Every coordinate is scaled by one uniform factor; the first
        // stored point is the generator, whose x-coordinate is known.
        let generator_x = G1Affine::prime_subgroup_generator().x;
        let factor = coordinates[0]
            * generator_x
                .inverse()
                .ok_or_else(|| malformed("degenerate generator"))?;
        let factor_inv = factor
            .inverse()
            .ok_or_else(|| malformed("zero scaling factor"))?;

        let powers_of_x = coordinates
            .chunks(2)
            .map(|pair| {
                read_g1(pair[0] * factor_inv, pair[1] * factor_inv)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // The G2 section starts with the (scaled) G2 generator; scan for
        // its first coordinate byte by byte.
        let sentinel = (G2Affine::prime_subgroup_generator().x.c0
            * factor)
            .into_repr()
            .to_bytes_le();
        let mut pos = g1_end;
        loop {
            if pos + WORD > contents.len() {
                return Err(malformed("G2 section not found"));
            }
            if contents[pos..pos + WORD] == sentinel[..] {
                break;
            }
            pos += 1;
        }

        // `[x]_2` sits right after the four limbs of the generator.
        let x_2_start = pos + 4 * WORD;
        let x_2_end = x_2_start + 4 * WORD;
        if contents.len() < x_2_end {
            return Err(malformed("G2 section truncated"));
        }
        let limbs = contents[x_2_start..x_2_end]
            .chunks(WORD)
            .map(|chunk| read_fq(chunk).map(|value| value * factor_inv))
            .collect::<Result<Vec<_>, _>>()?;
        let x_2 = read_g2(
            Fq2::new(limbs[0], limbs[1]),
            Fq2::new(limbs[2], limbs[3]),
        )?;

        Ok(Self { powers_of_x, x_2 })
    }
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::SetupFileMalformed {
        reason: reason.into(),
    }
}

/// Reads a 32-byte little-endian base-field element, rejecting values
/// at or above the modulus.
fn read_fq(bytes: &[u8]) -> Result<Fq, Error> {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    Fq::from_repr(BigInteger256::new(limbs))
        .ok_or_else(|| malformed("coordinate exceeds the field modulus"))
}

fn read_g1(x: Fq, y: Fq) -> Result<G1Affine, Error> {
    if x.is_zero() && y.is_zero() {
        return Err(malformed("unexpected G1 point at infinity"));
    }
    let point = G1Affine::new(x, y, false);
    if !point.is_on_curve()
        || !point.is_in_correct_subgroup_assuming_on_curve()
    {
        return Err(malformed("G1 point not on the curve"));
    }
    Ok(point)
}

fn read_g2(x: Fq2, y: Fq2) -> Result<G2Affine, Error> {
    let point = G2Affine::new(x, y, false);
    if !point.is_on_curve()
        || !point.is_in_correct_subgroup_assuming_on_curve()
    {
        return Err(malformed("G2 point not on the curve"));
    }
    Ok(point)
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_std::test_rng;
    use std::io::Write;

    fn scaled_word(value: Fq, factor: Fq) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word.copy_from_slice(
            &(value * factor).into_repr().to_bytes_le(),
        );
        word
    }

    /// Serializes a setup into the file layout, scaling every
    /// coordinate by `factor` the way ceremony files do.
    fn encode(setup: &Setup<Bn254>, factor: Fq) -> Vec<u8> {
        let mut contents = vec![0u8; G1_OFFSET];
        contents[POWERS_OFFSET] =
            setup.powers_of_x.len().trailing_zeros() as u8;

        for point in &setup.powers_of_x {
            contents.extend_from_slice(&scaled_word(point.x, factor));
            contents.extend_from_slice(&scaled_word(point.y, factor));
        }

        for point in
            [G2Affine::prime_subgroup_generator(), setup.x_2]
        {
            contents.extend_from_slice(&scaled_word(point.x.c0, factor));
            contents.extend_from_slice(&scaled_word(point.x.c1, factor));
            contents.extend_from_slice(&scaled_word(point.y.c0, factor));
            contents.extend_from_slice(&scaled_word(point.y.c1, factor));
        }
        contents
    }

    #[test]
    fn parses_its_own_encoding() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);
        let contents = encode(&setup, Fq::from(5u64));

        let parsed = Setup::<Bn254>::from_bytes(&contents).unwrap();
        assert_eq!(parsed.powers_of_x, setup.powers_of_x);
        assert_eq!(parsed.x_2, setup.x_2);
    }

    #[test]
    fn reads_from_disk() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(4, rng);
        let contents = encode(&setup, Fq::from(7u64));

        let dir = tempdir::TempDir::new("ptau").unwrap();
        let path = dir.path().join("setup.ptau");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&contents)
            .unwrap();

        let parsed = Setup::<Bn254>::from_file(&path).unwrap();
        assert_eq!(parsed.powers_of_x, setup.powers_of_x);
    }

    #[test]
    fn rejects_truncated_files() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(8, rng);
        let contents = encode(&setup, Fq::from(5u64));

        let result =
            Setup::<Bn254>::from_bytes(&contents[..contents.len() / 2]);
        assert!(matches!(
            result,
            Err(Error::SetupFileMalformed { .. })
        ));
    }

    #[test]
    fn rejects_points_off_the_curve() {
        let rng = &mut test_rng();
        let setup = Setup::<Bn254>::generate(4, rng);
        let mut contents = encode(&setup, Fq::from(5u64));

        // Corrupt the y-coordinate of the second G1 power.
        contents[G1_OFFSET + 3 * WORD] ^= 1;
        let result = Setup::<Bn254>::from_bytes(&contents);
        assert!(matches!(
            result,
            Err(Error::SetupFileMalformed { .. })
        ));
    }
}
