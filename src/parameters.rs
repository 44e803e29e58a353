// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

use bls12_381::{G1Affine, G1Projective, G2Projective};
use group::Group;

use crate::hash::{g1_from_compressed, hash_to_g1};
use crate::Error;

/// The public parameters of a deployment.
///
/// Parameters are generated once by [`Parameters::setup`] and shared by all
/// authorities and users. The `hs` bases are derived deterministically by
/// hashing `"h0"`, `"h1"`, … to G1, so any two parties calling `setup` with
/// the same maximum attribute count obtain identical parameters. A
/// `Parameters` value is immutable and safe to share across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    g1: G1Projective,
    hs: Vec<G1Projective>,
    g2: G2Projective,
}

impl Parameters {
    /// Generate the public parameters for credentials holding up to
    /// `max_attributes` attributes.
    ///
    /// Returns [`Error::InvalidParameters`] if `max_attributes` is zero.
    pub fn setup(max_attributes: usize) -> Result<Parameters, Error> {
        if max_attributes == 0 {
            return Err(Error::InvalidParameters);
        }
        Ok(Parameters {
            g1: G1Projective::generator(),
            hs: (0..max_attributes)
                .map(|i| hash_to_g1(format!("h{}", i)))
                .collect(),
            g2: G2Projective::generator(),
        })
    }

    /// The maximum number of attributes that can be embedded into a
    /// credential under these parameters.
    pub fn max_attributes(&self) -> usize {
        self.hs.len()
    }

    /// The G1 generator.
    pub fn g1(&self) -> &G1Projective {
        &self.g1
    }

    /// The G2 generator.
    pub fn g2(&self) -> &G2Projective {
        &self.g2
    }

    /// The attribute bases `hs`.
    pub fn hs(&self) -> &[G1Projective] {
        &self.hs
    }

    /// Encode as `max_attributes ∥ hs`, the attribute count as a big-endian
    /// `u64` and each base compressed. The generators are fixed by the curve
    /// and are not transmitted.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + 48 * self.hs.len());
        bytes.extend_from_slice(&(self.hs.len() as u64).to_be_bytes());
        for h in &self.hs {
            bytes.extend_from_slice(&G1Affine::from(h).to_compressed());
        }
        bytes
    }

    /// Decode parameters previously encoded with [`Parameters::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Parameters, Error> {
        let count: [u8; 8] = bytes
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::MalformedEncoding)?;
        let count = usize::try_from(u64::from_be_bytes(count)).map_err(|_| Error::MalformedEncoding)?;
        if count == 0 {
            return Err(Error::InvalidParameters);
        }
        let rest = &bytes[8..];
        // Guard the multiplication; a hostile header can claim any count.
        if count.checked_mul(48) != Some(rest.len()) {
            return Err(Error::MalformedEncoding);
        }
        let hs = rest
            .chunks_exact(48)
            .map(g1_from_compressed)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Parameters {
            g1: G1Projective::generator(),
            hs,
            g2: G2Projective::generator(),
        })
    }
}
