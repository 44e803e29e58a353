// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! Authority key material.
//!
//! Keys can be generated directly for a single authority with [`keygen`],
//! or by a trusted dealer performing Shamir secret sharing over the master
//! key with [`ttp_keygen`]; any threshold-sized subset of the resulting
//! verification keys aggregates (via Lagrange interpolation at zero) to
//! the same joint verification key.

use bls12_381::{G2Affine, G2Projective, Scalar};
use ff::Field;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::polynomial::{lagrange_basis, poly_eval};
use crate::{Error, Parameters};

/// The secret key of a single authority: `x` and one `y` per attribute.
///
/// Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    pub(crate) x: Scalar,
    pub(crate) ys: Vec<Scalar>,
}

impl SecretKey {
    /// Derive the verification key `(α, β[]) = (x·g2, [y_j·g2])`.
    pub fn verification_key(&self, params: &Parameters) -> VerificationKey {
        VerificationKey {
            alpha: params.g2() * self.x,
            betas: self.ys.iter().map(|y| params.g2() * y).collect(),
        }
    }
}

/// The verification key of an authority, or an aggregated verification
/// key: the two are indistinguishable.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationKey {
    /// `α = x·g2`.
    pub alpha: G2Projective,
    /// `β[j] = y_j·g2`, one per attribute.
    pub betas: Vec<G2Projective>,
}

impl VerificationKey {
    /// The number of attributes this key can sign or verify.
    pub fn max_attributes(&self) -> usize {
        self.betas.len()
    }

    /// Encode as `α ∥ β[0..q-1]`, all points compressed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(96 * (1 + self.betas.len()));
        bytes.extend_from_slice(&G2Affine::from(&self.alpha).to_compressed());
        for beta in &self.betas {
            bytes.extend_from_slice(&G2Affine::from(beta).to_compressed());
        }
        bytes
    }

    /// Decode a key previously encoded with [`VerificationKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<VerificationKey, Error> {
        if bytes.len() < 2 * 96 || bytes.len() % 96 != 0 {
            return Err(Error::MalformedEncoding);
        }
        let mut points = bytes.chunks_exact(96).map(crate::hash::g2_from_compressed);
        let alpha = points.next().ok_or(Error::MalformedEncoding)??;
        let betas = points.collect::<Result<Vec<_>, _>>()?;
        Ok(VerificationKey { alpha, betas })
    }
}

/// Generate the key material of a single authority.
///
/// This samples `x` and the `y_j` directly and cannot be used in the
/// threshold setting; see [`ttp_keygen`] for that.
pub fn keygen<R: RngCore + CryptoRng>(
    params: &Parameters,
    mut rng: R,
) -> (SecretKey, VerificationKey) {
    let secret = SecretKey {
        x: Scalar::random(&mut rng),
        ys: (0..params.max_attributes())
            .map(|_| Scalar::random(&mut rng))
            .collect(),
    };
    let verification = secret.verification_key(params);
    (secret, verification)
}

/// Generate keys for `authorities` authorities with threshold `threshold`,
/// executed by a trusted dealer.
///
/// The dealer samples a degree `threshold − 1` polynomial for `x` and for
/// each `y_j`, and authority `i ∈ 1..=authorities` receives the
/// evaluations at `i`. The polynomial coefficients are erased before the
/// call returns. Returns [`Error::InvalidParameters`] unless
/// `1 ≤ threshold ≤ authorities`.
pub fn ttp_keygen<R: RngCore + CryptoRng>(
    params: &Parameters,
    threshold: usize,
    authorities: usize,
    mut rng: R,
) -> Result<(Vec<SecretKey>, Vec<VerificationKey>), Error> {
    if threshold == 0 || threshold > authorities {
        return Err(Error::InvalidParameters);
    }

    let v: Zeroizing<Vec<Scalar>> =
        Zeroizing::new((0..threshold).map(|_| Scalar::random(&mut rng)).collect());
    let ws: Vec<Zeroizing<Vec<Scalar>>> = (0..params.max_attributes())
        .map(|_| Zeroizing::new((0..threshold).map(|_| Scalar::random(&mut rng)).collect()))
        .collect();

    let mut secrets = Vec::with_capacity(authorities);
    let mut verifications = Vec::with_capacity(authorities);
    for i in 1..=authorities as u64 {
        let secret = SecretKey {
            x: poly_eval(&v, i),
            ys: ws.iter().map(|w| poly_eval(w, i)).collect(),
        };
        verifications.push(secret.verification_key(params));
        secrets.push(secret);
    }
    Ok((secrets, verifications))
}

/// Aggregate verification keys.
///
/// Keys are passed positionally: entry `i` belongs to the authority with
/// 1-based index `i + 1`, and a missing share is marked `None`. In the
/// threshold setting the present keys are combined with the Lagrange basis
/// evaluated at zero; otherwise every present key contributes with unit
/// weight. Returns [`Error::DegenerateShares`] if no key is present and
/// [`Error::LengthMismatch`] if the present keys disagree on the attribute
/// count.
pub fn aggregate_keys(
    keys: &[Option<VerificationKey>],
    threshold: bool,
) -> Result<VerificationKey, Error> {
    let present: Vec<&VerificationKey> = keys.iter().flatten().collect();
    if present.is_empty() {
        return Err(Error::DegenerateShares);
    }
    let attributes = present[0].betas.len();
    if present.iter().any(|key| key.betas.len() != attributes) {
        return Err(Error::LengthMismatch);
    }

    let coefficients = if threshold {
        let indices: Vec<u64> = keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_some())
            .map(|(i, _)| i as u64 + 1)
            .collect();
        lagrange_basis(&indices)?
    } else {
        vec![Scalar::one(); present.len()]
    };

    let alpha: G2Projective = present
        .iter()
        .zip(&coefficients)
        .map(|(key, l)| key.alpha * l)
        .sum();
    let betas: Vec<G2Projective> = (0..attributes)
        .map(|j| {
            present
                .iter()
                .zip(&coefficients)
                .map(|(key, l)| key.betas[j] * l)
                .sum()
        })
        .collect();
    Ok(VerificationKey { alpha, betas })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn any_threshold_subset_aggregates_to_the_same_key() {
        let mut rng = thread_rng();
        let params = Parameters::setup(2).unwrap();
        let (_, verifications) = ttp_keygen(&params, 2, 4, &mut rng).unwrap();

        let some = |i: usize| Some(verifications[i].clone());
        let first = aggregate_keys(&[some(0), some(1), None, None], true).unwrap();
        let second = aggregate_keys(&[None, some(1), None, some(3)], true).unwrap();
        let third = aggregate_keys(&[some(0), some(1), some(2), some(3)], true).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn keygen_parameter_validation() {
        let mut rng = thread_rng();
        let params = Parameters::setup(1).unwrap();
        assert!(ttp_keygen(&params, 0, 3, &mut rng).is_err());
        assert!(ttp_keygen(&params, 4, 3, &mut rng).is_err());
        assert!(ttp_keygen(&params, 3, 3, &mut rng).is_ok());
    }

    #[test]
    fn aggregation_rejects_degenerate_inputs() {
        let mut rng = thread_rng();
        let params = Parameters::setup(1).unwrap();
        let (_, vk) = keygen(&params, &mut rng);
        let (_, vk_wide) = keygen(&Parameters::setup(2).unwrap(), &mut rng);

        assert_eq!(aggregate_keys(&[None, None], true), Err(Error::DegenerateShares));
        assert_eq!(
            aggregate_keys(&[Some(vk), Some(vk_wide)], true),
            Err(Error::LengthMismatch)
        );
    }

    #[test]
    fn verification_key_bytes_round_trip() {
        let mut rng = thread_rng();
        let params = Parameters::setup(3).unwrap();
        let (_, vk) = keygen(&params, &mut rng);

        let bytes = vk.to_bytes();
        assert_eq!(bytes.len(), 96 * 4);
        assert_eq!(VerificationKey::from_bytes(&bytes).unwrap(), vk);
        assert_eq!(
            VerificationKey::from_bytes(&bytes[..96]),
            Err(Error::MalformedEncoding)
        );
    }
}
