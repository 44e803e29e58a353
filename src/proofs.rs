// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! The non-interactive zero-knowledge proofs of the scheme.
//!
//! Both proofs are Fiat–Shamir compiled Σ-protocols: [`RequestProof`]
//! (π_s) shows that a blind issuance request is well formed, and
//! [`ShowProof`] (π_v) shows knowledge of the attributes and randomizer
//! behind a presented credential. Either can be augmented with a
//! caller-supplied Schnorr-style sub-proof through the [`ExtraProver`] /
//! [`ExtraVerifier`] pair; extras contribute points to the transcript and
//! scalars to the response vector but never modify the main statement.
//!
//! The transcript orderings below are part of the wire contract; changing
//! them breaks interoperability.

use bls12_381::{G1Projective, G2Projective, Scalar};
use ff::Field;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::elgamal::Ciphertext;
use crate::hash::{signing_base, ChallengeHash, TranscriptPoint};
use crate::keys::VerificationKey;
use crate::{Error, Parameters};

/// Prover half of a caller-supplied Schnorr-style sub-proof.
///
/// An implementation holds the per-call witnesses of its sub-statement
/// (for example, the opening of a coin serial-number commitment) and must
/// be freshly constructed for every issuance or show; reusing one across
/// calls reuses its witnesses and is undefined behavior.
///
/// The default methods implement the no-op hook, which leaves transcripts
/// byte-identical to a call without extras.
pub trait ExtraProver {
    /// Witness commitments appended to the Fiat–Shamir transcript.
    fn witness_commits(&self) -> Vec<TranscriptPoint> {
        Vec::new()
    }

    /// Auxiliary base points, also transcribed, from which the verifier
    /// side can reconstruct the witness commitments.
    fn base_points(&self) -> Vec<TranscriptPoint> {
        Vec::new()
    }

    /// Responses of the sub-proof under the challenge `c`.
    fn compute_responses(&self, challenge: &Scalar) -> Vec<Scalar> {
        let _ = challenge;
        Vec::new()
    }
}

/// Verifier half of a caller-supplied Schnorr-style sub-proof.
pub trait ExtraVerifier {
    /// The same auxiliary base points the prover side transcribed.
    fn base_points(&self) -> Vec<TranscriptPoint> {
        Vec::new()
    }

    /// Reconstruct the witness commitments the prover transcribed, from
    /// the challenge and the extra responses carried in the proof.
    fn recompute_witness(&self, challenge: &Scalar, responses: &[Scalar]) -> Vec<TranscriptPoint> {
        let _ = (challenge, responses);
        Vec::new()
    }
}

/// The default no-op hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExtra;

impl ExtraProver for NoExtra {}
impl ExtraVerifier for NoExtra {}

/// Proof that a blind issuance request is well formed (π_s).
///
/// The prover knows the commitment randomness `r`, the ElGamal randomizers
/// `k_i` and the attributes `m_j` such that the request's commitment opens
/// to the attributes and each ciphertext encrypts the corresponding
/// private attribute under the requester's key. Public attributes are
/// committed alongside the private ones, establishing that the values the
/// authority signs in clear are the same ones inside the commitment.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestProof {
    challenge: Scalar,
    response_keys: Vec<Scalar>,
    response_attributes: Vec<Scalar>,
    response_randomness: Scalar,
    extra_responses: Vec<Scalar>,
}

impl RequestProof {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new<R, E>(
        params: &Parameters,
        gamma: &G1Projective,
        ciphertexts: &[Ciphertext],
        commitment: &G1Projective,
        randomizers: &[Scalar],
        randomness: &Scalar,
        private_attributes: &[Scalar],
        public_attributes: &[Scalar],
        extra: &E,
        mut rng: R,
    ) -> Result<RequestProof, Error>
    where
        R: RngCore + CryptoRng,
        E: ExtraProver + ?Sized,
    {
        let attribute_count = private_attributes.len() + public_attributes.len();
        if ciphertexts.len() != randomizers.len() || ciphertexts.len() != private_attributes.len()
        {
            return Err(Error::LengthMismatch);
        }
        if attribute_count > params.max_attributes() {
            return Err(Error::TooManyAttributes);
        }

        let wr = Zeroizing::new(Scalar::random(&mut rng));
        let wk: Zeroizing<Vec<Scalar>> = Zeroizing::new(
            (0..randomizers.len())
                .map(|_| Scalar::random(&mut rng))
                .collect(),
        );
        let wm: Zeroizing<Vec<Scalar>> = Zeroizing::new(
            (0..attribute_count)
                .map(|_| Scalar::random(&mut rng))
                .collect(),
        );

        let h = signing_base(commitment);
        let aw: Vec<G1Projective> = wk.iter().map(|wki| params.g1() * wki).collect();
        let bw: Vec<G1Projective> = wk
            .iter()
            .zip(wm.iter())
            .map(|(wki, wmi)| gamma * wki + h * wmi)
            .collect();
        let cw = params.g1() * *wr
            + wm.iter()
                .zip(params.hs())
                .map(|(wmi, base)| base * wmi)
                .sum::<G1Projective>();

        let challenge = request_challenge(
            params,
            commitment,
            &h,
            &cw,
            &aw,
            &bw,
            extra.witness_commits(),
            extra.base_points(),
        );

        let attributes = private_attributes.iter().chain(public_attributes);
        Ok(RequestProof {
            challenge,
            response_keys: wk
                .iter()
                .zip(randomizers)
                .map(|(w, k)| w - challenge * k)
                .collect(),
            response_attributes: wm
                .iter()
                .zip(attributes)
                .map(|(w, m)| w - challenge * m)
                .collect(),
            response_randomness: *wr - challenge * randomness,
            extra_responses: extra.compute_responses(&challenge),
        })
    }

    /// Verify the proof against the request's public material.
    pub(crate) fn verify<E>(
        &self,
        params: &Parameters,
        gamma: &G1Projective,
        ciphertexts: &[Ciphertext],
        commitment: &G1Projective,
        extra: &E,
    ) -> bool
    where
        E: ExtraVerifier + ?Sized,
    {
        if self.response_keys.len() != ciphertexts.len()
            || self.response_attributes.len() < ciphertexts.len()
            || self.response_attributes.len() > params.max_attributes()
        {
            return false;
        }

        let c = self.challenge;
        let h = signing_base(commitment);
        let aw: Vec<G1Projective> = ciphertexts
            .iter()
            .zip(&self.response_keys)
            .map(|(ciphertext, rk)| ciphertext.a * c + params.g1() * rk)
            .collect();
        let bw: Vec<G1Projective> = ciphertexts
            .iter()
            .zip(&self.response_keys)
            .zip(&self.response_attributes)
            .map(|((ciphertext, rk), rm)| ciphertext.b * c + gamma * rk + h * rm)
            .collect();
        let cw = commitment * c
            + params.g1() * self.response_randomness
            + self
                .response_attributes
                .iter()
                .zip(params.hs())
                .map(|(rm, base)| base * rm)
                .sum::<G1Projective>();

        let expected = request_challenge(
            params,
            commitment,
            &h,
            &cw,
            &aw,
            &bw,
            extra.recompute_witness(&c, &self.extra_responses),
            extra.base_points(),
        );
        self.challenge == expected
    }
}

/// The π_s transcript: `[g1, g2, cm, h, Cw] ∥ hs ∥ Aw ∥ Bw ∥ extra
/// witness commitments ∥ extra base points`.
#[allow(clippy::too_many_arguments)]
fn request_challenge(
    params: &Parameters,
    commitment: &G1Projective,
    h: &G1Projective,
    cw: &G1Projective,
    aw: &[G1Projective],
    bw: &[G1Projective],
    extra_witness: Vec<TranscriptPoint>,
    extra_bases: Vec<TranscriptPoint>,
) -> Scalar {
    ChallengeHash::default()
        .update(*params.g1())
        .update(*params.g2())
        .update(*commitment)
        .update(*h)
        .update(*cw)
        .update_all(params.hs().iter().copied())
        .update_all(aw.iter().copied())
        .update_all(bw.iter().copied())
        .update_all(extra_witness)
        .update_all(extra_bases)
        .finalize()
}

/// Proof of possession shown alongside a randomized credential (π_v).
///
/// The prover knows the blinder `t` and private attributes `m_i` with
/// `κ = t·g2 + α + Σ m_i·β_i` and `ν = t·h`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowProof {
    challenge: Scalar,
    response_attributes: Vec<Scalar>,
    response_blinder: Scalar,
    extra_responses: Vec<Scalar>,
}

impl ShowProof {
    pub(crate) fn new<R, E>(
        params: &Parameters,
        key: &VerificationKey,
        h_prime: &G1Projective,
        private_attributes: &[Scalar],
        blinder: &Scalar,
        extra: &E,
        mut rng: R,
    ) -> ShowProof
    where
        R: RngCore + CryptoRng,
        E: ExtraProver + ?Sized,
    {
        let wt = Zeroizing::new(Scalar::random(&mut rng));
        let wm: Zeroizing<Vec<Scalar>> = Zeroizing::new(
            (0..private_attributes.len())
                .map(|_| Scalar::random(&mut rng))
                .collect(),
        );

        let aw = params.g2() * *wt
            + key.alpha
            + wm.iter()
                .zip(&key.betas)
                .map(|(wmi, beta)| beta * wmi)
                .sum::<G2Projective>();
        let bw = h_prime * *wt;

        let challenge = show_challenge(
            params,
            key,
            &aw,
            &bw,
            extra.witness_commits(),
            extra.base_points(),
        );

        ShowProof {
            challenge,
            response_attributes: wm
                .iter()
                .zip(private_attributes)
                .map(|(w, m)| w - challenge * m)
                .collect(),
            response_blinder: *wt - challenge * blinder,
            extra_responses: extra.compute_responses(&challenge),
        }
    }

    /// Verify the proof against the presented `κ`, `ν` and the credential
    /// base `h'`.
    pub(crate) fn verify<E>(
        &self,
        params: &Parameters,
        key: &VerificationKey,
        h_prime: &G1Projective,
        kappa: &G2Projective,
        nu: &G1Projective,
        extra: &E,
    ) -> bool
    where
        E: ExtraVerifier + ?Sized,
    {
        if self.response_attributes.len() > key.betas.len() {
            return false;
        }

        let c = self.challenge;
        // α is an unknown-but-fixed constant of the statement, not a
        // witness; the `(1 − c)·α` term preserves its contribution.
        let aw = kappa * c
            + params.g2() * self.response_blinder
            + key.alpha * (Scalar::one() - c)
            + self
                .response_attributes
                .iter()
                .zip(&key.betas)
                .map(|(rm, beta)| beta * rm)
                .sum::<G2Projective>();
        let bw = nu * c + h_prime * self.response_blinder;

        let expected = show_challenge(
            params,
            key,
            &aw,
            &bw,
            extra.recompute_witness(&c, &self.extra_responses),
            extra.base_points(),
        );
        self.challenge == expected
    }

    /// The number of private attributes the proof commits to.
    pub(crate) fn private_attribute_count(&self) -> usize {
        self.response_attributes.len()
    }
}

/// The π_v transcript: `[g1, g2, α, Aw, Bw] ∥ hs ∥ β ∥ extra witness
/// commitments ∥ extra base points`.
fn show_challenge(
    params: &Parameters,
    key: &VerificationKey,
    aw: &G2Projective,
    bw: &G1Projective,
    extra_witness: Vec<TranscriptPoint>,
    extra_bases: Vec<TranscriptPoint>,
) -> Scalar {
    ChallengeHash::default()
        .update(*params.g1())
        .update(*params.g2())
        .update(key.alpha)
        .update(*aw)
        .update(*bw)
        .update_all(params.hs().iter().copied())
        .update_all(key.betas.iter().copied())
        .update_all(extra_witness)
        .update_all(extra_bases)
        .finalize()
}
