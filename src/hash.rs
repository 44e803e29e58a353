// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! Hashing and canonical point encodings.
//!
//! Two hashes are fixed by the wire contract: the hash-to-G1 used to derive
//! the `hs` bases and the per-request signing base `h`, and the SHA-256
//! Fiat–Shamir hash that turns a transcript of group elements into a
//! challenge scalar. Changing either (the domain separation tag, the hex
//! encoding, the `","` separator, or the big-endian digest interpretation)
//! breaks interoperability with other implementations.

use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use bls12_381::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use sha2::{Digest, Sha256};

use crate::Error;

/// Domain separation tag for hash-to-G1, following the RFC 9380
/// `BLS12381G1_XMD:SHA-256_SSWU_RO_` suite. Part of the wire contract.
const HASH_TO_G1_DST: &[u8] = b"COCONUT-CRED-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Hash an arbitrary message to a point of G1.
pub(crate) fn hash_to_g1(msg: impl AsRef<[u8]>) -> G1Projective {
    <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(msg, HASH_TO_G1_DST)
}

/// Derive the signing base `h` from an attribute commitment.
///
/// Requester and authority both derive `h` by hashing the canonical
/// compressed encoding of `cm`; the point is never transmitted.
pub(crate) fn signing_base(commitment: &G1Projective) -> G1Projective {
    hash_to_g1(G1Affine::from(commitment).to_compressed())
}

/// A group element fed into a Fiat–Shamir transcript.
///
/// The two source groups of the pairing have distinct compressed encodings
/// (48 bytes for G1, 96 for G2), so a transcript may mix them freely.
#[derive(Clone, Copy, Debug)]
pub enum TranscriptPoint {
    /// An element of G1.
    G1(G1Projective),
    /// An element of G2.
    G2(G2Projective),
}

impl From<G1Projective> for TranscriptPoint {
    fn from(point: G1Projective) -> TranscriptPoint {
        TranscriptPoint::G1(point)
    }
}

impl From<G2Projective> for TranscriptPoint {
    fn from(point: G2Projective) -> TranscriptPoint {
        TranscriptPoint::G2(point)
    }
}

/// Builder for Fiat–Shamir challenge scalars.
///
/// Hashes the ordered transcript as the hex encodings of the points'
/// compressed forms, joined by `","`, and reduces the SHA-256 digest
/// (interpreted as a big-endian integer) modulo the group order.
pub(crate) struct ChallengeHash {
    state: Sha256,
    first: bool,
}

impl Default for ChallengeHash {
    fn default() -> Self {
        Self {
            state: Sha256::new(),
            first: true,
        }
    }
}

impl ChallengeHash {
    /// Add a point to the transcript, and return `Self` for chaining.
    pub fn update(mut self, point: impl Into<TranscriptPoint>) -> Self {
        if !self.first {
            self.state.update(b",");
        }
        self.first = false;
        match point.into() {
            TranscriptPoint::G1(p) => self
                .state
                .update(hex::encode(G1Affine::from(p).to_compressed()).as_bytes()),
            TranscriptPoint::G2(p) => self
                .state
                .update(hex::encode(G2Affine::from(p).to_compressed()).as_bytes()),
        }
        self
    }

    /// Add each point of an ordered collection to the transcript.
    pub fn update_all<I>(mut self, points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TranscriptPoint>,
    {
        for point in points {
            self = self.update(point);
        }
        self
    }

    /// Consume `self` to compute the challenge scalar.
    pub fn finalize(self) -> Scalar {
        let digest = self.state.finalize();
        // `from_bytes_wide` is little-endian; the transcript digest is a
        // big-endian integer, so reverse it into the low limbs.
        let mut wide = [0u8; 64];
        for (out, byte) in wide.iter_mut().zip(digest.iter().rev()) {
            *out = *byte;
        }
        Scalar::from_bytes_wide(&wide)
    }
}

/// Decode a canonical compressed G1 encoding.
pub(crate) fn g1_from_compressed(bytes: &[u8]) -> Result<G1Projective, Error> {
    let bytes: [u8; 48] = bytes.try_into().map_err(|_| Error::MalformedEncoding)?;
    Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
        .map(G1Projective::from)
        .ok_or(Error::MalformedEncoding)
}

/// Decode a canonical compressed G2 encoding.
pub(crate) fn g2_from_compressed(bytes: &[u8]) -> Result<G2Projective, Error> {
    let bytes: [u8; 96] = bytes.try_into().map_err(|_| Error::MalformedEncoding)?;
    Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
        .map(G2Projective::from)
        .ok_or(Error::MalformedEncoding)
}
