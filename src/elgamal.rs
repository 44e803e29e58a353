// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! ElGamal encryption over G1.
//!
//! The requester encrypts each private attribute under their own public key
//! `γ = d·g1`, with the per-request signing base `h` as the message base.
//! Authorities then operate homomorphically on the ciphertexts, and the
//! requester strips the blinding by decrypting the result.

use bls12_381::{G1Affine, G1Projective, Scalar};
use ff::Field;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::g1_from_compressed;
use crate::{Error, Parameters};

/// An ElGamal keypair over G1.
///
/// The private scalar `d` is zeroized when the keypair is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Keypair {
    d: Scalar,
    #[zeroize(skip)]
    gamma: G1Projective,
}

impl Keypair {
    /// Generate a fresh keypair `(d, γ = d·g1)`.
    pub fn generate<R: RngCore + CryptoRng>(params: &Parameters, mut rng: R) -> Keypair {
        let d = Scalar::random(&mut rng);
        let gamma = params.g1() * d;
        Keypair { d, gamma }
    }

    /// The public half `γ`, handed to authorities so they can blindly sign
    /// the holder's encrypted attributes.
    pub fn public(&self) -> &G1Projective {
        &self.gamma
    }

    /// Decrypt a ciphertext: `b − d·a`.
    ///
    /// For an honestly formed encryption of `m` with base `h` this yields
    /// the group element `m·h`.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> G1Projective {
        ciphertext.b - ciphertext.a * self.d
    }
}

/// An ElGamal ciphertext `(a, b) = (k·g1, k·γ + m·h)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ciphertext {
    /// The randomizer commitment `k·g1`.
    pub a: G1Projective,
    /// The blinded message `k·γ + m·h`.
    pub b: G1Projective,
}

/// Encrypt the attribute `m` under `gamma` with the provided message base
/// `h`, returning the ciphertext together with the randomizer `k`.
///
/// The randomizer is needed once more to prove the ciphertext well-formed
/// and must be erased afterwards; callers hold it in a
/// [`zeroize::Zeroizing`] buffer.
pub fn encrypt<R: RngCore + CryptoRng>(
    params: &Parameters,
    gamma: &G1Projective,
    m: &Scalar,
    h: &G1Projective,
    mut rng: R,
) -> (Ciphertext, Scalar) {
    let k = Scalar::random(&mut rng);
    let a = params.g1() * k;
    let b = gamma * k + h * m;
    (Ciphertext { a, b }, k)
}

impl From<&Ciphertext> for [u8; 96] {
    fn from(ciphertext: &Ciphertext) -> [u8; 96] {
        let mut bytes = [0u8; 96];
        bytes[..48].copy_from_slice(&G1Affine::from(&ciphertext.a).to_compressed());
        bytes[48..].copy_from_slice(&G1Affine::from(&ciphertext.b).to_compressed());
        bytes
    }
}

impl TryFrom<[u8; 96]> for Ciphertext {
    type Error = Error;

    fn try_from(bytes: [u8; 96]) -> Result<Self, Self::Error> {
        Ok(Ciphertext {
            a: g1_from_compressed(&bytes[..48])?,
            b: g1_from_compressed(&bytes[48..])?,
        })
    }
}
