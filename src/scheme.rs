// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! The credential issuance and show protocol.
//!
//! A holder obtains a credential on a mix of private and public attributes
//! without revealing the private ones: [`prepare_blind_sign`] commits to
//! the attributes and encrypts the private ones, each authority issues a
//! partial blinded signature with [`blind_sign`], the holder strips the
//! blinding with [`unblind`] and combines a threshold of partials with
//! [`aggregate_signatures`]. At show time [`prove_credential`]
//! re-randomizes the credential and proves possession; the resulting
//! [`Presentation`] is unlinkable to the issuance and to other shows.

use bls12_381::{G1Affine, G1Projective, G2Prepared, G2Projective, Scalar};
use ff::Field;
use group::{Curve, Group};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::elgamal::{self, Ciphertext};
use crate::hash::{g1_from_compressed, signing_base};
use crate::keys::{SecretKey, VerificationKey};
use crate::polynomial::lagrange_basis;
use crate::proofs::{ExtraProver, ExtraVerifier, RequestProof, ShowProof};
use crate::{Error, Parameters};

/// A blind issuance request Λ: the attribute commitment, one ElGamal
/// ciphertext per private attribute, and the well-formedness proof π_s.
#[derive(Clone, Debug, PartialEq)]
pub struct BlindSignRequest {
    /// The attribute commitment `cm = r·g1 + Σ m_i·hs[i]`.
    pub commitment: G1Projective,
    /// Encryptions of the private attributes under the requester's key.
    pub ciphertexts: Vec<Ciphertext>,
    /// Proof that the commitment and ciphertexts are consistent.
    pub proof: RequestProof,
}

/// A partial blinded signature σ̃ issued by one authority.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlindedSignature {
    /// The signing base derived from the request commitment.
    pub h: G1Projective,
    /// `ã = Σ y_j·a_j` over the private-attribute ciphertexts.
    pub a: G1Projective,
    /// `b̃ = x·h + Σ y_j·(b_j ∥ m_j·h)`.
    pub b: G1Projective,
}

/// A credential σ = (h, s): either an unblinded partial signature or the
/// aggregate of a threshold of them; the two are indistinguishable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signature {
    /// The signing base.
    pub h: G1Projective,
    /// The signature point.
    pub s: G1Projective,
}

/// A credential presentation Θ: the re-randomized credential σ' together
/// with `κ`, `ν` and the possession proof π_v.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// `κ = t·g2 + α + Σ m_i·β_i`, binding the hidden attributes.
    pub kappa: G2Projective,
    /// `ν = t·h'`, binding the blinder to the re-randomized base.
    pub nu: G1Projective,
    /// The re-randomized credential `σ' = (r'·h, r'·s)`.
    pub sigma: Signature,
    /// Proof of knowledge of the attributes and blinder.
    pub proof: ShowProof,
}

/// Build the cryptographic material for a blind signature on
/// `private_attributes ∥ public_attributes`.
///
/// Samples the commitment randomness and the ElGamal randomizers, derives
/// the signing base `h` from the commitment, and proves the bundle well
/// formed. All ephemeral scalars are erased before returning. A fresh
/// [`ExtraProver`] must be supplied per call.
pub fn prepare_blind_sign<R, E>(
    params: &Parameters,
    gamma: &G1Projective,
    private_attributes: &[Scalar],
    public_attributes: &[Scalar],
    extra: &E,
    mut rng: R,
) -> Result<BlindSignRequest, Error>
where
    R: RngCore + CryptoRng,
    E: ExtraProver + ?Sized,
{
    if private_attributes.is_empty() {
        return Err(Error::InvalidParameters);
    }
    if private_attributes.len() + public_attributes.len() > params.max_attributes() {
        return Err(Error::TooManyAttributes);
    }

    let randomness = Zeroizing::new(Scalar::random(&mut rng));
    let commitment = params.g1() * *randomness
        + private_attributes
            .iter()
            .chain(public_attributes)
            .zip(params.hs())
            .map(|(m, base)| base * m)
            .sum::<G1Projective>();
    let h = signing_base(&commitment);

    let mut randomizers = Zeroizing::new(Vec::with_capacity(private_attributes.len()));
    let mut ciphertexts = Vec::with_capacity(private_attributes.len());
    for m in private_attributes {
        let (ciphertext, k) = elgamal::encrypt(params, gamma, m, &h, &mut rng);
        ciphertexts.push(ciphertext);
        randomizers.push(k);
    }

    let proof = RequestProof::new(
        params,
        gamma,
        &ciphertexts,
        &commitment,
        &randomizers,
        &randomness,
        private_attributes,
        public_attributes,
        extra,
        &mut rng,
    )?;
    Ok(BlindSignRequest {
        commitment,
        ciphertexts,
        proof,
    })
}

/// Blindly sign the attributes of a verified request.
///
/// The authority checks π_s against the request (rejecting with
/// [`Error::InvalidRequestProof`]), re-derives the signing base, and
/// signs the ciphertexts homomorphically. The secret `y` scalars are
/// applied to the private-attribute ciphertexts first and then to the
/// public attributes, in attribute order; this indexing is an
/// interoperability requirement.
pub fn blind_sign<E>(
    params: &Parameters,
    secret_key: &SecretKey,
    gamma: &G1Projective,
    request: &BlindSignRequest,
    public_attributes: &[Scalar],
    extra: &E,
) -> Result<BlindedSignature, Error>
where
    E: ExtraVerifier + ?Sized,
{
    let attribute_count = request.ciphertexts.len() + public_attributes.len();
    if attribute_count > params.max_attributes() {
        return Err(Error::TooManyAttributes);
    }
    if attribute_count > secret_key.ys.len() {
        return Err(Error::LengthMismatch);
    }
    if !request
        .proof
        .verify(params, gamma, &request.ciphertexts, &request.commitment, extra)
    {
        return Err(Error::InvalidRequestProof);
    }

    let h = signing_base(&request.commitment);
    let a: G1Projective = secret_key
        .ys
        .iter()
        .zip(&request.ciphertexts)
        .map(|(y, ciphertext)| ciphertext.a * y)
        .sum();
    let blinded_terms = request
        .ciphertexts
        .iter()
        .map(|ciphertext| ciphertext.b)
        .chain(public_attributes.iter().map(|m| h * m));
    let b = h * secret_key.x
        + secret_key
            .ys
            .iter()
            .zip(blinded_terms)
            .map(|(y, term)| term * y)
            .sum::<G1Projective>();
    Ok(BlindedSignature { h, a, b })
}

/// Strip the blinding from a partial signature.
///
/// Unblinding is ElGamal decryption of `(ã, b̃)` under the requester's
/// key: `σ_i = (h, b̃ − d·ã)`.
pub fn unblind(blinded: &BlindedSignature, keypair: &elgamal::Keypair) -> Signature {
    let ciphertext = Ciphertext {
        a: blinded.a,
        b: blinded.b,
    };
    Signature {
        h: blinded.h,
        s: keypair.decrypt(&ciphertext),
    }
}

/// Aggregate partial credentials.
///
/// Shares are passed positionally like in [`crate::aggregate_keys`]:
/// entry `i` belongs to authority `i + 1` and missing shares are `None`.
/// All honest partials carry the same `h` (it is a function of the
/// request commitment), so the aggregate takes it from the first present
/// share.
pub fn aggregate_signatures(
    signatures: &[Option<Signature>],
    threshold: bool,
) -> Result<Signature, Error> {
    let present: Vec<&Signature> = signatures.iter().flatten().collect();
    if present.is_empty() {
        return Err(Error::DegenerateShares);
    }

    let coefficients = if threshold {
        let indices: Vec<u64> = signatures
            .iter()
            .enumerate()
            .filter(|(_, share)| share.is_some())
            .map(|(i, _)| i as u64 + 1)
            .collect();
        lagrange_basis(&indices)?
    } else {
        vec![Scalar::one(); present.len()]
    };

    let s: G1Projective = present
        .iter()
        .zip(&coefficients)
        .map(|(share, l)| share.s * l)
        .sum();
    Ok(Signature { h: present[0].h, s })
}

/// Re-randomize a credential and prove possession of its attributes.
///
/// Produces `σ' = (r'·h, r'·s)` under a fresh `r'`, together with `κ`,
/// `ν` and π_v over a fresh blinder; two presentations of the same
/// credential are statistically unlinkable. A fresh [`ExtraProver`] must
/// be supplied per call.
pub fn prove_credential<R, E>(
    params: &Parameters,
    key: &VerificationKey,
    credential: &Signature,
    private_attributes: &[Scalar],
    extra: &E,
    mut rng: R,
) -> Result<Presentation, Error>
where
    R: RngCore + CryptoRng,
    E: ExtraProver + ?Sized,
{
    if private_attributes.is_empty() {
        return Err(Error::InvalidParameters);
    }
    if private_attributes.len() > key.betas.len() {
        return Err(Error::TooManyAttributes);
    }

    let randomizer = Zeroizing::new(Scalar::random(&mut rng));
    let sigma = Signature {
        h: credential.h * *randomizer,
        s: credential.s * *randomizer,
    };
    let blinder = Zeroizing::new(Scalar::random(&mut rng));
    let kappa = params.g2() * *blinder
        + key.alpha
        + private_attributes
            .iter()
            .zip(&key.betas)
            .map(|(m, beta)| beta * m)
            .sum::<G2Projective>();
    let nu = sigma.h * *blinder;
    let proof = ShowProof::new(
        params,
        key,
        &sigma.h,
        private_attributes,
        &blinder,
        extra,
        &mut rng,
    );
    Ok(Presentation {
        kappa,
        nu,
        sigma,
        proof,
    })
}

/// Verify a credential presentation against the aggregated verification
/// key and the public attributes.
///
/// The public attributes are bound to the `β` bases following the hidden
/// ones, matching their position at issuance.
pub fn verify_credential<E>(
    params: &Parameters,
    key: &VerificationKey,
    presentation: &Presentation,
    public_attributes: &[Scalar],
    extra: &E,
) -> bool
where
    E: ExtraVerifier + ?Sized,
{
    let hidden = presentation.proof.private_attribute_count();
    if hidden + public_attributes.len() > key.betas.len() {
        return false;
    }
    if !presentation.proof.verify(
        params,
        key,
        &presentation.sigma.h,
        &presentation.kappa,
        &presentation.nu,
        extra,
    ) {
        return false;
    }

    let aggregated: G2Projective = public_attributes
        .iter()
        .zip(&key.betas[hidden..])
        .map(|(m, beta)| beta * m)
        .sum();
    if bool::from(presentation.sigma.h.is_identity()) {
        return false;
    }
    pairing_equals(
        &presentation.sigma.h,
        &(presentation.kappa + aggregated),
        &(presentation.sigma.s + presentation.nu),
        params.g2(),
    )
}

/// Check `e(p, q) == e(r, s)` with a two-pair Miller loop and a single
/// final exponentiation.
fn pairing_equals(
    p: &G1Projective,
    q: &G2Projective,
    r: &G1Projective,
    s: &G2Projective,
) -> bool {
    let p = p.to_affine();
    let q = G2Prepared::from(q.to_affine());
    let r = -r.to_affine();
    let s = G2Prepared::from(s.to_affine());
    bls12_381::multi_miller_loop(&[(&p, &q), (&r, &s)])
        .final_exponentiation()
        .is_identity()
        .into()
}

impl From<&Signature> for [u8; 96] {
    fn from(signature: &Signature) -> [u8; 96] {
        let mut bytes = [0u8; 96];
        bytes[..48].copy_from_slice(&G1Affine::from(&signature.h).to_compressed());
        bytes[48..].copy_from_slice(&G1Affine::from(&signature.s).to_compressed());
        bytes
    }
}

impl TryFrom<[u8; 96]> for Signature {
    type Error = Error;

    fn try_from(bytes: [u8; 96]) -> Result<Self, Self::Error> {
        Ok(Signature {
            h: g1_from_compressed(&bytes[..48])?,
            s: g1_from_compressed(&bytes[48..])?,
        })
    }
}

impl From<&BlindedSignature> for [u8; 144] {
    fn from(blinded: &BlindedSignature) -> [u8; 144] {
        let mut bytes = [0u8; 144];
        bytes[..48].copy_from_slice(&G1Affine::from(&blinded.h).to_compressed());
        bytes[48..96].copy_from_slice(&G1Affine::from(&blinded.a).to_compressed());
        bytes[96..].copy_from_slice(&G1Affine::from(&blinded.b).to_compressed());
        bytes
    }
}

impl TryFrom<[u8; 144]> for BlindedSignature {
    type Error = Error;

    fn try_from(bytes: [u8; 144]) -> Result<Self, Self::Error> {
        Ok(BlindedSignature {
            h: g1_from_compressed(&bytes[..48])?,
            a: g1_from_compressed(&bytes[48..96])?,
            b: g1_from_compressed(&bytes[96..])?,
        })
    }
}
