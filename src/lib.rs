// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

#![deny(missing_docs)]

//! An implementation of the Coconut threshold credential scheme over
//! BLS12-381.
//!
//! Coconut lets a set of mutually distrusting authorities collaboratively
//! issue short, re-randomizable, selectively-disclosable credentials on
//! user-held attributes. A user obtains a credential without revealing
//! their private attributes to the issuers, any threshold-sized subset of
//! authorities suffices to issue or verify, and a credential is later
//! presented in a form unlinkable to its issuance.
//!
//! This crate is the cryptographic core only: transport, persistence and
//! application policies such as double-spend tracking are left to the
//! caller, who supplies the RNG and moves the defined byte encodings
//! around. Both zero-knowledge proofs accept caller-supplied Schnorr-style
//! sub-proofs through the [`ExtraProver`] / [`ExtraVerifier`] hooks.
//!
//! ```
//! use bls12_381::Scalar;
//! use coconut::{
//!     aggregate_keys, aggregate_signatures, blind_sign, elgamal, prepare_blind_sign,
//!     prove_credential, ttp_keygen, unblind, verify_credential, NoExtra, Parameters,
//! };
//! use rand::thread_rng;
//!
//! # fn main() -> Result<(), coconut::Error> {
//! let mut rng = thread_rng();
//!
//! // Credentials embed up to two attributes; 2-of-3 authorities.
//! let params = Parameters::setup(2)?;
//! let (secret_keys, verification_keys) = ttp_keygen(&params, 2, 3, &mut rng)?;
//! let key = aggregate_keys(
//!     &verification_keys.iter().cloned().map(Some).collect::<Vec<_>>(),
//!     true,
//! )?;
//!
//! let private_m = [Scalar::from(10u64)];
//! let public_m = [Scalar::from(3u64)];
//!
//! // The holder blinds their private attribute and each authority signs.
//! let keypair = elgamal::Keypair::generate(&params, &mut rng);
//! let request =
//!     prepare_blind_sign(&params, keypair.public(), &private_m, &public_m, &NoExtra, &mut rng)?;
//! let shares = secret_keys
//!     .iter()
//!     .map(|sk| {
//!         blind_sign(&params, sk, keypair.public(), &request, &public_m, &NoExtra)
//!             .map(|blinded| Some(unblind(&blinded, &keypair)))
//!     })
//!     .collect::<Result<Vec<_>, _>>()?;
//! let credential = aggregate_signatures(&shares, true)?;
//!
//! // Present the credential, revealing only the public attribute.
//! let presentation =
//!     prove_credential(&params, &key, &credential, &private_m, &NoExtra, &mut rng)?;
//! assert!(verify_credential(&params, &key, &presentation, &public_m, &NoExtra));
//! # Ok(())
//! # }
//! ```

pub mod elgamal;
mod error;
mod hash;
mod keys;
mod parameters;
mod polynomial;
mod proofs;
mod scheme;

pub use error::Error;
pub use hash::TranscriptPoint;
pub use keys::{aggregate_keys, keygen, ttp_keygen, SecretKey, VerificationKey};
pub use parameters::Parameters;
pub use proofs::{ExtraProver, ExtraVerifier, NoExtra, RequestProof, ShowProof};
pub use scheme::{
    aggregate_signatures, blind_sign, prepare_blind_sign, prove_credential, unblind,
    verify_credential, BlindSignRequest, BlindedSignature, Presentation, Signature,
};
