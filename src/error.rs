// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

use thiserror::Error;

/// An error related to Coconut credential issuance or aggregation.
///
/// Verification primitives do not produce these; they return a plain
/// `bool`. Construction primitives return a `Result` and the only
/// recoverable situation is rejecting a blind-sign request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// A protocol parameter was out of range: zero attributes, a zero
    /// threshold, or a threshold larger than the number of authorities.
    #[error("Invalid protocol parameters.")]
    InvalidParameters,
    /// More attributes were supplied than the parameters support.
    #[error("Too many attributes for these parameters.")]
    TooManyAttributes,
    /// Vectors whose lengths must agree did not.
    #[error("Mismatched lengths of related inputs.")]
    LengthMismatch,
    /// The issuance request proof failed to verify.
    #[error("Invalid blind issuance request proof.")]
    InvalidRequestProof,
    /// The credential show proof failed to verify.
    #[error("Invalid credential show proof.")]
    InvalidShowProof,
    /// Aggregation was attempted with no present shares, or with
    /// duplicated share indices.
    #[error("Degenerate share set for aggregation.")]
    DegenerateShares,
    /// A byte string was not a canonical encoding of a group element.
    #[error("Malformed point encoding.")]
    MalformedEncoding,
}
