// -*- mode: rust; -*-
//
// This file is part of coconut.
// See LICENSE for licensing information.

//! Polynomial evaluation and Lagrange interpolation over the BLS12-381
//! scalar field, used by the trusted-dealer key generation and by share
//! aggregation.

use bls12_381::Scalar;

use crate::Error;

/// Evaluate the polynomial with the given coefficients (constant term
/// first) at the point `x`, using Horner's method.
pub(crate) fn poly_eval(coeffs: &[Scalar], x: u64) -> Scalar {
    let x = Scalar::from(x);
    let mut value = Scalar::zero();
    for coeff in coeffs.iter().rev() {
        value = value * x + coeff;
    }
    value
}

/// Evaluate all Lagrange basis polynomials for the given interpolation
/// points at zero.
///
/// Share indices are 1-based, so every point is nonzero. Returns
/// [`Error::DegenerateShares`] if `indices` is empty or contains
/// duplicates (which make a denominator non-invertible).
pub(crate) fn lagrange_basis(indices: &[u64]) -> Result<Vec<Scalar>, Error> {
    if indices.is_empty() {
        return Err(Error::DegenerateShares);
    }
    let xs: Vec<Scalar> = indices.iter().map(|&i| Scalar::from(i)).collect();
    let mut basis = Vec::with_capacity(xs.len());
    for (i, xi) in xs.iter().enumerate() {
        let mut numerator = Scalar::one();
        let mut denominator = Scalar::one();
        for (j, xj) in xs.iter().enumerate() {
            if j == i {
                continue;
            }
            numerator *= -xj;
            denominator *= xi - xj;
        }
        let inverse =
            Option::<Scalar>::from(denominator.invert()).ok_or(Error::DegenerateShares)?;
        basis.push(numerator * inverse);
    }
    Ok(basis)
}
