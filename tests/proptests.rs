use bls12_381::Scalar;
use ff::Field;
use proptest::prelude::*;
use rand_chacha::ChaChaRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};

use coconut::{
    aggregate_keys, aggregate_signatures, blind_sign, elgamal, prepare_blind_sign,
    prove_credential, ttp_keygen, unblind, verify_credential, NoExtra, Parameters, Presentation,
    Signature, VerificationKey,
};

/// A presentation test-case, containing a credential presentation and its
/// expected validity.
#[derive(Clone, Debug)]
struct PresentationCase {
    params: Parameters,
    key: VerificationKey,
    presentation: Presentation,
    public_m: Vec<Scalar>,
    is_valid: bool,
}

/// A modification to a test-case.
#[derive(Copy, Clone, Debug)]
enum Tweak {
    /// No-op, used to check that unchanged cases verify.
    None,
    /// Claim a different public attribute, invalidating the presentation.
    ChangePublicAttribute,
    /// Perturb the attribute binding `κ`, invalidating the presentation.
    TamperKappa,
    /// Perturb the blinder binding `ν`, invalidating the presentation.
    TamperNu,
    /// Perturb the re-randomized credential, invalidating the presentation.
    TamperCredential,
}

impl PresentationCase {
    fn new<R: RngCore + CryptoRng>(mut rng: R) -> Self {
        let params = Parameters::setup(2).unwrap();
        let (secret_keys, verification_keys) = ttp_keygen(&params, 2, 3, &mut rng).unwrap();
        let key = aggregate_keys(
            &verification_keys.iter().cloned().map(Some).collect::<Vec<_>>(),
            true,
        )
        .unwrap();

        let private_m = vec![Scalar::random(&mut rng)];
        let public_m = vec![Scalar::random(&mut rng)];
        let keypair = elgamal::Keypair::generate(&params, &mut rng);
        let request = prepare_blind_sign(
            &params,
            keypair.public(),
            &private_m,
            &public_m,
            &NoExtra,
            &mut rng,
        )
        .unwrap();
        let shares: Vec<Option<Signature>> = secret_keys
            .iter()
            .map(|sk| {
                let blinded =
                    blind_sign(&params, sk, keypair.public(), &request, &public_m, &NoExtra)
                        .unwrap();
                Some(unblind(&blinded, &keypair))
            })
            .collect();
        let credential = aggregate_signatures(&shares, true).unwrap();
        let presentation =
            prove_credential(&params, &key, &credential, &private_m, &NoExtra, &mut rng).unwrap();

        Self {
            params,
            key,
            presentation,
            public_m,
            is_valid: true,
        }
    }

    // Check that presentation verification succeeds or fails, as expected.
    fn check(&self) -> bool {
        self.is_valid
            == verify_credential(
                &self.params,
                &self.key,
                &self.presentation,
                &self.public_m,
                &NoExtra,
            )
    }

    fn apply_tweak(&mut self, tweak: &Tweak) {
        match tweak {
            Tweak::None => {}
            Tweak::ChangePublicAttribute => {
                self.public_m[0] += Scalar::one();
                self.is_valid = false;
            }
            Tweak::TamperKappa => {
                self.presentation.kappa += self.params.g2();
                self.is_valid = false;
            }
            Tweak::TamperNu => {
                self.presentation.nu += self.params.g1();
                self.is_valid = false;
            }
            Tweak::TamperCredential => {
                self.presentation.sigma.s += self.params.g1();
                self.is_valid = false;
            }
        }
    }
}

fn tweak_strategy() -> impl Strategy<Value = Tweak> {
    prop_oneof![
        10 => Just(Tweak::None),
        1 => Just(Tweak::ChangePublicAttribute),
        1 => Just(Tweak::TamperKappa),
        1 => Just(Tweak::TamperNu),
        1 => Just(Tweak::TamperCredential),
    ]
}

proptest! {
    // Each case runs the full issuance protocol with pairings, so keep the
    // case count small.
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn tweak_presentation(
        tweaks in prop::collection::vec(tweak_strategy(), (0, 4)),
        rng_seed in any::<u64>(),
    ) {
        // Use a deterministic RNG so that test failures can be reproduced.
        // Seeding with 64 bits of entropy is INSECURE and this code should
        // not be copied outside of this test!
        let rng = ChaChaRng::seed_from_u64(rng_seed);

        let mut case = PresentationCase::new(rng);
        for tweak in &tweaks {
            case.apply_tweak(tweak);
        }
        assert!(case.check());
    }

    #[test]
    fn threshold_subsets_decide_verification(
        present in prop::collection::vec(any::<bool>(), 4),
        rng_seed in any::<u64>(),
    ) {
        let mut rng = ChaChaRng::seed_from_u64(rng_seed);
        let threshold = 2;

        let params = Parameters::setup(1).unwrap();
        let (secret_keys, verification_keys) = ttp_keygen(&params, threshold, 4, &mut rng).unwrap();
        let key = aggregate_keys(
            &verification_keys.iter().cloned().map(Some).collect::<Vec<_>>(),
            true,
        )
        .unwrap();

        let private_m = vec![Scalar::random(&mut rng)];
        let keypair = elgamal::Keypair::generate(&params, &mut rng);
        let request = prepare_blind_sign(
            &params,
            keypair.public(),
            &private_m,
            &[],
            &NoExtra,
            &mut rng,
        )
        .unwrap();

        let shares: Vec<Option<Signature>> = secret_keys
            .iter()
            .zip(&present)
            .map(|(sk, keep)| {
                keep.then(|| {
                    let blinded =
                        blind_sign(&params, sk, keypair.public(), &request, &[], &NoExtra)
                            .unwrap();
                    unblind(&blinded, &keypair)
                })
            })
            .collect();

        let present_count = shares.iter().flatten().count();
        match aggregate_signatures(&shares, true) {
            Err(_) => assert_eq!(present_count, 0),
            Ok(credential) => {
                let presentation = prove_credential(
                    &params,
                    &key,
                    &credential,
                    &private_m,
                    &NoExtra,
                    &mut rng,
                )
                .unwrap();
                let verified =
                    verify_credential(&params, &key, &presentation, &[], &NoExtra);
                assert_eq!(verified, present_count >= threshold);
            }
        }
    }
}
