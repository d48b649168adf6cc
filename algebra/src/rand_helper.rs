use rand_chacha::{
    rand_core::{CryptoRng, RngCore, SeedableRng},
    ChaChaRng,
};

/// Seed used when `DETERMINISTIC_TEST_RNG=1` (and always without `std`).
const TEST_SEED: [u8; 32] = [
    0x72, 0x65, 0x64, 0x73, 0x68, 0x69, 0x66, 0x74, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Should be used only for tests, not for any real world usage.
#[cfg(not(feature = "std"))]
pub fn test_rng() -> impl RngCore + CryptoRng {
    ChaChaRng::from_seed(TEST_SEED)
}

/// Should be used only for tests, not for any real world usage.
///
/// Set `DETERMINISTIC_TEST_RNG=1` to replay a failing run.
#[cfg(feature = "std")]
pub fn test_rng() -> impl RngCore + CryptoRng {
    match std::env::var("DETERMINISTIC_TEST_RNG") {
        Ok(val) if val == "1" => ChaChaRng::from_seed(TEST_SEED),
        _ => ChaChaRng::from_entropy(),
    }
}

#[cfg(all(test, feature = "std"))]
mod test {
    use ark_std::UniformRand;

    #[test]
    fn test_deterministic_rng() {
        std::env::remove_var("DETERMINISTIC_TEST_RNG");
        let a = u128::rand(&mut super::test_rng());
        let b = u128::rand(&mut super::test_rng());
        assert_ne!(a, b);

        std::env::set_var("DETERMINISTIC_TEST_RNG", "1");
        let a = u128::rand(&mut super::test_rng());
        let b = u128::rand(&mut super::test_rng());
        assert_eq!(a, b);
        std::env::remove_var("DETERMINISTIC_TEST_RNG");
    }
}
