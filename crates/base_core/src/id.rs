use rand::Rng;
use uuid::Uuid;

use crate::BaseId;

/// Deterministic v4-format UUID from a seeded RNG.
pub fn generate_uuid(rng: &mut impl Rng) -> Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

impl BaseId {
    /// Fresh `base_<uuid>` id drawn from `rng`.
    pub fn generate(rng: &mut impl Rng) -> Self {
        BaseId(format!("base_{}", generate_uuid(rng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_seed_same_base_id() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(BaseId::generate(&mut rng1), BaseId::generate(&mut rng2));
    }

    #[test]
    fn ids_carry_prefix_and_v4_uuid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let id = BaseId::generate(&mut rng);
        let uuid = id.0.strip_prefix("base_").expect("prefix");
        let parsed = Uuid::parse_str(uuid).expect("valid uuid");
        assert_eq!(parsed.get_version(), Some(uuid::Version::Random));
    }
}
