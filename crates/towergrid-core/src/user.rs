//! Mobile users.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Location, TowerId, UsageCategory, UserId};

/// A mobile user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub location: Location,
    pub usage: UsageCategory,
    /// Resource consumption in MB, drawn from the usage category's range.
    pub consumption_mb: f64,
    /// Tower this user is attached to. Lookup only: the tower owns membership.
    pub connected_tower: Option<TowerId>,
}

impl User {
    /// Create a user, drawing its consumption from `rng`.
    pub fn new<R: Rng + ?Sized>(
        id: UserId,
        location: Location,
        usage: UsageCategory,
        rng: &mut R,
    ) -> Self {
        let (low, high) = usage.consumption_range_mb();
        Self::with_consumption(id, location, usage, rng.gen_range(low..=high))
    }

    /// Create a user with a fixed consumption value.
    pub fn with_consumption(
        id: UserId,
        location: Location,
        usage: UsageCategory,
        consumption_mb: f64,
    ) -> Self {
        Self {
            id,
            location,
            usage,
            consumption_mb,
            connected_tower: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn consumption_within_category_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for (i, usage) in UsageCategory::ALL.iter().cycle().take(300).enumerate() {
            let user = User::new(UserId(i as u32), Location::default(), *usage, &mut rng);
            let (low, high) = usage.consumption_range_mb();
            assert!(
                (low..=high).contains(&user.consumption_mb),
                "{usage:?} drew {}",
                user.consumption_mb
            );
            assert!(user.connected_tower.is_none());
        }
    }

    #[test]
    fn same_seed_same_consumption() {
        let a = User::new(
            UserId(1),
            Location::default(),
            UsageCategory::Video,
            &mut StdRng::seed_from_u64(42),
        );
        let b = User::new(
            UserId(1),
            Location::default(),
            UsageCategory::Video,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(a.consumption_mb, b.consumption_mb);
    }
}
