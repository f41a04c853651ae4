//! Network — the tower and user collections of one simulation.
//!
//! Towers own membership. The network keeps every user attached to at
//! most one tower and keeps `User::connected_tower` in sync with it.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScenarioConfig;
use crate::tower::Tower;
use crate::types::{Location, TowerId, UsageCategory, UserId};
use crate::user::User;

/// Fixed sites for the first generated towers: Amman, Zarqa, Irbid, Aqaba, Karak.
const CITY_SITES: [(f64, f64); 5] = [
    (31.9565, 35.9239),
    (32.0833, 36.0933),
    (32.5486, 35.8519),
    (29.5320, 35.0063),
    (31.1854, 35.7017),
];

const OPERATORS: [&str; 3] = ["Zain", "Orange", "Umniah"];

/// Bounding box used for random tower and user locations.
const LAT_RANGE: (f64, f64) = (29.5, 32.6);
const LNG_RANGE: (f64, f64) = (35.0, 36.2);

/// Towers and users with indexed lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Network {
    towers: Vec<Tower>,
    users: Vec<User>,
    #[serde(skip)]
    tower_index: HashMap<TowerId, usize>,
    #[serde(skip)]
    user_index: HashMap<UserId, usize>,
}

impl Network {
    /// Build a network, normalizing inconsistent input instead of failing.
    ///
    /// Duplicate tower or user ids keep their first occurrence. Tower
    /// members that are unknown users, or that already belong to an
    /// earlier tower, are dropped. User back-references are rebuilt from
    /// tower membership.
    pub fn new(towers: Vec<Tower>, users: Vec<User>) -> Self {
        let mut kept_users = Vec::with_capacity(users.len());
        let mut user_index = HashMap::with_capacity(users.len());
        for mut user in users {
            if user_index.contains_key(&user.id) {
                warn!(user = %user.id, "duplicate user id dropped");
                continue;
            }
            user.connected_tower = None;
            user_index.insert(user.id, kept_users.len());
            kept_users.push(user);
        }

        let mut kept_towers: Vec<Tower> = Vec::with_capacity(towers.len());
        let mut tower_index = HashMap::with_capacity(towers.len());
        for tower in towers {
            if tower_index.contains_key(&tower.id()) {
                warn!(tower = %tower.id(), "duplicate tower id dropped");
                continue;
            }

            let mut clean = Tower::new(tower.id(), tower.capacity(), tower.location);
            clean.operator = tower.operator.clone();
            clean.coverage_radius_m = tower.coverage_radius_m;

            for &member in tower.users() {
                let Some(&idx) = user_index.get(&member) else {
                    warn!(tower = %tower.id(), user = %member, "unknown user dropped from tower");
                    continue;
                };
                let user = &mut kept_users[idx];
                if let Some(other) = user.connected_tower {
                    warn!(
                        user = %member,
                        kept_on = %other,
                        dropped_from = %tower.id(),
                        "user attached to multiple towers"
                    );
                    continue;
                }
                clean.seed_user(member);
                user.connected_tower = Some(tower.id());
            }

            tower_index.insert(clean.id(), kept_towers.len());
            kept_towers.push(clean);
        }

        Self {
            towers: kept_towers,
            users: kept_users,
            tower_index,
            user_index,
        }
    }

    /// Generate a synthetic network with deliberate hotspots.
    pub fn seeded(config: &ScenarioConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let towers: Vec<Tower> = (0..config.towers)
            .map(|i| {
                let location = match CITY_SITES.get(i as usize) {
                    Some(&(lat, lng)) => Location::new(lat, lng),
                    None => random_location(&mut rng),
                };
                let capacity = rng.gen_range(config.capacity_min..=config.capacity_max);
                let operator = OPERATORS.choose(&mut rng).copied().unwrap_or_default();
                Tower::new(TowerId(i), capacity, location).with_operator(operator)
            })
            .collect();

        let users: Vec<User> = (0..config.users)
            .map(|i| {
                let usage = UsageCategory::ALL
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(UsageCategory::Data);
                let location = random_location(&mut rng);
                User::new(UserId(i), location, usage, &mut rng)
            })
            .collect();

        let mut network = Self::new(towers, users);
        if network.towers.is_empty() {
            return network;
        }

        let hotspot_count = (config.hotspot_towers as usize).min(network.towers.len());
        let hotspots: Vec<usize> =
            (0..network.towers.len()).choose_multiple(&mut rng, hotspot_count);

        for idx in 0..network.users.len() {
            let tower_idx = if !hotspots.is_empty() && rng.gen_bool(config.hotspot_share) {
                hotspots[rng.gen_range(0..hotspots.len())]
            } else {
                rng.gen_range(0..network.towers.len())
            };
            let user_id = network.users[idx].id;
            let tower = &mut network.towers[tower_idx];
            tower.seed_user(user_id);
            network.users[idx].connected_tower = Some(tower.id());
        }

        debug!(
            seed,
            towers = network.towers.len(),
            users = network.users.len(),
            ?hotspots,
            "seeded network"
        );
        network
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.tower_index.get(&id).map(|&i| &self.towers[i])
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.user_index.get(&id).map(|&i| &self.users[i])
    }

    /// Attach an unattached user to a tower, subject to admission control.
    pub fn assign(&mut self, user: UserId, tower: TowerId) -> bool {
        let (Some(&ui), Some(&ti)) = (self.user_index.get(&user), self.tower_index.get(&tower))
        else {
            return false;
        };
        if self.users[ui].connected_tower.is_some() {
            return false;
        }
        if !self.towers[ti].add_user(user) {
            return false;
        }
        self.users[ui].connected_tower = Some(tower);
        true
    }

    /// Move a user from `from` to `to`.
    ///
    /// The target admits first; the source is only released once the
    /// target accepted, so a failed transfer leaves everything untouched.
    pub fn transfer(&mut self, user: UserId, from: TowerId, to: TowerId) -> bool {
        if from == to {
            return false;
        }
        let (Some(&ui), Some(&fi), Some(&ti)) = (
            self.user_index.get(&user),
            self.tower_index.get(&from),
            self.tower_index.get(&to),
        ) else {
            return false;
        };
        if self.users[ui].connected_tower != Some(from) || !self.towers[fi].has_user(user) {
            return false;
        }
        if !self.towers[ti].add_user(user) {
            return false;
        }
        self.towers[fi].remove_user(user);
        self.users[ui].connected_tower = Some(to);
        true
    }

    /// Sum of tower loads.
    pub fn total_attached(&self) -> usize {
        self.towers.iter().map(Tower::load).sum()
    }

    pub fn into_parts(self) -> (Vec<Tower>, Vec<User>) {
        (self.towers, self.users)
    }
}

fn random_location<R: Rng + ?Sized>(rng: &mut R) -> Location {
    Location::new(
        rng.gen_range(LAT_RANGE.0..=LAT_RANGE.1),
        rng.gen_range(LNG_RANGE.0..=LNG_RANGE.1),
    )
}
