//! Tower — a capacity-bounded service point.
//!
//! A tower owns the ordered list of users attached to it. Load and status
//! are always derived from that list, so they can never go stale after a
//! membership change.

use serde::{Deserialize, Serialize};

use crate::types::{Location, TowerId, TowerStatus, UserId, load_percentage};

/// Default coverage radius in meters.
pub const DEFAULT_COVERAGE_RADIUS_M: u32 = 6000;

/// A radio tower and its current user membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    id: TowerId,
    capacity: u32,
    pub location: Location,
    /// Network operator running this tower.
    pub operator: String,
    pub coverage_radius_m: u32,
    /// Attached users in membership order. Entries are distinct.
    users: Vec<UserId>,
}

impl Tower {
    /// Create an empty tower.
    pub fn new(id: TowerId, capacity: u32, location: Location) -> Self {
        Self {
            id,
            capacity,
            location,
            operator: String::new(),
            coverage_radius_m: DEFAULT_COVERAGE_RADIUS_M,
            users: Vec::new(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn id(&self) -> TowerId {
        self.id
    }

    /// Maximum number of simultaneous users. Fixed at creation.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Attached users in membership order.
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Number of attached users.
    pub fn load(&self) -> usize {
        self.users.len()
    }

    pub fn load_percentage(&self) -> f64 {
        load_percentage(self.users.len() as f64, f64::from(self.capacity))
    }

    pub fn status(&self) -> TowerStatus {
        TowerStatus::from_load_percentage(self.load_percentage())
    }

    pub fn has_user(&self, user: UserId) -> bool {
        self.users.contains(&user)
    }

    /// Free admission slots left before the tower is full.
    pub fn available_slots(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.users.len())
    }

    /// Admit a user if there is room.
    ///
    /// This is the only admission-controlled entry point: it never leaves
    /// the tower above capacity. Returns false (and changes nothing) when
    /// the tower is full or the user is already attached.
    pub fn add_user(&mut self, user: UserId) -> bool {
        if self.users.len() >= self.capacity as usize || self.has_user(user) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Detach a user. Returns false if it was not a member.
    pub fn remove_user(&mut self, user: UserId) -> bool {
        match self.users.iter().position(|u| *u == user) {
            Some(idx) => {
                self.users.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Attach a user without admission control.
    ///
    /// Only scenario seeding uses this, to model towers that are already
    /// past capacity. Duplicates are still rejected.
    pub fn seed_user(&mut self, user: UserId) -> bool {
        if self.has_user(user) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Serializable point-in-time view with derived fields filled in.
    pub fn report(&self) -> TowerReport {
        TowerReport {
            id: self.id,
            capacity: self.capacity,
            load: self.users.len(),
            load_percentage: self.load_percentage(),
            status: self.status(),
            location: self.location,
            operator: self.operator.clone(),
            coverage_radius_m: self.coverage_radius_m,
        }
    }
}

/// Point-in-time view of a tower, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerReport {
    pub id: TowerId,
    pub capacity: u32,
    pub load: usize,
    pub load_percentage: f64,
    pub status: TowerStatus,
    pub location: Location,
    pub operator: String,
    pub coverage_radius_m: u32,
}
