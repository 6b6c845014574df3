//! Player ship: kinematics, input, cargo.
//!
//! The kernel reads position/velocity for generation and density logic;
//! hazard effect side effects may write them (freeze, teleport, respawn).

use std::collections::HashMap;

use engine_core::{sanitize_dvec2, Health, Transform2};
use glam::DVec2;
use procgen::MineralType;

/// Ship class. Tunes thrust, top speed, and hold size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipClass {
    Scout,
    Miner,
    Hauler,
}

impl ShipClass {
    /// Thrust acceleration in units/s^2.
    pub fn thrust(&self) -> f64 {
        match self {
            ShipClass::Scout => 420.0,
            ShipClass::Miner => 320.0,
            ShipClass::Hauler => 240.0,
        }
    }

    pub fn max_speed(&self) -> f64 {
        match self {
            ShipClass::Scout => 900.0,
            ShipClass::Miner => 680.0,
            ShipClass::Hauler => 540.0,
        }
    }

    pub fn cargo_capacity(&self) -> u32 {
        match self {
            ShipClass::Scout => 30,
            ShipClass::Miner => 80,
            ShipClass::Hauler => 200,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShipClass::Scout => "scout",
            ShipClass::Miner => "miner",
            ShipClass::Hauler => "hauler",
        }
    }
}

/// Velocity damping per second while coasting.
const DRAG: f64 = 0.6;

/// The player ship.
pub struct Player {
    pub transform: Transform2,
    pub velocity: DVec2,
    pub class: ShipClass,
    pub health: Health,
    /// Thrust direction requested this tick (zero = coast). Normalized on
    /// use.
    pub thrust_input: DVec2,
    /// Set by active effects: input is ignored while locked.
    pub input_locked: bool,
    /// Set by active effects: velocity stays frozen while locked.
    pub velocity_locked: bool,
    /// Carried minerals by type.
    pub cargo: HashMap<MineralType, u32>,
}

impl Player {
    pub fn new(class: ShipClass) -> Self {
        Self {
            transform: Transform2::default(),
            velocity: DVec2::ZERO,
            class,
            health: Health::new(100.0),
            thrust_input: DVec2::ZERO,
            input_locked: false,
            velocity_locked: false,
            cargo: HashMap::new(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.transform.position
    }

    pub fn distance_from_origin(&self) -> f64 {
        self.transform.position.length()
    }

    /// Set the thrust direction for this tick. Ignored while input-locked.
    pub fn set_thrust(&mut self, dir: DVec2) {
        if !self.input_locked {
            self.thrust_input = dir;
        }
    }

    /// Apply input and integrate kinematics for one tick. Non-finite state
    /// resets to a safe default rather than spreading.
    pub fn integrate(&mut self, dt: f64) {
        if !self.velocity_locked {
            let thrust = if self.input_locked {
                DVec2::ZERO
            } else {
                self.thrust_input.normalize_or_zero() * self.class.thrust()
            };
            self.velocity += thrust * dt;
            self.velocity *= 1.0 - (DRAG * dt).min(1.0);
            let speed = self.velocity.length();
            let max = self.class.max_speed();
            if speed > max {
                self.velocity *= max / speed;
            }
            self.transform.position += self.velocity * dt;
        }

        self.velocity = sanitize_dvec2(self.velocity, DVec2::ZERO, "player velocity");
        self.transform.position =
            sanitize_dvec2(self.transform.position, DVec2::ZERO, "player position");
        if self.velocity.length_squared() > 1e-4 && !self.velocity_locked {
            self.transform.look_at(self.transform.position + self.velocity);
        }
    }

    /// Freeze in place (wormhole capture, death). Velocity zeroed, input
    /// ignored until `unlock`.
    pub fn freeze(&mut self) {
        self.velocity = DVec2::ZERO;
        self.thrust_input = DVec2::ZERO;
        self.input_locked = true;
        self.velocity_locked = true;
    }

    /// Release effect locks. Velocity stays wherever the effect left it.
    pub fn unlock(&mut self) {
        self.input_locked = false;
        self.velocity_locked = false;
    }

    /// Hard reset at a respawn point: full health, zero velocity, empty
    /// hold.
    pub fn respawn(&mut self, at: DVec2) {
        self.transform.position = at;
        self.velocity = DVec2::ZERO;
        self.thrust_input = DVec2::ZERO;
        self.health.revive();
        self.cargo.clear();
    }

    pub fn cargo_total(&self) -> u32 {
        self.cargo.values().sum()
    }

    pub fn cargo_full(&self) -> bool {
        self.cargo_total() >= self.class.cargo_capacity()
    }

    /// Stow one collected mineral. Returns false when the hold is full.
    pub fn stow(&mut self, kind: MineralType) -> bool {
        if self.cargo_full() {
            return false;
        }
        *self.cargo.entry(kind).or_insert(0) += 1;
        true
    }
}
