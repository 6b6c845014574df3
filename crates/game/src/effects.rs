//! Hazard encounter effects: the timed multi-phase sequences that take over
//! the ship on contact (mine detonation, wormhole traversal, death and
//! respawn).
//!
//! One generic engine drives every kind. An effect is a start time, a
//! duration, and a per-kind table of phase boundaries over normalized
//! progress; `update` advances progress from the injected monotonic `now`,
//! fires phase-entry side effects exactly once per phase, and always
//! advances the continuous particle state. At most one effect exists at a
//! time. A failure anywhere inside the engine clears the effect: a stuck
//! effect would permanently lock player input, so the engine fails safe,
//! never fail-locked.

use glam::DVec2;
use rand::prelude::*;
use thiserror::Error;

use crate::config::{EffectTuning, GameConfig};
use crate::messages::GameMessages;
use crate::player::Player;
use crate::state::ScreenShake;

/// Effect type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Explosion,
    Wormhole,
    Death,
}

impl EffectKind {
    /// Chained secondary detonations may replace a running explosion;
    /// every other kind is a no-op while something is active.
    pub fn chainable(&self) -> bool {
        matches!(self, EffectKind::Explosion)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Explosion => "explosion",
            EffectKind::Wormhole => "wormhole",
            EffectKind::Death => "death",
        }
    }
}

/// Trigger request: the kind plus its contact parameters.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Explosion { damage: f32, blast_radius: f64 },
    Wormhole,
    Death,
}

impl Trigger {
    pub fn kind(&self) -> EffectKind {
        match self {
            Trigger::Explosion { .. } => EffectKind::Explosion,
            Trigger::Wormhole => EffectKind::Wormhole,
            Trigger::Death => EffectKind::Death,
        }
    }
}

/// Transient cosmetic particle owned by the active effect.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub life: f32,
    pub size: f32,
}

/// Per-kind effect state. The tagged union keeps phase dispatch exhaustive:
/// adding a kind without handling its phases is a compile error.
pub enum EffectPayload {
    Explosion {
        origin: DVec2,
        blast_radius: f64,
        ring_radius: f64,
        particles: Vec<Particle>,
    },
    Wormhole {
        entry: DVec2,
        exit: DVec2,
        teleported: bool,
        streaks: Vec<Particle>,
    },
    Death {
        respawn_point: DVec2,
        override_end: Option<f64>,
        faded: bool,
    },
}

/// The single in-flight effect.
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub start: f64,
    pub duration: f64,
    pub phase_index: usize,
    pub progress: f64,
    pub payload: EffectPayload,
    /// Whether any update has processed this effect yet (stall guard).
    ticked: bool,
    last_now: f64,
}

impl ActiveEffect {
    /// Display name of the current phase.
    pub fn phase_name(&self) -> &'static str {
        match self.kind {
            EffectKind::Explosion => {
                ["flash", "shockwave", "debris", "fade"][self.phase_index.min(3)]
            }
            EffectKind::Wormhole => {
                ["pull", "tunnel", "collapse", "emerge"][self.phase_index.min(3)]
            }
            EffectKind::Death => ["dying", "blackout", "respawn"][self.phase_index.min(2)],
        }
    }
}

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("non-finite state entering {0} phase")]
    CorruptState(&'static str),
}

/// Mutable collaborator state an effect may touch.
pub struct EffectCtx<'a> {
    pub player: &'a mut Player,
    pub shake: &'a mut ScreenShake,
    pub messages: &'a mut GameMessages,
    pub god_mode: bool,
}

/// The encounter effect engine. Owns the (at most one) active effect.
pub struct EffectEngine {
    active: Option<ActiveEffect>,
    tuning: EffectTuning,
    wormhole_jump: f64,
    rng: StdRng,
}

impl EffectEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            active: None,
            tuning: config.effects.clone(),
            wormhole_jump: config.wormhole_jump,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded construction for deterministic tests.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(config)
        }
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveEffect> {
        self.active.as_mut()
    }

    /// Start an effect at `pos`. A no-op (returning false) while another
    /// effect is active, unless the new kind is chainable.
    pub fn trigger(&mut self, spec: Trigger, pos: DVec2, now: f64, ctx: &mut EffectCtx) -> bool {
        let kind = spec.kind();
        if let Some(active) = &self.active {
            // Chaining is detonation-onto-detonation only; nothing may
            // displace an unrelated running effect.
            if !(kind.chainable() && active.kind == kind) {
                log::debug!(
                    "effect {} already active, ignoring {} trigger",
                    active.kind.name(),
                    kind.name()
                );
                return false;
            }
        }

        // Phase-0 entry side effects run immediately.
        let (duration, payload) = match spec {
            Trigger::Explosion {
                damage,
                blast_radius,
            } => {
                if !ctx.god_mode {
                    let dist = ctx.player.position().distance(pos);
                    let falloff = (1.0 - dist / blast_radius).clamp(0.0, 1.0) as f32;
                    ctx.player.health.take_damage(damage * falloff);
                }
                ctx.shake.add_trauma(0.6);
                ctx.messages.warning("Proximity mine detonation!");
                (
                    self.tuning.explosion_duration,
                    EffectPayload::Explosion {
                        origin: pos,
                        blast_radius,
                        ring_radius: 0.0,
                        particles: burst(&mut self.rng, pos, 24, 120.0, 420.0),
                    },
                )
            }
            Trigger::Wormhole => {
                ctx.player.freeze();
                let angle = self.rng.gen::<f64>() * std::f64::consts::TAU;
                let exit = pos + DVec2::new(angle.cos(), angle.sin()) * self.wormhole_jump;
                ctx.messages.warning("Event horizon crossed!");
                (
                    self.tuning.wormhole_duration,
                    EffectPayload::Wormhole {
                        entry: pos,
                        exit,
                        teleported: false,
                        streaks: burst(&mut self.rng, pos, 40, 60.0, 240.0),
                    },
                )
            }
            Trigger::Death => {
                ctx.player.freeze();
                ctx.shake.add_trauma(1.0);
                ctx.messages.warning("Hull integrity lost!");
                (
                    self.tuning.death_duration,
                    EffectPayload::Death {
                        respawn_point: DVec2::ZERO,
                        override_end: None,
                        faded: false,
                    },
                )
            }
        };

        log::info!("effect {} triggered at {:.0?}", kind.name(), pos);
        self.active = Some(ActiveEffect {
            kind,
            start: now,
            duration,
            phase_index: 0,
            progress: 0.0,
            payload,
            ticked: false,
            last_now: now,
        });
        true
    }

    /// Extend the running death effect past its nominal duration (e.g. to
    /// let salvage finish landing before the respawn). No-op otherwise.
    pub fn extend_death(&mut self, until: f64) {
        if let Some(effect) = self.active.as_mut() {
            if let EffectPayload::Death { override_end, .. } = &mut effect.payload {
                *override_end = Some(override_end.map_or(until, |t| t.max(until)));
            }
        }
    }

    /// Advance the active effect to `now`. This is the only place effect
    /// state changes after trigger.
    pub fn update(&mut self, now: f64, ctx: &mut EffectCtx) {
        let Some(effect) = self.active.as_mut() else {
            return;
        };

        // Stall guard: if real time ran on while no tick processed this
        // effect (suspended rendering), re-anchor so the sequence plays in
        // full instead of being skipped.
        if !effect.ticked && now - effect.start > effect.duration * 0.5 {
            log::debug!(
                "effect {} stalled before first tick, re-anchoring start",
                effect.kind.name()
            );
            effect.start = now;
        }
        effect.ticked = true;

        let raw_progress = (now - effect.start) / effect.duration;
        if !raw_progress.is_finite() {
            log::error!(
                "effect {} progress is not finite, force-clearing",
                effect.kind.name()
            );
            self.clear(ctx);
            return;
        }
        let progress = raw_progress.clamp(0.0, 1.0);
        let dt = (now - effect.last_now).max(0.0);
        effect.last_now = now;
        effect.progress = progress;

        let bounds: &[f64] = match effect.kind {
            EffectKind::Explosion => &self.tuning.explosion_phases,
            EffectKind::Wormhole => &self.tuning.wormhole_phases,
            EffectKind::Death => &self.tuning.death_phases,
        };
        let target_phase = phase_for(bounds, progress);

        // Run entry side effects for every phase crossed this tick, in
        // order. Any failure clears the whole effect.
        let mut failed = false;
        while effect.phase_index < target_phase {
            effect.phase_index += 1;
            if let Err(e) = enter_phase(effect, ctx, &mut self.rng) {
                log::error!(
                    "phase entry failed for {} ({}), clearing effect",
                    effect.kind.name(),
                    e
                );
                failed = true;
                break;
            }
        }

        advance_transients(effect, dt);

        let done = match &effect.payload {
            EffectPayload::Death {
                override_end: Some(t),
                ..
            } => progress >= 1.0 && now >= *t,
            _ => progress >= 1.0,
        };
        if failed || done {
            self.clear(ctx);
        }
    }

    /// Drop the active effect and return collaborator state to neutral:
    /// input/velocity locks released, camera shake reset.
    fn clear(&mut self, ctx: &mut EffectCtx) {
        if let Some(effect) = self.active.take() {
            log::info!(
                "effect {} cleared in phase {}",
                effect.kind.name(),
                effect.phase_name()
            );
        }
        ctx.player.unlock();
        ctx.shake.reset();
    }
}

/// Index of the phase containing `progress` in an ascending boundary table
/// whose first entry is 0.
fn phase_for(bounds: &[f64], progress: f64) -> usize {
    bounds
        .iter()
        .rposition(|&b| progress >= b)
        .unwrap_or(0)
}

/// Phase-entry side effects. Each runs exactly once, when progress first
/// crosses into the phase.
fn enter_phase(
    effect: &mut ActiveEffect,
    ctx: &mut EffectCtx,
    rng: &mut StdRng,
) -> Result<(), EffectError> {
    match (&mut effect.payload, effect.phase_index) {
        // ── Explosion ───────────────────────────────────────────────────
        (
            EffectPayload::Explosion {
                origin,
                ring_radius,
                blast_radius,
                particles,
            },
            1,
        ) => {
            *ring_radius = *blast_radius * 0.2;
            particles.extend(burst(rng, *origin, 32, 220.0, 520.0));
            ctx.shake.add_trauma(0.3);
        }
        (EffectPayload::Explosion { origin, particles, .. }, 2) => {
            particles.extend(burst(rng, *origin, 16, 40.0, 140.0));
        }
        (EffectPayload::Explosion { .. }, _) => {}

        // ── Wormhole ────────────────────────────────────────────────────
        (EffectPayload::Wormhole { entry, streaks, .. }, 1) => {
            streaks.extend(burst(rng, *entry, 24, 300.0, 900.0));
            ctx.messages.info("Spacetime tunnel stabilizing...");
        }
        (EffectPayload::Wormhole { .. }, 2) => {
            ctx.shake.add_trauma(0.5);
        }
        (
            EffectPayload::Wormhole {
                exit, teleported, ..
            },
            3,
        ) => {
            if !exit.x.is_finite() || !exit.y.is_finite() {
                return Err(EffectError::CorruptState("emerge"));
            }
            ctx.player.transform.position = *exit;
            *teleported = true;
            ctx.messages.success("Emerged in uncharted space.");
        }
        (EffectPayload::Wormhole { .. }, _) => {}

        // ── Death ───────────────────────────────────────────────────────
        (EffectPayload::Death { faded, .. }, 1) => {
            *faded = true;
        }
        (EffectPayload::Death { respawn_point, .. }, 2) => {
            if !respawn_point.x.is_finite() || !respawn_point.y.is_finite() {
                return Err(EffectError::CorruptState("respawn"));
            }
            ctx.player.respawn(*respawn_point);
            ctx.messages.info("Ship reconstructed at the origin station.");
        }
        (EffectPayload::Death { .. }, _) => {}
    }
    Ok(())
}

/// Continuous per-tick physics for the effect's transient state.
fn advance_transients(effect: &mut ActiveEffect, dt: f64) {
    match &mut effect.payload {
        EffectPayload::Explosion {
            particles,
            ring_radius,
            blast_radius,
            ..
        } => {
            *ring_radius += (*blast_radius - *ring_radius) * (2.0 * dt).min(1.0);
            step_particles(particles, dt);
        }
        EffectPayload::Wormhole { streaks, .. } => step_particles(streaks, dt),
        EffectPayload::Death { .. } => {}
    }
}

fn step_particles(particles: &mut Vec<Particle>, dt: f64) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.life -= dt as f32;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Radial particle burst.
fn burst(rng: &mut StdRng, origin: DVec2, count: usize, speed_min: f64, speed_max: f64) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.gen::<f64>() * std::f64::consts::TAU;
            let speed = rng.gen_range(speed_min..speed_max);
            Particle {
                pos: origin,
                vel: DVec2::new(angle.cos(), angle.sin()) * speed,
                life: rng.gen_range(0.4..1.6),
                size: rng.gen_range(1.5..5.0),
            }
        })
        .collect()
}
