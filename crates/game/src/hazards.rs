//! Hazard entities and their live behavior: proximity mines, automated
//! turrets, and black holes.
//!
//! This pass advances per-kind live state every tick and performs the
//! contact checks that hand control to the effect engine. Per-entity
//! failures degrade to skipping that entity; the pass itself never aborts
//! the frame.

use engine_core::{Lifetime, Transform2, Velocity2};
use glam::DVec2;
use hecs::{Entity, World};

use crate::config::GameConfig;
use crate::effects::{EffectCtx, EffectEngine, Trigger};
use crate::sectors::Deposit;

/// Proximity mine. Arms shortly after spawn, detonates on player contact.
#[derive(Debug, Clone, Copy)]
pub struct Mine {
    pub trigger_radius: f64,
    pub blast_radius: f64,
    pub damage: f32,
    /// Blink phase for the warning light.
    pub pulse: f32,
    /// Seconds until armed. Prevents detonation inside freshly streamed
    /// sectors before the player can react.
    pub arm_timer: f32,
}

impl Mine {
    pub const ARM_DELAY: f32 = 1.5;

    pub fn armed(&self) -> bool {
        self.arm_timer <= 0.0
    }
}

/// Automated turret: tracks the player inside `range`, fires on cooldown.
#[derive(Debug, Clone, Copy)]
pub struct Turret {
    pub range: f64,
    pub fire_interval: f32,
    pub cooldown: f32,
    /// Current barrel angle in radians.
    pub aim: f32,
    pub bolt_damage: f32,
}

/// Black hole: pulls the ship inside `influence_radius`; crossing the
/// event horizon starts a wormhole traversal.
#[derive(Debug, Clone, Copy)]
pub struct BlackHole {
    pub horizon_radius: f64,
    pub influence_radius: f64,
    /// Accretion swirl phase.
    pub swirl: f32,
}

/// Transient turret projectile.
#[derive(Debug, Clone, Copy)]
pub struct TurretBolt {
    pub damage: f32,
}

const TURRET_TURN_RATE: f64 = 2.5;
const TURRET_AIM_TOLERANCE: f64 = 0.2;
const BOLT_SPEED: f64 = 700.0;
const BOLT_LIFETIME: f32 = 3.0;
const BOLT_HIT_RADIUS: f64 = 26.0;
/// Extra hold on the death effect when dying inside a hotspot, so salvage
/// finishes landing before the respawn cut.
const SALVAGE_HOLD: f64 = 2.0;

/// Wrap an angle difference into [-pi, pi].
fn wrap_angle(a: f64) -> f64 {
    (a + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI
}

/// One tick of hazard simulation.
pub fn update(
    world: &mut World,
    effects: &mut EffectEngine,
    ctx: &mut EffectCtx,
    config: &GameConfig,
    now: f64,
    dt: f64,
) {
    let player_pos = ctx.player.position();

    // ── Mines: arm, blink, proximity check ──────────────────────────────
    let mut tripped: Option<(Entity, DVec2, f32, f64)> = None;
    for (e, (t, mine)) in world.query_mut::<(&Transform2, &mut Mine)>() {
        mine.arm_timer = (mine.arm_timer - dt as f32).max(0.0);
        mine.pulse += dt as f32;
        if tripped.is_none()
            && mine.armed()
            && t.position.distance(player_pos) < mine.trigger_radius
        {
            tripped = Some((e, t.position, mine.damage, mine.blast_radius));
        }
    }
    if let Some((e, pos, damage, blast_radius)) = tripped {
        if effects.trigger(
            Trigger::Explosion {
                damage,
                blast_radius,
            },
            pos,
            now,
            ctx,
        ) {
            let _ = world.despawn(e);
            // Secondary detonations: armed mines caught in the blast chain
            // onto the running explosion.
            let chained: Vec<(Entity, DVec2, f32, f64)> = world
                .query_mut::<(&Transform2, &Mine)>()
                .into_iter()
                .filter(|(_, (t, m))| m.armed() && t.position.distance(pos) < blast_radius)
                .map(|(ce, (t, m))| (ce, t.position, m.damage, m.blast_radius))
                .collect();
            for (ce, cpos, cdamage, cblast) in chained {
                effects.trigger(
                    Trigger::Explosion {
                        damage: cdamage,
                        blast_radius: cblast,
                    },
                    cpos,
                    now,
                    ctx,
                );
                let _ = world.despawn(ce);
            }
        }
    }

    // ── Turrets: track and fire ─────────────────────────────────────────
    let mut bolts: Vec<(DVec2, DVec2, f32)> = Vec::new();
    for (_, (t, turret)) in world.query_mut::<(&mut Transform2, &mut Turret)>() {
        turret.cooldown = (turret.cooldown - dt as f32).max(0.0);
        let to_player = player_pos - t.position;
        let dist = to_player.length();
        if dist >= turret.range || dist < 1.0 {
            continue;
        }
        let desired = to_player.y.atan2(to_player.x);
        let diff = wrap_angle(desired - turret.aim as f64);
        let step = (TURRET_TURN_RATE * dt).min(diff.abs());
        turret.aim = (turret.aim as f64 + diff.signum() * step) as f32;
        t.rotation = turret.aim as f64;

        if turret.cooldown <= 0.0 && wrap_angle(desired - turret.aim as f64).abs() < TURRET_AIM_TOLERANCE
        {
            turret.cooldown = turret.fire_interval;
            let dir = DVec2::new((turret.aim as f64).cos(), (turret.aim as f64).sin());
            bolts.push((t.position + dir * 30.0, dir * BOLT_SPEED, turret.bolt_damage));
        }
    }
    for (pos, vel, damage) in bolts {
        world.spawn((
            Transform2::from_position(pos),
            Velocity2::new(vel),
            Lifetime::new(BOLT_LIFETIME),
            TurretBolt { damage },
        ));
    }

    // ── Bolts: fly, expire, hit ─────────────────────────────────────────
    let mut remove: Vec<Entity> = Vec::new();
    let mut hit_damage = 0.0f32;
    for (e, (t, vel, life, bolt)) in
        world.query_mut::<(&mut Transform2, &Velocity2, &mut Lifetime, &TurretBolt)>()
    {
        t.position += vel.linear * dt;
        if life.update(dt as f32) {
            remove.push(e);
            continue;
        }
        if t.position.distance(player_pos) < BOLT_HIT_RADIUS {
            hit_damage += bolt.damage;
            remove.push(e);
        }
    }
    for e in remove {
        let _ = world.despawn(e);
    }
    if hit_damage > 0.0 && !ctx.god_mode {
        ctx.player.health.take_damage(hit_damage);
        ctx.shake.add_trauma(0.25);
    }

    // ── Black holes: pull, capture ──────────────────────────────────────
    let mut capture: Option<DVec2> = None;
    for (_, (t, hole)) in world.query_mut::<(&Transform2, &mut BlackHole)>() {
        hole.swirl += dt as f32 * 0.8;
        let to_hole = t.position - player_pos;
        let dist = to_hole.length();
        if dist < hole.influence_radius && dist > 1.0 && !ctx.player.velocity_locked {
            let strength =
                config.black_hole_pull * (1.0 - dist / hole.influence_radius).powi(2);
            ctx.player.velocity += to_hole / dist * strength * dt;
        }
        if dist < hole.horizon_radius {
            capture = Some(t.position);
        }
    }
    if let Some(pos) = capture {
        effects.trigger(Trigger::Wormhole, pos, now, ctx);
    }

    // ── Death check ─────────────────────────────────────────────────────
    // Retried every tick: a running effect makes this a no-op until it
    // finishes, then the death sequence takes over.
    if ctx.player.health.is_dead() && effects.trigger(Trigger::Death, player_pos, now, ctx) {
        let in_hotspot = world
            .query_mut::<(&Transform2, &Deposit)>()
            .into_iter()
            .any(|(_, (t, d))| t.position.distance(player_pos) < d.radius);
        if in_hotspot {
            effects.extend_death(now + config.effects.death_duration + SALVAGE_HOLD);
        }
    }
}
