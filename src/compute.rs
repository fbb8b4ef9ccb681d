/// Pure game-logic functions for the shooter.
///
/// Every public function takes an immutable reference to the current
/// `World` (and, where needed, an RNG handle) and returns a brand-new
/// `World`.  Side effects are limited to the injected RNG.  Time comes
/// from the world's own simulated clock, never from the wall clock, so
/// tests can step it exactly.

use rand::Rng;

use crate::entities::{
    Drop, DropKind, Enemy, GameStatus, Held, MonsterKind, Phase, Player, Shot, SpawnPoint,
    UpgradeKind, World,
};

// ── Tuning constants ─────────────────────────────────────────────────────────

/// Simulation tick length; shots, enemies and collision passes run at this
/// cadence.  The round timer runs at 1000 ms.
pub const TICK_MS: u64 = 16;

/// Player displacement per movement step (one step per display refresh).
pub const PLAYER_SPEED: f32 = 5.0;
/// Shot displacement per simulation tick.
pub const SHOT_SPEED: f32 = 5.0;

/// Shots spawn at the weapon tip, this far right of the player origin.
pub const WEAPON_OFFSET_X: f32 = 25.0;

/// Shot↔enemy collision radius.
pub const HIT_RADIUS: f32 = 20.0;
/// Enemy↔player and drop-pickup collision radius.
pub const PLAYER_RADIUS: f32 = 25.0;

/// Shots are culled once they leave the playfield extended by this margin.
pub const BOUNDS_BUFFER: f32 = 400.0;

/// Interior margins the player is clamped to — never flush to an edge.
pub const PLAYER_MARGIN: f32 = 15.0;
pub const PLAYER_RIGHT_INSET: f32 = 50.0;
pub const PLAYER_BOTTOM_INSET: f32 = 100.0;

/// Dead enemies respawn this long after death, while spawning is enabled.
pub const RESPAWN_DELAY_MS: u64 = 5000;

pub const ROUND_SECONDS: u32 = 25;
pub const INTERMISSION_SECONDS: u32 = 10;
/// Enemy speed and damage scalars grow by this factor each round.
pub const DIFFICULTY_STEP: f32 = 1.1;

/// Upgrade prices in points.
pub const COST_DAMAGE: u32 = 100;
pub const COST_HEALTH: u32 = 30;
pub const COST_RESISTANCE: u32 = 200;

/// Health granted (and max-health added) by a health upgrade or drop.
pub const HEALTH_STEP: f32 = 20.0;

// ── Spawn points ─────────────────────────────────────────────────────────────

/// The 8 fixed spawn coordinates: two per playfield edge, at the quarter
/// points.  Enemy id i+1 is permanently bound to index i.
pub fn spawn_points(width: f32, height: f32) -> [SpawnPoint; 8] {
    [
        SpawnPoint { x: width * 0.25, y: 0.0 },
        SpawnPoint { x: width * 0.75, y: 0.0 },
        SpawnPoint { x: width * 0.25, y: height },
        SpawnPoint { x: width * 0.75, y: height },
        SpawnPoint { x: 0.0, y: height * 0.25 },
        SpawnPoint { x: 0.0, y: height * 0.75 },
        SpawnPoint { x: width, y: height * 0.25 },
        SpawnPoint { x: width, y: height * 0.75 },
    ]
}

fn random_kind(rng: &mut impl Rng) -> MonsterKind {
    MonsterKind::ALL[rng.gen_range(0..MonsterKind::ALL.len())]
}

/// All 8 enemies alive at their spawn points with the given hit count.
fn fresh_enemies(width: f32, height: f32, lives: u32, rng: &mut impl Rng) -> Vec<Enemy> {
    spawn_points(width, height)
        .iter()
        .enumerate()
        .map(|(i, p)| Enemy {
            id: i as u8 + 1,
            x: p.x,
            y: p.y,
            alive: true,
            death_time_ms: None,
            lives,
            kind: random_kind(rng),
        })
        .collect()
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial world for a playfield of the given logical dimensions.
pub fn init_world(width: f32, height: f32, rng: &mut impl Rng) -> World {
    World {
        player: Player {
            x: width / 2.0,
            y: height / 2.0,
            health: 100.0,
            max_health: 100.0,
            damage_level: 1,
            resistance_level: 1,
            points_multiplier: 1,
            points: 0,
        },
        enemies: fresh_enemies(width, height, 1, rng),
        shots: Vec::new(),
        drops: Vec::new(),
        round: 1,
        time_left: ROUND_SECONDS,
        phase: Phase::Active,
        spawning_enabled: true,
        enemy_speed: 1.0,
        enemy_damage: 1.0,
        status: GameStatus::Playing,
        taking_damage: false,
        now_ms: 0,
        width,
        height,
        next_shot_id: 1,
        next_drop_id: 1,
    }
}

/// Full reset back to initial values.  Keeps the playfield dimensions,
/// re-rolls cosmetic kinds, clears game-over.  Explicit user action — not
/// part of the round scheduler.
pub fn restart(world: &World, rng: &mut impl Rng) -> World {
    init_world(world.width, world.height, rng)
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Advance the player by one movement step for the currently-held direction
/// flags, clamped to the interior margins.  Runs once per display refresh.
/// Diagonal movement is faster by design — no normalization.
pub fn step_movement(world: &World, held: &Held) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }

    let mut x = world.player.x;
    let mut y = world.player.y;

    if held.left {
        x = (x - PLAYER_SPEED).max(PLAYER_MARGIN);
    } else if held.right {
        x = (x + PLAYER_SPEED).min(world.width - PLAYER_RIGHT_INSET);
    }
    if held.up {
        y = (y - PLAYER_SPEED).max(PLAYER_MARGIN);
    } else if held.down {
        y = (y + PLAYER_SPEED).min(world.height - PLAYER_BOTTOM_INSET);
    }

    World {
        player: Player { x, y, ..world.player.clone() },
        ..world.clone()
    }
}

/// Straight-line angle from (x, y) to the nearest alive enemy, or `None`
/// when every enemy is dead.  Exact distance ties break toward the first
/// enemy in roster order.
fn aim_angle(world: &World, x: f32, y: f32) -> Option<f32> {
    world
        .enemies
        .iter()
        .filter(|e| e.alive)
        .min_by(|a, b| {
            let da = (a.x - x).hypot(a.y - y);
            let db = (b.x - x).hypot(b.y - y);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| (e.y - y).atan2(e.x - x))
}

/// Fire a shot at the nearest alive enemy.  Silent no-op when no enemy is
/// alive, during intermission, or after game-over.  The angle is captured
/// once at fire time; shots never home.
pub fn fire(world: &World) -> World {
    if world.status == GameStatus::GameOver
        || world.phase == Phase::Intermission
        || !world.has_alive_enemies()
    {
        return world.clone();
    }
    let tip_x = world.player.x + WEAPON_OFFSET_X;
    let tip_y = world.player.y;
    let angle = match aim_angle(world, tip_x, tip_y) {
        Some(a) => a,
        None => return world.clone(),
    };

    let mut shots = world.shots.clone();
    shots.push(Shot {
        id: world.next_shot_id,
        x: tip_x,
        y: tip_y,
        angle,
        fired_at_ms: world.now_ms,
    });
    World {
        shots,
        next_shot_id: world.next_shot_id + 1,
        ..world.clone()
    }
}

/// Purchase an upgrade with points.  Below the price it is a silent no-op.
pub fn purchase_upgrade(world: &World, kind: UpgradeKind) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }
    let mut player = world.player.clone();
    match kind {
        UpgradeKind::Damage => {
            if player.points < COST_DAMAGE {
                return world.clone();
            }
            player.points -= COST_DAMAGE;
            player.damage_level += 1;
        }
        UpgradeKind::Health => {
            if player.points < COST_HEALTH {
                return world.clone();
            }
            player.points -= COST_HEALTH;
            player.max_health += HEALTH_STEP;
            player.health = (player.health + HEALTH_STEP).min(player.max_health);
        }
        UpgradeKind::Resistance => {
            if player.points < COST_RESISTANCE {
                return world.clone();
            }
            player.points -= COST_RESISTANCE;
            player.resistance_level += 1;
        }
    }
    World { player, ..world.clone() }
}

// ── Loot & points ────────────────────────────────────────────────────────────

/// Points for a kill at the given round: uniform in [round, round + 4].
fn points_for_kill(round: u32, rng: &mut impl Rng) -> u32 {
    rng.gen_range(round..=round + 4)
}

/// 5% outer chance of a drop; the inner roll picks the kind with the
/// cumulative thresholds 0.15 / 0.30 / 0.45, everything above falling
/// through to the points multiplier.  The lopsided default branch is
/// intentional and kept as-is.
fn roll_drop(rng: &mut impl Rng) -> Option<DropKind> {
    if rng.gen::<f64>() >= 0.05 {
        return None;
    }
    let t = rng.gen::<f64>();
    Some(if t < 0.15 {
        DropKind::Damage
    } else if t < 0.30 {
        DropKind::Resistance
    } else if t < 0.45 {
        DropKind::Health
    } else {
        DropKind::PointsMultiplier
    })
}

// ── Fixed-cadence tick passes ────────────────────────────────────────────────

/// Advance every shot along its fixed angle, cull shots beyond the buffered
/// bounds, and resolve shot↔enemy collisions.  A shot hits at most one
/// enemy and is consumed by the hit — it cannot pass through to a second
/// enemy in the same tick.
pub fn tick_shots(world: &World, rng: &mut impl Rng) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }

    let mut enemies = world.enemies.clone();
    let mut player = world.player.clone();
    let mut drops = world.drops.clone();
    let mut next_drop_id = world.next_drop_id;
    let mut shots: Vec<Shot> = Vec::new();

    for shot in &world.shots {
        let nx = shot.x + SHOT_SPEED * shot.angle.cos();
        let ny = shot.y + SHOT_SPEED * shot.angle.sin();

        // Out past the buffered playfield → silently culled
        if nx < -BOUNDS_BUFFER
            || nx > world.width + BOUNDS_BUFFER
            || ny < -BOUNDS_BUFFER
            || ny > world.height + BOUNDS_BUFFER
        {
            continue;
        }

        // First alive enemy within the hit radius takes the whole hit
        let hit = enemies
            .iter_mut()
            .find(|e| e.alive && (nx - e.x).hypot(ny - e.y) < HIT_RADIUS);

        if let Some(enemy) = hit {
            if player.damage_level >= enemy.lives {
                // Lives never persist below zero: dying in the same step
                enemy.lives = 0;
                enemy.alive = false;
                enemy.death_time_ms = Some(world.now_ms);
                player.points +=
                    points_for_kill(world.round, rng) * player.points_multiplier;
                if let Some(kind) = roll_drop(rng) {
                    drops.push(Drop {
                        id: next_drop_id,
                        x: enemy.x,
                        y: enemy.y,
                        kind,
                    });
                    next_drop_id += 1;
                }
            } else {
                enemy.lives -= player.damage_level;
            }
            continue; // shot consumed
        }

        shots.push(Shot { x: nx, y: ny, ..shot.clone() });
    }

    World {
        player,
        enemies,
        shots,
        drops,
        next_drop_id,
        ..world.clone()
    }
}

/// Steer every alive enemy straight at the player and respawn the dead ones
/// once their delay has elapsed.  The whole pass is skipped while spawning
/// is disabled (intermission).
pub fn tick_enemies(world: &World, rng: &mut impl Rng) -> World {
    if world.status == GameStatus::GameOver || !world.spawning_enabled {
        return world.clone();
    }

    let points = spawn_points(world.width, world.height);
    let enemies: Vec<Enemy> = world
        .enemies
        .iter()
        .map(|e| {
            if !e.alive {
                // Position stays frozen until the respawn fires
                match e.death_time_ms {
                    Some(died) if world.now_ms.saturating_sub(died) >= RESPAWN_DELAY_MS => {
                        let p = points[(e.id - 1) as usize];
                        Enemy {
                            x: p.x,
                            y: p.y,
                            alive: true,
                            death_time_ms: None,
                            lives: world.round + 1,
                            kind: random_kind(rng),
                            ..e.clone()
                        }
                    }
                    _ => e.clone(),
                }
            } else {
                // Straight pursuit — no pathfinding, no avoidance
                let angle = (world.player.y - e.y).atan2(world.player.x - e.x);
                Enemy {
                    x: e.x + world.enemy_speed * angle.cos(),
                    y: e.y + world.enemy_speed * angle.sin(),
                    ..e.clone()
                }
            }
        })
        .collect();

    World { enemies, ..world.clone() }
}

/// Apply contact damage from every alive enemy overlapping the player.
/// Overlapping enemies each damage independently in the same tick.  Health
/// reaching zero is terminal: the game-over flag freezes every later pass.
pub fn tick_player_damage(world: &World) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }

    let overlapping = world
        .enemies
        .iter()
        .filter(|e| {
            e.alive && (world.player.x - e.x).hypot(world.player.y - e.y) < PLAYER_RADIUS
        })
        .count();

    let damage =
        overlapping as f32 * world.enemy_damage / world.player.resistance_level as f32;
    let health = world.player.health - damage;

    let status = if health <= 0.0 {
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    World {
        player: Player { health, ..world.player.clone() },
        status,
        taking_damage: overlapping > 0,
        ..world.clone()
    }
}

fn apply_drop(player: &Player, kind: DropKind) -> Player {
    let mut p = player.clone();
    match kind {
        DropKind::Damage => p.damage_level += 1,
        DropKind::Resistance => p.resistance_level += 1,
        DropKind::Health => {
            p.max_health += HEALTH_STEP;
            p.health = (p.health + HEALTH_STEP).min(p.max_health);
        }
        // Flat set, not incremental
        DropKind::PointsMultiplier => p.points_multiplier = 2,
    }
    p
}

/// Pick up every drop within reach, applying its effect exactly once.
pub fn tick_drops(world: &World) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }

    let mut player = world.player.clone();
    let drops: Vec<Drop> = world
        .drops
        .iter()
        .filter(|d| {
            if (player.x - d.x).hypot(player.y - d.y) < PLAYER_RADIUS {
                player = apply_drop(&player, d.kind);
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();

    World { player, drops, ..world.clone() }
}

/// One full 16 ms simulation tick: advance the clock, then run the shot,
/// enemy, contact-damage and drop passes.  Their relative order within a
/// tick is an implementation choice — each pass reads the state the
/// previous one produced, so no pass ever sees a torn write.
pub fn tick(world: &World, rng: &mut impl Rng) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }
    let world = World { now_ms: world.now_ms + TICK_MS, ..world.clone() };
    let world = tick_shots(&world, rng);
    let world = tick_enemies(&world, rng);
    let world = tick_player_damage(&world);
    tick_drops(&world)
}

// ── Round scheduler (1 Hz) ───────────────────────────────────────────────────

/// One second of round-timer progress.  Counts the phase down while time
/// remains; on observing zero it flips the phase:
/// ACTIVE → mass-despawn, disable spawning, 10 s intermission;
/// INTERMISSION → next round, scalars ×1.1, all 8 enemies re-initialized
/// with lives = new round + 1, spawning re-enabled, 25 s active.
/// Frozen entirely after game-over.
pub fn tick_round_timer(world: &World, rng: &mut impl Rng) -> World {
    if world.status == GameStatus::GameOver {
        return world.clone();
    }

    if world.time_left > 0 {
        return World { time_left: world.time_left - 1, ..world.clone() };
    }

    match world.phase {
        Phase::Active => {
            // Round over: everything dies regardless of remaining lives
            let enemies: Vec<Enemy> = world
                .enemies
                .iter()
                .map(|e| Enemy { alive: false, ..e.clone() })
                .collect();
            World {
                enemies,
                phase: Phase::Intermission,
                time_left: INTERMISSION_SECONDS,
                spawning_enabled: false,
                ..world.clone()
            }
        }
        Phase::Intermission => {
            let round = world.round + 1;
            World {
                round,
                enemies: fresh_enemies(world.width, world.height, round + 1, rng),
                phase: Phase::Active,
                time_left: ROUND_SECONDS,
                spawning_enabled: true,
                enemy_speed: world.enemy_speed * DIFFICULTY_STEP,
                enemy_damage: world.enemy_damage * DIFFICULTY_STEP,
                ..world.clone()
            }
        }
    }
}
