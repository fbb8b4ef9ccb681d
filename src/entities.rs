/// All game entity types — pure data, no logic.

// ── Cosmetic monster kinds ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterKind {
    Ogre,
    Goblin,
    Troll,
    Dragon,
    Invader,
    Bat,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 6] = [
        MonsterKind::Ogre,
        MonsterKind::Goblin,
        MonsterKind::Troll,
        MonsterKind::Dragon,
        MonsterKind::Invader,
        MonsterKind::Bat,
    ];
}

// ── Round phase & terminal status ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Combat phase: enemies chase and respawn, firing is allowed.
    Active,
    /// Countdown between rounds: everything despawned, firing disabled.
    Intermission,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Upgrades & drops ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropKind {
    /// damageLevel +1.
    Damage,
    /// resistanceLevel +1.
    Resistance,
    /// maxHealth +20 and heal 20, capped at the new max.
    Health,
    /// Sets the points multiplier to 2 (flat set, not incremental).
    PointsMultiplier,
}

/// Upgrades purchasable with points (drops grant the same effects for free).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    Damage,
    Health,
    Resistance,
}

#[derive(Clone, Debug)]
pub struct Drop {
    pub id: u64,
    /// Death position of the enemy that dropped it.
    pub x: f32,
    pub y: f32,
    pub kind: DropKind,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Shot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Direction in radians, fixed at fire time — shots do not home.
    pub angle: f32,
    /// Simulated-clock timestamp of the fire action.
    pub fired_at_ms: u64,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Continuous health; enemy contact drains fractional amounts per tick.
    pub health: f32,
    pub max_health: f32,
    /// Multiplies damage dealt per projectile hit. Starts at 1.
    pub damage_level: u32,
    /// Divides damage taken from enemy contact. Starts at 1.
    pub resistance_level: u32,
    /// 1 or 2; applied to every points award.
    pub points_multiplier: u32,
    pub points: u32,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Stable id 1..=8, permanently bound to spawn point `id - 1`.
    pub id: u8,
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    /// Simulated-clock timestamp of death; `None` while alive.
    /// A dead enemy's position stays frozen until respawn.
    pub death_time_ms: Option<u64>,
    /// Remaining hit points. Never persisted below zero — reaching zero
    /// transitions to dead in the same step.
    pub lives: u32,
    pub kind: MonsterKind,
}

// ── Spawn points ──────────────────────────────────────────────────────────────

/// One of 8 fixed world coordinates (2 per playfield edge) where enemies
/// originate and respawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

// ── Input flags ───────────────────────────────────────────────────────────────

/// Currently-held direction flags, set by press/release events and read once
/// per display refresh by the movement step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Held {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

// ── Master world state ────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Player,
    /// The 8 fixed enemy slots; index i holds id i+1.
    pub enemies: Vec<Enemy>,
    pub shots: Vec<Shot>,
    pub drops: Vec<Drop>,
    pub round: u32,
    /// Seconds remaining in the current phase.
    pub time_left: u32,
    pub phase: Phase,
    /// While false the whole enemy pass (movement and respawn) is skipped.
    pub spawning_enabled: bool,
    /// Process-wide difficulty scalars, ×1.1 each round.
    pub enemy_speed: f32,
    pub enemy_damage: f32,
    pub status: GameStatus,
    /// True on any tick in which at least one enemy overlapped the player.
    /// Cosmetic — read by the presentation layer for the damage flash.
    pub taking_damage: bool,
    /// Simulated clock, advanced 16 ms per simulation tick.
    pub now_ms: u64,
    /// Logical playfield dimensions, fixed at init.
    pub width: f32,
    pub height: f32,
    pub next_shot_id: u64,
    pub next_drop_id: u64,
}

impl World {
    pub fn has_alive_enemies(&self) -> bool {
        self.enemies.iter().any(|e| e.alive)
    }
}
