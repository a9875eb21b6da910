//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 35;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Speed units per world unit per tick.
pub const VELOCITY_PRECISION: f64 = 10.0;

/// Downward acceleration applied to free objects (speed units per tick).
pub const GRAVITY: f64 = 2.0;

// --- Grenade defaults (per-variant tunables) ---

/// Ticks from arming until detonation (3 seconds at 35Hz).
pub const DEFAULT_FUSE_TIME: u32 = 105;

/// Multiplier applied to the agent's throw-speed scalar for aimed throws.
pub const DEFAULT_THROW_SPEED_MULTIPLIER: i64 = 20;

/// Ticks an agent has to wait between two launches.
pub const DEFAULT_THROW_DELAY: u32 = 20;

/// Accumulated damage that arms an idle grenade.
pub const DEFAULT_MAX_DAMAGE: u32 = 10;

/// Damage dealt to the container when detonating inside it.
pub const DEFAULT_CONTAINED_DAMAGE: i32 = 60;

/// Trail smoke color (opaque gray) when a variant does not set one.
pub const DEFAULT_SMOKE_COLOR: u32 = 0xff64_6464;

/// Contact-point friction of a grenade at rest (per vertex).
pub const DEFAULT_VERTEX_FRICTION: [i32; 4] = [40, 40, 40, 40];

// --- Agent defaults ---

/// Throw-speed scalar of a standard agent (per-mille world units per tick).
pub const AGENT_THROW_SPEED: i64 = 294;

/// Starting energy of a standard agent.
pub const AGENT_ENERGY: i32 = 100;

// --- Aiming ---

/// Largest aim angle either side of straight up (degrees).
pub const AIM_ANGLE_LIMIT: f64 = 160.0;

// --- Aimed throw ---

/// Share (percent) of holder speed added to the throw speed.
pub const AIMED_SPEED_SHARE_PERCENT: i64 = 60;

/// Share (percent) of holder velocity carried over into the release vector.
pub const AIMED_CARRY_PERCENT: i64 = 40;

/// Vertical release offset from the holder for aimed throws.
pub const AIMED_RELEASE_OFFSET_Y: f64 = -6.0;

// --- Lob ---

/// Fixed lob speed along the aim angle (speed units).
pub const LOB_SPEED: f64 = 30.0;

/// Share (percent) of holder velocity added to a lob.
pub const LOB_CARRY_PERCENT: i64 = 60;

/// Vertical release offset from the holder for lobs.
pub const LOB_RELEASE_OFFSET_Y: f64 = 2.0;

/// Spin magnitude given to a lobbed grenade.
pub const LOB_SPIN: i32 = 10;

/// Random spin range given on every launch.
pub const LAUNCH_SPIN_RANGE: i32 = 6;

// --- Throw animation ---

/// Length of the lob wind-up (ticks).
pub const THROW_ANIMATION_TICKS: u32 = 16;

/// Release instant as a fraction of the wind-up: numerator.
pub const THROW_RELEASE_NUMERATOR: u32 = 8;

/// Release instant as a fraction of the wind-up: denominator.
pub const THROW_RELEASE_DENOMINATOR: u32 = 15;

// --- Rolling friction ---

/// Ticks of reduced friction after a lob.
pub const ROLLING_FRICTION_TICKS: u32 = 70;

/// Divisor applied to every contact-point friction while rolling.
pub const ROLLING_FRICTION_DIVISOR: i32 = 4;

/// Horizontal speed lost per tick per point of mean contact friction.
pub const GROUND_FRICTION_SCALE: f64 = 0.05;

// --- Contact ---

/// Probe distance for contact side detection (world units).
pub const CONTACT_PROBE: f64 = 5.0;

/// Divisor for the reflected vertical speed on floor/ceiling contact.
pub const BOUNCE_DIVISOR_VERTICAL: f64 = 26.0;

/// Divisor for the reflected horizontal speed on wall contact.
pub const BOUNCE_DIVISOR_HORIZONTAL: f64 = 16.0;

/// Largest downward speed, before gravity, at which a grenade lying on the
/// ground settles instead of bouncing (speed units).
pub const RESTING_IMPACT_SPEED: f64 = 2.0 * GRAVITY;

// --- Detonation ---

/// Upward speed added to the container by the outward impulse (speed units,
/// one world unit per tick).
pub const CONTAINED_FLING_LIFT: f64 = 10.0;

// --- Process priorities ---

/// Fuse countdown runs ahead of every other process.
pub const FUSE_PRIORITY: i32 = 200;

/// Priority of animation and physics helper processes.
pub const HELPER_PRIORITY: i32 = 1;

// --- Warning ramp ---

/// Fixed-point scale of the fuse progress value.
pub const FUSE_PROGRESS_SCALE: u32 = 1000;

/// Warning color at progress 0.
pub const WARNING_COLOR_START: u32 = 0xff00_ff00;

/// Warning color at half progress.
pub const WARNING_COLOR_MID: u32 = 0xffff_ff00;

/// Warning color at full progress.
pub const WARNING_COLOR_END: u32 = 0xffff_0000;

// --- Trail ---

/// Base alpha of a trail puff.
pub const TRAIL_ALPHA_BASE: u32 = 105;

/// Maximum alpha of a trail puff.
pub const TRAIL_ALPHA_MAX: u32 = 205;
