//! Server configuration.

use protocol::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub border: BorderConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub food: FoodConfig,
    #[serde(default)]
    pub virus: VirusConfig,
    #[serde(default)]
    pub eject: EjectConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path`, writing the defaults there if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Time between simulation steps.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.server.tick_rate.max(1))
    }

    /// Milliseconds between snapshot broadcasts.
    pub fn broadcast_interval_ms(&self) -> u64 {
        1000 / self.server.broadcast_rate.max(1)
    }
}

/// Server networking and scheduling settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Connections per IP limit.
    #[serde(default = "default_ip_limit")]
    pub ip_limit: usize,
    /// Simulation steps per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u64,
    /// Snapshot broadcasts per second.
    #[serde(default = "default_broadcast_rate")]
    pub broadcast_rate: u64,
    /// Number of leaderboard rows in each snapshot.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Seed for the world RNG (random when unset).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            max_connections: default_max_connections(),
            ip_limit: default_ip_limit(),
            tick_rate: default_tick_rate(),
            broadcast_rate: default_broadcast_rate(),
            leaderboard_size: default_leaderboard_size(),
            max_name_length: default_max_name_length(),
            seed: None,
        }
    }
}

fn default_port() -> u16 {
    80
}
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_max_connections() -> usize {
    500
}
fn default_ip_limit() -> usize {
    50
}
fn default_tick_rate() -> u64 {
    60
}
fn default_broadcast_rate() -> u64 {
    20
}
fn default_leaderboard_size() -> usize {
    10
}
fn default_max_name_length() -> usize {
    30
}

/// World border configuration. The world is a square centered at the origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BorderConfig {
    #[serde(default = "default_world_size")]
    pub size: f32,
    /// How far past the edge ejected pellets may drift before they are culled.
    #[serde(default = "default_eject_cull_margin")]
    pub eject_cull_margin: f32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            size: default_world_size(),
            eject_cull_margin: default_eject_cull_margin(),
        }
    }
}

fn default_world_size() -> f32 {
    7000.0
}
fn default_eject_cull_margin() -> f32 {
    3500.0
}

/// Player configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_start_mass")]
    pub start_mass: f32,
    #[serde(default = "default_player_split_min_mass")]
    pub split_min_mass: f32,
    #[serde(default = "default_player_max_cells")]
    pub max_cells: usize,
    #[serde(default = "default_player_decay_start")]
    pub decay_start: f32,
    #[serde(default = "default_player_decay_rate")]
    pub decay_rate: f32,
    #[serde(default = "default_player_recombine_delay")]
    pub recombine_delay_ms: u64,
    /// Mass ratio an attacker cell needs over a victim cell.
    #[serde(default = "default_player_eat_ratio")]
    pub eat_ratio: f32,
    #[serde(default = "default_player_split_impulse")]
    pub split_impulse: f32,
    /// Fraction of the split impulse pushed back onto the origin cell.
    #[serde(default = "default_player_split_recoil")]
    pub split_recoil: f32,
    #[serde(default = "default_player_merge_impulse")]
    pub merge_impulse: f32,
    /// Per-tick multiplier applied to residual cell impulse.
    #[serde(default = "default_player_impulse_damping")]
    pub impulse_damping: f32,
    #[serde(default = "default_player_name")]
    pub default_name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_mass: default_player_start_mass(),
            split_min_mass: default_player_split_min_mass(),
            max_cells: default_player_max_cells(),
            decay_start: default_player_decay_start(),
            decay_rate: default_player_decay_rate(),
            recombine_delay_ms: default_player_recombine_delay(),
            eat_ratio: default_player_eat_ratio(),
            split_impulse: default_player_split_impulse(),
            split_recoil: default_player_split_recoil(),
            merge_impulse: default_player_merge_impulse(),
            impulse_damping: default_player_impulse_damping(),
            default_name: default_player_name(),
        }
    }
}

fn default_player_start_mass() -> f32 {
    40.0
}
fn default_player_split_min_mass() -> f32 {
    30.0
}
fn default_player_max_cells() -> usize {
    16
}
fn default_player_decay_start() -> f32 {
    150.0
}
fn default_player_decay_rate() -> f32 {
    0.0015
}
fn default_player_recombine_delay() -> u64 {
    7_000
}
fn default_player_eat_ratio() -> f32 {
    1.12
}
fn default_player_split_impulse() -> f32 {
    7.5
}
fn default_player_split_recoil() -> f32 {
    0.4
}
fn default_player_merge_impulse() -> f32 {
    0.6
}
fn default_player_impulse_damping() -> f32 {
    0.88
}
fn default_player_name() -> String {
    "Anon".to_string()
}

/// A food variant: every pellet of the variant has the same mass and color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FoodVariant {
    pub mass: f32,
    pub color: Color,
}

/// Food configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodConfig {
    /// Target food population.
    #[serde(default = "default_food_amount")]
    pub amount: usize,
    #[serde(default = "default_food_variants")]
    pub variants: Vec<FoodVariant>,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            amount: default_food_amount(),
            variants: default_food_variants(),
        }
    }
}

fn default_food_amount() -> usize {
    2800
}
fn default_food_variants() -> Vec<FoodVariant> {
    vec![
        FoodVariant { mass: 1.0, color: Color::new(0x7b, 0xc8, 0xff) },
        FoodVariant { mass: 2.0, color: Color::new(0xff, 0xdf, 0x6b) },
        FoodVariant { mass: 4.0, color: Color::new(0xff, 0x7b, 0xbd) },
    ]
}

/// Virus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VirusConfig {
    /// Target virus population.
    #[serde(default = "default_virus_amount")]
    pub amount: usize,
    /// Hard cap on the population reached through reproduction.
    #[serde(default = "default_virus_max_amount")]
    pub max_amount: usize,
    #[serde(default = "default_virus_base_mass")]
    pub base_mass: f32,
    #[serde(default = "default_virus_color")]
    pub color: Color,
    /// A cell must exceed `virus mass * eat_factor` to eat a virus.
    #[serde(default = "default_virus_eat_factor")]
    pub eat_factor: f32,
    /// Mass gained when eating a virus, as a multiple of its mass.
    #[serde(default = "default_virus_reward")]
    pub reward: f32,
    /// Fed mass at which a virus shoots off a sibling.
    #[serde(default = "default_virus_shoot_threshold")]
    pub shoot_threshold: f32,
    #[serde(default = "default_virus_shoot_distance")]
    pub shoot_distance: f32,
    /// Popped cells break into `pop_base_parts + floor(mass / pop_mass_per_part)` pieces.
    #[serde(default = "default_virus_pop_base_parts")]
    pub pop_base_parts: usize,
    #[serde(default = "default_virus_pop_mass_per_part")]
    pub pop_mass_per_part: f32,
    /// Share of its mass a popped cell keeps (never below the start mass).
    #[serde(default = "default_virus_pop_keep_ratio")]
    pub pop_keep_ratio: f32,
    #[serde(default = "default_virus_fragment_impulse")]
    pub fragment_impulse: f32,
}

impl Default for VirusConfig {
    fn default() -> Self {
        Self {
            amount: default_virus_amount(),
            max_amount: default_virus_max_amount(),
            base_mass: default_virus_base_mass(),
            color: default_virus_color(),
            eat_factor: default_virus_eat_factor(),
            reward: default_virus_reward(),
            shoot_threshold: default_virus_shoot_threshold(),
            shoot_distance: default_virus_shoot_distance(),
            pop_base_parts: default_virus_pop_base_parts(),
            pop_mass_per_part: default_virus_pop_mass_per_part(),
            pop_keep_ratio: default_virus_pop_keep_ratio(),
            fragment_impulse: default_virus_fragment_impulse(),
        }
    }
}

fn default_virus_amount() -> usize {
    70
}
fn default_virus_max_amount() -> usize {
    140
}
fn default_virus_base_mass() -> f32 {
    100.0
}
fn default_virus_color() -> Color {
    Color::new(0x42, 0xb7, 0x2a)
}
fn default_virus_eat_factor() -> f32 {
    1.3
}
fn default_virus_reward() -> f32 {
    1.6
}
fn default_virus_shoot_threshold() -> f32 {
    30.0
}
fn default_virus_shoot_distance() -> f32 {
    30.0
}
fn default_virus_pop_base_parts() -> usize {
    8
}
fn default_virus_pop_mass_per_part() -> f32 {
    80.0
}
fn default_virus_pop_keep_ratio() -> f32 {
    0.35
}
fn default_virus_fragment_impulse() -> f32 {
    3.5
}

/// Ejected mass configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EjectConfig {
    #[serde(default = "default_eject_mass")]
    pub mass: f32,
    #[serde(default = "default_eject_speed")]
    pub speed: f32,
    /// A cell needs more than `mass + min_margin` to eject, and more than
    /// `pellet mass + min_margin` to eat a pellet.
    #[serde(default = "default_eject_min_margin")]
    pub min_margin: f32,
    /// Per-tick multiplier applied to pellet velocity.
    #[serde(default = "default_eject_damping")]
    pub damping: f32,
}

impl Default for EjectConfig {
    fn default() -> Self {
        Self {
            mass: default_eject_mass(),
            speed: default_eject_speed(),
            min_margin: default_eject_min_margin(),
            damping: default_eject_damping(),
        }
    }
}

fn default_eject_mass() -> f32 {
    12.0
}
fn default_eject_speed() -> f32 {
    30.0
}
fn default_eject_min_margin() -> f32 {
    5.0
}
fn default_eject_damping() -> f32 {
    0.95
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000
            seed = 7

            [food]
            amount = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.seed, Some(7));
        assert_eq!(config.server.tick_rate, 60);
        assert_eq!(config.food.amount, 10);
        assert_eq!(config.food.variants.len(), 3);
        assert_eq!(config.virus.shoot_threshold, 30.0);
        assert_eq!(config.player.max_cells, 16);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.border.size, 7000.0);
        assert_eq!(back.virus.color, Color::new(0x42, 0xb7, 0x2a));
        assert_eq!(back.food.variants[2].mass, 4.0);
    }

    #[test]
    fn test_intervals() {
        let config = Config::default();
        assert_eq!(config.tick_interval(), Duration::from_nanos(16_666_666));
        assert_eq!(config.broadcast_interval_ms(), 50);
    }
}
