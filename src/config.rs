use std::env;
use std::time::Duration;
use wagerarena::ArenaConfig;

pub struct Config {
    pub port: u16,
    pub countdown_tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            countdown_tick_ms: env::var("COUNTDOWN_TICK_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(1000),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn arena(&self) -> ArenaConfig {
        ArenaConfig {
            countdown_tick: Duration::from_millis(self.countdown_tick_ms),
        }
    }
}
