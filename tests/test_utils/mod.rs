//! Shared builders for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use reposweep::config::{Config, GithubConfig, UiConfig};
use reposweep::data::Repo;

/// Create a minimal config for testing
pub fn test_config() -> Config {
    Config {
        github: GithubConfig {
            login: "octocat".to_string(),
            token: "test-token".to_string(),
            api_url: None,
        },
        ui: UiConfig::default(),
    }
}

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

/// Create a repo with defaults; tweak fields at the call site as needed.
pub fn make_repo(id: u64, name: &str) -> Repo {
    Repo {
        id,
        name: name.to_string(),
        full_name: format!("octocat/{}", name),
        description: None,
        html_url: format!("https://github.com/octocat/{}", name),
        stargazers_count: 0,
        forks_count: 0,
        language: None,
        private: false,
        fork: false,
        updated_at: timestamp(1),
        owner: "octocat".to_string(),
    }
}
