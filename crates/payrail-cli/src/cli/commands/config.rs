//! `payrail config` – show where config is read from and what it resolves to.

use anyhow::Result;
use payrail_core::config::{self, ClientConfig};
use std::path::Path;

pub fn run_config(cfg: &ClientConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    let policy = cfg.retry_policy();
    println!("config file:      {}", path.display());
    println!("base url:         {}", cfg.base_url);
    println!("username:         {}", cfg.username);
    println!("password:         {}", if cfg.password.is_empty() { "(not set)" } else { "********" });
    println!("on behalf of:     {}", cfg.on_behalf_of.as_deref().unwrap_or("-"));
    println!("customer auth:    {}", if cfg.customer_auth.is_some() { "set" } else { "-" });
    println!(
        "timeouts:         connect {}s, request {}s",
        cfg.connect_timeout_secs, cfg.request_timeout_secs
    );
    println!(
        "retry:            {} (max {} retries, {:?} base, {:?} max, {:?})",
        if policy.enabled { "enabled" } else { "disabled" },
        policy.max_attempts,
        policy.base_delay,
        policy.max_delay,
        policy.strategy
    );
    let codes: Vec<String> = policy
        .retryable_status_codes
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!("retry statuses:   {}", codes.join(", "));
    if let Err(e) = cfg.validate() {
        println!("warning:          {:#}", e);
    }
    Ok(())
}
