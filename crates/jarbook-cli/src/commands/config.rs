//! Configuration command implementation

use std::path::Path;

use anyhow::Result;
use jarbook_core::config::default_config_path;
use jarbook_core::{Config, TaskType};

use super::format_money;

/// Print the effective configuration (defaults, override file, environment)
pub fn cmd_config(config: &Config, override_path: Option<&Path>) -> Result<()> {
    let source = override_path
        .map(Path::to_path_buf)
        .or_else(|| default_config_path().filter(|p| p.exists()));

    println!();
    println!("⚙️  Configuration");
    println!("   ─────────────────────────────────────────────");
    match source {
        Some(path) => println!("   Override file: {}", path.display()),
        None => println!("   Override file: (none, using built-in defaults)"),
    }

    println!();
    println!("   [store]");
    println!(
        "   path:       {}",
        config
            .store_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );
    println!("   namespace:  {}", config.store.namespace);

    let budget = &config.budget;
    println!();
    println!("   [budget]");
    println!(
        "   default income:   {}",
        format_money(budget.default_income, &config.display)
    );
    println!(
        "   default expenses: {}",
        format_money(budget.default_expenses, &config.display)
    );
    println!("   savings rate:     {}%", budget.savings_rate_percent);
    println!(
        "   allocation:       {}",
        if budget.strict_allocation {
            "strict (must total 100%)"
        } else {
            "permissive"
        }
    );

    let ai = &config.ai;
    println!();
    println!("   [ai]");
    println!("   backend:  {}", ai.backend);
    println!("   host:     {}", ai.host().unwrap_or("(not set)"));
    println!(
        "   api key:  {} ({})",
        ai.api_key_env(),
        if ai.api_key().is_some() { "set" } else { "not set" }
    );
    println!("   timeout:  {}s", ai.timeout.as_secs());
    for task in TaskType::all() {
        println!("   model {:<14} {}", task.as_str(), ai.model_for_task(*task));
    }

    println!();
    println!("   [display]");
    println!("   currency:   {}", config.display.currency_symbol);
    println!("   separator:  \"{}\"", config.display.thousands_separator);

    Ok(())
}
