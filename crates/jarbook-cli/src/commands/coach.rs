//! Coaching command implementations

use anyhow::Result;
use jarbook_core::budget::parse_amount;
use jarbook_core::{
    CoachBackend, CoachingMode, CoachingNarrative, CoachingResult, PyramidLevel, Session,
};
use tracing::debug;

use super::format_money;

/// Print the five mandatory parts of a coaching answer
pub fn print_narrative(narrative: &CoachingNarrative) {
    println!();
    println!("   📌 Facts");
    println!("      {}", narrative.fact_identification);
    println!("   ⏳ Over time");
    println!("      {}", narrative.time_impact);
    println!("   💸 The price");
    println!("      {}", narrative.price_to_pay);
    println!("   🔧 Adjustment");
    println!("      {}", narrative.specific_adjustment);
    println!();
    println!("   ❓ {}", narrative.accountability_question);
}

pub fn print_coaching_result(result: &CoachingResult) {
    println!();
    match result.level() {
        Some(level) => {
            println!("   🏔️  Level {}", level);
            if let Some(next) = level.next() {
                println!("      Next: {} ({})", next, next.condition());
            }
        }
        None => println!("   🏔️  Level {}", result.current_level),
    }
    println!("   🕰️  Financial longevity: {}", result.financial_longevity);
    if let Some(ref warning) = result.health_warning {
        println!("   \x1b[33m⚠️  {}\x1b[0m", warning);
    }
    print_narrative(&result.narrative);
}

fn print_backend_hint(session: &Session) {
    match session.coach().client() {
        Some(client) => {
            debug!(backend = client.name(), host = client.host(), "Using AI backend")
        }
        None => {
            let ai = &session.config().ai;
            println!(
                "   💡 Tip: Set {} (or pick another backend with AI_BACKEND) to enable coaching",
                ai.api_key_env()
            );
        }
    }
}

pub async fn cmd_coach(
    session: &Session,
    recognition: bool,
    reserves: &str,
    goal: Option<String>,
) -> Result<()> {
    let mode = if recognition {
        CoachingMode::Recognition
    } else {
        CoachingMode::General
    };
    let reserves = parse_amount(reserves);
    let display = &session.config().display;

    println!("🧭 Reviewing your finances...");
    println!(
        "   Income {} · Expenses {} · Reserves {}",
        format_money(session.budget().income(), display),
        format_money(session.budget().expenses(), display),
        format_money(reserves, display)
    );
    print_backend_hint(session);

    match session.coach_overview(mode, reserves, goal).await? {
        Some(result) => print_coaching_result(&result),
        None => println!("   A newer request replaced this one."),
    }
    Ok(())
}

pub async fn cmd_content(session: &Session, niche: &str) -> Result<()> {
    println!("🎬 Generating a content idea for \"{}\"...", niche.trim());
    print_backend_hint(session);

    let Some(idea) = session.content_idea(niche).await? else {
        println!("   A newer request replaced this one.");
        return Ok(());
    };

    println!();
    println!("   [{}] {}", idea.strategy_tag, idea.content_type);
    println!("   🪝 {}", idea.hook);
    println!();
    for (i, step) in idea.script_outline.iter().enumerate() {
        println!("   {}. {}", i + 1, step);
    }
    Ok(())
}

pub fn cmd_pyramid() -> Result<()> {
    println!();
    println!("🏔️  Financial pyramid");
    println!("   ─────────────────────────────────────────────────────────────");
    for level in PyramidLevel::ALL.iter().rev() {
        println!("   {:<24} {}", level.to_string(), level.condition());
    }
    Ok(())
}
