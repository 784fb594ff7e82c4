//! Budget command implementations

use anyhow::Result;
use jarbook_core::budget::{parse_amount, parse_percent};
use jarbook_core::{Jar, Session, ViewMode};

use super::{format_money, parse_arg};

pub fn cmd_budget_show(session: &Session, view: ViewMode) -> Result<()> {
    let display = &session.config().display;
    let budget = session.budget();

    println!();
    println!("💰 Budget ({})", view);
    println!("   ─────────────────────────────────────────────");
    println!("   Income:   {}", format_money(budget.income(), display));
    println!("   Expenses: {}", format_money(budget.expenses(), display));

    let surplus = budget.surplus();
    let surplus_str = format_money(surplus, display);
    if surplus < 0 {
        println!("   Surplus:  \x1b[31m{}\x1b[0m", surplus_str);
    } else {
        println!("   Surplus:  \x1b[32m{}\x1b[0m", surplus_str);
    }

    let config = budget.jar_config();
    let amounts = budget.jar_amounts(view);

    println!();
    println!(
        "🫙 Jars{}",
        if budget.has_custom_jars() {
            " (custom)"
        } else {
            " (recommended for your income)"
        }
    );
    println!("   ─────────────────────────────────────────────");
    for (jar, pct) in config.iter() {
        let amount = amounts.get(&jar).copied().unwrap_or_default();
        println!(
            "   {:<12} {:>3}%  {:>22}",
            jar.label(),
            pct,
            format_money(amount, display)
        );
    }

    let status = budget.allocation_status();
    println!();
    if status.valid {
        println!("   ✅ Allocation: 100%");
    } else {
        println!(
            "   ⚠️  Allocation: {}% ({:+} points to fix)",
            status.total,
            status.remaining()
        );
    }

    Ok(())
}

pub fn cmd_budget_income(session: &mut Session, amount: &str) -> Result<()> {
    let income = parse_amount(amount);
    session.budget_mut().set_income(income)?;
    println!(
        "✅ Income set to {}",
        format_money(income, &session.config().display)
    );
    if !session.budget().has_custom_jars() {
        println!("   Jar allocation follows the recommendation for this income.");
    }
    Ok(())
}

pub fn cmd_budget_expenses(session: &mut Session, amount: &str) -> Result<()> {
    let expenses = parse_amount(amount);
    session.budget_mut().set_expenses(expenses)?;
    println!(
        "✅ Expenses set to {}",
        format_money(expenses, &session.config().display)
    );
    Ok(())
}

pub fn cmd_budget_jar(session: &mut Session, jar: &str, percent: &str) -> Result<()> {
    let jar: Jar = parse_arg(jar)?;
    let percent = parse_percent(percent);
    let status = session.budget_mut().set_jar(jar, percent)?;

    println!("✅ {} set to {}%", jar.label(), percent);
    if !status.valid {
        println!(
            "   ⚠️  Jars now add up to {}%, adjust the others to reach 100%.",
            status.total
        );
    }
    Ok(())
}

pub fn cmd_budget_reset(session: &mut Session) -> Result<()> {
    let config = session.budget_mut().reset_to_default()?;
    println!("✅ Jar allocation reset to the recommendation for your income:");
    let line = config
        .iter()
        .map(|(jar, pct)| format!("{} {}%", jar.as_str(), pct))
        .collect::<Vec<_>>()
        .join(", ");
    println!("   {}", line);
    Ok(())
}
