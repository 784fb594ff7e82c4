//! Goal command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use jarbook_core::budget::parse_amount;
use jarbook_core::{FinancialGoal, GoalType, NewGoal, Session};

use super::{format_money, parse_arg, parse_date, print_narrative, truncate};

/// Raw `goals add` arguments
#[derive(Debug, Clone)]
pub struct GoalInput<'a> {
    pub title: &'a str,
    pub target: &'a str,
    pub current: &'a str,
    pub deadline: &'a str,
    pub kind: &'a str,
    pub remind: u32,
}

impl GoalInput<'_> {
    pub fn into_draft(self) -> Result<NewGoal> {
        Ok(NewGoal {
            title: self.title.to_string(),
            target_amount: parse_amount(self.target),
            current_amount: parse_amount(self.current),
            deadline: parse_date(self.deadline)?,
            kind: parse_arg::<GoalType>(self.kind)?,
            reminder_days: self.remind,
        })
    }
}

fn progress_bar(pct: f64) -> String {
    let filled = ((pct / 5.0).round() as usize).min(20);
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

fn print_goal(session: &Session, goal: &FinancialGoal, today: NaiveDate) {
    let display = &session.config().display;
    let icon = match goal.kind {
        GoalType::Saving => "🎯",
        GoalType::Debt => "⛓️ ",
    };
    println!("   {} [{}] {}", icon, goal.id, truncate(&goal.title, 40));
    println!(
        "      {} {:>5.1}%  {} / {}",
        progress_bar(goal.progress()),
        goal.progress(),
        format_money(goal.current_amount, display),
        format_money(goal.target_amount, display)
    );

    let days = goal.days_until(today);
    let when = if days < 0 {
        format!("\x1b[31moverdue by {} days\x1b[0m", -days)
    } else if goal.is_nearing_deadline(today) {
        format!("\x1b[33m{} days left\x1b[0m ⏰", days)
    } else {
        format!("{} days left", days)
    };
    println!("      Deadline {} ({})", goal.deadline, when);
}

pub fn cmd_goals_list(session: &Session, today: NaiveDate) -> Result<()> {
    let goals = session.goals().goals();
    if goals.is_empty() {
        println!("No goals yet. Create one with:");
        println!("  jarbook goals add \"Emergency fund\" --target 60000000 --deadline 2027-06-30");
        return Ok(());
    }

    println!();
    println!("🏁 Goals ({})", goals.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in goals {
        print_goal(session, goal, today);
    }
    Ok(())
}

pub fn cmd_goals_add(
    session: &mut Session,
    draft: NewGoal,
    today: NaiveDate,
) -> Result<FinancialGoal> {
    let goal = session.goals_mut().add(draft)?;
    println!("✅ Created goal {}:", goal.id);
    print_goal(session, &goal, today);
    Ok(goal)
}

pub fn cmd_goals_progress(
    session: &mut Session,
    id: &str,
    amount: &str,
    today: NaiveDate,
) -> Result<()> {
    let goal = session.goals_mut().update_progress(id, parse_amount(amount))?;
    println!("✅ Updated goal {}:", goal.id);
    print_goal(session, &goal, today);
    if goal.current_amount >= goal.target_amount {
        println!("   🎉 Target reached!");
    }
    Ok(())
}

pub fn cmd_goals_delete(session: &mut Session, id: &str) -> Result<()> {
    if session.delete_goal(id)? {
        println!("✅ Deleted goal {}", id);
    } else {
        println!("Goal {} not found, nothing deleted.", id);
    }
    Ok(())
}

pub async fn cmd_goals_strategy(session: &Session, id: &str) -> Result<()> {
    let Some(goal) = session.goals().get(id) else {
        bail!("Goal {} not found", id);
    };
    println!("🧭 Planning \"{}\"...", truncate(&goal.title, 40));

    let Some(strategy) = session.goal_strategy(id).await? else {
        println!("   A newer request replaced this one.");
        return Ok(());
    };

    let status = strategy.feasibility_status;
    let color = match status.badge() {
        "green" => "\x1b[32m",
        "orange" => "\x1b[33m",
        "red" => "\x1b[31m",
        _ => "\x1b[90m",
    };
    println!();
    println!("   Feasibility:    {}{}\x1b[0m", color, status);
    println!("   Monthly target: {}", strategy.monthly_target);
    print_narrative(&strategy.narrative);
    Ok(())
}

pub fn cmd_goals_reminders(session: &Session, today: NaiveDate) -> Result<()> {
    let due = session.goals().reminders(today);
    if due.is_empty() {
        println!("✅ No goal deadlines coming up.");
        return Ok(());
    }

    println!();
    println!("⏰ Goals nearing their deadline ({})", due.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for goal in due {
        print_goal(session, goal, today);
    }
    Ok(())
}
