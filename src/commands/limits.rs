use chrono::{DateTime, Utc};

use super::error::CommandError;
use crate::remote::CurrentClient;
use crate::snapshot::RateBudget;

pub async fn rate_limits(client: &CurrentClient) -> Result<RateBudget, CommandError> {
    Ok(client.current().rate_budget().await?)
}

/// One-line summary of the API budget as of `now`.
#[must_use]
pub fn format_budget(budget: &RateBudget, now: DateTime<Utc>) -> String {
    let wait = (budget.reset_at - now)
        .to_std()
        .map(|d| std::time::Duration::from_secs(d.as_secs()))
        .unwrap_or_default();
    if wait.is_zero() {
        format!(
            "{}/{} API calls remaining, window already reset",
            budget.remaining, budget.limit
        )
    } else {
        format!(
            "{}/{} API calls remaining, resets in {} ({})",
            budget.remaining,
            budget.limit,
            humantime::format_duration(wait),
            budget.reset_at.format("%H:%M UTC")
        )
    }
}
