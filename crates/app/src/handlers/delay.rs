//! `delay:<AMOUNT>:<UNIT>` — pauses the processor.
//!
//! The sleep happens on the task that resolves the action, so every command
//! queued behind it waits too. That is what makes step lists such as
//! "power on, wait 2 seconds, select input" work.

use std::time::Duration;

use async_trait::async_trait;

use nexus_domain::action::Action;
use nexus_domain::error::ResolveError;

use crate::ports::TerminalHandler;

/// Scheme served by [`DelayHandler`].
pub const DELAY_SCHEME: &str = "delay";

/// Sleeps for the requested duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelayHandler;

/// Parse `AMOUNT:UNIT` into a duration.
fn parse_delay(ssp: &str) -> Result<Duration, &'static str> {
    let (amount, unit) = ssp.split_once(':').ok_or("expected AMOUNT:UNIT")?;
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err("amount must be a non-negative integer");
    }
    let amount: u64 = amount.parse().map_err(|_| "amount out of range")?;
    let seconds = |factor: u64| {
        amount
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or("amount out of range")
    };
    match unit {
        "ns" | "NANOS" => Ok(Duration::from_nanos(amount)),
        "MICROS" => Ok(Duration::from_micros(amount)),
        "ms" | "MILLIS" => Ok(Duration::from_millis(amount)),
        "s" | "SECONDS" => seconds(1),
        "m" | "MINUTES" => seconds(60),
        "HOURS" => seconds(3_600),
        "HALF_DAYS" => seconds(43_200),
        "DAYS" => seconds(86_400),
        _ => Err("unknown unit"),
    }
}

#[async_trait]
impl TerminalHandler for DelayHandler {
    async fn accept(&self, action: &Action) -> Result<(), ResolveError> {
        let ssp = action.scheme_specific_part();
        let duration =
            parse_delay(ssp).map_err(|reason| ResolveError::malformed(DELAY_SCHEME, ssp, reason))?;
        tracing::debug!(?duration, "delaying");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_short_units() {
        assert_eq!(parse_delay("250:ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_delay("2:s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_delay("7:ns"), Ok(Duration::from_nanos(7)));
        assert_eq!(parse_delay("3:m"), Ok(Duration::from_secs(180)));
    }

    #[test]
    fn should_parse_calendar_units() {
        assert_eq!(parse_delay("5:MICROS"), Ok(Duration::from_micros(5)));
        assert_eq!(parse_delay("1:HOURS"), Ok(Duration::from_secs(3_600)));
        assert_eq!(parse_delay("1:HALF_DAYS"), Ok(Duration::from_secs(43_200)));
        assert_eq!(parse_delay("0:DAYS"), Ok(Duration::ZERO));
    }

    #[test]
    fn should_reject_malformed_delays() {
        assert!(parse_delay("5").is_err());
        assert!(parse_delay("-5:s").is_err());
        assert!(parse_delay("five:s").is_err());
        assert!(parse_delay("5:fortnights").is_err());
        assert!(parse_delay(":s").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_sleep_for_requested_duration() {
        let start = tokio::time::Instant::now();
        DelayHandler
            .accept(&Action::parse("delay:2:s").unwrap())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn should_report_malformed_action() {
        let result = DelayHandler
            .accept(&Action::parse("delay:soon").unwrap())
            .await;
        assert!(matches!(
            result,
            Err(ResolveError::MalformedAction { scheme, .. }) if scheme == "delay"
        ));
    }
}
