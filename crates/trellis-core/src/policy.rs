//! Scheduling-date validation applied when plans are created.
//!
//! The policy covers three rules:
//!
//! 1. Date strings must parse as real calendar dates in `YYYY-MM-DD` form.
//! 2. A date earlier than today but in the current year is reinterpreted as
//!    the same month/day next year (natural-language entry like "April 3rd"
//!    said in December means next April). The substitution is logged. A date
//!    in a strictly earlier year is a hard validation failure.
//! 3. When both dates are present, `scheduled_at` must be strictly earlier
//!    than `deadline`. The check runs on the normalized dates.
//!
//! Only plan-level creation applies the full policy. Step creation and
//! reschedule operations parse dates strictly but never roll them forward:
//! an explicit reschedule is assumed intentional.

use jiff::civil::Date;
use log::info;

use crate::error::{PlannerError, Result};

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<Date> {
    value.parse::<Date>().map_err(|_| {
        PlannerError::invalid_input(
            field,
            format!("'{value}' is not a valid calendar date (expected YYYY-MM-DD)"),
        )
    })
}

/// Apply the past-date roll-forward rule to a single date.
///
/// Dates on or after `today` pass through unchanged. A past date in the
/// current year rolls to the same month/day next year; a past date in an
/// earlier year fails, since a whole past year is an entry error rather
/// than ambiguity.
pub fn roll_forward(field: &str, date: Date, today: Date) -> Result<Date> {
    if date >= today {
        return Ok(date);
    }

    if date.year() < today.year() {
        return Err(PlannerError::invalid_input(
            field,
            format!("'{date}' lies in a past year"),
        ));
    }

    let rolled = Date::new(date.year() + 1, date.month(), date.day()).map_err(|_| {
        PlannerError::invalid_input(
            field,
            format!("'{date}' has no equivalent date in {}", date.year() + 1),
        )
    })?;

    info!("rolled past date {date} forward to {rolled} for '{field}'");
    Ok(rolled)
}

/// Parse and normalize a plan's schedule pair.
///
/// Both dates go through [`parse_date`] and [`roll_forward`]; the
/// chronological-order check then runs on the corrected values, so a
/// roll-forward that inverts the pair is rejected rather than persisted.
pub fn normalize_schedule(
    scheduled_at: Option<&str>,
    deadline: Option<&str>,
    today: Date,
) -> Result<(Option<Date>, Option<Date>)> {
    let scheduled_at = scheduled_at
        .map(|s| parse_date("scheduled_at", s).and_then(|d| roll_forward("scheduled_at", d, today)))
        .transpose()?;
    let deadline = deadline
        .map(|s| parse_date("deadline", s).and_then(|d| roll_forward("deadline", d, today)))
        .transpose()?;

    if let (Some(start), Some(end)) = (scheduled_at, deadline) {
        if start >= end {
            return Err(PlannerError::invalid_input(
                "deadline",
                format!("deadline {end} must be strictly later than scheduled_at {start}"),
            ));
        }
    }

    Ok((scheduled_at, deadline))
}
