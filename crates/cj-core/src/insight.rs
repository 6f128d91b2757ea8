//! Tracking which date an AI insight belongs to.
//!
//! Generating an insight is the one slow operation in the journal. The user
//! can keep editing or switch days while it runs, so a result is only
//! accepted if the request that produced it is still the current one and
//! the viewed date has not changed since it was issued.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A generated insight and the date it was requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub date: NaiveDate,
    pub text: String,
}

/// Handle for one in-flight insight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightTicket {
    generation: u64,
    date: NaiveDate,
}

impl InsightTicket {
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The text was stored as the insight for the viewed date.
    Accepted,
    /// The viewed date changed or a newer request superseded this one.
    Stale,
}

/// Insight state for the currently viewed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightState {
    viewed: NaiveDate,
    generation: u64,
    pending: bool,
    insight: Option<Insight>,
}

impl InsightState {
    /// Starts viewing `date`, keeping `cached` only if it belongs to that date.
    pub fn new(viewed: NaiveDate, cached: Option<Insight>) -> Self {
        Self {
            viewed,
            generation: 0,
            pending: false,
            insight: cached.filter(|insight| insight.date == viewed),
        }
    }

    pub const fn viewed_date(&self) -> NaiveDate {
        self.viewed
    }

    pub const fn is_loading(&self) -> bool {
        self.pending
    }

    pub const fn insight(&self) -> Option<&Insight> {
        self.insight.as_ref()
    }

    /// Switches the viewed date. Any shown or pending insight is dropped.
    pub fn view(&mut self, date: NaiveDate) {
        if date == self.viewed {
            return;
        }
        self.viewed = date;
        self.generation += 1;
        self.pending = false;
        self.insight = None;
    }

    /// Issues a ticket for a new request against the viewed date.
    pub fn begin(&mut self) -> InsightTicket {
        self.generation += 1;
        self.pending = true;
        InsightTicket {
            generation: self.generation,
            date: self.viewed,
        }
    }

    /// Delivers the result of a request.
    pub fn complete(&mut self, ticket: InsightTicket, text: String) -> Completion {
        if ticket.generation != self.generation || ticket.date != self.viewed {
            tracing::debug!(requested = %ticket.date, viewed = %self.viewed, "discarding stale insight");
            return Completion::Stale;
        }
        self.pending = false;
        self.insight = Some(Insight {
            date: ticket.date,
            text,
        });
        Completion::Accepted
    }

    /// Drops the insight after the entries of `date` changed.
    ///
    /// An insight summarizes every logged day up to its own date, so any
    /// change on or before that date invalidates it. Returns true if an
    /// insight was removed.
    pub fn invalidate(&mut self, date: NaiveDate) -> bool {
        if self.insight.as_ref().is_some_and(|insight| date <= insight.date) {
            self.insight = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn accepts_result_for_current_date() {
        let mut state = InsightState::new(date("2024-01-15"), None);
        let ticket = state.begin();
        assert!(state.is_loading());

        assert_eq!(state.complete(ticket, "Mornings are strong.".into()), Completion::Accepted);
        assert!(!state.is_loading());
        assert_eq!(state.insight().unwrap().text, "Mornings are strong.");
        assert_eq!(state.insight().unwrap().date, date("2024-01-15"));
    }

    #[test]
    fn discards_result_after_date_change() {
        let mut state = InsightState::new(date("2024-01-15"), None);
        let ticket = state.begin();
        state.view(date("2024-01-16"));

        assert_eq!(state.complete(ticket, "old".into()), Completion::Stale);
        assert!(state.insight().is_none());
        assert_eq!(state.viewed_date(), date("2024-01-16"));
    }

    #[test]
    fn discards_result_superseded_by_newer_request() {
        let mut state = InsightState::new(date("2024-01-15"), None);
        let first = state.begin();
        let second = state.begin();

        assert_eq!(state.complete(first, "first".into()), Completion::Stale);
        assert_eq!(state.complete(second, "second".into()), Completion::Accepted);
        assert_eq!(state.insight().unwrap().text, "second");
    }

    #[test]
    fn returning_to_same_date_still_rejects_old_ticket() {
        let mut state = InsightState::new(date("2024-01-15"), None);
        let ticket = state.begin();
        state.view(date("2024-01-16"));
        state.view(date("2024-01-15"));
        assert_eq!(state.complete(ticket, "late".into()), Completion::Stale);
    }

    #[test]
    fn cached_insight_only_kept_for_viewed_date() {
        let cached = Insight {
            date: date("2024-01-14"),
            text: "yesterday".into(),
        };
        assert!(InsightState::new(date("2024-01-15"), Some(cached.clone())).insight().is_none());
        assert!(InsightState::new(date("2024-01-14"), Some(cached)).insight().is_some());
    }

    #[test]
    fn invalidate_ignores_later_dates() {
        let cached = Insight {
            date: date("2024-01-15"),
            text: "cached".into(),
        };
        let mut state = InsightState::new(date("2024-01-15"), Some(cached));
        assert!(!state.invalidate(date("2024-01-16")));
        assert!(state.insight().is_some());
        assert!(state.invalidate(date("2024-01-15")));
        assert!(state.insight().is_none());
    }

    #[test]
    fn invalidate_covers_earlier_history() {
        let cached = Insight {
            date: date("2024-01-15"),
            text: "Jan 14 was a peak day".into(),
        };
        let mut state = InsightState::new(date("2024-01-15"), Some(cached));
        assert!(state.invalidate(date("2024-01-14")));
        assert!(state.insight().is_none());

        let cached = Insight {
            date: date("2024-01-15"),
            text: "sparse history".into(),
        };
        let mut state = InsightState::new(date("2024-01-15"), Some(cached));
        assert!(state.invalidate(date("2023-12-01")));
    }
}
