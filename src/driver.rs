use crate::guide::{TravelGuide, TravelQuery};
use chrono::NaiveDate;
use rand::seq::SliceRandom;

pub const BLANK_FIELDS_WARNING: &str = "⚠️ Please enter both source and destination locations to proceed!";

pub const TRAVEL_PROGRESS: [&str; 4] = [
    "⏳ Checking flight schedules...",
    "🚆 Finding the fastest train routes...",
    "🚗 Calculating cab fares...",
    "🛩️ Fetching flight prices...",
];

pub const FACTS_PROGRESS: &str = "📍 Fetching what makes this place famous...";

pub const TRAVEL_HEADING: &str = "🌟 Your AI-Powered Travel Guide:";

pub fn facts_heading(destination: &str) -> String {
    format!("🌟 What is Famous in {destination}?")
}

/// Field values as a form emits them when the trigger fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
}

impl FormValues {
    /// `None` when either city is blank after trimming.
    pub fn to_query(&self) -> Option<TravelQuery> {
        let source = self.source.trim();
        let destination = self.destination.trim();
        if source.is_empty() || destination.is_empty() {
            return None;
        }
        Some(TravelQuery {
            source: source.to_string(),
            destination: destination.to_string(),
            date: self.date,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Fetching,
    Displaying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A city was blank; nothing was sent.
    Rejected,
    Displayed,
}

/// Where the driver puts its output.
pub trait Surface {
    fn warn(&mut self, message: &str);

    /// Transient "working" indicator, replaced by the next call to any method.
    fn progress(&mut self, message: &str);

    fn show(&mut self, heading: &str, body: &str);

    /// Called on every phase change, starting with `Validating`.
    fn phase(&mut self, _phase: Phase) {}
}

pub struct Driver {
    guide: TravelGuide,
    phase: Phase,
}

impl Driver {
    pub fn new(guide: TravelGuide) -> Self {
        Self {
            guide,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter<S>(&mut self, phase: Phase, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        tracing::debug!(from = ?self.phase, to = ?phase, "driver phase");
        self.phase = phase;
        surface.phase(phase);
    }

    /// Runs one query cycle. The two requests go out one after the other and
    /// each result is shown as soon as it arrives, whatever the other one did.
    pub async fn trigger<S>(&mut self, form: &FormValues, surface: &mut S) -> Outcome
    where
        S: Surface + Send + ?Sized,
    {
        self.enter(Phase::Validating, surface);

        let Some(query) = form.to_query() else {
            surface.warn(BLANK_FIELDS_WARNING);
            self.enter(Phase::Idle, surface);
            return Outcome::Rejected;
        };

        self.enter(Phase::Fetching, surface);
        // Debug only: at info this would land on top of the terminal form.
        tracing::debug!(model = self.guide.model(), destination = %query.destination, date = %query.date, "planning trip");

        surface.progress(travel_progress_message());
        let travel = self.guide.travel_options(&query).await;
        surface.show(TRAVEL_HEADING, &travel);

        surface.progress(FACTS_PROGRESS);
        let facts = self.guide.destination_facts(&query.destination).await;

        self.enter(Phase::Displaying, surface);
        surface.show(&facts_heading(&query.destination), &facts);

        self.enter(Phase::Idle, surface);
        Outcome::Displayed
    }
}

fn travel_progress_message() -> &'static str {
    TRAVEL_PROGRESS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TRAVEL_PROGRESS[0])
}
