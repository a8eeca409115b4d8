use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

/// AI Travel Guru: plan smarter, travel better
#[derive(Debug, Parser)]
#[command(name = "travel-guru")]
#[command(version)]
#[command(about = "Travel options and destination highlights from Gemini", long_about = None)]
pub struct Args {
    /// Model name
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Provider (default: config/provider or "google")
    #[arg(long = "provider")]
    pub provider: Option<String>,

    /// Departure city, e.g. Hyderabad
    #[arg(long = "from", value_name = "CITY", default_value = "")]
    pub source: String,

    /// Destination, e.g. Durgi
    #[arg(long = "to", value_name = "CITY", default_value = "")]
    pub destination: String,

    /// Travel date (YYYY-MM-DD or "today"); defaults to today
    #[arg(long = "date", value_name = "DATE", value_parser = parse_travel_date)]
    pub date: Option<NaiveDate>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive travel form
    #[cfg(feature = "tui")]
    Tui,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_travel_date(s: &str) -> Result<NaiveDate, String> {
    parse_travel_date_on(s, today())
}

fn parse_travel_date_on(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let s = s.trim();
    let date = if s.eq_ignore_ascii_case("today") {
        today
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))?
    };

    if date < today {
        return Err(format!("travel date {date} is in the past (today is {today})"));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_today_and_later() {
        let today = day(2026, 10, 19);
        assert_eq!(parse_travel_date_on("2026-10-19", today), Ok(today));
        assert_eq!(parse_travel_date_on("2027-01-02", today), Ok(day(2027, 1, 2)));
        assert_eq!(parse_travel_date_on("Today", today), Ok(today));
    }

    #[test]
    fn rejects_past_and_garbage() {
        let today = day(2026, 10, 19);
        assert!(parse_travel_date_on("2026-10-18", today).unwrap_err().contains("in the past"));
        assert!(parse_travel_date_on("19/10/2026", today).is_err());
    }

    #[test]
    fn city_flags_default_to_blank() {
        let args = Args::try_parse_from(["travel-guru", "--to", "Paris"]).unwrap();
        assert_eq!(args.source, "");
        assert_eq!(args.destination, "Paris");
        assert!(args.date.is_none());
        assert!(args.cmd.is_none());
    }

    #[test]
    fn past_date_flag_is_a_usage_error() {
        assert!(Args::try_parse_from(["travel-guru", "--date", "2001-01-01"]).is_err());
    }
}
