//! `meetup` CLI — inspect and update encoded meetup records from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Common days or time windows for everyone who responded
//! meetup common -i meetup.json
//!
//! # Lifecycle status, participants and message link
//! meetup status -i meetup.json --tz America/New_York
//!
//! # Apply a participant's response (last write wins) and write the record back
//! meetup submit -i meetup.json --availability response.json -o meetup.json
//!
//! # Finalize a timed meetup to one of its common slots
//! meetup finalize -i meetup.json --start 2026-07-01T11:00:00Z --end 2026-07-01T12:00:00Z
//!
//! # Finalize a full-day meetup to a common day
//! meetup finalize -i trip.json --day 2026-07-02
//! ```
//!
//! Records are read from `-i` or stdin and written to `-o` or stdout. Logs go
//! to stderr and are controlled by `RUST_LOG`.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use meetup_engine::codec;
use meetup_engine::{
    Calendar, Clock, CommonAvailability, FixedClock, Meetup, Submission, SubmissionPolicy,
    SystemClock, TimeSlot, UserAvailability,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "meetup",
    version,
    about = "Group meetup availability engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone used for calendar days and displayed times
    #[arg(long, global = true, env = "MEETUP_TZ", default_value = "UTC")]
    tz: String,

    /// Evaluate deadlines as of this RFC 3339 instant instead of the wall clock
    #[arg(long, global = true, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Reject responses submitted after the deadline
    #[arg(long, global = true)]
    reject_late: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the days or time windows every participant can make
    Common {
        /// Meetup record (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the lifecycle status and participants
    Status {
        /// Meetup record (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Apply a participant's availability to the record
    Submit {
        /// Meetup record (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// UserAvailability record to apply
        #[arg(short, long)]
        availability: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Finalize the meetup to one of its common slots
    Finalize {
        /// Meetup record (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Slot start (RFC 3339)
        #[arg(long, value_parser = parse_instant, required_unless_present = "day", conflicts_with = "day")]
        start: Option<DateTime<Utc>>,
        /// Slot end (RFC 3339)
        #[arg(long, value_parser = parse_instant, required_unless_present = "day", conflicts_with = "day")]
        end: Option<DateTime<Utc>>,
        /// Common day for full-day meetups (YYYY-MM-DD in --tz)
        #[arg(long)]
        day: Option<NaiveDate>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Wall clock, or a pinned instant from `--now`.
enum HostClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for HostClock {
    fn now(&self) -> DateTime<Utc> {
        match self {
            HostClock::System(clock) => clock.now(),
            HostClock::Fixed(clock) => clock.now(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum CommonOutput {
    Days(Vec<String>),
    Slots(Vec<SlotDto>),
}

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

impl From<&TimeSlot> for SlotDto {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start: slot.start.to_rfc3339(),
            end: slot.end.to_rfc3339(),
            duration_minutes: slot.duration_minutes(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meetup=info,meetup_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let calendar = Calendar::from_name(&cli.tz).context("Failed to load calendar timezone")?;
    let clock = match cli.now {
        Some(now) => HostClock::Fixed(FixedClock(now)),
        None => HostClock::System(SystemClock),
    };
    let policy = if cli.reject_late {
        SubmissionPolicy::strict()
    } else {
        SubmissionPolicy::default()
    };

    match cli.command {
        Commands::Common { input } => {
            let meetup = read_meetup(input.as_deref())?;
            let output = match meetup.common_availability(&calendar) {
                CommonAvailability::Days(days) => {
                    CommonOutput::Days(days.iter().map(|d| d.to_rfc3339()).collect())
                }
                CommonAvailability::Slots(slots) => {
                    CommonOutput::Slots(slots.iter().map(SlotDto::from).collect())
                }
            };
            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        }
        Commands::Status { input } => {
            let meetup = read_meetup(input.as_deref())?;
            let names: Vec<&str> = meetup
                .availabilities()
                .iter()
                .map(|a| a.user_name.as_str())
                .collect();
            println!("{}", codec::caption(&meetup));
            println!("{}", meetup.status_line(&clock, &calendar));
            println!("Participants: {} ({})", names.len(), names.join(", "));
            println!("Link: {}", codec::meetup_link(meetup.id));
        }
        Commands::Submit {
            input,
            availability,
            output,
        } => {
            let mut meetup = read_meetup(input.as_deref())?;
            let raw = std::fs::read_to_string(&availability)
                .with_context(|| format!("Failed to read file: {}", availability))?;
            let response: UserAvailability =
                codec::decode(&raw).context("Failed to decode availability")?;
            let user = response.user_name.clone();

            let outcome = meetup
                .submit_availability(response, &clock, policy)
                .context("Failed to submit availability")?;
            match outcome {
                Submission::Inserted => tracing::info!("recorded availability for {}", user),
                Submission::Replaced => tracing::info!("replaced availability for {}", user),
            }

            write_meetup(output.as_deref(), &meetup)?;
        }
        Commands::Finalize {
            input,
            start,
            end,
            day,
            output,
        } => {
            let mut meetup = read_meetup(input.as_deref())?;
            match (day, start, end) {
                (Some(day), _, _) => meetup
                    .finalize_day(calendar.day_start(day), &calendar)
                    .context("Failed to finalize meetup")?,
                (None, Some(start), Some(end)) => {
                    let slot = TimeSlot::new(start, end).context("Invalid slot")?;
                    meetup
                        .finalize(slot, &calendar)
                        .context("Failed to finalize meetup")?
                }
                _ => anyhow::bail!("Provide either --day or both --start and --end"),
            }
            tracing::info!("{}", meetup.status_line(&clock, &calendar));

            write_meetup(output.as_deref(), &meetup)?;
        }
    }

    Ok(())
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid RFC 3339 instant '{}': {}", s, e))
}

fn read_meetup(path: Option<&str>) -> Result<Meetup> {
    let raw = read_input(path)?;
    let meetup: Meetup = codec::decode(&raw).context("Failed to decode meetup record")?;
    meetup.validate().context("Invalid meetup record")?;
    Ok(meetup)
}

fn write_meetup(path: Option<&str>, meetup: &Meetup) -> Result<()> {
    let json = codec::encode_pretty(meetup).context("Failed to encode meetup record")?;
    write_output(path, &json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
