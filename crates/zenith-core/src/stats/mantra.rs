//! Daily mantra shown on the home screen.

use chrono::{Datelike, NaiveDate};

pub const MANTRAS: [&str; 10] = [
    "Stay intentional.",
    "Focus is a superpower.",
    "Do one thing at a time.",
    "Quiet the noise, find the signal.",
    "Less but better.",
    "Be present in this moment.",
    "Action is the antidote to anxiety.",
    "Simplify everything.",
    "Your attention is your life.",
    "Minimize the trivial, maximize the vital.",
];

/// Mantra for `date`, chosen by day of month.
pub fn daily_mantra(date: NaiveDate) -> &'static str {
    MANTRAS[date.day() as usize % MANTRAS.len()]
}
