//! Message analysis: one pass over a window-filtered collection.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, TimeZone, Timelike};
use rc_core::{DateWindow, Message};
use serde::Serialize;

use crate::percentage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostActive {
    pub user_id: String,
    pub username: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub text: u64,
    pub file: u64,
    pub system: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageAnalysis {
    pub total: u64,
    #[serde(skip_serializing_if = "DateWindow::is_unbounded")]
    pub window: DateWindow,
    /// In order of first appearance.
    pub authors: Vec<AuthorCount>,
    pub by_type: TypeCounts,
    pub by_hour: [u64; 24],
    /// Keyed by calendar day, `YYYY-MM-DD`.
    pub by_day: BTreeMap<String, u64>,
    /// Mean text length in characters over messages that have text.
    pub average_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_active: Option<MostActive>,
}

/// Analysis with hours and days in the machine's local time zone.
pub fn analyze_messages(messages: &[Message], window: DateWindow) -> MessageAnalysis {
    analyze_messages_in(messages, window, &Local)
}

pub fn analyze_messages_in<Tz: TimeZone>(
    messages: &[Message],
    window: DateWindow,
    tz: &Tz,
) -> MessageAnalysis {
    let mut authors: Vec<AuthorCount> = Vec::new();
    let mut author_index: HashMap<&str, usize> = HashMap::new();
    let mut by_type = TypeCounts::default();
    let mut by_hour = [0u64; 24];
    let mut by_day = BTreeMap::new();
    let mut total = 0u64;
    let mut text_chars = 0usize;
    let mut with_text = 0usize;

    for message in messages.iter().filter(|m| window.contains(m.timestamp)) {
        total += 1;

        let author = &message.author;
        match author_index.get(author.id.as_str()) {
            Some(&i) => {
                let entry = &mut authors[i];
                entry.count += 1;
                entry.username = author.username.clone();
                if author.name.is_some() {
                    entry.name = author.name.clone();
                }
            }
            None => {
                author_index.insert(author.id.as_str(), authors.len());
                authors.push(AuthorCount {
                    user_id: author.id.clone(),
                    username: author.username.clone(),
                    name: author.name.clone(),
                    count: 1,
                });
            }
        }

        if message.file.is_some() {
            by_type.file += 1;
        } else if message.is_from_system() {
            by_type.system += 1;
        } else {
            by_type.text += 1;
        }

        let local = message.timestamp.with_timezone(tz);
        by_hour[local.hour() as usize] += 1;
        *by_day
            .entry(local.date_naive().format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;

        if message.has_text() {
            with_text += 1;
            text_chars += message.text.chars().count();
        }
    }

    let average_length = if with_text == 0 {
        0
    } else {
        (text_chars as f64 / with_text as f64).round() as u64
    };

    let most_active = most_active(&authors).map(|top| MostActive {
        user_id: top.user_id.clone(),
        username: top.username.clone(),
        count: top.count,
        percentage: percentage(top.count, total),
    });

    MessageAnalysis {
        total,
        window,
        authors,
        by_type,
        by_hour,
        by_day,
        average_length,
        most_active,
    }
}

/// Highest count; ties go to the author seen first.
fn most_active(authors: &[AuthorCount]) -> Option<&AuthorCount> {
    authors.iter().fold(None, |best: Option<&AuthorCount>, author| match best {
        Some(b) if b.count >= author.count => Some(b),
        _ => Some(author),
    })
}
