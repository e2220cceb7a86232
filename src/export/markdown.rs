use std::fmt::Write as _;

use crate::{export::export_file_name, export::ExportedFile, types::TripItinerary};

pub const MARKDOWN_MIME: &str = "text/markdown; charset=utf-8";

/// Serialize an itinerary to the fixed Markdown layout. Same input, same bytes.
pub fn to_markdown(itinerary: &TripItinerary) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}", itinerary.trip_title);
    let _ = writeln!(out, "目的地: {}", itinerary.destination_name);
    let _ = writeln!(out, "简介: {}", itinerary.summary);
    out.push('\n');

    out.push_str("## 行前准备\n");
    for item in &itinerary.packing_list {
        let _ = writeln!(out, "- [ ] {item}");
    }
    out.push('\n');

    out.push_str("## 预算预估 (CNY)\n");
    for entry in &itinerary.budget_breakdown {
        let _ = writeln!(out, "- {}: ¥{}", entry.category, entry.amount);
    }
    let _ = writeln!(out, "**总计: ¥{}** (约)", itinerary.budget_total());
    out.push('\n');

    out.push_str("## 每日行程\n");
    for day in &itinerary.days {
        let _ = writeln!(out, "### 第 {} 天: {}", day.day_number, day.theme);
        for activity in &day.activities {
            let _ = writeln!(out, "#### {} - {}", activity.time, activity.activity);
            let _ = writeln!(out, "📍 {}", activity.location);
            let _ = writeln!(out, "{}", activity.description);
        }
        out.push_str("---\n");
    }

    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, itinerary: &TripItinerary) -> ExportedFile {
        ExportedFile::new(
            export_file_name(&itinerary.trip_title, "md"),
            MARKDOWN_MIME,
            to_markdown(itinerary).into_bytes(),
        )
    }
}
