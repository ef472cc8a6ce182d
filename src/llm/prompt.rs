use crate::schema::{SchemaDescriptor, VIDEO_SCHEMA};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

/// Genitive month names as they appear in "28 ноября 2025", in calendar order.
pub const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

static DATE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b([0-9]{{1,2}})\s+({})\s+([0-9]{{4,}})",
        MONTHS.join("|")
    );
    Regex::new(&pattern).expect("month pattern is valid")
});

const RULES: &[&str] = &[
    "Return ONLY the SQL query, nothing else",
    "The query must return a single number",
    "Use COALESCE(SUM(...), 0) or COALESCE(COUNT(...), 0) to handle NULL values",
    "For date filtering, use DATE(created_at) = 'YYYY-MM-DD' format",
    "creator_id and video_id are strings, use single quotes: 'abc123'",
    "Use table \"videos\" for final statistics (total views, likes, etc)",
    "Use table \"video_snapshots\" for growth/delta queries",
    "For \"how many videos received views on date X\": SELECT COUNT(DISTINCT video_id) FROM video_snapshots WHERE DATE(created_at) = 'X' AND delta_views_count > 0",
    "For \"how much did views grow on date X\": SELECT COALESCE(SUM(delta_views_count), 0) FROM video_snapshots WHERE DATE(created_at) = 'X'",
    "Never use JOIN unless explicitly required",
    "Only use tables listed in the schema",
    "Do not invent columns",
];

const EXAMPLES: &[(&str, &str)] = &[
    ("How many videos are there?", "SELECT COUNT(*) FROM videos"),
    (
        "How many videos got more than 100000 views?",
        "SELECT COUNT(*) FROM videos WHERE views_count > 100000",
    ),
    (
        "How much did views grow on 2025-11-28?",
        "SELECT COALESCE(SUM(delta_views_count), 0) FROM video_snapshots WHERE DATE(created_at) = '2025-11-28'",
    ),
    (
        "How many videos received new views on 2025-11-27?",
        "SELECT COUNT(DISTINCT video_id) FROM video_snapshots WHERE DATE(created_at) = '2025-11-27' AND delta_views_count > 0",
    ),
];

/// Rewrites every "day month-name year" phrase to `YYYY-MM-DD`.
///
/// The year may run straight into a suffix ("2025г"), but not into more
/// digits. Anything that does not form a real calendar date is left as written.
pub fn normalize(query: &str) -> String {
    DATE_PHRASE
        .replace_all(query, |caps: &Captures| {
            let original = caps[0].to_string();
            if caps[3].len() != 4 {
                return original;
            }
            let month_name = caps[2].to_lowercase();
            let Some(month) = MONTHS.iter().position(|m| *m == month_name) else {
                return original;
            };
            let (Ok(day), Ok(year)) = (caps[1].parse::<u32>(), caps[3].parse::<i32>()) else {
                return original;
            };
            match NaiveDate::from_ymd_opt(year, month as u32 + 1, day) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => original,
            }
        })
        .into_owned()
}

/// Assembles the text-to-SQL prompt around a fixed schema.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    schema: SchemaDescriptor,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(VIDEO_SCHEMA)
    }
}

impl PromptBuilder {
    pub fn new(schema: SchemaDescriptor) -> Self {
        Self { schema }
    }

    /// Builds the prompt for an already-normalized question.
    pub fn build(&self, question: &str) -> String {
        let rules = RULES
            .iter()
            .map(|rule| format!("- {}", rule))
            .collect::<Vec<_>>()
            .join("\n");

        let examples = EXAMPLES
            .iter()
            .map(|(q, sql)| format!("Question: \"{}\"\nSQL: {}", q, sql))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            r#"
### Task
Generate a SQL query to answer the following question: `{}`
The question may be written in Russian.
First, mentally translate it to English, then generate SQL.

### Database Schema
{}
### Instructions
{}

### Examples
{}

### SQL Query
"#,
            question,
            self.schema.to_ddl(),
            rules,
            examples
        );

        debug!("Prepared LLM prompt: {}", prompt);
        prompt
    }

    /// Normalizes the raw user question and builds its prompt.
    pub fn prompt_for(&self, user_query: &str) -> String {
        self.build(&normalize(user_query))
    }
}
