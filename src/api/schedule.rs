use crate::api::types::{BlockKind, ScheduleBlock};

#[derive(Debug, Default)]
struct RawRecord {
    start: Option<String>,
    end: Option<String>,
    text: Option<String>,
    type_name: Option<String>,
    depth: Option<String>,
    is_parallel: Option<String>,
    order: Option<String>,
}

impl RawRecord {
    fn set(&mut self, key: &str, value: String) {
        match key {
            "start" => self.start = Some(value),
            "end" => self.end = Some(value),
            "text" => self.text = Some(value),
            "type" => self.type_name = Some(value),
            "depth" => self.depth = Some(value),
            "is_parallel" => self.is_parallel = Some(value),
            "order" => self.order = Some(value),
            _ => {}
        }
    }

    fn into_block(self) -> ScheduleBlock {
        let type_name = self.type_name.unwrap_or_default().to_lowercase();
        ScheduleBlock {
            start_minute: self.start.as_deref().and_then(parse_clock_minute),
            end_minute: self.end.as_deref().and_then(parse_clock_minute),
            text: self.text.unwrap_or_default(),
            kind: BlockKind::from_type_name(&type_name),
            type_name,
            depth: parse_int_or_zero(self.depth.as_deref()),
            is_parallel: self
                .is_parallel
                .as_deref()
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            order: parse_int_or_zero(self.order.as_deref()),
        }
    }
}

/// Parses the loosely structured `/api/today` body into schedule blocks.
///
/// Nothing here is fatal: lines that don't fit are skipped and unparseable
/// times become `None`.
pub fn parse_schedule(body: &str) -> Vec<ScheduleBlock> {
    let mut blocks = Vec::new();
    let mut in_blocks = false;
    let mut current: Option<RawRecord> = None;

    for raw_line in body.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if !in_blocks {
            in_blocks = is_blocks_header(line);
            continue;
        }

        if let Some(rest) = line.strip_prefix('-') {
            if let Some(done) = current.take() {
                blocks.push(done.into_block());
            }
            let mut record = RawRecord::default();
            if let Some((key, value)) = split_field(rest) {
                record.set(&key, value);
            }
            current = Some(record);
            continue;
        }

        // A field outside of any record has nowhere to go
        if let (Some(record), Some((key, value))) = (current.as_mut(), split_field(line)) {
            record.set(&key, value);
        }
    }

    if let Some(done) = current {
        blocks.push(done.into_block());
    }
    blocks
}

/// Parses `H:MM`, `HH:MM` or `HH:MM:SS` into a minute of the day.
pub fn parse_clock_minute(value: &str) -> Option<u32> {
    let value = unquote(value.trim());
    let mut parts = value.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes_part = parts.next()?.trim();
    if minutes_part.len() != 2 {
        return None;
    }
    let minutes: u32 = minutes_part.parse().ok()?;
    if let Some(seconds) = parts.next() {
        let seconds: u32 = seconds.trim().parse().ok()?;
        if seconds >= 60 {
            return None;
        }
    }
    if parts.next().is_some() || hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn is_blocks_header(line: &str) -> bool {
    let normalized = line
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches(':')
        .trim();
    normalized.eq_ignore_ascii_case("blocks")
}

fn split_field(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim().to_lowercase();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_int_or_zero(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
