use crate::{FIRST_NAME_COLUMN, LAST_NAME_COLUMN, Player, Roster, TEAMS_COLUMN};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("header row could not be read: {0}")]
    Header(String),
    #[error("record at line {line} could not be read: {message}")]
    Record { line: u64, message: String },
    #[error("quoted field opened at line {line} is never closed")]
    UnterminatedQuote { line: u64 },
}

/// Output of [`decode`]. When `errors` is non-empty the roster is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub roster: Roster,
    pub errors: Vec<DecodeError>,
}

impl Decoded {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode headered CSV bytes into typed player rows.
///
/// Never fails outright: short rows get `""` for the missing columns, and a
/// stream that cannot be read at all yields an empty roster plus the errors
/// encountered.
pub fn decode(raw: &[u8]) -> Decoded {
    // The reader would fold everything after a dangling quote into one field.
    if let Some(line) = unterminated_quote_line(raw) {
        warn!("csv quote opened at line {line} never closes, discarding rows");
        return Decoded {
            roster: Roster::default(),
            errors: vec![DecodeError::UnterminatedQuote { line }],
        };
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => unique_headers(h.iter()),
        Err(e) => {
            warn!("csv header unreadable: {e}");
            return Decoded {
                roster: Roster::default(),
                errors: vec![DecodeError::Header(e.to_string())],
            };
        }
    };

    let mut players = Vec::new();
    let mut errors = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => players.push(player_from_record(&headers, &record)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                errors.push(DecodeError::Record { line, message: e.to_string() });
            }
        }
    }

    if !errors.is_empty() {
        warn!("csv decode failed with {} error(s), discarding rows", errors.len());
        return Decoded { roster: Roster::default(), errors };
    }

    debug!("decoded {} rows across {} columns", players.len(), headers.len());
    Decoded {
        roster: Roster { headers, players },
        errors,
    }
}

/// Line (1-based) of a quoted field that runs to the end of input.
///
/// Quotes only open a field at its first byte; elsewhere in an unquoted field
/// they are literal. Inside a quoted field `""` is an escaped quote.
fn unterminated_quote_line(raw: &[u8]) -> Option<u64> {
    let mut line = 1;
    let mut field_start = true;
    let mut open_at = None;
    let mut bytes = raw.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if open_at.is_some() {
            match b {
                b'"' if bytes.peek() == Some(&b'"') => {
                    bytes.next();
                }
                b'"' => open_at = None,
                b'\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' if field_start => open_at = Some(line),
            b'\n' => line += 1,
            _ => {}
        }
        field_start = matches!(b, b',' | b'\n' | b'\r');
    }

    open_at
}

/// Header names made unique: a repeated name gets `_1`, `_2`, ... appended
/// so each column keeps its own value.
fn unique_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for name in names {
        let mut unique = name.to_string();
        let mut n = 0;
        while headers.contains(&unique) {
            n += 1;
            unique = format!("{name}_{n}");
        }
        if unique != name {
            warn!("duplicate csv column {name:?} renamed to {unique:?}");
        }
        headers.push(unique);
    }
    headers
}

fn player_from_record(headers: &[String], record: &StringRecord) -> Player {
    if record.len() > headers.len() {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        warn!(
            "line {line}: {} fields for {} columns, ignoring the extras",
            record.len(),
            headers.len()
        );
    }

    let mut player = Player::default();
    for (i, column) in headers.iter().enumerate() {
        let value = record.get(i).unwrap_or_default().to_string();
        match column.as_str() {
            FIRST_NAME_COLUMN => player.first_name = value,
            LAST_NAME_COLUMN => player.last_name = value,
            TEAMS_COLUMN => player.teams = value,
            _ => {
                player.extra.insert(column.clone(), value);
            }
        }
    }
    player
}

/// Re-encode a roster as headered CSV, columns in the roster's header order.
pub fn encode(roster: &Roster) -> Result<String, csv::Error> {
    if roster.headers.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&roster.headers)?;
    for player in &roster.players {
        writer.write_record(
            roster
                .headers
                .iter()
                .map(|h| player.field(h).unwrap_or_default()),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
