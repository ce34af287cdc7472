//! `ServiceGenre.csv`: the genre taxonomy.
//!
//! One file, one header line, rows tagged by a type column:
//!
//! ```text
//! termId ; type    ; order ; parentId ; name | replayGenreId
//! S1     ; service ; 1     ;          ; News
//! R1     ; replay  ; 2     ;          ; Replay News
//! S1     ; mapping ; 3     ; P1       ; R1
//! ```
//!
//! Column 4 holds the name for `service` and `replay` rows and the replay
//! genre id for `mapping` rows. A mapping row's name is the name of the
//! service or replay row carrying the same term id.

use std::collections::HashMap;

use super::parse_int;
use crate::config::ConvertOptions;
use crate::error::ExtractResult;
use crate::logs::log_debug;
use crate::models::{Classifications, Genre, ReplayGenre, ServiceGenre};
use crate::parser::{read_rows, Row};

const TERM_ID: usize = 0;
const GENRE_TYPE: usize = 1;
const ORDER: usize = 2;
const PARENT_ID: usize = 3;
const NAME_OR_REPLAY_ID: usize = 4;

pub fn read_service_genres(options: &ConvertOptions) -> ExtractResult<Classifications> {
    let file = options.files.service_genre.as_str();
    let rows = read_rows(&options.input_path(file), options.delimiter, 1)?;
    build_classifications(&rows, file)
}

fn build_classifications(rows: &[Row], file: &str) -> ExtractResult<Classifications> {
    let names = genre_names(rows);
    let mut genres = Classifications::default();

    for row in rows {
        if row.len() < 2 {
            continue;
        }
        let term_id = row.cell(TERM_ID).unwrap_or_default().to_string();

        match row.cell(GENRE_TYPE).unwrap_or_default() {
            "service" => genres.service_genre.push(ServiceGenre {
                id: term_id,
                name: row.cell(NAME_OR_REPLAY_ID).unwrap_or_default().to_string(),
                applications: Vec::new(),
                default: "false".to_string(),
                order: parse_order(row, file)?,
            }),
            "replay" => genres.replay_genre.push(ReplayGenre {
                id: term_id,
                name: row.cell(NAME_OR_REPLAY_ID).unwrap_or_default().to_string(),
                order: parse_order(row, file)?,
            }),
            "mapping" => genres.genre.push(Genre {
                name: names.get(term_id.as_str()).map(|n| n.to_string()),
                order: parse_order(row, file)?,
                parent_id: row.non_empty(PARENT_ID).map(str::to_string),
                replay_genre_id: row.non_empty(NAME_OR_REPLAY_ID).map(str::to_string),
                id: term_id,
            }),
            other => log_debug(format!(
                "{} line {}: ignoring genre type '{}'",
                file, row.line, other
            )),
        }
    }

    Ok(genres)
}

/// Term id to name, from `service` and `replay` rows.
fn genre_names(rows: &[Row]) -> HashMap<&str, &str> {
    rows.iter()
        .filter(|row| row.len() >= 5)
        .filter(|row| matches!(row.cell(GENRE_TYPE), Some("service" | "replay")))
        .filter_map(|row| Some((row.cell(TERM_ID)?, row.cell(NAME_OR_REPLAY_ID)?)))
        .collect()
}

/// Blank or missing order counts as 0.
fn parse_order(row: &Row, file: &str) -> ExtractResult<i64> {
    match row.non_empty(ORDER) {
        Some(order) => parse_int(order, file, row.line, "order"),
        None => Ok(0),
    }
}
