//! `Channel Lineup.csv`: one row per placement of a channel in a lineup.

use super::{parse_int, KeyedMap};
use crate::config::ConvertOptions;
use crate::error::ExtractResult;
use crate::models::{Lineup, LineupChannel};
use crate::parser::read_records;

/// Lineups in first-seen order, each keeping its first `LineupName` and its
/// placements in row order. `ChannelNumber` must be an integer.
pub fn read_channel_lineup(options: &ConvertOptions) -> ExtractResult<Vec<Lineup>> {
    let file = options.files.channel_lineup.as_str();
    let records = read_records(&options.input_path(file), options.delimiter)?;

    let mut lineups: KeyedMap<Lineup> = KeyedMap::new();
    for record in &records {
        let Some(lineup_id) = record.non_empty("LineupID") else {
            continue;
        };

        let channel_number = parse_int(
            record.get("ChannelNumber").unwrap_or_default(),
            file,
            record.line,
            "ChannelNumber",
        )?;

        let lineup = lineups.get_or_insert_with(lineup_id, || Lineup {
            id: lineup_id.to_string(),
            name: record.get("LineupName").map(str::to_string),
            channels: Vec::new(),
        });
        lineup.channels.push(LineupChannel {
            service_id: record.get("ServiceID").map(str::to_string),
            channel_number,
        });
    }

    Ok(lineups.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::extract::testutil::input_dir;

    #[test]
    fn test_grouped_by_lineup_in_row_order() {
        let csv = "LineupID;LineupName;ServiceID;ChannelNumber\n\
            L1;Basic;101;1\n\
            L2;Premium;201;100\n\
            L1;Renamed;102;2\n";
        let (_dir, options) = input_dir(&[("Channel Lineup.csv", csv)]);
        let lineups = read_channel_lineup(&options).unwrap();

        assert_eq!(lineups.len(), 2);
        assert_eq!(lineups[0].id, "L1");
        assert_eq!(lineups[0].name.as_deref(), Some("Basic"));
        let placements: Vec<_> = lineups[0]
            .channels
            .iter()
            .map(|c| (c.service_id.as_deref().unwrap(), c.channel_number))
            .collect();
        assert_eq!(placements, vec![("101", 1), ("102", 2)]);
        assert_eq!(lineups[1].channels[0].channel_number, 100);
    }

    #[test]
    fn test_non_numeric_channel_number_is_fatal() {
        let csv = "LineupID;LineupName;ServiceID;ChannelNumber\nL1;Basic;101;one\n";
        let (_dir, options) = input_dir(&[("Channel Lineup.csv", csv)]);
        let err = read_channel_lineup(&options).unwrap_err();

        match err {
            ExtractError::InvalidInteger { column, value, line, .. } => {
                assert_eq!(column, "ChannelNumber");
                assert_eq!(value, "one");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_channel_number_is_fatal() {
        let csv = "LineupID;LineupName;ServiceID;ChannelNumber\nL1;Basic;101\n";
        let (_dir, options) = input_dir(&[("Channel Lineup.csv", csv)]);
        assert!(read_channel_lineup(&options).is_err());
    }

    #[test]
    fn test_rows_without_lineup_id_skipped() {
        let csv = "LineupID;LineupName;ServiceID;ChannelNumber\n;Basic;101;x\nL1;Basic;101;5\n";
        let (_dir, options) = input_dir(&[("Channel Lineup.csv", csv)]);
        let lineups = read_channel_lineup(&options).unwrap();
        assert_eq!(lineups.len(), 1);
        assert_eq!(lineups[0].channels.len(), 1);
    }
}
