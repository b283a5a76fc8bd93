//! CSV upload of player rosters and national ranking lists.

use crate::models::{Player, RankingRow, TournamentError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RankingRecord {
    rank: u32,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn csv_error(line: usize, err: csv::Error) -> TournamentError {
    TournamentError::InvalidCsv(format!("row {line}: {err}"))
}

/// Parse `name,email,state,country` rows. Ids are left at 0; the tournament assigns them.
pub fn parse_players_csv<R: Read>(input: R) -> Result<Vec<Player>, TournamentError> {
    let mut players = Vec::new();
    for (i, record) in reader(input).deserialize::<PlayerRecord>().enumerate() {
        let record = record.map_err(|e| csv_error(i + 1, e))?;
        players.push(Player {
            id: 0,
            name: record.name,
            email: non_empty(record.email),
            state: non_empty(record.state),
            country: non_empty(record.country),
        });
    }
    Ok(players)
}

/// Parse `rank,name,email,country` rows of a national ranking list.
pub fn parse_ranking_csv<R: Read>(input: R) -> Result<Vec<RankingRow>, TournamentError> {
    let mut rows = Vec::new();
    for (i, record) in reader(input).deserialize::<RankingRecord>().enumerate() {
        let record = record.map_err(|e| csv_error(i + 1, e))?;
        if record.name.is_empty() {
            return Err(TournamentError::InvalidCsv(format!("row {}: empty name", i + 1)));
        }
        rows.push(RankingRow {
            rank: record.rank,
            name: record.name,
            email: non_empty(record.email),
            country: non_empty(record.country),
        });
    }
    Ok(rows)
}
