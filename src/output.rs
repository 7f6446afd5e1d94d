//! Flat-file output: one `path,win,loss,kills,deaths,headshot,adr,rounds`
//! line per player, no header.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::scraper::player::{PlayerRecord, PlayerStats};

const FIELDS: usize = 8;

/// Replace the contents of `path` with `players`, in order.
///
/// Rows go to a sibling temp file that is renamed over the target, so an
/// interrupted write never leaves a truncated file behind.
pub fn write_players(path: &Path, players: &[PlayerRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let tmp_path = temp_path(path);
    let result = write_rows(&tmp_path, players).and_then(|_| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    info!("Wrote {} players to {}", players.len(), path.display());
    Ok(())
}

fn write_rows(path: &Path, players: &[PlayerRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;

    for player in players {
        if player.path.contains([',', '"', '\n', '\r']) {
            warn!("Player path needs quoting in output: {:?}", player.path);
        }
        writer.write_record(to_row(player))?;
    }

    writer.flush()?;
    Ok(())
}

fn to_row(player: &PlayerRecord) -> [String; FIELDS] {
    [
        player.path.clone(),
        player.win.to_string(),
        player.loss.to_string(),
        player.stats.kills.to_string(),
        player.stats.deaths.to_string(),
        player.stats.headshot.to_string(),
        player.stats.adr.to_string(),
        player.stats.rounds.to_string(),
    ]
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a file written by [`write_players`].
pub fn read_players(path: &Path) -> Result<Vec<PlayerRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut players = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != FIELDS {
            return Err(bad_line(line, format!("expected {} fields, found {}", FIELDS, record.len())));
        }

        let field = |i: usize| &record[i];
        let number = |i: usize, name: &str| -> Result<f64> {
            field(i)
                .parse::<f64>()
                .map_err(|_| bad_line(line, format!("{} is not a number: '{}'", name, field(i))))
        };
        let count = |i: usize, name: &str| -> Result<u32> {
            field(i)
                .parse::<u32>()
                .map_err(|_| bad_line(line, format!("{} is not a count: '{}'", name, field(i))))
        };

        players.push(PlayerRecord {
            path: field(0).to_string(),
            win: count(1, "win")?,
            loss: count(2, "loss")?,
            stats: PlayerStats {
                kills: count(3, "kills")?,
                deaths: count(4, "deaths")?,
                headshot: number(5, "headshot")?,
                adr: number(6, "adr")?,
                rounds: count(7, "rounds")?,
            },
        });
    }

    Ok(players)
}

fn bad_line(line: usize, detail: String) -> ScrapeError {
    ScrapeError::Format {
        line: line + 1,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, win: u32, loss: u32, headshot: f64) -> PlayerRecord {
        PlayerRecord {
            path: path.to_string(),
            win,
            loss,
            stats: PlayerStats {
                kills: 22593,
                deaths: 16302,
                headshot,
                adr: 87.4,
                rounds: 30226,
            },
        }
    }

    #[test]
    fn test_write_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");

        write_players(&path, &[record("7998/s1mple", 5, 2, 42.1)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "7998/s1mple,5,2,22593,16302,42.1,87.4,30226\n");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");
        let players = vec![
            record("7998/s1mple", 5, 2, 42.1),
            record("11893/zywoo", 0, 3, 38.0),
            record("9216/apex", 12, 9, 51.25),
        ];

        write_players(&path, &players).unwrap();
        let read = read_players(&path).unwrap();

        assert_eq!(read, players);
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");

        write_players(&path, &[record("1/a", 1, 0, 1.0), record("2/b", 0, 1, 1.0)]).unwrap();
        write_players(&path, &[record("3/c", 2, 2, 1.0)]).unwrap();

        let read = read_players(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].path, "3/c");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("raw_data").join("raw_data.csv");

        write_players(&path, &[]).unwrap();
        assert!(path.exists());
        assert!(read_players(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_short_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");
        fs::write(&path, "1/a,1,0,10\n").unwrap();

        let err = read_players(&path).unwrap_err();
        match err {
            ScrapeError::Format { line, detail } => {
                assert_eq!(line, 1);
                assert_eq!(detail, "expected 8 fields, found 4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_bad_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");
        fs::write(
            &path,
            "1/a,1,0,10,5,40.5,70.2,100\n2/b,x,0,10,5,40.5,70.2,100\n",
        )
        .unwrap();

        let err = read_players(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed player file, line 2: win is not a count: 'x'"
        );
    }

    #[test]
    fn test_read_accepts_spaced_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_data.csv");
        fs::write(&path, "1/a, 1, 0, 10, 5, 40.5, 70.2, 100\n").unwrap();

        let read = read_players(&path).unwrap();
        assert_eq!(read[0].stats.deaths, 5);
        assert_eq!(read[0].stats.headshot, 40.5);
    }
}
