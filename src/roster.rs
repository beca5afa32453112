//! Roster loading from CSV.
//!
//! One row per player, grouped into teams by the `Team` column in the order
//! teams first appear:
//!
//! ```text
//! Team,Name,Power,Agility,Chutzpah,Batting,Pitching,Baserunning,Fielding,Brawling
//! Scorpions,Vera Knox,7,6,8,5,4,6,5,9
//! ```

use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::RosterError;
use crate::game::{Player, Stats, Team};

/// Accepted range for every stat column.
pub const STAT_RANGE: RangeInclusive<i32> = 0..=100;

#[derive(Debug, Deserialize)]
struct RosterRecord {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Power")]
    power: i32,
    #[serde(rename = "Agility")]
    agility: i32,
    #[serde(rename = "Chutzpah")]
    chutzpah: i32,
    #[serde(rename = "Batting")]
    batting: i32,
    #[serde(rename = "Pitching")]
    pitching: i32,
    #[serde(rename = "Baserunning")]
    baserunning: i32,
    #[serde(rename = "Fielding")]
    fielding: i32,
    #[serde(rename = "Brawling")]
    brawling: i32,
}

impl RosterRecord {
    fn into_player(self) -> Result<(String, Player), RosterError> {
        let stats = Stats {
            power: self.power,
            agility: self.agility,
            chutzpah: self.chutzpah,
            batting: self.batting,
            pitching: self.pitching,
            baserunning: self.baserunning,
            fielding: self.fielding,
            brawling: self.brawling,
        };
        let columns = [
            ("Power", stats.power),
            ("Agility", stats.agility),
            ("Chutzpah", stats.chutzpah),
            ("Batting", stats.batting),
            ("Pitching", stats.pitching),
            ("Baserunning", stats.baserunning),
            ("Fielding", stats.fielding),
            ("Brawling", stats.brawling),
        ];
        if let Some(&(stat, value)) = columns.iter().find(|(_, v)| !STAT_RANGE.contains(v)) {
            return Err(RosterError::InvalidStat {
                player: self.name,
                stat,
                value,
            });
        }
        Ok((self.team, Player::new(self.name, stats)))
    }
}

/// Every team in a roster file, pristine.
#[derive(Debug, Clone, Default)]
pub struct Rosters {
    teams: Vec<Team>,
}

impl Rosters {
    /// Parse roster CSV from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Csv`] for malformed rows and
    /// [`RosterError::InvalidStat`] for stats outside [`STAT_RANGE`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut teams: Vec<Team> = Vec::new();
        for record in reader.deserialize::<RosterRecord>() {
            let (team_name, player) = record?.into_player()?;
            match teams.iter_mut().find(|t| t.name == team_name) {
                Some(team) => team.players.push(player),
                None => teams.push(Team::new(team_name, vec![player])),
            }
        }
        Ok(Self { teams })
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the file held no players at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team names in file order.
    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.name.as_str())
    }

    /// All teams in file order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// A fresh copy of the named team.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnknownTeam`] if no team has that name.
    pub fn team(&self, name: &str) -> Result<Team, RosterError> {
        self.teams
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| RosterError::UnknownTeam(name.to_string()))
    }

    /// Draw two distinct teams, away first, with freshly rolled pitching stints.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::TooFewTeams`] when there are fewer than two teams.
    pub fn pick_matchup<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Team, Team), RosterError> {
        if self.teams.len() < 2 {
            return Err(RosterError::TooFewTeams(self.teams.len()));
        }
        let picks = rand::seq::index::sample(rng, self.teams.len(), 2);
        let mut away = self.teams[picks.index(0)].clone();
        let mut home = self.teams[picks.index(1)].clone();
        away.roll_stints(rng);
        home.roll_stints(rng);
        debug!(away = %away.name, home = %home.name, "matchup drawn");
        Ok((away, home))
    }
}

/// Load rosters from a CSV file.
///
/// # Errors
///
/// Returns [`RosterError::Io`] if the file cannot be opened, otherwise as
/// [`Rosters::from_reader`].
#[instrument]
pub fn load_rosters(path: &Path) -> Result<Rosters, RosterError> {
    let file = File::open(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rosters = Rosters::from_reader(file)?;
    debug!(teams = rosters.len(), "rosters loaded");
    Ok(rosters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Write;

    const HEADER: &str =
        "Team,Name,Power,Agility,Chutzpah,Batting,Pitching,Baserunning,Fielding,Brawling\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut data = HEADER.to_string();
        for row in rows {
            data.push_str(row);
            data.push('\n');
        }
        data
    }

    #[test]
    fn test_groups_teams_in_file_order() {
        let data = csv_with(&[
            "Scorpions,Vera Knox,7,6,8,5,4,6,5,9",
            "Aether,Ines Boll,3,4,5,6,7,8,9,1",
            "Scorpions,Dov Marsh,1,2,3,4,5,6,7,8",
        ]);
        let rosters = Rosters::from_reader(data.as_bytes()).unwrap();
        assert_eq!(rosters.len(), 2);
        assert_eq!(rosters.team_names().collect::<Vec<_>>(), ["Scorpions", "Aether"]);

        let scorpions = rosters.team("Scorpions").unwrap();
        assert_eq!(scorpions.players.len(), 2);
        assert_eq!(scorpions.players[1].name, "Dov Marsh");
        assert_eq!(scorpions.players[0].base_stats().brawling, 9);
        assert_eq!(scorpions.players[0].stats(), scorpions.players[0].base_stats());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let data = csv_with(&["Scorpions , Vera Knox , 7, 6, 8, 5, 4, 6, 5, 9"]);
        let rosters = Rosters::from_reader(data.as_bytes()).unwrap();
        assert_eq!(rosters.team("Scorpions").unwrap().players[0].name, "Vera Knox");
    }

    #[test]
    fn test_invalid_stat_rejected() {
        let data = csv_with(&["Scorpions,Vera Knox,7,6,8,5,4,-2,5,9"]);
        match Rosters::from_reader(data.as_bytes()) {
            Err(RosterError::InvalidStat {
                player,
                stat,
                value,
            }) => {
                assert_eq!(player, "Vera Knox");
                assert_eq!(stat, "Baserunning");
                assert_eq!(value, -2);
            }
            other => panic!("expected InvalidStat, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let data = csv_with(&["Scorpions,Vera Knox,seven,6,8,5,4,6,5,9"]);
        assert!(matches!(
            Rosters::from_reader(data.as_bytes()),
            Err(RosterError::Csv(_))
        ));
    }

    #[test]
    fn test_unknown_team() {
        let rosters = Rosters::from_reader(csv_with(&[]).as_bytes()).unwrap();
        assert!(rosters.is_empty());
        assert!(matches!(
            rosters.team("Aether"),
            Err(RosterError::UnknownTeam(name)) if name == "Aether"
        ));
    }

    #[test]
    fn test_matchup_needs_two_teams() {
        let data = csv_with(&["Scorpions,Vera Knox,7,6,8,5,4,6,5,9"]);
        let rosters = Rosters::from_reader(data.as_bytes()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            rosters.pick_matchup(&mut rng),
            Err(RosterError::TooFewTeams(1))
        ));
    }

    #[test]
    fn test_matchup_teams_are_distinct() {
        let data = csv_with(&[
            "Scorpions,Vera Knox,7,6,8,5,4,6,5,9",
            "Aether,Ines Boll,3,4,5,6,7,8,9,1",
            "Gravediggers,Oskar Pell,5,5,5,5,5,5,5,5",
        ]);
        let rosters = Rosters::from_reader(data.as_bytes()).unwrap();
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (away, home) = rosters.pick_matchup(&mut rng).unwrap();
            assert_ne!(away.name, home.name);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv_with(&["Scorpions,Vera Knox,7,6,8,5,4,6,5,9"]).as_bytes())
            .unwrap();
        let rosters = load_rosters(file.path()).unwrap();
        assert_eq!(rosters.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_rosters(&path).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }
}
