//! Roster rules: participant names and CSV import/export.

use crate::models::{Participant, ParticipantId, TournamentError, TournamentResult};
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Names loaded into an empty roster on request.
pub const DEFAULT_ROSTER: [&str; 6] = ["Nacho", "Pelao", "Tancio", "Benjamin", "Migue", "Basti"];

/// Trim `name` and check it is non-empty and not taken (case-insensitive) by
/// anyone in `roster` other than `except`.
pub fn validate_name(
    name: &str,
    roster: &[Participant],
    except: Option<ParticipantId>,
) -> TournamentResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::validation("Participant name cannot be empty"));
    }
    if roster
        .iter()
        .any(|p| Some(p.id) != except && p.has_name(trimmed))
    {
        return Err(TournamentError::validation(
            "A participant with this name already exists",
        ));
    }
    Ok(trimmed.to_string())
}

/// One CSV row: `name,avatar`.
#[derive(Debug, Deserialize, Serialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    avatar: Option<String>,
}

/// Read participants from CSV with a `name,avatar` header.
///
/// Rows whose name is empty or already present (in `roster` or earlier in the
/// file) are skipped; the new participants are returned in file order.
pub fn import_csv<R: Read>(reader: R, roster: &[Participant]) -> Result<Vec<Participant>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut known = roster.to_vec();
    let first_new = known.len();
    for row in rdr.deserialize::<RosterRow>() {
        let row = row?;
        match validate_name(&row.name, &known, None) {
            Ok(name) => {
                let mut p = Participant::new(name);
                p.avatar = row.avatar.filter(|a| !a.is_empty());
                known.push(p);
            }
            Err(e) => log::warn!("Skipping roster row '{}': {}", row.name, e),
        }
    }
    Ok(known.split_off(first_new))
}

/// Write the roster as CSV with a `name,avatar` header.
pub fn export_csv<W: Write>(writer: W, roster: &[Participant]) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for p in roster {
        wtr.serialize(RosterRow {
            name: p.name.clone(),
            avatar: p.avatar.clone(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_unique_ignoring_case() {
        let roster = vec![Participant::new("Nacho")];
        assert_eq!(validate_name("  Migue ", &roster, None).unwrap(), "Migue");
        assert!(matches!(
            validate_name("NACHO", &roster, None),
            Err(TournamentError::Validation(_))
        ));
        assert!(validate_name("nacho", &roster, Some(roster[0].id)).is_ok());
        assert!(validate_name("   ", &roster, None).is_err());
    }

    #[test]
    fn csv_import_skips_duplicates_and_blanks() {
        let roster = vec![Participant::new("Pelao")];
        let data = "name,avatar\nTancio,⚽\npelao,\n,\nBasti,\ntancio,x\n";
        let added = import_csv(data.as_bytes(), &roster).unwrap();
        let names: Vec<&str> = added.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tancio", "Basti"]);
        assert_eq!(added[0].avatar.as_deref(), Some("⚽"));
        assert_eq!(added[1].avatar, None);
    }

    #[test]
    fn csv_export_then_import_into_empty_roster() {
        let roster = vec![Participant::new("Benjamin").with_avatar("b.png"), Participant::new("Migue")];
        let mut out = Vec::new();
        export_csv(&mut out, &roster).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("name,avatar\n"));
        let added = import_csv(text.as_bytes(), &[]).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].avatar.as_deref(), Some("b.png"));
    }
}
