//! A simple CLI tool for auditing an election ledger results dump.
//! It re-checks the dump with the same rules the server uses, so any dump
//! returned by `GET /elections/<election_id>/results` should pass.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use election_ledger::model::api::{
    candidate::CandidateDetails,
    election::{AuditError, ElectionResults},
};

const PROGRAM_NAME: &str = "audit-ledger";

const ABOUT_TEXT: &str = "Audit an election ledger results dump.

EXIT CODES:
     0: Audit succeeded.
   255: Ran successfully, but the dump does not add up.
 Other: Error.";

const RESULTS_PATH: &str = "RESULTS_PATH";

const RESULTS_PATH_HELP: &str = "The path to a JSON dump of a specific election,\n\
as returned by `GET /elections/<election_id>/results`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(RESULTS_PATH)
            .help(RESULTS_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
    /// The audit failed for the contained reason.
    Audit(AuditError),
}

/// One line of the final standings.
#[derive(Debug, Eq, PartialEq)]
struct Standing {
    pub candidate_name: String,
    pub votes: u64,
    pub leading: bool,
}

impl Display for Standing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}{}",
            self.candidate_name,
            self.votes,
            if self.votes != 1 { "s" } else { "" },
            if self.leading { " (leader)" } else { "" }
        )
    }
}

/// Run the audit and produce the standings, highest tally first.
fn audit(path: &str) -> Result<(ElectionResults, Vec<Standing>), Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let results: ElectionResults =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    results.audit().map_err(Error::Audit)?;

    // Stable sort keeps ID order among equal tallies, matching the tie-break.
    let mut candidates: Vec<&CandidateDetails> = results.candidates.iter().collect();
    candidates.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    let standings = candidates
        .into_iter()
        .map(|candidate| Standing {
            candidate_name: candidate.name.clone(),
            votes: candidate.vote_count,
            leading: results.leader == Some(candidate.id),
        })
        .collect();

    Ok((results, standings))
}

/// Run the audit, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(RESULTS_PATH).unwrap(); // Required argument is guaranteed to be present.
    match audit(path) {
        Ok((results, standings)) => {
            println!("Audit succeeded.");
            println!(
                "Election {} \"{}\" ({}), {} ballot{} cast.",
                results.election.id,
                results.election.title,
                if results.election.is_active {
                    "still open"
                } else {
                    "ended"
                },
                results.voters.len(),
                if results.voters.len() != 1 { "s" } else { "" }
            );
            for standing in standings {
                println!("{}", standing);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
        Err(Error::Audit(err)) => {
            let msg = match err {
                AuditError::CandidateCount { reported, listed } => format!(
                    "The election reports {} candidates but {} are listed.",
                    reported, listed
                ),
                AuditError::CandidateNumbering { position, found } => format!(
                    "Candidate at position {} has ID {}, expected {}.",
                    position,
                    found,
                    position + 1
                ),
                AuditError::TallyMismatch { tallied, voters } => format!(
                    "The tallies add up to {} votes but {} voters are recorded.",
                    tallied, voters
                ),
                AuditError::WrongLeader { reported, expected } => format!(
                    "The reported leader is {} but the tallies give {}.",
                    describe(reported),
                    describe(expected)
                ),
            };
            println!("Audit failed: {}", msg);
            255
        }
    }
}

fn describe(candidate: Option<u32>) -> String {
    candidate
        .map(|id| format!("candidate {}", id))
        .unwrap_or_else(|| "nobody".to_string())
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_dumps() {
        let (results, standings) = audit("example_dumps/mayor.json").unwrap();
        assert_eq!(results.election.title, "Mayor Election");
        let expected = vec![
            Standing {
                candidate_name: "Alice".to_string(),
                votes: 2,
                leading: true,
            },
            Standing {
                candidate_name: "Bob".to_string(),
                votes: 1,
                leading: false,
            },
            Standing {
                candidate_name: "Carol".to_string(),
                votes: 0,
                leading: false,
            },
        ];
        assert_eq!(standings, expected);

        assert_eq!(
            audit("example_dumps/tampered.json").map(|(_, standings)| standings),
            Err(Error::Audit(AuditError::TallyMismatch {
                tallied: 4,
                voters: 3
            }))
        );

        assert!(matches!(
            audit("example_dumps/does-not-exist.json"),
            Err(Error::IO(_))
        ));
    }
}
