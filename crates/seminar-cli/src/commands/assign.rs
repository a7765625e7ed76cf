//! The `seminar assign` and `seminar unassign` commands.

use std::path::Path;

use anyhow::Result;

use super::Seminar;

pub fn submission(
    data: Option<&Path>,
    config: Option<&Path>,
    session: &str,
    submission: &str,
    assign: bool,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    if assign {
        seminar.repo.assign_submission(session, submission)?;
        let board = seminar
            .repo
            .find_submission(submission)
            .map(|s| s.board_id)
            .filter(|b| !b.is_empty());
        match board {
            Some(board) => println!("Assigned {submission} to {session} (board {board})"),
            None => println!("Assigned {submission} to {session}"),
        }
    } else {
        seminar.repo.unassign_submission(session, submission)?;
        println!("Removed {submission} from {session}");
    }
    Ok(())
}

pub fn evaluator(
    data: Option<&Path>,
    config: Option<&Path>,
    session: &str,
    evaluator: &str,
    assign: bool,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    if assign {
        seminar.repo.assign_evaluator(session, evaluator)?;
        println!("Assigned {evaluator} to {session}");
    } else {
        seminar.repo.unassign_evaluator(session, evaluator)?;
        println!("Removed {evaluator} from {session}");
    }
    Ok(())
}
