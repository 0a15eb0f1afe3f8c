use anyhow::{bail, Result};
use tracing::warn;

use crate::db::Database;
use crate::i18n::Messages;
use crate::models::{Direction, Suggestion};
use crate::settings::Settings;
use crate::store::Repository;
use crate::vote::{LocalVote, VoteEngine, VoteOutcome, VoteState};

/// Cast or toggle a vote. Creates the voter identity on first use; the
/// caller persists `settings` afterwards. Returns the count the client now
/// believes in.
pub fn run(db: &Database, settings: &mut Settings, id: &str, direction: Direction) -> Result<i64> {
    let messages = settings.messages();
    let suggestion = match db.get_suggestion(id)? {
        Some(s) => s,
        None => bail!("Suggestion {} not found", id),
    };
    let voter = settings.voter_id_or_create().to_string();

    // One vote per invocation, so nothing is in flight yet
    let mut engine = VoteEngine::new();
    cast(db, &mut engine, &voter, &suggestion, direction, messages)
}

/// Run one click through `engine` and print the resulting toast. A click on a
/// suggestion whose previous vote is still pending changes nothing.
pub fn cast(
    db: &Database,
    engine: &mut VoteEngine,
    voter: &str,
    suggestion: &Suggestion,
    direction: Direction,
    messages: &Messages,
) -> Result<i64> {
    // A failed lookup counts as no prior vote
    let prior = match db.list_votes_for(voter, std::slice::from_ref(&suggestion.id)) {
        Ok(votes) => votes.first().map(|v| v.direction),
        Err(e) => {
            warn!(error = %e, "could not load prior vote");
            None
        }
    };

    let mut local = LocalVote::new(suggestion.vote_count, VoteState::from(prior));
    let Some(pending) = engine.begin(&suggestion.id, &mut local, direction) else {
        println!("{}", messages.toast_vote_pending);
        return Ok(local.count);
    };

    match engine.reconcile(db, voter, &pending, &mut local) {
        Ok(VoteOutcome::Recorded(_)) => println!("{}", messages.toast_vote_success),
        Ok(VoteOutcome::Removed) => println!("{}", messages.toast_vote_removed),
        Err(e) => return Err(anyhow::Error::new(e).context(messages.toast_vote_error)),
    }
    println!("{}: {}", suggestion.title, (messages.votes)(local.count));

    Ok(local.count)
}
