use crate::{CliResult, bootstrap::AppConfig};
use tripsplit_application::{Command, ExpenseService, Ledger, LedgerStatement, RosterError};
use tripsplit_domain::{ParticipantId, Roster, SplitRequest};
use tripsplit_presentation::{
    SettlementPresenter, format_at_line, format_roster_error, format_store_error,
    format_submission_error,
};

/// Runs every ledger statement in order and collects what the commands print.
/// When the ledger has no command, the final settlement is printed instead.
pub fn replay(service: &ExpenseService<'_>, config: &AppConfig, ledger: &Ledger) -> CliResult<String> {
    let mut roster = Roster::new();
    let mut sections: Vec<String> = Vec::new();

    for stmt in ledger.statements() {
        let line = stmt.line;
        match &stmt.statement {
            LedgerStatement::Members(names) => {
                roster = redeclare(service, config, &roster, names)
                    .map_err(|err| format_at_line(line, format_roster_error(&err, &config.currency)))?;
                tracing::debug!(line, member_count = roster.len(), "Roster declared");
            }
            LedgerStatement::Expense(request) => {
                check_members(&roster, request)
                    .map_err(|err| format_at_line(line, format_roster_error(&err, &config.currency)))?;
                service
                    .submit(&config.group, request.clone())
                    .map_err(|err| {
                        format_at_line(line, format_submission_error(&err, &config.currency))
                    })?;
            }
            LedgerStatement::Command(Command::Balances) => {
                let balances = service
                    .balances(&config.group, &roster)
                    .map_err(|err| format_at_line(line, format_store_error(&err)))?;
                sections.push(SettlementPresenter::render_balances(&balances, &config.currency));
            }
            LedgerStatement::Command(Command::Settle) => {
                sections.push(render_settlement(service, config, &roster, line)?);
            }
            LedgerStatement::Command(Command::Drop(participant)) => {
                roster = service
                    .remove_participant(&config.group, &roster, participant)
                    .map_err(|err| format_at_line(line, format_roster_error(&err, &config.currency)))?;
            }
        }
    }

    if !ledger.has_command() {
        let last_line = ledger.statements().last().map_or(0, |stmt| stmt.line);
        sections.push(render_settlement(service, config, &roster, last_line)?);
    }

    Ok(sections.join("\n"))
}

fn render_settlement(
    service: &ExpenseService<'_>,
    config: &AppConfig,
    roster: &Roster,
    line: usize,
) -> CliResult<String> {
    let settlement = service
        .settlement(&config.group, roster)
        .map_err(|err| format_at_line(line, format_store_error(&err)))?;
    Ok(SettlementPresenter::render(&settlement, &config.currency))
}

// Members left out of a redeclared roster go through the same guard as `!drop`.
fn redeclare(
    service: &ExpenseService<'_>,
    config: &AppConfig,
    roster: &Roster,
    names: &[ParticipantId],
) -> Result<Roster, RosterError> {
    let mut remaining = roster.clone();
    for participant in roster.iter().filter(|participant| !names.contains(participant)) {
        remaining = service.remove_participant(&config.group, &remaining, participant)?;
    }
    Ok(names.iter().cloned().collect())
}

// Expenses may only name current roster members.
fn check_members(roster: &Roster, request: &SplitRequest) -> Result<(), RosterError> {
    std::iter::once(&request.payer)
        .chain(&request.participants)
        .find(|participant| !roster.contains(participant))
        .map_or(Ok(()), |participant| {
            Err(RosterError::UnknownParticipant {
                participant: participant.clone(),
            })
        })
}
