use indexmap::IndexMap;
use rust_decimal::Decimal;
use tripsplit_application::{
    Command, Ledger, LedgerParseError, LedgerParser, LedgerStatement, LedgerStatementWithLine,
};
use tripsplit_domain::{Money, ParticipantId, SplitInput, SplitRequest};
use tripsplit_parser::{
    Command as ParserCommand, ParseError, ShareList, Statement as ParserStatement, parse_ledger,
};

#[derive(Default)]
pub struct TripsplitLedgerParser;

impl LedgerParser for TripsplitLedgerParser {
    fn parse(&self, content: &str) -> Result<Ledger, LedgerParseError> {
        let ledger = parse_ledger(content).map_err(map_parse_error)?;

        let statements = ledger
            .statements
            .into_iter()
            .map(|stmt| LedgerStatementWithLine {
                line: stmt.line,
                statement: to_ledger_statement(stmt.statement),
            })
            .collect();

        Ok(Ledger::new(statements))
    }
}

fn map_parse_error(err: ParseError) -> LedgerParseError {
    match err {
        ParseError::MissingMembers { line } => LedgerParseError::MissingMembers { line },
        ParseError::SyntaxError { line, detail } => LedgerParseError::SyntaxError { line, detail },
    }
}

fn to_ledger_statement(statement: ParserStatement<'_>) -> LedgerStatement {
    match statement {
        ParserStatement::Members(names) => {
            LedgerStatement::Members(names.into_iter().map(ParticipantId::from).collect())
        }
        ParserStatement::Expense(expense) => {
            let participants = expense
                .shares
                .names()
                .into_iter()
                .map(ParticipantId::from)
                .collect();
            LedgerStatement::Expense(SplitRequest {
                title: expense.title.map(str::to_string),
                amount: Money::from_decimal(expense.amount),
                payer: expense.payer.into(),
                participants,
                method: to_split_input(expense.shares),
            })
        }
        ParserStatement::Command(command) => LedgerStatement::Command(match command {
            ParserCommand::Balances => Command::Balances,
            ParserCommand::Settle => Command::Settle,
            ParserCommand::Drop(name) => Command::Drop(name.into()),
        }),
    }
}

fn to_split_input(shares: ShareList<'_>) -> SplitInput {
    match shares {
        ShareList::Equal(_) => SplitInput::Equal,
        ShareList::Amounts(entries) => SplitInput::Manual(
            entries
                .into_iter()
                .map(|(name, amount)| (ParticipantId::from(name), Money::from_decimal(amount)))
                .collect::<IndexMap<_, _>>(),
        ),
        ShareList::Percentages(entries) => SplitInput::Percentage(
            entries
                .into_iter()
                .map(|(name, percent)| (ParticipantId::from(name), percent))
                .collect::<IndexMap<ParticipantId, Decimal>>(),
        ),
    }
}
