mod bootstrap;
mod replay;

use std::{borrow::Cow, env, fs, process};

use bootstrap::{AppConfig, init_logging};
use tripsplit_application::{ExpenseService, LedgerParser};
use tripsplit_domain::{SettlementEngine, SplitResolver};
use tripsplit_infrastructure::{InMemoryExpenseStore, TripsplitLedgerParser};
use tripsplit_presentation::format_ledger_parse_error;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    init_logging();

    let Some(path) = env::args().nth(1) else {
        return Err("Usage: tripsplit <ledger-file>".into());
    };

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;
    let ledger = TripsplitLedgerParser
        .parse(&source)
        .map_err(|err| format_ledger_parse_error(&err))?;

    let store = InMemoryExpenseStore::new();
    let service = ExpenseService::new(
        &store,
        SplitResolver::new(config.split_context),
        SettlementEngine::new(config.stale_policy),
    );

    let output = replay::replay(&service, &config, &ledger)?;
    print!("{output}");
    Ok(())
}
