#![warn(clippy::uninlined_format_args)]

mod i18n;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while1},
    character::complete::{char, digit1, multispace1},
    combinator::{map_res, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// How one participant entry in a `for` list was written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShareValue {
    Even,
    Amount(Decimal),
    Percent(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareEntry<'a> {
    pub name: &'a str,
    pub value: ShareValue,
}

/// Participant list of an expense, classified by how its entries were written.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareList<'a> {
    Equal(Vec<&'a str>),
    Amounts(Vec<(&'a str, Decimal)>),
    Percentages(Vec<(&'a str, Decimal)>),
}

impl<'a> ShareList<'a> {
    /// Returns `None` when entries of different kinds are mixed.
    pub fn from_entries(entries: &[ShareEntry<'a>]) -> Option<Self> {
        let first = entries.first()?;
        match first.value {
            ShareValue::Even => entries
                .iter()
                .map(|entry| matches!(entry.value, ShareValue::Even).then_some(entry.name))
                .collect::<Option<Vec<_>>>()
                .map(ShareList::Equal),
            ShareValue::Amount(_) => entries
                .iter()
                .map(|entry| match entry.value {
                    ShareValue::Amount(amount) => Some((entry.name, amount)),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(ShareList::Amounts),
            ShareValue::Percent(_) => entries
                .iter()
                .map(|entry| match entry.value {
                    ShareValue::Percent(percent) => Some((entry.name, percent)),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(ShareList::Percentages),
        }
    }

    pub fn names(&self) -> Vec<&'a str> {
        match self {
            ShareList::Equal(names) => names.clone(),
            ShareList::Amounts(entries) | ShareList::Percentages(entries) => {
                entries.iter().map(|(name, _)| *name).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense<'a> {
    pub title: Option<&'a str>,
    pub payer: &'a str,
    pub amount: Decimal,
    pub shares: ShareList<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Balances,
    Settle,
    Drop(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Members(Vec<&'a str>),
    Expense(Expense<'a>),
    Command(Command<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Line {line}: no MEMBERS declaration before this statement.")]
    MissingMembers { line: usize },
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

// Expense lines before classification of the participant list.
struct ExpenseLine<'a> {
    title: Option<&'a str>,
    payer: &'a str,
    amount: Decimal,
    entries: Vec<ShareEntry<'a>>,
}

enum Line<'a> {
    Members(Vec<&'a str>),
    Expense(ExpenseLine<'a>),
    Command(Command<'a>),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

fn decimal(input: &str) -> IResult<&str, Decimal> {
    map_res(
        recognize((digit1, opt((char('.'), digit1)))),
        Decimal::from_str,
    )
    .parse(input)
}

// RM120, RM 12.50, 12.50
fn amount(input: &str) -> IResult<&str, Decimal> {
    preceded(opt((tag_no_case("RM"), sp)), decimal).parse(input)
}

fn title(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"')).parse(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(sp, char(','), sp).parse(input)
}

// MEMBERS := Aisyah, Mei, Ravi
fn members(input: &str) -> IResult<&str, Vec<&str>> {
    (tag("MEMBERS"), sp, tag(":="), sp, separated_list1(comma, identifier))
        .map(|(_, _, _, _, names)| names)
        .parse(input)
}

// Name | Name 30 | Name RM30 | Name 40%
fn share_entry(input: &str) -> IResult<&str, ShareEntry<'_>> {
    (identifier, opt(preceded(sp, (amount, opt(preceded(sp, char('%')))))))
        .map(|(name, value)| {
            let value = match value {
                None => ShareValue::Even,
                Some((amount, None)) => ShareValue::Amount(amount),
                Some((percent, Some(_))) => ShareValue::Percent(percent),
            };
            ShareEntry { name, value }
        })
        .parse(input)
}

// ["Title"] {payer} paid {amount} for {entries}
fn expense(input: &str) -> IResult<&str, ExpenseLine<'_>> {
    (
        opt((title, sp)),
        identifier, // payer
        sp,
        tag_no_case("paid"),
        sp,
        amount,
        sp,
        tag_no_case("for"),
        sp,
        separated_list1(comma, share_entry),
    )
        .map(
            |(title, payer, _, _, _, amount, _, _, _, entries)| ExpenseLine {
                title: title.map(|(title, _)| title),
                payer,
                amount,
                entries,
            },
        )
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command<'_>> {
    alt((
        tag_no_case("!balances").map(|_| Command::Balances),
        tag_no_case("!settle").map(|_| Command::Settle),
        (tag_no_case("!drop"), sp, identifier).map(|(_, _, name)| Command::Drop(name)),
    ))
    .parse(input)
}

fn line(input: &str) -> IResult<&str, Line<'_>> {
    alt((
        members.map(Line::Members),
        command.map(Line::Command),
        expense.map(Line::Expense),
    ))
    .parse(input)
}

fn line_with_sp(input: &str) -> IResult<&str, Line<'_>> {
    (sp, line, sp).map(|(_, line, _)| line).parse(input)
}

/// Parses a whole ledger, one statement per line. Line numbers are 1-based.
pub fn parse_ledger(input: &str) -> Result<Ledger<'_>, ParseError> {
    let mut statements = Vec::new();
    let mut has_members = false;

    for (idx, source) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (rest, _) = sp(source).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: i18n::syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }

        let (rest, parsed) = line_with_sp(rest).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: i18n::syntax_error_detail(e),
        })?;
        if !rest.trim().is_empty() {
            return Err(ParseError::SyntaxError {
                line: line_no,
                detail: i18n::syntax_error_unparsed_detail(rest.trim()),
            });
        }

        let statement = match parsed {
            Line::Members(names) => {
                has_members = true;
                Statement::Members(names)
            }
            Line::Command(_) | Line::Expense(_) if !has_members => {
                return Err(ParseError::MissingMembers { line: line_no });
            }
            Line::Command(command) => Statement::Command(command),
            Line::Expense(expense) => {
                let shares = ShareList::from_entries(&expense.entries).ok_or_else(|| {
                    ParseError::SyntaxError {
                        line: line_no,
                        detail: i18n::mixed_share_list_detail(),
                    }
                })?;
                Statement::Expense(Expense {
                    title: expense.title,
                    payer: expense.payer,
                    amount: expense.amount,
                    shares,
                })
            }
        };

        statements.push(StatementWithLine {
            line: line_no,
            statement,
        });
    }

    Ok(Ledger { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    #[rstest]
    #[case::plain("120", dec(120, 0))]
    #[case::cents("50.40", dec(5040, 2))]
    #[case::ringgit_prefix("RM120", dec(120, 0))]
    #[case::ringgit_prefix_spaced("RM 12.50", dec(1250, 2))]
    #[case::lowercase_prefix("rm7.5", dec(75, 1))]
    fn test_amount(#[case] input: &str, #[case] expected: Decimal) {
        let (rest, value) = amount(input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case::single("MEMBERS := Aisyah", vec!["Aisyah"])]
    #[case::several("MEMBERS := Aisyah, Mei,Ravi", vec!["Aisyah", "Mei", "Ravi"])]
    #[case::with_comment("MEMBERS := Aisyah /*driver*/, Mei", vec!["Aisyah", "Mei"])]
    fn test_members(#[case] input: &str, #[case] expected: Vec<&str>) {
        let (rest, names) = members(input).unwrap();
        assert!(rest.trim().is_empty());
        assert_eq!(names, expected);
    }

    #[rstest]
    #[case::equal(
        "Aisyah paid RM120 for Aisyah, Mei",
        Statement::Expense(Expense {
            title: None,
            payer: "Aisyah",
            amount: dec(120, 0),
            shares: ShareList::Equal(vec!["Aisyah", "Mei"]),
        })
    )]
    #[case::manual_with_title(
        "\"Homestay\" Ravi paid 90 for Aisyah 30, Mei 30, Ravi 30",
        Statement::Expense(Expense {
            title: Some("Homestay"),
            payer: "Ravi",
            amount: dec(90, 0),
            shares: ShareList::Amounts(vec![
                ("Aisyah", dec(30, 0)),
                ("Mei", dec(30, 0)),
                ("Ravi", dec(30, 0)),
            ]),
        })
    )]
    #[case::percentage(
        "Mei paid 50.40 for Aisyah 40%, Ravi 60 %",
        Statement::Expense(Expense {
            title: None,
            payer: "Mei",
            amount: dec(5040, 2),
            shares: ShareList::Percentages(vec![
                ("Aisyah", dec(40, 0)),
                ("Ravi", dec(60, 0)),
            ]),
        })
    )]
    #[case::manual_with_currency(
        "Mei PAID rm10 FOR Aisyah RM4.50, Mei RM5.50",
        Statement::Expense(Expense {
            title: None,
            payer: "Mei",
            amount: dec(10, 0),
            shares: ShareList::Amounts(vec![
                ("Aisyah", dec(450, 2)),
                ("Mei", dec(550, 2)),
            ]),
        })
    )]
    #[case::balances("!balances", Statement::Command(Command::Balances))]
    #[case::settle("!SETTLE", Statement::Command(Command::Settle))]
    #[case::drop("!drop Ravi", Statement::Command(Command::Drop("Ravi")))]
    fn test_statements(#[case] input: &str, #[case] expected: Statement<'_>) {
        let source = format!("MEMBERS := Aisyah, Mei, Ravi\n{input}");
        let ledger = parse_ledger(&source).expect("ledger should parse");
        assert_eq!(ledger.statements.len(), 2);
        assert_eq!(ledger.statements[1].statement, expected);
    }

    #[test]
    fn test_full_ledger_keeps_line_numbers() {
        let input = "// Langkawi trip\nMEMBERS := Aisyah, Mei, Ravi\n\nAisyah paid RM120 for Aisyah, Mei // ferry\n/* day two */ Ravi paid 90 for Aisyah 30, Mei 30, Ravi 30\n!settle\n";
        let ledger = parse_ledger(input).expect("ledger should parse");

        let lines: Vec<usize> = ledger.statements.iter().map(|stmt| stmt.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 6]);
        assert!(matches!(
            ledger.statements[3].statement,
            Statement::Command(Command::Settle)
        ));
    }

    #[rstest]
    #[case::expense_first("Aisyah paid 10 for Mei\nMEMBERS := Aisyah, Mei", 1)]
    #[case::command_first("// notes\n!settle", 2)]
    fn test_missing_members(#[case] input: &str, #[case] expected_line: usize) {
        assert_eq!(
            parse_ledger(input),
            Err(ParseError::MissingMembers {
                line: expected_line
            })
        );
    }

    #[rstest]
    #[case::mixed_amount_and_plain("MEMBERS := A, B\nA paid 10 for A 5, B", 2)]
    #[case::mixed_percent_and_amount("MEMBERS := A, B\nA paid 10 for A 50%, B 5", 2)]
    #[case::missing_for("MEMBERS := A, B\nA paid 10 A, B", 2)]
    #[case::negative_amount("MEMBERS := A, B\nA paid -10 for A, B", 2)]
    #[case::trailing_garbage("MEMBERS := A, B\n!balances now", 2)]
    #[case::unterminated_comment("MEMBERS := A, B /* roster", 1)]
    #[case::empty_members("MEMBERS :=", 1)]
    fn test_syntax_errors(#[case] input: &str, #[case] expected_line: usize) {
        let result = parse_ledger(input);
        assert!(
            matches!(result, Err(ParseError::SyntaxError { line, .. }) if line == expected_line),
            "unexpected result: {result:?}"
        );
    }

    #[rstest]
    #[case::comment_only("// nothing yet")]
    #[case::blank("   \n\t")]
    fn test_ignorable_lines(#[case] input: &str) {
        let ledger = parse_ledger(input).expect("ledger should parse");
        assert!(ledger.statements.is_empty());
    }

    #[test]
    fn test_share_list_names_keep_order() {
        let list = ShareList::Percentages(vec![("Ravi", dec(60, 0)), ("Aisyah", dec(40, 0))]);
        assert_eq!(list.names(), vec!["Ravi", "Aisyah"]);
    }
}
