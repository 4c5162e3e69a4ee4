use crate::{
    currency::CurrencyDisplay,
    text_table::{Alignment, TextTableBuilder},
};
use std::borrow::Cow;
use tripsplit_domain::{MemberBalances, Settlement, Transfer};
use tripsplit_i18n as i18n;

pub struct SettlementPresenter;

impl SettlementPresenter {
    /// Balance table followed by the transfer table, or the "all settled"
    /// line when nobody needs to pay.
    pub fn render(settlement: &Settlement, display: &CurrencyDisplay) -> String {
        let mut out = Self::render_balances(&settlement.balances, display);
        out.push('\n');
        if settlement.is_settled() {
            out.push_str(i18n::ALL_SETTLED);
            out.push('\n');
        } else {
            out.push_str(&Self::render_transfers(&settlement.transfers, display));
        }
        out
    }

    pub fn render_balances(balances: &MemberBalances, display: &CurrencyDisplay) -> String {
        let headers = [Cow::Borrowed(i18n::PARTICIPANT), Cow::Borrowed(i18n::BALANCE)];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(balances.iter().map(|(participant, balance)| {
                [
                    Cow::Borrowed(participant.as_str()),
                    Cow::Owned(display.format_signed(*balance)),
                ]
            }))
            .build();

        format!("{}\n{table}", i18n::BALANCES)
    }

    pub fn render_transfers(transfers: &[Transfer], display: &CurrencyDisplay) -> String {
        let headers = [
            Cow::Borrowed(i18n::FROM),
            Cow::Borrowed(i18n::TO),
            Cow::Borrowed(i18n::AMOUNT),
        ];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(transfers.iter().map(|transfer| {
                [
                    Cow::Borrowed(transfer.from.as_str()),
                    Cow::Borrowed(transfer.to.as_str()),
                    Cow::Owned(display.format(transfer.amount)),
                ]
            }))
            .build();

        format!("{}\n{table}", i18n::TRANSFERS)
    }
}
