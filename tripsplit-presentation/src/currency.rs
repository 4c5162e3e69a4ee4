use rust_decimal::RoundingStrategy;
use tripsplit_domain::Money;

/// How money is shown to people. Passed explicitly to every presenter; the
/// domain never formats currency itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyDisplay {
    pub symbol: String,
    pub scale: u32,
}

impl Default for CurrencyDisplay {
    fn default() -> Self {
        Self {
            symbol: "RM".to_string(),
            scale: 2,
        }
    }
}

impl CurrencyDisplay {
    pub fn new(symbol: impl Into<String>, scale: u32) -> Self {
        Self {
            symbol: symbol.into(),
            scale,
        }
    }

    /// `RM12.50`, `-RM3.00`
    pub fn format(&self, money: Money) -> String {
        let sign = if money.is_negative() { "-" } else { "" };
        format!("{sign}{}{}", self.symbol, self.magnitude(money))
    }

    /// Like [`Self::format`] but positive amounts carry a `+`.
    pub fn format_signed(&self, money: Money) -> String {
        let sign = match money.signum() {
            1 => "+",
            -1 => "-",
            _ => "",
        };
        format!("{sign}{}{}", self.symbol, self.magnitude(money))
    }

    fn magnitude(&self, money: Money) -> String {
        let rounded = money
            .abs()
            .as_decimal()
            .round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);
        let scale = self.scale as usize;
        format!("{rounded:.scale$}")
    }
}
