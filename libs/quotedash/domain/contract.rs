//! Contract domain entities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exchange a contract is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    TSE,
    OTC,
    OES,
    TAIFEX,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Exchange::TSE => "TSE",
            Exchange::OTC => "OTC",
            Exchange::OES => "OES",
            Exchange::TAIFEX => "TAIFEX",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityType {
    Stock,
    Future,
    Option,
}

impl SecurityType {
    pub fn label(&self) -> &'static str {
        match self {
            SecurityType::Stock => "Stocks",
            SecurityType::Future => "Futures",
            SecurityType::Option => "Options",
        }
    }

    /// Callback category quotes for this security type are delivered on
    pub fn quote_category(&self) -> QuoteCategory {
        match self {
            SecurityType::Stock => QuoteCategory::Stock,
            SecurityType::Future | SecurityType::Option => QuoteCategory::FuturesOption,
        }
    }
}

/// Instrument category used to route push callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteCategory {
    /// Equities
    Stock,
    /// Futures and options
    FuturesOption,
}

impl QuoteCategory {
    pub fn topic(&self) -> &'static str {
        match self {
            QuoteCategory::Stock => "STK",
            QuoteCategory::FuturesOption => "FOP",
        }
    }
}

/// A tradable instrument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub exchange: Exchange,
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// Product group, e.g. "TXF" for TAIEX futures or the industry code for stocks
    pub category: String,
    pub security_type: SecurityType,
}

impl Contract {
    pub fn new(
        exchange: Exchange,
        code: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        security_type: SecurityType,
    ) -> Self {
        Self {
            exchange,
            code: code.into(),
            symbol: symbol.into(),
            name: name.into(),
            category: category.into(),
            security_type,
        }
    }

    /// Shorthand for a listed stock; symbol is exchange + code
    pub fn stock(exchange: Exchange, code: &str, name: &str) -> Self {
        Self::new(
            exchange,
            code,
            format!("{}{}", exchange, code),
            name,
            "",
            SecurityType::Stock,
        )
    }

    /// Shorthand for a TAIFEX future in the given product group
    pub fn future(code: &str, symbol: &str, name: &str, category: &str) -> Self {
        Self::new(Exchange::TAIFEX, code, symbol, name, category, SecurityType::Future)
    }

    pub fn quote_category(&self) -> QuoteCategory {
        self.security_type.quote_category()
    }

    /// Subscription topic string, e.g. `TIC/v1/FOP/*/TFE/TXFJ1`
    pub fn topic(&self, channel: &str) -> String {
        let exchange = match self.exchange {
            Exchange::TAIFEX => "TFE".to_string(),
            other => other.to_string(),
        };
        format!(
            "{}/v1/{}/*/{}/{}",
            channel,
            self.quote_category().topic(),
            exchange,
            self.code
        )
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_symbol_is_exchange_plus_code() {
        let c = Contract::stock(Exchange::TSE, "2330", "TSMC");
        assert_eq!(c.symbol, "TSE2330");
        assert_eq!(c.quote_category(), QuoteCategory::Stock);
    }

    #[test]
    fn test_topic_format() {
        let fut = Contract::future("TXFJ1", "TXF202110", "TAIEX Futures", "TXF");
        assert_eq!(fut.topic("TIC"), "TIC/v1/FOP/*/TFE/TXFJ1");

        let stk = Contract::stock(Exchange::TSE, "2330", "TSMC");
        assert_eq!(stk.topic("QUO"), "QUO/v1/STK/*/TSE/2330");
    }
}
