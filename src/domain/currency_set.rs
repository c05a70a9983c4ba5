use crate::domain::currency::Currency;
use crate::utils::error::{FxError, Result};
use std::collections::HashMap;
use std::fmt;

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// The loaded exchange-rate table: one record per currency code.
///
/// Members keep the order in which their code was first added, so lookups
/// and formatted output are deterministic.
#[derive(Debug, Clone, Default)]
pub struct CurrencySet {
    entries: Vec<Currency>,
    positions: HashMap<String, usize>,
}

impl CurrencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole source document. The first line is always treated as
    /// a header and skipped. Any malformed row fails the whole parse.
    ///
    /// Lines end at `\n` or `\r\n`; a lone `\r` stays inside its field.
    pub fn parse_all(whole_text: &str) -> Result<Self> {
        let Some((_, body)) = whole_text.split_once('\n') else {
            return Ok(Self::new());
        };

        let mut set = Self::new();
        for (index, row) in body.lines().enumerate() {
            if row.is_empty() {
                continue;
            }
            // body starts on line 2 of the document
            let line = index + 2;
            let currency = Currency::parse(row).map_err(|e| e.at_line(line))?;
            set.add(currency);
        }

        tracing::debug!("Parsed {} currencies", set.len());
        Ok(set)
    }

    /// Inserts a record, replacing any member with the same code. A replaced
    /// member keeps its position and is returned.
    pub fn add(&mut self, currency: Currency) -> Option<Currency> {
        if let Some(&index) = self.positions.get(currency.currency_code()) {
            return Some(std::mem::replace(&mut self.entries[index], currency));
        }

        self.positions
            .insert(currency.currency_code().to_string(), self.entries.len());
        self.entries.push(currency);
        None
    }

    /// Returns an independent copy of the current members.
    pub fn snapshot(&self) -> Vec<Currency> {
        self.entries.clone()
    }

    /// Exact, case-sensitive match on country name. When several members
    /// share a country, the earliest added wins.
    pub fn find_by_country(&self, country_name: &str) -> Option<&Currency> {
        self.entries
            .iter()
            .find(|currency| currency.country_name() == country_name)
    }

    /// Like [`find_by_country`](Self::find_by_country) but as an error, for
    /// callers that treat a miss as a failed command.
    pub fn require_country(&self, country_name: &str) -> Result<&Currency> {
        self.find_by_country(country_name)
            .ok_or_else(|| FxError::CountryNotFound {
                country: country_name.to_string(),
            })
    }

    pub fn get(&self, currency_code: &str) -> Option<&Currency> {
        self.positions
            .get(currency_code)
            .map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Currency> {
        self.entries.iter()
    }

    pub fn format_all_with_conversion(&self, original_amount: f64) -> String {
        self.join_lines(|c| c.format_with_conversion(original_amount))
    }

    pub fn format_all_plain(&self) -> String {
        self.join_lines(Currency::format_plain)
    }

    fn join_lines<F>(&self, format_one: F) -> String
    where
        F: Fn(&Currency) -> String,
    {
        self.entries
            .iter()
            .map(|c| format_one(c) + LINE_SEPARATOR)
            .collect()
    }
}

impl<'a> IntoIterator for &'a CurrencySet {
    type Item = &'a Currency;
    type IntoIter = std::slice::Iter<'a, Currency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Currency> for CurrencySet {
    fn extend<T: IntoIterator<Item = Currency>>(&mut self, iter: T) {
        for currency in iter {
            self.add(currency);
        }
    }
}

impl FromIterator<Currency> for CurrencySet {
    fn from_iter<T: IntoIterator<Item = Currency>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl fmt::Display for CurrencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_all_plain())
    }
}
