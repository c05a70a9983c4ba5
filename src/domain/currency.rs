use crate::utils::error::{FxError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of comma-separated fields in a source row.
pub const SOURCE_FIELD_COUNT: usize = 6;

/// One row of the exchange-rate table.
///
/// Identity is the currency code alone: two records with the same code are
/// equal and hash the same, whatever their country, name, rate or dates.
#[derive(Debug, Clone)]
pub struct Currency {
    country_name: String,
    currency_name: String,
    currency_code: String,
    units_per_euro: f64,
    start_date: String,
    end_date: String,
}

impl Currency {
    /// Builds a record. Only the country name is checked; the other fields
    /// are kept exactly as given.
    pub fn new(
        country_name: impl Into<String>,
        currency_name: impl Into<String>,
        currency_code: impl Into<String>,
        units_per_euro: f64,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Result<Self> {
        let country_name = country_name.into();
        if country_name.is_empty() {
            return Err(FxError::InvalidArgument {
                field: "country_name".to_string(),
            });
        }

        Ok(Self {
            country_name,
            currency_name: currency_name.into(),
            currency_code: currency_code.into(),
            units_per_euro,
            start_date: start_date.into(),
            end_date: end_date.into(),
        })
    }

    /// Parses `country,currency,code,rate,start,end`. Commas cannot be escaped.
    pub fn parse(line: &str) -> Result<Self> {
        Self::from_fields(line.split(','))
    }

    /// Builds a record from already-split fields. Fields past the sixth are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().take(SOURCE_FIELD_COUNT).collect();
        if fields.len() < SOURCE_FIELD_COUNT {
            return Err(FxError::parse(format!(
                "expected {} fields, found {}",
                SOURCE_FIELD_COUNT,
                fields.len()
            )));
        }

        let rate_field = fields[3].trim();
        let units_per_euro: f64 = rate_field
            .parse()
            .map_err(|_| FxError::parse(format!("rate '{}' is not a number", rate_field)))?;

        if fields[0].is_empty() {
            return Err(FxError::parse("country name is empty"));
        }

        Self::new(
            fields[0], fields[1], fields[2], units_per_euro, fields[4], fields[5],
        )
    }

    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    pub fn currency_name(&self) -> &str {
        &self.currency_name
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn units_per_euro(&self) -> f64 {
        self.units_per_euro
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn converted_amount(&self, original_amount: f64) -> f64 {
        self.units_per_euro * original_amount
    }

    /// `code,country,converted,rate,start,end` with six decimals on both numbers.
    pub fn format_with_conversion(&self, original_amount: f64) -> String {
        format!(
            "{},{},{:.6},{:.6},{},{}",
            self.currency_code,
            self.country_name,
            self.converted_amount(original_amount),
            self.units_per_euro,
            self.start_date,
            self.end_date
        )
    }

    /// `code,country,rate,start,end`, no conversion column.
    pub fn format_plain(&self) -> String {
        format!(
            "{},{},{:.6},{},{}",
            self.currency_code, self.country_name, self.units_per_euro, self.start_date, self.end_date
        )
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.currency_code == other.currency_code
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.currency_code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_plain())
    }
}
