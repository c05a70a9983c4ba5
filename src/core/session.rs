use crate::core::repository::CurrencyRepository;
use crate::domain::currency::Currency;
use crate::domain::currency_set::CurrencySet;
use crate::domain::ports::Storage;
use std::io::{self, BufRead, Write};

pub const DEFAULT_BASE_CURRENCY: &str = "UK Pounds";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Convert,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    Export,
    Lookup,
}

/// The interactive menu loop. All state lives here: the loaded rates, the
/// amount last entered, and the console streams.
pub struct ConversionSession<'a, S: Storage, R: BufRead, W: Write> {
    rates: &'a CurrencySet,
    repository: &'a CurrencyRepository<S>,
    base_currency: String,
    original_amount: f64,
    input: R,
    output: W,
}

impl<'a, S: Storage, R: BufRead, W: Write> ConversionSession<'a, S, R, W> {
    pub fn new(
        rates: &'a CurrencySet,
        repository: &'a CurrencyRepository<S>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            rates,
            repository,
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            original_amount: 0.0,
            input,
            output,
        }
    }

    pub fn with_base_currency(mut self, base_currency: impl Into<String>) -> Self {
        self.base_currency = base_currency.into();
        self
    }

    pub fn original_amount(&self) -> f64 {
        self.original_amount
    }

    /// Runs until the user quits or input ends. Only console I/O errors are
    /// returned; export and lookup failures are reported to the user.
    pub fn run(&mut self) -> io::Result<()> {
        tracing::debug!("Session started with {} currencies", self.rates.len());

        loop {
            let Some(choice) = self.prompt_menu()? else {
                break;
            };
            if choice == MenuChoice::Quit {
                break;
            }

            let Some(amount) = self.prompt_amount()? else {
                break;
            };
            self.original_amount = amount;

            let Some(answer) = self.prompt("Would you like to (e)xport your data? or enter currency (t)ype? > ")?
            else {
                break;
            };

            match parse_follow_up(&answer) {
                Some(FollowUp::Export) => {
                    if !self.handle_export()? {
                        break;
                    }
                }
                Some(FollowUp::Lookup) => {
                    if !self.handle_lookup()? {
                        break;
                    }
                }
                None => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Invalid Input, try again.")?;
                }
            }
        }

        tracing::debug!("Session finished");
        Ok(())
    }

    fn prompt_menu(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            let Some(answer) = self.prompt("\nWould you like to (c)onvert currency or (q)uit? > ")? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "c" => return Ok(Some(MenuChoice::Convert)),
                "q" => return Ok(Some(MenuChoice::Quit)),
                _ => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Invalid Input, try again.")?;
                }
            }
        }
    }

    fn prompt_amount(&mut self) -> io::Result<Option<f64>> {
        let prompt = format!("Please enter an amount in {} > ", self.base_currency);
        loop {
            let Some(answer) = self.prompt(&prompt)? else {
                return Ok(None);
            };
            match answer.trim().parse::<f64>() {
                Ok(amount) if amount.is_finite() => return Ok(Some(amount)),
                _ => writeln!(self.output, "Invalid, try again")?,
            }
        }
    }

    /// Returns `false` when input ended mid-dialogue.
    fn handle_export(&mut self) -> io::Result<bool> {
        let filename = loop {
            let Some(answer) = self.prompt("Please input a filename to export your data > ")? else {
                return Ok(false);
            };
            let answer = answer.trim();
            if !answer.is_empty() {
                break answer.to_string();
            }
            writeln!(self.output, "Invalid, try again")?;
        };

        writeln!(self.output)?;
        writeln!(self.output, "Here is the information stored in your CSV file :")?;
        writeln!(self.output, "{}", self.rates.format_all_with_conversion(self.original_amount))?;

        let snapshot = self.rates.snapshot();
        if let Err(e) = self
            .repository
            .write_export(&snapshot, self.original_amount, &filename)
        {
            writeln!(self.output, "{}", e.user_friendly_message())?;
        }
        Ok(true)
    }

    /// Returns `false` when input ended mid-dialogue.
    fn handle_lookup(&mut self) -> io::Result<bool> {
        let Some(country) = self.prompt("Please enter the country name to convert currency > ")? else {
            return Ok(false);
        };

        match self.rates.find_by_country(&country) {
            Some(currency) => {
                let report = conversion_report(currency, self.original_amount, &self.base_currency);
                write!(self.output, "\n{}", report)?;
            }
            None => {
                writeln!(self.output)?;
                writeln!(self.output, "This country does not exist!")?;
            }
        }
        Ok(true)
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn parse_follow_up(answer: &str) -> Option<FollowUp> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "e" => Some(FollowUp::Export),
        "t" => Some(FollowUp::Lookup),
        _ => None,
    }
}

/// The lookup summary shown for a single currency, two decimals throughout.
pub fn conversion_report(currency: &Currency, original_amount: f64, base_currency: &str) -> String {
    format!(
        "The original price is: {:.2} {}\n\
         The calculated value is: {:.2} {}\n\
         The exchange rate is: {:.2}\n\
         The date range this is valid for is from: {} to {}\n",
        original_amount,
        base_currency,
        currency.converted_amount(original_amount),
        currency.currency_name(),
        currency.units_per_euro(),
        currency.start_date(),
        currency.end_date()
    )
}
