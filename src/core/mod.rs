pub mod etl;
pub mod pipeline;
pub mod repository;
pub mod session;

pub use crate::domain::currency::Currency;
pub use crate::domain::currency_set::CurrencySet;
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
