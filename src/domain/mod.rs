// Domain layer: the exchange-rate records and the ports the outer layers implement.

pub mod currency;
pub mod currency_set;
pub mod ports;
