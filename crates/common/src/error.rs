use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Order rejected by broker: {0}")]
    OrderRejected(String),

    #[error("Unknown order handle: {0}")]
    UnknownOrder(String),

    #[error("Invalid candle: {0}")]
    InvalidCandle(String),

    #[error("Out-of-order candle: {0}")]
    OutOfOrder(String),

    #[error("Candle stream closed")]
    StreamClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
