#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// error envelope returned by the gateway api
    #[error("{code}: {description}")]
    Api { code: String, description: String },
    #[error("{0}")]
    Message(String),
    #[error("payment link not found")]
    LinkNotFound,
    #[error("payment not found")]
    PaymentNotFound,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub mod gateway;
pub use gateway::{CreateLinkRequest, Customer, Gateway, Payment, PaymentLink};

pub mod rest;
pub use rest::Rest;

pub mod mock;
pub use mock::Mock;
