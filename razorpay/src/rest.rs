use crate::{
    gateway::{CreateLinkRequest, Gateway, Payment, PaymentLink},
    Error, Result,
};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// REST client for the hosted gateway api.
///
/// Single attempt per call, bounded by the construction timeout. No retries.
pub struct Rest {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl Rest {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> Result<T> {
        if res.status().is_success() {
            Ok(res.json::<T>().await?)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(e) => Err(Error::Api {
                    code: e.error.code,
                    description: e.error.description,
                }),
                Err(_) => Err(Error::Message(format!("http {}: {}", status, body))),
            }
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;
        Self::decode(res).await
    }
}

#[async_trait::async_trait]
impl Gateway for Rest {
    async fn create_payment_link(&self, req: CreateLinkRequest) -> Result<PaymentLink> {
        let res = self
            .client
            .post(format!("{}/payment_links", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&req)
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn fetch_payment_link(&self, id: &str) -> Result<PaymentLink> {
        self.get(&format!("/payment_links/{}", id)).await
    }

    async fn fetch_payment(&self, id: &str) -> Result<Payment> {
        self.get(&format!("/payments/{}", id)).await
    }
}
