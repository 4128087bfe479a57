use crate::{
    gateway::{CreateLinkRequest, Gateway, LinkPayment, Payment, PaymentLink},
    Error, Result,
};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct State {
    seq: u64,
    links: HashMap<String, PaymentLink>,
    payments: HashMap<String, Payment>,
    fail_create: bool,
}

/// In-memory gateway for tests and local development.
///
/// Created links start in `created` status. Tests drive transitions with
/// [`Mock::set_link_status`] and [`Mock::mark_paid`].
#[derive(Debug, Default)]
pub struct Mock {
    state: Mutex<State>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links created so far.
    pub fn link_count(&self) -> usize {
        self.state.lock().links.len()
    }

    /// Make the next create calls fail, for error-path tests.
    pub fn fail_create(&self, fail: bool) {
        self.state.lock().fail_create = fail;
    }

    /// Force a link into an arbitrary status string.
    pub fn set_link_status(&self, id: &str, status: &str) {
        if let Some(link) = self.state.lock().links.get_mut(id) {
            link.status = status.to_owned();
        }
    }

    /// Record a captured payment against the link and flip it to `paid`.
    pub fn mark_paid(&self, id: &str, paid_at: i64) -> Option<String> {
        let mut state = self.state.lock();
        state.seq += 1;
        let payment_id = format!("pay_mock{}", state.seq);
        let link = state.links.get_mut(id)?;
        link.status = "paid".to_owned();
        link.payments.push(LinkPayment {
            payment_id: payment_id.clone(),
            status: "captured".to_owned(),
            created_at: paid_at,
        });
        let amount = link.amount;
        let currency = link.currency.clone();
        state.payments.insert(
            payment_id.clone(),
            Payment {
                id: payment_id.clone(),
                amount,
                currency,
                status: "captured".to_owned(),
                order_id: None,
                created_at: paid_at,
            },
        );
        Some(payment_id)
    }
}

#[async_trait::async_trait]
impl Gateway for Mock {
    async fn create_payment_link(&self, req: CreateLinkRequest) -> Result<PaymentLink> {
        let mut state = self.state.lock();
        if state.fail_create {
            return Err(Error::Message("gateway unavailable".to_owned()));
        }
        state.seq += 1;
        let id = format!("plink_mock{}", state.seq);
        let link = PaymentLink {
            id: id.clone(),
            status: "created".to_owned(),
            amount: req.amount,
            currency: req.currency,
            short_url: format!("https://mock.pay/{}", id),
            expire_by: req.expire_by,
            reference_id: req.reference_id,
            created_at: 0,
            payments: vec![],
        };
        state.links.insert(id, link.clone());
        Ok(link)
    }

    async fn fetch_payment_link(&self, id: &str) -> Result<PaymentLink> {
        self.state
            .lock()
            .links
            .get(id)
            .cloned()
            .ok_or(Error::LinkNotFound)
    }

    async fn fetch_payment(&self, id: &str) -> Result<Payment> {
        self.state
            .lock()
            .payments
            .get(id)
            .cloned()
            .ok_or(Error::PaymentNotFound)
    }
}
