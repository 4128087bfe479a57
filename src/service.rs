use crate::{
    now,
    otp::{self, CodeStore},
    setting, Error, Result,
};
use entity::{donation, user};
use razorpay_client::{CreateLinkRequest, Customer, Gateway, PaymentLink};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, NotSet, QueryFilter, Set, TransactionTrait,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Donation service
pub struct Service {
    gateway: Arc<dyn Gateway + Sync + Send>,
    codes: Box<dyn CodeStore>,
    conn: DbConn,
}

impl Service {
    pub fn new(
        gateway: Arc<dyn Gateway + Sync + Send>,
        codes: Box<dyn CodeStore>,
        conn: DbConn,
    ) -> Self {
        Self {
            gateway,
            codes,
            conn,
        }
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    pub fn codes(&self) -> &dyn CodeStore {
        self.codes.as_ref()
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("User"))
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::PhoneNumber.eq(phone))
            .one(self.db())
            .await?)
    }

    pub async fn get_or_create_user(&self, phone: &str) -> Result<user::Model> {
        match self.get_user_by_phone(phone).await? {
            Some(u) => Ok(u),
            None => {
                // create
                Ok(user::ActiveModel {
                    phone_number: Set(phone.to_owned()),
                    created_at: Set(now() as i64),
                    ..Default::default()
                }
                .insert(self.db())
                .await?)
            }
        }
    }

    /// Partial update, absent fields are left untouched.
    pub async fn update_profile(
        &self,
        user_id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<user::Model> {
        let user = self.get_user_by_id(user_id).await?;
        if name.is_none() && email.is_none() {
            return Ok(user);
        }
        let mut active = user::ActiveModel {
            id: Set(user.id),
            ..Default::default()
        };
        if let Some(name) = name {
            active.name = Set(Some(name));
        }
        if let Some(email) = email {
            active.email = Set(Some(email));
        }
        Ok(active.update(self.db()).await?)
    }

    /// Issue a one-time code for the phone number, creating the user row on
    /// first contact. A fresh code replaces any unexpired prior one.
    ///
    /// The user row is not rolled back if the code store write fails, codes
    /// are cheap to reissue.
    pub async fn request_code(&self, phone: &str, ttl: Duration) -> Result<(user::Model, String)> {
        let user = self.get_or_create_user(phone).await?;
        let code = otp::generate_code();
        self.codes
            .put(phone, &code, ttl)
            .map_err(|e| Error::CodeStore(e.to_string()))?;
        debug!(phone_number = phone, code = %code, "issued one-time code");
        Ok((user, code))
    }

    /// Verify a code, consuming it on success. Absent, expired and mismatched
    /// codes all fail the same way.
    pub async fn verify_code(&self, phone: &str, code: &str) -> Result<user::Model> {
        match self.codes.get(phone)? {
            Some(stored) if stored == code => {
                // single use
                self.codes.delete(phone)?;
                self.get_or_create_user(phone).await
            }
            _ => Err(Error::InvalidParam("Invalid OTP".to_owned())),
        }
    }

    /// Create a gateway payment link and the donation row tracking it.
    ///
    /// The gateway call comes first. If the insert below fails afterwards the
    /// remote link stays orphaned at the gateway; the caller sees an error and
    /// no local row.
    pub async fn create_donation_link(
        &self,
        user: &user::Model,
        amount: f64,
        description: Option<String>,
        donor_name: Option<String>,
        donor_email: Option<String>,
        razorpay: &setting::Razorpay,
        site: Option<&str>,
    ) -> Result<(donation::Model, PaymentLink)> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidParam("Valid amount is required".to_owned()));
        }
        let time = now();
        let req = CreateLinkRequest {
            // smallest currency unit
            amount: (amount * 100.0).round() as i64,
            currency: razorpay.currency.clone(),
            description: description.clone(),
            customer: Customer {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            expire_by: (time + razorpay.link_expiry_hours * 3600) as i64,
            reference_id: format!("don_{}", time),
            notify: Default::default(),
            reminder_enable: true,
            callback_url: site.map(|s| format!("{}/donations/callback", s)),
            callback_method: site.map(|_| "get".to_owned()),
            notes: Some(json!({"donation_type": "general", "platform": "web"})),
        };
        let link = self.gateway.create_payment_link(req).await?;

        let model = donation::ActiveModel {
            id: NotSet,
            link_creator_id: Set(user.id),
            amount: Set(amount),
            description: Set(description),
            status: Set(donation::Status::LinkCreated),
            created_at: Set(time as i64),
            payment_link_id: Set(Some(link.id.clone())),
            payment_link_url: Set(Some(link.short_url.clone())),
            payment_link_expiry: Set(Some(link.expire_by)),
            donor_name: Set(donor_name),
            donor_email: Set(donor_email),
            razorpay_payment_id: Set(None),
            payment_date: Set(None),
            reference_id: Set(Some(link.reference_id.clone())),
        }
        .insert(self.db())
        .await?;
        Ok((model, link))
    }

    /// All donations created by the user, in no particular order.
    pub async fn list_donations(&self, user_id: i32) -> Result<Vec<donation::Model>> {
        Ok(donation::Entity::find()
            .filter(donation::Column::LinkCreatorId.eq(user_id))
            .all(self.db())
            .await?)
    }

    /// Owned rows only. A row owned by someone else is indistinguishable
    /// from a missing one.
    pub async fn get_donation(&self, user_id: i32, id: i32) -> Result<donation::Model> {
        donation::Entity::find()
            .filter(donation::Column::Id.eq(id))
            .filter(donation::Column::LinkCreatorId.eq(user_id))
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("Donation"))
    }

    pub async fn update_donation(
        &self,
        user_id: i32,
        id: i32,
        amount: Option<f64>,
        description: Option<String>,
        status: Option<donation::Status>,
    ) -> Result<donation::Model> {
        if let Some(amount) = amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidParam("Valid amount is required".to_owned()));
            }
        }
        let txn = self.conn.begin().await?;
        let row = donation::Entity::find()
            .filter(donation::Column::Id.eq(id))
            .filter(donation::Column::LinkCreatorId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(Error::NotFound("Donation"))?;
        if amount.is_none() && description.is_none() && status.is_none() {
            return Ok(row);
        }
        let mut active = donation::ActiveModel {
            id: Set(row.id),
            ..Default::default()
        };
        if let Some(amount) = amount {
            active.amount = Set(amount);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        if let Some(status) = status {
            active.status = Set(status);
        }
        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete_donation(&self, user_id: i32, id: i32) -> Result<()> {
        let res = donation::Entity::delete_many()
            .filter(donation::Column::Id.eq(id))
            .filter(donation::Column::LinkCreatorId.eq(user_id))
            .exec(self.db())
            .await?;
        if res.rows_affected == 0 {
            return Err(Error::NotFound("Donation"));
        }
        Ok(())
    }

    /// Pull the current link status from the gateway and fold it into the
    /// donation row.
    ///
    /// Mapping is a total function of the gateway status: `paid` completes
    /// the donation and records the payment id and time, `created` keeps the
    /// link open, anything else, including a failed fetch, marks the donation
    /// failed. With `strict` a completed donation is terminal and a downgrade
    /// leaves the row untouched; without it the last poll wins.
    pub async fn reconcile_status(
        &self,
        user_id: i32,
        payment_link_id: &str,
        strict: bool,
    ) -> Result<donation::Model> {
        let row = donation::Entity::find()
            .filter(donation::Column::PaymentLinkId.eq(payment_link_id))
            .filter(donation::Column::LinkCreatorId.eq(user_id))
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("Donation"))?;

        let link = match self.gateway.fetch_payment_link(payment_link_id).await {
            Ok(link) => Some(link),
            Err(e) => {
                warn!(
                    error = e.to_string(),
                    payment_link_id, "failed to fetch payment link"
                );
                None
            }
        };
        let gateway_status = link.as_ref().map(|l| l.status.as_str()).unwrap_or("error");

        let mut payment_date = None;
        let mut payment_id = None;
        let status = match gateway_status {
            "paid" => {
                if let Some(p) = link.as_ref().and_then(|l| l.payments.first()) {
                    match self.gateway.fetch_payment(&p.payment_id).await {
                        Ok(payment) => {
                            payment_date = Some(payment.created_at);
                            payment_id = Some(payment.id);
                        }
                        Err(e) => {
                            warn!(error = e.to_string(), "failed to fetch payment details");
                            payment_date = Some(p.created_at);
                            payment_id = Some(p.payment_id.clone());
                        }
                    }
                }
                donation::Status::PaymentCompleted
            }
            "created" => donation::Status::LinkCreated,
            _ => donation::Status::PaymentFailed,
        };

        if strict
            && row.status == donation::Status::PaymentCompleted
            && status != donation::Status::PaymentCompleted
        {
            warn!(
                payment_link_id,
                gateway_status, "refusing to downgrade completed donation"
            );
            return Ok(row);
        }

        let mut active = donation::ActiveModel {
            id: Set(row.id),
            status: Set(status),
            ..Default::default()
        };
        if let Some(paid_at) = payment_date {
            active.payment_date = Set(Some(paid_at));
        }
        if let Some(payment_id) = payment_id {
            active.razorpay_payment_id = Set(Some(payment_id));
        }
        let txn = self.conn.begin().await?;
        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(model)
    }
}
