//! http api

use crate::{auth::AuthedUser, auth::JwtToken, AppState, Error, Result};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use entity::donation;
use serde::{Deserialize, Serialize};
use serde_aux::prelude::{deserialize_number_from_string, deserialize_option_number_from_string};
use serde_json::json;
use std::time::Duration;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(register)
        .service(verify)
        .service(get_profile)
        .service(update_profile)
        .service(list_donations)
        .service(create_donation)
        .service(donation_status)
        .service(get_donation)
        .service(update_donation)
        .service(delete_donation);
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.service.codes().ping() {
        Ok(_) => web::Json(json!({"status": "healthy", "code_store": "connected"})),
        Err(_) => web::Json(json!({"status": "unhealthy", "code_store": "disconnected"})),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegisterReq {
    phone_number: String,
}

/// Register a new user or request a fresh code for an existing one.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    data: web::Json<RegisterReq>,
) -> Result<impl Responder, Error> {
    if data.phone_number.is_empty() {
        return Err(Error::InvalidParam("Phone number is required".to_owned()));
    }
    let ttl = Duration::from_secs(state.setting.otp.ttl);
    let (_user, code) = state.service.request_code(&data.phone_number, ttl).await?;

    // echoing the code back replaces out-of-band delivery, dev only
    let body = if state.setting.otp.insecure_echo_code {
        json!({"message": "OTP sent successfully", "otp": code})
    } else {
        json!({"message": "OTP sent successfully"})
    };
    Ok(web::Json(body))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VerifyReq {
    phone_number: String,
    otp: String,
}

/// Verify a code and mint an access token.
#[post("/verify")]
pub async fn verify(
    state: web::Data<AppState>,
    data: web::Json<VerifyReq>,
) -> Result<impl Responder, Error> {
    if data.phone_number.is_empty() || data.otp.is_empty() {
        return Err(Error::InvalidParam(
            "Phone number and OTP are required".to_owned(),
        ));
    }
    let user = state
        .service
        .verify_code(&data.phone_number, &data.otp)
        .await?;
    let access_token = JwtToken::generate(
        user.id,
        state.setting.auth.access_token_expiry,
        state.setting.auth.secret.as_bytes(),
    )
    .map_err(Error::from)?;
    Ok(web::Json(json!({
        "message": "Authentication successful",
        "access_token": access_token,
        "user_id": user.id,
    })))
}

#[get("/profile")]
pub async fn get_profile(user: AuthedUser) -> Result<impl Responder, Error> {
    Ok(web::Json(user.user))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfileReq {
    name: Option<String>,
    email: Option<String>,
}

/// Update name/email. Absent fields are left untouched.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthedUser,
    data: web::Json<ProfileReq>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();
    let user = state
        .service
        .update_profile(user.user.id, data.name, data.email)
        .await?;
    Ok(web::Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

#[get("/donations")]
pub async fn list_donations(
    state: web::Data<AppState>,
    user: AuthedUser,
) -> Result<impl Responder, Error> {
    let donations = state.service.list_donations(user.user.id).await?;
    Ok(web::Json(donations))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CreateDonationReq {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    amount: f64,
    description: Option<String>,
    donor_name: Option<String>,
    donor_email: Option<String>,
}

/// Create a payment link at the gateway and the donation row tracking it.
#[post("/donations")]
pub async fn create_donation(
    state: web::Data<AppState>,
    user: AuthedUser,
    data: web::Json<CreateDonationReq>,
) -> Result<HttpResponse, Error> {
    let data = data.into_inner();
    let (model, link) = state
        .service
        .create_donation_link(
            &user.user,
            data.amount,
            data.description,
            data.donor_name,
            data.donor_email,
            &state.setting.razorpay,
            state.setting.site.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Donation link created successfully",
        "donation": model,
        "payment_link": link.short_url,
    })))
}

#[get("/donations/{id}")]
pub async fn get_donation(
    state: web::Data<AppState>,
    user: AuthedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let donation = state
        .service
        .get_donation(user.user.id, path.into_inner())
        .await?;
    Ok(web::Json(donation))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdateDonationReq {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    amount: Option<f64>,
    description: Option<String>,
    status: Option<donation::Status>,
}

#[put("/donations/{id}")]
pub async fn update_donation(
    state: web::Data<AppState>,
    user: AuthedUser,
    path: web::Path<i32>,
    data: web::Json<UpdateDonationReq>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();
    let donation = state
        .service
        .update_donation(
            user.user.id,
            path.into_inner(),
            data.amount,
            data.description,
            data.status,
        )
        .await?;
    Ok(web::Json(json!({
        "message": "Donation updated successfully",
        "donation": donation,
    })))
}

#[delete("/donations/{id}")]
pub async fn delete_donation(
    state: web::Data<AppState>,
    user: AuthedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    state
        .service
        .delete_donation(user.user.id, path.into_inner())
        .await?;
    Ok(web::Json(json!({
        "message": "Donation deleted successfully"
    })))
}

/// Pull the current gateway status for a payment link into the donation row.
#[get("/donations/status/{payment_link_id}")]
pub async fn donation_status(
    state: web::Data<AppState>,
    user: AuthedUser,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let donation = state
        .service
        .reconcile_status(
            user.user.id,
            &path.into_inner(),
            state.setting.donation.strict_terminal_status,
        )
        .await?;
    Ok(web::Json(json!({
        "status": donation.status,
        "payment_date": donation.payment_date,
        "razorpay_payment_id": donation.razorpay_payment_id,
        "donation": donation,
    })))
}
