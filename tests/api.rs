use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test::init_service,
    web,
};
use anyhow::Result;
use givebox::{
    create_web_app,
    setting::{GatewayKind, Setting},
    AppState,
};
use migration::{Migrator, MigratorTrait};
use razorpay_client::Mock;
use serde_json::json;
use std::sync::Arc;
mod util;

async fn create_test_state(setting: Option<Setting>) -> Result<(web::Data<AppState>, Arc<Mock>)> {
    let mut setting = setting.unwrap_or_default();
    setting.db_url = "sqlite::memory:".to_owned();
    setting.gateway = GatewayKind::Mock;
    let mock = Arc::new(Mock::new());
    let state = AppState::with_gateway(setting, mock.clone()).await?;
    Migrator::fresh(state.service.db()).await?;
    Ok((web::Data::new(state), mock))
}

async fn create_test_app() -> Result<(
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    web::Data<AppState>,
    Arc<Mock>,
)> {
    let (state, mock) = create_test_state(None).await?;
    let app = init_service(create_web_app(state.clone())).await;
    Ok((app, state, mock))
}

/// Full register -> verify -> token flow, returns the access token.
async fn login<S, B>(app: &S, phone: &str) -> Result<(String, i64)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (val, status) = util::post(app, "/register", json!({ "phone_number": phone })).await?;
    assert_eq!(status, 200);
    let otp = val["otp"].as_str().unwrap().to_owned();

    let (val, status) = util::post(
        app,
        "/verify",
        json!({ "phone_number": phone, "otp": otp }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["message"], json!("Authentication successful"));
    let token = val["access_token"].as_str().unwrap().to_owned();
    let user_id = val["user_id"].as_i64().unwrap();
    Ok((token, user_id))
}

#[actix_rt::test]
async fn health() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;
    let (val, status) = util::get(&app, "/health").await?;
    assert_eq!(status, 200);
    assert_eq!(val["status"], json!("healthy"));
    Ok(())
}

#[actix_rt::test]
async fn register_requires_phone_number() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;
    let (val, status) = util::post(&app, "/register", json!({})).await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], json!(true));

    let (_, status) = util::post(&app, "/register", json!({ "phone_number": "" })).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[actix_rt::test]
async fn verify_rejects_bad_code() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;

    let (_, status) = util::post(&app, "/verify", json!({ "phone_number": "+15550001" })).await?;
    assert_eq!(status, 400);

    util::post(&app, "/register", json!({ "phone_number": "+15550001" })).await?;
    let (val, status) = util::post(
        &app,
        "/verify",
        json!({ "phone_number": "+15550001", "otp": "000000" }),
    )
    .await?;
    // mismatch and absent code are indistinguishable
    assert_eq!(status, 400);
    assert_eq!(val["message"], json!("Invalid OTP"));
    Ok(())
}

#[actix_rt::test]
async fn auth_required() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;

    let (_, status) = util::get(&app, "/profile").await?;
    assert_eq!(status, 401);
    let (_, status) = util::auth_get(&app, "/donations", "not-a-token").await?;
    assert_eq!(status, 401);
    Ok(())
}

#[actix_rt::test]
async fn profile() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;
    let (token, user_id) = login(&app, "+15550001").await?;

    let (val, status) = util::auth_get(&app, "/profile", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["id"], json!(user_id));
    assert_eq!(val["phone_number"], json!("+15550001"));
    assert_eq!(val["name"], json!(null));

    let (val, status) =
        util::auth_put(&app, "/profile", &token, json!({ "name": "Alice" })).await?;
    assert_eq!(status, 200);
    assert_eq!(val["user"]["name"], json!("Alice"));

    // partial update, name untouched
    let (val, status) =
        util::auth_put(&app, "/profile", &token, json!({ "email": "a@b.com" })).await?;
    assert_eq!(status, 200);
    assert_eq!(val["user"]["name"], json!("Alice"));
    assert_eq!(val["user"]["email"], json!("a@b.com"));
    Ok(())
}

#[actix_rt::test]
async fn donation_end_to_end() -> Result<()> {
    let (app, _state, mock) = create_test_app().await?;
    let (token, user_id) = login(&app, "+15550001").await?;

    let (val, status) = util::auth_post(
        &app,
        "/donations",
        &token,
        json!({ "amount": 500, "description": "Test" }),
    )
    .await?;
    assert_eq!(status, 201);
    let donation = &val["donation"];
    assert_eq!(donation["status"], json!("link_created"));
    assert_eq!(donation["link_creator_id"], json!(user_id));
    assert_eq!(donation["amount"], json!(500.0));
    assert_eq!(donation["payment_link_id"], json!("plink_mock1"));
    assert_eq!(donation["payment_date"], json!(null));
    assert_eq!(val["payment_link"], json!("https://mock.pay/plink_mock1"));

    let id = donation["id"].as_i64().unwrap();

    let (val, status) = util::auth_get(&app, "/donations", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val.as_array().unwrap().len(), 1);

    let (val, status) = util::auth_get(&app, &format!("/donations/{}", id), &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["payment_link_id"], json!("plink_mock1"));

    // still open at the gateway
    let (val, status) =
        util::auth_get(&app, "/donations/status/plink_mock1", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["status"], json!("link_created"));

    // donor pays
    let paid_at = 1_700_000_000;
    mock.mark_paid("plink_mock1", paid_at).unwrap();
    let (val, status) =
        util::auth_get(&app, "/donations/status/plink_mock1", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["status"], json!("payment_completed"));
    assert_eq!(val["payment_date"], json!(paid_at));
    assert!(val["razorpay_payment_id"].is_string());

    let (val, status) = util::auth_delete(&app, &format!("/donations/{}", id), &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["message"], json!("Donation deleted successfully"));
    let (_, status) = util::auth_get(&app, &format!("/donations/{}", id), &token).await?;
    assert_eq!(status, 404);
    Ok(())
}

#[actix_rt::test]
async fn donation_invalid_amount() -> Result<()> {
    let (app, _state, mock) = create_test_app().await?;
    let (token, _) = login(&app, "+15550001").await?;

    let (_, status) =
        util::auth_post(&app, "/donations", &token, json!({ "amount": 0 })).await?;
    assert_eq!(status, 400);
    let (_, status) =
        util::auth_post(&app, "/donations", &token, json!({ "amount": -2.5 })).await?;
    assert_eq!(status, 400);
    assert_eq!(mock.link_count(), 0);

    let (val, _) = util::auth_get(&app, "/donations", &token).await?;
    assert_eq!(val.as_array().unwrap().len(), 0);
    Ok(())
}

#[actix_rt::test]
async fn donations_never_leak_across_users() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;
    let (owner_token, _) = login(&app, "+15550001").await?;
    let (other_token, _) = login(&app, "+15550002").await?;

    let (val, status) = util::auth_post(
        &app,
        "/donations",
        &owner_token,
        json!({ "amount": 10 }),
    )
    .await?;
    assert_eq!(status, 201);
    let id = val["donation"]["id"].as_i64().unwrap();

    let (_, status) = util::auth_get(&app, &format!("/donations/{}", id), &other_token).await?;
    assert_eq!(status, 404);
    let (_, status) =
        util::auth_delete(&app, &format!("/donations/{}", id), &other_token).await?;
    assert_eq!(status, 404);
    let (_, status) =
        util::auth_get(&app, "/donations/status/plink_mock1", &other_token).await?;
    assert_eq!(status, 404);

    // untouched for the owner
    let (_, status) = util::auth_get(&app, &format!("/donations/{}", id), &owner_token).await?;
    assert_eq!(status, 200);
    Ok(())
}

#[actix_rt::test]
async fn update_donation() -> Result<()> {
    let (app, _state, _mock) = create_test_app().await?;
    let (token, _) = login(&app, "+15550001").await?;

    let (val, _) =
        util::auth_post(&app, "/donations", &token, json!({ "amount": 10 })).await?;
    let id = val["donation"]["id"].as_i64().unwrap();

    let (val, status) = util::auth_put(
        &app,
        &format!("/donations/{}", id),
        &token,
        json!({ "amount": 25, "status": "payment_failed" }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["donation"]["amount"], json!(25.0));
    assert_eq!(val["donation"]["status"], json!("payment_failed"));
    Ok(())
}

#[actix_rt::test]
async fn register_without_code_echo() -> Result<()> {
    let mut setting = Setting::default();
    setting.otp.insecure_echo_code = false;
    let (state, _mock) = create_test_state(Some(setting)).await?;
    let app = init_service(create_web_app(state.clone())).await;

    let (val, status) =
        util::post(&app, "/register", json!({ "phone_number": "+15550001" })).await?;
    assert_eq!(status, 200);
    assert_eq!(val["message"], json!("OTP sent successfully"));
    assert!(val.get("otp").is_none());
    Ok(())
}
