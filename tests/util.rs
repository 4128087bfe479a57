#![allow(unused)]

use actix_http::{header::AUTHORIZATION, Method, Request};
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test::{call_service, read_body_json, TestRequest},
};
use anyhow::Result;
use serde_json::Value;

async fn call<S, B>(app: &S, req: TestRequest) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    assert_eq!(
        res.headers().get(actix_http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let val = read_body_json::<Value, _>(res).await;
    Ok((val, status))
}

pub async fn get<S, B>(app: &S, path: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(app, TestRequest::with_uri(path)).await
}

pub async fn auth_get<S, B>(app: &S, path: &str, token: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        TestRequest::with_uri(path).insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}

pub async fn post<S, B>(app: &S, path: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        TestRequest::with_uri(path).method(Method::POST).set_json(data),
    )
    .await
}

pub async fn auth_post<S, B>(app: &S, path: &str, token: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        TestRequest::with_uri(path)
            .method(Method::POST)
            .set_json(data)
            .insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}

pub async fn auth_put<S, B>(app: &S, path: &str, token: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        TestRequest::with_uri(path)
            .method(Method::PUT)
            .set_json(data)
            .insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}

pub async fn auth_delete<S, B>(app: &S, path: &str, token: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(
        app,
        TestRequest::with_uri(path)
            .method(Method::DELETE)
            .insert_header((AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await
}
