use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use ledgerly_auth::JwtClaims;
use ledgerly_core::AccountId;
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(accounts: &[AccountId]) -> Self {
        ledgerly_observability::init_for_tests();
        // Same router as prod, in-memory services, ephemeral port.
        let services = ledgerly_api::app::services::build_in_memory_services(accounts.iter().copied());
        let app = ledgerly_api::app::build_app(JWT_SECRET.to_string(), services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api/v1/statements", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(account: AccountId) -> String {
    let now = Utc::now();
    let claims = JwtClaims::new(account, now, now + ChronoDuration::minutes(10));

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn post(
    client: &reqwest::Client,
    url: String,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    let res = client.post(url).bearer_auth(token).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn get(client: &reqwest::Client, url: String, token: &str) -> (StatusCode, Value) {
    let res = client.get(url).bearer_auth(token).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn auth_required_for_statement_endpoints() {
    let srv = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/balance")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/balance"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let health = srv.base_url.replace("/api/v1/statements", "/health");
    assert_eq!(client.get(health).send().await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn deposit_and_withdrawal_flow() {
    let a = AccountId::new();
    let srv = TestServer::spawn(&[a]).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(a);

    let (status, deposit) = post(
        &client,
        srv.url("/deposit"),
        &token,
        json!({ "amount": 510, "description": "Venda de pastel" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["type"], "deposit");
    assert_eq!(deposit["amount"], "510.00");
    assert_eq!(deposit["user_id"], a.to_string());
    assert!(deposit.get("sender_id").is_none());

    let (status, withdrawal) = post(
        &client,
        srv.url("/withdraw"),
        &token,
        json!({ "amount": "100", "description": "Compra de massa" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(withdrawal["type"], "withdraw");

    let (status, balance) = get(&client, srv.url("/balance"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["balance"], "410.00");
    assert_eq!(balance["statement"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn transfer_flow_and_rejections() {
    let (a, b) = (AccountId::new(), AccountId::new());
    let srv = TestServer::spawn(&[a, b]).await;
    let client = reqwest::Client::new();
    let (token_a, token_b) = (mint_jwt(a), mint_jwt(b));

    post(&client, srv.url("/deposit"), &token_a, json!({ "amount": 4500, "description": "Salario" })).await;

    let (status, transfer) = post(
        &client,
        srv.url(&format!("/transfers/{b}")),
        &token_a,
        json!({ "amount": 400, "description": "Peça para notebook" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transfer["type"], "transfer");
    assert_eq!(transfer["user_id"], b.to_string());
    assert_eq!(transfer["sender_id"], a.to_string());

    let (_, a_balance) = get(&client, srv.url("/balance"), &token_a).await;
    assert_eq!(a_balance["balance"], "4100.00");
    assert_eq!(a_balance["statement"].as_array().unwrap().len(), 2);

    let (_, b_balance) = get(&client, srv.url("/balance"), &token_b).await;
    assert_eq!(b_balance["balance"], "400.00");
    assert_eq!(b_balance["statement"][0]["sender_id"], a.to_string());

    let (status, body) = post(
        &client,
        srv.url(&format!("/transfers/{b}")),
        &token_a,
        json!({ "amount": 40000, "description": "Ajuda financeira" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_funds");

    let (status, body) = post(
        &client,
        srv.url(&format!("/transfers/{}", AccountId::new())),
        &token_a,
        json!({ "amount": 1, "description": "ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "receiver_not_found");

    let (status, _) = post(
        &client,
        srv.url("/transfers/nonexists-user"),
        &token_a,
        json!({ "amount": 1, "description": "ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, a_balance) = get(&client, srv.url("/balance"), &token_a).await;
    assert_eq!(a_balance["balance"], "4100.00");
}

#[tokio::test]
async fn statement_lookup_is_scoped_to_the_caller() {
    let (a, c) = (AccountId::new(), AccountId::new());
    let srv = TestServer::spawn(&[a, c]).await;
    let client = reqwest::Client::new();
    let token_a = mint_jwt(a);

    let (_, deposit) = post(&client, srv.url("/deposit"), &token_a, json!({ "amount": 10, "description": "seed" })).await;
    let id = deposit["id"].as_str().unwrap().to_string();

    let (status, fetched) = get(&client, srv.url(&format!("/{id}")), &token_a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["amount"], "10.00");

    let (status, body) = get(&client, srv.url(&format!("/{id}")), &mint_jwt(c)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "statement_not_found");
}

#[tokio::test]
async fn unknown_account_and_invalid_input() {
    let a = AccountId::new();
    let srv = TestServer::spawn(&[a]).await;
    let client = reqwest::Client::new();

    let (status, body) = get(&client, srv.url("/balance"), &mint_jwt(AccountId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "account_not_found");

    let token = mint_jwt(a);
    for bad in [
        json!({ "amount": 0, "description": "zero" }),
        json!({ "amount": -5, "description": "negative" }),
        json!({ "amount": 5, "description": "   " }),
        json!({ "description": "no amount" }),
        json!({ "amount": "50000000000000000000000000000", "description": "huge" }),
    ] {
        let (status, body) = post(&client, srv.url("/deposit"), &token, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    let (_, balance) = get(&client, srv.url("/balance"), &token).await;
    assert_eq!(balance["balance"], "0.00");
    assert!(balance["statement"].as_array().unwrap().is_empty());
}
