//! Mailjet メール送信実装
//!
//! Mailjet Send API v3.1 を使用してメールを送信する。本番環境で使用する。
//!
//! ## リクエスト形式
//!
//! ```json
//! {
//!   "Messages": [{
//!     "From": { "Email": "...", "Name": "..." },
//!     "To": [{ "Email": "...", "Name": "..." }],
//!     "Subject": "...",
//!     "TextPart": "...",
//!     "Attachments": [{ "ContentType": "...", "Filename": "...", "Base64Content": "..." }]
//!   }]
//! }
//! ```
//!
//! メッセージ ID は `Messages[0].To[*].MessageID` から取得する（数値で返る）。

use async_trait::async_trait;
use eventdesk_domain::mail::{MailError, OutboundEmail, SendReceipt};
use serde::{Deserialize, Serialize};

use super::MailSender;

/// Mailjet Send API v3.1 のエンドポイント
pub const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Mailjet の API キーとシークレット（Basic 認証に使用）
#[derive(Clone)]
pub struct MailjetCredentials {
    api_key:    String,
    api_secret: String,
}

impl MailjetCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key:    api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

// シークレットをログに出さない
impl std::fmt::Debug for MailjetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailjetCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Mailjet メール送信
///
/// `reqwest::Client` を内部に持ち、接続プールをリクエスト間で共有する。
/// タイムアウトは reqwest の既定値のまま（アプリケーション側で上書きしない）。
pub struct MailjetMailSender {
    client:      reqwest::Client,
    endpoint:    String,
    credentials: Option<MailjetCredentials>,
    from_email:  String,
    from_name:   String,
}

impl MailjetMailSender {
    /// 新しい Mailjet 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `endpoint`: Send API の URL（通常は [`MAILJET_SEND_URL`]）
    /// - `credentials`: API キーとシークレット。`None` の場合は認証なしで送信し、
    ///   プロバイダの 401 がそのまま送信エラーになる
    /// - `from_email` / `from_name`: 送信元（Mailjet で検証済みであること）
    pub fn new(
        endpoint: &str,
        credentials: Option<MailjetCredentials>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            credentials,
            from_email: from_email.into(),
            from_name: from_name.into(),
        }
    }

    fn build_payload<'a>(&'a self, email: &'a OutboundEmail) -> SendPayload<'a> {
        SendPayload {
            messages: vec![MessagePayload {
                from:        AddressPayload {
                    email: &self.from_email,
                    name:  &self.from_name,
                },
                to:          email
                    .recipients
                    .iter()
                    .map(|r| AddressPayload {
                        email: &r.email,
                        name:  &r.name,
                    })
                    .collect(),
                subject:     &email.subject,
                text_part:   &email.text_body,
                attachments: email
                    .attachments
                    .iter()
                    .map(|a| AttachmentPayload {
                        content_type:   &a.content_type,
                        filename:       &a.filename,
                        base64_content: &a.base64_content,
                    })
                    .collect(),
            }],
        }
    }
}

#[async_trait]
impl MailSender for MailjetMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&self.build_payload(email));
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.api_key, Some(&credentials.api_secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        parse_send_response(response).await
    }
}

/// Send API のレスポンスを送信結果に変換する
///
/// 2xx 以外は `Rejected`（本文を detail として保持）。
/// 2xx で本文が解釈できない場合は送信済みとみなし、メッセージ ID なしで返す。
async fn parse_send_response(response: reqwest::Response) -> Result<SendReceipt, MailError> {
    let status = response.status();

    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(MailError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }

    match response.json::<SendResponse>().await {
        Ok(body) => Ok(body.into_receipt()),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Mailjet レスポンスの解釈に失敗（送信は成功扱い）"
            );
            Ok(SendReceipt::empty())
        }
    }
}

// --- リクエスト/レスポンス型 ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendPayload<'a> {
    messages: Vec<MessagePayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MessagePayload<'a> {
    from:        AddressPayload<'a>,
    to:          Vec<AddressPayload<'a>>,
    subject:     &'a str,
    text_part:   &'a str,
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddressPayload<'a> {
    email: &'a str,
    name:  &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttachmentPayload<'a> {
    content_type:   &'a str,
    filename:       &'a str,
    base64_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendResponse {
    #[serde(default)]
    messages: Vec<MessageResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageResult {
    #[serde(default)]
    to: Vec<RecipientResult>,
}

#[derive(Debug, Deserialize)]
struct RecipientResult {
    #[serde(rename = "MessageID", default)]
    message_id: Option<serde_json::Value>,
}

impl SendResponse {
    /// 先頭メッセージの宛先ごとの ID を文字列として取り出す
    fn into_receipt(self) -> SendReceipt {
        let message_ids = self
            .messages
            .into_iter()
            .next()
            .map(|message| {
                message
                    .to
                    .into_iter()
                    .filter_map(|r| r.message_id.and_then(message_id_to_string))
                    .collect()
            })
            .unwrap_or_default();
        SendReceipt { message_ids }
    }
}

fn message_id_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, http::HeaderMap, routing::post};
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use eventdesk_domain::mail::{EmailAttachment, Recipient};
    use pretty_assertions::assert_eq;

    use super::*;

    /// スタブが受け取ったリクエスト（Authorization ヘッダー, ボディ）
    type Captured = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    fn make_email() -> OutboundEmail {
        OutboundEmail::single(
            Recipient {
                email: "ana@example.com".to_string(),
                name:  "Ana Lopez".to_string(),
            },
            "Constancia de participación",
            "Hola Ana Lopez,\n\nGracias.",
            EmailAttachment {
                filename:       "Constancia_Staff_Ana_Lopez.pdf".to_string(),
                content_type:   "application/pdf".to_string(),
                base64_content: "JVBERi0xLjQK".to_string(),
            },
        )
    }

    fn make_response(status: u16, body: &str) -> reqwest::Response {
        let http_resp = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(http_resp)
    }

    /// Mailjet Send API のスタブサーバーを起動する
    async fn spawn_stub(status: u16, body: &'static str) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let state = captured.clone();
        let status = axum::http::StatusCode::from_u16(status).unwrap();

        let app = Router::new().route(
            "/v3.1/send",
            post(move |headers: HeaderMap, Json(payload): Json<serde_json::Value>| {
                let state = state.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    state.lock().unwrap().push((auth, payload));
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v3.1/send"), captured)
    }

    // ===== レスポンス解釈 =====

    #[tokio::test]
    async fn test_数値のmessage_idを文字列で返す() {
        let response = make_response(
            200,
            r#"{"Messages":[{"Status":"success","To":[{"Email":"ana@example.com","MessageUUID":"1ab23cd4","MessageID":288230384001234567,"MessageHref":"https://api.mailjet.com/v3/REST/message/288230384001234567"}]}]}"#,
        );

        let receipt = parse_send_response(response).await.unwrap();

        assert_eq!(receipt.first_message_id(), Some("288230384001234567"));
    }

    #[tokio::test]
    async fn test_文字列のmessage_idはそのまま返す() {
        let response = make_response(200, r#"{"Messages":[{"To":[{"MessageID":"abc123"}]}]}"#);

        let receipt = parse_send_response(response).await.unwrap();

        assert_eq!(receipt.first_message_id(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_message_idがない成功レスポンスは空の結果になる() {
        let response = make_response(200, r#"{"Messages":[{"Status":"success"}]}"#);

        let receipt = parse_send_response(response).await.unwrap();

        assert_eq!(receipt, SendReceipt::empty());
    }

    #[tokio::test]
    async fn test_解釈できない成功レスポンスも送信成功とみなす() {
        let response = make_response(200, "OK");

        let receipt = parse_send_response(response).await.unwrap();

        assert_eq!(receipt, SendReceipt::empty());
    }

    #[tokio::test]
    async fn test_401はrejectedとして本文を保持する() {
        let body = r#"{"ErrorIdentifier":"x","StatusCode":401,"ErrorMessage":"API key authentication/authorization failure"}"#;
        let response = make_response(401, body);

        let result = parse_send_response(response).await;

        match result {
            Err(MailError::Rejected { status, detail }) => {
                assert_eq!(status, 401);
                assert_eq!(detail, body);
            }
            other => panic!("Rejected を期待したが {other:?} を受け取った"),
        }
    }

    // ===== スタブサーバーとの結合 =====

    #[tokio::test]
    async fn test_送信ペイロードがsend_api_v3_1形式である() {
        let (endpoint, captured) =
            spawn_stub(200, r#"{"Messages":[{"To":[{"MessageID":42}]}]}"#).await;
        let sender = MailjetMailSender::new(
            &endpoint,
            Some(MailjetCredentials::new("key", "secret")),
            "no-reply@eventdesk.example.com",
            "EventDesk",
        );

        let receipt = sender.send(&make_email()).await.unwrap();

        assert_eq!(receipt.first_message_id(), Some("42"));
        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (auth, payload) = &requests[0];
        assert_eq!(
            auth.as_deref(),
            Some(format!("Basic {}", STANDARD.encode("key:secret")).as_str())
        );
        assert_eq!(
            payload,
            &serde_json::json!({
                "Messages": [{
                    "From": { "Email": "no-reply@eventdesk.example.com", "Name": "EventDesk" },
                    "To": [{ "Email": "ana@example.com", "Name": "Ana Lopez" }],
                    "Subject": "Constancia de participación",
                    "TextPart": "Hola Ana Lopez,\n\nGracias.",
                    "Attachments": [{
                        "ContentType": "application/pdf",
                        "Filename": "Constancia_Staff_Ana_Lopez.pdf",
                        "Base64Content": "JVBERi0xLjQK"
                    }]
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_認証情報がない場合はauthorizationヘッダーを送らない() {
        let (endpoint, captured) = spawn_stub(401, "Unauthorized").await;
        let sender = MailjetMailSender::new(&endpoint, None, "a@example.com", "A");

        let result = sender.send(&make_email()).await;

        assert!(matches!(result, Err(MailError::Rejected { status: 401, .. })));
        assert_eq!(captured.lock().unwrap()[0].0, None);
    }

    #[tokio::test]
    async fn test_接続できない場合はtransportエラー() {
        // 即座に閉じたポートへ送信する
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let sender = MailjetMailSender::new(
            &format!("http://{addr}/v3.1/send"),
            None,
            "a@example.com",
            "A",
        );

        let result = sender.send(&make_email()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, MailError::Transport(_)), "{err:?}");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_credentialsのdebugにシークレットが出ない() {
        let debug = format!("{:?}", MailjetCredentials::new("key", "s3cr3t"));

        assert!(!debug.contains("s3cr3t"));
    }
}
