//! # 送信 API ハンドラ
//!
//! 管理画面から呼ばれるメール送信エンドポイントを実装する。
//!
//! - `POST /EnviarCorreo`: 証明書 PDF を 1 名に送信
//! - `POST /EnviarZip`: チームの ZIP を代表者に送信
//!
//! ボディのフィールド名は管理画面の既存クライアントに合わせている（`Correo`, `Nombres` 等）。
//! すべて `Option` で受け、必須チェックはドメイン層の Draft → Delivery 変換に任せる。

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use eventdesk_domain::dispatch::{
   CertificateDelivery,
   CertificateDraft,
   DeliveryField,
   TeamArchiveDelivery,
   TeamArchiveDraft,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, usecase::DispatchUseCaseImpl};

/// 送信ハンドラーの State
pub struct DispatchState {
   pub usecase: DispatchUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 個別送信リクエスト
#[derive(Deserialize)]
pub struct SendCertificateRequest {
   #[serde(rename = "Correo")]
   pub recipient_email: Option<String>,
   #[serde(rename = "Nombres")]
   pub recipient_name:  Option<String>,
   #[serde(rename = "Puesto")]
   pub role:            Option<String>,
   #[serde(rename = "pdf")]
   pub pdf_base64:      Option<String>,
   #[serde(rename = "mensajeCorreo")]
   pub message_body:    Option<String>,
   #[serde(rename = "Asunto")]
   pub subject:         Option<String>,
   #[serde(rename = "Filename")]
   pub filename:        Option<String>,
   #[serde(rename = "ContentType")]
   pub content_type:    Option<String>,
}

impl SendCertificateRequest {
   fn into_draft(self) -> CertificateDraft {
      CertificateDraft {
         recipient_email:   self.recipient_email,
         recipient_name:    self.recipient_name,
         role:              self.role,
         attachment_base64: self.pdf_base64,
         message_body:      self.message_body,
         subject:           self.subject,
         filename:          self.filename,
         content_type:      self.content_type,
      }
   }

   fn wire_name(field: DeliveryField) -> &'static str {
      match field {
         DeliveryField::RecipientEmail => "Correo",
         DeliveryField::RecipientName => "Nombres",
         DeliveryField::Role => "Puesto",
         DeliveryField::Attachment => "pdf",
         DeliveryField::MessageBody => "mensajeCorreo",
         DeliveryField::Filename => "Filename",
      }
   }
}

/// チーム送信リクエスト
#[derive(Deserialize)]
pub struct SendTeamArchiveRequest {
   #[serde(rename = "Correo")]
   pub recipient_email: Option<String>,
   #[serde(rename = "Nombres")]
   pub recipient_name:  Option<String>,
   #[serde(rename = "mensajeCorreo")]
   pub message_body:    Option<String>,
   #[serde(rename = "zipBase64")]
   pub zip_base64:      Option<String>,
   pub filename:        Option<String>,
   #[serde(rename = "Asunto")]
   pub subject:         Option<String>,
}

impl SendTeamArchiveRequest {
   fn into_draft(self) -> TeamArchiveDraft {
      TeamArchiveDraft {
         recipient_email: self.recipient_email,
         recipient_name:  self.recipient_name,
         message_body:    self.message_body,
         zip_base64:      self.zip_base64,
         filename:        self.filename,
         subject:         self.subject,
      }
   }

   fn wire_name(field: DeliveryField) -> &'static str {
      match field {
         DeliveryField::RecipientEmail => "Correo",
         DeliveryField::RecipientName => "Nombres",
         DeliveryField::Role => "Puesto",
         DeliveryField::Attachment => "zipBase64",
         DeliveryField::MessageBody => "mensajeCorreo",
         DeliveryField::Filename => "filename",
      }
   }
}

/// 送信成功レスポンス
///
/// `messageId` はプロバイダが ID を返さない場合 `null`。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
   pub message:    &'static str,
   pub message_id: Option<String>,
}

// --- ハンドラ ---

/// POST /EnviarCorreo
///
/// 証明書 PDF を 1 名に送信する。
#[tracing::instrument(skip_all)]
pub async fn send_certificate(
   State(state): State<Arc<DispatchState>>,
   payload: Result<Json<SendCertificateRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
   let Json(request) = payload?;

   let delivery = CertificateDelivery::try_from_draft(request.into_draft())
      .map_err(|r| ApiError::from_rejection(r, SendCertificateRequest::wire_name))?;

   tracing::debug!(
      recipient = delivery.recipient_email(),
      filename = delivery.filename(),
      subject = delivery.subject(),
      "証明書を送信します"
   );

   let message_id = state.usecase.send_certificate(delivery).await?;

   Ok(Json(SendResponse {
      message: "Correo enviado",
      message_id,
   }))
}

/// POST /EnviarZip
///
/// チームの ZIP を代表者に送信する。
#[tracing::instrument(skip_all)]
pub async fn send_team_archive(
   State(state): State<Arc<DispatchState>>,
   payload: Result<Json<SendTeamArchiveRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
   let Json(request) = payload?;

   let delivery = TeamArchiveDelivery::try_from_draft(request.into_draft())
      .map_err(|r| ApiError::from_rejection(r, SendTeamArchiveRequest::wire_name))?;

   tracing::debug!(
      recipient = delivery.recipient_email(),
      filename = delivery.filename(),
      subject = delivery.subject(),
      "チーム ZIP を送信します"
   );

   let message_id = state.usecase.send_team_archive(delivery).await?;

   Ok(Json(SendResponse {
      message: "ZIP enviado",
      message_id,
   }))
}
