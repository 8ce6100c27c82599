use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use fatoura_core::domain::client::ClientId;
use fatoura_core::domain::invoice::{Invoice, InvoiceId, InvoiceStatus};
use fatoura_core::errors::ApplicationError;
use fatoura_core::invoicing::aggregate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{correlation_id, read_json, ApiError};
use crate::state::AppState;
use crate::wire::{line_views, LineInput, LineView, TotalsView};

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub lines: Vec<LineView>,
    pub totals: TotalsView,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_id: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub number: String,
    pub client_id: ClientId,
    pub issue_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<LineView>,
    pub totals: TotalsView,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.clone(),
            number: invoice.number.clone(),
            client_id: invoice.client_id.clone(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: invoice.status,
            currency: invoice.currency.clone(),
            notes: invoice.notes.clone(),
            created_at: invoice.created_at,
            lines: line_views(&invoice.lines),
            totals: TotalsView::new(invoice.totals(), &invoice.currency),
        }
    }
}

pub async fn preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let request = read_json(payload, &correlation_id)?;

    let lines: Vec<_> = request.lines.iter().map(LineInput::to_line).collect();
    Ok(Json(PreviewResponse {
        lines: line_views(&lines),
        totals: TotalsView::new(aggregate(&lines), &state.currency),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InvoiceView>), ApiError> {
    let correlation_id = correlation_id(&headers);
    let request = read_json(payload, &correlation_id)?;

    let invoice = create_invoice(&state, request, Utc::now(), &correlation_id)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    Ok((StatusCode::CREATED, Json(InvoiceView::from(&invoice))))
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InvoiceView>>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let invoices =
        state.invoices.list().await.map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(invoices.iter().map(InvoiceView::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<InvoiceView>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let invoice = find_invoice(&state, &InvoiceId(id))
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(InvoiceView::from(&invoice)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<InvoiceView>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let update = read_json(payload, &correlation_id)?;

    let mut invoice = find_invoice(&state, &InvoiceId(id))
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    let previous = invoice.status;
    invoice.transition_to(update.status).map_err(|error| ApiError::new(error, &correlation_id))?;
    state
        .invoices
        .save(invoice.clone())
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.invoice.status_changed",
        correlation_id = %correlation_id,
        invoice_id = %invoice.id.0,
        from = ?previous,
        to = ?invoice.status,
        "invoice status changed"
    );
    Ok(Json(InvoiceView::from(&invoice)))
}

async fn find_invoice(state: &AppState, id: &InvoiceId) -> Result<Invoice, ApplicationError> {
    state
        .invoices
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApplicationError::NotFound(format!("invoice `{}` not found", id.0)))
}

/// Validates and stores a new invoice, allocating its number and taking the
/// invoiced quantities out of product stock.
pub async fn create_invoice(
    state: &AppState,
    request: CreateInvoiceRequest,
    now: DateTime<Utc>,
    correlation_id: &str,
) -> Result<Invoice, ApplicationError> {
    let status = request.status.unwrap_or(InvoiceStatus::Draft);
    if !matches!(status, InvoiceStatus::Draft | InvoiceStatus::Sent) {
        return Err(ApplicationError::InvalidRequest(
            "a new invoice must be `brouillon` or `envoyee`".to_string(),
        ));
    }

    let client_id = ClientId(request.client_id.trim().to_string());
    if state.clients.find_by_id(&client_id).await?.is_none() {
        return Err(ApplicationError::InvalidRequest(format!(
            "client `{}` does not exist",
            client_id.0
        )));
    }

    let lines: Vec<_> = request.lines.iter().map(LineInput::to_line).collect();
    for product_id in lines.iter().filter_map(|line| line.product_id.as_ref()) {
        if state.products.find_by_id(product_id).await?.is_none() {
            return Err(ApplicationError::InvalidRequest(format!(
                "product `{}` does not exist",
                product_id.0
            )));
        }
    }

    let issue_date = request.issue_date.unwrap_or_else(|| now.date_naive());
    let mut invoice = Invoice {
        id: InvoiceId::generate(),
        number: String::new(),
        client_id,
        issue_date,
        due_date: request.due_date,
        currency: state.currency.clone(),
        lines,
        status,
        notes: request.notes.map(|notes| notes.trim().to_string()).filter(|n| !n.is_empty()),
        created_at: now,
    };
    invoice.validate_for_save()?;

    invoice.number = state.invoices.next_number(issue_date.year()).await?;
    state.invoices.save(invoice.clone()).await?;

    for line in &invoice.lines {
        let Some(product_id) = &line.product_id else {
            continue;
        };
        match state.products.decrement_stock(product_id, line.quantity).await {
            Ok(remaining) => info!(
                event_name = "api.invoice.stock_decremented",
                correlation_id,
                product_id = %product_id.0,
                remaining = %remaining,
                "product stock decremented"
            ),
            Err(error) => warn!(
                event_name = "api.invoice.stock_decrement_failed",
                correlation_id,
                product_id = %product_id.0,
                error = %error,
                "product stock could not be decremented"
            ),
        }
    }

    info!(
        event_name = "api.invoice.created",
        correlation_id,
        invoice_id = %invoice.id.0,
        invoice_number = %invoice.number,
        line_count = invoice.lines.len(),
        "invoice created"
    );
    Ok(invoice)
}
