//! Main FMS client with builder pattern.
//!
//! One method per remote action. Every method goes through the
//! [`RequestBridge`] and applies the `success` / `error` response convention.

use crate::{
    actions,
    bridge::{Params, RequestBridge},
    error::{FmsLinkError, Result},
    models::{
        ApiEnvelope, ApprovalDecision, Attachment, IndentForm, IndentReceipt, LiftingForm,
        MasterData, StoreInForm, TallyForm, User, WorkflowRecord, PHOTO_OF_BILL_FIELD,
        PHOTO_OF_PRODUCT_FIELD,
    },
    timeouts::FmsLinkTimeouts,
};
use log::debug;
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;

/// Main FMS client.
///
/// Use [`FmsClientBuilder`] to construct instances with custom configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use fms_link::FmsClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FmsClient::builder()
///     .base_url("https://script.example.com/macros/s/deployment/exec")
///     .build()?;
///
/// for row in client.get_pending_lifting().await? {
///     println!("{:?} {}", row.row_number, row.text("Indent No."));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FmsClient {
    bridge: RequestBridge,
}

impl FmsClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> FmsClientBuilder {
        FmsClientBuilder::new()
    }

    pub fn bridge(&self) -> &RequestBridge {
        &self.bridge
    }

    pub fn base_url(&self) -> &Url {
        self.bridge.base_url()
    }

    /// Get the configured timeouts
    pub fn timeouts(&self) -> &FmsLinkTimeouts {
        self.bridge.timeouts()
    }

    /// Authenticate and return the processed user.
    ///
    /// `allowedPages` is filtered to non-blank strings and trimmed; a user
    /// without pages is refused with an authentication error.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        debug!("[CLIENT] Authenticating user '{}'", username);
        let params: Params = vec![
            (actions::ACTION_PARAM, actions::LOGIN.to_string()),
            ("username", username.to_string()),
            ("password", password.to_string()),
        ];
        let envelope = ApiEnvelope::from_payload(self.bridge.call(&params).await?)?;

        if !envelope.success {
            let message = envelope
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Login failed".to_string());
            debug!("[CLIENT] Login refused for '{}': {}", username, message);
            return Err(FmsLinkError::AuthenticationError(message));
        }

        let raw_user = envelope
            .raw_field("user")
            .ok_or_else(|| FmsLinkError::AuthenticationError("Invalid response from server".into()))?;
        let user = User::from_login_payload(raw_user)?;
        debug!(
            "[CLIENT] Logged in '{}' with pages {:?}",
            user.username, user.allowed_pages
        );
        Ok(user)
    }

    /// Option lists for the create-indent form.
    pub async fn get_master_data(&self) -> Result<MasterData> {
        let envelope = self
            .invoke(
                actions::GET_MASTER_DATA,
                vec![cache_buster()],
                "Failed to fetch master data",
            )
            .await?;
        Ok(serde_json::from_value(Value::Object(envelope.data))?)
    }

    /// Every indent recorded in the FMS sheet.
    pub async fn get_fms_history(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(actions::GET_FMS_HISTORY, vec![cache_buster()], "Failed to fetch history")
            .await?
            .field("indents")
    }

    /// Validate and submit a new indent, returning the number the sheet assigned.
    pub async fn submit_indent(&self, form: &IndentForm) -> Result<IndentReceipt> {
        form.validate()?;
        let mut params = form.to_params();
        params.push(cache_buster());
        let envelope = self
            .invoke(actions::SUBMIT_FMS, params, "Failed to submit indent")
            .await?;
        let indent_no = envelope
            .raw_field("indentNo")
            .map(crate::models::value_to_text)
            .unwrap_or_default();
        Ok(IndentReceipt { indent_no })
    }

    pub async fn get_pending_approvals(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(
            actions::GET_PENDING_APPROVALS,
            Vec::new(),
            "Failed to fetch pending approvals",
        )
        .await?
        .field("indents")
    }

    pub async fn approval_action(&self, row_number: u64, decision: ApprovalDecision) -> Result<()> {
        let params: Params = vec![
            ("rowNumber", row_number.to_string()),
            ("actionType", decision.as_str().to_string()),
        ];
        self.invoke(actions::APPROVAL_ACTION, params, "Failed to process approval")
            .await?;
        Ok(())
    }

    pub async fn get_pending_lifting(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(
            actions::GET_PENDING_LIFTING,
            Vec::new(),
            "Failed to fetch pending lifting items",
        )
        .await?
        .field("indents")
    }

    /// Submit lifting details as a multipart upload, with the bill photo when present.
    pub async fn submit_lifting(&self, row_number: u64, form: &LiftingForm) -> Result<()> {
        form.validate()?;
        let file = form
            .photo_of_bill
            .as_ref()
            .map(|photo| (PHOTO_OF_BILL_FIELD, photo));
        self.upload(
            actions::SUBMIT_LIFTING,
            form.to_fields(row_number),
            file,
            "Failed to submit lifting entry",
        )
        .await
    }

    pub async fn get_pending_store_in(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(
            actions::GET_PENDING_STORE_IN,
            Vec::new(),
            "Failed to fetch pending store in items",
        )
        .await?
        .field("indents")
    }

    /// Submit store-in details as a multipart upload with the product photo.
    pub async fn submit_store_in(&self, row_number: u64, form: &StoreInForm) -> Result<()> {
        form.validate()?;
        let file = form
            .photo_of_product
            .as_ref()
            .map(|photo| (PHOTO_OF_PRODUCT_FIELD, photo));
        self.upload(
            actions::SUBMIT_STORE_IN,
            form.to_fields(row_number),
            file,
            "Failed to submit store in entry",
        )
        .await
    }

    pub async fn get_pending_tally_entry(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(
            actions::GET_PENDING_TALLY_ENTRY,
            Vec::new(),
            "Failed to fetch pending tally entry items",
        )
        .await?
        .field("indents")
    }

    pub async fn submit_tally_entry(&self, row_number: u64, form: &TallyForm) -> Result<()> {
        form.validate()?;
        self.invoke(
            actions::SUBMIT_TALLY_ENTRY,
            form.to_params(row_number),
            "Failed to submit tally entry",
        )
        .await?;
        Ok(())
    }

    pub async fn get_pending_payments(&self) -> Result<Vec<WorkflowRecord>> {
        self.invoke(
            actions::GET_PENDING_PAYMENTS,
            Vec::new(),
            "Failed to fetch payment data",
        )
        .await?
        .field("payments")
    }

    async fn invoke(&self, action: &'static str, params: Params, default_error: &str) -> Result<ApiEnvelope> {
        let mut query: Params = Vec::with_capacity(params.len() + 1);
        query.push((actions::ACTION_PARAM, action.to_string()));
        query.extend(params);

        let payload = self.bridge.call(&query).await?;
        ApiEnvelope::from_payload(payload)?.into_result(default_error)
    }

    async fn upload(
        &self,
        action: &'static str,
        fields: Params,
        file: Option<(&'static str, &Attachment)>,
        default_error: &str,
    ) -> Result<()> {
        let mut form_fields: Params = Vec::with_capacity(fields.len() + 1);
        form_fields.push((actions::ACTION_PARAM, action.to_string()));
        form_fields.extend(fields);

        let payload = self.bridge.post_form(&form_fields, file).await?;
        ApiEnvelope::from_payload(payload)?.into_result(default_error)?;
        Ok(())
    }
}

fn cache_buster() -> (&'static str, String) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    (actions::CACHE_BUSTER_PARAM, millis.to_string())
}

/// Builder for configuring [`FmsClient`] instances.
pub struct FmsClientBuilder {
    base_url: Option<String>,
    timeouts: FmsLinkTimeouts,
    user_agent: Option<String>,
}

impl FmsClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeouts: FmsLinkTimeouts::default(),
            user_agent: None,
        }
    }

    /// Set the script endpoint URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set comprehensive timeout configuration
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use fms_link::{FmsClient, FmsLinkTimeouts};
    ///
    /// # fn example() -> fms_link::Result<()> {
    /// let client = FmsClient::builder()
    ///     .base_url("http://localhost:8080/exec")
    ///     .timeouts(FmsLinkTimeouts::fast())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn timeouts(mut self, timeouts: FmsLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FmsClient> {
        let raw_url = self
            .base_url
            .ok_or_else(|| FmsLinkError::ConfigurationError("base_url is required".into()))?;
        let base_url = Url::parse(raw_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FmsLinkError::ConfigurationError(format!(
                "unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("fms-link/{}", crate::VERSION));
        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(self.timeouts.connection_timeout)
            .user_agent(user_agent)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90));

        // The transport stays open past the callback deadline so that late
        // answers reach the registry and are dropped there.
        if !FmsLinkTimeouts::is_no_timeout(self.timeouts.request_timeout) {
            client_builder = client_builder.timeout(self.timeouts.request_timeout.saturating_mul(2));
        }

        let http_client = client_builder
            .build()
            .map_err(|e| FmsLinkError::ConfigurationError(e.to_string()))?;

        debug!(
            "[CLIENT] Configured for {} (deadline {:?})",
            base_url, self.timeouts.request_timeout
        );

        Ok(FmsClient {
            bridge: RequestBridge::new(base_url, http_client, self.timeouts),
        })
    }
}
