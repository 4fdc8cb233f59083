//! Typed client for the CNC link gateway.
//!
//! Every gateway endpoint answers HTTP 200 with a `FocasResponse` envelope;
//! the client turns `success = false` into [`ClientError::Gateway`] so
//! callers get a plain `Result`.

use std::future::Future;
use std::time::Duration;

use cnc_link_common::{
    AxisPositionData, ConnectionRequest, FeedrateData, FocasResponse, ServiceStatus,
    SpindleSpeedData, ToolOffsetData, ToolOffsetRequest, ToolOffsetsRangeRequest, ToolRadiusData,
    ToolRadiusRequest, WorkZeroOffsetData, WorkZeroOffsetRequest, WorkZeroOffsetsRangeRequest,
    WorkZeroOffsetsRangeSingleRequest, WriteMacroRequest,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default address of a gateway running on the same machine.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5999";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway answered with HTTP {0}")]
    Status(u16),

    #[error("{message}")]
    Gateway { message: String, code: Option<i16> },
}

impl ClientError {
    /// FOCAS result code reported by the gateway, if any.
    pub fn error_code(&self) -> Option<i16> {
        match self {
            ClientError::Gateway { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client for one gateway instance. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FocasClient {
    http_client: Client,
    base_url: String,
}

impl FocasClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http_client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/focas{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let envelope: FocasResponse<T> = response.json().await?;
        match envelope.into_result() {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ClientError::Gateway {
                message: "Response carried no data".to_string(),
                code: None,
            }),
            Err((message, code)) => Err(ClientError::Gateway { message, code }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        Self::send(self.http_client.get(&url)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        Self::send(self.http_client.post(&url).json(body)).await
    }

    pub async fn connect(&self, request: &ConnectionRequest) -> Result<String> {
        self.post("/connect", request).await
    }

    pub async fn disconnect(&self) -> Result<String> {
        let url = self.url("/disconnect");
        tracing::debug!("POST {}", url);
        Self::send(self.http_client.post(&url)).await
    }

    /// Liveness of the gateway itself. Not wrapped in an envelope.
    pub async fn status(&self) -> Result<ServiceStatus> {
        let response = self.http_client.get(self.url("/status")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    pub async fn feedrate(&self) -> Result<FeedrateData> {
        self.get("/feedrate").await
    }

    pub async fn spindle_speed(&self) -> Result<SpindleSpeedData> {
        self.get("/spindle-speed").await
    }

    pub async fn absolute_position(&self) -> Result<AxisPositionData> {
        self.get("/absolute-position").await
    }

    pub async fn tool_radius(&self, tool_group: i16, tool_number: i16) -> Result<ToolRadiusData> {
        let request = ToolRadiusRequest {
            tool_group,
            tool_number,
        };
        self.post("/tool-radius", &request).await
    }

    pub async fn tool_offsets(&self, tool_number: i16) -> Result<ToolOffsetData> {
        self.post("/tool-offsets", &ToolOffsetRequest { tool_number })
            .await
    }

    pub async fn tool_offsets_range(&self, start: i16, end: i16) -> Result<Vec<ToolOffsetData>> {
        let request = ToolOffsetsRangeRequest {
            start_tool_number: start,
            end_tool_number: end,
        };
        self.post("/tool-offsets-range", &request).await
    }

    pub async fn work_zero_offsets_range(
        &self,
        start: i16,
        end: i16,
    ) -> Result<Vec<WorkZeroOffsetData>> {
        let request = WorkZeroOffsetsRangeRequest {
            start_coord_sys: start,
            end_coord_sys: end,
        };
        self.post("/work-zero-offsets-range", &request).await
    }

    pub async fn work_zero_offset(
        &self,
        number: i16,
        axis: i16,
        length: Option<i16>,
    ) -> Result<WorkZeroOffsetData> {
        let request = WorkZeroOffsetRequest {
            number,
            axis,
            length,
        };
        self.post("/work-zero-offset", &request).await
    }

    pub async fn work_zero_offsets_range_single(
        &self,
        axis: i16,
        start: i16,
        end: i16,
        length: Option<i16>,
    ) -> Result<Vec<WorkZeroOffsetData>> {
        let request = WorkZeroOffsetsRangeSingleRequest {
            axis,
            start_number: start,
            end_number: end,
            length,
        };
        self.post("/work-zero-offsets-range-single", &request).await
    }

    /// Store `value * 10^-decimals` in macro variable `#number`.
    pub async fn write_macro(&self, number: i16, value: i32, decimals: i16) -> Result<String> {
        let request = WriteMacroRequest {
            number,
            mcr_val: value,
            dec_val: decimals,
        };
        self.post("/write-macro", &request).await
    }

    /// Connect, run `op`, then disconnect.
    ///
    /// Nothing is run when the connect fails. The disconnect happens whether
    /// or not `op` succeeded; its own failure is only logged.
    pub async fn with_session<T, F, Fut>(&self, request: &ConnectionRequest, op: F) -> Result<T>
    where
        F: FnOnce(FocasClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let message = self.connect(request).await?;
        tracing::info!("{}", message);

        let result = op(self.clone()).await;

        match self.disconnect().await {
            Ok(message) => tracing::info!("{}", message),
            Err(e) => tracing::warn!("Disconnect after session failed: {}", e),
        }
        result
    }
}
