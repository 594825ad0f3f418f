use async_trait::async_trait;
use serde_json::Value;

use crate::tool::{req_str, ParamSpec, ParamType, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput};

/// `generate_qr_code(data)`: PNG image content, bytes passed through as-is.
pub struct QrCodeTool;

#[async_trait]
impl Tool for QrCodeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("generate_qr_code", "Generate a QR code PNG encoding the given text.")
            .param(ParamSpec::required("data", ParamType::String, "Text to encode"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let data = req_str(&input, "data")?;
        let png = ctx.apis.qrcode.generate_qrcode(data).await?;
        ctx.info(format!("Generated QR code ({} bytes)", png.len()));
        Ok(ToolOutput::Image {
            data: png.to_vec(),
            mime_type: "image/png".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, BASE};
    use pubapi_apis::testing::{RecordedCall, RecordingClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_bytes_returned_unmodified() {
        let png: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xff];
        let (ctx, client) = context(
            RecordingClient::new().with_bytes(format!("{BASE}/create-qr-code/?data=hello%20world"), png),
        );

        let out = QrCodeTool.execute(json!({"data": "hello world"}), &ctx).await.unwrap();
        assert_eq!(
            out,
            ToolOutput::Image {
                data: png.to_vec(),
                mime_type: "image/png".to_string()
            }
        );
        assert!(matches!(client.calls()[0], RecordedCall::GetBytes { .. }));
    }
}
