//! Metadata inspection.

use ffmcp_models::{GetVideoInfoParams, ToolResult};

use super::{failure, ToolExecutor, ToolName};
use crate::probe::probe_video;

const TOOL: ToolName = ToolName::GetVideoInfo;

impl ToolExecutor {
    pub async fn get_video_info(&self, params: GetVideoInfoParams) -> ToolResult {
        let input = match self.resolve(&params.video_path).await {
            Ok(input) => input,
            Err(e) => return failure(TOOL, e),
        };

        match probe_video(self.runner.as_ref(), &input.path).await {
            Ok(info) => {
                let mut result = ToolResult::ok("Video info retrieved").with_source(input.source);
                result.info = Some(info);
                result
            }
            Err(outcome) => outcome
                .as_execution_failure()
                .prefixed(TOOL.failure_label())
                .into(),
        }
    }
}
