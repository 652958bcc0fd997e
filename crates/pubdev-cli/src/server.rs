//! MCP service exposing the pub.dev tools.
//!
//! rmcp handles the stdio framing, the initialize handshake and tool routing;
//! each tool method here forwards to `Toolbox`.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use tracing::warn;

use pubdev_core::error::{PubError, PubResult};

use crate::tools::{DocumentationArgs, PackageNameArgs, PageArgs, SearchArgs, ToolKind, Toolbox};

/// pub.dev MCP service
#[derive(Clone)]
pub struct PubDevService {
    toolbox: Toolbox,
    tool_router: ToolRouter<Self>,
}

impl PubDevService {
    pub fn new(toolbox: Toolbox) -> Self {
        Self {
            toolbox,
            tool_router: Self::tool_router(),
        }
    }

    /// Tool definitions as advertised in `tools/list`
    pub fn tool_list(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }
}

#[tool_handler]
impl ServerHandler for PubDevService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Looks up Dart and Flutter packages on pub.dev. Use 'search_packages' or 'get_trending_packages' to discover packages, then 'get_package_info', 'get_package_versions', 'get_package_score' or 'get_package_documentation' for details.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pubdev-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tool_router]
impl PubDevService {
    #[tool(description = "Get current information about a Flutter/Dart package: latest version, description, dependencies, installation snippet.")]
    pub async fn get_package_info(
        &self,
        Parameters(request): Parameters<PackageNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::PackageInfo,
            self.toolbox.package_info(&request.package_name).await,
        )
    }

    #[tool(description = "Search Flutter/Dart packages on pub.dev by keyword.")]
    pub async fn search_packages(
        &self,
        Parameters(request): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::SearchPackages,
            self.toolbox.search_packages(&request.query, request.page).await,
        )
    }

    #[tool(description = "List every published version of a package, newest first.")]
    pub async fn get_package_versions(
        &self,
        Parameters(request): Parameters<PackageNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::PackageVersions,
            self.toolbox.package_versions(&request.package_name).await,
        )
    }

    #[tool(description = "Get README text and documentation links for a package, optionally for a specific version.")]
    pub async fn get_package_documentation(
        &self,
        Parameters(request): Parameters<DocumentationArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::PackageDocumentation,
            self.toolbox
                .package_documentation(&request.package_name, request.version.as_deref())
                .await,
        )
    }

    #[tool(description = "Get pub points, likes and popularity score for a package.")]
    pub async fn get_package_score(
        &self,
        Parameters(request): Parameters<PackageNameArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::PackageScore,
            self.toolbox.package_score(&request.package_name).await,
        )
    }

    #[tool(description = "List trending Flutter packages ordered by popularity.")]
    pub async fn get_trending_packages(
        &self,
        Parameters(request): Parameters<PageArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            ToolKind::TrendingPackages,
            self.toolbox.trending_packages(request.page).await,
        )
    }
}

/// Wrap handler output as a text result, or map the failure to an MCP error
fn respond(kind: ToolKind, result: PubResult<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(err) => {
            warn!(tool = kind.name(), error = %err, "tool call failed");
            Err(to_mcp_error(&err))
        },
    }
}

/// Bad input is the caller's problem; everything else is an internal error
pub fn to_mcp_error(err: &PubError) -> McpError {
    if err.is_caller_error() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(format!("Tool execution failed: {}", err), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubdev_config::Settings;
    use rmcp::model::ErrorCode;
    use std::collections::BTreeSet;

    fn service() -> PubDevService {
        PubDevService::new(Toolbox::from_settings(&Settings::default()).unwrap())
    }

    #[test]
    fn test_router_matches_dispatcher() {
        let routed: BTreeSet<String> = service()
            .tool_list()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        let dispatched: BTreeSet<String> = ToolKind::ALL
            .into_iter()
            .map(|kind| kind.name().to_string())
            .collect();

        assert_eq!(routed, dispatched);
    }

    #[test]
    fn test_tools_have_descriptions() {
        for tool in service().tool_list() {
            let description = tool.description.as_deref().unwrap_or_default();
            assert!(!description.is_empty(), "{} has no description", tool.name);
        }
    }

    #[test]
    fn test_error_mapping() {
        let invalid = PubError::invalid_argument("package_name", "must not be empty");
        assert_eq!(to_mcp_error(&invalid).code, ErrorCode::INVALID_PARAMS);

        let missing = PubError::PackageNotFound {
            name: "nope".to_string(),
        };
        let mapped = to_mcp_error(&missing);
        assert_eq!(mapped.code, ErrorCode::INTERNAL_ERROR);
        assert!(mapped.message.contains("Tool execution failed"));
        assert!(mapped.message.contains("nope"));
    }
}
