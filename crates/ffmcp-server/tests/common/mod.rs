//! Shared fixtures for the server integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use ffmcp_media::{CommandRunner, FfmpegCommand, MediaDirs, PathResolver, ResourceExposer, ToolExecutor};
use ffmcp_models::Outcome;
use ffmcp_server::{AppState, McpServer, ServerConfig};

pub const API_KEY: &str = "test-secret";

/// Records every command instead of spawning it.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn execute(&self, command: &FfmpegCommand) -> Outcome {
        let argv = command.argv();
        self.calls.lock().unwrap().push(argv.clone());

        if let Some(out) = argv.last().map(Path::new).filter(|p| p.is_absolute()) {
            let _ = std::fs::write(out, b"artifact");
        }
        Outcome::success("ffmpeg version 6.1.1 Copyright (c) 2000-2023\n", "")
    }
}

pub struct TestServer {
    pub root: TempDir,
    pub runner: Arc<RecordingRunner>,
    pub mcp: Arc<McpServer>,
}

impl TestServer {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let dirs = Arc::new(MediaDirs::new(root.path()));
        let resolver = PathResolver::new(Arc::clone(&dirs)).unwrap();
        let runner = Arc::new(RecordingRunner::default());
        let tools = ToolExecutor::with_runner(Arc::clone(&dirs), resolver, runner.clone());
        let mcp = Arc::new(McpServer::new(tools, ResourceExposer::new(dirs)));
        Self { root, runner, mcp }
    }

    /// Router state with the gate on when `api_key` is set.
    pub fn state(&self, api_key: Option<&str>) -> AppState {
        let config = ServerConfig::default().with_api_key(api_key.map(str::to_string));
        AppState::with_server(config, Arc::clone(&self.mcp))
    }

    /// Drop a file into the output area.
    pub fn publish(&self, name: &str, bytes: &[u8]) {
        let public = self.root.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(public.join(name), bytes).unwrap();
    }
}
