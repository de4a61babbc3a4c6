use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use twilight_http::Client;

use mappings_core::{Context, MappingsConfig};
use mappings_data::SnapshotLibrary;
use mappings_utils::pagination::PaginationSession;

use crate::reply::Reply;

pub(crate) const FIXTURE_SNAPSHOT: &str = r#"{
    "namespaces": {
        "yarn": {
            "versions": ["1.16.4", "1.16.5", "21w03a", "21w05a"],
            "default": "1.16.5",
            "channels": { "official": "1.16.5", "snapshot": "21w03a", "patchwork": "21w05a" },
            "datasets": {
                "1.16.5": {
                    "classes": [
                        {
                            "key": "net/minecraft/block/Block",
                            "short": "`Block`",
                            "long": "`net/minecraft/block/Block` (class_2248)"
                        },
                        {
                            "key": "net/minecraft/block/BlockState",
                            "short": "`BlockState`",
                            "long": "`net/minecraft/block/BlockState` (class_2680)"
                        }
                    ],
                    "methods": [
                        { "key": "net/minecraft/block/Block/getDefaultState", "short": "`getDefaultState`" }
                    ]
                },
                "21w03a": {
                    "classes": [{ "key": "net/minecraft/block/Block", "short": "`Block`" }]
                },
                "21w05a": {
                    "classes": [{ "key": "net/minecraft/block/Block", "short": "`Block`" }]
                }
            }
        },
        "legacy-yarn": {
            "versions": ["1.3.2", "1.4.7"],
            "default": "1.4.7",
            "datasets": { "1.4.7": {} }
        },
        "mcp": {
            "name": "MCP",
            "versions": ["1.12.2"],
            "default": "1.12.2",
            "datasets": { "1.12.2": {} }
        }
    }
}"#;

pub(crate) fn config(raw: &str) -> MappingsConfig {
    MappingsConfig::from_toml(raw).unwrap()
}

/// Context over the fixture snapshot; its client is never reached in tests.
pub(crate) fn context(raw: &str) -> Context {
    // Already installed when another test got here first.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let library = SnapshotLibrary::from_json(FIXTURE_SNAPSHOT).unwrap();
    Context::new(
        Arc::new(Client::new("test-token".to_owned())),
        Arc::new(config(raw)),
        Arc::new(library),
    )
}

/// Reply double that records what a command sent.
#[derive(Default)]
pub(crate) struct RecordingReply {
    events: Mutex<Vec<String>>,
}

impl RecordingReply {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Reply for RecordingReply {
    async fn text(&self, content: &str) -> anyhow::Result<()> {
        self.record(format!("text:{content}"));
        Ok(())
    }

    async fn typing(&self) -> anyhow::Result<()> {
        self.record("typing".to_owned());
        Ok(())
    }

    async fn paginate(&self, session: PaginationSession) -> anyhow::Result<()> {
        let view = session.view().unwrap();
        self.record(format!(
            "paginate:{}:{}:{}",
            session.owner_id(),
            view.page.title,
            view.total
        ));
        Ok(())
    }
}
