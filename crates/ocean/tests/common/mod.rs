//! Shared fixtures: a scripted in-memory API, JSON builders for wire
//! payloads, and facade constructors pointed at test backends.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use ocean::api::models::{
    Action, CreateDropletRequest, CreateSshKeyRequest, Droplet, DropletStatus, Project,
    ProjectResource, Snapshot, SshKey,
};
use ocean::{DigitalOcean, DoApi, OceanConfig, Result};
use serde_json::{json, Value};
use wiremock::MockServer;

// =============================================================================
// Configuration and facade constructors
// =============================================================================

/// Config with harmless paths and fast wait timings, no base URL override.
pub fn fake_config() -> OceanConfig {
    OceanConfig {
        token_path: "/nonexistent/access_token".into(),
        public_key_path: "/nonexistent/id_rsa.pub".into(),
        api_base_url: None,
        poll_interval_secs: 0,
        wait_timeout_secs: 5,
    }
}

/// Config pointing the API client at a mock server.
pub fn test_config(server_uri: &str) -> OceanConfig {
    OceanConfig {
        api_base_url: Some(server_uri.to_string()),
        ..fake_config()
    }
}

/// Facade over a mock server.
pub fn facade(server: &MockServer) -> DigitalOcean {
    init_tracing();
    DigitalOcean::with_token("test-token", test_config(&server.uri())).expect("facade over mock")
}

/// Install a subscriber once so `RUST_LOG=debug` shows request flow.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Scripted API
// =============================================================================

/// In-memory [`DoApi`] whose `get_droplet` walks a status script, one
/// entry per call, repeating the last entry once exhausted. Everything
/// the wait-loop tests do not touch is left unimplemented so stray
/// calls fail loudly.
pub struct ScriptedApi {
    droplet: Droplet,
    statuses: Vec<DropletStatus>,
    polls: Mutex<usize>,
}

impl ScriptedApi {
    pub fn new(droplet: Droplet, statuses: Vec<DropletStatus>) -> Self {
        assert!(!statuses.is_empty(), "status script must not be empty");
        Self {
            droplet,
            statuses,
            polls: Mutex::new(0),
        }
    }

    /// How many times `get_droplet` has been called.
    pub fn polls(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl DoApi for ScriptedApi {
    async fn list_droplets(&self) -> Result<Vec<Droplet>> {
        Ok(vec![self.droplet.clone()])
    }

    async fn get_droplet(&self, id: i64) -> Result<Droplet> {
        assert_eq!(id, self.droplet.id, "unexpected droplet ID");
        let mut polls = self.polls.lock().unwrap();
        let index = (*polls).min(self.statuses.len() - 1);
        *polls += 1;
        let mut droplet = self.droplet.clone();
        droplet.status = self.statuses[index];
        Ok(droplet)
    }

    async fn create_droplet(&self, _request: &CreateDropletRequest) -> Result<Droplet> {
        unimplemented!("not scripted")
    }

    async fn delete_droplet(&self, _id: i64) -> Result<()> {
        unimplemented!("not scripted")
    }

    async fn list_droplet_snapshots(&self, _id: i64) -> Result<Vec<Snapshot>> {
        unimplemented!("not scripted")
    }

    async fn list_droplet_actions(&self, _id: i64) -> Result<Vec<Action>> {
        unimplemented!("not scripted")
    }

    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        unimplemented!("not scripted")
    }

    async fn get_ssh_key(&self, _id: i64) -> Result<SshKey> {
        unimplemented!("not scripted")
    }

    async fn create_ssh_key(&self, _request: &CreateSshKeyRequest) -> Result<SshKey> {
        unimplemented!("not scripted")
    }

    async fn find_ssh_key_by_public_key(&self, _public_key: &str) -> Result<Option<SshKey>> {
        unimplemented!("not scripted")
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        unimplemented!("not scripted")
    }

    async fn get_project(&self, _id: &str) -> Result<Project> {
        unimplemented!("not scripted")
    }

    async fn list_project_resources(&self, _id: &str) -> Result<Vec<ProjectResource>> {
        unimplemented!("not scripted")
    }

    async fn assign_project_resources(&self, _id: &str, _urns: &[String]) -> Result<()> {
        unimplemented!("not scripted")
    }
}

// =============================================================================
// Wire payload builders
// =============================================================================

/// Droplet payload as the API returns it.
pub fn droplet_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "memory": 2048,
        "vcpus": 2,
        "disk": 50,
        "status": status,
        "region": { "slug": "ams3", "name": "Amsterdam 3" },
        "size_slug": "s-2vcpu-2gb",
        "networks": {
            "v4": [{
                "ip_address": "164.92.65.10",
                "netmask": "255.255.240.0",
                "gateway": "164.92.64.1",
                "type": "public"
            }],
            "v6": []
        },
        "image": {
            "id": 6_918_990,
            "name": "22.04 x64",
            "slug": "ubuntu-22-04-x64",
            "distribution": "Ubuntu"
        },
        "tags": [],
        "created_at": "2024-03-10T08:00:00Z"
    })
}

/// Parsed droplet fixture.
pub fn droplet(id: i64, name: &str, status: &str) -> Droplet {
    serde_json::from_value(droplet_json(id, name, status)).expect("droplet fixture")
}

/// Droplet list envelope.
pub fn droplet_list_json(droplets: &[Value]) -> Value {
    json!({ "droplets": droplets, "links": {}, "meta": { "total": droplets.len() } })
}

/// SSH key payload as the API returns it.
pub fn ssh_key_json(id: i64, name: &str, public_key: &str) -> Value {
    json!({
        "id": id,
        "fingerprint": "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa",
        "name": name,
        "public_key": public_key
    })
}

/// SSH key list envelope.
pub fn ssh_key_list_json(keys: &[Value]) -> Value {
    json!({ "ssh_keys": keys, "links": {}, "meta": { "total": keys.len() } })
}

/// Project payload as the API returns it.
pub fn project_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "owner_uuid": "99525febec065ca37b2ffe4f852fd2b2581895e7",
        "name": name,
        "purpose": "Service or API",
        "description": "",
        "environment": "Production",
        "is_default": false,
        "created_at": "2018-09-27T20:10:35Z"
    })
}

/// Project list envelope.
pub fn project_list_json(projects: &[Value]) -> Value {
    json!({ "projects": projects, "links": {}, "meta": { "total": projects.len() } })
}

/// Project resource list envelope from URN strings.
pub fn resource_list_json(urns: &[&str]) -> Value {
    let resources: Vec<Value> = urns
        .iter()
        .map(|urn| {
            json!({
                "urn": urn,
                "assigned_at": "2024-03-10T08:05:00Z",
                "status": "ok"
            })
        })
        .collect();
    json!({ "resources": resources, "links": {}, "meta": { "total": urns.len() } })
}
