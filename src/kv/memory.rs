use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryBackend {
	entries: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
	pub async fn get(&self, key: &str) -> Option<Value> {
		self.entries.read().await.get(key).cloned()
	}

	pub async fn set(&self, key: &str, value: Value) {
		self.entries.write().await.insert(key.to_string(), value);
	}

	pub async fn remove(&self, key: &str) {
		self.entries.write().await.remove(key);
	}
}
