//! Integration Test Harness
//!
//! - `TestServer` - Runs a real listingd server on a random port
//! - `MockProvider` - Scripted chat-completion provider that records requests
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::{MockProvider, MockReply, TestServer};
//!
//! #[tokio::test]
//! async fn test_llm_copy() {
//!     let provider = MockProvider::start(MockReply::completion(r#"{"title":"T"}"#)).await.unwrap();
//!     let server = TestServer::start(provider.config()).await.unwrap();
//!
//!     let resp = server.post_listing(&serde_json::json!({ "area": 50 })).await.unwrap();
//!     assert_eq!(resp["source"], "llm");
//! }
//! ```

mod provider;
mod server;

pub use provider::{MockProvider, MockReply, RecordedRequest};
pub use server::TestServer;
