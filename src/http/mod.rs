//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: every request is answered from a
//! file below the static root, and headers beyond the request line are
//! never inspected.
//!
//! # Architecture
//!
//! - **`buffer`**: fixed-capacity storage for one request
//! - **`reader`**: fills the buffer until the header terminator arrives
//! - **`parser`**: pulls the request target out of the request line
//! - **`resolver`**: reads the matching regular file under the static root
//! - **`response`**: status codes, response builder and composition
//! - **`writer`**: serializes responses and writes them out in full
//! - **`connection`**: the per-connection state machine tying these together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Fill the request buffer up to CRLFCRLF
//!        └──────┬──────┘
//!               │ Header block received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse target, read file, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```
//!
//! The peer closing its side while in `Reading` also leads to `Closed`.

pub mod buffer;
pub mod connection;
pub mod parser;
pub mod reader;
pub mod resolver;
pub mod response;
pub mod writer;
