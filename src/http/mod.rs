//! HTTP protocol implementation.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from complete request text
//! - **`url`**: Decomposes the URL token into protocol, domain, port, script, path, query, fragment
//! - **`request`**: The parsed request model and the flagged-value primitive
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Flagged parsing
//!
//! The parser does not abort on the first irregularity. Every request field
//! is stored with a support flag: structurally valid input the server
//! declines to honor (a non-http scheme, a script outside the CGI folder,
//! Content-Length on a bodyless method) is recorded but not fatal, and the
//! handler decides the final status code. Only hard protocol violations
//! (no method/URL separator, unknown method, GET with a body) abort a
//! request.
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for one complete request
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and generate response
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

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod url;
pub mod writer;
